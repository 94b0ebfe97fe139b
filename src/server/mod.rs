//! HTTP server for the dashboard page and its figure API

mod error;
mod handlers;
mod routes;
mod state;

pub use error::ApiError;
pub use handlers::{FigureRequest, HealthResponse, NeighborhoodsResponse, MAX_SELECTION};
pub use routes::create_router;
pub use state::AppState;

use crate::dashboard::{Dashboard, SharedDashboard};
use crate::loader::{DatasetLoader, DatasetSource, LoaderConfig, DEFAULT_DATA_URL};
use crate::palette::Palette;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Server host address (default: "127.0.0.1")
    pub host: String,
    /// Server port (default: 3000)
    pub port: u16,
    /// Where the incident dataset is read from
    pub source: DatasetSource,
    /// Dataset request timeout in seconds (default: 30)
    pub fetch_timeout_seconds: u64,
    /// Reload the dataset on this interval; `None` loads once at startup
    pub refresh_interval: Option<Duration>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            source: DatasetSource::default(),
            fetch_timeout_seconds: LoaderConfig::default().timeout_seconds,
            refresh_interval: None,
        }
    }
}

impl ServerConfig {
    /// Creates a new server configuration
    pub fn new(host: impl Into<String>, port: u16, source: DatasetSource) -> Self {
        ServerConfig {
            host: host.into(),
            port,
            source,
            ..ServerConfig::default()
        }
    }

    /// Reads configuration from environment variables.
    ///
    /// `HOST`, `PORT`, `DATA_URL`, `DATA_PATH` (wins over `DATA_URL`),
    /// `FETCH_TIMEOUT_SECS` and `REFRESH_INTERVAL_SECS`. Unset or unparsable
    /// values keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ServerConfig::default();

        let source = match (lookup("DATA_PATH"), lookup("DATA_URL")) {
            (Some(path), _) if !path.is_empty() => DatasetSource::Path(PathBuf::from(path)),
            (_, Some(url)) if !url.is_empty() => DatasetSource::Url(url),
            _ => DatasetSource::Url(DEFAULT_DATA_URL.to_string()),
        };

        ServerConfig {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|value| value.parse::<u16>().ok())
                .unwrap_or(defaults.port),
            source,
            fetch_timeout_seconds: lookup("FETCH_TIMEOUT_SECS")
                .and_then(|value| value.parse::<u64>().ok())
                .filter(|&secs| secs > 0)
                .unwrap_or(defaults.fetch_timeout_seconds),
            refresh_interval: lookup("REFRESH_INTERVAL_SECS")
                .and_then(|value| value.parse::<u64>().ok())
                .filter(|&secs| secs > 0)
                .map(Duration::from_secs),
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Periodically reloads `source` into `dashboard`.
///
/// The first reload happens one full interval after startup. A failed reload
/// is logged and the previous snapshot keeps serving.
pub fn spawn_refresh(
    dashboard: Arc<SharedDashboard>,
    loader: DatasetLoader,
    source: DatasetSource,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every.max(Duration::from_secs(1)));
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match dashboard.refresh(&loader, &source).await {
                Ok(snapshot) => info!(
                    generation = %snapshot.generation(),
                    incidents = snapshot.incident_count(),
                    "Dashboard refreshed"
                ),
                Err(e) => error!(error = %e, "Dashboard refresh failed; keeping previous snapshot"),
            }
        }
    })
}

/// Runs the dashboard server
///
/// Loads the dataset once before binding; a load failure is fatal.
///
/// # Example
/// ```rust,no_run
/// use nbh_dashboard::server::{run_server, ServerConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     run_server(ServerConfig::from_env()).await?;
///     Ok(())
/// }
/// ```
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let loader = DatasetLoader::with_config(LoaderConfig {
        timeout_seconds: config.fetch_timeout_seconds,
    })?;

    let dashboard = Dashboard::load(&loader, &config.source, Palette::default()).await?;
    let shared = Arc::new(SharedDashboard::new(dashboard));

    if let Some(every) = config.refresh_interval {
        info!(interval_secs = every.as_secs(), "Scheduled dataset refresh enabled");
        spawn_refresh(shared.clone(), loader, config.source.clone(), every);
    }

    let state = Arc::new(AppState::with_shared(shared));
    let app = routes::create_router(state);

    let addr = config.address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
