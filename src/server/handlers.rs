//! HTTP request handlers for the dashboard endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Html,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use super::error::ApiError;
use super::state::AppState;
use crate::charts::{ChartKind, Figure};
use crate::dashboard::{Dashboard, Figures};

const INDEX_HTML: &str = include_str!("index.html");

/// Largest selection a single figure request may carry.
pub const MAX_SELECTION: usize = 64;

/// GET / - Dashboard page
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Response for the health check
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub generation: String,
    pub loaded_at: String,
    pub incidents: usize,
    pub skipped: usize,
}

/// GET /health - Health check with the current snapshot's identity
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let dashboard = state.dashboard.snapshot().await;

    Json(HealthResponse {
        status: "ok".to_string(),
        generation: dashboard.generation().to_string(),
        loaded_at: dashboard.loaded_at().to_rfc3339(),
        incidents: dashboard.incident_count(),
        skipped: dashboard.skipped_count(),
    })
}

/// Response for neighborhood options
#[derive(Debug, Serialize, Deserialize)]
pub struct NeighborhoodsResponse {
    pub neighborhoods: Vec<String>,
    pub default_selection: Vec<String>,
}

/// GET /api/neighborhoods - Options for the selection input
pub async fn list_neighborhoods(State(state): State<Arc<AppState>>) -> Json<NeighborhoodsResponse> {
    let dashboard = state.dashboard.snapshot().await;

    Json(NeighborhoodsResponse {
        neighborhoods: dashboard.neighborhoods().to_vec(),
        default_selection: dashboard.default_selection(),
    })
}

/// Body of a figure request
#[derive(Debug, Deserialize)]
pub struct FigureRequest {
    /// Selected neighborhoods; absent means the default selection
    #[serde(default)]
    pub neighborhoods: Option<Vec<String>>,
}

/// Response carrying all three figures
#[derive(Debug, Serialize)]
pub struct FiguresResponse {
    pub generation: String,
    pub neighborhoods: Vec<String>,
    pub figures: Figures,
}

/// Response carrying one figure
#[derive(Debug, Serialize)]
pub struct ChartResponse {
    pub generation: String,
    pub chart: ChartKind,
    pub neighborhoods: Vec<String>,
    pub figure: Figure,
}

/// Resolves the selection in a request against the snapshot's defaults
fn resolve_selection(
    dashboard: &Dashboard,
    request: FigureRequest,
) -> Result<Vec<String>, ApiError> {
    let selection = match request.neighborhoods {
        Some(selection) => selection,
        None => dashboard.default_selection(),
    };

    if selection.len() > MAX_SELECTION {
        return Err(ApiError::InvalidParameter(format!(
            "At most {} neighborhoods may be selected, got {}",
            MAX_SELECTION,
            selection.len()
        )));
    }

    if selection.iter().any(|name| name.trim().is_empty()) {
        return Err(ApiError::InvalidParameter(
            "Neighborhood names must not be blank".to_string(),
        ));
    }

    Ok(selection)
}

/// POST /api/figures - All three figures for a selection
pub async fn all_figures(
    State(state): State<Arc<AppState>>,
    body: Result<Json<FigureRequest>, JsonRejection>,
) -> Result<Json<FiguresResponse>, ApiError> {
    let Json(request) = body?;
    let dashboard = state.dashboard.snapshot().await;
    let neighborhoods = resolve_selection(&dashboard, request)?;

    debug!(selected = neighborhoods.len(), "Building all figures");
    let figures = dashboard.figures(&neighborhoods);

    Ok(Json(FiguresResponse {
        generation: dashboard.generation().to_string(),
        neighborhoods,
        figures,
    }))
}

/// POST /api/figures/{chart} - One figure for a selection
pub async fn chart_figure(
    State(state): State<Arc<AppState>>,
    Path(chart): Path<String>,
    body: Result<Json<FigureRequest>, JsonRejection>,
) -> Result<Json<ChartResponse>, ApiError> {
    let kind = chart
        .parse::<ChartKind>()
        .map_err(|_| ApiError::UnknownChart(chart.clone()))?;
    let Json(request) = body?;
    let dashboard = state.dashboard.snapshot().await;
    let neighborhoods = resolve_selection(&dashboard, request)?;

    debug!(%kind, selected = neighborhoods.len(), "Building figure");
    let figure = dashboard.figure(kind, &neighborhoods);

    Ok(Json(ChartResponse {
        generation: dashboard.generation().to_string(),
        chart: kind,
        neighborhoods,
        figure,
    }))
}
