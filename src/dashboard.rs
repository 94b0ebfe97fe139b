//! The immutable dashboard snapshot and the holder that swaps it on refresh.

use crate::aggregate::Aggregates;
use crate::charts::{monthly_figure, race_figure, time_of_day_figure, ChartKind, Figure};
use crate::incident::Incident;
use crate::loader::{DatasetLoader, DatasetSource, LoadError, LoadReport};
use crate::palette::Palette;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

/// Neighborhoods selected when the page first loads.
pub const DEFAULT_SELECTION: [&str; 3] = [
    "Brightwood Park, Crestwood, Petworth",
    "Shaw, Logan Circle",
    "North Michigan Park, Michigan Park, University Heights",
];

/// All three figures for one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figures {
    pub monthly: Figure,
    pub race: Figure,
    pub time_of_day: Figure,
}

/// Everything the interactive charts read: neighborhood options, the three
/// summaries and the palette. Built once per load and never mutated.
#[derive(Debug, Clone)]
pub struct Dashboard {
    generation: Uuid,
    loaded_at: DateTime<Utc>,
    incident_count: usize,
    skipped_count: usize,
    neighborhoods: Vec<String>,
    aggregates: Aggregates,
    palette: Palette,
}

impl Dashboard {
    /// Aggregates `incidents` into a new snapshot.
    pub fn from_incidents(incidents: &[Incident], palette: Palette) -> Self {
        let mut seen = HashSet::new();
        let neighborhoods: Vec<String> = incidents
            .iter()
            .filter(|incident| seen.insert(incident.neighborhood.as_str()))
            .map(|incident| incident.neighborhood.clone())
            .collect();

        for name in palette.missing_from(neighborhoods.iter().map(String::as_str)) {
            warn!(neighborhood = name, "Neighborhood has no palette entry");
        }

        Dashboard {
            generation: Uuid::new_v4(),
            loaded_at: Utc::now(),
            incident_count: incidents.len(),
            skipped_count: 0,
            neighborhoods,
            aggregates: Aggregates::build(incidents),
            palette,
        }
    }

    /// Builds a snapshot from a load, keeping the count of skipped rows.
    pub fn from_report(report: &LoadReport, palette: Palette) -> Self {
        let mut dashboard = Self::from_incidents(&report.incidents, palette);
        dashboard.skipped_count = report.skipped.len();
        dashboard
    }

    /// Loads `source` and builds a snapshot from it.
    pub async fn load(
        loader: &DatasetLoader,
        source: &DatasetSource,
        palette: Palette,
    ) -> Result<Self, LoadError> {
        let report = loader.load(source).await?;
        let dashboard = Self::from_report(&report, palette);
        info!(
            generation = %dashboard.generation,
            neighborhoods = dashboard.neighborhoods.len(),
            "Dashboard snapshot built"
        );
        Ok(dashboard)
    }

    pub fn figure<S: AsRef<str>>(&self, kind: ChartKind, selection: &[S]) -> Figure {
        match kind {
            ChartKind::Monthly => monthly_figure(selection, &self.aggregates.monthly, &self.palette),
            ChartKind::Race => race_figure(selection, &self.aggregates.race, &self.palette),
            ChartKind::TimeOfDay => {
                time_of_day_figure(selection, &self.aggregates.time_of_day, &self.palette)
            }
        }
    }

    pub fn figures<S: AsRef<str>>(&self, selection: &[S]) -> Figures {
        Figures {
            monthly: self.figure(ChartKind::Monthly, selection),
            race: self.figure(ChartKind::Race, selection),
            time_of_day: self.figure(ChartKind::TimeOfDay, selection),
        }
    }

    /// Distinct neighborhoods in the order they first appear in the data.
    pub fn neighborhoods(&self) -> &[String] {
        &self.neighborhoods
    }

    pub fn default_selection(&self) -> Vec<String> {
        DEFAULT_SELECTION.iter().map(|name| name.to_string()).collect()
    }

    pub fn aggregates(&self) -> &Aggregates {
        &self.aggregates
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Identifies this snapshot; changes on every refresh.
    pub fn generation(&self) -> Uuid {
        self.generation
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn incident_count(&self) -> usize {
        self.incident_count
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped_count
    }
}

/// Current snapshot, replaced wholesale on refresh.
///
/// Readers take a cheap `Arc` clone and compute against it without holding
/// the lock, so a refresh never exposes a half-built snapshot.
#[derive(Debug)]
pub struct SharedDashboard {
    current: RwLock<Arc<Dashboard>>,
}

impl SharedDashboard {
    pub fn new(dashboard: Dashboard) -> Self {
        SharedDashboard {
            current: RwLock::new(Arc::new(dashboard)),
        }
    }

    pub async fn snapshot(&self) -> Arc<Dashboard> {
        self.current.read().await.clone()
    }

    /// Swaps in `dashboard`, returning the snapshot it replaced.
    pub async fn replace(&self, dashboard: Dashboard) -> Arc<Dashboard> {
        let mut current = self.current.write().await;
        std::mem::replace(&mut *current, Arc::new(dashboard))
    }

    /// Reloads `source` and swaps the result in.
    ///
    /// On failure the current snapshot stays in place.
    pub async fn refresh(
        &self,
        loader: &DatasetLoader,
        source: &DatasetSource,
    ) -> Result<Arc<Dashboard>, LoadError> {
        let palette = self.snapshot().await.palette().clone();
        let fresh = Arc::new(Dashboard::load(loader, source, palette).await?);
        *self.current.write().await = fresh.clone();
        Ok(fresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::Palette;

    fn incidents() -> Vec<Incident> {
        vec![
            Incident::from_raw("B", "White", "2020-01-05 10:00").unwrap(),
            Incident::from_raw("A", "Black", "2020-01-06 14:00").unwrap(),
            Incident::from_raw("B", "Asian", "2020-02-01 10:00").unwrap(),
        ]
    }

    #[test]
    fn neighborhoods_in_first_seen_order() {
        let dashboard = Dashboard::from_incidents(&incidents(), Palette::default());
        assert_eq!(dashboard.neighborhoods(), &["B".to_string(), "A".to_string()]);
        assert_eq!(dashboard.incident_count(), 3);
        assert_eq!(dashboard.skipped_count(), 0);
    }

    #[test]
    fn figures_cover_all_charts() {
        let dashboard = Dashboard::from_incidents(&incidents(), Palette::default());
        let figures = dashboard.figures(&["A", "B"]);
        assert_eq!(figures.monthly.data.len(), 4);
        assert_eq!(figures.race.data.len(), 2);
        assert_eq!(figures.time_of_day.data.len(), 2);
        assert_eq!(figures, dashboard.figures(&["A", "B"]));
    }

    #[test]
    fn default_selection_names_three_neighborhoods() {
        let dashboard = Dashboard::from_incidents(&[], Palette::default());
        let defaults = dashboard.default_selection();
        assert_eq!(defaults.len(), 3);
        for name in &defaults {
            assert!(dashboard.palette().lookup(name).is_ok());
        }
    }

    #[tokio::test]
    async fn replace_swaps_whole_snapshot() {
        let shared = SharedDashboard::new(Dashboard::from_incidents(&[], Palette::default()));
        let before = shared.snapshot().await;

        let previous = shared
            .replace(Dashboard::from_incidents(&incidents(), Palette::default()))
            .await;
        assert_eq!(previous.generation(), before.generation());

        let after = shared.snapshot().await;
        assert_ne!(after.generation(), before.generation());
        assert_eq!(after.incident_count(), 3);
        // Readers holding the old snapshot keep a consistent view.
        assert_eq!(before.incident_count(), 0);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_current_snapshot() {
        let shared = SharedDashboard::new(Dashboard::from_incidents(&incidents(), Palette::default()));
        let before = shared.snapshot().await.generation();

        let loader = DatasetLoader::new().unwrap();
        let source = DatasetSource::Path("/nonexistent/incidents.csv".into());
        assert!(shared.refresh(&loader, &source).await.is_err());
        assert_eq!(shared.snapshot().await.generation(), before);
    }
}
