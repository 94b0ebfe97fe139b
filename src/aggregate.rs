//! Summary tables derived from the incident set.
//!
//! Each table is built once from the full record set and never mutated.
//! Rows are grouped by neighborhood (byte order) and then by the table's own
//! secondary key, which is the order the chart adapter preserves.

mod monthly;
mod race;
mod time_of_day;
pub mod windows;

pub use monthly::{monthly_summary, MonthlyRow, MOVING_AVERAGE_WINDOW};
pub use race::{race_summary, RaceRow};
pub use time_of_day::{time_of_day_summary, TimeOfDayRow};

use crate::incident::Incident;
use serde::Serialize;

/// A summary row keyed by neighborhood.
pub trait NeighborhoodRow {
    fn neighborhood(&self) -> &str;
}

/// Ordered, immutable rows of one summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SummaryTable<R> {
    rows: Vec<R>,
}

impl<R> Default for SummaryTable<R> {
    fn default() -> Self {
        SummaryTable { rows: Vec::new() }
    }
}

impl<R: NeighborhoodRow> SummaryTable<R> {
    pub fn new(rows: Vec<R>) -> Self {
        SummaryTable { rows }
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows for one neighborhood, in table order.
    pub fn rows_for(&self, neighborhood: &str) -> Vec<&R> {
        self.rows
            .iter()
            .filter(|row| row.neighborhood() == neighborhood)
            .collect()
    }

    /// Slices the table down to the requested neighborhoods.
    ///
    /// One entry per requested name, in request order. A name with no rows
    /// yields an empty entry rather than an error.
    pub fn select<'a, S: AsRef<str>>(&'a self, selection: &'a [S]) -> Vec<Selection<'a, R>> {
        selection
            .iter()
            .map(|name| Selection {
                neighborhood: name.as_ref(),
                rows: self.rows_for(name.as_ref()),
            })
            .collect()
    }

    /// Distinct neighborhoods present in the table, in table order.
    pub fn neighborhoods(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for row in &self.rows {
            if names.last() != Some(&row.neighborhood()) {
                names.push(row.neighborhood());
            }
        }
        names
    }
}

/// The rows of one summary belonging to one selected neighborhood.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection<'a, R> {
    pub neighborhood: &'a str,
    pub rows: Vec<&'a R>,
}

/// The three summaries the dashboard charts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Aggregates {
    pub monthly: SummaryTable<MonthlyRow>,
    pub race: SummaryTable<RaceRow>,
    pub time_of_day: SummaryTable<TimeOfDayRow>,
}

impl Aggregates {
    /// Builds every summary from the full incident set.
    pub fn build(incidents: &[Incident]) -> Self {
        Aggregates {
            monthly: monthly_summary(incidents),
            race: race_summary(incidents),
            time_of_day: time_of_day_summary(incidents),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn incident(nbh: &str, race: &str, ts: &str) -> Incident {
        Incident::from_raw(nbh, race, ts).unwrap()
    }

    fn sample() -> Vec<Incident> {
        vec![
            incident("B", "Asian", "2020-03-01 08:00"),
            incident("A", "White", "2020-01-05 10:00"),
            incident("A", "Black", "2020-01-06 14:00"),
            incident("C", "White", "2020-01-09 23:00"),
        ]
    }

    #[test]
    fn build_produces_all_three_tables() {
        let aggregates = Aggregates::build(&sample());
        assert_eq!(aggregates.monthly.neighborhoods(), vec!["A", "B", "C"]);
        assert_eq!(aggregates.race.neighborhoods(), vec!["A", "B", "C"]);
        assert_eq!(aggregates.time_of_day.neighborhoods(), vec!["A", "B", "C"]);
    }

    #[test]
    fn select_preserves_request_order_and_reports_missing_as_empty() {
        let aggregates = Aggregates::build(&sample());
        let selection = ["C", "Z", "A"];
        let picked = aggregates.time_of_day.select(&selection);

        let names: Vec<&str> = picked.iter().map(|s| s.neighborhood).collect();
        assert_eq!(names, vec!["C", "Z", "A"]);
        assert_eq!(picked[0].rows.len(), 1);
        assert!(picked[1].rows.is_empty());
        assert_eq!(picked[2].rows.len(), 2);
        assert!(picked[2].rows[0].hour < picked[2].rows[1].hour);
    }

    #[test]
    fn empty_selection_selects_nothing() {
        let aggregates = Aggregates::build(&sample());
        let selection: [&str; 0] = [];
        assert!(aggregates.race.select(&selection).is_empty());
    }

    #[test]
    fn empty_input_builds_empty_tables() {
        let aggregates = Aggregates::build(&[]);
        assert!(aggregates.monthly.is_empty());
        assert!(aggregates.race.is_empty());
        assert!(aggregates.time_of_day.is_empty());
    }

    #[test]
    fn every_row_neighborhood_comes_from_the_input() {
        let incidents = sample();
        let aggregates = Aggregates::build(&incidents);
        let known: Vec<&str> = incidents.iter().map(|i| i.neighborhood.as_str()).collect();
        for name in aggregates
            .monthly
            .neighborhoods()
            .into_iter()
            .chain(aggregates.race.neighborhoods())
            .chain(aggregates.time_of_day.neighborhoods())
        {
            assert!(known.contains(&name), "unexpected neighborhood {name}");
        }
    }
}
