use super::windows::{mean, TrailingWindow};
use super::{NeighborhoodRow, SummaryTable};
use crate::incident::{Incident, YearMonth};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Number of monthly buckets in the trailing average.
pub const MOVING_AVERAGE_WINDOW: usize = 4;

/// Incident count for one neighborhood in one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRow {
    pub neighborhood: String,
    pub year_month: YearMonth,
    pub count: u64,
    /// Mean of this and the three preceding observed buckets; `None` until
    /// four buckets exist.
    pub moving_average: Option<f64>,
}

impl NeighborhoodRow for MonthlyRow {
    fn neighborhood(&self) -> &str {
        &self.neighborhood
    }
}

/// Counts incidents per (neighborhood, month) and smooths each
/// neighborhood's series with a trailing mean.
///
/// Only months with at least one incident become buckets, and the window
/// runs over those buckets in calendar order.
pub fn monthly_summary(incidents: &[Incident]) -> SummaryTable<MonthlyRow> {
    let mut counts: BTreeMap<&str, BTreeMap<YearMonth, u64>> = BTreeMap::new();
    for incident in incidents {
        *counts
            .entry(incident.neighborhood.as_str())
            .or_default()
            .entry(incident.year_month())
            .or_insert(0) += 1;
    }

    let window = TrailingWindow::new(MOVING_AVERAGE_WINDOW);
    let mut rows = Vec::new();

    for (neighborhood, by_month) in counts {
        let series: Vec<f64> = by_month.values().map(|&count| count as f64).collect();
        let averages = window.apply(&series, mean);

        if by_month.len() <= window.burn_in() {
            debug!(
                neighborhood,
                buckets = by_month.len(),
                "Too few months for a moving average"
            );
        }

        rows.extend(
            by_month
                .into_iter()
                .zip(averages)
                .map(|((year_month, count), moving_average)| MonthlyRow {
                    neighborhood: neighborhood.to_string(),
                    year_month,
                    count,
                    moving_average,
                }),
        );
    }

    SummaryTable::new(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn incident(nbh: &str, ts: &str) -> Incident {
        Incident::from_raw(nbh, "White", ts).unwrap()
    }

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    #[test]
    fn counts_per_month() {
        let incidents = vec![
            incident("A", "2020-01-05 10:00"),
            incident("A", "2020-01-06 14:00"),
            incident("A", "2020-02-01 10:00"),
        ];
        let table = monthly_summary(&incidents);
        let summary: Vec<(YearMonth, u64)> =
            table.rows().iter().map(|r| (r.year_month, r.count)).collect();
        assert_eq!(summary, vec![(ym(2020, 1), 2), (ym(2020, 2), 1)]);
        assert!(table.rows().iter().all(|r| r.moving_average.is_none()));
    }

    #[test]
    fn moving_average_starts_at_fourth_bucket() {
        // Monthly counts 1, 2, 3, 4, 5 across a year boundary.
        let mut incidents = Vec::new();
        let months = ["2019-11", "2019-12", "2020-01", "2020-02", "2020-03"];
        for (i, month) in months.iter().enumerate() {
            for _ in 0..=i {
                incidents.push(incident("A", &format!("{}-15 12:00", month)));
            }
        }
        // Input order must not matter.
        incidents.reverse();

        let table = monthly_summary(&incidents);
        let rows = table.rows();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].year_month, ym(2019, 11));
        assert_eq!(rows[2].year_month, ym(2020, 1));

        let averages: Vec<Option<f64>> = rows.iter().map(|r| r.moving_average).collect();
        assert_eq!(averages, vec![None, None, None, Some(2.5), Some(3.5)]);
    }

    #[test]
    fn each_neighborhood_has_its_own_window() {
        let mut incidents = Vec::new();
        for month in ["2020-01", "2020-02", "2020-03", "2020-04"] {
            incidents.push(incident("A", &format!("{}-01 00:00", month)));
        }
        incidents.push(incident("B", "2020-04-01 00:00"));

        let table = monthly_summary(&incidents);
        assert_eq!(table.rows_for("A")[3].moving_average, Some(1.0));
        assert_eq!(table.rows_for("B")[0].moving_average, None);
        assert_eq!(
            TrailingWindow::new(MOVING_AVERAGE_WINDOW).burn_in(),
            MOVING_AVERAGE_WINDOW - 1
        );
    }

    #[test]
    fn gaps_between_months_are_not_filled() {
        let incidents = vec![
            incident("A", "2020-01-01 00:00"),
            incident("A", "2020-06-01 00:00"),
        ];
        let table = monthly_summary(&incidents);
        assert_eq!(table.len(), 2);
    }
}
