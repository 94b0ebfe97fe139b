use super::{NeighborhoodRow, SummaryTable};
use crate::incident::Incident;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

/// Share of a neighborhood's incidents that happened in one hour of the day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeOfDayRow {
    pub neighborhood: String,
    /// Hour of day, 0 through 23.
    pub hour: u32,
    pub count: u64,
    /// All incidents recorded for the neighborhood.
    pub total: u64,
    /// `count / total`
    pub fraction: f64,
}

impl NeighborhoodRow for TimeOfDayRow {
    fn neighborhood(&self) -> &str {
        &self.neighborhood
    }
}

/// Counts incidents per (neighborhood, hour) and expresses each count as a
/// fraction of the neighborhood total.
///
/// A neighborhood whose total is zero is omitted.
pub fn time_of_day_summary(incidents: &[Incident]) -> SummaryTable<TimeOfDayRow> {
    let mut counts: BTreeMap<&str, BTreeMap<u32, u64>> = BTreeMap::new();
    for incident in incidents {
        *counts
            .entry(incident.neighborhood.as_str())
            .or_default()
            .entry(incident.hour())
            .or_insert(0) += 1;
    }

    let mut rows = Vec::new();

    for (neighborhood, by_hour) in counts {
        let total: u64 = by_hour.values().sum();
        if total == 0 {
            warn!(neighborhood, "No incidents to split by hour");
            continue;
        }

        rows.extend(by_hour.into_iter().map(|(hour, count)| TimeOfDayRow {
            neighborhood: neighborhood.to_string(),
            hour,
            count,
            total,
            fraction: count as f64 / total as f64,
        }));
    }

    SummaryTable::new(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn incident(nbh: &str, ts: &str) -> Incident {
        Incident::from_raw(nbh, "White", ts).unwrap()
    }

    #[test]
    fn fractions_of_neighborhood_total() {
        let incidents = vec![
            incident("A", "2020-01-05 10:00"),
            incident("A", "2020-01-06 14:00"),
            incident("A", "2020-02-01 10:30"),
        ];
        let table = time_of_day_summary(&incidents);
        let rows = table.rows();
        assert_eq!(rows.len(), 2);

        assert_eq!((rows[0].hour, rows[0].count, rows[0].total), (10, 2, 3));
        assert!((rows[0].fraction - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!((rows[1].hour, rows[1].count, rows[1].total), (14, 1, 3));
        assert!((rows[1].fraction - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn fractions_sum_to_one_per_neighborhood() {
        let mut incidents = Vec::new();
        for (i, nbh) in ["A", "B", "C"].iter().enumerate() {
            for hour in 0..24 {
                for _ in 0..((hour * (i + 1)) % 7 + 1) {
                    incidents.push(incident(nbh, &format!("2020-05-01 {:02}:00", hour)));
                }
            }
        }
        let table = time_of_day_summary(&incidents);
        for nbh in ["A", "B", "C"] {
            let sum: f64 = table.rows_for(nbh).iter().map(|r| r.fraction).sum();
            assert!((sum - 1.0).abs() < 1e-9, "{nbh} sums to {sum}");
        }
    }

    #[test]
    fn midnight_and_late_night_hours() {
        let incidents = vec![
            incident("A", "2020-01-05 00:00"),
            incident("A", "2020-01-05 23:59"),
        ];
        let table = time_of_day_summary(&incidents);
        let hours: Vec<u32> = table.rows().iter().map(|r| r.hour).collect();
        assert_eq!(hours, vec![0, 23]);
    }

    #[test]
    fn no_incidents_no_rows() {
        assert!(time_of_day_summary(&[]).is_empty());
    }
}
