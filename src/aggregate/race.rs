use super::{NeighborhoodRow, SummaryTable};
use crate::incident::{Incident, RaceEthnicity};
use serde::Serialize;
use std::collections::BTreeMap;

/// Incident count for one neighborhood and race/ethnicity category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RaceRow {
    pub neighborhood: String,
    pub race: RaceEthnicity,
    pub count: u64,
    /// Fixed display rank of `race`, 1 through 5.
    pub order: u8,
}

impl NeighborhoodRow for RaceRow {
    fn neighborhood(&self) -> &str {
        &self.neighborhood
    }
}

/// Counts incidents per (neighborhood, category), sorted by neighborhood
/// then category rank. Records with an unrecognised category are dropped.
pub fn race_summary(incidents: &[Incident]) -> SummaryTable<RaceRow> {
    let mut counts: BTreeMap<(&str, RaceEthnicity), u64> = BTreeMap::new();
    for incident in incidents {
        if let Some(race) = incident.race {
            *counts
                .entry((incident.neighborhood.as_str(), race))
                .or_insert(0) += 1;
        }
    }

    // `RaceEthnicity` orders by rank, so map order is already the row order.
    let rows = counts
        .into_iter()
        .map(|((neighborhood, race), count)| RaceRow {
            neighborhood: neighborhood.to_string(),
            race,
            count,
            order: race.rank(),
        })
        .collect();

    SummaryTable::new(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn incident(nbh: &str, race: &str) -> Incident {
        Incident::from_raw(nbh, race, "2020-01-05 10:00").unwrap()
    }

    #[test]
    fn counts_by_category_in_rank_order() {
        let incidents = vec![
            incident("A", "Unknown"),
            incident("A", "White"),
            incident("A", "Black"),
            incident("A", "White"),
            incident("A", "Hispanic/Latino"),
        ];
        let table = race_summary(&incidents);
        let summary: Vec<(RaceEthnicity, u64, u8)> = table
            .rows()
            .iter()
            .map(|r| (r.race, r.count, r.order))
            .collect();
        assert_eq!(
            summary,
            vec![
                (RaceEthnicity::White, 2, 1),
                (RaceEthnicity::Black, 1, 2),
                (RaceEthnicity::HispanicLatino, 1, 3),
                (RaceEthnicity::Unknown, 1, 5),
            ]
        );
    }

    #[test]
    fn unrecognised_categories_are_dropped() {
        let incidents = vec![incident("A", "Other"), incident("A", "Asian"), incident("B", "")];
        let table = race_summary(&incidents);
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].race, RaceEthnicity::Asian);
        assert!(table.rows_for("B").is_empty());
    }

    #[test]
    fn sorted_by_neighborhood_then_rank() {
        let incidents = vec![
            incident("B", "White"),
            incident("A", "Asian"),
            incident("A", "White"),
        ];
        let table = race_summary(&incidents);
        let keys: Vec<(&str, u8)> = table
            .rows()
            .iter()
            .map(|r| (r.neighborhood.as_str(), r.order))
            .collect();
        assert_eq!(keys, vec![("A", 1), ("A", 4), ("B", 1)]);
    }
}
