//! Left join of plate assignments with parsed timepoints.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::spec::{SpecBenchlingRow, SpecMergedRow, SpecPlateAssignmentRow, SpecTimepointRecord};

/// Join key: `(plate, destination_well, reactor)`.
type TupJoinKey<'a> = (&'a str, &'a str, &'a str);

/// Left outer join on plate, destination well and reactor.
///
/// Every assignment row is kept; each matching record yields one output row,
/// so a repeated log entry repeats the assignment. The result is stably
/// sorted by reactor, then time value with missing values last.
pub fn merge_assignments_with_timepoints(
    assignments: &[SpecPlateAssignmentRow],
    timepoints: &[SpecTimepointRecord],
) -> Vec<SpecMergedRow> {
    let mut dict_records: BTreeMap<TupJoinKey<'_>, Vec<&SpecTimepointRecord>> = BTreeMap::new();
    for record in timepoints {
        dict_records
            .entry((
                record.plate.as_str(),
                record.destination_well.as_str(),
                record.reactor.as_str(),
            ))
            .or_default()
            .push(record);
    }

    let mut l_merged = Vec::with_capacity(assignments.len());
    let mut n_unmatched = 0usize;
    for row in assignments {
        let key = (
            row.plate.as_str(),
            row.destination_well.as_str(),
            row.reactor.as_str(),
        );
        match dict_records.get(&key) {
            Some(l_matches) => {
                l_merged.extend(l_matches.iter().map(|record| SpecMergedRow {
                    assignment: row.clone(),
                    timepoint: Some((*record).clone()),
                }));
            }
            None => {
                n_unmatched += 1;
                l_merged.push(SpecMergedRow {
                    assignment: row.clone(),
                    timepoint: None,
                });
            }
        }
    }

    l_merged.sort_by(compare_merged_rows);
    tracing::debug!(
        n_assignments = assignments.len(),
        n_timepoints = timepoints.len(),
        n_rows = l_merged.len(),
        n_unmatched,
        "assignments merged"
    );
    l_merged
}

fn compare_merged_rows(left: &SpecMergedRow, right: &SpecMergedRow) -> Ordering {
    left.assignment
        .reactor
        .cmp(&right.assignment.reactor)
        .then_with(|| match (left.time_value(), right.time_value()) {
            (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
}

/// Rows with a time value, numbered from 1.
pub fn derive_benchling_rows(merged: &[SpecMergedRow]) -> Vec<SpecBenchlingRow> {
    merged
        .iter()
        .filter(|row| row.time_value().is_some())
        .enumerate()
        .map(|(n_idx, row)| SpecBenchlingRow {
            counter: n_idx + 1,
            merged: row.clone(),
        })
        .collect()
}
