use std::collections::BTreeMap;

use super::types::{CapacityRecord, DemandRecord, UtilizationRow};

/// Joins capacity and demand into the utilization matrix.
///
/// Full outer join on (area, day, hour). A key missing on either side counts
/// as 0.0. Repeated keys within one input keep the last value seen. The
/// output is sorted by area and day (lexicographic) then hour (numeric).
pub fn aggregate_to_matrix(capacities: &[CapacityRecord], demands: &[DemandRecord]) -> Vec<UtilizationRow> {
    let mut joined: BTreeMap<(String, String, i32), (f64, f64)> = BTreeMap::new();

    for rec in capacities {
        let key = (rec.area.clone(), rec.day.clone(), rec.hour);
        joined.entry(key).or_insert((0.0, 0.0)).0 = rec.capacity;
    }
    for rec in demands {
        let key = (rec.area.clone(), rec.day.clone(), rec.hour);
        joined.entry(key).or_insert((0.0, 0.0)).1 = rec.capacity_job;
    }

    joined
        .into_iter()
        .map(|((area, day, hour), (capacity, capacity_job))| {
            UtilizationRow::new(area, day, hour, capacity, capacity_job)
        })
        .collect()
}

/// Rows whose difference is negative
pub fn overloads(matrix: &[UtilizationRow]) -> Vec<UtilizationRow> {
    matrix.iter().filter(|r| r.is_overloaded()).cloned().collect()
}
