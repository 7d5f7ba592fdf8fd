//! Post-hoc checks for any schedule, generated or hand edited.
//!
//! Detects, per worker:
//! - dates whose total hours exceed the daily cap
//! - dates with more than one entry (double shift)
//! - a longest consecutive-date run above the cap

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::shift_utils::longest_run;
use super::types::ScheduleEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConflictKind {
    DailyHoursExceeded,
    DoubleShift,
    ConsecutiveDaysExceeded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Conflict {
    pub kind: ConflictKind,
    pub worker: String,
    /// Offending date, or first date of the offending run.
    pub date: NaiveDate,
    pub value: f64,
    pub limit: f64,
    pub message: String,
}

#[derive(Default)]
struct DayTotals {
    hours: f64,
    entries: u32,
}

/// Validates entries against the daily-hours and consecutive-day limits.
///
/// Entries without a worker are ignored. Conflicts are ordered by worker,
/// then date.
pub fn validate_schedule(entries: &[ScheduleEntry], max_hours_per_day: f64, max_consecutive_days: u32) -> Vec<Conflict> {
    let mut per_worker: BTreeMap<&str, BTreeMap<NaiveDate, DayTotals>> = BTreeMap::new();
    for entry in entries {
        let Some(worker) = entry.worker.as_deref().map(str::trim).filter(|w| !w.is_empty()) else {
            continue;
        };
        let day = per_worker.entry(worker).or_default().entry(entry.date).or_default();
        day.hours += entry.hours;
        day.entries += 1;
    }

    let mut conflicts = Vec::new();
    for (worker, days) in &per_worker {
        for (date, totals) in days {
            if totals.hours > max_hours_per_day {
                conflicts.push(Conflict {
                    kind: ConflictKind::DailyHoursExceeded,
                    worker: worker.to_string(),
                    date: *date,
                    value: totals.hours,
                    limit: max_hours_per_day,
                    message: format!("{} works {} h on {} (max {})", worker, totals.hours, date, max_hours_per_day),
                });
            }
            if totals.entries > 1 {
                conflicts.push(Conflict {
                    kind: ConflictKind::DoubleShift,
                    worker: worker.to_string(),
                    date: *date,
                    value: f64::from(totals.entries),
                    limit: 1.0,
                    message: format!("{} has {} shifts on {}", worker, totals.entries, date),
                });
            }
        }

        let dates: BTreeSet<NaiveDate> = days.keys().copied().collect();
        if let Some((len, first, last)) = longest_run(&dates) {
            if len > max_consecutive_days {
                conflicts.push(Conflict {
                    kind: ConflictKind::ConsecutiveDaysExceeded,
                    worker: worker.to_string(),
                    date: first,
                    value: f64::from(len),
                    limit: f64::from(max_consecutive_days),
                    message: format!(
                        "{} works {} consecutive days from {} to {} (max {})",
                        worker, len, first, last, max_consecutive_days
                    ),
                });
            }
        }
    }
    conflicts
}
