//! Greedy shift roster allocation.
//!
//! Seats are filled date by date, then in seat-demand order, then seat by
//! seat. Each seat goes to the best candidate of a strict pass; when the
//! strict pass finds nobody an optional relaxation pass is tried, and a seat
//! that still has no candidate is emitted unfilled.
//!
//! Candidate ranking is (tier, assigned hours, roster position):
//! - tier 0: strict pass, stays within contract hours
//! - tier 1: strict pass, exceeds contract hours
//! - tier 2: relaxation pass

use std::collections::{BTreeSet, HashMap};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{PlannerError, Result};
use super::shift_utils::{consecutive_prior_days, shift_window};
use super::types::{ScheduleEntry, SeatDemand, ShiftDefinition, Worker};

/// Constraints applied by the roster allocator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    pub max_hours_per_day: f64,
    pub max_consecutive_days: u32,
    pub relax_when_unfilled: bool,
    pub relaxed_pass_keeps_area: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    Strict,
    Relaxed,
}

/// Per-run counters for one worker
#[derive(Debug, Clone, Default)]
struct WorkerLedger {
    assigned_hours: f64,
    assigned_dates: BTreeSet<NaiveDate>,
    daily_hours: HashMap<NaiveDate, f64>,
    shifts: u32,
}

impl WorkerLedger {
    fn hours_on(&self, date: NaiveDate) -> f64 {
        self.daily_hours.get(&date).copied().unwrap_or(0.0)
    }

    fn record(&mut self, date: NaiveDate, hours: f64) {
        self.assigned_hours += hours;
        *self.daily_hours.entry(date).or_insert(0.0) += hours;
        self.assigned_dates.insert(date);
        self.shifts += 1;
    }
}

/// Hours a worker ended the run with
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WorkerLoad {
    pub name: String,
    pub contract_hours: f64,
    pub assigned_hours: f64,
    pub shifts: u32,
}

/// Output of one roster run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RosterPlan {
    pub entries: Vec<ScheduleEntry>,
    pub loads: Vec<WorkerLoad>,
}

impl RosterPlan {
    pub fn unfilled(&self) -> usize {
        self.entries.iter().filter(|e| !e.is_filled()).count()
    }
}

struct Seat<'a> {
    date: NaiveDate,
    area: &'a str,
    hours: f64,
}

/// Runs one roster allocation on fresh counters.
///
/// Fails only when seat demand names an undefined or invalid shift; that
/// check happens before any seat is filled.
pub fn generate_roster(
    workers: &[Worker],
    shifts: &[ShiftDefinition],
    demand: &[SeatDemand],
    dates: &[NaiveDate],
    rules: &RuleSet,
) -> Result<RosterPlan> {
    let mut resolved = Vec::with_capacity(demand.len());
    for seat_demand in demand {
        let shift = shifts
            .iter()
            .find(|s| s.id == seat_demand.shift_id)
            .ok_or_else(|| PlannerError::UnknownShift(seat_demand.shift_id.clone()))?;
        shift.validate()?;
        resolved.push((seat_demand, shift));
    }

    let mut calendar: Vec<NaiveDate> = dates.to_vec();
    calendar.sort();
    calendar.dedup();

    let mut ledgers = vec![WorkerLedger::default(); workers.len()];
    let mut entries = Vec::new();

    for &date in &calendar {
        for (seat_demand, shift) in &resolved {
            let (start, end) = shift_window(date, shift);
            let hours = f64::from(shift.duration_hours());
            let seat = Seat {
                date,
                area: &seat_demand.area,
                hours,
            };

            for seat_no in 1..=seat_demand.needed {
                let mut pick = pick_candidate(workers, &ledgers, &seat, rules, Pass::Strict);
                if pick.is_none() && rules.relax_when_unfilled {
                    pick = pick_candidate(workers, &ledgers, &seat, rules, Pass::Relaxed);
                }

                let (worker, relaxed) = match pick {
                    Some((idx, tier)) => {
                        ledgers[idx].record(date, hours);
                        (Some(workers[idx].name.clone()), tier == 2)
                    }
                    None => {
                        debug!(%date, shift = %shift.id, area = %seat_demand.area, seat = seat_no, "seat left unfilled");
                        (None, false)
                    }
                };

                entries.push(ScheduleEntry {
                    date,
                    start,
                    end,
                    area: seat_demand.area.clone(),
                    shift_id: shift.id.clone(),
                    seat: seat_no,
                    worker,
                    hours,
                    relaxed,
                });
            }
        }
    }

    let loads = workers
        .iter()
        .zip(&ledgers)
        .map(|(w, l)| WorkerLoad {
            name: w.name.clone(),
            contract_hours: w.contract_hours,
            assigned_hours: l.assigned_hours,
            shifts: l.shifts,
        })
        .collect();

    let plan = RosterPlan { entries, loads };
    info!(
        seats = plan.entries.len(),
        unfilled = plan.unfilled(),
        relaxed = plan.entries.iter().filter(|e| e.relaxed).count(),
        "roster generated"
    );
    Ok(plan)
}

/// Index and tier of the best eligible worker for this pass
fn pick_candidate(
    workers: &[Worker],
    ledgers: &[WorkerLedger],
    seat: &Seat,
    rules: &RuleSet,
    pass: Pass,
) -> Option<(usize, u8)> {
    let weekday = seat.date.weekday();
    let mut best: Option<(usize, u8, f64)> = None;

    for (idx, (worker, ledger)) in workers.iter().zip(ledgers).enumerate() {
        let check_area = pass == Pass::Strict || rules.relaxed_pass_keeps_area;
        if check_area && !worker.qualifies_for(seat.area) {
            continue;
        }
        if !worker.available_on(weekday) {
            continue;
        }
        if ledger.assigned_dates.contains(&seat.date) {
            continue;
        }
        if ledger.hours_on(seat.date) + seat.hours > rules.max_hours_per_day {
            continue;
        }

        let tier = match pass {
            Pass::Strict => {
                let run = consecutive_prior_days(&ledger.assigned_dates, seat.date, rules.max_consecutive_days);
                if run >= rules.max_consecutive_days {
                    continue;
                }
                if ledger.assigned_hours + seat.hours <= worker.contract_hours {
                    0
                } else {
                    1
                }
            }
            Pass::Relaxed => 2,
        };

        let better = match best {
            None => true,
            Some((_, best_tier, best_hours)) => {
                tier < best_tier || (tier == best_tier && ledger.assigned_hours < best_hours)
            }
        };
        if better {
            best = Some((idx, tier, ledger.assigned_hours));
        }
    }

    best.map(|(idx, tier, _)| (idx, tier))
}
