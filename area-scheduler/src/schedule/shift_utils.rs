use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

use crate::error::{PlannerError, Result};
use super::types::ShiftDefinition;

/// Absolute start and end of a shift that begins on `date`
pub fn shift_window(date: NaiveDate, shift: &ShiftDefinition) -> (NaiveDateTime, NaiveDateTime) {
    let midnight = date.and_time(NaiveTime::MIN);
    let start = midnight + Duration::hours(i64::from(shift.start_hour));
    let end = start + Duration::hours(i64::from(shift.duration_hours()));
    (start, end)
}

/// Counts assigned days immediately before `date`, stopping at the first gap or at `cap`.
pub fn consecutive_prior_days(assigned: &BTreeSet<NaiveDate>, date: NaiveDate, cap: u32) -> u32 {
    let mut count = 0;
    for k in 1..=cap {
        let Some(prior) = date.checked_sub_signed(Duration::days(i64::from(k))) else {
            break;
        };
        if !assigned.contains(&prior) {
            break;
        }
        count += 1;
    }
    count
}

/// Longest run of consecutive dates as (length, first, last)
pub fn longest_run(dates: &BTreeSet<NaiveDate>) -> Option<(u32, NaiveDate, NaiveDate)> {
    let mut best: Option<(u32, NaiveDate, NaiveDate)> = None;
    let mut current: Option<(u32, NaiveDate, NaiveDate)> = None;

    for &date in dates {
        current = match current {
            Some((len, first, last)) if last.succ_opt() == Some(date) => Some((len + 1, first, date)),
            _ => Some((1, date, date)),
        };
        if let Some(run) = current {
            if best.map_or(true, |(len, _, _)| run.0 > len) {
                best = Some(run);
            }
        }
    }
    best
}

/// `days` consecutive dates starting at `start`
pub fn planning_horizon(start: NaiveDate, days: u32) -> Vec<NaiveDate> {
    start.iter_days().take(days as usize).collect()
}

pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| PlannerError::InvalidDate(value.to_string()))
}

/// Maps a weekday token to a `Weekday` using its first three letters.
pub fn parse_weekday_token(token: &str) -> Option<Weekday> {
    let lower = token.trim().to_lowercase();
    let prefix: String = lower.chars().take(3).collect();
    match prefix.as_str() {
        "mon" => Some(Weekday::Mon),
        "tue" => Some(Weekday::Tue),
        "wed" => Some(Weekday::Wed),
        "thu" => Some(Weekday::Thu),
        "fri" => Some(Weekday::Fri),
        "sat" => Some(Weekday::Sat),
        "sun" => Some(Weekday::Sun),
        _ => None,
    }
}
