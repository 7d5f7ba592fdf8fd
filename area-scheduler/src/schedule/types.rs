use chrono::{NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};

/// Hourly capacity declared for an area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CapacityRecord {
    pub area: String,
    pub day: String,
    pub hour: i32,
    pub capacity: f64,
}

/// Capacity already claimed by jobs before allocation runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DemandRecord {
    pub area: String,
    pub day: String,
    pub hour: i32,
    pub capacity_job: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UtilizationStatus {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "OVERLOAD")]
    Overload,
}

/// One (area, day, hour) cell of the utilization matrix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UtilizationRow {
    pub area: String,
    pub day: String,
    pub hour: i32,
    pub capacity: f64,
    pub capacity_job: f64,
    pub difference: f64,
    pub status: UtilizationStatus,
}

impl UtilizationRow {
    pub fn new(area: String, day: String, hour: i32, capacity: f64, capacity_job: f64) -> Self {
        let difference = capacity - capacity_job;
        let status = if difference < 0.0 {
            UtilizationStatus::Overload
        } else {
            UtilizationStatus::Ok
        };
        Self {
            area,
            day,
            hour,
            capacity,
            capacity_job,
            difference,
            status,
        }
    }

    pub fn is_overloaded(&self) -> bool {
        self.status == UtilizationStatus::Overload
    }
}

/// A request for capacity over a contiguous block of hours in one area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Job {
    #[serde(rename = "JobID")]
    pub id: String,
    pub area: String,
    pub day: String,
    pub start_hour: i32,
    pub duration: i32,
    pub quantity: f64,
}

impl Job {
    /// Hours occupied by the job, ascending. Empty when duration < 1;
    /// stops early rather than overflow `i32`.
    pub fn hours(&self) -> impl Iterator<Item = i32> {
        let start = self.start_hour;
        (0..self.duration.max(0)).map_while(move |k| start.checked_add(k))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Assignment {
    #[serde(rename = "JobID")]
    pub job_id: String,
    pub area: String,
    pub day: String,
    pub hour: i32,
    pub assigned_quantity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    Assigned,
    Partial,
    Unassigned,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct JobResult {
    #[serde(rename = "JobID")]
    pub job_id: String,
    pub area: String,
    pub day: String,
    pub start_hour: i32,
    pub duration: i32,
    pub requested_quantity: f64,
    pub assigned_total: f64,
    pub status: JobStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CapacityRemaining {
    pub area: String,
    pub hour: i32,
    pub capacity_remaining: f64,
}

/// A fixed clock interval; `end_hour <= start_hour` means the shift crosses midnight.
///
/// Serialized keys are PascalCase like every record; snake_case keys are
/// accepted on input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ShiftDefinition {
    #[serde(alias = "id")]
    pub id: String,
    #[serde(alias = "start_hour")]
    pub start_hour: u32,
    #[serde(alias = "end_hour")]
    pub end_hour: u32,
}

impl ShiftDefinition {
    pub fn new(id: &str, start_hour: u32, end_hour: u32) -> Self {
        Self {
            id: id.to_string(),
            start_hour,
            end_hour,
        }
    }

    pub fn crosses_midnight(&self) -> bool {
        self.end_hour <= self.start_hour
    }

    pub fn duration_hours(&self) -> u32 {
        if self.crosses_midnight() {
            24 - self.start_hour + self.end_hour
        } else {
            self.end_hour - self.start_hour
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.start_hour > 23 || self.end_hour > 24 {
            return Err(PlannerError::InvalidShift {
                id: self.id.clone(),
                start_hour: self.start_hour,
                end_hour: self.end_hour,
            });
        }
        Ok(())
    }
}

/// Seats needed for a (shift, area) pair on every date of the horizon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SeatDemand {
    #[serde(alias = "shift_id")]
    pub shift_id: String,
    #[serde(alias = "area")]
    pub area: String,
    #[serde(alias = "needed")]
    pub needed: u32,
}

/// A schedulable person. Run counters live in the allocator, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Worker {
    #[serde(alias = "name")]
    pub name: String,
    /// Empty means qualified for every area.
    #[serde(default, alias = "areas")]
    pub areas: Vec<String>,
    #[serde(alias = "contract_hours")]
    pub contract_hours: f64,
    #[serde(alias = "availability")]
    pub availability: Vec<Weekday>,
}

impl Worker {
    pub fn qualifies_for(&self, area: &str) -> bool {
        self.areas.is_empty() || self.areas.iter().any(|a| a.eq_ignore_ascii_case(area))
    }

    pub fn available_on(&self, weekday: Weekday) -> bool {
        self.availability.contains(&weekday)
    }
}

/// One seat of one shift on one date, filled or not
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScheduleEntry {
    pub date: NaiveDate,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub area: String,
    pub shift_id: String,
    #[serde(default)]
    pub seat: u32,
    pub worker: Option<String>,
    pub hours: f64,
    #[serde(default)]
    pub relaxed: bool,
}

impl ScheduleEntry {
    pub fn is_filled(&self) -> bool {
        self.worker.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utilization_status() {
        let ok = UtilizationRow::new("bodega".into(), "".into(), 6, 10.0, 10.0);
        assert_eq!(ok.difference, 0.0);
        assert_eq!(ok.status, UtilizationStatus::Ok);

        let over = UtilizationRow::new("bodega".into(), "".into(), 8, 10.0, 12.0);
        assert_eq!(over.difference, -2.0);
        assert!(over.is_overloaded());
    }

    #[test]
    fn test_job_hours() {
        let job = Job {
            id: "J1".into(),
            area: "surf".into(),
            day: "".into(),
            start_hour: 22,
            duration: 3,
            quantity: 1.0,
        };
        // No wraparound past midnight
        assert_eq!(job.hours().collect::<Vec<_>>(), vec![22, 23, 24]);

        let near_max = Job {
            start_hour: i32::MAX - 1,
            duration: 5,
            ..job.clone()
        };
        assert_eq!(near_max.hours().collect::<Vec<_>>(), vec![i32::MAX - 1, i32::MAX]);

        let empty = Job { duration: 0, ..job };
        assert_eq!(empty.hours().count(), 0);
    }

    #[test]
    fn test_shift_duration() {
        assert_eq!(ShiftDefinition::new("M", 6, 14).duration_hours(), 8);
        assert_eq!(ShiftDefinition::new("N", 22, 6).duration_hours(), 8);
        assert_eq!(ShiftDefinition::new("D", 8, 8).duration_hours(), 24);
        assert!(ShiftDefinition::new("X", 24, 2).validate().is_err());
    }

    #[test]
    fn test_roster_inputs_share_record_casing() {
        let worker = Worker {
            name: "Ana".into(),
            areas: vec!["hc".into()],
            contract_hours: 40.0,
            availability: vec![Weekday::Mon],
        };
        let json = serde_json::to_value(&worker).unwrap();
        assert_eq!(json["ContractHours"], 40.0);
        assert!(json.get("contract_hours").is_none());
        assert_eq!(serde_json::from_value::<Worker>(json).unwrap(), worker);

        let legacy: Worker =
            serde_json::from_str(r#"{"name": "Ana", "areas": ["hc"], "contract_hours": 40, "availability": ["Mon"]}"#)
                .unwrap();
        assert_eq!(legacy, worker);

        let seat: SeatDemand = serde_json::from_str(r#"{"ShiftId": "M", "Area": "hc", "Needed": 2}"#).unwrap();
        assert_eq!(serde_json::to_value(&seat).unwrap()["ShiftId"], "M");

        let shift: ShiftDefinition = serde_json::from_str(r#"{"id": "N", "start_hour": 22, "end_hour": 6}"#).unwrap();
        assert_eq!(serde_json::to_value(&shift).unwrap()["StartHour"], 22);
    }

    #[test]
    fn test_worker_qualification() {
        let anyone = Worker {
            name: "Ana".into(),
            areas: vec![],
            contract_hours: 40.0,
            availability: vec![Weekday::Mon],
        };
        assert!(anyone.qualifies_for("montaje"));

        let specialist = Worker {
            areas: vec!["HC".into()],
            ..anyone
        };
        assert!(specialist.qualifies_for("hc"));
        assert!(!specialist.qualifies_for("surf"));
        assert!(specialist.available_on(Weekday::Mon));
        assert!(!specialist.available_on(Weekday::Tue));
    }
}
