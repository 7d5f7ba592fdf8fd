use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::schedule::{ScheduleEntry, SeatDemand, ShiftDefinition, Worker};

/// Seats a single (shift, area) row may ask for on one date
pub const MAX_SEATS_PER_SHIFT: u32 = 1_000;

/// Roster run requested over HTTP
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterRequest {
    pub workers: Vec<Worker>,
    pub demand: Vec<SeatDemand>,
    pub start: NaiveDate,
    pub days: u32,
    /// Overrides the configured shift definitions.
    #[serde(default)]
    pub shifts: Option<Vec<ShiftDefinition>>,
}

/// Schedule to check; limits default to the configured ones
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateRequest {
    pub entries: Vec<ScheduleEntry>,
    #[serde(default)]
    pub max_hours_per_day: Option<f64>,
    #[serde(default)]
    pub max_consecutive_days: Option<u32>,
}

/// Rejects requests the allocator would silently turn into an empty roster.
/// Unknown shift ids are left to the allocator, which reports them by name.
pub fn validate_roster_request(req: &RosterRequest) -> Result<(), String> {
    if req.days == 0 {
        return Err("Planning horizon must cover at least one day".to_string());
    }
    if req.days > 366 {
        return Err(format!("Planning horizon of {} days is longer than a year", req.days));
    }

    if req.workers.is_empty() {
        return Err("At least one worker is required".to_string());
    }
    for worker in &req.workers {
        if worker.name.trim().is_empty() {
            return Err("Worker name is required".to_string());
        }
        if !worker.contract_hours.is_finite() || worker.contract_hours < 0.0 {
            return Err(format!("Invalid contract hours for {}: {}", worker.name, worker.contract_hours));
        }
    }

    if req.demand.is_empty() {
        return Err("Seat demand is empty".to_string());
    }
    for seat in &req.demand {
        if seat.area.trim().is_empty() || seat.shift_id.trim().is_empty() {
            return Err("Seat demand rows need both a shift and an area".to_string());
        }
        if seat.needed > MAX_SEATS_PER_SHIFT {
            return Err(format!(
                "Seat demand for {} / {} asks for {} seats (max {})",
                seat.shift_id, seat.area, seat.needed, MAX_SEATS_PER_SHIFT
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn request() -> RosterRequest {
        RosterRequest {
            workers: vec![Worker {
                name: "Ana".into(),
                areas: vec!["hc".into()],
                contract_hours: 40.0,
                availability: vec![Weekday::Mon],
            }],
            demand: vec![SeatDemand {
                shift_id: "M".into(),
                area: "hc".into(),
                needed: 1,
            }],
            start: NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
            days: 7,
            shifts: None,
        }
    }

    #[test]
    fn test_valid_request() {
        assert!(validate_roster_request(&request()).is_ok());
    }

    #[test]
    fn test_rejects_empty_horizon_and_roster() {
        let mut req = request();
        req.days = 0;
        assert!(validate_roster_request(&req).is_err());

        let mut req = request();
        req.workers.clear();
        assert_eq!(validate_roster_request(&req).unwrap_err(), "At least one worker is required");
    }

    #[test]
    fn test_rejects_oversized_seat_demand() {
        let mut req = request();
        req.demand[0].needed = 4_000_000_000;
        assert!(validate_roster_request(&req).unwrap_err().contains("4000000000 seats"));

        req.demand[0].needed = MAX_SEATS_PER_SHIFT;
        assert!(validate_roster_request(&req).is_ok());
    }

    #[test]
    fn test_rejects_negative_contract() {
        let mut req = request();
        req.workers[0].contract_hours = -1.0;
        assert!(validate_roster_request(&req).unwrap_err().contains("Ana"));
    }

    #[test]
    fn test_request_from_json() {
        let json = r#"{
            "workers": [{"name": "Ana", "contract_hours": 40, "availability": ["Mon", "Tue"]}],
            "demand": [{"shift_id": "N", "area": "surf", "needed": 2}],
            "start": "2025-01-06",
            "days": 3
        }"#;
        let req: RosterRequest = serde_json::from_str(json).unwrap();
        assert!(req.workers[0].areas.is_empty());
        assert_eq!(req.workers[0].availability, vec![Weekday::Mon, Weekday::Tue]);
        assert!(req.shifts.is_none());
    }
}
