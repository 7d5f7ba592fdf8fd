use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::error::Result;
use crate::schedule::Job;
use super::cells::decode_text;
use super::columns::{cell, table_reader, Columns};

fn parse_or<T: std::str::FromStr>(value: &str, default: T, field: &str, line: u64) -> T {
    if value.is_empty() {
        return default;
    }
    match value.parse::<T>() {
        Ok(v) => v,
        Err(_) => {
            warn!(line, field, value, "unreadable job cell, using default");
            default
        }
    }
}

/// Largest magnitude accepted in the start hour and duration columns.
/// Hour labels such as "07:00" read as 700.
pub const HOUR_CELL_LIMIT: i32 = 10_000;

/// Integer column written as a number, e.g. "6" or "6.0"
fn parse_whole(value: &str, default: i32, field: &str, line: u64) -> i32 {
    let parsed: f64 = parse_or(value, f64::from(default), field, line);
    if !parsed.is_finite() || parsed.abs() > f64::from(HOUR_CELL_LIMIT) {
        warn!(line, field, value, "job cell out of range, using default");
        return default;
    }
    parsed.trunc() as i32
}

fn parse_quantity(value: &str, line: u64) -> f64 {
    let parsed: f64 = parse_or(value, 0.0, "quantity", line);
    if parsed.is_finite() {
        parsed
    } else {
        warn!(line, value, "non-finite quantity, using default");
        0.0
    }
}

/// Reads a job list with a header row.
///
/// Required columns: area, starthour, duration, quantity. Optional: jobid,
/// day. Missing required columns fail before any row is read; empty or
/// unreadable cells fall back to "" / 0 / 1 / 0.0, as do start hours and
/// durations beyond `HOUR_CELL_LIMIT` and non-finite quantities.
pub fn read_jobs(text: &str, delimiter: u8) -> Result<Vec<Job>> {
    let mut reader = table_reader(text, delimiter);
    let columns = Columns::from_headers(reader.headers()?);

    let area_col = columns.require("area")?;
    let start_col = columns.require("starthour")?;
    let duration_col = columns.require("duration")?;
    let quantity_col = columns.require("quantity")?;
    let id_col = columns.optional("jobid");
    let day_col = columns.optional("day");

    let mut jobs = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        jobs.push(Job {
            id: cell(&record, id_col).to_string(),
            area: cell(&record, Some(area_col)).to_string(),
            day: cell(&record, day_col).to_string(),
            start_hour: parse_whole(cell(&record, Some(start_col)), 0, "starthour", line),
            duration: parse_whole(cell(&record, Some(duration_col)), 1, "duration", line),
            quantity: parse_quantity(cell(&record, Some(quantity_col)), line),
        });
    }

    info!(jobs = jobs.len(), "job list parsed");
    Ok(jobs)
}

pub fn load_jobs<P: AsRef<Path>>(path: P, delimiter: u8) -> Result<Vec<Job>> {
    let bytes = fs::read(path)?;
    read_jobs(&decode_text(&bytes), delimiter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlannerError;
    use crate::schedule::{assign_jobs_greedy, JobStatus, UtilizationRow};

    #[test]
    fn test_read_jobs() {
        let text = "JobID,Area,Day,StartHour,Duration,Quantity\nJ1,bodega,Mon,6,2,15\nJ2,surf,,7.0,,\n";
        let jobs = read_jobs(text, b',').unwrap();

        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].id, "J1");
        assert_eq!(jobs[0].day, "Mon");
        assert_eq!((jobs[0].start_hour, jobs[0].duration, jobs[0].quantity), (6, 2, 15.0));
        assert_eq!(jobs[1].day, "");
        assert_eq!((jobs[1].start_hour, jobs[1].duration, jobs[1].quantity), (7, 1, 0.0));
    }

    #[test]
    fn test_headers_are_case_insensitive_and_optional_columns_default() {
        let text = "AREA,starthour,DURATION,quantity\nhc,9,3,4.5\n";
        let jobs = read_jobs(text, b',').unwrap();
        assert_eq!(jobs[0].id, "");
        assert_eq!(jobs[0].day, "");
        assert_eq!(jobs[0].quantity, 4.5);
    }

    #[test]
    fn test_missing_required_column() {
        let text = "JobID,Area,StartHour,Quantity\nJ1,bodega,6,15\n";
        let err = read_jobs(text, b',').unwrap_err();
        match err {
            PlannerError::MissingColumn { column, found } => {
                assert_eq!(column, "duration");
                assert_eq!(found, vec!["JobID", "Area", "StartHour", "Quantity"]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range_cells_degrade() {
        let text = "area,starthour,duration,quantity\nbodega,9e99,2,5\nbodega,6,3e9,5\nbodega,-9e99,inf,NaN\n";
        let jobs = read_jobs(text, b',').unwrap();

        assert_eq!((jobs[0].start_hour, jobs[0].duration), (0, 2));
        assert_eq!((jobs[1].start_hour, jobs[1].duration), (6, 1));
        assert_eq!((jobs[2].start_hour, jobs[2].duration, jobs[2].quantity), (0, 1, 0.0));

        let matrix = vec![UtilizationRow::new("bodega".into(), String::new(), 0, 10.0, 0.0)];
        let allocation = assign_jobs_greedy(&matrix, &jobs);
        assert_eq!(allocation.results[0].assigned_total, 5.0);
        assert_eq!(allocation.results[1].status, JobStatus::Unassigned);
    }

    #[test]
    fn test_unreadable_cells_degrade() {
        let text = "area,starthour,duration,quantity\nar,seis,x,muchos\n";
        let jobs = read_jobs(text, b',').unwrap();
        assert_eq!((jobs[0].start_hour, jobs[0].duration, jobs[0].quantity), (0, 1, 0.0));
    }
}
