use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::error::Result;
use crate::schedule::shift_utils::parse_weekday_token;
use crate::schedule::{ScheduleEntry, SeatDemand, Worker};
use super::cells::{clean_number, decode_text, split_multi};
use super::columns::{cell, table_reader, Columns};

/// Reads the worker roster.
///
/// Columns: name, areas, contracthours, availability. Rows without a name are
/// skipped. A repeated name replaces the earlier row but keeps its position.
pub fn read_workers(text: &str, delimiter: u8) -> Result<Vec<Worker>> {
    let mut reader = table_reader(text, delimiter);
    let columns = Columns::from_headers(reader.headers()?);

    let name_col = columns.require("name")?;
    let areas_col = columns.require("areas")?;
    let contract_col = columns.require("contracthours")?;
    let availability_col = columns.require("availability")?;

    let mut workers: Vec<Worker> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for result in reader.records() {
        let record = result?;
        let name = cell(&record, Some(name_col));
        if name.is_empty() {
            warn!(line = record.position().map(|p| p.line()), "roster row without a name skipped");
            continue;
        }

        let mut availability = Vec::new();
        for token in split_multi(cell(&record, Some(availability_col))) {
            match parse_weekday_token(&token) {
                Some(day) if !availability.contains(&day) => availability.push(day),
                Some(_) => {}
                None => warn!(worker = name, token = %token, "unknown weekday token ignored"),
            }
        }

        let worker = Worker {
            name: name.to_string(),
            areas: split_multi(cell(&record, Some(areas_col))),
            contract_hours: clean_number(cell(&record, Some(contract_col))),
            availability,
        };

        match positions.get(name) {
            Some(&pos) => workers[pos] = worker,
            None => {
                positions.insert(worker.name.clone(), workers.len());
                workers.push(worker);
            }
        }
    }

    info!(workers = workers.len(), "roster parsed");
    Ok(workers)
}

/// Reads seats needed per (shift, area) and day.
///
/// Columns: shift, area, needed. A repeated pair replaces the earlier row
/// but keeps its position.
pub fn read_seat_demand(text: &str, delimiter: u8) -> Result<Vec<SeatDemand>> {
    let mut reader = table_reader(text, delimiter);
    let columns = Columns::from_headers(reader.headers()?);

    let shift_col = columns.require("shift")?;
    let area_col = columns.require("area")?;
    let needed_col = columns.require("needed")?;

    let mut demand: Vec<SeatDemand> = Vec::new();
    for result in reader.records() {
        let record = result?;
        let shift_id = cell(&record, Some(shift_col)).to_string();
        let area = cell(&record, Some(area_col)).to_string();
        if shift_id.is_empty() || area.is_empty() {
            continue;
        }
        let needed = clean_number(cell(&record, Some(needed_col))).max(0.0) as u32;

        let row = SeatDemand { shift_id, area, needed };
        match demand.iter().position(|d| d.shift_id == row.shift_id && d.area == row.area) {
            Some(pos) => demand[pos] = row,
            None => demand.push(row),
        }
    }
    Ok(demand)
}

/// Reads a schedule table as written by the report exporter, possibly edited by hand.
pub fn read_schedule(text: &str, delimiter: u8) -> Result<Vec<ScheduleEntry>> {
    let mut reader = table_reader(text, delimiter);
    let mut entries = Vec::new();
    for result in reader.deserialize() {
        let entry: ScheduleEntry = result?;
        entries.push(entry);
    }
    Ok(entries)
}

pub fn load_workers<P: AsRef<Path>>(path: P, delimiter: u8) -> Result<Vec<Worker>> {
    read_workers(&decode_text(&fs::read(path)?), delimiter)
}

pub fn load_seat_demand<P: AsRef<Path>>(path: P, delimiter: u8) -> Result<Vec<SeatDemand>> {
    read_seat_demand(&decode_text(&fs::read(path)?), delimiter)
}

pub fn load_schedule<P: AsRef<Path>>(path: P, delimiter: u8) -> Result<Vec<ScheduleEntry>> {
    read_schedule(&decode_text(&fs::read(path)?), delimiter)
}
