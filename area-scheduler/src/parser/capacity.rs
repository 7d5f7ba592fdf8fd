use std::collections::HashSet;
use std::fs;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::{debug, info};

use crate::error::Result;
use crate::schedule::{CapacityRecord, DemandRecord};
use super::cells::{clean_number, decode_text, parse_hour_label};

/// Area codes that open a block in a capacity table
#[derive(Debug, Clone, PartialEq)]
pub struct AreaCatalog {
    codes: HashSet<String>,
}

impl AreaCatalog {
    pub fn new<'a>(codes: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            codes: codes.into_iter().map(|c| c.trim().to_lowercase()).collect(),
        }
    }

    /// Case-insensitive membership
    pub fn contains(&self, cell: &str) -> bool {
        self.codes.contains(&cell.trim().to_lowercase())
    }
}

/// Capacity and already-claimed demand read from one table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CapacityTable {
    pub capacities: Vec<CapacityRecord>,
    pub demands: Vec<DemandRecord>,
}

#[derive(Clone, Copy)]
enum DetailRow {
    Capacity,
    Demand,
}

fn classify_detail(first_cell: &str) -> Option<DetailRow> {
    let label = first_cell.trim().to_lowercase();
    if label.contains("capacidad job") || (label.starts_with("capacidad") && label.contains("job")) {
        Some(DetailRow::Demand)
    } else if label.starts_with("capacidad") {
        Some(DetailRow::Capacity)
    } else {
        None
    }
}

/// Splits delimited text into trimmed string cells.
///
/// Rows may have any number of cells. Fails only when the text cannot be
/// read as a row table at all.
pub fn read_rows(text: &str, delimiter: u8) -> Result<Vec<Vec<String>>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(|c| c.trim().to_string()).collect());
    }
    Ok(rows)
}

/// Builds normalized capacity and demand records from a row grid.
///
/// A row whose first cell is a known area opens a block; its cells from index
/// 2 on are hour labels. Following rows up to the next area row are detail
/// rows: "capacidad ..." rows give capacity, "capacidad job ..." rows give
/// demand, anything else is skipped. Values align positionally with the
/// parsed hours and default to 0.0 when missing or unreadable.
pub fn build_capacity_matrix(rows: &[Vec<String>], areas: &AreaCatalog) -> CapacityTable {
    let mut table = CapacityTable::default();
    let mut block: Option<(String, Vec<i32>)> = None;

    for row in rows {
        let Some(first) = row.first() else {
            continue;
        };

        if areas.contains(first) {
            let area = first.trim().to_string();
            let hours: Vec<i32> = row.iter().skip(2).filter_map(|c| parse_hour_label(c)).collect();
            debug!(area = %area, hours = hours.len(), "area block");
            block = Some((area, hours));
            continue;
        }

        let Some((area, hours)) = &block else {
            continue;
        };
        let Some(kind) = classify_detail(first) else {
            continue;
        };

        let mut values = row.iter().skip(2).map(|c| clean_number(c));
        for &hour in hours {
            let value = values.next().unwrap_or(0.0);
            match kind {
                DetailRow::Capacity => table.capacities.push(CapacityRecord {
                    area: area.clone(),
                    day: String::new(),
                    hour,
                    capacity: value,
                }),
                DetailRow::Demand => table.demands.push(DemandRecord {
                    area: area.clone(),
                    day: String::new(),
                    hour,
                    capacity_job: value,
                }),
            }
        }
    }

    info!(
        capacities = table.capacities.len(),
        demands = table.demands.len(),
        "capacity table parsed"
    );
    table
}

/// Parses raw uploaded bytes of a delimited capacity table
pub fn parse_capacity_bytes(bytes: &[u8], delimiter: u8, areas: &AreaCatalog) -> Result<CapacityTable> {
    let rows = read_rows(&decode_text(bytes), delimiter)?;
    Ok(build_capacity_matrix(&rows, areas))
}

pub fn load_capacity_table<P: AsRef<Path>>(path: P, delimiter: u8, areas: &AreaCatalog) -> Result<CapacityTable> {
    let bytes = fs::read(path)?;
    parse_capacity_bytes(&bytes, delimiter, areas)
}
