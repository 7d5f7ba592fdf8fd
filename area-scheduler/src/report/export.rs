use std::fs;
use std::path::{Path, PathBuf};

use csv::WriterBuilder;
use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::schedule::{overloads, Conflict, JobAllocation, RosterPlan, UtilizationRow};

pub const UTILIZATION_FILE: &str = "ResumenHorario.csv";
pub const OVERLOADS_FILE: &str = "Sobrecargas.csv";
pub const ASSIGNMENT_FILE: &str = "Assignment.csv";
pub const JOB_RESULTS_FILE: &str = "JobsResult.csv";
pub const REMAINING_FILE: &str = "CapacityRemaining.csv";
pub const SCHEDULE_FILE: &str = "Schedule.csv";
pub const CONFLICTS_FILE: &str = "Conflicts.csv";

/// Files written by one export call, in write order
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReportFiles {
    pub written: Vec<PathBuf>,
}

impl ReportFiles {
    fn write<T: Serialize>(&mut self, dir: &Path, name: &str, rows: &[T], delimiter: u8) -> Result<()> {
        let path = dir.join(name);
        write_table(&path, rows, delimiter)?;
        self.written.push(path);
        Ok(())
    }
}

/// Writes serializable rows as a delimited table with a header row.
///
/// Headers come from the first row, so an empty slice yields an empty file.
pub fn write_table<T: Serialize>(path: &Path, rows: &[T], delimiter: u8) -> Result<()> {
    let mut wtr = WriterBuilder::new().delimiter(delimiter).from_path(path)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Utilization matrix and its overload subset, plus the job tables when a
/// job list was allocated.
pub fn write_capacity_reports(
    dir: &Path,
    matrix: &[UtilizationRow],
    allocation: Option<&JobAllocation>,
    delimiter: u8,
) -> Result<ReportFiles> {
    fs::create_dir_all(dir)?;
    let mut files = ReportFiles::default();

    files.write(dir, UTILIZATION_FILE, matrix, delimiter)?;
    files.write(dir, OVERLOADS_FILE, &overloads(matrix), delimiter)?;

    if let Some(allocation) = allocation {
        files.write(dir, ASSIGNMENT_FILE, &allocation.assignments, delimiter)?;
        files.write(dir, JOB_RESULTS_FILE, &allocation.results, delimiter)?;
        files.write(dir, REMAINING_FILE, &allocation.remaining, delimiter)?;
    }

    info!(dir = %dir.display(), files = files.written.len(), "capacity reports written");
    Ok(files)
}

pub fn write_roster_reports(dir: &Path, plan: &RosterPlan, conflicts: &[Conflict], delimiter: u8) -> Result<ReportFiles> {
    fs::create_dir_all(dir)?;
    let mut files = ReportFiles::default();

    files.write(dir, SCHEDULE_FILE, &plan.entries, delimiter)?;
    files.write(dir, CONFLICTS_FILE, conflicts, delimiter)?;

    info!(dir = %dir.display(), files = files.written.len(), "roster reports written");
    Ok(files)
}
