//! Planning parameters.
//!
//! Everything the allocators read is carried in a `PlannerConfig` value that
//! callers pass in explicitly. The file format is JSON; every field has a
//! default, so an empty object `{}` is a valid configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};
use crate::parser::AreaCatalog;
use crate::schedule::{RuleSet, ShiftDefinition};

/// Area codes recognised in capacity tables when no configuration overrides them.
pub const DEFAULT_AREAS: [&str; 6] = ["calculo", "bodega", "surf", "hc", "ar", "montaje"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Area codes that open a block in a capacity table (case-insensitive).
    pub areas: Vec<String>,

    /// Hours a worker may be scheduled on one calendar date.
    pub max_hours_per_day: f64,

    /// Prior consecutive working days after which the strict pass blocks a worker.
    pub max_consecutive_days: u32,

    /// Shift definitions available to seat demand.
    pub shifts: Vec<ShiftDefinition>,

    /// Run the relaxation pass when the strict pass finds nobody.
    pub relax_when_unfilled: bool,

    /// Keep area qualification during the relaxation pass.
    pub relaxed_pass_keeps_area: bool,

    /// Delimiter of capacity tables.
    pub capacity_delimiter: char,

    /// Delimiter of job, roster, demand and schedule tables.
    pub table_delimiter: char,

    /// Where report CSVs are written.
    pub output_dir: PathBuf,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            areas: DEFAULT_AREAS.iter().map(|a| a.to_string()).collect(),
            max_hours_per_day: 12.0,
            max_consecutive_days: 6,
            shifts: vec![
                ShiftDefinition::new("M", 6, 14),
                ShiftDefinition::new("T", 14, 22),
                ShiftDefinition::new("N", 22, 6),
            ],
            relax_when_unfilled: true,
            relaxed_pass_keeps_area: true,
            capacity_delimiter: ';',
            table_delimiter: ',',
            output_dir: PathBuf::from("reports"),
        }
    }
}

impl PlannerConfig {
    /// Loads a configuration file, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let text = fs::read_to_string(path)?;
                let config: PlannerConfig =
                    serde_json::from_str(&text).map_err(|e| PlannerError::Config {
                        path: path.to_path_buf(),
                        message: e.to_string(),
                    })?;
                config.validate(path)?;
                config
            }
            None => Self::default(),
        };
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        let fail = |message: String| PlannerError::Config {
            path: path.to_path_buf(),
            message,
        };
        if self.areas.is_empty() {
            return Err(fail("at least one area code is required".to_string()));
        }
        if !(self.max_hours_per_day > 0.0) {
            return Err(fail(format!(
                "max_hours_per_day must be positive, got {}",
                self.max_hours_per_day
            )));
        }
        if !self.capacity_delimiter.is_ascii() || !self.table_delimiter.is_ascii() {
            return Err(fail("delimiters must be ASCII characters".to_string()));
        }
        for shift in &self.shifts {
            shift.validate()?;
        }
        Ok(())
    }

    pub fn area_catalog(&self) -> AreaCatalog {
        AreaCatalog::new(self.areas.iter().map(String::as_str))
    }

    pub fn rule_set(&self) -> RuleSet {
        RuleSet {
            max_hours_per_day: self.max_hours_per_day,
            max_consecutive_days: self.max_consecutive_days,
            relax_when_unfilled: self.relax_when_unfilled,
            relaxed_pass_keeps_area: self.relaxed_pass_keeps_area,
        }
    }

    pub fn capacity_delimiter_byte(&self) -> u8 {
        self.capacity_delimiter as u8
    }

    pub fn table_delimiter_byte(&self) -> u8 {
        self.table_delimiter as u8
    }
}
