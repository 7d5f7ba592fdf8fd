//! Hourly capacity planning for work areas.
//!
//! Reads capacity tables, builds the per-area utilization matrix, allocates
//! jobs greedily against remaining capacity, and allocates shift rosters
//! under daily-hours and consecutive-day limits.

pub mod config;
pub mod error;
pub mod parser;
pub mod schedule;
pub mod display;
pub mod report;
pub mod web;

pub use config::PlannerConfig;
pub use error::{PlannerError, Result};
