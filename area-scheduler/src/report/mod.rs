pub mod request;
pub mod export;

pub use request::{validate_roster_request, RosterRequest, ValidateRequest};
pub use export::{write_capacity_reports, write_roster_reports, write_table, ReportFiles};
