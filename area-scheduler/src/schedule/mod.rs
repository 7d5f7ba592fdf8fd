pub mod types;
pub mod shift_utils;
pub mod aggregate;
pub mod jobs;
pub mod roster;
pub mod validation;

pub use types::{
    Assignment, CapacityRecord, CapacityRemaining, DemandRecord, Job, JobResult, JobStatus, ScheduleEntry,
    SeatDemand, ShiftDefinition, UtilizationRow, UtilizationStatus, Worker,
};
pub use shift_utils::{parse_date, planning_horizon};
pub use aggregate::{aggregate_to_matrix, overloads};
pub use jobs::{assign_jobs_greedy, CapacityPool, JobAllocation};
pub use roster::{generate_roster, RosterPlan, RuleSet, WorkerLoad};
pub use validation::{validate_schedule, Conflict, ConflictKind};
