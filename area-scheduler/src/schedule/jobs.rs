use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info};

use super::types::{Assignment, CapacityRemaining, Job, JobResult, JobStatus, UtilizationRow};

/// Relative tolerance used when deciding whether a job was fully served.
pub const QUANTITY_TOLERANCE: f64 = 1e-9;

/// Output of one job allocation run
#[derive(Debug, Clone, Default, Serialize)]
pub struct JobAllocation {
    pub assignments: Vec<Assignment>,
    pub results: Vec<JobResult>,
    pub remaining: Vec<CapacityRemaining>,
}

/// Remaining hourly capacity per (area, hour), owned by a single run.
#[derive(Debug, Clone, Default)]
pub struct CapacityPool {
    slots: BTreeMap<(String, i32), f64>,
}

impl CapacityPool {
    /// Builds a fresh pool from the capacity column of the matrix.
    ///
    /// The day dimension is dropped: when several days share an
    /// (area, hour), the last row in matrix order wins.
    pub fn from_matrix(matrix: &[UtilizationRow]) -> Self {
        let mut slots = BTreeMap::new();
        for row in matrix {
            if let Some(previous) = slots.insert((row.area.clone(), row.hour), row.capacity) {
                debug!(area = %row.area, hour = row.hour, previous, "capacity key collapsed across days");
            }
        }
        Self { slots }
    }

    pub fn available(&self, area: &str, hour: i32) -> f64 {
        self.slots.get(&(area.to_string(), hour)).copied().unwrap_or(0.0)
    }

    fn take(&mut self, area: &str, hour: i32, amount: f64) {
        if let Some(slot) = self.slots.get_mut(&(area.to_string(), hour)) {
            *slot -= amount;
        }
    }

    pub fn snapshot(&self) -> Vec<CapacityRemaining> {
        self.slots
            .iter()
            .map(|((area, hour), rem)| CapacityRemaining {
                area: area.clone(),
                hour: *hour,
                capacity_remaining: *rem,
            })
            .collect()
    }
}

/// Serves jobs strictly in input order, first-fit across each job's hours.
///
/// An earlier job may consume capacity that a later one needed; there is no
/// reordering or backtracking.
pub fn assign_jobs_greedy(matrix: &[UtilizationRow], jobs: &[Job]) -> JobAllocation {
    let mut pool = CapacityPool::from_matrix(matrix);
    let mut assignments = Vec::new();
    let mut results = Vec::with_capacity(jobs.len());

    for job in jobs {
        let total_available: f64 = job.hours().map(|h| pool.available(&job.area, h)).sum();
        let mut to_assign = job.quantity.min(total_available);
        let mut assigned = 0.0;

        for hour in job.hours() {
            if to_assign <= 0.0 {
                break;
            }
            let alloc = pool.available(&job.area, hour).min(to_assign);
            if alloc > 0.0 {
                assignments.push(Assignment {
                    job_id: job.id.clone(),
                    area: job.area.clone(),
                    day: job.day.clone(),
                    hour,
                    assigned_quantity: alloc,
                });
                pool.take(&job.area, hour, alloc);
                to_assign -= alloc;
                assigned += alloc;
            }
        }

        let status = job_status(job.quantity, assigned);
        debug!(job = %job.id, area = %job.area, requested = job.quantity, assigned, ?status, "job processed");

        results.push(JobResult {
            job_id: job.id.clone(),
            area: job.area.clone(),
            day: job.day.clone(),
            start_hour: job.start_hour,
            duration: job.duration,
            requested_quantity: job.quantity,
            assigned_total: assigned,
            status,
        });
    }

    let unserved = results.iter().filter(|r| r.status != JobStatus::Assigned).count();
    info!(jobs = jobs.len(), assignments = assignments.len(), unserved, "job allocation finished");

    JobAllocation {
        assignments,
        results,
        remaining: pool.snapshot(),
    }
}

/// Non-positive requests count as fully served with nothing assigned.
pub fn job_status(requested: f64, assigned: f64) -> JobStatus {
    if requested <= 0.0 {
        return JobStatus::Assigned;
    }
    if (requested - assigned).abs() <= QUANTITY_TOLERANCE * requested.max(1.0) {
        JobStatus::Assigned
    } else if assigned > 0.0 {
        JobStatus::Partial
    } else {
        JobStatus::Unassigned
    }
}
