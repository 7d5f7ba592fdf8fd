use crate::schedule::{Conflict, JobAllocation, JobStatus, RosterPlan, ScheduleEntry, UtilizationRow};

/// Formats the holder of a seat; unfilled seats show as [EMPTY]
pub fn format_seat_holder(entry: &ScheduleEntry) -> String {
    match &entry.worker {
        Some(name) if entry.relaxed => format!("{} (relaxed)", name),
        Some(name) => name.clone(),
        None => "[EMPTY]".to_string(),
    }
}

/// Prints the utilization matrix grouped by area
pub fn print_utilization(matrix: &[UtilizationRow]) {
    println!("\n=== Hourly Utilization ===");
    println!("Rows: {}", matrix.len());

    let mut current_area: Option<&str> = None;
    for row in matrix {
        if current_area != Some(row.area.as_str()) {
            println!("\n[{}]", row.area);
            current_area = Some(row.area.as_str());
        }
        let day = if row.day.is_empty() { "-" } else { row.day.as_str() };
        println!(
            "  {} {:>5}  capacity {:>8.2}  job {:>8.2}  diff {:>8.2}  {:?}",
            day, row.hour, row.capacity, row.capacity_job, row.difference, row.status
        );
    }
}

pub fn print_overloads(overloads: &[UtilizationRow]) {
    if overloads.is_empty() {
        println!("\nNo overloaded hours.");
        return;
    }
    println!("\n⚠️  Overloaded hours ({}):", overloads.len());
    for row in overloads {
        println!("  - {} hour {} short by {:.2}", row.area, row.hour, -row.difference);
    }
}

pub fn print_job_results(allocation: &JobAllocation) {
    println!("\n=== Job Allocation ===");
    println!("Assignments: {}", allocation.assignments.len());

    for result in &allocation.results {
        let marker = match result.status {
            JobStatus::Assigned => "✓",
            JobStatus::Partial => "~",
            JobStatus::Unassigned => "✗",
        };
        println!(
            "  {} {} ({}, hours {}..{}) -> {:.2} / {:.2} {:?}",
            marker,
            result.job_id,
            result.area,
            result.start_hour,
            result.start_hour + result.duration,
            result.assigned_total,
            result.requested_quantity,
            result.status
        );
    }
}

/// Prints a roster by date, then the per-worker load summary
pub fn print_roster(plan: &RosterPlan) {
    println!("\n=== Roster ===");
    println!("Seats: {}  Unfilled: {}", plan.entries.len(), plan.unfilled());

    let mut current_date = None;
    for entry in &plan.entries {
        if current_date != Some(entry.date) {
            println!("\n{} ({})", entry.date, entry.date.format("%a"));
            current_date = Some(entry.date);
        }
        println!(
            "  {} {}-{} {:<8} seat {} -> {}",
            entry.shift_id,
            entry.start.format("%H:%M"),
            entry.end.format("%H:%M"),
            entry.area,
            entry.seat,
            format_seat_holder(entry)
        );
    }

    println!("\nWorker hours:");
    for load in &plan.loads {
        let over = if load.assigned_hours > load.contract_hours { " (over contract)" } else { "" };
        println!(
            "  {}: {:.1} / {:.1} h in {} shifts{}",
            load.name, load.assigned_hours, load.contract_hours, load.shifts, over
        );
    }
}

pub fn print_conflicts(conflicts: &[Conflict]) {
    if conflicts.is_empty() {
        println!("\nNo conflicts found.");
        return;
    }
    println!("\n⚠️  Conflicts ({}):", conflicts.len());
    for conflict in conflicts {
        println!("  - {}", conflict.message);
    }
}
