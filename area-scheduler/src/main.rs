use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use area_scheduler::display::{print_conflicts, print_job_results, print_overloads, print_roster, print_utilization};
use area_scheduler::parser::{load_capacity_table, load_jobs, load_schedule, load_seat_demand, load_workers};
use area_scheduler::report::{write_capacity_reports, write_roster_reports};
use area_scheduler::schedule::{
    aggregate_to_matrix, assign_jobs_greedy, generate_roster, overloads, parse_date, planning_horizon,
    validate_schedule,
};
use area_scheduler::{web, PlannerConfig};

const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

#[derive(Parser)]
#[command(name = "area-scheduler", version, about = "Hourly capacity, job and shift roster planning")]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the utilization matrix from a capacity table, optionally allocating jobs
    Capacity {
        table: PathBuf,

        /// Job list to allocate against the table
        #[arg(long)]
        jobs: Option<PathBuf>,

        /// Report directory (defaults to the configured one)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Generate a shift roster over a planning horizon
    Roster {
        #[arg(long)]
        workers: PathBuf,

        #[arg(long)]
        demand: PathBuf,

        /// First date, YYYY-MM-DD
        #[arg(long)]
        start: String,

        #[arg(long)]
        days: u32,

        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Check a schedule file against the configured limits
    Validate { schedule: PathBuf },

    /// Run the web server
    Web {
        #[arg(long, default_value_t = 8080)]
        port: u16,

        #[arg(long, env = "ADMIN_PASSWORD", default_value = DEFAULT_ADMIN_PASSWORD, hide_env_values = true)]
        admin_password: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::registry().with(fmt::layer().with_target(false)).with(filter).init();

    let config = PlannerConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Command::Capacity { table, jobs, out } => run_capacity(&config, table, jobs, out),
        Command::Roster {
            workers,
            demand,
            start,
            days,
            out,
        } => run_roster(&config, workers, demand, &start, days, out),
        Command::Validate { schedule } => run_validate(&config, schedule),
        Command::Web { port, admin_password } => {
            if admin_password == DEFAULT_ADMIN_PASSWORD {
                warn!("using the default admin password, set ADMIN_PASSWORD to change it");
            }
            info!(port, "starting web server");
            println!("Access the site at http://localhost:{}", port);
            web::start_server(port, config, admin_password).await?;
            Ok(())
        }
    }
}

fn run_capacity(config: &PlannerConfig, table: PathBuf, jobs: Option<PathBuf>, out: Option<PathBuf>) -> Result<()> {
    let capacity = load_capacity_table(&table, config.capacity_delimiter_byte(), &config.area_catalog())
        .with_context(|| format!("Failed to read capacity table {}", table.display()))?;

    let matrix = aggregate_to_matrix(&capacity.capacities, &capacity.demands);
    print_utilization(&matrix);
    print_overloads(&overloads(&matrix));

    let allocation = match jobs {
        Some(path) => {
            let jobs = load_jobs(&path, config.table_delimiter_byte())
                .with_context(|| format!("Failed to read job list {}", path.display()))?;
            let allocation = assign_jobs_greedy(&matrix, &jobs);
            print_job_results(&allocation);
            Some(allocation)
        }
        None => None,
    };

    let dir = out.unwrap_or_else(|| config.output_dir.clone());
    let files = write_capacity_reports(&dir, &matrix, allocation.as_ref(), config.table_delimiter_byte())
        .context("Failed to write reports")?;
    print_written(&files.written);
    Ok(())
}

fn run_roster(
    config: &PlannerConfig,
    workers: PathBuf,
    demand: PathBuf,
    start: &str,
    days: u32,
    out: Option<PathBuf>,
) -> Result<()> {
    let delimiter = config.table_delimiter_byte();
    let workers = load_workers(&workers, delimiter)
        .with_context(|| format!("Failed to read roster {}", workers.display()))?;
    let demand = load_seat_demand(&demand, delimiter)
        .with_context(|| format!("Failed to read seat demand {}", demand.display()))?;
    let dates = planning_horizon(parse_date(start)?, days);

    let rules = config.rule_set();
    let plan = generate_roster(&workers, &config.shifts, &demand, &dates, &rules)?;
    let conflicts = validate_schedule(&plan.entries, rules.max_hours_per_day, rules.max_consecutive_days);
    print_roster(&plan);
    print_conflicts(&conflicts);

    let dir = out.unwrap_or_else(|| config.output_dir.clone());
    let files = write_roster_reports(&dir, &plan, &conflicts, delimiter).context("Failed to write reports")?;
    print_written(&files.written);
    Ok(())
}

fn run_validate(config: &PlannerConfig, schedule: PathBuf) -> Result<()> {
    let entries = load_schedule(&schedule, config.table_delimiter_byte())
        .with_context(|| format!("Failed to read schedule {}", schedule.display()))?;
    info!(entries = entries.len(), "schedule loaded");

    let conflicts = validate_schedule(&entries, config.max_hours_per_day, config.max_consecutive_days);
    print_conflicts(&conflicts);
    if !conflicts.is_empty() {
        bail!("{} conflicts in {}", conflicts.len(), schedule.display());
    }
    Ok(())
}

fn print_written(files: &[PathBuf]) {
    println!("\nReports saved to:");
    for file in files {
        println!("  - {}", file.display());
    }
}
