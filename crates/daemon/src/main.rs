//! JobPulse - engagement counters, dedup windows and slugs for job postings

mod config;
mod runtime;
mod telemetry;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::{Backend, DaemonConfig};
use jobpulse_core::application::{shutdown_channel, EventOutcome, MaintenanceScheduler};
use jobpulse_core::domain::EventKind;
use runtime::Runtime;
use std::time::Duration;
use tracing::info;

#[derive(Parser)]
#[command(name = "jobpulse")]
#[command(about = "Engagement counters for job postings", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// SQLite database path
    #[arg(long, env = "JOBPULSE_DB_PATH")]
    db_path: Option<String>,

    /// Storage backend (overrides JOBPULSE_BACKEND)
    #[arg(long, value_enum)]
    backend: Option<Backend>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the maintenance loop until Ctrl+C
    Run,

    /// Register a job and allocate its slug
    CreateJob {
        /// Job title
        title: String,
    },

    /// Delete a job with everything attached to it
    DeleteJob { job_id: String },

    /// Record an impression from an IP
    Impression { job_id: String, ip: String },

    /// Record a click from an IP
    Click { job_id: String, ip: String },

    /// Record a view from a session or user identity
    View { job_id: String, session: String },

    /// Toggle a user's bookmark
    Bookmark { job_id: String, user_id: String },

    /// Submit an application
    Apply { job_id: String, user_id: String },

    /// Withdraw an application
    Withdraw { application_id: String },

    /// Show all counters of a job
    Counters { job_id: String },

    /// List a user's active bookmarks
    Bookmarks { user_id: String },

    /// Run maintenance once (dedup GC, VACUUM when oversized)
    Maintenance,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _telemetry = telemetry::init_tracing()?;

    let config = DaemonConfig::from_env()
        .context("Invalid configuration")?
        .with_overrides(cli.db_path, cli.backend);

    let runtime = Runtime::build(&config).await?;
    let result = execute(cli.command, &runtime, &config).await;
    runtime.close().await;
    result
}

async fn execute(command: Commands, rt: &Runtime, config: &DaemonConfig) -> Result<()> {
    match command {
        Commands::Run => run_daemon(rt, config).await?,
        Commands::CreateJob { title } => {
            let job = rt.jobs.create_job(&title).await?;
            println!("{}\t{}", job.id, job.slug);
        }
        Commands::DeleteJob { job_id } => {
            if rt.jobs.delete_job(&job_id).await? {
                println!("deleted {}", job_id);
            } else {
                println!("no such job {}", job_id);
            }
        }
        Commands::Impression { job_id, ip } => {
            record(rt, EventKind::Impression, &job_id, &ip).await?;
        }
        Commands::Click { job_id, ip } => {
            record(rt, EventKind::Click, &job_id, &ip).await?;
        }
        Commands::View { job_id, session } => {
            record(rt, EventKind::View, &job_id, &session).await?;
        }
        Commands::Bookmark { job_id, user_id } => {
            let toggle = rt.engine.toggle_bookmark(&job_id, &user_id, rt.now()).await?;
            let state = if toggle.added { "added" } else { "removed" };
            println!("{}\tbookmark_count={}", state, toggle.bookmark_count);
        }
        Commands::Apply { job_id, user_id } => {
            let receipt = rt
                .engine
                .submit_application(&job_id, &user_id, rt.now())
                .await?;
            match receipt.apply_count {
                Some(count) => println!("{}\tapply_count={}", receipt.application_id, count),
                None => println!("{}\tapply_count=unavailable", receipt.application_id),
            }
        }
        Commands::Withdraw { application_id } => {
            let withdrawn = rt.engine.withdraw_application(&application_id).await?;
            println!("{}", if withdrawn { "withdrawn" } else { "not active" });
        }
        Commands::Counters { job_id } => {
            let c = rt.engine.counters(&job_id).await?;
            println!("views\t{}", c.view_count);
            println!("clicks\t{}", c.click_count);
            println!("impressions\t{}", c.impression_count);
            println!("applications\t{}", c.apply_count);
            println!("bookmarks\t{}", c.bookmark_count);
        }
        Commands::Bookmarks { user_id } => {
            for bookmark in rt.engine.user_bookmarks(&user_id).await? {
                println!("{}\t{}", bookmark.job_id, bookmark.created_at);
            }
        }
        Commands::Maintenance => {
            let scheduler = MaintenanceScheduler::new(
                rt.maintenance.clone(),
                config.maintenance.clone(),
                config.maintenance_interval,
            );
            let stats = scheduler.run_now().await?;
            println!("db_size_mb\t{:.2}", stats.db_size_mb);
            println!("jobs\t{}", stats.job_count);
            println!("dedup_entries\t{}", stats.dedup_entry_count);
            println!("active_bookmarks\t{}", stats.active_bookmark_count);
            println!("active_applications\t{}", stats.application_count);
        }
    }
    Ok(())
}

async fn record(rt: &Runtime, kind: EventKind, job_id: &str, source: &str) -> Result<()> {
    let EventOutcome { counted, count } = rt
        .engine
        .record_event(kind, job_id, source, rt.now())
        .await?;
    let state = if counted { "counted" } else { "duplicate" };
    println!("{}\t{}_count={}", state, kind, count);
    Ok(())
}

async fn run_daemon(rt: &Runtime, config: &DaemonConfig) -> Result<()> {
    info!("JobPulse v{} starting...", jobpulse_core::VERSION);

    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let scheduler = MaintenanceScheduler::new(
        rt.maintenance.clone(),
        config.maintenance.clone(),
        config.maintenance_interval,
    );
    let maintenance_handle = tokio::spawn(scheduler.run(shutdown_rx));

    info!("System ready. Press Ctrl+C to shutdown");

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received. Exiting gracefully...");

    shutdown_tx.shutdown();
    let _ = tokio::time::timeout(Duration::from_secs(5), maintenance_handle).await;

    info!("Shutdown complete.");
    Ok(())
}
