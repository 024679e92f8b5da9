//! # Task Workflow CLI
//!
//! Command-line front end for the classification engine. Task records are read
//! from a JSON array file and held in an in-memory store.

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, NaiveTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use tracing::{error, info, warn};

use task_workflow::classification::{classify_task_at, DelayCriteriaTable};
use task_workflow::config::{ConfigLoader, EngineConfig};
use task_workflow::logging::init_structured_logging;
use task_workflow::models::{parse_date, Task, TaskType};
use task_workflow::services::{
    resolve_delay_criteria, BusinessSummaryService, DuplicateCleanupService, InMemoryTaskStore,
    TaskStore,
};
use task_workflow::StepRegistry;

#[derive(Parser)]
#[command(name = "task-workflow")]
#[command(about = "Classify task progress, schedule health and duplicates")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// JSON file holding an array of task records
    #[arg(short, long, global = true, env = "TASK_WORKFLOW_TASKS")]
    tasks: Option<PathBuf>,

    /// JSON file mapping task type to {delayed_days, risky_days}
    #[arg(long, global = true)]
    criteria: Option<PathBuf>,

    /// Configuration file (default: config/task-workflow.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the lifecycle steps of a task type
    Steps {
        /// Task type (self, subsidy, etc, as, dealer, outsourcing)
        task_type: String,
    },

    /// Progress, label and color for a status
    Progress { task_type: String, status: String },

    /// Schedule health of every active task
    Classify {
        /// Evaluate as of this date (YYYY-MM-DD) instead of today
        #[arg(long)]
        today: Option<String>,
    },

    /// Find duplicate task records
    Duplicates {
        /// Soft-delete the default selection and report the outcome
        #[arg(long)]
        delete: bool,
    },

    /// Status summary per business
    Summary {
        #[arg(required = true)]
        business_names: Vec<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e:#}");
            process::exit(2);
        }
    };
    init_structured_logging(&config.logging);

    let result = match &cli.command {
        Commands::Steps { task_type } => show_steps(&cli, task_type),
        Commands::Progress { task_type, status } => show_progress(&cli, task_type, status),
        Commands::Classify { today } => classify_tasks(&cli, today.as_deref()).await,
        Commands::Duplicates { delete } => find_duplicates(&cli, &config, *delete).await,
        Commands::Summary { business_names } => summarize(&cli, &config, business_names).await,
    };

    if let Err(e) = result {
        error!(error = %e, "Command failed");
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn load_config(cli: &Cli) -> Result<EngineConfig> {
    let loader = match &cli.config {
        Some(path) => ConfigLoader::from_env().with_file(path),
        None => ConfigLoader::from_env(),
    };
    Ok(loader.load()?)
}

/// Unrecognized types fall back to `etc`, matching how stored records are read
fn resolve_task_type(raw: &str) -> TaskType {
    raw.parse::<TaskType>().unwrap_or_else(|e| {
        warn!(error = %e, fallback = %TaskType::Etc, "Unknown task type, using fallback");
        TaskType::Etc
    })
}

fn load_tasks(cli: &Cli) -> Result<Vec<Task>> {
    let Some(path) = &cli.tasks else {
        bail!("--tasks FILE is required for this command");
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading task file {}", path.display()))?;
    let tasks: Vec<Task> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing task file {}", path.display()))?;
    info!(path = %path.display(), task_count = tasks.len(), "Loaded task records");
    Ok(tasks)
}

fn load_criteria(path: &Path) -> Result<DelayCriteriaTable> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading criteria file {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing criteria file {}", path.display()))
}

fn load_store(cli: &Cli) -> Result<Arc<InMemoryTaskStore>> {
    let store = InMemoryTaskStore::with_tasks(load_tasks(cli)?);
    if let Some(path) = &cli.criteria {
        store.set_delay_criteria(Some(load_criteria(path)?));
    }
    Ok(Arc::new(store))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn show_steps(cli: &Cli, task_type: &str) -> Result<()> {
    let registry = StepRegistry::global();
    let table = registry.steps_for(resolve_task_type(task_type));

    if cli.format == OutputFormat::Json {
        return print_json(table.steps());
    }

    println!("{} ({} steps)", table.task_type().display_name(), table.len());
    for (index, step) in table.iter().enumerate() {
        println!(
            "{:>3}  {:<32} {:<20} {:<8} {:>3}%",
            index + 1,
            step.status,
            step.label,
            step.color_token,
            registry.progress_percent(table.task_type(), step.status)
        );
    }
    Ok(())
}

#[derive(Serialize)]
struct ProgressView<'a> {
    task_type: TaskType,
    status: &'a str,
    label: String,
    color_token: &'static str,
    progress_percent: u8,
    next_status: Option<&'static str>,
}

fn show_progress(cli: &Cli, task_type: &str, status: &str) -> Result<()> {
    let registry = StepRegistry::global();
    let task_type = resolve_task_type(task_type);
    let view = ProgressView {
        task_type,
        status,
        label: registry.label(task_type, status).into_owned(),
        color_token: registry.color_token(task_type, status),
        progress_percent: registry.progress_percent(task_type, status),
        next_status: registry.next_step(task_type, status).map(|step| step.status),
    };

    if cli.format == OutputFormat::Json {
        return print_json(&view);
    }

    println!(
        "{} / {}: {} [{}] {}%",
        view.task_type, view.status, view.label, view.color_token, view.progress_percent
    );
    if let Some(next) = view.next_status {
        println!("next: {next}");
    }
    Ok(())
}

#[derive(Serialize)]
struct ClassifiedTask<'a> {
    task: &'a Task,
    label: String,
    progress_percent: u8,
    delay: task_workflow::DelayAssessment,
}

async fn classify_tasks(cli: &Cli, today: Option<&str>) -> Result<()> {
    let now = match today {
        Some(raw) => {
            let date: NaiveDate =
                parse_date(raw).with_context(|| format!("invalid --today date '{raw}'"))?;
            date.and_time(NaiveTime::MIN).and_utc()
        }
        None => Utc::now(),
    };

    let store = load_store(cli)?;
    let criteria = resolve_delay_criteria(store.as_ref()).await;
    let registry = StepRegistry::global();
    let tasks = store.all_tasks();

    let classified: Vec<ClassifiedTask<'_>> = tasks
        .iter()
        .filter(|task| !task.record_state.is_deleted())
        .map(|task| ClassifiedTask {
            task,
            label: registry.label(task.task_type, &task.status).into_owned(),
            progress_percent: registry.progress_percent(task.task_type, &task.status),
            delay: classify_task_at(now, task, &criteria),
        })
        .collect();

    if cli.format == OutputFormat::Json {
        return print_json(&classified);
    }

    for row in &classified {
        println!(
            "{}  {:<20} {:<12} {:<20} {:>3}%  {:<8} {:>4}",
            row.task.id,
            row.task.business_name,
            row.task.task_type.display_name(),
            row.label,
            row.progress_percent,
            row.delay.health,
            row.delay.overdue_days
        );
    }
    Ok(())
}

async fn find_duplicates(cli: &Cli, config: &EngineConfig, delete: bool) -> Result<()> {
    let store = load_store(cli)?;
    let mut businesses: Vec<String> = store
        .all_tasks()
        .into_iter()
        .map(|t| t.business_name)
        .collect();
    businesses.sort();
    businesses.dedup();

    let store: Arc<dyn TaskStore> = store;
    let service = DuplicateCleanupService::from_config(store, config);
    let scan = service.scan(&businesses).await?;

    let report = if delete {
        Some(service.apply(&scan.plan, None).await)
    } else {
        None
    };

    if cli.format == OutputFormat::Json {
        return print_json(&serde_json::json!({
            "groups": scan.groups,
            "deletion_candidates": scan.plan.default_selection(),
            "report": report,
        }));
    }

    for group in &scan.groups {
        println!("{} ({} records)", group.key, group.count);
        for member in &group.members {
            let marker = if member.keep { "keep" } else { "delete" };
            println!("    {:<6} {}  {}", marker, member.id, member.created_at.to_rfc3339());
        }
    }
    println!("{} deletion candidates", scan.plan.candidate_count());

    if let Some(report) = report {
        println!(
            "deleted {} ({} already deleted), failed {}",
            report.success_count, report.already_deleted_count, report.failed_count
        );
        for failure in &report.failures {
            println!("    {}: {}", failure.task_id, failure.reason);
        }
    }
    Ok(())
}

async fn summarize(cli: &Cli, config: &EngineConfig, business_names: &[String]) -> Result<()> {
    let store: Arc<dyn TaskStore> = load_store(cli)?;
    let service = BusinessSummaryService::from_config(store, config);
    let summaries = service.summarize(business_names).await?;

    if cli.format == OutputFormat::Json {
        return print_json(&summaries);
    }

    for summary in &summaries {
        println!(
            "{:<20} {:<20} {:<8} {:>3}%  {:<8} active {}",
            summary.business_name,
            summary.label,
            summary.color_token,
            summary.progress_percent,
            summary.delay.health,
            summary.active_task_count
        );
    }
    Ok(())
}
