// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use evalcycle_api::{AuthenticatedActor, BatchItemResult, EvaluationService, Role};
use evalcycle_domain::PeriodCatalog;
use evalcycle_persistence::Persistence;
use serde::Serialize;
use tracing::level_filters::LevelFilter;
use tracing::{error, info};
use tracing_log::AsTrace;
use tracing_subscriber::EnvFilter;

/// Evalcycle - administration for the performance evaluation cycle
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON file holding the evaluation period catalog.
    #[arg(short, long)]
    periods: PathBuf,

    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// `MySQL`/`MariaDB` connection URL. Takes precedence over `--database`.
    #[cfg(feature = "mysql")]
    #[arg(long)]
    mysql_url: Option<String>,

    /// Identifier recorded as the administrator performing the command.
    #[arg(long, default_value = "cli-admin")]
    actor: String,

    /// Log filter directive, e.g. `debug` or `evalcycle_api=trace`.
    /// Overrides `RUST_LOG` and the verbosity flags.
    #[arg(long)]
    log_level: Option<String>,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Open the database, apply pending migrations and create the default
    /// evaluation lines
    #[command(visible_alias = "m")]
    Migrate,

    /// List the configured evaluation periods
    Periods,

    /// Look up the grade for a score in a period's grade table
    #[command(visible_alias = "g")]
    Grade {
        #[arg(long)]
        period: i64,
        #[arg(long)]
        score: f64,
    },

    /// Delete every evaluator assignment with its dependent evaluations
    ResetEvaluationLines,

    /// Delete every self evaluation with its linked downward evaluations
    ResetSelfEvaluations,

    /// Delete the step approvals and revision requests of one period
    ResetStepApprovals {
        #[arg(long)]
        period: i64,
    },

    /// Import evaluator assignments from a CSV file
    ImportAssignments { file: PathBuf },

    /// Print an employee's activity history for a period
    Activity {
        #[arg(long)]
        period: i64,
        #[arg(long)]
        employee: String,
    },
}

impl Args {
    fn log_filter(&self) -> EnvFilter {
        if let Some(directive) = &self.log_level {
            return EnvFilter::new(directive);
        }
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.verbosity_level().to_string()))
    }

    fn verbosity_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }

    fn open_persistence(&self) -> Result<Persistence, Box<dyn std::error::Error>> {
        #[cfg(feature = "mysql")]
        if let Some(url) = &self.mysql_url {
            info!("Using MySQL database");
            return Ok(Persistence::new_with_mysql(url)?);
        }
        let persistence = if let Some(path) = &self.database {
            info!("Using file-based database at: {}", path.display());
            Persistence::new_with_file(path)?
        } else {
            info!("Using in-memory database");
            Persistence::new_in_memory()?
        };
        Ok(persistence)
    }
}

/// One CSV row's outcome, as printed by `import-assignments`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImportRowReport {
    row: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    assignment_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_code: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl From<&BatchItemResult> for ImportRowReport {
    fn from(item: &BatchItemResult) -> Self {
        match &item.outcome {
            Ok(id) => Self {
                row: item.index + 1,
                assignment_id: Some(*id),
                error_code: None,
                error: None,
            },
            Err(err) => Self {
                row: item.index + 1,
                assignment_id: None,
                error_code: Some(err.code().as_str()),
                error: Some(err.to_string()),
            },
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(
    command: Command,
    service: &mut EvaluationService,
    actor: &AuthenticatedActor,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Migrate => {
            let lines = service.ensure_default_evaluation_lines(actor)?;
            info!(lines = lines.len(), "Database ready");
        }
        Command::Periods => {
            let periods: Vec<_> = service.periods().iter().collect();
            print_json(&periods)?;
        }
        Command::Grade { period, score } => {
            let config = service.periods().get(period)?;
            let grade = config.grade_ranges.grade_of(score)?;
            println!("{grade}");
        }
        Command::ResetEvaluationLines => {
            print_json(&service.reset_all_evaluation_lines(actor)?)?;
        }
        Command::ResetSelfEvaluations => {
            print_json(&service.reset_all_self_evaluations(actor)?)?;
        }
        Command::ResetStepApprovals { period } => {
            print_json(&service.reset_period_step_approvals(actor, period)?)?;
        }
        Command::ImportAssignments { file } => {
            let content = std::fs::read_to_string(&file)?;
            service.ensure_default_evaluation_lines(actor)?;
            let results = service.import_assignments_csv(actor, &content)?;
            let reports: Vec<ImportRowReport> = results.iter().map(ImportRowReport::from).collect();
            let failed = reports.iter().filter(|r| r.error.is_some()).count();
            info!(
                file = %file.display(),
                rows = reports.len(),
                failed,
                "Assignment import finished"
            );
            print_json(&reports)?;
        }
        Command::Activity { period, employee } => {
            print_json(&service.list_activity_logs(actor, period, &employee)?)?;
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(args.log_filter())
        .with_writer(std::io::stderr)
        .init();

    info!("Initializing evalcycle");

    let periods: PeriodCatalog = config::load_periods(&args.periods)?;
    let persistence = args.open_persistence()?;
    let mut service = EvaluationService::new(persistence, periods);
    let actor = AuthenticatedActor::new(args.actor.clone(), Role::Admin);

    if let Err(err) = run(args.command, &mut service, &actor) {
        error!("Command failed: {err}");
        return Err(err);
    }
    Ok(())
}
