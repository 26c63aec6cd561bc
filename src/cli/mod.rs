//! Command-line interface

pub mod commands;
pub mod runtime;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Execute machine-generated web action plans and audit the outcome.
#[derive(Parser)]
#[command(name = "planpilot", version, about)]
pub struct CliArgs {
    /// Log level when RUST_LOG is not set
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a plan file against the schema
    Validate {
        /// Path to the plan JSON (bare plan or planner envelope)
        #[arg(short, long)]
        plan: PathBuf,
    },

    /// Execute a plan against a scripted page fixture (rehearsal run)
    Execute {
        /// Path to the plan JSON
        #[arg(short, long)]
        plan: PathBuf,

        /// Path to the scripted site fixture JSON
        #[arg(short, long)]
        site: PathBuf,

        /// Directory the report is written to
        #[arg(short, long, default_value = "output/execution_reports")]
        output_dir: PathBuf,

        /// Directory screenshots are written to
        #[arg(long, default_value = "output/execution_screenshots")]
        screenshot_dir: PathBuf,

        /// Per-step timeout (e.g. "30s")
        #[arg(long, default_value = "30s", value_parser = humantime::parse_duration)]
        step_timeout: Duration,

        /// Whole-plan timeout (e.g. "5m")
        #[arg(long, default_value = "5m", value_parser = humantime::parse_duration)]
        plan_timeout: Duration,

        /// Settle delay between steps (e.g. "500ms")
        #[arg(long, default_value = "0s", value_parser = humantime::parse_duration)]
        inter_action_delay: Duration,

        /// Run the browser with a visible window (pass-through)
        #[arg(long)]
        headed: bool,
    },
}

pub async fn run() -> Result<()> {
    let cli = CliArgs::parse();
    runtime::init_logging(&cli.log_level)?;

    info!("PlanPilot v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Validate { plan } => commands::validate(&plan),
        Commands::Execute {
            plan,
            site,
            output_dir,
            screenshot_dir,
            step_timeout,
            plan_timeout,
            inter_action_delay,
            headed,
        } => {
            let config = plan_flow::ExecutorConfig::default()
                .with_step_timeout(step_timeout)
                .with_plan_timeout(plan_timeout)
                .with_inter_action_delay(inter_action_delay)
                .with_headless(!headed)
                .with_screenshot_dir(screenshot_dir);
            commands::execute(&plan, &site, &output_dir, config).await
        }
    }
}
