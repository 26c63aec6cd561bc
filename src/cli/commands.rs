//! Subcommand implementations

use anyhow::{bail, Context, Result};
use driver_port::ScriptedSite;
use plan_core::load_plan_from_file;
use plan_flow::{ExecutorConfig, PlanExecutor};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Validate a plan file; exits non-zero on schema violations.
pub fn validate(plan_path: &Path) -> Result<()> {
    let plan = load_plan_from_file(plan_path)
        .with_context(|| format!("plan rejected: {}", plan_path.display()))?;

    println!(
        "plan ok: {} ({} steps, confidence {:.2})",
        plan.task_description,
        plan.steps.len(),
        plan.confidence
    );
    Ok(())
}

/// Execute a plan against a scripted site fixture and persist the report.
///
/// Rehearsal mode: real browser drivers plug in through the
/// `driver-port::BrowserDriver` trait outside this workspace.
pub async fn execute(
    plan_path: &Path,
    site_path: &Path,
    output_dir: &Path,
    config: ExecutorConfig,
) -> Result<()> {
    let plan = load_plan_from_file(plan_path)
        .with_context(|| format!("plan rejected: {}", plan_path.display()))?;
    let site = load_site(site_path)?;

    let executor = PlanExecutor::new(Arc::new(site), config);

    // Ctrl-C cancels at the next step boundary; the report still finalizes.
    let cancel = executor.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received; cancelling at the next step boundary");
            cancel.cancel();
        }
    });

    let report = executor.execute(&plan).await;

    let report_path = report
        .save(output_dir)
        .with_context(|| format!("failed to write report under {}", output_dir.display()))?;
    info!(path = %report_path.display(), "report saved");

    print!("{}", report.render_summary());
    println!("report: {}", report_path.display());

    if !report.success {
        bail!(
            "plan failed: {}/{} steps executed, {} error(s)",
            report.steps_executed,
            report.steps_total,
            report.errors.len()
        );
    }
    Ok(())
}

fn load_site(path: &Path) -> Result<ScriptedSite> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read site fixture: {}", path.display()))?;
    let site: ScriptedSite = serde_json::from_str(&raw)
        .with_context(|| format!("invalid site fixture: {}", path.display()))?;
    Ok(site)
}
