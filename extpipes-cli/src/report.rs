//! Human-readable deployment report

use colored::*;

use crate::service::{DeployOutcome, Deployment, ExecutionSummary};

/// Print the plan and what was applied
pub fn print_outcome(outcome: &DeployOutcome) {
    print_plan(&outcome.deployment);
    println!();

    if outcome.dry_run {
        println!("{}", "Dry run: no changes were applied.".yellow().bold());
    } else {
        println!("{}", "✓ Deployment complete!".green().bold());
        println!("  {}", summary_line(&outcome.summary));
    }
}

fn print_plan(deployment: &Deployment) {
    let plan = &deployment.plan;

    if nothing_to_report(deployment) {
        println!("{}", "No extraction pipelines configured or found.".yellow());
    } else {
        println!("{}", "Deployment plan:".bold());
    }

    for (db_name, tables) in &deployment.raw_tables.missing {
        for table in tables {
            println!("  {} RAW table {}", "+".green(), format!("{}/{}", db_name, table).cyan());
        }
    }
    for external_id in &plan.delete {
        println!("  {} {}", "-".red(), external_id.red());
    }
    for external_id in &plan.create {
        println!("  {} {}", "+".green(), external_id.green());
    }
    for external_id in &plan.update {
        let changed = deployment.changed_fields(external_id);
        println!(
            "  {} {} {}",
            "~".yellow(),
            external_id.bold(),
            describe_changes(&changed).dimmed()
        );
    }

    if !plan.would_delete.is_empty() {
        println!();
        println!(
            "{}",
            "Not in configuration, kept because automatic delete is off:".yellow()
        );
        for external_id in &plan.would_delete {
            println!("  {} {}", "·".dimmed(), external_id.dimmed());
        }
    }
}

/// No pipeline or table is touched, and none is kept back by the delete policy
fn nothing_to_report(deployment: &Deployment) -> bool {
    !deployment.plan.has_changes()
        && deployment.raw_tables.is_empty()
        && deployment.plan.would_delete.is_empty()
}

/// Short description of the fields an update touches
fn describe_changes(changed: &[&str]) -> String {
    if changed.is_empty() {
        "(no changes)".to_string()
    } else {
        format!("(changed: {})", changed.join(", "))
    }
}

fn summary_line(summary: &ExecutionSummary) -> String {
    format!(
        "{} RAW table(s) created, {} deleted, {} created, {} updated, {} config revision(s)",
        summary.tables_created,
        summary.deleted,
        summary.created,
        summary.updated,
        summary.config_revisions
    )
}
