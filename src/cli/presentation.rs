//! CLI presentation: text and json formatters per command.

use crate::error::ApiError;
use crate::init::{InitPreview, InitSummary};
use crate::journey::JourneyAudit;
use crate::pipeline::RunSummary;
use crate::planner::TimeWindow;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde_json::json;
use std::path::Path;

const MAX_LISTED: usize = 10;

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

fn windows_table(windows: &[TimeWindow]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["#", "Start", "End", "Days", "Period"]);
    for (index, window) in windows.iter().enumerate() {
        table.add_row(vec![
            (index + 1).to_string(),
            window.start.to_string(),
            window.end.to_string(),
            window.days().to_string(),
            window.label(),
        ]);
    }
    table
}

pub fn format_plan_text(windows: &[TimeWindow]) -> String {
    let mut out = format!("{}\n\n", format_section_heading("Planned windows"));
    if windows.is_empty() {
        out.push_str("No windows: the horizon is empty.\n");
        return out;
    }
    out.push_str(&format!("{}\n", windows_table(windows)));
    out.push_str(&format!("{} windows\n", windows.len()));
    out
}

pub fn format_plan_json(windows: &[TimeWindow]) -> Result<String, ApiError> {
    let rows: Vec<serde_json::Value> = windows
        .iter()
        .map(|w| {
            json!({
                "start": w.start,
                "end": w.end,
                "days": w.days(),
                "label": w.label(),
            })
        })
        .collect();
    Ok(serde_json::to_string_pretty(&json!({ "windows": rows }))?)
}

pub fn format_run_summary(summary: &RunSummary) -> String {
    let mut out = format!("{}\n\n", format_section_heading("Generation complete"));
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["#", "Period", "Days", "Status"]);
    for chunk in &summary.chunks {
        let status = if chunk.weak_success { "empty" } else { "ok" };
        table.add_row(vec![
            (chunk.index + 1).to_string(),
            chunk.window.label(),
            chunk.days.to_string(),
            status.to_string(),
        ]);
    }
    out.push_str(&format!("{}\n\n", table));
    out.push_str(&format!("  Windows processed: {}\n", summary.chunks.len()));
    out.push_str(&format!("  Total days: {}\n", summary.total_days));
    out.push_str(&format!("  Saved to: {}\n", summary.output_path.display()));

    let weak: Vec<String> = summary.weak_windows().map(|w| w.label()).collect();
    if !weak.is_empty() {
        out.push_str(&format!(
            "\n{} {} window(s) produced no days:\n",
            "⚠".yellow(),
            weak.len()
        ));
        for label in weak {
            out.push_str(&format!("  - {}\n", label));
        }
    }
    if !summary.audit.is_clean() {
        out.push_str(&format!(
            "\n{} Reference issues found; run 'journeygen validate' for details.\n",
            "⚠".yellow()
        ));
    }
    out
}

pub fn format_audit_text(path: &Path, audit: &JourneyAudit) -> String {
    let mut out = format!("{}\n\n", format_section_heading("Journey artifact"));
    out.push_str(&format!("  Path: {}\n", path.display()));
    out.push_str(&format!("  Days: {}\n", audit.total_days));
    out.push_str(&format!("  Messages: {}\n", audit.total_messages));
    out.push_str(&format!("  Events: {}\n", audit.total_events));
    match (audit.first_date, audit.last_date) {
        (Some(first), Some(last)) => {
            out.push_str(&format!("  Range: {} to {}\n", first, last));
        }
        _ => out.push_str("  Range: (empty)\n"),
    }

    out.push_str(&format!("\n{}\n\n", format_section_heading("Coverage")));
    if audit.missing_date_count == 0 {
        out.push_str(&format!("  {} No missing dates\n", "✓".green()));
    } else {
        out.push_str(&format!(
            "  {} {} missing date(s)\n",
            "⚠".yellow(),
            audit.missing_date_count
        ));
        let listed = audit.missing_dates.iter().take(MAX_LISTED);
        for date in listed.clone() {
            out.push_str(&format!("    - {}\n", date));
        }
        let shown = listed.count();
        if audit.missing_date_count > shown {
            out.push_str(&format!(
                "    ... and {} more\n",
                audit.missing_date_count - shown
            ));
        }
    }
    if audit.out_of_order > 0 {
        out.push_str(&format!(
            "  {} {} day(s) out of chronological order\n",
            "⚠".yellow(),
            audit.out_of_order
        ));
    }

    out.push_str(&format!("\n{}\n\n", format_section_heading("References")));
    if audit.duplicate_message_ids.is_empty() {
        out.push_str(&format!("  {} Message ids are unique\n", "✓".green()));
    } else {
        out.push_str(&format!(
            "  {} Duplicate message ids ({}):\n",
            "✗".red(),
            audit.duplicate_message_ids.len()
        ));
        for id in audit.duplicate_message_ids.iter().take(MAX_LISTED) {
            out.push_str(&format!("    - {}\n", id));
        }
    }
    if audit.dangling_triggers.is_empty() {
        out.push_str(&format!("  {} Event triggers resolve\n", "✓".green()));
    } else {
        out.push_str(&format!(
            "  {} Dangling event triggers ({}):\n",
            "✗".red(),
            audit.dangling_triggers.len()
        ));
        for dangling in audit.dangling_triggers.iter().take(MAX_LISTED) {
            out.push_str(&format!(
                "    - {} \"{}\" -> {}\n",
                dangling.date, dangling.title, dangling.message_id
            ));
        }
    }
    out
}

pub fn format_audit_json(path: &Path, audit: &JourneyAudit) -> Result<String, ApiError> {
    let out = json!({
        "path": path.display().to_string(),
        "clean": audit.is_clean(),
        "audit": audit,
    });
    Ok(serde_json::to_string_pretty(&out)?)
}

pub fn format_init_preview(preview: &InitPreview) -> String {
    let mut output = String::from("Initialization Preview:\n\n");

    if !preview.prompts.is_empty() {
        output.push_str("Would create prompts:\n");
        for prompt in &preview.prompts {
            output.push_str(&format!("  - prompts/{}\n", prompt));
        }
        output.push('\n');
    }
    if let Some(config) = &preview.config {
        output.push_str(&format!("Would create config:\n  - {}\n\n", config));
    }

    if preview.prompts.is_empty() && preview.config.is_none() {
        output.push_str("Workspace is already initialized.\n");
    } else {
        output.push_str("Run 'journeygen init' to perform initialization.\n");
    }
    output
}

pub fn format_init_summary(summary: &InitSummary, force: bool) -> String {
    let mut output = format!(
        "Initializing journeygen workspace at {}...\n\n",
        summary.workspace_root.display()
    );
    let note = if force { " (overwritten)" } else { "" };

    output.push_str("Prompts:\n");
    for prompt in &summary.prompts.created {
        output.push_str(&format!("  ✓ prompts/{}{}\n", prompt, note));
    }
    for prompt in &summary.prompts.skipped {
        output.push_str(&format!("  ⊘ prompts/{} (already exists, skipped)\n", prompt));
    }
    output.push_str("\nConfiguration:\n");
    for config in &summary.config.created {
        output.push_str(&format!("  ✓ {}{}\n", config, note));
    }
    for config in &summary.config.skipped {
        output.push_str(&format!("  ⊘ {} (already exists, skipped)\n", config));
    }
    output.push('\n');

    let errors: Vec<&String> = summary
        .prompts
        .errors
        .iter()
        .chain(summary.config.errors.iter())
        .collect();
    if !errors.is_empty() {
        output.push_str("Errors:\n");
        for error in errors {
            output.push_str(&format!("  ✗ {}\n", error));
        }
        output.push('\n');
    }

    if summary.prompts.created.is_empty() && summary.config.created.is_empty() && !force {
        output.push_str("Workspace already initialized. Use --force to re-initialize.\n");
    } else {
        output.push_str("Initialization complete! You can now use:\n");
        output.push_str("  - journeygen plan        # Preview the generation windows\n");
        output.push_str("  - journeygen generate    # Generate the journey\n");
    }
    output
}
