//! CLI domain: parse, route, output, and presentation only.
//! No domain orchestration; single route table dispatches to domain services.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{command_name, Cli, Commands};
pub use presentation::{
    format_audit_json, format_audit_text, format_init_preview, format_init_summary,
    format_plan_json, format_plan_text, format_run_summary, format_section_heading,
};
pub use route::RunContext;
