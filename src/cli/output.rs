//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::ApiError;

const MODEL_OUTPUT_START: &str = "--- Model Output Start ---";
const MODEL_OUTPUT_END: &str = "--- Model Output End ---";

/// Map domain/service errors to a string for CLI output.
/// Parse failures carry the offending model output so it can be inspected.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::ParseFailed { raw, .. } => format!(
            "{}\n{}\n{}\n{}",
            e, MODEL_OUTPUT_START, raw, MODEL_OUTPUT_END
        ),
        _ => e.to_string(),
    }
}
