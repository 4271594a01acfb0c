//! Text shown on the output screen after a run.

use crate::model::{ExportMode, RunRecord};

/// Filename reported when the tool binary could not be located.
pub const NOT_FOUND_FILENAME: &str = "Error";

const SEPARATOR_WIDTH: usize = 60;

/// Header (command, mode, file and save status), a separator, then the raw output.
pub fn render(record: &RunRecord, mode: ExportMode) -> String {
    format!(
        "COMMAND: {}\nMODE: {} | FILE: {} ({})\n{}\n\n{}",
        record.command_line,
        mode.label(),
        record.save_filename,
        record.save_status.message(),
        "-".repeat(SEPARATOR_WIDTH),
        String::from_utf8_lossy(&record.combined_output)
    )
}

pub fn not_found(binary: &str) -> String {
    format!(
        "ERROR: Tool '{binary}' not found.\nPlace it in the application folder or on the PATH and try again."
    )
}
