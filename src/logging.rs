use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Route `tracing` output to a log file. The terminal belongs to the TUI, so when no file
/// can be opened logging is dropped instead.
pub fn init_tracing(log_file: Option<&Path>, level: &str) {
    let env_filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

    let (opened, init_warnings) = open_log_file(log_file_candidates(log_file));

    if let Some((log_path, file)) = opened {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), version = env!("CARGO_PKG_VERSION"), "logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    tracing_subscriber::registry().with(env_filter).init();
}

fn log_file_candidates(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(path) = explicit {
        candidates.push(path.to_path_buf());
    }
    if let Some(dir) = dirs::data_local_dir() {
        candidates.push(dir.join("voltas").join("logs").join("voltas.log"));
    }
    candidates.push(PathBuf::from(".voltas").join("logs").join("voltas.log"));
    candidates
}

/// First candidate that can be opened for appending, plus the failures met on the way.
fn open_log_file(candidates: Vec<PathBuf>) -> (Option<(PathBuf, fs::File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in candidates {
        if let Some(parent) = candidate.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(e) = fs::create_dir_all(parent) {
                warnings.push(format!("Failed to create log dir {}: {e}", parent.display()));
                continue;
            }
        }

        match OpenOptions::new().create(true).append(true).open(&candidate) {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => warnings.push(format!(
                "Failed to open log file {}: {e}",
                candidate.display()
            )),
        }
    }

    (None, warnings)
}
