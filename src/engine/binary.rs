use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Where a tool binary was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBinary {
    /// Path handed to the process spawner.
    pub program: PathBuf,
    /// Name shown to the operator (`./vol`, or the bare name for search-path hits).
    pub display: String,
}

/// Look in `cwd` first, then on `search_path`.
pub fn resolve_binary_in(
    name: &str,
    cwd: &Path,
    search_path: Option<&OsStr>,
) -> Option<ResolvedBinary> {
    let local = cwd.join(name);
    if local.is_file() {
        let prefix = if cfg!(windows) { ".\\" } else { "./" };
        tracing::debug!(binary = name, path = %local.display(), "found in working directory");
        return Some(ResolvedBinary {
            program: local,
            display: format!("{prefix}{name}"),
        });
    }

    let search_path = search_path?;
    match which::which_in(name, Some(search_path), cwd) {
        Ok(program) => {
            tracing::debug!(binary = name, path = %program.display(), "found on search path");
            Some(ResolvedBinary {
                program,
                display: name.to_string(),
            })
        }
        Err(e) => {
            tracing::debug!(binary = name, error = %e, "not found on search path");
            None
        }
    }
}

/// Process environment used for lookups: current directory and `PATH`.
#[derive(Debug, Clone)]
pub struct Environment {
    pub cwd: PathBuf,
    pub search_path: Option<OsString>,
}

impl Environment {
    pub fn from_process() -> Self {
        Self {
            cwd: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            search_path: std::env::var_os("PATH"),
        }
    }

    pub fn resolve(&self, name: &str) -> Option<ResolvedBinary> {
        resolve_binary_in(name, &self.cwd, self.search_path.as_deref())
    }
}
