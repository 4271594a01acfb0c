use crate::model::{ExportMode, Invocation, RunRequest};
use crate::resolver::clean_path;
use std::path::PathBuf;

/// Shared executable behind every internal tool.
pub const BACKING_EXECUTABLE: &str = if cfg!(windows) { "vol.exe" } else { "vol" };

fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Last path component of the memory image, ignoring trailing separators.
///
/// Both `/` and `\` count as separators so Windows paths behave the same on every host.
pub fn image_file_name(image_path: &str) -> &str {
    let trimmed = image_path.trim_end_matches(is_separator);
    trimmed.rsplit(is_separator).next().unwrap_or(trimmed)
}

/// File name of the memory image without directories or its last extension.
pub fn image_base_name(image_path: &str) -> &str {
    let base = image_file_name(image_path);
    match base.rfind('.') {
        Some(idx) if idx > 0 => &base[..idx],
        _ => base,
    }
}

/// `<imageBaseName>-<toolTitle>.<ext>`
pub fn save_filename(image_path: &str, tool_title: &str, mode: ExportMode) -> String {
    format!(
        "{}-{}.{}",
        image_base_name(&clean_path(image_path)),
        tool_title,
        mode.extension()
    )
}

/// Concrete invocation derived from a run request, before the binary is located.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandPlan {
    pub binary_name: String,
    pub args: Vec<String>,
    pub export_mode: ExportMode,
    pub save_filename: String,
    pub save_path: PathBuf,
    pub output_directory: PathBuf,
}

impl CommandPlan {
    pub fn build(request: &RunRequest) -> Self {
        let cfg = &request.config;
        let tool = &request.tool.tool;
        let extra = request
            .tool
            .resolved_arguments
            .split_whitespace()
            .map(str::to_string);

        let (binary_name, args) = match tool.invocation {
            Invocation::Internal { plugin_id } => {
                let mut args: Vec<String> = Vec::new();
                if cfg.export_mode == ExportMode::Csv {
                    args.extend(["-r".to_string(), "csv".to_string()]);
                }
                args.extend([
                    "-f".to_string(),
                    clean_path(&cfg.memory_image_path),
                    "-o".to_string(),
                    clean_path(&cfg.output_directory),
                    plugin_id.to_string(),
                ]);
                args.extend(extra);
                (BACKING_EXECUTABLE.to_string(), args)
            }
            Invocation::External { binary } => (binary.to_string(), extra.collect()),
        };

        let output_directory = PathBuf::from(clean_path(&cfg.output_directory));
        let save_filename = save_filename(&cfg.memory_image_path, tool.title, cfg.export_mode);
        let save_path = output_directory.join(&save_filename);

        Self {
            binary_name,
            args,
            export_mode: cfg.export_mode,
            save_filename,
            save_path,
            output_directory,
        }
    }

    /// Human-readable command line, as shown in the output header.
    pub fn command_line(&self, binary: &str) -> String {
        std::iter::once(binary)
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
