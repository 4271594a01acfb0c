use std::fmt;
use std::path::PathBuf;

/// Catalog grouping shown next to each tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Acquisition,
    LiveScan,
    MemProcFS,
    Process,
    Objects,
    Network,
    Injection,
    Rootkits,
    Extraction,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::Acquisition => "Acquisition",
            Category::LiveScan => "Live Scan",
            Category::MemProcFS => "MemProcFS",
            Category::Process => "Process",
            Category::Objects => "Objects",
            Category::Network => "Network",
            Category::Injection => "Injection",
            Category::Rootkits => "Rootkits",
            Category::Extraction => "Extraction",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How a tool is started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invocation {
    /// Plugin of the shared backing executable (`vol -f <img> -o <dir> <plugin_id>`).
    Internal { plugin_id: &'static str },
    /// Standalone executable called directly with its own arguments.
    External { binary: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolDescriptor {
    pub title: &'static str,
    pub description: &'static str,
    pub category: Category,
    pub invocation: Invocation,
    pub argument_template: &'static str,
}

impl ToolDescriptor {
    pub fn command_name(&self) -> &'static str {
        match self.invocation {
            Invocation::Internal { plugin_id } => plugin_id,
            Invocation::External { binary } => binary,
        }
    }
}

/// A descriptor whose placeholders have all been substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTool {
    pub tool: ToolDescriptor,
    pub resolved_arguments: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportMode {
    #[default]
    Pretty,
    Csv,
}

impl ExportMode {
    pub fn toggle(self) -> Self {
        match self {
            ExportMode::Pretty => ExportMode::Csv,
            ExportMode::Csv => ExportMode::Pretty,
        }
    }

    /// Extension of the saved output file.
    pub fn extension(self) -> &'static str {
        match self {
            ExportMode::Pretty => "txt",
            ExportMode::Csv => "csv",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExportMode::Pretty => "TXT",
            ExportMode::Csv => "CSV",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionConfig {
    /// Empty until the operator commits the settings form.
    pub memory_image_path: String,
    pub output_directory: String,
    pub export_mode: ExportMode,
}

impl SessionConfig {
    pub fn is_configured(&self) -> bool {
        !self.memory_image_path.is_empty()
    }
}

/// Everything a run needs, captured when the operator confirms a tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub tool: ResolvedTool,
    pub config: SessionConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStatus {
    Saved,
    Failed,
    WriteFailed(String),
    NotAttempted,
}

impl SaveStatus {
    pub fn message(&self) -> String {
        match self {
            SaveStatus::Saved => "Saved.".into(),
            SaveStatus::Failed => "Failed.".into(),
            SaveStatus::WriteFailed(reason) => format!("Save failed: {reason}"),
            SaveStatus::NotAttempted => "Not saved.".into(),
        }
    }

    pub fn succeeded(&self) -> bool {
        matches!(self, SaveStatus::Saved)
    }
}

/// One invocation, from the resolved binary to the saved file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRecord {
    pub tool: ResolvedTool,
    pub binary: String,
    pub binary_found: bool,
    pub command_line: String,
    pub combined_output: Vec<u8>,
    pub save_filename: String,
    pub save_path: PathBuf,
    pub save_status: SaveStatus,
}

/// Completion payload of a run. Success and failure share this type; only the text differs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub display: String,
    pub filename: String,
    pub record: RunRecord,
}

/// Events posted back to the UI thread.
#[derive(Debug, Clone)]
pub enum AppEvent {
    CommandFinished {
        // Box to keep AppEvent small; the captured output can be large.
        outcome: Box<CommandOutcome>,
    },
}
