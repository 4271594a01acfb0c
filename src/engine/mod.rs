mod binary;
mod exec;
mod plan;
mod report;
mod save;

pub use binary::Environment;
pub use plan::image_file_name;

use plan::CommandPlan;

use crate::model::{CommandOutcome, RunRecord, RunRequest, SaveStatus};

/// Turns a run request into one process invocation and its saved output.
pub struct CommandEngine {
    env: Environment,
}

impl CommandEngine {
    pub fn new(env: Environment) -> Self {
        Self { env }
    }

    pub async fn run(&self, request: RunRequest) -> CommandOutcome {
        let plan = CommandPlan::build(&request);

        let Some(binary) = self.env.resolve(&plan.binary_name) else {
            tracing::warn!(binary = %plan.binary_name, tool = request.tool.tool.title, "tool not found");
            let display = report::not_found(&plan.binary_name);
            let record = RunRecord {
                tool: request.tool,
                binary: plan.binary_name.clone(),
                binary_found: false,
                command_line: plan.command_line(&plan.binary_name),
                combined_output: display.clone().into_bytes(),
                save_filename: plan.save_filename,
                save_path: plan.save_path,
                save_status: SaveStatus::NotAttempted,
            };
            return CommandOutcome {
                display,
                filename: report::NOT_FOUND_FILENAME.to_string(),
                record,
            };
        };

        let command_line = plan.command_line(&binary.display);
        tracing::info!(command = %command_line, "launching");

        let captured = exec::run_captured(&binary.program, &plan.args, &self.env.cwd).await;
        let mut output = captured.output;

        let save_status = match captured.result {
            Ok(()) => {
                let dir = self.env.cwd.join(&plan.output_directory);
                let path = self.env.cwd.join(&plan.save_path);
                match save::write_output(&dir, &path, &output).await {
                    Ok(()) => {
                        tracing::info!(path = %path.display(), bytes = output.len(), "output saved");
                        SaveStatus::Saved
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %format!("{e:#}"), "saving output failed");
                        SaveStatus::WriteFailed(format!("{e:#}"))
                    }
                }
            }
            Err(e) => {
                tracing::warn!(command = %command_line, error = %e, "execution failed");
                if e.is_launch() {
                    if !output.is_empty() {
                        output.push(b'\n');
                    }
                    output.extend_from_slice(e.to_string().as_bytes());
                }
                SaveStatus::Failed
            }
        };

        let record = RunRecord {
            tool: request.tool,
            binary: binary.display,
            binary_found: true,
            command_line,
            combined_output: output,
            save_filename: plan.save_filename.clone(),
            save_path: plan.save_path,
            save_status,
        };
        CommandOutcome {
            display: report::render(&record, plan.export_mode),
            filename: plan.save_filename,
            record,
        }
    }
}
