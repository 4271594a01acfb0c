//! Run lifecycle controller.
//!
//! Executes launch requests from the UI one at a time and posts each completion back as a
//! single [`AppEvent`].

use crate::engine::CommandEngine;
use crate::model::{AppEvent, CommandOutcome, RunRecord, RunRequest, SaveStatus};
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

/// Commands emitted by the UI layer.
#[derive(Debug, Clone)]
pub(crate) enum UiCommand {
    Launch(Box<RunRequest>),
    Quit,
}

/// Internal handle for the run in flight.
struct RunCtx {
    request: RunRequest,
    handle: Option<tokio::task::JoinHandle<CommandOutcome>>,
}

fn start_run(engine: &Arc<CommandEngine>, request: RunRequest) -> RunCtx {
    let engine = Arc::clone(engine);
    let task_request = request.clone();
    let handle = tokio::spawn(async move { engine.run(task_request).await });
    RunCtx {
        request,
        handle: Some(handle),
    }
}

/// Outcome used when the run task itself died; keeps the UI on the normal completion path.
fn join_failure(request: RunRequest, reason: String) -> CommandOutcome {
    let display = format!("ERROR: Run of '{}' aborted: {reason}", request.tool.tool.title);
    CommandOutcome {
        filename: "Error".to_string(),
        record: RunRecord {
            binary: request.tool.tool.command_name().to_string(),
            binary_found: false,
            command_line: String::new(),
            combined_output: display.clone().into_bytes(),
            save_filename: String::new(),
            save_path: PathBuf::new(),
            save_status: SaveStatus::NotAttempted,
            tool: request.tool,
        },
        display,
    }
}

/// Execute runs requested by the UI and emit their completions.
pub(crate) async fn run_controller(
    engine: CommandEngine,
    event_tx: UnboundedSender<AppEvent>,
    mut cmd_rx: UnboundedReceiver<UiCommand>,
) -> Result<()> {
    let engine = Arc::new(engine);
    let mut run_ctx: Option<RunCtx> = None;

    let res = loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UiCommand::Launch(request)) => {
                        if run_ctx.is_some() {
                            // The session cannot confirm a tool while running; refuse a second one.
                            tracing::warn!(tool = request.tool.tool.title, "run already in flight, launch ignored");
                            continue;
                        }
                        tracing::info!(tool = request.tool.tool.title, "run started");
                        run_ctx = Some(start_run(&engine, *request));
                    }
                    // In-flight children are neither awaited nor killed on quit.
                    Some(UiCommand::Quit) | None => break Ok(()),
                }
            }
            // Do not take the JoinHandle before this branch wins; otherwise it can be dropped
            // if another select branch is chosen, and we'll never observe completion.
            maybe_done = async {
                if let Some(ctx) = &mut run_ctx {
                    if let Some(h) = ctx.handle.as_mut() {
                        return Some(h.await);
                    }
                }
                futures::future::pending().await
            } => {
                if let Some(join_res) = maybe_done {
                    let Some(ctx) = run_ctx.take() else {
                        continue;
                    };
                    let outcome = match join_res {
                        Ok(outcome) => outcome,
                        Err(e) => {
                            tracing::warn!(error = %e, "run task failed");
                            join_failure(ctx.request, e.to_string())
                        }
                    };
                    if event_tx.send(AppEvent::CommandFinished { outcome: Box::new(outcome) }).is_err() {
                        break Ok(());
                    }
                }
            }
        }
    };

    res
}
