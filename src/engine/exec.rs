use std::io;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

const READ_CHUNK: usize = 8 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    #[error("could not launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("reading process output failed: {0}")]
    Capture(#[source] io::Error),
    #[error("process exited with {0}")]
    Exit(ExitStatus),
}

impl ExecError {
    /// Launch errors leave nothing in the captured stream, so they get a diagnostic line there.
    pub fn is_launch(&self) -> bool {
        matches!(self, ExecError::Launch { .. })
    }
}

/// Merged stdout/stderr of one process plus how it ended.
#[derive(Debug)]
pub struct Captured {
    pub output: Vec<u8>,
    pub result: Result<(), ExecError>,
}

/// Run `program` in `cwd`, collecting stdout and stderr into one buffer in arrival order.
pub async fn run_captured(program: &Path, args: &[String], cwd: &Path) -> Captured {
    let mut child = match Command::new(program)
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(source) => {
            return Captured {
                output: Vec::new(),
                result: Err(ExecError::Launch {
                    program: program.display().to_string(),
                    source,
                }),
            }
        }
    };

    let mut stdout = child.stdout.take();
    let mut stderr = child.stderr.take();
    let mut output = Vec::new();
    let mut capture_error = None;
    let mut out_buf = [0u8; READ_CHUNK];
    let mut err_buf = [0u8; READ_CHUNK];

    loop {
        tokio::select! {
            read = read_chunk(&mut stdout, &mut out_buf), if stdout.is_some() => {
                match read {
                    Ok(0) => stdout = None,
                    Ok(n) => output.extend_from_slice(&out_buf[..n]),
                    Err(e) => {
                        capture_error.get_or_insert(e);
                        stdout = None;
                    }
                }
            }
            read = read_chunk(&mut stderr, &mut err_buf), if stderr.is_some() => {
                match read {
                    Ok(0) => stderr = None,
                    Ok(n) => output.extend_from_slice(&err_buf[..n]),
                    Err(e) => {
                        capture_error.get_or_insert(e);
                        stderr = None;
                    }
                }
            }
            else => break,
        }
    }

    let result = match (child.wait().await, capture_error) {
        (Err(e), _) | (Ok(_), Some(e)) => Err(ExecError::Capture(e)),
        (Ok(status), None) if status.success() => Ok(()),
        (Ok(status), None) => Err(ExecError::Exit(status)),
    };

    Captured { output, result }
}

async fn read_chunk<R: AsyncRead + Unpin>(pipe: &mut Option<R>, buf: &mut [u8]) -> io::Result<usize> {
    match pipe {
        Some(reader) => reader.read(buf).await,
        None => futures::future::pending().await,
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stdout_and_stderr_are_merged() {
        let sh = which::which("sh").unwrap();
        let cwd = std::env::temp_dir();
        let captured = run_captured(
            &sh,
            &["-c".to_string(), "echo out; echo err 1>&2".to_string()],
            &cwd,
        )
        .await;
        assert!(captured.result.is_ok());
        let text = String::from_utf8_lossy(&captured.output);
        assert!(text.contains("out\n"));
        assert!(text.contains("err\n"));
    }

    #[tokio::test]
    async fn nonzero_exit_is_an_error_but_output_is_kept() {
        let sh = which::which("sh").unwrap();
        let cwd = std::env::temp_dir();
        let captured = run_captured(
            &sh,
            &["-c".to_string(), "echo partial; exit 3".to_string()],
            &cwd,
        )
        .await;
        assert!(matches!(captured.result, Err(ExecError::Exit(_))));
        assert_eq!(String::from_utf8_lossy(&captured.output), "partial\n");
    }

    #[tokio::test]
    async fn missing_program_is_a_launch_error() {
        let cwd = std::env::temp_dir();
        let captured =
            run_captured(Path::new("/nonexistent/voltas-test-binary"), &[], &cwd).await;
        let err = captured.result.unwrap_err();
        assert!(err.is_launch());
        assert!(captured.output.is_empty());
    }
}
