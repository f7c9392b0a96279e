//! Subprocess invocation with concurrent stdout/stderr draining.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;

use crate::ProcessError;

/// Default directory for persisted process logs, relative to the working
/// directory. Kept inside a dot-folder so project checkouts can ignore it
/// with a single rule.
pub const DEFAULT_LOG_DIR: &str = ".gameci/process_logs";

/// The outcome of one external command execution.
///
/// Created fresh per invocation and not retained by the runner.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub exit_code: i32,
    /// Full captured stdout. Empty when capture was disabled.
    pub stdout: String,
    /// Full captured stderr. Empty when capture was disabled.
    pub stderr: String,
}

/// Per-invocation toggles. All fields are independent.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Mirror stdout lines to the console as they arrive.
    pub echo_stdout: bool,
    /// Mirror stderr lines to the console as they arrive.
    pub echo_stderr: bool,
    /// Retain stdout lines into the returned [`ProcessOutput`].
    pub capture_stdout: bool,
    /// Retain stderr lines into the returned [`ProcessOutput`].
    pub capture_stderr: bool,
    /// Write the captured streams to timestamped files in the log directory.
    pub persist_log: bool,
    /// Return the output on a non-zero exit instead of failing with
    /// [`ProcessError::NonZeroExit`].
    pub allow_nonzero_exit: bool,
}

impl Default for RunOptions {
    /// Echo and capture both streams, persist logs, fail on non-zero exit.
    fn default() -> Self {
        Self {
            echo_stdout: true,
            echo_stderr: true,
            capture_stdout: true,
            capture_stderr: true,
            persist_log: true,
            allow_nonzero_exit: false,
        }
    }
}

impl RunOptions {
    /// Capture-only options: nothing is echoed to the console and no log
    /// files are written. Used by wrappers that post-process the output.
    pub fn quiet() -> Self {
        Self {
            echo_stdout: false,
            echo_stderr: false,
            persist_log: false,
            ..Self::default()
        }
    }

    /// Default options minus log persistence.
    pub fn no_log_files() -> Self {
        Self {
            persist_log: false,
            ..Self::default()
        }
    }

    pub fn allow_nonzero_exit(mut self, allow: bool) -> Self {
        self.allow_nonzero_exit = allow;
        self
    }
}

/// Executes external commands.
///
/// The log directory is carried on the runner value so parallel consumers
/// (or parallel test runs) can point at different directories without
/// touching shared state.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    log_dir: PathBuf,
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessRunner {
    /// Runner writing logs to [`DEFAULT_LOG_DIR`].
    pub fn new() -> Self {
        Self {
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
        }
    }

    /// Runner writing logs to a custom directory.
    pub fn with_log_dir(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: log_dir.into(),
        }
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// Runs `command`, draining stdout and stderr concurrently until both
    /// streams close, then waits for the exit status.
    ///
    /// `command[0]` is the executable; the remaining elements are passed
    /// verbatim as separate arguments, never through a shell. Blocks the
    /// caller until the process exits; a hung process hangs the caller.
    pub async fn run<S: AsRef<str>>(
        &self,
        command: &[S],
        options: &RunOptions,
    ) -> Result<ProcessOutput, ProcessError> {
        let Some((program, args)) = command.split_first() else {
            return Err(ProcessError::EmptyCommand);
        };
        let program = program.as_ref();
        let started = chrono::Local::now();

        tracing::debug!(program, argc = command.len(), "spawning process");

        let mut child = Command::new(program)
            .args(args.iter().map(|a| a.as_ref()))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ProcessError::Launch {
                program: program.to_string(),
                source,
            })?;

        let stdout_pipe = child
            .stdout
            .take()
            .ok_or_else(|| std::io::Error::other("child stdout was not piped"))?;
        let stderr_pipe = child
            .stderr
            .take()
            .ok_or_else(|| std::io::Error::other("child stderr was not piped"))?;

        // Both pipes must be drained at the same time: a child that fills
        // the un-drained pipe's OS buffer blocks until someone reads it.
        let (stdout, stderr) = tokio::try_join!(
            drain_stream(
                stdout_pipe,
                options.echo_stdout,
                options.capture_stdout,
                false
            ),
            drain_stream(
                stderr_pipe,
                options.echo_stderr,
                options.capture_stderr,
                true
            ),
        )?;

        // Wait only after both streams hit EOF so no trailing output is lost.
        let status = child.wait().await?;
        let exit_code = status.code().unwrap_or(-1);

        if options.persist_log {
            let stamp = started.format("%Y-%m-%d_%H.%M.%S");
            let exe_name = Path::new(program)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| program.to_string());

            tokio::fs::create_dir_all(&self.log_dir).await?;
            tokio::fs::write(
                self.log_dir.join(format!("{exe_name}_{stamp}_stdout.txt")),
                &stdout,
            )
            .await?;
            tokio::fs::write(
                self.log_dir.join(format!("{exe_name}_{stamp}_stderr.txt")),
                &stderr,
            )
            .await?;
        }

        if exit_code != 0 && !options.allow_nonzero_exit {
            tracing::warn!(program, exit_code, "process failed");
            return Err(ProcessError::NonZeroExit {
                program: program.to_string(),
                exit_code,
                stdout,
                stderr,
            });
        }

        tracing::debug!(program, exit_code, "process finished");

        Ok(ProcessOutput {
            exit_code,
            stdout,
            stderr,
        })
    }
}

/// Reads one pipe line-by-line until EOF, echoing and/or accumulating each
/// line. Line order within the stream is preserved.
async fn drain_stream<R: AsyncRead + Unpin>(
    pipe: R,
    echo: bool,
    capture: bool,
    is_stderr: bool,
) -> std::io::Result<String> {
    let mut lines = BufReader::new(pipe).lines();
    let mut buffer = String::new();

    while let Some(line) = lines.next_line().await? {
        if echo {
            if is_stderr {
                eprintln!("{line}");
            } else {
                println!("{line}");
            }
        }
        if capture {
            buffer.push_str(&line);
            buffer.push('\n');
        }
    }

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn empty_command_fails_without_spawning() {
        let runner = ProcessRunner::new();
        let result = runner.run::<String>(&[], &RunOptions::quiet()).await;
        assert!(matches!(result, Err(ProcessError::EmptyCommand)));
    }

    #[tokio::test]
    async fn missing_executable_is_a_launch_error() {
        let runner = ProcessRunner::new();
        let result = runner
            .run(&cmd(&["gameci-no-such-binary"]), &RunOptions::quiet())
            .await;
        assert!(matches!(result, Err(ProcessError::Launch { .. })));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn captures_stdout_of_successful_command() {
        let runner = ProcessRunner::new();
        let output = runner
            .run(
                &cmd(&["sh", "-c", "printf 'one\\ntwo\\n'"]),
                &RunOptions::quiet(),
            )
            .await
            .unwrap();
        assert_eq!(output.exit_code, 0);
        assert_eq!(output.stdout, "one\ntwo\n");
        assert_eq!(output.stderr, "");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn captures_stderr_separately_from_stdout() {
        let runner = ProcessRunner::new();
        let output = runner
            .run(
                &cmd(&["sh", "-c", "echo out; echo err 1>&2"]),
                &RunOptions::quiet(),
            )
            .await
            .unwrap();
        assert_eq!(output.stdout, "out\n");
        assert_eq!(output.stderr, "err\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn nonzero_exit_fails_by_default() {
        let runner = ProcessRunner::new();
        let result = runner
            .run(&cmd(&["sh", "-c", "echo boom; exit 3"]), &RunOptions::quiet())
            .await;
        match result {
            Err(ProcessError::NonZeroExit {
                exit_code, stdout, ..
            }) => {
                assert_eq!(exit_code, 3);
                // Output captured before the failure stays available.
                assert_eq!(stdout, "boom\n");
            }
            other => panic!("expected NonZeroExit, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn nonzero_exit_is_returned_when_tolerated() {
        let runner = ProcessRunner::new();
        let output = runner
            .run(
                &cmd(&["sh", "-c", "exit 7"]),
                &RunOptions::quiet().allow_nonzero_exit(true),
            )
            .await
            .unwrap();
        assert_eq!(output.exit_code, 7);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn capture_can_be_suppressed_per_stream() {
        let runner = ProcessRunner::new();
        let options = RunOptions {
            capture_stdout: false,
            ..RunOptions::quiet()
        };
        let output = runner
            .run(&cmd(&["sh", "-c", "echo out; echo err 1>&2"]), &options)
            .await
            .unwrap();
        assert_eq!(output.stdout, "");
        assert_eq!(output.stderr, "err\n");
    }

    // A child that interleaves heavy writes on both streams would deadlock
    // a sequential reader once either pipe buffer fills (~64 KiB). Both
    // streams must come back complete and in per-stream order.
    #[cfg(unix)]
    #[tokio::test]
    async fn heavy_dual_stream_output_does_not_deadlock() {
        let script = r#"
            i=0
            while [ $i -lt 5000 ]; do
                echo "out $i"
                echo "err $i" 1>&2
                i=$((i+1))
            done
        "#;
        let runner = ProcessRunner::new();
        let output = runner
            .run(&cmd(&["sh", "-c", script]), &RunOptions::quiet())
            .await
            .unwrap();

        let out_lines: Vec<&str> = output.stdout.lines().collect();
        let err_lines: Vec<&str> = output.stderr.lines().collect();
        assert_eq!(out_lines.len(), 5000);
        assert_eq!(err_lines.len(), 5000);
        assert_eq!(out_lines[0], "out 0");
        assert_eq!(out_lines[4999], "out 4999");
        assert_eq!(err_lines[4999], "err 4999");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn persists_both_streams_to_log_files() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ProcessRunner::with_log_dir(dir.path());
        let options = RunOptions {
            echo_stdout: false,
            echo_stderr: false,
            ..RunOptions::default()
        };
        runner
            .run(&cmd(&["sh", "-c", "echo logged; echo oops 1>&2"]), &options)
            .await
            .unwrap();

        let mut names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names.len(), 2);
        assert!(names[1].starts_with("sh_") && names[1].ends_with("_stdout.txt"));
        assert!(names[0].starts_with("sh_") && names[0].ends_with("_stderr.txt"));

        let stdout_log = std::fs::read_to_string(dir.path().join(&names[1])).unwrap();
        assert_eq!(stdout_log, "logged\n");
        let stderr_log = std::fs::read_to_string(dir.path().join(&names[0])).unwrap();
        assert_eq!(stderr_log, "oops\n");
    }
}
