//! glab CLI wrapper.

use std::sync::LazyLock;

use gameci_process::{ProcessOutput, ProcessRunner, RunOptions};
use regex::Regex;

use crate::{GitLabError, ci};

// glab exits zero on API calls even when the server answered with an HTTP
// error; the only trace is a line on stderr.
static API_ERROR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"glab:\s+([^(]*).*(HTTP \d{3})").unwrap());

/// An HTTP error glab reported on stderr despite a zero exit code.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub message: String,
    pub http_status: String,
}

/// Best-effort match of glab's free-form API error line.
///
/// This is the single place that knows the output format, so it can be
/// swapped out when glab changes without touching any caller.
pub fn api_error(stderr: &str) -> Option<ApiError> {
    let caps = API_ERROR.captures(stderr)?;
    Some(ApiError {
        message: caps[1].trim().to_string(),
        http_status: caps[2].to_string(),
    })
}

/// Per-call display toggles for [`GLab::exec`].
#[derive(Debug, Clone)]
pub struct ExecOptions {
    /// Mirror glab's stdout to the console.
    pub echo_stdout: bool,
    /// Mirror glab's stderr to the console.
    pub echo_stderr: bool,
    /// Persist the output to process log files.
    pub persist_log: bool,
}

impl Default for ExecOptions {
    fn default() -> Self {
        Self {
            echo_stdout: false,
            echo_stderr: false,
            persist_log: true,
        }
    }
}

/// Authenticated glab session.
///
/// Assumes the `glab` binary is on `PATH`.
pub struct GLab {
    hostname: String,
    runner: ProcessRunner,
}

impl GLab {
    /// Authenticates glab against `host` with a personal access token and
    /// returns the session wrapper.
    pub async fn login(host: &str, token: &str) -> Result<Self, GitLabError> {
        tracing::info!(host, "authenticating glab");

        let glab = Self {
            hostname: host.to_string(),
            runner: ProcessRunner::new(),
        };

        glab.exec(
            &[
                "auth",
                "login",
                "-h",
                host,
                "-t",
                token,
                "--api-protocol",
                "https",
            ],
            // Keep the token out of the process logs.
            &ExecOptions {
                persist_log: false,
                ..ExecOptions::default()
            },
        )
        .await?;

        Ok(glab)
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Executes glab with the given arguments.
    ///
    /// For `api` calls in CI mode the `:id` endpoint placeholder is filled
    /// in from the CI variables (glab cannot resolve it there itself), and
    /// stderr is checked for the HTTP error line glab hides behind a zero
    /// exit code.
    pub async fn exec<S: AsRef<str>>(
        &self,
        args: &[S],
        options: &ExecOptions,
    ) -> Result<ProcessOutput, GitLabError> {
        let mut cmd = vec!["glab".to_string()];
        cmd.extend(args.iter().map(|a| a.as_ref().to_string()));

        let is_api_call = args.first().is_some_and(|a| a.as_ref() == "api");
        if is_api_call && ci::is_ci() && cmd.len() > 2 {
            let replaced = replace_api_placeholders(&cmd[2], ci::project_id());
            tracing::debug!(from = %cmd[2], to = %replaced, "replacing api placeholders");
            cmd[2] = replaced;
        }

        tracing::debug!(command = ?cmd, "executing glab");

        let run_options = RunOptions {
            echo_stdout: options.echo_stdout,
            echo_stderr: options.echo_stderr,
            persist_log: options.persist_log,
            allow_nonzero_exit: true,
            ..RunOptions::default()
        };
        let output = self.runner.run(&cmd, &run_options).await?;

        if output.exit_code != 0 {
            let args: Vec<String> = args.iter().map(|a| a.as_ref().to_string()).collect();
            tracing::error!(
                ?args,
                exit_code = output.exit_code,
                stdout = %output.stdout,
                stderr = %output.stderr,
                "glab failed"
            );
            return Err(GitLabError::CommandFailed {
                args,
                exit_code: output.exit_code,
                stdout: output.stdout,
                stderr: output.stderr,
            });
        }

        // No successful HTTP status ends up on stderr, so any match here
        // is a real API failure.
        if is_api_call && !output.stderr.is_empty() {
            if let Some(error) = api_error(&output.stderr) {
                tracing::error!(
                    message = %error.message,
                    status = %error.http_status,
                    "glab API call failed"
                );
                return Err(GitLabError::Api {
                    message: error.message,
                    http_status: error.http_status,
                });
            }
        }

        Ok(output)
    }
}

/// Fills glab's `:id` endpoint placeholder with the project id.
fn replace_api_placeholders(endpoint: &str, project_id: u64) -> String {
    endpoint.replace(":id", &project_id.to_string())
}
