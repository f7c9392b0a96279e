//! steamcmd CLI wrapper.

use std::path::Path;
use std::sync::LazyLock;

use gameci_process::{ProcessOutput, ProcessRunner, RunOptions};
use regex::Regex;

use crate::SteamError;

/// First stdout line steamcmd prints after updating itself. The command it
/// was asked to run did not execute in that case.
const UPDATE_BANNER: &str = "Update complete, launching Steamcmd...";

static BUILD_FINISHED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Successfully finished AppID \d+ build \(BuildID (\d+)\)").unwrap()
});

/// Result of an app build run: the raw process output plus the uploaded
/// build id, when steamcmd reported one.
#[derive(Debug, Clone)]
pub struct AppBuildOutcome {
    pub output: ProcessOutput,
    pub build_id: Option<u64>,
}

/// Drives `steamcmd` with an authenticated session.
///
/// Assumes `steamcmd` and the `steamcmd-2fa` helper are on `PATH`.
pub struct SteamCmd {
    username: String,
    password: String,
    seed: String,
    runner: ProcessRunner,
}

impl SteamCmd {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        seed: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            seed: seed.into(),
            runner: ProcessRunner::new(),
        }
    }

    pub fn with_runner(mut self, runner: ProcessRunner) -> Self {
        self.runner = runner;
        self
    }

    /// Generates a fresh login code from the account's 2FA seed via the
    /// `steamcmd-2fa` helper.
    pub async fn generate_code(&self) -> Result<String, SteamError> {
        let cmd = [
            "steamcmd-2fa",
            "-u",
            &self.username,
            "-p",
            &self.password,
            "-s",
            &self.seed,
            "-c",
        ];
        let output = self
            .runner
            .run(&cmd, &RunOptions::quiet().allow_nonzero_exit(true))
            .await?;

        if output.exit_code != 0 {
            return Err(SteamError::TwoFactor {
                exit_code: output.exit_code,
                output: output.stdout,
            });
        }

        Ok(output.stdout.trim().to_string())
    }

    /// Executes steamcmd with the given `+commands`, wrapped in a fresh
    /// authenticated session.
    ///
    /// A non-zero exit is returned rather than raised — steamcmd exit codes
    /// are unreliable and callers inspect the output instead. If steamcmd
    /// updated itself instead of running the command, the session is rerun
    /// with a fresh code.
    pub async fn exec<S: AsRef<str>>(&self, args: &[S]) -> Result<ProcessOutput, SteamError> {
        loop {
            let code = self.generate_code().await?;
            let cmd = session_command(&self.username, &self.password, &code, args);

            tracing::debug!(argc = cmd.len(), "executing steamcmd");

            let output = self
                .runner
                .run(&cmd, &RunOptions::default().allow_nonzero_exit(true))
                .await?;

            if output.stdout.starts_with(UPDATE_BANNER) {
                tracing::debug!("steamcmd updated itself, rerunning command");
                continue;
            }

            return Ok(output);
        }
    }

    /// Runs an app build from a Steamworks build script and extracts the
    /// uploaded build id from the output.
    ///
    /// Preview builds are validated locally and not uploaded, so they never
    /// yield a build id.
    pub async fn run_app_build(
        &self,
        build_script: &Path,
        description: Option<&str>,
        preview: bool,
    ) -> Result<AppBuildOutcome, SteamError> {
        tracing::info!(script = %build_script.display(), preview, "running Steam app build");

        let script = std::path::absolute(build_script)
            .unwrap_or_else(|_| build_script.to_path_buf());
        let command = app_build_command(&script, description, preview);

        let output = self.exec(&[command]).await?;
        let build_id = parse_build_id(&output.stdout);

        if let Some(build_id) = build_id {
            tracing::info!(build_id, "Steam build uploaded");
        }

        Ok(AppBuildOutcome { output, build_id })
    }
}

/// Builds the steamcmd argv: login and session setup, the caller's
/// `+commands`, then `+quit`. Each `+command` travels as one argv element;
/// steamcmd tokenizes them itself, which is why the password stays quoted
/// inside the login element.
fn session_command<S: AsRef<str>>(
    username: &str,
    password: &str,
    code: &str,
    args: &[S],
) -> Vec<String> {
    let mut cmd = vec![
        "steamcmd".to_string(),
        format!("+login {username} \"{password}\" {code}"),
        "+api_logging 1 1".to_string(),
        "+set_spew_level 4 4".to_string(),
        "+@ShutdownOnFailedCommand 1".to_string(),
    ];
    cmd.extend(args.iter().map(|a| a.as_ref().to_string()));
    cmd.push("+quit".to_string());
    cmd
}

fn app_build_command(script: &Path, description: Option<&str>, preview: bool) -> String {
    let mut command = "+run_app_build".to_string();
    if preview {
        command.push_str(" -preview");
    }
    if let Some(description) = description {
        command.push_str(&format!(" -desc \"{description}\""));
    }
    command.push_str(&format!(" \"{}\"", script.display()));
    command
}

fn parse_build_id(stdout: &str) -> Option<u64> {
    BUILD_FINISHED
        .captures(stdout)
        .and_then(|caps| caps.get(1))
        .and_then(|id| id.as_str().parse().ok())
}
