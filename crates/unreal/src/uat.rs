//! RunUAT wrapper.

use gameci_process::{ProcessOutput, ProcessRunner, RunOptions};

use crate::{BuildCookRunArgs, Engine, EngineError, UatArgs};

/// Runs UAT (Unreal Automation Tool) tasks against a located engine.
///
/// The common commands have dedicated methods; anything else can be run
/// through [`Uat::exec`].
pub struct Uat {
    engine: Engine,
    runner: ProcessRunner,
}

impl Uat {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine,
            runner: ProcessRunner::new(),
        }
    }

    /// Uses a custom process runner, e.g. to redirect log files.
    pub fn with_runner(engine: Engine, runner: ProcessRunner) -> Self {
        Self { engine, runner }
    }

    /// Executes RunUAT with the given arguments.
    ///
    /// `-unattended` is appended so UAT never waits for input; with no
    /// arguments at all the task list is printed instead (the two flags
    /// are mutually exclusive).
    pub async fn exec<S: AsRef<str>>(&self, args: &[S]) -> Result<ProcessOutput, EngineError> {
        let mut cmd = vec![self.engine.uat_executable().to_string_lossy().into_owned()];
        cmd.extend(args.iter().map(|a| a.as_ref().to_string()));

        if args.is_empty() {
            cmd.push("-List".to_string());
        } else {
            cmd.push("-unattended".to_string());
        }

        tracing::debug!(command = ?cmd, "executing UAT");

        // UAT writes its own log files under Engine/Programs; ours would
        // only duplicate them.
        Ok(self.runner.run(&cmd, &RunOptions::no_log_files()).await?)
    }

    /// Runs `BuildCookRun` for a project with typed arguments.
    pub async fn build_cook_run(
        &self,
        project: &str,
        args: &BuildCookRunArgs,
    ) -> Result<ProcessOutput, EngineError> {
        self.exec(&build_cook_run_command(project, args)).await
    }

    /// Builds the game modules for a project.
    pub async fn build_game(
        &self,
        project: &str,
        platform: &str,
        configuration: &str,
        notools: bool,
        clean: bool,
    ) -> Result<ProcessOutput, EngineError> {
        self.exec(&build_game_command(project, platform, configuration, notools, clean))
            .await
    }

    /// Builds the editor modules for a project, always for the host
    /// platform in a development configuration.
    pub async fn build_editor(
        &self,
        project: &str,
        notools: bool,
        clean: bool,
    ) -> Result<ProcessOutput, EngineError> {
        self.exec(&build_editor_command(project, notools, clean)).await
    }
}

fn build_cook_run_command(project: &str, args: &BuildCookRunArgs) -> Vec<String> {
    // -project is required but kept separate from the argument struct.
    let mut cmd = vec!["BuildCookRun".to_string(), format!("-project={project}")];
    cmd.extend(args.to_args());
    cmd
}

fn build_game_command(
    project: &str,
    platform: &str,
    configuration: &str,
    notools: bool,
    clean: bool,
) -> Vec<String> {
    let mut cmd = vec![
        "BuildGame".to_string(),
        format!("-project={project}"),
        format!("-platform={platform}"),
        format!("-configuration={configuration}"),
    ];
    if notools {
        cmd.push("-notools".to_string());
    }
    if clean {
        cmd.push("-clean".to_string());
    }
    cmd
}

fn build_editor_command(project: &str, notools: bool, clean: bool) -> Vec<String> {
    let mut cmd = vec!["BuildEditor".to_string(), format!("-project={project}")];
    if notools {
        cmd.push("-notools".to_string());
    }
    if clean {
        cmd.push("-clean".to_string());
    }
    cmd
}
