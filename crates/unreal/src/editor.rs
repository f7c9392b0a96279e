//! UnrealEditor wrapper for commandlets and automation tests.

use gameci_process::{ProcessOutput, ProcessRunner, RunOptions};

use crate::{Engine, EngineError};

/// Flags that keep the headless editor non-interactive on a build machine.
const HEADLESS_FLAGS: &[&str] = &[
    "-unattended",
    "-buildmachine",
    "-stdout",
    "-nopause",
    "-nosplash",
    "-fullstdoutlogoutput",
];

/// Runs the editor executables of a located engine.
pub struct Editor {
    engine: Engine,
    runner: ProcessRunner,
}

impl Editor {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine,
            runner: ProcessRunner::new(),
        }
    }

    pub fn with_runner(engine: Engine, runner: ProcessRunner) -> Self {
        Self { engine, runner }
    }

    /// Executes `UnrealEditor-Cmd` for a project with the headless flag set.
    ///
    /// `nullrhi` disables rendering entirely, which most commandlets want
    /// on a machine without a GPU.
    pub async fn exec_cmd<S: AsRef<str>>(
        &self,
        project: &str,
        args: &[S],
        nullrhi: bool,
    ) -> Result<ProcessOutput, EngineError> {
        let mut cmd = vec![
            self.engine.editor_cmd_executable().to_string_lossy().into_owned(),
            project.to_string(),
        ];
        cmd.extend(HEADLESS_FLAGS.iter().map(|f| f.to_string()));
        if nullrhi {
            cmd.push("-nullrhi".to_string());
        }
        cmd.extend(args.iter().map(|a| a.as_ref().to_string()));

        tracing::debug!(command = ?cmd, "executing UnrealEditor-Cmd");
        Ok(self.runner.run(&cmd, &RunOptions::no_log_files()).await?)
    }

    /// Executes the full `UnrealEditor` binary with the given arguments.
    pub async fn exec<S: AsRef<str>>(&self, args: &[S]) -> Result<ProcessOutput, EngineError> {
        let mut cmd = vec![self.engine.editor_executable().to_string_lossy().into_owned()];
        cmd.extend(args.iter().map(|a| a.as_ref().to_string()));

        tracing::debug!(command = ?cmd, "executing UnrealEditor");
        Ok(self.runner.run(&cmd, &RunOptions::default()).await?)
    }

    /// Runs a commandlet (`-run=<name>`) for a project.
    pub async fn run_commandlet(
        &self,
        project: &str,
        commandlet: &str,
        args: &[String],
    ) -> Result<ProcessOutput, EngineError> {
        let mut cmd = vec![format!("-run={commandlet}")];
        cmd.extend_from_slice(args);
        self.exec_cmd(project, &cmd, true).await
    }

    /// Runs automation tests and exports the JSON report to `report_dir`.
    ///
    /// `test_filter` is the `+`-separated test name list understood by
    /// `Automation RunTests`. The exported report can be fed to
    /// `gameci-reports` for JUnit conversion.
    pub async fn run_tests(
        &self,
        project: &str,
        test_filter: &str,
        report_dir: &str,
    ) -> Result<ProcessOutput, EngineError> {
        let cmd = vec![
            format!("-ExecCmds=Automation RunTests {test_filter};quit"),
            "-TestExit=Automation Test Queue Empty".to_string(),
            format!("-ReportExportPath={report_dir}"),
        ];
        self.exec_cmd(project, &cmd, true).await
    }
}
