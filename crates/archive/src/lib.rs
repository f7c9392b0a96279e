//! 7-Zip archive wrapper.
//!
//! Shells out to the `7z` CLI rather than pulling in a compression stack;
//! build machines have it installed anyway. Used to package staged builds
//! before uploading them to the package registry.

mod error;

use std::path::Path;

use gameci_process::{ProcessOutput, ProcessRunner, RunOptions};

pub use error::ArchiveError;

/// Creates zip archives through the `7z` CLI.
///
/// Assumes `7z` is on `PATH`.
#[derive(Debug, Clone, Default)]
pub struct Zipper {
    runner: ProcessRunner,
}

impl Zipper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a custom process runner, e.g. to redirect log files.
    pub fn with_runner(runner: ProcessRunner) -> Self {
        Self { runner }
    }

    /// Creates (or adds to) the zip archive at `zip_path`.
    ///
    /// `files` accepts the 7z CLI's path and wildcard syntax, relative to
    /// the working directory or absolute. `extra_args` are passed through
    /// to 7z verbatim; when absent a default compression level is applied,
    /// when present the caller picks the level themselves.
    pub async fn zip_files<S: AsRef<str>>(
        &self,
        zip_path: &Path,
        files: &[S],
        extra_args: Option<&[String]>,
    ) -> Result<ProcessOutput, ArchiveError> {
        let cmd = zip_command(zip_path, files, extra_args);
        tracing::debug!(command = ?cmd, "executing 7z");

        // 7z narrates every file it touches; keep that out of the captured
        // output but let it stream to the console and the log files.
        let options = RunOptions {
            capture_stdout: false,
            ..RunOptions::default()
        };
        Ok(self.runner.run(&cmd, &options).await?)
    }
}

/// Default compression level when the caller passes no extra arguments.
const DEFAULT_COMPRESSION: &str = "-mx=5";

fn zip_command<S: AsRef<str>>(
    zip_path: &Path,
    files: &[S],
    extra_args: Option<&[String]>,
) -> Vec<String> {
    let mut cmd = vec!["7z".to_string(), "a".to_string(), "-tzip".to_string()];

    match extra_args {
        None => cmd.push(DEFAULT_COMPRESSION.to_string()),
        Some(args) => cmd.extend_from_slice(args),
    }

    cmd.push(zip_path.to_string_lossy().into_owned());
    cmd.extend(files.iter().map(|f| f.as_ref().to_string()));
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_the_compression_level() {
        let cmd = zip_command(Path::new("out/build.zip"), &["Staged/*"], None);
        assert_eq!(cmd[..4], ["7z", "a", "-tzip", "-mx=5"]);
        assert_eq!(cmd[4], "out/build.zip");
        assert_eq!(cmd[5], "Staged/*");
    }

    #[test]
    fn extra_args_replace_the_default_compression() {
        let extra = vec!["-mx=9".to_string(), "-mmt=on".to_string()];
        let cmd = zip_command(Path::new("a.zip"), &["f.txt"], Some(&extra));

        assert!(cmd.contains(&"-mx=9".to_string()));
        assert!(cmd.contains(&"-mmt=on".to_string()));
        assert!(!cmd.contains(&"-mx=5".to_string()));
    }

    #[test]
    fn archive_path_precedes_the_file_list() {
        let cmd = zip_command(Path::new("a.zip"), &["one", "two"], None);
        let archive = cmd.iter().position(|a| a == "a.zip").unwrap();
        let first_file = cmd.iter().position(|a| a == "one").unwrap();
        assert!(archive < first_file);
        assert_eq!(cmd.last().unwrap(), "two");
    }
}
