//! External tool execution for CI scripts.
//!
//! Every build, cook, upload and release step in the pipeline ultimately
//! shells out to some external executable (RunUAT, steamcmd, glab, 7z).
//! This crate is the single funnel for those invocations: it spawns the
//! process with separate stdout/stderr pipes, drains both streams
//! concurrently (draining one to completion first can deadlock once the
//! other fills its OS pipe buffer), optionally mirrors lines to the
//! console, and persists the captured output to timestamped log files.

mod error;
mod runner;

pub use error::ProcessError;
pub use runner::{DEFAULT_LOG_DIR, ProcessOutput, ProcessRunner, RunOptions};
