//! Report converters for downstream CI tooling.
//!
//! Two independent, stateless transformations over captured tool output:
//!
//! - [`code_quality`] — scans MSVC-style compiler diagnostics out of a build
//!   log and emits Code Climate issues with stable fingerprints, accumulated
//!   into a single JSON report file across invocations.
//! - [`junit`] — converts the JSON test report written by the Unreal
//!   automation framework into a JUnit XML document that test dashboards
//!   understand.

pub mod code_quality;
mod error;
pub mod junit;

pub use code_quality::{CodeQualityIssue, generate_report, write_report};
pub use error::ReportError;
pub use junit::{TestRun, convert_test_report, write_junit_report};
