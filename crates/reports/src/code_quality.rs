//! Compiler diagnostics to Code Climate issues.
//!
//! Scans build output for MSVC-style diagnostic lines
//! (`path(line): warning C4100: description`) and converts each into a
//! [Code Climate](https://docs.gitlab.com/ee/ci/testing/code_quality.html)
//! issue GitLab can render on merge requests.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::ReportError;

/// One diagnostic in Code Climate form. Field names follow the report
/// format expected by the issue widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeQualityIssue {
    pub description: String,
    /// The compiler diagnostic code, e.g. `C4100`.
    pub check_name: String,
    /// Stable content hash identifying this issue across report runs.
    pub fingerprint: String,
    pub severity: String,
    pub location: IssueLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueLocation {
    /// Repo-relative path, forward slashes.
    pub path: String,
    pub lines: IssueLines,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueLines {
    /// 1-based line number.
    pub begin: u32,
}

/// All issues are reported at one severity; the widget only needs to show
/// them, warning-vs-error is visible in the description anyway.
const SEVERITY: &str = "minor";

static DIAGNOSTIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?P<path>.*?)\((?P<line>\d+)\): (?P<severity>warning|error) (?P<code>[A-Z]\d+): (?P<description>.*)",
    )
    .unwrap()
});

/// Scans `compiler_output` and returns one issue per diagnostic line, in
/// order of appearance. No matches is not an error — the vec is empty.
pub fn generate_report(compiler_output: &str) -> Vec<CodeQualityIssue> {
    DIAGNOSTIC
        .captures_iter(compiler_output)
        .map(|caps| {
            let line: u32 = caps["line"].parse().unwrap_or(0);
            let path = relative_to_cwd(caps["path"].trim());
            let code = &caps["code"];
            let description = &caps["description"];

            CodeQualityIssue {
                description: description.to_string(),
                check_name: code.to_string(),
                fingerprint: fingerprint(code, description, &path, line),
                severity: SEVERITY.to_string(),
                location: IssueLocation {
                    path,
                    lines: IssueLines { begin: line },
                },
            }
        })
        .collect()
}

/// Converts `compiler_output` and writes the report to `filepath`.
///
/// Without `overwrite_existing`, the existing JSON array in the file is
/// loaded and this run's report is appended as one more element, so the
/// file accumulates an array of per-run issue arrays across build steps.
/// Consumers flatten one level.
pub fn write_report(
    compiler_output: &str,
    filepath: &Path,
    overwrite_existing: bool,
) -> Result<(), ReportError> {
    let report = generate_report(compiler_output);
    tracing::info!(path = %filepath.display(), issues = report.len(), "writing code quality report");

    let mut content: Vec<serde_json::Value> = Vec::new();
    if !overwrite_existing && filepath.exists() {
        content = serde_json::from_str(&std::fs::read_to_string(filepath)?)?;
    }
    content.push(serde_json::to_value(&report)?);

    std::fs::write(filepath, serde_json::to_string_pretty(&content)?)?;
    Ok(())
}

/// Makes a diagnostic path repo-relative with forward slashes. Paths
/// outside the working directory are kept as-is, just slash-normalized.
fn relative_to_cwd(path: &str) -> String {
    let normalized = path.replace('\\', "/");
    if let Ok(cwd) = std::env::current_dir() {
        let cwd = format!("{}/", cwd.to_string_lossy().replace('\\', "/"));
        if let Some(relative) = normalized.strip_prefix(&cwd) {
            return relative.to_string();
        }
    }
    normalized
}

/// 128-bit hex digest over the identifying fields. Deterministic for a
/// given (code, description, path, line), so re-running the same build
/// reproduces the same fingerprint.
fn fingerprint(code: &str, description: &str, path: &str, line: u32) -> String {
    let mut hasher = Sha256::new();
    hasher.update(code.as_bytes());
    hasher.update(description.as_bytes());
    hasher.update(path.as_bytes());
    hasher.update(line.to_string().as_bytes());
    hex::encode(&hasher.finalize()[..16])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_a_single_diagnostic() {
        let output = "src/foo.cpp(42): error C1234: bad thing\n";
        let report = generate_report(output);

        assert_eq!(report.len(), 1);
        let issue = &report[0];
        assert_eq!(issue.check_name, "C1234");
        assert_eq!(issue.description, "bad thing");
        assert_eq!(issue.severity, "minor");
        assert_eq!(issue.location.lines.begin, 42);
        assert!(issue.location.path.ends_with("src/foo.cpp"));
    }

    #[test]
    fn normalizes_backslash_paths() {
        let output = r"Source\Game\Player.cpp(7): warning C4100: unused parameter";
        let report = generate_report(output);

        assert_eq!(report.len(), 1);
        assert_eq!(report[0].location.path, "Source/Game/Player.cpp");
    }

    #[test]
    fn paths_outside_the_working_directory_stay_absolute() {
        let output = r"C:\BuildAgent\work\Other\Thing.cpp(3): warning C4100: unused";
        let report = generate_report(output);

        assert_eq!(report.len(), 1);
        assert_eq!(report[0].location.path, "C:/BuildAgent/work/Other/Thing.cpp");
    }

    #[test]
    fn warnings_and_errors_share_the_reported_severity() {
        let output = "a.cpp(1): warning C4100: w\nb.cpp(2): error C2065: e\n";
        let report = generate_report(output);

        assert_eq!(report.len(), 2);
        assert!(report.iter().all(|i| i.severity == "minor"));
        assert_eq!(report[0].check_name, "C4100");
        assert_eq!(report[1].check_name, "C2065");
    }

    #[test]
    fn unmatched_output_yields_an_empty_report() {
        let report = generate_report("LogInit: Display: all good\n");
        assert!(report.is_empty());
    }

    #[test]
    fn fingerprint_is_stable_across_runs() {
        let output = "src/foo.cpp(42): error C1234: bad thing\n";
        let first = generate_report(output);
        let second = generate_report(output);
        assert_eq!(first[0].fingerprint, second[0].fingerprint);
    }

    #[test]
    fn fingerprint_changes_with_the_line_number() {
        let a = generate_report("src/foo.cpp(42): error C1234: bad thing\n");
        let b = generate_report("src/foo.cpp(43): error C1234: bad thing\n");
        assert_ne!(a[0].fingerprint, b[0].fingerprint);
    }

    #[test]
    fn issue_serializes_with_the_expected_field_names() {
        let report = generate_report("src/foo.cpp(42): error C1234: bad thing\n");
        let value = serde_json::to_value(&report[0]).unwrap();

        assert_eq!(value["check_name"], "C1234");
        assert_eq!(value["location"]["lines"]["begin"], 42);
        assert!(value["fingerprint"].as_str().unwrap().len() == 32);
    }

    #[test]
    fn write_report_appends_one_array_per_invocation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gl-code-quality-report.json");
        let output = "src/foo.cpp(42): error C1234: bad thing\n";

        write_report(output, &path, false).unwrap();
        write_report(output, &path, false).unwrap();

        let content: Vec<Vec<CodeQualityIssue>> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(content.len(), 2);
        assert_eq!(content[0].len(), 1);
        assert_eq!(content[1].len(), 1);
    }

    #[test]
    fn write_report_overwrite_discards_previous_runs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let output = "src/foo.cpp(42): error C1234: bad thing\n";

        write_report(output, &path, false).unwrap();
        write_report(output, &path, true).unwrap();

        let content: Vec<Vec<CodeQualityIssue>> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(content.len(), 1);
    }
}
