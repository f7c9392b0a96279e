//! Unreal automation test results to JUnit XML.
//!
//! The Unreal automation framework exports an `index.json` report; GitLab
//! and most dashboards want JUnit. One `<testcase>` is emitted per test,
//! with one `<failure>` child per `Error`-typed event.

use std::path::Path;

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use serde::Deserialize;

use crate::ReportError;

/// The test report written by `Automation RunTests`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRun {
    pub total_duration: serde_json::Number,
    pub tests: Vec<TestResult>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    /// Dot-delimited hierarchical test path, e.g. `Game.Combat.DamageFalloff`.
    pub full_test_path: String,
    pub duration: serde_json::Number,
    pub test_display_name: String,
    pub entries: Vec<TestEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TestEntry {
    pub event: TestEvent,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TestEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
}

/// Converts a parsed test run into a JUnit XML document.
pub fn convert_test_report(run: &TestRun) -> Result<String, ReportError> {
    let mut writer = Writer::new(Vec::new());

    let mut root = BytesStart::new("testsuites");
    root.push_attribute(("time", run.total_duration.to_string().as_str()));
    writer.write_event(Event::Start(root))?;

    for test in &run.tests {
        let suite = suite_name(&test.full_test_path);

        let mut case = BytesStart::new("testcase");
        case.push_attribute(("time", test.duration.to_string().as_str()));
        case.push_attribute(("suite_name", suite));
        // Duplicated as classname for consumers that group by class.
        case.push_attribute(("classname", suite));
        case.push_attribute(("name", test.test_display_name.as_str()));

        let failures: Vec<&str> = test
            .entries
            .iter()
            .filter(|entry| entry.event.kind == "Error")
            .map(|entry| entry.event.message.as_str())
            .collect();

        if failures.is_empty() {
            writer.write_event(Event::Empty(case))?;
            continue;
        }

        writer.write_event(Event::Start(case))?;
        for message in failures {
            let mut failure = BytesStart::new("failure");
            failure.push_attribute(("message", message));
            writer.write_event(Event::Start(failure))?;
            writer.write_event(Event::Text(BytesText::new(message)))?;
            writer.write_event(Event::End(BytesEnd::new("failure")))?;
        }
        writer.write_event(Event::End(BytesEnd::new("testcase")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("testsuites")))?;

    String::from_utf8(writer.into_inner()).map_err(|e| std::io::Error::other(e).into())
}

/// Reads the Unreal JSON report at `input` and writes the JUnit document to
/// `output`. Malformed input fails fast; nothing is written.
pub fn write_junit_report(input: &Path, output: &Path) -> Result<(), ReportError> {
    let raw = std::fs::read_to_string(input)?;
    // Unreal writes the report with a UTF-8 BOM.
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(&raw);

    let run: TestRun = serde_json::from_str(raw)?;
    let xml = convert_test_report(&run)?;

    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        tests = run.tests.len(),
        "writing JUnit report"
    );

    std::fs::write(output, xml)?;
    Ok(())
}

/// Everything but the final dot-segment of the full test path.
fn suite_name(full_test_path: &str) -> &str {
    full_test_path
        .rsplit_once('.')
        .map(|(suite, _)| suite)
        .unwrap_or("")
}
