//! Typed accessors for GitLab CI environment variables.
//!
//! The pipeline exports these lowercased (see the project CI templates),
//! which also keeps local runs from accidentally picking up the uppercase
//! variables GitLab itself injects.

fn var(name: &str) -> String {
    std::env::var(name).unwrap_or_default()
}

/// Whether we are running inside a CI job.
pub fn is_ci() -> bool {
    var("ci") == "1"
}

/// GitLab project ID of the current job, `0` outside CI.
pub fn project_id() -> u64 {
    var("ci_project_id").parse().unwrap_or(0)
}

pub fn project_title() -> String {
    var("ci_project_title")
}

pub fn project_url() -> String {
    var("ci_project_url")
}

/// Branch name. Empty for merge request and tag pipelines; use
/// [`commit_ref_name`] there.
pub fn commit_branch() -> String {
    var("ci_commit_branch")
}

pub fn commit_ref_name() -> String {
    var("ci_commit_ref_name")
}

pub fn commit_message() -> String {
    var("ci_commit_message")
}

pub fn commit_sha() -> String {
    var("ci_commit_sha")
}

pub fn commit_short_sha() -> String {
    var("ci_commit_short_sha")
}

pub fn pipeline_id() -> i64 {
    var("ci_pipeline_id").parse().unwrap_or(-1)
}

pub fn pipeline_url() -> String {
    var("ci_pipeline_url")
}

pub fn job_id() -> i64 {
    var("ci_job_id").parse().unwrap_or(-1)
}

pub fn job_name() -> String {
    var("ci_job_name")
}

pub fn job_url() -> String {
    var("ci_job_url")
}
