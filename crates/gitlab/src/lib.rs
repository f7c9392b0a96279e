//! GitLab helpers for release pipelines.
//!
//! Wraps the `glab` CLI for API access, generic package registry uploads
//! and release creation, plus typed accessors for the CI environment
//! variables the pipeline exports.

pub mod ci;
mod error;
mod glab;
mod release;

pub use error::GitLabError;
pub use glab::{ApiError, ExecOptions, GLab, api_error};
pub use release::{Package, PackageAsset, ReleaseAssetLink};
