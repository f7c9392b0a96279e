//! Unreal Engine install discovery and command wrappers.
//!
//! [`Engine`] locates an engine installation (environment variable override
//! first, then the default Epic Games install directory) and hands out
//! wrappers for the two executables CI cares about: [`Uat`] for RunUAT
//! build/cook/package tasks and [`Editor`] for commandlets and automation
//! tests. All invocations funnel through `gameci-process`.

pub mod args;
mod editor;
mod engine;
mod error;
mod uat;

pub use args::{BuildCookRunArgs, UatArgs};
pub use editor::Editor;
pub use engine::Engine;
pub use error::EngineError;
pub use uat::Uat;
