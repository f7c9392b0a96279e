//! Steam build upload and publishing helpers.
//!
//! [`SteamCmd`] drives the `steamcmd` CLI for authenticated build uploads
//! (2FA codes come from the external `steamcmd-2fa` helper), and
//! [`SteamApi`] talks to the partner web API to set an uploaded build live
//! on a branch.
//!
//! Credentials are expected to come from CI variables; never commit them.
//! Anybody holding the 2FA seed can mint login codes for the account.

mod api;
mod cmd;
mod error;

pub use api::SteamApi;
pub use cmd::{AppBuildOutcome, SteamCmd};
pub use error::SteamError;
