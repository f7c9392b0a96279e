//! Steam partner web API client.

use serde::Deserialize;

use crate::SteamError;

const PARTNER_URL: &str = "https://partner.steam-api.com";

#[derive(Debug, Deserialize)]
struct SetBuildLiveResponse {
    response: SetBuildLiveResult,
}

#[derive(Debug, Deserialize)]
struct SetBuildLiveResult {
    result: i64,
}

/// Minimal client for the partner API endpoints the pipeline needs.
pub struct SteamApi {
    api_key: String,
    http: reqwest::Client,
}

impl SteamApi {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Sets an uploaded build live on a branch via `SetAppBuildLive`.
    ///
    /// Publishing to a public branch needs approval in the approver's Steam
    /// mobile app; the API signals that with HTTP 201 and the change does
    /// not apply until it is confirmed there.
    pub async fn set_build_live(
        &self,
        app_id: u32,
        branch: &str,
        build_id: u64,
        description: &str,
        approver_steam_id: Option<u64>,
    ) -> Result<(), SteamError> {
        tracing::info!(app_id, branch, build_id, "setting Steam build live");

        if approver_steam_id.is_none() {
            tracing::warn!(
                "approver_steam_id not set, deployments to public branches may \
                 require manual action in Steamworks"
            );
        }

        let mut form = vec![
            ("key", self.api_key.clone()),
            ("appid", app_id.to_string()),
            ("buildid", build_id.to_string()),
            ("betakey", branch.to_string()),
            ("description", description.to_string()),
        ];
        if let Some(steam_id) = approver_steam_id {
            form.push(("steamid", steam_id.to_string()));
        }

        let response = self
            .http
            .post(format!("{PARTNER_URL}/ISteamApps/SetAppBuildLive/v1"))
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 201 {
            if let Some(steam_id) = approver_steam_id {
                tracing::warn!(
                    steam_id,
                    "this deployment requires approval in the approver's Steam mobile app"
                );
            }
        } else if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SteamError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body: SetBuildLiveResponse = response.json().await?;
        if body.response.result != 1 {
            return Err(SteamError::Api {
                status: status.as_u16(),
                message: format!("SetAppBuildLive returned result {}", body.response.result),
            });
        }

        Ok(())
    }
}
