use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

use crate::errors::AppError;
use crate::models::follow::Follow;

const USER_AGENT: &str = concat!("Comick RSS Generator/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Thin client for the Comick API. One outbound call per inbound request,
/// no retries; failures surface immediately as [`AppError`]s.
#[derive(Debug, Clone)]
pub struct ComickClient {
    http: Client,
    base: Url,
}

impl ComickClient {
    pub fn new(base: Url) -> Self {
        let http = match Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
        {
            Ok(client) => client,
            Err(e) => {
                log::error!("Failed to build HTTP client, using defaults: {}", e);
                Client::new()
            }
        };
        ComickClient { http, base }
    }

    /// Fetch the raw follow list for a user. Upstream 404 maps to
    /// [`AppError::UserNotFound`]; any other non-success status maps to
    /// [`AppError::UpstreamStatus`].
    pub async fn fetch_follows(&self, user_id: &str) -> Result<Vec<Follow>, AppError> {
        let url = format!(
            "{}/user/{}/follows",
            self.base.as_str().trim_end_matches('/'),
            user_id
        );

        let response = self.http.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(AppError::UserNotFound);
        }
        if !response.status().is_success() {
            log::warn!(
                "Got non-success response for user {}: {}",
                user_id,
                response.status()
            );
            return Err(AppError::UpstreamStatus(response.status().as_u16()));
        }

        let follows: Vec<Follow> = response.json().await?;
        log::info!("Fetched {} follows for user {}", follows.len(), user_id);
        Ok(follows)
    }
}
