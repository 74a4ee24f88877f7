use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

use super::config;
use super::session::SessionManager;

pub fn build_http_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(config::REQUEST_TIMEOUT_SECONDS))
        .build()
        .unwrap_or_else(|e| {
            log::warn!("HTTP client builder failed ({}), using defaults", e);
            Client::new()
        })
}

/// Collapses runs of '/' down to a single one, leaving the scheme's "://"
/// intact.
fn collapse_slashes(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if c == '/' {
            let bytes = out.as_bytes();
            if bytes.len() >= 2
                && bytes[bytes.len() - 1] == b'/'
                && bytes[bytes.len() - 2] != b':'
            {
                continue;
            }
        }
        out.push(c);
    }
    out
}

fn assemble_url(
    base_url: &str,
    user_id: Option<&str>,
    authenticated: bool,
    item_id: Option<&str>,
    custom_path: Option<&str>,
    query: Option<&str>,
) -> String {
    let mut url = base_url.to_string();

    if let Some(user_id) = user_id {
        if authenticated {
            url.push_str(&format!("/Users/{}/", user_id));
        }
    }

    url.push_str(&format!(
        "Items/{}/{}",
        item_id.unwrap_or(""),
        custom_path.unwrap_or("")
    ));

    let mut url = collapse_slashes(&url);
    if let Some(query) = query {
        url.push_str(query);
    }
    url
}

/// Request plumbing for the server's user/item namespace.
pub struct EmbyClient {
    http: Client,
    session: Arc<SessionManager>,
}

impl EmbyClient {
    pub fn new(http: Client, session: Arc<SessionManager>) -> Self {
        Self { http, session }
    }

    /// Authenticated GET returning the decoded body. Any failure (network,
    /// status, decode) is logged and yields None.
    pub async fn get_user<T: DeserializeOwned>(
        &self,
        user_id: Option<&str>,
        item_id: Option<&str>,
        custom_path: Option<&str>,
        query: Option<&str>,
    ) -> Option<T> {
        let session = self.session.snapshot();
        let url = assemble_url(
            &self.session.base_url(),
            user_id,
            session.is_authenticated(),
            item_id,
            custom_path,
            query,
        );

        log::debug!("Sending request to {}", url);

        let mut request = self.http.get(&url).header(CONTENT_TYPE, "application/json");
        if session.is_authenticated() {
            request = request
                .header("X-Emby-Token", &session.access_token)
                .header("X-Emby-Authorization", &session.access_token);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                log::error!("Request to {} failed: {}", url, e);
                return None;
            }
        };

        let response = match response.error_for_status() {
            Ok(response) => response,
            Err(e) => {
                log::error!("Request to {} failed: {}", url, e);
                return None;
            }
        };

        match response.json::<T>().await {
            Ok(body) => Some(body),
            Err(e) => {
                log::error!("Failed to decode response from {}: {}", url, e);
                None
            }
        }
    }
}
