use parking_lot::RwLock;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use std::sync::Arc;

use crate::errors::BridgeError;

use super::config;
use super::device::DeviceIdentity;
use super::models::{AuthenticationResult, ServerKind};

#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub server_url: String,
    pub username: String,
    pub password: String,
}

/// Login state. Replaced wholesale on every successful login so concurrent
/// readers never observe a half-updated token/flavor pair.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub access_token: String,
    pub user_id: String,
    pub server_kind: ServerKind,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        !self.access_token.is_empty()
    }
}

fn auth_header(device_id: &str, host_version: &str) -> String {
    format!(
        "Emby Client=\"{}\", Device=\"{}\", DeviceId=\"{}\", Version=\"{}\"",
        config::CLIENT_NAME,
        std::env::consts::OS,
        device_id,
        host_version
    )
}

pub struct SessionManager {
    http: Client,
    device: DeviceIdentity,
    host_version: String,
    creds: RwLock<Credentials>,
    session: RwLock<Arc<Session>>,
}

impl SessionManager {
    pub fn new(http: Client, device: DeviceIdentity, host_version: String) -> Self {
        Self {
            http,
            device,
            host_version,
            creds: RwLock::new(Credentials::default()),
            session: RwLock::new(Arc::new(Session::default())),
        }
    }

    pub fn set_credentials(&self, creds: Credentials) {
        *self.creds.write() = creds;
    }

    pub fn credentials(&self) -> Credentials {
        self.creds.read().clone()
    }

    pub fn base_url(&self) -> String {
        self.creds.read().server_url.clone()
    }

    /// Current login snapshot. Callers hold it for the duration of one
    /// operation so token, user id and flavor stay consistent.
    pub fn snapshot(&self) -> Arc<Session> {
        self.session.read().clone()
    }

    pub async fn device_id(&self) -> String {
        self.device.get_or_create().await
    }

    /// Updates the credential field matching a known preference key.
    pub fn apply_preference(&self, key: &str, value: &str) {
        let mut creds = self.creds.write();
        match key {
            config::PREF_URL => creds.server_url = value.to_string(),
            config::PREF_USERNAME => creds.username = value.to_string(),
            config::PREF_PASSWORD => creds.password = value.to_string(),
            _ => {}
        }
    }

    /// Preference-change hook: stores the new value, then re-runs login with
    /// whatever credentials are current.
    pub async fn on_credentials_changed(&self, key: &str, value: &str) {
        self.apply_preference(key, value);
        self.login().await;
    }

    /// Logs in with the current credentials. Any failure is logged and
    /// leaves the existing session untouched.
    pub async fn login(&self) {
        log::info!("Logging in to emby");
        if let Err(e) = self.try_login().await {
            log::error!("Error while authenticating: {}", e);
        }
    }

    async fn try_login(&self) -> Result<(), BridgeError> {
        let creds = self.credentials();
        let base = creds.server_url.trim_end_matches('/').to_string();
        let header = auth_header(&self.device_id().await, &self.host_version);

        if self.snapshot().is_authenticated() {
            let url = format!("{}/Sessions/Logout", base);
            if let Err(e) = self.http.post(&url).send().await {
                log::warn!("Failed to logout: {}", e);
            }
        }

        let url = format!("{}/Users/AuthenticateByName", base);
        let body = serde_json::json!({
            "Username": creds.username,
            "Pw": creds.password,
        });

        let auth: AuthenticationResult = self
            .http
            .post(&url)
            .header(AUTHORIZATION, header)
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let server_kind =
            ServerKind::from_provider_id(&auth.user.policy.authentication_provider_id);

        let session = Session {
            access_token: auth.access_token,
            user_id: auth.user.id,
            server_kind,
        };
        log::info!(
            "Authenticated against {} server as user {}",
            server_kind,
            session.user_id
        );
        *self.session.write() = Arc::new(session);

        Ok(())
    }
}
