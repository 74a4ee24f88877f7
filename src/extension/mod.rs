use anyhow::Result;
use futures_util::future::BoxFuture;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::emby::client::build_http_client;
use crate::emby::{config, Credentials, DeviceIdentity, EmbyClient, EmbyProvider, SessionManager};
use crate::models::{PlaylistsResponse, SongsResponse};
use crate::providers::MediaProvider;

pub const EVENT_GET_PLAYLISTS: &str = "get-playlists";
pub const EVENT_GET_PLAYLIST_SONGS: &str = "get-playlist-songs";

pub const MIN_HOST_VERSION: &str = "1.3.0";

type EventHandler = Box<dyn Fn(Value) -> BoxFuture<'static, Result<Value>> + Send + Sync>;

#[derive(Debug, Clone, Serialize)]
pub struct PreferenceField {
    pub key: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub default: &'static str,
    pub secret: bool,
}

/// The preference fields this bridge asks the host to register.
pub fn preference_schema() -> Vec<PreferenceField> {
    vec![
        PreferenceField {
            key: config::PREF_URL,
            title: "URL of Emby server",
            description: "Location at which your Emby/Jellyfin instance is hosted",
            default: config::DEFAULT_SERVER_URL,
            secret: false,
        },
        PreferenceField {
            key: config::PREF_USERNAME,
            title: "Username",
            description: "Username for your Emby/Jellyfin instance",
            default: "",
            secret: false,
        },
        PreferenceField {
            key: config::PREF_PASSWORD,
            title: "Password",
            description: "Password for your Emby/Jellyfin instance",
            default: "",
            secret: true,
        },
    ]
}

fn parse_version(version: &str) -> (u64, u64, u64) {
    let mut parts = version.trim().trim_start_matches('v').split('.');
    let mut next = || -> u64 {
        parts
            .next()
            .and_then(|part| part.parse().ok())
            .unwrap_or(0)
    };
    (next(), next(), next())
}

pub fn version_at_least(version: &str, minimum: &str) -> bool {
    parse_version(version) >= parse_version(minimum)
}

/// Glue between the host player and the Emby provider: owns the session,
/// keeps the event-handler table, and routes preference changes.
pub struct ExtensionShell {
    host_version: String,
    session: Arc<SessionManager>,
    provider: Arc<EmbyProvider>,
    handlers: RwLock<HashMap<String, EventHandler>>,
}

impl ExtensionShell {
    pub fn new(host_version: impl Into<String>) -> Self {
        let host_version = host_version.into();
        let http = build_http_client();
        let session = Arc::new(SessionManager::new(
            http.clone(),
            DeviceIdentity::new(),
            host_version.clone(),
        ));
        let client = EmbyClient::new(http, session.clone());
        let provider = Arc::new(EmbyProvider::new(session.clone(), client));

        Self {
            host_version,
            session,
            provider,
            handlers: RwLock::new(HashMap::new()),
        }
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    pub fn provider(&self) -> &Arc<EmbyProvider> {
        &self.provider
    }

    pub fn host_meets_min_version(&self) -> bool {
        version_at_least(&self.host_version, MIN_HOST_VERSION)
    }

    /// Host startup hook: stores the configured credentials, registers the
    /// event handlers and performs the initial login. Below the minimum
    /// host version the shell stays inert.
    pub async fn on_started(&self, initial: Credentials) {
        log::info!("Emby extension started");

        self.session.set_credentials(initial);

        if !self.host_meets_min_version() {
            log::warn!(
                "This extension was made for host version {} or above. Current version is {}",
                MIN_HOST_VERSION,
                self.host_version
            );
            return;
        }

        self.register_playlist_listeners().await;
        self.session.login().await;
    }

    async fn register_playlist_listeners(&self) {
        let provider = self.provider.clone();
        self.register(
            EVENT_GET_PLAYLISTS,
            Box::new(move |_payload| {
                let provider = provider.clone();
                Box::pin(async move {
                    let playlists = provider.get_playlists().await;
                    Ok(serde_json::to_value(PlaylistsResponse { playlists })?)
                })
            }),
        )
        .await;

        let provider = self.provider.clone();
        self.register(
            EVENT_GET_PLAYLIST_SONGS,
            Box::new(move |payload| {
                let provider = provider.clone();
                Box::pin(async move {
                    let playlist_id = payload.as_str().unwrap_or_default().to_string();
                    let songs = provider.get_playlist_songs(&playlist_id).await;
                    Ok(serde_json::to_value(SongsResponse { songs })?)
                })
            }),
        )
        .await;
    }

    pub async fn register(&self, event: &str, handler: EventHandler) {
        log::info!("Registering handler for event: {}", event);
        self.handlers.write().await.insert(event.to_string(), handler);
    }

    /// Runs the handler registered for `event`. Unknown events and handler
    /// failures yield None.
    pub async fn dispatch(&self, event: &str, payload: Value) -> Option<Value> {
        let handlers = self.handlers.read().await;
        let handler = match handlers.get(event) {
            Some(handler) => handler,
            None => {
                log::debug!("No handler registered for event: {}", event);
                return None;
            }
        };

        match handler(payload).await {
            Ok(value) => Some(value),
            Err(e) => {
                log::error!("Handler for {} failed: {}", event, e);
                None
            }
        }
    }

    /// Host preference-change hook. The credential update always lands; the
    /// re-login it triggers is gated on the host version.
    pub async fn on_preference_changed(&self, key: &str, value: &str) {
        if self.host_meets_min_version() {
            self.session.on_credentials_changed(key, value).await;
        } else {
            self.session.apply_preference(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_gate() {
        assert!(version_at_least("1.3.0", MIN_HOST_VERSION));
        assert!(version_at_least("1.3.1", MIN_HOST_VERSION));
        assert!(version_at_least("1.10.0", MIN_HOST_VERSION));
        assert!(version_at_least("2.0.0", MIN_HOST_VERSION));
        assert!(version_at_least("v1.4.0", MIN_HOST_VERSION));
        assert!(!version_at_least("1.2.9", MIN_HOST_VERSION));
        assert!(!version_at_least("0.9.0", MIN_HOST_VERSION));
        assert!(!version_at_least("", MIN_HOST_VERSION));
    }

    #[test]
    fn test_preference_schema_fields() {
        let schema = preference_schema();
        assert_eq!(schema.len(), 3);

        let url = &schema[0];
        assert_eq!(url.key, "emby_url");
        assert_eq!(url.default, "http://localhost:8096");
        assert!(!url.secret);

        assert_eq!(schema[1].key, "emby_username");
        assert!(schema[2].secret);
    }

    #[tokio::test]
    async fn test_inert_below_min_host_version() {
        let shell = ExtensionShell::new("1.2.0");
        shell
            .on_started(Credentials {
                server_url: "http://127.0.0.1:1".to_string(),
                username: "alice".to_string(),
                password: "hunter2".to_string(),
            })
            .await;

        // No handlers were registered, so events fall through.
        assert!(shell
            .dispatch(EVENT_GET_PLAYLISTS, Value::Null)
            .await
            .is_none());

        // Credentials are still stored for a later host upgrade.
        assert_eq!(shell.session().credentials().username, "alice");
    }

    #[tokio::test]
    async fn test_preference_change_updates_credentials_when_inert() {
        let shell = ExtensionShell::new("1.0.0");
        shell
            .on_preference_changed(config::PREF_URL, "http://media.local:8096")
            .await;
        shell.on_preference_changed("unknown_key", "ignored").await;

        assert_eq!(
            shell.session().credentials().server_url,
            "http://media.local:8096"
        );
    }

    #[tokio::test]
    async fn test_dispatch_unknown_event() {
        let shell = ExtensionShell::new("1.3.0");
        assert!(shell.dispatch("unknown-event", Value::Null).await.is_none());
    }
}
