use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::models::{Album, Playlist, PlaybackType, Song};
use crate::providers::MediaProvider;

use super::client::EmbyClient;
use super::config;
use super::models::{AudioItem, CollectionItem, ItemsPage, ServerKind};
use super::session::{Session, SessionManager};

fn cover_image_url(base_url: &str, item_id: &str) -> String {
    let base = base_url.trim_end_matches('/');
    format!("{}/Items/{}/Images/Primary", base, item_id)
}

fn playback_url(base_url: &str, item_id: &str, session: &Session, device_id: &str) -> String {
    let base = base_url.trim_end_matches('/');
    format!(
        "{}/Audio/{}/universal?UserId={}&DeviceId={}&api_key={}&MaxStreamingBitrate={}&Container={}&TranscodingContainer=ts&TranscodingProtocol=hls&AudioCodec=aac&StartTimeTicks=0&EnableRedirection=true",
        base,
        item_id,
        session.user_id,
        device_id,
        session.access_token,
        config::MAX_STREAMING_BITRATE,
        config::AUDIO_CONTAINERS
    )
}

fn playlist_from_item(item: &CollectionItem, base_url: &str, kind: ServerKind) -> Playlist {
    Playlist {
        id: item.id.clone(),
        name: item.name.clone(),
        cover_path: Some(cover_image_url(base_url, &item.id)),
        icon: Some(config::get_icon_path(kind)),
    }
}

fn song_from_item(
    item: AudioItem,
    base_url: &str,
    session: &Session,
    device_id: &str,
    date_added: i64,
) -> Song {
    let album = Album {
        name: item.album.clone(),
        artist: item.album_artist.clone(),
        // The album art is addressed by its image tag, as the server hands
        // it out.
        cover_path: item
            .album_primary_image_tag
            .as_deref()
            .map(|tag| cover_image_url(base_url, tag)),
    };

    Song {
        playback_url: playback_url(base_url, &item.id, session, device_id),
        cover_path: Some(cover_image_url(base_url, &item.id)),
        duration: item.run_time_secs(),
        id: item.id,
        title: item.name,
        artists: item.artists,
        album,
        playback_type: PlaybackType::Url,
        date_added,
        icon: Some(config::get_icon_path(session.server_kind)),
    }
}

/// Translates the server's libraries, playlists and audio items into the
/// host's playlist/song model.
pub struct EmbyProvider {
    session: Arc<SessionManager>,
    client: EmbyClient,
    scanned: RwLock<Vec<Playlist>>,
}

impl EmbyProvider {
    pub fn new(session: Arc<SessionManager>, client: EmbyClient) -> Self {
        Self {
            session,
            client,
            scanned: RwLock::new(Vec::new()),
        }
    }

    /// The catalog produced by the last scan.
    pub fn scanned_libraries(&self) -> Vec<Playlist> {
        self.scanned.read().clone()
    }

    async fn fetch_music_libraries(&self, user_id: &str) -> Vec<CollectionItem> {
        let page: Option<ItemsPage<CollectionItem>> =
            self.client.get_user(Some(user_id), None, None, None).await;

        page.map(|page| {
            page.items
                .into_iter()
                .filter(|item| item.is_music_library())
                .collect()
        })
        .unwrap_or_default()
    }

    async fn fetch_playlists(&self, user_id: &str) -> Vec<CollectionItem> {
        let page: Option<ItemsPage<CollectionItem>> = self
            .client
            .get_user(
                Some(user_id),
                None,
                None,
                Some("?Recursive=true&IncludeItemTypes=playlist"),
            )
            .await;

        page.map(|page| page.items).unwrap_or_default()
    }

    /// Rescans the server: music libraries first, then playlists, in server
    /// order. The result becomes the current catalog snapshot.
    pub async fn get_libraries(&self) -> Vec<Playlist> {
        let session = self.session.snapshot();
        let base_url = self.session.base_url();

        let libraries = self.fetch_music_libraries(&session.user_id).await;
        let playlists = self.fetch_playlists(&session.user_id).await;

        let scanned: Vec<Playlist> = libraries
            .iter()
            .chain(playlists.iter())
            .map(|item| playlist_from_item(item, &base_url, session.server_kind))
            .collect();

        log::info!(
            "Scanned {} music libraries and {} playlists",
            libraries.len(),
            playlists.len()
        );

        *self.scanned.write() = scanned.clone();
        scanned
    }

    /// All audio items under the given library or playlist id.
    pub async fn get_library_content(&self, item_id: &str) -> Vec<Song> {
        let session = self.session.snapshot();
        let base_url = self.session.base_url();
        let device_id = self.session.device_id().await;

        let query = format!(
            "?ParentId={}&Recursive=true&IncludeItemTypes=Audio",
            urlencoding::encode(item_id)
        );
        let page: Option<ItemsPage<AudioItem>> = self
            .client
            .get_user(Some(&session.user_id), None, None, Some(&query))
            .await;

        let Some(page) = page else {
            return Vec::new();
        };

        let date_added = chrono::Utc::now().timestamp_millis();
        page.items
            .into_iter()
            .map(|item| song_from_item(item, &base_url, &session, &device_id, date_added))
            .collect()
    }
}

#[async_trait]
impl MediaProvider for EmbyProvider {
    fn id(&self) -> &str {
        "emby"
    }

    fn name(&self) -> &str {
        "Emby"
    }

    async fn get_playlists(&self) -> Vec<Playlist> {
        self.get_libraries().await
    }

    async fn get_playlist_songs(&self, playlist_id: &str) -> Vec<Song> {
        self.get_library_content(playlist_id).await
    }
}
