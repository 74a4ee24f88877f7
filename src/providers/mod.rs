use crate::models::{Playlist, Song};
use async_trait::async_trait;

/// A remote music source the host can browse. Results are best effort: a
/// source that cannot reach its server returns empty collections rather
/// than an error.
#[async_trait]
pub trait MediaProvider: Send + Sync {
    /// Unique identifier (e.g., "emby")
    fn id(&self) -> &str;

    /// User-friendly name
    fn name(&self) -> &str;

    /// All browsable playlists, libraries included.
    async fn get_playlists(&self) -> Vec<Playlist>;

    /// Songs under the given playlist or library id.
    async fn get_playlist_songs(&self, playlist_id: &str) -> Vec<Song>;
}
