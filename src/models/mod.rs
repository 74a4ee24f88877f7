use serde::{Deserialize, Serialize};

/// How the host should play a song. Everything this bridge produces is a
/// remote stream URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackType {
    #[serde(rename = "URL")]
    Url,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    #[serde(rename = "playlist_id")]
    pub id: String,
    #[serde(rename = "playlist_name")]
    pub name: String,
    #[serde(rename = "playlist_coverPath", skip_serializing_if = "Option::is_none")]
    pub cover_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Album {
    #[serde(rename = "album_name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "album_artist", skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(rename = "album_coverPath_high", skip_serializing_if = "Option::is_none")]
    pub cover_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Song {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub artists: Vec<String>,
    #[serde(rename = "song_coverPath_high", skip_serializing_if = "Option::is_none")]
    pub cover_path: Option<String>,
    pub album: Album,
    /// Duration in seconds.
    pub duration: f64,
    #[serde(rename = "playbackUrl")]
    pub playback_url: String,
    #[serde(rename = "type")]
    pub playback_type: PlaybackType,
    /// Unix milliseconds at translation time, not the server's date.
    pub date_added: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistsResponse {
    pub playlists: Vec<Playlist>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SongsResponse {
    pub songs: Vec<Song>,
}
