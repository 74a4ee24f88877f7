use serde::{Deserialize, Serialize};
use std::fmt;

/// The two server implementations sharing this API shape. Detected from the
/// authenticated user's policy, never configured directly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerKind {
    #[default]
    Emby,
    Jellyfin,
}

impl ServerKind {
    pub fn from_provider_id(provider_id: &str) -> Self {
        if provider_id.to_lowercase().contains("jellyfin") {
            ServerKind::Jellyfin
        } else {
            ServerKind::Emby
        }
    }
}

impl fmt::Display for ServerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerKind::Emby => write!(f, "emby"),
            ServerKind::Jellyfin => write!(f, "jellyfin"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuthenticationResult {
    pub user: EmbyUser,
    pub access_token: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EmbyUser {
    pub id: String,
    #[serde(default)]
    pub policy: UserPolicy,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct UserPolicy {
    pub authentication_provider_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ItemsPage<T> {
    #[serde(default)]
    pub items: Vec<T>,
}

/// A top-level collection folder or a playlist, depending on the query that
/// produced it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CollectionItem {
    pub id: String,
    pub name: String,
    pub collection_type: Option<String>,
}

impl CollectionItem {
    pub fn is_music_library(&self) -> bool {
        self.collection_type.as_deref() == Some("music")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AudioItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<String>,
    pub album: Option<String>,
    pub album_artist: Option<String>,
    pub album_primary_image_tag: Option<String>,
    pub run_time_ticks: Option<u64>,
}

impl AudioItem {
    /// RunTimeTicks are 100ns units.
    pub fn run_time_secs(&self) -> f64 {
        self.run_time_ticks.unwrap_or(0) as f64 / 10_000_000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_to_seconds() {
        let item = AudioItem {
            id: "a1".to_string(),
            name: "Track".to_string(),
            artists: vec![],
            album: None,
            album_artist: None,
            album_primary_image_tag: None,
            run_time_ticks: Some(2_160_000_000),
        };
        assert_eq!(item.run_time_secs(), 216.0);
    }

    #[test]
    fn test_missing_ticks_is_zero_seconds() {
        let item = AudioItem {
            id: "a1".to_string(),
            name: "Track".to_string(),
            artists: vec![],
            album: None,
            album_artist: None,
            album_primary_image_tag: None,
            run_time_ticks: None,
        };
        assert_eq!(item.run_time_secs(), 0.0);
    }

    #[test]
    fn test_server_kind_detection() {
        assert_eq!(
            ServerKind::from_provider_id("Jellyfin.Server.Implementations.Users.DefaultAuthenticationProvider"),
            ServerKind::Jellyfin
        );
        assert_eq!(
            ServerKind::from_provider_id("JELLYFIN.SERVER.AUTH"),
            ServerKind::Jellyfin
        );
        assert_eq!(
            ServerKind::from_provider_id("Emby.Server.Implementations.Library.DefaultAuthenticationProvider"),
            ServerKind::Emby
        );
        assert_eq!(ServerKind::from_provider_id(""), ServerKind::Emby);
    }

    #[test]
    fn test_collection_item_music_filter() {
        let json = r#"{"Id": "lib1", "Name": "Music", "CollectionType": "music"}"#;
        let item: CollectionItem = serde_json::from_str(json).unwrap();
        assert!(item.is_music_library());

        let json = r#"{"Id": "lib2", "Name": "Movies", "CollectionType": "movies"}"#;
        let item: CollectionItem = serde_json::from_str(json).unwrap();
        assert!(!item.is_music_library());

        let json = r#"{"Id": "pl1", "Name": "Mix"}"#;
        let item: CollectionItem = serde_json::from_str(json).unwrap();
        assert!(!item.is_music_library());
    }

    #[test]
    fn test_items_page_deserializes_audio() {
        let json = r#"{
            "Items": [{
                "Id": "t1",
                "Name": "Song One",
                "Artists": ["Artist A"],
                "Album": "Album A",
                "AlbumArtist": "Artist A",
                "AlbumPrimaryImageTag": "tag123",
                "RunTimeTicks": 2160000000
            }],
            "TotalRecordCount": 1
        }"#;
        let page: ItemsPage<AudioItem> = serde_json::from_str(json).unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].artists, vec!["Artist A"]);
        assert_eq!(page.items[0].album_primary_image_tag.as_deref(), Some("tag123"));
    }

    #[test]
    fn test_items_page_tolerates_missing_items() {
        let page: ItemsPage<AudioItem> = serde_json::from_str("{}").unwrap();
        assert!(page.items.is_empty());
    }
}
