use std::path::PathBuf;

use super::models::ServerKind;

pub const CLIENT_NAME: &str = "Embylink";

pub const PREF_URL: &str = "emby_url";
pub const PREF_USERNAME: &str = "emby_username";
pub const PREF_PASSWORD: &str = "emby_password";
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8096";

pub const REQUEST_TIMEOUT_SECONDS: u64 = 30;

pub const MAX_STREAMING_BITRATE: u64 = 140_000_000;
// Container negotiation list for the universal audio endpoint, already
// percent-encoded the way the server expects it.
pub const AUDIO_CONTAINERS: &str = "opus%2Cwebm%7Copus%2Cmp3%2Caac%2Cm4a%7Caac%2Cm4b%7Caac%2Cflac%2Cwebma%2Cwebm%7Cwebma%2Cwav%2Cogg";

pub fn get_data_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("embylink")
}

pub fn get_device_file_path() -> PathBuf {
    get_data_dir().join("device")
}

/// Icon shipped with the bridge, resolved by the host against the
/// extension's install directory.
pub fn get_icon_path(kind: ServerKind) -> String {
    format!("public/{}_icon.svg", kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_path_follows_server_kind() {
        assert_eq!(get_icon_path(ServerKind::Emby), "public/emby_icon.svg");
        assert_eq!(
            get_icon_path(ServerKind::Jellyfin),
            "public/jellyfin_icon.svg"
        );
    }
}
