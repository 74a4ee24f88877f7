use std::path::PathBuf;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::config;

/// Persistent random identifier presented to the server to distinguish
/// client installations. Loaded once per process and cached.
pub struct DeviceIdentity {
    path: PathBuf,
    cached: Mutex<Option<String>>,
}

impl Default for DeviceIdentity {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceIdentity {
    pub fn new() -> Self {
        Self::with_path(config::get_device_file_path())
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path,
            cached: Mutex::new(None),
        }
    }

    /// Returns the stored device id, generating and persisting a fresh one
    /// when none exists. At most one read and one write touch the disk per
    /// process; the write is not awaited.
    pub async fn get_or_create(&self) -> String {
        let mut cached = self.cached.lock().await;
        if let Some(id) = cached.as_ref() {
            return id.clone();
        }

        let mut id = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) => {
                log::warn!("Failed to open {:?}: {}", self.path, e);
                String::new()
            }
        };

        if id.is_empty() {
            id = Uuid::new_v4().to_string();
            let path = self.path.clone();
            let value = id.clone();
            tokio::spawn(async move {
                if let Some(parent) = path.parent() {
                    let _ = tokio::fs::create_dir_all(parent).await;
                }
                if let Err(e) = tokio::fs::write(&path, value.as_bytes()).await {
                    log::warn!("Failed to write device id to {:?}: {}", path, e);
                }
            });
        }

        *cached = Some(id.clone());
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_device_path() -> PathBuf {
        std::env::temp_dir().join(format!("embylink-device-{}", Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_reads_existing_identity() {
        let path = temp_device_path();
        tokio::fs::write(&path, "existing-device-id").await.unwrap();

        let identity = DeviceIdentity::with_path(path.clone());
        assert_eq!(identity.get_or_create().await, "existing-device-id");

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn test_generates_and_caches_identity() {
        let path = temp_device_path();
        let identity = DeviceIdentity::with_path(path.clone());

        let first = identity.get_or_create().await;
        assert!(!first.is_empty());

        // A second call must come from the cache, so even deleting the
        // backing file cannot change the answer.
        let _ = tokio::fs::remove_file(&path).await;
        let second = identity.get_or_create().await;
        assert_eq!(first, second);

        let _ = tokio::fs::remove_file(&path).await;
    }
}
