//! File storage abstraction for uploaded media.
//!
//! Resumes and avatars are stored behind a trait so the backend can be
//! swapped (local filesystem, S3, MinIO) without touching handlers.
//! Thumbnail generation is not part of this layer.

use std::fmt;
use std::path::PathBuf;
use tokio::fs;

/// Abstract trait for file storage backends.
pub trait FileStorage: Send + Sync {
    /// Save file content under `key` and return the storage key.
    ///
    /// Keys are relative paths such as `resumes/abc-123.pdf`.
    fn save<'a>(
        &'a self,
        key: &'a str,
        content: &'a [u8],
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<String, StorageError>> + Send + 'a>>;

    /// Delete a file by key. Deleting a missing file is not an error.
    fn delete<'a>(
        &'a self,
        key: &'a str,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<(), StorageError>> + Send + 'a>>;

    /// Public URL for accessing a stored file.
    fn get_url(&self, key: &str) -> Result<String, StorageError>;
}

/// Error type for file storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// I/O error (file system or similar).
    IoError(std::io::Error),

    /// File not found.
    NotFound,

    /// Invalid storage key format.
    InvalidKey(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "I/O error: {}", e),
            Self::NotFound => write!(f, "File not found"),
            Self::InvalidKey(msg) => write!(f, "Invalid storage key: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        Self::IoError(e)
    }
}

/// Local filesystem-based storage.
///
/// Files live under `base_dir` and are served from `base_url`.
#[derive(Clone)]
pub struct LocalFileStorage {
    base_dir: PathBuf,
    base_url: String,
}

impl LocalFileStorage {
    pub fn new(base_dir: PathBuf, base_url: String) -> Self {
        Self { base_dir, base_url }
    }

    /// Reject empty keys, absolute paths, and path traversal.
    fn validate_key(key: &str) -> Result<(), StorageError> {
        if key.is_empty() || key.contains("..") || key.starts_with('/') {
            return Err(StorageError::InvalidKey(
                "Key must not be empty, contain '..', or start with '/'".to_string(),
            ));
        }
        Ok(())
    }
}

impl FileStorage for LocalFileStorage {
    fn save<'a>(
        &'a self,
        key: &'a str,
        content: &'a [u8],
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<String, StorageError>> + Send + 'a>>
    {
        Box::pin(async move {
            Self::validate_key(key)?;

            let path = self.base_dir.join(key);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).await?;
            }
            fs::write(&path, content).await?;

            Ok(key.to_string())
        })
    }

    fn delete<'a>(
        &'a self,
        key: &'a str,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<(), StorageError>> + Send + 'a>>
    {
        Box::pin(async move {
            Self::validate_key(key)?;

            let path = self.base_dir.join(key);
            match fs::remove_file(&path).await {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            }
        })
    }

    fn get_url(&self, key: &str) -> Result<String, StorageError> {
        Self::validate_key(key)?;
        Ok(format!("{}/{}", self.base_url.trim_end_matches('/'), key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> LocalFileStorage {
        LocalFileStorage::new(
            std::env::temp_dir().join("jobdesk-storage-test"),
            "http://localhost:4000/media".to_string(),
        )
    }

    #[test]
    fn test_validate_key_rejects_traversal() {
        assert!(LocalFileStorage::validate_key("../etc/passwd").is_err());
        assert!(LocalFileStorage::validate_key("/absolute").is_err());
        assert!(LocalFileStorage::validate_key("").is_err());
        assert!(LocalFileStorage::validate_key("resumes/ok.pdf").is_ok());
    }

    #[test]
    fn test_get_url_joins_base() {
        let url = storage().get_url("resumes/a.pdf").unwrap();
        assert_eq!(url, "http://localhost:4000/media/resumes/a.pdf");
    }

    #[tokio::test]
    async fn test_save_and_delete_roundtrip() {
        let storage = storage();
        let key = format!("test/{}.txt", uuid::Uuid::new_v4());

        let saved = storage.save(&key, b"hello").await.unwrap();
        assert_eq!(saved, key);

        storage.delete(&key).await.unwrap();
        // Deleting again is a no-op, not an error.
        storage.delete(&key).await.unwrap();
    }
}
