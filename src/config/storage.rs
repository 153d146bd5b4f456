use std::env;
use std::path::PathBuf;

/// Upload storage configuration.
///
/// # Environment Variables
///
/// - `MEDIA_DIR`: directory for uploaded files (default: `./media`)
/// - `MEDIA_BASE_URL`: public URL prefix for serving uploads
///   (default: `http://localhost:4000/media`)
#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub media_dir: PathBuf,
    pub media_base_url: String,
}

impl StorageConfig {
    pub fn from_env() -> Self {
        Self {
            media_dir: env::var("MEDIA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./media")),
            media_base_url: env::var("MEDIA_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:4000/media".to_string()),
        }
    }
}
