use crate::domain::ports::Storage;
use crate::utils::error::{Result, ShowtimeError};
use std::path::Path;

/// Reads lookup files relative to a base directory.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = Path::new(&self.base_path).join(path);
        match tokio::fs::read(&full_path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ShowtimeError::LookupFileMissing {
                    path: full_path.display().to_string(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }
}
