use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Writes files below a base directory on the local file system.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

async fn write_then_rename(partial: &OsString, full_path: &Path, data: &[u8]) -> Result<()> {
    tokio::fs::write(partial, data).await?;
    tokio::fs::rename(partial, full_path).await?;
    Ok(())
}

impl Storage for LocalStorage {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<PathBuf> {
        let full_path = self.base_path.join(path);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // a partial download never replaces an existing file
        let mut partial = full_path.clone().into_os_string();
        partial.push(".part");

        if let Err(e) = write_then_rename(&partial, &full_path, data).await {
            if let Err(cleanup) = tokio::fs::remove_file(&partial).await {
                tracing::debug!("Could not remove {:?}: {}", partial, cleanup);
            }
            return Err(e);
        }

        Ok(full_path)
    }
}
