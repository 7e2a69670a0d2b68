//! Local filesystem image directory
//!
//! Files are published with a write-to-temp-then-rename sequence so a
//! reader never observes a partially written image under its final name.

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::config::StorageConfig;

/// Directory holding processed images, plus the URL prefix it is served under
#[derive(Debug, Clone)]
pub struct ImageDirectory {
    root: PathBuf,
    public_path: String,
}

impl ImageDirectory {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            root: config.image_dir.clone(),
            public_path: config.public_path.clone(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn public_path(&self) -> &str {
        &self.public_path
    }

    /// Create the directory (and parents) if it does not exist yet
    ///
    /// Safe to call repeatedly.
    pub async fn ensure_directory(&self) -> io::Result<()> {
        if fs::try_exists(&self.root).await? {
            debug!("Image directory '{}' already exists", self.root.display());
            return Ok(());
        }

        fs::create_dir_all(&self.root).await?;
        info!("Image directory '{}' created", self.root.display());
        Ok(())
    }

    /// Resolve the on-disk path for a bare filename
    pub fn path_for(&self, filename: &str) -> io::Result<PathBuf> {
        let is_bare = !filename.is_empty()
            && !filename.starts_with('.')
            && !filename.contains(['/', '\\'])
            && Path::new(filename).file_name().and_then(|n| n.to_str()) == Some(filename);

        if !is_bare {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("'{}' is not a bare filename", filename),
            ));
        }

        Ok(self.root.join(filename))
    }

    /// Write `data` to `<root>/<filename>`, replacing any existing file
    pub async fn write_atomic(&self, filename: &str, data: &[u8]) -> io::Result<PathBuf> {
        let target = self.path_for(filename)?;
        let staging = self
            .root
            .join(format!(".{}.{}.tmp", filename, Uuid::new_v4().simple()));

        if let Err(e) = fs::write(&staging, data).await {
            discard(&staging).await;
            return Err(e);
        }

        if let Err(e) = fs::rename(&staging, &target).await {
            discard(&staging).await;
            return Err(e);
        }

        debug!(
            path = %target.display(),
            bytes = data.len(),
            "Image written"
        );

        Ok(target)
    }
}

async fn discard(staging: &Path) {
    if let Err(e) = fs::remove_file(staging).await {
        if e.kind() != io::ErrorKind::NotFound {
            warn!("Failed to remove staging file {}: {}", staging.display(), e);
        }
    }
}
