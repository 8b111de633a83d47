//! Physical file storage for filedepot.
//!
//! Files live directly under the storage directory, named by file ID.
//! Uploads are first written to a staging directory inside it so the final
//! placement is a rename on the same filesystem:
//!
//! ```text
//! {base_path}/
//! ├── .staging/
//! │   └── upload-Xa91k2      (in-flight upload)
//! └── 3f2c8a9e-...           (placed file)
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempPath;
use tokio::io::AsyncWriteExt;

use crate::Result;

const STAGING_DIR: &str = ".staging";

/// File storage rooted at a single directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    base_path: PathBuf,
    staging_path: PathBuf,
}

impl FileStorage {
    /// Create a new FileStorage with the given base path.
    ///
    /// The base and staging directories are created if they don't exist.
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self> {
        let base_path = base_path.into();
        let staging_path = base_path.join(STAGING_DIR);
        fs::create_dir_all(&staging_path)?;

        Ok(Self {
            base_path,
            staging_path,
        })
    }

    /// Get the base path of this storage.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Get the staging directory.
    pub fn staging_path(&self) -> &Path {
        &self.staging_path
    }

    /// Storage directory as recorded in file metadata.
    pub fn dir(&self) -> String {
        self.base_path.to_string_lossy().into_owned()
    }

    /// Open a new temporary file in the staging directory.
    ///
    /// The file is removed when the returned value (or the `TempPath` it
    /// finishes into) is dropped without being persisted.
    pub fn stage(&self) -> Result<StagedFile> {
        let named = tempfile::Builder::new()
            .prefix("upload-")
            .tempfile_in(&self.staging_path)?;
        let (file, path) = named.into_parts();

        Ok(StagedFile {
            file: tokio::fs::File::from_std(file),
            path,
            bytes_written: 0,
        })
    }

    /// Remove files left in the staging directory by an earlier run.
    ///
    /// Returns the number of files removed.
    pub fn cleanup_staging(&self) -> Result<usize> {
        let mut removed = 0;

        for entry in fs::read_dir(&self.staging_path)?.flatten() {
            let path = entry.path();
            if path.is_file() && fs::remove_file(&path).is_ok() {
                removed += 1;
            }
        }

        Ok(removed)
    }
}

/// An upload being written to the staging directory.
#[derive(Debug)]
pub struct StagedFile {
    file: tokio::fs::File,
    path: TempPath,
    bytes_written: u64,
}

impl StagedFile {
    /// Append a chunk to the staged file.
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> Result<()> {
        self.file.write_all(chunk).await?;
        self.bytes_written += chunk.len() as u64;
        Ok(())
    }

    /// Number of bytes written so far.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Location of the staged file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush and close the file, keeping only the self-deleting path.
    pub async fn finish(mut self) -> Result<TempPath> {
        self.file.flush().await?;
        self.file.sync_all().await?;
        Ok(self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_storage() -> (TempDir, FileStorage) {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path().join("uploaded")).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_new_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let storage_path = temp_dir.path().join("storage");

        let storage = FileStorage::new(&storage_path).unwrap();

        assert!(storage_path.is_dir());
        assert!(storage.staging_path().is_dir());
        assert_eq!(storage.base_path(), storage_path);
        assert_eq!(storage.dir(), storage_path.to_string_lossy());
    }

    #[tokio::test]
    async fn test_stage_write_and_finish() {
        let (_temp_dir, storage) = setup_storage();

        let mut staged = storage.stage().unwrap();
        staged.write_chunk(b"Hello, ").await.unwrap();
        staged.write_chunk(b"World!").await.unwrap();
        assert_eq!(staged.bytes_written(), 13);
        assert!(staged.path().starts_with(storage.staging_path()));

        let path = staged.finish().await.unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"Hello, World!");
    }

    #[tokio::test]
    async fn test_dropped_stage_is_removed() {
        let (_temp_dir, storage) = setup_storage();

        let mut staged = storage.stage().unwrap();
        staged.write_chunk(b"partial").await.unwrap();
        let path = staged.path().to_path_buf();
        assert!(path.exists());

        drop(staged);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_finished_path_persists_to_destination() {
        let (_temp_dir, storage) = setup_storage();

        let mut staged = storage.stage().unwrap();
        staged.write_chunk(&[0xAB; 4096]).await.unwrap();
        let temp_path = staged.finish().await.unwrap();

        let dest = storage.base_path().join("file-id");
        temp_path.persist(&dest).unwrap();

        assert_eq!(fs::read(&dest).unwrap().len(), 4096);
        assert_eq!(fs::read_dir(storage.staging_path()).unwrap().count(), 0);
    }

    #[test]
    fn test_cleanup_staging() {
        let (_temp_dir, storage) = setup_storage();

        fs::write(storage.staging_path().join("upload-left1"), b"x").unwrap();
        fs::write(storage.staging_path().join("upload-left2"), b"y").unwrap();

        assert_eq!(storage.cleanup_staging().unwrap(), 2);
        assert_eq!(storage.cleanup_staging().unwrap(), 0);
    }
}
