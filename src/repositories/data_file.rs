use std::io::ErrorKind;
use std::path::PathBuf;

use serde::{Serialize, de::DeserializeOwned};

use crate::error::{AppError, Result};

/// Reads and writes the site's JSON data files.
#[derive(Clone)]
pub struct DataStore {
    root: PathBuf,
}

impl DataStore {
    /// Creates a new `DataStore` rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty()
            || name.contains("..")
            || name.contains('/')
            || name.contains('\\')
        {
            return Err(AppError::Validation(format!("Invalid data file name: {}", name)));
        }
        Ok(self.root.join(name))
    }

    /// Reads and parses a data file.
    ///
    /// # Arguments
    ///
    /// * `name` - The file name inside the data directory.
    /// * `default` - Returned when the file does not exist.
    ///
    /// # Returns
    ///
    /// The parsed document, or an error if the file cannot be read or parsed.
    pub async fn read_data_file<T: DeserializeOwned>(&self, name: &str, default: T) -> Result<T> {
        let path = self.path_for(name)?;

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("📄 Data file {} not found, using default", name);
                return Ok(default);
            }
            Err(e) => return Err(AppError::Io(e)),
        };

        sonic_rs::from_slice(&bytes)
            .map_err(|e| AppError::DataFile(format!("{}: {}", name, e)))
    }

    /// Serializes `value` and replaces the data file with it.
    pub async fn write_data_file<T: Serialize>(&self, name: &str, value: &T) -> Result<()> {
        let path = self.path_for(name)?;
        let bytes = sonic_rs::to_vec(value)
            .map_err(|e| AppError::DataFile(format!("{}: {}", name, e)))?;

        tokio::fs::create_dir_all(&self.root).await?;

        let tmp = self.root.join(format!(".{}.tmp", name));
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &path).await?;

        tracing::info!("✅ Data file {} written ({} bytes)", name, bytes.len());
        Ok(())
    }
}
