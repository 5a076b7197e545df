/*!
 * Persistence collaborator for the movement collection.
 *
 * The service is agnostic to the storage medium: it loads the full ordered
 * collection once at startup and writes it back wholesale after every
 * mutation. Implementations must preserve order losslessly.
 */

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::errors::ServiceError;
use crate::models::Movement;

/// Load/save pair over an ordered movement collection.
#[async_trait]
pub trait MovementStore: Send + Sync {
    async fn load(&self) -> Result<Vec<Movement>, ServiceError>;
    async fn save(&self, movements: &[Movement]) -> Result<(), ServiceError>;
}

/// JSON-document store backed by a single file on disk.
///
/// Writes go to a temp file in the same directory followed by a rename, so
/// a crash mid-write never corrupts the document. A missing file loads as
/// an empty collection.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut tmp = self.path.as_os_str().to_owned();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl MovementStore for JsonFileStore {
    async fn load(&self) -> Result<Vec<Movement>, ServiceError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => {
                let movements: Vec<Movement> = serde_json::from_slice(&bytes)?;
                info!(
                    count = movements.len(),
                    path = %self.path.display(),
                    "loaded movement collection"
                );
                Ok(movements)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "no movement document yet, starting empty");
                Ok(Vec::new())
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn save(&self, movements: &[Movement]) -> Result<(), ServiceError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let json = serde_json::to_vec_pretty(movements)?;
        let tmp = self.tmp_path();
        tokio::fs::write(&tmp, &json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!(count = movements.len(), path = %self.path.display(), "persisted movements");
        Ok(())
    }
}

/// In-memory store for tests and ephemeral deployments.
#[derive(Default)]
pub struct InMemoryStore {
    movements: Mutex<Vec<Movement>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(movements: Vec<Movement>) -> Self {
        Self {
            movements: Mutex::new(movements),
        }
    }
}

#[async_trait]
impl MovementStore for InMemoryStore {
    async fn load(&self) -> Result<Vec<Movement>, ServiceError> {
        Ok(self.movements.lock().expect("store lock poisoned").clone())
    }

    async fn save(&self, movements: &[Movement]) -> Result<(), ServiceError> {
        *self.movements.lock().expect("store lock poisoned") = movements.to_vec();
        Ok(())
    }
}
