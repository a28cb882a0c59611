//! One-file-per-record JSON persistence with atomic writes.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use lexplain_core::DocumentRecord;
use tracing::info;

use crate::StoreError;

/// By-identifier persistence of processed documents.
///
/// A save is all-or-nothing at document granularity.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Persist a record, assigning and returning its identifier.
    async fn save(&self, record: DocumentRecord) -> Result<u64, StoreError>;

    /// Load a record by identifier.
    async fn load(&self, id: u64) -> Result<DocumentRecord, StoreError>;
}

/// Directory-backed store: `{id}.json` per record.
///
/// Writes are staged through a temporary file in the same directory and
/// moved into place by atomic rename, so readers never observe a
/// half-written record. Identifiers continue from the highest one found
/// on disk at open.
pub struct JsonFileStore {
    dir: PathBuf,
    next_id: AtomicU64,
}

impl JsonFileStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn open(dir: &Path) -> Result<Self, StoreError> {
        std::fs::create_dir_all(dir)?;

        let mut max_id = 0u64;
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json")
                && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
                && let Ok(id) = stem.parse::<u64>()
            {
                max_id = max_id.max(id);
            }
        }

        info!(dir = %dir.display(), next_id = max_id + 1, "opened document store");
        Ok(Self {
            dir: dir.to_path_buf(),
            next_id: AtomicU64::new(max_id + 1),
        })
    }

    fn record_path(&self, id: u64) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    async fn save(&self, record: DocumentRecord) -> Result<u64, StoreError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let record = DocumentRecord { id, ..record };
        let json = serde_json::to_vec_pretty(&record)?;

        // Stage in the target directory so the rename cannot cross filesystems.
        let staged = tempfile::NamedTempFile::new_in(&self.dir)?;
        std::fs::write(staged.path(), &json)?;
        staged
            .persist(self.record_path(id))
            .map_err(|e| StoreError::Io(e.error))?;

        info!(id, filename = %record.filename, "document record saved");
        Ok(id)
    }

    async fn load(&self, id: u64) -> Result<DocumentRecord, StoreError> {
        let bytes = match std::fs::read(self.record_path(id)) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(id));
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_slice(&bytes)?)
    }
}
