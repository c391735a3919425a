//! Directory of recorded runs.
//!
//! ```text
//! index.json              - schema version and the digest chain
//! runs/
//!   run-0001.cbor.zst     - one compressed CBOR recording per run
//! ```
//!
//! Every index entry carries the SHA-256 of its file and the digest of the
//! entry before it, so a rewritten or reordered file breaks the chain.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::recording::Recording;

/// Bump when the recording or index layout changes.
pub const STORE_SCHEMA_VERSION: u32 = 1;

const ZSTD_LEVEL: i32 = 3;
const INDEX_FILE: &str = "index.json";
const RUNS_DIR: &str = "runs";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not encode recording: {0}")]
    Encode(String),
    #[error("could not decode recording: {0}")]
    Decode(String),
    #[error("bad store index: {0}")]
    Index(#[from] serde_json::Error),
    #[error("{file} was modified: digest {actual}, index says {expected}")]
    Tampered {
        file: String,
        expected: String,
        actual: String,
    },
    #[error("digest chain broken at {file}")]
    BrokenChain { file: String },
    #[error("store schema v{found} is not supported (expected v{expected})")]
    SchemaMismatch { found: u32, expected: u32 },
    #[error("recording {0} not found")]
    NotFound(u32),
    #[error("no recording store at {0}")]
    Missing(PathBuf),
    #[error("no recordings found")]
    Empty,
}

/// One saved recording as listed in the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub file: String,
    pub recording: Uuid,
    pub final_score: u64,
    pub digest: String,
    pub parent: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreIndex {
    pub schema_version: u32,
    pub entries: Vec<IndexEntry>,
}

impl Default for StoreIndex {
    fn default() -> Self {
        Self {
            schema_version: STORE_SCHEMA_VERSION,
            entries: Vec::new(),
        }
    }
}

/// Recording store rooted at a directory. Indices are 1-based.
pub struct RecordingStore {
    root: PathBuf,
    index: StoreIndex,
}

impl RecordingStore {
    /// Open the store, creating an empty one if the directory has no index.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = path.as_ref().to_path_buf();
        std::fs::create_dir_all(root.join(RUNS_DIR))?;

        let index_path = root.join(INDEX_FILE);
        let index = if index_path.exists() {
            read_index(&index_path)?
        } else {
            StoreIndex::default()
        };

        let store = Self { root, index };
        store.write_index()?;
        tracing::debug!(
            root = %store.root.display(),
            recordings = store.len(),
            "recording store opened"
        );
        Ok(store)
    }

    /// Open a store that must already exist. Nothing is created on disk.
    pub fn open_existing(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = path.as_ref().to_path_buf();
        let index_path = root.join(INDEX_FILE);
        if !index_path.is_file() {
            return Err(StoreError::Missing(root));
        }
        let index = read_index(&index_path)?;
        Ok(Self { root, index })
    }

    /// Append a recording and return its index.
    pub fn save(&mut self, recording: &Recording) -> Result<u32, StoreError> {
        let number = self.index.entries.len() as u32 + 1;
        let file = format!("run-{number:04}.cbor.zst");
        let bytes = encode(recording)?;
        std::fs::write(self.root.join(RUNS_DIR).join(&file), &bytes)?;

        let parent = self.index.entries.last().map(|e| e.digest.clone());
        self.index.entries.push(IndexEntry {
            file,
            recording: recording.id,
            final_score: recording.final_score,
            digest: digest_hex(&bytes),
            parent,
        });
        self.write_index()?;

        tracing::info!(
            index = number,
            recording = %recording.id,
            score = recording.final_score,
            "recording saved"
        );
        Ok(number)
    }

    /// Load one recording, refusing files whose digest disagrees with the index.
    pub fn load(&self, number: u32) -> Result<Recording, StoreError> {
        let entry = number
            .checked_sub(1)
            .and_then(|i| self.index.entries.get(i as usize))
            .ok_or(StoreError::NotFound(number))?;
        let bytes = self.read_checked(entry)?;
        decode(&bytes)
    }

    pub fn load_latest(&self) -> Result<Recording, StoreError> {
        if self.is_empty() {
            return Err(StoreError::Empty);
        }
        self.load(self.len() as u32)
    }

    /// Walk the whole chain: parents must link and every file must match.
    pub fn verify_integrity(&self) -> Result<(), StoreError> {
        let mut parent: Option<&str> = None;
        for entry in &self.index.entries {
            if entry.parent.as_deref() != parent {
                return Err(StoreError::BrokenChain {
                    file: entry.file.clone(),
                });
            }
            self.read_checked(entry)?;
            parent = Some(&entry.digest);
        }
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.index.entries
    }

    pub fn len(&self) -> usize {
        self.index.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.entries.is_empty()
    }

    fn read_checked(&self, entry: &IndexEntry) -> Result<Vec<u8>, StoreError> {
        let bytes = std::fs::read(self.root.join(RUNS_DIR).join(&entry.file))?;
        let actual = digest_hex(&bytes);
        if actual != entry.digest {
            return Err(StoreError::Tampered {
                file: entry.file.clone(),
                expected: entry.digest.clone(),
                actual,
            });
        }
        Ok(bytes)
    }

    fn write_index(&self) -> Result<(), StoreError> {
        let file = std::fs::File::create(self.root.join(INDEX_FILE))?;
        serde_json::to_writer_pretty(file, &self.index)?;
        Ok(())
    }
}

fn read_index(path: &Path) -> Result<StoreIndex, StoreError> {
    let index: StoreIndex = serde_json::from_reader(std::fs::File::open(path)?)?;
    if index.schema_version != STORE_SCHEMA_VERSION {
        return Err(StoreError::SchemaMismatch {
            found: index.schema_version,
            expected: STORE_SCHEMA_VERSION,
        });
    }
    Ok(index)
}

fn encode(recording: &Recording) -> Result<Vec<u8>, StoreError> {
    let mut cbor = Vec::new();
    ciborium::into_writer(recording, &mut cbor).map_err(|e| StoreError::Encode(e.to_string()))?;
    Ok(zstd::encode_all(cbor.as_slice(), ZSTD_LEVEL)?)
}

fn decode(bytes: &[u8]) -> Result<Recording, StoreError> {
    let cbor = zstd::decode_all(bytes)?;
    ciborium::from_reader(cbor.as_slice()).map_err(|e| StoreError::Decode(e.to_string()))
}

fn digest_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}
