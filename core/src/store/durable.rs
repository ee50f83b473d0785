use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;

use super::envelope::{decode, read_envelope, SchemaEnvelope, SchemaError, SCHEMA_VERSION};
use super::lock::{LockPolicy, StoreLock};
use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::task::TaskCollection;

/// Sole owner of one data file.
///
/// Every read and write of the file goes through here. Nothing is cached
/// between calls: each `load` rebuilds the collection from disk.
#[derive(Debug, Clone)]
pub struct DurableStore {
    path: PathBuf,
    lock_path: PathBuf,
    policy: LockPolicy,
    require_existing: bool,
}

/// A loaded collection plus what the envelope said about it.
#[derive(Debug, Clone)]
pub struct Loaded {
    pub tasks: TaskCollection,
    /// Version found on disk; `None` when the file did not exist.
    pub version: Option<String>,
    pub updated: Option<DateTime<Utc>>,
}

impl Loaded {
    pub fn was_migrated(&self) -> bool {
        self.version
            .as_deref()
            .is_some_and(|v| v != SCHEMA_VERSION)
    }
}

impl DurableStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let lock_path = lock_path_for(&path);
        Self {
            path,
            lock_path,
            policy: LockPolicy::default(),
            require_existing: false,
        }
    }

    pub fn from_config(cfg: &StoreConfig) -> Self {
        Self::new(&cfg.data_file)
            .with_lock_policy(cfg.lock_policy())
            .require_existing(cfg.require_existing)
    }

    pub fn with_lock_policy(mut self, policy: LockPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// When set, `load` fails with a `NotFound` storage error for a missing file.
    pub fn require_existing(mut self, require: bool) -> Self {
        self.require_existing = require;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }

    pub fn load(&self) -> Result<TaskCollection, StoreError> {
        self.load_with_meta().map(|loaded| loaded.tasks)
    }

    /// Like `load`, but a missing file is always an error.
    pub fn load_required(&self) -> Result<TaskCollection, StoreError> {
        self.read(true).map(|loaded| loaded.tasks)
    }

    pub fn load_with_meta(&self) -> Result<Loaded, StoreError> {
        self.read(self.require_existing)
    }

    fn read(&self, require_existing: bool) -> Result<Loaded, StoreError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !require_existing => {
                return Ok(Loaded {
                    tasks: TaskCollection::new(),
                    version: None,
                    updated: None,
                });
            }
            Err(e) => return Err(StoreError::storage(&self.path, e)),
        };

        let doc: serde_json::Value = serde_json::from_slice(&bytes)
            .map_err(|e| StoreError::corrupt(&self.path, e.to_string()))?;
        let schema_err = |e: SchemaError| match e {
            SchemaError::Unsupported { found } => StoreError::UnsupportedSchema {
                found,
                expected: SCHEMA_VERSION.to_string(),
            },
            SchemaError::Malformed(reason) => StoreError::corrupt(&self.path, reason),
        };

        let raw = read_envelope(doc).map_err(schema_err)?;
        let version = raw.version().to_string();
        let updated = raw.updated_at();
        let tasks = decode(raw).map_err(schema_err)?;

        Ok(Loaded {
            tasks,
            version: Some(version),
            updated,
        })
    }

    /// Serialize `collection` at the current schema version and atomically
    /// replace the data file.
    pub fn save(&self, collection: &TaskCollection) -> Result<(), StoreError> {
        self.stage(collection)?.commit()
    }

    /// First half of `save`: write and fsync the new contents to a temporary
    /// file beside the destination. The destination is untouched until
    /// [`StagedSave::commit`]; dropping the staged save discards it.
    pub fn stage(&self, collection: &TaskCollection) -> Result<StagedSave, StoreError> {
        let dir = parent_dir(&self.path);
        std::fs::create_dir_all(dir).map_err(|e| StoreError::storage(dir, e))?;

        let envelope = SchemaEnvelope::current(collection.records(), Utc::now());
        let mut json = serde_json::to_vec_pretty(&envelope)
            .map_err(|e| StoreError::storage(&self.path, std::io::Error::other(e)))?;
        json.push(b'\n');

        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "tasks.json".to_string());
        let mut file = tempfile::Builder::new()
            .prefix(&format!(".{file_name}."))
            .suffix(".tmp")
            .tempfile_in(dir)
            .map_err(|e| StoreError::storage(dir, e))?;
        let staged_path = file.path().to_path_buf();
        let io_err = |e| StoreError::storage(&staged_path, e);

        file.write_all(&json).map_err(io_err)?;
        // keep the destination's mode instead of the temp file's 0600
        if let Ok(meta) = std::fs::metadata(&self.path) {
            file.as_file()
                .set_permissions(meta.permissions())
                .map_err(io_err)?;
        }
        file.as_file().sync_all().map_err(io_err)?;

        Ok(StagedSave {
            file,
            dest: self.path.clone(),
        })
    }

    /// Run `f` while holding the store's advisory lock.
    ///
    /// The lock is released when `f` returns, fails or panics.
    pub fn with_lock<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: From<StoreError>,
    {
        let _guard = StoreLock::acquire(&self.lock_path, &self.policy)?;
        f()
    }

    /// Locked read-modify-write: load, apply `f`, save.
    ///
    /// Nothing is written if `f` fails.
    pub fn update<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut TaskCollection) -> Result<T, E>,
        E: From<StoreError>,
    {
        self.with_lock(|| {
            let mut tasks = self.load()?;
            let out = f(&mut tasks)?;
            self.save(&tasks)?;
            Ok(out)
        })
    }
}

/// New contents written and flushed, waiting for the atomic rename.
#[derive(Debug)]
pub struct StagedSave {
    file: NamedTempFile,
    dest: PathBuf,
}

impl StagedSave {
    pub fn staged_path(&self) -> &Path {
        self.file.path()
    }

    /// Atomically rename the staged file onto the destination.
    ///
    /// `Storage` means the destination still holds its old contents.
    /// `Unsynced` means the rename happened and only the directory flush failed.
    pub fn commit(self) -> Result<(), StoreError> {
        self.commit_with(sync_dir)
    }

    fn commit_with(self, sync: fn(&Path) -> std::io::Result<()>) -> Result<(), StoreError> {
        let dest = self.dest;
        self.file
            .persist(&dest)
            .map_err(|e| StoreError::storage(&dest, e.error))?;
        sync(parent_dir(&dest))
            .map_err(|source| StoreError::Unsynced { path: dest, source })
    }
}

fn lock_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".lock");
    PathBuf::from(name)
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

// the rename is only durable once the directory entry is flushed
#[cfg(unix)]
fn sync_dir(dir: &Path) -> std::io::Result<()> {
    std::fs::File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> std::io::Result<()> {
    Ok(())
}
