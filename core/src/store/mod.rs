//! Durable, single-file persistence for the task collection.
//!
//! - `envelope`: the versioned on-disk wrapper and load-time migrations
//! - `lock`: cross-process advisory lock with bounded retry
//! - `durable`: load / atomic save / scoped locking over one data file

mod durable;
mod envelope;
mod lock;

pub use durable::{DurableStore, Loaded, StagedSave};
pub use envelope::{
    check_version, decode, migrate, read_envelope, RawEnvelope, SchemaEnvelope, SchemaError,
    LEGACY_VERSION, SCHEMA_VERSION,
};
pub use lock::{LockPolicy, StoreLock};
