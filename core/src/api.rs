//! Stable re-exports for consumers (`cli` and external crates).
//!
//! Prefer importing from `tasks5_core::api` instead of reaching into internal modules.

pub use crate::config::{load_default, load_from_path, AppConfig, LoggingConfig, StoreConfig};
pub use crate::error::{CliError, StoreError, TaskError};
pub use crate::query::{
    filter_by_completion, filter_by_tag, limit, search, sort_by, SearchField, SearchOptions,
    SortKey,
};
pub use crate::store::{DurableStore, Loaded, LockPolicy, SCHEMA_VERSION};
pub use crate::task::{parse_tags, NewTask, TaskCollection, TaskRecord};
