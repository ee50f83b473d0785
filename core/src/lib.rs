//! tasks5-core: the durable task store behind the `tasks5` command line.
//!
//! The crate never prints, logs or exits. Every failure is returned as a
//! distinguished error for the caller to map onto user-facing output.

pub mod api;
pub mod config;
pub mod error;
pub mod query;
pub mod store;
pub mod task;
