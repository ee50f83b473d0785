#[allow(clippy::module_inception)]
pub mod error;
pub mod store;

pub use error::{CliError, TaskError};
pub use store::StoreError;
