use thiserror::Error;

use super::store::StoreError;

/// Caller mistakes detected by the task collection before any I/O happens.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("duplicate task id: {0}")]
    DuplicateId(String),
    #[error("task not found: {0}")]
    TaskNotFound(String),
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Task(#[from] TaskError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("usage error: {0}")]
    Usage(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

impl CliError {
    /// Process exit code for this failure.
    ///
    /// 0 success, 2 domain/user error, 3 storage error, 4 usage error, 1 unhandled.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Task(_) => 2,
            CliError::Store(_) | CliError::Io(_) => 3,
            CliError::Usage(_) | CliError::Config(_) => 4,
            CliError::Anyhow(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn exit_codes_follow_error_kind() {
        assert_eq!(
            CliError::from(TaskError::TaskNotFound("x".into())).exit_code(),
            2
        );
        assert_eq!(
            CliError::from(TaskError::Validation("empty".into())).exit_code(),
            2
        );
        assert_eq!(
            CliError::from(StoreError::CorruptStore {
                path: PathBuf::from("tasks.json"),
                reason: "eof".into(),
            })
            .exit_code(),
            3
        );
        assert_eq!(CliError::Usage("bad flag".into()).exit_code(), 4);
        assert_eq!(CliError::from(anyhow::anyhow!("boom")).exit_code(), 1);
    }

    #[test]
    fn transparent_variants_keep_inner_message() {
        let err = CliError::from(TaskError::DuplicateId("abc".into()));
        assert_eq!(err.to_string(), "duplicate task id: abc");
    }
}
