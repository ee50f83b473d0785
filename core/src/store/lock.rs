//! Cross-process advisory lock for a data file.
//!
//! The lock lives on `<data file>.lock`, held with an exclusive OS lock on an
//! open handle. The file itself is never removed: unlinking it would let a
//! second process lock a fresh inode while the first still holds the old one.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::Duration;

use fs2::FileExt;

use crate::error::StoreError;

/// Bounded retry schedule for lock acquisition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockPolicy {
    /// Total number of `try_lock` calls, including the first.
    pub max_attempts: u32,
    /// Delay after the first failed attempt.
    pub base_delay: Duration,
    /// Cap for any single delay.
    pub max_delay: Duration,
    /// Cap for the sum of all delays.
    pub max_wait: Duration,
}

impl Default for LockPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            base_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(200),
            max_wait: Duration::from_secs(2),
        }
    }
}

impl LockPolicy {
    /// Fail after a single attempt.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            max_wait: Duration::ZERO,
        }
    }

    /// Delay after the `attempt`-th failure (1-indexed): base * 2^(attempt-1), capped.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(31);
        self.base_delay
            .saturating_mul(1u32 << exp)
            .min(self.max_delay)
    }
}

/// A held lock. Released when dropped, on every exit path.
#[derive(Debug)]
pub struct StoreLock {
    file: File,
    path: PathBuf,
}

impl StoreLock {
    pub fn acquire(lock_path: &Path, policy: &LockPolicy) -> Result<Self, StoreError> {
        if let Some(dir) = lock_path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|e| StoreError::storage(dir, e))?;
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(lock_path)
            .map_err(|e| StoreError::storage(lock_path, e))?;

        let max_attempts = policy.max_attempts.max(1);
        let mut waited = Duration::ZERO;
        let mut attempts = 0;

        loop {
            attempts += 1;
            match file.try_lock_exclusive() {
                Ok(()) => {
                    return Ok(Self {
                        file,
                        path: lock_path.to_path_buf(),
                    });
                }
                Err(e) if is_contended(&e) => {}
                Err(e) => return Err(StoreError::storage(lock_path, e)),
            }

            if attempts >= max_attempts || waited >= policy.max_wait {
                break;
            }
            let delay = policy
                .delay_for(attempts)
                .min(policy.max_wait.saturating_sub(waited));
            std::thread::sleep(delay);
            waited += delay;
        }

        Err(StoreError::LockUnavailable {
            path: lock_path.to_path_buf(),
            attempts,
            waited,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        // closing the handle releases the lock as well; unlock explicitly so
        // release does not depend on when the fd is actually closed
        let _ = FileExt::unlock(&self.file);
    }
}

fn is_contended(e: &std::io::Error) -> bool {
    e.kind() == std::io::ErrorKind::WouldBlock
        || e.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}
