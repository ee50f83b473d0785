#![allow(dead_code)]

use std::path::PathBuf;
use std::time::Duration;

use tasks5_core::api::{DurableStore, LockPolicy, NewTask, TaskCollection};
use tempfile::TempDir;

pub struct Fixture {
    pub dir: TempDir,
    pub path: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("tasks.json");
        Self { dir, path }
    }

    pub fn store(&self) -> DurableStore {
        DurableStore::new(&self.path)
    }

    /// A store that waits long enough for heavy contention in tests.
    pub fn patient_store(&self) -> DurableStore {
        self.store().with_lock_policy(LockPolicy {
            max_attempts: 10_000,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(20),
            max_wait: Duration::from_secs(30),
        })
    }

    pub fn write_raw(&self, contents: &str) {
        std::fs::write(&self.path, contents).expect("write data file");
    }

    pub fn read_raw(&self) -> String {
        std::fs::read_to_string(&self.path).expect("read data file")
    }

    /// Files in the store directory other than the data file and its lock.
    pub fn stray_files(&self) -> Vec<String> {
        std::fs::read_dir(self.dir.path())
            .expect("read temp dir")
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|name| name != "tasks.json" && name != "tasks.json.lock")
            .collect()
    }
}

pub fn collection_of(descriptions: &[&str]) -> TaskCollection {
    let mut tasks = TaskCollection::new();
    for d in descriptions {
        tasks.create(NewTask::new(*d)).expect("valid task");
    }
    tasks
}
