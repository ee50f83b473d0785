use std::collections::HashMap;

use super::id_gen::{generate_task_id, MIN_PREFIX_LEN};
use super::record::{NewTask, TaskRecord};
use crate::error::TaskError;

/// Ordered set of task records keyed by id.
///
/// Insertion order is preserved; it is the order records are saved in and the
/// tie-breaker for every sort in the query layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskCollection {
    records: Vec<TaskRecord>,
    index: HashMap<String, usize>,
}

impl TaskCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection, rejecting duplicate ids.
    pub fn from_records(records: Vec<TaskRecord>) -> Result<Self, TaskError> {
        let mut collection = Self::new();
        for record in records {
            collection.add(record)?;
        }
        Ok(collection)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[TaskRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TaskRecord> {
        self.records.iter()
    }

    pub fn into_records(self) -> Vec<TaskRecord> {
        self.records
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Validate `new`, assign an id if none was given, and insert the record.
    pub fn create(&mut self, mut new: NewTask) -> Result<&TaskRecord, TaskError> {
        if new.id.is_none() {
            let mut id = generate_task_id();
            while self.contains(&id) {
                id = generate_task_id();
            }
            new.id = Some(id);
        }
        let record = TaskRecord::create(new)?;
        self.add(record)
    }

    /// Insert a record. The collection is unchanged when the id already exists.
    pub fn add(&mut self, record: TaskRecord) -> Result<&TaskRecord, TaskError> {
        if self.index.contains_key(record.id()) {
            return Err(TaskError::DuplicateId(record.id().to_string()));
        }
        let pos = self.records.len();
        self.index.insert(record.id().to_string(), pos);
        self.records.push(record);
        Ok(&self.records[pos])
    }

    pub fn get(&self, id: &str) -> Result<&TaskRecord, TaskError> {
        self.index
            .get(id)
            .map(|&pos| &self.records[pos])
            .ok_or_else(|| TaskError::TaskNotFound(id.to_string()))
    }

    /// Find the full id for `key`: an exact id, or a unique prefix of at
    /// least [`MIN_PREFIX_LEN`] characters.
    pub fn resolve(&self, key: &str) -> Result<&str, TaskError> {
        if let Some(&pos) = self.index.get(key) {
            return Ok(self.records[pos].id());
        }
        if key.chars().count() < MIN_PREFIX_LEN {
            return Err(TaskError::TaskNotFound(key.to_string()));
        }

        let mut matches = self.records.iter().filter(|r| r.id().starts_with(key));
        match (matches.next(), matches.next()) {
            (Some(record), None) => Ok(record.id()),
            (None, _) => Err(TaskError::TaskNotFound(key.to_string())),
            (Some(_), Some(_)) => Err(TaskError::Validation(format!(
                "id prefix {key:?} matches more than one task"
            ))),
        }
    }

    /// Apply `mutator` to the record with `id`.
    ///
    /// The mutator only sees the setters of [`TaskRecord`], so `id` and
    /// `created` cannot change. If it fails, the record is left as it was.
    pub fn update<F>(&mut self, id: &str, mutator: F) -> Result<&TaskRecord, TaskError>
    where
        F: FnOnce(&mut TaskRecord) -> Result<(), TaskError>,
    {
        let pos = *self
            .index
            .get(id)
            .ok_or_else(|| TaskError::TaskNotFound(id.to_string()))?;

        let mut draft = self.records[pos].clone();
        mutator(&mut draft)?;
        self.records[pos] = draft;
        Ok(&self.records[pos])
    }

    /// Remove the record with `id`, returning whether it was present.
    pub fn delete(&mut self, id: &str) -> bool {
        let Some(pos) = self.index.remove(id) else {
            return false;
        };
        self.records.remove(pos);
        for slot in self.index.values_mut() {
            if *slot > pos {
                *slot -= 1;
            }
        }
        true
    }
}

impl<'a> IntoIterator for &'a TaskCollection {
    type Item = &'a TaskRecord;
    type IntoIter = std::slice::Iter<'a, TaskRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
