use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id_gen::generate_task_id;
use crate::error::TaskError;

/// One persisted unit of work.
///
/// `id` and `created` are fixed once the record exists; the other fields change
/// only through the setters so `description` can never become empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    id: String,
    description: String,
    created: DateTime<Utc>,
    #[serde(default)]
    completed: bool,
    #[serde(default)]
    tags: Vec<String>,
}

/// Input for [`TaskRecord::create`].
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub description: String,
    pub tags: Vec<String>,
    pub id: Option<String>,
    pub created: Option<DateTime<Utc>>,
}

impl NewTask {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_created(mut self, created: DateTime<Utc>) -> Self {
        self.created = Some(created);
        self
    }
}

impl TaskRecord {
    /// Validate the input and stamp a fresh record.
    ///
    /// The description is trimmed. A missing id is generated and a missing
    /// `created` is set to the current UTC time.
    pub fn create(new: NewTask) -> Result<Self, TaskError> {
        let description = validate_description(&new.description)?;
        let id = match new.id {
            Some(id) => {
                let id = id.trim().to_string();
                if id.is_empty() {
                    return Err(TaskError::Validation("id must be non-empty".into()));
                }
                id
            }
            None => generate_task_id(),
        };

        Ok(Self {
            id,
            description,
            created: new.created.unwrap_or_else(Utc::now),
            completed: false,
            tags: new.tags,
        })
    }

    /// Build a record from already-persisted parts. Used by schema migration.
    pub(crate) fn from_parts(
        id: String,
        description: String,
        created: DateTime<Utc>,
        completed: bool,
        tags: Vec<String>,
    ) -> Self {
        Self {
            id,
            description,
            created,
            completed,
            tags,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
    }

    pub fn set_description(&mut self, description: &str) -> Result<(), TaskError> {
        self.description = validate_description(description)?;
        Ok(())
    }

    pub fn set_tags(&mut self, tags: Vec<String>) {
        self.tags = tags;
    }

    /// A record read from disk is usable only with a non-empty id and description.
    pub(crate) fn check_persisted(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("task with empty id".into());
        }
        if self.description.trim().is_empty() {
            return Err(format!("task {} has an empty description", self.id));
        }
        Ok(())
    }
}

fn validate_description(description: &str) -> Result<String, TaskError> {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return Err(TaskError::Validation(
            "description must be non-empty".into(),
        ));
    }
    Ok(trimmed.to_string())
}

/// Split a comma-separated tag list, trimming each entry and dropping empty ones.
/// Order and duplicates are kept.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn create_trims_description_and_defaults_fields() {
        let before = Utc::now();
        let task = TaskRecord::create(NewTask::new("  Buy groceries  ")).unwrap();

        assert_eq!(task.description(), "Buy groceries");
        assert!(!task.completed());
        assert!(task.tags().is_empty());
        assert_eq!(task.id().len(), 32);
        assert!(task.created() >= before);
    }

    #[test]
    fn create_rejects_blank_description() {
        for desc in ["", "   ", "\t\n"] {
            match TaskRecord::create(NewTask::new(desc)) {
                Err(TaskError::Validation(msg)) => assert!(msg.contains("non-empty")),
                other => panic!("Expected Validation error, got {other:?}"),
            }
        }
    }

    #[test]
    fn create_rejects_blank_id_override() {
        let err = TaskRecord::create(NewTask::new("x").with_id(" ")).unwrap_err();
        assert!(matches!(err, TaskError::Validation(_)));
    }

    #[test]
    fn create_honours_overrides() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let task = TaskRecord::create(
            NewTask::new("Write report")
                .with_id("abc123")
                .with_created(at)
                .with_tags(["work", "q1"]),
        )
        .unwrap();

        assert_eq!(task.id(), "abc123");
        assert_eq!(task.created(), at);
        assert_eq!(task.tags(), ["work", "q1"]);
    }

    #[test]
    fn serde_round_trip_preserves_every_field() {
        let mut task = TaskRecord::create(
            NewTask::new("Round trip").with_tags(["a", "b", "a"]),
        )
        .unwrap();
        task.set_completed(true);

        let json = serde_json::to_string(&task).unwrap();
        let back: TaskRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(back, task);
        // sub-second precision survives
        assert_eq!(back.created().timestamp_nanos_opt(), task.created().timestamp_nanos_opt());
    }

    #[test]
    fn serialized_shape_matches_file_format() {
        let at = Utc.with_ymd_and_hms(2024, 3, 4, 5, 6, 7).unwrap();
        let task = TaskRecord::create(NewTask::new("Shape").with_id("id1").with_created(at))
            .unwrap();
        let value = serde_json::to_value(&task).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "id": "id1",
                "description": "Shape",
                "created": "2024-03-04T05:06:07Z",
                "completed": false,
                "tags": []
            })
        );
    }

    #[test]
    fn tags_keep_order_and_duplicates() {
        assert_eq!(
            parse_tags(" home, urgent,,home ,"),
            vec!["home", "urgent", "home"]
        );
        assert!(parse_tags("").is_empty());
    }

    #[test]
    fn set_description_validates() {
        let mut task = TaskRecord::create(NewTask::new("before")).unwrap();
        assert!(task.set_description("  ").is_err());
        assert_eq!(task.description(), "before");
        task.set_description(" after ").unwrap();
        assert_eq!(task.description(), "after");
    }
}
