use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::task::{parse_tags, TaskCollection, TaskRecord};

/// Format version written by this build.
pub const SCHEMA_VERSION: &str = "1.0";

/// Version assigned to files that predate the `version` field.
pub const LEGACY_VERSION: &str = "0";

/// The shape written to disk.
#[derive(Debug, Serialize)]
pub struct SchemaEnvelope<'a> {
    pub version: &'a str,
    pub updated: DateTime<Utc>,
    pub tasks: &'a [TaskRecord],
}

impl<'a> SchemaEnvelope<'a> {
    pub fn current(tasks: &'a [TaskRecord], updated: DateTime<Utc>) -> Self {
        Self {
            version: SCHEMA_VERSION,
            updated,
            tasks,
        }
    }
}

/// The shape read from disk, before the version is checked.
///
/// Records stay as loose JSON so a migration can reshape them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    pub tasks: Vec<Value>,
}

impl RawEnvelope {
    pub fn version(&self) -> &str {
        self.version.as_deref().unwrap_or(LEGACY_VERSION)
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated.as_deref().and_then(parse_timestamp)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("unsupported schema version {found:?}")]
    Unsupported { found: String },
    #[error("{0}")]
    Malformed(String),
}

struct Migration {
    from: &'static str,
    to: &'static str,
    apply: fn(RawEnvelope) -> Result<RawEnvelope, SchemaError>,
}

const MIGRATIONS: &[Migration] = &[Migration {
    from: LEGACY_VERSION,
    to: SCHEMA_VERSION,
    apply: migrate_legacy,
}];

/// Bring `raw` up to [`SCHEMA_VERSION`] by chaining registered migrations.
///
/// Pure: the result depends only on the input. Data already at the current
/// version is returned unchanged.
pub fn migrate(mut raw: RawEnvelope) -> Result<RawEnvelope, SchemaError> {
    // each step moves strictly forward, so the chain is bounded by the registry size
    for _ in 0..=MIGRATIONS.len() {
        if raw.version() == SCHEMA_VERSION {
            return Ok(raw);
        }
        let step = MIGRATIONS
            .iter()
            .find(|m| m.from == raw.version())
            .ok_or_else(|| SchemaError::Unsupported {
                found: raw.version().to_string(),
            })?;
        raw = (step.apply)(raw)?;
        raw.version = Some(step.to.to_string());
    }
    Err(SchemaError::Unsupported {
        found: raw.version().to_string(),
    })
}

/// Versions this build can read: the current one plus every migration source.
fn is_readable(version: &str) -> bool {
    version == SCHEMA_VERSION || MIGRATIONS.iter().any(|m| m.from == version)
}

/// Check the `version` of a parsed document before anything else about its shape.
///
/// An absent `version` marks a legacy file. A present one must be a string this
/// build can read; `null` or any other non-string counts as present and
/// unsupported.
pub fn check_version(doc: &Value) -> Result<String, SchemaError> {
    let Value::Object(obj) = doc else {
        return Err(SchemaError::Malformed("top level is not a JSON object".into()));
    };
    match obj.get("version") {
        None => Ok(LEGACY_VERSION.to_string()),
        Some(Value::String(v)) if is_readable(v) => Ok(v.clone()),
        Some(Value::String(v)) => Err(SchemaError::Unsupported { found: v.clone() }),
        Some(other) => Err(SchemaError::Unsupported {
            found: other.to_string(),
        }),
    }
}

/// Turn a parsed document into a [`RawEnvelope`], rejecting unknown versions
/// before the rest of the shape is looked at.
pub fn read_envelope(doc: Value) -> Result<RawEnvelope, SchemaError> {
    check_version(&doc)?;
    serde_json::from_value(doc).map_err(|e| SchemaError::Malformed(e.to_string()))
}

/// Migrate and then decode into a collection.
pub fn decode(raw: RawEnvelope) -> Result<TaskCollection, SchemaError> {
    let current = migrate(raw)?;
    let mut records = Vec::with_capacity(current.tasks.len());
    for (idx, value) in current.tasks.into_iter().enumerate() {
        let record: TaskRecord = serde_json::from_value(value)
            .map_err(|e| SchemaError::Malformed(format!("task #{idx}: {e}")))?;
        record
            .check_persisted()
            .map_err(|e| SchemaError::Malformed(format!("task #{idx}: {e}")))?;
        records.push(record);
    }
    TaskCollection::from_records(records).map_err(|e| SchemaError::Malformed(e.to_string()))
}

// Pre-envelope files were written by a lenient loader: any field but `id` and
// `description` may be missing, and tags were sometimes a comma-separated string.
fn migrate_legacy(raw: RawEnvelope) -> Result<RawEnvelope, SchemaError> {
    let fallback_created = raw.updated_at().unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
    let tasks = raw
        .tasks
        .into_iter()
        .enumerate()
        .map(|(idx, value)| {
            migrate_legacy_task(value, fallback_created)
                .map_err(|e| SchemaError::Malformed(format!("legacy task #{idx}: {e}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RawEnvelope {
        version: raw.version,
        updated: raw.updated,
        tasks,
    })
}

fn migrate_legacy_task(value: Value, fallback_created: DateTime<Utc>) -> Result<Value, String> {
    let Value::Object(obj) = value else {
        return Err("not an object".into());
    };

    let id = match obj.get("id") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => return Err("missing id".into()),
    };
    let description = match obj.get("description") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        _ => return Err(format!("task {id} has no description")),
    };
    let created = match obj.get("created") {
        None | Some(Value::Null) => fallback_created,
        Some(Value::String(s)) => {
            parse_timestamp(s).ok_or_else(|| format!("task {id} has unparseable created {s:?}"))?
        }
        Some(other) => return Err(format!("task {id} has non-string created {other}")),
    };
    let completed = match obj.get("completed") {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(other) => return Err(format!("task {id} has non-bool completed {other}")),
    };
    let tags: Vec<String> = match obj.get("tags") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::String(s)) => parse_tags(s),
        Some(Value::Array(items)) => items
            .iter()
            .map(|t| match t {
                Value::String(s) => Ok(s.clone()),
                other => Err(format!("task {id} has non-string tag {other}")),
            })
            .collect::<Result<_, _>>()?,
        Some(other) => return Err(format!("task {id} has malformed tags {other}")),
    };

    let record = TaskRecord::from_parts(id, description, created, completed, tags);
    serde_json::to_value(record).map_err(|e| e.to_string())
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::NewTask;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn current_raw() -> RawEnvelope {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap();
        let tasks = vec![
            TaskRecord::create(NewTask::new("one").with_id("a").with_created(at)).unwrap(),
            TaskRecord::create(
                NewTask::new("two")
                    .with_id("b")
                    .with_created(at)
                    .with_tags(["x"]),
            )
            .unwrap(),
        ];
        let env = SchemaEnvelope::current(&tasks, at);
        serde_json::from_value(serde_json::to_value(&env).unwrap()).unwrap()
    }

    #[test]
    fn migrating_current_data_is_a_no_op() {
        let raw = current_raw();
        assert_eq!(migrate(raw.clone()).unwrap(), raw);
    }

    #[test]
    fn migration_is_idempotent_for_legacy_data() {
        let legacy: RawEnvelope = serde_json::from_value(json!({
            "tasks": [{"id": "a", "description": "old"}]
        }))
        .unwrap();
        let once = migrate(legacy).unwrap();
        let twice = migrate(once.clone()).unwrap();
        assert_eq!(once, twice);
        assert_eq!(once.version(), SCHEMA_VERSION);
    }

    #[test]
    fn legacy_records_get_defaults() {
        let legacy: RawEnvelope = serde_json::from_value(json!({
            "updated": "2023-02-03T04:05:06+00:00",
            "tasks": [
                {"id": "a", "description": " old "},
                {"id": 7, "description": "numbered", "completed": true, "tags": "home, work"},
                {"id": "c", "description": "dated", "created": "2022-01-01T00:00:00Z", "tags": ["z"]}
            ]
        }))
        .unwrap();

        let tasks = decode(legacy).unwrap();
        let recs = tasks.records();
        assert_eq!(recs.len(), 3);

        assert_eq!(recs[0].description(), "old");
        assert!(!recs[0].completed());
        assert!(recs[0].tags().is_empty());
        assert_eq!(
            recs[0].created(),
            Utc.with_ymd_and_hms(2023, 2, 3, 4, 5, 6).unwrap()
        );

        assert_eq!(recs[1].id(), "7");
        assert!(recs[1].completed());
        assert_eq!(recs[1].tags(), ["home", "work"]);

        assert_eq!(
            recs[2].created(),
            Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn legacy_without_updated_falls_back_to_epoch() {
        let legacy: RawEnvelope =
            serde_json::from_value(json!({"tasks": [{"id": "a", "description": "d"}]})).unwrap();
        let tasks = decode(legacy).unwrap();
        assert_eq!(tasks.records()[0].created(), DateTime::<Utc>::UNIX_EPOCH);
    }

    #[test]
    fn legacy_record_without_id_is_malformed() {
        let legacy: RawEnvelope =
            serde_json::from_value(json!({"tasks": [{"description": "no id"}]})).unwrap();
        match migrate(legacy) {
            Err(SchemaError::Malformed(msg)) => assert!(msg.contains("missing id")),
            other => panic!("Expected Malformed error, got {other:?}"),
        }
    }

    #[test]
    fn unknown_versions_are_rejected() {
        for found in ["2.0", "0.9", ""] {
            let raw = RawEnvelope {
                version: Some(found.to_string()),
                updated: None,
                tasks: vec![],
            };
            assert_eq!(
                migrate(raw).unwrap_err(),
                SchemaError::Unsupported {
                    found: found.to_string()
                }
            );
        }
    }

    #[test]
    fn version_is_checked_before_shape() {
        for doc in [
            json!({"version": "2.0", "items": []}),
            json!({"version": "2.0", "updated": 1735689600, "tasks": []}),
            json!({"version": "2.0", "tasks": {"by_id": {}}}),
        ] {
            assert_eq!(
                read_envelope(doc).unwrap_err(),
                SchemaError::Unsupported {
                    found: "2.0".into()
                }
            );
        }
    }

    #[test]
    fn non_string_versions_are_unsupported() {
        assert_eq!(
            check_version(&json!({"version": null, "tasks": []})).unwrap_err(),
            SchemaError::Unsupported {
                found: "null".into()
            }
        );
        assert_eq!(
            check_version(&json!({"version": 2, "tasks": []})).unwrap_err(),
            SchemaError::Unsupported { found: "2".into() }
        );
    }

    #[test]
    fn readable_versions_pass_the_check() {
        assert_eq!(check_version(&json!({"tasks": []})).unwrap(), LEGACY_VERSION);
        assert_eq!(
            check_version(&json!({"version": LEGACY_VERSION, "tasks": []})).unwrap(),
            LEGACY_VERSION
        );
        assert_eq!(
            check_version(&json!({"version": SCHEMA_VERSION})).unwrap(),
            SCHEMA_VERSION
        );
        assert!(matches!(
            check_version(&json!([1, 2])),
            Err(SchemaError::Malformed(_))
        ));
    }

    #[test]
    fn readable_version_with_wrong_shape_is_malformed() {
        let doc = json!({"version": SCHEMA_VERSION, "items": []});
        assert!(matches!(read_envelope(doc), Err(SchemaError::Malformed(_))));
    }

    #[test]
    fn decode_rejects_duplicate_ids_and_blank_descriptions() {
        let dup: RawEnvelope = serde_json::from_value(json!({
            "version": SCHEMA_VERSION,
            "tasks": [
                {"id": "a", "description": "x", "created": "2024-01-01T00:00:00Z"},
                {"id": "a", "description": "y", "created": "2024-01-01T00:00:00Z"}
            ]
        }))
        .unwrap();
        assert!(matches!(decode(dup), Err(SchemaError::Malformed(_))));

        let blank: RawEnvelope = serde_json::from_value(json!({
            "version": SCHEMA_VERSION,
            "tasks": [{"id": "a", "description": "  ", "created": "2024-01-01T00:00:00Z"}]
        }))
        .unwrap();
        assert!(matches!(decode(blank), Err(SchemaError::Malformed(_))));
    }

    #[test]
    fn current_records_default_missing_optional_fields() {
        let raw: RawEnvelope = serde_json::from_value(json!({
            "version": SCHEMA_VERSION,
            "tasks": [{"id": "a", "description": "x", "created": "2024-01-01T00:00:00Z"}]
        }))
        .unwrap();
        let tasks = decode(raw).unwrap();
        assert!(!tasks.records()[0].completed());
        assert!(tasks.records()[0].tags().is_empty());
    }
}
