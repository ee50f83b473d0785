use uuid::Uuid;

/// Shortest id prefix accepted by [`TaskCollection::resolve`](super::TaskCollection::resolve).
pub const MIN_PREFIX_LEN: usize = 4;

/// Format: 32 lowercase hex chars (random UUID v4, simple form).
pub fn generate_task_id() -> String {
    Uuid::new_v4().simple().to_string()
}
