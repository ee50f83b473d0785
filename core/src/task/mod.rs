//! Task records and the in-memory collection a single command works on.

mod collection;
mod id_gen;
mod record;

pub use collection::TaskCollection;
pub use id_gen::{generate_task_id, MIN_PREFIX_LEN};
pub use record::{parse_tags, NewTask, TaskRecord};
