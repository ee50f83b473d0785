use std::io::Write;

use tasks5_core::api::{CliError, DurableStore, TaskRecord};

use super::cli::IdArgs;

/// Set the completion flag of one task. Running it twice is harmless.
#[tracing::instrument(name = "cmd.status", skip_all, fields(id = %args.id, completed = completed))]
pub fn run(
    args: &IdArgs,
    completed: bool,
    store: &DurableStore,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let task = store.update(|tasks| -> Result<TaskRecord, CliError> {
        let id = tasks.resolve(&args.id)?.to_string();
        let task = tasks.update(&id, |t| {
            t.set_completed(completed);
            Ok(())
        })?;
        Ok(task.clone())
    })?;
    tracing::debug!(id = %task.id(), "completion updated");

    let verb = if completed { "completed" } else { "marked incomplete" };
    writeln!(out, "Task {} {}: {}", task.id(), verb, task.description())?;
    Ok(())
}
