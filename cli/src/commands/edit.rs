use std::io::Write;

use tasks5_core::api::{parse_tags, CliError, DurableStore, TaskRecord};

use super::cli::EditArgs;

#[tracing::instrument(name = "cmd.edit", skip_all, fields(id = %args.id))]
pub fn run(args: &EditArgs, store: &DurableStore, out: &mut dyn Write) -> Result<(), CliError> {
    let task = store.update(|tasks| -> Result<TaskRecord, CliError> {
        let id = tasks.resolve(&args.id)?.to_string();
        let task = tasks.update(&id, |t| {
            if let Some(description) = &args.description {
                t.set_description(description)?;
            }
            if let Some(raw) = &args.tags {
                t.set_tags(parse_tags(raw));
            }
            Ok(())
        })?;
        Ok(task.clone())
    })?;
    tracing::debug!(id = %task.id(), "task edited");

    writeln!(out, "Updated task {}: {}", task.id(), task.description())?;
    Ok(())
}
