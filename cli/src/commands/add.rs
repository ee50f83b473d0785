use std::io::Write;

use tasks5_core::api::{parse_tags, CliError, DurableStore, NewTask, TaskError, TaskRecord};

use super::cli::AddArgs;
use crate::render;

fn new_task(args: &AddArgs) -> NewTask {
    let mut new = NewTask::new(args.description.as_str())
        .with_tags(args.tags.as_deref().map(parse_tags).unwrap_or_default());
    if let Some(id) = &args.id {
        new = new.with_id(id.as_str());
    }
    new
}

#[tracing::instrument(name = "cmd.add", skip_all, fields(dry_run = args.dry_run))]
pub fn run(args: &AddArgs, store: &DurableStore, out: &mut dyn Write) -> Result<(), CliError> {
    if args.dry_run {
        let task = TaskRecord::create(new_task(args))?;
        if store.load()?.contains(task.id()) {
            return Err(TaskError::DuplicateId(task.id().to_string()).into());
        }
        writeln!(out, "Dry run, task would be:")?;
        render::write_json(out, &task)?;
        return Ok(());
    }

    let task = store.update(|tasks| -> Result<TaskRecord, CliError> {
        Ok(tasks.create(new_task(args))?.clone())
    })?;
    tracing::debug!(id = %task.id(), path = %store.path().display(), "task added");

    writeln!(out, "Added task {}: {}", task.id(), task.description())?;
    Ok(())
}
