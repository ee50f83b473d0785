use std::io::Write;

use tasks5_core::api::{CliError, DurableStore, TaskError, TaskRecord};

use super::cli::IdArgs;

#[tracing::instrument(name = "cmd.delete", skip_all, fields(id = %args.id))]
pub fn run(args: &IdArgs, store: &DurableStore, out: &mut dyn Write) -> Result<(), CliError> {
    let removed = store.update(|tasks| -> Result<TaskRecord, CliError> {
        let id = tasks.resolve(&args.id)?.to_string();
        let task = tasks.get(&id)?.clone();
        if !tasks.delete(&id) {
            return Err(TaskError::TaskNotFound(id).into());
        }
        Ok(task)
    })?;
    tracing::debug!(id = %removed.id(), "task deleted");

    writeln!(out, "Deleted task {}: {}", removed.id(), removed.description())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{output, seed, temp_store};
    use pretty_assertions::assert_eq;

    #[test]
    fn delete_removes_only_that_task() {
        let (_dir, store) = temp_store();
        seed(&store, &[("aaaa1", "first", &[]), ("bbbb2", "second", &[])]);

        let mut buf = Vec::new();
        let args = IdArgs { id: "aaaa".into() };
        run(&args, &store, &mut buf).unwrap();
        assert_eq!(output(buf), "Deleted task aaaa1: first\n");

        let tasks = store.load().unwrap();
        assert_eq!(tasks.len(), 1);
        assert!(tasks.get("bbbb2").is_ok());
    }

    #[test]
    fn deleting_twice_reports_not_found() {
        let (_dir, store) = temp_store();
        seed(&store, &[("aaaa1", "first", &[])]);
        let args = IdArgs { id: "aaaa1".into() };
        run(&args, &store, &mut Vec::new()).unwrap();

        let err = run(&args, &store, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, CliError::Task(TaskError::TaskNotFound(_))));
    }
}
