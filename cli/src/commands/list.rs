use std::io::Write;

use tasks5_core::api::{
    filter_by_completion, filter_by_tag, limit, sort_by, CliError, DurableStore, SortKey,
    TaskRecord,
};

use super::cli::{ListArgs, SortField};
use crate::render;

pub(crate) fn sort_key(field: SortField) -> SortKey {
    match field {
        SortField::Created => SortKey::Created,
        SortField::Description => SortKey::Description,
        SortField::Id => SortKey::Id,
    }
}

#[tracing::instrument(name = "cmd.list", skip_all)]
pub fn run(args: &ListArgs, store: &DurableStore, out: &mut dyn Write) -> Result<(), CliError> {
    let loaded = store.load_with_meta()?;
    if loaded.was_migrated() {
        tracing::info!(
            from = loaded.version.as_deref().unwrap_or_default(),
            "read an older schema; it is rewritten on the next change"
        );
    }
    let tasks = loaded.tasks;

    let mut view: Vec<&TaskRecord> = tasks.iter().collect();
    if let Some(tag) = &args.tag {
        view = filter_by_tag(view, tag);
    }
    if args.completed {
        view = filter_by_completion(view, true);
    } else if args.incomplete {
        view = filter_by_completion(view, false);
    }
    if let Some(field) = args.sort {
        view = sort_by(view, sort_key(field));
    }
    let view = limit(view, args.limit);
    tracing::debug!(total = tasks.len(), shown = view.len(), "list");

    if args.json {
        render::write_json(out, &view)?;
    } else {
        render::write_table(out, &view)?;
    }
    Ok(())
}
