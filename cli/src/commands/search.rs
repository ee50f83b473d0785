use std::io::Write;

use tasks5_core::api::{limit, search, CliError, DurableStore, SearchField, SearchOptions};

use super::cli::{SearchArgs, SearchFieldArg};
use crate::render;

fn options(args: &SearchArgs) -> SearchOptions {
    let fields = args
        .field
        .iter()
        .map(|f| match f {
            SearchFieldArg::Description => SearchField::Description,
            SearchFieldArg::Tags => SearchField::Tags,
        })
        .collect();
    SearchOptions::default()
        .fields(fields)
        .ignore_case(args.ignore_case)
}

#[tracing::instrument(name = "cmd.search", skip_all, fields(ignore_case = args.ignore_case))]
pub fn run(args: &SearchArgs, store: &DurableStore, out: &mut dyn Write) -> Result<(), CliError> {
    let tasks = store.load()?;
    let matches = limit(search(&tasks, &args.query, &options(args)), args.limit);
    tracing::debug!(total = tasks.len(), matched = matches.len(), "search");

    if args.json {
        render::write_json(out, &matches)?;
    } else {
        render::write_lines(out, &matches)?;
    }
    Ok(())
}
