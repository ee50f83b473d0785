use std::io::Write;

use tasks5_core::api::{CliError, DurableStore};

use super::cli::ShowArgs;
use crate::render;

#[tracing::instrument(name = "cmd.show", skip_all, fields(id = %args.id))]
pub fn run(args: &ShowArgs, store: &DurableStore, out: &mut dyn Write) -> Result<(), CliError> {
    let tasks = store.load()?;
    let id = tasks.resolve(&args.id)?;
    let task = tasks.get(id)?;

    if args.json {
        render::write_json(out, task)?;
    } else {
        render::write_detail(out, task)?;
    }
    Ok(())
}
