//! CLI assembly: merge command-line overrides into the config, build the store,
//! dispatch the subcommand.
use std::io::Write;

use tasks5_core::api::{AppConfig, CliError, DurableStore, StoreError};

use crate::commands::cli::{Args, Commands};
use crate::commands::{add, delete, edit, list, search, show, status};

pub struct AppContext {
    cfg: AppConfig,
    store: DurableStore,
}

impl AppContext {
    pub fn new(cfg: AppConfig) -> Self {
        let store = DurableStore::from_config(&cfg.store);
        Self { cfg, store }
    }

    pub fn cfg(&self) -> &AppConfig {
        &self.cfg
    }

    pub fn store(&self) -> &DurableStore {
        &self.store
    }
}

/// Command-line flags win over config files and environment variables.
pub fn apply_overrides(cfg: &mut AppConfig, args: &Args) {
    if let Some(path) = args
        .data_file
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        cfg.store.data_file = path.to_string();
    }
    if args.debug {
        cfg.logging.enabled = true;
        cfg.logging.level = "debug".to_string();
    }
}

#[tracing::instrument(name = "cli.dispatch", skip_all, fields(data_file = %ctx.store().path().display()))]
pub fn dispatch(cmd: &Commands, ctx: &AppContext, out: &mut dyn Write) -> Result<(), CliError> {
    let store = ctx.store();
    match cmd {
        Commands::Add(args) => add::run(args, store, out),
        Commands::List(args) => list::run(args, store, out),
        Commands::Search(args) => search::run(args, store, out),
        Commands::Show(args) => show::run(args, store, out),
        Commands::Complete(args) => status::run(args, true, store, out),
        Commands::Uncomplete(args) => status::run(args, false, store, out),
        Commands::Edit(args) => edit::run(args, store, out),
        Commands::Delete(args) => delete::run(args, store, out),
    }
}

/// Extra guidance printed under the error line for failures a user can act on.
pub fn recovery_hint(err: &CliError) -> Option<String> {
    match err {
        CliError::Store(StoreError::CorruptStore { path, .. }) => Some(format!(
            "hint: {} was left untouched and will not be overwritten; \
             move it aside or restore a backup, then retry",
            path.display()
        )),
        CliError::Store(StoreError::UnsupportedSchema { .. }) => {
            Some("hint: the file was written by a newer tasks5; upgrade to read it".to_string())
        }
        CliError::Store(StoreError::LockUnavailable { path, .. }) => Some(format!(
            "hint: another tasks5 process holds {}; retry when it finishes",
            path.display()
        )),
        CliError::Store(StoreError::Unsynced { .. }) => {
            Some("hint: the change was written; do not repeat it".to_string())
        }
        _ => None,
    }
}
