use std::io::Write;

use clap::Parser;
use tasks5_cli::app::{self, AppContext};
use tasks5_cli::commands::cli;
use tasks5_core::api::{self as core_api, CliError};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

static LOG_GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
    std::sync::OnceLock::new();

fn main() {
    let args = match cli::Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // --help and --version are not failures.
            let code = if e.use_stderr() { 4 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    let debug = args.debug;
    let exit = match real_main(args) {
        Ok(()) => 0,
        Err(e) => {
            report(&e, debug);
            e.exit_code()
        }
    };

    std::process::exit(exit);
}

fn real_main(args: cli::Args) -> Result<(), CliError> {
    let mut cfg = core_api::load_default().map_err(|e| CliError::Config(format!("{e:#}")))?;
    app::apply_overrides(&mut cfg, &args);
    init_tracing(&cfg.logging).map_err(CliError::Config)?;
    tracing::debug!(data_file = %cfg.store.data_file, "config loaded");

    let ctx = AppContext::new(cfg);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    app::dispatch(&args.command, &ctx, &mut out)?;
    out.flush()?;
    Ok(())
}

fn report(e: &CliError, debug: bool) {
    eprintln!("Error: {e}");
    if debug {
        let mut source = std::error::Error::source(e);
        while let Some(cause) = source {
            eprintln!("  caused by: {cause}");
            source = cause.source();
        }
    }
    if let Some(hint) = app::recovery_hint(e) {
        eprintln!("{hint}");
    }
}

fn init_tracing(logging: &core_api::LoggingConfig) -> Result<(), String> {
    if !logging.enabled {
        return Ok(());
    }

    let filter = match std::env::var("RUST_LOG") {
        Ok(v) if !v.trim().is_empty() => EnvFilter::from_default_env(),
        _ => EnvFilter::try_new(logging.level.clone()).map_err(|e| e.to_string())?,
    };

    let mut maybe_writer = None;

    if logging.file {
        let dir = match logging
            .directory
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            Some(d) => std::path::PathBuf::from(d),
            None => std::env::temp_dir().join("tasks5"),
        };

        std::fs::create_dir_all(&dir).map_err(|e| format!("create log dir failed: {e}"))?;
        let file_name = format!("tasks5.{}.log", std::process::id());
        let appender = tracing_appender::rolling::never(dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);
        let _ = LOG_GUARD.set(guard);
        maybe_writer = Some(non_blocking);
    }

    if !logging.console && maybe_writer.is_none() {
        return Err("logging enabled but both console and file sinks are off".to_string());
    }

    let console_layer = logging.console.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_ansi(atty::is(atty::Stream::Stderr))
    });

    let file_layer = maybe_writer.map(|w| {
        tracing_subscriber::fmt::layer()
            .with_writer(w)
            .with_ansi(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(())
}
