//! Quest editor entrypoint.
use anyhow::{Result, bail};
use clap::Parser;
use core_config::{Config, load_from};
use core_quest::Quest;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;

mod change_log;
mod cli;
mod commands;

use cli::Args;

fn configure_logging(log_path: &Path) -> Option<WorkerGuard> {
    let log_dir = match log_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let file_name = log_path
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("quest-editor.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    match tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_ansi(false)
        .with_writer(nb_writer)
        .try_init()
    {
        Ok(_) => Some(guard),
        // Global subscriber already installed; dropping the guard shuts the writer down.
        Err(_) => None,
    }
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

fn quest_directory(args: &Args, config: &Config) -> Result<PathBuf> {
    match args.quest.as_ref().or(config.quest_directory()) {
        Some(dir) => Ok(dir.clone()),
        None => bail!("no quest directory: pass --quest or set [quest] directory in the config"),
    }
}

fn run(args: &Args, config: &Config) -> Result<()> {
    let directory = quest_directory(args, config)?;
    let mut quest = Quest::load(&directory)?;
    quest.set_history_limit(config.effective_history_limit());
    info!(
        target: "runtime.startup",
        quest = %quest.directory().display(),
        command = ?args.command,
        "quest_loaded"
    );
    let stdout = std::io::stdout();
    commands::execute(&args.command, &mut quest, &mut stdout.lock())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_from(args.config.clone())?;
    let _log_guard = configure_logging(config.log_file());
    install_panic_hook();

    let config_path = config.source.as_ref().map(|p| p.display().to_string());
    info!(
        target: "runtime",
        config = config_path.as_deref(),
        history_limit = ?config.effective_history_limit(),
        "startup"
    );
    let result = run(&args, &config);
    if let Err(err) = &result {
        error!(target: "runtime", error = %format!("{err:#}"), "command_failed");
    }
    info!(target: "runtime", "shutdown");
    result
}
