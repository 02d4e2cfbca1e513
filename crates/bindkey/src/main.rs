//! Binary entrypoint for the bindkey daemon.
use std::{path::PathBuf, process::ExitCode, sync::Arc};

use bindkey_engine::Engine;
use bindkey_registry::{JsonStore, Registry};
use clap::{Parser, Subcommand};
use tracing::error;

mod runtime;

use runtime::Error;

#[derive(Parser, Debug)]
#[command(name = "bindkey", about = "A macOS global shortcut daemon", version)]
/// Command-line interface for the `bindkey` binary.
struct Cli {
    /// Optional subcommand; without one the daemon runs in the foreground.
    #[command(subcommand)]
    command: Option<Command>,

    /// Logging controls
    #[command(flatten)]
    log: logging::LogArgs,

    /// Path to the shortcut store (defaults to the user data directory)
    #[arg(long, value_name = "PATH")]
    store: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
/// Top-level CLI subcommands.
enum Command {
    /// Print registered shortcuts and exit.
    List {
        /// Only shortcuts carrying this tag
        #[arg(long)]
        tag: Option<String>,

        /// Only shortcuts whose action or combination matches this text
        #[arg(long, conflicts_with = "tag")]
        search: Option<String>,
    },
    /// Print the automations available to shortcuts and exit.
    Automations,
    /// Report permission status and exit.
    Permissions,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(&cli.log);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "fatal");
            eprintln!("bindkey: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Error> {
    let store_path = cli.store.unwrap_or_else(JsonStore::default_path);
    let registry = Arc::new(Registry::open(Box::new(JsonStore::new(store_path)))?);

    match cli.command {
        Some(Command::List { tag, search }) => {
            let shortcuts = match (tag, search) {
                (Some(tag), _) => registry.by_tag(&tag),
                (None, Some(text)) => registry.search(&text),
                (None, None) => registry.all(),
            };
            for s in shortcuts {
                println!("{}", s.describe());
            }
            Ok(())
        }
        Some(Command::Automations) => {
            let rt = tokio::runtime::Runtime::new()?;
            let names = rt.block_on(Engine::new_mac().automation_names())?;
            for name in names {
                println!("{name}");
            }
            Ok(())
        }
        Some(Command::Permissions) => {
            let status = permissions::check_permissions();
            let describe = |ok: bool| if ok { "granted" } else { "missing" };
            println!("accessibility:    {}", describe(status.accessibility_ok));
            println!("input monitoring: {}", describe(status.input_ok));
            Ok(())
        }
        None => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(runtime::run_daemon(registry, Engine::new_mac()))
        }
    }
}
