//! CLI entry and dispatch.

use std::path::PathBuf;

use anyhow::{Context, Result};
use bootseq_core::config::{self, Config};
use bootseq_core::core::interrupt;
use bootseq_core::logging;
use clap::Parser;

mod commands;

#[derive(Parser)]
#[command(name = "bootseq")]
#[command(version = "0.1")]
#[command(about = "Retro CRT terminal boot sequence")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Script to play instead of the configured one
    #[arg(long, value_name = "PATH")]
    script: Option<PathBuf>,

    /// Disable scanlines, grain and vignette
    #[arg(long = "no-effects")]
    no_effects: bool,

    /// Quit on its own once the sequence is complete
    #[arg(long = "exit-on-complete")]
    exit_on_complete: bool,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Print the sequence line by line without the full-screen UI
    Print {
        /// Script to play instead of the configured one
        #[arg(long, value_name = "PATH")]
        script: Option<PathBuf>,

        /// Prefix each line with the time it was revealed
        #[arg(long)]
        timestamps: bool,
    },

    /// Inspect boot scripts
    Script {
        #[command(subcommand)]
        command: ScriptCommands,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ScriptCommands {
    /// Check a script for errors (defaults to the configured script)
    Validate {
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,
    },
    /// List the lines of a script (defaults to the configured script)
    Show {
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Logging is best effort; an unwritable home must not stop the boot screen.
    let _log_guard = match logging::init(&config::paths::logs_dir()) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: {e:#}");
            None
        }
    };

    interrupt::init()?;

    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let config = Config::load().context("load config")?;

    let Cli {
        command,
        script,
        no_effects,
        exit_on_complete,
    } = cli;

    let Some(command) = command else {
        return commands::boot::run(&config, script.as_deref(), no_effects, exit_on_complete)
            .await;
    };

    match command {
        Commands::Print { script, timestamps } => {
            commands::print::run(&config, script.as_deref(), timestamps).await
        }

        Commands::Script { command } => match command {
            ScriptCommands::Validate { path } => {
                commands::script::validate(&config, path.as_deref())
            }
            ScriptCommands::Show { path, json } => {
                commands::script::show(&config, path.as_deref(), json)
            }
        },

        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
        },
    }
}
