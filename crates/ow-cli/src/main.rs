//! ow-exec CLI
//!
//! Sends scripts to a locally running Opiumware listener:
//! - attach / connect / check against the loopback ports
//! - exec a script (settings first, then the script)
//! - manage saved scripts and configuration
//! - listen as a stand-in receiver for testing

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ow_core::config::{self, ConfigFile};
use ow_core::{Port, CANDIDATE_PORTS};
use ow_exec::commands::{self, ScriptSource};
use ow_exec::output::print_error;

#[derive(Parser)]
#[command(name = "ow-exec")]
#[command(author, version, about = "Script executor for a local Opiumware listener")]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, env = "OW_EXEC_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe the configured ports and attach to the first listener
    Attach,

    /// Connect to one port, optionally sending a raw payload
    Connect {
        /// Port to connect to
        port: Port,
        /// Text to compress and send ("NULL" sends nothing)
        #[arg(short, long)]
        payload: Option<String>,
    },

    /// Check whether a port is available (all configured ports if omitted)
    Check {
        /// Port to check
        port: Option<Port>,
    },

    /// Execute a script: settings first, then the script itself
    /// Alias: run
    #[command(alias = "run")]
    Exec {
        /// Script file ("-" or omitted reads stdin)
        file: Option<PathBuf>,
        /// Inline script source
        #[arg(short = 'e', long = "eval", conflicts_with = "file")]
        code: Option<String>,
        /// Name of a saved script
        #[arg(short, long, conflicts_with_all = ["file", "code"])]
        script: Option<String>,
        /// Send to this port instead of auto-attaching
        #[arg(short, long)]
        port: Option<Port>,
    },

    /// Manage saved scripts
    Scripts {
        #[command(subcommand)]
        action: ScriptsAction,
    },

    /// Receive and print scripts like the listener would (for testing)
    Listen {
        /// Port to listen on
        #[arg(short, long, default_value_t = CANDIDATE_PORTS[0])]
        port: Port,
        /// Exit after the first command received
        #[arg(long)]
        once: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ScriptsAction {
    /// List saved scripts
    List,
    /// Print a saved script
    Show { name: String },
    /// Save a script from a file (or stdin)
    Save {
        name: String,
        /// File to read ("-" or omitted reads stdin)
        file: Option<PathBuf>,
    },
    /// Delete a saved script
    Delete { name: String },
    /// Import a file, named after its base name
    Import {
        file: PathBuf,
        /// Store under this name instead
        #[arg(short, long)]
        name: Option<String>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Get specific config value
    Get { key: String },
    /// Set config value
    Set { key: String, value: String },
    /// Write the default configuration
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
    /// Show config file path
    Path,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    let log_level = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.into()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(e) = run(cli).await {
        print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    let json = cli.json;

    // Config subcommands operate on the raw file, so loading stays lazy
    let load = || {
        ConfigFile::load_or_default(config_path).with_context(|| match config_path {
            Some(path) => format!("Failed to load config from {:?}", path),
            None => "Failed to load config".to_string(),
        })
    };

    match cli.command {
        // No command: show port status
        None => commands::check_all_command(&load()?, json).await,

        Some(Commands::Attach) => commands::attach_command(&load()?, json).await,

        Some(Commands::Connect { port, payload }) => {
            commands::connect_command(&load()?, port, payload, json).await
        }

        Some(Commands::Check { port: Some(port) }) => {
            commands::check_command(&load()?, port, json).await
        }
        Some(Commands::Check { port: None }) => {
            commands::check_all_command(&load()?, json).await
        }

        Some(Commands::Exec {
            file,
            code,
            script,
            port,
        }) => {
            let source = ScriptSource {
                inline: code,
                saved: script,
                file,
            };
            commands::exec_command(&load()?, &source, port, json).await
        }

        Some(Commands::Scripts { action }) => {
            let config = load()?;
            match action {
                ScriptsAction::List => commands::scripts_list(&config, json),
                ScriptsAction::Show { name } => commands::scripts_show(&config, &name),
                ScriptsAction::Save { name, file } => {
                    let file = file.filter(|f| f.as_os_str() != "-");
                    commands::scripts_save(&config, &name, file.as_deref())
                }
                ScriptsAction::Delete { name } => commands::scripts_delete(&config, &name),
                ScriptsAction::Import { file, name } => {
                    commands::scripts_import(&config, &file, name.as_deref())
                }
            }
        }

        Some(Commands::Listen { port, once }) => commands::listen_command(port, once, json).await,

        Some(Commands::Config { action }) => match action {
            ConfigAction::Show => commands::config_show(config_path),
            ConfigAction::Get { key } => commands::config_get(config_path, &key),
            ConfigAction::Set { key, value } => commands::config_set(config_path, &key, &value),
            ConfigAction::Init { force } => commands::config_init(config_path, force),
            ConfigAction::Path => {
                let path = config_path
                    .map(PathBuf::from)
                    .unwrap_or_else(config::default_config_path);
                println!("{}", path.display());
                Ok(())
            }
        },
    }
}
