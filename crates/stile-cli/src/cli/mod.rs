//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use stile_core::config::Config;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "stile")]
#[command(version)]
#[command(about = "Terminal session companion for the member portal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Sign in to the portal
    Login {
        /// Username or email (prompted when omitted)
        #[arg(value_name = "USERNAME")]
        username: Option<String>,

        /// Remember the username for the next sign-in
        #[arg(long)]
        remember: bool,
    },

    /// Sign out and clear the local session
    Logout {
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Show the current session state
    Status,

    /// Open a portal page in the browser
    Open {
        /// Page to open (default: the landing page for the current state)
        #[arg(value_name = "PAGE")]
        page: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Set the portal API base URL
    SetPortal {
        /// The new base URL
        #[arg(value_name = "URL")]
        url: String,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins; warnings are visible by default
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let config = Config::load().context("load config")?;

    match cli.command {
        Commands::Login { username, remember } => {
            commands::auth::login(username, remember, &config).await
        }

        Commands::Logout { yes } => commands::auth::logout(yes, &config).await,

        Commands::Status => commands::status::run(&config),

        Commands::Open { page } => commands::open::run(page.as_deref(), &config),

        Commands::Config { command } => match command {
            ConfigCommands::Path => commands::config::path(),
            ConfigCommands::Init => commands::config::init(),
            ConfigCommands::SetPortal { url } => commands::config::set_portal(&url),
        },
    }
}
