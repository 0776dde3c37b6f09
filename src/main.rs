// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Stackyard CLI - visual workspace for Docker Compose stacks

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use stackyard::commands::{self, item::ItemAction, network::NetworkAction, service::ServiceAction, Ctx};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stackyard")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Configuration file path
    #[arg(short, long, env = "STACKYARD_CONFIG", global = true)]
    config: Option<std::path::PathBuf>,

    /// Data directory override
    #[arg(long, env = "STACKYARD_DATA_DIR", global = true)]
    data_dir: Option<std::path::PathBuf>,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR", global = true, value_parser = clap::builder::FalseyValueParser::new())]
    no_color: bool,

    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage workspace items
    Item {
        #[command(subcommand)]
        action: ItemAction,
    },

    /// Edit services of the selected item
    Service {
        #[command(subcommand)]
        action: ServiceAction,
    },

    /// Edit networks of the selected item
    Network {
        #[command(subcommand)]
        action: NetworkAction,
    },

    /// Show services connected by shared networks
    Edges {
        /// Only edges touching this service
        service: Option<String>,
    },

    /// Export the selected item
    Export {
        /// Output format (dot, json, compose)
        #[arg(short, long, default_value = "compose")]
        format: String,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<std::path::PathBuf>,
    },

    /// Search Docker Hub for images
    Search {
        /// Search text (at least 3 characters)
        query: String,

        /// Result page
        #[arg(long)]
        page: Option<u32>,
    },

    /// List tags of a Docker Hub repository
    Tags {
        /// Repository, e.g. alpine or bitnami/redis
        repository: String,

        /// Tags per page (defaults to hub.page_size)
        #[arg(long)]
        page_size: Option<u32>,

        /// Result page
        #[arg(long, default_value_t = 1)]
        page: u32,
    },

    /// Get or set configuration
    Config {
        /// Configuration key
        key: String,

        /// Value to set (omit to get)
        value: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = stackyard::config::load(cli.config.as_deref())?;
    if let Some(dir) = &cli.data_dir {
        config.data_dir.clone_from(dir);
    }

    // Initialize logging
    let filter = match cli.verbose {
        0 if cli.quiet => EnvFilter::new("error"),
        0 => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let ctx = Ctx {
        data_dir: config.data_dir.clone(),
        json: cli.json,
        color: !cli.no_color,
    };

    // Execute command
    match cli.command {
        Commands::Item { action } => commands::item::run(&ctx, action),
        Commands::Service { action } => commands::service::run(&ctx, action),
        Commands::Network { action } => commands::network::run(&ctx, action),
        Commands::Edges { service } => commands::edges::run(&ctx, service),
        Commands::Export { format, output } => commands::export::run(&ctx, &format, output),
        Commands::Search { query, page } => {
            commands::search::run(&ctx, &config.hub, &query, page).await
        }
        Commands::Tags {
            repository,
            page_size,
            page,
        } => commands::search::run_tags(&ctx, &config.hub, &repository, page_size, page).await,
        Commands::Config { key, value } => {
            commands::config::run(&config, cli.config.as_deref(), &key, value)
        }
        Commands::Completions { shell } => commands::completions::run(shell, &mut Cli::command()),
    }
}
