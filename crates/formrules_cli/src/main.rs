mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::CliConfig;

#[derive(Parser)]
#[command(name = "formrules")]
#[command(version, about = "Form Rules Engine CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a bag of form values against a schema
    Validate {
        /// Path to the schema file (YAML, TOML or JSON)
        schema: String,

        /// Path to the values file (YAML, TOML or JSON)
        values: String,

        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Message catalog file used to render messages
        #[arg(short, long, env = "FORMRULES_CATALOG")]
        catalog: Option<PathBuf>,

        /// Message locale ("en" selects the built-in English messages)
        #[arg(short, long, env = "FORMRULES_LOCALE")]
        locale: Option<String>,
    },

    /// Check a schema definition without validating values
    Check {
        /// Path to the schema file (YAML, TOML or JSON)
        schema: String,

        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    // Execute command
    match cli.command {
        Commands::Validate {
            schema,
            values,
            format,
            catalog,
            locale,
        } => {
            let config = CliConfig::new(&format, catalog, locale)?;
            commands::validate::execute(&schema, &values, &config).await
        }

        Commands::Check { schema, format } => commands::check::execute(&schema, &format).await,
    }
}
