// SPDX-FileCopyrightText: 2026 Lockstep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lockstep - single-secret credential lifecycle service.
//!
//! This is the binary entry point.

mod bootstrap;
mod serve;
mod status;
mod sync;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use lockstep_config::LockstepConfig;

/// Lockstep - keep one shared secret consistent everywhere it is embedded.
#[derive(Parser, Debug)]
#[command(name = "lockstep", version, about, long_about = None)]
struct Cli {
    /// Configuration file (replaces the XDG lookup; env overrides still apply).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP gateway.
    Serve,
    /// Rotate to a new secret, or re-sync the current one into every artifact.
    Sync {
        /// New secret. Omit to re-write the current secret.
        #[arg(conflicts_with = "prompt")]
        new_secret: Option<String>,
        /// Read the new secret from the terminal without echo.
        #[arg(long)]
        prompt: bool,
        /// Write deployment notes to this file.
        #[arg(long, value_name = "PATH")]
        notes: Option<PathBuf>,
    },
    /// Show the current credential and artifact state.
    Status {
        /// Output JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Print the fingerprint of a secret.
    Digest {
        secret: String,
    },
    /// Append a relay token to a URL.
    Sign {
        url: String,
    },
}

fn load_config(path: Option<&PathBuf>) -> LockstepConfig {
    let result = match path {
        Some(path) => lockstep_config::load_and_validate_path(path),
        None => lockstep_config::load_and_validate(),
    };
    match result {
        Ok(config) => config,
        Err(errors) => {
            lockstep_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

/// Initialize the tracing subscriber on stderr so command output stays clean.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("lockstep={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Commands::Digest { secret } = &cli.command {
        println!("{}", lockstep_credential::digest(secret));
        return;
    }

    let config = load_config(cli.config.as_ref());
    init_tracing(&config.service.log_level);

    let result = match cli.command {
        Commands::Serve => serve::run_serve(config).await,
        Commands::Sync {
            new_secret,
            prompt,
            notes,
        } => sync::run_sync(&config, new_secret, prompt, notes.as_deref()).map(|_| ()),
        Commands::Status { json } => status::run_status(&config, json),
        Commands::Sign { url } => bootstrap::sign_url(&config, &url).map(|signed| {
            println!("{signed}");
        }),
        Commands::Digest { .. } => Ok(()),
    };

    if let Err(e) = result {
        eprintln!("lockstep: {e}");
        std::process::exit(1);
    }
}
