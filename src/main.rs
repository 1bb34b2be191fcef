//
//  churchtools-cli
//  main.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use churchtools_cli::api::ApiError;
use churchtools_cli::cli::{Cli, Commands};
use churchtools_cli::exit_codes;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => std::process::exit(exit_codes::SUCCESS),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(exit_code(&e));
        }
    }
}

/// Initialize logging based on environment
fn init_logging() {
    let filter = EnvFilter::try_from_env("CT_DEBUG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn exit_code(error: &anyhow::Error) -> i32 {
    match error.chain().find_map(|cause| cause.downcast_ref::<ApiError>()) {
        Some(ApiError::NotAuthenticated) => exit_codes::AUTH_ERROR,
        Some(ApiError::Network(_)) => exit_codes::NETWORK_ERROR,
        _ => exit_codes::ERROR,
    }
}

/// Main command dispatcher
async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Auth(cmd) => cmd.run(&cli.global).await,
        Commands::Person(cmd) => cmd.run(&cli.global).await,
        Commands::Song(cmd) => cmd.run(&cli.global).await,
        Commands::Event(cmd) => cmd.run(&cli.global).await,
        Commands::Group(cmd) => cmd.run(&cli.global).await,
        Commands::Calendar(cmd) => cmd.run(&cli.global).await,
        Commands::File(cmd) => cmd.run(&cli.global).await,
        Commands::Tag(cmd) => cmd.run(&cli.global).await,
        Commands::Post(cmd) => cmd.run(&cli.global).await,
        Commands::Resource(cmd) => cmd.run(&cli.global).await,
        Commands::Api(cmd) => cmd.run(&cli.global).await,
        Commands::Config(cmd) => cmd.run(&cli.global).await,
        Commands::Version => {
            println!("{} version {}", churchtools_cli::APP_NAME, churchtools_cli::VERSION);
            Ok(())
        }
    }
}
