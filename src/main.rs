// ABOUTME: Entry point for the nvcf CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use nvcf::config::{self, ProviderConfig};
use nvcf::error::Result;
use nvcf::output::Output;
use nvcf::provider::Provider;
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let output = Output::new(cli.output);
    let result = run(cli).await;

    if let Err(e) = result {
        output.error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let output = Output::new(cli.output);

    match cli.command {
        Commands::Init { name, image, force } => {
            let cwd = env::current_dir()?;
            config::init_config(&cwd, name.as_deref(), image.as_deref(), force)?;
            output.success(&format!("Created {}", config::CONFIG_FILENAME));
            Ok(())
        }
        Commands::Plan(files) => commands::plan(&files, output),
        Commands::Apply(files) => {
            let provider = connect(&cli.provider)?;
            commands::apply(&files, &provider, output).await
        }
        Commands::Create(files) => {
            let provider = connect(&cli.provider)?;
            commands::create(&files, &provider, output).await
        }
        Commands::Update(files) => {
            let provider = connect(&cli.provider)?;
            commands::update(&files, &provider, output).await
        }
        Commands::Refresh(state) => {
            let provider = connect(&cli.provider)?;
            commands::refresh(&state, &provider, output).await
        }
        Commands::Delete(state) => {
            let provider = connect(&cli.provider)?;
            commands::delete(&state, &provider, output).await
        }
        Commands::Import { id, state } => {
            let provider = connect(&cli.provider)?;
            commands::import(&id, &state, &provider, output).await
        }
        Commands::Show {
            function_id,
            version_id,
        } => {
            let provider = connect(&cli.provider)?;
            commands::show(&function_id, &version_id, &provider, output).await
        }
    }
}

/// Resolve provider settings from flags and environment.
fn connect(args: &cli::ProviderArgs) -> Result<Provider> {
    let config = ProviderConfig::resolve(args.overrides())?;
    tracing::debug!(?config, "resolved provider settings");
    Ok(Provider::new(config))
}
