// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines global provider flags, all subcommands, and their arguments.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use nvcf::config::ProviderOverrides;
use nvcf::output::OutputMode;
use nvcf::state_file::DEFAULT_STATE_FILENAME;

#[derive(Parser)]
#[command(name = "nvcf")]
#[command(about = "Declarative lifecycle management for NVIDIA Cloud Functions")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputMode::Normal, global = true)]
    pub output: OutputMode,

    #[command(flatten)]
    pub provider: ProviderArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Control-plane settings. Unset flags fall back to the `NGC_*` variables.
#[derive(Args)]
pub struct ProviderArgs {
    /// API endpoint [env: NGC_ENDPOINT]
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Organization [env: NGC_ORG]
    #[arg(long, global = true)]
    pub org: Option<String>,

    /// Team within the organization [env: NGC_TEAM]
    #[arg(long, global = true)]
    pub team: Option<String>,

    /// API key [env: NGC_API_KEY]
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Delay between deployment status polls, e.g. "30s"
    #[arg(long, global = true, value_parser = parse_duration)]
    pub poll_interval: Option<Duration>,

    /// Per-request HTTP timeout, e.g. "2m"
    #[arg(long, global = true, value_parser = parse_duration)]
    pub request_timeout: Option<Duration>,
}

impl ProviderArgs {
    pub fn overrides(&self) -> ProviderOverrides {
        ProviderOverrides {
            endpoint: self.endpoint.clone(),
            api_key: self.api_key.clone(),
            org: self.org.clone(),
            team: self.team.clone(),
            poll_interval: self.poll_interval,
            request_timeout: self.request_timeout,
        }
    }
}

/// Desired-state and state-file locations shared by the lifecycle commands.
#[derive(Args)]
pub struct Files {
    /// Function definition (default: discover nvcf.yml in the current directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub state: StateArg,
}

#[derive(Args)]
pub struct StateArg {
    /// State file holding the observed function
    #[arg(short, long, default_value = DEFAULT_STATE_FILENAME)]
    pub state: PathBuf,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new nvcf.yml configuration file
    Init {
        /// Function name
        #[arg(short, long)]
        name: Option<String>,

        /// Container image
        #[arg(short, long)]
        image: Option<String>,

        /// Overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Show what apply would do, without contacting the control plane
    Plan(Files),

    /// Create, update, or replace the function to match its definition
    Apply(Files),

    /// Create a new function version
    Create(Files),

    /// Update the function version in place
    Update(Files),

    /// Refresh the state file from the control plane
    Refresh(StateArg),

    /// Delete the function version and its state file
    Delete(StateArg),

    /// Adopt an existing function version
    Import {
        /// "<function_id>,<version_id>"
        id: String,

        #[command(flatten)]
        state: StateArg,
    },

    /// Look up an existing function version
    Show {
        #[arg(long)]
        function_id: String,

        #[arg(long)]
        version_id: String,
    },
}

fn parse_duration(s: &str) -> Result<Duration, String> {
    humantime_serde::re::humantime::parse_duration(s).map_err(|e| e.to_string())
}
