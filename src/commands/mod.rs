// ABOUTME: Command module aggregator for the nvcf CLI.
// ABOUTME: Re-exports lifecycle and lookup command handlers.

mod lifecycle;
mod show;

pub use lifecycle::{apply, create, delete, import, plan, refresh, update};
pub use show::show;

use std::env;
use std::path::Path;

use nvcf::config::FunctionSpec;
use nvcf::error::Result;

/// Load the function definition from `path`, or discover it in the
/// current directory.
fn load_spec(path: Option<&Path>) -> Result<FunctionSpec> {
    match path {
        Some(path) => FunctionSpec::load(path),
        None => FunctionSpec::discover(&env::current_dir()?),
    }
}
