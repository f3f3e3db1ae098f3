// ABOUTME: Show command: read-only lookup of an existing function version.
// ABOUTME: Prints the observed state without touching any state file.

use nvcf::error::Result;
use nvcf::output::Output;
use nvcf::provider::Provider;
use nvcf::types::{FunctionId, VersionId};

pub async fn show(
    function_id: &str,
    version_id: &str,
    provider: &Provider,
    mut output: Output,
) -> Result<()> {
    let data_source = provider.data_source().await?;
    let state = data_source
        .read(&FunctionId::new(function_id), &VersionId::new(version_id))
        .await?;

    output.target(&state.function_id, &state.version_id);

    let status = state
        .function_status
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "not deployed".to_string());

    let text = format!(
        "{} ({})\n  status: {}\n  deployments: {}\n  authorized parties: {}",
        state.function_name,
        state.import_id(),
        status,
        state.deployment_specifications.len(),
        state.authorized_parties.len(),
    );
    output.result(&text, &state);
    Ok(())
}
