// ABOUTME: Lifecycle commands: plan, apply, create, update, refresh, delete, import.
// ABOUTME: Bridges the desired-state file and the state file to the resource reconciler.

use serde::Serialize;

use nvcf::error::{Error, Result};
use nvcf::model::FunctionState;
use nvcf::output::Output;
use nvcf::provider::Provider;
use nvcf::reconcile::{ChangePlan, PlannedAction};
use nvcf::state_file::StateFile;

use super::load_spec;
use crate::cli::{Files, StateArg};

#[derive(Serialize)]
struct PlanReport<'a> {
    action: String,
    changed_fields: &'a [&'static str],
    replacing_fields: Vec<&'static str>,
}

#[derive(Serialize)]
struct ApplyReport<'a> {
    action: String,
    changed_fields: &'a [&'static str],
    state: &'a FunctionState,
}

/// Print the planned action. Does not contact the control plane.
pub fn plan(files: &Files, output: Output) -> Result<()> {
    let desired = load_spec(files.config.as_deref())?;
    let prior = StateFile::new(&files.state.state).load_optional()?;

    let change = ChangePlan::between(&desired, prior.as_ref());
    let action = change.action();
    let replacing: Vec<&'static str> = change.replacing_fields().collect();

    let mut text = format!("{}: {action}", desired.function_name);
    if !change.changed_fields().is_empty() {
        text.push_str(&format!(" ({})", change.changed_fields().join(", ")));
    }
    if action == PlannedAction::Replace {
        text.push_str(&format!("\n  forces replacement: {}", replacing.join(", ")));
    }

    output.result(
        &text,
        &PlanReport {
            action: action.to_string(),
            changed_fields: change.changed_fields(),
            replacing_fields: replacing,
        },
    );
    Ok(())
}

/// Converge the function on its definition and record the result.
pub async fn apply(files: &Files, provider: &Provider, mut output: Output) -> Result<()> {
    let desired = load_spec(files.config.as_deref())?;
    let state_file = StateFile::new(&files.state.state);
    let prior = state_file.load_optional()?;

    output.start_timer();
    output.progress(&format!("Applying {}", desired.function_name));

    let resource = provider.resource().await?;
    let outcome = match resource.apply(&desired, prior.as_ref()).await {
        Ok(outcome) => outcome,
        Err(e) if e.replaced_version_deleted() => {
            tracing::warn!(
                state = %state_file.path().display(),
                "replaced version is gone, removing state file"
            );
            state_file.remove()?;
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };
    state_file.save(&outcome.state)?;

    output.target(&outcome.state.function_id, &outcome.state.version_id);
    output.result(
        &format!("{}: {}", outcome.action, outcome.state.import_id()),
        &ApplyReport {
            action: outcome.action.to_string(),
            changed_fields: &outcome.changed_fields,
            state: &outcome.state,
        },
    );
    output.success("Apply complete");
    Ok(())
}

/// Create a new version. Refuses to overwrite an existing state file.
pub async fn create(files: &Files, provider: &Provider, mut output: Output) -> Result<()> {
    let desired = load_spec(files.config.as_deref())?;
    let state_file = StateFile::new(&files.state.state);
    if state_file.exists() {
        return Err(Error::AlreadyExists(state_file.path().to_path_buf()));
    }

    output.start_timer();
    output.progress(&format!("Creating {}", desired.function_name));

    let resource = provider.resource().await?;
    let state = resource.create(&desired).await?;
    state_file.save(&state)?;

    output.target(&state.function_id, &state.version_id);
    output.result(&format!("created {}", state.import_id()), &state);
    output.success("Create complete");
    Ok(())
}

/// Update the recorded version in place.
pub async fn update(files: &Files, provider: &Provider, mut output: Output) -> Result<()> {
    let desired = load_spec(files.config.as_deref())?;
    let state_file = StateFile::new(&files.state.state);
    let prior = state_file.load()?;

    output.start_timer();
    output.target(&prior.function_id, &prior.version_id);
    output.progress(&format!("Updating {}", prior.import_id()));

    let resource = provider.resource().await?;
    let state = resource.update(&desired, &prior).await?;
    state_file.save(&state)?;

    output.result(&format!("updated {}", state.import_id()), &state);
    output.success("Update complete");
    Ok(())
}

/// Refresh the state file. A version that no longer exists drops the file.
pub async fn refresh(state: &StateArg, provider: &Provider, mut output: Output) -> Result<()> {
    let state_file = StateFile::new(&state.state);
    let prior = state_file.load()?;
    output.target(&prior.function_id, &prior.version_id);

    let resource = provider.resource().await?;
    match resource.read(&prior).await? {
        Some(current) => {
            state_file.save(&current)?;
            output.result(&format!("refreshed {}", current.import_id()), &current);
        }
        None => {
            state_file.remove()?;
            output.result(
                &format!("{} no longer exists; state removed", prior.import_id()),
                &serde_json::Value::Null,
            );
        }
    }
    Ok(())
}

/// Delete the recorded version and its state file.
pub async fn delete(state: &StateArg, provider: &Provider, mut output: Output) -> Result<()> {
    let state_file = StateFile::new(&state.state);
    let prior = state_file.load()?;

    output.start_timer();
    output.target(&prior.function_id, &prior.version_id);
    output.progress(&format!("Deleting {}", prior.import_id()));

    let resource = provider.resource().await?;
    resource.delete(&prior).await?;
    state_file.remove()?;

    output.success(&format!("Deleted {}", prior.import_id()));
    Ok(())
}

/// Adopt an existing version into a new state file.
pub async fn import(
    id: &str,
    state: &StateArg,
    provider: &Provider,
    mut output: Output,
) -> Result<()> {
    let state_file = StateFile::new(&state.state);
    if state_file.exists() {
        return Err(Error::AlreadyExists(state_file.path().to_path_buf()));
    }

    let resource = provider.resource().await?;
    let imported = resource.import(id).await?;
    state_file.save(&imported)?;

    output.target(&imported.function_id, &imported.version_id);
    output.result(&format!("imported {}", imported.import_id()), &imported);
    Ok(())
}
