use crate::{
    Result,
    console::{Console, Notice, Tone},
    gateway::{Diagnostic, Hypervisor},
    log_info, log_warn,
    machine::MachineState,
};

/// Longest machine name the clone prompt accepts.
pub const MAX_NAME_LEN: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowKind {
    Clone,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloneOutcome {
    /// Empty name; nothing shown, nothing issued.
    Cancelled,
    DuplicateName(String),
    SourceRunning,
    Cloned(String),
    Failed(Diagnostic),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    TargetRunning,
    Deleted,
    Failed(Diagnostic),
}

fn must_be_stopped(name: &str) -> Notice {
    Notice::new(Tone::Error, format!("'{}' is running", name))
        .with_detail("Shut the machine down first.")
}

/// Clones `source` under a name typed by the operator.
///
/// The name is checked against the live machine list and the source's live
/// state, not the displayed snapshot. At most one clone command is issued.
pub async fn clone_workflow<H, C>(gateway: &H, console: &mut C, source: &str) -> Result<CloneOutcome>
where
    H: Hypervisor + ?Sized,
    C: Console + ?Sized,
{
    let label = format!("Name for the clone of '{}':", source);
    let new_name = match console.prompt(&label, MAX_NAME_LEN)? {
        Some(raw) => raw.trim().to_string(),
        None => String::new(),
    };

    if new_name.is_empty() {
        return Ok(CloneOutcome::Cancelled);
    }

    if gateway.list_machines().await.iter().any(|name| *name == new_name) {
        console.acknowledge(
            &Notice::new(Tone::Error, format!("A machine named '{}' already exists", new_name))
                .with_detail("Pick another name."),
        )?;
        return Ok(CloneOutcome::DuplicateName(new_name));
    }

    if gateway.query_state(source).await == MachineState::Running {
        console.acknowledge(&must_be_stopped(source))?;
        return Ok(CloneOutcome::SourceRunning);
    }

    console.progress(&Notice::new(
        Tone::Info,
        format!("Cloning '{}' to '{}'...", source, new_name),
    ))?;

    match gateway.clone_machine(source, &new_name).await {
        Ok(()) => {
            log_info!("Clone '{}' created from '{}'", new_name, source);
            console.acknowledge(
                &Notice::new(Tone::Success, "Clone complete")
                    .with_detail(format!("'{}' has been created.", new_name)),
            )?;
            Ok(CloneOutcome::Cloned(new_name))
        }
        Err(diagnostic) => {
            log_warn!("Clone of '{}' to '{}' failed", source, new_name);
            console.acknowledge(
                &Notice::new(Tone::Error, "Clone failed").with_detail(diagnostic.0.clone()),
            )?;
            Ok(CloneOutcome::Failed(diagnostic))
        }
    }
}

/// Removes `name` and its storage, refusing while the machine runs.
pub async fn delete_workflow<H, C>(gateway: &H, console: &mut C, name: &str) -> Result<DeleteOutcome>
where
    H: Hypervisor + ?Sized,
    C: Console + ?Sized,
{
    if gateway.query_state(name).await == MachineState::Running {
        console.acknowledge(&must_be_stopped(name))?;
        return Ok(DeleteOutcome::TargetRunning);
    }

    console.progress(&Notice::new(Tone::Info, format!("Deleting '{}'...", name)))?;

    match gateway.destroy(name).await {
        Ok(()) => {
            log_info!("Machine '{}' deleted", name);
            console.acknowledge(&Notice::new(Tone::Success, format!("'{}' deleted", name)))?;
            Ok(DeleteOutcome::Deleted)
        }
        Err(diagnostic) => {
            console.acknowledge(
                &Notice::new(Tone::Error, "Delete failed").with_detail(diagnostic.0.clone()),
            )?;
            Ok(DeleteOutcome::Failed(diagnostic))
        }
    }
}
