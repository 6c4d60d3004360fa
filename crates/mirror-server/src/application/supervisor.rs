//! Top-level supervision of the transport run loop.
//!
//! The transport runs inside a dedicated Tokio task.  Whatever escapes it (an
//! error or a panic) ends up here, is logged once with the task identity, and
//! then, if the fault carries a list of valid alternatives, is followed by a
//! short "try one of these" hint.  Hints are advisory: they never change what
//! happens next, and nothing is retried.

use std::future::Future;

use anyhow::anyhow;
use thiserror::Error;
use tracing::{error, info};

use mirror_core::DisplayError;

/// Runtime faults raised while starting or running a session.
#[derive(Debug, Error)]
pub enum SessionFault {
    /// The requested display does not exist.
    #[error("invalid display id: {display_id}")]
    InvalidDisplayId {
        display_id: i32,
        available: Vec<i32>,
    },

    /// The requested video encoder is not offered by the device.
    #[error("invalid encoder name: '{name}'")]
    InvalidEncoder { name: String, available: Vec<String> },

    /// The display service itself failed.
    #[error(transparent)]
    Display(#[from] DisplayError),
}

/// Builds the hint lines for `err`, if it (or anything in its cause chain)
/// is a [`SessionFault`] with alternatives.
///
/// Returns an empty list for any other error.
pub fn suggest_fix(err: &anyhow::Error) -> Vec<String> {
    let Some(fault) = err.chain().find_map(|cause| cause.downcast_ref::<SessionFault>()) else {
        return Vec::new();
    };

    let mut hints = Vec::new();
    match fault {
        SessionFault::InvalidDisplayId { available, .. } if !available.is_empty() => {
            hints.push("Try to use one of the available display ids:".to_string());
            hints.extend(available.iter().map(|id| format!("    --display {id}")));
        }
        SessionFault::InvalidEncoder { available, .. } if !available.is_empty() => {
            hints.push("Try to use one of the available encoders:".to_string());
            hints.extend(available.iter().map(|name| format!("    --encoder '{name}'")));
        }
        _ => {}
    }
    hints
}

/// Runs `run_loop` in its own task named `task_name` and reports how it ended.
///
/// # Errors
///
/// Returns the run loop's error unchanged, or a new error if the task
/// panicked or was cancelled.
pub async fn supervise<F>(task_name: &str, run_loop: F) -> anyhow::Result<()>
where
    F: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    let outcome = match tokio::spawn(run_loop).await {
        Ok(result) => result,
        Err(join_err) if join_err.is_panic() => {
            Err(anyhow!("task '{task_name}' panicked: {join_err}"))
        }
        Err(join_err) => Err(anyhow!("task '{task_name}' was cancelled: {join_err}")),
    };

    match &outcome {
        Ok(()) => info!("task '{task_name}' finished"),
        Err(e) => {
            error!("exception on task '{task_name}': {e:#}");
            for hint in suggest_fix(e) {
                error!("{hint}");
            }
        }
    }
    outcome
}

// ── Tests ─────────────────────────────────────────────────────────────────────
