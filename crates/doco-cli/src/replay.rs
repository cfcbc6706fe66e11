//! Replay a script against a fresh coordinator.

use std::sync::Arc;

use doco_core::{AppCoordinator, CoreConfig, Snapshot};
use serde::Serialize;
use tracing::{Instrument, debug, info_span};

use crate::script::Script;

#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    /// 1-based position in the script.
    pub step: usize,
    pub intent: String,
    /// Rejection message; `None` when the intent was applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected: Option<String>,
    /// Snapshot revision after the step.
    pub revision: u64,
}

impl StepOutcome {
    pub fn accepted(&self) -> bool {
        self.rejected.is_none()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplayResult {
    pub steps: Vec<StepOutcome>,
    pub snapshot: Snapshot,
}

impl ReplayResult {
    pub fn rejected_count(&self) -> usize {
        self.steps.iter().filter(|s| !s.accepted()).count()
    }
}

/// Run every intent of `script` in order. Rejections are recorded, not fatal.
pub async fn replay(script: &Script, config: CoreConfig) -> ReplayResult {
    let coordinator = AppCoordinator::new(
        config,
        Arc::new(script.session.provider()),
        Arc::new(script.document_source()),
    );

    let mut steps = Vec::with_capacity(script.intents.len());
    for (idx, intent) in script.intents.iter().enumerate() {
        let step = idx + 1;
        let label = intent.to_string();
        let rejected = coordinator
            .dispatch(intent.clone())
            .instrument(info_span!("step", step, intent = intent.name()))
            .await
            .err()
            .map(|error| error.to_string());
        let revision = coordinator.snapshot().revision;
        debug!(step, accepted = rejected.is_none(), revision, "step replayed");
        steps.push(StepOutcome {
            step,
            intent: label,
            rejected,
            revision,
        });
    }

    ReplayResult {
        steps,
        snapshot: Snapshot::clone(&coordinator.snapshot()),
    }
}
