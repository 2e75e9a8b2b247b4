//! Step sequencer with checkpoint-based dependency gating
//!
//! Handles:
//! - Running steps strictly in registration order
//! - Skipping steps whose prerequisite checkpoints are not satisfied
//! - Recording checkpoints for later steps
//! - Step selection (deselected steps never run and record nothing)

use serde::Serialize;
use std::collections::HashMap;
use std::future::Future;
use std::time::Instant;
use tracing::Instrument;

use crate::error::StepError;
use crate::utils::unix_now;

/// A step's identity and the checkpoints it needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepSpec {
    /// Unique id, including parameters, e.g. `test_006_check_shadow_copies[SMB1]`
    pub id: String,
    /// Checkpoint recorded by this step
    pub checkpoint: &'static str,
    pub depends: Vec<&'static str>,
}

impl StepSpec {
    pub fn new(id: impl Into<String>, checkpoint: &'static str, depends: &[&'static str]) -> Self {
        StepSpec {
            id: id.into(),
            checkpoint,
            depends: depends.to_vec(),
        }
    }
}

/// Terminal outcome of a step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Passed,
    Failed { reason: String },
    Skipped { missing: Vec<String> },
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Passed => "PASSED",
            Outcome::Failed { .. } => "FAILED",
            Outcome::Skipped { .. } => "SKIPPED",
        }
    }
}

/// One executed (or skipped) step
#[derive(Debug, Clone, Serialize)]
pub struct StepRecord {
    pub id: String,
    pub checkpoint: String,
    #[serde(flatten)]
    pub outcome: Outcome,
    pub started_at: u64,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CheckpointState {
    Satisfied,
    /// At least one step under this checkpoint did not pass
    Broken,
}

/// Substring filters over step ids; empty selects everything
#[derive(Debug, Clone, Default)]
pub struct Selection {
    patterns: Vec<String>,
}

impl Selection {
    pub fn all() -> Self {
        Selection::default()
    }

    pub fn matching(patterns: Vec<String>) -> Self {
        Selection {
            patterns: patterns.into_iter().filter(|p| !p.is_empty()).collect(),
        }
    }

    pub fn matches(&self, id: &str) -> bool {
        self.patterns.is_empty() || self.patterns.iter().any(|p| id.contains(p.as_str()))
    }
}

/// Owns the checkpoint map for a single run
#[derive(Debug, Default)]
pub struct Sequencer {
    checkpoints: HashMap<String, CheckpointState>,
    records: Vec<StepRecord>,
    deselected: Vec<String>,
    selection: Selection,
}

impl Sequencer {
    pub fn new() -> Self {
        Sequencer::default()
    }

    pub fn with_selection(selection: Selection) -> Self {
        Sequencer {
            selection,
            ..Sequencer::default()
        }
    }

    pub fn is_satisfied(&self, checkpoint: &str) -> bool {
        self.checkpoints.get(checkpoint) == Some(&CheckpointState::Satisfied)
    }

    /// Prerequisites of `spec` that are not satisfied yet
    pub fn missing_prerequisites(&self, spec: &StepSpec) -> Vec<String> {
        spec.depends
            .iter()
            .filter(|dep| !self.is_satisfied(dep))
            .map(|dep| dep.to_string())
            .collect()
    }

    /// Gate and run one step.
    ///
    /// `body` is only polled when every prerequisite is satisfied, so a gated
    /// step's side effects never happen. Returns None for deselected steps.
    pub async fn run<Fut>(&mut self, spec: &StepSpec, body: Fut) -> Option<Outcome>
    where
        Fut: Future<Output = Result<(), StepError>>,
    {
        if !self.selection.matches(&spec.id) {
            tracing::debug!(step = %spec.id, "deselected");
            self.deselected.push(spec.id.clone());
            return None;
        }

        let started_at = unix_now();
        let start = Instant::now();

        let missing = self.missing_prerequisites(spec);
        let outcome = if !missing.is_empty() {
            tracing::warn!(step = %spec.id, ?missing, "skipped: prerequisite checkpoints not satisfied");
            Outcome::Skipped { missing }
        } else {
            let span = tracing::info_span!("step", id = %spec.id);
            match body.instrument(span).await {
                Ok(()) => Outcome::Passed,
                Err(e) => {
                    tracing::warn!(step = %spec.id, error = %e, "step failed");
                    Outcome::Failed {
                        reason: e.to_string(),
                    }
                }
            }
        };

        let elapsed_ms = start.elapsed().as_millis() as u64;
        tracing::info!(step = %spec.id, outcome = outcome.label(), elapsed_ms, "step finished");
        self.record(spec, outcome.clone(), started_at, elapsed_ms);
        Some(outcome)
    }

    /// Mark `checkpoint` satisfied without running a step.
    ///
    /// Used for markers that track external state rather than a step
    /// outcome; a checkpoint already broken by a step stays broken.
    pub fn satisfy(&mut self, checkpoint: &str) {
        self.checkpoints
            .entry(checkpoint.to_string())
            .or_insert(CheckpointState::Satisfied);
    }

    fn record(&mut self, spec: &StepSpec, outcome: Outcome, started_at: u64, elapsed_ms: u64) {
        let state = match outcome {
            Outcome::Passed => CheckpointState::Satisfied,
            _ => CheckpointState::Broken,
        };
        self.checkpoints
            .entry(spec.checkpoint.to_string())
            .and_modify(|existing| {
                if state == CheckpointState::Broken {
                    *existing = CheckpointState::Broken;
                }
            })
            .or_insert(state);

        self.records.push(StepRecord {
            id: spec.id.clone(),
            checkpoint: spec.checkpoint.to_string(),
            outcome,
            started_at,
            elapsed_ms,
        });
    }

    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    pub fn deselected(&self) -> &[String] {
        &self.deselected
    }

    pub fn has_failures(&self) -> bool {
        self.records
            .iter()
            .any(|r| matches!(r.outcome, Outcome::Failed { .. }))
    }

    pub fn into_parts(self) -> (Vec<StepRecord>, Vec<String>) {
        (self.records, self.deselected)
    }
}
