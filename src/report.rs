//! Run report: per-step outcomes plus totals, printable and exportable as JSON

use serde::Serialize;
use std::fs;
use std::io;
use std::path::Path;
use uuid::Uuid;

use crate::sequencer::{Outcome, Sequencer, StepRecord};
use crate::utils::unix_now;

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: String,
    pub target: String,
    pub started_at: u64,
    pub finished_at: u64,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub deselected: Vec<String>,
    pub steps: Vec<StepRecord>,
}

impl RunReport {
    pub fn new_run_id() -> String {
        Uuid::new_v4().to_string()
    }

    pub fn from_sequencer(run_id: String, target: &str, started_at: u64, seq: Sequencer) -> Self {
        let (steps, deselected) = seq.into_parts();
        let count = |f: fn(&Outcome) -> bool| steps.iter().filter(|r| f(&r.outcome)).count();

        RunReport {
            run_id,
            target: target.to_string(),
            started_at,
            finished_at: unix_now(),
            passed: count(|o| matches!(o, Outcome::Passed)),
            failed: count(|o| matches!(o, Outcome::Failed { .. })),
            skipped: count(|o| matches!(o, Outcome::Skipped { .. })),
            deselected,
            steps,
        }
    }

    pub fn success(&self) -> bool {
        self.failed == 0
    }

    pub fn step(&self, id: &str) -> Option<&StepRecord> {
        self.steps.iter().find(|r| r.id == id)
    }

    /// One line per step followed by a totals line
    pub fn render(&self) -> String {
        let mut out = String::new();
        for record in &self.steps {
            out.push_str(&format!("{:<8} {}", record.outcome.label(), record.id));
            match &record.outcome {
                Outcome::Failed { reason } => out.push_str(&format!(" - {}", reason)),
                Outcome::Skipped { missing } => {
                    out.push_str(&format!(" - depends on {}", missing.join(", ")))
                }
                Outcome::Passed => {}
            }
            out.push('\n');
        }
        out.push_str(&self.summary_line());
        out
    }

    pub fn summary_line(&self) -> String {
        format!(
            "{} passed, {} failed, {} skipped, {} deselected (run {})",
            self.passed,
            self.failed,
            self.skipped,
            self.deselected.len(),
            self.run_id
        )
    }

    pub fn write_json(&self, path: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        fs::write(path, json)
    }
}
