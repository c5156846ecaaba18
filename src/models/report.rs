use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Countries,
    Seasons,
    Leagues,
    Teams,
    Venues,
}

impl Step {
    pub const ORDER: [Step; 5] = [
        Step::Countries,
        Step::Seasons,
        Step::Leagues,
        Step::Teams,
        Step::Venues,
    ];
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Step::Countries => write!(f, "countries"),
            Step::Seasons => write!(f, "seasons"),
            Step::Leagues => write!(f, "leagues"),
            Step::Teams => write!(f, "teams"),
            Step::Venues => write!(f, "venues"),
        }
    }
}

/// Outcome of one collection step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StepReport {
    pub step: Step,
    pub records: u64,
    pub files: Vec<PathBuf>,
    /// Identifiers handed to the next step (leagues and teams only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ids: Option<Vec<u64>>,
}

impl StepReport {
    pub fn new(step: Step, records: u64, files: Vec<PathBuf>) -> Self {
        Self {
            step,
            records,
            files,
            ids: None,
        }
    }

    pub fn with_ids(mut self, ids: Vec<u64>) -> Self {
        self.ids = Some(ids);
        self
    }

    pub fn ids(&self) -> &[u64] {
        self.ids.as_deref().unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub year: i32,
    pub output_dir: PathBuf,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub steps: Vec<StepReport>,
}

impl RunSummary {
    pub fn files_written(&self) -> usize {
        self.steps.iter().map(|s| s.files.len()).sum()
    }

    pub fn step(&self, step: Step) -> Option<&StepReport> {
        self.steps.iter().find(|s| s.step == step)
    }
}
