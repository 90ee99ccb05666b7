use serde::{Deserialize, Serialize};

/// Lifecycle of the single process-wide batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    #[default]
    Idle,
    Processing,
    Complete,
    Error,
}

/// Snapshot of batch progress, overwritten at the start of each batch and
/// updated per file. Not candidate-scoped; a second concurrent batch is
/// rejected rather than allowed to interleave with it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub current: usize,
    pub total: usize,
    pub current_file: String,
    pub status: ProcessingStatus,
}

impl Progress {
    pub fn start(total: usize) -> Self {
        Self {
            current: 0,
            total,
            current_file: String::new(),
            status: ProcessingStatus::Processing,
        }
    }
}
