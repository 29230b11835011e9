use crate::progress::ProgressReport;
use crate::{ChunkPlan, TransferError, TransferUnit};

/// Lifecycle of a single file transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

/// Mutable state of one file's chunked transfer.
///
/// Owned by a single orchestration; units must be confirmed strictly in
/// index order, which keeps `bytes_confirmed` monotonic.
#[derive(Debug, Clone)]
pub struct TransferSession {
    file_name: String,
    plan: ChunkPlan,
    current_chunk_index: u32,
    bytes_confirmed: u64,
    status: SessionStatus,
}

impl TransferSession {
    /// Creates a pending session for `file_name`.
    pub fn new(file_name: impl Into<String>, plan: ChunkPlan) -> Self {
        Self {
            file_name: file_name.into(),
            plan,
            current_chunk_index: 0,
            bytes_confirmed: 0,
            status: SessionStatus::Pending,
        }
    }

    /// Marks the session as in-progress.
    pub fn start(&mut self) {
        self.status = SessionStatus::InProgress;
    }

    /// The next unit to send, or `None` once every unit is confirmed.
    pub fn next_unit(&self) -> Option<TransferUnit> {
        self.plan.unit(self.current_chunk_index + 1).ok()
    }

    /// Records a server-acknowledged unit and returns the new progress.
    pub fn confirm(&mut self, unit: &TransferUnit) -> Result<ProgressReport, TransferError> {
        let expected = self.current_chunk_index + 1;
        if unit.index != expected {
            return Err(TransferError::OutOfOrder {
                expected,
                got: unit.index,
            });
        }
        self.current_chunk_index = unit.index;
        self.bytes_confirmed = self.plan.bytes_through(unit.index);
        if unit.is_last() {
            self.status = SessionStatus::Completed;
        }
        Ok(self.progress())
    }

    /// Marks the session as failed.
    pub fn fail(&mut self) {
        self.status = SessionStatus::Failed;
    }

    pub fn progress(&self) -> ProgressReport {
        ProgressReport {
            loaded: self.bytes_confirmed,
            total: self.plan.total_bytes(),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn total_bytes(&self) -> u64 {
        self.plan.total_bytes()
    }

    pub fn chunk_size(&self) -> u64 {
        self.plan.chunk_size()
    }

    pub fn total_chunks(&self) -> u32 {
        self.plan.total_chunks()
    }

    /// Index of the last confirmed unit (0 before the first confirmation).
    pub fn current_chunk_index(&self) -> u32 {
        self.current_chunk_index
    }

    pub fn bytes_confirmed(&self) -> u64 {
        self.bytes_confirmed
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }
}
