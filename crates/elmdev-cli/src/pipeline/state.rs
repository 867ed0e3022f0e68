//! Build status tracking.
//!
//! Cycle: `Idle` → `Building` → `Succeeded` | `Failed`. The two terminal
//! states are idle as well; they only remember how the last cycle ended.

use super::StageError;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildStatus {
    /// No cycle has run yet
    Idle,
    /// A cycle is running
    Building { cycle: u64, started_at: Instant },
    /// Last cycle finished with every stage succeeding
    Succeeded { cycle: u64, duration_ms: u64 },
    /// Last cycle finished with at least one failed stage
    Failed { cycle: u64, failures: Vec<StageError> },
}

impl BuildStatus {
    pub fn is_building(&self) -> bool {
        matches!(self, BuildStatus::Building { .. })
    }

    /// Not building: either nothing ran yet or the last cycle ended.
    pub fn is_idle(&self) -> bool {
        !self.is_building()
    }

    pub fn is_success(&self) -> bool {
        matches!(self, BuildStatus::Succeeded { .. })
    }

    pub fn failures(&self) -> &[StageError] {
        match self {
            BuildStatus::Failed { failures, .. } => failures,
            _ => &[],
        }
    }
}

/// Shared, thread-safe build state.
#[derive(Debug)]
pub struct BuildState {
    status: RwLock<BuildStatus>,
    cycles: AtomicU64,
}

impl Default for BuildState {
    fn default() -> Self {
        Self::new()
    }
}

impl BuildState {
    pub fn new() -> Self {
        Self {
            status: RwLock::new(BuildStatus::Idle),
            cycles: AtomicU64::new(0),
        }
    }

    /// Enter `Building` and return the new cycle number (starting at 1).
    pub fn start(&self) -> u64 {
        let cycle = self.cycles.fetch_add(1, Ordering::SeqCst) + 1;
        *self.status.write() = BuildStatus::Building {
            cycle,
            started_at: Instant::now(),
        };
        cycle
    }

    pub fn succeed(&self, cycle: u64, duration_ms: u64) {
        *self.status.write() = BuildStatus::Succeeded { cycle, duration_ms };
    }

    pub fn fail(&self, cycle: u64, failures: Vec<StageError>) {
        *self.status.write() = BuildStatus::Failed { cycle, failures };
    }

    pub fn status(&self) -> BuildStatus {
        self.status.read().clone()
    }

    /// Number of cycles started so far.
    pub fn cycles(&self) -> u64 {
        self.cycles.load(Ordering::SeqCst)
    }
}
