use super::order::Order;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Completed vs. pending order counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub completed: usize,
    pub pending: usize,
}

impl StatusCounts {
    /// Partitions `orders` by `is_completed`. Both groups are always present.
    pub fn of(orders: &[Order]) -> Self {
        let completed = orders.iter().filter(|o| o.is_completed).count();
        Self {
            completed,
            pending: orders.len() - completed,
        }
    }
}

/// What happened during a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CycleOutcome {
    Reconciled {
        payments: usize,
        rejected: usize,
        newly_completed: usize,
    },
    /// Reconciliation was skipped; counts reflect the previous cycle.
    FetchFailed { reason: String },
}

/// Emitted to the reporter after each cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleSummary {
    pub cycle: u64,
    pub completed_count: usize,
    pub pending_count: usize,
    pub timestamp: DateTime<Utc>,
    pub outcome: CycleOutcome,
}

impl CycleSummary {
    pub fn new(cycle: u64, orders: &[Order], outcome: CycleOutcome) -> Self {
        let counts = StatusCounts::of(orders);
        Self {
            cycle,
            completed_count: counts.completed,
            pending_count: counts.pending,
            timestamp: Utc::now(),
            outcome,
        }
    }
}
