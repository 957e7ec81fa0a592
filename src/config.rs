use crate::domain::payment::ShopId;
use std::time::Duration;

/// What the scheduler does when the payment source fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchFailurePolicy {
    /// Report an unchanged summary and wait for the next tick.
    #[default]
    SkipCycle,
    /// Report the summary, then return the error to the host.
    Abort,
}

/// Settings for the reconciliation loop.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Shop whose payments are reconciled.
    pub scope: ShopId,
    /// Target wall-clock length of one cycle.
    pub period: Duration,
    /// Look-back window passed to the payment source.
    pub since_window: Duration,
    /// Upper bound on a single fetch.
    pub fetch_timeout: Duration,
    /// Stop after this many cycles. `None` runs until shut down.
    pub max_cycles: Option<u64>,
    pub on_fetch_failure: FetchFailurePolicy,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            scope: ShopId::from("SHOP_001"),
            period: Duration::from_secs(5),
            since_window: Duration::from_secs(300),
            fetch_timeout: Duration::from_secs(10),
            max_cycles: None,
            on_fetch_failure: FetchFailurePolicy::SkipCycle,
        }
    }
}

impl SchedulerConfig {
    pub fn new(scope: impl Into<ShopId>) -> Self {
        Self {
            scope: scope.into(),
            ..Self::default()
        }
    }
}
