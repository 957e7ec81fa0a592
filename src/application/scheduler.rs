use crate::application::reconciler::reconcile_detailed;
use crate::config::{FetchFailurePolicy, SchedulerConfig};
use crate::domain::order::Order;
use crate::domain::payment::PaymentBatch;
use crate::domain::ports::{PaymentSourceBox, SummaryReporterBox};
use crate::domain::summary::{CycleOutcome, CycleSummary};
use crate::error::{FetchError, Result};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{Instant, timeout};
use tracing::{debug, error, info, warn};

/// Time left to sleep so that a cycle lasts roughly `period`.
///
/// Returns zero when the cycle already took `period` or longer; there is no
/// catch-up for earlier overruns.
pub fn next_delay(period: Duration, elapsed: Duration) -> Duration {
    period.saturating_sub(elapsed)
}

/// Drives the fetch → reconcile → summarize loop.
///
/// The scheduler is the single owner of the order set. Each cycle hands the
/// set to the reconciler by value and stores the returned replacement, so no
/// locking is involved.
pub struct Scheduler {
    config: SchedulerConfig,
    orders: Vec<Order>,
    source: PaymentSourceBox,
    reporter: SummaryReporterBox,
    cycle: u64,
}

impl Scheduler {
    /// Creates a new `Scheduler` instance.
    ///
    /// # Arguments
    ///
    /// * `config` - Scope, period and failure policy.
    /// * `orders` - The initial order set, already validated.
    /// * `source` - Where payments come from each cycle.
    /// * `reporter` - Receives the summary at the end of each cycle.
    pub fn new(
        config: SchedulerConfig,
        orders: Vec<Order>,
        source: PaymentSourceBox,
        reporter: SummaryReporterBox,
    ) -> Self {
        Self {
            config,
            orders,
            source,
            reporter,
            cycle: 0,
        }
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Number of cycles started so far.
    pub fn cycles(&self) -> u64 {
        self.cycle
    }

    /// Runs a single cycle without the trailing sleep.
    ///
    /// A failed fetch leaves the orders untouched and still produces a summary.
    /// Under [`FetchFailurePolicy::Abort`] the error is returned after reporting.
    pub async fn run_cycle(&mut self) -> Result<CycleSummary> {
        self.cycle += 1;
        let cycle = self.cycle;
        let scope = &self.config.scope;

        debug!(cycle, %scope, "Requesting payments");
        let fetched = match timeout(
            self.config.fetch_timeout,
            self.source.fetch_payments(scope, self.config.since_window),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(self.config.fetch_timeout)),
        };

        let (outcome, failure) = match fetched {
            Ok(records) => {
                let batch = PaymentBatch::from_records(records);
                let result =
                    reconcile_detailed(std::mem::take(&mut self.orders), &batch.payments, scope);
                self.orders = result.orders;

                if result.out_of_scope > 0 {
                    debug!(cycle, ignored = result.out_of_scope, "Ignored out-of-scope payments");
                }
                for order_id in &result.newly_completed {
                    debug!(cycle, %order_id, "Order completed");
                }
                let outcome = CycleOutcome::Reconciled {
                    payments: batch.payments.len(),
                    rejected: batch.rejected,
                    newly_completed: result.newly_completed.len(),
                };
                (outcome, None)
            }
            Err(e) => {
                error!(cycle, error = %e, "Payment fetch failed, skipping reconciliation");
                let outcome = CycleOutcome::FetchFailed {
                    reason: e.to_string(),
                };
                (outcome, Some(e))
            }
        };

        let summary = CycleSummary::new(cycle, &self.orders, outcome);
        self.reporter.report(&summary)?;

        match failure {
            Some(e) if self.config.on_fetch_failure == FetchFailurePolicy::Abort => Err(e.into()),
            _ => Ok(summary),
        }
    }

    /// Runs cycles until shut down or until `max_cycles` is reached, then
    /// returns the final order set.
    ///
    /// Shutdown is only honoured between cycles: before a fetch starts or
    /// while sleeping. A cycle in progress always finishes.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> Result<Vec<Order>> {
        info!(
            scope = %self.config.scope,
            period = ?self.config.period,
            orders = self.orders.len(),
            "Starting reconciliation loop"
        );

        loop {
            if *shutdown.borrow() {
                info!(cycles = self.cycle, "Shutdown requested");
                break;
            }
            if self.cycles_exhausted() {
                break;
            }

            let started = Instant::now();
            self.run_cycle().await?;
            if self.cycles_exhausted() {
                break;
            }

            let elapsed = started.elapsed();
            let delay = next_delay(self.config.period, elapsed);
            if delay.is_zero() {
                warn!(cycle = self.cycle, ?elapsed, "Cycle overran its period");
                continue;
            }

            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = wait_for_shutdown(&mut shutdown) => {
                    info!(cycles = self.cycle, "Shutdown requested");
                    break;
                }
            }
        }

        info!(cycles = self.cycle, "Reconciliation loop stopped");
        Ok(self.orders)
    }

    fn cycles_exhausted(&self) -> bool {
        self.config
            .max_cycles
            .is_some_and(|max| self.cycle >= max)
    }
}

async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    // A dropped sender can never signal, so wait forever.
    if shutdown.wait_for(|stop| *stop).await.is_err() {
        std::future::pending::<()>().await;
    }
}
