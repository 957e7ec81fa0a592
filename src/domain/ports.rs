use super::payment::{PaymentRecord, ShopId};
use super::summary::CycleSummary;
use crate::error::{FetchError, Result};
use async_trait::async_trait;
use std::time::Duration;

/// Supplies the payments observed for a shop within a look-back window.
///
/// Implementations may re-deliver records seen in earlier calls and may return
/// records with missing fields; both are tolerated downstream.
#[async_trait]
pub trait PaymentSource: Send + Sync {
    async fn fetch_payments(
        &self,
        scope: &ShopId,
        since: Duration,
    ) -> std::result::Result<Vec<PaymentRecord>, FetchError>;
}

/// Receives one summary at the end of every cycle.
pub trait SummaryReporter: Send {
    fn report(&mut self, summary: &CycleSummary) -> Result<()>;
}

pub type PaymentSourceBox = Box<dyn PaymentSource>;
pub type SummaryReporterBox = Box<dyn SummaryReporter>;
