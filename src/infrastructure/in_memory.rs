use crate::domain::payment::{Payment, PaymentRecord, ShopId};
use crate::domain::ports::PaymentSource;
use crate::error::FetchError;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

type FetchResult = Result<Vec<PaymentRecord>, FetchError>;

/// A scripted payment source: each fetch pops the next queued result.
///
/// Batches are returned verbatim, without filtering by scope or window, so
/// tests can inject foreign or malformed records. Once the queue is drained
/// every fetch returns an empty batch.
///
/// Clones share the same queue.
#[derive(Default, Clone)]
pub struct InMemoryPaymentSource {
    queue: Arc<Mutex<VecDeque<FetchResult>>>,
    fetches: Arc<AtomicUsize>,
}

impl InMemoryPaymentSource {
    /// Creates a new, empty in-memory payment source.
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push_batch(&self, payments: Vec<Payment>) {
        let records = payments.into_iter().map(PaymentRecord::from).collect();
        self.push_records(Ok(records)).await;
    }

    pub async fn push_failure(&self, error: FetchError) {
        self.push_records(Err(error)).await;
    }

    pub async fn push_records(&self, result: FetchResult) {
        self.queue.lock().await.push_back(result);
    }

    /// How many times `fetch_payments` has been called.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentSource for InMemoryPaymentSource {
    async fn fetch_payments(&self, _scope: &ShopId, _since: Duration) -> FetchResult {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.queue.lock().await.pop_front().unwrap_or(Ok(Vec::new()))
    }
}
