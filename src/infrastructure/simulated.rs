use crate::domain::order::Order;
use crate::domain::payment::{PaymentRecord, ShopId};
use crate::domain::ports::PaymentSource;
use crate::error::FetchError;
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use std::ops::RangeInclusive;
use std::time::Duration;
use tokio::sync::Mutex;

const CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const ORDER_MAX_AGE_SECS: u64 = 600;

fn random_code(rng: &mut impl Rng, len: usize) -> String {
    (0..len)
        .map(|_| CODE_CHARSET[rng.gen_range(0..CODE_CHARSET.len())] as char)
        .collect()
}

fn masked_card(rng: &mut impl Rng) -> String {
    format!("****-****-****-{}", rng.gen_range(1000..=9999))
}

/// Ages beyond what `DateTime` can represent clamp to its earliest value.
fn seconds_ago(rng: &mut impl Rng, max_secs: u64) -> DateTime<Utc> {
    let now = Utc::now();
    let secs = rng.gen_range(0..=max_secs);
    i64::try_from(secs)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .and_then(|age| now.checked_sub_signed(age))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Seeds from `seed` when given, otherwise from OS entropy.
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Generates `count` pending orders with ids `ORDER_0..ORDER_{count-1}`.
pub fn mock_orders(count: usize, rng: &mut impl Rng) -> Vec<Order> {
    (0..count)
        .map(|i| Order {
            customer_id: random_code(rng, 6),
            order_item: random_code(rng, 5),
            card_number: masked_card(rng),
            ..Order::new(format!("ORDER_{i}"), seconds_ago(rng, ORDER_MAX_AGE_SECS))
        })
        .collect()
}

/// Produces a fresh random batch on every fetch.
///
/// Each batch confirms `ORDER_0..ORDER_{n-1}` for a random `n` in the batch
/// size range, so later batches re-deliver ids already seen.
pub struct SimulatedPaymentSource {
    rng: Mutex<StdRng>,
    batch_size: RangeInclusive<usize>,
}

impl SimulatedPaymentSource {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            rng: Mutex::new(rng_from_seed(seed)),
            batch_size: 10..=20,
        }
    }

    pub fn with_batch_size(mut self, batch_size: RangeInclusive<usize>) -> Self {
        self.batch_size = batch_size;
        self
    }
}

#[async_trait]
impl PaymentSource for SimulatedPaymentSource {
    async fn fetch_payments(
        &self,
        scope: &ShopId,
        since: Duration,
    ) -> Result<Vec<PaymentRecord>, FetchError> {
        let mut rng = self.rng.lock().await;
        let count = if self.batch_size.is_empty() {
            0
        } else {
            rng.gen_range(self.batch_size.clone())
        };

        let records = (0..count)
            .map(|i| PaymentRecord {
                pay_id: Some(format!("ORDER_{i}")),
                shop_id: Some(scope.to_string()),
                total_price: Some(Decimal::from(rng.gen_range(1000..=50000_i64))),
                card_number: Some(masked_card(&mut *rng)),
                created_at: Some(seconds_ago(&mut *rng, since.as_secs())),
            })
            .collect();
        Ok(records)
    }
}
