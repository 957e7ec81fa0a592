use crate::domain::order::{OrderId, non_blank};
use crate::error::{RecordKind, Result, SyncError};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Identifies the shop a payment belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShopId(String);

impl ShopId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ShopId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ShopId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A validated payment.
///
/// `pay_id` is the id of the order this payment confirms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub pay_id: OrderId,
    pub shop_id: ShopId,
    pub total_price: Option<Decimal>,
    pub card_number: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Payment {
    pub fn new(pay_id: impl Into<OrderId>, shop_id: impl Into<ShopId>) -> Self {
        Self {
            pay_id: pay_id.into(),
            shop_id: shop_id.into(),
            total_price: None,
            card_number: None,
            created_at: None,
        }
    }
}

/// Wire shape of a payment as delivered by a payment source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub pay_id: Option<String>,
    pub shop_id: Option<String>,
    pub total_price: Option<Decimal>,
    pub card_number: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<Payment> for PaymentRecord {
    fn from(payment: Payment) -> Self {
        Self {
            pay_id: Some(payment.pay_id.to_string()),
            shop_id: Some(payment.shop_id.0),
            total_price: payment.total_price,
            card_number: payment.card_number,
            created_at: payment.created_at,
        }
    }
}

impl TryFrom<PaymentRecord> for Payment {
    type Error = SyncError;

    fn try_from(record: PaymentRecord) -> Result<Self> {
        let pay_id = non_blank(record.pay_id)
            .ok_or_else(|| SyncError::malformed(RecordKind::Payment, "missing pay_id"))?;
        let shop_id = non_blank(record.shop_id).ok_or_else(|| {
            SyncError::malformed(
                RecordKind::Payment,
                format!("payment {pay_id} is missing shop_id"),
            )
        })?;

        Ok(Self {
            pay_id: OrderId::new(pay_id),
            shop_id: ShopId(shop_id),
            total_price: record.total_price,
            card_number: record.card_number,
            created_at: record.created_at,
        })
    }
}

/// Payments accepted from one fetch, plus how many records were dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentBatch {
    pub payments: Vec<Payment>,
    pub rejected: usize,
}

impl PaymentBatch {
    /// Validates raw records, skipping the ones that cannot be identified.
    pub fn from_records(records: Vec<PaymentRecord>) -> Self {
        let mut batch = Self::default();
        for record in records {
            match Payment::try_from(record) {
                Ok(payment) => batch.payments.push(payment),
                Err(e) => {
                    warn!(error = %e, "Skipping payment record");
                    batch.rejected += 1;
                }
            }
        }
        batch
    }
}
