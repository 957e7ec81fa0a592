use crate::error::{RecordKind, Result, SyncError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Stable identifier of an order.
///
/// Payments carry the same identifier as their correlation key (`pay_id`), so
/// this type is shared by both sides of the reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OrderId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for OrderId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// An order in the working set.
///
/// Only `is_completed` is ever changed after creation, and only from `false`
/// to `true`. The remaining fields are carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub customer_id: String,
    pub order_item: String,
    /// Masked card number, e.g. `****-****-****-1234`.
    pub card_number: String,
    pub created_at: DateTime<Utc>,
    pub is_completed: bool,
}

impl Order {
    /// Creates a pending order with empty descriptive fields.
    pub fn new(order_id: impl Into<OrderId>, created_at: DateTime<Utc>) -> Self {
        Self {
            order_id: order_id.into(),
            customer_id: String::new(),
            order_item: String::new(),
            card_number: String::new(),
            created_at,
            is_completed: false,
        }
    }

    /// Returns a copy of this order marked as completed.
    pub fn completed(self) -> Self {
        Self {
            is_completed: true,
            ..self
        }
    }
}

/// Wire shape of an order as read from CSV or JSON.
///
/// Every field is optional here; `Order::try_from` decides what is required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order_id: Option<String>,
    pub customer_id: Option<String>,
    pub order_item: Option<String>,
    pub card_number: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub is_completed: Option<bool>,
}

impl From<Order> for OrderRecord {
    fn from(order: Order) -> Self {
        Self {
            order_id: Some(order.order_id.0),
            customer_id: Some(order.customer_id),
            order_item: Some(order.order_item),
            card_number: Some(order.card_number),
            created_at: Some(order.created_at),
            is_completed: Some(order.is_completed),
        }
    }
}

/// Treats blank strings the same as a missing field.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl TryFrom<OrderRecord> for Order {
    type Error = SyncError;

    fn try_from(record: OrderRecord) -> Result<Self> {
        let order_id = non_blank(record.order_id)
            .ok_or_else(|| SyncError::malformed(RecordKind::Order, "missing order_id"))?;
        let created_at = record.created_at.ok_or_else(|| {
            SyncError::malformed(
                RecordKind::Order,
                format!("order {order_id} is missing created_at"),
            )
        })?;

        Ok(Self {
            order_id: OrderId(order_id),
            customer_id: record.customer_id.unwrap_or_default(),
            order_item: record.order_item.unwrap_or_default(),
            card_number: record.card_number.unwrap_or_default(),
            created_at,
            is_completed: record.is_completed.unwrap_or(false),
        })
    }
}

/// Rejects an order set in which any `order_id` appears twice.
pub fn ensure_unique_ids(orders: &[Order]) -> Result<()> {
    let mut seen = HashSet::with_capacity(orders.len());
    for order in orders {
        if !seen.insert(&order.order_id) {
            return Err(SyncError::DuplicateOrder(order.order_id.clone()));
        }
    }
    Ok(())
}
