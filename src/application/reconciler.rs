use crate::domain::order::{Order, OrderId};
use crate::domain::payment::{Payment, ShopId};
use std::collections::HashSet;

/// Result of a reconciliation pass, with counters for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// Same orders, same sequence, with matched pending ones completed.
    pub orders: Vec<Order>,
    /// Orders completed by this pass, in input order.
    pub newly_completed: Vec<OrderId>,
    /// Payments ignored because they belong to another shop.
    pub out_of_scope: usize,
    /// Distinct in-scope keys that completed nothing.
    pub unmatched: usize,
}

/// Marks every pending order confirmed by an in-scope payment as completed.
///
/// Takes ownership of the order set and returns its replacement. Completed
/// orders are passed through untouched, so re-delivered payments are harmless.
pub fn reconcile(orders: Vec<Order>, payments: &[Payment], scope: &ShopId) -> Vec<Order> {
    reconcile_detailed(orders, payments, scope).orders
}

/// Same as [`reconcile`], also reporting what changed.
pub fn reconcile_detailed(
    orders: Vec<Order>,
    payments: &[Payment],
    scope: &ShopId,
) -> ReconcileOutcome {
    let mut keys: HashSet<&OrderId> = HashSet::with_capacity(payments.len());
    let mut out_of_scope = 0;
    for payment in payments {
        if &payment.shop_id == scope {
            keys.insert(&payment.pay_id);
        } else {
            out_of_scope += 1;
        }
    }

    let mut newly_completed = Vec::new();
    let orders: Vec<Order> = orders
        .into_iter()
        .map(|order| {
            if !order.is_completed && keys.contains(&order.order_id) {
                newly_completed.push(order.order_id.clone());
                order.completed()
            } else {
                order
            }
        })
        .collect();

    ReconcileOutcome {
        orders,
        unmatched: keys.len().saturating_sub(newly_completed.len()),
        newly_completed,
        out_of_scope,
    }
}
