//! Application layer: the reconciliation algorithm and the loop that drives it.
//!
//! `reconciler` is a pure function over an order set and a payment batch.
//! `scheduler` owns the order set and repeats fetch → reconcile → summarize on a
//! fixed period, using `tokio` timers for the sleep between cycles.

pub mod reconciler;
pub mod scheduler;
