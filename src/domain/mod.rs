//! Domain types for order/payment reconciliation.
//!
//! Orders and payments come in as loosely typed records (`OrderRecord`,
//! `PaymentRecord`) and are validated into their strict counterparts before the
//! reconciler sees them. The ports module holds the traits that adapters implement.

pub mod order;
pub mod payment;
pub mod ports;
pub mod summary;
