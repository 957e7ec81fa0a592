//! CSV input for order files and payment feeds.

pub mod order_reader;
pub mod record_reader;
