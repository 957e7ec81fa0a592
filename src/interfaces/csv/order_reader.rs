use super::record_reader::RecordReader;
use crate::domain::order::{Order, OrderRecord, ensure_unique_ids};
use crate::error::Result;
use std::io::Read;

/// Loads the initial order set from CSV.
///
/// Orders are only supplied once, at startup, so any unreadable row, missing
/// field or repeated `order_id` fails the whole load.
pub fn load_orders<R: Read>(source: R) -> Result<Vec<Order>> {
    let orders = RecordReader::new(source)
        .records::<OrderRecord>()
        .map(|record| Order::try_from(record?))
        .collect::<Result<Vec<_>>>()?;
    ensure_unique_ids(&orders)?;
    Ok(orders)
}
