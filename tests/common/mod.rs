use std::io::Error;
use std::path::Path;

/// Writes `count` orders `ORDER_0..` with the ids listed in `completed` marked done.
pub fn generate_orders_csv(path: &Path, count: usize, completed: &[usize]) -> Result<(), Error> {
    let mut wtr = csv::WriterBuilder::new().from_path(path)?;
    wtr.write_record([
        "order_id",
        "customer_id",
        "order_item",
        "card_number",
        "created_at",
        "is_completed",
    ])?;

    for i in 0..count {
        let done = completed.contains(&i).to_string();
        wtr.write_record([
            format!("ORDER_{i}").as_str(),
            "CUST01",
            "ITEM1",
            "****-****-****-1234",
            "2024-05-01T10:00:00Z",
            done.as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes a payment feed from `(pay_id, shop_id)` pairs. Timestamps are left
/// empty so every row falls inside any look-back window.
pub fn write_payments_csv(path: &Path, rows: &[(&str, &str)]) -> Result<(), Error> {
    let mut wtr = csv::WriterBuilder::new().from_path(path)?;
    wtr.write_record(["pay_id", "shop_id", "total_price", "card_number", "created_at"])?;

    for (pay_id, shop_id) in rows {
        wtr.write_record([*pay_id, *shop_id, "1500", "****-****-****-9999", ""])?;
    }

    wtr.flush()?;
    Ok(())
}
