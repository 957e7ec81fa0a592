use crate::domain::payment::{PaymentRecord, ShopId};
use crate::domain::ports::PaymentSource;
use crate::error::FetchError;
use crate::interfaces::csv::record_reader::RecordReader;
use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

/// Reads payments from a CSV feed that is re-read on every fetch.
///
/// The feed may contain payments for several shops; scope filtering is left to
/// the reconciler. Rows older than the look-back window are dropped, rows with
/// no timestamp are kept, and rows that fail to parse are skipped.
pub struct CsvPaymentSource {
    path: PathBuf,
}

impl CsvPaymentSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PaymentSource for CsvPaymentSource {
    async fn fetch_payments(
        &self,
        _scope: &ShopId,
        since: Duration,
    ) -> Result<Vec<PaymentRecord>, FetchError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| FetchError::Unavailable(format!("{}: {e}", self.path.display())))?;

        let cutoff = TimeDelta::from_std(since)
            .ok()
            .and_then(|window| Utc::now().checked_sub_signed(window));

        let mut records = Vec::new();
        for result in RecordReader::new(bytes.as_slice()).records::<PaymentRecord>() {
            match result {
                Ok(record) => {
                    let in_window = match (record.created_at, cutoff) {
                        (Some(created_at), Some(cutoff)) => created_at >= cutoff,
                        _ => true,
                    };
                    if in_window {
                        records.push(record);
                    }
                }
                Err(e) => warn!(path = %self.path.display(), error = %e, "Skipping unreadable payment row"),
            }
        }

        debug!(path = %self.path.display(), count = records.len(), "Read payment feed");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_reads_rows_within_window() {
        let recent = (Utc::now() - TimeDelta::seconds(30)).to_rfc3339();
        let stale = (Utc::now() - TimeDelta::seconds(3600)).to_rfc3339();

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "pay_id, shop_id, total_price, card_number, created_at").unwrap();
        writeln!(file, "ORDER_1, SHOP_001, 1200, ****-****-****-1111, {recent}").unwrap();
        writeln!(file, "ORDER_2, SHOP_001, 1300, ****-****-****-2222, {stale}").unwrap();
        writeln!(file, "ORDER_3, SHOP_002, 1400, ****-****-****-3333, ").unwrap();
        writeln!(file, "ORDER_4, SHOP_001, lots, ****-****-****-4444, {recent}").unwrap();

        let source = CsvPaymentSource::new(file.path());
        let records = source
            .fetch_payments(&ShopId::from("SHOP_001"), Duration::from_secs(300))
            .await
            .unwrap();

        let ids: Vec<_> = records.iter().filter_map(|r| r.pay_id.as_deref()).collect();
        assert_eq!(ids, vec!["ORDER_1", "ORDER_3"]);
    }

    #[tokio::test]
    async fn test_missing_file_is_fetch_failure() {
        let dir = tempfile::tempdir().unwrap();
        let source = CsvPaymentSource::new(dir.path().join("absent.csv"));

        let result = source
            .fetch_payments(&ShopId::from("SHOP_001"), Duration::from_secs(300))
            .await;
        assert!(matches!(result, Err(FetchError::Unavailable(_))));
    }
}
