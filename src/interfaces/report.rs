use crate::domain::ports::SummaryReporter;
use crate::domain::summary::{CycleOutcome, CycleSummary};
use crate::error::Result;
use std::io::Write;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, info, warn};

/// Logs each summary as a structured `tracing` event.
#[derive(Debug, Default)]
pub struct TracingReporter;

impl SummaryReporter for TracingReporter {
    fn report(&mut self, summary: &CycleSummary) -> Result<()> {
        match &summary.outcome {
            CycleOutcome::Reconciled {
                payments,
                rejected,
                newly_completed,
            } => info!(
                cycle = summary.cycle,
                completed = summary.completed_count,
                pending = summary.pending_count,
                payments,
                rejected,
                newly_completed,
                timestamp = %summary.timestamp.to_rfc3339(),
                "Status summary"
            ),
            CycleOutcome::FetchFailed { reason } => warn!(
                cycle = summary.cycle,
                completed = summary.completed_count,
                pending = summary.pending_count,
                reason = %reason,
                timestamp = %summary.timestamp.to_rfc3339(),
                "Status summary (no change, fetch failed)"
            ),
        }
        Ok(())
    }
}

/// Writes one JSON object per summary, one per line.
pub struct JsonLinesReporter<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesReporter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> SummaryReporter for JsonLinesReporter<W> {
    fn report(&mut self, summary: &CycleSummary) -> Result<()> {
        serde_json::to_writer(&mut self.writer, summary)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Forwards summaries to an in-process consumer.
///
/// The channel is bounded. When the consumer falls behind, summaries are
/// dropped rather than queued, and reporting never fails.
pub struct ChannelReporter {
    tx: mpsc::Sender<CycleSummary>,
}

impl ChannelReporter {
    pub fn new() -> (Self, mpsc::Receiver<CycleSummary>) {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> (Self, mpsc::Receiver<CycleSummary>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }
}

impl SummaryReporter for ChannelReporter {
    fn report(&mut self, summary: &CycleSummary) -> Result<()> {
        match self.tx.try_send(summary.clone()) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                debug!(cycle = summary.cycle, "Summary channel full, dropping summary")
            }
            Err(TrySendError::Closed(_)) => {
                debug!(cycle = summary.cycle, "Summary receiver dropped")
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::Order;
    use chrono::Utc;

    fn summary(cycle: u64) -> CycleSummary {
        let orders = vec![
            Order::new("ORDER_0", Utc::now()).completed(),
            Order::new("ORDER_1", Utc::now()),
            Order::new("ORDER_2", Utc::now()),
        ];
        CycleSummary::new(
            cycle,
            &orders,
            CycleOutcome::Reconciled {
                payments: 4,
                rejected: 1,
                newly_completed: 1,
            },
        )
    }

    #[test]
    fn test_json_lines_reporter_writes_one_object_per_line() {
        let mut reporter = JsonLinesReporter::new(Vec::new());
        reporter.report(&summary(1)).unwrap();
        reporter.report(&summary(2)).unwrap();

        let output = String::from_utf8(reporter.into_inner()).unwrap();
        let lines: Vec<serde_json::Value> = output
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["cycle"], 1);
        assert_eq!(lines[1]["cycle"], 2);
        assert_eq!(lines[0]["completed_count"], 1);
        assert_eq!(lines[0]["pending_count"], 2);
        assert_eq!(lines[0]["outcome"]["status"], "reconciled");
        assert_eq!(lines[0]["outcome"]["rejected"], 1);
        assert!(lines[0]["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_channel_reporter_forwards_summaries() {
        let (mut reporter, mut rx) = ChannelReporter::new();
        reporter.report(&summary(3)).unwrap();
        assert_eq!(rx.recv().await.unwrap().cycle, 3);

        drop(rx);
        assert!(reporter.report(&summary(4)).is_ok());
    }

    #[tokio::test]
    async fn test_channel_reporter_drops_when_full() {
        let (mut reporter, mut rx) = ChannelReporter::with_capacity(1);
        reporter.report(&summary(1)).unwrap();
        assert!(reporter.report(&summary(2)).is_ok());

        assert_eq!(rx.recv().await.unwrap().cycle, 1);
        assert!(rx.try_recv().is_err());

        reporter.report(&summary(3)).unwrap();
        assert_eq!(rx.recv().await.unwrap().cycle, 3);
    }

    #[test]
    fn test_tracing_reporter_never_fails() {
        let mut reporter = TracingReporter;
        assert!(reporter.report(&summary(1)).is_ok());
    }
}
