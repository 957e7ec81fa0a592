use clap::Parser;
use miette::{IntoDiagnostic, Result};
use paysync::application::scheduler::Scheduler;
use paysync::config::{FetchFailurePolicy, SchedulerConfig};
use paysync::domain::order::Order;
use paysync::domain::payment::ShopId;
use paysync::domain::ports::{PaymentSourceBox, SummaryReporterBox};
use paysync::infrastructure::csv_source::CsvPaymentSource;
use paysync::infrastructure::simulated::{SimulatedPaymentSource, mock_orders, rng_from_seed};
use paysync::interfaces::csv::order_reader::load_orders;
use paysync::interfaces::report::{JsonLinesReporter, TracingReporter};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{info, warn};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Shop whose payments are reconciled
    #[arg(long, default_value = "SHOP_001")]
    shop_id: String,

    /// Target length of one cycle, in seconds
    #[arg(long, default_value_t = 5)]
    period_secs: u64,

    /// Look-back window passed to the payment source, in seconds
    #[arg(long, default_value_t = 300)]
    since_secs: u64,

    /// Maximum time a single payment fetch may take, in seconds
    #[arg(long, default_value_t = 10)]
    fetch_timeout_secs: u64,

    /// Orders CSV file. If omitted, mock orders are generated.
    #[arg(long)]
    orders: Option<PathBuf>,

    /// Number of mock orders to generate when no orders file is given
    #[arg(long, default_value_t = 30)]
    mock_orders: usize,

    /// Payments CSV feed, re-read every cycle. If omitted, payments are simulated.
    #[arg(long)]
    payments: Option<PathBuf>,

    /// Seed for generated orders and payments
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many cycles (runs until Ctrl-C otherwise)
    #[arg(long)]
    cycles: Option<u64>,

    /// Print cycle summaries to stdout as JSON lines
    #[arg(long)]
    json: bool,

    /// Exit with an error when a payment fetch fails instead of skipping the cycle
    #[arg(long)]
    abort_on_fetch_error: bool,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}

fn initial_orders(cli: &Cli) -> Result<Vec<Order>> {
    match &cli.orders {
        Some(path) => {
            let file = File::open(path).into_diagnostic()?;
            load_orders(file).into_diagnostic()
        }
        None => Ok(mock_orders(cli.mock_orders, &mut rng_from_seed(cli.seed))),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let orders = initial_orders(&cli)?;
    info!(
        total = orders.len(),
        completed = orders.iter().filter(|o| o.is_completed).count(),
        "Initial state"
    );

    let source: PaymentSourceBox = match &cli.payments {
        Some(path) => Box::new(CsvPaymentSource::new(path)),
        // Offset the seed so payments don't replay the order generator's stream
        None => Box::new(SimulatedPaymentSource::new(
            cli.seed.map(|s| s.wrapping_add(1)),
        )),
    };

    let reporter: SummaryReporterBox = if cli.json {
        Box::new(JsonLinesReporter::new(io::stdout()))
    } else {
        Box::new(TracingReporter)
    };

    let config = SchedulerConfig {
        scope: ShopId::new(cli.shop_id),
        period: Duration::from_secs(cli.period_secs),
        since_window: Duration::from_secs(cli.since_secs),
        fetch_timeout: Duration::from_secs(cli.fetch_timeout_secs),
        max_cycles: cli.cycles,
        on_fetch_failure: if cli.abort_on_fetch_error {
            FetchFailurePolicy::Abort
        } else {
            FetchFailurePolicy::SkipCycle
        },
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Ctrl-C received, stopping after the current cycle");
            let _ = shutdown_tx.send(true);
        }
    });

    let scheduler = Scheduler::new(config, orders, source, reporter);
    let orders = scheduler.run(shutdown_rx).await.into_diagnostic()?;

    info!(
        completed = orders.iter().filter(|o| o.is_completed).count(),
        pending = orders.iter().filter(|o| !o.is_completed).count(),
        "Final state"
    );
    Ok(())
}
