use clap::{ArgAction, Parser};
use metrics_config_publisher::model::ConfigurationRecord;
use metrics_config_publisher::publisher_service::{PublisherService, PublisherServiceConfig};
use metrics_config_publisher::zmq_client::ZmqClient;
use std::error::Error;
use std::future::Future;
use std::io;
use std::process::ExitCode;
#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Sends a sampling configuration to a running metrics collector.
#[derive(Parser, Debug)]
#[command(name = "metrics-config-publisher", version, long_about = None)]
struct Cli {
    /// Sampling period in seconds
    sample_period: String,

    /// Metric to sample
    metrics: String,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let record = ConfigurationRecord::new(cli.metrics, cli.sample_period)?;

    let shutdown = shutdown_signal()?;
    let sink = ZmqClient::from_env()?.connect()?;
    let service = PublisherService::new(PublisherServiceConfig::new(Box::new(sink))?);

    service.run_until_released(record, shutdown).await?;

    Ok(())
}

/// Installs the SIGINT and SIGTERM handlers right away, before any socket is
/// opened, and resolves on whichever arrives first.
#[cfg(unix)]
fn shutdown_signal() -> io::Result<impl Future<Output = ()>> {
    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;

    Ok(async move {
        tokio::select! {
            _ = interrupt.recv() => {},
            _ = terminate.recv() => {},
        }
    })
}

#[cfg(not(unix))]
fn shutdown_signal() -> io::Result<impl Future<Output = ()>> {
    Ok(async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
