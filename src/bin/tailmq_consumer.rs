use std::{error::Error, time::Duration};
use tailmq::{
    client::{
        config::{self, ClientConfig},
        driver::DEFAULT_POLL_INTERVAL,
    },
    prelude::*,
};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, info_span, Instrument};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const TOPIC_VAR: &str = "TAILMQ_TOPIC";
const START_OFFSET_VAR: &str = "TAILMQ_START_OFFSET";
const POLL_INTERVAL_MS_VAR: &str = "TAILMQ_POLL_INTERVAL_MS";

const DEFAULT_TOPIC: &str = "demo-topic";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tailmq=debug,tailmq_consumer=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let client_config = ClientConfig::from_env()?;
    let topic: String = config::var_or(TOPIC_VAR, DEFAULT_TOPIC.into())?;
    let start_offset: u64 = config::var_or(START_OFFSET_VAR, 0)?;
    let poll_interval = config::var_or(
        POLL_INTERVAL_MS_VAR,
        DEFAULT_POLL_INTERVAL.as_millis() as u64,
    )
    .map(Duration::from_millis)?;

    let consumer = Consumer::new(HttpTransport::new(&client_config)?, topic, start_offset)?
        .with_max_bytes(client_config.max_bytes);
    let mut driver = PollingDriver::new(consumer, poll_interval)?;

    info!(
        broker = %client_config.broker_url,
        topic = driver.consumer().topic(),
        start_offset,
        "Starting consumer."
    );

    let token = CancellationToken::new();

    tokio::spawn({
        let token = token.clone();

        async move {
            shutdown_signal().await;
            token.cancel();
        }
        .instrument(info_span!("shutdown_signal_handler"))
    });

    let stats = driver.run(&token, log_record).await?;

    info!(
        polls = stats.polls,
        next_offset = driver.consumer().next_offset(),
        "Exiting application."
    );

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Signal received, stopping consumer.");
}
