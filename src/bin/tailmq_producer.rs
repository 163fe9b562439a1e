use std::error::Error;
use tailmq::{
    client::config::{self, ClientConfig},
    prelude::*,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const TOPIC_VAR: &str = "TAILMQ_TOPIC";
const MESSAGE_COUNT_VAR: &str = "TAILMQ_MESSAGE_COUNT";

const DEFAULT_TOPIC: &str = "demo-topic";
const DEFAULT_MESSAGE_COUNT: usize = 5;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tailmq=debug,tailmq_producer=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let client_config = ClientConfig::from_env()?;
    let topic: String = config::var_or(TOPIC_VAR, DEFAULT_TOPIC.into())?;
    let message_count = config::var_or(MESSAGE_COUNT_VAR, DEFAULT_MESSAGE_COUNT)?;

    let producer = Producer::new(HttpTransport::new(&client_config)?);

    for i in 0..message_count {
        let offset = producer.send(&topic, format!("hello {i}")).await?;
        info!("Sent message, offset = {}", offset);
    }

    Ok(())
}
