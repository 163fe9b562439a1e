//! Module providing a producer that appends payloads to broker topics.

use super::{Error, ProduceRequest, ProduceResponse, Transport};
use tracing::{debug, instrument};

/// Appends payloads to topics, one request per payload.
///
/// The producer keeps no state between calls. It neither retries nor batches, and the broker
/// alone decides how offsets of concurrent sends are ordered. There is no idempotency key in
/// the protocol, so retrying a failed [`Producer::send`] may append the payload twice.
pub struct Producer<T> {
    transport: T,
}

impl<T> Producer<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

impl<T: Transport> Producer<T> {
    /// Appends `payload` to `topic` and returns the offset the broker assigned to it.
    #[instrument(skip(self, payload))]
    pub async fn send<P: Into<String>>(&self, topic: &str, payload: P) -> Result<u64, Error> {
        if topic.is_empty() {
            return Err(Error::EmptyTopic);
        }

        let request = ProduceRequest {
            topic: topic.to_owned(),
            payload: payload.into(),
        };

        let ProduceResponse { offset } = self.transport.produce(&request).await?;

        debug!(offset, "Appended record.");

        Ok(offset)
    }
}
