//! Module providing a polling consumer with an in-memory offset cursor.

use super::{cursor::Cursor, Error, FetchRequest, FetchResponse, Record, Transport};
use tracing::{debug, info, instrument};

/// Default upper bound on the bytes requested per fetch.
pub const DEFAULT_MAX_BYTES: u64 = 4096;

/// Logs a delivered record at `INFO` level.
pub fn log_record(record: &Record) {
    info!("Received (offset={}): {}", record.offset, record.payload);
}

/// Consumes a single topic by repeatedly fetching from a locally tracked [`Cursor`].
///
/// Polls take `&mut self`, so a consumer can never be polled concurrently with itself.
/// Independent consumers, even on the same topic, each own their cursor.
pub struct Consumer<T> {
    transport: T,
    cursor: Cursor,
    max_bytes: u64,
}

impl<T> Consumer<T> {
    /// Creates a consumer that starts reading `topic` at `start_offset`.
    pub fn new<S: Into<String>>(transport: T, topic: S, start_offset: u64) -> Result<Self, Error> {
        let topic = topic.into();

        if topic.is_empty() {
            return Err(Error::EmptyTopic);
        }

        Ok(Self {
            transport,
            cursor: Cursor::new(topic, start_offset),
            max_bytes: DEFAULT_MAX_BYTES,
        })
    }

    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn topic(&self) -> &str {
        self.cursor.topic()
    }

    pub fn next_offset(&self) -> u64 {
        self.cursor.next_offset()
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The request the next poll will issue.
    pub fn fetch_request(&self) -> FetchRequest {
        FetchRequest {
            topic: self.cursor.topic().to_owned(),
            offset: self.cursor.next_offset(),
            max_bytes: self.max_bytes,
        }
    }
}

impl<T: Transport> Consumer<T> {
    /// Polls once, logging every received record with [`log_record`].
    pub async fn poll(&mut self) -> Result<bool, Error> {
        self.poll_with(log_record).await
    }

    /// Fetches the next batch from the cursor, hands each record to `observer` in offset
    /// order and then advances the cursor past the batch.
    ///
    /// Returns `true` if any records were delivered and `false` if the consumer is caught
    /// up. On error nothing is delivered and the cursor is left untouched, so the next poll
    /// repeats the same fetch.
    #[instrument(skip_all, fields(topic = %self.cursor.topic(), offset = self.cursor.next_offset()))]
    pub async fn poll_with<F>(&mut self, mut observer: F) -> Result<bool, Error>
    where
        F: FnMut(&Record),
    {
        let request = self.fetch_request();

        let FetchResponse { records } = self.transport.fetch(&request).await?;

        let batch_end = self.cursor.batch_end(&records)?;

        for record in &records {
            observer(record);
        }

        if let Some(next_offset) = batch_end {
            self.cursor.commit(next_offset);
            debug!(records = records.len(), next_offset, "Advanced cursor.");
        }

        Ok(batch_end.is_some())
    }
}
