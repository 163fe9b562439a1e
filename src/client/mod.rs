//! Module providing the consumer and producer clients for a remote, offset-addressed log.
//!
//! Both clients talk to the broker exclusively through a [`Transport`]. The consumer tracks a
//! [`Cursor`](cursor::Cursor) into one topic and advances it past every batch it has fully
//! delivered; the producer appends single payloads and reports the offsets assigned to them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod config;
pub mod consumer;
pub mod cursor;
pub mod driver;
pub mod error;
pub mod hyper_impl;
pub mod producer;

pub use error::{Error, ProtocolError, TransportError};

/// A single broker-assigned message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub offset: u64,
    pub payload: String,
}

/// Requests records at or after `offset`, bounded by roughly `max_bytes` of data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchRequest {
    pub topic: String,
    pub offset: u64,
    pub max_bytes: u64,
}

/// Records in ascending offset order. An empty batch means nothing is available yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchResponse {
    pub records: Vec<Record>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProduceRequest {
    pub topic: String,
    pub payload: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProduceResponse {
    pub offset: u64,
}

/// A request/response channel to the broker.
///
/// Every call performs exactly one round trip. Implementations must not retry on their own:
/// retry policy belongs to the caller.
#[async_trait(?Send)]
pub trait Transport {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, Error>;

    async fn produce(&self, request: &ProduceRequest) -> Result<ProduceResponse, Error>;
}

#[async_trait(?Send)]
impl<T> Transport for &T
where
    T: Transport + ?Sized,
{
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, Error> {
        (**self).fetch(request).await
    }

    async fn produce(&self, request: &ProduceRequest) -> Result<ProduceResponse, Error> {
        (**self).produce(request).await
    }
}
