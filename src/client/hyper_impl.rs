//! Module providing a [`Transport`] over HTTP/1.1 using [`hyper`]'s client.
//!
//! The broker exposes two endpoints:
//!
//! - `GET /fetch?topic=..&offset=..&max_bytes=..` answering `{"records":[{"offset":..,"payload":..}]}`
//! - `POST /produce` taking `{"topic":..,"payload":..}` and answering `{"offset":..}`

use super::{
    config::ClientConfig, Error, FetchRequest, FetchResponse, ProduceRequest, ProduceResponse,
    ProtocolError, Transport, TransportError,
};
use crate::common::{
    http::{endpoint_uri, error_message},
    serde_compat::{json::Json, SerializationProvider},
};
use async_trait::async_trait;
use bytes::Bytes;
use hyper::{client::HttpConnector, header, Body, Client, Method, Request, StatusCode, Uri};
use std::time::Duration;
use tracing::trace;

pub const FETCH_PATH: &str = "/fetch";
pub const PRODUCE_PATH: &str = "/produce";

/// HTTP transport to a single broker. Each request may use a fresh or pooled connection; no
/// connection affinity is assumed.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Client<HttpConnector>,
    base_uri: Uri,
    request_timeout: Duration,
}

impl HttpTransport {
    /// Creates a transport for the broker at `config.broker_url`, which must be an absolute
    /// `http://` URI such as `http://localhost:5000`.
    pub fn new(config: &ClientConfig) -> Result<Self, Error> {
        let base_uri = config
            .broker_url
            .parse::<Uri>()
            .map_err(TransportError::InvalidUri)?;

        if base_uri.scheme_str() != Some("http") || base_uri.authority().is_none() {
            return Err(TransportError::UnsupportedUri(base_uri).into());
        }

        Ok(Self {
            client: Client::new(),
            base_uri,
            request_timeout: config.request_timeout,
        })
    }

    pub fn base_uri(&self) -> &Uri {
        &self.base_uri
    }

    /// Sends `request` and collects the full response body, all within the request timeout.
    async fn round_trip(&self, request: Request<Body>) -> Result<(StatusCode, Bytes), Error> {
        trace!(method = %request.method(), uri = %request.uri(), "Sending request.");

        let exchange = async {
            let response = self.client.request(request).await?;
            let status = response.status();
            let body = hyper::body::to_bytes(response.into_body()).await?;

            Ok::<_, hyper::Error>((status, body))
        };

        let (status, body) = tokio::time::timeout(self.request_timeout, exchange)
            .await
            .map_err(|_| TransportError::Timeout(self.request_timeout))?
            .map_err(TransportError::Http)?;

        trace!(%status, body_len = body.len(), "Received response.");

        Ok((status, body))
    }
}

#[async_trait(?Send)]
impl Transport for HttpTransport {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, Error> {
        let query = serde_urlencoded::to_string(request).map_err(ProtocolError::EncodeQuery)?;
        let uri = endpoint_uri(&self.base_uri, FETCH_PATH, Some(&query))
            .map_err(TransportError::InvalidUri)?;

        let http_request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .header(header::ACCEPT, Json::CONTENT_TYPE)
            .body(Body::empty())
            .map_err(TransportError::Request)?;

        let (status, body) = self.round_trip(http_request).await?;

        if !status.is_success() {
            return Err(Error::Fetch {
                status,
                message: error_message(status, &body),
            });
        }

        Ok(Json::deserialize::<FetchResponse>(&body).map_err(ProtocolError::Decode)?)
    }

    async fn produce(&self, request: &ProduceRequest) -> Result<ProduceResponse, Error> {
        let uri = endpoint_uri(&self.base_uri, PRODUCE_PATH, None)
            .map_err(TransportError::InvalidUri)?;
        let payload = Json::serialize(request).map_err(ProtocolError::Encode)?;

        let http_request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, Json::CONTENT_TYPE)
            .header(header::ACCEPT, Json::CONTENT_TYPE)
            .body(Body::from(payload))
            .map_err(TransportError::Request)?;

        let (status, body) = self.round_trip(http_request).await?;

        if !status.is_success() {
            return Err(Error::Produce {
                status,
                message: error_message(status, &body),
            });
        }

        Ok(Json::deserialize::<ProduceResponse>(&body).map_err(ProtocolError::Decode)?)
    }
}
