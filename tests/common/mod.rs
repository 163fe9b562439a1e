//! In-process stand-in for the broker's HTTP interface, served with [`axum`].

#![allow(dead_code)]

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::{
    collections::HashMap,
    net::{SocketAddr, TcpListener},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};
use tailmq::client::{
    config::ClientConfig, FetchRequest, FetchResponse, ProduceRequest, ProduceResponse, Record,
};

/// Per-record framing overhead counted against a fetch's byte budget.
const RECORD_HEADER_SIZE: usize = 16;

#[derive(Default)]
pub struct FakeBroker {
    topics: Mutex<HashMap<String, Vec<String>>>,
    fetches: Mutex<Vec<FetchRequest>>,

    fetch_delay: Mutex<Option<Duration>>,
    fetch_body_override: Mutex<Option<String>>,

    failing_fetches: AtomicUsize,
    failing_produces: AtomicUsize,
}

impl FakeBroker {
    pub fn seed<I, P>(&self, topic: &str, payloads: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        let mut topics = self.topics.lock().unwrap();
        let log = topics.entry(topic.to_owned()).or_default();

        log.extend(payloads.into_iter().map(Into::into));
    }

    pub fn set_fetch_delay(&self, delay: Option<Duration>) {
        *self.fetch_delay.lock().unwrap() = delay;
    }

    /// Answers every subsequent fetch with `body` and a 200 status.
    pub fn set_fetch_body_override(&self, body: Option<&str>) {
        *self.fetch_body_override.lock().unwrap() = body.map(Into::into);
    }

    pub fn fail_next_fetches(&self, count: usize) {
        self.failing_fetches.store(count, Ordering::SeqCst);
    }

    pub fn fail_next_produces(&self, count: usize) {
        self.failing_produces.store(count, Ordering::SeqCst);
    }

    /// Every fetch received so far, including ones that were failed or delayed.
    pub fn fetches(&self) -> Vec<FetchRequest> {
        self.fetches.lock().unwrap().clone()
    }

    fn take_failure(counter: &AtomicUsize) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }

    fn append(&self, topic: String, payload: String) -> u64 {
        let mut topics = self.topics.lock().unwrap();
        let log = topics.entry(topic).or_default();

        log.push(payload);

        (log.len() - 1) as u64
    }

    /// Reads records from `request.offset` onwards, stopping once the byte budget has been
    /// reached. The record crossing the budget is still included.
    fn read(&self, request: &FetchRequest) -> Vec<Record> {
        let topics = self.topics.lock().unwrap();

        let log = match topics.get(&request.topic) {
            Some(log) => log,
            None => return Vec::new(),
        };

        let mut records = Vec::new();
        let mut bytes_read = 0;

        for (offset, payload) in log.iter().enumerate().skip(request.offset as usize) {
            records.push(Record {
                offset: offset as u64,
                payload: payload.clone(),
            });

            bytes_read += payload.len() + RECORD_HEADER_SIZE;

            if bytes_read as u64 >= request.max_bytes {
                break;
            }
        }

        records
    }
}

async fn fetch(
    State(broker): State<Arc<FakeBroker>>,
    Query(request): Query<FetchRequest>,
) -> Response {
    broker.fetches.lock().unwrap().push(request.clone());

    let delay = *broker.fetch_delay.lock().unwrap();

    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    if FakeBroker::take_failure(&broker.failing_fetches) {
        return (StatusCode::SERVICE_UNAVAILABLE, "broker unavailable").into_response();
    }

    let body_override = broker.fetch_body_override.lock().unwrap().clone();

    match body_override {
        Some(body) => body.into_response(),
        None => Json(FetchResponse {
            records: broker.read(&request),
        })
        .into_response(),
    }
}

async fn produce(
    State(broker): State<Arc<FakeBroker>>,
    Json(request): Json<ProduceRequest>,
) -> Response {
    if FakeBroker::take_failure(&broker.failing_produces) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "append failed").into_response();
    }

    let offset = broker.append(request.topic, request.payload);

    Json(ProduceResponse { offset }).into_response()
}

/// Serves `broker` on an ephemeral local port. Must be called from within a tokio runtime.
pub fn spawn(broker: Arc<FakeBroker>) -> SocketAddr {
    let app = Router::new()
        .route("/fetch", get(fetch))
        .route("/produce", post(produce))
        .with_state(broker);

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let server = axum::Server::from_tcp(listener)
        .unwrap()
        .serve(app.into_make_service());

    tokio::spawn(server);

    addr
}

pub fn client_config(addr: SocketAddr) -> ClientConfig {
    ClientConfig {
        broker_url: format!("http://{addr}"),
        request_timeout: Duration::from_secs(2),
        ..Default::default()
    }
}
