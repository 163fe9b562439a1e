pub mod client;
pub mod common;

pub mod prelude {
    //! Prelude module for [`tailmq`](super) with common exports for convenience.

    pub use super::client::{
        config::ClientConfig,
        consumer::{log_record, Consumer},
        cursor::Cursor,
        driver::{PollStats, PollingDriver},
        hyper_impl::HttpTransport,
        producer::Producer,
        Error, Record, Transport,
    };
}
