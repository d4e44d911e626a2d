//! Carrier tracking: client, lookup outcomes and the batch pipeline.
//!
//! No retries, no concurrency: one blocking GET per order, in input order.

mod client;
pub mod pipeline;
mod status;

pub use client::{
    ClientConfig, StatusLookup, TrackingClient, TrackingError,
    DEFAULT_BASE_URL, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT,
};
pub use pipeline::{TrackingOrder, TrackingResult, RESULT_FILENAME};
pub use status::{parse_response, TrackingStatus, EMPTY_CODE, NOT_FOUND, QUERY_ERROR};
