//! Core data models.

mod request;

pub use request::{LookupRequest, MIN_QUERY_LEN};
