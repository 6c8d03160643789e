//! assay-client: HTTP access layer for the price API.
//!
//! This crate provides the reqwest-backed client used against live
//! environments and a mock implementation for tests, both behind the
//! [`PriceApi`] trait.

pub mod api;
pub mod http;
pub mod mock;

pub use api::PriceApi;
pub use http::{ApiClient, ClientError, RetryPolicy};
pub use mock::MockApi;
