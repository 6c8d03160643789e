//! The `PriceApi` trait: one seam over the real HTTP client and the mock.

use assay_schema::{CurrencySnapshot, PriceHistory};
use async_trait::async_trait;

use crate::http::ClientError;

/// Read-only access to the price API endpoints.
///
/// Implemented by the real [`ApiClient`](crate::ApiClient) and by
/// [`MockApi`](crate::MockApi), so everything above this seam can be
/// exercised without network access.
#[async_trait]
pub trait PriceApi: Send + Sync {
    /// Fetch the current currency conversion rates.
    async fn fetch_currencies(&self) -> Result<CurrencySnapshot, ClientError>;

    /// Fetch the full metal price history.
    async fn fetch_time_points(&self) -> Result<PriceHistory, ClientError>;
}
