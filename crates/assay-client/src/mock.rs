//! Mock API for testing.
//!
//! Produces the exact same typed responses as the real HTTP client, allowing
//! every layer above the [`PriceApi`] seam to run without network access.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tokio::time::sleep;

use assay_schema::{CurrencySnapshot, PriceHistory};

use crate::api::PriceApi;
use crate::http::{ClientError, CURRENCIES_PATH, TIME_POINTS_PATH};

/// Configurable mock implementation of [`PriceApi`].
///
/// Endpoints not primed with data answer with a 503, the same error shape a
/// dead upstream would produce through the real client.
#[derive(Debug, Clone, Default)]
pub struct MockApi {
    currencies: Option<CurrencySnapshot>,
    time_points: Option<PriceHistory>,
    delay: Option<Duration>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_currencies(mut self, snapshot: CurrencySnapshot) -> Self {
        self.currencies = Some(snapshot);
        self
    }

    pub fn with_time_points(mut self, history: PriceHistory) -> Self {
        self.time_points = Some(history);
        self
    }

    /// Delay before each response (for timing tests).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    async fn respond<T: Clone>(&self, data: &Option<T>, path: &str) -> Result<T, ClientError> {
        if let Some(delay) = self.delay {
            sleep(delay).await;
        }
        data.clone().ok_or_else(|| ClientError::Status {
            path: path.to_string(),
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: "mock endpoint not primed".to_string(),
        })
    }
}

#[async_trait]
impl PriceApi for MockApi {
    async fn fetch_currencies(&self) -> Result<CurrencySnapshot, ClientError> {
        self.respond(&self.currencies, CURRENCIES_PATH).await
    }

    async fn fetch_time_points(&self) -> Result<PriceHistory, ClientError> {
        self.respond(&self.time_points, TIME_POINTS_PATH).await
    }
}

/// Built-in fixtures for common scenarios.
///
/// Every builder takes `now` explicitly so freshness-sensitive tests are
/// deterministic.
pub mod fixtures {
    use std::collections::BTreeMap;

    use chrono::{DateTime, Utc};
    use uuid::Uuid;

    use assay_schema::{CurrencySnapshot, PriceHistory, TimePoint};

    const HOUR: i64 = 3600;

    /// A time point at `ts` with sane prices for all four metals.
    pub fn point(ts: i64) -> TimePoint {
        point_with_prices(ts, "2301.55", "27.10", "985.40", "1012.00")
    }

    pub fn point_with_prices(
        ts: i64,
        gold: &str,
        silver: &str,
        platinum: &str,
        palladium: &str,
    ) -> TimePoint {
        TimePoint {
            id: Uuid::new_v4(),
            timestamp: ts,
            date: DateTime::from_timestamp(ts, 0).unwrap_or_default(),
            gold_price: gold.to_string(),
            silver_price: silver.to_string(),
            platinum_price: platinum.to_string(),
            palladium_price: palladium.to_string(),
        }
    }

    fn history(points: Vec<TimePoint>) -> PriceHistory {
        PriceHistory {
            total: points.len() as u64,
            all_time_points: points,
        }
    }

    /// 24 hourly points ending at `now`. Sorted, unique, fresh, gap-free.
    pub fn healthy_history(now: DateTime<Utc>) -> PriceHistory {
        let end = now.timestamp();
        let points = (0..24).rev().map(|h| point(end - h * HOUR)).collect();
        history(points)
    }

    /// Healthy shape, but the latest point is 13 hours old.
    pub fn stale_history(now: DateTime<Utc>) -> PriceHistory {
        healthy_history(now - chrono::Duration::hours(13))
    }

    /// Fresh history with one 121-hour hole in the middle.
    pub fn gapped_history(now: DateTime<Utc>) -> PriceHistory {
        let end = now.timestamp();
        let points = vec![
            point(end - 123 * HOUR),
            point(end - 122 * HOUR),
            point(end - HOUR),
            point(end),
        ];
        history(points)
    }

    /// Fresh history with two points swapped out of order.
    pub fn unsorted_history(now: DateTime<Utc>) -> PriceHistory {
        let end = now.timestamp();
        let points = vec![
            point(end - 3 * HOUR),
            point(end - HOUR),
            point(end - 2 * HOUR),
            point(end),
        ];
        history(points)
    }

    /// Fresh history with a duplicated timestamp.
    pub fn duplicate_history(now: DateTime<Utc>) -> PriceHistory {
        let end = now.timestamp();
        let points = vec![
            point(end - 2 * HOUR),
            point(end - HOUR),
            point(end - HOUR),
            point(end),
        ];
        history(points)
    }

    /// Fresh history where one point carries an unparseable gold price.
    pub fn bad_price_history(now: DateTime<Utc>) -> PriceHistory {
        let end = now.timestamp();
        let points = vec![
            point(end - HOUR),
            point_with_prices(end, "n/a", "27.10", "985.40", "1012.00"),
        ];
        history(points)
    }

    fn rates() -> BTreeMap<String, f64> {
        let mut rates = BTreeMap::new();
        rates.insert("EUR".to_string(), 0.93);
        rates.insert("GBP".to_string(), 0.80);
        rates.insert("JPY".to_string(), 153.2);
        rates
    }

    /// USD-based snapshot sampled at `now` with well-formed rates.
    pub fn currencies_ok(now: DateTime<Utc>) -> CurrencySnapshot {
        CurrencySnapshot {
            base: "USD".to_string(),
            timestamp: now.timestamp(),
            rates: rates(),
        }
    }

    /// Snapshot with a lowercase currency code.
    pub fn currencies_bad_code(now: DateTime<Utc>) -> CurrencySnapshot {
        let mut snapshot = currencies_ok(now);
        snapshot.rates.insert("eur".to_string(), 0.93);
        snapshot
    }

    /// Snapshot where one rate is negative.
    pub fn currencies_negative_rate(now: DateTime<Utc>) -> CurrencySnapshot {
        let mut snapshot = currencies_ok(now);
        snapshot.rates.insert("CHF".to_string(), -0.91);
        snapshot
    }

    /// Snapshot whose base is not USD.
    pub fn currencies_wrong_base(now: DateTime<Utc>) -> CurrencySnapshot {
        let mut snapshot = currencies_ok(now);
        snapshot.base = "EUR".to_string();
        snapshot
    }

    /// Snapshot sampled 13 hours before `now`.
    pub fn currencies_stale(now: DateTime<Utc>) -> CurrencySnapshot {
        currencies_ok(now - chrono::Duration::hours(13))
    }
}
