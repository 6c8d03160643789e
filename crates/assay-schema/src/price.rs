//! Wire models for the price-history endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The four metals tracked by the price API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metal {
    Gold,
    Silver,
    Platinum,
    Palladium,
}

impl Metal {
    /// All metals, in wire order.
    pub const ALL: [Metal; 4] = [
        Metal::Gold,
        Metal::Silver,
        Metal::Platinum,
        Metal::Palladium,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metal::Gold => "gold",
            Metal::Silver => "silver",
            Metal::Platinum => "platinum",
            Metal::Palladium => "palladium",
        }
    }
}

/// A single point in the price history.
///
/// Prices arrive as decimal strings and are parsed on demand. A malformed
/// price string is a validation failure, not a deserialization failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimePoint {
    pub id: Uuid,
    /// Epoch seconds of the observation.
    pub timestamp: i64,
    pub date: DateTime<Utc>,
    pub gold_price: String,
    pub silver_price: String,
    pub platinum_price: String,
    pub palladium_price: String,
}

impl TimePoint {
    /// Raw price string for the given metal.
    pub fn price(&self, metal: Metal) -> &str {
        match metal {
            Metal::Gold => &self.gold_price,
            Metal::Silver => &self.silver_price,
            Metal::Platinum => &self.platinum_price,
            Metal::Palladium => &self.palladium_price,
        }
    }

    /// Parse the price for the given metal.
    pub fn parse_price(&self, metal: Metal) -> Result<f64, std::num::ParseFloatError> {
        self.price(metal).trim().parse()
    }
}

/// Full response of the price-history endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceHistory {
    pub total: u64,
    pub all_time_points: Vec<TimePoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_POINT: &str = r#"{
        "id": "7b6fc8a3-02c4-4a8f-9d3e-5a1b2c3d4e5f",
        "timestamp": 1714730400,
        "date": "2024-05-03T10:00:00Z",
        "goldPrice": "2301.55",
        "silverPrice": "27.10",
        "platinumPrice": "985.40",
        "palladiumPrice": "1012.00"
    }"#;

    #[test]
    fn deserialize_time_point() {
        let point: TimePoint = serde_json::from_str(SAMPLE_POINT).unwrap();
        assert_eq!(point.timestamp, 1714730400);
        assert_eq!(point.gold_price, "2301.55");
        assert_eq!(point.date.timestamp(), 1714730400);
    }

    #[test]
    fn deserialize_history() {
        let json = format!(r#"{{"total": 1, "allTimePoints": [{SAMPLE_POINT}]}}"#);
        let history: PriceHistory = serde_json::from_str(&json).unwrap();
        assert_eq!(history.total, 1);
        assert_eq!(history.all_time_points.len(), 1);
    }

    #[test]
    fn serialize_uses_camel_case() {
        let point: TimePoint = serde_json::from_str(SAMPLE_POINT).unwrap();
        let json = serde_json::to_value(&point).unwrap();
        assert!(json.get("goldPrice").is_some());
        assert!(json.get("gold_price").is_none());
    }

    #[test]
    fn price_accessor_matches_fields() {
        let point: TimePoint = serde_json::from_str(SAMPLE_POINT).unwrap();
        assert_eq!(point.price(Metal::Gold), "2301.55");
        assert_eq!(point.price(Metal::Silver), "27.10");
        assert_eq!(point.price(Metal::Platinum), "985.40");
        assert_eq!(point.price(Metal::Palladium), "1012.00");
    }

    #[test]
    fn parse_price_valid() {
        let point: TimePoint = serde_json::from_str(SAMPLE_POINT).unwrap();
        assert_eq!(point.parse_price(Metal::Gold).unwrap(), 2301.55);
    }

    #[test]
    fn parse_price_trims_whitespace() {
        let mut point: TimePoint = serde_json::from_str(SAMPLE_POINT).unwrap();
        point.silver_price = " 27.10 ".to_string();
        assert_eq!(point.parse_price(Metal::Silver).unwrap(), 27.10);
    }

    #[test]
    fn parse_price_invalid() {
        let mut point: TimePoint = serde_json::from_str(SAMPLE_POINT).unwrap();
        point.gold_price = "n/a".to_string();
        assert!(point.parse_price(Metal::Gold).is_err());
    }

    #[test]
    fn metal_all_covers_every_variant() {
        assert_eq!(Metal::ALL.len(), 4);
        let names: Vec<&str> = Metal::ALL.iter().map(|m| m.as_str()).collect();
        assert_eq!(names, vec!["gold", "silver", "platinum", "palladium"]);
    }
}
