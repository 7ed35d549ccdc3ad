use serde::{Deserialize, Serialize};

/// A single analyst rating event as served by `/api/stocks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    pub id: String,
    pub ticker: String,
    pub company: String,
    pub brokerage: String,
    pub action: String,
    pub rating_from: String,
    pub rating_to: String,
    pub target_from: f64,
    pub target_to: f64,
    /// Event timestamp, passed through as the server formats it.
    pub time: String,
}

impl Stock {
    /// Implied upside between the two price targets, in percent.
    ///
    /// `target_from == 0` yields an infinite value (or NaN when both targets are zero).
    /// The sorted view puts +inf first and NaN last.
    pub fn target_change_percent(&self) -> f64 {
        self.target_change_ratio() * 100.0
    }

    pub(crate) fn target_change_ratio(&self) -> f64 {
        (self.target_to - self.target_from) / self.target_from
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockIndicators {
    pub broker_confidence: f64,
    pub price_target_growth: f64,
    pub rating_impact: f64,
}

/// Backend-scored recommendation. Never computed client-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRecommendation {
    pub stock: Stock,
    pub score: f64,
    pub indicators: StockIndicators,
    pub recommendation: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_recommendation_wire_shape() {
        let v = json!({
            "stock": {
                "id": "4f1c",
                "ticker": "AAPL",
                "company": "Apple Inc.",
                "brokerage": "Morgan Stanley",
                "action": "target raised by",
                "rating_from": "Equal-Weight",
                "rating_to": "Overweight",
                "target_from": 200.0,
                "target_to": 250.0,
                "time": "2026-01-27T10:00:00Z"
            },
            "score": 0.72,
            "indicators": {
                "broker_confidence": 0.2,
                "price_target_growth": 0.075,
                "rating_impact": 0.08
            },
            "recommendation": "Strong Buy"
        });

        let parsed: StockRecommendation = serde_json::from_value(v).unwrap();
        assert_eq!(parsed.stock.ticker, "AAPL");
        assert_eq!(parsed.indicators.rating_impact, 0.08);
        assert_eq!(parsed.stock.target_change_percent(), 25.0);
    }

    #[test]
    fn rejects_non_numeric_targets_via_deserialize() {
        let v = json!({
            "id": "1",
            "ticker": "AAPL",
            "company": "Apple Inc.",
            "brokerage": "Citigroup",
            "action": "upgraded by",
            "rating_from": "Hold",
            "rating_to": "Buy",
            "target_from": "200",
            "target_to": 250.0,
            "time": "2026-01-27T10:00:00Z"
        });

        assert!(serde_json::from_value::<Stock>(v).is_err());
    }
}
