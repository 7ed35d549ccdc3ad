pub mod stock;

pub use stock::{Stock, StockIndicators, StockRecommendation};
