use crate::domain::{Stock, StockRecommendation};

pub mod error;
pub mod http;

pub use error::{error_message, ApiError, UNKNOWN_ERROR};
pub use http::ApiClient;

pub const STOCKS_PATH: &str = "/api/stocks";
pub const RECOMMENDED_PATH: &str = "/api/stocks/recommended";

pub fn stock_detail_path(symbol: &str) -> String {
    format!("{STOCKS_PATH}/{symbol}")
}

/// The backend calls the stock store depends on.
#[async_trait::async_trait]
pub trait StockApi: Send + Sync {
    async fn list_stocks(&self) -> anyhow::Result<Vec<Stock>>;

    async fn recommended_stocks(&self) -> anyhow::Result<Vec<StockRecommendation>>;

    async fn stock_detail(&self, symbol: &str) -> anyhow::Result<Stock>;

    /// Asks the backend to refresh its data from the upstream ratings source.
    async fn sync_stocks(&self) -> anyhow::Result<()>;
}
