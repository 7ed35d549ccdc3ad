use crate::client::{stock_detail_path, ApiError, StockApi, RECOMMENDED_PATH, STOCKS_PATH};
use crate::config::Settings;
use crate::domain::{Stock, StockRecommendation};
use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Thin JSON client for the stocks backend. Stateless per call: one request, no retries.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .default_headers(json_headers())
            .build()
            .context("failed to build stocks api http client")?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(settings.require_api_url()?)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), endpoint)
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        tracing::debug!(endpoint, "GET");
        let res = self
            .http
            .get(self.url(endpoint))
            .send()
            .await
            .with_context(|| format!("GET {endpoint} request failed"))?;
        handle_response(endpoint, res).await
    }

    /// POSTs `data` as JSON; `None` and data that serializes to `null` are sent as an empty object.
    pub async fn post<T, B>(&self, endpoint: &str, data: Option<&B>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = match data {
            Some(data) => serde_json::to_value(data).context("failed to serialize request body")?,
            None => Value::Null,
        };
        let body = match body {
            Value::Null => Value::Object(Default::default()),
            body => body,
        };

        tracing::debug!(endpoint, "POST");
        let res = self
            .http
            .post(self.url(endpoint))
            .json(&body)
            .send()
            .await
            .with_context(|| format!("POST {endpoint} request failed"))?;
        handle_response(endpoint, res).await
    }
}

fn json_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

async fn handle_response<T: DeserializeOwned>(endpoint: &str, res: reqwest::Response) -> Result<T> {
    let status = res.status();
    let text = res
        .text()
        .await
        .with_context(|| format!("failed to read response body from {endpoint}"))?;

    if !status.is_success() {
        let err = ApiError::from_body(status.as_u16(), &text);
        tracing::warn!(endpoint, status = err.status, message = %err.message, "api request failed");
        return Err(err.into());
    }

    serde_json::from_str::<T>(&text)
        .with_context(|| format!("failed to decode response JSON from {endpoint}"))
}

#[async_trait::async_trait]
impl StockApi for ApiClient {
    async fn list_stocks(&self) -> Result<Vec<Stock>> {
        self.get(STOCKS_PATH).await
    }

    async fn recommended_stocks(&self) -> Result<Vec<StockRecommendation>> {
        self.get(RECOMMENDED_PATH).await
    }

    async fn stock_detail(&self, symbol: &str) -> Result<Stock> {
        self.get(&stock_detail_path(symbol)).await
    }

    async fn sync_stocks(&self) -> Result<()> {
        let _: Value = self.post::<Value, Value>(STOCKS_PATH, None).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap as AxumHeaders, StatusCode};
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;

    async fn spawn_backend(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn stock_json(ticker: &str, target_from: f64, target_to: f64) -> Value {
        json!({
            "id": format!("id-{ticker}"),
            "ticker": ticker,
            "company": format!("{ticker} Corp"),
            "brokerage": "Barclays",
            "action": "target raised by",
            "rating_from": "Hold",
            "rating_to": "Buy",
            "target_from": target_from,
            "target_to": target_to,
            "time": "2026-01-27T10:00:00Z"
        })
    }

    #[test]
    fn url_joins_base_and_endpoint() {
        let client = ApiClient::new("http://localhost:8000/").unwrap();
        assert_eq!(client.url(STOCKS_PATH), "http://localhost:8000/api/stocks");
        assert_eq!(
            client.url(&stock_detail_path("AAPL")),
            "http://localhost:8000/api/stocks/AAPL"
        );
    }

    #[tokio::test]
    async fn get_sends_json_headers_and_decodes_body() {
        let app = Router::new().route(
            "/api/stocks",
            get(|headers: AxumHeaders| async move {
                let accept = headers.get("accept").and_then(|v| v.to_str().ok());
                let content_type = headers.get("content-type").and_then(|v| v.to_str().ok());
                if accept != Some("application/json") || content_type != Some("application/json") {
                    return Err(StatusCode::BAD_REQUEST);
                }
                Ok(Json(json!([
                    stock_json("AAPL", 100.0, 150.0),
                    stock_json("MSFT", 300.0, 330.0),
                ])))
            }),
        );
        let client = ApiClient::new(spawn_backend(app).await).unwrap();

        let stocks = client.list_stocks().await.unwrap();
        assert_eq!(stocks.len(), 2);
        assert_eq!(stocks[0].ticker, "AAPL");
        assert_eq!(stocks[1].target_to, 330.0);
    }

    #[tokio::test]
    async fn non_success_status_becomes_api_error() {
        let app = Router::new()
            .route(
                "/api/stocks",
                get(|| async {
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({"message": "boom"})),
                    )
                }),
            )
            .route(
                "/api/stocks/:symbol",
                get(|| async { (StatusCode::NOT_FOUND, "stock not found") }),
            );
        let client = ApiClient::new(spawn_backend(app).await).unwrap();

        let err = client.list_stocks().await.unwrap_err();
        let api = err.downcast_ref::<ApiError>().unwrap();
        assert_eq!(api.status, 500);
        assert_eq!(api.message, "boom");

        let err = client.stock_detail("NOPE").await.unwrap_err();
        let api = err.downcast_ref::<ApiError>().unwrap();
        assert_eq!(api.status, 404);
        assert_eq!(api.message, crate::client::UNKNOWN_ERROR);
    }

    #[tokio::test]
    async fn post_without_data_sends_empty_object() {
        let app = Router::new().route(
            "/api/stocks",
            axum::routing::post(|Json(body): Json<Value>| async move {
                Json(json!({"received": body}))
            }),
        );
        let client = ApiClient::new(spawn_backend(app).await).unwrap();

        let echoed: Value = client.post::<Value, Value>(STOCKS_PATH, None).await.unwrap();
        assert_eq!(echoed, json!({"received": {}}));

        let echoed: Value = client.post(STOCKS_PATH, Some(&Value::Null)).await.unwrap();
        assert_eq!(echoed, json!({"received": {}}));

        let echoed: Value = client.post(STOCKS_PATH, None::<&()>).await.unwrap();
        assert_eq!(echoed, json!({"received": {}}));

        let echoed: Value = client
            .post(STOCKS_PATH, Some(&json!({"force": true})))
            .await
            .unwrap();
        assert_eq!(echoed, json!({"received": {"force": true}}));

        client.sync_stocks().await.unwrap();
    }

    #[tokio::test]
    async fn transport_failure_is_not_an_api_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ApiClient::new(format!("http://{addr}")).unwrap();
        let err = client.list_stocks().await.unwrap_err();
        assert!(err.downcast_ref::<ApiError>().is_none());
    }
}
