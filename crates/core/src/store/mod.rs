//! Owned, observable stock state and the actions that fill it from the backend.
//!
//! [`StockStore`] is the only writer. Views read a [`StockStore::snapshot`] or hold a
//! [`watch::Receiver`] from [`StockStore::subscribe`] and re-render on change.
//!
//! Actions are not serialized: two overlapping calls run two requests, and whichever
//! response resolves last is what the field ends up holding. The shared `loading`
//! flag is cleared by whichever action finishes first.

use crate::client::{error_message, StockApi};
use crate::domain::{Stock, StockRecommendation};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;

pub mod views;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StockState {
    pub stocks: Vec<Stock>,
    pub recommended_stocks: Vec<StockRecommendation>,
    pub selected_stock: Option<Stock>,
    /// True while an action's request is in flight.
    pub loading: bool,
    /// Message from the most recent failed action; cleared when the next action starts.
    pub error: Option<String>,
}

pub struct StockStore {
    api: Arc<dyn StockApi>,
    state: watch::Sender<StockState>,
}

impl StockStore {
    pub fn new(api: Arc<dyn StockApi>) -> Self {
        let (state, _) = watch::channel(StockState::default());
        Self { api, state }
    }

    pub fn snapshot(&self) -> StockState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<StockState> {
        self.state.subscribe()
    }

    /// Current stocks ordered by implied target upside, recomputed on every call.
    pub fn sorted_stocks(&self) -> Vec<Stock> {
        views::sorted_by_target_change(&self.state.borrow().stocks)
    }

    /// Copy of the recommended list in server order.
    pub fn recommended_stocks_list(&self) -> Vec<StockRecommendation> {
        self.state.borrow().recommended_stocks.clone()
    }

    pub async fn fetch_stocks(&self) {
        self.run("fetch_stocks", self.api.list_stocks(), |state, stocks| {
            state.stocks = stocks;
        })
        .await;
    }

    pub async fn fetch_recommended_stocks(&self) {
        self.run(
            "fetch_recommended_stocks",
            self.api.recommended_stocks(),
            |state, recommended| {
                state.recommended_stocks = recommended;
            },
        )
        .await;
    }

    pub async fn fetch_stock_detail(&self, symbol: &str) {
        self.run(
            "fetch_stock_detail",
            self.api.stock_detail(symbol),
            |state, stock| {
                state.selected_stock = Some(stock);
            },
        )
        .await;
    }

    /// Triggers a backend refresh, then reloads both lists. A failed trigger skips the reloads.
    pub async fn sync_stocks(&self) {
        self.begin();
        match self.api.sync_stocks().await {
            Ok(()) => {
                tracing::info!("backend sync finished; reloading stock lists");
                self.fetch_stocks().await;
                self.fetch_recommended_stocks().await;
            }
            Err(err) => self.fail("sync_stocks", &err),
        }
        self.finish();
    }

    async fn run<T, F>(&self, action: &'static str, request: F, apply: impl FnOnce(&mut StockState, T))
    where
        F: Future<Output = anyhow::Result<T>>,
    {
        self.begin();
        match request.await {
            Ok(value) => self.state.send_modify(|state| apply(state, value)),
            Err(err) => self.fail(action, &err),
        }
        self.finish();
    }

    fn begin(&self) {
        self.state.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });
    }

    fn fail(&self, action: &'static str, err: &anyhow::Error) {
        let message = error_message(err);
        tracing::warn!(action, error = %err, "stock store action failed");
        self.state.send_modify(|state| state.error = Some(message));
    }

    fn finish(&self) {
        self.state.send_modify(|state| state.loading = false);
    }
}
