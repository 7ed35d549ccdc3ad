use clap::{Parser, Subcommand};
use std::sync::Arc;
use stockview_core::client::ApiClient;
use stockview_core::router::Route;
use stockview_core::store::{StockState, StockStore};
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod view;

use view::Screen;

#[derive(Debug, Parser)]
#[command(name = "stockview")]
struct Args {
    /// Backend base URL, e.g. http://localhost:8000. Overrides API_URL.
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Print the loaded state as JSON instead of a table.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load all analyst rating events (dashboard).
    Stocks {
        /// Order by implied price-target upside instead of server order.
        #[arg(long)]
        sorted: bool,
    },
    /// Load the backend's recommended stocks.
    Recommended,
    /// Load a single stock by symbol.
    Detail { symbol: String },
    /// Ask the backend to refresh its data, then reload the dashboard.
    Sync,
    /// Resolve a client route (`/`, `/recommended`, `/stock/{symbol}`) and show its view.
    Open { path: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut settings = stockview_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();
    if let Some(api_url) = args.api_url {
        settings.api_url = Some(api_url);
    }

    let client = ApiClient::from_settings(&settings)?;
    tracing::debug!(api_url = client.base_url(), "using stocks api");

    let store = StockStore::new(Arc::new(client));
    let state_log = spawn_state_log(store.subscribe());

    let screen = match args.command {
        Command::Stocks { sorted } => {
            store.fetch_stocks().await;
            Screen::Dashboard { sorted }
        }
        Command::Recommended => {
            store.fetch_recommended_stocks().await;
            Screen::Recommended
        }
        Command::Detail { symbol } => {
            store.fetch_stock_detail(&symbol).await;
            Screen::Detail { symbol }
        }
        Command::Sync => {
            store.sync_stocks().await;
            Screen::Dashboard { sorted: false }
        }
        Command::Open { path } => {
            let Some(route) = Route::parse(&path) else {
                anyhow::bail!("no view for path {path:?}");
            };
            tracing::debug!(route = route.name(), "resolved route");
            let screen = Screen::from_route(route);
            load(&store, &screen).await;
            screen
        }
    };

    let state = store.snapshot();
    drop(store);
    if let Err(err) = state_log.await {
        tracing::warn!(error = %err, "store state log task failed");
    }

    {
        let mut out = std::io::stdout().lock();
        view::render(&mut out, &screen, &state, args.json)?;
    }

    if let Some(message) = state.error {
        let err = anyhow::anyhow!("{} failed: {message}", screen.title());
        sentry_anyhow::capture_anyhow(&err);
        return Err(err);
    }

    Ok(())
}

async fn load(store: &StockStore, screen: &Screen) {
    match screen {
        Screen::Dashboard { .. } => store.fetch_stocks().await,
        Screen::Recommended => store.fetch_recommended_stocks().await,
        Screen::Detail { symbol } => store.fetch_stock_detail(symbol).await,
    }
}

fn spawn_state_log(mut rx: watch::Receiver<StockState>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let state = rx.borrow_and_update();
            tracing::debug!(
                loading = state.loading,
                error = ?state.error,
                stocks = state.stocks.len(),
                recommended = state.recommended_stocks.len(),
                selected = ?state.selected_stock.as_ref().map(|s| s.ticker.as_str()),
                "store state changed"
            );
        }
    })
}

fn init_sentry(settings: &stockview_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
