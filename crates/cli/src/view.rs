use std::io::Write;
use stockview_core::domain::{Stock, StockRecommendation};
use stockview_core::router::Route;
use stockview_core::store::views::sorted_by_target_change;
use stockview_core::store::StockState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Dashboard { sorted: bool },
    Recommended,
    Detail { symbol: String },
}

impl Screen {
    pub fn from_route(route: Route) -> Self {
        match route {
            Route::Dashboard => Self::Dashboard { sorted: false },
            Route::Recommended => Self::Recommended,
            Route::StockDetail { symbol } => Self::Detail { symbol },
        }
    }

    pub fn title(&self) -> String {
        match self {
            Self::Dashboard { .. } => "stocks".to_string(),
            Self::Recommended => "recommended stocks".to_string(),
            Self::Detail { symbol } => format!("stock {symbol}"),
        }
    }
}

/// Writes the screen for `state`. A stored error is shown above whatever data is still loaded.
pub fn render(
    out: &mut impl Write,
    screen: &Screen,
    state: &StockState,
    json: bool,
) -> anyhow::Result<()> {
    if json {
        return render_json(out, screen, state);
    }

    if let Some(error) = &state.error {
        writeln!(out, "error: {error}")?;
    }

    match screen {
        Screen::Dashboard { sorted } => {
            if *sorted {
                render_stocks(out, &sorted_by_target_change(&state.stocks))
            } else {
                render_stocks(out, &state.stocks)
            }
        }
        Screen::Recommended => render_recommended(out, &state.recommended_stocks),
        Screen::Detail { .. } => render_detail(out, state.selected_stock.as_ref()),
    }
}

fn render_json(out: &mut impl Write, screen: &Screen, state: &StockState) -> anyhow::Result<()> {
    let data = match screen {
        Screen::Dashboard { sorted: true } => {
            serde_json::to_value(sorted_by_target_change(&state.stocks))?
        }
        Screen::Dashboard { sorted: false } => serde_json::to_value(&state.stocks)?,
        Screen::Recommended => serde_json::to_value(&state.recommended_stocks)?,
        Screen::Detail { .. } => serde_json::to_value(&state.selected_stock)?,
    };
    let doc = serde_json::json!({
        "error": state.error,
        "data": data,
    });
    serde_json::to_writer_pretty(&mut *out, &doc)?;
    writeln!(out)?;
    Ok(())
}

fn render_stocks(out: &mut impl Write, stocks: &[Stock]) -> anyhow::Result<()> {
    if stocks.is_empty() {
        writeln!(out, "no stocks loaded")?;
        return Ok(());
    }

    writeln!(
        out,
        "{:<8} {:<28} {:<26} {:<30} {:>20} {:>9}",
        "TICKER", "COMPANY", "BROKERAGE", "RATING", "TARGET", "CHANGE"
    )?;
    for stock in stocks {
        writeln!(
            out,
            "{:<8} {:<28} {:<26} {:<30} {:>20} {:>9}",
            stock.ticker,
            clip(&stock.company, 28),
            clip(&stock.brokerage, 26),
            format!("{} -> {}", stock.rating_from, stock.rating_to),
            format!("{:.2} -> {:.2}", stock.target_from, stock.target_to),
            format!("{:+.1}%", stock.target_change_percent()),
        )?;
    }
    Ok(())
}

fn render_recommended(
    out: &mut impl Write,
    recommended: &[StockRecommendation],
) -> anyhow::Result<()> {
    if recommended.is_empty() {
        writeln!(out, "no recommendations loaded")?;
        return Ok(());
    }

    writeln!(
        out,
        "{:>3} {:<8} {:<28} {:>6} {:<16} {:>8} {:>8} {:>8}",
        "#", "TICKER", "COMPANY", "SCORE", "RECOMMENDATION", "BROKER", "GROWTH", "RATING"
    )?;
    for (idx, rec) in recommended.iter().enumerate() {
        writeln!(
            out,
            "{:>3} {:<8} {:<28} {:>6.3} {:<16} {:>8.3} {:>8.3} {:>8.3}",
            idx + 1,
            rec.stock.ticker,
            clip(&rec.stock.company, 28),
            rec.score,
            rec.recommendation,
            rec.indicators.broker_confidence,
            rec.indicators.price_target_growth,
            rec.indicators.rating_impact,
        )?;
    }
    Ok(())
}

fn render_detail(out: &mut impl Write, stock: Option<&Stock>) -> anyhow::Result<()> {
    let Some(stock) = stock else {
        writeln!(out, "no stock selected")?;
        return Ok(());
    };

    writeln!(out, "{}  {}", stock.ticker, stock.company)?;
    writeln!(out, "brokerage: {}", stock.brokerage)?;
    writeln!(out, "action:    {}", stock.action)?;
    writeln!(out, "rating:    {} -> {}", stock.rating_from, stock.rating_to)?;
    writeln!(
        out,
        "target:    {:.2} -> {:.2} ({:+.1}%)",
        stock.target_from,
        stock.target_to,
        stock.target_change_percent()
    )?;
    writeln!(out, "time:      {}", stock.time)?;
    Ok(())
}

fn clip(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}
