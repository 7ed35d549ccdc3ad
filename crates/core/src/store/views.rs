use crate::domain::Stock;

/// Stocks ordered by implied upside between price targets, largest first.
///
/// Stable: equal gains keep their input order. A zero `target_from` with a
/// positive move sorts first; `0/0` has no defined gain and sorts last.
pub fn sorted_by_target_change(stocks: &[Stock]) -> Vec<Stock> {
    let mut out = stocks.to_vec();
    out.sort_by(|a, b| sort_key(b).total_cmp(&sort_key(a)));
    out
}

fn sort_key(stock: &Stock) -> f64 {
    let ratio = stock.target_change_ratio();
    if ratio.is_nan() {
        f64::NEG_INFINITY
    } else {
        // total_cmp orders -0.0 below 0.0
        ratio + 0.0
    }
}
