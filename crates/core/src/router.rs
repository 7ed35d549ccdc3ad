//! Client-side routes: which view a URL path selects.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    Recommended,
    StockDetail { symbol: String },
}

impl Route {
    /// Resolves a path such as `/stock/AAPL?tab=history`. Returns `None` for unknown paths.
    pub fn parse(path: &str) -> Option<Self> {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim_end_matches('/');
        if !path.is_empty() && !path.starts_with('/') {
            return None;
        }

        let mut segments = path.split('/').skip(1);
        match (segments.next(), segments.next(), segments.next()) {
            (None, _, _) => Some(Self::Dashboard),
            (Some("recommended"), None, _) => Some(Self::Recommended),
            (Some("stock"), Some(symbol), None) if !symbol.is_empty() => Some(Self::StockDetail {
                symbol: symbol.to_string(),
            }),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Dashboard => "home",
            Self::Recommended => "recommended",
            Self::StockDetail { .. } => "stock-detail",
        }
    }

    pub fn path(&self) -> String {
        match self {
            Self::Dashboard => "/".to_string(),
            Self::Recommended => "/recommended".to_string(),
            Self::StockDetail { symbol } => format!("/stock/{symbol}"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
