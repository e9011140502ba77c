//! Trade history browsing: search, outcome filter and ordering.

use std::cmp::Ordering;

use super::trade::Trade;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HistoryFilter {
    #[default]
    All,
    Winners,
    Losers,
}

impl HistoryFilter {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.to_ascii_lowercase().as_str() {
            "all" => Some(HistoryFilter::All),
            "winners" | "wins" => Some(HistoryFilter::Winners),
            "losers" | "losses" => Some(HistoryFilter::Losers),
            _ => None,
        }
    }

    fn admits(self, trade: &Trade) -> bool {
        match self {
            HistoryFilter::All => true,
            HistoryFilter::Winners => trade.is_winner(),
            HistoryFilter::Losers => trade.is_loser(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HistorySort {
    /// Newest first.
    #[default]
    Date,
    /// Highest pnl first.
    Pnl,
    /// Alphabetical by pair label.
    Pair,
}

impl HistorySort {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.to_ascii_lowercase().as_str() {
            "date" => Some(HistorySort::Date),
            "pnl" => Some(HistorySort::Pnl),
            "pair" => Some(HistorySort::Pair),
            _ => None,
        }
    }

    fn compare(self, a: &Trade, b: &Trade) -> Ordering {
        match self {
            HistorySort::Date => (b.details.date, b.details.time).cmp(&(a.details.date, a.details.time)),
            HistorySort::Pnl => b.pnl().total_cmp(&a.pnl()),
            HistorySort::Pair => a
                .details
                .currency_pair
                .as_str()
                .cmp(b.details.currency_pair.as_str()),
        }
    }
}

fn matches_search(trade: &Trade, needle: &str) -> bool {
    needle.is_empty()
        || trade.details.currency_pair.as_str().to_lowercase().contains(needle)
        || trade.details.strategy.as_str().to_lowercase().contains(needle)
}

/// Trades matching `search` (pair or strategy, case-insensitive) and `filter`,
/// ordered by `sort`. Ties keep store order.
pub fn query_trades<'a>(
    trades: &'a [Trade],
    search: &str,
    filter: HistoryFilter,
    sort: HistorySort,
) -> Vec<&'a Trade> {
    let needle = search.trim().to_lowercase();
    let mut selected: Vec<&Trade> = trades
        .iter()
        .filter(|t| filter.admits(t) && matches_search(t, &needle))
        .collect();
    selected.sort_by(|a, b| sort.compare(a, b));
    selected
}
