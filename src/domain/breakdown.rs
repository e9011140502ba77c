//! Per-dimension performance grouping (strategy, pair, session).
//!
//! Groups come back in the order their key was first seen in the trade list.
//! Here a "loss" is any trade that did not make money, so breakeven trades
//! count against the group.

use super::trade::{CurrencyPair, Session, Trade, TradingStrategy};

#[derive(Debug, Clone, PartialEq)]
pub struct GroupStats<K> {
    pub key: K,
    pub trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub pnl: f64,
}

impl<K> GroupStats<K> {
    fn empty(key: K) -> Self {
        GroupStats {
            key,
            trades: 0,
            wins: 0,
            losses: 0,
            pnl: 0.0,
        }
    }

    /// Share of winning trades, 0-100.
    pub fn win_rate(&self) -> f64 {
        if self.trades > 0 {
            100.0 * self.wins as f64 / self.trades as f64
        } else {
            0.0
        }
    }
}

pub fn group_by<K, F>(trades: &[Trade], key_of: F) -> Vec<GroupStats<K>>
where
    K: PartialEq,
    F: Fn(&Trade) -> K,
{
    let mut groups: Vec<GroupStats<K>> = Vec::new();
    for trade in trades {
        let key = key_of(trade);
        let index = match groups.iter().position(|g| g.key == key) {
            Some(i) => i,
            None => {
                groups.push(GroupStats::empty(key));
                groups.len() - 1
            }
        };
        let group = &mut groups[index];
        group.trades += 1;
        group.pnl += trade.pnl();
        if trade.is_winner() {
            group.wins += 1;
        } else {
            group.losses += 1;
        }
    }
    groups
}

/// The group with the highest total pnl; the earliest one wins a tie.
pub fn best_group<K>(groups: &[GroupStats<K>]) -> Option<&GroupStats<K>> {
    groups.iter().fold(None, |best: Option<&GroupStats<K>>, g| match best {
        Some(b) if g.pnl <= b.pnl => Some(b),
        _ => Some(g),
    })
}

pub fn by_strategy(trades: &[Trade]) -> Vec<GroupStats<TradingStrategy>> {
    group_by(trades, |t| t.details.strategy)
}

pub fn by_pair(trades: &[Trade]) -> Vec<GroupStats<CurrencyPair>> {
    group_by(trades, |t| t.details.currency_pair)
}

pub fn by_session(trades: &[Trade]) -> Vec<GroupStats<Session>> {
    group_by(trades, |t| t.details.session)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WinLossSplit {
    pub wins: usize,
    pub losses: usize,
}

pub fn win_loss_split(trades: &[Trade]) -> WinLossSplit {
    let wins = trades.iter().filter(|t| t.is_winner()).count();
    WinLossSplit {
        wins,
        losses: trades.len() - wins,
    }
}
