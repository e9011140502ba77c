//! Performance metrics over the journal's trades.
//!
//! Percentages are expressed on a 0-100 scale. Nothing is rounded here;
//! formatting belongs to whoever displays the figures.

use chrono::NaiveDate;

use super::trade::Trade;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Metrics {
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub win_rate: f64,
    pub total_pnl: f64,
    pub average_win: f64,
    pub average_loss: f64,
    pub gross_profit: f64,
    pub gross_loss: f64,
    pub profit_factor: f64,
    pub current_balance: f64,
    pub drawdown: f64,
    pub best_trade: f64,
    pub worst_trade: f64,
}

impl Metrics {
    pub fn compute(trades: &[Trade], current_balance: f64, starting_balance: f64) -> Self {
        if trades.is_empty() {
            return Metrics {
                current_balance,
                ..Metrics::default()
            };
        }

        let total_trades = trades.len();
        let mut winning_trades = 0usize;
        let mut losing_trades = 0usize;
        let mut gross_profit = 0.0_f64;
        let mut losses_sum = 0.0_f64;
        let mut total_pnl = 0.0_f64;
        let mut best_trade = f64::NEG_INFINITY;
        let mut worst_trade = f64::INFINITY;

        for trade in trades {
            let pnl = trade.pnl();
            total_pnl += pnl;
            if pnl > 0.0 {
                winning_trades += 1;
                gross_profit += pnl;
            } else if pnl < 0.0 {
                losing_trades += 1;
                losses_sum += pnl;
            }
            best_trade = best_trade.max(pnl);
            worst_trade = worst_trade.min(pnl);
        }

        let win_rate = 100.0 * winning_trades as f64 / total_trades as f64;

        let average_win = if winning_trades > 0 {
            gross_profit / winning_trades as f64
        } else {
            0.0
        };

        let average_loss = if losing_trades > 0 {
            (losses_sum / losing_trades as f64).abs()
        } else {
            0.0
        };

        let gross_loss = losses_sum.abs();
        let profit_factor = if gross_loss > 0.0 {
            gross_profit / gross_loss
        } else {
            0.0
        };

        Metrics {
            total_trades,
            winning_trades,
            losing_trades,
            win_rate,
            total_pnl,
            average_win,
            average_loss,
            gross_profit,
            gross_loss,
            profit_factor,
            current_balance,
            drawdown: compute_drawdown(current_balance, starting_balance),
            best_trade,
            worst_trade,
        }
    }
}

/// Decline from the better of the starting and current balance.
///
/// Only the two endpoints are compared, so this is zero whenever the account
/// sits at or above its starting balance.
fn compute_drawdown(current_balance: f64, starting_balance: f64) -> f64 {
    let peak = current_balance.max(starting_balance);
    if peak > 0.0 {
        100.0 * (peak - current_balance) / peak
    } else {
        0.0
    }
}

/// One point of the cumulative pnl series, in store order.
#[derive(Debug, Clone, PartialEq)]
pub struct CumulativePoint {
    pub trade_number: usize,
    pub date: NaiveDate,
    pub pnl: f64,
    pub cumulative: f64,
}

pub fn cumulative_pnl(trades: &[Trade]) -> Vec<CumulativePoint> {
    let mut running = 0.0;
    trades
        .iter()
        .enumerate()
        .map(|(i, trade)| {
            running += trade.pnl();
            CumulativePoint {
                trade_number: i + 1,
                date: trade.details.date,
                pnl: trade.pnl(),
                cumulative: running,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyPnl {
    pub date: NaiveDate,
    pub pnl: f64,
}

/// Pnl summed per calendar date, dates in the order first seen.
pub fn daily_pnl(trades: &[Trade]) -> Vec<DailyPnl> {
    let mut days: Vec<DailyPnl> = Vec::new();
    for trade in trades {
        match days.iter_mut().find(|d| d.date == trade.details.date) {
            Some(day) => day.pnl += trade.pnl(),
            None => days.push(DailyPnl {
                date: trade.details.date,
                pnl: trade.pnl(),
            }),
        }
    }
    days
}
