//! Running account balance.

use super::numeric::coerce_decimal;
use super::trade::Trade;

pub const DEFAULT_STARTING_BALANCE: f64 = 10_000.0;

/// Process-wide balance state.
///
/// `current_balance` moves by each trade's pnl as trades are added and
/// deleted. Edits to an existing trade's pnl are not applied here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Account {
    starting_balance: f64,
    pub current_balance: f64,
}

impl Account {
    pub fn new(starting_balance: f64) -> Self {
        Account {
            starting_balance,
            current_balance: starting_balance,
        }
    }

    pub fn starting_balance(&self) -> f64 {
        self.starting_balance
    }

    pub fn credit(&mut self, pnl: f64) {
        self.current_balance += coerce_decimal(pnl);
    }

    pub fn debit(&mut self, pnl: f64) {
        self.current_balance -= coerce_decimal(pnl);
    }

    /// The balance implied by `starting_balance` plus every trade's pnl.
    pub fn expected_balance(&self, trades: &[Trade]) -> f64 {
        self.starting_balance + trades.iter().map(|t| coerce_decimal(t.pnl())).sum::<f64>()
    }

    /// How far the running balance has drifted from the trade history.
    pub fn discrepancy(&self, trades: &[Trade]) -> f64 {
        self.current_balance - self.expected_balance(trades)
    }
}

impl Default for Account {
    fn default() -> Self {
        Account::new(DEFAULT_STARTING_BALANCE)
    }
}
