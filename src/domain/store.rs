//! Trade/goal store: owns the journal's collections and the running balance.
//!
//! All mutation happens through the store. After every change the affected
//! collection (and the balance, when it moved) is written through the
//! [`StoragePort`]; a failed write is logged and the in-memory state stands.

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::account::Account;
use super::error::JournalError;
use super::goal::{Goal, GoalDraft, GoalPatch};
use super::goal_progress::{GoalProgress, resolve_progress};
use super::insight::{Insight, generate_insights};
use super::metrics::Metrics;
use super::numeric::coerce_decimal;
use super::trade::{Trade, TradeDraft, TradePatch};
use crate::ports::storage_port::StoragePort;

/// Balance drift below this is float noise, not a reconciliation problem.
const BALANCE_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKey {
    Trades,
    Goals,
    Balance,
}

impl StoreKey {
    pub fn as_str(self) -> &'static str {
        match self {
            StoreKey::Trades => "trades",
            StoreKey::Goals => "goals",
            StoreKey::Balance => "balance",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorePhase {
    Uninitialized,
    Ready,
}

pub struct JournalStore<S> {
    storage: S,
    phase: StorePhase,
    trades: Vec<Trade>,
    goals: Vec<Goal>,
    account: Account,
}

impl<S: StoragePort> JournalStore<S> {
    /// An empty store that still has to [`load`](Self::load) before accepting changes.
    pub fn new(storage: S, starting_balance: f64) -> Self {
        JournalStore {
            storage,
            phase: StorePhase::Uninitialized,
            trades: Vec::new(),
            goals: Vec::new(),
            account: Account::new(starting_balance),
        }
    }

    /// Construct and load in one step.
    pub fn open(storage: S, starting_balance: f64) -> Self {
        let mut store = Self::new(storage, starting_balance);
        store.load();
        store
    }

    /// Populate from storage. Each key loads on its own; a missing or
    /// unreadable key falls back to its default without affecting the others.
    pub fn load(&mut self) {
        self.trades = self.load_collection(StoreKey::Trades);
        self.goals = self.load_collection(StoreKey::Goals);
        self.account.current_balance = self.load_balance();
        self.phase = StorePhase::Ready;

        let drift = self.account.discrepancy(&self.trades);
        if drift.abs() > BALANCE_TOLERANCE {
            warn!(
                balance = self.account.current_balance,
                drift, "loaded balance does not match trade history"
            );
        }
        info!(
            trades = self.trades.len(),
            goals = self.goals.len(),
            balance = self.account.current_balance,
            "journal loaded"
        );
    }

    pub fn phase(&self) -> StorePhase {
        self.phase
    }

    pub fn is_ready(&self) -> bool {
        self.phase == StorePhase::Ready
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Trades in entry order.
    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn account_balance(&self) -> f64 {
        self.account.current_balance
    }

    pub fn starting_balance(&self) -> f64 {
        self.account.starting_balance()
    }

    pub fn trade(&self, id: Uuid) -> Option<&Trade> {
        self.trades.iter().find(|t| t.id == id)
    }

    pub fn goal(&self, id: Uuid) -> Option<&Goal> {
        self.goals.iter().find(|g| g.id == id)
    }

    pub fn add_trade(&mut self, mut draft: TradeDraft) -> Result<Uuid, JournalError> {
        self.ensure_ready()?;
        draft.pnl = coerce_decimal(draft.pnl);
        let trade = Trade {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            details: draft,
        };
        let id = trade.id;
        self.account.credit(trade.pnl());
        debug!(%id, pnl = trade.pnl(), "trade added");
        self.trades.push(trade);

        self.persist_trades();
        self.persist_balance();
        Ok(id)
    }

    /// Merge `patch` into the trade with `id`. Returns `false` if no such trade exists.
    ///
    /// The balance is left alone even when the patch changes pnl.
    pub fn update_trade(&mut self, id: Uuid, patch: TradePatch) -> Result<bool, JournalError> {
        self.ensure_ready()?;
        let Some(trade) = self.trades.iter_mut().find(|t| t.id == id) else {
            debug!(%id, "update_trade: no such trade");
            return Ok(false);
        };

        let old_pnl = trade.pnl();
        patch.apply(&mut trade.details);
        trade.details.pnl = coerce_decimal(trade.details.pnl);
        if (trade.pnl() - old_pnl).abs() > BALANCE_TOLERANCE {
            warn!(
                %id,
                old_pnl,
                new_pnl = trade.pnl(),
                "trade pnl edited; account balance not adjusted"
            );
        }
        debug!(%id, "trade updated");

        self.persist_trades();
        Ok(true)
    }

    /// Remove the trade with `id`, backing its pnl out of the balance.
    pub fn delete_trade(&mut self, id: Uuid) -> Result<bool, JournalError> {
        self.ensure_ready()?;
        let Some(index) = self.trades.iter().position(|t| t.id == id) else {
            debug!(%id, "delete_trade: no such trade");
            return Ok(false);
        };

        let trade = self.trades.remove(index);
        self.account.debit(trade.pnl());
        debug!(%id, pnl = trade.pnl(), "trade deleted");

        self.persist_trades();
        self.persist_balance();
        Ok(true)
    }

    pub fn add_goal(&mut self, draft: GoalDraft) -> Result<Uuid, JournalError> {
        self.ensure_ready()?;
        let goal = Goal {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            details: draft,
        };
        let id = goal.id;
        debug!(%id, title = %goal.details.title, "goal added");
        self.goals.push(goal);

        self.persist_goals();
        Ok(id)
    }

    pub fn update_goal(&mut self, id: Uuid, patch: GoalPatch) -> Result<bool, JournalError> {
        self.ensure_ready()?;
        let Some(goal) = self.goals.iter_mut().find(|g| g.id == id) else {
            debug!(%id, "update_goal: no such goal");
            return Ok(false);
        };
        patch.apply(&mut goal.details);
        debug!(%id, "goal updated");

        self.persist_goals();
        Ok(true)
    }

    pub fn delete_goal(&mut self, id: Uuid) -> Result<bool, JournalError> {
        self.ensure_ready()?;
        let before = self.goals.len();
        self.goals.retain(|g| g.id != id);
        if self.goals.len() == before {
            debug!(%id, "delete_goal: no such goal");
            return Ok(false);
        }
        debug!(%id, "goal deleted");

        self.persist_goals();
        Ok(true)
    }

    /// Performance figures for the current trades and balance.
    pub fn metrics(&self) -> Metrics {
        Metrics::compute(
            &self.trades,
            self.account.current_balance,
            self.account.starting_balance(),
        )
    }

    pub fn insights(&self) -> Vec<Insight> {
        generate_insights(&self.trades)
    }

    /// Progress for every goal, in stored order, as of `today`.
    pub fn goal_progress(&self, today: NaiveDate) -> Vec<(&Goal, GoalProgress)> {
        let metrics = self.metrics();
        self.goals
            .iter()
            .map(|g| (g, resolve_progress(g, &metrics, today)))
            .collect()
    }

    /// Running balance minus the balance implied by the trade history.
    pub fn balance_discrepancy(&self) -> f64 {
        self.account.discrepancy(&self.trades)
    }

    /// Reset the running balance to `starting_balance + Σ pnl` and persist it.
    pub fn reconcile_balance(&mut self) -> Result<f64, JournalError> {
        self.ensure_ready()?;
        let expected = self.account.expected_balance(&self.trades);
        info!(
            from = self.account.current_balance,
            to = expected,
            "reconciling balance"
        );
        self.account.current_balance = expected;
        self.persist_balance();
        Ok(expected)
    }

    fn ensure_ready(&self) -> Result<(), JournalError> {
        match self.phase {
            StorePhase::Ready => Ok(()),
            StorePhase::Uninitialized => Err(JournalError::NotReady),
        }
    }

    fn load_collection<T: DeserializeOwned>(&self, key: StoreKey) -> Vec<T> {
        let key = key.as_str();
        match self.storage.load(key) {
            Ok(Some(blob)) => serde_json::from_str(&blob).unwrap_or_else(|e| {
                warn!(key, error = %e, "stored value unreadable, using default");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(key, error = %e, "storage load failed, using default");
                Vec::new()
            }
        }
    }

    fn load_balance(&self) -> f64 {
        let key = StoreKey::Balance.as_str();
        let fallback = self.account.starting_balance();
        match self.storage.load(key) {
            Ok(Some(text)) => match text.trim().parse::<f64>() {
                Ok(v) if v.is_finite() => v,
                _ => {
                    warn!(key, value = %text, "stored balance unreadable, using starting balance");
                    fallback
                }
            },
            Ok(None) => fallback,
            Err(e) => {
                warn!(key, error = %e, "storage load failed, using starting balance");
                fallback
            }
        }
    }

    fn persist_trades(&self) {
        self.persist_json(StoreKey::Trades, &self.trades);
    }

    fn persist_goals(&self) {
        self.persist_json(StoreKey::Goals, &self.goals);
    }

    fn persist_balance(&self) {
        self.write(StoreKey::Balance, &self.account.current_balance.to_string());
    }

    fn persist_json<T: Serialize + ?Sized>(&self, key: StoreKey, value: &T) {
        match serde_json::to_string(value) {
            Ok(blob) => self.write(key, &blob),
            Err(e) => warn!(key = key.as_str(), error = %e, "could not serialize for storage"),
        }
    }

    fn write(&self, key: StoreKey, value: &str) {
        if let Err(e) = self.storage.save(key.as_str(), value) {
            warn!(key = key.as_str(), error = %e, "storage save failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::trade::CurrencyPair;
    use chrono::NaiveTime;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemoryStorage {
        blobs: RefCell<HashMap<String, String>>,
    }

    impl StoragePort for MemoryStorage {
        fn load(&self, key: &str) -> Result<Option<String>, JournalError> {
            Ok(self.blobs.borrow().get(key).cloned())
        }

        fn save(&self, key: &str, value: &str) -> Result<(), JournalError> {
            self.blobs.borrow_mut().insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    fn draft(pnl: f64) -> TradeDraft {
        TradeDraft::new(
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            NaiveTime::from_hms_opt(14, 5, 0).unwrap(),
            CurrencyPair::EurUsd,
            pnl,
        )
    }

    fn ready_store() -> JournalStore<MemoryStorage> {
        JournalStore::open(MemoryStorage::default(), 10_000.0)
    }

    #[test]
    fn new_store_is_uninitialized() {
        let store = JournalStore::new(MemoryStorage::default(), 10_000.0);
        assert_eq!(store.phase(), StorePhase::Uninitialized);
        assert!(!store.is_ready());
    }

    #[test]
    fn mutation_before_load_is_rejected() {
        let mut store = JournalStore::new(MemoryStorage::default(), 10_000.0);
        let result = store.add_trade(draft(50.0));
        assert!(matches!(result, Err(JournalError::NotReady)));
        assert!(store.trades().is_empty());
        assert!((store.account_balance() - 10_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn load_of_empty_storage_uses_defaults() {
        let store = ready_store();
        assert!(store.is_ready());
        assert!(store.trades().is_empty());
        assert!(store.goals().is_empty());
        assert!((store.account_balance() - 10_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn add_trade_assigns_identity_and_credits_balance() {
        let mut store = ready_store();
        let id = store.add_trade(draft(125.0)).unwrap();
        let trade = store.trade(id).unwrap();
        assert_eq!(trade.id, id);
        assert!((store.account_balance() - 10_125.0).abs() < 1e-9);
    }

    #[test]
    fn add_trade_with_non_finite_pnl_contributes_zero() {
        let mut store = ready_store();
        let id = store.add_trade(draft(f64::NAN)).unwrap();
        assert_eq!(store.trade(id).unwrap().pnl(), 0.0);
        assert!((store.account_balance() - 10_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn trades_keep_entry_order() {
        let mut store = ready_store();
        let mut late = draft(1.0);
        late.date = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
        let first = store.add_trade(late).unwrap();
        let second = store.add_trade(draft(2.0)).unwrap();
        let ids: Vec<Uuid> = store.trades().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![first, second]);
    }

    #[test]
    fn update_trade_merges_but_keeps_balance() {
        let mut store = ready_store();
        let id = store.add_trade(draft(100.0)).unwrap();
        let changed = store
            .update_trade(
                id,
                TradePatch {
                    pnl: Some(300.0),
                    setup_reason: Some("late fill".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(changed);
        let trade = store.trade(id).unwrap();
        assert!((trade.pnl() - 300.0).abs() < f64::EPSILON);
        assert_eq!(trade.details.setup_reason, "late fill");
        assert!((store.account_balance() - 10_100.0).abs() < 1e-9);
        assert!((store.balance_discrepancy() - (-200.0)).abs() < 1e-9);
    }

    #[test]
    fn update_unknown_trade_is_a_no_op() {
        let mut store = ready_store();
        store.add_trade(draft(10.0)).unwrap();
        let before = store.trades().to_vec();
        let changed = store
            .update_trade(Uuid::new_v4(), TradePatch { pnl: Some(1.0), ..Default::default() })
            .unwrap();
        assert!(!changed);
        assert_eq!(store.trades(), before.as_slice());
    }

    #[test]
    fn delete_trade_reverses_pnl() {
        let mut store = ready_store();
        store.add_trade(draft(200.0)).unwrap();
        let id = store.add_trade(draft(100.0)).unwrap();
        assert!((store.account_balance() - 10_300.0).abs() < 1e-9);

        assert!(store.delete_trade(id).unwrap());
        assert!((store.account_balance() - 10_200.0).abs() < 1e-9);
        assert!(store.trade(id).is_none());
        assert!(!store.delete_trade(id).unwrap());
        assert!((store.account_balance() - 10_200.0).abs() < 1e-9);
    }

    #[test]
    fn goal_lifecycle_has_no_balance_effect() {
        let mut store = ready_store();
        let deadline = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let id = store.add_goal(GoalDraft::new("Complete 100 Trades", 100.0, deadline)).unwrap();
        assert!(store.goal(id).is_some());

        let updated = store
            .update_goal(id, GoalPatch { target_value: Some(50.0), ..Default::default() })
            .unwrap();
        assert!(updated);
        assert!((store.goal(id).unwrap().details.target_value - 50.0).abs() < f64::EPSILON);

        assert!(store.delete_goal(id).unwrap());
        assert!(!store.delete_goal(id).unwrap());
        assert!(store.goals().is_empty());
        assert!((store.account_balance() - 10_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn mutations_are_written_through() {
        let mut store = ready_store();
        store.add_trade(draft(42.0)).unwrap();
        let blobs = store.storage().blobs.borrow();
        assert_eq!(blobs.get("balance").map(String::as_str), Some("10042"));
        let trades: Vec<Trade> = serde_json::from_str(&blobs["trades"]).unwrap();
        assert_eq!(trades.len(), 1);
        assert!(!blobs.contains_key("goals"));
    }

    #[test]
    fn reload_restores_state() {
        let mut store = ready_store();
        store.add_trade(draft(75.0)).unwrap();
        store.add_trade(draft(-25.0)).unwrap();
        let storage = store.storage;

        let reopened = JournalStore::open(storage, 10_000.0);
        assert_eq!(reopened.trades().len(), 2);
        assert!((reopened.account_balance() - 10_050.0).abs() < 1e-9);
        assert!(reopened.balance_discrepancy().abs() < 1e-9);
    }

    #[test]
    fn reconcile_balance_resets_to_history() {
        let mut store = ready_store();
        let id = store.add_trade(draft(100.0)).unwrap();
        store
            .update_trade(id, TradePatch { pnl: Some(40.0), ..Default::default() })
            .unwrap();
        let balance = store.reconcile_balance().unwrap();
        assert!((balance - 10_040.0).abs() < 1e-9);
        assert!(store.balance_discrepancy().abs() < 1e-9);
    }

    #[test]
    fn metrics_are_stable_without_mutation() {
        let mut store = ready_store();
        store.add_trade(draft(100.0)).unwrap();
        store.add_trade(draft(-50.0)).unwrap();
        assert_eq!(store.metrics(), store.metrics());
    }
}
