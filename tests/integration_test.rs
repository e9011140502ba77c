//! Store-level integration tests.
//!
//! Tests cover:
//! - Trade lifecycle scenarios and the balance they leave behind
//! - Per-key load failures and unreadable blobs falling back to defaults
//! - Blobs written with text-encoded numbers
//! - Insights and goal progress computed from the store
//! - Round trips through the file and SQLite storage adapters
//! - Property checks on metrics and the balance

mod common;

use approx::assert_relative_eq;
use common::*;
use fxjournal::adapters::file_storage_adapter::FileStorageAdapter;
use fxjournal::domain::error::JournalError;
use fxjournal::domain::goal::{GOAL_TEMPLATES, GoalDraft};
use fxjournal::domain::goal_progress::GoalStatus;
use fxjournal::domain::insight::Insight;
use fxjournal::domain::store::{JournalStore, StorePhase};
use fxjournal::domain::trade::{CurrencyPair, Session, TradePatch};
use fxjournal::ports::storage_port::StoragePort;
use proptest::prelude::*;

mod trade_lifecycle {
    use super::*;

    #[test]
    fn three_trades_then_delete() {
        let mut store = open_store(MockStorage::new());
        store.add_trade(draft(CurrencyPair::EurUsd, 100.0)).unwrap();
        let loser = store.add_trade(draft(CurrencyPair::EurUsd, -50.0)).unwrap();
        store.add_trade(draft(CurrencyPair::GbpUsd, 200.0)).unwrap();

        let m = store.metrics();
        assert_eq!(m.total_trades, 3);
        assert_eq!(m.winning_trades, 2);
        assert_eq!(m.losing_trades, 1);
        assert_relative_eq!(m.win_rate, 66.666_666_666, epsilon = 1e-6);
        assert_relative_eq!(m.total_pnl, 250.0);
        assert_relative_eq!(m.profit_factor, 6.0);
        assert_relative_eq!(m.average_win, 150.0);
        assert_relative_eq!(m.average_loss, 50.0);
        assert_relative_eq!(m.current_balance, 10_250.0);
        assert_eq!(m.drawdown, 0.0);

        assert!(store.delete_trade(loser).unwrap());
        let m = store.metrics();
        assert_eq!(m.total_trades, 2);
        assert_relative_eq!(m.current_balance, 10_300.0);
        assert_eq!(m.profit_factor, 0.0);
    }

    #[test]
    fn losing_run_reports_drawdown() {
        let mut store = open_store(MockStorage::new());
        store.add_trade(draft(CurrencyPair::UsdJpy, -300.0)).unwrap();
        store.add_trade(draft(CurrencyPair::UsdJpy, -200.0)).unwrap();
        assert_relative_eq!(store.metrics().drawdown, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn delete_unknown_id_changes_nothing() {
        let storage = MockStorage::new();
        let mut store = open_store(storage);
        store.add_trade(draft(CurrencyPair::EurUsd, 10.0)).unwrap();
        let saves_before = store.storage().saves.borrow().len();

        assert!(!store.delete_trade(uuid::Uuid::new_v4()).unwrap());
        assert_eq!(store.storage().saves.borrow().len(), saves_before);
        assert_relative_eq!(store.account_balance(), 10_010.0);
    }

    #[test]
    fn pnl_edit_leaves_a_reconcilable_gap() {
        let mut store = open_store(MockStorage::new());
        let id = store.add_trade(draft(CurrencyPair::EurUsd, 100.0)).unwrap();
        store
            .update_trade(
                id,
                TradePatch {
                    pnl: Some(150.0),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_relative_eq!(store.account_balance(), 10_100.0);
        assert_relative_eq!(store.balance_discrepancy(), -50.0);

        store.reconcile_balance().unwrap();
        assert_relative_eq!(store.account_balance(), 10_150.0);
        assert_eq!(store.storage().blob("balance").as_deref(), Some("10150"));
    }

    #[test]
    fn nothing_mutates_before_load() {
        let mut store = JournalStore::new(MockStorage::new(), 10_000.0);
        assert_eq!(store.phase(), StorePhase::Uninitialized);
        assert!(matches!(
            store.add_goal(GoalDraft::new("x", 1.0, date(2025, 1, 1))),
            Err(JournalError::NotReady)
        ));
        assert!(matches!(store.reconcile_balance(), Err(JournalError::NotReady)));
        assert!(store.storage().saves.borrow().is_empty());

        store.load();
        assert!(store.add_goal(GoalDraft::new("x", 1.0, date(2025, 1, 1))).is_ok());
    }
}

mod loading {
    use super::*;

    const ONE_TRADE: &str = r#"[{
        "id": "0b8e8d7a-2f7a-4c1e-9d0e-4b6f3c1d2e10",
        "timestamp": "2024-03-04T10:00:00Z",
        "date": "2024-03-04",
        "time": "09:30",
        "currencyPair": "EUR/USD",
        "direction": "Long",
        "entryPrice": "1.0850",
        "exitPrice": "1.0870",
        "positionSize": "1",
        "pipMovement": "20",
        "pnl": "200",
        "duration": "45",
        "session": "London",
        "strategy": "Breakout",
        "timeframe": "1H",
        "marketCondition": "Trending",
        "setupRating": "4",
        "psychology": {
            "confidenceLevel": "8",
            "stressLevel": 3,
            "sleepQuality": "Good",
            "marketMood": "Calm",
            "lifeStressLevel": 2
        }
    }]"#;

    #[test]
    fn text_encoded_numbers_load() {
        let storage = MockStorage::new()
            .with_blob("trades", ONE_TRADE)
            .with_blob("balance", "10200");
        let store = open_store(storage);
        assert_eq!(store.trades().len(), 1);
        let trade = &store.trades()[0];
        assert_relative_eq!(trade.pnl(), 200.0);
        assert_eq!(trade.details.duration, 45);
        assert_eq!(trade.psychology().unwrap().confidence_level, 8);
        assert_relative_eq!(store.balance_discrepancy(), 0.0);
    }

    #[test]
    fn failing_key_does_not_block_others() {
        let storage = MockStorage::new()
            .with_error("trades", "permission denied")
            .with_blob("balance", "12345.5")
            .with_blob(
                "goals",
                r#"[{"id":"8e1c4c1a-0d2e-4a4b-9a47-0d7b3c9e5f21","createdAt":"2024-01-01T00:00:00Z",
                    "title":"Complete 100 Trades","targetValue":"100","deadline":"2024-12-31"}]"#,
            );
        let store = open_store(storage);
        assert!(store.is_ready());
        assert!(store.trades().is_empty());
        assert_eq!(store.goals().len(), 1);
        assert_relative_eq!(store.goals()[0].details.target_value, 100.0);
        assert_relative_eq!(store.account_balance(), 12_345.5);
    }

    #[test]
    fn unreadable_blobs_fall_back_to_defaults() {
        let storage = MockStorage::new()
            .with_blob("trades", "{not json")
            .with_blob("goals", "[]")
            .with_blob("balance", "lots");
        let store = open_store(storage);
        assert!(store.trades().is_empty());
        assert!(store.goals().is_empty());
        assert_relative_eq!(store.account_balance(), 10_000.0);
    }

    #[test]
    fn failed_save_keeps_memory_state() {
        let storage = MockStorage::new().with_save_error("trades");
        let mut store = open_store(storage);
        let id = store.add_trade(draft(CurrencyPair::AudUsd, 60.0)).unwrap();
        assert!(store.trade(id).is_some());
        assert_relative_eq!(store.account_balance(), 10_060.0);
        assert_eq!(store.storage().blob("trades"), None);
        assert_eq!(store.storage().blob("balance").as_deref(), Some("10060"));
    }
}

mod derived_views {
    use super::*;

    #[test]
    fn compliance_alert_from_recent_trades() {
        let mut store = open_store(MockStorage::new());
        for _ in 0..5 {
            store
                .add_trade(with_rules_followed(draft(CurrencyPair::EurUsd, 10.0), 3))
                .unwrap();
        }
        let alert = store
            .insights()
            .into_iter()
            .find(|i| matches!(i, Insight::ComplianceAlert { .. }))
            .unwrap();
        assert_eq!(
            alert.to_string(),
            "Recent compliance score: 42.9% - Focus on following your rules"
        );
    }

    #[test]
    fn insights_cover_pair_session_and_confidence() {
        let mut store = open_store(MockStorage::new());
        store
            .add_trade(with_confidence(
                draft_in_session(CurrencyPair::GbpUsd, Session::NewYork, 300.0),
                9,
            ))
            .unwrap();
        store
            .add_trade(with_confidence(
                draft_in_session(CurrencyPair::EurUsd, Session::London, -100.0),
                2,
            ))
            .unwrap();

        let insights = store.insights();
        assert_eq!(insights.len(), 3);
        assert!(matches!(
            insights[0],
            Insight::BestPair { pair: CurrencyPair::GbpUsd, .. }
        ));
        assert!(matches!(
            insights[1],
            Insight::BestSession { session: Session::NewYork, trades: 1, .. }
        ));
        assert!(matches!(insights[2], Insight::ConfidenceCorrelation { .. }));
    }

    #[test]
    fn goal_progress_binds_to_metrics() {
        let mut store = open_store(MockStorage::new());
        for pnl in [50.0, 40.0, 30.0, 20.0, 10.0, 5.0, 5.0, -10.0, -10.0, -10.0] {
            store.add_trade(draft(CurrencyPair::EurUsd, pnl)).unwrap();
        }
        let deadline = date(2024, 12, 31);
        store.add_goal(GOAL_TEMPLATES[0].to_draft(deadline)).unwrap();
        store.add_goal(GOAL_TEMPLATES[2].to_draft(deadline)).unwrap();

        let progress = store.goal_progress(date(2024, 6, 1));
        assert_eq!(progress.len(), 2);

        let (_, win_rate) = &progress[0];
        assert_relative_eq!(win_rate.current_value, 70.0);
        assert_relative_eq!(win_rate.progress_percent, 100.0);
        assert_eq!(win_rate.status, GoalStatus::Completed);

        let (_, volume) = &progress[1];
        assert_relative_eq!(volume.current_value, 10.0);
        assert_eq!(volume.status, GoalStatus::Behind);

        let later = store.goal_progress(date(2025, 1, 1));
        assert_eq!(later[1].1.status, GoalStatus::Overdue);
    }
}

mod adapters {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn file_storage_survives_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let mut store =
                JournalStore::open(FileStorageAdapter::new(dir.path()).unwrap(), 5_000.0);
            store.add_trade(draft(CurrencyPair::UsdCad, 125.0)).unwrap();
            store
                .add_goal(GoalDraft::new("Journal every trade", 30.0, date(2024, 9, 1)))
                .unwrap();
        }
        assert!(dir.path().join("trades.json").exists());

        let store = JournalStore::open(FileStorageAdapter::new(dir.path()).unwrap(), 5_000.0);
        assert_eq!(store.trades().len(), 1);
        assert_eq!(store.goals().len(), 1);
        assert_relative_eq!(store.account_balance(), 5_125.0);
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn sqlite_storage_round_trip() {
        use fxjournal::adapters::sqlite_adapter::SqliteStorageAdapter;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("journal.db");
        let id = {
            let mut store = JournalStore::open(SqliteStorageAdapter::open(&path).unwrap(), 10_000.0);
            store.add_trade(draft(CurrencyPair::EurJpy, -75.0)).unwrap()
        };

        let adapter = SqliteStorageAdapter::open(&path).unwrap();
        assert_eq!(adapter.load("goals").unwrap(), None);
        assert_eq!(adapter.load("balance").unwrap().as_deref(), Some("9925"));

        let store = JournalStore::open(adapter, 10_000.0);
        assert!(store.trade(id).is_some());
    }

    #[test]
    fn boxed_storage_drives_the_store() {
        let storage: Box<dyn StoragePort> = Box::new(MockStorage::new());
        let mut store = JournalStore::open(storage, 10_000.0);
        store.add_trade(draft(CurrencyPair::EurUsd, 1.0)).unwrap();
        assert_eq!(store.trades().len(), 1);
    }
}

mod properties {
    use super::*;

    fn pnl() -> impl Strategy<Value = f64> {
        prop_oneof![Just(0.0), -500.0..500.0_f64]
    }

    proptest! {
        #[test]
        fn counts_stay_consistent(pnls in prop::collection::vec(pnl(), 0..40)) {
            let mut store = open_store(MockStorage::new());
            for p in &pnls {
                store.add_trade(draft(CurrencyPair::EurUsd, *p)).unwrap();
            }
            let m = store.metrics();
            prop_assert_eq!(m.total_trades, pnls.len());
            prop_assert!(m.winning_trades + m.losing_trades <= m.total_trades);
            prop_assert!(m.win_rate >= 0.0 && m.win_rate <= 100.0);
            prop_assert!(m.profit_factor >= 0.0);
            prop_assert!(m.drawdown >= 0.0);
            prop_assert_eq!(m, store.metrics());
        }

        #[test]
        fn balance_tracks_history(
            pnls in prop::collection::vec(pnl(), 1..30),
            deletions in prop::collection::vec(any::<prop::sample::Index>(), 0..10),
        ) {
            let mut store = open_store(MockStorage::new());
            let mut ids = Vec::new();
            for p in &pnls {
                ids.push(store.add_trade(draft(CurrencyPair::GbpJpy, *p)).unwrap());
            }
            for index in deletions {
                if ids.is_empty() {
                    break;
                }
                let id = ids.remove(index.index(ids.len()));
                prop_assert!(store.delete_trade(id).unwrap());
            }
            let expected = 10_000.0 + store.trades().iter().map(|t| t.pnl()).sum::<f64>();
            prop_assert!((store.account_balance() - expected).abs() < 1e-6);
            prop_assert!(store.balance_discrepancy().abs() < 1e-6);
        }
    }
}
