#![allow(dead_code)]

use chrono::{NaiveDate, NaiveTime};
use fxjournal::domain::compliance::{ComplianceAssessment, RuleChecklist};
use fxjournal::domain::error::JournalError;
use fxjournal::domain::psychology::PsychologyAssessment;
use fxjournal::domain::store::JournalStore;
use fxjournal::domain::trade::{CurrencyPair, Session, TradeDraft};
use fxjournal::ports::storage_port::StoragePort;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

/// In-memory storage with per-key failure injection.
pub struct MockStorage {
    pub blobs: RefCell<HashMap<String, String>>,
    pub load_errors: HashMap<String, String>,
    pub save_errors: HashSet<String>,
    pub saves: RefCell<Vec<String>>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self {
            blobs: RefCell::new(HashMap::new()),
            load_errors: HashMap::new(),
            save_errors: HashSet::new(),
            saves: RefCell::new(Vec::new()),
        }
    }

    pub fn with_blob(self, key: &str, value: &str) -> Self {
        self.blobs
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_error(mut self, key: &str, reason: &str) -> Self {
        self.load_errors.insert(key.to_string(), reason.to_string());
        self
    }

    pub fn with_save_error(mut self, key: &str) -> Self {
        self.save_errors.insert(key.to_string());
        self
    }

    pub fn blob(&self, key: &str) -> Option<String> {
        self.blobs.borrow().get(key).cloned()
    }
}

impl StoragePort for MockStorage {
    fn load(&self, key: &str) -> Result<Option<String>, JournalError> {
        if let Some(reason) = self.load_errors.get(key) {
            return Err(JournalError::Storage {
                key: key.to_string(),
                reason: reason.clone(),
            });
        }
        Ok(self.blobs.borrow().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), JournalError> {
        self.saves.borrow_mut().push(key.to_string());
        if self.save_errors.contains(key) {
            return Err(JournalError::Storage {
                key: key.to_string(),
                reason: "quota exceeded".to_string(),
            });
        }
        self.blobs
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn draft(pair: CurrencyPair, pnl: f64) -> TradeDraft {
    TradeDraft::new(
        date(2024, 3, 4),
        NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        pair,
        pnl,
    )
}

pub fn draft_in_session(pair: CurrencyPair, session: Session, pnl: f64) -> TradeDraft {
    let mut d = draft(pair, pnl);
    d.session = session;
    d
}

pub fn with_confidence(mut d: TradeDraft, confidence: u8) -> TradeDraft {
    d.psychology = Some(PsychologyAssessment {
        confidence_level: confidence,
        ..Default::default()
    });
    d
}

/// Compliance where the first `followed` checklist rules were kept.
pub fn with_rules_followed(mut d: TradeDraft, followed: usize) -> TradeDraft {
    d.compliance = Some(ComplianceAssessment {
        rule_compliance: RuleChecklist {
            followed_entry_criteria: followed > 0,
            proper_position_size: followed > 1,
            set_stop_loss: followed > 2,
            did_not_move_stop: followed > 3,
            took_profit_at_plan: followed > 4,
            avoided_news_trading: followed > 5,
            waited_for_setup: followed > 6,
        },
        ..Default::default()
    });
    d
}

pub fn open_store(storage: MockStorage) -> JournalStore<MockStorage> {
    JournalStore::open(storage, 10_000.0)
}
