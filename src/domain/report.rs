//! Point-in-time snapshot of the journal handed to report writers.

use chrono::NaiveDate;

use super::goal::Goal;
use super::goal_progress::GoalProgress;
use super::insight::Insight;
use super::metrics::Metrics;
use super::store::JournalStore;
use super::trade::Trade;
use crate::ports::storage_port::StoragePort;

pub struct JournalReport<'a> {
    pub generated_on: NaiveDate,
    pub starting_balance: f64,
    pub trades: &'a [Trade],
    pub metrics: Metrics,
    pub insights: Vec<Insight>,
    pub goals: Vec<(&'a Goal, GoalProgress)>,
}

impl<'a> JournalReport<'a> {
    pub fn from_store<S: StoragePort>(store: &'a JournalStore<S>, today: NaiveDate) -> Self {
        JournalReport {
            generated_on: today,
            starting_balance: store.starting_balance(),
            trades: store.trades(),
            metrics: store.metrics(),
            insights: store.insights(),
            goals: store.goal_progress(today),
        }
    }
}
