//! Journal domain: records, the store, and every figure derived from them.

pub mod error;
pub mod numeric;
pub mod psychology;
pub mod compliance;
pub mod trade;
pub mod goal;
pub mod account;
pub mod store;
pub mod metrics;
pub mod breakdown;
pub mod insight;
pub mod correlation;
pub mod goal_progress;
pub mod history;
pub mod report;
pub mod config;
pub mod config_validation;
