//! fxjournal: personal FX trading journal.
//!
//! Hexagonal architecture: the trade/goal store and analytics in [`domain`],
//! port traits in [`ports`], concrete implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
