//! Port traits: the seams between the journal domain and the outside world.

pub mod config_port;
pub mod report_port;
pub mod storage_port;
