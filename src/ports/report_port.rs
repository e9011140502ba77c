//! Report output port trait.

use crate::domain::error::JournalError;
use crate::domain::report::JournalReport;

/// Port for writing a journal snapshot somewhere outside the process.
pub trait ReportPort {
    fn write(&self, report: &JournalReport<'_>, output_path: &str) -> Result<(), JournalError>;
}
