//! CSV export of the trade history.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::domain::error::JournalError;
use crate::domain::report::JournalReport;
use crate::domain::trade::Trade;
use crate::ports::report_port::ReportPort;

/// Writes one row per trade, in store order.
pub struct CsvExportAdapter;

/// Column names, matching the field order of `TradeRow`.
const HEADERS: [&str; 22] = [
    "id",
    "date",
    "time",
    "pair",
    "direction",
    "entry_price",
    "exit_price",
    "position_size",
    "pip_movement",
    "pnl",
    "duration_minutes",
    "session",
    "strategy",
    "timeframe",
    "market_condition",
    "setup_rating",
    "confidence",
    "stress",
    "market_mood",
    "rules_followed",
    "mistakes",
    "setup_reason",
];

#[derive(Debug, Serialize)]
struct TradeRow<'a> {
    id: String,
    date: String,
    time: String,
    pair: &'static str,
    direction: &'static str,
    entry_price: f64,
    exit_price: f64,
    position_size: f64,
    pip_movement: f64,
    pnl: f64,
    duration_minutes: u32,
    session: &'static str,
    strategy: &'static str,
    timeframe: &'static str,
    market_condition: &'static str,
    setup_rating: u8,
    confidence: Option<u8>,
    stress: Option<u8>,
    market_mood: Option<&'static str>,
    rules_followed: Option<usize>,
    mistakes: Option<usize>,
    setup_reason: &'a str,
}

impl<'a> From<&'a Trade> for TradeRow<'a> {
    fn from(trade: &'a Trade) -> Self {
        let d = &trade.details;
        let psychology = trade.psychology();
        let compliance = trade.compliance();
        TradeRow {
            id: trade.id.to_string(),
            date: d.date.format("%Y-%m-%d").to_string(),
            time: d.time.format("%H:%M").to_string(),
            pair: d.currency_pair.as_str(),
            direction: d.direction.as_str(),
            entry_price: d.entry_price,
            exit_price: d.exit_price,
            position_size: d.position_size,
            pip_movement: d.pip_movement,
            pnl: d.pnl,
            duration_minutes: d.duration,
            session: d.session.as_str(),
            strategy: d.strategy.as_str(),
            timeframe: d.timeframe.as_str(),
            market_condition: d.market_condition.as_str(),
            setup_rating: d.setup_rating,
            confidence: psychology.map(|p| p.confidence_level),
            stress: psychology.map(|p| p.stress_level),
            market_mood: psychology.map(|p| p.market_mood.as_str()),
            rules_followed: compliance.map(|c| c.rule_compliance.followed()),
            mistakes: compliance.map(|c| c.mistake_count()),
            setup_reason: &d.setup_reason,
        }
    }
}

impl CsvExportAdapter {
    pub fn render(trades: &[Trade]) -> Result<String, JournalError> {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        // serde only emits headers alongside the first row
        if trades.is_empty() {
            wtr.write_record(HEADERS)
                .map_err(|e| JournalError::Serialization {
                    key: "trades".into(),
                    reason: format!("CSV write error: {}", e),
                })?;
        }
        for trade in trades {
            wtr.serialize(TradeRow::from(trade))
                .map_err(|e| JournalError::Serialization {
                    key: trade.id.to_string(),
                    reason: format!("CSV write error: {}", e),
                })?;
        }
        let bytes = wtr.into_inner().map_err(|e| JournalError::Serialization {
            key: "trades".into(),
            reason: e.to_string(),
        })?;
        String::from_utf8(bytes).map_err(|e| JournalError::Serialization {
            key: "trades".into(),
            reason: e.to_string(),
        })
    }
}

impl ReportPort for CsvExportAdapter {
    fn write(&self, report: &JournalReport<'_>, output_path: &str) -> Result<(), JournalError> {
        let content = Self::render(report.trades)?;
        let path = Path::new(output_path);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }
}
