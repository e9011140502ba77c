//! Qualitative findings drawn from the trade history.
//!
//! Each finding is evaluated on its own; missing data suppresses only that
//! finding. Severity is a styling hint for whoever renders the list.

use std::fmt;

use super::breakdown::{best_group, by_pair, by_session};
use super::trade::{CurrencyPair, Session, Trade};

pub const HIGH_CONFIDENCE_MIN: u8 = 7;
pub const LOW_CONFIDENCE_MAX: u8 = 4;
pub const COMPLIANCE_WINDOW: usize = 5;
pub const COMPLIANCE_ALERT_THRESHOLD: f64 = 0.70;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Insight {
    BestPair {
        pair: CurrencyPair,
        total_pnl: f64,
        win_rate: f64,
    },
    BestSession {
        session: Session,
        total_pnl: f64,
        trades: usize,
    },
    ConfidenceCorrelation {
        high_confidence_avg: f64,
        low_confidence_avg: f64,
    },
    ComplianceAlert {
        average_ratio: f64,
    },
}

impl Insight {
    pub fn severity(&self) -> Severity {
        match self {
            Insight::BestPair { .. } => Severity::Success,
            Insight::BestSession { .. } => Severity::Info,
            Insight::ConfidenceCorrelation { .. } | Insight::ComplianceAlert { .. } => {
                Severity::Warning
            }
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Insight::BestPair { .. } => "Best Performing Pair",
            Insight::BestSession { .. } => "Best Trading Session",
            Insight::ConfidenceCorrelation { .. } => "Confidence Correlation",
            Insight::ComplianceAlert { .. } => "Rule Compliance Alert",
        }
    }
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Insight::BestPair {
                pair,
                total_pnl,
                win_rate,
            } => write!(
                f,
                "{pair} with ${total_pnl:.2} profit ({win_rate:.1}% win rate)"
            ),
            Insight::BestSession {
                session,
                total_pnl,
                trades,
            } => write!(
                f,
                "{session} session with ${total_pnl:.2} profit from {trades} trades"
            ),
            Insight::ConfidenceCorrelation {
                high_confidence_avg,
                low_confidence_avg,
            } => write!(
                f,
                "High confidence trades average ${high_confidence_avg:.2} vs ${low_confidence_avg:.2} for low confidence"
            ),
            Insight::ComplianceAlert { average_ratio } => write!(
                f,
                "Recent compliance score: {:.1}% - Focus on following your rules",
                average_ratio * 100.0
            ),
        }
    }
}

/// All findings that apply to `trades`, in a fixed order.
pub fn generate_insights(trades: &[Trade]) -> Vec<Insight> {
    [
        best_pair(trades),
        best_session(trades),
        confidence_correlation(trades),
        compliance_alert(trades),
    ]
    .into_iter()
    .flatten()
    .collect()
}

pub fn best_pair(trades: &[Trade]) -> Option<Insight> {
    let groups = by_pair(trades);
    best_group(&groups).map(|g| Insight::BestPair {
        pair: g.key,
        total_pnl: g.pnl,
        win_rate: g.win_rate(),
    })
}

pub fn best_session(trades: &[Trade]) -> Option<Insight> {
    let groups = by_session(trades);
    best_group(&groups).map(|g| Insight::BestSession {
        session: g.key,
        total_pnl: g.pnl,
        trades: g.trades,
    })
}

/// Emitted only when high-confidence trades out-earn low-confidence ones.
pub fn confidence_correlation(trades: &[Trade]) -> Option<Insight> {
    let mut high = Vec::new();
    let mut low = Vec::new();
    for trade in trades {
        let Some(psychology) = trade.psychology() else {
            continue;
        };
        if psychology.confidence_level >= HIGH_CONFIDENCE_MIN {
            high.push(trade.pnl());
        } else if psychology.confidence_level <= LOW_CONFIDENCE_MAX {
            low.push(trade.pnl());
        }
    }

    let high_confidence_avg = mean(&high)?;
    let low_confidence_avg = mean(&low)?;
    (high_confidence_avg > low_confidence_avg).then_some(Insight::ConfidenceCorrelation {
        high_confidence_avg,
        low_confidence_avg,
    })
}

/// Average checklist score over the most recent compliance-bearing trades.
pub fn recent_compliance_ratio(trades: &[Trade]) -> Option<f64> {
    let scores: Vec<f64> = trades
        .iter()
        .filter_map(|t| t.compliance())
        .map(|c| c.compliance_score())
        .collect();
    let start = scores.len().saturating_sub(COMPLIANCE_WINDOW);
    mean(&scores[start..])
}

pub fn compliance_alert(trades: &[Trade]) -> Option<Insight> {
    recent_compliance_ratio(trades).and_then(compliance_alert_for_ratio)
}

/// Alert strictly below the threshold; exactly 70% does not fire.
pub fn compliance_alert_for_ratio(average_ratio: f64) -> Option<Insight> {
    (average_ratio < COMPLIANCE_ALERT_THRESHOLD).then_some(Insight::ComplianceAlert { average_ratio })
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
