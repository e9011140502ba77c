//! Behavioral correlations: how psychological state and rule adherence line up with pnl.

use super::compliance::MistakeChecklist;
use super::insight::{HIGH_CONFIDENCE_MIN, LOW_CONFIDENCE_MAX};
use super::psychology::{MarketMood, PsychologyAssessment};
use super::trade::Trade;

pub const LOW_STRESS_MAX: u8 = 4;
pub const HIGH_STRESS_MIN: u8 = 7;
pub const RECENT_TREND_LEN: usize = 10;

/// Mean pnl of a bucket of trades; zero when the bucket is empty.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bucket {
    pub count: usize,
    pub average_pnl: f64,
}

impl Bucket {
    fn from_pnls<I: IntoIterator<Item = f64>>(pnls: I) -> Self {
        let (count, sum) = pnls
            .into_iter()
            .fold((0usize, 0.0_f64), |(n, s), p| (n + 1, s + p));
        Bucket {
            count,
            average_pnl: if count > 0 { sum / count as f64 } else { 0.0 },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PsychologyCorrelation {
    pub high_confidence: Bucket,
    pub low_confidence: Bucket,
    pub low_stress: Bucket,
    pub high_stress: Bucket,
    pub good_sleep: Bucket,
    pub poor_sleep: Bucket,
}

/// `None` when no trade carries a psychology assessment.
pub fn psychology_correlation(trades: &[Trade]) -> Option<PsychologyCorrelation> {
    let assessed: Vec<(&Trade, _)> = trades
        .iter()
        .filter_map(|t| t.psychology().map(|p| (t, p)))
        .collect();
    if assessed.is_empty() {
        return None;
    }

    let bucket = |pred: &dyn Fn(&PsychologyAssessment) -> bool| {
        Bucket::from_pnls(
            assessed
                .iter()
                .filter(|(_, p)| pred(p))
                .map(|(t, _)| t.pnl()),
        )
    };

    Some(PsychologyCorrelation {
        high_confidence: bucket(&|p| p.confidence_level >= HIGH_CONFIDENCE_MIN),
        low_confidence: bucket(&|p| p.confidence_level <= LOW_CONFIDENCE_MAX),
        low_stress: bucket(&|p| p.stress_level <= LOW_STRESS_MAX),
        high_stress: bucket(&|p| p.stress_level >= HIGH_STRESS_MIN),
        good_sleep: bucket(&|p| p.sleep_quality.is_rested()),
        poor_sleep: bucket(&|p| !p.sleep_quality.is_rested()),
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct MoodStats {
    pub mood: MarketMood,
    pub count: usize,
    pub average_pnl: f64,
    pub win_rate: f64,
}

/// Outcome per market mood, moods in the order first seen.
pub fn mood_distribution(trades: &[Trade]) -> Vec<MoodStats> {
    let mut moods: Vec<(MarketMood, usize, usize, f64)> = Vec::new();
    for trade in trades {
        let Some(psychology) = trade.psychology() else {
            continue;
        };
        let index = match moods.iter().position(|m| m.0 == psychology.market_mood) {
            Some(i) => i,
            None => {
                moods.push((psychology.market_mood, 0, 0, 0.0));
                moods.len() - 1
            }
        };
        let entry = &mut moods[index];
        entry.1 += 1;
        if trade.is_winner() {
            entry.2 += 1;
        }
        entry.3 += trade.pnl();
    }

    moods
        .into_iter()
        .map(|(mood, count, wins, pnl)| MoodStats {
            mood,
            count,
            average_pnl: pnl / count as f64,
            win_rate: 100.0 * wins as f64 / count as f64,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct PsychologyTrendPoint {
    pub trade_number: usize,
    pub confidence: u8,
    pub stress: u8,
    pub life_stress: u8,
    pub pnl: f64,
}

/// The last few psychology-bearing trades, numbered within that subset.
pub fn recent_psychology_trend(trades: &[Trade]) -> Vec<PsychologyTrendPoint> {
    let points: Vec<PsychologyTrendPoint> = trades
        .iter()
        .filter_map(|t| t.psychology().map(|p| (t, p)))
        .enumerate()
        .map(|(i, (t, p))| PsychologyTrendPoint {
            trade_number: i + 1,
            confidence: p.confidence_level,
            stress: p.stress_level,
            life_stress: p.life_stress_level,
            pnl: t.pnl(),
        })
        .collect();
    let start = points.len().saturating_sub(RECENT_TREND_LEN);
    points[start..].to_vec()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComplianceSummary {
    pub assessed_trades: usize,
    /// Mean checklist score, 0-1.
    pub average_score: f64,
    /// How often each mistake was recorded, in checklist order.
    pub mistake_frequency: [usize; MistakeChecklist::MISTAKE_COUNT],
}

pub fn compliance_summary(trades: &[Trade]) -> Option<ComplianceSummary> {
    let mut assessed_trades = 0usize;
    let mut score_sum = 0.0_f64;
    let mut mistake_frequency = [0usize; MistakeChecklist::MISTAKE_COUNT];

    for compliance in trades.iter().filter_map(|t| t.compliance()) {
        assessed_trades += 1;
        score_sum += compliance.compliance_score();
        for (slot, made) in mistake_frequency
            .iter_mut()
            .zip(compliance.mistakes.entries())
        {
            if made {
                *slot += 1;
            }
        }
    }

    (assessed_trades > 0).then(|| ComplianceSummary {
        assessed_trades,
        average_score: score_sum / assessed_trades as f64,
        mistake_frequency,
    })
}
