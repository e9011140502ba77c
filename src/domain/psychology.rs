//! Psychological state captured alongside a trade.

use serde::{Deserialize, Serialize};

use super::numeric::lenient_level;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SleepQuality {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl SleepQuality {
    /// Excellent and Good count as rested.
    pub fn is_rested(self) -> bool {
        matches!(self, SleepQuality::Excellent | SleepQuality::Good)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketMood {
    Excited,
    Calm,
    Fearful,
    Greedy,
    Frustrated,
    Bored,
}

impl MarketMood {
    pub const ALL: [MarketMood; 6] = [
        MarketMood::Excited,
        MarketMood::Calm,
        MarketMood::Fearful,
        MarketMood::Greedy,
        MarketMood::Frustrated,
        MarketMood::Bored,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MarketMood::Excited => "Excited",
            MarketMood::Calm => "Calm",
            MarketMood::Fearful => "Fearful",
            MarketMood::Greedy => "Greedy",
            MarketMood::Frustrated => "Frustrated",
            MarketMood::Bored => "Bored",
        }
    }
}

/// Scales run 1 (low) to 10 (high).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PsychologyAssessment {
    #[serde(deserialize_with = "lenient_level")]
    pub confidence_level: u8,
    #[serde(deserialize_with = "lenient_level")]
    pub stress_level: u8,
    pub sleep_quality: SleepQuality,
    pub market_mood: MarketMood,
    #[serde(deserialize_with = "lenient_level")]
    pub life_stress_level: u8,
    #[serde(default)]
    pub pre_trade_notes: String,
    #[serde(default)]
    pub post_trade_emotions: String,
    #[serde(default)]
    pub lessons_learned: String,
}

impl Default for PsychologyAssessment {
    fn default() -> Self {
        Self {
            confidence_level: 5,
            stress_level: 5,
            sleep_quality: SleepQuality::Good,
            market_mood: MarketMood::Calm,
            life_stress_level: 5,
            pre_trade_notes: String::new(),
            post_trade_emotions: String::new(),
            lessons_learned: String::new(),
        }
    }
}
