//! Rule adherence and execution review captured alongside a trade.

use serde::{Deserialize, Serialize};

/// The fixed trading-discipline checklist. `true` means the rule was followed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuleChecklist {
    pub followed_entry_criteria: bool,
    pub proper_position_size: bool,
    pub set_stop_loss: bool,
    pub did_not_move_stop: bool,
    pub took_profit_at_plan: bool,
    pub avoided_news_trading: bool,
    pub waited_for_setup: bool,
}

impl RuleChecklist {
    pub const RULE_COUNT: usize = 7;

    pub const LABELS: [&'static str; Self::RULE_COUNT] = [
        "Followed entry criteria exactly",
        "Used proper position size (1-2% risk)",
        "Set stop loss before entry",
        "Did not move stop loss against me",
        "Took profit at planned level",
        "Avoided trading during major news",
        "Waited for high-quality setup",
    ];

    pub fn entries(&self) -> [bool; Self::RULE_COUNT] {
        [
            self.followed_entry_criteria,
            self.proper_position_size,
            self.set_stop_loss,
            self.did_not_move_stop,
            self.took_profit_at_plan,
            self.avoided_news_trading,
            self.waited_for_setup,
        ]
    }

    pub fn followed(&self) -> usize {
        self.entries().iter().filter(|&&b| b).count()
    }

    /// Fraction of the checklist followed, in `[0, 1]`.
    pub fn score(&self) -> f64 {
        self.followed() as f64 / Self::RULE_COUNT as f64
    }
}

/// Common execution errors. `true` means the mistake was made.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MistakeChecklist {
    pub moved_stop_against: bool,
    pub took_profit_early: bool,
    pub chased_market: bool,
    pub over_risked: bool,
    pub ignored_news: bool,
    pub traded_without_setup: bool,
    pub revenge_traded: bool,
    pub overtraded_boredom: bool,
}

impl MistakeChecklist {
    pub const MISTAKE_COUNT: usize = 8;

    pub const LABELS: [&'static str; Self::MISTAKE_COUNT] = [
        "Moved stop loss against me",
        "Took profit too early due to fear",
        "Chased the market (FOMO)",
        "Over-risked position size",
        "Ignored pending news events",
        "Traded without proper setup",
        "Revenge traded after loss",
        "Entered due to boredom/overtrading",
    ];

    pub fn entries(&self) -> [bool; Self::MISTAKE_COUNT] {
        [
            self.moved_stop_against,
            self.took_profit_early,
            self.chased_market,
            self.over_risked,
            self.ignored_news,
            self.traded_without_setup,
            self.revenge_traded,
            self.overtraded_boredom,
        ]
    }

    pub fn count(&self) -> usize {
        self.entries().iter().filter(|&&b| b).count()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExecutionRating {
    Perfect,
    #[default]
    Good,
    Fair,
    Poor,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExecutionQuality {
    pub entry_execution: ExecutionRating,
    pub exit_execution: ExecutionRating,
    pub overall_execution: ExecutionRating,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComplianceAssessment {
    pub rule_compliance: RuleChecklist,
    pub mistakes: MistakeChecklist,
    pub execution_quality: ExecutionQuality,
    pub deviation_reason: String,
    pub improvement_notes: String,
}

impl ComplianceAssessment {
    pub fn compliance_score(&self) -> f64 {
        self.rule_compliance.score()
    }

    pub fn mistake_count(&self) -> usize {
        self.mistakes.count()
    }
}
