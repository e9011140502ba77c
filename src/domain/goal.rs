//! Trader goals.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::numeric::{lenient_f64, lenient_opt_f64};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalUnit {
    #[default]
    Percentage,
    Number,
    Ratio,
    Hours,
    Dollars,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalCategory {
    #[default]
    Performance,
    Risk,
    Volume,
    Education,
    Psychology,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalPriority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub target_value: f64,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub current_value: Option<f64>,
    #[serde(default)]
    pub unit: GoalUnit,
    #[serde(default)]
    pub category: GoalCategory,
    pub deadline: NaiveDate,
    #[serde(default)]
    pub priority: GoalPriority,
}

impl GoalDraft {
    pub fn new(title: impl Into<String>, target_value: f64, deadline: NaiveDate) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            target_value,
            current_value: None,
            unit: GoalUnit::default(),
            category: GoalCategory::default(),
            deadline,
            priority: GoalPriority::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub details: GoalDraft,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GoalPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub target_value: Option<f64>,
    pub current_value: Option<Option<f64>>,
    pub unit: Option<GoalUnit>,
    pub category: Option<GoalCategory>,
    pub deadline: Option<NaiveDate>,
    pub priority: Option<GoalPriority>,
}

impl GoalPatch {
    pub fn apply(self, draft: &mut GoalDraft) {
        if let Some(v) = self.title {
            draft.title = v;
        }
        if let Some(v) = self.description {
            draft.description = v;
        }
        if let Some(v) = self.target_value {
            draft.target_value = v;
        }
        if let Some(v) = self.current_value {
            draft.current_value = v;
        }
        if let Some(v) = self.unit {
            draft.unit = v;
        }
        if let Some(v) = self.category {
            draft.category = v;
        }
        if let Some(v) = self.deadline {
            draft.deadline = v;
        }
        if let Some(v) = self.priority {
            draft.priority = v;
        }
    }
}

/// Starter goals offered when creating a new one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalTemplate {
    pub title: &'static str,
    pub target_value: f64,
    pub unit: GoalUnit,
    pub category: GoalCategory,
}

impl GoalTemplate {
    pub fn to_draft(self, deadline: NaiveDate) -> GoalDraft {
        GoalDraft {
            unit: self.unit,
            category: self.category,
            ..GoalDraft::new(self.title, self.target_value, deadline)
        }
    }
}

pub const GOAL_TEMPLATES: [GoalTemplate; 5] = [
    GoalTemplate {
        title: "Achieve 70% Win Rate",
        target_value: 70.0,
        unit: GoalUnit::Percentage,
        category: GoalCategory::Performance,
    },
    GoalTemplate {
        title: "Maintain 2.0 Profit Factor",
        target_value: 2.0,
        unit: GoalUnit::Ratio,
        category: GoalCategory::Performance,
    },
    GoalTemplate {
        title: "Complete 100 Trades",
        target_value: 100.0,
        unit: GoalUnit::Number,
        category: GoalCategory::Volume,
    },
    GoalTemplate {
        title: "Keep Drawdown Under 10%",
        target_value: 10.0,
        unit: GoalUnit::Percentage,
        category: GoalCategory::Risk,
    },
    GoalTemplate {
        title: "Study 20 Hours This Month",
        target_value: 20.0,
        unit: GoalUnit::Hours,
        category: GoalCategory::Education,
    },
];
