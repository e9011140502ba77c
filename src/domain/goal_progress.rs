//! Live goal progress.
//!
//! Goals whose title names a tracked statistic are measured against the
//! current metrics instead of the value stored on the goal.

use chrono::NaiveDate;

use super::goal::Goal;
use super::metrics::Metrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GoalStatus {
    Completed,
    Overdue,
    OnTrack,
    InProgress,
    Behind,
}

impl GoalStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            GoalStatus::Completed => "completed",
            GoalStatus::Overdue => "overdue",
            GoalStatus::OnTrack => "on-track",
            GoalStatus::InProgress => "in-progress",
            GoalStatus::Behind => "behind",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GoalStatus::Completed => "Completed",
            GoalStatus::Overdue => "Overdue",
            GoalStatus::OnTrack => "On Track",
            GoalStatus::InProgress => "In Progress",
            GoalStatus::Behind => "Behind",
        }
    }
}

/// Statistic a goal is bound to by its title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundMetric {
    WinRate,
    ProfitFactor,
    TotalTrades,
    Drawdown,
}

impl BoundMetric {
    /// Checked in this order; the first keyword found in the title wins.
    const KEYWORDS: [(&'static str, BoundMetric); 4] = [
        ("win rate", BoundMetric::WinRate),
        ("profit factor", BoundMetric::ProfitFactor),
        ("trades", BoundMetric::TotalTrades),
        ("drawdown", BoundMetric::Drawdown),
    ];

    pub fn for_title(title: &str) -> Option<Self> {
        let title = title.to_lowercase();
        Self::KEYWORDS
            .iter()
            .find(|(keyword, _)| title.contains(keyword))
            .map(|&(_, metric)| metric)
    }

    pub fn read(self, metrics: &Metrics) -> f64 {
        match self {
            BoundMetric::WinRate => metrics.win_rate,
            BoundMetric::ProfitFactor => metrics.profit_factor,
            BoundMetric::TotalTrades => metrics.total_trades as f64,
            BoundMetric::Drawdown => metrics.drawdown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalProgress {
    pub current_value: f64,
    /// 0-100, capped at 100.
    pub progress_percent: f64,
    pub status: GoalStatus,
}

pub fn resolve_progress(goal: &Goal, metrics: &Metrics, today: NaiveDate) -> GoalProgress {
    let details = &goal.details;
    let current_value = match BoundMetric::for_title(&details.title) {
        Some(metric) => metric.read(metrics),
        None => details.current_value.unwrap_or(0.0),
    };
    let target = if details.target_value != 0.0 && details.target_value.is_finite() {
        details.target_value
    } else {
        1.0
    };
    let progress_percent = (100.0 * current_value / target).min(100.0);

    GoalProgress {
        current_value,
        progress_percent,
        status: goal_status(progress_percent, details.deadline, today),
    }
}

/// Completion outranks the deadline; a passed deadline outranks the progress tiers.
///
/// Deadlines compare as calendar dates, so a goal due today is not yet overdue.
/// A comparison against the current instant with the deadline read as midnight
/// would flag it overdue for the whole of its deadline day.
pub fn goal_status(progress_percent: f64, deadline: NaiveDate, today: NaiveDate) -> GoalStatus {
    if progress_percent >= 100.0 {
        GoalStatus::Completed
    } else if deadline < today {
        GoalStatus::Overdue
    } else if progress_percent >= 75.0 {
        GoalStatus::OnTrack
    } else if progress_percent >= 50.0 {
        GoalStatus::InProgress
    } else {
        GoalStatus::Behind
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GoalSummary {
    pub total: usize,
    pub completed: usize,
    pub on_track: usize,
    pub overdue: usize,
}

pub fn summarize<'a, I>(progress: I) -> GoalSummary
where
    I: IntoIterator<Item = &'a GoalProgress>,
{
    progress
        .into_iter()
        .fold(GoalSummary::default(), |mut summary, p| {
            summary.total += 1;
            match p.status {
                GoalStatus::Completed => summary.completed += 1,
                GoalStatus::OnTrack => summary.on_track += 1,
                GoalStatus::Overdue => summary.overdue += 1,
                GoalStatus::InProgress | GoalStatus::Behind => {}
            }
            summary
        })
}
