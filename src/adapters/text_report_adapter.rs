//! Plain-text journal summary implementing ReportPort.
//!
//! Sections are rendered as Markdown-style tables so the output reads fine in
//! a terminal and pastes cleanly into notes.

use std::fs;
use std::path::Path;

use crate::domain::breakdown::{GroupStats, by_pair, by_session, by_strategy, win_loss_split};
use crate::domain::compliance::MistakeChecklist;
use crate::domain::correlation::{
    compliance_summary, mood_distribution, psychology_correlation, recent_psychology_trend,
};
use crate::domain::error::JournalError;
use crate::domain::goal_progress::summarize;
use crate::domain::metrics::{Metrics, cumulative_pnl, daily_pnl};
use crate::domain::report::JournalReport;
use crate::domain::trade::Trade;
use crate::ports::report_port::ReportPort;

pub struct TextReportAdapter;

pub fn fmt_currency(value: f64) -> String {
    if value >= 0.0 {
        format!("${:.2}", value)
    } else {
        format!("-${:.2}", value.abs())
    }
}

fn render_metrics_table(m: &Metrics, starting_balance: f64) -> String {
    let mut output = String::from("## Performance\n\n");
    output.push_str("| Metric | Value |\n| --- | --- |\n");
    output.push_str(&format!("| Starting Balance | {} |\n", fmt_currency(starting_balance)));
    output.push_str(&format!("| Current Balance | {} |\n", fmt_currency(m.current_balance)));
    output.push_str(&format!("| Total P&L | {} |\n", fmt_currency(m.total_pnl)));
    output.push_str(&format!("| Total Trades | {} |\n", m.total_trades));
    output.push_str(&format!("| Winning Trades | {} |\n", m.winning_trades));
    output.push_str(&format!("| Losing Trades | {} |\n", m.losing_trades));
    output.push_str(&format!("| Win Rate | {:.1}% |\n", m.win_rate));
    output.push_str(&format!("| Profit Factor | {:.2} |\n", m.profit_factor));
    output.push_str(&format!("| Average Win | {} |\n", fmt_currency(m.average_win)));
    output.push_str(&format!("| Average Loss | {} |\n", fmt_currency(m.average_loss)));
    output.push_str(&format!("| Best Trade | {} |\n", fmt_currency(m.best_trade)));
    output.push_str(&format!("| Worst Trade | {} |\n", fmt_currency(m.worst_trade)));
    output.push_str(&format!("| Drawdown | {:.2}% |\n", m.drawdown));
    output.push('\n');
    output
}

fn render_equity(trades: &[Trade]) -> String {
    if trades.is_empty() {
        return String::new();
    }
    let split = win_loss_split(trades);
    let mut output = String::from("## Equity\n\n");
    output.push_str(&format!(
        "{} wins / {} losses or breakeven\n\n",
        split.wins, split.losses
    ));
    output.push_str("| # | Date | P&L | Cumulative |\n| --- | --- | --- | --- |\n");
    for point in cumulative_pnl(trades) {
        output.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            point.trade_number,
            point.date.format("%Y-%m-%d"),
            fmt_currency(point.pnl),
            fmt_currency(point.cumulative)
        ));
    }
    output.push('\n');

    output.push_str("| Day | P&L |\n| --- | --- |\n");
    for day in daily_pnl(trades) {
        output.push_str(&format!(
            "| {} | {} |\n",
            day.date.format("%Y-%m-%d"),
            fmt_currency(day.pnl)
        ));
    }
    output.push('\n');
    output
}

fn render_breakdown<K: std::fmt::Display>(title: &str, groups: &[GroupStats<K>]) -> String {
    if groups.is_empty() {
        return String::new();
    }
    let mut output = format!("## By {title}\n\n");
    output.push_str(&format!("| {title} | Trades | Wins | Losses | Win Rate | P&L |\n"));
    output.push_str("| --- | --- | --- | --- | --- | --- |\n");
    for g in groups {
        output.push_str(&format!(
            "| {} | {} | {} | {} | {:.1}% | {} |\n",
            g.key,
            g.trades,
            g.wins,
            g.losses,
            g.win_rate(),
            fmt_currency(g.pnl)
        ));
    }
    output.push('\n');
    output
}

fn render_psychology(trades: &[Trade]) -> String {
    let Some(c) = psychology_correlation(trades) else {
        return String::new();
    };
    let mut output = String::from("## Psychology\n\n");
    output.push_str("| State | Trades | Avg P&L |\n| --- | --- | --- |\n");
    for (label, bucket) in [
        ("High confidence (7+)", c.high_confidence),
        ("Low confidence (4-)", c.low_confidence),
        ("Low stress (4-)", c.low_stress),
        ("High stress (7+)", c.high_stress),
        ("Good sleep", c.good_sleep),
        ("Poor sleep", c.poor_sleep),
    ] {
        output.push_str(&format!(
            "| {} | {} | {} |\n",
            label,
            bucket.count,
            fmt_currency(bucket.average_pnl)
        ));
    }
    output.push('\n');

    output.push_str("| Mood | Trades | Avg P&L | Win Rate |\n| --- | --- | --- | --- |\n");
    for m in mood_distribution(trades) {
        output.push_str(&format!(
            "| {} | {} | {} | {:.1}% |\n",
            m.mood.as_str(),
            m.count,
            fmt_currency(m.average_pnl),
            m.win_rate
        ));
    }
    output.push('\n');
    output
}

fn render_recent_psychology(trades: &[Trade]) -> String {
    let trend = recent_psychology_trend(trades);
    if trend.is_empty() {
        return String::new();
    }
    let mut output = String::from("## Recent Psychology\n\n");
    output.push_str("| # | Confidence | Stress | Life Stress | P&L |\n");
    output.push_str("| --- | --- | --- | --- | --- |\n");
    for point in trend {
        output.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            point.trade_number,
            point.confidence,
            point.stress,
            point.life_stress,
            fmt_currency(point.pnl)
        ));
    }
    output.push('\n');
    output
}

fn render_compliance(trades: &[Trade]) -> String {
    let Some(summary) = compliance_summary(trades) else {
        return String::new();
    };
    let mut output = String::from("## Rule Compliance\n\n");
    output.push_str(&format!(
        "Average compliance {:.1}% over {} assessed trades\n\n",
        summary.average_score * 100.0,
        summary.assessed_trades
    ));
    let mistakes: Vec<(&str, usize)> = MistakeChecklist::LABELS
        .iter()
        .copied()
        .zip(summary.mistake_frequency)
        .filter(|&(_, n)| n > 0)
        .collect();
    if !mistakes.is_empty() {
        output.push_str("| Mistake | Count |\n| --- | --- |\n");
        for (label, n) in mistakes {
            output.push_str(&format!("| {label} | {n} |\n"));
        }
        output.push('\n');
    }
    output
}

fn render_insights(report: &JournalReport<'_>) -> String {
    let mut output = String::from("## Insights\n\n");
    if report.insights.is_empty() {
        output.push_str("_Not enough data yet._\n\n");
        return output;
    }
    for insight in &report.insights {
        output.push_str(&format!(
            "- [{}] {}: {}\n",
            insight.severity().as_str(),
            insight.title(),
            insight
        ));
    }
    output.push('\n');
    output
}

fn render_goals(report: &JournalReport<'_>) -> String {
    let mut output = String::from("## Goals\n\n");
    if report.goals.is_empty() {
        output.push_str("_No goals set._\n\n");
        return output;
    }
    let summary = summarize(report.goals.iter().map(|(_, p)| p));
    output.push_str(&format!(
        "{} goals: {} completed, {} on track, {} overdue\n\n",
        summary.total, summary.completed, summary.on_track, summary.overdue
    ));
    output.push_str("| Goal | Current | Target | Progress | Deadline | Status |\n");
    output.push_str("| --- | --- | --- | --- | --- | --- |\n");
    for (goal, progress) in &report.goals {
        output.push_str(&format!(
            "| {} | {:.2} | {:.2} | {:.0}% | {} | {} |\n",
            goal.details.title,
            progress.current_value,
            goal.details.target_value,
            progress.progress_percent,
            goal.details.deadline.format("%Y-%m-%d"),
            progress.status.label()
        ));
    }
    output.push('\n');
    output
}

impl TextReportAdapter {
    pub fn render(report: &JournalReport<'_>) -> String {
        let mut output = format!(
            "# Trading Journal\n\nGenerated {}\n\n",
            report.generated_on.format("%Y-%m-%d")
        );
        output.push_str(&render_metrics_table(&report.metrics, report.starting_balance));
        output.push_str(&render_equity(report.trades));
        output.push_str(&render_breakdown("Strategy", &by_strategy(report.trades)));
        output.push_str(&render_breakdown("Pair", &by_pair(report.trades)));
        output.push_str(&render_breakdown("Session", &by_session(report.trades)));
        output.push_str(&render_psychology(report.trades));
        output.push_str(&render_recent_psychology(report.trades));
        output.push_str(&render_compliance(report.trades));
        output.push_str(&render_insights(report));
        output.push_str(&render_goals(report));
        output
    }
}

impl ReportPort for TextReportAdapter {
    fn write(&self, report: &JournalReport<'_>, output_path: &str) -> Result<(), JournalError> {
        let path = Path::new(output_path);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, Self::render(report))?;
        Ok(())
    }
}
