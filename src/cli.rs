//! CLI definition and dispatch.

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use uuid::Uuid;

use crate::adapters::csv_adapter::CsvExportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::file_storage_adapter::FileStorageAdapter;
use crate::adapters::text_report_adapter::{TextReportAdapter, fmt_currency};
use crate::domain::config::{JournalConfig, StorageBackend, StorageConfig};
use crate::domain::config_validation::validate_journal_config;
use crate::domain::error::JournalError;
use crate::domain::goal::{GOAL_TEMPLATES, GoalCategory, GoalDraft, GoalPriority, GoalUnit};
use crate::domain::goal_progress::summarize;
use crate::domain::history::{HistoryFilter, HistorySort, query_trades};
use crate::domain::report::JournalReport;
use crate::domain::store::JournalStore;
use crate::domain::trade::TradeDraft;
use crate::ports::config_port::ConfigPort;
use crate::ports::report_port::ReportPort;
use crate::ports::storage_port::StoragePort;

#[derive(Parser, Debug)]
#[command(name = "fxjournal", about = "Personal FX trading journal")]
pub struct Cli {
    /// Journal configuration (INI)
    #[arg(short, long, global = true, default_value = "fxjournal.ini")]
    pub config: PathBuf,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print performance metrics, breakdowns, insights and goals
    Summary,
    /// List trades
    Trades {
        /// Case-insensitive match on pair or strategy
        #[arg(long, default_value = "")]
        search: String,
        /// all, winners or losers
        #[arg(long, default_value = "all", value_parser = parse_filter)]
        filter: HistoryFilter,
        /// date (newest first), pnl (highest first) or pair
        #[arg(long, default_value = "date", value_parser = parse_sort)]
        sort: HistorySort,
    },
    /// Record a trade from a JSON draft
    AddTrade {
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Delete a trade and back its pnl out of the balance
    DeleteTrade {
        #[arg(long)]
        id: Uuid,
    },
    /// Show goal progress
    Goals,
    /// List the built-in goal templates
    Templates,
    /// Add a goal, either from scratch or from a template
    AddGoal {
        /// Template number as listed by `templates`
        #[arg(long, conflicts_with_all = ["title", "target"], value_parser = clap::value_parser!(u8).range(1..=5))]
        template: Option<u8>,
        #[arg(long, required_unless_present = "template")]
        title: Option<String>,
        #[arg(long, required_unless_present = "template")]
        target: Option<f64>,
        /// YYYY-MM-DD
        #[arg(long)]
        deadline: NaiveDate,
        #[arg(long)]
        current: Option<f64>,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, value_parser = parse_lowercase::<GoalUnit>)]
        unit: Option<GoalUnit>,
        #[arg(long, value_parser = parse_lowercase::<GoalCategory>)]
        category: Option<GoalCategory>,
        #[arg(long, default_value = "medium", value_parser = parse_lowercase::<GoalPriority>)]
        priority: GoalPriority,
    },
    /// Delete a goal
    DeleteGoal {
        #[arg(long)]
        id: Uuid,
    },
    /// Write the trade history (csv) or the summary (text) to a file
    Export {
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
    },
    /// Reset the running balance to starting balance plus total pnl
    Reconcile,
    /// Validate the configuration file
    Validate,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    /// One row per trade
    Csv,
    /// The summary report
    #[value(aliases = ["txt", "md"])]
    Text,
}

fn parse_filter(s: &str) -> Result<HistoryFilter, String> {
    HistoryFilter::from_label(s).ok_or_else(|| format!("unknown filter '{s}'"))
}

fn parse_sort(s: &str) -> Result<HistorySort, String> {
    HistorySort::from_label(s).ok_or_else(|| format!("unknown sort '{s}'"))
}

/// Parse a lowercase-serialized domain enum from its label.
fn parse_lowercase<T: DeserializeOwned>(s: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(s.trim().to_lowercase()))
        .map_err(|_| format!("unknown value '{s}'"))
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Validate => run_validate(&cli.config),
        Command::Templates => {
            print_templates();
            Ok(())
        }
        command => with_store(&cli.config, |store| dispatch(command, store)),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn dispatch<S: StoragePort>(command: Command, store: &mut JournalStore<S>) -> Result<(), JournalError> {
    let today = Local::now().date_naive();
    match command {
        Command::Summary => {
            print!("{}", TextReportAdapter::render(&JournalReport::from_store(store, today)));
            Ok(())
        }
        Command::Trades {
            search,
            filter,
            sort,
        } => {
            print_trades(store, &search, filter, sort);
            Ok(())
        }
        Command::AddTrade { file } => {
            let draft = read_trade_draft(&file)?;
            let id = store.add_trade(draft)?;
            println!("{id}");
            eprintln!("Balance: {}", fmt_currency(store.account_balance()));
            Ok(())
        }
        Command::DeleteTrade { id } => {
            if store.delete_trade(id)? {
                eprintln!("Deleted trade {id}");
                eprintln!("Balance: {}", fmt_currency(store.account_balance()));
            } else {
                eprintln!("No trade with id {id}");
            }
            Ok(())
        }
        Command::Goals => {
            print_goals(store, today);
            Ok(())
        }
        Command::AddGoal {
            template,
            title,
            target,
            deadline,
            current,
            description,
            unit,
            category,
            priority,
        } => {
            let mut draft = match template {
                Some(n) => {
                    let template = usize::from(n)
                        .checked_sub(1)
                        .and_then(|i| GOAL_TEMPLATES.get(i).copied())
                        .ok_or_else(|| JournalError::InvalidInput {
                            reason: format!("no goal template {n}"),
                        })?;
                    template.to_draft(deadline)
                }
                None => GoalDraft::new(
                    title.unwrap_or_default(),
                    target.unwrap_or_default(),
                    deadline,
                ),
            };
            draft.description = description;
            draft.current_value = current;
            draft.priority = priority;
            if let Some(unit) = unit {
                draft.unit = unit;
            }
            if let Some(category) = category {
                draft.category = category;
            }
            let id = store.add_goal(draft)?;
            println!("{id}");
            Ok(())
        }
        Command::DeleteGoal { id } => {
            if store.delete_goal(id)? {
                eprintln!("Deleted goal {id}");
            } else {
                eprintln!("No goal with id {id}");
            }
            Ok(())
        }
        Command::Export { output, format } => {
            let report = JournalReport::from_store(store, today);
            let path = output.to_string_lossy();
            match format {
                ExportFormat::Csv => CsvExportAdapter.write(&report, &path)?,
                ExportFormat::Text => TextReportAdapter.write(&report, &path)?,
            }
            eprintln!("Wrote {}", output.display());
            Ok(())
        }
        Command::Reconcile => {
            let drift = store.balance_discrepancy();
            let balance = store.reconcile_balance()?;
            eprintln!("Adjusted by {}", fmt_currency(-drift));
            println!("{}", fmt_currency(balance));
            Ok(())
        }
        Command::Validate | Command::Templates => Ok(()),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, JournalError> {
    FileConfigAdapter::from_file(path)
}

pub fn build_journal_config(adapter: &dyn ConfigPort) -> Result<JournalConfig, JournalError> {
    let backend = match adapter.get_string("storage", "backend") {
        Some(label) => StorageBackend::from_label(&label).ok_or_else(|| JournalError::ConfigInvalid {
            section: "storage".into(),
            key: "backend".into(),
            reason: format!("unknown backend '{}'", label.trim()),
        })?,
        None => StorageBackend::default(),
    };
    let mut config = JournalConfig::new(adapter.require_string("storage", "path")?);
    config.storage.backend = backend;
    config.starting_balance = adapter.get_double("journal", "starting_balance", config.starting_balance);
    Ok(config)
}

/// Storage adapter for the configured backend.
pub fn open_storage(config: &StorageConfig) -> Result<Box<dyn StoragePort>, JournalError> {
    match config.backend {
        StorageBackend::File => Ok(Box::new(FileStorageAdapter::new(&config.path)?)),
        #[cfg(feature = "sqlite")]
        StorageBackend::Sqlite => Ok(Box::new(
            crate::adapters::sqlite_adapter::SqliteStorageAdapter::open(&config.path)?,
        )),
        #[cfg(not(feature = "sqlite"))]
        StorageBackend::Sqlite => Err(JournalError::ConfigInvalid {
            section: "storage".into(),
            key: "backend".into(),
            reason: "sqlite backend not compiled in (enable the 'sqlite' feature)".into(),
        }),
    }
}

pub fn open_store(config: &JournalConfig) -> Result<JournalStore<Box<dyn StoragePort>>, JournalError> {
    let storage = open_storage(&config.storage)?;
    Ok(JournalStore::open(storage, config.starting_balance))
}

fn with_store<F>(config_path: &Path, f: F) -> Result<(), JournalError>
where
    F: FnOnce(&mut JournalStore<Box<dyn StoragePort>>) -> Result<(), JournalError>,
{
    let adapter = load_config(config_path)?;
    validate_journal_config(&adapter)?;
    let config = build_journal_config(&adapter)?;
    let mut store = open_store(&config)?;
    f(&mut store)
}

fn run_validate(config_path: &Path) -> Result<(), JournalError> {
    eprintln!("Validating {}", config_path.display());
    let adapter = load_config(config_path)?;
    validate_journal_config(&adapter)?;
    let config = build_journal_config(&adapter)?;
    println!("Starting balance: {}", fmt_currency(config.starting_balance));
    println!(
        "Storage:          {} at {}",
        config.storage.backend.as_str(),
        config.storage.path.display()
    );
    println!("Configuration is valid.");
    Ok(())
}

pub fn read_trade_draft(path: &Path) -> Result<TradeDraft, JournalError> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| JournalError::Serialization {
        key: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn print_trades<S: StoragePort>(
    store: &JournalStore<S>,
    search: &str,
    filter: HistoryFilter,
    sort: HistorySort,
) {
    let trades = query_trades(store.trades(), search, filter, sort);
    if trades.is_empty() {
        eprintln!("No trades match.");
        return;
    }
    println!(
        "{:<36}  {:<10} {:<5}  {:<7}  {:<5}  {:>12}  {:<18}  {}",
        "ID", "DATE", "TIME", "PAIR", "DIR", "P&L", "STRATEGY", "SESSION"
    );
    for t in trades {
        let d = &t.details;
        println!(
            "{:<36}  {:<10} {:<5}  {:<7}  {:<5}  {:>12}  {:<18}  {}",
            t.id.to_string(),
            d.date.format("%Y-%m-%d"),
            d.time.format("%H:%M"),
            d.currency_pair,
            d.direction,
            fmt_currency(d.pnl),
            d.strategy,
            d.session
        );
    }
}

fn print_goals<S: StoragePort>(store: &JournalStore<S>, today: NaiveDate) {
    let progress = store.goal_progress(today);
    if progress.is_empty() {
        eprintln!("No goals set.");
        return;
    }
    let summary = summarize(progress.iter().map(|(_, p)| p));
    println!(
        "{} goals: {} completed, {} on track, {} overdue",
        summary.total, summary.completed, summary.on_track, summary.overdue
    );
    for (goal, p) in &progress {
        println!(
            "{}  {:<32} {:>10.2} / {:<10.2} {:>5.0}%  due {}  [{}]",
            goal.id,
            goal.details.title,
            p.current_value,
            goal.details.target_value,
            p.progress_percent,
            goal.details.deadline.format("%Y-%m-%d"),
            p.status.label()
        );
    }
}

fn print_templates() {
    for (i, t) in GOAL_TEMPLATES.iter().enumerate() {
        println!("{}. {} (target {})", i + 1, t.title, t.target_value);
    }
}
