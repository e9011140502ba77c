//! Journal trade records.
//!
//! A [`Trade`] is only ever created whole by the store from a [`TradeDraft`];
//! later edits go through [`TradePatch`], which cannot touch the id or the
//! creation timestamp.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::compliance::ComplianceAssessment;
use super::numeric::{lenient_f64, lenient_opt_f64, lenient_rating, lenient_u32};
use super::psychology::PsychologyAssessment;

macro_rules! labelled_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            pub fn from_label(label: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|v| v.as_str().eq_ignore_ascii_case(label.trim()))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.pad(self.as_str())
            }
        }
    };
}

labelled_enum!(CurrencyPair {
    EurUsd => "EUR/USD",
    GbpUsd => "GBP/USD",
    UsdJpy => "USD/JPY",
    AudUsd => "AUD/USD",
    UsdCad => "USD/CAD",
    UsdChf => "USD/CHF",
    NzdUsd => "NZD/USD",
    EurGbp => "EUR/GBP",
    EurJpy => "EUR/JPY",
    GbpJpy => "GBP/JPY",
});

labelled_enum!(Direction {
    Long => "Long",
    Short => "Short",
});

labelled_enum!(Session {
    London => "London",
    NewYork => "New York",
    Asian => "Asian",
    Sydney => "Sydney",
    LondonNyOverlap => "London/NY Overlap",
});

labelled_enum!(TradingStrategy {
    TrendFollowing => "Trend Following",
    SupportResistance => "Support/Resistance",
    Breakout => "Breakout",
    Reversal => "Reversal",
    NewsTrading => "News Trading",
    Scalping => "Scalping",
});

labelled_enum!(Timeframe {
    M15 => "15m",
    H1 => "1H",
    H4 => "4H",
    Daily => "Daily",
});

labelled_enum!(MarketCondition {
    Trending => "Trending",
    Ranging => "Ranging",
    Volatile => "Volatile",
    Quiet => "Quiet",
});

labelled_enum!(
    /// Technical conditions a trader can cite in support of an entry.
    ConfluenceFactor {
        SupportResistanceLevel => "Support/Resistance level",
        MovingAverageConfluence => "Moving average confluence",
        TrendLineIntersection => "Trend line intersection",
        FibonacciLevel => "Fibonacci level",
        ChartPattern => "Chart pattern",
        DivergenceSignal => "Divergence signal",
        VolumeConfirmation => "Volume confirmation",
    }
);

mod clock_time {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(time: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveTime::parse_from_str(&raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
            .map_err(D::Error::custom)
    }
}

/// Everything the capture flow collects for a new trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeDraft {
    pub date: NaiveDate,
    #[serde(with = "clock_time")]
    pub time: NaiveTime,
    pub currency_pair: CurrencyPair,
    pub direction: Direction,
    #[serde(deserialize_with = "lenient_f64")]
    pub entry_price: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub exit_price: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub position_size: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub pip_movement: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub pnl: f64,
    #[serde(deserialize_with = "lenient_u32")]
    pub duration: u32,
    pub session: Session,
    pub strategy: TradingStrategy,
    pub timeframe: Timeframe,
    pub market_condition: MarketCondition,
    #[serde(deserialize_with = "lenient_rating")]
    pub setup_rating: u8,
    #[serde(default)]
    pub confluence_factors: Vec<ConfluenceFactor>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub planned_entry: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub planned_stop: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub planned_target: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub planned_risk: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub actual_stop: Option<f64>,
    #[serde(default)]
    pub setup_reason: String,
    #[serde(default)]
    pub psychology: Option<PsychologyAssessment>,
    #[serde(default)]
    pub compliance: Option<ComplianceAssessment>,
}

impl TradeDraft {
    /// A draft with the capture form's defaults for the given pair and pnl.
    pub fn new(date: NaiveDate, time: NaiveTime, currency_pair: CurrencyPair, pnl: f64) -> Self {
        Self {
            date,
            time,
            currency_pair,
            direction: Direction::Long,
            entry_price: 0.0,
            exit_price: 0.0,
            position_size: 0.0,
            pip_movement: 0.0,
            pnl,
            duration: 0,
            session: Session::London,
            strategy: TradingStrategy::TrendFollowing,
            timeframe: Timeframe::H1,
            market_condition: MarketCondition::Trending,
            setup_rating: 3,
            confluence_factors: Vec::new(),
            planned_entry: None,
            planned_stop: None,
            planned_target: None,
            planned_risk: None,
            actual_stop: None,
            setup_reason: String::new(),
            psychology: None,
            compliance: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub details: TradeDraft,
}

impl Trade {
    /// Profit or loss in account currency. Malformed values were coerced to zero on entry.
    pub fn pnl(&self) -> f64 {
        self.details.pnl
    }

    pub fn is_winner(&self) -> bool {
        self.details.pnl > 0.0
    }

    pub fn is_loser(&self) -> bool {
        self.details.pnl < 0.0
    }

    pub fn psychology(&self) -> Option<&PsychologyAssessment> {
        self.details.psychology.as_ref()
    }

    pub fn compliance(&self) -> Option<&ComplianceAssessment> {
        self.details.compliance.as_ref()
    }
}

/// Shallow edit of a stored trade: every `Some` field replaces the stored value.
///
/// Optional trade fields use a nested `Option`, where `Some(None)` clears them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradePatch {
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub currency_pair: Option<CurrencyPair>,
    pub direction: Option<Direction>,
    pub entry_price: Option<f64>,
    pub exit_price: Option<f64>,
    pub position_size: Option<f64>,
    pub pip_movement: Option<f64>,
    pub pnl: Option<f64>,
    pub duration: Option<u32>,
    pub session: Option<Session>,
    pub strategy: Option<TradingStrategy>,
    pub timeframe: Option<Timeframe>,
    pub market_condition: Option<MarketCondition>,
    pub setup_rating: Option<u8>,
    pub confluence_factors: Option<Vec<ConfluenceFactor>>,
    pub planned_entry: Option<Option<f64>>,
    pub planned_stop: Option<Option<f64>>,
    pub planned_target: Option<Option<f64>>,
    pub planned_risk: Option<Option<f64>>,
    pub actual_stop: Option<Option<f64>>,
    pub setup_reason: Option<String>,
    pub psychology: Option<Option<PsychologyAssessment>>,
    pub compliance: Option<Option<ComplianceAssessment>>,
}

impl TradePatch {
    pub fn is_empty(&self) -> bool {
        *self == TradePatch::default()
    }

    /// Merge into `draft`, leaving unspecified fields unchanged.
    pub fn apply(self, draft: &mut TradeDraft) {
        fn set<T>(slot: &mut T, value: Option<T>) {
            if let Some(v) = value {
                *slot = v;
            }
        }

        set(&mut draft.date, self.date);
        set(&mut draft.time, self.time);
        set(&mut draft.currency_pair, self.currency_pair);
        set(&mut draft.direction, self.direction);
        set(&mut draft.entry_price, self.entry_price);
        set(&mut draft.exit_price, self.exit_price);
        set(&mut draft.position_size, self.position_size);
        set(&mut draft.pip_movement, self.pip_movement);
        set(&mut draft.pnl, self.pnl);
        set(&mut draft.duration, self.duration);
        set(&mut draft.session, self.session);
        set(&mut draft.strategy, self.strategy);
        set(&mut draft.timeframe, self.timeframe);
        set(&mut draft.market_condition, self.market_condition);
        set(&mut draft.setup_rating, self.setup_rating);
        set(&mut draft.confluence_factors, self.confluence_factors);
        set(&mut draft.planned_entry, self.planned_entry);
        set(&mut draft.planned_stop, self.planned_stop);
        set(&mut draft.planned_target, self.planned_target);
        set(&mut draft.planned_risk, self.planned_risk);
        set(&mut draft.actual_stop, self.actual_stop);
        set(&mut draft.setup_reason, self.setup_reason);
        set(&mut draft.psychology, self.psychology);
        set(&mut draft.compliance, self.compliance);
    }
}
