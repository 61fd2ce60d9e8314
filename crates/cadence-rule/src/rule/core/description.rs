//! Structured recurrence settings, as edited in the scheduling dialogs.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::grammar::{DEFAULT_INTERVAL, Period, Weekday};

/// Anchor used to resolve a monthly series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MonthlyPattern {
    /// Same day of the month as the anchor (`BYMONTHDAY=17`).
    OnDateOfMonth,
    /// Same ordinal weekday as the anchor (`BYDAY=3MO`).
    #[default]
    OnWeekDayOfMonth,
    /// Last occurrence of the anchor's weekday (`BYDAY=-1MO`).
    OnLastWeekDayOfMonth,
}

/// Termination rule of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EndCondition {
    After { count: u32 },
    OnDate { date: NaiveDate },
    Never,
}

/// Structured form of a rule string.
///
/// `weekdays` is only meaningful for weekly series and `monthly_pattern`
/// only for monthly ones; both are carried regardless so that switching the
/// period in a form does not lose the user's selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceDescription {
    pub period: Period,
    #[serde(default = "default_interval")]
    pub interval: u32,
    #[serde(default)]
    pub weekdays: BTreeSet<Weekday>,
    #[serde(default)]
    pub monthly_pattern: MonthlyPattern,
    pub end_condition: EndCondition,
}

const fn default_interval() -> u32 {
    DEFAULT_INTERVAL
}

impl RecurrenceDescription {
    /// Creates a description for `period` repeating every period, forever.
    #[must_use]
    pub fn new(period: Period) -> Self {
        Self {
            period,
            interval: DEFAULT_INTERVAL,
            weekdays: BTreeSet::new(),
            monthly_pattern: MonthlyPattern::default(),
            end_condition: EndCondition::Never,
        }
    }

    #[must_use]
    pub fn daily() -> Self {
        Self::new(Period::Daily)
    }

    #[must_use]
    pub fn weekly(weekdays: impl IntoIterator<Item = Weekday>) -> Self {
        Self {
            weekdays: weekdays.into_iter().collect(),
            ..Self::new(Period::Weekly)
        }
    }

    #[must_use]
    pub fn monthly(pattern: MonthlyPattern) -> Self {
        Self {
            monthly_pattern: pattern,
            ..Self::new(Period::Monthly)
        }
    }

    #[must_use]
    pub fn yearly() -> Self {
        Self::new(Period::Yearly)
    }

    #[must_use]
    pub fn with_interval(mut self, interval: u32) -> Self {
        self.interval = interval;
        self
    }

    #[must_use]
    pub fn with_end(mut self, end_condition: EndCondition) -> Self {
        self.end_condition = end_condition;
        self
    }
}
