//! Editable recurrence form state.
//!
//! Typed stand-in for the scheduling dialog's form store: it keeps every
//! field the user can touch (including values of inactive options, so that
//! flipping between "after N events" and "on date" does not lose input) and
//! converts to and from rule strings.

use std::collections::BTreeSet;

use cadence_core::constants::DEFAULT_END_COUNT;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{RuleError, RuleResult};
use crate::rule::{
    EndCondition, MonthlyPattern, Period, RecurrenceDescription, RuleParser, Weekday, build_rule,
};


/// Which end condition option is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EndKind {
    #[default]
    After,
    OnDate,
    Never,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceForm {
    anchor: NaiveDate,
    parser: RuleParser,
    period: Period,
    interval: u32,
    weekdays: BTreeSet<Weekday>,
    monthly_pattern: MonthlyPattern,
    end_kind: EndKind,
    count: u32,
    until: NaiveDate,
}

impl RecurrenceForm {
    /// Creates a form with the dialog defaults for a series starting on `anchor`.
    #[must_use]
    pub fn new(anchor: NaiveDate) -> Self {
        Self::with_parser(anchor, RuleParser::default())
    }

    #[must_use]
    pub fn with_parser(anchor: NaiveDate, parser: RuleParser) -> Self {
        Self {
            anchor,
            parser,
            period: Period::Weekly,
            interval: 1,
            weekdays: BTreeSet::from([Weekday::from(anchor.weekday())]),
            monthly_pattern: MonthlyPattern::default(),
            end_kind: EndKind::After,
            count: DEFAULT_END_COUNT,
            until: anchor,
        }
    }

    /// Restores the defaults, keeping the anchor date and parser.
    pub fn reset(&mut self) {
        *self = Self::with_parser(self.anchor, self.parser);
    }

    /// ## Summary
    /// Resets the form and fills it from a stored rule string.
    ///
    /// Returns `false` (leaving the defaults in place) when the appointment
    /// has no recurrence.
    pub fn load(&mut self, rule: Option<&str>) -> bool {
        self.reset();
        let Some(description) = self.parser.parse(rule) else {
            return false;
        };

        self.period = description.period;
        self.interval = description.interval;
        if !description.weekdays.is_empty() {
            self.weekdays = description.weekdays;
        }
        self.monthly_pattern = description.monthly_pattern;
        match description.end_condition {
            EndCondition::After { count } => {
                self.end_kind = EndKind::After;
                self.count = count;
            }
            EndCondition::OnDate { date } => {
                self.end_kind = EndKind::OnDate;
                self.until = date;
            }
            EndCondition::Never => self.end_kind = EndKind::Never,
        }

        tracing::trace!(form = ?self, "Loaded recurrence form");
        true
    }

    #[must_use]
    pub const fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    #[must_use]
    pub const fn period(&self) -> Period {
        self.period
    }

    #[must_use]
    pub const fn interval(&self) -> u32 {
        self.interval
    }

    #[must_use]
    pub const fn weekdays(&self) -> &BTreeSet<Weekday> {
        &self.weekdays
    }

    #[must_use]
    pub const fn monthly_pattern(&self) -> MonthlyPattern {
        self.monthly_pattern
    }

    #[must_use]
    pub const fn end_kind(&self) -> EndKind {
        self.end_kind
    }

    #[must_use]
    pub const fn count(&self) -> u32 {
        self.count
    }

    #[must_use]
    pub const fn until(&self) -> NaiveDate {
        self.until
    }

    /// Moves the series start; a selected until date before it is pulled forward.
    pub fn set_anchor(&mut self, anchor: NaiveDate) {
        self.anchor = anchor;
        if self.until < anchor {
            self.until = anchor;
        }
    }

    pub fn set_period(&mut self, period: Period) {
        self.period = period;
    }

    /// ## Summary
    /// Sets the period from a `FREQ` code such as `"MONTHLY"`.
    ///
    /// ## Errors
    /// Returns `RuleError::UnsupportedPeriod` for any other code.
    pub fn set_period_code(&mut self, code: &str) -> RuleResult<()> {
        self.period = code.parse()?;
        Ok(())
    }

    /// ## Errors
    /// Returns `RuleError::InvalidInterval` for 0.
    pub fn set_interval(&mut self, interval: u32) -> RuleResult<()> {
        if interval == 0 {
            return Err(RuleError::InvalidInterval(interval));
        }
        self.interval = interval;
        Ok(())
    }

    /// Flips a weekday checkbox and returns whether it is now selected.
    pub fn toggle_weekday(&mut self, weekday: Weekday) -> bool {
        if self.weekdays.remove(&weekday) {
            false
        } else {
            self.weekdays.insert(weekday);
            true
        }
    }

    pub fn set_monthly_pattern(&mut self, pattern: MonthlyPattern) {
        self.monthly_pattern = pattern;
    }

    pub fn set_end_kind(&mut self, end_kind: EndKind) {
        self.end_kind = end_kind;
    }

    /// ## Errors
    /// Returns `RuleError::InvalidCount` for 0.
    pub fn set_count(&mut self, count: u32) -> RuleResult<()> {
        if count == 0 {
            return Err(RuleError::InvalidCount(count));
        }
        self.count = count;
        Ok(())
    }

    /// ## Errors
    /// Returns `RuleError::InvalidDate` for a date before the anchor.
    pub fn set_until(&mut self, until: NaiveDate) -> RuleResult<()> {
        if until < self.anchor {
            return Err(RuleError::InvalidDate(format!(
                "end date {until} is before the first occurrence {}",
                self.anchor
            )));
        }
        self.until = until;
        Ok(())
    }

    /// ## Summary
    /// Returns the structured recurrence the form currently describes.
    ///
    /// A weekly form with every weekday unticked falls back to the anchor's weekday.
    #[must_use]
    pub fn description(&self) -> RecurrenceDescription {
        let weekdays = if self.period == Period::Weekly && self.weekdays.is_empty() {
            BTreeSet::from([Weekday::from(self.anchor.weekday())])
        } else {
            self.weekdays.clone()
        };
        let end_condition = match self.end_kind {
            EndKind::After => EndCondition::After { count: self.count },
            EndKind::OnDate => EndCondition::OnDate { date: self.until },
            EndKind::Never => EndCondition::Never,
        };

        RecurrenceDescription {
            period: self.period,
            interval: self.interval,
            weekdays,
            monthly_pattern: self.monthly_pattern,
            end_condition,
        }
    }

    /// ## Summary
    /// Builds the rule string to store on the series.
    ///
    /// ## Errors
    /// Returns any error of [`build_rule`].
    pub fn rule(&self) -> RuleResult<String> {
        build_rule(&self.description(), self.anchor)
    }
}
