//! Tolerant rule string parsing.
//!
//! Rule strings come from the builder or from migrated legacy data, so the
//! parser never fails: anything missing or malformed falls back to a
//! documented default and the result is always renderable by a form.

use std::collections::{BTreeSet, HashMap};

use cadence_core::config::{DefaultEnd, RecurrenceConfig};
use cadence_core::constants::DEFAULT_END_COUNT;
use chrono::NaiveDate;

use super::core::{
    DEFAULT_INTERVAL, EndCondition, MonthlyPattern, Period, RecurrenceDescription, RuleKey,
    Weekday,
};

/// Recognized `KEY=VALUE` pairs of a rule string.
///
/// Keys match case-insensitively and a repeated key keeps its last value.
/// Tokens without `=` and unrecognized keys are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleTokens {
    values: HashMap<RuleKey, String>,
}

impl RuleTokens {
    #[must_use]
    pub fn parse(rule: &str) -> Self {
        let mut values = HashMap::new();

        for token in rule.split(';').map(str::trim).filter(|t| !t.is_empty()) {
            let Some((key, value)) = token.split_once('=') else {
                tracing::trace!(token, "Ignoring rule token without '='");
                continue;
            };
            let Some(key) = RuleKey::parse(key.trim()) else {
                tracing::trace!(key, "Ignoring unrecognized rule key");
                continue;
            };
            values.insert(key, value.trim().to_string());
        }

        Self { values }
    }

    #[must_use]
    pub fn get(&self, key: RuleKey) -> Option<&str> {
        self.values.get(&key).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, key: RuleKey) -> bool {
        self.values.contains_key(&key)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// First ordinal-prefixed `BYDAY` entry (`3TU`, `-1WE`), if any.
    ///
    /// Its presence marks `BYDAY` as a monthly anchor rather than a weekday set.
    #[must_use]
    pub fn ordinal_by_day(&self) -> Option<&str> {
        self.get(RuleKey::ByDay)?
            .split(',')
            .map(str::trim)
            .find(|entry| has_ordinal_prefix(entry))
    }

    /// First `BYDAY` entry with a `-1` ordinal (`-1FR`), if any.
    ///
    /// Only the prefix is checked, so `-1XX` counts and `-10MO` does not.
    #[must_use]
    pub fn last_by_day(&self) -> Option<&str> {
        self.get(RuleKey::ByDay)?
            .split(',')
            .map(str::trim)
            .find(|entry| has_last_ordinal(entry))
    }
}

fn has_ordinal_prefix(entry: &str) -> bool {
    entry.starts_with(|c: char| c == '+' || c == '-' || c.is_ascii_digit())
}

fn has_last_ordinal(entry: &str) -> bool {
    entry
        .strip_prefix("-1")
        .is_some_and(|rest| !rest.starts_with(|c: char| c.is_ascii_digit()))
}

/// Values substituted for keys a rule string does not carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserDefaults {
    /// Used when `FREQ` is absent or unrecognized.
    pub period: Period,
    /// Used when neither `COUNT` nor `UNTIL` yields a value.
    pub end_condition: EndCondition,
}

impl Default for ParserDefaults {
    fn default() -> Self {
        Self {
            period: Period::Weekly,
            end_condition: EndCondition::After {
                count: DEFAULT_END_COUNT,
            },
        }
    }
}

impl From<&RecurrenceConfig> for ParserDefaults {
    fn from(config: &RecurrenceConfig) -> Self {
        let end_condition = match config.default_end {
            DefaultEnd::After => EndCondition::After {
                count: config.default_count,
            },
            DefaultEnd::Never => EndCondition::Never,
        };
        Self {
            end_condition,
            ..Self::default()
        }
    }
}

/// Turns rule strings back into editable recurrence descriptions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuleParser {
    pub defaults: ParserDefaults,
}

impl RuleParser {
    #[must_use]
    pub const fn new(defaults: ParserDefaults) -> Self {
        Self { defaults }
    }

    /// ## Summary
    /// Parses a rule string into a recurrence description.
    ///
    /// Returns `None` for missing input and for strings made only of
    /// whitespace and separators, i.e. an appointment without recurrence.
    #[must_use]
    pub fn parse(&self, rule: Option<&str>) -> Option<RecurrenceDescription> {
        let rule = rule?;
        if rule.split(';').all(|t| t.trim().is_empty()) {
            return None;
        }
        Some(self.parse_tokens(&RuleTokens::parse(rule)))
    }

    /// Builds a description from already split tokens.
    #[must_use]
    pub fn parse_tokens(&self, tokens: &RuleTokens) -> RecurrenceDescription {
        RecurrenceDescription {
            period: self.period(tokens),
            interval: interval(tokens),
            weekdays: weekdays(tokens),
            monthly_pattern: monthly_pattern(tokens),
            end_condition: self.end_condition(tokens),
        }
    }

    fn period(&self, tokens: &RuleTokens) -> Period {
        match tokens.get(RuleKey::Freq) {
            Some(value) => Period::parse(value).unwrap_or_else(|| {
                tracing::trace!(value, "Unrecognized FREQ, using default period");
                self.defaults.period
            }),
            None => self.defaults.period,
        }
    }

    fn end_condition(&self, tokens: &RuleTokens) -> EndCondition {
        if let Some(value) = tokens.get(RuleKey::Count) {
            match value.parse::<u32>() {
                Ok(count) if count > 0 => return EndCondition::After { count },
                _ => tracing::trace!(value, "Invalid COUNT, ignoring"),
            }
        }
        if let Some(value) = tokens.get(RuleKey::Until) {
            match parse_until_date(value) {
                Some(date) => return EndCondition::OnDate { date },
                None => tracing::trace!(value, "Invalid UNTIL, ignoring"),
            }
        }
        self.defaults.end_condition
    }
}

/// ## Summary
/// Parses a rule string with the default parser settings.
///
/// See [`RuleParser::parse`].
#[must_use]
pub fn parse_rule(rule: Option<&str>) -> Option<RecurrenceDescription> {
    RuleParser::default().parse(rule)
}

fn interval(tokens: &RuleTokens) -> u32 {
    let Some(value) = tokens.get(RuleKey::Interval) else {
        return DEFAULT_INTERVAL;
    };
    match value.parse::<u32>() {
        Ok(interval) if interval > 0 => interval,
        _ => {
            tracing::trace!(value, "Invalid INTERVAL, using default");
            DEFAULT_INTERVAL
        }
    }
}

fn weekdays(tokens: &RuleTokens) -> BTreeSet<Weekday> {
    let Some(value) = tokens.get(RuleKey::ByDay) else {
        return BTreeSet::new();
    };
    if tokens.ordinal_by_day().is_some() {
        return BTreeSet::new();
    }

    value
        .split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .filter_map(|code| {
            let day = Weekday::parse(code);
            if day.is_none() {
                tracing::trace!(code, "Skipping unknown weekday code");
            }
            day
        })
        .collect()
}

fn monthly_pattern(tokens: &RuleTokens) -> MonthlyPattern {
    if tokens.contains(RuleKey::ByMonthDay) {
        return MonthlyPattern::OnDateOfMonth;
    }
    if tokens.last_by_day().is_some() {
        MonthlyPattern::OnLastWeekDayOfMonth
    } else {
        MonthlyPattern::OnWeekDayOfMonth
    }
}

/// Reads the leading `YYYYMMDD` of an `UNTIL` value; any time part is ignored.
fn parse_until_date(value: &str) -> Option<NaiveDate> {
    if !value.get(0..8)?.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year = value.get(0..4)?.parse::<i32>().ok()?;
    let month = value.get(4..6)?.parse::<u32>().ok()?;
    let day = value.get(6..8)?.parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}
