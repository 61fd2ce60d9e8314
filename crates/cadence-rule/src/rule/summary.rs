//! Human-readable rule summaries for list and detail views.
//!
//! Summaries are derived from [`RuleParser`] output so that a rule always
//! reads the way the edit form would load it.

use std::fmt;

use super::core::{
    EndCondition, MonthlyPattern, Period, RecurrenceDescription, RuleKey, Weekday, WeekdayNum,
};
use super::parse::{RuleParser, RuleTokens};

/// Display sentence fragments for one rule string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSummary {
    /// e.g. "Every 2 Week(s)"
    pub repeat: String,
    /// e.g. "On Monday, Wednesday" or "On the 3rd Tuesday"
    pub on: Option<String>,
    /// e.g. "Ends after 7 events", "Ends on 2025-04-26" or "No end date"
    pub ends: String,
}

impl fmt::Display for RuleSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.repeat)?;
        if let Some(on) = &self.on {
            write!(f, ", {on}")?;
        }
        write!(f, ", {}", self.ends)
    }
}

impl RuleParser {
    /// ## Summary
    /// Renders a rule string as display text.
    ///
    /// Returns `None` wherever [`RuleParser::parse`] does.
    #[must_use]
    pub fn summarize(&self, rule: Option<&str>) -> Option<RuleSummary> {
        let description = self.parse(rule)?;
        let tokens = RuleTokens::parse(rule?);

        Some(RuleSummary {
            repeat: format!(
                "Every {} {}(s)",
                description.interval,
                description.period.unit()
            ),
            on: on_text(&description, &tokens),
            ends: ends_text(description.end_condition),
        })
    }
}

/// ## Summary
/// Renders a rule string as display text with the default parser settings.
#[must_use]
pub fn summarize(rule: Option<&str>) -> Option<RuleSummary> {
    RuleParser::default().summarize(rule)
}

fn on_text(description: &RecurrenceDescription, tokens: &RuleTokens) -> Option<String> {
    match description.period {
        Period::Weekly if !description.weekdays.is_empty() => {
            let names: Vec<_> = description
                .weekdays
                .iter()
                .copied()
                .map(Weekday::name)
                .collect();
            Some(format!("On {}", names.join(", ")))
        }
        Period::Monthly => monthly_text(description.monthly_pattern, tokens),
        Period::Daily | Period::Weekly | Period::Yearly => None,
    }
}

// The description does not retain the monthly weekday or day number; both
// come from the anchor, so they are read back from the tokens.
fn monthly_text(pattern: MonthlyPattern, tokens: &RuleTokens) -> Option<String> {
    match pattern {
        MonthlyPattern::OnDateOfMonth => {
            let day = tokens.get(RuleKey::ByMonthDay)?.parse::<i8>().ok()?;
            Some(match day {
                -1 => "On the last day".to_string(),
                n if n < 0 => format!("On the {} to last day", ordinal_word(n.unsigned_abs())),
                n => format!("On day {n}"),
            })
        }
        MonthlyPattern::OnWeekDayOfMonth => {
            weekday_text(WeekdayNum::parse(tokens.ordinal_by_day()?)?)
        }
        MonthlyPattern::OnLastWeekDayOfMonth => {
            let day = WeekdayNum::parse(tokens.last_by_day()?)?;
            day.is_last()
                .then(|| format!("On the last {}", day.weekday.name()))
        }
    }
}

fn weekday_text(day: WeekdayNum) -> Option<String> {
    let position = match day.ordinal? {
        -1 => "last".to_string(),
        n if n < 0 => format!("{} to last", ordinal_word(n.unsigned_abs())),
        n => ordinal_word(n.unsigned_abs()),
    };
    Some(format!("On the {position} {}", day.weekday.name()))
}

fn ordinal_word(n: u8) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

fn ends_text(end_condition: EndCondition) -> String {
    match end_condition {
        EndCondition::After { count: 1 } => "Ends after 1 event".to_string(),
        EndCondition::After { count } => format!("Ends after {count} events"),
        EndCondition::OnDate { date } => format!("Ends on {date}"),
        EndCondition::Never => "No end date".to_string(),
    }
}
