//! Rule string grammar and its transforms.

pub mod build;
pub mod core;
pub mod expand;
pub mod parse;
pub mod summary;

#[cfg(test)]
mod tests;

pub use build::build_rule;
pub use self::core::{
    EndCondition, MonthlyPattern, Period, RecurrenceDescription, RuleKey, Weekday, WeekdayNum,
};
pub use expand::{SeriesDates, expand_series, next_occurrence, occurrences_of};
pub use parse::{ParserDefaults, RuleParser, RuleTokens, parse_rule};
pub use summary::{RuleSummary, summarize};
