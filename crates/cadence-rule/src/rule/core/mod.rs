//! Recurrence data model and the rule string grammar it serializes to.

mod description;
mod grammar;

pub use description::{EndCondition, MonthlyPattern, RecurrenceDescription};
pub use grammar::{
    DEFAULT_INTERVAL, Period, RuleKey, UNTIL_DATE_FORMAT, UNTIL_TIME_SUFFIX, Weekday, WeekdayNum,
};
