//! Rule string serialization.

use chrono::{Datelike, NaiveDate};

use super::core::{
    DEFAULT_INTERVAL, EndCondition, MonthlyPattern, Period, RecurrenceDescription, RuleKey,
    UNTIL_DATE_FORMAT, UNTIL_TIME_SUFFIX, Weekday, WeekdayNum,
};
use crate::error::{RuleError, RuleResult};

/// ## Summary
/// Serializes a recurrence description into its canonical rule string.
///
/// `anchor` is the first occurrence of the series and resolves the
/// date-relative monthly tokens. Tokens are emitted in a fixed order
/// (`FREQ`, `INTERVAL`, `BYDAY`/`BYMONTHDAY`, `COUNT`/`UNTIL`) and weekday
/// sets are always written Sunday first, so equal descriptions produce
/// byte-identical strings.
///
/// A weekly description with no weekdays yields no `BYDAY`; picking the
/// anchor's weekday as a default is left to the caller.
///
/// ## Errors
/// Returns `RuleError::InvalidInterval` for an interval of 0 and
/// `RuleError::InvalidCount` for an `After` end condition with a count of 0.
pub fn build_rule(description: &RecurrenceDescription, anchor: NaiveDate) -> RuleResult<String> {
    validate(description)?;

    let mut parts = vec![format!("{}={}", RuleKey::Freq, description.period)];

    if description.interval > DEFAULT_INTERVAL {
        parts.push(format!("{}={}", RuleKey::Interval, description.interval));
    }

    match description.period {
        Period::Weekly if !description.weekdays.is_empty() => {
            let days: Vec<_> = description
                .weekdays
                .iter()
                .copied()
                .map(Weekday::as_str)
                .collect();
            parts.push(format!("{}={}", RuleKey::ByDay, days.join(",")));
        }
        Period::Monthly => parts.push(monthly_part(description.monthly_pattern, anchor)),
        Period::Daily | Period::Weekly | Period::Yearly => {}
    }

    match description.end_condition {
        EndCondition::After { count } => parts.push(format!("{}={count}", RuleKey::Count)),
        EndCondition::OnDate { date } => {
            parts.push(format!("{}={}", RuleKey::Until, format_until(date)));
        }
        EndCondition::Never => {}
    }

    let rule = parts.join(";");
    tracing::debug!(rule = %rule, %anchor, "Built recurrence rule");
    Ok(rule)
}

fn validate(description: &RecurrenceDescription) -> RuleResult<()> {
    if description.interval == 0 {
        return Err(RuleError::InvalidInterval(description.interval));
    }
    if let EndCondition::After { count: 0 } = description.end_condition {
        return Err(RuleError::InvalidCount(0));
    }
    Ok(())
}

fn monthly_part(pattern: MonthlyPattern, anchor: NaiveDate) -> String {
    let weekday = Weekday::from(anchor.weekday());
    match pattern {
        MonthlyPattern::OnDateOfMonth => format!("{}={}", RuleKey::ByMonthDay, anchor.day()),
        MonthlyPattern::OnWeekDayOfMonth => {
            let day = WeekdayNum {
                ordinal: Some(ordinal_in_month(anchor)),
                weekday,
            };
            format!("{}={day}", RuleKey::ByDay)
        }
        MonthlyPattern::OnLastWeekDayOfMonth => {
            let day = WeekdayNum {
                ordinal: Some(-1),
                weekday,
            };
            format!("{}={day}", RuleKey::ByDay)
        }
    }
}

/// Returns which occurrence of its weekday `date` is within its month (1 to 5).
#[must_use]
pub fn ordinal_in_month(date: NaiveDate) -> i8 {
    // ceil(day / 7); a month has at most 31 days, so this is at most 5.
    i8::try_from(date.day0() / 7 + 1).unwrap_or(5)
}

/// Formats an `UNTIL` value: `YYYYMMDD` followed by the end-of-day UTC suffix.
#[must_use]
pub fn format_until(date: NaiveDate) -> String {
    format!("{}{UNTIL_TIME_SUFFIX}", date.format(UNTIL_DATE_FORMAT))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Monday, 17th of the month.
    fn monday_17th() -> NaiveDate {
        date(2025, 3, 17)
    }

    #[test]
    fn interval_of_one_is_omitted() {
        let desc = RecurrenceDescription::weekly([Weekday::Monday])
            .with_end(EndCondition::After { count: 5 });
        let rule = build_rule(&desc, monday_17th()).unwrap();
        assert!(!rule.contains("INTERVAL="));
        assert_eq!(rule, "FREQ=WEEKLY;BYDAY=MO;COUNT=5");
    }

    #[test]
    fn interval_above_one_is_emitted() {
        let desc = RecurrenceDescription::daily().with_interval(3);
        assert_eq!(
            build_rule(&desc, monday_17th()).unwrap(),
            "FREQ=DAILY;INTERVAL=3"
        );
    }

    #[test]
    fn weekdays_emitted_in_canonical_order() {
        let desc = RecurrenceDescription::weekly([
            Weekday::Saturday,
            Weekday::Wednesday,
            Weekday::Sunday,
            Weekday::Monday,
        ]);
        assert_eq!(
            build_rule(&desc, monday_17th()).unwrap(),
            "FREQ=WEEKLY;BYDAY=SU,MO,WE,SA"
        );
    }

    #[test]
    fn weekly_without_weekdays_has_no_byday() {
        let desc = RecurrenceDescription::new(Period::Weekly);
        assert_eq!(build_rule(&desc, monday_17th()).unwrap(), "FREQ=WEEKLY");
    }

    #[test]
    fn weekdays_ignored_outside_weekly() {
        let mut desc = RecurrenceDescription::daily();
        desc.weekdays.insert(Weekday::Friday);
        assert_eq!(build_rule(&desc, monday_17th()).unwrap(), "FREQ=DAILY");
    }

    #[test]
    fn monthly_on_date_of_month() {
        let desc = RecurrenceDescription::monthly(MonthlyPattern::OnDateOfMonth);
        let rule = build_rule(&desc, monday_17th()).unwrap();
        assert!(rule.contains("BYMONTHDAY=17"));
        assert_eq!(rule, "FREQ=MONTHLY;BYMONTHDAY=17");
    }

    #[test]
    fn monthly_on_ordinal_weekday() {
        let desc = RecurrenceDescription::monthly(MonthlyPattern::OnWeekDayOfMonth);
        assert_eq!(
            build_rule(&desc, monday_17th()).unwrap(),
            "FREQ=MONTHLY;BYDAY=3MO"
        );
    }

    #[test]
    fn monthly_on_last_weekday_ignores_week_position() {
        let desc = RecurrenceDescription::monthly(MonthlyPattern::OnLastWeekDayOfMonth);
        assert_eq!(
            build_rule(&desc, monday_17th()).unwrap(),
            "FREQ=MONTHLY;BYDAY=-1MO"
        );
        // First Wednesday of January is still emitted as "last".
        assert_eq!(
            build_rule(&desc, date(2025, 1, 1)).unwrap(),
            "FREQ=MONTHLY;BYDAY=-1WE"
        );
    }

    #[test]
    fn ordinal_in_month_boundaries() {
        assert_eq!(ordinal_in_month(date(2025, 3, 1)), 1);
        assert_eq!(ordinal_in_month(date(2025, 3, 7)), 1);
        assert_eq!(ordinal_in_month(date(2025, 3, 8)), 2);
        assert_eq!(ordinal_in_month(date(2025, 3, 14)), 2);
        assert_eq!(ordinal_in_month(date(2025, 3, 21)), 3);
        assert_eq!(ordinal_in_month(date(2025, 3, 28)), 4);
        assert_eq!(ordinal_in_month(date(2025, 3, 29)), 5);
        assert_eq!(ordinal_in_month(date(2025, 3, 31)), 5);
        assert_eq!(ordinal_in_month(date(2025, 3, 22)), 4);
        assert_eq!(ordinal_in_month(date(2024, 2, 29)), 5);
    }

    #[test]
    fn fifth_weekday_of_month() {
        let desc = RecurrenceDescription::monthly(MonthlyPattern::OnWeekDayOfMonth);
        // 2025-03-31 is the fifth Monday of March.
        assert_eq!(
            build_rule(&desc, date(2025, 3, 31)).unwrap(),
            "FREQ=MONTHLY;BYDAY=5MO"
        );
    }

    #[test]
    fn until_is_end_of_day_utc() {
        let desc = RecurrenceDescription::daily().with_end(EndCondition::OnDate {
            date: date(2025, 4, 26),
        });
        let rule = build_rule(&desc, monday_17th()).unwrap();
        assert!(rule.contains("UNTIL=20250426T235959Z"));
        assert_eq!(format_until(date(2025, 1, 2)), "20250102T235959Z");
    }

    #[test]
    fn never_emits_no_termination() {
        let desc = RecurrenceDescription::yearly().with_interval(2);
        let rule = build_rule(&desc, monday_17th()).unwrap();
        assert_eq!(rule, "FREQ=YEARLY;INTERVAL=2");
        assert!(!rule.contains("COUNT="));
        assert!(!rule.contains("UNTIL="));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let desc = RecurrenceDescription::daily().with_interval(0);
        let err = build_rule(&desc, monday_17th()).unwrap_err();
        assert!(matches!(err, RuleError::InvalidInterval(0)));
    }

    #[test]
    fn zero_count_is_rejected() {
        let desc = RecurrenceDescription::daily().with_end(EndCondition::After { count: 0 });
        let err = build_rule(&desc, monday_17th()).unwrap_err();
        assert!(matches!(err, RuleError::InvalidCount(0)));
    }
}
