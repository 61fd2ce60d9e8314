//! Series expansion: the concrete appointment dates a rule string produces.
//!
//! Unlike [`super::parse`], expansion is strict. The rule string must be a
//! valid RFC 5545 recurrence, since a silently defaulted rule would book
//! appointments on dates nobody chose.

use cadence_core::error::CoreError;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta};
use rrule::{RRule, RRuleSet, Tz, Unvalidated};

use super::build::build_rule;
use super::core::RecurrenceDescription;
use crate::error::{RuleError, RuleResult};

/// Occurrence dates of one series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesDates {
    pub dates: Vec<NaiveDate>,
    /// `true` when expansion stopped at the limit rather than at the end of the series.
    pub truncated: bool,
}

/// ## Summary
/// Expands a rule string anchored at `anchor` into at most `limit` dates.
///
/// The anchor itself is only included when it matches the rule.
///
/// ## Errors
/// Returns `RuleError::Recurrence` if the rule string is not a valid
/// recurrence rule for the anchor, or `RuleError::CoreError` if `limit` is 0.
pub fn expand_series(rule: &str, anchor: NaiveDate, limit: u16) -> RuleResult<SeriesDates> {
    if limit == 0 {
        return Err(
            CoreError::InvalidInput("expansion limit must be at least 1".to_string()).into(),
        );
    }

    let result = rule_set(rule, anchor)?.all(limit);
    let dates: Vec<NaiveDate> = result.dates.iter().map(DateTime::date_naive).collect();

    tracing::debug!(
        rule,
        %anchor,
        count = dates.len(),
        truncated = result.limited,
        "Expanded recurrence series"
    );

    Ok(SeriesDates {
        dates,
        truncated: result.limited,
    })
}

/// ## Summary
/// Returns the first occurrence strictly after `after`, or `None` once the series has ended.
///
/// ## Errors
/// Returns `RuleError::Recurrence` if the rule string is not a valid
/// recurrence rule for the anchor, or `RuleError::InvalidDate` if `after`
/// is the last representable date.
pub fn next_occurrence(
    rule: &str,
    anchor: NaiveDate,
    after: NaiveDate,
) -> RuleResult<Option<NaiveDate>> {
    // Occurrences fall at midnight, so the last second of `after` excludes that day.
    let bound = after
        .succ_opt()
        .and_then(|day| {
            day.and_time(NaiveTime::MIN)
                .checked_sub_signed(TimeDelta::seconds(1))
        })
        .ok_or_else(|| RuleError::InvalidDate(format!("no date follows {after}")))?
        .and_utc();
    let next = rule_set(rule, anchor)?
        .after(bound.with_timezone(&Tz::UTC))
        .all(1)
        .dates
        .first()
        .map(DateTime::date_naive);

    tracing::trace!(rule, %anchor, %after, next = ?next, "Resolved next occurrence");
    Ok(next)
}

/// ## Summary
/// Builds the rule for `description` and expands it.
///
/// ## Errors
/// Returns any error of [`build_rule`] or [`expand_series`].
pub fn occurrences_of(
    description: &RecurrenceDescription,
    anchor: NaiveDate,
    limit: u16,
) -> RuleResult<SeriesDates> {
    let rule = build_rule(description, anchor)?;
    expand_series(&rule, anchor, limit)
}

/// Series start at midnight UTC on the anchor date, matching the
/// end-of-day UTC `UNTIL` the builder writes.
fn rule_set(rule: &str, anchor: NaiveDate) -> RuleResult<RRuleSet> {
    let dt_start = anchor
        .and_time(NaiveTime::MIN)
        .and_utc()
        .with_timezone(&Tz::UTC);
    let rrule = rule.parse::<RRule<Unvalidated>>()?;
    Ok(rrule.build(dt_start)?)
}
