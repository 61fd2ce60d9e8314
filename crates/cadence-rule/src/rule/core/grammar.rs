//! Rule string vocabulary: keys, periods and weekday codes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RuleError;

/// Interval implied when a rule string carries no `INTERVAL` key.
pub const DEFAULT_INTERVAL: u32 = 1;

/// Fixed time-of-day and UTC marker appended to every `UNTIL` date.
pub const UNTIL_TIME_SUFFIX: &str = "T235959Z";

/// `chrono` format of the date part of an `UNTIL` value.
pub const UNTIL_DATE_FORMAT: &str = "%Y%m%d";

/// Keys recognized in a rule string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKey {
    Freq,
    Interval,
    ByDay,
    ByMonthDay,
    Count,
    Until,
}

impl RuleKey {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Freq => "FREQ",
            Self::Interval => "INTERVAL",
            Self::ByDay => "BYDAY",
            Self::ByMonthDay => "BYMONTHDAY",
            Self::Count => "COUNT",
            Self::Until => "UNTIL",
        }
    }

    /// Parses a key name (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.to_ascii_uppercase().as_str() {
            "FREQ" => Self::Freq,
            "INTERVAL" => Self::Interval,
            "BYDAY" => Self::ByDay,
            "BYMONTHDAY" => Self::ByMonthDay,
            "COUNT" => Self::Count,
            "UNTIL" => Self::Until,
            _ => return None,
        })
    }
}

impl fmt::Display for RuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Base repeat unit of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Period {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Period {
    /// Returns the `FREQ` value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
            Self::Yearly => "YEARLY",
        }
    }

    /// Singular display unit ("Day", "Week", ...).
    #[must_use]
    pub const fn unit(self) -> &'static str {
        match self {
            Self::Daily => "Day",
            Self::Weekly => "Week",
            Self::Monthly => "Month",
            Self::Yearly => "Year",
        }
    }

    /// Parses a `FREQ` value (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.trim().to_ascii_uppercase().as_str() {
            "DAILY" => Self::Daily,
            "WEEKLY" => Self::Weekly,
            "MONTHLY" => Self::Monthly,
            "YEARLY" => Self::Yearly,
            _ => return None,
        })
    }
}

impl FromStr for Period {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| RuleError::UnsupportedPeriod(s.to_string()))
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Day of the week.
///
/// Variants are declared Sunday first so that the derived ordering is the
/// canonical `BYDAY` emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    #[serde(rename = "SU")]
    Sunday,
    #[serde(rename = "MO")]
    Monday,
    #[serde(rename = "TU")]
    Tuesday,
    #[serde(rename = "WE")]
    Wednesday,
    #[serde(rename = "TH")]
    Thursday,
    #[serde(rename = "FR")]
    Friday,
    #[serde(rename = "SA")]
    Saturday,
}

impl Weekday {
    /// Returns the two-letter code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sunday => "SU",
            Self::Monday => "MO",
            Self::Tuesday => "TU",
            Self::Wednesday => "WE",
            Self::Thursday => "TH",
            Self::Friday => "FR",
            Self::Saturday => "SA",
        }
    }

    /// Returns the English day name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sunday => "Sunday",
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
        }
    }

    /// Parses a weekday from a two-letter code (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.to_ascii_uppercase().as_str() {
            "SU" => Self::Sunday,
            "MO" => Self::Monday,
            "TU" => Self::Tuesday,
            "WE" => Self::Wednesday,
            "TH" => Self::Thursday,
            "FR" => Self::Friday,
            "SA" => Self::Saturday,
            _ => return None,
        })
    }

    /// Returns all weekdays in order (Sunday through Saturday).
    #[must_use]
    pub const fn all() -> [Self; 7] {
        [
            Self::Sunday,
            Self::Monday,
            Self::Tuesday,
            Self::Wednesday,
            Self::Thursday,
            Self::Friday,
            Self::Saturday,
        ]
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Sun => Self::Sunday,
            chrono::Weekday::Mon => Self::Monday,
            chrono::Weekday::Tue => Self::Tuesday,
            chrono::Weekday::Wed => Self::Wednesday,
            chrono::Weekday::Thu => Self::Thursday,
            chrono::Weekday::Fri => Self::Friday,
            chrono::Weekday::Sat => Self::Saturday,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Weekday with optional occurrence number, as found in `BYDAY`.
///
/// - `MO` - every Monday
/// - `3TU` - third Tuesday of the month
/// - `-1WE` - last Wednesday of the month
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekdayNum {
    /// Occurrence within the month; never 0.
    pub ordinal: Option<i8>,
    pub weekday: Weekday,
}

impl WeekdayNum {
    #[must_use]
    pub const fn every(weekday: Weekday) -> Self {
        Self {
            ordinal: None,
            weekday,
        }
    }

    /// Returns `None` for a zero ordinal.
    #[must_use]
    pub const fn nth(ordinal: i8, weekday: Weekday) -> Option<Self> {
        if ordinal == 0 {
            return None;
        }
        Some(Self {
            ordinal: Some(ordinal),
            weekday,
        })
    }

    /// Whether this is the "last weekday of the month" form (`-1XX`).
    #[must_use]
    pub const fn is_last(self) -> bool {
        matches!(self.ordinal, Some(-1))
    }

    /// Parses a single `BYDAY` entry such as `MO`, `3TU`, `+2FR` or `-1WE`.
    ///
    /// Returns `None` for an unknown weekday code or a malformed ordinal.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let split = s.len().checked_sub(2)?;
        let weekday = Weekday::parse(s.get(split..)?)?;
        let ordinal_str = s.get(..split)?;

        if ordinal_str.is_empty() {
            return Some(Self::every(weekday));
        }
        Self::nth(ordinal_str.parse().ok()?, weekday)
    }
}

impl fmt::Display for WeekdayNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(n) = self.ordinal {
            write!(f, "{n}")?;
        }
        write!(f, "{}", self.weekday)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_parse() {
        assert_eq!(Weekday::parse("MO"), Some(Weekday::Monday));
        assert_eq!(Weekday::parse("fr"), Some(Weekday::Friday));
        assert_eq!(Weekday::parse("XX"), None);
    }

    #[test]
    fn weekday_order_starts_on_sunday() {
        let mut days = vec![Weekday::Saturday, Weekday::Monday, Weekday::Sunday];
        days.sort();
        assert_eq!(
            days,
            vec![Weekday::Sunday, Weekday::Monday, Weekday::Saturday]
        );
        assert_eq!(Weekday::all()[0], Weekday::Sunday);
    }

    #[test]
    fn weekday_from_chrono() {
        assert_eq!(Weekday::from(chrono::Weekday::Tue), Weekday::Tuesday);
        assert_eq!(Weekday::from(chrono::Weekday::Sun), Weekday::Sunday);
    }

    #[test]
    fn period_parse() {
        assert_eq!(Period::parse("DAILY"), Some(Period::Daily));
        assert_eq!(Period::parse("monthly"), Some(Period::Monthly));
        assert_eq!(Period::parse("HOURLY"), None);
    }

    #[test]
    fn period_from_str_rejects_unsupported() {
        let err = "SECONDLY".parse::<Period>().unwrap_err();
        assert!(matches!(err, RuleError::UnsupportedPeriod(ref p) if p == "SECONDLY"));
        assert_eq!("yearly".parse::<Period>().unwrap(), Period::Yearly);
    }

    #[test]
    fn rule_key_parse() {
        assert_eq!(RuleKey::parse("bymonthday"), Some(RuleKey::ByMonthDay));
        assert_eq!(RuleKey::parse("WKST"), None);
        assert_eq!(RuleKey::Until.to_string(), "UNTIL");
    }

    #[test]
    fn weekday_num_parse() {
        assert_eq!(
            WeekdayNum::parse("MO"),
            Some(WeekdayNum::every(Weekday::Monday))
        );
        assert_eq!(
            WeekdayNum::parse("3TU"),
            WeekdayNum::nth(3, Weekday::Tuesday)
        );
        assert_eq!(
            WeekdayNum::parse("+2FR"),
            WeekdayNum::nth(2, Weekday::Friday)
        );

        let last = WeekdayNum::parse("-1WE").unwrap();
        assert!(last.is_last());
        assert_eq!(last.weekday, Weekday::Wednesday);
    }

    #[test]
    fn weekday_num_parse_rejects_garbage() {
        assert_eq!(WeekdayNum::parse("M"), None);
        assert_eq!(WeekdayNum::parse("0MO"), None);
        assert_eq!(WeekdayNum::parse("xMO"), None);
        assert_eq!(WeekdayNum::parse("3XX"), None);
        assert_eq!(WeekdayNum::parse("é"), None);
    }

    #[test]
    fn weekday_num_display() {
        assert_eq!(WeekdayNum::every(Weekday::Thursday).to_string(), "TH");
        assert_eq!(
            WeekdayNum::nth(-1, Weekday::Monday).unwrap().to_string(),
            "-1MO"
        );
    }
}
