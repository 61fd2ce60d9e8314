//! Build/parse agreement tests.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn weekday_sets() -> Vec<BTreeSet<Weekday>> {
    let mut sets: Vec<BTreeSet<Weekday>> = Weekday::all()
        .into_iter()
        .map(|day| BTreeSet::from([day]))
        .collect();
    sets.push(BTreeSet::from([Weekday::Tuesday, Weekday::Thursday]));
    sets.push(BTreeSet::from([
        Weekday::Saturday,
        Weekday::Sunday,
        Weekday::Wednesday,
    ]));
    sets.push(Weekday::all().into_iter().collect());
    sets
}

#[test]
fn weekly_weekdays_and_interval_survive_round_trip() {
    let anchor = date(2025, 1, 7);

    for interval in [1, 2, 5] {
        for weekdays in weekday_sets() {
            let desc = RecurrenceDescription {
                weekdays: weekdays.clone(),
                ..RecurrenceDescription::new(Period::Weekly)
            }
            .with_interval(interval)
            .with_end(EndCondition::After { count: 3 });

            let rule = build_rule(&desc, anchor).unwrap();
            let parsed = parse_rule(Some(rule.as_str())).unwrap();

            assert_eq!(parsed.weekdays, weekdays, "{rule}");
            assert_eq!(parsed.interval, interval, "{rule}");
            assert_eq!(parsed, desc, "{rule}");
        }
    }
}

#[test]
fn monthly_patterns_survive_round_trip() {
    let anchor = date(2025, 3, 17);

    for pattern in [
        MonthlyPattern::OnDateOfMonth,
        MonthlyPattern::OnWeekDayOfMonth,
        MonthlyPattern::OnLastWeekDayOfMonth,
    ] {
        let desc = RecurrenceDescription::monthly(pattern).with_end(EndCondition::OnDate {
            date: date(2025, 12, 31),
        });
        let rule = build_rule(&desc, anchor).unwrap();
        assert_eq!(parse_rule(Some(rule.as_str())).unwrap(), desc, "{rule}");
    }
}

#[test]
fn reparsing_is_idempotent() {
    for rule in [
        "FREQ=WEEKLY;INTERVAL=2;BYDAY=TU,TH;COUNT=10",
        "FREQ=MONTHLY;BYDAY=-1MO",
        "FREQ=DAILY;UNTIL=20250426T235959Z",
        "INTERVAL=x;;BYDAY=ZZ",
    ] {
        assert_eq!(parse_rule(Some(rule)), parse_rule(Some(rule)), "{rule}");
    }
}

#[test]
fn parsed_rule_rebuilds_to_same_string() {
    let anchor = date(2025, 1, 7);
    let rule = "FREQ=WEEKLY;INTERVAL=2;BYDAY=TU,TH;COUNT=10";
    let desc = parse_rule(Some(rule)).unwrap();
    assert_eq!(build_rule(&desc, anchor).unwrap(), rule);
}

#[test]
fn biweekly_tuesday_thursday_end_to_end() {
    let anchor = date(2025, 1, 7);
    let desc = RecurrenceDescription::weekly([Weekday::Thursday, Weekday::Tuesday])
        .with_interval(2)
        .with_end(EndCondition::After { count: 10 });

    let rule = build_rule(&desc, anchor).unwrap();
    assert_eq!(rule, "FREQ=WEEKLY;INTERVAL=2;BYDAY=TU,TH;COUNT=10");

    let parsed = parse_rule(Some(rule.as_str())).unwrap();
    assert_eq!(parsed.period, Period::Weekly);
    assert_eq!(parsed.interval, 2);
    assert_eq!(
        parsed.weekdays,
        BTreeSet::from([Weekday::Tuesday, Weekday::Thursday])
    );
    assert_eq!(parsed.end_condition, EndCondition::After { count: 10 });

    let summary = summarize(Some(rule.as_str())).unwrap();
    assert_eq!(
        summary.to_string(),
        "Every 2 Week(s), On Tuesday, Thursday, Ends after 10 events"
    );

    let series = expand_series(&rule, anchor, 52).unwrap();
    assert_eq!(series.dates.len(), 10);
    assert_eq!(series.dates.first(), Some(&anchor));
}
