use chrono::{Datelike, NaiveDate, TimeDelta};
use proptest::prelude::*;
use rstest::rstest;

use workdayplanner::time::calendar::holidaycalendar::HolidayCalendar;
use workdayplanner::time::calendar::holidayspecsource::BundledSpecSource;
use workdayplanner::time::workday::workdayclassifier::{WorkdayCalendar, WorkdayClassifier};
use workdayplanner::time::workday::workdayrange::{WorkdayKey, WorkdayRange, WorkdayRangeError};

const FIRST_WEEK_OF_AUGUST: [&str; 5] = ["2018-08-01", "2018-08-02", "2018-08-03", "2018-08-06", "2018-08-07"];

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn iso(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn us_range(start_date: NaiveDate, end_date: NaiveDate) -> WorkdayRange {
    WorkdayRange::new(start_date, end_date, "us", &BundledSpecSource::new()).unwrap()
}

fn first_week_of_august() -> WorkdayRange {
    us_range(ymd(2018, 8, 1), ymd(2018, 8, 7))
}

#[rstest]
#[case::independence_day(
    ymd(2018, 7, 1),
    ymd(2018, 7, 31),
    vec![
        "2018-07-02", "2018-07-03", "2018-07-05", "2018-07-06",
        "2018-07-09", "2018-07-10", "2018-07-11", "2018-07-12", "2018-07-13",
        "2018-07-16", "2018-07-17", "2018-07-18", "2018-07-19", "2018-07-20",
        "2018-07-23", "2018-07-24", "2018-07-25", "2018-07-26", "2018-07-27",
        "2018-07-30", "2018-07-31"
    ]
)]
#[case::saturday_holidays(
    ymd(2021, 12, 1),
    ymd(2021, 12, 31),
    vec![
        "2021-12-01", "2021-12-02", "2021-12-03",
        "2021-12-06", "2021-12-07", "2021-12-08", "2021-12-09", "2021-12-10",
        "2021-12-13", "2021-12-14", "2021-12-15", "2021-12-16", "2021-12-17",
        "2021-12-20", "2021-12-21", "2021-12-22", "2021-12-23",
        "2021-12-27", "2021-12-28", "2021-12-29", "2021-12-30"
    ]
)]
#[case::sunday_holiday(
    ymd(2032, 7, 1),
    ymd(2032, 7, 31),
    vec![
        "2032-07-01", "2032-07-02",
        "2032-07-06", "2032-07-07", "2032-07-08", "2032-07-09",
        "2032-07-12", "2032-07-13", "2032-07-14", "2032-07-15", "2032-07-16",
        "2032-07-19", "2032-07-20", "2032-07-21", "2032-07-22", "2032-07-23",
        "2032-07-26", "2032-07-27", "2032-07-28", "2032-07-29", "2032-07-30"
    ]
)]
fn test_month_of_workdays(#[case] start_date: NaiveDate, #[case] end_date: NaiveDate, #[case] expected: Vec<&str>) {
    let range = us_range(start_date, end_date);
    assert_eq!(range.iso_workdays(), expected);
    assert_eq!(range.count(), expected.len());
}

#[test]
fn test_iteration_follows_positions() {
    let range = first_week_of_august();
    for (position, d) in range.entries() {
        assert_eq!(d, iso(FIRST_WEEK_OF_AUGUST[position]));
    }
    let dates: Vec<NaiveDate> = (&range).into_iter().collect();
    assert_eq!(dates.len(), FIRST_WEEK_OF_AUGUST.len());
}

#[test]
fn test_count() {
    assert_eq!(first_week_of_august().count(), FIRST_WEEK_OF_AUGUST.len());
}

#[test]
fn test_access_by_position() {
    let range = first_week_of_august();
    for (position, expected) in FIRST_WEEK_OF_AUGUST.iter().enumerate() {
        assert_eq!(range.get(position), Some(iso(expected)));
        assert!(range.contains(position));
    }
    assert!(!range.contains(999usize));
}

#[test]
fn test_access_by_date() {
    let range = first_week_of_august();
    for expected in FIRST_WEEK_OF_AUGUST {
        assert_eq!(range.get_iso(expected), Some(iso(expected)));
        assert!(range.contains_iso(expected));
        assert!(range.contains(iso(expected)));
    }
    assert!(!range.contains_iso("2032-01-01"));
}

#[test]
fn test_remove() {
    let mut range = first_week_of_august();
    assert!(range.get(2usize).is_some());
    assert!(range.get_iso("2018-08-03").is_some());

    assert_eq!(range.remove_iso("2018-08-03"), Some(ymd(2018, 8, 3)));
    assert!(!range.contains_iso("2018-08-03"));
    assert!(!range.contains(2usize));

    assert_eq!(range.remove(0usize), Some(ymd(2018, 8, 1)));
    assert!(!range.contains_iso("2018-08-01"));
    assert!(!range.contains(0usize));

    assert_eq!(range.remove(99usize), None);
    assert_eq!(range.count(), 3);
    assert_eq!(range.iso_workdays(), vec!["2018-08-02", "2018-08-06", "2018-08-07"]);
}

#[rstest]
#[case(ymd(2011, 5, 1), ymd(2011, 4, 1))]
#[case(ymd(2011, 5, 1), ymd(2011, 5, 1))]
fn test_start_must_precede_end(#[case] start_date: NaiveDate, #[case] end_date: NaiveDate) {
    let error = WorkdayRange::new(start_date, end_date, "us", &BundledSpecSource::new()).unwrap_err();
    assert!(matches!(error, WorkdayRangeError::InvalidRange { .. }));
    assert!(error.to_string().starts_with("the start date needs to be before the end date"));
}

#[test]
fn test_overflowing_end_date() {
    let range = WorkdayRange::from_iso_strs("2018-03-01", "2018-04-31", "us", &BundledSpecSource::new()).unwrap();
    assert_eq!(range.end_date(), ymd(2018, 5, 1));
    assert_eq!(range.iso_workdays().last().map(String::as_str), Some("2018-05-01"));
}

#[test]
fn test_unparsable_bounds() {
    let error = WorkdayRange::from_iso_strs("2018-03-01", "next tuesday", "us", &BundledSpecSource::new()).unwrap_err();
    assert!(matches!(error, WorkdayRangeError::InvalidDate(ref s) if s == "next tuesday"));
}

#[rstest]
#[case::by_date(ymd(2018, 8, 4).into())]
#[case::by_position(2usize.into())]
fn test_manual_insertion_is_rejected(#[case] key: WorkdayKey) {
    let mut range = us_range(ymd(2018, 8, 1), ymd(2018, 8, 2));
    let error = range.set(key, ymd(2018, 8, 4)).unwrap_err();
    assert_eq!(error.to_string(), "manually adding workdays is not allowed");
    assert_eq!(range.count(), 2);
}

proptest! {
    #[test]
    fn test_range_agrees_with_classifier(offset in 0i64..15_000, length in 1i64..90) {
        let start_date = ymd(1990, 1, 1) + TimeDelta::days(offset);
        let end_date = start_date + TimeDelta::days(length);
        let range = us_range(start_date, end_date);

        let classifier = WorkdayClassifier::new(
            HolidayCalendar::with_year("us", &BundledSpecSource::new(), start_date.year()).unwrap()
        );
        let mut expected = Vec::new();
        let mut d = start_date;
        while d <= end_date {
            if classifier.is_workday(d).unwrap() {
                expected.push(d);
            }
            d = d.succ_opt().unwrap();
        }

        prop_assert_eq!(range.iter().collect::<Vec<_>>(), expected);
        prop_assert_eq!(range.iter().count(), range.count());
        for (position, d) in range.entries() {
            prop_assert_eq!(range.get(position), Some(d));
            prop_assert_eq!(range.get(d), Some(d));
            prop_assert!(d.weekday().number_from_monday() <= 5);
        }
    }
}
