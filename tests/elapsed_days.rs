//! Host-level tests for the elapsed-day count.

use days_since::config::parse_reference_date;
use days_since::elapsed_days::{ReferenceDate, days_between, days_since};
use days_since::local_time::LocalTime;

const fn local(year: i32, month: u8, day: u8, hour: u8) -> LocalTime {
    LocalTime {
        year,
        month,
        day,
        hour,
        minute: 59,
        second: 59,
    }
}

#[test]
fn same_day_is_zero() {
    assert_eq!(days_since(2024, 3, 19, &local(2024, 3, 19, 0)).ok(), Some(0));
    assert_eq!(days_since(2024, 3, 19, &local(2024, 3, 19, 23)).ok(), Some(0));
}

#[test]
fn next_day_is_one() {
    assert_eq!(days_since(2024, 3, 19, &local(2024, 3, 20, 0)).ok(), Some(1));
}

#[test]
fn one_year_later() {
    // 2024-03-19..2025-03-19 does not contain a Feb 29
    assert_eq!(days_since(2024, 3, 19, &local(2025, 3, 19, 12)).ok(), Some(365));
    // 2023-03-19..2024-03-19 contains 2024-02-29
    assert_eq!(days_since(2023, 3, 19, &local(2024, 3, 19, 12)).ok(), Some(366));
}

#[test]
fn month_lengths_are_respected() {
    assert_eq!(days_since(2024, 1, 31, &local(2024, 3, 1, 8)).ok(), Some(30));
    assert_eq!(days_since(2023, 1, 31, &local(2023, 3, 1, 8)).ok(), Some(29));
    assert_eq!(days_since(2000, 1, 1, &local(2024, 3, 19, 8)).ok(), Some(8844));
}

#[test]
fn future_reference_is_negative() {
    assert_eq!(days_since(2024, 3, 19, &local(2024, 3, 9, 8)).ok(), Some(-10));
}

#[test]
fn invalid_dates_are_errors() {
    assert!(days_since(2023, 2, 29, &local(2024, 1, 1, 0)).is_err());
    assert!(days_since(2024, 3, 19, &local(2024, 4, 31, 0)).is_err());
}

#[test]
fn reference_date_from_config_text() {
    let reference = parse_reference_date("2024-03-19").expect("valid");
    assert_eq!(reference, ReferenceDate::new(2024, 3, 19).expect("valid"));
    assert_eq!(reference.days_until(&local(2024, 12, 25, 7)).ok(), Some(281));
}

#[test]
fn days_between_is_antisymmetric() {
    let from = ReferenceDate::new(2024, 3, 19).expect("valid").date();
    let to = ReferenceDate::new(2026, 10, 14).expect("valid").date();
    assert_eq!(days_between(from, to), -days_between(to, from));
    assert_eq!(days_between(from, from), 0);
}
