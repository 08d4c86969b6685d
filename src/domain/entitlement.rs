//! Coverage and validity of payments.
//!
//! Every surface that needs to know whether a payment grants access (client
//! listings, admin tables, credential verification) goes through this module.
//! The functions are pure: they read a [`Payment`] and a calendar date and
//! never touch storage or the clock.
//!
//! Coverage rules, anchored at the payment's start `date`:
//!
//! | plan          | end (exclusive)                          | valid on `as_of` when         |
//! |---------------|------------------------------------------|-------------------------------|
//! | `per day`     | `date + 1 day`                           | `date <= as_of < end`         |
//! | `per week`    | `date + 7 days`                          | `date <= as_of < end`         |
//! | `per month`   | `date + 1 calendar month`, day clamped   | `date <= as_of < end`         |
//! | `per several` | latest selected day, see [`end_date`]    | `as_of` is a selected day     |
//! | anything else | `date`                                   | never                         |
//!
//! Month arithmetic clamps to the last day of the target month, so a
//! payment starting 2024-01-31 runs through 2024-02-28 and ends (exclusive)
//! on 2024-02-29.

use chrono::{Days, Months, NaiveDate};
use serde::Serialize;

use super::payment::{Payment, PlanType};

/// A payment's coverage evaluated on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Coverage {
    pub start: NaiveDate,
    /// Exclusive end for day/week/month plans; the last selected day for
    /// "per several" plans.
    pub end: NaiveDate,
    pub active: bool,
}

/// End boundary of a payment's coverage, for display and export.
///
/// For "per several" plans this is the latest selected day. Payments from
/// the earlier scheme that carry `duration_days` instead of selected dates
/// end `duration_days` after the start date. With neither, the start date
/// itself is returned.
pub fn end_date(payment: &Payment) -> NaiveDate {
    let start = payment.date;
    match &payment.plan_type {
        PlanType::PerDay => add_days(start, 1),
        PlanType::PerWeek => add_days(start, 7),
        PlanType::PerMonth => add_one_month(start),
        PlanType::PerSeveral => match selected_days(payment).iter().max() {
            Some(last) => *last,
            None => match payment.duration_days {
                Some(days) if days > 0 => add_days(start, days as u64),
                _ => start,
            },
        },
        PlanType::Unknown(_) => start,
    }
}

/// Whether the payment grants access on `as_of`.
///
/// "Per several" plans grant access only on the listed days, not on the
/// days between them. A "per several" payment without selected days (legacy
/// `duration_days` rows included) never grants access.
pub fn is_valid(payment: &Payment, as_of: NaiveDate) -> bool {
    match &payment.plan_type {
        PlanType::PerDay | PlanType::PerWeek | PlanType::PerMonth => {
            payment.date <= as_of && as_of < end_date(payment)
        }
        PlanType::PerSeveral => selected_days(payment).contains(&as_of),
        PlanType::Unknown(_) => false,
    }
}

pub fn coverage(payment: &Payment, as_of: NaiveDate) -> Coverage {
    Coverage {
        start: payment.date,
        end: end_date(payment),
        active: is_valid(payment, as_of),
    }
}

impl Payment {
    pub fn end_date(&self) -> NaiveDate {
        end_date(self)
    }

    pub fn is_valid_on(&self, as_of: NaiveDate) -> bool {
        is_valid(self, as_of)
    }

    pub fn coverage(&self, as_of: NaiveDate) -> Coverage {
        coverage(self, as_of)
    }
}

fn selected_days(payment: &Payment) -> &[NaiveDate] {
    payment.selected_dates.as_deref().unwrap_or(&[])
}

// Saturate at the far end of the calendar instead of panicking.
fn add_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX)
}

fn add_one_month(date: NaiveDate) -> NaiveDate {
    date.checked_add_months(Months::new(1)).unwrap_or(NaiveDate::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn payment(plan: &str, date: NaiveDate) -> Payment {
        Payment {
            id: "p1".to_string(),
            client_id: "u1".to_string(),
            user_id: Some("admin".to_string()),
            plan_type: PlanType::parse(plan),
            amount: 50.0,
            date,
            selected_dates: None,
            duration_days: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn several(date: NaiveDate, selected: Option<Vec<NaiveDate>>) -> Payment {
        Payment {
            selected_dates: selected,
            ..payment("per several", date)
        }
    }

    #[test]
    fn test_per_day_is_end_exclusive() {
        let start = ymd(2025, 6, 1);
        let p = payment("per day", start);
        assert!(p.is_valid_on(start));
        assert!(!p.is_valid_on(ymd(2025, 6, 2)));
        assert_eq!(p.end_date(), ymd(2025, 6, 2));
    }

    #[test]
    fn test_per_week_is_end_exclusive() {
        let start = ymd(2025, 6, 1);
        let p = payment("per week", start);
        assert!(p.is_valid_on(ymd(2025, 6, 7)));
        assert!(!p.is_valid_on(ymd(2025, 6, 8)));
        assert_eq!(p.end_date(), ymd(2025, 6, 8));
    }

    #[test]
    fn test_week_boundary_holds_for_any_start() {
        let mut start = ymd(2023, 12, 20);
        while start < ymd(2024, 3, 15) {
            let p = payment("per week", start);
            assert!(p.is_valid_on(start + Days::new(6)), "start {start}");
            assert!(!p.is_valid_on(start + Days::new(7)), "start {start}");
            let d = payment("per day", start);
            assert!(d.is_valid_on(start));
            assert!(!d.is_valid_on(start + Days::new(1)));
            start = start + Days::new(1);
        }
    }

    #[test]
    fn test_not_valid_before_start() {
        let p = payment("per month", ymd(2025, 6, 10));
        assert!(!p.is_valid_on(ymd(2025, 6, 9)));
        assert!(p.is_valid_on(ymd(2025, 6, 10)));
    }

    #[test]
    fn test_per_month_clamps_to_end_of_february() {
        let p = payment("per month", ymd(2024, 1, 31));
        assert_eq!(p.end_date(), ymd(2024, 2, 29));
        assert!(p.is_valid_on(ymd(2024, 2, 28)));
        assert!(!p.is_valid_on(ymd(2024, 2, 29)));
        assert!(!p.is_valid_on(ymd(2024, 3, 1)));

        // Non-leap year
        let p = payment("per month", ymd(2023, 1, 31));
        assert_eq!(p.end_date(), ymd(2023, 2, 28));

        // Leap day anchor keeps its day number
        let p = payment("per month", ymd(2024, 2, 29));
        assert_eq!(p.end_date(), ymd(2024, 3, 29));

        let p = payment("per month", ymd(2024, 3, 31));
        assert_eq!(p.end_date(), ymd(2024, 4, 30));

        let p = payment("per month", ymd(2024, 12, 15));
        assert_eq!(p.end_date(), ymd(2025, 1, 15));
    }

    #[test]
    fn test_per_several_is_a_set_not_a_range() {
        let p = several(
            ymd(2025, 3, 1),
            Some(vec![ymd(2025, 3, 1), ymd(2025, 3, 10)]),
        );
        assert!(p.is_valid_on(ymd(2025, 3, 1)));
        assert!(!p.is_valid_on(ymd(2025, 3, 5)));
        assert!(p.is_valid_on(ymd(2025, 3, 10)));
        assert!(!p.is_valid_on(ymd(2025, 3, 11)));
        assert_eq!(p.end_date(), ymd(2025, 3, 10));
    }

    #[test]
    fn test_per_several_end_is_latest_regardless_of_order() {
        let p = several(
            ymd(2025, 3, 1),
            Some(vec![ymd(2025, 3, 20), ymd(2025, 3, 2), ymd(2025, 3, 9)]),
        );
        assert_eq!(p.end_date(), ymd(2025, 3, 20));
    }

    #[test]
    fn test_per_several_without_dates_fails_closed() {
        let start = ymd(2025, 3, 1);
        for p in [several(start, Some(vec![])), several(start, None)] {
            assert!(!p.is_valid_on(start));
            assert!(!p.is_valid_on(ymd(2025, 3, 2)));
            assert_eq!(p.end_date(), start);
        }
    }

    #[test]
    fn test_legacy_duration_days() {
        let start = ymd(2025, 3, 1);
        let p = Payment {
            duration_days: Some(10),
            ..several(start, None)
        };
        assert_eq!(p.end_date(), ymd(2025, 3, 11));
        assert!(!p.is_valid_on(ymd(2025, 3, 5)));

        // Selected dates win over the legacy count when both are present
        let p = Payment {
            duration_days: Some(10),
            ..several(start, Some(vec![ymd(2025, 3, 4)]))
        };
        assert_eq!(p.end_date(), ymd(2025, 3, 4));

        let p = Payment {
            duration_days: Some(-3),
            ..several(start, None)
        };
        assert_eq!(p.end_date(), start);
    }

    #[test]
    fn test_unknown_plan_fails_closed() {
        let start = ymd(2025, 3, 1);
        let p = payment("per fortnight", start);
        assert!(!p.is_valid_on(start));
        assert_eq!(p.end_date(), start);
    }

    #[test]
    fn test_far_future_dates_do_not_panic() {
        let p = payment("per month", NaiveDate::MAX);
        assert_eq!(p.end_date(), NaiveDate::MAX);
        assert!(!p.is_valid_on(NaiveDate::MAX));
    }

    #[test]
    fn test_coverage_agrees_with_parts() {
        let p = payment("per week", ymd(2025, 6, 1));
        let c = p.coverage(ymd(2025, 6, 5));
        assert_eq!(
            c,
            Coverage {
                start: ymd(2025, 6, 1),
                end: ymd(2025, 6, 8),
                active: true,
            }
        );
        assert!(!p.coverage(ymd(2025, 6, 9)).active);
    }
}
