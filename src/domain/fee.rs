//! Late fee schedule
//!
//! Domain primitive for overdue charges. The schedule is a pure function of
//! the number of whole days a loan is overdue, so it can be checked without
//! a data store or a clock.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Charge per day for the first week overdue
pub const DAILY_FEE_FIRST_WEEK: Decimal = dec!(0.50);

/// Charge per day after the first week
pub const DAILY_FEE_AFTER_FIRST_WEEK: Decimal = dec!(1.00);

/// Days billed at the first-week rate
pub const FIRST_WEEK_DAYS: i64 = 7;

/// No loan is ever charged more than this, and no refund may exceed it
pub const MAX_LATE_FEE: Decimal = dec!(15.00);

/// FeeQuote is the late fee owed on a single active loan.
///
/// # Invariants
/// - `days_overdue == 0` implies `fee_amount == 0`
/// - `fee_amount` never exceeds [`MAX_LATE_FEE`]
///
/// # Example
/// ```
/// use rust_decimal_macros::dec;
/// use library_service::domain::FeeQuote;
///
/// let quote = FeeQuote::for_days_overdue(10);
/// assert_eq!(quote.fee_amount, dec!(6.50));
/// assert_eq!(quote.days_overdue, 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeQuote {
    pub fee_amount: Decimal,
    pub days_overdue: i64,
}

impl FeeQuote {
    /// The quote for a loan that is not overdue, missing, or unreadable.
    pub fn zero() -> Self {
        Self {
            fee_amount: Decimal::ZERO,
            days_overdue: 0,
        }
    }

    /// Apply the fee schedule to a number of overdue days.
    pub fn for_days_overdue(days_overdue: i64) -> Self {
        if days_overdue < 1 {
            return Self::zero();
        }

        let fee = if days_overdue <= FIRST_WEEK_DAYS {
            DAILY_FEE_FIRST_WEEK * Decimal::from(days_overdue)
        } else {
            DAILY_FEE_FIRST_WEEK * Decimal::from(FIRST_WEEK_DAYS)
                + DAILY_FEE_AFTER_FIRST_WEEK * Decimal::from(days_overdue - FIRST_WEEK_DAYS)
        };

        Self {
            fee_amount: fee.min(MAX_LATE_FEE),
            days_overdue,
        }
    }

    /// Quote a loan due at `due_date` as seen at `now`.
    pub fn for_due_date(due_date: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        Self::for_days_overdue(days_overdue(due_date, now))
    }

    /// Whether anything is owed.
    pub fn is_owed(&self) -> bool {
        self.fee_amount > Decimal::ZERO
    }
}

impl Default for FeeQuote {
    fn default() -> Self {
        Self::zero()
    }
}

/// Whole days elapsed since `due_date`. Partial days are dropped, so a loan
/// that is 3.9 days late counts as 3.
pub fn days_overdue(due_date: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - due_date).num_days()
}

/// Render an amount as dollars with two decimal places.
pub fn format_money(amount: Decimal) -> String {
    format!("${:.2}", amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_not_overdue_is_zero() {
        assert_eq!(FeeQuote::for_days_overdue(0), FeeQuote::zero());
        assert_eq!(FeeQuote::for_days_overdue(-3), FeeQuote::zero());
    }

    #[test]
    fn test_first_week_rate() {
        for days in 1..=7 {
            let quote = FeeQuote::for_days_overdue(days);
            assert_eq!(quote.fee_amount, dec!(0.50) * Decimal::from(days));
            assert_eq!(quote.days_overdue, days);
        }
        assert_eq!(FeeQuote::for_days_overdue(4).fee_amount, dec!(2.00));
        assert_eq!(FeeQuote::for_days_overdue(7).fee_amount, dec!(3.50));
    }

    #[test]
    fn test_after_first_week_rate() {
        assert_eq!(FeeQuote::for_days_overdue(8).fee_amount, dec!(4.50));
        assert_eq!(FeeQuote::for_days_overdue(10).fee_amount, dec!(6.50));
        assert_eq!(FeeQuote::for_days_overdue(18).fee_amount, dec!(14.50));
    }

    #[test]
    fn test_fee_is_capped() {
        assert_eq!(FeeQuote::for_days_overdue(19).fee_amount, dec!(15.00));
        let quote = FeeQuote::for_days_overdue(20);
        assert_eq!(quote.fee_amount, MAX_LATE_FEE);
        assert_eq!(quote.days_overdue, 20);
        assert_eq!(FeeQuote::for_days_overdue(365).fee_amount, MAX_LATE_FEE);
    }

    #[test]
    fn test_due_in_future_or_now_is_zero() {
        let now = noon();
        assert_eq!(FeeQuote::for_due_date(now, now), FeeQuote::zero());
        assert_eq!(FeeQuote::for_due_date(now + Duration::days(14), now), FeeQuote::zero());
    }

    #[test]
    fn test_partial_days_are_truncated() {
        let now = noon();
        let due = now - Duration::days(1) + Duration::hours(1);
        assert_eq!(days_overdue(due, now), 0);
        assert_eq!(FeeQuote::for_due_date(due, now), FeeQuote::zero());

        let due = now - Duration::days(4) - Duration::hours(23);
        assert_eq!(FeeQuote::for_due_date(due, now).fee_amount, dec!(2.00));
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(dec!(2)), "$2.00");
        assert_eq!(format_money(dec!(6.5)), "$6.50");
        assert_eq!(format_money(Decimal::ZERO), "$0.00");
    }
}
