//! Domain module
//!
//! Core domain types and business rules.

pub mod book;
pub mod clock;
pub mod context;
pub mod error;
pub mod fee;
pub mod loan;
pub mod patron;

pub use book::{Book, NewBook, SearchType};
pub use clock::{Clock, FixedClock, SystemClock};
pub use context::OperationContext;
pub use error::DomainError;
pub use fee::{format_money, FeeQuote, MAX_LATE_FEE};
pub use loan::{ActiveLoan, BorrowRecord, LOAN_PERIOD_DAYS, MAX_ACTIVE_LOANS};
pub use patron::{is_valid_patron_id, PatronId};
