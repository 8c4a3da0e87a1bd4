//! Data store
//!
//! Persistence port for books and borrow records. Handlers depend on the
//! [`LibraryStore`] trait only; [`PgLibraryStore`] backs the server and
//! [`InMemoryLibraryStore`] backs tests and local runs.

mod memory;
mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{ActiveLoan, Book, BorrowRecord, NewBook};

pub use memory::{InMemoryLibraryStore, StoreOperation};
pub use postgres::PgLibraryStore;

/// Data store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// An update matched no rows
    #[error("No {entity} matched {key}")]
    NotUpdated { entity: &'static str, key: String },

    /// The store refused the operation
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn not_updated(entity: &'static str, key: impl ToString) -> Self {
        Self::NotUpdated {
            entity,
            key: key.to_string(),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Lookups and mutations over books and borrow records.
///
/// No operation spans more than one statement; callers must not assume
/// atomicity across calls.
#[async_trait]
pub trait LibraryStore: Send + Sync {
    async fn get_book_by_id(&self, book_id: i64) -> StoreResult<Option<Book>>;

    async fn get_book_by_isbn(&self, isbn: &str) -> StoreResult<Option<Book>>;

    /// Whole catalog, ordered by title
    async fn get_all_books(&self) -> StoreResult<Vec<Book>>;

    /// Insert with every copy available
    async fn insert_book(&self, book: &NewBook) -> StoreResult<Book>;

    /// Active loans for a patron, oldest record first
    async fn get_patron_borrowed_books(&self, patron_id: &str) -> StoreResult<Vec<ActiveLoan>>;

    /// Number of active loans for a patron
    async fn get_patron_borrow_count(&self, patron_id: &str) -> StoreResult<i64>;

    /// Returned loans for a patron, most recent return first
    async fn get_patron_borrow_history(&self, patron_id: &str) -> StoreResult<Vec<BorrowRecord>>;

    async fn insert_borrow_record(
        &self,
        patron_id: &str,
        book_id: i64,
        borrow_date: DateTime<Utc>,
        due_date: DateTime<Utc>,
    ) -> StoreResult<BorrowRecord>;

    /// Add `delta` to a book's available copies
    async fn update_book_availability(&self, book_id: i64, delta: i32) -> StoreResult<()>;

    /// Close the patron's oldest active loan for this book
    async fn update_borrow_record_return_date(
        &self,
        patron_id: &str,
        book_id: i64,
        return_date: DateTime<Utc>,
    ) -> StoreResult<()>;
}
