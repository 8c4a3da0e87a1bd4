//! In-memory store
//!
//! A thread-safe store over `Arc<RwLock<..>>`. Used by tests and by local
//! runs without a database. Individual operations can be switched to fail so
//! callers' error paths can be exercised.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::{ActiveLoan, Book, BorrowRecord, NewBook};

use super::{LibraryStore, StoreError, StoreResult};

/// Store operations that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    GetBook,
    GetBookByIsbn,
    ListBooks,
    InsertBook,
    ActiveLoans,
    BorrowCount,
    History,
    InsertBorrowRecord,
    UpdateAvailability,
    UpdateReturnDate,
}

#[derive(Debug, Default)]
struct State {
    books: BTreeMap<i64, Book>,
    records: Vec<BorrowRecord>,
    next_book_id: i64,
    next_record_id: i64,
    failing: HashSet<StoreOperation>,
}

impl State {
    fn check(&self, op: StoreOperation) -> StoreResult<()> {
        if self.failing.contains(&op) {
            return Err(StoreError::Unavailable(format!("{:?} is switched off", op)));
        }
        Ok(())
    }

    fn add_book(&mut self, book: &NewBook, available_copies: i32) -> Book {
        self.next_book_id += 1;
        let stored = Book {
            id: self.next_book_id,
            title: book.title.clone(),
            author: book.author.clone(),
            isbn: book.isbn.clone(),
            total_copies: book.total_copies,
            available_copies,
        };
        self.books.insert(stored.id, stored.clone());
        stored
    }
}

/// Library store kept in process memory.
#[derive(Debug, Default, Clone)]
pub struct InMemoryLibraryStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryLibraryStore {
    /// Creates a new, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding the three sample titles the schema migration seeds:
    /// 1 The Great Gatsby (3 copies), 2 To Kill a Mockingbird (2 copies),
    /// 3 1984 (1 copy).
    pub fn with_sample_catalog() -> Self {
        let mut state = State::default();
        for (title, author, isbn, copies) in SAMPLE_CATALOG {
            let book = NewBook {
                title: title.to_string(),
                author: author.to_string(),
                isbn: isbn.to_string(),
                total_copies: *copies,
            };
            state.add_book(&book, *copies);
        }
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Make every later call of `op` fail until [`recover`](Self::recover).
    pub async fn fail_on(&self, op: StoreOperation) {
        self.state.write().await.failing.insert(op);
    }

    pub async fn recover(&self, op: StoreOperation) {
        self.state.write().await.failing.remove(&op);
    }

    /// Every borrow record, active or returned, in insertion order.
    pub async fn all_records(&self) -> Vec<BorrowRecord> {
        self.state.read().await.records.clone()
    }
}

const SAMPLE_CATALOG: &[(&str, &str, &str, i32)] = &[
    ("The Great Gatsby", "F. Scott Fitzgerald", "9780743273565", 3),
    ("To Kill a Mockingbird", "Harper Lee", "9780061120084", 2),
    ("1984", "George Orwell", "9780451524935", 1),
];

#[async_trait]
impl LibraryStore for InMemoryLibraryStore {
    async fn get_book_by_id(&self, book_id: i64) -> StoreResult<Option<Book>> {
        let state = self.state.read().await;
        state.check(StoreOperation::GetBook)?;
        Ok(state.books.get(&book_id).cloned())
    }

    async fn get_book_by_isbn(&self, isbn: &str) -> StoreResult<Option<Book>> {
        let state = self.state.read().await;
        state.check(StoreOperation::GetBookByIsbn)?;
        Ok(state.books.values().find(|b| b.isbn == isbn).cloned())
    }

    async fn get_all_books(&self) -> StoreResult<Vec<Book>> {
        let state = self.state.read().await;
        state.check(StoreOperation::ListBooks)?;
        let mut books: Vec<Book> = state.books.values().cloned().collect();
        books.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(books)
    }

    async fn insert_book(&self, book: &NewBook) -> StoreResult<Book> {
        let mut state = self.state.write().await;
        state.check(StoreOperation::InsertBook)?;
        Ok(state.add_book(book, book.total_copies))
    }

    async fn get_patron_borrowed_books(&self, patron_id: &str) -> StoreResult<Vec<ActiveLoan>> {
        let state = self.state.read().await;
        state.check(StoreOperation::ActiveLoans)?;
        let loans = state
            .records
            .iter()
            .filter(|r| r.patron_id == patron_id && r.is_active())
            .filter_map(|r| {
                state.books.get(&r.book_id).map(|book| ActiveLoan {
                    record_id: r.id,
                    book_id: r.book_id,
                    title: book.title.clone(),
                    author: book.author.clone(),
                    borrow_date: r.borrow_date,
                    due_date: r.due_date,
                })
            })
            .collect();
        Ok(loans)
    }

    async fn get_patron_borrow_count(&self, patron_id: &str) -> StoreResult<i64> {
        let state = self.state.read().await;
        state.check(StoreOperation::BorrowCount)?;
        let count = state
            .records
            .iter()
            .filter(|r| r.patron_id == patron_id && r.is_active())
            .count();
        Ok(count as i64)
    }

    async fn get_patron_borrow_history(&self, patron_id: &str) -> StoreResult<Vec<BorrowRecord>> {
        let state = self.state.read().await;
        state.check(StoreOperation::History)?;
        let mut history: Vec<BorrowRecord> = state
            .records
            .iter()
            .filter(|r| r.patron_id == patron_id && !r.is_active())
            .cloned()
            .collect();
        history.sort_by(|a, b| b.return_date.cmp(&a.return_date));
        Ok(history)
    }

    async fn insert_borrow_record(
        &self,
        patron_id: &str,
        book_id: i64,
        borrow_date: DateTime<Utc>,
        due_date: DateTime<Utc>,
    ) -> StoreResult<BorrowRecord> {
        let mut state = self.state.write().await;
        state.check(StoreOperation::InsertBorrowRecord)?;
        state.next_record_id += 1;
        let record = BorrowRecord {
            id: state.next_record_id,
            patron_id: patron_id.to_string(),
            book_id,
            borrow_date,
            due_date,
            return_date: None,
        };
        state.records.push(record.clone());
        Ok(record)
    }

    async fn update_book_availability(&self, book_id: i64, delta: i32) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state.check(StoreOperation::UpdateAvailability)?;
        let book = state
            .books
            .get_mut(&book_id)
            .ok_or_else(|| StoreError::not_updated("book", book_id))?;

        let available = book.available_copies + delta;
        if available < 0 || available > book.total_copies {
            return Err(StoreError::Unavailable(format!(
                "available copies for book {} would become {}",
                book_id, available
            )));
        }
        book.available_copies = available;
        Ok(())
    }

    async fn update_borrow_record_return_date(
        &self,
        patron_id: &str,
        book_id: i64,
        return_date: DateTime<Utc>,
    ) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state.check(StoreOperation::UpdateReturnDate)?;
        let record = state
            .records
            .iter_mut()
            .find(|r| r.patron_id == patron_id && r.book_id == book_id && r.is_active())
            .ok_or_else(|| StoreError::not_updated("active borrow record", format!("{}/{}", patron_id, book_id)))?;
        record.return_date = Some(return_date);
        Ok(())
    }
}
