//! PostgreSQL store
//!
//! Tables are created by `migrations/0001_init.sql`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{ActiveLoan, Book, BorrowRecord, NewBook};

use super::{LibraryStore, StoreError, StoreResult};

type BookRow = (i64, String, String, String, i32, i32);
type RecordRow = (i64, String, i64, DateTime<Utc>, DateTime<Utc>, Option<DateTime<Utc>>);
type LoanRow = (i64, i64, String, String, DateTime<Utc>, DateTime<Utc>);

fn book_from_row(row: BookRow) -> Book {
    let (id, title, author, isbn, total_copies, available_copies) = row;
    Book {
        id,
        title,
        author,
        isbn,
        total_copies,
        available_copies,
    }
}

fn record_from_row(row: RecordRow) -> BorrowRecord {
    let (id, patron_id, book_id, borrow_date, due_date, return_date) = row;
    BorrowRecord {
        id,
        patron_id,
        book_id,
        borrow_date,
        due_date,
        return_date,
    }
}

fn loan_from_row(row: LoanRow) -> ActiveLoan {
    let (record_id, book_id, title, author, borrow_date, due_date) = row;
    ActiveLoan {
        record_id,
        book_id,
        title,
        author,
        borrow_date,
        due_date,
    }
}

/// Library store backed by a Postgres pool
#[derive(Debug, Clone)]
pub struct PgLibraryStore {
    pool: PgPool,
}

impl PgLibraryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LibraryStore for PgLibraryStore {
    async fn get_book_by_id(&self, book_id: i64) -> StoreResult<Option<Book>> {
        let row: Option<BookRow> = sqlx::query_as(
            r#"
            SELECT id, title, author, isbn, total_copies, available_copies
            FROM books
            WHERE id = $1
            "#,
        )
        .bind(book_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(book_from_row))
    }

    async fn get_book_by_isbn(&self, isbn: &str) -> StoreResult<Option<Book>> {
        let row: Option<BookRow> = sqlx::query_as(
            r#"
            SELECT id, title, author, isbn, total_copies, available_copies
            FROM books
            WHERE isbn = $1
            "#,
        )
        .bind(isbn)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(book_from_row))
    }

    async fn get_all_books(&self) -> StoreResult<Vec<Book>> {
        let rows: Vec<BookRow> = sqlx::query_as(
            r#"
            SELECT id, title, author, isbn, total_copies, available_copies
            FROM books
            ORDER BY title
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(book_from_row).collect())
    }

    async fn insert_book(&self, book: &NewBook) -> StoreResult<Book> {
        let row: BookRow = sqlx::query_as(
            r#"
            INSERT INTO books (title, author, isbn, total_copies, available_copies)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING id, title, author, isbn, total_copies, available_copies
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .bind(book.total_copies)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(book_id = row.0, isbn = %book.isbn, "Book inserted");
        Ok(book_from_row(row))
    }

    async fn get_patron_borrowed_books(&self, patron_id: &str) -> StoreResult<Vec<ActiveLoan>> {
        let rows: Vec<LoanRow> = sqlx::query_as(
            r#"
            SELECT br.id, br.book_id, b.title, b.author, br.borrow_date, br.due_date
            FROM borrow_records br
            JOIN books b ON b.id = br.book_id
            WHERE br.patron_id = $1 AND br.return_date IS NULL
            ORDER BY br.id
            "#,
        )
        .bind(patron_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(loan_from_row).collect())
    }

    async fn get_patron_borrow_count(&self, patron_id: &str) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM borrow_records WHERE patron_id = $1 AND return_date IS NULL",
        )
        .bind(patron_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn get_patron_borrow_history(&self, patron_id: &str) -> StoreResult<Vec<BorrowRecord>> {
        let rows: Vec<RecordRow> = sqlx::query_as(
            r#"
            SELECT id, patron_id, book_id, borrow_date, due_date, return_date
            FROM borrow_records
            WHERE patron_id = $1 AND return_date IS NOT NULL
            ORDER BY return_date DESC
            "#,
        )
        .bind(patron_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(record_from_row).collect())
    }

    async fn insert_borrow_record(
        &self,
        patron_id: &str,
        book_id: i64,
        borrow_date: DateTime<Utc>,
        due_date: DateTime<Utc>,
    ) -> StoreResult<BorrowRecord> {
        let row: RecordRow = sqlx::query_as(
            r#"
            INSERT INTO borrow_records (patron_id, book_id, borrow_date, due_date)
            VALUES ($1, $2, $3, $4)
            RETURNING id, patron_id, book_id, borrow_date, due_date, return_date
            "#,
        )
        .bind(patron_id)
        .bind(book_id)
        .bind(borrow_date)
        .bind(due_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(record_from_row(row))
    }

    async fn update_book_availability(&self, book_id: i64, delta: i32) -> StoreResult<()> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE books
            SET available_copies = available_copies + $2
            WHERE id = $1
            "#,
        )
        .bind(book_id)
        .bind(delta)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows_affected == 0 {
            return Err(StoreError::not_updated("book", book_id));
        }
        Ok(())
    }

    async fn update_borrow_record_return_date(
        &self,
        patron_id: &str,
        book_id: i64,
        return_date: DateTime<Utc>,
    ) -> StoreResult<()> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE borrow_records
            SET return_date = $3
            WHERE id = (
                SELECT id FROM borrow_records
                WHERE patron_id = $1 AND book_id = $2 AND return_date IS NULL
                ORDER BY id
                LIMIT 1
            )
            "#,
        )
        .bind(patron_id)
        .bind(book_id)
        .bind(return_date)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows_affected == 0 {
            return Err(StoreError::not_updated(
                "active borrow record",
                format!("{}/{}", patron_id, book_id),
            ));
        }
        Ok(())
    }
}
