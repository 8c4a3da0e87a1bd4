//! PostgreSQL store tests
//!
//! Need a migrated database in `DATABASE_URL`; skipped when it is unset.

use chrono::{Duration, Utc};
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use library_service::db;
use library_service::domain::NewBook;
use library_service::store::{LibraryStore, PgLibraryStore, StoreError};

async fn connect() -> Option<PgLibraryStore> {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").ok()?;

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await
        .expect("Failed to connect to DB");

    if !db::check_schema(&pool).await.expect("Schema check failed") {
        panic!("DATABASE_URL is set but the schema is missing; run migrations/0001_init.sql");
    }
    Some(PgLibraryStore::new(pool))
}

fn unique_digits(len: u32) -> String {
    let n = Uuid::new_v4().as_u128() % 10u128.pow(len);
    format!("{:0width$}", n, width = len as usize)
}

#[tokio::test]
async fn test_book_and_loan_lifecycle() {
    let Some(store) = connect().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };

    let new_book = NewBook::new("Store Test Volume", "Test Author", &unique_digits(13), 2).unwrap();
    let book = store.insert_book(&new_book).await.unwrap();
    assert_eq!(book.available_copies, 2);

    let by_isbn = store.get_book_by_isbn(&new_book.isbn).await.unwrap().unwrap();
    assert_eq!(by_isbn.id, book.id);

    let patron = unique_digits(6);
    let now = Utc::now();
    let record = store
        .insert_borrow_record(&patron, book.id, now, now + Duration::days(14))
        .await
        .unwrap();
    assert!(record.return_date.is_none());
    store.update_book_availability(book.id, -1).await.unwrap();

    assert_eq!(store.get_patron_borrow_count(&patron).await.unwrap(), 1);
    let loans = store.get_patron_borrowed_books(&patron).await.unwrap();
    assert_eq!(loans[0].title, "Store Test Volume");

    store.update_borrow_record_return_date(&patron, book.id, now).await.unwrap();
    store.update_book_availability(book.id, 1).await.unwrap();

    assert_eq!(store.get_patron_borrow_count(&patron).await.unwrap(), 0);
    let history = store.get_patron_borrow_history(&patron).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, record.id);

    let stored = store.get_book_by_id(book.id).await.unwrap().unwrap();
    assert_eq!(stored.available_copies, 2);
}

#[tokio::test]
async fn test_updates_that_match_nothing() {
    let Some(store) = connect().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };

    let result = store
        .update_borrow_record_return_date(&unique_digits(6), i64::MAX, Utc::now())
        .await;
    assert!(matches!(result, Err(StoreError::NotUpdated { .. })));

    let result = store.update_book_availability(i64::MAX, 1).await;
    assert!(matches!(result, Err(StoreError::NotUpdated { .. })));
}
