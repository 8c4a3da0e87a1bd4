//! Catalog Handler
//!
//! Adds titles to the catalog and answers catalog lookups and searches.

use std::sync::Arc;

use crate::domain::{Book, DomainError, NewBook, SearchType};
use crate::error::AppError;
use crate::store::LibraryStore;

use super::{AddBookCommand, AddBookResult};

/// Handler for catalog maintenance and search
pub struct CatalogHandler {
    store: Arc<dyn LibraryStore>,
}

impl CatalogHandler {
    pub fn new(store: Arc<dyn LibraryStore>) -> Self {
        Self { store }
    }

    /// Validate and insert a new title with every copy available
    pub async fn add_book(&self, command: AddBookCommand) -> Result<AddBookResult, AppError> {
        let new_book = NewBook::new(
            &command.title,
            &command.author,
            &command.isbn,
            command.total_copies,
        )?;

        if self
            .store
            .get_book_by_isbn(&new_book.isbn)
            .await
            .map_err(AppError::database("checking the ISBN"))?
            .is_some()
        {
            return Err(DomainError::DuplicateIsbn.into());
        }

        let book = self
            .store
            .insert_book(&new_book)
            .await
            .map_err(AppError::database("adding the book"))?;

        tracing::info!(book_id = book.id, isbn = %book.isbn, "Book added to catalog");

        let message = format!(
            "Book \"{}\" has been successfully added to the catalog.",
            book.title
        );
        Ok(AddBookResult { book, message })
    }

    pub async fn list_books(&self) -> Result<Vec<Book>, AppError> {
        self.store
            .get_all_books()
            .await
            .map_err(AppError::database("loading the catalog"))
    }

    pub async fn get_book(&self, book_id: i64) -> Result<Book, AppError> {
        self.store
            .get_book_by_id(book_id)
            .await
            .map_err(AppError::database("loading the book"))?
            .ok_or_else(|| DomainError::BookNotFound.into())
    }

    /// Search the catalog. The term is used as given, so an empty title or
    /// author term matches every book.
    pub async fn search(&self, term: &str, search_type: SearchType) -> Result<Vec<Book>, AppError> {
        if search_type == SearchType::Isbn {
            let book = self
                .store
                .get_book_by_isbn(term)
                .await
                .map_err(AppError::database("searching the catalog"))?;
            return Ok(book.into_iter().collect());
        }

        let books = self
            .store
            .get_all_books()
            .await
            .map_err(AppError::database("searching the catalog"))?;

        Ok(books
            .into_iter()
            .filter(|book| search_type.matches(book, term))
            .collect())
    }
}
