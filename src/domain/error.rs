//! Domain Error Types
//!
//! Pure domain errors that don't depend on infrastructure.

use thiserror::Error;

/// Business rule violations for catalog and loan operations.
///
/// The display text is the message shown to patrons.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Card number is not exactly six digits
    #[error("Invalid patron ID. Must be exactly 6 digits.")]
    InvalidPatron,

    /// No book with the requested id
    #[error("Book not found.")]
    BookNotFound,

    /// Every copy is out on loan
    #[error("This book is currently not available.")]
    Unavailable,

    /// Patron holds too many active loans (see `MAX_ACTIVE_LOANS`)
    #[error("You have reached the maximum borrowing limit of 5 books.")]
    LimitExceeded,

    /// Patron has no active loan for this book
    #[error("Cannot return book that was not borrowed.")]
    NotBorrowed,

    /// Catalog addition failed a field check
    #[error("{0}")]
    InvalidBook(&'static str),

    /// ISBN already in the catalog
    #[error("A book with this ISBN already exists.")]
    DuplicateIsbn,
}

impl DomainError {
    /// Check if the request itself was malformed
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Self::InvalidPatron | Self::InvalidBook(_))
    }

    /// Check if a lookup came back empty
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::BookNotFound | Self::NotBorrowed)
    }

    /// Check if the request conflicts with current state
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Unavailable | Self::DuplicateIsbn)
    }

    /// Machine-readable code for API error bodies
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidPatron => "invalid_patron",
            Self::BookNotFound => "book_not_found",
            Self::Unavailable => "book_unavailable",
            Self::LimitExceeded => "borrow_limit_exceeded",
            Self::NotBorrowed => "not_borrowed",
            Self::InvalidBook(_) => "invalid_book",
            Self::DuplicateIsbn => "duplicate_isbn",
        }
    }
}
