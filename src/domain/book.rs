//! Catalog entries

use serde::{Deserialize, Serialize};

use super::DomainError;

/// Longest accepted title, in characters
pub const MAX_TITLE_LEN: usize = 200;

/// Longest accepted author name, in characters
pub const MAX_AUTHOR_LEN: usize = 100;

/// Required ISBN length
pub const ISBN_LEN: usize = 13;

/// A book in the catalog.
///
/// `available_copies` moves between 0 and `total_copies` as loans are made
/// and returned. Books are never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub total_copies: i32,
    pub available_copies: i32,
}

impl Book {
    pub fn is_available(&self) -> bool {
        self.available_copies > 0
    }
}

/// A validated catalog addition, not yet stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub total_copies: i32,
}

impl NewBook {
    /// Validate and normalize a catalog addition.
    ///
    /// Title and author are trimmed before the length checks.
    pub fn new(title: &str, author: &str, isbn: &str, total_copies: i32) -> Result<Self, DomainError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(DomainError::InvalidBook("Title is required."));
        }
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(DomainError::InvalidBook("Title must be less than 200 characters."));
        }

        let author = author.trim();
        if author.is_empty() {
            return Err(DomainError::InvalidBook("Author is required."));
        }
        if author.chars().count() > MAX_AUTHOR_LEN {
            return Err(DomainError::InvalidBook("Author must be less than 100 characters."));
        }

        if isbn.chars().count() != ISBN_LEN {
            return Err(DomainError::InvalidBook("ISBN must be exactly 13 digits."));
        }

        if total_copies <= 0 {
            return Err(DomainError::InvalidBook("Total copies must be a positive integer."));
        }

        Ok(Self {
            title: title.to_string(),
            author: author.to_string(),
            isbn: isbn.to_string(),
            total_copies,
        })
    }
}

/// Which field a catalog search matches against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    Title,
    Author,
    Isbn,
}

impl From<&str> for SearchType {
    /// Unknown search types fall back to an author search.
    fn from(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "isbn" => SearchType::Isbn,
            "title" => SearchType::Title,
            _ => SearchType::Author,
        }
    }
}

impl SearchType {
    /// ISBN searches are exact; title and author searches are
    /// case-insensitive substring matches.
    pub fn matches(&self, book: &Book, term: &str) -> bool {
        match self {
            SearchType::Isbn => book.isbn == term,
            SearchType::Title => book.title.to_lowercase().contains(&term.to_lowercase()),
            SearchType::Author => book.author.to_lowercase().contains(&term.to_lowercase()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gatsby() -> Book {
        Book {
            id: 1,
            title: "The Great Gatsby".to_string(),
            author: "F. Scott Fitzgerald".to_string(),
            isbn: "9780743273565".to_string(),
            total_copies: 3,
            available_copies: 3,
        }
    }

    #[test]
    fn test_new_book_trims_fields() {
        let book = NewBook::new("  Test Book ", " Test Author  ", "1234567890123", 5).unwrap();
        assert_eq!(book.title, "Test Book");
        assert_eq!(book.author, "Test Author");
        assert_eq!(book.total_copies, 5);
    }

    #[test]
    fn test_new_book_rejections() {
        let cases = vec![
            (NewBook::new("   ", "A", "1234567890123", 1), "Title is required."),
            (NewBook::new(&"a".repeat(201), "A", "1234567890123", 1), "200 characters"),
            (NewBook::new("T", "", "1234567890123", 1), "Author is required."),
            (NewBook::new("T", &"a".repeat(101), "1234567890123", 1), "100 characters"),
            (NewBook::new("T", "A", "123456789", 1), "13 digits"),
            (NewBook::new("T", "A", "12345678901234", 1), "13 digits"),
            (NewBook::new("T", "A", "1234567890123", 0), "positive integer"),
            (NewBook::new("T", "A", "1234567890123", -1), "positive integer"),
        ];

        for (result, expected) in cases {
            let err = result.expect_err("validation should fail");
            assert!(err.to_string().contains(expected), "{} should mention {}", err, expected);
        }
    }

    #[test]
    fn test_title_at_limit_is_accepted() {
        assert!(NewBook::new(&"a".repeat(200), "A", "1234567890123", 1).is_ok());
    }

    #[test]
    fn test_search_type_parsing() {
        assert_eq!(SearchType::from("isbn"), SearchType::Isbn);
        assert_eq!(SearchType::from("Title"), SearchType::Title);
        assert_eq!(SearchType::from("author"), SearchType::Author);
        assert_eq!(SearchType::from("anything"), SearchType::Author);
    }

    #[test]
    fn test_search_matching() {
        let book = gatsby();
        assert!(SearchType::Title.matches(&book, "gatsby"));
        assert!(SearchType::Author.matches(&book, "FITZ"));
        assert!(SearchType::Isbn.matches(&book, "9780743273565"));
        assert!(!SearchType::Isbn.matches(&book, "978074327356"));
        assert!(!SearchType::Title.matches(&book, "mockingbird"));
    }
}
