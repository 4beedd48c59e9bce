//! Book and reservation model for the library core.

use std::fmt;

use chrono::{DateTime, Utc};

/// Reservation status.
///
/// `Returned` and `Cancelled` are terminal; no further transition is
/// permitted once either is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReservationStatus {
    /// The reservation is open and consumes one unit of stock.
    #[default]
    Active,
    /// The book was returned.
    Returned,
    /// The reservation was cancelled.
    Cancelled,
}

impl ReservationStatus {
    /// Convert status to its log representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Active => "active",
            ReservationStatus::Returned => "returned",
            ReservationStatus::Cancelled => "cancelled",
        }
    }

    /// Check if this status is terminal.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ReservationStatus::Active)
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Book entity.
///
/// `stock` is the number of remaining lendable copies and is the sole
/// authority for how many more reservations the book can accept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    /// Unique book ID.
    pub id: i64,
    /// Title.
    pub title: String,
    /// ISBN (unique).
    pub isbn: String,
    /// Remaining lendable copies. Never negative.
    pub stock: i64,
    /// Whether the book is published.
    pub published: bool,
    /// Description (optional).
    pub description: Option<String>,
    /// Editor (optional).
    pub editor: Option<String>,
    /// Category (optional).
    pub category: Option<String>,
    /// Language (optional).
    pub language: Option<String>,
}

/// Data for adding a new book to the catalogue.
#[derive(Debug, Clone)]
pub struct NewBook {
    /// Title.
    pub title: String,
    /// ISBN.
    pub isbn: String,
    /// Initial stock.
    pub stock: i64,
    /// Whether the book is published.
    pub published: bool,
    /// Description (optional).
    pub description: Option<String>,
    /// Editor (optional).
    pub editor: Option<String>,
    /// Category (optional).
    pub category: Option<String>,
    /// Language (optional).
    pub language: Option<String>,
}

impl NewBook {
    /// Create a new book with the required fields.
    pub fn new(title: impl Into<String>, isbn: impl Into<String>, stock: i64) -> Self {
        Self {
            title: title.into(),
            isbn: isbn.into(),
            stock,
            published: false,
            description: None,
            editor: None,
            category: None,
            language: None,
        }
    }

    /// Mark the book as published.
    pub fn published(mut self) -> Self {
        self.published = true;
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the editor.
    pub fn with_editor(mut self, editor: impl Into<String>) -> Self {
        self.editor = Some(editor.into());
        self
    }

    /// Set the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

/// Reservation entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    /// Unique reservation ID.
    pub id: i64,
    /// Owning user ID.
    pub user_id: i64,
    /// Target book ID.
    pub book_id: i64,
    /// Reservation status.
    pub status: ReservationStatus,
    /// When the reservation was opened.
    pub reserved_at: DateTime<Utc>,
}

impl Reservation {
    /// Check if the reservation is open.
    pub fn is_active(&self) -> bool {
        self.status == ReservationStatus::Active
    }
}
