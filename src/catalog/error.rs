use thiserror::Error;

use super::{BookId, PatronId};

/// Recoverable outcomes of catalog operations that did not go through.
///
/// The display strings are the report lines written for each case.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("BookID not found in the Library")]
    NotFound(BookId),

    #[error("Book {0} already exists in the Library")]
    DuplicateId(BookId),

    #[error("Invalid range: Starting ID is greater than ending ID.")]
    InvalidRange { low: BookId, high: BookId },

    #[error("Unable to reserve book {book} for Patron {patron}; reservation limit reached.")]
    CapacityExceeded { book: BookId, patron: PatronId, limit: usize },

    #[error("Return operation failed. Either the book is not borrowed or it is borrowed by another patron.")]
    WrongBorrower { book: BookId, patron: PatronId },

    #[error("Book {book} Already Borrowed by Patron {patron}")]
    AlreadyBorrowed { book: BookId, patron: PatronId },

    #[error("reservation queue is empty")]
    EmptyQueue,
}

pub type Result<T> = std::result::Result<T, CatalogError>;
