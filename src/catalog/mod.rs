//! The catalog service: books in a red-black tree, each with its own waitlist.
//!
//! Every operation either returns a typed outcome or a [`CatalogError`]; none of
//! them panic on bad input. The running color-flip total folds in the count
//! reported by every structural mutation of the index.

mod book;
mod error;
mod outcome;

pub use book::{Book, BookId, PatronId};
pub use error::{CatalogError, Result};
pub use outcome::{BorrowOutcome, DeleteOutcome, ReturnOutcome};

use crate::waitlist::{RESERVATION_LIMIT, Reservation};
use crate::{ColorFlips, RbTreeMap};

/// A library catalog.
///
/// # Examples
///
/// ```
/// use shelfmark::catalog::{BookId, BorrowOutcome, Catalog, PatronId};
///
/// let mut catalog = Catalog::new();
/// catalog.insert_book(BookId(100), "T", "A", true).unwrap();
///
/// let outcome = catalog.borrow_book(PatronId(1), BookId(100), 5).unwrap();
/// assert_eq!(outcome, BorrowOutcome::Borrowed { book: BookId(100), patron: PatronId(1) });
/// assert_eq!(catalog.print_book(BookId(100)).unwrap().borrower(), Some(PatronId(1)));
/// ```
#[derive(Debug, Default)]
pub struct Catalog {
    books: RbTreeMap<BookId, Book>,
    color_flips: ColorFlips,
    next_arrival: u64,
}

impl Catalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of books in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.books.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Every book, in ascending id order.
    pub fn books(&self) -> impl Iterator<Item = &Book> + '_ {
        self.books.values()
    }

    /// Color toggles performed by every insert and delete since the catalog was created.
    #[must_use]
    pub fn color_flip_count(&self) -> u64 {
        self.color_flips.get()
    }

    /// Adds a book with an empty waitlist.
    ///
    /// # Errors
    ///
    /// [`CatalogError::DuplicateId`] if a book with this id already exists; the
    /// catalog is left unchanged.
    pub fn insert_book(
        &mut self,
        id: BookId,
        title: impl Into<String>,
        author: impl Into<String>,
        available: bool,
    ) -> Result<()> {
        let book = Book::new(id, title.into(), author.into(), available);
        let flips = self.books.insert(id, book).map_err(|dup| CatalogError::DuplicateId(dup.key))?;
        self.color_flips += flips;
        tracing::debug!(book = %id, flips = flips.get(), "inserted book");
        Ok(())
    }

    /// Looks up one book.
    ///
    /// # Errors
    ///
    /// [`CatalogError::NotFound`] if there is no such book.
    pub fn print_book(&self, id: BookId) -> Result<&Book> {
        self.books.get(&id).ok_or(CatalogError::NotFound(id))
    }

    /// Every book with `low <= id <= high`, ascending.
    ///
    /// # Errors
    ///
    /// [`CatalogError::InvalidRange`] if `low > high`; the index is not queried.
    pub fn print_books(&self, low: BookId, high: BookId) -> Result<Vec<&Book>> {
        if low > high {
            return Err(CatalogError::InvalidRange { low, high });
        }
        Ok(self.books.range(&low, &high).into_iter().map(|(_, book)| book).collect())
    }

    /// Lends the book to `patron`, or queues the patron on its waitlist if it is out.
    ///
    /// Lower `priority` values are served first; equal priorities are served in
    /// request order.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::NotFound`] if there is no such book.
    /// - [`CatalogError::AlreadyBorrowed`] if `patron` already holds it; nothing changes.
    /// - [`CatalogError::CapacityExceeded`] if the waitlist is full; nothing changes.
    pub fn borrow_book(&mut self, patron: PatronId, id: BookId, priority: i64) -> Result<BorrowOutcome> {
        let arrival = self.next_arrival;
        let book = self.books.get_mut(&id).ok_or(CatalogError::NotFound(id))?;

        if book.borrower() == Some(patron) {
            return Err(CatalogError::AlreadyBorrowed { book: id, patron });
        }

        if book.is_available() {
            book.lend_to(patron);
            tracing::debug!(book = %id, %patron, "book lent");
            return Ok(BorrowOutcome::Borrowed { book: id, patron });
        }

        if book.waitlist().len() >= RESERVATION_LIMIT {
            return Err(CatalogError::CapacityExceeded {
                book: id,
                patron,
                limit: RESERVATION_LIMIT,
            });
        }

        book.waitlist_mut().push(Reservation {
            priority,
            arrival,
            patron,
        });
        self.next_arrival += 1;
        tracing::debug!(book = %id, %patron, priority, "reservation queued");
        Ok(BorrowOutcome::Reserved { book: id, patron })
    }

    /// Takes the book back from `patron` and hands it to the first waiting patron, if any.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::NotFound`] if there is no such book.
    /// - [`CatalogError::WrongBorrower`] if the book is not lent to `patron`.
    pub fn return_book(&mut self, patron: PatronId, id: BookId) -> Result<ReturnOutcome> {
        let book = self.books.get_mut(&id).ok_or(CatalogError::NotFound(id))?;

        if book.is_available() || book.borrower() != Some(patron) {
            return Err(CatalogError::WrongBorrower { book: id, patron });
        }

        let allotted_to = if book.waitlist().is_empty() {
            book.shelve();
            None
        } else {
            let next = book.waitlist_mut().pop_min()?.patron;
            book.lend_to(next);
            Some(next)
        };

        tracing::debug!(book = %id, %patron, ?allotted_to, "book returned");
        Ok(ReturnOutcome {
            book: id,
            patron,
            allotted_to,
        })
    }

    /// Removes a book, cancelling its pending reservations.
    ///
    /// # Errors
    ///
    /// [`CatalogError::NotFound`] if there is no such book.
    pub fn delete_book(&mut self, id: BookId) -> Result<DeleteOutcome> {
        let book = self.books.get_mut(&id).ok_or(CatalogError::NotFound(id))?;
        // Release the reservations before the node leaves the tree.
        let cancelled = book.waitlist_mut().drain_patrons();

        let (book, flips) = self.books.remove(&id).ok_or(CatalogError::NotFound(id))?;
        debug_assert!(book.waitlist().is_empty());
        self.color_flips += flips;
        tracing::debug!(book = %id, cancelled = cancelled.len(), flips = flips.get(), "deleted book");

        Ok(DeleteOutcome { book: id, cancelled })
    }

    /// The books whose ids are closest to `target`, ascending by id.
    ///
    /// Empty only when the catalog is empty. Two books tie when they sit at the
    /// same distance on either side of `target`.
    #[must_use]
    pub fn find_closest_book(&self, target: BookId) -> Vec<&Book> {
        let mut closest: Vec<&Book> = self.books.nearest(&target).into_iter().map(|(_, book)| book).collect();
        closest.sort_by_key(|book| book.id());
        closest
    }
}
