use core::fmt;

use crate::Distance;
use crate::waitlist::Waitlist;

/// Catalog key of a book.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct BookId(pub i64);

/// Identifies a library patron.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct PatronId(pub u64);

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Display for PatronId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Distance for BookId {
    #[inline]
    fn distance(&self, other: &Self) -> u64 {
        self.0.abs_diff(other.0)
    }
}

/// A catalog entry and its reservation waitlist.
///
/// A book with a borrower is never available. A book inserted as unavailable
/// has no borrower until it is deleted; reservations against it queue up but
/// are never served, since only the borrower can return it.
#[derive(Clone, Debug)]
pub struct Book {
    id: BookId,
    title: String,
    author: String,
    available: bool,
    borrower: Option<PatronId>,
    waitlist: Waitlist,
}

impl Book {
    pub(crate) fn new(id: BookId, title: String, author: String, available: bool) -> Self {
        Self {
            id,
            title,
            author,
            available,
            borrower: None,
            waitlist: Waitlist::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> BookId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.available
    }

    #[must_use]
    pub fn borrower(&self) -> Option<PatronId> {
        self.borrower
    }

    #[must_use]
    pub fn waitlist(&self) -> &Waitlist {
        &self.waitlist
    }

    pub(crate) fn waitlist_mut(&mut self) -> &mut Waitlist {
        &mut self.waitlist
    }

    /// Hands the book to `patron`.
    pub(crate) fn lend_to(&mut self, patron: PatronId) {
        self.available = false;
        self.borrower = Some(patron);
    }

    /// Puts the book back on the shelf.
    pub(crate) fn shelve(&mut self) {
        self.available = true;
        self.borrower = None;
    }
}

/// Renders the multi-line detail report:
///
/// ```text
/// BookID = 100
/// Title = "T"
/// Author = "A"
/// Availability = No
/// BorrowedBy = 1
/// Reservations = [3, 2]
/// ```
///
/// Reservations are listed in waitlist heap order.
impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "BookID = {}", self.id)?;
        writeln!(f, "Title = \"{}\"", self.title)?;
        writeln!(f, "Author = \"{}\"", self.author)?;
        writeln!(f, "Availability = {}", if self.available { "Yes" } else { "No" })?;
        match self.borrower {
            Some(patron) => writeln!(f, "BorrowedBy = {patron}")?,
            None => writeln!(f, "BorrowedBy = None")?,
        }
        write!(f, "Reservations = [")?;
        for (i, patron) in self.waitlist.patrons().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{patron}")?;
        }
        write!(f, "]")
    }
}
