use core::fmt;

use super::{BookId, PatronId};

/// What a successful borrow request did.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BorrowOutcome {
    /// The book was on the shelf and is now lent out.
    Borrowed { book: BookId, patron: PatronId },
    /// The book was out; the patron joined its waitlist.
    Reserved { book: BookId, patron: PatronId },
}

impl fmt::Display for BorrowOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Borrowed { book, patron } => write!(f, "Book {book} Borrowed by Patron {patron}"),
            Self::Reserved { book, patron } => write!(f, "Book {book} Reserved by Patron {patron}"),
        }
    }
}

/// A completed return, and who the book went to next, if anyone.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ReturnOutcome {
    pub book: BookId,
    pub patron: PatronId,
    pub allotted_to: Option<PatronId>,
}

impl fmt::Display for ReturnOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Book {} returned by Patron {}", self.book, self.patron)?;
        if let Some(next) = self.allotted_to {
            write!(f, "\nBook {} allotted to Patron {next}", self.book)?;
        }
        Ok(())
    }
}

/// A deleted book and the reservations that were cancelled with it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DeleteOutcome {
    pub book: BookId,
    pub cancelled: Vec<PatronId>,
}

impl fmt::Display for DeleteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Book {} is no longer available", self.book)?;
        if self.cancelled.is_empty() {
            return write!(f, ".");
        }
        write!(f, ". Reservations made by Patrons ")?;
        for (i, patron) in self.cancelled.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{patron}")?;
        }
        write!(f, " have been cancelled!")
    }
}
