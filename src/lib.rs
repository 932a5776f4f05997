//! A library catalog indexed by an arena-backed red-black tree.
//!
//! Every book in the [`Catalog`](catalog::Catalog) lives in one node of an
//! [`RbTreeMap`] keyed by [`BookId`](catalog::BookId) and owns a
//! [`Waitlist`](waitlist::Waitlist) of pending reservations. The catalog supports:
//!
//! - insert and delete, with delete cancelling the book's reservations
//! - borrow and return, with returns handing the book to the next waiting patron
//! - lookup by id, by inclusive id range, and by nearest id
//! - a running count of node color changes made while rebalancing
//!
//! # Example
//!
//! ```
//! use shelfmark::catalog::{BookId, Catalog, PatronId, ReturnOutcome};
//!
//! let mut catalog = Catalog::new();
//! catalog.insert_book(BookId(100), "T", "A", true).unwrap();
//!
//! catalog.borrow_book(PatronId(1), BookId(100), 5).unwrap();
//! catalog.borrow_book(PatronId(2), BookId(100), 3).unwrap();
//! catalog.borrow_book(PatronId(3), BookId(100), 1).unwrap();
//!
//! // The lowest priority value is served first.
//! let outcome = catalog.return_book(PatronId(1), BookId(100)).unwrap();
//! assert_eq!(outcome.allotted_to, Some(PatronId(3)));
//! assert_eq!(catalog.print_book(BookId(100)).unwrap().waitlist().len(), 1);
//! ```
//!
//! # Implementation
//!
//! Tree nodes and values are kept in separate arenas and address each other by
//! compact handles, with one reserved handle standing in for the shared black
//! sentinel. Insert and delete rebalance with the classic fixup procedures and
//! report how many node colors they toggled.
//!
//! The [`command`] and [`session`] modules drive a catalog from text scripts,
//! which is what the `shelfmark` binary does.

// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod color_flips;
mod distance;
mod raw;

pub mod catalog;
pub mod command;
pub mod config;
pub mod rb_tree_map;
pub mod session;
pub mod waitlist;

pub use color_flips::ColorFlips;
pub use distance::Distance;
pub use rb_tree_map::{DuplicateKey, RbTreeMap};
