//! Executes commands against a [`Catalog`] and renders their reports.

use std::io::{self, BufRead, Write};

use crate::catalog::{Book, Catalog};
use crate::command::{self, Command};

/// Whether the runner keeps reading after a command.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Flow {
    Continue,
    Stop,
}

/// The rendered result of one command.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Response {
    /// `None` when the command produces no report, as for a successful insert.
    pub report: Option<String>,
    pub flow: Flow,
}

impl Response {
    fn reply(report: impl ToString) -> Self {
        Self {
            report: Some(report.to_string()),
            flow: Flow::Continue,
        }
    }

    fn silent() -> Self {
        Self {
            report: None,
            flow: Flow::Continue,
        }
    }
}

/// Counts gathered by [`run`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RunSummary {
    /// Lines that parsed into a command and were executed.
    pub executed: usize,
    /// Lines rejected by the parser.
    pub rejected: usize,
    /// `true` if a `Quit` ended the run before the input did.
    pub quit: bool,
}

const NO_BOOKS: &str = "No books available in the library";

fn render_books(books: &[&Book]) -> String {
    if books.is_empty() {
        return NO_BOOKS.to_owned();
    }
    books
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n\n")
}

impl Catalog {
    /// Runs one command and renders its report.
    ///
    /// Failed operations are reported with their error text and never stop the run.
    pub fn execute(&mut self, command: Command) -> Response {
        match command {
            Command::InsertBook {
                id,
                title,
                author,
                available,
            } => match self.insert_book(id, title, author, available) {
                Ok(()) => Response::silent(),
                Err(err) => Response::reply(err),
            },
            Command::PrintBook(id) => match self.print_book(id) {
                Ok(book) => Response::reply(book),
                Err(err) => Response::reply(err),
            },
            Command::PrintBooks { low, high } => match self.print_books(low, high) {
                Ok(books) => Response::reply(render_books(&books)),
                Err(err) => Response::reply(err),
            },
            Command::BorrowBook { patron, book, priority } => match self.borrow_book(patron, book, priority) {
                Ok(outcome) => Response::reply(outcome),
                Err(err) => Response::reply(err),
            },
            Command::ReturnBook { patron, book } => match self.return_book(patron, book) {
                Ok(outcome) => Response::reply(outcome),
                Err(err) => Response::reply(err),
            },
            Command::FindClosestBook(target) => Response::reply(render_books(&self.find_closest_book(target))),
            Command::DeleteBook(id) => match self.delete_book(id) {
                Ok(outcome) => Response::reply(outcome),
                Err(err) => Response::reply(err),
            },
            Command::ColorFlipCount => Response::reply(format!("Colour Flip Count: {}", self.color_flip_count())),
            Command::Quit => Response {
                report: Some("Program Terminated!!".to_owned()),
                flow: Flow::Stop,
            },
        }
    }
}

/// Reads commands line by line, executes them, and writes one report per command.
///
/// Reports are separated by a blank line. Lines that fail to parse are reported
/// with the parser's error text. Reading stops at `Quit` or end of input.
///
/// # Errors
///
/// Propagates I/O errors from `reader` and `writer`.
pub fn run<R: BufRead, W: Write>(catalog: &mut Catalog, reader: R, mut writer: W) -> io::Result<RunSummary> {
    let mut summary = RunSummary::default();
    let mut first = true;

    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let response = match command::parse(&line) {
            Ok(None) => continue,
            Ok(Some(command)) => {
                summary.executed += 1;
                catalog.execute(command)
            }
            Err(err) => {
                summary.rejected += 1;
                tracing::warn!(line = number + 1, %err, "rejected command");
                Response::reply(err)
            }
        };

        if let Some(report) = &response.report {
            if !first {
                writeln!(writer)?;
            }
            writeln!(writer, "{report}")?;
            first = false;
        }

        if response.flow == Flow::Stop {
            summary.quit = true;
            break;
        }
    }

    writer.flush()?;
    Ok(summary)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::catalog::{BookId, PatronId};
    use pretty_assertions::assert_eq;

    fn run_script(script: &str) -> (String, RunSummary) {
        let mut catalog = Catalog::new();
        let mut out = Vec::new();
        let summary = run(&mut catalog, script.as_bytes(), &mut out).unwrap();
        (String::from_utf8(out).unwrap(), summary)
    }

    #[test]
    fn insert_is_silent_and_quit_stops() {
        let (out, summary) = run_script(
            "InsertBook(1, \"A\", \"B\", \"Yes\")\n\nColorFlipCount()\nQuit()\nPrintBook(1)\n",
        );
        assert_eq!(out, "Colour Flip Count: 1\n\nProgram Terminated!!\n");
        assert_eq!(
            summary,
            RunSummary {
                executed: 3,
                rejected: 0,
                quit: true
            }
        );
    }

    #[test]
    fn parse_errors_are_reported_and_skipped() {
        let (out, summary) = run_script("Shelve(1)\nPrintBook(7)\n");
        assert_eq!(out, "Unknown command: Shelve\n\nBookID not found in the Library\n");
        assert_eq!(summary.rejected, 1);
        assert!(!summary.quit);
    }

    #[test]
    fn execute_renders_empty_listing() {
        let mut catalog = Catalog::new();
        let response = catalog.execute(Command::FindClosestBook(BookId(3)));
        assert_eq!(response.report.as_deref(), Some(NO_BOOKS));
        assert_eq!(response.flow, Flow::Continue);
    }

    #[test]
    fn execute_reports_errors_without_stopping() {
        let mut catalog = Catalog::new();
        let response = catalog.execute(Command::ReturnBook {
            patron: PatronId(1),
            book: BookId(1),
        });
        assert_eq!(response.report.as_deref(), Some("BookID not found in the Library"));
        assert_eq!(response.flow, Flow::Continue);
    }
}
