//! Text commands of the form `Name(arg, arg, ...)`.
//!
//! String arguments are double-quoted and may contain commas but not quotes.
//! Whitespace around names and arguments is ignored.

use core::str::FromStr;

use thiserror::Error;

use crate::catalog::{BookId, PatronId};

/// One parsed catalog command.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Command {
    InsertBook {
        id: BookId,
        title: String,
        author: String,
        available: bool,
    },
    PrintBook(BookId),
    PrintBooks {
        low: BookId,
        high: BookId,
    },
    BorrowBook {
        patron: PatronId,
        book: BookId,
        priority: i64,
    },
    ReturnBook {
        patron: PatronId,
        book: BookId,
    },
    FindClosestBook(BookId),
    DeleteBook(BookId),
    ColorFlipCount,
    Quit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("Invalid arguments for {command}: expected {expected}")]
    InvalidArguments {
        command: &'static str,
        expected: &'static str,
    },

    #[error("Malformed command: {0}")]
    Malformed(String),
}

/// Parses one line. Blank lines yield `Ok(None)`.
///
/// # Errors
///
/// - [`CommandError::Malformed`] if the parentheses or quotes do not balance.
/// - [`CommandError::Unknown`] for a name that is not a command.
/// - [`CommandError::InvalidArguments`] if the argument count or types are wrong.
///
/// # Examples
///
/// ```
/// use shelfmark::catalog::{BookId, PatronId};
/// use shelfmark::command::{parse, Command};
///
/// assert_eq!(
///     parse("BorrowBook(1, 100, 5)").unwrap(),
///     Some(Command::BorrowBook { patron: PatronId(1), book: BookId(100), priority: 5 })
/// );
/// assert_eq!(parse("   ").unwrap(), None);
/// ```
pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (name, args) = match line.find('(') {
        Some(open) => {
            let inner = line[open + 1..]
                .strip_suffix(')')
                .ok_or_else(|| CommandError::Malformed(line.to_owned()))?;
            (line[..open].trim(), split_args(inner).ok_or_else(|| CommandError::Malformed(line.to_owned()))?)
        }
        None => (line, Vec::new()),
    };

    let command = match name {
        "InsertBook" => {
            const EXPECTED: &str = "(id, \"title\", \"author\", \"Yes\"|\"No\")";
            let [id, title, author, available] = args_as::<4>("InsertBook", EXPECTED, args)?;
            Command::InsertBook {
                id: BookId(number("InsertBook", EXPECTED, &id)?),
                title,
                author,
                available: availability(&available).ok_or(CommandError::InvalidArguments {
                    command: "InsertBook",
                    expected: EXPECTED,
                })?,
            }
        }
        "PrintBook" => {
            const EXPECTED: &str = "(id)";
            let [id] = args_as::<1>("PrintBook", EXPECTED, args)?;
            Command::PrintBook(BookId(number("PrintBook", EXPECTED, &id)?))
        }
        "PrintBooks" => {
            const EXPECTED: &str = "(low, high)";
            let [low, high] = args_as::<2>("PrintBooks", EXPECTED, args)?;
            Command::PrintBooks {
                low: BookId(number("PrintBooks", EXPECTED, &low)?),
                high: BookId(number("PrintBooks", EXPECTED, &high)?),
            }
        }
        "BorrowBook" => {
            const EXPECTED: &str = "(patron, id, priority)";
            let [patron, book, priority] = args_as::<3>("BorrowBook", EXPECTED, args)?;
            Command::BorrowBook {
                patron: PatronId(number("BorrowBook", EXPECTED, &patron)?),
                book: BookId(number("BorrowBook", EXPECTED, &book)?),
                priority: number("BorrowBook", EXPECTED, &priority)?,
            }
        }
        "ReturnBook" => {
            const EXPECTED: &str = "(patron, id)";
            let [patron, book] = args_as::<2>("ReturnBook", EXPECTED, args)?;
            Command::ReturnBook {
                patron: PatronId(number("ReturnBook", EXPECTED, &patron)?),
                book: BookId(number("ReturnBook", EXPECTED, &book)?),
            }
        }
        "FindClosestBook" => {
            const EXPECTED: &str = "(target)";
            let [target] = args_as::<1>("FindClosestBook", EXPECTED, args)?;
            Command::FindClosestBook(BookId(number("FindClosestBook", EXPECTED, &target)?))
        }
        "DeleteBook" => {
            const EXPECTED: &str = "(id)";
            let [id] = args_as::<1>("DeleteBook", EXPECTED, args)?;
            Command::DeleteBook(BookId(number("DeleteBook", EXPECTED, &id)?))
        }
        "ColorFlipCount" => {
            args_as::<0>("ColorFlipCount", "()", args)?;
            Command::ColorFlipCount
        }
        "Quit" => {
            args_as::<0>("Quit", "()", args)?;
            Command::Quit
        }
        other => return Err(CommandError::Unknown(other.to_owned())),
    };

    Ok(Some(command))
}

/// Splits on commas outside double quotes and strips the quotes.
///
/// A quote may only open an argument and close it; `None` on an unterminated
/// quote or a quote anywhere else.
fn split_args(inner: &str) -> Option<Vec<String>> {
    if inner.trim().is_empty() {
        return Some(Vec::new());
    }

    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quoted = false;

    for c in inner.chars() {
        match c {
            '"' if in_quotes => in_quotes = false,
            '"' if quoted || !current.trim().is_empty() => return None,
            '"' => {
                current.clear();
                in_quotes = true;
                quoted = true;
            }
            _ if in_quotes => current.push(c),
            ',' => {
                args.push(finish(&mut current, quoted));
                quoted = false;
            }
            c if quoted && c.is_whitespace() => {}
            _ if quoted => return None,
            _ => current.push(c),
        }
    }
    if in_quotes {
        return None;
    }
    args.push(finish(&mut current, quoted));
    Some(args)
}

/// Quoted text is kept verbatim; bare text is trimmed.
fn finish(current: &mut String, quoted: bool) -> String {
    let arg = core::mem::take(current);
    if quoted { arg } else { arg.trim().to_owned() }
}

fn args_as<const N: usize>(
    command: &'static str,
    expected: &'static str,
    args: Vec<String>,
) -> Result<[String; N], CommandError> {
    args.try_into()
        .map_err(|_| CommandError::InvalidArguments { command, expected })
}

fn number<T: FromStr>(command: &'static str, expected: &'static str, arg: &str) -> Result<T, CommandError> {
    arg.parse()
        .map_err(|_| CommandError::InvalidArguments { command, expected })
}

fn availability(arg: &str) -> Option<bool> {
    match arg.to_ascii_lowercase().as_str() {
        "yes" => Some(true),
        "no" => Some(false),
        _ => None,
    }
}
