//! Shared utilities: input text wrapper with line information, and leveled logging.
mod code;
mod logger;
mod position;

use once_cell::unsync::OnceCell;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
/// The line and column of a byte offset in the input text.
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// A wrapper for an input text with lazily computed line break information, used to
/// report positioned errors.
pub struct Code<'c> {
    pub value: &'c [u8],
    line_breaks: OnceCell<Vec<usize>>,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
/// A debug level assigned to a [Derivation](crate::Derivation) session; higher levels
/// report more of the work.
pub enum Log<T> {
    None,
    Default(T),
    Success(T),
    Result(T),
    Verbose(T),
}
