use std::io;
use std::iter;
use std::str;

use super::error::Result;
use super::iter::{LineColIterator, Utf8Chars};

/// Trait used by the parser for iterating over input characters.
///
/// A source hands out one character at a time and accepts at most one
/// character back before the next call to `next`.
///
/// This trait is sealed and cannot be implemented for types outside of
/// `cst_reader`.
pub trait Read: private::Sealed {
    /// The next character, or `None` at the end of input.
    #[doc(hidden)]
    fn next(&mut self) -> Result<Option<char>>;

    /// Pushes `ch`, the character most recently returned by `next`, back
    /// onto the input.
    #[doc(hidden)]
    fn unread(&mut self, ch: char);

    /// Position after the most recently consumed character, if the source
    /// tracks positions.
    ///
    /// Only called to annotate errors and lists, so performance is not
    /// important.
    #[doc(hidden)]
    fn position(&self) -> Option<Position>;
}

/// A position in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// One-based line number.
    pub line: usize,
    /// Number of characters consumed on the line.
    pub column: usize,
}

/// Character source with one character of pushback.
struct Cursor<I> {
    iter: LineColIterator<I>,
    /// Temporary storage of a pushed back character.
    ch: Option<char>,
}

impl<I> Cursor<I>
where
    I: Iterator<Item = Result<char>>,
{
    fn new(iter: I) -> Self {
        Cursor {
            iter: LineColIterator::new(iter),
            ch: None,
        }
    }

    fn next(&mut self) -> Result<Option<char>> {
        match self.ch.take() {
            Some(ch) => {
                self.iter.step(ch);
                Ok(Some(ch))
            }
            None => self.iter.next().transpose(),
        }
    }

    fn unread(&mut self, ch: char) {
        debug_assert!(self.ch.is_none(), "only one character of pushback");
        self.iter.step_back(ch);
        self.ch = Some(ch);
    }

    fn position(&self) -> Position {
        Position {
            line: self.iter.line(),
            column: self.iter.col(),
        }
    }
}

type StrChars<'a> = iter::Map<str::Chars<'a>, fn(char) -> Result<char>>;

/// Source text read from a `&str`.
pub struct StrRead<'a> {
    delegate: Cursor<StrChars<'a>>,
}

/// Source text read from a `std::io` input stream, decoded as UTF-8.
pub struct IoRead<R>
where
    R: io::Read,
{
    delegate: Cursor<Utf8Chars<io::Bytes<R>>>,
}

/// Wraps a source and hides its positions.
///
/// Errors from an untracked source carry no location, and lists read from
/// it carry no position metadata.
pub struct Untracked<R> {
    delegate: R,
}

// Prevent users from implementing the Read trait.
mod private {
    pub trait Sealed {}
}

//////////////////////////////////////////////////////////////////////////////

impl<'a> StrRead<'a> {
    /// Create a source reading from a string slice.
    pub fn new(s: &'a str) -> Self {
        StrRead {
            delegate: Cursor::new(s.chars().map(Ok as fn(char) -> Result<char>)),
        }
    }
}

impl<'a> private::Sealed for StrRead<'a> {}

impl<'a> Read for StrRead<'a> {
    #[inline]
    fn next(&mut self) -> Result<Option<char>> {
        self.delegate.next()
    }

    #[inline]
    fn unread(&mut self, ch: char) {
        self.delegate.unread(ch)
    }

    fn position(&self) -> Option<Position> {
        Some(self.delegate.position())
    }
}

//////////////////////////////////////////////////////////////////////////////

impl<R> IoRead<R>
where
    R: io::Read,
{
    /// Create a source reading from a std::io input stream.
    ///
    /// The stream is read one byte at a time; wrap unbuffered sources such as
    /// files in a `std::io::BufReader`.
    pub fn new(reader: R) -> Self {
        IoRead {
            delegate: Cursor::new(Utf8Chars::new(reader.bytes())),
        }
    }
}

impl<R> private::Sealed for IoRead<R> where R: io::Read {}

impl<R> Read for IoRead<R>
where
    R: io::Read,
{
    #[inline]
    fn next(&mut self) -> Result<Option<char>> {
        self.delegate.next()
    }

    #[inline]
    fn unread(&mut self, ch: char) {
        self.delegate.unread(ch)
    }

    fn position(&self) -> Option<Position> {
        Some(self.delegate.position())
    }
}

//////////////////////////////////////////////////////////////////////////////

impl<R: Read> Untracked<R> {
    /// Hide the positions of `read`.
    pub fn new(read: R) -> Self {
        Untracked { delegate: read }
    }
}

impl<R: Read> private::Sealed for Untracked<R> {}

impl<R: Read> Read for Untracked<R> {
    #[inline]
    fn next(&mut self) -> Result<Option<char>> {
        self.delegate.next()
    }

    #[inline]
    fn unread(&mut self, ch: char) {
        self.delegate.unread(ch)
    }

    fn position(&self) -> Option<Position> {
        None
    }
}
