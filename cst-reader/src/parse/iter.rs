use std::io;
use std::str;

use super::error::{Error, ErrorCode, Result};

/// Iterator over characters that keeps track of the current line and
/// column.
pub struct LineColIterator<I> {
    iter: I,

    /// Index of the current line. Characters in the first line of the input
    /// (before the first newline character) are in line 1.
    line: usize,

    /// Number of characters consumed on the current line.
    col: usize,

    /// Value of `col` before the most recent newline, so a pushed back
    /// newline can restore it.
    prev_col: usize,
}

impl<I> LineColIterator<I> {
    pub fn new(iter: I) -> LineColIterator<I> {
        LineColIterator {
            iter,
            line: 1,
            col: 0,
            prev_col: 0,
        }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn col(&self) -> usize {
        self.col
    }

    /// Accounts for `ch` being consumed.
    pub fn step(&mut self, ch: char) {
        if ch == '\n' {
            self.prev_col = self.col;
            self.line += 1;
            self.col = 0;
        } else {
            self.col += 1;
        }
    }

    /// Undoes the accounting of the most recent `step(ch)`.
    pub fn step_back(&mut self, ch: char) {
        if ch == '\n' {
            self.line -= 1;
            self.col = self.prev_col;
        } else {
            self.col = self.col.saturating_sub(1);
        }
    }
}

impl<I> Iterator for LineColIterator<I>
where
    I: Iterator<Item = Result<char>>,
{
    type Item = Result<char>;

    fn next(&mut self) -> Option<Result<char>> {
        match self.iter.next() {
            Some(Ok(ch)) => {
                self.step(ch);
                Some(Ok(ch))
            }
            other => other,
        }
    }
}

/// Decodes UTF-8 from a byte stream, one character at a time.
pub struct Utf8Chars<I> {
    bytes: I,
}

impl<I> Utf8Chars<I> {
    pub fn new(bytes: I) -> Self {
        Utf8Chars { bytes }
    }
}

impl<I> Utf8Chars<I>
where
    I: Iterator<Item = io::Result<u8>>,
{
    fn decode(&mut self, first: u8) -> Result<char> {
        let width = match first {
            0x00..=0x7F => return Ok(char::from(first)),
            0xC2..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF4 => 4,
            _ => return Err(Error::new(ErrorCode::InvalidUtf8)),
        };
        let mut buf = [first, 0, 0, 0];
        for slot in buf.iter_mut().take(width).skip(1) {
            match self.bytes.next() {
                Some(Ok(b)) => *slot = b,
                Some(Err(e)) => return Err(Error::io(e)),
                None => return Err(Error::new(ErrorCode::InvalidUtf8)),
            }
        }
        str::from_utf8(&buf[..width])
            .ok()
            .and_then(|s| s.chars().next())
            .ok_or_else(|| Error::new(ErrorCode::InvalidUtf8))
    }
}

impl<I> Iterator for Utf8Chars<I>
where
    I: Iterator<Item = io::Result<u8>>,
{
    type Item = Result<char>;

    fn next(&mut self) -> Option<Result<char>> {
        match self.bytes.next()? {
            Ok(b) => Some(self.decode(b)),
            Err(e) => Some(Err(Error::io(e))),
        }
    }
}
