//! When reading goes wrong.

use std::error;
use std::fmt::{self, Debug, Display};
use std::io;
use std::result;

/// This type represents the possible errors when reading source text.
pub struct Error {
    /// This `Box` allows us to keep the size of `Error` as small as possible. A
    /// larger `Error` type was substantially slower due to all the functions
    /// that pass around `Result<T, Error>`.
    err: Box<ErrorImpl>,
}

/// Alias for a `Result` with the error type `cst_reader::Error`.
pub type Result<T> = result::Result<T, Error>;

/// Location of a read error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    line: usize,
    column: usize,
}

impl Location {
    /// One-based line number at which the error was detected.
    ///
    /// Characters in the first line of the input (before the first newline
    /// character) are in line 1.
    pub fn line(&self) -> usize {
        self.line
    }

    /// One-based column number at which the error was detected.
    ///
    /// The first character in the input and any characters immediately
    /// following a newline character are in column 1.
    ///
    /// Note that errors may occur in column 0, for example at the very start
    /// of the input.
    pub fn column(&self) -> usize {
        self.column
    }
}

impl Error {
    /// The structured cause of this error.
    pub fn code(&self) -> &ErrorCode {
        &self.err.code
    }

    /// Consumes the error, returning its cause.
    pub fn into_code(self) -> ErrorCode {
        self.err.code
    }

    /// Location of the error in the input stream.
    ///
    /// Only sources that track positions report one.
    pub fn location(&self) -> Option<Location> {
        self.err.location
    }

    /// Categorizes the cause of this error.
    ///
    /// - `Category::Io` - failure to read bytes from an IO stream
    /// - `Category::Syntax` - input that cannot be read
    /// - `Category::Eof` - unexpected end of the input data
    pub fn classify(&self) -> Category {
        match self.err.code {
            ErrorCode::Io(_) => Category::Io,
            ErrorCode::EofWhileReading
            | ErrorCode::EofWhileReadingDelimited(_)
            | ErrorCode::EofWhileReadingString
            | ErrorCode::EofWhileReadingRegex
            | ErrorCode::EofWhileReadingCharacter => Category::Eof,
            ErrorCode::InvalidToken(_)
            | ErrorCode::InvalidNumber(_)
            | ErrorCode::UnmatchedDelimiter(_)
            | ErrorCode::UnreadableForm
            | ErrorCode::UnsupportedEscape(_)
            | ErrorCode::UnsupportedCharacter(_)
            | ErrorCode::InvalidUtf8
            | ErrorCode::InvalidMetadata
            | ErrorCode::InvalidMetadataTarget
            | ErrorCode::SpliceNotInList
            | ErrorCode::NestedFnLiteral
            | ErrorCode::InvalidArgLiteral(_)
            | ErrorCode::ConditionalNotAllowed
            | ErrorCode::MalformedConditional(_)
            | ErrorCode::InvalidTag
            | ErrorCode::NoReaderForTag(_)
            | ErrorCode::DataReaderFailed(_)
            | ErrorCode::InvalidRecord(_)
            | ErrorCode::InvalidPattern(_)
            | ErrorCode::EvalNotAllowed
            | ErrorCode::ReadingDisallowed
            | ErrorCode::MapParity
            | ErrorCode::TrailingCharacters
            | ErrorCode::RecursionLimitExceeded => Category::Syntax,
        }
    }

    /// Returns true if this error was caused by a failure to read bytes on
    /// an IO stream.
    pub fn is_io(&self) -> bool {
        self.classify() == Category::Io
    }

    /// Returns true if this error was caused by input that cannot be read.
    pub fn is_syntax(&self) -> bool {
        self.classify() == Category::Syntax
    }

    /// Returns true if this error was caused by prematurely reaching the end of
    /// the input data.
    ///
    /// Callers that process streaming input may be interested in retrying
    /// once more data is available.
    pub fn is_eof(&self) -> bool {
        self.classify() == Category::Eof
    }
}

/// Categorizes the cause of a `cst_reader::parse::Error`.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Category {
    /// The error was caused by a failure to read bytes from an input source.
    Io,

    /// The error was caused by input that cannot be read.
    Syntax,

    /// The error was caused by prematurely reaching the end of the input data.
    ///
    /// Callers that process streaming input may be interested in retrying
    /// once more data is available.
    Eof,
}

impl From<Error> for io::Error {
    /// Convert a `cst_reader::parse::Error` into an `io::Error`.
    ///
    /// Syntax errors are turned into `InvalidData` IO errors.  EOF errors are
    /// turned into `UnexpectedEof` IO errors.
    ///
    /// ```
    /// use std::io;
    ///
    /// enum MyError {
    ///     Io(io::Error),
    ///     Read(cst_reader::parse::Error),
    /// }
    ///
    /// impl From<cst_reader::parse::Error> for MyError {
    ///     fn from(err: cst_reader::parse::Error) -> MyError {
    ///         use cst_reader::parse::Category;
    ///         match err.classify() {
    ///             Category::Io => {
    ///                 MyError::Io(err.into())
    ///             }
    ///             Category::Syntax | Category::Eof => {
    ///                 MyError::Read(err)
    ///             }
    ///         }
    ///     }
    /// }
    /// ```
    fn from(l: Error) -> Self {
        match l.classify() {
            Category::Io => match l.err.code {
                ErrorCode::Io(err) => err,
                _ => io::Error::new(io::ErrorKind::Other, "unclassified IO error"),
            },
            Category::Syntax => io::Error::new(io::ErrorKind::InvalidData, l),
            Category::Eof => io::Error::new(io::ErrorKind::UnexpectedEof, l),
        }
    }
}

impl Error {
    pub(crate) fn new(code: ErrorCode) -> Self {
        Error {
            err: Box::new(ErrorImpl {
                code,
                location: None,
            }),
        }
    }

    pub(crate) fn io(error: io::Error) -> Self {
        Error::new(ErrorCode::Io(error))
    }

    /// Attaches a location unless one is already present.
    pub(crate) fn at(mut self, line: usize, column: usize) -> Self {
        if self.err.location.is_none() {
            self.err.location = Some(Location { line, column });
        }
        self
    }
}

struct ErrorImpl {
    code: ErrorCode,
    location: Option<Location>,
}

/// The structured cause of a read error.
#[derive(Debug)]
pub enum ErrorCode {
    /// Some IO error occurred while reading.
    Io(io::Error),

    /// EOF where a form was expected.
    EofWhileReading,

    /// EOF inside a list, vector, map or set; carries the line of the opening
    /// delimiter when positions are tracked.
    EofWhileReadingDelimited(Option<usize>),

    /// EOF inside a string literal.
    EofWhileReadingString,

    /// EOF inside a regex literal.
    EofWhileReadingRegex,

    /// EOF right after a backslash or inside an escape.
    EofWhileReadingCharacter,

    /// A token that is not a symbol, keyword, `nil`, `true` or `false`.
    InvalidToken(String),

    /// A token that starts like a number but is none.
    InvalidNumber(String),

    /// A closing delimiter without an opening one.
    UnmatchedDelimiter(char),

    /// `#<`
    UnreadableForm,

    /// An unsupported or malformed escape in a string.
    UnsupportedEscape(String),

    /// An unsupported or malformed character literal.
    UnsupportedCharacter(String),

    /// A byte stream that is not valid UTF-8.
    InvalidUtf8,

    /// Metadata that is not a symbol, keyword, string or map.
    InvalidMetadata,

    /// Metadata applied to a form that cannot carry it.
    InvalidMetadataTarget,

    /// `~@` directly inside a syntax-quote.
    SpliceNotInList,

    /// `#(` inside `#(`.
    NestedFnLiteral,

    /// A `%` token that is not `%`, `%&` or `%N`.
    InvalidArgLiteral(String),

    /// `#?` while reader conditionals are disabled.
    ConditionalNotAllowed,

    /// A reader conditional with a malformed body.
    MalformedConditional(Malformed),

    /// A tag after `#` that is not a symbol.
    InvalidTag,

    /// A tag that no registry handles.
    NoReaderForTag(String),

    /// A data reader rejected its form.
    DataReaderFailed(String),

    /// A record literal of the wrong shape or for an unknown type.
    InvalidRecord(String),

    /// The pattern engine rejected a regex literal.
    InvalidPattern(String),

    /// `#=` or a record literal while read-eval is disabled.
    EvalNotAllowed,

    /// Any read while the read-eval policy is unknown.
    ReadingDisallowed,

    /// A map literal with an odd number of forms.
    MapParity,

    /// Non-whitespace input after the last form.
    TrailingCharacters,

    /// Nesting deeper than the reader supports.
    RecursionLimitExceeded,
}

// I/O errors compare by kind.
impl PartialEq for ErrorCode {
    fn eq(&self, other: &Self) -> bool {
        use ErrorCode::*;
        match (self, other) {
            (Io(a), Io(b)) => a.kind() == b.kind(),
            (EofWhileReadingDelimited(a), EofWhileReadingDelimited(b)) => a == b,
            (InvalidToken(a), InvalidToken(b))
            | (InvalidNumber(a), InvalidNumber(b))
            | (UnsupportedEscape(a), UnsupportedEscape(b))
            | (UnsupportedCharacter(a), UnsupportedCharacter(b))
            | (InvalidArgLiteral(a), InvalidArgLiteral(b))
            | (NoReaderForTag(a), NoReaderForTag(b))
            | (DataReaderFailed(a), DataReaderFailed(b))
            | (InvalidRecord(a), InvalidRecord(b))
            | (InvalidPattern(a), InvalidPattern(b)) => a == b,
            (UnmatchedDelimiter(a), UnmatchedDelimiter(b)) => a == b,
            (MalformedConditional(a), MalformedConditional(b)) => a == b,
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

/// The ways a reader conditional can be malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Malformed {
    /// `#?` not followed by `(`.
    ExpectedList,
    /// An odd number of forms in the body.
    OddForms,
    /// A feature that is not a keyword.
    FeatureNotKeyword,
    /// `:else` or `:none` used as a feature.
    ReservedFeature,
    /// A `#?@` branch that is not a list.
    SpliceNotList,
}

impl Display for Malformed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Malformed::ExpectedList => "read-cond body must be a list",
            Malformed::OddForms => "read-cond requires an even number of forms",
            Malformed::FeatureNotKeyword => "Feature should be a keyword",
            Malformed::ReservedFeature => "Feature name is reserved",
            Malformed::SpliceNotList => "Spliced form in read-cond-splicing must be a list",
        })
    }
}

impl Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::Io(err) => Display::fmt(err, f),
            ErrorCode::EofWhileReading => f.write_str("EOF while reading"),
            ErrorCode::EofWhileReadingDelimited(Some(line)) => {
                write!(f, "EOF while reading, starting at line {}", line)
            }
            ErrorCode::EofWhileReadingDelimited(None) => f.write_str("EOF while reading"),
            ErrorCode::EofWhileReadingString => f.write_str("EOF while reading string"),
            ErrorCode::EofWhileReadingRegex => f.write_str("EOF while reading regex"),
            ErrorCode::EofWhileReadingCharacter => f.write_str("EOF while reading character"),
            ErrorCode::InvalidToken(token) => write!(f, "Invalid token: {}", token),
            ErrorCode::InvalidNumber(token) => write!(f, "Invalid number: {}", token),
            ErrorCode::UnmatchedDelimiter(c) => write!(f, "Unmatched delimiter: {}", c),
            ErrorCode::UnreadableForm => f.write_str("Unreadable form"),
            ErrorCode::UnsupportedEscape(what) => {
                write!(f, "Unsupported escape character: {}", what)
            }
            ErrorCode::UnsupportedCharacter(what) => write!(f, "Unsupported character: {}", what),
            ErrorCode::InvalidUtf8 => f.write_str("invalid UTF-8 in input"),
            ErrorCode::InvalidMetadata => {
                f.write_str("Metadata must be Symbol,Keyword,String or Map")
            }
            ErrorCode::InvalidMetadataTarget => {
                f.write_str("Metadata can only be applied to symbols and collections")
            }
            ErrorCode::SpliceNotInList => f.write_str("splice not in list"),
            ErrorCode::NestedFnLiteral => f.write_str("Nested #()s are not allowed"),
            ErrorCode::InvalidArgLiteral(token) => write!(f, "Invalid arg literal: {}", token),
            ErrorCode::ConditionalNotAllowed => f.write_str("Conditional read not allowed"),
            ErrorCode::MalformedConditional(why) => Display::fmt(why, f),
            ErrorCode::InvalidTag => f.write_str("Reader tag must be a symbol"),
            ErrorCode::NoReaderForTag(tag) => write!(f, "No reader function for tag {}", tag),
            ErrorCode::DataReaderFailed(msg) => write!(f, "Data reader failed: {}", msg),
            ErrorCode::InvalidRecord(msg) => f.write_str(msg),
            ErrorCode::InvalidPattern(msg) => write!(f, "Invalid regex: {}", msg),
            ErrorCode::EvalNotAllowed => {
                f.write_str("EvalReader not allowed when *read-eval* is false.")
            }
            ErrorCode::ReadingDisallowed => {
                f.write_str("Reading disallowed - *read-eval* bound to :unknown")
            }
            ErrorCode::MapParity => f.write_str("Map literal must contain an even number of forms"),
            ErrorCode::TrailingCharacters => f.write_str("trailing characters"),
            ErrorCode::RecursionLimitExceeded => f.write_str("recursion limit exceeded"),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self.err.code {
            ErrorCode::Io(ref err) => Some(err),
            _ => None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&*self.err, f)
    }
}

impl Display for ErrorImpl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(loc) = self.location {
            write!(
                f,
                "{} at line {} column {}",
                self.code, loc.line, loc.column
            )
        } else {
            Display::fmt(&self.code, f)
        }
    }
}

// Remove two layers of verbosity from the debug representation. Humans often
// end up seeing this representation because it is what unwrap() shows.
impl Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(loc) = self.err.location {
            write!(
                f,
                "Error({:?}, line: {}, column: {})",
                self.err.code.to_string(),
                loc.line,
                loc.column,
            )
        } else {
            write!(f, "Error({:?})", self.err.code.to_string())
        }
    }
}
