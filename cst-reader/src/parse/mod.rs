//! Reader for source text and its options.
//!
//! The reader turns text into [`Form`]s. Data is read the usual way, but
//! every piece of syntax that an ordinary reader throws away (comments,
//! commas, discarded forms, quoting punctuation, reader conditionals) is
//! kept as a [`SyntaxNode`](crate::SyntaxNode), so the text can be written
//! back out with [`emit`](crate::print::emit).

use std::io;

use tracing::debug;

use crate::host::{Host, ReadEval};
use crate::symbol::Keyword;
use crate::syntax::SyntaxNode;
use crate::Form;

use self::dispatch::{is_whitespace, macro_for};
use self::scope::{PendingForms, Scope, ScopedReadState};
use self::token::{interpret_token, read_number, read_token};

pub use self::read::{IoRead, Position, Read, StrRead, Untracked};

#[doc(inline)]
pub use self::error::{Category, Error, ErrorCode, Location, Malformed, Result};

/// How deeply forms may nest before reading fails.
const MAX_DEPTH: u16 = 256;

/// Reader for source text.
///
/// This type, given an input source, provides the [`read`] method, which
/// reads a single form from the input source.
///
/// [`read`]: struct.Parser.html#method.read
pub struct Parser<R> {
    read: R,
    remaining_depth: u16,
    options: Options,
    host: Host,
    state: ScopedReadState,
}

/// Various options to influence reader behavior.
#[derive(Debug, Clone)]
pub struct Options {
    eof: Eof,
    features: Vec<Keyword>,
    read_cond: ReadCond,
    trivia: Trivia,
}

/// What reading at the end of input yields.
#[derive(Debug, Clone, PartialEq)]
pub enum Eof {
    /// Fail with an end-of-input error.
    Error,
    /// Return the given form.
    Value(Form),
}

/// Treatment of reader conditionals, `#?(...)` and `#?@(...)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ReadCond {
    /// Reader conditionals are an error.
    Disabled,
    /// Reader conditionals are read into
    /// [`Conditional`](crate::syntax::Conditional) nodes.
    Allow,
    /// Like `Allow`, and tagged literals inside a conditional are kept as
    /// [`Form::Tagged`] without consulting any data reader.
    Preserve,
}

/// Treatment of comments, commas and discarded forms.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Trivia {
    /// Keep them as syntax nodes.
    Preserve,
    /// Drop them, as an ordinary reader does.
    Skip,
}

/// The platform feature, always present.
const PLATFORM_FEATURE: &str = "clj";

impl Options {
    /// Construct the default options: end of input is an error, reader
    /// conditionals are disabled and trivia is preserved.
    pub fn new() -> Self {
        Options {
            eof: Eof::Error,
            features: Vec::new(),
            read_cond: ReadCond::Disabled,
            trivia: Trivia::Preserve,
        }
    }

    /// Choose what reading at the end of input yields.
    pub fn with_eof(mut self, eof: Eof) -> Self {
        self.eof = eof;
        self
    }

    /// Add a feature to the active feature set.
    pub fn with_feature(mut self, feature: Keyword) -> Self {
        if !self.features.contains(&feature) {
            self.features.push(feature);
        }
        self
    }

    /// Set the active features, in addition to the platform feature.
    pub fn with_features<I>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = Keyword>,
    {
        self.features.clear();
        features
            .into_iter()
            .fold(self, |options, feature| options.with_feature(feature))
    }

    /// Choose the treatment of reader conditionals.
    pub fn with_read_cond(mut self, mode: ReadCond) -> Self {
        self.read_cond = mode;
        self
    }

    /// Choose the treatment of comments, commas and discarded forms.
    pub fn with_trivia(mut self, trivia: Trivia) -> Self {
        self.trivia = trivia;
        self
    }

    /// Query what reading at the end of input yields.
    pub fn eof(&self) -> &Eof {
        &self.eof
    }

    /// The active features, starting with the platform feature `:clj`.
    ///
    /// ```
    /// # use cst_reader::{parse::Options, Keyword};
    /// let opts = Options::new().with_feature(Keyword::new(None, "cljs"));
    /// let names: Vec<_> = opts.features().iter().map(|f| f.to_string()).collect();
    /// assert_eq!(names, vec![":clj", ":cljs"]);
    /// ```
    pub fn features(&self) -> Vec<Keyword> {
        let platform = Keyword::new(None, PLATFORM_FEATURE);
        let mut features = vec![platform.clone()];
        features.extend(self.features.iter().filter(|f| **f != platform).cloned());
        features
    }

    /// Check whether a feature is active.
    pub fn has_feature(&self, feature: &Keyword) -> bool {
        (feature.namespace().is_none() && feature.name() == PLATFORM_FEATURE)
            || self.features.contains(feature)
    }

    /// Query the treatment of reader conditionals.
    pub fn read_cond(&self) -> ReadCond {
        self.read_cond
    }

    /// Query the treatment of comments, commas and discarded forms.
    pub fn trivia(&self) -> Trivia {
        self.trivia
    }
}

impl Default for Options {
    fn default() -> Self {
        Options::new()
    }
}

/// What a reader macro produced.
pub(crate) enum Step {
    /// A form to return.
    Value(Form),
    /// Nothing; the reader goes on with the next character.
    Continue,
}

/// What one pass of the driver loop produced.
enum Outcome {
    Form(Form),
    Eof,
    /// The character the caller waits for was read.
    Closed,
}

impl<R> Parser<R>
where
    R: Read,
{
    /// Create a reader from one of the possible input sources.
    ///
    /// Typically it is more convenient to use one of these methods
    /// instead:
    ///
    ///   - `Parser::from_str`
    ///   - `Parser::from_reader`
    pub fn new(read: R) -> Self {
        Parser::with_options(read, Options::default())
    }

    /// Create a customized reader from one of the possible input sources.
    pub fn with_options(read: R, options: Options) -> Self {
        Parser {
            read,
            remaining_depth: MAX_DEPTH,
            options,
            host: Host::default(),
            state: ScopedReadState::default(),
        }
    }

    /// Replace the collaborators the reader consults.
    pub fn with_host(mut self, host: Host) -> Self {
        self.host = host;
        self
    }

    /// The options in effect.
    pub fn options(&self) -> &Options {
        &self.options
    }
}

impl<R> Parser<IoRead<R>>
where
    R: io::Read,
{
    /// Creates a reader from an `io::Read`.
    pub fn from_reader(reader: R) -> Self {
        Parser::new(IoRead::new(reader))
    }

    /// Creates a customized reader from an `io::Read`.
    pub fn from_reader_custom(reader: R, options: Options) -> Self {
        Parser::with_options(IoRead::new(reader), options)
    }
}

impl<'a> Parser<StrRead<'a>> {
    /// Creates a reader from a `&str`.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &'a str) -> Self {
        Parser::new(StrRead::new(s))
    }

    /// Creates a customized reader from a `&str`.
    pub fn from_str_custom(s: &'a str, options: Options) -> Self {
        Parser::with_options(StrRead::new(s), options)
    }
}

impl<R: Read> Parser<R> {
    /// Read a single form from the input source.
    ///
    /// At the end of input this fails or returns the configured value,
    /// depending on [`Options::with_eof`].
    ///
    /// ```
    /// # use cst_reader::{form, Parser};
    /// let mut parser = Parser::from_str("foo ;note\n(1 2)");
    /// assert_eq!(parser.read().unwrap(), form!(foo));
    /// assert_eq!(parser.read().unwrap().to_string(), ";note");
    /// assert_eq!(parser.read().unwrap(), form!((1 2)));
    /// assert!(parser.read().unwrap_err().is_eof());
    /// ```
    pub fn read(&mut self) -> Result<Form> {
        match self.read_opt()? {
            Some(form) => Ok(form),
            None => match &self.options.eof {
                Eof::Value(form) => Ok(form.clone()),
                Eof::Error => Err(self.annotate(Error::new(ErrorCode::EofWhileReading))),
            },
        }
    }

    /// Read a single form from the input source, returning `Ok(None)` at the
    /// end of input.
    ///
    /// ```
    /// # use cst_reader::{form, Parser};
    /// let mut parser = Parser::from_str("[a] :b");
    /// assert_eq!(parser.read_opt().unwrap(), Some(form!([a])));
    /// assert_eq!(parser.read_opt().unwrap(), Some(form!(:b)));
    /// assert_eq!(parser.read_opt().unwrap(), None);
    /// ```
    pub fn read_opt(&mut self) -> Result<Option<Form>> {
        let mut pending = PendingForms::new();
        let outcome = self.read_form(&mut pending, None);
        debug_assert!(self.state.is_clear());
        match outcome {
            Ok(Outcome::Form(form)) => Ok(Some(form)),
            Ok(Outcome::Eof) => Ok(None),
            Ok(Outcome::Closed) => Ok(None),
            Err(err) => Err(self.annotate(err)),
        }
    }

    /// Read forms until the end of input and collect them into a
    /// [`SyntaxNode::File`].
    ///
    /// ```
    /// # use cst_reader::Parser;
    /// let file = Parser::from_str("#!/usr/bin/env bb\n(ns app)  (run)").read_file().unwrap();
    /// assert_eq!(file.to_string(), "#!/usr/bin/env bb\n(ns app)\n(run)");
    /// ```
    pub fn read_file(&mut self) -> Result<Form> {
        let mut forms = Vec::new();
        while let Some(form) = self.read_opt()? {
            forms.push(form);
        }
        Ok(Form::syntax(SyntaxNode::File(forms)))
    }

    /// The `Parser::end` method should be called after a form has been fully
    /// read. This allows the `Parser` to validate that the input stream is at
    /// the end or that it only has trailing whitespace.
    pub fn end(&mut self) -> Result<()> {
        loop {
            match self.read.next()? {
                None => return Ok(()),
                Some(ch) if is_whitespace(ch) => {}
                Some(_) => {
                    return Err(self.annotate(Error::new(ErrorCode::TrailingCharacters)));
                }
            }
        }
    }

    /// Attaches the current position to an error leaving the outermost read.
    fn annotate(&self, err: Error) -> Error {
        match self.read.position() {
            Some(pos) => {
                debug!(line = pos.line, column = pos.column, error = %err, "read failed");
                err.at(pos.line, pos.column)
            }
            None => err,
        }
    }

    /// The driver loop. With `return_on`, reading that character ends the
    /// sequence being read.
    fn read_form(&mut self, pending: &mut PendingForms, return_on: Option<char>) -> Result<Outcome> {
        if self.host.read_eval() == ReadEval::Unknown {
            return Err(Error::new(ErrorCode::ReadingDisallowed));
        }
        loop {
            if let Some(form) = pending.pop_front() {
                return Ok(Outcome::Form(form));
            }

            let ch = loop {
                match self.read.next()? {
                    None => return Ok(Outcome::Eof),
                    Some(ch) if is_whitespace(ch) => {}
                    Some(ch) => break ch,
                }
            };

            if Some(ch) == return_on {
                return Ok(Outcome::Closed);
            }

            if ch.is_ascii_digit() {
                return Ok(Outcome::Form(Form::Number(read_number(&mut self.read, ch)?)));
            }

            if let Some(m) = macro_for(ch) {
                match self.run_macro(m, ch, pending)? {
                    Step::Value(form) => return Ok(Outcome::Form(form)),
                    Step::Continue => continue,
                }
            }

            if ch == '+' || ch == '-' {
                match self.read.next()? {
                    Some(next) if next.is_ascii_digit() => {
                        self.read.unread(next);
                        return Ok(Outcome::Form(Form::Number(read_number(&mut self.read, ch)?)));
                    }
                    Some(next) => self.read.unread(next),
                    None => {}
                }
            }

            let token = read_token(&mut self.read, ch)?;
            return interpret_token(&token, self.host.resolver()).map(Outcome::Form);
        }
    }

    /// Reads a form inside another construct, where the end of input is
    /// always an error.
    pub(crate) fn read_nested(&mut self, pending: &mut PendingForms) -> Result<Form> {
        self.descend(|p| match p.read_form(pending, None)? {
            Outcome::Form(form) => Ok(form),
            Outcome::Eof | Outcome::Closed => Err(Error::new(ErrorCode::EofWhileReading)),
        })
    }

    /// Reads forms up to `close`, which is consumed.
    pub(crate) fn read_delimited(
        &mut self,
        close: char,
        pending: &mut PendingForms,
    ) -> Result<Vec<Form>> {
        let first_line = self.read.position().map(|pos| pos.line);
        self.descend(|p| {
            let mut forms = Vec::new();
            loop {
                match p.read_form(pending, Some(close))? {
                    Outcome::Form(form) => forms.push(form),
                    Outcome::Closed => return Ok(forms),
                    Outcome::Eof => {
                        return Err(Error::new(ErrorCode::EofWhileReadingDelimited(first_line)));
                    }
                }
            }
        })
    }

    fn descend<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.remaining_depth == 0 {
            return Err(Error::new(ErrorCode::RecursionLimitExceeded));
        }
        self.remaining_depth -= 1;
        let ret = f(self);
        self.remaining_depth += 1;
        ret
    }

    /// Runs `f` inside `scope`, which is left again on every exit path.
    pub(crate) fn scoped<T>(
        &mut self,
        scope: Scope,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        self.state.push(scope);
        let ret = f(self);
        self.state.pop(scope);
        ret
    }
}

fn from_trait<R>(read: R, options: Options) -> Result<Form>
where
    R: Read,
{
    let mut parser = Parser::with_options(read, options);
    let form = parser.read()?;
    parser.end()?;

    Ok(form)
}

/// Read a form from an IO stream containing a single form.
///
/// The content of the IO stream is read directly from the stream
/// without being buffered in memory.
///
/// When reading from a source against which short reads are not efficient, such
/// as a [`File`], you will want to apply your own buffering, e.g. using
/// [`std::io::BufReader`].
///
/// ```
/// use std::error::Error;
/// use std::fs::File;
/// use std::io::BufReader;
/// use std::path::Path;
///
/// fn read_form_from_file<P: AsRef<Path>>(path: P) -> Result<cst_reader::Form, Box<dyn Error>> {
///     // Open the file in read-only mode with buffer.
///     let file = File::open(path)?;
///     let reader = BufReader::new(file);
///
///     // Read a form, allowing reader conditionals.
///     let options = cst_reader::parse::Options::new()
///         .with_read_cond(cst_reader::parse::ReadCond::Allow);
///     let form = cst_reader::from_reader_custom(reader, options)?;
///
///     // Return the form.
///     Ok(form)
/// }
///
/// fn main() {
/// # }
/// # fn fake_main() {
///     let form = read_form_from_file("deps.edn").unwrap();
///     println!("{:?}", form);
/// }
/// ```
///
/// [`File`]: https://doc.rust-lang.org/std/fs/struct.File.html
pub fn from_reader_custom(rdr: impl io::Read, options: Options) -> Result<Form> {
    from_trait(IoRead::new(rdr), options)
}

/// Read a form from an IO stream containing a single form, using the
/// default reader options.
///
/// See [`from_reader_custom`] for more information.
///
/// [`from_reader_custom`]: fn.from_reader_custom.html
pub fn from_reader(rdr: impl io::Read) -> Result<Form> {
    from_reader_custom(rdr, Options::default())
}

/// Read a form from a string slice containing a single form.
///
/// ```
/// use cst_reader::parse::{Options, ReadCond};
///
/// let form = cst_reader::from_str_custom("#?(:clj 1 :cljs 2)", Options::new().with_read_cond(ReadCond::Allow));
/// println!("{:?}", form);
/// ```
pub fn from_str_custom(s: &str, options: Options) -> Result<Form> {
    from_trait(StrRead::new(s), options)
}

/// Read a form from a string slice containing a single form, using the
/// default reader options.
///
/// See [`from_str_custom`] for more information.
///
/// [`from_str_custom`]: fn.from_str_custom.html
pub fn from_str(s: &str) -> Result<Form> {
    from_str_custom(s, Options::default())
}

mod dispatch;
mod error;
mod iter;
mod macros;
mod read;
mod scope;
mod token;

#[cfg(test)]
mod tests;
