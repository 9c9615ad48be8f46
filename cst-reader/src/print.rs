//! Converting forms and syntax nodes back into source text.
//!
//! Literal forms are written by a [`Formatter`], which decides on their
//! canonical spelling. Syntax nodes are written by the [`Printer`] itself:
//! each node reproduces its own punctuation, so reading the emitted text
//! yields the same tree, comments and commas included.
//!
//! Whitespace is not preserved. Elements of a collection are separated by a
//! single space, except that no space is written before a comma and a line
//! comment is always followed by a newline.
//!
//! ```
//! # use cst_reader::print;
//! let form = cst_reader::from_str("(let [x 1,  y 2] ;; body\n  (+ x y))").unwrap();
//! assert_eq!(print::emit(&form), "(let [x 1, y 2] ;; body\n(+ x y))");
//! ```

use std::io;

use num_bigint::BigInt;

use crate::number::{self, Decimal, Number};
use crate::style;
use crate::symbol::{Keyword, Symbol};
use crate::syntax::{ArgRef, MetaKind, SyntaxNode};
use crate::Form;

/// Represents a character escape code in a type-safe manner.
pub enum CharEscape {
    /// An escaped quote `"`
    Quote,
    /// An escaped reverse solidus `\`
    ReverseSolidus,
    /// An escaped backspace character (usually escaped as `\b`)
    Backspace,
    /// An escaped form feed character (usually escaped as `\f`)
    FormFeed,
    /// An escaped line feed character (usually escaped as `\n`)
    LineFeed,
    /// An escaped carriage return character (usually escaped as `\r`)
    CarriageReturn,
    /// An escaped tab character (usually escaped as `\t`)
    Tab,
    /// An escaped ASCII plane control character (usually escaped as
    /// `\u00XX` where `XX` are two hex characters)
    AsciiControl(u8),
}

impl CharEscape {
    #[inline]
    fn from_escape_table(escape: u8, byte: u8) -> CharEscape {
        match escape {
            self::BB => CharEscape::Backspace,
            self::FF => CharEscape::FormFeed,
            self::TT => CharEscape::Tab,
            self::NN => CharEscape::LineFeed,
            self::RR => CharEscape::CarriageReturn,
            self::QU => CharEscape::Quote,
            self::BS => CharEscape::ReverseSolidus,
            self::UU => CharEscape::AsciiControl(byte),
            _ => unreachable!(),
        }
    }
}

/// The bracketed collections, each with its own delimiters.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Delimited {
    /// `(...)`
    List,
    /// `[...]`
    Vector,
    /// `{...}`
    Map,
    /// `#{...}`
    Set,
    /// `#?(...)`, or `#?@(...)` when splicing.
    Conditional {
        /// True for `#?@`.
        splicing: bool,
    },
}

impl Delimited {
    fn open(self) -> &'static [u8] {
        match self {
            Delimited::List => b"(",
            Delimited::Vector => b"[",
            Delimited::Map => b"{",
            Delimited::Set => b"#{",
            Delimited::Conditional { splicing: false } => b"#?(",
            Delimited::Conditional { splicing: true } => b"#?@(",
        }
    }

    fn close(self) -> &'static [u8] {
        match self {
            Delimited::List | Delimited::Conditional { .. } => b")",
            Delimited::Vector => b"]",
            Delimited::Map | Delimited::Set => b"}",
        }
    }
}

/// What goes between two adjacent elements.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Separator {
    /// Nothing, before the first element and before a comma.
    None,
    /// A single space.
    Space,
    /// A line break, after a line comment and between top-level forms.
    Newline,
}

impl Separator {
    /// The separator written between `prev` and `next` inside a collection,
    /// where `None` stands for a delimiter.
    pub fn between(prev: Option<&Form>, next: Option<&Form>) -> Separator {
        let prev = match prev {
            Some(prev) => prev,
            None => return Separator::None,
        };
        if ends_with_comment(prev) {
            return Separator::Newline;
        }
        match next {
            None => Separator::None,
            Some(next) if is_comma(next) => Separator::None,
            Some(_) => Separator::Space,
        }
    }
}

fn is_comment(form: &Form) -> bool {
    matches!(
        form.as_syntax(),
        Some(SyntaxNode::LineComment(_)) | Some(SyntaxNode::ShebangComment(_))
    )
}

// A comment can end a form from inside a prefix node, as in `#_;c` or
// `#tag ;c`.
fn ends_with_comment(form: &Form) -> bool {
    if is_comment(form) {
        return true;
    }
    match form {
        Form::Tagged(tagged) => ends_with_comment(&tagged.form),
        Form::Syntax(node) => node.inner().map_or(false, ends_with_comment),
        _ => false,
    }
}

fn is_comma(form: &Form) -> bool {
    matches!(form.as_syntax(), Some(SyntaxNode::Comma))
}

/// This trait abstracts away writing the pieces of source text.
///
/// The default methods produce Clojure notation.
pub trait Formatter {
    /// Writes `nil` to the specified writer.
    #[inline]
    fn write_nil<W: ?Sized>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: io::Write,
    {
        writer.write_all(b"nil")
    }

    /// Writes `true` or `false` to the specified writer.
    #[inline]
    fn write_bool<W: ?Sized>(&mut self, writer: &mut W, value: bool) -> io::Result<()>
    where
        W: io::Write,
    {
        writer.write_all(if value { b"true" as &[u8] } else { b"false" })
    }

    /// Writes a number to the specified writer.
    ///
    /// Big integers get an `N` suffix, decimals an `M` suffix, and
    /// non-finite floats are written as `##Inf`, `##-Inf` and `##NaN`.
    fn write_number<W: ?Sized>(&mut self, writer: &mut W, value: &Number) -> io::Result<()>
    where
        W: io::Write,
    {
        struct Write<'a, W: io::Write + ?Sized> {
            writer: &'a mut W,
        }
        impl<'a, W: io::Write + ?Sized> number::Visitor for Write<'a, W> {
            type Value = ();
            type Error = io::Error;

            fn visit_i64(self, n: i64) -> io::Result<()> {
                let mut buffer = itoa::Buffer::new();
                self.writer.write_all(buffer.format(n).as_bytes())
            }
            fn visit_big_int(self, n: &BigInt) -> io::Result<()> {
                write!(self.writer, "{}N", n)
            }
            fn visit_ratio(self, numerator: &BigInt, denominator: &BigInt) -> io::Result<()> {
                write!(self.writer, "{}/{}", numerator, denominator)
            }
            fn visit_f64(self, n: f64) -> io::Result<()> {
                if n.is_nan() {
                    self.writer.write_all(b"##NaN")
                } else if n.is_infinite() {
                    let text = if n > 0.0 { "##Inf" } else { "##-Inf" };
                    self.writer.write_all(text.as_bytes())
                } else {
                    let mut buffer = ryu::Buffer::new();
                    self.writer.write_all(buffer.format_finite(n).as_bytes())
                }
            }
            fn visit_decimal(self, d: &Decimal) -> io::Result<()> {
                write!(self.writer, "{}M", d)
            }
        }
        value.visit(Write { writer })
    }

    /// Writes a character value like `\a`, `\newline` or `\u0007`.
    fn write_char<W: ?Sized>(&mut self, writer: &mut W, c: char) -> io::Result<()>
    where
        W: io::Write,
    {
        if let Some(name) = style::name_for_char(c) {
            write!(writer, "\\{}", name)
        } else if c.is_control() || c.is_whitespace() {
            write!(writer, "\\u{:04X}", u32::from(c))
        } else {
            write!(writer, "\\{}", c)
        }
    }

    /// Writes a character literal exactly as it was spelled in the source,
    /// `token` being the text after the backslash.
    #[inline]
    fn write_char_token<W: ?Sized>(&mut self, writer: &mut W, token: &str) -> io::Result<()>
    where
        W: io::Write,
    {
        writer.write_all(b"\\")?;
        writer.write_all(token.as_bytes())
    }

    /// Called before each series of `write_string_fragment` and
    /// `write_char_escape`.  Writes a `"` to the specified writer.
    #[inline]
    fn begin_string<W: ?Sized>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: io::Write,
    {
        writer.write_all(b"\"")
    }

    /// Called after each series of `write_string_fragment` and
    /// `write_char_escape`.  Writes a `"` to the specified writer.
    #[inline]
    fn end_string<W: ?Sized>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: io::Write,
    {
        writer.write_all(b"\"")
    }

    /// Writes a string fragment that doesn't need any escaping to the specified
    /// writer.
    #[inline]
    fn write_string_fragment<W: ?Sized>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: io::Write,
    {
        writer.write_all(fragment.as_bytes())
    }

    /// Writes a character escape code to the specified writer.
    #[inline]
    fn write_char_escape<W: ?Sized>(
        &mut self,
        writer: &mut W,
        char_escape: CharEscape,
    ) -> io::Result<()>
    where
        W: io::Write,
    {
        use self::CharEscape::*;

        let s = match char_escape {
            Quote => b"\\\"",
            ReverseSolidus => b"\\\\",
            Backspace => b"\\b",
            FormFeed => b"\\f",
            LineFeed => b"\\n",
            CarriageReturn => b"\\r",
            Tab => b"\\t",
            AsciiControl(byte) => {
                static HEX_DIGITS: [u8; 16] = *b"0123456789ABCDEF";
                let bytes = &[
                    b'\\',
                    b'u',
                    b'0',
                    b'0',
                    HEX_DIGITS[(byte >> 4) as usize],
                    HEX_DIGITS[(byte & 0xF) as usize],
                ];
                return writer.write_all(bytes);
            }
        };

        writer.write_all(s)
    }

    /// Writes a symbol to the specified writer.
    #[inline]
    fn write_symbol<W: ?Sized>(&mut self, writer: &mut W, symbol: &Symbol) -> io::Result<()>
    where
        W: io::Write,
    {
        write!(writer, "{}", symbol)
    }

    /// Writes a keyword, including its leading colon.
    #[inline]
    fn write_keyword<W: ?Sized>(&mut self, writer: &mut W, keyword: &Keyword) -> io::Result<()>
    where
        W: io::Write,
    {
        write!(writer, "{}", keyword)
    }

    /// Writes a regex literal from its verbatim source.
    #[inline]
    fn write_pattern<W: ?Sized>(&mut self, writer: &mut W, source: &str) -> io::Result<()>
    where
        W: io::Write,
    {
        writer.write_all(b"#\"")?;
        writer.write_all(source.as_bytes())?;
        writer.write_all(b"\"")
    }

    /// Writes the fixed punctuation of a syntax node, such as `'`, `~@` or
    /// `#_`.
    #[inline]
    fn write_punct<W: ?Sized>(&mut self, writer: &mut W, punct: &str) -> io::Result<()>
    where
        W: io::Write,
    {
        writer.write_all(punct.as_bytes())
    }

    /// Writes the opening delimiter of a collection.
    #[inline]
    fn begin_delimited<W: ?Sized>(&mut self, writer: &mut W, kind: Delimited) -> io::Result<()>
    where
        W: io::Write,
    {
        writer.write_all(kind.open())
    }

    /// Writes the closing delimiter of a collection.
    #[inline]
    fn end_delimited<W: ?Sized>(&mut self, writer: &mut W, kind: Delimited) -> io::Result<()>
    where
        W: io::Write,
    {
        writer.write_all(kind.close())
    }

    /// Writes what goes between two elements, or between an element and a
    /// delimiter.
    #[inline]
    fn write_separator<W: ?Sized>(&mut self, writer: &mut W, separator: Separator) -> io::Result<()>
    where
        W: io::Write,
    {
        match separator {
            Separator::None => Ok(()),
            Separator::Space => writer.write_all(b" "),
            Separator::Newline => writer.write_all(b"\n"),
        }
    }
}

/// This structure writes forms using the default Clojure notation.
#[derive(Clone, Debug)]
pub struct DefaultFormatter;

impl Formatter for DefaultFormatter {}

/// A printer for forms and syntax nodes.
#[derive(Debug)]
pub struct Printer<W, F = DefaultFormatter> {
    writer: W,
    formatter: F,
}

impl<W> Printer<W>
where
    W: io::Write,
{
    /// Creates a new printer using the default formatter.
    #[inline]
    pub fn new(writer: W) -> Self {
        Printer::with_formatter(writer, DefaultFormatter)
    }
}

impl<W, F> Printer<W, F>
where
    W: io::Write,
    F: Formatter,
{
    /// Creates a new printer whose output will be written to the writer
    /// specified.
    #[inline]
    pub fn with_formatter(writer: W, formatter: F) -> Self {
        Printer { writer, formatter }
    }

    /// Unwrap the `Writer` from the `Printer`.
    #[inline]
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Output the source text of the specified form to the underlying
    /// writer.
    pub fn print(&mut self, form: &Form) -> io::Result<()> {
        match form {
            Form::Nil => self.formatter.write_nil(&mut self.writer),
            Form::Bool(b) => self.formatter.write_bool(&mut self.writer, *b),
            Form::Number(n) => self.formatter.write_number(&mut self.writer, n),
            Form::Char(c) => self.formatter.write_char(&mut self.writer, *c),
            Form::String(s) => format_escaped_str(&mut self.writer, &mut self.formatter, s),
            Form::Symbol(sym) => self.formatter.write_symbol(&mut self.writer, sym),
            Form::Keyword(kw) => self.formatter.write_keyword(&mut self.writer, kw),
            Form::Pattern(pattern) => self
                .formatter
                .write_pattern(&mut self.writer, pattern.source()),
            Form::Tagged(tagged) => {
                self.formatter.write_punct(&mut self.writer, "#")?;
                self.formatter.write_symbol(&mut self.writer, &tagged.tag)?;
                self.formatter
                    .write_separator(&mut self.writer, Separator::Space)?;
                self.print(&tagged.form)
            }
            Form::Syntax(node) => self.print_node(node),
        }
    }

    fn print_node(&mut self, node: &SyntaxNode) -> io::Result<()> {
        match node {
            SyntaxNode::Quote(form) => self.print_prefixed("'", form),
            SyntaxNode::Deref(form) => self.print_prefixed("@", form),
            SyntaxNode::SyntaxQuote(sq) => self.print_prefixed("`", &sq.form),
            SyntaxNode::Unquote(form) => self.print_prefixed("~", form),
            SyntaxNode::UnquoteSplicing(form) => self.print_prefixed("~@", form),
            SyntaxNode::Eval(form) => self.print_prefixed("#=", form),
            SyntaxNode::Var(form) => self.print_prefixed("#'", form),
            SyntaxNode::FnLiteral(form) => self.print_prefixed("#", form),
            SyntaxNode::Discard(form) => self.print_prefixed("#_", form),
            SyntaxNode::Meta(meta) => {
                self.formatter.write_punct(&mut self.writer, "^")?;
                match &meta.meta {
                    MetaKind::Tag(form) | MetaKind::Map(form) => self.print(form)?,
                    MetaKind::Flag(kw) => self.formatter.write_keyword(&mut self.writer, kw)?,
                }
                self.formatter
                    .write_separator(&mut self.writer, Separator::Space)?;
                self.print(&meta.object)
            }
            SyntaxNode::Char(lit) => self.formatter.write_char_token(&mut self.writer, &lit.token),
            SyntaxNode::Arg(arg) => match arg {
                ArgRef::Implicit => self.formatter.write_punct(&mut self.writer, "%"),
                ArgRef::Rest => self.formatter.write_punct(&mut self.writer, "%&"),
                ArgRef::Index(n) => {
                    self.formatter.write_punct(&mut self.writer, "%")?;
                    let mut buffer = itoa::Buffer::new();
                    self.formatter
                        .write_punct(&mut self.writer, buffer.format(*n))
                }
            },
            SyntaxNode::LineComment(text) => self.print_prefixed_text(";", text),
            SyntaxNode::ShebangComment(text) => self.print_prefixed_text("#!", text),
            SyntaxNode::Comma => self.formatter.write_punct(&mut self.writer, ","),
            SyntaxNode::Conditional(cond) => self.print_delimited(
                Delimited::Conditional {
                    splicing: cond.splicing,
                },
                &cond.elements,
            ),
            SyntaxNode::Set(elements) => self.print_delimited(Delimited::Set, elements),
            SyntaxNode::Vector(elements) => self.print_delimited(Delimited::Vector, elements),
            SyntaxNode::Map(elements) => self.print_delimited(Delimited::Map, elements),
            SyntaxNode::List(list) => self.print_delimited(Delimited::List, &list.elements),
            SyntaxNode::File(forms) => {
                for (i, form) in forms.iter().enumerate() {
                    if i > 0 {
                        self.formatter
                            .write_separator(&mut self.writer, Separator::Newline)?;
                    }
                    self.print(form)?;
                }
                Ok(())
            }
        }
    }

    fn print_prefixed(&mut self, prefix: &str, form: &Form) -> io::Result<()> {
        self.formatter.write_punct(&mut self.writer, prefix)?;
        self.print(form)
    }

    fn print_prefixed_text(&mut self, prefix: &str, text: &str) -> io::Result<()> {
        self.formatter.write_punct(&mut self.writer, prefix)?;
        self.formatter.write_punct(&mut self.writer, text)
    }

    fn print_delimited(&mut self, kind: Delimited, elements: &[Form]) -> io::Result<()> {
        self.formatter.begin_delimited(&mut self.writer, kind)?;
        let mut prev = None;
        for element in elements {
            let separator = Separator::between(prev, Some(element));
            self.formatter.write_separator(&mut self.writer, separator)?;
            self.print(element)?;
            prev = Some(element);
        }
        let separator = Separator::between(prev, None);
        self.formatter.write_separator(&mut self.writer, separator)?;
        self.formatter.end_delimited(&mut self.writer, kind)
    }
}

impl<W, F> io::Write for Printer<W, F>
where
    W: io::Write,
{
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    #[inline]
    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

fn format_escaped_str<W: ?Sized, F: ?Sized>(
    writer: &mut W,
    formatter: &mut F,
    value: &str,
) -> io::Result<()>
where
    W: io::Write,
    F: Formatter,
{
    formatter.begin_string(writer)?;
    format_escaped_str_contents(writer, formatter, value)?;
    formatter.end_string(writer)?;
    Ok(())
}

fn format_escaped_str_contents<W: ?Sized, F: ?Sized>(
    writer: &mut W,
    formatter: &mut F,
    value: &str,
) -> io::Result<()>
where
    W: io::Write,
    F: Formatter,
{
    let bytes = value.as_bytes();

    let mut start = 0;

    for (i, &byte) in bytes.iter().enumerate() {
        let escape = ESCAPE[byte as usize];
        if escape == 0 {
            continue;
        }

        if start < i {
            formatter.write_string_fragment(writer, &value[start..i])?;
        }

        let char_escape = CharEscape::from_escape_table(escape, byte);
        formatter.write_char_escape(writer, char_escape)?;

        start = i + 1;
    }

    if start != bytes.len() {
        formatter.write_string_fragment(writer, &value[start..])?;
    }

    Ok(())
}

const BB: u8 = b'b'; // \x08
const TT: u8 = b't'; // \x09
const NN: u8 = b'n'; // \x0A
const FF: u8 = b'f'; // \x0C
const RR: u8 = b'r'; // \x0D
const QU: u8 = b'"'; // \x22
const BS: u8 = b'\\'; // \x5C
const UU: u8 = b'u'; // \x00...\x1F except the ones above, and \x7F
const __: u8 = 0;

// Lookup table of escape sequences. A value of b'x' at index i means that byte
// i is escaped as "\x" inside a string literal. A value of 0 means that byte i
// is not escaped.
static ESCAPE: [u8; 256] = [
    //   1   2   3   4   5   6   7   8   9   A   B   C   D   E   F
    UU, UU, UU, UU, UU, UU, UU, UU, BB, TT, NN, UU, FF, RR, UU, UU, // 0
    UU, UU, UU, UU, UU, UU, UU, UU, UU, UU, UU, UU, UU, UU, UU, UU, // 1
    __, __, QU, __, __, __, __, __, __, __, __, __, __, __, __, __, // 2
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 3
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 4
    __, __, __, __, __, __, __, __, __, __, __, __, BS, __, __, __, // 5
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 6
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, UU, // 7
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 8
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 9
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // A
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // B
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // C
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // D
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // E
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // F
];

/// Write the source text of a form into the IO stream.
#[inline]
pub fn to_writer<W: io::Write>(writer: W, form: &Form) -> io::Result<()> {
    let mut printer = Printer::new(writer);
    printer.print(form)?;
    Ok(())
}

/// Write the source text of a form into the IO stream, using a custom
/// formatter.
#[inline]
pub fn to_writer_custom<W, F>(writer: W, form: &Form, formatter: F) -> io::Result<()>
where
    W: io::Write,
    F: Formatter,
{
    let mut printer = Printer::with_formatter(writer, formatter);
    printer.print(form)?;
    Ok(())
}

/// The source text of a form as a byte vector.
#[inline]
pub fn to_vec(form: &Form) -> io::Result<Vec<u8>> {
    let mut writer = Vec::with_capacity(128);
    to_writer(&mut writer, form)?;
    Ok(writer)
}

/// The source text of a form as a string.
#[inline]
pub fn to_string(form: &Form) -> io::Result<String> {
    let vec = to_vec(form)?;
    String::from_utf8(vec).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// The source text of a form.
///
/// Reading the result yields a form equal to `form`, with the same
/// comments, commas and discarded forms. Emitting that form again yields
/// the same text.
///
/// ```
/// # use cst_reader::print::emit;
/// let form = cst_reader::from_str("[#_(1 2) 3 ;c\n]").unwrap();
/// assert_eq!(emit(&form), "[#_(1 2) 3 ;c\n]");
/// ```
pub fn emit(form: &Form) -> String {
    let mut writer = Vec::with_capacity(128);
    match to_writer(&mut writer, form) {
        Ok(()) => String::from_utf8_lossy(&writer).into_owned(),
        // Writing into a `Vec` does not fail.
        Err(_) => String::new(),
    }
}
