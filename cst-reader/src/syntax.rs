//! Syntax nodes: the concrete syntax tree on top of plain data.
//!
//! Each reader macro produces a node that keeps exactly what is needed to
//! write its text back out. Comments, commas and discarded forms are
//! *skippable*: they are kept in element sequences for emission but do not
//! count as elements.

use crate::parse::Position;
use crate::symbol::{Keyword, Symbol};
use crate::Form;

/// A syntax node, see the [module documentation](index.html).
#[derive(PartialEq, Clone, Debug)]
pub enum SyntaxNode {
    /// `'form`
    Quote(Form),
    /// `@form`
    Deref(Form),
    /// `^meta form`
    Meta(Meta),
    /// `` `form ``
    SyntaxQuote(SyntaxQuote),
    /// `~form`
    Unquote(Form),
    /// `~@form`
    UnquoteSplicing(Form),
    /// `\c`, `\newline`, `A`, `\o101`
    Char(CharLiteral),
    /// `%`, `%N` or `%&` inside an anonymous function literal.
    Arg(ArgRef),
    /// `#=form`
    Eval(Form),
    /// `#'form`
    Var(Form),
    /// `#(...)`; the payload is the list.
    FnLiteral(Form),
    /// `;text`, without the leading semicolon.
    LineComment(String),
    /// `#!text`, without the leading `#!`.
    ShebangComment(String),
    /// `#_form`
    Discard(Form),
    /// `#?(...)` or `#?@(...)`
    Conditional(Conditional),
    /// `#{...}`
    Set(Vec<Form>),
    /// `[...]`
    Vector(Vec<Form>),
    /// `(...)`
    List(List),
    /// `{...}`, as a flat key/value sequence.
    Map(Vec<Form>),
    /// `,`
    Comma,
    /// A sequence of top-level forms, one per line.
    File(Vec<Form>),
}

impl SyntaxNode {
    /// Returns true for comments, commas and discarded forms.
    pub fn is_skippable(&self) -> bool {
        matches!(
            self,
            SyntaxNode::Comma
                | SyntaxNode::LineComment(_)
                | SyntaxNode::ShebangComment(_)
                | SyntaxNode::Discard(_)
        )
    }

    /// The raw elements of a list, vector, map, set, conditional or file,
    /// including skippable nodes.
    pub fn elements(&self) -> Option<&[Form]> {
        match self {
            SyntaxNode::List(list) => Some(&list.elements),
            SyntaxNode::Conditional(cond) => Some(&cond.elements),
            SyntaxNode::Vector(elements)
            | SyntaxNode::Map(elements)
            | SyntaxNode::Set(elements)
            | SyntaxNode::File(elements) => Some(elements),
            _ => None,
        }
    }

    /// The wrapped form of a single-child node such as `Quote` or `Discard`.
    pub fn inner(&self) -> Option<&Form> {
        match self {
            SyntaxNode::Quote(form)
            | SyntaxNode::Deref(form)
            | SyntaxNode::Unquote(form)
            | SyntaxNode::UnquoteSplicing(form)
            | SyntaxNode::Eval(form)
            | SyntaxNode::Var(form)
            | SyntaxNode::FnLiteral(form)
            | SyntaxNode::Discard(form) => Some(form),
            SyntaxNode::SyntaxQuote(sq) => Some(&sq.form),
            SyntaxNode::Meta(meta) => Some(&meta.object),
            _ => None,
        }
    }
}

/// Metadata as an ordered association of keywords to values.
///
/// The reader records the source position of lists under `:line` and
/// `:column`.
#[derive(Clone, Debug, Default)]
pub struct Metadata {
    entries: Vec<(Keyword, Form)>,
}

impl Metadata {
    /// Metadata without entries.
    pub fn new() -> Self {
        Metadata::default()
    }

    /// Metadata holding a source position.
    pub fn at(position: Position) -> Self {
        let mut meta = Metadata::new();
        meta.insert(Keyword::new(None, "line"), Form::from(position.line as u64));
        meta.insert(Keyword::new(None, "column"), Form::from(position.column as u64));
        meta
    }

    /// Sets `key` to `value`, replacing a previous entry.
    pub fn insert(&mut self, key: Keyword, value: Form) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Looks up the value stored under `key`.
    pub fn get(&self, key: &Keyword) -> Option<&Form> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// The source position, if recorded.
    pub fn position(&self) -> Option<Position> {
        let line = self.get(&Keyword::new(None, "line"))?.as_i64()?;
        let column = self.get(&Keyword::new(None, "column"))?.as_i64()?;
        Some(Position {
            line: line as usize,
            column: column as usize,
        })
    }

    /// A copy without the `:line` and `:column` entries.
    pub fn without_position(&self) -> Metadata {
        Metadata {
            entries: self
                .entries
                .iter()
                .filter(|(k, _)| {
                    k.namespace().is_some() || (k.name() != "line" && k.name() != "column")
                })
                .cloned()
                .collect(),
        }
    }

    /// Returns true if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &(Keyword, Form)> {
        self.entries.iter()
    }

    /// The entries as a map form.
    pub fn to_form(&self) -> Form {
        Form::map(
            self.entries
                .iter()
                .flat_map(|(k, v)| vec![Form::Keyword(k.clone()), v.clone()]),
        )
    }
}

/// A list together with its metadata.
///
/// Equality ignores metadata.
#[derive(Clone, Debug)]
pub struct List {
    /// The raw elements, including skippable nodes.
    pub elements: Vec<Form>,
    /// Metadata attached by the reader or the caller.
    pub meta: Metadata,
}

impl List {
    /// A list without metadata.
    pub fn new(elements: Vec<Form>) -> Self {
        List {
            elements,
            meta: Metadata::new(),
        }
    }

    /// Replaces the metadata.
    pub fn with_meta(mut self, meta: Metadata) -> Self {
        self.meta = meta;
        self
    }

    /// The elements that carry data.
    pub fn data(&self) -> impl Iterator<Item = &Form> {
        self.elements.iter().filter(|e| !e.is_skippable())
    }
}

impl PartialEq for List {
    fn eq(&self, other: &Self) -> bool {
        self.elements == other.elements
    }
}

/// The payload of `` `form ``.
///
/// The form is kept as written. The auto-gensyms it uses (simple symbols
/// ending in `#`, outside unquotes) are listed with the symbols they stand
/// for. Equality ignores the generated names.
#[derive(Clone, Debug)]
pub struct SyntaxQuote {
    /// The quoted form.
    pub form: Form,
    /// Auto-gensyms and their generated symbols, in order of first use.
    pub gensyms: Vec<(Symbol, Symbol)>,
}

impl SyntaxQuote {
    /// A syntax-quote without auto-gensyms.
    pub fn new(form: Form) -> Self {
        SyntaxQuote {
            form,
            gensyms: Vec::new(),
        }
    }

    /// The generated symbol standing for the auto-gensym `sym`.
    ///
    /// ```
    /// # use cst_reader::{Symbol, SyntaxNode};
    /// let form = cst_reader::from_str("`(let [x# 1] x#)").unwrap();
    /// let sq = match form.as_syntax() {
    ///     Some(SyntaxNode::SyntaxQuote(sq)) => sq,
    ///     _ => panic!("not a syntax-quote"),
    /// };
    /// let generated = sq.gensym(&Symbol::simple("x#")).unwrap();
    /// assert_eq!(generated.name(), "x__1__auto__");
    /// ```
    pub fn gensym(&self, sym: &Symbol) -> Option<&Symbol> {
        self.gensyms
            .iter()
            .find(|(auto, _)| auto == sym)
            .map(|(_, generated)| generated)
    }
}

impl PartialEq for SyntaxQuote {
    fn eq(&self, other: &Self) -> bool {
        self.form == other.form
    }
}

/// The payload of `^meta object`.
#[derive(Clone, Debug)]
pub struct Meta {
    /// What was written after the caret.
    pub meta: MetaKind,
    /// The annotated form.
    pub object: Form,
    /// Position of the caret, recorded when the object is a list and the
    /// source tracks positions.
    pub position: Option<Position>,
}

impl PartialEq for Meta {
    fn eq(&self, other: &Self) -> bool {
        self.meta == other.meta && self.object == other.object
    }
}

/// The three spellings of metadata.
#[derive(PartialEq, Clone, Debug)]
pub enum MetaKind {
    /// `^Symbol` or `^"String"`, a type hint.
    Tag(Form),
    /// `^:keyword`, shorthand for `{:keyword true}`.
    Flag(Keyword),
    /// `^{...}`
    Map(Form),
}

/// A character literal together with its source spelling.
#[derive(PartialEq, Clone, Debug)]
pub struct CharLiteral {
    /// The token after the backslash, such as `a`, `newline` or `u0041`.
    pub token: Box<str>,
    /// The character denoted.
    pub ch: char,
}

/// The argument an arg literal refers to.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum ArgRef {
    /// `%`, the first argument.
    Implicit,
    /// `%N`
    Index(u32),
    /// `%&`, the rest arguments.
    Rest,
}

/// A reader conditional, kept unevaluated.
///
/// Equality ignores the position.
#[derive(Clone, Debug)]
pub struct Conditional {
    /// True for `#?@`.
    pub splicing: bool,
    /// The raw body elements, including skippable nodes.
    pub elements: Vec<Form>,
    /// Position of the opening parenthesis, when the source tracks
    /// positions.
    pub position: Option<Position>,
}

impl PartialEq for Conditional {
    fn eq(&self, other: &Self) -> bool {
        self.splicing == other.splicing && self.elements == other.elements
    }
}

impl Conditional {
    /// The feature/form pairs, leaving out skippable nodes.
    ///
    /// ```
    /// # use cst_reader::{parse::{Options, ReadCond}, Form};
    /// let opts = Options::default().with_read_cond(ReadCond::Allow);
    /// let form = cst_reader::from_str_custom("#?(:clj 1 :cljs 2)", opts).unwrap();
    /// let cond = match form.as_syntax() {
    ///     Some(cst_reader::SyntaxNode::Conditional(cond)) => cond,
    ///     _ => panic!("not a conditional"),
    /// };
    /// let features: Vec<_> = cond.pairs().map(|(k, _)| k.clone()).collect();
    /// assert_eq!(features, vec![Form::keyword("clj"), Form::keyword("cljs")]);
    /// ```
    pub fn pairs(&self) -> impl Iterator<Item = (&Form, &Form)> {
        let data: Vec<&Form> = self.elements.iter().filter(|e| !e.is_skippable()).collect();
        data.chunks(2)
            .filter_map(|pair| match pair {
                [feature, form] => Some((*feature, *form)),
                _ => None,
            })
            .collect::<Vec<_>>()
            .into_iter()
    }
}
