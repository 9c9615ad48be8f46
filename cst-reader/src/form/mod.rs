//! The `Form` type: a parsed data value.
//!
//! Atoms (`nil`, booleans, numbers, characters, strings, symbols and
//! keywords) are plain variants; everything that carries source structure,
//! including the collections, is a [`SyntaxNode`] wrapped in
//! [`Form::Syntax`].

use std::fmt;

use crate::number::Number;
use crate::symbol::{Keyword, Symbol};
use crate::syntax::{List, SyntaxNode};

pub use self::index::Index;

mod from;
mod index;

/// Represents any valid form that can be read.
#[derive(PartialEq, Clone, Debug)]
pub enum Form {
    /// The `nil` literal.
    Nil,

    /// `true` or `false`.
    Bool(bool),

    /// A number literal.
    Number(Number),

    /// A character value. The reader produces [`SyntaxNode::Char`] instead,
    /// which keeps the source spelling.
    Char(char),

    /// A string literal, with escapes resolved.
    String(Box<str>),

    /// A symbol, possibly namespace-qualified.
    Symbol(Symbol),

    /// A keyword, possibly namespace-qualified.
    Keyword(Keyword),

    /// A regular expression literal, `#"..."`.
    Pattern(Pattern),

    /// A tagged literal, `#tag form`, kept uninterpreted.
    Tagged(Box<TaggedLiteral>),

    /// A syntax node reifying non-data source structure.
    Syntax(Box<SyntaxNode>),
}

/// A regular expression literal.
///
/// The source text is kept verbatim, including escapes; the compiled
/// regex is present when the pattern engine produced one.
#[derive(Clone)]
pub struct Pattern {
    source: Box<str>,
    regex: Option<regex::Regex>,
}

impl Pattern {
    /// Constructs a pattern from its verbatim source and an optional
    /// compiled regex.
    pub fn new(source: &str, regex: Option<regex::Regex>) -> Self {
        Pattern {
            source: source.into(),
            regex,
        }
    }

    /// The verbatim body of the literal, without the surrounding `#"` and `"`.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The compiled regex, if any.
    pub fn regex(&self) -> Option<&regex::Regex> {
        self.regex.as_ref()
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pattern({:?})", self.source)
    }
}

/// A tag symbol together with the form it applies to.
#[derive(PartialEq, Clone, Debug)]
pub struct TaggedLiteral {
    /// The tag, without the leading `#`.
    pub tag: Symbol,
    /// The tagged form.
    pub form: Form,
}

impl Form {
    /// Construct a symbol, splitting a namespace at the first `/`.
    ///
    /// ```
    /// # use cst_reader::Form;
    /// let sym = Form::symbol("clojure.core/map");
    /// assert_eq!(sym.as_symbol().and_then(|s| s.namespace()), Some("clojure.core"));
    /// ```
    pub fn symbol(name: &str) -> Self {
        Form::Symbol(Symbol::parse(name))
    }

    /// Construct a keyword from its name without the leading colon.
    pub fn keyword(name: &str) -> Self {
        Form::Keyword(Keyword::parse(name))
    }

    /// Construct a string.
    pub fn string(s: impl Into<Box<str>>) -> Self {
        Form::String(s.into())
    }

    /// Wrap a syntax node.
    pub fn syntax(node: SyntaxNode) -> Self {
        Form::Syntax(Box::new(node))
    }

    /// Construct a list without position metadata.
    pub fn list<I>(elements: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Form>,
    {
        Form::syntax(SyntaxNode::List(List::new(
            elements.into_iter().map(Into::into).collect(),
        )))
    }

    /// Construct a vector.
    pub fn vector<I>(elements: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Form>,
    {
        Form::syntax(SyntaxNode::Vector(
            elements.into_iter().map(Into::into).collect(),
        ))
    }

    /// Construct a map from its flat key/value element sequence.
    pub fn map<I>(elements: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Form>,
    {
        Form::syntax(SyntaxNode::Map(elements.into_iter().map(Into::into).collect()))
    }

    /// Construct a set.
    pub fn set<I>(elements: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Form>,
    {
        Form::syntax(SyntaxNode::Set(elements.into_iter().map(Into::into).collect()))
    }

    /// Construct a tagged literal.
    pub fn tagged(tag: Symbol, form: Form) -> Self {
        Form::Tagged(Box::new(TaggedLiteral { tag, form }))
    }

    /// Returns true for `nil`.
    pub fn is_nil(&self) -> bool {
        matches!(self, Form::Nil)
    }

    /// Returns true for syntax nodes that do not count as elements:
    /// comments, commas and discarded forms.
    ///
    /// ```
    /// # use cst_reader::{Form, SyntaxNode};
    /// assert!(Form::syntax(SyntaxNode::Comma).is_skippable());
    /// assert!(!Form::symbol("a").is_skippable());
    /// ```
    pub fn is_skippable(&self) -> bool {
        match self {
            Form::Syntax(node) => node.is_skippable(),
            _ => false,
        }
    }

    /// Returns true if metadata can be attached to this form with `^`.
    pub fn supports_meta(&self) -> bool {
        match self {
            Form::Symbol(_) => true,
            Form::Syntax(node) => matches!(
                **node,
                SyntaxNode::List(_)
                    | SyntaxNode::Vector(_)
                    | SyntaxNode::Map(_)
                    | SyntaxNode::Set(_)
                    | SyntaxNode::Meta(_)
            ),
            _ => false,
        }
    }

    /// Returns true for forms that are self-evaluating literals: keywords,
    /// numbers, characters and strings.
    pub fn is_literal(&self) -> bool {
        match self {
            Form::Keyword(_) | Form::Number(_) | Form::Char(_) | Form::String(_) => true,
            Form::Syntax(node) => matches!(**node, SyntaxNode::Char(_)),
            _ => false,
        }
    }

    /// If the form is a symbol, returns it.
    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            Form::Symbol(sym) => Some(sym),
            _ => None,
        }
    }

    /// If the form is a keyword, returns it.
    pub fn as_keyword(&self) -> Option<&Keyword> {
        match self {
            Form::Keyword(kw) => Some(kw),
            _ => None,
        }
    }

    /// If the form is a string, returns its contents.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Form::String(s) => Some(s),
            _ => None,
        }
    }

    /// If the form is a number, returns it.
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Form::Number(n) => Some(n),
            _ => None,
        }
    }

    /// If the form is an integer that fits into 64 bits, returns it.
    pub fn as_i64(&self) -> Option<i64> {
        self.as_number().and_then(Number::as_i64)
    }

    /// If the form is a character, either plain or as a syntax node,
    /// returns it.
    pub fn as_char(&self) -> Option<char> {
        match self {
            Form::Char(c) => Some(*c),
            Form::Syntax(node) => match &**node {
                SyntaxNode::Char(lit) => Some(lit.ch),
                _ => None,
            },
            _ => None,
        }
    }

    /// If the form is a syntax node, returns it.
    pub fn as_syntax(&self) -> Option<&SyntaxNode> {
        match self {
            Form::Syntax(node) => Some(node),
            _ => None,
        }
    }

    /// If the form is a list, returns it.
    pub fn as_list(&self) -> Option<&List> {
        match self.as_syntax() {
            Some(SyntaxNode::List(list)) => Some(list),
            _ => None,
        }
    }

    /// Returns the raw elements of a list, vector, map, set or file node,
    /// including skippable nodes.
    pub fn elements(&self) -> Option<&[Form]> {
        self.as_syntax().and_then(SyntaxNode::elements)
    }

    /// Returns the elements of a collection that carry data, leaving out
    /// comments, commas and discarded forms.
    ///
    /// ```
    /// # use cst_reader::Form;
    /// let list = cst_reader::from_str("(#_(1 2) 3 ;c\n)").unwrap();
    /// let data: Vec<_> = list.data_elements().unwrap().collect();
    /// assert_eq!(data, vec![&Form::from(3)]);
    /// ```
    pub fn data_elements(&self) -> Option<impl Iterator<Item = &Form>> {
        self.elements()
            .map(|elements| elements.iter().filter(|e| !e.is_skippable()))
    }

    /// Look up a value in a map, or an element in a sequence. Returns `None`
    /// if the form has the wrong shape or the entry does not exist.
    ///
    /// ```
    /// # use cst_reader::form;
    /// let data = form!({:a 1 :b [x y]});
    /// assert_eq!(data.get("b").and_then(|v| v.get(1)), Some(&form!(y)));
    /// assert!(data.get("c").is_none());
    /// ```
    pub fn get<I: Index>(&self, index: I) -> Option<&Form> {
        index.index_into(self)
    }
}

impl fmt::Display for Form {
    /// Emits the form's source text, see [`crate::print::emit`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::print::emit(self))
    }
}
