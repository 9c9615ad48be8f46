#![deny(missing_docs)]

//! This crate provides a reader for Clojure source text that keeps the
//! text's syntactic structure around, so that tools like formatters,
//! linters and refactoring engines can write the source back out.
//!
//! An ordinary Lisp reader throws away everything that is not data:
//! comments, commas, `#_` discards, the quoting punctuation, and the
//! unselected branches of reader conditionals. This reader keeps all of
//! them, as [`SyntaxNode`]s inside the [`Form`] tree it returns:
//!
//! ```
//! use cst_reader::{Form, SyntaxNode};
//!
//! let form = cst_reader::from_str("(+ 1 #_2 3) ").unwrap();
//! let elements = form.elements().unwrap();
//! assert_eq!(elements.len(), 4);
//! assert_eq!(elements[2], Form::syntax(SyntaxNode::Discard(Form::from(2))));
//!
//! // Skippable nodes do not count as data.
//! assert_eq!(form.data_elements().unwrap().count(), 3);
//!
//! // And the form can be written back out.
//! assert_eq!(form.to_string(), "(+ 1 #_2 3)");
//! ```
//!
//! # Forms
//!
//! A [`Form`] is either an atom (`nil`, a boolean, a [`Number`], a
//! character, a string, a [`Symbol`], a [`Keyword`], a regex pattern or a
//! tagged literal) or a [`SyntaxNode`]. Collections are syntax nodes too,
//! since their element sequences hold comments and commas next to the data.
//!
//! Numbers cover the full Clojure numeric tower: 64-bit integers,
//! arbitrary-precision integers (`42N`), ratios (`1/3`), doubles and exact
//! decimals (`1.5M`).
//!
//! # Reading
//!
//! [`from_str`] and [`from_reader`] read a single form; a [`Parser`] reads
//! forms one at a time, or a whole file at once with
//! [`Parser::read_file`]. Reader behavior is tuned with
//! [`parse::Options`]: the end-of-input policy, reader conditional
//! handling, the active platform features, and whether trivia (comments,
//! commas, discards) is kept at all.
//!
//! Anything that depends on the state of a running program, like the
//! current namespace, namespace aliases, the `#tag` data readers and
//! record types, is supplied by a [`host::Host`].
//!
//! # Emitting
//!
//! [`print::emit`] turns a form back into text. Emission is not
//! byte-identical to the input, since whitespace is normalized, but reading
//! the emitted text yields the same tree again.
//!
//! ```
//! let source = "[1 2, 3 ;; three\n]";
//! let form = cst_reader::from_str(source).unwrap();
//! let text = cst_reader::emit(&form);
//! assert_eq!(cst_reader::from_str(&text).unwrap(), form);
//! ```

extern crate self as cst_reader;

/// Construct a [`Form`] using syntax similar to Clojure data notation.
///
/// Lists, vectors, maps and sets are written as in Clojure. Keywords are
/// written with a leading colon. Symbols and keywords containing
/// characters Rust does not allow in identifiers are written as string
/// literals, prefixed with `#` for symbols and `:` for keywords. A comma
/// followed by a Rust expression inserts that expression's value.
///
/// ```
/// # use cst_reader::{form, Form};
/// let n = 3;
/// let data = form!({:name #"kebab-name" :tags #{a b} :values [1 -2 ,n]});
/// assert_eq!(data.get("name"), Some(&Form::symbol("kebab-name")));
/// assert_eq!(data.get("values").and_then(|v| v.get(2)), Some(&Form::from(3)));
/// assert_eq!(form!(:"user/id"), Form::keyword("user/id"));
/// assert_eq!(form!((nil true false)).to_string(), "(nil true false)");
/// ```
#[cfg(feature = "form-macro")]
pub use cst_reader_macros::form;

mod style;

pub mod form;
pub mod host;
pub mod number;
pub mod parse;
pub mod print;
pub mod symbol;
pub mod syntax;

#[doc(inline)]
pub use self::parse::{from_reader, from_reader_custom, from_str, from_str_custom, Error, Parser};

#[doc(inline)]
pub use self::print::{emit, to_string, to_vec, to_writer, Printer};

#[doc(inline)]
pub use self::form::{Form, Index};

#[doc(inline)]
pub use self::syntax::SyntaxNode;

#[doc(inline)]
pub use self::symbol::{Keyword, Symbol};

#[doc(inline)]
pub use self::number::Number;
