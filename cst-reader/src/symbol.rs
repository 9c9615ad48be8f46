//! Namespace-qualified symbols and keywords.

use std::fmt::{self, Display};

/// A symbol, optionally qualified by a namespace.
///
/// Symbols are written as `name` or `namespace/name`. The single character
/// `/` is a valid symbol name on its own, as is `namespace//`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol {
    ns: Option<Box<str>>,
    name: Box<str>,
}

impl Symbol {
    /// Constructs a symbol from an optional namespace and a name.
    pub fn new(ns: Option<&str>, name: &str) -> Self {
        Symbol {
            ns: ns.map(Into::into),
            name: name.into(),
        }
    }

    /// Constructs an unqualified symbol.
    pub fn simple(name: &str) -> Self {
        Symbol::new(None, name)
    }

    /// Splits `text` at the first `/` into namespace and name.
    ///
    /// A lone `/` and text without a slash produce an unqualified symbol.
    ///
    /// ```
    /// use cst_reader::Symbol;
    ///
    /// let sym = Symbol::parse("clojure.core/map");
    /// assert_eq!(sym.namespace(), Some("clojure.core"));
    /// assert_eq!(sym.name(), "map");
    /// assert_eq!(Symbol::parse("/").name(), "/");
    /// ```
    pub fn parse(text: &str) -> Self {
        match text.find('/') {
            Some(i) if text != "/" => Symbol::new(Some(&text[..i]), &text[i + 1..]),
            _ => Symbol::simple(text),
        }
    }

    /// The namespace part, if the symbol is qualified.
    pub fn namespace(&self) -> Option<&str> {
        self.ns.as_deref()
    }

    /// The name part.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns a copy of this symbol with its namespace replaced.
    pub fn with_namespace(&self, ns: &str) -> Self {
        Symbol::new(Some(ns), &self.name)
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ns) = &self.ns {
            f.write_str(ns)?;
            f.write_str("/")?;
        }
        f.write_str(&self.name)
    }
}

impl From<&str> for Symbol {
    fn from(text: &str) -> Self {
        Symbol::parse(text)
    }
}

/// A keyword, written as `:name` or `:namespace/name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Keyword(Symbol);

impl Keyword {
    /// Constructs a keyword from an optional namespace and a name.
    pub fn new(ns: Option<&str>, name: &str) -> Self {
        Keyword(Symbol::new(ns, name))
    }

    /// Constructs a keyword from text without the leading colon, splitting at
    /// the first `/` like [`Symbol::parse`].
    pub fn parse(text: &str) -> Self {
        Keyword(Symbol::parse(text))
    }

    /// The namespace part, if the keyword is qualified.
    pub fn namespace(&self) -> Option<&str> {
        self.0.namespace()
    }

    /// The name part.
    pub fn name(&self) -> &str {
        self.0.name()
    }

    /// The keyword's name as a symbol.
    pub fn symbol(&self) -> &Symbol {
        &self.0
    }
}

impl From<Symbol> for Keyword {
    fn from(sym: Symbol) -> Self {
        Keyword(sym)
    }
}

impl From<&str> for Keyword {
    fn from(text: &str) -> Self {
        Keyword::parse(text)
    }
}

impl Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(":")?;
        Display::fmt(&self.0, f)
    }
}
