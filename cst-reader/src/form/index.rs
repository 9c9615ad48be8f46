use std::ops;

use crate::syntax::SyntaxNode;
use crate::Form;

/// A type that can be used to index into a `cst_reader::Form`.
///
/// The [`get`] method of `Form` accepts any type that implements
/// `Index`, as does the [square-bracket indexing operator]. This
/// trait is implemented for `usize`, which indexes the data elements of
/// lists, vectors, sets and files, and for strings and `Form`, which look up
/// values in maps. A string matches a keyword key with that name or a
/// string key with that content.
///
/// Comments, commas and discarded forms are never counted.
///
/// [`get`]: enum.Form.html#method.get
/// [square-bracket indexing operator]: enum.Form.html#impl-Index%3CI%3E
///
/// This trait is sealed and cannot be implemented for types outside
/// of `cst_reader`.
///
/// # Examples
///
/// ```
/// # use cst_reader::form;
/// #
/// let data = form!({:foo 42 :bar (1 2 3)});
///
/// // Data is a map so it can be indexed with a string.
/// let bar = &data["bar"];
///
/// // Bar is a list so it can be indexed with an integer.
/// let second = &bar[1];
///
/// assert_eq!(second, &form!(2));
/// ```
pub trait Index: private::Sealed {
    /// Return None if the key is not already in the collection.
    #[doc(hidden)]
    fn index_into<'v>(&self, v: &'v Form) -> Option<&'v Form>;
}

// Prevent users from implementing the Index trait.
mod private {
    pub trait Sealed {}
    impl Sealed for usize {}
    impl Sealed for str {}
    impl Sealed for String {}
    impl<'a, T: ?Sized> Sealed for &'a T where T: Sealed {}
    impl Sealed for super::Form {}
}

fn sequence_elements(v: &Form) -> Option<&[Form]> {
    match v.as_syntax()? {
        SyntaxNode::List(list) => Some(&list.elements),
        SyntaxNode::Vector(elements) | SyntaxNode::Set(elements) | SyntaxNode::File(elements) => {
            Some(elements)
        }
        _ => None,
    }
}

fn map_lookup<'v, F>(v: &'v Form, matches: F) -> Option<&'v Form>
where
    F: Fn(&Form) -> bool,
{
    let elements = match v.as_syntax()? {
        SyntaxNode::Map(elements) => elements,
        _ => return None,
    };
    let mut data = elements.iter().filter(|e| !e.is_skippable());
    while let (Some(key), Some(value)) = (data.next(), data.next()) {
        if matches(key) {
            return Some(value);
        }
    }
    None
}

impl Index for usize {
    fn index_into<'v>(&self, v: &'v Form) -> Option<&'v Form> {
        sequence_elements(v)?
            .iter()
            .filter(|e| !e.is_skippable())
            .nth(*self)
    }
}

impl Index for str {
    fn index_into<'v>(&self, v: &'v Form) -> Option<&'v Form> {
        map_lookup(v, |key| match key {
            Form::Keyword(kw) => kw.namespace().is_none() && kw.name() == self,
            Form::String(s) => &**s == self,
            _ => false,
        })
    }
}

impl Index for String {
    fn index_into<'v>(&self, v: &'v Form) -> Option<&'v Form> {
        self[..].index_into(v)
    }
}

impl<'a, T: ?Sized> Index for &'a T
where
    T: Index,
{
    fn index_into<'v>(&self, v: &'v Form) -> Option<&'v Form> {
        (**self).index_into(v)
    }
}

impl Index for Form {
    fn index_into<'v>(&self, v: &'v Form) -> Option<&'v Form> {
        map_lookup(v, |key| key == self)
    }
}

// Indexing never panics: a missing entry, or a form of the wrong shape,
// yields `nil`. Use `get` to tell the two apart.
impl<I> ops::Index<I> for Form
where
    I: Index,
{
    type Output = Form;

    /// Index into a `cst_reader::Form` using the syntax `form[0]` or
    /// `form["k"]`.
    ///
    /// Returns `nil` if the type of `self` does not match the type of the
    /// index, if the given key does not exist in the map, or if the index
    /// is not within the bounds of the sequence.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cst_reader::form;
    /// #
    /// let data = form!({:a 42 :x (y (z zz))});
    ///
    /// assert_eq!(data["x"], form!((y (z zz))));
    /// assert_eq!(data["b"], form!(nil)); // does not panic
    /// ```
    fn index(&self, index: I) -> &Form {
        static NIL: Form = Form::Nil;
        index.index_into(self).unwrap_or(&NIL)
    }
}
