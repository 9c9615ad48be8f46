use std::borrow::Cow;

use crate::number::{Decimal, Number};
use crate::symbol::{Keyword, Symbol};
use crate::syntax::SyntaxNode;
use crate::Form;

macro_rules! impl_from_number {
    (
        $($ty:ty),*
    ) => {
        $(
            impl From<$ty> for Form {
                #[inline]
                fn from(n: $ty) -> Self {
                    Form::Number(Number::from(n))
                }
            }
        )*
    };
}

impl_from_number!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);

impl From<num_bigint::BigInt> for Form {
    fn from(n: num_bigint::BigInt) -> Self {
        Form::Number(Number::from(n))
    }
}

impl From<Decimal> for Form {
    fn from(d: Decimal) -> Self {
        Form::Number(Number::decimal(d))
    }
}

impl From<&str> for Form {
    #[inline]
    fn from(s: &str) -> Self {
        Form::String(s.into())
    }
}

impl<'a> From<Cow<'a, str>> for Form {
    #[inline]
    fn from(s: Cow<'a, str>) -> Self {
        Form::from(s.as_ref())
    }
}

impl From<Box<str>> for Form {
    #[inline]
    fn from(s: Box<str>) -> Self {
        Form::String(s)
    }
}

impl From<String> for Form {
    #[inline]
    fn from(s: String) -> Self {
        Form::String(s.into_boxed_str())
    }
}

impl From<bool> for Form {
    #[inline]
    fn from(v: bool) -> Self {
        Form::Bool(v)
    }
}

impl From<char> for Form {
    #[inline]
    fn from(c: char) -> Self {
        Form::Char(c)
    }
}

impl From<Number> for Form {
    fn from(n: Number) -> Self {
        Form::Number(n)
    }
}

impl From<Symbol> for Form {
    fn from(sym: Symbol) -> Self {
        Form::Symbol(sym)
    }
}

impl From<Keyword> for Form {
    fn from(kw: Keyword) -> Self {
        Form::Keyword(kw)
    }
}

impl From<SyntaxNode> for Form {
    fn from(node: SyntaxNode) -> Self {
        Form::syntax(node)
    }
}

impl<T: Into<Form>> From<Option<T>> for Form {
    fn from(v: Option<T>) -> Self {
        v.map_or(Form::Nil, Into::into)
    }
}
