use crate::value::Value;

use proc_macro2::TokenStream;
use quote::{quote, ToTokens};

fn elements(elements: &[Value]) -> TokenStream {
    quote! {{
        let elements: ::std::vec::Vec<::cst_reader::Form> = ::std::vec![#(#elements),*];
        elements
    }}
}

impl ToTokens for Value {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let expanded = match self {
            Value::Nil => quote! { ::cst_reader::Form::Nil },
            Value::Literal(lit) => quote! { ::cst_reader::Form::from(#lit) },
            Value::Negated(lit) => quote! { ::cst_reader::Form::from(-#lit) },
            Value::Bool(value) => quote! { ::cst_reader::Form::from(#value) },
            Value::Symbol(name) => quote! { ::cst_reader::Form::symbol(#name) },
            Value::Keyword(name) => quote! { ::cst_reader::Form::keyword(#name) },
            Value::Unquoted(tt) => quote! { ::cst_reader::Form::from(#tt) },
            Value::List(items) => {
                let items = elements(items);
                quote! { ::cst_reader::Form::list(#items) }
            }
            Value::Vector(items) => {
                let items = elements(items);
                quote! { ::cst_reader::Form::vector(#items) }
            }
            Value::Map(items) => {
                let items = elements(items);
                quote! { ::cst_reader::Form::map(#items) }
            }
            Value::Set(items) => {
                let items = elements(items);
                quote! { ::cst_reader::Form::set(#items) }
            }
        };
        tokens.extend(expanded);
    }
}

pub fn generate(value: Value) -> TokenStream {
    value.into_token_stream()
}
