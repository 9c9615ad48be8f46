//! Per-read state that is pushed on entry to a construct and popped on exit.

use std::collections::VecDeque;
use std::mem;

use tracing::trace;

use crate::symbol::Symbol;
use crate::syntax::SyntaxNode;
use crate::Form;

/// Forms waiting to be returned before any further input is read.
///
/// One queue lives for the duration of a top-level read and is shared by
/// all nested reads.
pub(crate) type PendingForms = VecDeque<Form>;

/// The scopes a construct can open.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Scope {
    /// A syntax-quoted form, with its own auto-gensym environment.
    Gensym,
    /// The body of an anonymous function literal. Does not nest.
    Args,
    /// The body of a reader conditional.
    Conditional,
}

/// Dynamic state of one parser, isolated from every other parser.
#[derive(Debug, Default)]
pub(crate) struct ScopedReadState {
    gensyms: Vec<Vec<(Symbol, Symbol)>>,
    args: bool,
    conditionals: usize,
    next_id: u64,
}

impl ScopedReadState {
    pub fn push(&mut self, scope: Scope) {
        trace!(?scope, "enter");
        match scope {
            Scope::Gensym => self.gensyms.push(Vec::new()),
            Scope::Args => self.args = true,
            Scope::Conditional => self.conditionals += 1,
        }
    }

    pub fn pop(&mut self, scope: Scope) {
        trace!(?scope, "leave");
        match scope {
            Scope::Gensym => {
                self.gensyms.pop();
            }
            Scope::Args => self.args = false,
            Scope::Conditional => self.conditionals = self.conditionals.saturating_sub(1),
        }
    }

    pub fn in_fn_literal(&self) -> bool {
        self.args
    }

    pub fn in_conditional(&self) -> bool {
        self.conditionals > 0
    }

    /// Returns true if nothing is pushed.
    pub fn is_clear(&self) -> bool {
        self.gensyms.is_empty() && !self.args && self.conditionals == 0
    }

    /// The generated symbol for the auto-gensym `sym` (a simple symbol
    /// ending in `#`) in the innermost syntax-quote scope, creating one on
    /// first use.
    pub fn gensym(&mut self, sym: &Symbol) -> Option<Symbol> {
        let env = self.gensyms.last_mut()?;
        if let Some((_, generated)) = env.iter().find(|(auto, _)| auto == sym) {
            return Some(generated.clone());
        }
        self.next_id += 1;
        let stem = sym.name().trim_end_matches('#');
        let generated = Symbol::simple(&format!("{}__{}__auto__", stem, self.next_id));
        env.push((sym.clone(), generated.clone()));
        Some(generated)
    }

    /// Takes the mapping of the innermost syntax-quote scope, leaving it
    /// empty.
    pub fn take_gensyms(&mut self) -> Vec<(Symbol, Symbol)> {
        self.gensyms.last_mut().map(mem::take).unwrap_or_default()
    }

    /// Registers every auto-gensym in `form`, leaving out forms under
    /// nested unquotes and syntax-quotes.
    pub fn register_gensyms(&mut self, form: &Form) {
        match form {
            Form::Symbol(sym) if sym.namespace().is_none() && sym.name().ends_with('#') => {
                if let Some(generated) = self.gensym(sym) {
                    trace!(%sym, %generated, "auto-gensym");
                }
            }
            Form::Syntax(node) => match &**node {
                SyntaxNode::Unquote(_)
                | SyntaxNode::UnquoteSplicing(_)
                | SyntaxNode::SyntaxQuote(_) => {}
                node => {
                    if let Some(inner) = node.inner() {
                        self.register_gensyms(inner);
                    }
                    for element in node.elements().unwrap_or(&[]) {
                        self.register_gensyms(element);
                    }
                }
            },
            Form::Tagged(tagged) => self.register_gensyms(&tagged.form),
            _ => {}
        }
    }
}
