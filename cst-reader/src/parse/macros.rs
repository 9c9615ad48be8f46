//! Reader macros: what happens after a macro character has been read.

use tracing::{debug, trace};

use super::dispatch::{dispatch_macro_for, is_whitespace, DispatchMacro, Macro};
use super::error::{Error, ErrorCode, Malformed, Result};
use super::read::Read;
use super::scope::{PendingForms, Scope};
use super::token::{read_char_literal, read_line, read_regex, read_string, read_token};
use super::{Parser, ReadCond, Step, Trivia};
use crate::host::ReadEval;
use crate::symbol::Symbol;
use crate::syntax::{ArgRef, Conditional, List, Meta, MetaKind, Metadata, SyntaxNode, SyntaxQuote};
use crate::Form;

fn node(node: SyntaxNode) -> Result<Step> {
    Ok(Step::Value(Form::syntax(node)))
}

fn error<T>(code: ErrorCode) -> Result<T> {
    Err(Error::new(code))
}

impl<R: Read> Parser<R> {
    /// Runs the reader macro `m`, entered by `ch`.
    pub(super) fn run_macro(
        &mut self,
        m: Macro,
        ch: char,
        pending: &mut PendingForms,
    ) -> Result<Step> {
        match m {
            Macro::String => Ok(Step::Value(Form::string(read_string(&mut self.read)?))),
            Macro::Comment => {
                let text = read_line(&mut self.read)?;
                self.trivia(SyntaxNode::LineComment(text))
            }
            Macro::Comma => self.trivia(SyntaxNode::Comma),
            Macro::Quote => self.wrap(pending, SyntaxNode::Quote),
            Macro::Deref => self.wrap(pending, SyntaxNode::Deref),
            Macro::Meta => self.read_meta(pending),
            Macro::SyntaxQuote => self.read_syntax_quote(pending),
            Macro::Unquote => self.read_unquote(pending),
            Macro::List => self.read_list(pending),
            Macro::Vector => node(SyntaxNode::Vector(self.read_delimited(']', pending)?)),
            Macro::Map => self.read_map(pending),
            Macro::Unmatched => error(ErrorCode::UnmatchedDelimiter(ch)),
            Macro::Character => node(SyntaxNode::Char(read_char_literal(&mut self.read)?)),
            Macro::Arg => self.read_arg(),
            Macro::Dispatch => self.read_dispatch(pending),
        }
    }

    fn read_dispatch(&mut self, pending: &mut PendingForms) -> Result<Step> {
        let ch = self.next_or_eof()?;
        match dispatch_macro_for(ch) {
            Some(DispatchMacro::Meta) => self.read_meta(pending),
            Some(DispatchMacro::Var) => self.wrap(pending, SyntaxNode::Var),
            Some(DispatchMacro::Regex) => self.read_pattern(),
            Some(DispatchMacro::FnLiteral) => self.read_fn_literal(pending),
            Some(DispatchMacro::Set) => node(SyntaxNode::Set(self.read_delimited('}', pending)?)),
            Some(DispatchMacro::Eval) => {
                if self.host.read_eval() != ReadEval::Enabled {
                    return error(ErrorCode::EvalNotAllowed);
                }
                self.wrap(pending, SyntaxNode::Eval)
            }
            Some(DispatchMacro::Shebang) => {
                let text = read_line(&mut self.read)?;
                self.trivia(SyntaxNode::ShebangComment(text))
            }
            Some(DispatchMacro::Unreadable) => error(ErrorCode::UnreadableForm),
            Some(DispatchMacro::Discard) => {
                let form = self.read_nested(pending)?;
                self.trivia(SyntaxNode::Discard(form))
            }
            Some(DispatchMacro::Conditional) => self.read_conditional(pending),
            Some(DispatchMacro::Symbolic) => self.read_symbolic(),
            None => {
                trace!(%ch, "no dispatch macro, reading a tagged literal");
                self.read.unread(ch);
                self.read_tagged(pending)
            }
        }
    }

    fn next_or_eof(&mut self) -> Result<char> {
        match self.read.next()? {
            Some(ch) => Ok(ch),
            None => error(ErrorCode::EofWhileReadingCharacter),
        }
    }

    /// Comments, commas and discards are only kept when trivia is preserved.
    fn trivia(&self, trivia: SyntaxNode) -> Result<Step> {
        match self.options.trivia {
            Trivia::Preserve => node(trivia),
            Trivia::Skip => Ok(Step::Continue),
        }
    }

    fn wrap(&mut self, pending: &mut PendingForms, f: fn(Form) -> SyntaxNode) -> Result<Step> {
        let form = self.read_nested(pending)?;
        node(f(form))
    }

    fn read_list(&mut self, pending: &mut PendingForms) -> Result<Step> {
        let position = self.read.position();
        let elements = self.read_delimited(')', pending)?;
        let meta = match position {
            Some(pos) if !elements.is_empty() => Metadata::at(pos),
            _ => Metadata::new(),
        };
        node(SyntaxNode::List(List { elements, meta }))
    }

    fn read_map(&mut self, pending: &mut PendingForms) -> Result<Step> {
        let elements = self.read_delimited('}', pending)?;
        let count = elements.iter().filter(|e| !e.is_skippable()).count();
        if count % 2 == 1 {
            return error(ErrorCode::MapParity);
        }
        node(SyntaxNode::Map(elements))
    }

    fn read_meta(&mut self, pending: &mut PendingForms) -> Result<Step> {
        let position = self.read.position();
        let meta = self.read_nested(pending)?;
        let is_map = matches!(meta.as_syntax(), Some(SyntaxNode::Map(_)));
        let meta = match meta {
            Form::Symbol(_) | Form::String(_) => MetaKind::Tag(meta),
            Form::Keyword(kw) => MetaKind::Flag(kw),
            _ if is_map => MetaKind::Map(meta),
            _ => return error(ErrorCode::InvalidMetadata),
        };
        let object = self.read_nested(pending)?;
        if !object.supports_meta() {
            return error(ErrorCode::InvalidMetadataTarget);
        }
        let position = position.filter(|_| object.as_list().is_some());
        node(SyntaxNode::Meta(Meta {
            meta,
            object,
            position,
        }))
    }

    fn read_syntax_quote(&mut self, pending: &mut PendingForms) -> Result<Step> {
        self.scoped(Scope::Gensym, |p| {
            let form = p.read_nested(pending)?;
            p.state.register_gensyms(&form);
            let gensyms = p.state.take_gensyms();
            syntax_quote(form, gensyms)
        })
        .map(Step::Value)
    }

    fn read_unquote(&mut self, pending: &mut PendingForms) -> Result<Step> {
        let ch = self.next_or_eof()?;
        if ch == '@' {
            self.wrap(pending, SyntaxNode::UnquoteSplicing)
        } else {
            self.read.unread(ch);
            self.wrap(pending, SyntaxNode::Unquote)
        }
    }

    fn read_fn_literal(&mut self, pending: &mut PendingForms) -> Result<Step> {
        if self.state.in_fn_literal() {
            return error(ErrorCode::NestedFnLiteral);
        }
        let body = self.scoped(Scope::Args, |p| {
            p.read.unread('(');
            p.read_nested(pending)
        })?;
        node(SyntaxNode::FnLiteral(body))
    }

    fn read_arg(&mut self) -> Result<Step> {
        let token = read_token(&mut self.read, '%')?;
        let arg = match &token[1..] {
            "" => ArgRef::Implicit,
            "&" => ArgRef::Rest,
            digits if digits.bytes().all(|b| b.is_ascii_digit()) => match digits.parse() {
                Ok(n) if n > 0 => ArgRef::Index(n),
                _ => return error(ErrorCode::InvalidArgLiteral(token)),
            },
            _ => return error(ErrorCode::InvalidArgLiteral(token)),
        };
        node(SyntaxNode::Arg(arg))
    }

    fn read_pattern(&mut self) -> Result<Step> {
        let source = read_regex(&mut self.read)?;
        match self.host.patterns().compile(&source) {
            Ok(pattern) => Ok(Step::Value(pattern)),
            Err(msg) => error(ErrorCode::InvalidPattern(msg)),
        }
    }

    /// `##Inf`, `##-Inf` and `##NaN`.
    fn read_symbolic(&mut self) -> Result<Step> {
        let first = self.next_or_eof()?;
        let token = read_token(&mut self.read, first)?;
        let value = match token.as_str() {
            "Inf" => f64::INFINITY,
            "-Inf" => f64::NEG_INFINITY,
            "NaN" => f64::NAN,
            _ => return error(ErrorCode::InvalidToken(format!("##{}", token))),
        };
        Ok(Step::Value(Form::from(value)))
    }

    fn read_conditional(&mut self, pending: &mut PendingForms) -> Result<Step> {
        if self.options.read_cond == ReadCond::Disabled {
            return error(ErrorCode::ConditionalNotAllowed);
        }
        let mut ch = self.next_or_eof()?;
        let splicing = ch == '@';
        if splicing {
            ch = self.next_or_eof()?;
        }
        while is_whitespace(ch) {
            ch = self.next_or_eof()?;
        }
        if ch != '(' {
            return error(ErrorCode::MalformedConditional(Malformed::ExpectedList));
        }
        let position = self.read.position();
        let elements = self.scoped(Scope::Conditional, |p| {
            let elements = p.read_delimited(')', pending)?;
            check_conditional(&elements, splicing)?;
            Ok(elements)
        })?;
        node(SyntaxNode::Conditional(Conditional {
            splicing,
            elements,
            position,
        }))
    }

    /// `#tag form`: a tagged literal or a record.
    fn read_tagged(&mut self, pending: &mut PendingForms) -> Result<Step> {
        let tag = match self.read_nested(pending)? {
            Form::Symbol(sym) => sym,
            _ => return error(ErrorCode::InvalidTag),
        };
        let form = self.read_nested(pending)?;
        if self.state.in_conditional() && self.options.read_cond == ReadCond::Preserve {
            return Ok(Step::Value(Form::tagged(tag, form)));
        }
        if tag.name().contains('.') {
            self.read_record(tag, form)
        } else {
            match self.host.data_readers().read(&tag, &form) {
                Some(Ok(form)) => Ok(Step::Value(form)),
                Some(Err(msg)) => error(ErrorCode::DataReaderFailed(msg)),
                None => error(ErrorCode::NoReaderForTag(tag.to_string())),
            }
        }
    }

    fn read_record(&self, name: Symbol, form: Form) -> Result<Step> {
        if self.host.read_eval() != ReadEval::Enabled {
            return error(ErrorCode::EvalNotAllowed);
        }
        let invalid = |msg: String| Error::new(ErrorCode::InvalidRecord(msg));
        let record = self
            .host
            .record(&name)
            .ok_or_else(|| invalid(format!("Record type not found: {}", name)))?;
        let data: Vec<&Form> = form
            .data_elements()
            .map(Iterator::collect)
            .unwrap_or_default();
        let built = match form.as_syntax() {
            Some(SyntaxNode::Vector(_)) => {
                if !record.accepts_arity(data.len()) {
                    return Err(invalid(format!(
                        "Unexpected number of constructor arguments to {}: got {}",
                        name,
                        data.len()
                    )));
                }
                debug!(%name, arity = data.len(), "positional record");
                record.from_positional(&name, data.into_iter().cloned().collect())
            }
            Some(SyntaxNode::Map(_)) => {
                let mut entries = Vec::with_capacity(data.len() / 2);
                for pair in data.chunks(2) {
                    if let [key, value] = pair {
                        match key.as_keyword() {
                            Some(kw) => entries.push((kw.clone(), (*value).clone())),
                            None => {
                                return Err(invalid(format!(
                                    "Unreadable defrecord form: key must be of type Keyword, got {}",
                                    key
                                )));
                            }
                        }
                    }
                }
                debug!(%name, fields = entries.len(), "map record");
                record.from_map(&name, entries)
            }
            _ => {
                return Err(invalid(format!(
                    "Unreadable constructor form starting with \"#{}\"",
                    name
                )));
            }
        };
        built.map(Step::Value).map_err(invalid)
    }
}

/// Checks the feature/form pairs of a reader conditional body.
fn check_conditional(elements: &[Form], splicing: bool) -> Result<()> {
    let malformed = |why| error(ErrorCode::MalformedConditional(why));
    let data: Vec<&Form> = elements.iter().filter(|e| !e.is_skippable()).collect();
    if data.len() % 2 != 0 {
        return malformed(Malformed::OddForms);
    }
    for pair in data.chunks(2) {
        match pair[0].as_keyword() {
            None => return malformed(Malformed::FeatureNotKeyword),
            Some(kw) if kw.namespace().is_none() && matches!(kw.name(), "else" | "none") => {
                return malformed(Malformed::ReservedFeature);
            }
            Some(_) => {}
        }
        let sequential = matches!(
            pair[1].as_syntax(),
            Some(SyntaxNode::List(_)) | Some(SyntaxNode::Vector(_))
        );
        if splicing && !sequential {
            return malformed(Malformed::SpliceNotList);
        }
    }
    Ok(())
}

/// Represents `` `form ``. Literals stand for themselves, everything else is
/// wrapped in a `SyntaxQuote` node together with its auto-gensyms. A list
/// carrying metadata other than its position is wrapped in a `with-meta`
/// call.
fn syntax_quote(form: Form, gensyms: Vec<(Symbol, Symbol)>) -> Result<Form> {
    if let Some(SyntaxNode::UnquoteSplicing(_)) = form.as_syntax() {
        return error(ErrorCode::SpliceNotInList);
    }
    if form.is_literal() {
        return Ok(form);
    }
    let meta = match form.as_list() {
        Some(list) if !list.meta.without_position().is_empty() => Some(list.meta.to_form()),
        _ => None,
    };
    let quoted = Form::syntax(SyntaxNode::SyntaxQuote(SyntaxQuote { form, gensyms }));
    match meta {
        Some(meta) => Ok(Form::list(vec![
            Form::symbol("clojure.core/with-meta"),
            quoted,
            syntax_quote(meta, Vec::new())?,
        ])),
        None => Ok(quoted),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::Keyword;

    #[test]
    fn syntax_quote_passes_literals() {
        assert_eq!(syntax_quote(Form::from(1), Vec::new()).unwrap(), Form::from(1));
        assert_eq!(
            syntax_quote(Form::keyword("k"), Vec::new()).unwrap(),
            Form::keyword("k")
        );
        assert_eq!(
            syntax_quote(Form::symbol("a"), Vec::new()).unwrap(),
            Form::syntax(SyntaxNode::SyntaxQuote(SyntaxQuote::new(Form::symbol("a"))))
        );
    }

    #[test]
    fn syntax_quote_keeps_user_metadata() {
        let mut meta = Metadata::at(crate::parse::Position { line: 1, column: 1 });
        meta.insert(Keyword::new(None, "tag"), Form::symbol("String"));
        let list = Form::syntax(SyntaxNode::List(List::new(vec![Form::symbol("f")]).with_meta(meta)));
        let quoted = syntax_quote(list, Vec::new()).unwrap();
        let elements = quoted.elements().unwrap();
        assert_eq!(elements[0], Form::symbol("clojure.core/with-meta"));
        assert!(matches!(elements[1].as_syntax(), Some(SyntaxNode::SyntaxQuote(_))));
        assert!(matches!(elements[2].as_syntax(), Some(SyntaxNode::SyntaxQuote(_))));
    }

    #[test]
    fn position_alone_is_not_metadata() {
        let meta = Metadata::at(crate::parse::Position { line: 3, column: 7 });
        let list = Form::syntax(SyntaxNode::List(List::new(vec![Form::symbol("f")]).with_meta(meta)));
        assert!(matches!(
            syntax_quote(list, Vec::new()).unwrap().as_syntax(),
            Some(SyntaxNode::SyntaxQuote(_))
        ));
    }

    #[test]
    fn conditional_shapes() {
        let kw = Form::keyword;
        assert!(check_conditional(&[kw("clj"), Form::from(1)], false).is_ok());
        assert!(check_conditional(&[kw("clj")], false).is_err());
        assert!(check_conditional(&[Form::symbol("clj"), Form::from(1)], false).is_err());
        assert!(check_conditional(&[kw("else"), Form::from(1)], false).is_err());
        assert!(check_conditional(&[kw("clj"), Form::from(1)], true).is_err());
        assert!(check_conditional(&[kw("clj"), Form::list(vec![1])], true).is_ok());
        assert!(check_conditional(&[kw("clj"), Form::vector(vec![1])], true).is_ok());
        assert!(check_conditional(&[kw("clj"), Form::set(vec![1])], true).is_err());
        assert!(check_conditional(
            &[kw("clj"), Form::syntax(SyntaxNode::Comma), Form::from(1)],
            false
        )
        .is_ok());
    }
}
