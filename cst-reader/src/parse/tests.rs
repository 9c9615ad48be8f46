use super::*;
use crate::host::{DataReaders, FieldRecord, StaticResolver};
use crate::number::Decimal;
use crate::syntax::{ArgRef, Conditional, MetaKind};
use crate::{emit, Symbol};
use cst_reader_macros::form;

use std::io::Cursor;

fn code(input: &str) -> ErrorCode {
    match from_str(input) {
        Ok(form) => panic!("{:?} read as {:?}", input, form),
        Err(e) => e.into_code(),
    }
}

fn with_conditionals(mode: ReadCond) -> Options {
    Options::new().with_read_cond(mode)
}

fn node(form: &Form) -> &SyntaxNode {
    form.as_syntax().expect("not a syntax node")
}

#[test]
fn test_atoms() {
    let mut parser = Parser::from_str("foo-symbol :kw :ns/kw nil true false 100 -42 4.5 +7");
    for form in vec![
        Form::symbol("foo-symbol"),
        Form::keyword("kw"),
        Form::keyword("ns/kw"),
        Form::Nil,
        Form::from(true),
        Form::from(false),
        Form::from(100),
        Form::from(-42),
        Form::from(4.5),
        Form::from(7),
    ] {
        assert_eq!(parser.read().unwrap(), form);
    }
    parser.end().unwrap();
}

#[test]
fn test_integers() {
    assert_eq!(from_str("0x1F").unwrap(), Form::from(31));
    assert_eq!(from_str("2r101").unwrap(), Form::from(5));
    assert_eq!(from_str("-017").unwrap(), Form::from(-15));
    let big = from_str("10N").unwrap();
    assert!(big.as_number().unwrap().is_big_int());
    assert_eq!(big.to_string(), "10N");
    let huge = from_str("123456789012345678901234567890").unwrap();
    assert!(huge.as_number().unwrap().is_big_int());
    assert_eq!(code("08"), ErrorCode::InvalidNumber("08".into()));
    assert_eq!(code("1.2.3"), ErrorCode::InvalidNumber("1.2.3".into()));
}

#[test]
fn test_ratios() {
    let half = from_str("1/2").unwrap();
    assert!(half.as_number().unwrap().is_ratio());
    assert_eq!(half.to_string(), "1/2");
    assert_eq!(from_str("-4/2").unwrap(), Form::from(-2));
}

#[test]
fn test_floats_and_decimals() {
    let float = from_str("3.14").unwrap();
    assert!(float.as_number().unwrap().is_f64());
    assert_eq!(float.as_number().unwrap().as_f64(), Some(3.14));
    let exact = from_str("3.14M").unwrap();
    assert_eq!(exact, Form::from(Decimal::parse("3.14").unwrap()));
    assert_eq!(from_str("1e3").unwrap(), Form::from(1000.0));
}

#[test]
fn test_symbolic_values() {
    assert_eq!(from_str("##Inf").unwrap(), Form::from(f64::INFINITY));
    assert_eq!(from_str("[##-Inf]").unwrap(), Form::vector(vec![f64::NEG_INFINITY]));
    let nan = from_str("##NaN").unwrap();
    assert!(nan.as_number().and_then(|n| n.as_f64()).unwrap().is_nan());
    assert_eq!(code("##Foo"), ErrorCode::InvalidToken("##Foo".into()));

    let overflow = from_str("(1e400 -1e400)").unwrap();
    let text = emit(&overflow);
    assert_eq!(text, "(##Inf ##-Inf)");
    assert_eq!(from_str(&text).unwrap(), overflow);
}

// This is generic over the reader to test both the string-based and the
// I/O-based `Read` trait implementations.
fn check_strings<F>(read: F)
where
    F: Fn(&str) -> Result<Form>,
{
    assert_eq!(read(r#""a\nb""#).unwrap(), Form::string("a\nb"));
    assert_eq!(
        read(r#""\t\r\\\"\b\f""#).unwrap(),
        Form::string("\t\r\\\"\u{8}\u{c}")
    );
    assert_eq!(read(r#""A\101\0""#).unwrap(), Form::string("AA\0"));
    assert_eq!(read(r#""😀""#).unwrap(), Form::string("😀"));
    assert_eq!(read("\"multi\nline\"").unwrap(), Form::string("multi\nline"));
    for bad in &[r#""\q""#, r#""\u12""#, r#""\400""#, r#""\uD83D""#] {
        let err = read(bad).unwrap_err();
        assert!(
            matches!(err.code(), ErrorCode::UnsupportedEscape(_)),
            "{} gave {}",
            bad,
            err
        );
    }
    assert_eq!(
        read("\"open").unwrap_err().code(),
        &ErrorCode::EofWhileReadingString
    );
}

#[test]
fn test_strings() {
    check_strings(from_str);
}

#[test]
fn test_strings_io() {
    check_strings(|s| from_reader(Cursor::new(s.as_bytes())));
}

#[test]
fn test_characters() {
    for (input, ch) in &[
        ("\\a", 'a'),
        ("\\newline", '\n'),
        ("\\space", ' '),
        ("\\u00e9", 'é'),
        ("\\o101", 'A'),
        ("\\(", '('),
    ] {
        let form = from_str(input).unwrap();
        assert_eq!(form.as_char(), Some(*ch), "{}", input);
        assert_eq!(emit(&form), *input);
    }
    assert!(matches!(code("\\bell"), ErrorCode::UnsupportedCharacter(_)));
    assert!(matches!(code("\\uD800"), ErrorCode::UnsupportedCharacter(_)));
    assert!(matches!(code("\\o400"), ErrorCode::UnsupportedCharacter(_)));
    assert_eq!(code("\\"), ErrorCode::EofWhileReadingCharacter);
}

#[test]
fn test_invalid_tokens() {
    for input in &["a:", "a::b", "ns:/x", "::nope/x", ":::x", "x:::y", "λ::x"] {
        assert!(
            matches!(code(input), ErrorCode::InvalidToken(_)),
            "{} was accepted",
            input
        );
    }
}

#[test]
fn test_auto_resolved_keywords() {
    assert_eq!(from_str("::foo").unwrap(), Form::keyword("user/foo"));
    let host = Host::new().with_resolver(
        StaticResolver::new("app.core").with_alias("str", "clojure.string"),
    );
    let mut parser = Parser::from_str("::foo ::str/join").with_host(host);
    assert_eq!(parser.read().unwrap(), Form::keyword("app.core/foo"));
    assert_eq!(parser.read().unwrap(), Form::keyword("clojure.string/join"));
}

#[test]
fn test_collections() {
    assert_eq!(
        from_str("(a [b {:c 1}] #{d})").unwrap(),
        form!((a [b {:c 1}] #{d}))
    );
    assert_eq!(code("(a ]"), ErrorCode::UnmatchedDelimiter(']'));
    assert_eq!(code(")"), ErrorCode::UnmatchedDelimiter(')'));
    assert_eq!(code("(a\n(b"), ErrorCode::EofWhileReadingDelimited(Some(2)));
}

#[test]
fn test_map_parity_ignores_trivia() {
    assert_eq!(code("{:a 1 #_:b 2}"), ErrorCode::MapParity);
    let map = from_str("{:a 1 #_:b 2 3}").unwrap();
    let data: Vec<_> = map.data_elements().unwrap().cloned().collect();
    assert_eq!(
        data,
        vec![Form::keyword("a"), Form::from(1), Form::from(2), Form::from(3)]
    );
    assert_eq!(map.get(&Form::from(2)), Some(&Form::from(3)));
}

#[test]
fn test_trivia_is_kept() {
    let list = from_str("(#_(1 2) 3 ;c\n)").unwrap();
    let data: Vec<_> = list.data_elements().unwrap().collect();
    assert_eq!(data, vec![&Form::from(3)]);

    let elements = list.elements().unwrap();
    assert_eq!(elements.len(), 3);
    assert_eq!(
        elements[0],
        Form::syntax(SyntaxNode::Discard(form!((1 2))))
    );
    assert_eq!(
        elements[2],
        Form::syntax(SyntaxNode::LineComment("c".into()))
    );
    assert_eq!(emit(&list), "(#_(1 2) 3 ;c\n)");

    let vector = from_str("[a,b , c]").unwrap();
    assert_eq!(vector.elements().unwrap().len(), 5);
    assert_eq!(emit(&vector), "[a, b, c]");
}

#[test]
fn test_emission_is_a_fixed_point() {
    let source = "(defn f\n  \"doc\"  [x] ; note\n  #_(old x)\n  {:a 1,  :b @x})";
    let first = from_str(source).unwrap();
    let text = emit(&first);
    let second = from_str(&text).unwrap();
    assert_eq!(first, second);
    assert_eq!(emit(&second), text);
}

#[test]
fn test_trivia_skip() {
    let options = Options::new().with_trivia(Trivia::Skip);
    assert_eq!(
        from_str_custom("(a ;c\n , #_b #_ #_ d e c)", options.clone()).unwrap(),
        form!((a c))
    );
    assert_eq!(
        from_str_custom("; only a comment\n x", options.clone()).unwrap(),
        form!(x)
    );
    let mut parser = Parser::from_str_custom("#!/usr/bin/env bb\n,", options);
    assert_eq!(parser.read_opt().unwrap(), None);
}

#[test]
fn test_wrappers() {
    assert_eq!(
        from_str("'x").unwrap(),
        Form::syntax(SyntaxNode::Quote(form!(x)))
    );
    assert_eq!(
        from_str("@x").unwrap(),
        Form::syntax(SyntaxNode::Deref(form!(x)))
    );
    assert_eq!(
        from_str("#'x").unwrap(),
        Form::syntax(SyntaxNode::Var(form!(x)))
    );
    assert_eq!(
        from_str("~x").unwrap(),
        Form::syntax(SyntaxNode::Unquote(form!(x)))
    );
    assert_eq!(
        from_str("~@x").unwrap(),
        Form::syntax(SyntaxNode::UnquoteSplicing(form!(x)))
    );
    assert_eq!(code("'"), ErrorCode::EofWhileReading);
    assert_eq!(code("#<object>"), ErrorCode::UnreadableForm);
}

#[test]
fn test_metadata() {
    let form = from_str("^:private x").unwrap();
    match node(&form) {
        SyntaxNode::Meta(meta) => {
            assert_eq!(meta.meta, MetaKind::Flag(Keyword::new(None, "private")));
            assert_eq!(meta.object, form!(x));
            assert_eq!(meta.position, None);
        }
        other => panic!("unexpected {:?}", other),
    }

    let form = from_str("^String ^{:a 1} (f)").unwrap();
    match node(&form) {
        SyntaxNode::Meta(meta) => {
            assert_eq!(meta.meta, MetaKind::Tag(form!(String)));
            assert!(matches!(meta.object.as_syntax(), Some(SyntaxNode::Meta(_))));
        }
        other => panic!("unexpected {:?}", other),
    }

    let form = from_str("#^:dynamic (f)").unwrap();
    match node(&form) {
        SyntaxNode::Meta(meta) => assert_eq!(
            meta.position,
            Some(Position { line: 1, column: 2 })
        ),
        other => panic!("unexpected {:?}", other),
    }

    assert_eq!(code("^1 x"), ErrorCode::InvalidMetadata);
    assert_eq!(code("^:a 1"), ErrorCode::InvalidMetadataTarget);

    // Collections and stacked metadata take metadata; other literals do not.
    for text in &["^:a [x]", "^:a {:k 1}", "^:a #{x}", "^:a ^:b x"] {
        assert!(from_str(text).is_ok(), "{}", text);
    }
    for text in &["^:a :k", "^:a \"s\"", "^:a \\c", "^:a nil"] {
        assert_eq!(code(text), ErrorCode::InvalidMetadataTarget, "{}", text);
    }
}

#[test]
fn test_list_positions() {
    let list = from_str("\n  (f x)").unwrap();
    assert_eq!(
        list.as_list().unwrap().meta.position(),
        Some(Position { line: 2, column: 3 })
    );
    let empty = from_str("()").unwrap();
    assert!(empty.as_list().unwrap().meta.is_empty());

    let untracked = Parser::new(Untracked::new(StrRead::new("(f)")))
        .read()
        .unwrap();
    assert!(untracked.as_list().unwrap().meta.is_empty());
}

#[test]
fn test_conditional_positions() {
    let position = |form: &Form| match node(form) {
        SyntaxNode::Conditional(cond) => cond.position,
        other => panic!("unexpected {:?}", other),
    };
    let options = with_conditionals(ReadCond::Allow);
    let list = from_str_custom("(f\n  #?(:clj 1))", options.clone()).unwrap();
    assert_eq!(
        position(&list.elements().unwrap()[1]),
        Some(Position { line: 2, column: 5 })
    );
    let spliced = from_str_custom("[#?@ (:clj (1))]", options.clone()).unwrap();
    assert_eq!(
        position(&spliced.elements().unwrap()[0]),
        Some(Position { line: 1, column: 6 })
    );

    let read = Untracked::new(StrRead::new("#?(:clj 1)"));
    let untracked = Parser::with_options(read, options.clone()).read().unwrap();
    assert_eq!(position(&untracked), None);
    assert_eq!(untracked, from_str_custom("#?(:clj 1)", options).unwrap());
}

#[test]
fn test_whitespace() {
    assert_eq!(
        from_str("(a\u{2028}b\tc\u{1F}d)").unwrap(),
        form!((a b c d))
    );
    assert_eq!(from_str("a\u{85}b").unwrap(), Form::symbol("a\u{85}b"));
    assert_eq!(from_str("a\u{A0}b").unwrap(), Form::symbol("a\u{A0}b"));
}

#[test]
fn test_syntax_quote() {
    let form = from_str("`(let [x# 1] x# y#)").unwrap();
    match node(&form) {
        SyntaxNode::SyntaxQuote(sq) => {
            assert_eq!(sq.form, form!((let [#"x#" 1] #"x#" #"y#")));
            assert_eq!(
                sq.gensyms,
                vec![
                    (Symbol::simple("x#"), Symbol::simple("x__1__auto__")),
                    (Symbol::simple("y#"), Symbol::simple("y__2__auto__")),
                ]
            );
            assert_eq!(sq.gensym(&Symbol::simple("z#")), None);
        }
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(emit(&form), "`(let [x# 1] x# y#)");

    // Each syntax-quote gets its own mapping; unquoted symbols are left out.
    let form = from_str("[`x# `(x# ~y#)]").unwrap();
    let gensyms: Vec<_> = form
        .as_syntax()
        .and_then(SyntaxNode::elements)
        .unwrap()
        .iter()
        .map(|quoted| match node(quoted) {
            SyntaxNode::SyntaxQuote(sq) => sq.gensyms.len(),
            other => panic!("unexpected {:?}", other),
        })
        .collect();
    assert_eq!(gensyms, vec![1, 1]);
    assert_eq!(from_str("`:k").unwrap(), form!(:k));
    assert_eq!(from_str("`1").unwrap(), form!(1));
    assert_eq!(code("`~@xs"), ErrorCode::SpliceNotInList);

    let with_meta = from_str("`^:m (f)").unwrap();
    assert!(matches!(node(&with_meta), SyntaxNode::SyntaxQuote(_)));
}

#[test]
fn test_fn_literals() {
    let form = from_str("#(+ % %2 %&)").unwrap();
    let body = match node(&form) {
        SyntaxNode::FnLiteral(body) => body,
        other => panic!("unexpected {:?}", other),
    };
    let args: Vec<_> = body.elements().unwrap()[1..]
        .iter()
        .map(|arg| match node(arg) {
            SyntaxNode::Arg(arg) => *arg,
            other => panic!("unexpected {:?}", other),
        })
        .collect();
    assert_eq!(args, vec![ArgRef::Implicit, ArgRef::Index(2), ArgRef::Rest]);

    assert!(matches!(code("%0"), ErrorCode::InvalidArgLiteral(_)));
    assert!(matches!(code("%x"), ErrorCode::InvalidArgLiteral(_)));
}

#[test]
fn test_nested_fn_literal_leaves_no_state() {
    let mut parser = Parser::from_str("#(#(%1)) #(%1)");
    assert_eq!(
        parser.read().unwrap_err().code(),
        &ErrorCode::NestedFnLiteral
    );
    // The rest of the failed literal.
    assert_eq!(
        parser.read().unwrap(),
        Form::syntax(SyntaxNode::Arg(ArgRef::Index(1)))
    );
    for _ in 0..2 {
        assert_eq!(
            parser.read().unwrap_err().code(),
            &ErrorCode::UnmatchedDelimiter(')')
        );
    }
    let sibling = parser.read().unwrap();
    assert!(matches!(node(&sibling), SyntaxNode::FnLiteral(_)));
}

#[test]
fn test_conditionals() {
    assert_eq!(
        code("#?(:clj 1 :cljs 2)"),
        ErrorCode::ConditionalNotAllowed
    );

    let form = from_str_custom("#?(:clj 1 :cljs 2)", with_conditionals(ReadCond::Allow)).unwrap();
    match node(&form) {
        SyntaxNode::Conditional(Conditional {
            splicing, elements, ..
        }) => {
            assert!(!splicing);
            assert_eq!(
                elements,
                &vec![form!(:clj), form!(1), form!(:cljs), form!(2)]
            );
        }
        other => panic!("unexpected {:?}", other),
    }

    let read = |s: &str| from_str_custom(s, with_conditionals(ReadCond::Allow));
    let malformed = |s: &str| match read(s) {
        Err(e) => match e.code() {
            ErrorCode::MalformedConditional(why) => *why,
            other => panic!("{} gave {:?}", s, other),
        },
        Ok(form) => panic!("{} read as {:?}", s, form),
    };
    assert_eq!(malformed("#?[:clj 1]"), Malformed::ExpectedList);
    assert_eq!(malformed("#?(:clj)"), Malformed::OddForms);
    assert_eq!(malformed("#?(clj 1)"), Malformed::FeatureNotKeyword);
    assert_eq!(malformed("#?(:else 1)"), Malformed::ReservedFeature);
    assert_eq!(malformed("#?@(:clj 1)"), Malformed::SpliceNotList);
    assert_eq!(malformed("#?@(:clj x)"), Malformed::SpliceNotList);
    assert_eq!(malformed("#?@(:clj #{1})"), Malformed::SpliceNotList);
    assert!(read("[#?@(:clj [1 2] :cljs (3))]").is_ok());
    assert!(read("#?@ (:clj (1) ;; c\n :cljs (2))").is_ok());
}

#[test]
fn test_conditional_preserves_tagged_literals() {
    let source = "#?(:cljs #js {:a 1} :clj 2)";
    assert_eq!(
        from_str_custom(source, with_conditionals(ReadCond::Allow))
            .unwrap_err()
            .code(),
        &ErrorCode::NoReaderForTag("js".into())
    );
    let form = from_str_custom(source, with_conditionals(ReadCond::Preserve)).unwrap();
    let cond = match node(&form) {
        SyntaxNode::Conditional(cond) => cond,
        other => panic!("unexpected {:?}", other),
    };
    let (_, cljs) = cond.pairs().next().unwrap();
    assert_eq!(cljs, &Form::tagged(Symbol::simple("js"), form!({:a 1})));
    assert_eq!(emit(&form), source);
}

#[test]
fn test_tagged_literals() {
    let inst = from_str("#inst \"2020-01-01T00:00:00Z\"").unwrap();
    assert_eq!(
        inst,
        Form::tagged(Symbol::simple("inst"), Form::string("2020-01-01T00:00:00Z"))
    );
    assert!(matches!(
        code("#inst \"yesterday\""),
        ErrorCode::DataReaderFailed(_)
    ));
    let id = "550e8400-e29b-41d4-a716-446655440000";
    assert_eq!(
        from_str(&format!("#uuid \"{}\"", id)).unwrap(),
        Form::tagged(Symbol::simple("uuid"), Form::string(id))
    );
    assert!(matches!(
        code("#uuid \"550e8400\""),
        ErrorCode::DataReaderFailed(_)
    ));
    assert_eq!(code("#foo 1"), ErrorCode::NoReaderForTag("foo".into()));
    assert_eq!(code("#1 2"), ErrorCode::InvalidTag);

    let readers = DataReaders::default().with_reader("double", |form| {
        form.as_i64()
            .map(|n| Form::from(n * 2))
            .ok_or_else(|| "not an integer".to_string())
    });
    let host = Host::new().with_data_readers(readers);
    let mut parser = Parser::from_str("#double 21").with_host(host);
    assert_eq!(parser.read().unwrap(), Form::from(42));
}

#[test]
fn test_records() {
    let host = || Host::new().with_record("geo.Point", FieldRecord::new(&["x", "y"]));
    let read = |s: &str| Parser::from_str(s).with_host(host()).read();

    let expected = Form::tagged(Symbol::parse("geo.Point"), form!({:x 1 :y 2}));
    assert_eq!(read("#geo.Point[1 2]").unwrap(), expected);
    assert_eq!(read("#geo.Point{:x 1 :y 2}").unwrap(), expected);

    for bad in &[
        "#geo.Point[1]",
        "#geo.Point{\"x\" 1}",
        "#geo.Point 5",
        "#geo.Nope[1]",
    ] {
        let err = read(bad).unwrap_err();
        assert!(
            matches!(err.code(), ErrorCode::InvalidRecord(_)),
            "{} gave {}",
            bad,
            err
        );
    }

    let locked = host().with_read_eval(ReadEval::Disabled);
    let err = Parser::from_str("#geo.Point[1 2]")
        .with_host(locked)
        .read()
        .unwrap_err();
    assert_eq!(err.code(), &ErrorCode::EvalNotAllowed);
}

#[test]
fn test_read_eval() {
    assert_eq!(
        from_str("#=(+ 1 2)").unwrap(),
        Form::syntax(SyntaxNode::Eval(form!((+ 1 2))))
    );
    let disabled = Host::new().with_read_eval(ReadEval::Disabled);
    let err = Parser::from_str("#=(+ 1 2)")
        .with_host(disabled)
        .read()
        .unwrap_err();
    assert_eq!(err.code(), &ErrorCode::EvalNotAllowed);

    let unknown = Host::new().with_read_eval(ReadEval::Unknown);
    let err = Parser::from_str("1").with_host(unknown).read().unwrap_err();
    assert_eq!(err.code(), &ErrorCode::ReadingDisallowed);
}

#[test]
fn test_patterns() {
    let form = from_str(r#"#"[a-z]+\d""#).unwrap();
    match &form {
        Form::Pattern(pattern) => {
            assert_eq!(pattern.source(), r"[a-z]+\d");
            assert!(pattern.regex().unwrap().is_match("ab1"));
        }
        other => panic!("unexpected {:?}", other),
    }
    assert!(matches!(code(r#"#"(""#), ErrorCode::InvalidPattern(_)));
    assert_eq!(code(r#"#"abc"#), ErrorCode::EofWhileReadingRegex);
}

#[test]
fn test_eof_policy() {
    let options = Options::new().with_eof(Eof::Value(form!(:eof)));
    let mut parser = Parser::from_str_custom("a", options.clone());
    assert_eq!(parser.read().unwrap(), form!(a));
    assert_eq!(parser.read().unwrap(), form!(:eof));

    // Only the outermost read gets the sentinel.
    let err = from_str_custom("(a", options).unwrap_err();
    assert!(err.is_eof());
    assert_eq!(err.code(), &ErrorCode::EofWhileReadingDelimited(Some(1)));

    assert!(from_str("").unwrap_err().is_eof());
}

#[test]
fn test_error_locations() {
    let err = from_str("(a\n  b]").unwrap_err();
    assert_eq!(err.code(), &ErrorCode::UnmatchedDelimiter(']'));
    let location = err.location().unwrap();
    assert_eq!((location.line(), location.column()), (2, 4));
    assert!(err.to_string().ends_with("at line 2 column 4"));

    let err = Parser::new(Untracked::new(StrRead::new("(a\n  b]")))
        .read()
        .unwrap_err();
    assert_eq!(err.code(), &ErrorCode::UnmatchedDelimiter(']'));
    assert!(err.location().is_none());
}

#[test]
fn test_recursion_limit() {
    let deep = "[".repeat(1000);
    assert_eq!(code(&deep), ErrorCode::RecursionLimitExceeded);

    let nested = format!("{}{}", "[".repeat(100), "]".repeat(100));
    assert!(from_str(&nested).is_ok());
}

#[test]
fn test_file() {
    let mut parser = Parser::from_str("#!/usr/bin/env bb\n(ns app) ; main\n(run)");
    let file = parser.read_file().unwrap();
    let forms = file.elements().unwrap();
    assert_eq!(forms.len(), 4);
    assert_eq!(
        forms[0],
        Form::syntax(SyntaxNode::ShebangComment("/usr/bin/env bb".into()))
    );
    assert_eq!(forms[3], form!((run)));
    assert_eq!(emit(&file), "#!/usr/bin/env bb\n(ns app)\n; main\n(run)");
}

#[test]
fn test_trailing_characters() {
    assert_eq!(code("a b"), ErrorCode::TrailingCharacters);
    assert!(from_str("a  \n").is_ok());
}

#[test]
fn test_invalid_utf8() {
    let err = from_reader(Cursor::new(&b"(a \xFF)"[..])).unwrap_err();
    assert_eq!(err.code(), &ErrorCode::InvalidUtf8);
    assert!(err.is_syntax());
}

#[test]
fn test_options() {
    let options = Options::new()
        .with_features(vec![Keyword::new(None, "cljs"), Keyword::new(None, "clj")]);
    assert_eq!(
        options.features(),
        vec![Keyword::new(None, "clj"), Keyword::new(None, "cljs")]
    );
    assert!(options.has_feature(&Keyword::new(None, "clj")));
    assert!(!options.has_feature(&Keyword::new(None, "bb")));
    assert_eq!(options.read_cond(), ReadCond::Disabled);
    assert_eq!(options.trivia(), Trivia::Preserve);
    assert_eq!(options.eof(), &Eof::Error);
}
