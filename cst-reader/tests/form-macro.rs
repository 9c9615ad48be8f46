use cst_reader::{form, Form};

#[test]
fn test_numbers() {
    assert_eq!(form!(123), Form::from(123));
    assert_eq!(form!(123.4), Form::from(123.4));
    assert_eq!(form!(-123), Form::from(-123));
    assert_eq!(form!(-64.0), Form::from(-64.0));
}

#[test]
fn test_atoms() {
    assert_eq!(form!(nil), Form::Nil);
    assert_eq!(form!(true), Form::from(true));
    assert_eq!(form!(false), Form::from(false));
    assert_eq!(form!("text"), Form::string("text"));
    assert_eq!(form!('x'), Form::Char('x'));
}

#[test]
fn test_symbols() {
    assert_eq!(form!(foo), Form::symbol("foo"));
    assert_eq!(form!(#"a-symbol"), Form::symbol("a-symbol"));
    assert_eq!(
        form!(#"clojure.core/map").as_symbol().and_then(|s| s.namespace()),
        Some("clojure.core")
    );
}

#[test]
fn test_keywords() {
    assert_eq!(form!(:foo), Form::keyword("foo"));
    assert_eq!(form!(:"a-keyword"), Form::keyword("a-keyword"));
    assert_eq!(form!(:"user/id"), Form::keyword("user/id"));
}

#[test]
fn test_collections() {
    assert_eq!(form!(()), Form::list(Vec::<Form>::new()));
    assert_eq!(form!((1 2 3)), Form::list(vec![1, 2, 3]));
    assert_eq!(
        form!([a b]),
        Form::vector(vec![Form::symbol("a"), Form::symbol("b")])
    );
    assert_eq!(
        form!({:a 1}),
        Form::map(vec![Form::keyword("a"), Form::from(1)])
    );
    assert_eq!(form!(#{1 2}), Form::set(vec![1, 2]));
    assert_eq!(
        form!({:a [1 2] :b #{c}}).to_string(),
        "{:a [1 2] :b #{c}}"
    );
}

#[test]
fn test_unquote() {
    let three = 3;
    assert_eq!(form!([1 2 ,three]), Form::vector(vec![1, 2, 3]));

    let big = i64::max_value();
    assert_eq!(
        form!((b ,big)),
        Form::list(vec![Form::symbol("b"), Form::from(big)])
    );

    let name = Form::symbol("x");
    assert_eq!(form!((quote ,name)).to_string(), "(quote x)");
}

#[test]
fn test_special_tokens() {
    assert_eq!(form!(-), Form::symbol("-"));
    assert_eq!(form!(+), Form::symbol("+"));
    assert_eq!(form!(+++), Form::symbol("+++"));
    assert_eq!(form!(...), Form::symbol("..."));
    assert_eq!(form!(->>), Form::symbol("->>"));
    assert_eq!(form!(<=), Form::symbol("<="));
    assert_eq!(
        form!((+ 1 2)),
        Form::list(vec![Form::symbol("+"), 1.into(), 2.into()])
    );
    assert_eq!(
        form!((! $ % & * + / < = > ?)),
        Form::list(
            ["!", "$", "%", "&", "*", "+", "/", "<", "=", ">", "?"]
                .iter()
                .map(|name| Form::symbol(name))
                .collect::<Vec<_>>()
        )
    );
}

#[test]
fn test_matches_reader() {
    let read = cst_reader::from_str("(defn f [x] {:doc \"f\" :args #{x}})").unwrap();
    assert_eq!(read, form!((defn f [x] {:doc "f" :args #{x}})));
}
