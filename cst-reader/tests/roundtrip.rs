use cst_reader::parse::{Options, ReadCond, Trivia};
use cst_reader::{emit, Form, Parser, SyntaxNode};

static CORE: &str = r#"(ns app.core
  "Entry point."
  (:require [clojure.string :as str]
            [app.db :as db]))

;; Configuration
(def ^:private defaults
  {:port 8080, :host "localhost"
   :started #inst "2024-01-01T00:00:00Z"})

(defn- greet
  [{:keys [name] :or {name "world"}}]
  (str "Hello, " name \!))

(defmacro with-timing [& body]
  `(let [start# (System/nanoTime)
         result# (do ~@body)]
     (println "took" (- (System/nanoTime) start#))
     result#))

(def handlers
  #{#'greet #_#'unused})

(defn parse-port [s]
  (when (re-matches #"\d+" s)
    (Long/parseLong s)))

(def xs (map #(* % 2) [1 2 3]))

(comment
  (greet {:name "you"}) ; try it
  @(future 1))
"#;

static PORTABLE: &str = r#"(ns app.util
  (:require #?(:clj [clojure.java.io :as io]
               :cljs [goog.string :as gstr])))

(defn now []
  #?(:clj (System/currentTimeMillis)
     :cljs (.now js/Date)))

(def items [1 #?@(:clj (2 3)) 4])
"#;

fn read_file(source: &str, options: Options) -> Form {
    Parser::from_str_custom(source, options)
        .read_file()
        .expect("reading failed")
}

fn top_level(file: &Form) -> Vec<&Form> {
    file.data_elements().expect("not a file").collect()
}

// Reading the emitted text gives the same tree, and emitting that tree gives
// the same text.
fn check_roundtrip(source: &str, options: Options) -> String {
    let first = read_file(source, options.clone());
    let text = emit(&first);
    let second = read_file(&text, options);
    assert_eq!(first, second);
    assert_eq!(emit(&second), text);
    text
}

#[test]
fn test_namespace_file() {
    let text = check_roundtrip(CORE, Options::new());
    assert!(text.starts_with("(ns app.core \"Entry point.\" (:require"));
    assert!(text.contains("\n;; Configuration\n(def ^:private defaults"));
    assert!(text.contains("{:port 8080, :host \"localhost\" :started #inst \"2024-01-01T00:00:00Z\"}"));
    assert!(text.contains("#{#'greet #_#'unused}"));
    assert!(text.contains("(re-matches #\"\\d+\" s)"));
    assert!(text.contains("(map #(* % 2) [1 2 3])"));
    assert!(text.contains("; try it\n@(future 1))"));
}

#[test]
fn test_namespace_file_structure() {
    let file = read_file(CORE, Options::new());
    let forms = top_level(&file);
    assert_eq!(forms.len(), 8);
    assert!(matches!(
        file.elements().unwrap()[1].as_syntax(),
        Some(SyntaxNode::LineComment(text)) if text == "; Configuration"
    ));

    let heads: Vec<String> = forms
        .iter()
        .map(|form| form.get(0).expect("empty list").to_string())
        .collect();
    assert_eq!(
        heads,
        vec!["ns", "def", "defn-", "defmacro", "def", "defn", "def", "comment"]
    );

    // Lists remember where they started.
    let positions: Vec<_> = forms
        .iter()
        .map(|form| form.as_list().unwrap().meta.position().unwrap().line)
        .collect();
    assert_eq!(positions, vec![1, 7, 11, 15, 21, 24, 28, 30]);
}

#[test]
fn test_skipping_trivia() {
    let file = read_file(CORE, Options::new().with_trivia(Trivia::Skip));
    let elements = file.elements().unwrap();
    assert_eq!(elements.len(), 8);
    assert!(elements.iter().all(|form| !form.is_skippable()));
    let handlers = &elements[4];
    assert_eq!(handlers.to_string(), "(def handlers #{#'greet})");
}

#[test]
fn test_portable_file() {
    let options = Options::new().with_read_cond(ReadCond::Allow);
    let text = check_roundtrip(PORTABLE, options.clone());
    assert!(text.contains("#?(:clj [clojure.java.io :as io] :cljs [goog.string :as gstr])"));
    assert!(text.contains("(def items [1 #?@(:clj (2 3)) 4])"));

    let err = Parser::from_str(PORTABLE).read_file().unwrap_err();
    assert_eq!(err.to_string(), "Conditional read not allowed at line 2 column 14");
}

#[test]
fn test_whitespace_is_normalized() {
    let source = "(  f\n\n   x\t,y  )\n\n\n[ ]";
    let text = check_roundtrip(source, Options::new());
    assert_eq!(text, "(f x, y)\n[]");
}

#[test]
fn test_read_from_io() {
    let from_str = read_file(CORE, Options::new());
    let from_io = Parser::from_reader(CORE.as_bytes())
        .read_file()
        .expect("reading failed");
    assert_eq!(from_str, from_io);
}
