use criterion::*;

use cst_reader::parse::{Options, ReadCond, Trivia};
use cst_reader::{emit, from_str, from_str_custom, Parser};

static SOURCE: &str = r#"(ns bench.sample
  (:require [clojure.string :as str]))

;; A few definitions with the usual reader syntax.
(defn- normalize
  "Lower-cases and trims `s`."
  ^String [^String s]
  (-> s str/trim str/lower-case))

(def table
  {:ints [1 -2 0x1F 36rZZ 12345678901234567890N]
   :ratios [1/3 -4/6], :floats [3.14 1e10 2.5M]
   :chars [\a \newline \λ]
   :strings ["plain" "esc\t\"aped\""]
   #_:ignored #_nil})

(defmacro unless [test & body]
  `(if ~test nil (do ~@body)))

(def f #(+ %1 %2 (count %&)))
"#;

fn bench_float_parsing(c: &mut Criterion) {
    c.bench_function("float parsing", |b| {
        b.iter(|| black_box(from_str("-1.360438755021694e308")))
    });
}

fn bench_file_reading(c: &mut Criterion) {
    c.bench_function("file reading (trivia kept)", |b| {
        b.iter(|| black_box(Parser::from_str(SOURCE).read_file()))
    });
}

fn bench_file_reading_skip_trivia(c: &mut Criterion) {
    let options = Options::new().with_trivia(Trivia::Skip);
    c.bench_function("file reading (trivia skipped)", |b| {
        b.iter(|| black_box(Parser::from_str_custom(SOURCE, options.clone()).read_file()))
    });
}

fn bench_conditionals(c: &mut Criterion) {
    let options = Options::new().with_read_cond(ReadCond::Allow);
    c.bench_function("reader conditional", |b| {
        b.iter(|| {
            black_box(from_str_custom(
                "#?(:clj (System/nanoTime) :cljs (.now js/performance))",
                options.clone(),
            ))
        })
    });
}

fn bench_emit(c: &mut Criterion) {
    let file = Parser::from_str(SOURCE).read_file().unwrap();
    c.bench_function("emit", |b| b.iter(|| black_box(emit(&file))));
}

criterion_group! {
    name = benches;
    config = Criterion::default();
    targets = bench_float_parsing, bench_file_reading, bench_file_reading_skip_trivia,
        bench_conditionals, bench_emit
}
criterion_main!(benches);
