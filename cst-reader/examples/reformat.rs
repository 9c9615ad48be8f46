//! Reads Clojure source from a file (or stdin) and writes it back out in
//! normalized layout.
//!
//! ```text
//! cargo run --example reformat -- [--cljc] [--strip] [FILE]
//! ```
//!
//! `--cljc` allows reader conditionals, `--strip` drops comments, commas and
//! discarded forms. Set `RUST_LOG=debug` to watch the reader.

use std::{env, fs, io, process};

use cst_reader::parse::{Options, ReadCond, Trivia};
use cst_reader::{Parser, SyntaxNode};

fn reformat(source: &str, options: Options) -> Result<String, cst_reader::Error> {
    let file = Parser::from_str_custom(source, options).read_file()?;
    if let Some(SyntaxNode::File(forms)) = file.as_syntax() {
        tracing::info!(forms = forms.len(), "read file");
    }
    Ok(cst_reader::emit(&file))
}

fn main() -> io::Result<()> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let mut options = Options::new();
    let mut path = None;
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--cljc" => options = options.with_read_cond(ReadCond::Allow),
            "--strip" => options = options.with_trivia(Trivia::Skip),
            _ => path = Some(arg),
        }
    }

    let source = match path {
        Some(path) => fs::read_to_string(path)?,
        None => io::read_to_string(io::stdin())?,
    };
    match reformat(&source, options) {
        Ok(text) => {
            println!("{}", text);
            Ok(())
        }
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    }
}
