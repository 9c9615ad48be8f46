use crate::value::Value;

use proc_macro2::{Delimiter, Literal, Spacing, TokenStream, TokenTree};

#[derive(Debug)]
struct Parser {
    tokens: Vec<TokenTree>,
    index: usize,
}

#[derive(Debug)]
pub enum ParseError {
    ExpectedStringLiteral(Literal),
    UnexpectedToken(TokenTree),
    UnexpectedChar(char),
    UnexpectedDelimiter(Delimiter),
    OddMapElements(usize),
    UnexpectedEnd,
}

impl Parser {
    fn new(tokens: Vec<TokenTree>) -> Self {
        Parser { tokens, index: 0 }
    }

    fn next_token(&mut self) -> Option<&TokenTree> {
        let token = self.tokens.get(self.index)?;
        self.index += 1;
        Some(token)
    }

    fn token(&mut self) -> Result<TokenTree, ParseError> {
        self.next_token().cloned().ok_or(ParseError::UnexpectedEnd)
    }

    fn peek(&self) -> Option<&TokenTree> {
        self.tokens.get(self.index)
    }

    fn eat_token(&mut self) {
        assert!(self.index < self.tokens.len());
        self.index += 1;
    }

    fn parse(&mut self) -> Result<Value, ParseError> {
        match self.token()? {
            TokenTree::Punct(punct) => match punct.as_char() {
                '#' => self.parse_octothorpe(),
                ',' => Ok(Value::Unquoted(self.token()?)),
                ':' => self.parse_keyword(),
                c @ ('!' | '$' | '%' | '&' | '*' | '+' | '-' | '.' | '/' | '<' | '=' | '>'
                | '?') => match punct.spacing() {
                    Spacing::Joint => Ok(Value::Symbol(self.parse_identifier(c.to_string()))),
                    Spacing::Alone => match (c, self.peek()) {
                        ('-', Some(TokenTree::Literal(lit))) => {
                            let lit = lit.clone();
                            self.eat_token();
                            Ok(Value::Negated(lit))
                        }
                        _ => Ok(Value::Symbol(c.to_string())),
                    },
                },
                c => Err(ParseError::UnexpectedChar(c)),
            },
            TokenTree::Literal(literal) => Ok(Value::Literal(literal)),
            TokenTree::Ident(ident) => {
                let name = ident.to_string();
                Ok(match name.as_str() {
                    "nil" => Value::Nil,
                    "true" => Value::Bool(true),
                    "false" => Value::Bool(false),
                    _ => Value::Symbol(name),
                })
            }
            TokenTree::Group(group) => match group.delimiter() {
                Delimiter::Parenthesis => parse_seq(group.stream()).map(Value::List),
                Delimiter::Bracket => parse_seq(group.stream()).map(Value::Vector),
                Delimiter::Brace => {
                    let elements = parse_seq(group.stream())?;
                    if elements.len() % 2 != 0 {
                        return Err(ParseError::OddMapElements(elements.len()));
                    }
                    Ok(Value::Map(elements))
                }
                delim => Err(ParseError::UnexpectedDelimiter(delim)),
            },
        }
    }

    fn parse_identifier(&mut self, prefix: String) -> String {
        let mut identifier = prefix;
        while let Some(token) = self.peek() {
            match token {
                TokenTree::Punct(punct) => match punct.as_char() {
                    '!' | '$' | '%' | '&' | '*' | '+' | '-' | '.' | '/' | ':' | '<' | '=' | '>'
                    | '?' => {
                        identifier.push(punct.as_char());
                        let spacing = punct.spacing();
                        self.eat_token();
                        match spacing {
                            Spacing::Joint => {}
                            Spacing::Alone => break,
                        }
                    }
                    _ => break,
                },
                TokenTree::Ident(part) => {
                    identifier.push_str(&part.to_string());
                    self.eat_token();
                    break;
                }
                _ => break,
            }
        }
        identifier
    }

    // After the colon: `:name` or `:"ns/kebab-name"`.
    fn parse_keyword(&mut self) -> Result<Value, ParseError> {
        match self.token()? {
            TokenTree::Ident(ident) => Ok(Value::Keyword(ident.to_string())),
            TokenTree::Literal(lit) => Ok(Value::Keyword(string_literal(&lit)?)),
            token => Err(ParseError::UnexpectedToken(token)),
        }
    }

    fn parse_octothorpe(&mut self) -> Result<Value, ParseError> {
        match self.token()? {
            TokenTree::Literal(lit) => Ok(Value::Symbol(string_literal(&lit)?)),
            TokenTree::Group(group) => match group.delimiter() {
                Delimiter::Brace => parse_seq(group.stream()).map(Value::Set),
                delim => Err(ParseError::UnexpectedDelimiter(delim)),
            },
            token => Err(ParseError::UnexpectedToken(token)),
        }
    }
}

fn string_literal(lit: &Literal) -> Result<String, ParseError> {
    let s = lit.to_string();
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        Ok(s[1..s.len() - 1].to_string())
    } else {
        Err(ParseError::ExpectedStringLiteral(lit.clone()))
    }
}

fn parse_seq(tokens: TokenStream) -> Result<Vec<Value>, ParseError> {
    let mut elements = vec![];
    let mut parser = Parser::new(tokens.into_iter().collect());
    while parser.peek().is_some() {
        elements.push(parser.parse()?);
    }
    Ok(elements)
}

pub fn parse(tokens: TokenStream) -> Result<Value, ParseError> {
    let mut parser = Parser::new(tokens.into_iter().collect());
    let value = parser.parse()?;
    match parser.next_token() {
        None => Ok(value),
        Some(token) => Err(ParseError::UnexpectedToken(token.clone())),
    }
}
