//! Scanners for tokens, numbers, strings, regexes, comments and character
//! literals, and the classification of plain tokens.

use num_bigint::BigInt;

use super::dispatch::{is_macro, is_terminating_macro, is_whitespace};
use super::error::{Error, ErrorCode, Result};
use super::read::Read;
use crate::host::Resolver;
use crate::number::{Decimal, Number};
use crate::style;
use crate::symbol::{Keyword, Symbol};
use crate::syntax::CharLiteral;
use crate::Form;

fn error<T>(code: ErrorCode) -> Result<T> {
    Err(Error::new(code))
}

/// Reads a token starting with `first`, up to whitespace, the end of input
/// or a terminating macro character, which is left unread.
pub(crate) fn read_token<R: Read>(read: &mut R, first: char) -> Result<String> {
    let mut token = String::new();
    token.push(first);
    loop {
        match read.next()? {
            None => return Ok(token),
            Some(ch) if is_whitespace(ch) || is_terminating_macro(ch) => {
                read.unread(ch);
                return Ok(token);
            }
            Some(ch) => token.push(ch),
        }
    }
}

/// Reads a number starting with `first`. Unlike a token, a number ends at
/// any macro character.
pub(crate) fn read_number<R: Read>(read: &mut R, first: char) -> Result<Number> {
    let mut token = String::new();
    token.push(first);
    loop {
        match read.next()? {
            None => break,
            Some(ch) if is_whitespace(ch) || is_macro(ch) => {
                read.unread(ch);
                break;
            }
            Some(ch) => token.push(ch),
        }
    }
    match match_number(&token) {
        Some(n) => Ok(n),
        None => error(ErrorCode::InvalidNumber(token)),
    }
}

/// Parses a numeric literal: an integer, a float or decimal, or a ratio.
pub(crate) fn match_number(s: &str) -> Option<Number> {
    if let Some(int) = match_integer(s) {
        return int;
    }
    if let Some(n) = match_float(s) {
        return Some(n);
    }
    match_ratio(s)
}

fn split_sign(s: &str) -> (bool, &str) {
    match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    }
}

fn all_digits(s: &str, radix: u32) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii() && c.is_digit(radix))
}

/// Matches the integer grammar. The outer `None` means "not an integer",
/// `Some(None)` an integer-shaped token that denotes no value, such as
/// `09` or `2r3`.
fn match_integer(s: &str) -> Option<Option<Number>> {
    let (negate, rest) = split_sign(s);
    if let Some(n) = match_radix(rest, negate) {
        return Some(n);
    }
    let (body, force_big) = match rest.strip_suffix('N') {
        Some(body) => (body, true),
        None => (rest, false),
    };
    let (digits, radix) = match body.as_bytes() {
        [b'0'] => ("0", 10),
        [b'1'..=b'9', ..] if all_digits(body, 10) => (body, 10),
        [b'0', b'x' | b'X', ..] if all_digits(&body[2..], 16) => (&body[2..], 16),
        [b'0', ..] if all_digits(&body[1..], 8) => (&body[1..], 8),
        [b'0', ..] if all_digits(&body[1..], 10) => return Some(None),
        _ => return None,
    };
    Some(Number::from_digits(digits, radix, negate, force_big))
}

/// `[1-9][0-9]?[rR][0-9A-Za-z]+`. The digits run to the end of the token,
/// so a trailing `N` is a digit here.
fn match_radix(s: &str, negate: bool) -> Option<Option<Number>> {
    let r = s.find(|c| c == 'r' || c == 'R')?;
    let (radix, digits) = (&s[..r], &s[r + 1..]);
    if radix.is_empty()
        || radix.len() > 2
        || radix.starts_with('0')
        || !all_digits(radix, 10)
        || digits.is_empty()
        || !digits.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }
    let radix: u32 = radix.parse().ok()?;
    Some(Number::from_digits(digits, radix, negate, false))
}

/// `[-+]?[0-9]+(\.[0-9]*)?([eE][-+]?[0-9]+)?M?`
fn match_float(s: &str) -> Option<Number> {
    let (text, exact) = match s.strip_suffix('M') {
        Some(text) => (text, true),
        None => (s, false),
    };
    let (_, unsigned) = split_sign(text);
    let (mantissa, exponent) = match unsigned.find(|c| c == 'e' || c == 'E') {
        Some(i) => (&unsigned[..i], Some(&unsigned[i + 1..])),
        None => (unsigned, None),
    };
    let (int, frac) = match mantissa.find('.') {
        Some(i) => (&mantissa[..i], Some(&mantissa[i + 1..])),
        None => (mantissa, None),
    };
    if !all_digits(int, 10) {
        return None;
    }
    if let Some(frac) = frac {
        if !frac.is_empty() && !all_digits(frac, 10) {
            return None;
        }
    }
    if let Some(exponent) = exponent {
        let (_, digits) = split_sign(exponent);
        if !all_digits(digits, 10) {
            return None;
        }
    }
    if exact {
        Decimal::parse(text).map(Number::decimal)
    } else {
        text.parse::<f64>().ok().map(Number::from)
    }
}

/// `[-+]?[0-9]+/[0-9]+`
fn match_ratio(s: &str) -> Option<Number> {
    let (negate, unsigned) = split_sign(s);
    let slash = unsigned.find('/')?;
    let (num, den) = (&unsigned[..slash], &unsigned[slash + 1..]);
    if !all_digits(num, 10) || !all_digits(den, 10) {
        return None;
    }
    let mut num: BigInt = num.parse().ok()?;
    if negate {
        num = -num;
    }
    Number::ratio(num, den.parse().ok()?)
}

/// Reads the body of a string literal, after the opening quote.
pub(crate) fn read_string<R: Read>(read: &mut R) -> Result<String> {
    let mut s = String::new();
    loop {
        let ch = match read.next()? {
            Some('"') => return Ok(s),
            Some('\\') => read_escape(read)?,
            Some(ch) => ch,
            None => return error(ErrorCode::EofWhileReadingString),
        };
        s.push(ch);
    }
}

fn next_in_string<R: Read>(read: &mut R) -> Result<char> {
    match read.next()? {
        Some(ch) => Ok(ch),
        None => error(ErrorCode::EofWhileReadingString),
    }
}

/// Decodes an escape sequence, after the backslash.
fn read_escape<R: Read>(read: &mut R) -> Result<char> {
    let ch = next_in_string(read)?;
    Ok(match ch {
        't' => '\t',
        'r' => '\r',
        'n' => '\n',
        '\\' => '\\',
        '"' => '"',
        'b' => '\u{8}',
        'f' => '\u{c}',
        'u' => {
            let high = read_unicode_escape(read)?;
            if !(0xD800..=0xDBFF).contains(&high) {
                return char::from_u32(high)
                    .ok_or_else(|| Error::new(ErrorCode::UnsupportedEscape(format!("\\u{:04x}", high))));
            }
            // A high surrogate must be followed by an escaped low surrogate.
            let lone = || Error::new(ErrorCode::UnsupportedEscape(format!("\\u{:04x}", high)));
            if next_in_string(read)? != '\\' || next_in_string(read)? != 'u' {
                return Err(lone());
            }
            let low = read_unicode_escape(read)?;
            if !(0xDC00..=0xDFFF).contains(&low) {
                return Err(lone());
            }
            let c = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
            char::from_u32(c).ok_or_else(lone)?
        }
        ch if ch.is_ascii_digit() => {
            let code = read_escape_digits(read, ch, 8, 3, false)?;
            if code > 0o377 {
                return error(ErrorCode::UnsupportedEscape(
                    "octal escape sequence must be in range [0, 377]".to_owned(),
                ));
            }
            char::from_u32(code).ok_or_else(|| {
                Error::new(ErrorCode::UnsupportedEscape(format!("\\{:o}", code)))
            })?
        }
        ch => return error(ErrorCode::UnsupportedEscape(format!("\\{}", ch))),
    })
}

/// Reads the four hex digits of a `\u` escape as a UTF-16 code unit.
fn read_unicode_escape<R: Read>(read: &mut R) -> Result<u32> {
    let first = next_in_string(read)?;
    read_escape_digits(read, first, 16, 4, true)
}

/// Reads up to `length` digits in `radix`, starting with `first`. Digits end
/// early at whitespace, a macro character, or the end of input; `exact`
/// requires all `length` of them.
fn read_escape_digits<R: Read>(
    read: &mut R,
    first: char,
    radix: u32,
    length: usize,
    exact: bool,
) -> Result<u32> {
    let invalid = |c: char| Error::new(ErrorCode::UnsupportedEscape(format!("invalid digit: {}", c)));
    let mut code = first.to_digit(radix).ok_or_else(|| invalid(first))?;
    let mut count = 1;
    while count < length {
        match read.next()? {
            None => break,
            Some(ch) if is_whitespace(ch) || is_macro(ch) => {
                read.unread(ch);
                break;
            }
            Some(ch) => {
                code = code * radix + ch.to_digit(radix).ok_or_else(|| invalid(ch))?;
                count += 1;
            }
        }
    }
    if exact && count != length {
        return error(ErrorCode::UnsupportedEscape(format!(
            "invalid character length: {}, should be: {}",
            count, length
        )));
    }
    Ok(code)
}

/// Reads the body of a regex literal verbatim, after the opening quote. A
/// backslash protects the following character.
pub(crate) fn read_regex<R: Read>(read: &mut R) -> Result<String> {
    let mut s = String::new();
    loop {
        match read.next()? {
            Some('"') => return Ok(s),
            Some(ch) => {
                s.push(ch);
                if ch == '\\' {
                    match read.next()? {
                        Some(ch) => s.push(ch),
                        None => return error(ErrorCode::EofWhileReadingRegex),
                    }
                }
            }
            None => return error(ErrorCode::EofWhileReadingRegex),
        }
    }
}

/// Reads the rest of the line. The line terminator is consumed but not
/// returned.
pub(crate) fn read_line<R: Read>(read: &mut R) -> Result<String> {
    let mut s = String::new();
    loop {
        match read.next()? {
            None | Some('\n') | Some('\r') => return Ok(s),
            Some(ch) => s.push(ch),
        }
    }
}

/// Reads a character literal, after the backslash.
pub(crate) fn read_char_literal<R: Read>(read: &mut R) -> Result<CharLiteral> {
    let first = match read.next()? {
        Some(ch) => ch,
        None => return error(ErrorCode::EofWhileReadingCharacter),
    };
    let token = read_token(read, first)?;
    let ch = char_for_token(&token)?;
    Ok(CharLiteral {
        token: token.into_boxed_str(),
        ch,
    })
}

fn char_for_token(token: &str) -> Result<char> {
    let unsupported = || Error::new(ErrorCode::UnsupportedCharacter(format!("\\{}", token)));
    let mut chars = token.chars();
    let first = chars.next().ok_or_else(unsupported)?;
    if chars.as_str().is_empty() {
        return Ok(first);
    }
    if let Some(ch) = style::char_for_name(token) {
        return Ok(ch);
    }
    let digits = chars.as_str();
    match first {
        'u' => {
            if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(unsupported());
            }
            let code = u32::from_str_radix(digits, 16).map_err(|_| unsupported())?;
            if (0xD800..=0xDFFF).contains(&code) {
                return error(ErrorCode::UnsupportedCharacter(format!(
                    "invalid character constant: \\u{:x}",
                    code
                )));
            }
            char::from_u32(code).ok_or_else(unsupported)
        }
        'o' => {
            if digits.len() > 3 || !digits.chars().all(|c| c.is_digit(8)) {
                return Err(unsupported());
            }
            let code = u32::from_str_radix(digits, 8).map_err(|_| unsupported())?;
            if code > 0o377 {
                return error(ErrorCode::UnsupportedCharacter(
                    "octal escape sequence must be in range [0, 377]".to_owned(),
                ));
            }
            char::from_u32(code).ok_or_else(unsupported)
        }
        _ => Err(unsupported()),
    }
}

/// Classifies a plain token as `nil`, a boolean, a symbol or a keyword.
pub(crate) fn interpret_token(token: &str, resolver: &dyn Resolver) -> Result<Form> {
    match token {
        "nil" => return Ok(Form::Nil),
        "true" => return Ok(Form::Bool(true)),
        "false" => return Ok(Form::Bool(false)),
        _ => {}
    }
    match match_symbol(token, resolver) {
        Some(form) => Ok(form),
        None => error(ErrorCode::InvalidToken(token.to_owned())),
    }
}

/// Splits `t` into a namespace part, including its trailing slash, and a
/// name. The name is either `/` or does not start with a digit and has no
/// slash; a namespace does not start with a digit or a slash.
fn symbol_parts(t: &str) -> Option<(Option<&str>, &str)> {
    let starts_well = |s: &str| {
        s.chars()
            .next()
            .map_or(false, |c| !c.is_ascii_digit() && c != '/')
    };
    if t == "/" {
        return Some((None, t));
    }
    if !t.contains('/') {
        return if starts_well(t) { Some((None, t)) } else { None };
    }
    if !starts_well(t) {
        return None;
    }
    let slash = t.rfind('/')?;
    let name = &t[slash + 1..];
    if starts_well(name) {
        Some((Some(&t[..=slash]), name))
    } else if name.is_empty() && t.len() > 2 && t.ends_with("//") {
        Some((Some(&t[..t.len() - 1]), "/"))
    } else {
        None
    }
}

fn match_symbol(s: &str, resolver: &dyn Resolver) -> Option<Form> {
    let parts = s
        .strip_prefix(':')
        .and_then(symbol_parts)
        .or_else(|| symbol_parts(s))?;
    let (ns, name) = parts;
    if ns.map_or(false, |ns| ns.ends_with(":/"))
        || name.ends_with(':')
        || s.chars().next().map_or(false, |c| s[c.len_utf8()..].contains("::"))
    {
        return None;
    }
    if let Some(rest) = s.strip_prefix("::") {
        let sym = Symbol::parse(rest);
        let ns = match sym.namespace() {
            Some(alias) => resolver.resolve_ns(alias),
            None => resolver.current_ns(),
        }?;
        return Some(Form::Keyword(Keyword::new(Some(ns.name()), sym.name())));
    }
    match s.strip_prefix(':') {
        Some(rest) => Some(Form::Keyword(Keyword::parse(rest))),
        None => Some(Form::Symbol(Symbol::parse(s))),
    }
}
