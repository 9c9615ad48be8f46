//! Character names shared by the reader and the printer.

/// Named character literals, as in `\newline`.
static CHAR_NAMES: [(&str, char); 6] = [
    ("newline", '\n'),
    ("space", ' '),
    ("tab", '\t'),
    ("backspace", '\u{8}'),
    ("formfeed", '\u{c}'),
    ("return", '\r'),
];

/// The character a name like `newline` stands for.
pub(crate) fn char_for_name(name: &str) -> Option<char> {
    CHAR_NAMES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, c)| *c)
}

/// The name of a character that has one.
pub(crate) fn name_for_char(c: char) -> Option<&'static str> {
    CHAR_NAMES.iter().find(|(_, ch)| *ch == c).map(|(n, _)| *n)
}
