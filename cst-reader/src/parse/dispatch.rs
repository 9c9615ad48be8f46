//! Character-indexed tables selecting a reader macro.

/// Reader macros entered directly by their trigger character.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Macro {
    String,
    Comment,
    Comma,
    Quote,
    Deref,
    Meta,
    SyntaxQuote,
    Unquote,
    List,
    Vector,
    Map,
    Unmatched,
    Character,
    Arg,
    Dispatch,
}

/// Reader macros entered through `#`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum DispatchMacro {
    Meta,
    Var,
    Regex,
    FnLiteral,
    Set,
    Eval,
    Shebang,
    Unreadable,
    Discard,
    Conditional,
    Symbolic,
}

// Lookup table of macro characters. Characters above \xFF are never macros.
static MACROS: [Option<Macro>; 256] = {
    const ST: Option<Macro> = Some(Macro::String); // \x22 "
    const DI: Option<Macro> = Some(Macro::Dispatch); // \x23 #
    const AR: Option<Macro> = Some(Macro::Arg); // \x25 %
    const QT: Option<Macro> = Some(Macro::Quote); // \x27 '
    const LP: Option<Macro> = Some(Macro::List); // \x28 (
    const UN: Option<Macro> = Some(Macro::Unmatched); // \x29 ) \x5D ] \x7D }
    const CM: Option<Macro> = Some(Macro::Comma); // \x2C ,
    const SC: Option<Macro> = Some(Macro::Comment); // \x3B ;
    const DR: Option<Macro> = Some(Macro::Deref); // \x40 @
    const LB: Option<Macro> = Some(Macro::Vector); // \x5B [
    const CH: Option<Macro> = Some(Macro::Character); // \x5C \
    const MT: Option<Macro> = Some(Macro::Meta); // \x5E ^
    const SQ: Option<Macro> = Some(Macro::SyntaxQuote); // \x60 `
    const LC: Option<Macro> = Some(Macro::Map); // \x7B {
    const UQ: Option<Macro> = Some(Macro::Unquote); // \x7E ~
    const __: Option<Macro> = None;
    [
        //   1   2   3   4   5   6   7   8   9   A   B   C   D   E   F
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 0
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 1
        __, __, ST, DI, __, AR, __, QT, LP, UN, __, __, CM, __, __, __, // 2
        __, __, __, __, __, __, __, __, __, __, __, SC, __, __, __, __, // 3
        DR, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 4
        __, __, __, __, __, __, __, __, __, __, __, LB, CH, UN, MT, __, // 5
        SQ, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 6
        __, __, __, __, __, __, __, __, __, __, __, LC, __, UN, UQ, __, // 7
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 8
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 9
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // A
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // B
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // C
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // D
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // E
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // F
    ]
};

// Lookup table of characters following `#`. A `#` followed by anything else
// starts a tagged literal.
static DISPATCH_MACROS: [Option<DispatchMacro>; 256] = {
    const SB: Option<DispatchMacro> = Some(DispatchMacro::Shebang); // \x21 !
    const RX: Option<DispatchMacro> = Some(DispatchMacro::Regex); // \x22 "
    const SY: Option<DispatchMacro> = Some(DispatchMacro::Symbolic); // \x23 #
    const VR: Option<DispatchMacro> = Some(DispatchMacro::Var); // \x27 '
    const FN: Option<DispatchMacro> = Some(DispatchMacro::FnLiteral); // \x28 (
    const UR: Option<DispatchMacro> = Some(DispatchMacro::Unreadable); // \x3C <
    const EV: Option<DispatchMacro> = Some(DispatchMacro::Eval); // \x3D =
    const RC: Option<DispatchMacro> = Some(DispatchMacro::Conditional); // \x3F ?
    const MT: Option<DispatchMacro> = Some(DispatchMacro::Meta); // \x5E ^
    const DS: Option<DispatchMacro> = Some(DispatchMacro::Discard); // \x5F _
    const ST: Option<DispatchMacro> = Some(DispatchMacro::Set); // \x7B {
    const __: Option<DispatchMacro> = None;
    [
        //   1   2   3   4   5   6   7   8   9   A   B   C   D   E   F
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 0
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 1
        __, SB, RX, SY, __, __, __, VR, FN, __, __, __, __, __, __, __, // 2
        __, __, __, __, __, __, __, __, __, __, __, __, UR, EV, __, RC, // 3
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 4
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, MT, DS, // 5
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 6
        __, __, __, __, __, __, __, __, __, __, __, ST, __, __, __, __, // 7
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 8
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 9
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // A
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // B
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // C
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // D
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // E
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // F
    ]
};

#[inline]
pub(crate) fn macro_for(ch: char) -> Option<Macro> {
    MACROS.get(ch as usize).copied().flatten()
}

#[inline]
pub(crate) fn dispatch_macro_for(ch: char) -> Option<DispatchMacro> {
    DISPATCH_MACROS.get(ch as usize).copied().flatten()
}

#[inline]
pub(crate) fn is_macro(ch: char) -> bool {
    macro_for(ch).is_some()
}

/// Macro characters that end a token. `#`, `'` and `%` may appear inside
/// symbols.
#[inline]
pub(crate) fn is_terminating_macro(ch: char) -> bool {
    ch != '#' && ch != '\'' && ch != '%' && is_macro(ch)
}

/// Whitespace as the reader sees it: Unicode space and line separators
/// other than the no-break spaces, plus the ASCII controls `\t` to `\r` and
/// `\x1C` to `\x1F`. Commas are not whitespace, they are read as nodes of
/// their own.
#[inline]
pub(crate) fn is_whitespace(ch: char) -> bool {
    match ch {
        '\u{1C}'..='\u{1F}' => true,
        '\u{85}' | '\u{A0}' | '\u{2007}' | '\u{202F}' => false,
        _ => ch.is_whitespace(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_match_triggers() {
        let primary: Vec<char> = (0u8..=255)
            .map(char::from)
            .filter(|c| is_macro(*c))
            .collect();
        assert_eq!(primary.into_iter().collect::<String>(), "\"#%'(),;@[\\]^`{}~");

        let dispatch: String = (0u8..=255)
            .map(char::from)
            .filter(|c| dispatch_macro_for(*c).is_some())
            .collect();
        assert_eq!(dispatch, "!\"#'(<=?^_{");
    }

    #[test]
    fn token_characters() {
        for c in "#'%".chars() {
            assert!(is_macro(c));
            assert!(!is_terminating_macro(c));
        }
        assert!(is_terminating_macro(')'));
        assert!(!is_terminating_macro('λ'));
    }

    #[test]
    fn whitespace() {
        assert!(is_whitespace(' '));
        assert!(is_whitespace('\u{1F}'));
        assert!(is_whitespace('\u{2003}'));
        assert!(!is_whitespace('\u{A0}'));
        assert!(!is_whitespace('\u{85}'));
        assert!(is_whitespace('\u{2028}'));
        assert!(!is_whitespace(','));
    }
}
