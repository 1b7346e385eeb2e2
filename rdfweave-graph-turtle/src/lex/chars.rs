//! Turtle character classes
//!
//! Shared by the lexer and by the generator when it decides whether an IRI
//! can be written as a prefixed name.

/// Non-ASCII ranges of PN_CHARS_BASE
const NAME_START_RANGES: &[(char, char)] = &[
    ('\u{00C0}', '\u{00D6}'),
    ('\u{00D8}', '\u{00F6}'),
    ('\u{00F8}', '\u{02FF}'),
    ('\u{0370}', '\u{037D}'),
    ('\u{037F}', '\u{1FFF}'),
    ('\u{200C}', '\u{200D}'),
    ('\u{2070}', '\u{218F}'),
    ('\u{2C00}', '\u{2FEF}'),
    ('\u{3001}', '\u{D7FF}'),
    ('\u{F900}', '\u{FDCF}'),
    ('\u{FDF0}', '\u{FFFD}'),
    ('\u{10000}', '\u{EFFFF}'),
];

/// Extra non-ASCII ranges allowed after the first character of a name
const NAME_CONTINUE_RANGES: &[(char, char)] = &[
    ('\u{00B7}', '\u{00B7}'),
    ('\u{0300}', '\u{036F}'),
    ('\u{203F}', '\u{2040}'),
];

fn in_ranges(c: char, ranges: &[(char, char)]) -> bool {
    ranges.iter().any(|&(lo, hi)| (lo..=hi).contains(&c))
}

/// PN_CHARS_BASE: letters that may start a prefix
pub fn is_pn_chars_base(c: char) -> bool {
    c.is_ascii_alphabetic() || (!c.is_ascii() && in_ranges(c, NAME_START_RANGES))
}

/// PN_CHARS_U: PN_CHARS_BASE plus `_`
pub fn is_pn_chars_u(c: char) -> bool {
    c == '_' || is_pn_chars_base(c)
}

/// PN_CHARS: any character inside a name
pub fn is_pn_chars(c: char) -> bool {
    is_pn_chars_u(c) || c == '-' || c.is_ascii_digit() || in_ranges(c, NAME_CONTINUE_RANGES)
}

/// First character of a local name, excluding `%XX` and `\` escapes
pub fn is_pn_local_start(c: char) -> bool {
    is_pn_chars_u(c) || c == ':' || c.is_ascii_digit()
}

/// First character of a blank node label
pub fn is_blank_label_start(c: char) -> bool {
    is_pn_chars_u(c) || c.is_ascii_digit()
}

pub fn is_ws(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Characters allowed unescaped between `<` and `>`
pub fn is_iri_char(c: char) -> bool {
    !matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\' | '\x00'..='\x20')
}

/// `first` opens the name, `inner` continues it; a name never ends in `.`
fn is_name(name: &str, first: fn(char) -> bool, inner: fn(char) -> bool) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        None => true,
        Some(c) => first(c) && chars.all(|c| c == '.' || inner(c)) && !name.ends_with('.'),
    }
}

/// A PN_PREFIX, or the empty default prefix
pub fn is_pn_prefix(prefix: &str) -> bool {
    is_name(prefix, is_pn_chars_base, is_pn_chars)
}

/// A local name that needs no escapes; empty is accepted (`prefix:` alone)
pub fn is_plain_pn_local(local: &str) -> bool {
    is_name(local, is_pn_local_start, |c| c == ':' || is_pn_chars(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_characters() {
        assert!(is_pn_chars_base('é'));
        assert!(!is_pn_chars_base('_'));
        assert!(is_pn_chars_u('_'));
        assert!(is_pn_chars('\u{00B7}'));
        assert!(!is_pn_chars_base('\u{00B7}'));
        assert!(is_blank_label_start('7'));
        assert!(!is_blank_label_start('-'));
    }

    #[test]
    fn test_pn_prefix() {
        assert!(is_pn_prefix(""));
        assert!(is_pn_prefix("dc"));
        assert!(is_pn_prefix("a.b"));
        assert!(!is_pn_prefix("1x"));
        assert!(!is_pn_prefix("x."));
    }

    #[test]
    fn test_plain_local() {
        assert!(is_plain_pn_local("creator"));
        assert!(is_plain_pn_local("123"));
        assert!(is_plain_pn_local("a.b:c"));
        assert!(!is_plain_pn_local("a/b"));
        assert!(!is_plain_pn_local("end."));
        assert!(!is_plain_pn_local("-x"));
    }
}
