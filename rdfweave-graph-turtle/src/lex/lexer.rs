//! Turtle lexer implementation using winnow.
//!
//! Tokenizes Turtle input into a stream of tokens with byte spans. Fails fast
//! on the first lexical error; the error says whether the input ended inside a
//! token, contained a bad escape, or held a malformed token.

use std::sync::Arc;

use winnow::ascii::digit1;
use winnow::combinator::{alt, delimited, opt, peek, preceded};
use winnow::error::{ContextError, ErrMode};
use winnow::stream::{AsChar, Location, Stream};
use winnow::token::{any, one_of, take_till, take_while};
use winnow::{LocatingSlice, ModalResult, Parser};

use super::chars::*;
use super::token::{Token, TokenKind};
use crate::error::{Result, TurtleError};

/// Input type for the lexer - tracks position for spans.
pub type Input<'a> = LocatingSlice<&'a str>;

fn backtrack() -> ErrMode<ContextError> {
    ErrMode::Backtrack(ContextError::new())
}

/// Character after the next one
fn second_char(input: &Input<'_>) -> Option<char> {
    let text: &str = input;
    text.chars().nth(1)
}

/// Byte offset to line/column lookup
#[derive(Debug, Clone)]
pub struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(input: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(input.match_indices('\n').map(|(idx, _)| idx + 1))
            .collect();
        Self { starts }
    }

    /// 1-based line containing `position`
    pub fn line(&self, position: usize) -> usize {
        match self.starts.binary_search(&position) {
            Ok(idx) => idx + 1,
            Err(idx) => idx,
        }
    }

    /// 1-based (line, column); columns count characters
    pub fn line_col(&self, input: &str, position: usize) -> (usize, usize) {
        let line = self.line(position);
        let start = self.starts[line - 1];
        let column = input
            .get(start..position)
            .map_or(0, |prefix| prefix.chars().count());
        (line, column + 1)
    }

    /// Text of a 1-based line, without its terminator
    pub fn line_text<'a>(&self, input: &'a str, line: usize) -> &'a str {
        let start = self.starts.get(line - 1).copied().unwrap_or(input.len());
        let rest = &input[start..];
        let end = rest.find('\n').unwrap_or(rest.len());
        rest[..end].trim_end_matches('\r')
    }
}

/// Lexer for Turtle documents.
pub struct Lexer<'a> {
    input: &'a str,
    lines: LineIndex,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            lines: LineIndex::new(input),
        }
    }

    /// Tokenize the entire input; the last token is always `Eof`.
    pub fn tokenize(self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        let mut input = LocatingSlice::new(self.input);

        loop {
            skip_ws_and_comments(&mut input);

            if input.is_empty() {
                let pos = input.current_token_start();
                tokens.push(Token::new(TokenKind::Eof, pos, pos));
                break;
            }

            let start = input.current_token_start();
            match next_token(&mut input) {
                Ok(kind) => {
                    let end = input.current_token_start();
                    tokens.push(Token::new(kind, start, end));
                }
                Err(_) => return Err(self.diagnose(start)),
            }
        }

        Ok(tokens)
    }

    /// Work out why no token could be read at `position`.
    fn diagnose(&self, position: usize) -> TurtleError {
        let rest = &self.input[position..];
        let (line, column) = self.lines.line_col(self.input, position);

        if let Some(sequence) = invalid_escape(rest) {
            return TurtleError::InvalidEscape { line, sequence };
        }
        if let Some(what) = unterminated(rest) {
            return TurtleError::UnexpectedEof {
                line,
                message: format!("unterminated {} starting at column {}", what, column),
            };
        }

        let bad_char = rest.chars().next().unwrap_or('?');
        let headline = match bad_char {
            '"' | '\'' => "unterminated string literal".to_string(),
            '<' => "invalid IRI".to_string(),
            c if !c.is_ascii() && !is_pn_chars_base(c) => format!(
                "unexpected character '{}' (U+{:04X})",
                c.escape_unicode(),
                c as u32
            ),
            c => format!("unexpected character '{}'", c),
        };
        let pointer = " ".repeat(column.saturating_sub(1));
        let message = format!(
            "{}\n  |\n  | {}\n  | {}^",
            headline,
            self.lines.line_text(self.input, line),
            pointer
        );

        TurtleError::Lexer {
            line,
            column,
            message,
        }
    }
}

/// First bad escape inside the string or IRI that starts `rest`
fn invalid_escape(rest: &str) -> Option<String> {
    let open = rest.chars().next()?;
    let (fence, escapes) = match open {
        '"' | '\'' => {
            let long = if open == '"' { "\"\"\"" } else { "'''" };
            let fence = if rest.starts_with(long) { long } else { &rest[..1] };
            (fence, "tbnrf\"'\\uU")
        }
        '<' => (">", "uU"),
        _ => return None,
    };
    let body = &rest[fence.len()..];
    let single_line = fence.len() == 1 && open != '<';

    let mut chars = body.char_indices();
    while let Some((idx, c)) = chars.next() {
        if body[idx..].starts_with(fence) || (single_line && c == '\n') {
            return None;
        }
        if c != '\\' {
            continue;
        }
        let (_, escaped) = chars.next()?;
        if !escapes.contains(escaped) {
            return Some(format!("\\{}", escaped));
        }
        if escaped == 'u' || escaped == 'U' {
            let width = if escaped == 'u' { 4 } else { 8 };
            let hex: String = body[idx + 2..].chars().take(width).collect();
            let decodes = hex.len() == width
                && u32::from_str_radix(&hex, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .is_some();
            if !decodes {
                return Some(format!("\\{}{}", escaped, hex));
            }
            chars.nth(width - 1);
        }
    }
    None
}

/// Kind of token that runs to the end of input without being closed
fn unterminated(rest: &str) -> Option<&'static str> {
    for (fence, what) in [("\"\"\"", "long string"), ("'''", "long string")] {
        if let Some(body) = rest.strip_prefix(fence) {
            return (!body.contains(fence)).then_some(what);
        }
    }
    match rest.chars().next()? {
        quote @ ('"' | '\'') => {
            let mut chars = rest[1..].chars();
            while let Some(c) = chars.next() {
                match c {
                    '\\' => {
                        chars.next();
                    }
                    '\n' | '\r' => return None,
                    c if c == quote => return None,
                    _ => {}
                }
            }
            Some("string")
        }
        '<' => (!rest.contains('>')).then_some("IRI"),
        _ => None,
    }
}

/// Read `value` as exactly one token, if it is one.
pub(crate) fn single_token(value: &str) -> Option<TokenKind> {
    let mut input = LocatingSlice::new(value);
    let kind = next_token(&mut input).ok()?;
    input.is_empty().then_some(kind)
}

/// Skip whitespace and comments.
fn skip_ws_and_comments(input: &mut Input<'_>) {
    loop {
        let _: ModalResult<&str, ContextError> = take_while(0.., is_ws).parse_next(input);

        if input.starts_with('#') {
            let _: ModalResult<&str, ContextError> =
                take_till(0.., |c| c == '\n' || c == '\r').parse_next(input);
        } else {
            break;
        }
    }
}

/// Parse the next token.
fn next_token(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    alt((
        parse_double_caret,
        parse_iri_ref,
        // blank nodes before prefixed names: `_:` is not a prefix
        parse_blank_node_label,
        parse_anon,
        parse_nil,
        parse_at_directive,
        parse_default_prefix,
        parse_prefixed_name_or_keyword,
        parse_string_literal,
        parse_number,
        parse_punctuation,
    ))
    .parse_next(input)
}

// =============================================================================
// IRIs
// =============================================================================

fn parse_iri_ref(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    delimited('<', parse_iri_content, '>')
        .map(|s: String| TokenKind::Iri(Arc::from(s)))
        .parse_next(input)
}

/// Content of an IRI reference, with `\u`/`\U` escapes decoded.
/// Empty content is a reference to the base.
fn parse_iri_content(input: &mut Input<'_>) -> ModalResult<String> {
    let mut result = String::new();

    loop {
        let chunk: &str = take_while(0.., is_iri_char).parse_next(input)?;
        result.push_str(chunk);

        if input.is_empty() || input.starts_with('>') {
            return Ok(result);
        }
        if !input.starts_with('\\') {
            return Err(backtrack());
        }
        '\\'.parse_next(input)?;
        match any.parse_next(input)? {
            'u' => result.push(parse_hex_char(input, 4)?),
            'U' => result.push(parse_hex_char(input, 8)?),
            _ => return Err(backtrack()),
        }
    }
}

/// Exactly `width` hex digits naming a Unicode scalar value.
fn parse_hex_char(input: &mut Input<'_>, width: usize) -> ModalResult<char> {
    let hex: &str = take_while(width..=width, AsChar::is_hex_digit).parse_next(input)?;
    u32::from_str_radix(hex, 16)
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(backtrack)
}

// =============================================================================
// Directives and language tags
// =============================================================================

fn parse_at_directive(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    '@'.parse_next(input)?;

    let word: &str =
        take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '-').parse_next(input)?;

    match word {
        "prefix" => Ok(TokenKind::KwPrefix),
        "base" => Ok(TokenKind::KwBase),
        _ if word.starts_with(|c: char| c.is_ascii_alphabetic()) => {
            Ok(TokenKind::LangTag(Arc::from(word)))
        }
        _ => Err(backtrack()),
    }
}

// =============================================================================
// Prefixed names and keywords
// =============================================================================

/// `:local` or `:` alone.
fn parse_default_prefix(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    ':'.parse_next(input)?;

    match opt(parse_pn_local).parse_next(input)? {
        Some(local) => Ok(TokenKind::PrefixedName {
            prefix: Arc::from(""),
            local: Arc::from(local),
        }),
        None => Ok(TokenKind::PrefixedNameNs(Arc::from(""))),
    }
}

/// Prefixed name, or one of the bare keywords (a, true, false, PREFIX, BASE).
fn parse_prefixed_name_or_keyword(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    let start = input.checkpoint();

    let first: char = any.parse_next(input)?;
    let mut word = String::from(first);

    loop {
        let chunk: &str = take_while(0.., is_pn_chars).parse_next(input)?;
        word.push_str(chunk);

        // a dot belongs to the name only when more name characters follow
        let continues = input.starts_with('.') && second_char(input).is_some_and(is_pn_chars);
        if !continues {
            break;
        }
        '.'.parse_next(input)?;
        word.push('.');
    }

    if peek(opt(':')).parse_next(input)?.is_some() {
        if !is_pn_chars_base(first) {
            input.reset(&start);
            return Err(backtrack());
        }
        ':'.parse_next(input)?;

        return match opt(parse_pn_local).parse_next(input)? {
            Some(local) => Ok(TokenKind::PrefixedName {
                prefix: Arc::from(word),
                local: Arc::from(local),
            }),
            None => Ok(TokenKind::PrefixedNameNs(Arc::from(word))),
        };
    }

    match word.as_str() {
        "a" => Ok(TokenKind::KwA),
        "true" => Ok(TokenKind::KwTrue),
        "false" => Ok(TokenKind::KwFalse),
        _ if word.eq_ignore_ascii_case("PREFIX") => Ok(TokenKind::KwSparqlPrefix),
        _ if word.eq_ignore_ascii_case("BASE") => Ok(TokenKind::KwSparqlBase),
        _ => {
            input.reset(&start);
            Err(backtrack())
        }
    }
}

/// Local part of a prefixed name; `\` escapes are decoded, `%XX` kept.
fn parse_pn_local(input: &mut Input<'_>) -> ModalResult<String> {
    let first = input.chars().next().ok_or_else(backtrack)?;
    if !is_pn_local_start(first) && first != '%' && first != '\\' {
        return Err(backtrack());
    }

    let mut result = String::new();

    loop {
        let chunk: &str =
            take_while(0.., |c: char| is_pn_chars(c) || c == ':').parse_next(input)?;
        result.push_str(chunk);

        if input.starts_with('.') {
            if second_char(input).is_some_and(|c| is_pn_chars(c) || matches!(c, ':' | '%' | '\\')) {
                '.'.parse_next(input)?;
                result.push('.');
                continue;
            }
            break;
        }

        if input.starts_with('%') {
            '%'.parse_next(input)?;
            let hex: &str = take_while(2..=2, AsChar::is_hex_digit).parse_next(input)?;
            result.push('%');
            result.push_str(hex);
        } else if input.starts_with('\\') {
            '\\'.parse_next(input)?;
            let escaped: char = any.parse_next(input)?;
            if !"_~.-!$&'()*+,;=/?#@%".contains(escaped) {
                return Err(backtrack());
            }
            result.push(escaped);
        } else {
            break;
        }
    }

    if result.is_empty() {
        return Err(backtrack());
    }
    Ok(result)
}

// =============================================================================
// Blank nodes
// =============================================================================

fn parse_blank_node_label(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    preceded("_:", parse_blank_node_name)
        .map(|name: String| TokenKind::BlankNodeLabel(Arc::from(name)))
        .parse_next(input)
}

/// Blank node name; a trailing dot is left for the statement terminator.
fn parse_blank_node_name(input: &mut Input<'_>) -> ModalResult<String> {
    let first: char = one_of(is_blank_label_start).parse_next(input)?;
    let mut name = String::from(first);

    loop {
        let chunk: &str = take_while(0.., is_pn_chars).parse_next(input)?;
        name.push_str(chunk);

        if !(input.starts_with('.') && second_char(input).is_some_and(is_pn_chars)) {
            return Ok(name);
        }
        '.'.parse_next(input)?;
        name.push('.');
    }
}

fn parse_anon(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    ('[', take_while(0.., is_ws), ']')
        .map(|_| TokenKind::Anon)
        .parse_next(input)
}

fn parse_nil(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    ('(', take_while(0.., is_ws), ')')
        .map(|_| TokenKind::Nil)
        .parse_next(input)
}

// =============================================================================
// String literals
// =============================================================================

fn parse_string_literal(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    alt((
        long_string('"'),
        long_string('\''),
        short_string('"'),
        short_string('\''),
    ))
    .map(|s: String| TokenKind::String(Arc::from(s)))
    .parse_next(input)
}

/// Single-line string delimited by `quote`
fn short_string<'a>(mut quote: char) -> impl FnMut(&mut Input<'a>) -> ModalResult<String> {
    move |input: &mut Input<'a>| {
        quote.parse_next(input)?;
        let mut result = String::new();
        loop {
            let chunk: &str =
                take_while(0.., |c: char| c != quote && !matches!(c, '\\' | '\n' | '\r'))
                    .parse_next(input)?;
            result.push_str(chunk);

            match input.chars().next() {
                Some('\\') => {
                    '\\'.parse_next(input)?;
                    result.push(parse_escape_char(input)?);
                }
                Some(c) if c == quote => {
                    quote.parse_next(input)?;
                    return Ok(result);
                }
                _ => return Err(backtrack()),
            }
        }
    }
}

/// Triple-quoted string delimited by `quote`
fn long_string<'a>(mut quote: char) -> impl FnMut(&mut Input<'a>) -> ModalResult<String> {
    let mut fence = if quote == '"' { "\"\"\"" } else { "'''" };
    move |input: &mut Input<'a>| {
        fence.parse_next(input)?;
        let mut result = String::new();
        loop {
            let chunk: &str =
                take_while(0.., |c: char| c != quote && c != '\\').parse_next(input)?;
            result.push_str(chunk);

            // up to two quotes directly before the fence belong to the content
            let run = input.chars().take_while(|&c| c == quote).count();
            if run >= 3 {
                for _ in 0..(run - 3).min(2) {
                    result.push(quote.parse_next(input)?);
                }
                fence.parse_next(input)?;
                return Ok(result);
            }
            match input.chars().next() {
                Some('\\') => {
                    '\\'.parse_next(input)?;
                    result.push(parse_escape_char(input)?);
                }
                // lone quote inside the long string
                Some(_) => result.push(any.parse_next(input)?),
                None => return Err(backtrack()),
            }
        }
    }
}

fn parse_escape_char(input: &mut Input<'_>) -> ModalResult<char> {
    match any.parse_next(input)? {
        't' => Ok('\t'),
        'b' => Ok('\x08'),
        'n' => Ok('\n'),
        'r' => Ok('\r'),
        'f' => Ok('\x0C'),
        '"' => Ok('"'),
        '\'' => Ok('\''),
        '\\' => Ok('\\'),
        'u' => parse_hex_char(input, 4),
        'U' => parse_hex_char(input, 8),
        _ => Err(backtrack()),
    }
}

// =============================================================================
// Numbers
// =============================================================================

fn at_exponent(input: &Input<'_>) -> bool {
    input.starts_with(|c: char| c == 'e' || c == 'E')
}

fn parse_number(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    alt((parse_double, parse_decimal, parse_integer)).parse_next(input)
}

fn parse_integer(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    let lexical: &str = (opt(one_of(['+', '-'])), digit1).take().parse_next(input)?;

    if at_exponent(input) {
        return Err(backtrack());
    }
    if input.starts_with('.') && second_char(input).is_some_and(|c| c.is_ascii_digit()) {
        return Err(backtrack());
    }

    Ok(TokenKind::Integer(Arc::from(lexical)))
}

fn parse_decimal(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    let lexical: &str = (
        opt(one_of(['+', '-'])),
        alt(((digit1, '.', digit1).take(), ('.', digit1).take())),
    )
        .take()
        .parse_next(input)?;

    if at_exponent(input) {
        return Err(backtrack());
    }

    Ok(TokenKind::Decimal(Arc::from(lexical)))
}

fn parse_double(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    let lexical: &str = (
        opt(one_of(['+', '-'])),
        alt((
            (digit1, '.', opt(digit1)).take(),
            ('.', digit1).take(),
            digit1,
        )),
        one_of(['e', 'E']),
        opt(one_of(['+', '-'])),
        digit1,
    )
        .take()
        .parse_next(input)?;

    Ok(TokenKind::Double(Arc::from(lexical)))
}

// =============================================================================
// Punctuation
// =============================================================================

fn parse_double_caret(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    "^^".map(|_| TokenKind::DoubleCaret).parse_next(input)
}

fn parse_punctuation(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    any.verify_map(|c| match c {
        '.' => Some(TokenKind::Dot),
        ',' => Some(TokenKind::Comma),
        ';' => Some(TokenKind::Semicolon),
        '[' => Some(TokenKind::LBracket),
        ']' => Some(TokenKind::RBracket),
        '(' => Some(TokenKind::LParen),
        ')' => Some(TokenKind::RParen),
        _ => None,
    })
    .parse_next(input)
}

/// Tokenize a Turtle document string.
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    Lexer::new(input).tokenize()
}
