//! IRI value type
//!
//! `Iri` holds the RFC 3986 components of an identifier separately. The same
//! type also carries the two non-standard forms the rest of the crate relies
//! on:
//!
//! - compact IRIs (`dc:creator`), which parse as an opaque IRI whose scheme is
//!   the prefix and whose path is the local part
//! - blank nodes (`_:b1`), which use the reserved scheme `_`
//!
//! Equality and hashing are structural over the components, with the scheme
//! and host compared case-insensitively and a scheme's default port treated
//! as absent.

use crate::error::IriError;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

const BLANK_SCHEME: &str = "_";

/// ASCII characters that are percent-encoded in query and fragment components.
///
/// `%` is deliberately absent so that encoding an already encoded value is a no-op.
const COMPONENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'[')
    .add(b']')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}')
    .add(b'#');

const PATH: &AsciiSet = &COMPONENT.add(b'?');

#[derive(Clone, Copy, PartialEq, Eq)]
enum Component {
    Path,
    Query,
    Fragment,
}

/// An IRI, compact IRI or blank node identifier
#[derive(Clone, Debug, Default)]
pub struct Iri {
    scheme: Option<String>,
    user_info: Option<String>,
    /// `Some` whenever an authority is present (possibly empty, as in `file:///x`)
    host: Option<String>,
    port: Option<u16>,
    /// Hierarchical path, or the scheme-specific part of an opaque IRI
    path: String,
    query: Option<String>,
    fragment: Option<String>,
}

impl Iri {
    /// Parse an IRI string
    ///
    /// Strings without a scheme ("@context", "#frag", "../x") parse as relative
    /// references. `_:label` parses as a blank node.
    pub fn parse(input: &str) -> Result<Self, IriError> {
        validate_characters(input)?;

        if let Some(label) = input.strip_prefix("_:") {
            return Ok(Self::blank(label));
        }

        let (rest, fragment) = split_off(input, '#');
        let (rest, query) = split_off(rest, '?');
        let (scheme, rest) = split_scheme(input, rest)?;

        let mut iri = Iri {
            scheme,
            query,
            fragment,
            ..Default::default()
        };

        match rest.strip_prefix("//") {
            Some(after) => {
                let end = after.find('/').unwrap_or(after.len());
                let (authority, path) = after.split_at(end);
                let (user_info, host, port) = parse_authority(input, authority)?;
                iri.user_info = user_info;
                iri.host = Some(host);
                iri.port = port;
                iri.path = path.to_string();
            }
            None => iri.path = rest.to_string(),
        }

        Ok(iri)
    }

    /// IRI from a vocabulary constant
    ///
    /// A constant that does not parse is kept verbatim as a relative reference.
    pub fn constant(iri: &'static str) -> Self {
        Iri::parse(iri).unwrap_or_else(|_| Iri {
            path: iri.to_string(),
            ..Default::default()
        })
    }

    /// Start building an IRI from components
    pub fn builder() -> IriBuilder {
        IriBuilder::default()
    }

    /// Create a blank node identifier (`_:label`)
    pub fn blank(label: impl Into<String>) -> Self {
        Iri {
            scheme: Some(BLANK_SCHEME.to_string()),
            path: label.into(),
            ..Default::default()
        }
    }

    /// Check whether this is a blank node identifier
    pub fn is_blank(&self) -> bool {
        self.scheme.as_deref() == Some(BLANK_SCHEME)
    }

    /// Blank node label, without the `_:` prefix
    pub fn blank_label(&self) -> Option<&str> {
        self.is_blank().then_some(self.path.as_str())
    }

    /// Check whether this IRI has a scheme (and is not a blank node)
    pub fn is_absolute(&self) -> bool {
        self.scheme.is_some() && !self.is_blank()
    }

    /// Check whether this IRI has a scheme but no hierarchical part
    /// (`urn:isbn:1234`, `mailto:a@b`, `dc:creator`)
    pub fn is_opaque(&self) -> bool {
        self.is_absolute() && self.host.is_none() && !self.path.starts_with('/')
    }

    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    pub fn user_info(&self) -> Option<&str> {
        self.user_info.as_deref()
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Path component, `None` when empty
    pub fn path(&self) -> Option<&str> {
        (!self.path.is_empty()).then_some(self.path.as_str())
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// Everything after `scheme:` up to (not including) the fragment
    pub fn scheme_specific_part(&self) -> String {
        let mut out = String::new();
        if let Some(host) = &self.host {
            out.push_str("//");
            if let Some(user_info) = &self.user_info {
                out.push_str(user_info);
                out.push('@');
            }
            out.push_str(host);
            if let Some(port) = self.port {
                out.push(':');
                out.push_str(&port.to_string());
            }
        }
        out.push_str(&self.path);
        if let Some(query) = &self.query {
            out.push('?');
            out.push_str(query);
        }
        out
    }

    /// Query with IRI-profile percent-encoding applied
    pub fn encoded_query(&self) -> Option<String> {
        self.query
            .as_deref()
            .map(|q| encode_component(q, Component::Query))
    }

    /// Query with percent-escapes decoded
    pub fn decoded_query(&self) -> Option<String> {
        self.query.as_deref().map(decode_component)
    }

    /// Fragment with IRI-profile percent-encoding applied
    pub fn encoded_fragment(&self) -> Option<String> {
        self.fragment
            .as_deref()
            .map(|f| encode_component(f, Component::Fragment))
    }

    /// Fragment with percent-escapes decoded
    pub fn decoded_fragment(&self) -> Option<String> {
        self.fragment.as_deref().map(decode_component)
    }

    /// ASCII-only URI form (RFC 3987 §3.1 mapping)
    pub fn to_uri_string(&self) -> String {
        utf8_percent_encode(&self.to_string(), CONTROLS).to_string()
    }

    /// Resolve a reference against this IRI as base (RFC 3986 §5.2)
    pub fn resolve(&self, reference: &str) -> Result<Iri, IriError> {
        let r = Iri::parse(reference)?;
        if r.is_blank() {
            return Ok(r);
        }
        if r.scheme.is_some() {
            let path = remove_dot_segments(&r.path);
            return Ok(Iri { path, ..r });
        }

        let mut target = Iri {
            scheme: self.scheme.clone(),
            fragment: r.fragment,
            ..Default::default()
        };

        if r.host.is_some() {
            target.user_info = r.user_info;
            target.host = r.host;
            target.port = r.port;
            target.path = remove_dot_segments(&r.path);
            target.query = r.query;
            return Ok(target);
        }

        target.user_info = self.user_info.clone();
        target.host = self.host.clone();
        target.port = self.port;

        if r.path.is_empty() {
            target.path = self.path.clone();
            target.query = r.query.or_else(|| self.query.clone());
        } else {
            target.path = if r.path.starts_with('/') {
                remove_dot_segments(&r.path)
            } else {
                remove_dot_segments(&self.merge(&r.path))
            };
            target.query = r.query;
        }

        Ok(target)
    }

    /// Merge a relative path with this IRI's path (RFC 3986 §5.2.3)
    fn merge(&self, reference_path: &str) -> String {
        if self.host.is_some() && self.path.is_empty() {
            return format!("/{}", reference_path);
        }
        match self.path.rfind('/') {
            Some(idx) => format!("{}{}", &self.path[..=idx], reference_path),
            None => reference_path.to_string(),
        }
    }

    fn effective_port(&self) -> Option<u16> {
        match (self.port, self.scheme.as_deref().map(default_port)) {
            (Some(port), Some(Some(default))) if port == default => None,
            (port, _) => port,
        }
    }

    fn normalized_path(&self) -> &str {
        if self.path.is_empty() && self.host.is_some() {
            "/"
        } else {
            &self.path
        }
    }
}

fn default_port(scheme: &str) -> Option<u16> {
    match scheme.to_ascii_lowercase().as_str() {
        "http" | "ws" => Some(80),
        "https" | "wss" => Some(443),
        "ftp" => Some(21),
        _ => None,
    }
}

impl PartialEq for Iri {
    fn eq(&self, other: &Self) -> bool {
        eq_ignore_case(self.scheme.as_deref(), other.scheme.as_deref())
            && eq_ignore_case(self.host.as_deref(), other.host.as_deref())
            && self.user_info == other.user_info
            && self.effective_port() == other.effective_port()
            && self.normalized_path() == other.normalized_path()
            && self.query == other.query
            && self.fragment == other.fragment
    }
}

impl Eq for Iri {}

impl Hash for Iri {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_lowercase(self.scheme.as_deref(), state);
        hash_lowercase(self.host.as_deref(), state);
        self.user_info.hash(state);
        self.effective_port().hash(state);
        self.normalized_path().hash(state);
        self.query.hash(state);
        self.fragment.hash(state);
    }
}

impl PartialOrd for Iri {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Iri {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_ignore_case(self.scheme.as_deref(), other.scheme.as_deref())
            .then_with(|| cmp_ignore_case(self.host.as_deref(), other.host.as_deref()))
            .then_with(|| self.user_info.cmp(&other.user_info))
            .then_with(|| self.effective_port().cmp(&other.effective_port()))
            .then_with(|| self.normalized_path().cmp(other.normalized_path()))
            .then_with(|| self.query.cmp(&other.query))
            .then_with(|| self.fragment.cmp(&other.fragment))
    }
}

fn eq_ignore_case(a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
        (None, None) => true,
        _ => false,
    }
}

fn cmp_ignore_case(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a
            .bytes()
            .map(|c| c.to_ascii_lowercase())
            .cmp(b.bytes().map(|c| c.to_ascii_lowercase())),
        (a, b) => a.is_some().cmp(&b.is_some()),
    }
}

fn hash_lowercase<H: Hasher>(value: Option<&str>, state: &mut H) {
    match value {
        Some(v) => {
            state.write_u8(1);
            for b in v.bytes() {
                state.write_u8(b.to_ascii_lowercase());
            }
            state.write_u8(0xff);
        }
        None => state.write_u8(0),
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(scheme) = &self.scheme {
            write!(f, "{}:", scheme)?;
        }
        if let Some(host) = &self.host {
            f.write_str("//")?;
            if let Some(user_info) = &self.user_info {
                write!(f, "{}@", user_info)?;
            }
            f.write_str(host)?;
            if let Some(port) = self.port {
                write!(f, ":{}", port)?;
            }
        }
        f.write_str(&self.path)?;
        if let Some(query) = &self.query {
            write!(f, "?{}", query)?;
        }
        if let Some(fragment) = &self.fragment {
            write!(f, "#{}", fragment)?;
        }
        Ok(())
    }
}

impl FromStr for Iri {
    type Err = IriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Iri::parse(s)
    }
}

impl TryFrom<&str> for Iri {
    type Error = IriError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Iri::parse(value)
    }
}

impl Serialize for Iri {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Iri {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = Cow::<'de, str>::deserialize(deserializer)?;
        Iri::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Component-wise IRI construction
///
/// Query and fragment values are percent-encoded with the IRI profile;
/// already-encoded input is left unchanged.
#[derive(Clone, Debug, Default)]
pub struct IriBuilder {
    scheme: Option<String>,
    user_info: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    path: String,
    query: Option<String>,
    fragment: Option<String>,
}

impl IriBuilder {
    pub fn scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = Some(scheme.into());
        self
    }

    pub fn user_info(mut self, user_info: impl Into<String>) -> Self {
        self.user_info = Some(user_info.into());
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn fragment(mut self, fragment: impl Into<String>) -> Self {
        self.fragment = Some(fragment.into());
        self
    }

    /// Set scheme and path from a compact IRI (`dc:creator`)
    pub fn curie(mut self, curie: &str) -> Self {
        match curie.split_once(':') {
            Some((prefix, local)) if !prefix.is_empty() => {
                self.scheme = Some(prefix.to_string());
                self.path = local.to_string();
            }
            _ => {
                self.scheme = None;
                self.path = curie.to_string();
            }
        }
        self
    }

    pub fn build(self) -> Result<Iri, IriError> {
        let IriBuilder {
            scheme,
            user_info,
            mut host,
            port,
            path,
            query,
            fragment,
        } = self;

        if let Some(s) = &scheme {
            if s != BLANK_SCHEME && !is_valid_scheme(s) {
                return Err(IriError::InvalidScheme { iri: s.clone() });
            }
        }

        if host.is_none() && (user_info.is_some() || port.is_some()) {
            host = Some(String::new());
        }

        if let Some(h) = &host {
            check_brackets(h, h)?;
            validate_characters(h)?;
        }
        if let Some(u) = &user_info {
            validate_characters(u)?;
        }

        let mut path = encode_component(&path, Component::Path);
        if host.is_some() && !path.is_empty() && !path.starts_with('/') {
            path.insert(0, '/');
        }

        Ok(Iri {
            scheme,
            user_info,
            host,
            port,
            path,
            query: query.map(|q| encode_component(&q, Component::Query)),
            fragment: fragment.map(|f| encode_component(&f, Component::Fragment)),
        })
    }
}

// === Parsing helpers ===

fn is_forbidden(c: char) -> bool {
    c <= ' '
        || c == '\u{7f}'
        || matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '\\' | '^' | '`')
}

fn validate_characters(input: &str) -> Result<(), IriError> {
    let bytes = input.as_bytes();
    for (position, character) in input.char_indices() {
        if is_forbidden(character) {
            return Err(IriError::InvalidCharacter {
                iri: input.to_string(),
                position,
                character,
            });
        }
        if character == '%' {
            let valid = bytes.len() > position + 2
                && bytes[position + 1].is_ascii_hexdigit()
                && bytes[position + 2].is_ascii_hexdigit();
            if !valid {
                return Err(IriError::InvalidPercentEncoding {
                    iri: input.to_string(),
                    position,
                });
            }
        }
    }
    Ok(())
}

fn split_off(input: &str, delimiter: char) -> (&str, Option<String>) {
    match input.split_once(delimiter) {
        Some((head, tail)) => (head, Some(tail.to_string())),
        None => (input, None),
    }
}

fn is_valid_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        _ => false,
    }
}

fn split_scheme<'a>(iri: &str, rest: &'a str) -> Result<(Option<String>, &'a str), IriError> {
    match rest.find(':') {
        Some(idx) if idx > 0 => {
            let candidate = &rest[..idx];
            if candidate.contains('/') {
                Ok((None, rest))
            } else if is_valid_scheme(candidate) {
                Ok((Some(candidate.to_string()), &rest[idx + 1..]))
            } else {
                Err(IriError::InvalidScheme {
                    iri: iri.to_string(),
                })
            }
        }
        _ => Ok((None, rest)),
    }
}

fn check_brackets(iri: &str, host: &str) -> Result<(), IriError> {
    let opens = host.matches('[').count();
    let closes = host.matches(']').count();
    let well_formed = (opens == 0 && closes == 0)
        || (opens == 1 && closes == 1 && host.starts_with('[') && host.ends_with(']'));
    if well_formed {
        Ok(())
    } else {
        Err(IriError::UnbalancedBracket {
            iri: iri.to_string(),
        })
    }
}

type Authority = (Option<String>, String, Option<u16>);

fn parse_authority(iri: &str, authority: &str) -> Result<Authority, IriError> {
    let (user_info, host_port) = match authority.rfind('@') {
        Some(idx) => (Some(authority[..idx].to_string()), &authority[idx + 1..]),
        None => (None, authority),
    };

    let (host, port) = if host_port.starts_with('[') {
        let close = host_port
            .find(']')
            .ok_or_else(|| IriError::UnbalancedBracket {
                iri: iri.to_string(),
            })?;
        let (host, after) = host_port.split_at(close + 1);
        if after.is_empty() {
            (host, None)
        } else if let Some(port) = after.strip_prefix(':') {
            (host, Some(port))
        } else {
            return Err(IriError::InvalidPort {
                iri: iri.to_string(),
                port: after.to_string(),
            });
        }
    } else {
        match host_port.rfind(':') {
            Some(idx) => (&host_port[..idx], Some(&host_port[idx + 1..])),
            None => (host_port, None),
        }
    };
    check_brackets(iri, host)?;

    let port = match port {
        None | Some("") => None,
        Some(p) => {
            let parsed = p
                .bytes()
                .all(|b| b.is_ascii_digit())
                .then(|| p.parse::<u16>().ok())
                .flatten();
            match parsed {
                Some(port) => Some(port),
                None => {
                    return Err(IriError::InvalidPort {
                        iri: iri.to_string(),
                        port: p.to_string(),
                    })
                }
            }
        }
    };

    Ok((user_info, host.to_string(), port))
}

/// Remove `.` and `..` segments from a path (RFC 3986 §5.2.4)
pub fn remove_dot_segments(path: &str) -> String {
    let mut input = path;
    let mut output = String::with_capacity(path.len());

    while !input.is_empty() {
        if let Some(rest) = input.strip_prefix("../") {
            input = rest;
        } else if let Some(rest) = input.strip_prefix("./") {
            input = rest;
        } else if input.starts_with("/./") {
            input = &input[2..];
        } else if input == "/." {
            input = "/";
        } else if input.starts_with("/../") {
            input = &input[3..];
            pop_segment(&mut output);
        } else if input == "/.." {
            input = "/";
            pop_segment(&mut output);
        } else if input == "." || input == ".." {
            input = "";
        } else {
            let start = usize::from(input.starts_with('/'));
            let end = input[start..]
                .find('/')
                .map(|i| i + start)
                .unwrap_or(input.len());
            output.push_str(&input[..end]);
            input = &input[end..];
        }
    }

    output
}

fn pop_segment(output: &mut String) {
    match output.rfind('/') {
        Some(idx) => output.truncate(idx),
        None => output.clear(),
    }
}

// === Encoding helpers ===

fn is_private_use(c: char) -> bool {
    matches!(c, '\u{E000}'..='\u{F8FF}' | '\u{F0000}'..='\u{FFFFD}' | '\u{100000}'..='\u{10FFFD}')
}

/// Percent-encode a component with the IRI profile: ASCII delimiters are
/// escaped, non-ASCII text is kept except private-use characters outside queries.
fn encode_component(value: &str, component: Component) -> String {
    let set = match component {
        Component::Path => PATH,
        Component::Query | Component::Fragment => COMPONENT,
    };
    let mut out = String::with_capacity(value.len());
    let mut buf = [0u8; 4];
    for c in value.chars() {
        if c.is_ascii() {
            out.extend(utf8_percent_encode(c.encode_utf8(&mut buf), set));
        } else if is_private_use(c) && component != Component::Query {
            out.extend(utf8_percent_encode(c.encode_utf8(&mut buf), CONTROLS));
        } else {
            out.push(c);
        }
    }
    out
}

fn decode_component(value: &str) -> String {
    percent_decode_str(value).decode_utf8_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iri(s: &str) -> Iri {
        Iri::parse(s).unwrap()
    }

    #[test]
    fn test_parse_components() {
        let i = iri("http://user@Example.org:8080/a/b?x=1#frag");
        assert_eq!(i.scheme(), Some("http"));
        assert_eq!(i.user_info(), Some("user"));
        assert_eq!(i.host(), Some("Example.org"));
        assert_eq!(i.port(), Some(8080));
        assert_eq!(i.path(), Some("/a/b"));
        assert_eq!(i.query(), Some("x=1"));
        assert_eq!(i.fragment(), Some("frag"));
        assert_eq!(i.to_string(), "http://user@Example.org:8080/a/b?x=1#frag");
        assert!(i.is_absolute());
        assert!(!i.is_opaque());
    }

    #[test]
    fn test_absent_components_are_none() {
        let i = iri("http://example.org");
        assert_eq!(i.path(), None);
        assert_eq!(i.query(), None);
        assert_eq!(i.fragment(), None);
        assert_eq!(i.port(), None);
    }

    #[test]
    fn test_opaque_and_relative() {
        let urn = iri("urn:isbn:0451450523");
        assert!(urn.is_opaque());
        assert_eq!(urn.scheme(), Some("urn"));
        assert_eq!(urn.scheme_specific_part(), "isbn:0451450523");

        let context = iri("@context");
        assert_eq!(context.scheme(), None);
        assert_eq!(context.path(), Some("@context"));
        assert_eq!(context.to_string(), "@context");

        let rel = iri("../a:b");
        assert_eq!(rel.scheme(), None);
        assert_eq!(rel.to_string(), "../a:b");
    }

    #[test]
    fn test_blank_node() {
        let b = iri("_:b7");
        assert!(b.is_blank());
        assert!(!b.is_absolute());
        assert_eq!(b.blank_label(), Some("b7"));
        assert_eq!(b.to_string(), "_:b7");
        assert_eq!(b, Iri::blank("b7"));
    }

    #[test]
    fn test_curie_builder() {
        let curie = Iri::builder().curie("dc:creator").build().unwrap();
        assert_eq!(curie.to_string(), "dc:creator");
        assert_eq!(curie.scheme(), Some("dc"));
        assert_eq!(curie.path(), Some("creator"));
        assert_eq!(curie, iri("dc:creator"));
    }

    #[test]
    fn test_builder_components() {
        let built = Iri::builder()
            .scheme("http")
            .host("example.org")
            .path("docs/a b")
            .query("q=1 2")
            .fragment("top")
            .build()
            .unwrap();
        assert_eq!(built.to_string(), "http://example.org/docs/a%20b?q=1%202#top");
    }

    #[test]
    fn test_invalid_input() {
        assert!(matches!(
            Iri::parse("http://exa mple.org"),
            Err(IriError::InvalidCharacter { character: ' ', .. })
        ));
        assert!(matches!(
            Iri::parse("http://example.org:99999/"),
            Err(IriError::InvalidPort { .. })
        ));
        assert!(matches!(
            Iri::parse("http://example.org:8a/"),
            Err(IriError::InvalidPort { .. })
        ));
        assert!(matches!(
            Iri::parse("http://[::1/x"),
            Err(IriError::UnbalancedBracket { .. })
        ));
        assert!(matches!(
            Iri::parse("http://example.org/%zz"),
            Err(IriError::InvalidPercentEncoding { .. })
        ));
        assert!(matches!(
            Iri::parse("1http://example.org/"),
            Err(IriError::InvalidScheme { .. })
        ));
    }

    #[test]
    fn test_ipv6_host() {
        let i = iri("http://[::1]:8080/x");
        assert_eq!(i.host(), Some("[::1]"));
        assert_eq!(i.port(), Some(8080));
    }

    #[test]
    fn test_equality_normalization() {
        assert_eq!(iri("HTTP://Example.ORG/a"), iri("http://example.org/a"));
        assert_eq!(iri("http://example.org:80/a"), iri("http://example.org/a"));
        assert_eq!(iri("https://example.org:443"), iri("https://example.org/"));
        assert_ne!(iri("http://example.org:8080/a"), iri("http://example.org/a"));
        assert_ne!(iri("http://example.org/A"), iri("http://example.org/a"));

        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(iri("http://EXAMPLE.org:80/a"));
        assert!(set.contains(&iri("http://example.org/a")));
    }

    #[test]
    fn test_query_encoding_idempotent() {
        let i = Iri::builder()
            .scheme("http")
            .host("example.org")
            .query("a=ü b")
            .build()
            .unwrap();
        assert_eq!(i.query(), Some("a=ü%20b"));
        assert_eq!(i.encoded_query().as_deref(), Some("a=ü%20b"));
        assert_eq!(i.decoded_query().as_deref(), Some("a=ü b"));
    }

    #[test]
    fn test_private_use_encoding_differs_by_component() {
        let i = Iri::builder()
            .scheme("http")
            .host("example.org")
            .query("\u{E000}")
            .fragment("\u{E000}")
            .build()
            .unwrap();
        assert_eq!(i.query(), Some("\u{E000}"));
        assert_eq!(i.fragment(), Some("%EE%80%80"));
    }

    #[test]
    fn test_to_uri_string() {
        let i = iri("http://example.org/caf\u{e9}");
        assert_eq!(i.to_uri_string(), "http://example.org/caf%C3%A9");
    }

    #[test]
    fn test_resolve_reference() {
        let base = iri("http://a/b/c/d;p?q");
        let cases = [
            ("g", "http://a/b/c/g"),
            ("./g", "http://a/b/c/g"),
            ("g/", "http://a/b/c/g/"),
            ("/g", "http://a/g"),
            ("//g", "http://g"),
            ("?y", "http://a/b/c/d;p?y"),
            ("#s", "http://a/b/c/d;p?q#s"),
            ("", "http://a/b/c/d;p?q"),
            ("..", "http://a/b/"),
            ("../g", "http://a/b/g"),
            ("../../g", "http://a/g"),
            ("../../../g", "http://a/g"),
            ("g;x=1/../y", "http://a/b/c/y"),
            ("urn:x", "urn:x"),
        ];
        for (reference, expected) in cases {
            assert_eq!(
                base.resolve(reference).unwrap().to_string(),
                expected,
                "resolving {}",
                reference
            );
        }
    }

    #[test]
    fn test_serde_string_form() {
        let i = iri("http://example.org/x");
        let json = serde_json::to_string(&i).unwrap();
        assert_eq!(json, "\"http://example.org/x\"");
        let back: Iri = serde_json::from_str(&json).unwrap();
        assert_eq!(back, i);
    }
}
