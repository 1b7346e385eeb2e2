//! Turtle parser that emits to a `TripleSink`.
//!
//! Recursive descent over the token stream. Statements are emitted as soon as
//! their object is known; a triple that links to a `[ ... ]` block or a
//! collection is emitted before the triples inside it, so a streaming
//! consumer sees parents before children.

use std::collections::HashMap;
use std::sync::Arc;

use rdfweave_graph_ir::{BlankIdAllocator, Iri, TripleSink};
use rdfweave_vocab::{rdf, xsd};
use tracing::{debug, trace};

use crate::error::{Result, TurtleError};
use crate::lex::{tokenize, LineIndex, Token, TokenKind};

/// Object term that is not a nested structure
enum Object {
    Resource(Iri),
    Plain {
        value: Arc<str>,
        language: Option<Arc<str>>,
    },
    Typed {
        value: Arc<str>,
        datatype: Iri,
    },
}

/// Turtle parser state.
pub struct Parser<'a, S: ?Sized> {
    input: &'a str,
    lines: LineIndex,
    tokens: Vec<Token>,
    pos: usize,
    sink: &'a mut S,
    /// Prefix mappings (prefix -> namespace IRI)
    prefixes: HashMap<String, String>,
    base: Option<Iri>,
    allocator: BlankIdAllocator,
    /// Document labels (`_:x`) to the identifiers issued for them
    labels: HashMap<Arc<str>, Iri>,
    statements: usize,
}

impl<'a, S: TripleSink + ?Sized> Parser<'a, S> {
    /// Tokenize `input`; lexical errors are reported here.
    pub fn new(input: &'a str, sink: &'a mut S) -> Result<Self> {
        Ok(Self {
            input,
            lines: LineIndex::new(input),
            tokens: tokenize(input)?,
            pos: 0,
            sink,
            prefixes: HashMap::new(),
            base: None,
            allocator: BlankIdAllocator::new(),
            labels: HashMap::new(),
            statements: 0,
        })
    }

    /// Resolve relative IRIs against `base` until the document declares its own.
    pub fn with_base(mut self, base: &str) -> Result<Self> {
        let base = Iri::parse(base)
            .map_err(|e| TurtleError::IriResolution(format!("invalid base <{}>: {}", base, e)))?;
        self.base = Some(base);
        Ok(self)
    }

    /// Issue blank node identifiers from `allocator`
    pub fn with_allocator(mut self, allocator: BlankIdAllocator) -> Self {
        self.allocator = allocator;
        self
    }

    /// Parse the entire document, returning the number of triples emitted.
    pub fn parse(mut self) -> Result<usize> {
        while !self.is_at_end() {
            self.parse_statement()?;
        }
        debug!(
            triples = self.statements,
            blank_labels = self.labels.len(),
            "parsed turtle document"
        );
        Ok(self.statements)
    }

    fn is_at_end(&self) -> bool {
        self.current().is_eof()
    }

    fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn advance(&mut self) {
        if !self.is_at_end() {
            self.pos += 1;
        }
    }

    /// Check if the current token has the same kind (payload ignored).
    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current().kind) == std::mem::discriminant(kind)
    }

    fn expect(&mut self, kind: &TokenKind, what: &str) -> Result<()> {
        if self.check(kind) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(what))
        }
    }

    fn error_at(&self, position: usize, message: impl Into<String>) -> TurtleError {
        let (line, column) = self.lines.line_col(self.input, position);
        TurtleError::parse(line, column, message)
    }

    /// Error for the current token not being `expected`
    fn unexpected(&self, expected: &str) -> TurtleError {
        let token = self.current();
        if token.is_eof() {
            TurtleError::UnexpectedEof {
                line: self.lines.line(token.start),
                message: format!("expected {}", expected),
            }
        } else {
            self.error_at(
                token.start,
                format!("expected {}, found {}", expected, token.kind),
            )
        }
    }

    fn parse_statement(&mut self) -> Result<()> {
        match self.current().kind {
            TokenKind::KwPrefix | TokenKind::KwSparqlPrefix => self.parse_prefix_directive(),
            TokenKind::KwBase | TokenKind::KwSparqlBase => self.parse_base_directive(),
            _ => self.parse_triples(),
        }
    }

    /// `@prefix p: <ns> .` or `PREFIX p: <ns>`
    fn parse_prefix_directive(&mut self) -> Result<()> {
        let sparql_style = self.check(&TokenKind::KwSparqlPrefix);
        self.advance();

        let prefix = match &self.current().kind {
            TokenKind::PrefixedNameNs(p) => p.to_string(),
            _ => return Err(self.unexpected("prefix name ending in ':'")),
        };
        self.advance();

        let token = self.current().clone();
        let namespace = match &token.kind {
            TokenKind::Iri(reference) => self.resolve_iri(token.start, reference)?,
            _ => return Err(self.unexpected("namespace IRI")),
        };
        self.advance();

        let namespace = namespace.to_string();
        trace!(prefix = %prefix, namespace = %namespace, "prefix declared");
        self.sink.on_prefix(&prefix, &namespace);
        self.prefixes.insert(prefix, namespace);

        if !sparql_style {
            self.expect(&TokenKind::Dot, "'.' after @prefix")?;
        }
        Ok(())
    }

    /// `@base <iri> .` or `BASE <iri>`; relative values resolve against the
    /// base in effect.
    fn parse_base_directive(&mut self) -> Result<()> {
        let sparql_style = self.check(&TokenKind::KwSparqlBase);
        self.advance();

        let token = self.current().clone();
        let base = match &token.kind {
            TokenKind::Iri(reference) => self.resolve_iri(token.start, reference)?,
            _ => return Err(self.unexpected("base IRI")),
        };
        self.advance();

        self.sink.set_base_uri(&base.to_string());
        self.base = Some(base);

        if !sparql_style {
            self.expect(&TokenKind::Dot, "'.' after @base")?;
        }
        Ok(())
    }

    /// `subject predicateObjectList .` or `[ ... ] predicateObjectList? .`
    fn parse_triples(&mut self) -> Result<()> {
        if self.check(&TokenKind::LBracket) {
            let subject = self.parse_blank_node_property_list(None)?;
            if !self.check(&TokenKind::Dot) {
                self.parse_predicate_object_list(&subject)?;
            }
        } else {
            let subject = self.parse_subject()?;
            self.parse_predicate_object_list(&subject)?;
        }
        self.expect(&TokenKind::Dot, "'.' at end of statement")
    }

    fn parse_subject(&mut self) -> Result<Iri> {
        if let Some(iri) = self.parse_iri()? {
            return Ok(iri);
        }
        match self.current().kind.clone() {
            TokenKind::BlankNodeLabel(label) => {
                self.advance();
                Ok(self.labeled_blank(&label))
            }
            TokenKind::Anon => {
                self.advance();
                Ok(self.allocator.next())
            }
            TokenKind::Nil => {
                self.advance();
                Ok(Iri::constant(rdf::NIL))
            }
            TokenKind::LParen => self.parse_collection(None),
            _ => Err(self.unexpected("subject")),
        }
    }

    fn parse_predicate_object_list(&mut self, subject: &Iri) -> Result<()> {
        loop {
            let predicate = self.parse_predicate()?;
            self.parse_object_list(subject, &predicate)?;

            if !self.check(&TokenKind::Semicolon) {
                return Ok(());
            }
            while self.check(&TokenKind::Semicolon) {
                self.advance();
            }
            // a trailing ';' may end the list
            if matches!(
                self.current().kind,
                TokenKind::Dot | TokenKind::RBracket | TokenKind::Eof
            ) {
                return Ok(());
            }
        }
    }

    fn parse_predicate(&mut self) -> Result<Iri> {
        if self.check(&TokenKind::KwA) {
            self.advance();
            return Ok(Iri::constant(rdf::TYPE));
        }
        match self.parse_iri()? {
            Some(iri) => Ok(iri),
            None => Err(self.unexpected("predicate")),
        }
    }

    fn parse_object_list(&mut self, subject: &Iri, predicate: &Iri) -> Result<()> {
        loop {
            self.parse_object(subject, predicate)?;
            if !self.check(&TokenKind::Comma) {
                return Ok(());
            }
            self.advance();
        }
    }

    /// Parse one object and emit its triple
    fn parse_object(&mut self, subject: &Iri, predicate: &Iri) -> Result<()> {
        if self.check(&TokenKind::LBracket) {
            self.parse_blank_node_property_list(Some((subject, predicate)))?;
            return Ok(());
        }
        if self.check(&TokenKind::LParen) {
            self.parse_collection(Some((subject, predicate)))?;
            return Ok(());
        }
        let object = self.parse_term()?;
        self.emit(subject, predicate, object)
    }

    /// IRI, blank node or literal in object position
    fn parse_term(&mut self) -> Result<Object> {
        if let Some(iri) = self.parse_iri()? {
            return Ok(Object::Resource(iri));
        }
        let token = self.current().clone();
        let object = match token.kind {
            TokenKind::BlankNodeLabel(label) => Object::Resource(self.labeled_blank(&label)),
            TokenKind::Anon => Object::Resource(self.allocator.next()),
            TokenKind::Nil => Object::Resource(Iri::constant(rdf::NIL)),
            TokenKind::String(value) => {
                self.advance();
                return self.parse_literal_suffix(value);
            }
            TokenKind::Integer(value) => typed(value, xsd::INTEGER),
            TokenKind::Decimal(value) => typed(value, xsd::DECIMAL),
            TokenKind::Double(value) => typed(value, xsd::DOUBLE),
            TokenKind::KwTrue => typed(Arc::from("true"), xsd::BOOLEAN),
            TokenKind::KwFalse => typed(Arc::from("false"), xsd::BOOLEAN),
            _ => return Err(self.unexpected("object")),
        };
        self.advance();
        Ok(object)
    }

    /// Optional `@lang` or `^^datatype` after a string
    fn parse_literal_suffix(&mut self, value: Arc<str>) -> Result<Object> {
        match self.current().kind.clone() {
            TokenKind::LangTag(language) => {
                self.advance();
                Ok(Object::Plain {
                    value,
                    language: Some(language),
                })
            }
            TokenKind::DoubleCaret => {
                self.advance();
                match self.parse_iri()? {
                    Some(datatype) => Ok(Object::Typed { value, datatype }),
                    None => Err(self.unexpected("datatype IRI after '^^'")),
                }
            }
            _ => Ok(Object::Plain {
                value,
                language: None,
            }),
        }
    }

    /// `[ predicateObjectList ]`; `link` is emitted before the contents
    fn parse_blank_node_property_list(&mut self, link: Option<(&Iri, &Iri)>) -> Result<Iri> {
        self.expect(&TokenKind::LBracket, "'['")?;
        let node = self.allocator.next();
        if let Some((subject, predicate)) = link {
            self.emit(subject, predicate, Object::Resource(node.clone()))?;
        }

        if !self.check(&TokenKind::RBracket) {
            self.parse_predicate_object_list(&node)?;
        }
        self.expect(&TokenKind::RBracket, "']'")?;
        Ok(node)
    }

    /// `( item ... )` as an rdf:first/rdf:rest chain; `link` is emitted as
    /// soon as the head is known
    fn parse_collection(&mut self, link: Option<(&Iri, &Iri)>) -> Result<Iri> {
        self.expect(&TokenKind::LParen, "'('")?;
        let nil = Iri::constant(rdf::NIL);

        if self.check(&TokenKind::RParen) {
            self.advance();
            if let Some((subject, predicate)) = link {
                self.emit(subject, predicate, Object::Resource(nil.clone()))?;
            }
            return Ok(nil);
        }

        let first = Iri::constant(rdf::FIRST);
        let rest = Iri::constant(rdf::REST);
        let head = self.allocator.next();
        if let Some((subject, predicate)) = link {
            self.emit(subject, predicate, Object::Resource(head.clone()))?;
        }

        let mut cell = head.clone();
        loop {
            self.parse_object(&cell, &first)?;
            if self.check(&TokenKind::RParen) {
                self.emit(&cell, &rest, Object::Resource(nil))?;
                break;
            }
            let next = self.allocator.next();
            self.emit(&cell, &rest, Object::Resource(next.clone()))?;
            cell = next;
        }

        self.expect(&TokenKind::RParen, "')'")?;
        Ok(head)
    }

    /// IRI reference or prefixed name at the current token, consumed
    fn parse_iri(&mut self) -> Result<Option<Iri>> {
        let token = self.current().clone();
        let iri = match &token.kind {
            TokenKind::Iri(reference) => self.resolve_iri(token.start, reference)?,
            TokenKind::PrefixedName { prefix, local } => {
                self.expand_prefixed_name(token.start, prefix, local)?
            }
            TokenKind::PrefixedNameNs(prefix) => self.expand_prefixed_name(token.start, prefix, "")?,
            _ => return Ok(None),
        };
        self.advance();
        Ok(Some(iri))
    }

    /// Resolve an IRI reference against the base (RFC 3986 §5.2).
    fn resolve_iri(&self, position: usize, reference: &str) -> Result<Iri> {
        let resolved = match &self.base {
            Some(base) => base.resolve(reference),
            None => Iri::parse(reference),
        }
        .map_err(|e| self.error_at(position, e.to_string()))?;

        if resolved.is_absolute() || resolved.is_blank() {
            return Ok(resolved);
        }
        let line = self.lines.line(position);
        Err(TurtleError::IriResolution(format!(
            "relative IRI <{}> without base at line {}",
            reference, line
        )))
    }

    fn expand_prefixed_name(&self, position: usize, prefix: &str, local: &str) -> Result<Iri> {
        let namespace = self
            .prefixes
            .get(prefix)
            .ok_or_else(|| TurtleError::UndefinedPrefix {
                line: self.lines.line(position),
                prefix: prefix.to_string(),
            })?;
        Iri::parse(&format!("{}{}", namespace, local))
            .map_err(|e| self.error_at(position, e.to_string()))
    }

    /// Identifier for a document label; the same label always maps to the
    /// same node within one parse.
    fn labeled_blank(&mut self, label: &Arc<str>) -> Iri {
        let allocator = &self.allocator;
        self.labels
            .entry(label.clone())
            .or_insert_with(|| allocator.next())
            .clone()
    }

    fn emit(&mut self, subject: &Iri, predicate: &Iri, object: Object) -> Result<()> {
        self.statements += 1;
        match object {
            Object::Resource(iri) => self.sink.add_non_literal(subject, predicate, &iri)?,
            Object::Plain { value, language } => {
                self.sink
                    .add_plain_literal(subject, predicate, &value, language.as_deref())?
            }
            Object::Typed { value, datatype } => {
                self.sink
                    .add_typed_literal(subject, predicate, &value, &datatype)?
            }
        }
        Ok(())
    }
}

fn typed(value: Arc<str>, datatype: &'static str) -> Object {
    Object::Typed {
        value,
        datatype: Iri::constant(datatype),
    }
}

/// Parse a Turtle document into sink events.
pub fn parse<S: TripleSink + ?Sized>(input: &str, sink: &mut S) -> Result<usize> {
    Parser::new(input, sink)?.parse()
}

/// Parse a Turtle document, resolving relative IRIs against `base`.
pub fn parse_with_base<S: TripleSink + ?Sized>(
    input: &str,
    base: &str,
    sink: &mut S,
) -> Result<usize> {
    Parser::new(input, sink)?.with_base(base)?.parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdfweave_graph_ir::{Graph, GraphCollectorSink, Node, Triple};

    fn parse_to_graph(input: &str) -> Result<Graph> {
        let mut sink = GraphCollectorSink::new();
        parse(input, &mut sink)?;
        Ok(sink.finish())
    }

    fn triples(input: &str) -> Vec<Triple> {
        parse_to_graph(input).unwrap().triples().collect()
    }

    fn iri(s: &str) -> Iri {
        Iri::parse(s).unwrap()
    }

    #[test]
    fn test_simple_triple() {
        let input = r#"<http://example.org/alice> <http://xmlns.com/foaf/0.1/name> "Alice" ."#;
        let t = triples(input);
        assert_eq!(t.len(), 1);
        assert_eq!(t[0].subject, iri("http://example.org/alice"));
        assert_eq!(t[0].predicate, iri("http://xmlns.com/foaf/0.1/name"));
        assert_eq!(t[0].object.as_literal().map(|l| l.value()), Some("Alice"));
    }

    #[test]
    fn test_prefix_directive_reaches_sink() {
        let input = r#"
            @prefix ex: <http://example.org/> .
            PREFIX foaf: <http://xmlns.com/foaf/0.1/>
            ex:alice foaf:name "Alice" .
        "#;
        let graph = parse_to_graph(input).unwrap();
        assert_eq!(graph.namespaces().namespace_uri("ex"), Some("http://example.org/"));
        let t: Vec<Triple> = graph.triples().collect();
        assert_eq!(t[0].subject, iri("http://example.org/alice"));
        assert_eq!(t[0].predicate, iri("http://xmlns.com/foaf/0.1/name"));
    }

    #[test]
    fn test_a_keyword() {
        let t = triples("@prefix ex: <http://example.org/> . ex:alice a ex:Person .");
        assert_eq!(t[0].predicate, iri(rdf::TYPE));
    }

    #[test]
    fn test_semicolon_and_comma() {
        let input = r#"
            @prefix ex: <http://example.org/> .
            ex:alice ex:name "Alice" ;
                     ex:knows ex:bob, ex:carol ;
                     .
        "#;
        let t = triples(input);
        assert_eq!(t.len(), 3);
        assert!(t.iter().all(|t| t.subject == iri("http://example.org/alice")));
        assert_eq!(t[2].object, Node::Iri(iri("http://example.org/carol")));
    }

    #[test]
    fn test_blank_labels_are_consistent() {
        let input = r#"
            @prefix ex: <http://example.org/> .
            _:x ex:knows _:y .
            _:y ex:knows _:x .
        "#;
        let t = triples(input);
        assert_eq!(t[0].subject, Iri::blank("b1"));
        assert_eq!(t[0].object, Node::Iri(Iri::blank("b2")));
        assert_eq!(t[1].subject, Iri::blank("b2"));
        assert_eq!(t[1].object, Node::Iri(Iri::blank("b1")));
    }

    #[test]
    fn test_property_list_emits_parent_first() {
        let mut sink = GraphCollectorSink::new();
        parse(
            "@prefix ex: <http://example.org/> . ex:alice ex:knows [ ex:name \"Bob\" ] .",
            &mut sink,
        )
        .unwrap();
        let subjects: Vec<String> = sink
            .finish()
            .resources()
            .map(|r| r.id().to_string())
            .collect();
        assert_eq!(subjects, vec!["http://example.org/alice", "_:b1"]);
    }

    #[test]
    fn test_property_list_as_subject() {
        let t = triples("@prefix ex: <http://example.org/> . [ ex:a 1 ] ex:b 2 . [ ex:c 3 ] .");
        assert_eq!(t.len(), 3);
        assert_eq!(t[0].subject, Iri::blank("b1"));
        assert_eq!(t[1].subject, Iri::blank("b1"));
        assert_eq!(t[2].subject, Iri::blank("b2"));
    }

    #[test]
    fn test_literals() {
        let input = r#"
            @prefix ex: <http://example.org/> .
            @prefix xsd: <http://www.w3.org/2001/XMLSchema#> .
            ex:s ex:p "chat"@fr, "5"^^xsd:integer, 42, -1.50, 1e3, true .
        "#;
        let t = triples(input);
        let lits: Vec<_> = t.iter().filter_map(|t| t.object.as_literal()).collect();
        assert_eq!(lits[0].language(), Some("fr"));
        assert_eq!(lits[1].datatype(), Some(&iri(xsd::INTEGER)));
        assert_eq!(lits[2].value(), "42");
        assert_eq!(lits[3].value(), "-1.50");
        assert_eq!(lits[3].datatype(), Some(&iri(xsd::DECIMAL)));
        assert_eq!(lits[4].value(), "1e3");
        assert_eq!(lits[4].datatype(), Some(&iri(xsd::DOUBLE)));
        assert_eq!(lits[5].datatype(), Some(&iri(xsd::BOOLEAN)));
    }

    #[test]
    fn test_collection() {
        let t = triples("@prefix ex: <http://example.org/> . ex:s ex:list ( 1 2 ) .");
        let rendered: Vec<String> = t.iter().map(|t| t.to_string()).collect();
        assert_eq!(rendered.len(), 5);
        assert_eq!(rendered[0], "<http://example.org/s> <http://example.org/list> _:b1 .");
        assert!(rendered[1].starts_with("_:b1 <http://www.w3.org/1999/02/22-rdf-syntax-ns#first> \"1\""));
        assert_eq!(
            rendered[2],
            "_:b1 <http://www.w3.org/1999/02/22-rdf-syntax-ns#rest> _:b2 ."
        );
        assert_eq!(
            rendered[4],
            "_:b2 <http://www.w3.org/1999/02/22-rdf-syntax-ns#rest> <http://www.w3.org/1999/02/22-rdf-syntax-ns#nil> ."
        );
    }

    #[test]
    fn test_empty_collection() {
        let t = triples("@prefix ex: <http://example.org/> . ex:s ex:list () .");
        assert_eq!(t[0].object, Node::Iri(iri(rdf::NIL)));
    }

    #[test]
    fn test_base_resolution() {
        let input = r#"
            @base <http://example.org/dir/> .
            <a> <../p> <#frag> .
            @base <sub/> .
            <b> <http://example.org/q> <> .
        "#;
        let graph = parse_to_graph(input).unwrap();
        assert_eq!(graph.base(), Some("http://example.org/dir/sub/"));
        let t: Vec<Triple> = graph.triples().collect();
        assert_eq!(t[0].subject, iri("http://example.org/dir/a"));
        assert_eq!(t[0].predicate, iri("http://example.org/p"));
        assert_eq!(t[0].object, Node::Iri(iri("http://example.org/dir/#frag")));
        assert_eq!(t[1].subject, iri("http://example.org/dir/sub/b"));
        assert_eq!(t[1].object, Node::Iri(iri("http://example.org/dir/sub/")));
    }

    #[test]
    fn test_base_per_call() {
        let mut sink = GraphCollectorSink::new();
        parse_with_base("<a> <b> <c> .", "http://example.org/", &mut sink).unwrap();
        let t: Vec<Triple> = sink.finish().triples().collect();
        assert_eq!(t[0].subject, iri("http://example.org/a"));
    }

    #[test]
    fn test_relative_without_base_fails() {
        assert!(matches!(
            parse_to_graph("<a> <http://x/p> <http://x/o> ."),
            Err(TurtleError::IriResolution(_))
        ));
    }

    #[test]
    fn test_undefined_prefix_reports_line() {
        match parse_to_graph("\n\nex:a ex:b ex:c .").unwrap_err() {
            TurtleError::UndefinedPrefix { line, prefix } => {
                assert_eq!(line, 3);
                assert_eq!(prefix, "ex");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_missing_dot_is_unexpected_eof() {
        assert!(matches!(
            parse_to_graph("<http://x/s> <http://x/p> <http://x/o>"),
            Err(TurtleError::UnexpectedEof { line: 1, .. })
        ));
    }

    #[test]
    fn test_malformed_statement_reports_position() {
        match parse_to_graph("<http://x/s> <http://x/p> .\n").unwrap_err() {
            TurtleError::Parse { line, column, message } => {
                assert_eq!((line, column), (1, 27));
                assert!(message.contains("expected object"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_shared_allocator_continues_numbering() {
        let allocator = BlankIdAllocator::new();
        allocator.next();
        let mut sink = GraphCollectorSink::new();
        Parser::new("[] <http://x/p> \"v\" .", &mut sink)
            .unwrap()
            .with_allocator(allocator.clone())
            .parse()
            .unwrap();
        let t: Vec<Triple> = sink.finish().triples().collect();
        assert_eq!(t[0].subject, Iri::blank("b2"));
        assert_eq!(allocator.issued(), 2);
    }
}
