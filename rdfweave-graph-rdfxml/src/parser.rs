//! RDF/XML parser
//!
//! Consumes [`XmlEvent`]s and emits triples into a [`TripleSink`]. Element
//! nesting is tracked with an explicit frame stack: every start element
//! pushes exactly one frame and every end element pops it, so the parser can
//! be fed one event at a time from any XML reader.
//!
//! Supported: `rdf:about`, `rdf:ID`, `rdf:nodeID`, `rdf:resource`,
//! `rdf:datatype`, `xml:lang`, `xml:base`, typed node elements, property
//! attributes, `rdf:li` numbering and the `Resource`, `Literal` and
//! `Collection` parse types. `rdf:ID` on a property element reifies the
//! statement it produces.

use std::collections::HashMap;

use rdfweave_graph_ir::{BlankIdAllocator, Iri, TripleSink};
use rdfweave_vocab::rdf;
use tracing::{debug, trace, warn};

use crate::error::{RdfXmlError, Result};
use crate::event::{XmlAttribute, XmlEvent, XmlName};
use crate::reader::XmlEventReader;

/// Attributes in the RDF namespace that carry syntax rather than properties
const SYNTAX_ATTRIBUTES: &[&str] = &[
    "about",
    "ID",
    "nodeID",
    "resource",
    "datatype",
    "parseType",
    "aboutEach",
    "aboutEachPrefix",
    "bagID",
];

enum Frame {
    /// Before the document element
    Document,
    /// Inside `rdf:RDF`
    Root,
    /// Node element: children are property elements
    Node { subject: Iri, next_member: usize },
    /// Property element whose object is text or a single node element
    Property(PropertyFrame),
    /// Property element that took its object from attributes
    Empty,
    Collection {
        subject: Iri,
        predicate: Iri,
        reified: Option<Iri>,
        items: Vec<Iri>,
    },
    /// `parseType="Literal"`: inner markup is kept verbatim
    Literal {
        subject: Iri,
        predicate: Iri,
        reified: Option<Iri>,
        depth: usize,
        markup: String,
    },
}

struct PropertyFrame {
    subject: Iri,
    predicate: Iri,
    /// Statement IRI from `rdf:ID` on the property element
    reified: Option<Iri>,
    datatype: Option<Iri>,
    language: Option<String>,
    text: String,
    object: Option<Iri>,
}

/// In-scope `xml:lang` and `xml:base`
#[derive(Clone)]
struct Scope {
    language: Option<String>,
    base: Option<Iri>,
}

/// Event-driven RDF/XML parser
pub struct RdfXmlParser<'a, S: ?Sized> {
    sink: &'a mut S,
    allocator: BlankIdAllocator,
    labels: HashMap<String, Iri>,
    frames: Vec<Frame>,
    scopes: Vec<Scope>,
    /// Qualified names of open elements, for end-of-input errors
    open: Vec<String>,
    line: usize,
    statements: usize,
    seen_root: bool,
}

impl<'a, S: TripleSink + ?Sized> RdfXmlParser<'a, S> {
    pub fn new(sink: &'a mut S) -> Self {
        Self {
            sink,
            allocator: BlankIdAllocator::new(),
            labels: HashMap::new(),
            frames: vec![Frame::Document],
            scopes: vec![Scope {
                language: None,
                base: None,
            }],
            open: Vec::new(),
            line: 1,
            statements: 0,
            seen_root: false,
        }
    }

    pub fn with_allocator(mut self, allocator: BlankIdAllocator) -> Self {
        self.allocator = allocator;
        self
    }

    /// Resolve relative references against `base` unless `xml:base` says otherwise
    pub fn with_base(mut self, base: &str) -> Result<Self> {
        let iri = Iri::parse(base).map_err(|e| RdfXmlError::syntax(0, e.to_string()))?;
        self.sink.set_base_uri(base);
        if let Some(scope) = self.scopes.first_mut() {
            scope.base = Some(iri);
        }
        Ok(self)
    }

    /// Triples emitted so far
    pub fn statements(&self) -> usize {
        self.statements
    }

    /// Read a whole document with [`XmlEventReader`] and feed every event.
    pub fn parse(mut self, input: &str) -> Result<usize> {
        let mut reader = XmlEventReader::new(input);
        while let Some(event) = reader.next_event()? {
            self.handle(event, reader.line())?;
        }
        self.finish()
    }

    /// Feed one event that started at `line`.
    pub fn handle(&mut self, event: XmlEvent, line: usize) -> Result<()> {
        self.line = line;
        if matches!(self.frames.last(), Some(Frame::Literal { .. })) {
            return self.literal_event(event);
        }
        match event {
            XmlEvent::StartElement {
                name,
                attributes,
                namespaces,
            } => self.start_element(name, attributes, namespaces),
            XmlEvent::EndElement { name } => self.end_element(&name),
            XmlEvent::Characters(text) => self.characters(text),
        }
    }

    /// Check the document is complete and return the triple count.
    pub fn finish(self) -> Result<usize> {
        if let Some(element) = self.open.last() {
            return Err(RdfXmlError::UnexpectedEof {
                element: element.clone(),
            });
        }
        if !self.seen_root {
            return Err(RdfXmlError::syntax(self.line, "document has no root element"));
        }
        debug!(triples = self.statements, "parsed rdf/xml document");
        Ok(self.statements)
    }

    fn start_element(
        &mut self,
        name: XmlName,
        attributes: Vec<XmlAttribute>,
        namespaces: Vec<(String, String)>,
    ) -> Result<()> {
        for (prefix, namespace) in &namespaces {
            if !prefix.is_empty() {
                self.sink.on_prefix(prefix, namespace);
            }
        }
        let scope = self.child_scope(&attributes)?;
        self.scopes.push(scope);
        self.open.push(name.qname());

        let frame = match self.frames.last_mut() {
            Some(Frame::Document) if self.seen_root => {
                return Err(self.error("content after the document element"));
            }
            Some(Frame::Document) if name.is_rdf(rdf::RDF) => {
                self.seen_root = true;
                Frame::Root
            }
            Some(Frame::Document) => {
                self.seen_root = true;
                self.node_element(&name, &attributes, None)?.0
            }
            Some(Frame::Root) => self.node_element(&name, &attributes, None)?.0,
            Some(Frame::Node { .. }) => self.property_element(&name, &attributes)?,
            Some(Frame::Property(property)) => {
                if property.object.is_some() {
                    return Err(self.error(format!(
                        "property element already has an object before <{}>",
                        name.qname()
                    )));
                }
                if !property.text.trim().is_empty() {
                    return Err(self.error(format!(
                        "mixed text and element content before <{}>",
                        name.qname()
                    )));
                }
                let (subject, predicate) = (property.subject.clone(), property.predicate.clone());
                let reified = property.reified.clone();
                let link = (subject.clone(), predicate.clone());
                let (frame, object) = self.node_element(&name, &attributes, Some(link))?;
                if let Some(statement) = &reified {
                    self.reify_resource(statement, &subject, &predicate, &object)?;
                }
                if let Some(Frame::Property(property)) = self.frames.last_mut() {
                    property.object = Some(object);
                }
                frame
            }
            Some(Frame::Collection { .. }) => {
                let (frame, item) = self.node_element(&name, &attributes, None)?;
                if let Some(Frame::Collection { items, .. }) = self.frames.last_mut() {
                    items.push(item);
                }
                frame
            }
            Some(Frame::Empty) => {
                return Err(self.error(format!(
                    "property element with an attribute object must be empty, found <{}>",
                    name.qname()
                )));
            }
            Some(Frame::Literal { .. }) | None => {
                return Err(self.error("element outside of the document"));
            }
        };
        self.frames.push(frame);
        Ok(())
    }

    fn end_element(&mut self, name: &XmlName) -> Result<()> {
        let frame = self
            .frames
            .pop()
            .filter(|frame| !matches!(frame, Frame::Document))
            .ok_or_else(|| self.error(format!("unbalanced end tag </{}>", name.qname())))?;
        self.scopes.pop();
        self.open.pop();

        match frame {
            Frame::Property(property) => {
                if property.object.is_none() {
                    let PropertyFrame {
                        subject,
                        predicate,
                        reified,
                        datatype,
                        language,
                        text,
                        ..
                    } = property;
                    match datatype {
                        Some(datatype) => {
                            self.emit_typed(&subject, &predicate, &text, &datatype)?;
                            if let Some(statement) = &reified {
                                let object = Iri::constant(rdf::OBJECT);
                                self.reify(statement, &subject, &predicate)?;
                                self.emit_typed(statement, &object, &text, &datatype)?;
                            }
                        }
                        None => {
                            let language = language.as_deref();
                            self.emit_plain(&subject, &predicate, &text, language)?;
                            if let Some(statement) = &reified {
                                let object = Iri::constant(rdf::OBJECT);
                                self.reify(statement, &subject, &predicate)?;
                                self.emit_plain(statement, &object, &text, language)?;
                            }
                        }
                    }
                }
            }
            Frame::Collection {
                subject,
                predicate,
                reified,
                items,
            } => {
                let head = self.emit_collection(&subject, &predicate, &items)?;
                if let Some(statement) = &reified {
                    self.reify_resource(statement, &subject, &predicate, &head)?;
                }
            }
            Frame::Document | Frame::Root | Frame::Node { .. } | Frame::Empty => {}
            Frame::Literal { .. } => {}
        }
        Ok(())
    }

    fn characters(&mut self, text: String) -> Result<()> {
        match self.frames.last_mut() {
            Some(Frame::Property(property)) if property.object.is_none() => {
                property.text.push_str(&text);
                Ok(())
            }
            _ if text.trim().is_empty() => Ok(()),
            _ => Err(self.error(format!("unexpected text '{}'", text.trim()))),
        }
    }

    /// Collect markup inside a `parseType="Literal"` property element
    fn literal_event(&mut self, event: XmlEvent) -> Result<()> {
        let Some(Frame::Literal { depth, markup, .. }) = self.frames.last_mut() else {
            return Ok(());
        };
        match event {
            XmlEvent::StartElement {
                name,
                attributes,
                namespaces,
            } => {
                markup.push('<');
                markup.push_str(&name.qname());
                for (prefix, namespace) in &namespaces {
                    if prefix.is_empty() {
                        markup.push_str(" xmlns");
                    } else {
                        markup.push_str(" xmlns:");
                        markup.push_str(prefix);
                    }
                    push_attribute_value(markup, namespace);
                }
                for attribute in &attributes {
                    markup.push(' ');
                    markup.push_str(&attribute.name.qname());
                    push_attribute_value(markup, &attribute.value);
                }
                markup.push('>');
                *depth += 1;
            }
            XmlEvent::Characters(text) => push_escaped(markup, &text),
            XmlEvent::EndElement { name } => {
                if *depth > 0 {
                    markup.push_str("</");
                    markup.push_str(&name.qname());
                    markup.push('>');
                    *depth -= 1;
                    return Ok(());
                }
                if let Some(Frame::Literal {
                    subject,
                    predicate,
                    reified,
                    markup,
                    ..
                }) = self.frames.pop()
                {
                    self.scopes.pop();
                    self.open.pop();
                    let datatype = Iri::constant(rdf::XML_LITERAL);
                    self.emit_typed(&subject, &predicate, &markup, &datatype)?;
                    if let Some(statement) = &reified {
                        let object = Iri::constant(rdf::OBJECT);
                        self.reify(statement, &subject, &predicate)?;
                        self.emit_typed(statement, &object, &markup, &datatype)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Start a node element, emitting the link from its parent property first.
    fn node_element(
        &mut self,
        name: &XmlName,
        attributes: &[XmlAttribute],
        link: Option<(Iri, Iri)>,
    ) -> Result<(Frame, Iri)> {
        let subject = self.subject_of(attributes)?;
        if let Some((parent, predicate)) = link {
            self.emit_resource(&parent, &predicate, &subject)?;
        }
        if !name.is_rdf(rdf::DESCRIPTION) {
            let class = self.element_iri(name)?;
            self.emit_resource(&subject, &Iri::constant(rdf::TYPE), &class)?;
        }
        self.property_attributes(&subject, attributes)?;
        let frame = Frame::Node {
            subject: subject.clone(),
            next_member: 1,
        };
        Ok((frame, subject))
    }

    fn property_element(&mut self, name: &XmlName, attributes: &[XmlAttribute]) -> Result<Frame> {
        let (subject, member) = match self.frames.last_mut() {
            Some(Frame::Node {
                subject,
                next_member,
            }) => {
                let member = *next_member;
                if name.is_rdf(rdf::LI) {
                    *next_member += 1;
                }
                (subject.clone(), member)
            }
            _ => return Err(self.error("property element outside of a node element")),
        };
        let predicate = if name.is_rdf(rdf::LI) {
            Iri::parse(&rdf::member(member)).map_err(|e| self.error(e.to_string()))?
        } else {
            self.element_iri(name)?
        };
        let reified = match rdf_attribute(attributes, "ID") {
            Some(id) => Some(self.resolve_iri(&format!("#{}", id))?),
            None => None,
        };

        match rdf_attribute(attributes, "parseType") {
            Some("Resource") => {
                let node = self.allocator.next();
                self.emit_resource(&subject, &predicate, &node)?;
                if let Some(statement) = &reified {
                    self.reify_resource(statement, &subject, &predicate, &node)?;
                }
                return Ok(Frame::Node {
                    subject: node,
                    next_member: 1,
                });
            }
            Some("Collection") => {
                return Ok(Frame::Collection {
                    subject,
                    predicate,
                    reified,
                    items: Vec::new(),
                });
            }
            Some(parse_type) => {
                if parse_type != "Literal" {
                    warn!(parse_type, line = self.line, "unknown rdf:parseType, reading content as literal");
                }
                return Ok(Frame::Literal {
                    subject,
                    predicate,
                    reified,
                    depth: 0,
                    markup: String::new(),
                });
            }
            None => {}
        }

        let explicit = match (
            rdf_attribute(attributes, "resource"),
            rdf_attribute(attributes, "nodeID"),
        ) {
            (Some(_), Some(_)) => {
                return Err(self.error("rdf:resource and rdf:nodeID on the same element"));
            }
            (Some(reference), None) => Some(self.resolve_iri(reference)?),
            (None, Some(label)) => Some(self.labeled(label)),
            (None, None) => None,
        };
        let has_properties = attributes.iter().any(is_property_attribute);

        if explicit.is_some() || has_properties {
            let object = match explicit {
                Some(object) => object,
                None => self.allocator.next(),
            };
            self.emit_resource(&subject, &predicate, &object)?;
            if let Some(statement) = &reified {
                self.reify_resource(statement, &subject, &predicate, &object)?;
            }
            self.property_attributes(&object, attributes)?;
            return Ok(Frame::Empty);
        }

        let datatype = match rdf_attribute(attributes, "datatype") {
            Some(datatype) => Some(self.resolve_iri(datatype)?),
            None => None,
        };
        let language = self.scopes.last().and_then(|scope| scope.language.clone());
        Ok(Frame::Property(PropertyFrame {
            subject,
            predicate,
            reified,
            datatype,
            language,
            text: String::new(),
            object: None,
        }))
    }

    fn subject_of(&mut self, attributes: &[XmlAttribute]) -> Result<Iri> {
        let about = rdf_attribute(attributes, "about");
        let id = rdf_attribute(attributes, "ID");
        let node_id = rdf_attribute(attributes, "nodeID");
        match (about, id, node_id) {
            (Some(about), None, None) => self.resolve_iri(about),
            (None, Some(id), None) => self.resolve_iri(&format!("#{}", id)),
            (None, None, Some(label)) => Ok(self.labeled(label)),
            (None, None, None) => Ok(self.allocator.next()),
            _ => Err(self.error("only one of rdf:about, rdf:ID and rdf:nodeID is allowed")),
        }
    }

    fn property_attributes(&mut self, subject: &Iri, attributes: &[XmlAttribute]) -> Result<()> {
        for attribute in attributes.iter().filter(|a| is_property_attribute(a)) {
            if attribute.name.is_rdf("type") {
                let class = self.resolve_iri(&attribute.value)?;
                self.emit_resource(subject, &Iri::constant(rdf::TYPE), &class)?;
            } else {
                let predicate = self.element_iri(&attribute.name)?;
                let language = self.scopes.last().and_then(|scope| scope.language.clone());
                self.emit_plain(subject, &predicate, &attribute.value, language.as_deref())?;
            }
        }
        Ok(())
    }

    fn child_scope(&self, attributes: &[XmlAttribute]) -> Result<Scope> {
        let mut scope = self.scopes.last().cloned().unwrap_or(Scope {
            language: None,
            base: None,
        });
        for attribute in attributes.iter().filter(|a| a.name.is_xml()) {
            match attribute.name.local.as_str() {
                "lang" if attribute.value.is_empty() => scope.language = None,
                "lang" => scope.language = Some(attribute.value.clone()),
                "base" => {
                    let base = match &scope.base {
                        Some(parent) => parent.resolve(&attribute.value),
                        None => Iri::parse(&attribute.value),
                    }
                    .map_err(|e| self.error(e.to_string()))?;
                    scope.base = Some(base);
                }
                _ => {}
            }
        }
        Ok(scope)
    }

    /// IRI named by a qualified element or attribute
    fn element_iri(&self, name: &XmlName) -> Result<Iri> {
        let iri = name
            .iri()
            .ok_or_else(|| self.error(format!("<{}> is not in a namespace", name.qname())))?;
        Iri::parse(&iri).map_err(|e| self.error(e.to_string()))
    }

    fn resolve_iri(&self, reference: &str) -> Result<Iri> {
        let base = self.scopes.last().and_then(|scope| scope.base.as_ref());
        let iri = match base {
            Some(base) => base.resolve(reference),
            None => Iri::parse(reference),
        }
        .map_err(|e| self.error(e.to_string()))?;
        if !iri.is_absolute() {
            return Err(self.error(format!(
                "relative IRI <{}> with no base in scope",
                reference
            )));
        }
        Ok(iri)
    }

    fn labeled(&mut self, label: &str) -> Iri {
        let allocator = &self.allocator;
        self.labels
            .entry(label.to_string())
            .or_insert_with(|| allocator.next())
            .clone()
    }

    /// Emit a collection and return its head node
    fn emit_collection(&mut self, subject: &Iri, predicate: &Iri, items: &[Iri]) -> Result<Iri> {
        let nil = Iri::constant(rdf::NIL);
        let cells: Vec<Iri> = items.iter().map(|_| self.allocator.next()).collect();
        let head = cells.first().unwrap_or(&nil).clone();
        self.emit_resource(subject, predicate, &head)?;
        let (first, rest) = (Iri::constant(rdf::FIRST), Iri::constant(rdf::REST));
        for (index, (cell, item)) in cells.iter().zip(items).enumerate() {
            self.emit_resource(cell, &first, item)?;
            let next = cells.get(index + 1).unwrap_or(&nil);
            self.emit_resource(cell, &rest, next)?;
        }
        Ok(head)
    }

    /// Type, subject and predicate of a statement reified through `rdf:ID`;
    /// callers add the `rdf:object`
    fn reify(&mut self, statement: &Iri, subject: &Iri, predicate: &Iri) -> Result<()> {
        let class = Iri::constant(rdf::STATEMENT);
        self.emit_resource(statement, &Iri::constant(rdf::TYPE), &class)?;
        self.emit_resource(statement, &Iri::constant(rdf::SUBJECT), subject)?;
        self.emit_resource(statement, &Iri::constant(rdf::PREDICATE), predicate)
    }

    fn reify_resource(
        &mut self,
        statement: &Iri,
        subject: &Iri,
        predicate: &Iri,
        object: &Iri,
    ) -> Result<()> {
        self.reify(statement, subject, predicate)?;
        self.emit_resource(statement, &Iri::constant(rdf::OBJECT), object)
    }

    fn emit_resource(&mut self, subject: &Iri, predicate: &Iri, object: &Iri) -> Result<()> {
        trace!(%subject, %predicate, %object, "rdf/xml statement");
        self.sink.add_non_literal(subject, predicate, object)?;
        self.statements += 1;
        Ok(())
    }

    fn emit_plain(
        &mut self,
        subject: &Iri,
        predicate: &Iri,
        value: &str,
        language: Option<&str>,
    ) -> Result<()> {
        self.sink
            .add_plain_literal(subject, predicate, value, language)?;
        self.statements += 1;
        Ok(())
    }

    fn emit_typed(&mut self, subject: &Iri, predicate: &Iri, value: &str, datatype: &Iri) -> Result<()> {
        self.sink
            .add_typed_literal(subject, predicate, value, datatype)?;
        self.statements += 1;
        Ok(())
    }

    fn error(&self, message: impl Into<String>) -> RdfXmlError {
        RdfXmlError::syntax(self.line, message)
    }
}

/// Value of an RDF syntax attribute, qualified or not
fn rdf_attribute<'v>(attributes: &'v [XmlAttribute], local: &str) -> Option<&'v str> {
    attributes
        .iter()
        .find(|a| {
            a.name.local == local && (a.name.namespace.is_none() || a.name.is_rdf(local))
        })
        .map(|a| a.value.as_str())
}

fn is_property_attribute(attribute: &XmlAttribute) -> bool {
    match attribute.name.namespace.as_deref() {
        None => false,
        Some(namespace) if namespace == rdfweave_vocab::xml::NS => false,
        Some(namespace) if namespace == rdf::NS => {
            !SYNTAX_ATTRIBUTES.contains(&attribute.name.local.as_str())
        }
        Some(_) => true,
    }
}

fn push_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
}

fn push_attribute_value(out: &mut String, value: &str) {
    out.push_str("=\"");
    for c in value.chars() {
        match c {
            '"' => out.push_str("&quot;"),
            c => push_escaped(out, c.encode_utf8(&mut [0; 4])),
        }
    }
    out.push('"');
}

/// Parse an RDF/XML document into sink events.
pub fn parse_rdfxml<S: TripleSink + ?Sized>(input: &str, sink: &mut S) -> Result<usize> {
    RdfXmlParser::new(sink).parse(input)
}

/// Parse with relative references resolved against `base`.
pub fn parse_rdfxml_with_base<S: TripleSink + ?Sized>(
    input: &str,
    base: &str,
    sink: &mut S,
) -> Result<usize> {
    RdfXmlParser::new(sink).with_base(base)?.parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdfweave_graph_ir::{GraphCollectorSink, Node, Triple};

    const HEADER: &str = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#" xmlns:ex="http://example.org/">"#;

    fn triples(body: &str) -> Result<Vec<Triple>> {
        let input = format!("{}\n{}\n</rdf:RDF>", HEADER, body);
        let mut sink = GraphCollectorSink::new();
        parse_rdfxml(&input, &mut sink)?;
        Ok(sink.finish().triples().collect())
    }

    fn nt(triples: &[Triple]) -> Vec<String> {
        triples.iter().map(|t| t.to_string()).collect()
    }

    fn ex(local: &str) -> XmlName {
        XmlName::new(Some("ex"), Some("http://example.org/"), local)
    }

    #[test]
    fn test_about_resource_and_literals() {
        let t = triples(
            r#"<rdf:Description rdf:about="http://example.org/s">
  <ex:title xml:lang="en">Title</ex:title>
  <ex:link rdf:resource="http://example.org/o"/>
  <ex:count rdf:datatype="http://www.w3.org/2001/XMLSchema#integer">3</ex:count>
</rdf:Description>"#,
        )
        .unwrap();
        assert_eq!(
            nt(&t),
            vec![
                "<http://example.org/s> <http://example.org/title> \"Title\"@en .",
                "<http://example.org/s> <http://example.org/link> <http://example.org/o> .",
                "<http://example.org/s> <http://example.org/count> \"3\"^^<http://www.w3.org/2001/XMLSchema#integer> .",
            ]
        );
    }

    #[test]
    fn test_property_id_reifies_statement() {
        let t = triples(
            r#"<rdf:Description xml:base="http://example.org/doc" rdf:about="http://example.org/s">
  <ex:p rdf:ID="t1">v</ex:p>
  <ex:q rdf:ID="t2" rdf:resource="http://example.org/o"/>
</rdf:Description>"#,
        )
        .unwrap();
        let mut lines = nt(&t);
        lines.sort();
        let rdf = |local: &str| format!("<{}{}>", rdf::NS, local);
        let mut expected = vec![
            "<http://example.org/s> <http://example.org/p> \"v\" .".to_string(),
            "<http://example.org/s> <http://example.org/q> <http://example.org/o> .".to_string(),
        ];
        for (id, predicate, object) in [
            ("t1", "<http://example.org/p>", "\"v\""),
            ("t2", "<http://example.org/q>", "<http://example.org/o>"),
        ] {
            let statement = format!("<http://example.org/doc#{}>", id);
            let class = rdf("Statement");
            for (property, value) in [
                ("type", class.as_str()),
                ("subject", "<http://example.org/s>"),
                ("predicate", predicate),
                ("object", object),
            ] {
                expected.push(format!("{} {} {} .", statement, rdf(property), value));
            }
        }
        expected.sort();
        assert_eq!(lines, expected);
    }

    #[test]
    fn test_property_id_on_nested_node_reifies_link() {
        let t = triples(
            r#"<rdf:Description xml:base="http://example.org/doc" rdf:about="http://example.org/s">
  <ex:knows rdf:ID="k"><ex:Person rdf:about="http://example.org/bob"/></ex:knows>
</rdf:Description>"#,
        )
        .unwrap();
        let statement = Iri::parse("http://example.org/doc#k").unwrap();
        let object_of = |local: &str| {
            t.iter()
                .find(|triple| {
                    triple.subject == statement && triple.predicate.to_string().ends_with(local)
                })
                .map(|triple| triple.object.to_string())
        };
        assert_eq!(object_of("#subject").as_deref(), Some("<http://example.org/s>"));
        assert_eq!(object_of("#object").as_deref(), Some("<http://example.org/bob>"));
        assert_eq!(t.len(), 6);
    }

    #[test]
    fn test_typed_node_and_property_attributes() {
        let t = triples(r#"<ex:Person rdf:about="http://example.org/alice" ex:name="Alice" rdf:type="http://example.org/Agent"/>"#)
            .unwrap();
        assert_eq!(
            nt(&t),
            vec![
                "<http://example.org/alice> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://example.org/Person> .",
                "<http://example.org/alice> <http://example.org/name> \"Alice\" .",
                "<http://example.org/alice> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://example.org/Agent> .",
            ]
        );
    }

    #[test]
    fn test_nested_node_links_parent_first() {
        let t = triples(
            r#"<rdf:Description rdf:about="http://example.org/s">
  <ex:knows>
    <ex:Person ex:name="Bob"/>
  </ex:knows>
</rdf:Description>"#,
        )
        .unwrap();
        assert_eq!(t.len(), 3);
        assert_eq!(t[0].object, Node::Iri(Iri::blank("b1")));
        assert_eq!(t[1].subject, Iri::blank("b1"));
        assert_eq!(t[1].predicate.to_string(), rdf::TYPE);
    }

    #[test]
    fn test_node_ids_shared() {
        let t = triples(
            r#"<rdf:Description rdf:nodeID="x"><ex:p rdf:nodeID="y"/></rdf:Description>
<rdf:Description rdf:nodeID="y"><ex:p rdf:nodeID="x"/></rdf:Description>"#,
        )
        .unwrap();
        assert_eq!(t[0].subject, Iri::blank("b1"));
        assert_eq!(t[0].object, Node::Iri(Iri::blank("b2")));
        assert_eq!(t[1].subject, Iri::blank("b2"));
        assert_eq!(t[1].object, Node::Iri(Iri::blank("b1")));
    }

    #[test]
    fn test_language_inherited_and_reset() {
        let t = triples(
            r#"<rdf:Description rdf:about="http://example.org/s" xml:lang="fr">
  <ex:a>bonjour</ex:a>
  <ex:b xml:lang="">plain</ex:b>
  <ex:c xml:lang="de">hallo</ex:c>
</rdf:Description>"#,
        )
        .unwrap();
        let languages: Vec<_> = t
            .iter()
            .map(|t| t.object.as_literal().and_then(|l| l.language().map(str::to_string)))
            .collect();
        assert_eq!(
            languages,
            vec![Some("fr".to_string()), None, Some("de".to_string())]
        );
    }

    #[test]
    fn test_base_and_id() {
        let input = format!(
            "{}\n<rdf:Description rdf:ID=\"frag\" xml:base=\"http://example.org/doc\"><ex:p rdf:resource=\"other\"/></rdf:Description>\n</rdf:RDF>",
            HEADER
        );
        let mut sink = GraphCollectorSink::new();
        parse_rdfxml(&input, &mut sink).unwrap();
        let t: Vec<_> = sink.finish().triples().collect();
        assert_eq!(
            t[0].to_string(),
            "<http://example.org/doc#frag> <http://example.org/p> <http://example.org/other> ."
        );
    }

    #[test]
    fn test_document_base() {
        let input = format!(
            "{}\n<rdf:Description rdf:about=\"\"><ex:p rdf:resource=\"#x\"/></rdf:Description>\n</rdf:RDF>",
            HEADER
        );
        let mut sink = GraphCollectorSink::new();
        parse_rdfxml_with_base(&input, "http://example.org/doc", &mut sink).unwrap();
        let graph = sink.finish();
        assert_eq!(graph.base(), Some("http://example.org/doc"));
        let t: Vec<_> = graph.triples().collect();
        assert_eq!(t[0].subject.to_string(), "http://example.org/doc");
        assert_eq!(t[0].object.to_string(), "<http://example.org/doc#x>");
    }

    #[test]
    fn test_relative_iri_without_base() {
        let err = triples(r#"<rdf:Description rdf:about="relative"/>"#).unwrap_err();
        assert!(matches!(err, RdfXmlError::Syntax { line: 2, .. }), "{:?}", err);
    }

    #[test]
    fn test_li_numbering() {
        let t = triples(
            r#"<rdf:Bag rdf:about="http://example.org/bag">
  <rdf:li>one</rdf:li>
  <rdf:li>two</rdf:li>
</rdf:Bag>"#,
        )
        .unwrap();
        assert_eq!(t[1].predicate.to_string(), rdf::member(1));
        assert_eq!(t[2].predicate.to_string(), rdf::member(2));
    }

    #[test]
    fn test_parse_type_resource() {
        let t = triples(
            r#"<rdf:Description rdf:about="http://example.org/s">
  <ex:address rdf:parseType="Resource">
    <ex:city>Paris</ex:city>
  </ex:address>
</rdf:Description>"#,
        )
        .unwrap();
        assert_eq!(
            nt(&t),
            vec![
                "<http://example.org/s> <http://example.org/address> _:b1 .",
                "_:b1 <http://example.org/city> \"Paris\" .",
            ]
        );
    }

    #[test]
    fn test_parse_type_literal() {
        let t = triples(
            r#"<rdf:Description rdf:about="http://example.org/s"><ex:body rdf:parseType="Literal"><b class="x">bold &amp; <i>it</i></b></ex:body></rdf:Description>"#,
        )
        .unwrap();
        let literal = t[0].object.as_literal().unwrap();
        assert_eq!(literal.value(), "<b class=\"x\">bold &amp; <i>it</i></b>");
        assert_eq!(literal.datatype().map(|d| d.to_string()).as_deref(), Some(rdf::XML_LITERAL));
    }

    #[test]
    fn test_parse_type_collection() {
        let t = triples(
            r#"<rdf:Description rdf:about="http://example.org/s">
  <ex:list rdf:parseType="Collection">
    <rdf:Description rdf:about="http://example.org/a"/>
    <rdf:Description rdf:about="http://example.org/b"/>
  </ex:list>
  <ex:none rdf:parseType="Collection"/>
</rdf:Description>"#,
        )
        .unwrap();
        assert_eq!(
            nt(&t),
            vec![
                "<http://example.org/s> <http://example.org/list> _:b1 .",
                "<http://example.org/s> <http://example.org/none> <http://www.w3.org/1999/02/22-rdf-syntax-ns#nil> .",
                "_:b1 <http://www.w3.org/1999/02/22-rdf-syntax-ns#first> <http://example.org/a> .",
                "_:b1 <http://www.w3.org/1999/02/22-rdf-syntax-ns#rest> _:b2 .",
                "_:b2 <http://www.w3.org/1999/02/22-rdf-syntax-ns#first> <http://example.org/b> .",
                "_:b2 <http://www.w3.org/1999/02/22-rdf-syntax-ns#rest> <http://www.w3.org/1999/02/22-rdf-syntax-ns#nil> .",
            ]
        );
    }

    #[test]
    fn test_property_attributes_on_property_element() {
        let t = triples(
            r#"<rdf:Description rdf:about="http://example.org/s"><ex:creator ex:name="Ann"/></rdf:Description>"#,
        )
        .unwrap();
        assert_eq!(
            nt(&t),
            vec![
                "<http://example.org/s> <http://example.org/creator> _:b1 .",
                "_:b1 <http://example.org/name> \"Ann\" .",
            ]
        );
    }

    #[test]
    fn test_root_node_element_without_rdf_wrapper() {
        let input = r#"<ex:Doc xmlns:ex="http://example.org/" xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#" rdf:about="http://example.org/d"><ex:p>v</ex:p></ex:Doc>"#;
        let mut sink = GraphCollectorSink::new();
        assert_eq!(parse_rdfxml(input, &mut sink).unwrap(), 2);
    }

    #[test]
    fn test_text_in_node_element_rejected() {
        let err = triples(r#"<rdf:Description rdf:about="http://example.org/s">stray</rdf:Description>"#)
            .unwrap_err();
        assert!(matches!(err, RdfXmlError::Syntax { line: 2, .. }), "{:?}", err);
    }

    #[test]
    fn test_unclosed_document() {
        let input = format!("{}\n<rdf:Description rdf:about=\"http://example.org/s\">", HEADER);
        let mut sink = GraphCollectorSink::new();
        match parse_rdfxml(&input, &mut sink).unwrap_err() {
            RdfXmlError::UnexpectedEof { element } => assert_eq!(element, "rdf:Description"),
            // the reader may refuse the missing end tags itself
            RdfXmlError::Xml { .. } => {}
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_finish_with_open_elements() {
        let mut sink = GraphCollectorSink::new();
        let mut parser = RdfXmlParser::new(&mut sink);
        parser
            .handle(XmlEvent::start(XmlName::rdf("RDF"), vec![]), 1)
            .unwrap();
        parser
            .handle(
                XmlEvent::start(
                    XmlName::rdf("Description"),
                    vec![XmlAttribute::new(XmlName::rdf("about"), "urn:s")],
                ),
                2,
            )
            .unwrap();
        match parser.finish().unwrap_err() {
            RdfXmlError::UnexpectedEof { element } => assert_eq!(element, "rdf:Description"),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_synthetic_events() {
        let mut sink = GraphCollectorSink::new();
        let mut parser = RdfXmlParser::new(&mut sink);
        let events = vec![
            XmlEvent::start(XmlName::rdf("RDF"), vec![]),
            XmlEvent::start(
                XmlName::rdf("Description"),
                vec![XmlAttribute::new(XmlName::rdf("about"), "urn:s")],
            ),
            XmlEvent::start(ex("p"), vec![]),
            XmlEvent::text("value"),
            XmlEvent::end(ex("p")),
            XmlEvent::end(XmlName::rdf("Description")),
            XmlEvent::end(XmlName::rdf("RDF")),
        ];
        for (line, event) in events.into_iter().enumerate() {
            parser.handle(event, line + 1).unwrap();
        }
        assert_eq!(parser.finish().unwrap(), 1);
        let t: Vec<_> = sink.finish().triples().collect();
        assert_eq!(t[0].to_string(), "<urn:s> <http://example.org/p> \"value\" .");
    }

    #[test]
    fn test_prefixes_reported() {
        let mut sink = GraphCollectorSink::new();
        parse_rdfxml(&format!("{}</rdf:RDF>", HEADER), &mut sink).unwrap();
        let graph = sink.finish();
        assert_eq!(
            graph.namespaces().namespace_uri("ex"),
            Some("http://example.org/")
        );
    }
}
