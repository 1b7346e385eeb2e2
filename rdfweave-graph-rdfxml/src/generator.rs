//! RDF/XML generator
//!
//! Each resource becomes an `rdf:Description` element. Predicates are
//! written as qualified names: registered prefixes are used where they
//! yield valid XML names, and other namespaces get generated `nsN` prefixes.
//! The root element is only completed on [`close`](Generator::close), once
//! every namespace used by the body is known.

use std::collections::BTreeSet;
use std::io::Write;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use rdfweave_graph_ir::{Generator, GraphError, Iri, NamespaceContext, Node, Result};
use rdfweave_vocab::rdf;
use tracing::debug;

const ROOT_PLACEHOLDER: &str = "<rdf:RDF>";

struct Frame {
    subject: Iri,
    /// Property element wrapping an embedded description
    property: Option<String>,
}

/// Writes resources as an RDF/XML document
pub struct RdfXmlGenerator<W: Write> {
    output: W,
    xml: Writer<Vec<u8>>,
    context: NamespaceContext,
    pretty: bool,
    frames: Vec<Frame>,
    /// Prefixes referenced by the body, declared on the root at close
    used: BTreeSet<String>,
    generated: usize,
    resources: usize,
    closed: bool,
    started: bool,
}

impl<W: Write> RdfXmlGenerator<W> {
    /// Generator indenting by two spaces. In pretty mode embedded blank
    /// nodes are written without an `rdf:nodeID`; [`write_resource`] never
    /// embeds a blank node that is also referenced by label.
    ///
    /// [`write_resource`]: rdfweave_graph_ir::write_resource
    pub fn new(output: W, context: NamespaceContext, pretty: bool) -> Self {
        Self {
            output,
            xml: Writer::new_with_indent(Vec::new(), b' ', 2),
            context,
            pretty,
            frames: Vec::new(),
            used: BTreeSet::new(),
            generated: 0,
            resources: 0,
            closed: false,
            started: false,
        }
    }

    /// Indent nested elements by `indent` spaces; call before writing.
    pub fn with_indent(mut self, indent: usize) -> Self {
        if !self.started {
            self.xml = Writer::new_with_indent(Vec::new(), b' ', indent);
        }
        self
    }

    pub fn context(&self) -> &NamespaceContext {
        &self.context
    }

    pub fn into_inner(self) -> W {
        self.output
    }

    fn write(&mut self, event: Event<'_>) -> Result<()> {
        self.xml.write_event(event).map_err(write_error)
    }

    fn start_document(&mut self) -> Result<()> {
        if self.started {
            return Ok(());
        }
        self.started = true;
        self.write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        self.write(Event::Start(BytesStart::new("rdf:RDF")))
    }

    fn start_description(&mut self, id: &Iri, embedded: bool) -> Result<()> {
        let mut start = BytesStart::new("rdf:Description");
        match id.blank_label() {
            Some(_) if embedded && self.pretty => {}
            Some(label) => start.push_attribute(("rdf:nodeID", label)),
            None => {
                let about = id.to_string();
                start.push_attribute(("rdf:about", about.as_str()));
            }
        }
        self.write(Event::Start(start))
    }

    fn pop_frame(&mut self) -> Result<()> {
        if let Some(frame) = self.frames.pop() {
            self.write(Event::End(BytesEnd::new("rdf:Description")))?;
            if let Some(property) = frame.property {
                self.write(Event::End(BytesEnd::new(property)))?;
            }
        }
        Ok(())
    }

    /// Qualified element name for a predicate
    fn qname(&mut self, predicate: &Iri) -> Result<String> {
        let text = predicate.to_string();
        if let Some((prefix, local)) = self.context.split(&text) {
            if is_ncname(prefix) && is_ncname(local) && (prefix != "rdf" || text.starts_with(rdf::NS)) {
                let qname = format!("{}:{}", prefix, local);
                self.used.insert(prefix.to_string());
                return Ok(qname);
            }
        }

        let cut = text
            .rfind(|c: char| c == '#' || c == '/' || c == ':')
            .map(|i| i + 1)
            .unwrap_or(0);
        let (namespace, local) = text.split_at(cut);
        if cut == 0 || !is_ncname(local) {
            return Err(GraphError::Unserializable(format!(
                "predicate <{}> has no XML name form",
                text
            )));
        }
        let prefix = match self.context.prefix(namespace) {
            Some(prefix) if is_ncname(prefix) && prefix != "rdf" => prefix.to_string(),
            _ if namespace == rdf::NS => "rdf".to_string(),
            _ => {
                let prefix = loop {
                    self.generated += 1;
                    let candidate = format!("ns{}", self.generated);
                    if self.context.namespace_uri(&candidate).is_none() {
                        break candidate;
                    }
                };
                self.context.add_namespace(prefix.clone(), namespace);
                prefix
            }
        };
        let qname = format!("{}:{}", prefix, local);
        self.used.insert(prefix);
        Ok(qname)
    }

    fn root_element(&self) -> String {
        let mut root = format!("<rdf:RDF xmlns:rdf=\"{}\"", rdf::NS);
        for (prefix, namespace) in self.context.iter() {
            if prefix != "rdf" && self.used.contains(prefix) {
                root.push_str(&format!(
                    " xmlns:{}=\"{}\"",
                    prefix,
                    quick_xml::escape::escape(namespace)
                ));
            }
        }
        root.push('>');
        root
    }
}

impl<W: Write> Generator for RdfXmlGenerator<W> {
    fn register_namespace(&mut self, prefix: &str, namespace: &str) {
        if self.context.namespace_uri(prefix).is_none() {
            self.context.add_namespace(prefix, namespace);
        }
    }

    fn open_subject(&self) -> Option<&Iri> {
        self.frames.first().map(|frame| &frame.subject)
    }

    fn begin_resource(&mut self, id: &Iri) -> Result<()> {
        if self.closed {
            return Err(GraphError::Finalized);
        }
        if !self.frames.is_empty() {
            self.end_resource()?;
        }
        self.start_document()?;
        self.start_description(id, false)?;
        self.frames.push(Frame {
            subject: id.clone(),
            property: None,
        });
        self.resources += 1;
        Ok(())
    }

    fn statement(&mut self, predicate: &Iri, object: &Node) -> Result<()> {
        if self.closed {
            return Err(GraphError::Finalized);
        }
        if self.frames.is_empty() {
            return Err(GraphError::sink("statement outside of a resource"));
        }
        let name = self.qname(predicate)?;
        let mut start = BytesStart::new(name.as_str());
        match object {
            Node::Iri(iri) => {
                match iri.blank_label() {
                    Some(label) => start.push_attribute(("rdf:nodeID", label)),
                    None => {
                        let resource = iri.to_string();
                        start.push_attribute(("rdf:resource", resource.as_str()));
                    }
                }
                self.write(Event::Empty(start))
            }
            Node::Literal(literal) => {
                if let Some(language) = literal.language() {
                    start.push_attribute(("xml:lang", language));
                } else if let Some(datatype) = literal.datatype() {
                    let datatype = datatype.to_string();
                    start.push_attribute(("rdf:datatype", datatype.as_str()));
                }
                if literal.value().is_empty() {
                    return self.write(Event::Empty(start));
                }
                self.write(Event::Start(start))?;
                self.write(Event::Text(BytesText::new(literal.value())))?;
                self.write(Event::End(BytesEnd::new(name.as_str())))
            }
        }
    }

    fn begin_embedded(&mut self, predicate: &Iri, id: &Iri) -> Result<()> {
        if self.frames.is_empty() {
            return Err(GraphError::sink("embedded resource outside of a resource"));
        }
        let name = self.qname(predicate)?;
        self.write(Event::Start(BytesStart::new(name.as_str())))?;
        self.start_description(id, true)?;
        self.frames.push(Frame {
            subject: id.clone(),
            property: Some(name),
        });
        Ok(())
    }

    fn end_embedded(&mut self) -> Result<()> {
        if self.frames.len() > 1 {
            self.pop_frame()?;
        }
        Ok(())
    }

    fn end_resource(&mut self) -> Result<()> {
        while !self.frames.is_empty() {
            self.pop_frame()?;
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.end_resource()?;
        self.start_document()?;
        self.write(Event::End(BytesEnd::new("rdf:RDF")))?;
        self.closed = true;

        let body = std::mem::take(self.xml.get_mut());
        let body = String::from_utf8(body).map_err(|e| GraphError::Encoding {
            encoding: "UTF-8",
            message: e.to_string(),
        })?;
        let document = body.replacen(ROOT_PLACEHOLDER, &self.root_element(), 1);
        self.output.write_all(document.as_bytes())?;
        self.output.write_all(b"\n")?;
        self.output.flush()?;
        debug!(resources = self.resources, namespaces = self.used.len(), "rdf/xml output closed");
        Ok(())
    }
}

fn write_error(error: impl std::fmt::Display) -> GraphError {
    GraphError::sink(format!("xml write failed: {}", error))
}

fn is_name_start_char(c: char) -> bool {
    matches!(c,
        'A'..='Z' | '_' | 'a'..='z'
        | '\u{C0}'..='\u{D6}' | '\u{D8}'..='\u{F6}' | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}' | '\u{37F}'..='\u{1FFF}' | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}' | '\u{2C00}'..='\u{2FEF}' | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}' | '\u{FDF0}'..='\u{FFFD}' | '\u{10000}'..='\u{EFFFF}')
}

fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c, '-' | '.' | '0'..='9' | '\u{B7}' | '\u{0300}'..='\u{036F}' | '\u{203F}'..='\u{2040}')
}

/// XML name without a colon
fn is_ncname(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if is_name_start_char(first) => chars.all(is_name_char),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdfweave_graph_ir::{Literal, Resource, Triple};

    fn iri(s: &str) -> Iri {
        Iri::parse(s).unwrap()
    }

    fn render(pretty: bool, context: NamespaceContext, resources: &[Resource]) -> String {
        let mut generator = RdfXmlGenerator::new(Vec::new(), context, pretty);
        for resource in resources {
            generator.receive_resource(resource).unwrap();
        }
        generator.close().unwrap();
        String::from_utf8(generator.into_inner()).unwrap()
    }

    #[test]
    fn test_description_with_literals_and_links() {
        let mut context = NamespaceContext::new();
        context.add_namespace("dc", "http://purl.org/dc/elements/1.1/");
        context.add_namespace("unused", "http://unused.example/");
        let mut resource = Resource::new(iri("http://example.org/doc"));
        resource.add(iri("http://purl.org/dc/elements/1.1/title"), Literal::lang_string("A & B", "en"));
        resource.add(iri("http://purl.org/dc/elements/1.1/date"), Literal::integer(2013));
        resource.add(iri("http://purl.org/dc/elements/1.1/source"), iri("http://example.org/src"));

        let text = render(false, context, &[resource]);
        assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(text.contains(
            "<rdf:RDF xmlns:rdf=\"http://www.w3.org/1999/02/22-rdf-syntax-ns#\" xmlns:dc=\"http://purl.org/dc/elements/1.1/\">"
        ));
        assert!(!text.contains("unused"));
        assert!(text.contains("<rdf:Description rdf:about=\"http://example.org/doc\">"));
        assert!(text.contains("<dc:title xml:lang=\"en\">A &amp; B</dc:title>"));
        assert!(text.contains(
            "<dc:date rdf:datatype=\"http://www.w3.org/2001/XMLSchema#integer\">2013</dc:date>"
        ));
        assert!(text.contains("<dc:source rdf:resource=\"http://example.org/src\"/>"));
        assert!(text.trim_end().ends_with("</rdf:RDF>"));
    }

    #[test]
    fn test_generated_prefixes() {
        let mut generator = RdfXmlGenerator::new(Vec::new(), NamespaceContext::new(), false);
        generator
            .receive_triple(&Triple::new(iri("urn:s"), iri("http://a.example/vocab#p"), iri("urn:o")))
            .unwrap();
        generator
            .receive_triple(&Triple::new(iri("urn:s"), iri("urn:q"), Literal::new("")))
            .unwrap();
        generator.close().unwrap();
        let text = String::from_utf8(generator.into_inner()).unwrap();
        assert!(text.contains("xmlns:ns1=\"http://a.example/vocab#\""));
        assert!(text.contains("xmlns:ns2=\"urn:\""));
        assert!(text.contains("<ns1:p rdf:resource=\"urn:o\"/>"));
        assert!(text.contains("<ns2:q/>"));
    }

    #[test]
    fn test_unserializable_predicate() {
        let mut generator = RdfXmlGenerator::new(Vec::new(), NamespaceContext::new(), false);
        let err = generator
            .receive_triple(&Triple::new(iri("urn:s"), iri("http://x.example/1abc"), "v"))
            .unwrap_err();
        assert!(matches!(err, GraphError::Unserializable(_)));
    }

    #[test]
    fn test_embedded_blank_nodes() {
        let mut resource = Resource::new(iri("http://example.org/s"));
        resource
            .new_resource_with_id(iri("http://example.org/knows"), Iri::blank("b9"))
            .add(iri("http://example.org/name"), "Bob");

        let pretty = render(true, NamespaceContext::new(), &[resource.clone()]);
        assert!(pretty.contains("<rdf:Description>"));
        assert!(!pretty.contains("rdf:nodeID"));

        let compact = render(false, NamespaceContext::new(), &[resource]);
        assert!(compact.contains("<rdf:Description rdf:nodeID=\"b9\">"));
    }

    #[test]
    fn test_empty_document_and_idempotent_close() {
        let mut generator = RdfXmlGenerator::new(Vec::new(), NamespaceContext::new(), false);
        generator.close().unwrap();
        generator.close().unwrap();
        assert!(matches!(
            generator.begin_resource(&iri("urn:s")),
            Err(GraphError::Finalized)
        ));
        let text = String::from_utf8(generator.into_inner()).unwrap();
        assert!(text.contains("<rdf:RDF xmlns:rdf="));
        assert!(text.contains("</rdf:RDF>"));
    }

    #[test]
    fn test_ncname() {
        assert!(is_ncname("title"));
        assert!(is_ncname("_x-1.2"));
        assert!(!is_ncname("1abc"));
        assert!(!is_ncname("a:b"));
        assert!(!is_ncname(""));
    }
}
