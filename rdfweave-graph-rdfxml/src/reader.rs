//! quick-xml adapter producing namespace-resolved [`XmlEvent`]s
//!
//! quick-xml reports raw qualified names; this reader keeps its own stack of
//! namespace scopes so the parser only ever sees resolved names. Empty
//! elements are reported as a start followed by an end.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use rdfweave_vocab::xml;

use crate::error::{RdfXmlError, Result};
use crate::event::{XmlAttribute, XmlEvent, XmlName};

/// Pull reader over an in-memory XML document
pub struct XmlEventReader<'a> {
    input: &'a str,
    reader: Reader<&'a [u8]>,
    /// Declarations per open element, innermost last
    scopes: Vec<Vec<(String, String)>>,
    /// End event owed for an empty element
    pending_end: Option<XmlName>,
    line: usize,
    scanned: usize,
}

impl<'a> XmlEventReader<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            reader: Reader::from_str(input),
            scopes: Vec::new(),
            pending_end: None,
            line: 1,
            scanned: 0,
        }
    }

    /// 1-based line at which the last event started
    pub fn line(&self) -> usize {
        self.line
    }

    /// Next event, or `None` at end of document
    pub fn next_event(&mut self) -> Result<Option<XmlEvent>> {
        if let Some(name) = self.pending_end.take() {
            self.scopes.pop();
            return Ok(Some(XmlEvent::EndElement { name }));
        }

        loop {
            self.track_line(self.reader.buffer_position() as usize);
            let event = self.reader.read_event().map_err(|e| self.xml_error(e))?;
            match event {
                Event::Start(start) => return self.start_element(&start).map(Some),
                Event::Empty(start) => {
                    let event = self.start_element(&start)?;
                    if let XmlEvent::StartElement { name, .. } = &event {
                        self.pending_end = Some(name.clone());
                    }
                    return Ok(Some(event));
                }
                Event::End(end) => {
                    let raw = String::from_utf8_lossy(end.name().as_ref()).into_owned();
                    let name = self.resolve(&raw, false)?;
                    self.scopes.pop();
                    return Ok(Some(XmlEvent::EndElement { name }));
                }
                Event::Text(text) => {
                    let text = text.unescape().map_err(|e| self.xml_error(e))?;
                    return Ok(Some(XmlEvent::Characters(text.into_owned())));
                }
                Event::CData(data) => {
                    let text = String::from_utf8_lossy(&data).into_owned();
                    return Ok(Some(XmlEvent::Characters(text)));
                }
                Event::Eof => return Ok(None),
                // declarations, comments, processing instructions, doctype
                _ => continue,
            }
        }
    }

    fn start_element(&mut self, start: &BytesStart<'_>) -> Result<XmlEvent> {
        let mut declarations = Vec::new();
        let mut raw_attributes = Vec::new();
        for attribute in start.attributes() {
            let attribute = attribute.map_err(|e| self.xml_error(e))?;
            let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
            let value = attribute
                .unescape_value()
                .map_err(|e| self.xml_error(e))?
                .into_owned();
            if key == "xmlns" {
                declarations.push((String::new(), value));
            } else if let Some(prefix) = key.strip_prefix("xmlns:") {
                declarations.push((prefix.to_string(), value));
            } else {
                raw_attributes.push((key, value));
            }
        }
        self.scopes.push(declarations.clone());

        let raw = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let name = self.resolve(&raw, false)?;
        let attributes = raw_attributes
            .into_iter()
            .map(|(key, value)| Ok(XmlAttribute::new(self.resolve(&key, true)?, value)))
            .collect::<Result<Vec<_>>>()?;

        Ok(XmlEvent::StartElement {
            name,
            attributes,
            namespaces: declarations,
        })
    }

    /// Resolve a qualified name against the open scopes
    ///
    /// Unprefixed attributes have no namespace; unprefixed elements take
    /// the default namespace, where an empty declaration means none.
    fn resolve(&self, raw: &str, attribute: bool) -> Result<XmlName> {
        let (prefix, local) = match raw.split_once(':') {
            Some((prefix, local)) => (Some(prefix), local),
            None => (None, raw),
        };
        match prefix {
            Some("xml") => Ok(XmlName::new(Some("xml"), Some(xml::NS), local)),
            Some(prefix) => match self.lookup(prefix) {
                Some(namespace) => Ok(XmlName::new(Some(prefix), Some(namespace), local)),
                None => Err(RdfXmlError::Xml {
                    line: self.line,
                    message: format!("undeclared namespace prefix '{}'", prefix),
                }),
            },
            None if attribute => Ok(XmlName::unqualified(local)),
            None => {
                let namespace = self.lookup("").filter(|namespace| !namespace.is_empty());
                Ok(XmlName::new(None, namespace, local))
            }
        }
    }

    fn lookup(&self, prefix: &str) -> Option<&str> {
        self.scopes
            .iter()
            .rev()
            .flat_map(|scope| scope.iter())
            .find(|(declared, _)| declared == prefix)
            .map(|(_, namespace)| namespace.as_str())
    }

    fn track_line(&mut self, position: usize) {
        let position = position.min(self.input.len());
        if position > self.scanned {
            let newlines = self.input.as_bytes()[self.scanned..position]
                .iter()
                .filter(|&&b| b == b'\n')
                .count();
            self.line += newlines;
            self.scanned = position;
        }
    }

    fn xml_error(&self, error: impl std::fmt::Display) -> RdfXmlError {
        RdfXmlError::Xml {
            line: self.line,
            message: error.to_string(),
        }
    }
}
