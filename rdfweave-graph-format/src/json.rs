//! JSON rendering of resources
//!
//! Each top-level resource becomes an object keyed by (compacted) predicate:
//!
//! ```json
//! {"urn:property": "Hello World", "urn:date": 2013, "urn:link": "urn:pointer"}
//! ```
//!
//! Numeric literals and gYear are written as JSON numbers, booleans as JSON
//! booleans and everything else as strings. Repeated predicates collect
//! into arrays and embedded resources become nested objects. A document
//! holding one resource is that object; several resources form an array.

use std::io::Write;

use rdfweave_graph_ir::{Generator, GraphError, Iri, Literal, NamespaceContext, Node, Result};
use rdfweave_vocab::xsd;
use serde_json::{Map, Number, Value as JsonValue};
use tracing::debug;

struct Frame {
    subject: Iri,
    object: Map<String, JsonValue>,
    /// Key under which the finished object attaches to its parent
    key: Option<String>,
}

/// Writes resources as JSON objects
pub struct JsonGenerator<W: Write> {
    writer: W,
    context: NamespaceContext,
    pretty: bool,
    frames: Vec<Frame>,
    documents: Vec<JsonValue>,
    closed: bool,
}

impl<W: Write> JsonGenerator<W> {
    pub fn new(writer: W, context: NamespaceContext, pretty: bool) -> Self {
        Self {
            writer,
            context,
            pretty,
            frames: Vec::new(),
            documents: Vec::new(),
            closed: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn key(&self, predicate: &Iri) -> String {
        self.context.compact(predicate)
    }

    fn value(&self, object: &Node) -> JsonValue {
        match object {
            Node::Iri(iri) if iri.is_blank() => JsonValue::String(iri.to_string()),
            Node::Iri(iri) => JsonValue::String(self.context.compact(iri)),
            Node::Literal(literal) => literal_value(literal),
        }
    }

    fn top(&mut self) -> Result<&mut Frame> {
        if self.closed {
            return Err(GraphError::Finalized);
        }
        self.frames
            .last_mut()
            .ok_or_else(|| GraphError::sink("statement outside of a resource"))
    }

    fn pop_frame(&mut self) {
        let Some(frame) = self.frames.pop() else {
            return;
        };
        let object = JsonValue::Object(frame.object);
        match (frame.key, self.frames.last_mut()) {
            (Some(key), Some(parent)) => add_property(&mut parent.object, key, object),
            _ => self.documents.push(object),
        }
    }
}

/// JSON value for a literal
fn literal_value(literal: &Literal) -> JsonValue {
    let value = literal.value();
    if literal.is_number_like() {
        if let Some(number) = json_number(value) {
            return JsonValue::Number(number);
        }
    }
    let is_boolean = literal
        .expanded_datatype()
        .is_some_and(|datatype| datatype == xsd::BOOLEAN);
    match value {
        "true" if is_boolean => JsonValue::Bool(true),
        "false" if is_boolean => JsonValue::Bool(false),
        _ => JsonValue::String(value.to_string()),
    }
}

fn json_number(lexical: &str) -> Option<Number> {
    let lexical = lexical.trim();
    let unsigned = lexical.strip_prefix('+').unwrap_or(lexical);
    if let Ok(n) = unsigned.parse::<i64>() {
        return Some(Number::from(n));
    }
    if let Ok(n) = unsigned.parse::<u64>() {
        return Some(Number::from(n));
    }
    // "INF", "NaN" and friends parse as f64 but have no JSON form
    unsigned.parse::<f64>().ok().and_then(Number::from_f64)
}

/// Insert a value, turning repeated keys into arrays
fn add_property(object: &mut Map<String, JsonValue>, key: String, value: JsonValue) {
    match object.get_mut(&key) {
        Some(JsonValue::Array(values)) => values.push(value),
        Some(existing) => {
            let first = std::mem::replace(existing, JsonValue::Null);
            *existing = JsonValue::Array(vec![first, value]);
        }
        None => {
            object.insert(key, value);
        }
    }
}

impl<W: Write> Generator for JsonGenerator<W> {
    fn register_namespace(&mut self, prefix: &str, namespace: &str) {
        self.context.add_namespace(prefix, namespace);
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
        self.frames.push(Frame {
            subject: id.clone(),
            object: Map::new(),
            key: None,
        });
        Ok(())
    }

    fn statement(&mut self, predicate: &Iri, object: &Node) -> Result<()> {
        let key = self.key(predicate);
        let value = self.value(object);
        add_property(&mut self.top()?.object, key, value);
        Ok(())
    }

    fn begin_embedded(&mut self, predicate: &Iri, id: &Iri) -> Result<()> {
        let key = self.key(predicate);
        self.top()?;
        self.frames.push(Frame {
            subject: id.clone(),
            object: Map::new(),
            key: Some(key),
        });
        Ok(())
    }

    fn end_embedded(&mut self) -> Result<()> {
        if self.frames.len() > 1 {
            self.pop_frame();
        }
        Ok(())
    }

    fn end_resource(&mut self) -> Result<()> {
        while !self.frames.is_empty() {
            self.pop_frame();
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.end_resource()?;
        self.closed = true;

        let resources = self.documents.len();
        let document = if resources == 1 {
            self.documents.remove(0)
        } else {
            JsonValue::Array(std::mem::take(&mut self.documents))
        };
        let written = if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, &document)
        } else {
            serde_json::to_writer(&mut self.writer, &document)
        };
        written.map_err(|e| GraphError::sink(format!("json write failed: {}", e)))?;
        self.writer.flush()?;
        debug!(resources, "json output closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdfweave_graph_ir::{Resource, Triple};

    fn iri(s: &str) -> Iri {
        Iri::parse(s).unwrap()
    }

    fn render(context: NamespaceContext, resources: &[Resource]) -> String {
        let mut generator = JsonGenerator::new(Vec::new(), context, false);
        for resource in resources {
            generator.receive_resource(resource).unwrap();
        }
        generator.close().unwrap();
        String::from_utf8(generator.into_inner()).unwrap()
    }

    #[test]
    fn test_flat_resource() {
        let mut resource = Resource::new(iri("urn:res"));
        resource.add(iri("urn:property"), "Hello World");
        resource.add(iri("urn:date"), Literal::typed("2013", iri("xsd:gYear")));
        resource.add(iri("urn:link"), iri("urn:pointer"));

        assert_eq!(
            render(NamespaceContext::new(), &[resource]),
            r#"{"urn:property":"Hello World","urn:date":2013,"urn:link":"urn:pointer"}"#
        );
    }

    #[test]
    fn test_repeated_predicates_and_nesting() {
        let mut resource = Resource::new(iri("urn:res"));
        resource.add(iri("urn:tag"), "a");
        resource.add(iri("urn:tag"), "b");
        resource.add(iri("urn:tag"), "c");
        resource
            .new_resource(iri("urn:child"))
            .add(iri("urn:flag"), Literal::boolean(true))
            .add(iri("urn:ratio"), Literal::double(0.5));
        resource.new_resource(iri("urn:empty"));

        assert_eq!(
            render(NamespaceContext::new(), &[resource]),
            r#"{"urn:tag":["a","b","c"],"urn:child":{"urn:flag":true,"urn:ratio":0.5}}"#
        );
    }

    #[test]
    fn test_keys_compacted() {
        let mut context = NamespaceContext::new();
        context.add_namespace("dc", "http://purl.org/dc/elements/1.1/");
        let mut resource = Resource::new(iri("urn:doc"));
        resource.add(iri("http://purl.org/dc/elements/1.1/creator"), "Ann");
        assert_eq!(render(context, &[resource]), r#"{"dc:creator":"Ann"}"#);
    }

    #[test]
    fn test_several_resources_form_array() {
        let mut generator = JsonGenerator::new(Vec::new(), NamespaceContext::new(), false);
        generator
            .receive_triple(&Triple::new(iri("urn:a"), iri("urn:p"), Literal::integer(1)))
            .unwrap();
        generator
            .receive_triple(&Triple::new(iri("urn:b"), iri("urn:p"), Literal::new("x")))
            .unwrap();
        generator.close().unwrap();
        let text = String::from_utf8(generator.into_inner()).unwrap();
        assert_eq!(text, r#"[{"urn:p":1},{"urn:p":"x"}]"#);
    }

    #[test]
    fn test_non_finite_number_stays_string() {
        let literal = Literal::typed("INF", iri(xsd::DOUBLE));
        assert_eq!(literal_value(&literal), JsonValue::String("INF".to_string()));
        let literal = Literal::typed("+7", iri(xsd::INTEGER));
        assert_eq!(literal_value(&literal), JsonValue::from(7));
    }
}
