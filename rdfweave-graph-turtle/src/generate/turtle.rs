//! Turtle generator
//!
//! Output is buffered until [`close`](Generator::close) so that the
//! `@prefix` header can list exactly the namespaces the body uses.
//!
//! Layout:
//! - one block per top-level resource, statements joined with ` ;` and
//!   repeated objects of one predicate joined with `,`
//! - `a` for `rdf:type`, bare numbers and booleans when they read back as
//!   the same literal
//! - embedded blank resources are written inline as `[ ... ]` in pretty
//!   mode; otherwise (and for named embedded resources) as a reference
//!   followed by a block of their own, in pre-order

use std::collections::HashSet;
use std::io::Write;

use rdfweave_graph_ir::{
    escape_string, Generator, GraphError, Iri, Literal, NamespaceContext, Node, Result,
};
use rdfweave_vocab::{rdf, xsd};
use tracing::debug;

use crate::lex::chars::{is_pn_prefix, is_plain_pn_local};
use crate::lex::{single_token, TokenKind};

const DEFAULT_INDENT: usize = 4;

#[derive(Debug)]
struct Frame {
    subject: Iri,
    /// Block this frame writes into
    slot: usize,
    /// Indentation level of this frame's continuation lines
    depth: usize,
    predicate: Option<Iri>,
    inline: bool,
}

/// Writes resources as Turtle
#[derive(Debug)]
pub struct TurtleGenerator<W: Write> {
    writer: W,
    context: NamespaceContext,
    pretty: bool,
    indent: usize,
    /// Blocks of the top-level resource currently open
    blocks: Vec<String>,
    frames: Vec<Frame>,
    body: String,
    used_prefixes: HashSet<String>,
    resources: usize,
    closed: bool,
}

impl<W: Write> TurtleGenerator<W> {
    /// Create a generator compacting IRIs through `context`
    ///
    /// With `pretty` set, embedded blank resources are written inline.
    pub fn new(writer: W, context: NamespaceContext, pretty: bool) -> Self {
        Self {
            writer,
            context,
            pretty,
            indent: DEFAULT_INDENT,
            blocks: Vec::new(),
            frames: Vec::new(),
            body: String::new(),
            used_prefixes: HashSet::new(),
            resources: 0,
            closed: false,
        }
    }

    /// Spaces per nesting level
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn context(&self) -> &NamespaceContext {
        &self.context
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn iri_term(&mut self, iri: &Iri) -> String {
        if iri.is_blank() {
            return iri.to_string();
        }
        let text = iri.to_string();
        if let Some((prefix, local)) = self.context.split(&text) {
            if is_pn_prefix(prefix) && is_plain_pn_local(local) {
                let term = format!("{}:{}", prefix, local);
                self.used_prefixes.insert(prefix.to_string());
                return term;
            }
        }
        format!("<{}>", text)
    }

    fn predicate_term(&mut self, predicate: &Iri) -> String {
        if predicate.to_string() == rdf::TYPE {
            return "a".to_string();
        }
        self.iri_term(predicate)
    }

    fn literal_term(&mut self, literal: &Literal) -> String {
        let value = literal.value();
        if let Some(language) = literal.language() {
            return format!("\"{}\"@{}", escape_string(value), language);
        }
        let Some(datatype) = literal.datatype() else {
            return format!("\"{}\"", escape_string(value));
        };
        if reads_back_bare(value, &datatype.to_string()) {
            return value.to_string();
        }
        let datatype = self.iri_term(datatype);
        format!("\"{}\"^^{}", escape_string(value), datatype)
    }

    fn object_term(&mut self, object: &Node) -> String {
        match object {
            Node::Iri(iri) => self.iri_term(iri),
            Node::Literal(literal) => self.literal_term(literal),
        }
    }

    /// Append `predicate object` to the innermost frame
    fn write_statement(&mut self, predicate: &Iri, object: String) -> Result<()> {
        if self.closed {
            return Err(GraphError::Finalized);
        }
        let predicate_text = self.predicate_term(predicate);
        let subject = match self.frames.last() {
            Some(frame) if frame.predicate.is_none() && !frame.inline => {
                Some(frame.subject.clone())
            }
            Some(_) => None,
            None => {
                return Err(GraphError::Sink(
                    "statement outside of a resource".to_string(),
                ))
            }
        };
        let subject_text = subject.map(|s| self.iri_term(&s));

        let indent = self.indent;
        let Some(frame) = self.frames.last_mut() else {
            return Ok(());
        };
        let block = &mut self.blocks[frame.slot];
        match &frame.predicate {
            Some(current) if current == predicate => {
                block.push_str(", ");
            }
            Some(_) => {
                block.push_str(" ;\n");
                push_indent(block, indent * frame.depth);
                block.push_str(&predicate_text);
                block.push(' ');
            }
            None => {
                match subject_text {
                    Some(subject) => {
                        block.push_str(&subject);
                        block.push(' ');
                    }
                    None => {
                        block.push('\n');
                        push_indent(block, indent * frame.depth);
                    }
                }
                block.push_str(&predicate_text);
                block.push(' ');
            }
        }
        block.push_str(&object);
        frame.predicate = Some(predicate.clone());
        Ok(())
    }

    fn push_block_frame(&mut self, subject: &Iri) {
        self.blocks.push(String::new());
        self.frames.push(Frame {
            subject: subject.clone(),
            slot: self.blocks.len() - 1,
            depth: 1,
            predicate: None,
            inline: false,
        });
    }

    fn pop_frame(&mut self) {
        let Some(frame) = self.frames.pop() else {
            return;
        };
        let block = &mut self.blocks[frame.slot];
        if frame.inline {
            // an inline child with no statements closes as `[]`
            if frame.predicate.is_some() {
                block.push('\n');
                push_indent(block, self.indent * (frame.depth - 1));
            }
            block.push(']');
        } else if frame.predicate.is_some() {
            block.push_str(" .\n");
        }
    }
}

fn push_indent(block: &mut String, width: usize) {
    block.extend(std::iter::repeat(' ').take(width));
}

/// Whether `value` can be written without quotes and still parse back with
/// `datatype`
fn reads_back_bare(value: &str, datatype: &str) -> bool {
    let token = single_token(value);
    match datatype {
        xsd::INTEGER => matches!(token, Some(TokenKind::Integer(_))),
        xsd::DECIMAL => matches!(token, Some(TokenKind::Decimal(_))),
        xsd::DOUBLE => matches!(token, Some(TokenKind::Double(_))),
        xsd::BOOLEAN => matches!(token, Some(TokenKind::KwTrue | TokenKind::KwFalse)),
        _ => false,
    }
}

impl<W: Write> Generator for TurtleGenerator<W> {
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
        self.push_block_frame(id);
        Ok(())
    }

    fn statement(&mut self, predicate: &Iri, object: &Node) -> Result<()> {
        let object = self.object_term(object);
        self.write_statement(predicate, object)
    }

    fn begin_embedded(&mut self, predicate: &Iri, id: &Iri) -> Result<()> {
        if self.pretty && id.is_blank() {
            self.write_statement(predicate, "[".to_string())?;
            let Some(parent) = self.frames.last() else {
                return Ok(());
            };
            let (slot, depth) = (parent.slot, parent.depth + 1);
            self.frames.push(Frame {
                subject: id.clone(),
                slot,
                depth,
                predicate: None,
                inline: true,
            });
            return Ok(());
        }

        let reference = self.iri_term(id);
        self.write_statement(predicate, reference)?;
        self.push_block_frame(id);
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
        for block in self.blocks.drain(..) {
            if block.is_empty() {
                continue;
            }
            if !self.body.is_empty() {
                self.body.push('\n');
            }
            self.body.push_str(&block);
            self.resources += 1;
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.end_resource()?;

        let mut header = String::new();
        for (prefix, namespace) in self.context.iter() {
            if self.used_prefixes.contains(prefix) {
                header.push_str(&format!("@prefix {}: <{}> .\n", prefix, namespace));
            }
        }
        if !header.is_empty() && !self.body.is_empty() {
            header.push('\n');
        }
        self.writer.write_all(header.as_bytes())?;
        self.writer.write_all(self.body.as_bytes())?;
        self.writer.flush()?;
        self.body.clear();
        self.closed = true;
        debug!(
            blocks = self.resources,
            prefixes = self.used_prefixes.len(),
            pretty = self.pretty,
            "turtle output closed"
        );
        Ok(())
    }
}
