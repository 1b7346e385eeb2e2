//! N-Triples generator
//!
//! One line per statement with full IRIs. Embedded resources are flattened:
//! the linking statement is written first, then the child's statements.

use std::io::Write;

use rdfweave_graph_ir::{Generator, GraphError, Iri, Node, Result};
use tracing::debug;

/// Writes statements as N-Triples lines
#[derive(Debug)]
pub struct NTriplesGenerator<W: Write> {
    writer: W,
    /// Open subjects, outermost first
    subjects: Vec<Iri>,
    lines: usize,
    closed: bool,
}

impl<W: Write> NTriplesGenerator<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            subjects: Vec::new(),
            lines: 0,
            closed: false,
        }
    }

    /// Number of statements written so far
    pub fn lines(&self) -> usize {
        self.lines
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_line(&mut self, predicate: &Iri, object: &Node) -> Result<()> {
        if self.closed {
            return Err(GraphError::Finalized);
        }
        let subject = self
            .subjects
            .last()
            .ok_or_else(|| GraphError::Sink("statement outside of a resource".to_string()))?;
        write_term(&mut self.writer, subject)?;
        self.writer.write_all(b" ")?;
        write_term(&mut self.writer, predicate)?;
        writeln!(self.writer, " {} .", object)?;
        self.lines += 1;
        Ok(())
    }
}

fn write_term<W: Write>(writer: &mut W, iri: &Iri) -> std::io::Result<()> {
    if iri.is_blank() {
        write!(writer, "{}", iri)
    } else {
        write!(writer, "<{}>", iri)
    }
}

impl<W: Write> Generator for NTriplesGenerator<W> {
    fn open_subject(&self) -> Option<&Iri> {
        self.subjects.first()
    }

    fn begin_resource(&mut self, id: &Iri) -> Result<()> {
        if self.closed {
            return Err(GraphError::Finalized);
        }
        self.subjects.clear();
        self.subjects.push(id.clone());
        Ok(())
    }

    fn statement(&mut self, predicate: &Iri, object: &Node) -> Result<()> {
        self.write_line(predicate, object)
    }

    fn begin_embedded(&mut self, predicate: &Iri, id: &Iri) -> Result<()> {
        self.write_line(predicate, &Node::Iri(id.clone()))?;
        self.subjects.push(id.clone());
        Ok(())
    }

    fn end_embedded(&mut self) -> Result<()> {
        if self.subjects.len() > 1 {
            self.subjects.pop();
        }
        Ok(())
    }

    fn end_resource(&mut self) -> Result<()> {
        self.subjects.clear();
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.end_resource()?;
        self.writer.flush()?;
        self.closed = true;
        debug!(lines = self.lines, "n-triples output closed");
        Ok(())
    }
}
