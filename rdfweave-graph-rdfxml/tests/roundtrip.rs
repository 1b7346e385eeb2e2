//! Graphs written as RDF/XML read back to the same statements.

use rdfweave_graph_ir::{
    Generator, GeneratorSink, Graph, GraphCollectorSink, NamespaceContext,
};
use rdfweave_graph_rdfxml::{parse_rdfxml, RdfXmlGenerator};
use rdfweave_graph_turtle::{parse, NTriplesGenerator};

const TURTLE: &str = r#"
@prefix ex: <http://example.org/> .
@prefix dc: <http://purl.org/dc/elements/1.1/> .

ex:book a ex:Book ;
    dc:title "Moby Dick"@en, "Moby-Dick"@de ;
    dc:date 1851 ;
    ex:price "12.50"^^<http://www.w3.org/2001/XMLSchema#decimal> ;
    ex:note "" ;
    ex:author [ ex:name "Herman <Melville> & co" ; ex:born "1819" ] ;
    ex:related ex:whale .
"#;

fn turtle_graph(input: &str) -> Graph {
    let mut sink = GraphCollectorSink::new();
    parse(input, &mut sink).unwrap();
    sink.finish()
}

fn rdfxml(graph: &Graph, pretty: bool) -> String {
    let mut generator = RdfXmlGenerator::new(Vec::new(), graph.namespaces().clone(), pretty);
    for resource in graph.resources() {
        generator.receive_resource(resource).unwrap();
    }
    generator.close().unwrap();
    String::from_utf8(generator.into_inner()).unwrap()
}

/// Sorted N-Triples of a graph with blank labels erased
fn shape(graph: &Graph) -> Vec<String> {
    let mut sink = GeneratorSink::new(NTriplesGenerator::new(Vec::new()));
    for triple in graph.triples() {
        sink.generator_mut().receive_triple(&triple).unwrap();
    }
    sink.generator_mut().close().unwrap();
    let text = String::from_utf8(sink.into_inner().into_inner()).unwrap();
    let mut lines: Vec<String> = text
        .lines()
        .map(|line| {
            line.split(' ')
                .map(|term| if term.starts_with("_:") { "_:" } else { term })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();
    lines.sort();
    lines
}

fn reparse(xml: &str) -> Graph {
    let mut sink = GraphCollectorSink::new();
    parse_rdfxml(xml, &mut sink).unwrap();
    sink.finish()
}

#[test]
fn compact_output_reads_back() {
    let graph = turtle_graph(TURTLE);
    let xml = rdfxml(&graph, false);
    assert!(xml.contains("rdf:nodeID"));
    assert_eq!(shape(&reparse(&xml)), shape(&graph));
}

#[test]
fn pretty_nested_output_reads_back() {
    let graph = turtle_graph(TURTLE).nest_blank_nodes();
    let xml = rdfxml(&graph, true);
    assert!(!xml.contains("rdf:nodeID"));
    assert_eq!(shape(&reparse(&xml)), shape(&graph));
}

#[test]
fn prefixes_survive() {
    let graph = turtle_graph(TURTLE);
    let xml = rdfxml(&graph, false);
    let back = reparse(&xml);
    let namespaces: &NamespaceContext = back.namespaces();
    assert_eq!(namespaces.namespace_uri("dc"), Some("http://purl.org/dc/elements/1.1/"));
    assert_eq!(namespaces.namespace_uri("ex"), Some("http://example.org/"));
}

#[test]
fn property_id_matches_explicit_reification() {
    let xml = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:ex="http://example.org/" xml:base="http://example.org/doc">
  <rdf:Description rdf:about="http://example.org/s">
    <ex:says rdf:ID="claim">hello</ex:says>
  </rdf:Description>
</rdf:RDF>"#;
    let expected = turtle_graph(
        r#"
@prefix rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .
@prefix ex: <http://example.org/> .

ex:s ex:says "hello" .
<http://example.org/doc#claim> a rdf:Statement ;
    rdf:subject ex:s ;
    rdf:predicate ex:says ;
    rdf:object "hello" .
"#,
    );
    assert_eq!(shape(&reparse(xml)), shape(&expected));
}
