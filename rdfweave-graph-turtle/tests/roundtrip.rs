//! Turtle generation followed by re-parsing keeps the graph

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use rdfweave_graph_ir::{Generator, Graph, GraphCollectorSink, Node, Triple};
use rdfweave_graph_turtle::{parse, parse_to_graph, TurtleGenerator};

/// Sorted statements with blank labels erased, plus the number of distinct
/// blank nodes
fn shape(graph: &Graph) -> (Vec<String>, usize) {
    let mut blanks = HashSet::new();
    let mut lines: Vec<String> = graph
        .triples()
        .map(|triple| {
            let Triple {
                subject,
                predicate,
                object,
            } = triple;
            let subject = if subject.is_blank() {
                blanks.insert(subject.to_string());
                "_".to_string()
            } else {
                subject.to_string()
            };
            let object = match &object {
                Node::Iri(iri) if iri.is_blank() => {
                    blanks.insert(iri.to_string());
                    "_".to_string()
                }
                other => other.to_string(),
            };
            format!("{} {} {}", subject, predicate, object)
        })
        .collect();
    lines.sort();
    (lines, blanks.len())
}

fn write_turtle(graph: &Graph, pretty: bool) -> String {
    let mut generator = TurtleGenerator::new(Vec::new(), graph.namespaces().clone(), pretty);
    for resource in graph.resources() {
        generator.receive_resource(resource).unwrap();
    }
    generator.close().unwrap();
    String::from_utf8(generator.into_inner()).unwrap()
}

fn reparse(turtle: &str) -> Graph {
    let mut sink = GraphCollectorSink::new();
    parse(turtle, &mut sink).unwrap_or_else(|e| panic!("{}\n---\n{}", e, turtle));
    sink.finish()
}

#[test]
fn corpus_round_trips_through_turtle() {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/turtle");
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if !path.extension().is_some_and(|ext| ext == "ttl") {
            continue;
        }
        let graph = parse_to_graph(&fs::read_to_string(&path).unwrap()).unwrap();
        let expected = shape(&graph);

        let compact = write_turtle(&graph, false);
        assert_eq!(shape(&reparse(&compact)), expected, "{} compact", path.display());

        let nested = graph.nest_blank_nodes();
        let pretty = write_turtle(&nested, true);
        assert_eq!(shape(&reparse(&pretty)), expected, "{} pretty", path.display());
    }
}

#[test]
fn pretty_output_inlines_single_use_blank_nodes() {
    let graph = parse_to_graph(
        r#"
        @prefix ex: <http://example.org/> .
        ex:s ex:author [ ex:name "Ann" ] .
        "#,
    )
    .unwrap()
    .nest_blank_nodes();

    let turtle = write_turtle(&graph, true);
    assert!(turtle.contains("ex:s ex:author [\n"), "{}", turtle);
    assert!(!turtle.contains("_:"), "{}", turtle);
}
