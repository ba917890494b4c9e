use super::*;
use irmatch_core::{Function, Graph, Node};

#[test]
fn test_inputs_then_outputs() {
    let function = Function::new("", "f")
        .inputs(["A", "B"])
        .node(Node::new("Add").inputs(["A", "B"]).outputs(["C"]))
        .node(Node::new("Split").inputs(["C"]).outputs(["D", "E"]))
        .outputs(["D", "E"]);
    let index = DefinitionIndex::build(function.body());

    assert_eq!(index.len(), 5);
    assert_eq!(index.site("A"), Some(DefinitionSite::Input(0)));
    assert_eq!(index.site("B"), Some(DefinitionSite::Input(1)));
    assert_eq!(index.site("C"), Some(DefinitionSite::Node { node: 0, slot: 0 }));
    assert_eq!(index.site("E"), Some(DefinitionSite::Node { node: 1, slot: 1 }));
    assert_eq!(index.site("Z"), None);
    assert!(!index.contains("Z"));
}

#[test]
fn test_empty_output_names_are_skipped() {
    let graph = Graph::new()
        .input("X")
        .node(Node::new("Dropout").inputs(["X"]).outputs(["Y", ""]))
        .output("Y");
    let index = DefinitionIndex::build(graph.body());

    assert_eq!(index.len(), 2);
    assert!(!index.contains(""));
}

#[test]
fn test_empty_body() {
    let graph = Graph::new();
    let index = DefinitionIndex::build(graph.body());
    assert!(index.is_empty());
}

#[test]
fn test_site_accessors() {
    let input = DefinitionSite::Input(2);
    assert_eq!(input.slot(), 2);
    assert_eq!(input.node(), None);
    assert_eq!(input.to_string(), "input #2");

    let output = DefinitionSite::Node { node: 4, slot: 1 };
    assert_eq!(output.slot(), 1);
    assert_eq!(output.node(), Some(4));
    assert_eq!(output.to_string(), "node #4 output #1");
}
