use super::*;
use crate::ir::{Attribute, AttributeKind};

fn relu_function() -> Function {
    Function::new("", "relu")
        .input("X")
        .node(Node::new("Relu").inputs(["X"]).outputs(["Y"]))
        .output("Y")
        .opset("", 18)
}

#[test]
fn test_valid_function() {
    assert!(validate_function(&relu_function()).is_ok());
}

#[test]
fn test_duplicate_producer() {
    let function = relu_function().node(Node::new("Neg").inputs(["X"]).outputs(["Y"]));
    match validate_function(&function) {
        Err(Error::DuplicateDefinition { name, scope }) => {
            assert_eq!(name, "Y");
            assert_eq!(scope, "relu");
        }
        other => panic!("expected duplicate definition, got {other:?}"),
    }
}

#[test]
fn test_input_shadowed_by_node_output() {
    let function = relu_function().node(Node::new("Neg").inputs(["Y"]).outputs(["X"]));
    assert!(matches!(
        validate_function(&function),
        Err(Error::DuplicateDefinition { .. })
    ));
}

#[test]
fn test_dangling_input_reference() {
    let function = Function::new("", "f")
        .input("X")
        .node(Node::new("Add").inputs(["X", "Missing"]).outputs(["Y"]))
        .output("Y");
    match validate_function(&function) {
        Err(Error::UndefinedValue { name, node, .. }) => {
            assert_eq!(name, "Missing");
            assert_eq!(node, "#0 (Add)");
        }
        other => panic!("expected undefined value, got {other:?}"),
    }
}

#[test]
fn test_dangling_output_reference() {
    let function = relu_function().output("Z");
    assert!(matches!(
        validate_function(&function),
        Err(Error::UndefinedValue { node, .. }) if node == "<output>"
    ));
}

#[test]
fn test_omitted_optional_values_are_ignored() {
    let function = Function::new("", "dropout")
        .input("X")
        .node(
            Node::new("Dropout")
                .inputs(["X", ""])
                .outputs(["Y", ""]),
        )
        .node(Node::new("Identity").inputs(["Y"]).outputs(["Z"]))
        .node(Node::new("Dropout").inputs(["Z"]).outputs(["W", ""]))
        .output("W");
    assert!(validate_function(&function).is_ok());
}

#[test]
fn test_duplicate_attribute() {
    let function = Function::new("", "f")
        .input("X")
        .node(
            Node::new("Flatten")
                .inputs(["X"])
                .outputs(["Y"])
                .attr(Attribute::int("axis", 1))
                .attr(Attribute::int("axis", 2)),
        )
        .output("Y");
    assert!(matches!(
        validate_function(&function),
        Err(Error::DuplicateAttribute { attribute, .. }) if attribute == "axis"
    ));
}

#[test]
fn test_duplicate_opset_domain() {
    let function = relu_function().opset("", 17);
    assert!(matches!(
        validate_function(&function),
        Err(Error::DuplicateOpsetDomain(domain)) if domain.is_empty()
    ));
}

#[test]
fn test_attribute_reference_binding() {
    let node = Node::new("LeakyRelu")
        .inputs(["X"])
        .outputs(["Y"])
        .attr(Attribute::reference("alpha", "slope", AttributeKind::Float));

    let bound = Function::new("", "leaky")
        .input("X")
        .attribute_param("slope")
        .node(node.clone())
        .output("Y");
    assert!(validate_function(&bound).is_ok());

    let unbound = Function::new("", "leaky")
        .input("X")
        .node(node.clone())
        .output("Y");
    assert!(matches!(
        validate_function(&unbound),
        Err(Error::UnknownAttributeParameter { target, .. }) if target == "slope"
    ));

    let graph = Graph::new().input("X").node(node).output("Y");
    assert!(matches!(
        validate_graph(&graph),
        Err(Error::UnknownAttributeParameter { .. })
    ));
}

#[test]
fn test_nested_graph_sees_outer_scope() {
    let then_branch = Graph::new()
        .named("then")
        .node(Node::new("Add").inputs(["X", "T"]).outputs(["R"]))
        .output("R");
    let function = Function::new("", "cond")
        .inputs(["C", "X"])
        .node(Node::new("Neg").inputs(["X"]).outputs(["T"]))
        .node(
            Node::new("If")
                .inputs(["C"])
                .outputs(["Out"])
                .attr(Attribute::graph("then_branch", then_branch)),
        )
        .output("Out");
    assert!(validate_function(&function).is_ok());
}

#[test]
fn test_nested_graph_may_shadow_outer_names() {
    let body = Graph::new()
        .input("X")
        .node(Node::new("Neg").inputs(["X"]).outputs(["Y"]))
        .output("Y");
    let graph = Graph::new()
        .inputs(["C", "X"])
        .node(
            Node::new("If")
                .inputs(["C"])
                .outputs(["Y"])
                .attr(Attribute::graph("then_branch", body)),
        )
        .output("Y");
    assert!(validate_graph(&graph).is_ok());
}

#[test]
fn test_nested_graph_undefined_reference_names_scope() {
    let body = Graph::new()
        .node(Node::new("Neg").inputs(["Nowhere"]).outputs(["R"]))
        .output("R");
    let graph = Graph::new()
        .named("main")
        .input("C")
        .node(
            Node::new("Loop")
                .inputs(["C"])
                .outputs(["Out"])
                .attr(Attribute::graphs("branches", vec![body])),
        )
        .output("Out");
    match validate_graph(&graph) {
        Err(Error::UndefinedValue { name, scope, .. }) => {
            assert_eq!(name, "Nowhere");
            assert_eq!(scope, "main/branches[0]");
        }
        other => panic!("expected undefined value, got {other:?}"),
    }
}

#[test]
fn test_inner_values_do_not_leak_outward() {
    let body = Graph::new()
        .node(Node::new("Constant").outputs(["Inner"]))
        .output("Inner");
    let graph = Graph::new()
        .input("C")
        .node(
            Node::new("If")
                .inputs(["C"])
                .outputs(["Out"])
                .attr(Attribute::graph("then_branch", body)),
        )
        .node(Node::new("Add").inputs(["Out", "Inner"]).outputs(["Z"]))
        .output("Z");
    assert!(matches!(
        validate_graph(&graph),
        Err(Error::UndefinedValue { name, .. }) if name == "Inner"
    ));
}
