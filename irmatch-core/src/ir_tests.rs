use super::*;

fn add_function() -> Function {
    Function::new("custom", "f")
        .inputs(["A", "B"])
        .node(Node::new("Add").inputs(["A", "B"]).outputs(["C"]))
        .output("C")
        .opset("", 18)
}

#[test]
fn test_node_builder() {
    let node = Node::new("Conv")
        .domain("ai.onnx")
        .name("conv0")
        .inputs(["X", "W"])
        .outputs(["Y"])
        .attr(Attribute::ints("strides", vec![1, 1]));

    assert_eq!(node.op_type, "Conv");
    assert_eq!(node.domain, "ai.onnx");
    assert_eq!(node.inputs, vec!["X", "W"]);
    assert_eq!(node.outputs, vec!["Y"]);
    assert!(node.attribute("strides").is_some());
    assert!(node.attribute("pads").is_none());
}

#[test]
fn test_attribute_kinds() {
    assert_eq!(Attribute::int("a", 1).value.kind(), AttributeKind::Int);
    assert_eq!(Attribute::float("a", 1.0).value.kind(), AttributeKind::Float);
    assert_eq!(
        Attribute::strings("a", ["x", "y"]).value.kind(),
        AttributeKind::Strings
    );
    assert_eq!(
        Attribute::graph("body", Graph::new()).value.kind(),
        AttributeKind::Graph
    );

    let reference = Attribute::reference("alpha", "alpha_param", AttributeKind::Float);
    assert!(reference.value.is_reference());
    assert_eq!(reference.value.kind(), AttributeKind::Float);
}

#[test]
fn test_opaque_kinds() {
    assert!(AttributeKind::Tensor.is_opaque());
    assert!(AttributeKind::SparseTensors.is_opaque());
    assert!(AttributeKind::TypeProto.is_opaque());
    assert!(!AttributeKind::Graph.is_opaque());
    assert!(!AttributeKind::Ints.is_opaque());
}

#[test]
fn test_subgraphs_accessor() {
    let single = AttributeValue::Graph(Graph::new().named("then"));
    assert_eq!(single.subgraphs().len(), 1);

    let many = AttributeValue::Graphs(vec![Graph::new(), Graph::new(), Graph::new()]);
    assert_eq!(many.subgraphs().len(), 3);

    assert!(AttributeValue::Int(3).subgraphs().is_empty());
}

#[test]
fn test_body_ref_views() {
    let function = add_function();
    let body = function.body();
    assert_eq!(body.nodes.len(), 1);
    assert_eq!(body.inputs, ["A", "B"]);
    assert_eq!(body.outputs, ["C"]);

    let graph = Graph::new().input("X").output("X");
    let body = BodyRef::from(&graph);
    assert!(body.nodes.is_empty());
    assert_eq!(body.outputs, ["X"]);
}

#[test]
fn test_node_display() {
    let node = Node::new("Gemm")
        .domain("com.example")
        .inputs(["A", "B"])
        .outputs(["Y"])
        .attr(Attribute::float("alpha", 1.0))
        .attr(Attribute::int("transB", 1));
    assert_eq!(
        node.to_string(),
        "Y = com.example.Gemm(A, B) <alpha=1.0, transB=1>"
    );
}

#[test]
fn test_function_display() {
    let rendered = add_function().to_string();
    assert_eq!(rendered, "fn custom.f(A, B) {\n  C = Add(A, B)\n  return C\n}");
}

#[test]
fn test_opaque_attribute_display() {
    let attr = Attribute::tensor("value", TensorData::new(1, vec![2], vec![0; 8]));
    assert_eq!(attr.value.to_string(), "<TENSOR>");
}

#[test]
fn test_function_json_round_trip() {
    let function = add_function();
    let json = function.to_json_pretty().unwrap();
    let parsed = Function::from_json(&json).unwrap();
    assert_eq!(parsed, function);
}

#[test]
fn test_graph_from_json_defaults() {
    let json = r#"{
        "nodes": [
            { "op_type": "Relu", "inputs": ["X"], "outputs": ["Y"] }
        ],
        "inputs": ["X"],
        "outputs": ["Y"]
    }"#;
    let graph = Graph::from_json(json).unwrap();
    assert_eq!(graph.name, "");
    assert_eq!(graph.nodes[0].domain, "");
    assert!(graph.nodes[0].attributes.is_empty());
    assert!(graph.initializers.is_empty());
}

#[test]
fn test_attribute_json_tagging() {
    let attr = Attribute::reference("alpha", "a", AttributeKind::Float);
    let json = serde_json::to_value(&attr).unwrap();
    assert_eq!(json["value"]["kind"], "ref");
    assert_eq!(json["value"]["value"]["target"], "a");
    assert_eq!(json["value"]["value"]["kind"], "float");
}

#[test]
fn test_from_json_reports_serialization_error() {
    let err = Function::from_json("{ \"name\": 3 }").unwrap_err();
    assert!(matches!(err, crate::Error::Serialization(_)));
}
