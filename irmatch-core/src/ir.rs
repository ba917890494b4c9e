//! IR representation: nodes with typed attributes, graphs and functions
//!
//! Values are referred to by name. A name is defined either as an input of
//! the enclosing graph/function or as an output of exactly one node. Nested
//! graphs (graph-valued attributes) may refer to names of enclosing scopes.

use crate::error::Result;
use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Opaque dense tensor payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TensorData {
    pub name: String,
    pub data_type: i32,
    pub dims: Vec<i64>,
    pub raw_data: Vec<u8>,
}

impl TensorData {
    pub fn new(data_type: i32, dims: Vec<i64>, raw_data: Vec<u8>) -> Self {
        Self {
            name: String::new(),
            data_type,
            dims,
            raw_data,
        }
    }
}

/// Opaque sparse tensor payload (COO values plus indices).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SparseTensorData {
    pub values: TensorData,
    pub indices: TensorData,
    pub dims: Vec<i64>,
}

/// Opaque type descriptor, kept in its serialized textual form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TypeDescriptor(pub String);

/// The kind tag of an attribute value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    Int,
    Float,
    String,
    Ints,
    Floats,
    Strings,
    Graph,
    Graphs,
    Tensor,
    Tensors,
    SparseTensor,
    SparseTensors,
    TypeProto,
    TypeProtos,
}

impl AttributeKind {
    /// Kinds whose payload the checker never compares
    pub fn is_opaque(self) -> bool {
        matches!(
            self,
            AttributeKind::Tensor
                | AttributeKind::Tensors
                | AttributeKind::SparseTensor
                | AttributeKind::SparseTensors
                | AttributeKind::TypeProto
                | AttributeKind::TypeProtos
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AttributeKind::Int => "INT",
            AttributeKind::Float => "FLOAT",
            AttributeKind::String => "STRING",
            AttributeKind::Ints => "INTS",
            AttributeKind::Floats => "FLOATS",
            AttributeKind::Strings => "STRINGS",
            AttributeKind::Graph => "GRAPH",
            AttributeKind::Graphs => "GRAPHS",
            AttributeKind::Tensor => "TENSOR",
            AttributeKind::Tensors => "TENSORS",
            AttributeKind::SparseTensor => "SPARSE_TENSOR",
            AttributeKind::SparseTensors => "SPARSE_TENSORS",
            AttributeKind::TypeProto => "TYPE_PROTO",
            AttributeKind::TypeProtos => "TYPE_PROTOS",
        }
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tagged attribute value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AttributeValue {
    Int(i64),
    Float(f32),
    String(String),
    Ints(Vec<i64>),
    Floats(Vec<f32>),
    Strings(Vec<String>),
    Graph(Graph),
    Graphs(Vec<Graph>),
    /// Reference to a formal attribute parameter of the enclosing function.
    /// `kind` is the declared kind of the referenced parameter.
    Ref { target: String, kind: AttributeKind },
    Tensor(TensorData),
    Tensors(Vec<TensorData>),
    SparseTensor(SparseTensorData),
    SparseTensors(Vec<SparseTensorData>),
    TypeProto(TypeDescriptor),
    TypeProtos(Vec<TypeDescriptor>),
}

impl AttributeValue {
    /// Kind of the value. For references this is the referenced kind.
    pub fn kind(&self) -> AttributeKind {
        match self {
            AttributeValue::Int(_) => AttributeKind::Int,
            AttributeValue::Float(_) => AttributeKind::Float,
            AttributeValue::String(_) => AttributeKind::String,
            AttributeValue::Ints(_) => AttributeKind::Ints,
            AttributeValue::Floats(_) => AttributeKind::Floats,
            AttributeValue::Strings(_) => AttributeKind::Strings,
            AttributeValue::Graph(_) => AttributeKind::Graph,
            AttributeValue::Graphs(_) => AttributeKind::Graphs,
            AttributeValue::Ref { kind, .. } => *kind,
            AttributeValue::Tensor(_) => AttributeKind::Tensor,
            AttributeValue::Tensors(_) => AttributeKind::Tensors,
            AttributeValue::SparseTensor(_) => AttributeKind::SparseTensor,
            AttributeValue::SparseTensors(_) => AttributeKind::SparseTensors,
            AttributeValue::TypeProto(_) => AttributeKind::TypeProto,
            AttributeValue::TypeProtos(_) => AttributeKind::TypeProtos,
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, AttributeValue::Ref { .. })
    }

    /// Nested graphs carried by this value, in order
    pub fn subgraphs(&self) -> &[Graph] {
        match self {
            AttributeValue::Graph(g) => std::slice::from_ref(g),
            AttributeValue::Graphs(gs) => gs,
            _ => &[],
        }
    }
}

/// A named attribute attached to a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: AttributeValue,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: AttributeValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    pub fn int(name: impl Into<String>, value: i64) -> Self {
        Self::new(name, AttributeValue::Int(value))
    }

    pub fn float(name: impl Into<String>, value: f32) -> Self {
        Self::new(name, AttributeValue::Float(value))
    }

    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, AttributeValue::String(value.into()))
    }

    pub fn ints(name: impl Into<String>, values: Vec<i64>) -> Self {
        Self::new(name, AttributeValue::Ints(values))
    }

    pub fn floats(name: impl Into<String>, values: Vec<f32>) -> Self {
        Self::new(name, AttributeValue::Floats(values))
    }

    pub fn strings<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            name,
            AttributeValue::Strings(values.into_iter().map(Into::into).collect()),
        )
    }

    pub fn graph(name: impl Into<String>, graph: Graph) -> Self {
        Self::new(name, AttributeValue::Graph(graph))
    }

    pub fn graphs(name: impl Into<String>, graphs: Vec<Graph>) -> Self {
        Self::new(name, AttributeValue::Graphs(graphs))
    }

    pub fn reference(
        name: impl Into<String>,
        target: impl Into<String>,
        kind: AttributeKind,
    ) -> Self {
        Self::new(
            name,
            AttributeValue::Ref {
                target: target.into(),
                kind,
            },
        )
    }

    pub fn tensor(name: impl Into<String>, tensor: TensorData) -> Self {
        Self::new(name, AttributeValue::Tensor(tensor))
    }
}

/// A single operation node
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Node {
    /// Human-readable label, never compared
    #[serde(default)]
    pub name: String,
    pub op_type: String,
    /// Operator namespace; the empty string is the default domain
    #[serde(default)]
    pub domain: String,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

impl Node {
    pub fn new(op_type: impl Into<String>) -> Self {
        Self {
            op_type: op_type.into(),
            ..Self::default()
        }
    }

    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn inputs<I, S>(mut self, inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inputs = inputs.into_iter().map(Into::into).collect();
        self
    }

    pub fn outputs<I, S>(mut self, outputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.outputs = outputs.into_iter().map(Into::into).collect();
        self
    }

    pub fn attr(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

/// A (possibly nested) computation graph
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Graph {
    #[serde(default)]
    pub name: String,
    pub nodes: Vec<Node>,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    #[serde(default)]
    pub initializers: Vec<TensorData>,
    #[serde(default)]
    pub sparse_initializers: Vec<SparseTensorData>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn input(mut self, name: impl Into<String>) -> Self {
        self.inputs.push(name.into());
        self
    }

    pub fn inputs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inputs.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn output(mut self, name: impl Into<String>) -> Self {
        self.outputs.push(name.into());
        self
    }

    pub fn outputs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.outputs.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn node(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn initializer(mut self, tensor: TensorData) -> Self {
        self.initializers.push(tensor);
        self
    }

    pub fn sparse_initializer(mut self, tensor: SparseTensorData) -> Self {
        self.sparse_initializers.push(tensor);
        self
    }

    pub fn body(&self) -> BodyRef<'_> {
        BodyRef::from(self)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a JSON file; I/O and parse failures carry the path
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        read_json_file(path.as_ref())
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// One opset import entry: operator domain and version
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OpsetId {
    #[serde(default)]
    pub domain: String,
    pub version: i64,
}

impl OpsetId {
    pub fn new(domain: impl Into<String>, version: i64) -> Self {
        Self {
            domain: domain.into(),
            version,
        }
    }
}

/// A function: a graph body plus formal attribute parameters and opset imports
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    #[serde(default)]
    pub domain: String,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub nodes: Vec<Node>,
    /// Names of formal attribute parameters
    #[serde(default)]
    pub attributes: Vec<String>,
    #[serde(default)]
    pub opset_imports: Vec<OpsetId>,
}

impl Function {
    pub fn new(domain: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            domain: domain.into(),
            ..Self::default()
        }
    }

    pub fn input(mut self, name: impl Into<String>) -> Self {
        self.inputs.push(name.into());
        self
    }

    pub fn inputs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inputs.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn output(mut self, name: impl Into<String>) -> Self {
        self.outputs.push(name.into());
        self
    }

    pub fn outputs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.outputs.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn node(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn attribute_param(mut self, name: impl Into<String>) -> Self {
        self.attributes.push(name.into());
        self
    }

    pub fn opset(mut self, domain: impl Into<String>, version: i64) -> Self {
        self.opset_imports.push(OpsetId::new(domain, version));
        self
    }

    pub fn body(&self) -> BodyRef<'_> {
        BodyRef::from(self)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a JSON file; I/O and parse failures carry the path
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        read_json_file(path.as_ref())
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let value = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(value)
}

/// Borrowed view of the parts shared by graphs and function bodies
#[derive(Debug, Clone, Copy)]
pub struct BodyRef<'a> {
    pub nodes: &'a [Node],
    pub inputs: &'a [String],
    pub outputs: &'a [String],
}

impl<'a> From<&'a Graph> for BodyRef<'a> {
    fn from(graph: &'a Graph) -> Self {
        Self {
            nodes: &graph.nodes,
            inputs: &graph.inputs,
            outputs: &graph.outputs,
        }
    }
}

impl<'a> From<&'a Function> for BodyRef<'a> {
    fn from(function: &'a Function) -> Self {
        Self {
            nodes: &function.nodes,
            inputs: &function.inputs,
            outputs: &function.outputs,
        }
    }
}

// ===== Rendering =====

fn write_list(f: &mut fmt::Formatter<'_>, items: &[String]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        f.write_str(item)?;
    }
    Ok(())
}

fn write_body(f: &mut fmt::Formatter<'_>, body: BodyRef<'_>) -> fmt::Result {
    for node in body.nodes {
        writeln!(f, "  {node}")?;
    }
    f.write_str("  return ")?;
    write_list(f, body.outputs)
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Int(i) => write!(f, "{i}"),
            AttributeValue::Float(x) => write!(f, "{x:?}"),
            AttributeValue::String(s) => write!(f, "{s:?}"),
            AttributeValue::Ints(v) => write!(f, "{v:?}"),
            AttributeValue::Floats(v) => write!(f, "{v:?}"),
            AttributeValue::Strings(v) => write!(f, "{v:?}"),
            AttributeValue::Graph(g) => write!(f, "graph({} nodes)", g.nodes.len()),
            AttributeValue::Graphs(gs) => write!(f, "graphs[{}]", gs.len()),
            AttributeValue::Ref { target, .. } => write!(f, "@{target}"),
            other => write!(f, "<{}>", other.kind()),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_list(f, &self.outputs)?;
        f.write_str(" = ")?;
        if !self.domain.is_empty() {
            write!(f, "{}.", self.domain)?;
        }
        write!(f, "{}(", self.op_type)?;
        write_list(f, &self.inputs)?;
        f.write_str(")")?;
        if !self.attributes.is_empty() {
            f.write_str(" <")?;
            for (i, attr) in self.attributes.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}={}", attr.name, attr.value)?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "graph {}(", self.name)?;
        write_list(f, &self.inputs)?;
        writeln!(f, ") {{")?;
        write_body(f, self.body())?;
        f.write_str("\n}")
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.domain.is_empty() {
            write!(f, "fn {}", self.name)?;
        } else {
            write!(f, "fn {}.{}", self.domain, self.name)?;
        }
        if !self.attributes.is_empty() {
            f.write_str("<")?;
            write_list(f, &self.attributes)?;
            f.write_str(">")?;
        }
        f.write_str("(")?;
        write_list(f, &self.inputs)?;
        writeln!(f, ") {{")?;
        write_body(f, self.body())?;
        f.write_str("\n}")
    }
}

#[cfg(test)]
#[path = "ir_tests.rs"]
mod tests;
