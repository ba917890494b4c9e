//! Well-formedness checks for IR handed to the checker
//!
//! # Invariants checked:
//! - every value name is defined at most once per scope
//! - every referenced value is defined in the current or an enclosing scope
//! - attribute names are unique per node
//! - attribute references name a formal parameter of the enclosing function
//! - each opset domain is imported at most once

use crate::error::{Error, Result};
use crate::ir::{AttributeValue, BodyRef, Function, Graph, Node};
use rustc_hash::FxHashSet;

/// Validate a top-level function.
pub fn validate_function(function: &Function) -> Result<()> {
    let mut domains = FxHashSet::default();
    for import in &function.opset_imports {
        if !domains.insert(import.domain.as_str()) {
            return Err(Error::DuplicateOpsetDomain(import.domain.clone()));
        }
    }

    let params: FxHashSet<&str> = function.attributes.iter().map(String::as_str).collect();
    let mut validator = Validator {
        scopes: Vec::new(),
        params: Some(params),
    };
    validator.body(scope_label(&function.name), function.body())
}

/// Validate a standalone graph. Attribute references are rejected since
/// there is no enclosing function to bind them.
pub fn validate_graph(graph: &Graph) -> Result<()> {
    let mut validator = Validator {
        scopes: Vec::new(),
        params: None,
    };
    validator.body(scope_label(&graph.name), graph.body())
}

fn scope_label(name: &str) -> String {
    if name.is_empty() {
        "<anonymous>".to_string()
    } else {
        name.to_string()
    }
}

fn node_label(index: usize, node: &Node) -> String {
    format!("#{index} ({})", node.op_type)
}

struct Validator<'a> {
    scopes: Vec<FxHashSet<&'a str>>,
    params: Option<FxHashSet<&'a str>>,
}

impl<'a> Validator<'a> {
    fn is_visible(&self, name: &str) -> bool {
        self.scopes.iter().rev().any(|scope| scope.contains(name))
    }

    fn body(&mut self, label: String, body: BodyRef<'a>) -> Result<()> {
        let mut defined = FxHashSet::default();
        let definitions = body
            .inputs
            .iter()
            .chain(body.nodes.iter().flat_map(|n| n.outputs.iter()));
        for name in definitions {
            // Empty names mark omitted optional outputs
            if name.is_empty() {
                continue;
            }
            if !defined.insert(name.as_str()) {
                return Err(Error::DuplicateDefinition {
                    name: name.clone(),
                    scope: label,
                });
            }
        }
        self.scopes.push(defined);

        let result = self.nodes(&label, body);
        let result = result.and_then(|()| {
            match body.outputs.iter().find(|name| !self.is_visible(name)) {
                Some(name) => Err(Error::UndefinedValue {
                    name: name.clone(),
                    node: "<output>".to_string(),
                    scope: label.clone(),
                }),
                None => Ok(()),
            }
        });

        self.scopes.pop();
        result
    }

    fn nodes(&mut self, label: &str, body: BodyRef<'a>) -> Result<()> {
        for (index, node) in body.nodes.iter().enumerate() {
            if let Some(name) = node
                .inputs
                .iter()
                .find(|name| !name.is_empty() && !self.is_visible(name))
            {
                return Err(Error::UndefinedValue {
                    name: name.clone(),
                    node: node_label(index, node),
                    scope: label.to_string(),
                });
            }

            let mut seen = FxHashSet::default();
            for attr in &node.attributes {
                if !seen.insert(attr.name.as_str()) {
                    return Err(Error::DuplicateAttribute {
                        attribute: attr.name.clone(),
                        node: node_label(index, node),
                    });
                }
                if let AttributeValue::Ref { target, .. } = &attr.value {
                    let known = self
                        .params
                        .as_ref()
                        .is_some_and(|params| params.contains(target.as_str()));
                    if !known {
                        return Err(Error::UnknownAttributeParameter {
                            attribute: attr.name.clone(),
                            target: target.clone(),
                            node: node_label(index, node),
                        });
                    }
                }
                for (i, graph) in attr.value.subgraphs().iter().enumerate() {
                    let nested = if graph.name.is_empty() {
                        format!("{label}/{}[{i}]", attr.name)
                    } else {
                        format!("{label}/{}", graph.name)
                    };
                    self.body(nested, graph.body())?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
