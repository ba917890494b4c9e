//! Attribute comparison policy
//!
//! Scalars, lists and references compare by value. Graph attributes are
//! handed to the caller's sub-graph comparison. Tensor, sparse tensor and
//! type attributes are never judged equal, on either side.

use crate::mismatch::AttributeMismatch;
use irmatch_core::{Attribute, AttributeValue, Graph, Result};
use rustc_hash::FxHashMap;

/// Compare two attribute sets keyed by name.
///
/// Returns `None` when the sets are equal, otherwise the first difference.
pub fn same_attrs<'a, F>(
    attrs1: &'a [Attribute],
    attrs2: &'a [Attribute],
    mut graph_equality: F,
) -> Result<Option<AttributeMismatch>>
where
    F: FnMut(&'a Graph, &'a Graph) -> Result<bool>,
{
    if attrs1.len() != attrs2.len() {
        return Ok(Some(AttributeMismatch::Count {
            left: attrs1.len(),
            right: attrs2.len(),
        }));
    }
    let by_name: FxHashMap<&str, &Attribute> =
        attrs1.iter().map(|a| (a.name.as_str(), a)).collect();
    for attr2 in attrs2 {
        let Some(&attr1) = by_name.get(attr2.name.as_str()) else {
            return Ok(Some(AttributeMismatch::Missing(attr2.name.clone())));
        };
        if let Some(mismatch) = same_attr(attr1, attr2, &mut graph_equality)? {
            return Ok(Some(mismatch));
        }
    }
    Ok(None)
}

/// Compare two attributes already joined by name.
pub fn same_attr<'a, F>(
    attr1: &'a Attribute,
    attr2: &'a Attribute,
    graph_equality: &mut F,
) -> Result<Option<AttributeMismatch>>
where
    F: FnMut(&'a Graph, &'a Graph) -> Result<bool>,
{
    use AttributeValue as V;

    let name = || attr2.name.clone();
    let value = |equal: bool| (!equal).then(|| AttributeMismatch::Value(attr2.name.clone()));

    let outcome = match (&attr1.value, &attr2.value) {
        // Opaque kinds are rejected whatever the other side holds
        (
            opaque @ (V::Tensor(_)
            | V::Tensors(_)
            | V::SparseTensor(_)
            | V::SparseTensors(_)
            | V::TypeProto(_)
            | V::TypeProtos(_)),
            _,
        )
        | (
            _,
            opaque @ (V::Tensor(_)
            | V::Tensors(_)
            | V::SparseTensor(_)
            | V::SparseTensors(_)
            | V::TypeProto(_)
            | V::TypeProtos(_)),
        ) => Some(AttributeMismatch::Unsupported {
            name: name(),
            kind: opaque.kind(),
        }),

        (V::Ref { target: t1, kind: k1 }, V::Ref { target: t2, kind: k2 }) => {
            value(t1 == t2 && k1 == k2)
        }
        (V::Int(a), V::Int(b)) => value(a == b),
        (V::Float(a), V::Float(b)) => value(a == b),
        (V::String(a), V::String(b)) => value(a == b),
        (V::Ints(a), V::Ints(b)) => value(a == b),
        (V::Floats(a), V::Floats(b)) => value(a == b),
        (V::Strings(a), V::Strings(b)) => value(a == b),

        (V::Graph(g1), V::Graph(g2)) => {
            if graph_equality(g1, g2)? {
                None
            } else {
                Some(AttributeMismatch::Subgraph {
                    name: name(),
                    index: 0,
                })
            }
        }
        (V::Graphs(gs1), V::Graphs(gs2)) => {
            if gs1.len() != gs2.len() {
                Some(AttributeMismatch::GraphCount {
                    name: name(),
                    left: gs1.len(),
                    right: gs2.len(),
                })
            } else {
                let mut outcome = None;
                for (index, (g1, g2)) in gs1.iter().zip(gs2).enumerate() {
                    if !graph_equality(g1, g2)? {
                        outcome = Some(AttributeMismatch::Subgraph {
                            name: name(),
                            index,
                        });
                        break;
                    }
                }
                outcome
            }
        }

        (
            left @ (V::Ref { .. }
            | V::Int(_)
            | V::Float(_)
            | V::String(_)
            | V::Ints(_)
            | V::Floats(_)
            | V::Strings(_)
            | V::Graph(_)
            | V::Graphs(_)),
            right,
        ) => Some(kind_mismatch(attr2, left, right)),
    };
    Ok(outcome)
}

fn kind_mismatch(
    attr: &Attribute,
    left: &AttributeValue,
    right: &AttributeValue,
) -> AttributeMismatch {
    // A reference and a concrete value of the same kind still differ
    if left.kind() == right.kind() {
        return AttributeMismatch::Value(attr.name.clone());
    }
    AttributeMismatch::Kind {
        name: attr.name.clone(),
        left: left.kind(),
        right: right.kind(),
    }
}

#[cfg(test)]
#[path = "attribute_tests.rs"]
mod tests;
