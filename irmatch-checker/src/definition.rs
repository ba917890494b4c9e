//! Definition sites of the values visible in one scope

use irmatch_core::BodyRef;
use rustc_hash::FxHashMap;
use std::fmt;

/// Where a value is created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefinitionSite {
    /// The `slot`-th input of the scope
    Input(usize),
    /// The `slot`-th output of the `node`-th node
    Node { node: usize, slot: usize },
}

impl DefinitionSite {
    pub fn slot(self) -> usize {
        match self {
            DefinitionSite::Input(slot) | DefinitionSite::Node { slot, .. } => slot,
        }
    }

    /// Producing node index, `None` for scope inputs
    pub fn node(self) -> Option<usize> {
        match self {
            DefinitionSite::Input(_) => None,
            DefinitionSite::Node { node, .. } => Some(node),
        }
    }
}

impl fmt::Display for DefinitionSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefinitionSite::Input(slot) => write!(f, "input #{slot}"),
            DefinitionSite::Node { node, slot } => write!(f, "node #{node} output #{slot}"),
        }
    }
}

/// Map from value name to definition site for one graph or function body.
///
/// Built in a single pass: inputs first, then node outputs in node order.
/// Names are assumed unique within the body; on malformed input the last
/// registration wins.
#[derive(Debug, Clone, Default)]
pub struct DefinitionIndex<'ir> {
    sites: FxHashMap<&'ir str, DefinitionSite>,
}

impl<'ir> DefinitionIndex<'ir> {
    pub fn build(body: BodyRef<'ir>) -> Self {
        let mut sites = FxHashMap::default();
        for (slot, name) in body.inputs.iter().enumerate() {
            sites.insert(name.as_str(), DefinitionSite::Input(slot));
        }
        for (node, n) in body.nodes.iter().enumerate() {
            for (slot, name) in n.outputs.iter().enumerate() {
                // Omitted optional output
                if name.is_empty() {
                    continue;
                }
                sites.insert(name.as_str(), DefinitionSite::Node { node, slot });
            }
        }
        Self { sites }
    }

    pub fn site(&self, name: &str) -> Option<DefinitionSite> {
        self.sites.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sites.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}

#[cfg(test)]
#[path = "definition_tests.rs"]
mod tests;
