//! Node, value and graph matching
//!
//! Matching descends from the declared outputs. Two values match when they
//! come from the same slot of matching producers, or from the same position
//! of the scope inputs. Two nodes match when op type, domain, attributes and
//! inputs match; once a pair is taken it is never reconsidered.
//!
//! Value descent runs on an explicit last-in first-out worklist, so long
//! chains do not grow the call stack. Only nested sub-graphs recurse, and
//! that nesting is what `MatchConfig::max_depth` bounds.

use crate::attribute;
use crate::config::MatchConfig;
use crate::definition::DefinitionSite;
use crate::mismatch::{AttributeMismatch, MatchFrame, Mismatch, MismatchKind};
use crate::scope::{Resolution, ScopeChain};
use crate::Verdict;
use irmatch_core::{BodyRef, Error, Function, Graph, Result};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace};

/// A pending comparison. `via` is the trail entry of the consuming node.
#[derive(Debug, Clone, Copy)]
enum Task<'ir> {
    Values {
        level: usize,
        left: &'ir str,
        right: &'ir str,
        via: Option<usize>,
    },
    Nodes {
        level: usize,
        left: usize,
        right: usize,
        via: Option<usize>,
    },
}

/// A visited node pair and the entry of the node that led to it
#[derive(Debug)]
struct Step {
    frame: MatchFrame,
    parent: Option<usize>,
}

pub(crate) struct Matcher<'ir, 'c> {
    config: &'c MatchConfig,
    scopes: ScopeChain<'ir>,
    depth: usize,
    /// Visited node pairs, only kept while tracing
    trail: Vec<Step>,
    mismatch: Option<Mismatch>,
}

impl<'ir, 'c> Matcher<'ir, 'c> {
    pub(crate) fn new(config: &'c MatchConfig, left: BodyRef<'ir>, right: BodyRef<'ir>) -> Self {
        Self {
            config,
            scopes: ScopeChain::new(left, right),
            depth: 0,
            trail: Vec::new(),
            mismatch: None,
        }
    }

    pub(crate) fn finish(self, equivalent: bool) -> Verdict {
        if equivalent {
            Verdict::Equivalent(self.scopes.into_root_mapping())
        } else {
            Verdict::NotEquivalent(self.mismatch)
        }
    }

    /// Match two top-level functions. Names and domains of the functions
    /// themselves are not compared.
    pub(crate) fn same_function(&mut self, f1: &'ir Function, f2: &'ir Function) -> Result<bool> {
        if f1.inputs.len() != f2.inputs.len() {
            return self.reject(
                MismatchKind::InputCount {
                    left: f1.inputs.len(),
                    right: f2.inputs.len(),
                },
                None,
            );
        }

        let params1: FxHashSet<&str> = f1.attributes.iter().map(String::as_str).collect();
        let params2: FxHashSet<&str> = f2.attributes.iter().map(String::as_str).collect();
        if params1 != params2 {
            return self.reject(MismatchKind::AttributeParameters, None);
        }

        if opset_imports(f1) != opset_imports(f2) {
            return self.reject(MismatchKind::OpsetImports, None);
        }

        if f1.nodes.len() != f2.nodes.len() {
            return self.reject(
                MismatchKind::NodeCount {
                    left: f1.nodes.len(),
                    right: f2.nodes.len(),
                },
                None,
            );
        }

        if !self.same_value_list(0, &f1.outputs, &f2.outputs)? {
            return Ok(false);
        }

        // Every node must be reached from the outputs, one-to-one.
        self.check_totality(0)
    }

    /// Match two graphs at the root scope
    pub(crate) fn same_root_graph(&mut self, g1: &'ir Graph, g2: &'ir Graph) -> Result<bool> {
        if let Some(kind) = graph_header_mismatch(g1, g2) {
            return self.reject(kind, None);
        }
        self.same_graph(0)
    }

    /// Outputs of the two bodies at `level` must match. Completeness is only
    /// required when `subgraph_totality` is configured.
    fn same_graph(&mut self, level: usize) -> Result<bool> {
        let (left, right) = self.bodies(level);
        if !self.same_value_list(level, left.outputs, right.outputs)? {
            return Ok(false);
        }
        if self.config.subgraph_totality {
            return self.check_totality(level);
        }
        Ok(true)
    }

    /// Compare the bodies of a graph attribute found on a node at `level`.
    /// The nested frame is enclosed by `level`, whatever frames are active.
    fn same_sub_graph(&mut self, level: usize, g1: &'ir Graph, g2: &'ir Graph) -> Result<bool> {
        if let Some(kind) = graph_header_mismatch(g1, g2) {
            return self.reject(kind, None);
        }
        self.enter()?;
        let child = self.scopes.push(level, g1.body(), g2.body());
        trace!(scope = child, parent = level, "entering nested scope");
        let outcome = self.same_graph(child);
        self.scopes.pop();
        self.leave();
        outcome
    }

    fn same_value_list(
        &mut self,
        level: usize,
        list1: &'ir [String],
        list2: &'ir [String],
    ) -> Result<bool> {
        let mut work = Vec::new();
        if !self.schedule_values(level, list1, list2, None, &mut work)? {
            return Ok(false);
        }
        self.drain(work)
    }

    /// Compare a single pair of values at `level` and everything they depend on
    #[cfg(test)]
    fn same_value(&mut self, level: usize, v1: &'ir str, v2: &'ir str) -> Result<bool> {
        self.drain(vec![Task::Values {
            level,
            left: v1,
            right: v2,
            via: None,
        }])
    }

    /// Compare a single pair of nodes at `level` and everything they depend on
    #[cfg(test)]
    fn same_node(&mut self, level: usize, n1: usize, n2: usize) -> Result<bool> {
        self.drain(vec![Task::Nodes {
            level,
            left: n1,
            right: n2,
            via: None,
        }])
    }

    /// Queue pairwise value comparisons so that the first pair is taken first
    fn schedule_values(
        &mut self,
        level: usize,
        list1: &'ir [String],
        list2: &'ir [String],
        via: Option<usize>,
        work: &mut Vec<Task<'ir>>,
    ) -> Result<bool> {
        if list1.len() != list2.len() {
            return self.reject(
                MismatchKind::ValueCount {
                    left: list1.len(),
                    right: list2.len(),
                },
                via,
            );
        }
        work.extend(list1.iter().zip(list2).rev().map(|(v1, v2)| Task::Values {
            level,
            left: v1.as_str(),
            right: v2.as_str(),
            via,
        }));
        Ok(true)
    }

    fn drain(&mut self, mut work: Vec<Task<'ir>>) -> Result<bool> {
        while let Some(task) = work.pop() {
            let matched = match task {
                Task::Values {
                    level,
                    left,
                    right,
                    via,
                } => self.same_value_step(level, left, right, via, &mut work)?,
                Task::Nodes {
                    level,
                    left,
                    right,
                    via,
                } => self.same_node_step(level, left, right, via, &mut work)?,
            };
            if !matched {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn same_value_step(
        &mut self,
        level: usize,
        v1: &str,
        v2: &str,
        via: Option<usize>,
        work: &mut Vec<Task<'ir>>,
    ) -> Result<bool> {
        let mut level = level;
        loop {
            match self.scopes.resolve(level, v1, v2) {
                Resolution::Local(s1, s2) => {
                    if s1.slot() != s2.slot() {
                        return self.reject(
                            MismatchKind::Slot {
                                left: v1.to_string(),
                                right: v2.to_string(),
                                left_slot: s1.slot(),
                                right_slot: s2.slot(),
                            },
                            via,
                        );
                    }
                    return self.same_site(level, v1, v2, s1, s2, via, work);
                }
                // Captured values are decided by the enclosing comparison
                Resolution::Enclosing(parent) => level = parent,
                Resolution::Asymmetric => {
                    return self.reject(
                        MismatchKind::ScopeAsymmetry {
                            left: v1.to_string(),
                            right: v2.to_string(),
                        },
                        via,
                    )
                }
                Resolution::Unbound => {
                    return self.reject(
                        MismatchKind::Unbound {
                            left: v1.to_string(),
                            right: v2.to_string(),
                        },
                        via,
                    )
                }
            }
        }
    }

    fn same_site(
        &mut self,
        level: usize,
        v1: &str,
        v2: &str,
        s1: DefinitionSite,
        s2: DefinitionSite,
        via: Option<usize>,
        work: &mut Vec<Task<'ir>>,
    ) -> Result<bool> {
        match (s1, s2) {
            (DefinitionSite::Input(p1), DefinitionSite::Input(p2)) => {
                if p1 == p2 {
                    Ok(true)
                } else {
                    self.reject(
                        MismatchKind::Slot {
                            left: v1.to_string(),
                            right: v2.to_string(),
                            left_slot: p1,
                            right_slot: p2,
                        },
                        via,
                    )
                }
            }
            (DefinitionSite::Node { node: n1, .. }, DefinitionSite::Node { node: n2, .. }) => {
                work.push(Task::Nodes {
                    level,
                    left: n1,
                    right: n2,
                    via,
                });
                Ok(true)
            }
            _ => self.reject(
                MismatchKind::InputVersusNode {
                    left: v1.to_string(),
                    right: v2.to_string(),
                },
                via,
            ),
        }
    }

    /// Op type and domain, then attributes, then the inputs are queued.
    ///
    /// The pair is committed before its inputs are compared. Any later
    /// failure rejects the whole comparison, so no commitment is ever undone.
    fn same_node_step(
        &mut self,
        level: usize,
        n1: usize,
        n2: usize,
        via: Option<usize>,
        work: &mut Vec<Task<'ir>>,
    ) -> Result<bool> {
        if let Some(committed) = self.scopes.frame(level).mapping.get(n1) {
            if committed == n2 {
                return Ok(true);
            }
            return self.reject(
                MismatchKind::MappingConflict {
                    left: n1,
                    committed,
                    right: n2,
                },
                via,
            );
        }

        let (left, right) = self.bodies(level);
        let (node1, node2) = (&left.nodes[n1], &right.nodes[n2]);
        let step = self.record(
            MatchFrame::Node {
                scope: level,
                left: n1,
                right: n2,
                op_type: node1.op_type.clone(),
            },
            via,
        );

        if node1.op_type != node2.op_type {
            return self.reject(
                MismatchKind::OpType {
                    left: node1.op_type.clone(),
                    right: node2.op_type.clone(),
                },
                step,
            );
        }
        if node1.domain != node2.domain {
            return self.reject(
                MismatchKind::Domain {
                    left: node1.domain.clone(),
                    right: node2.domain.clone(),
                },
                step,
            );
        }

        let outcome = attribute::same_attrs(&node1.attributes, &node2.attributes, |g1, g2| {
            self.same_sub_graph(level, g1, g2)
        })?;
        match outcome {
            None => {}
            // The nested comparison already recorded its reason
            Some(AttributeMismatch::Subgraph { name, index }) => {
                self.note(MatchFrame::Subgraph {
                    attribute: name,
                    index,
                });
                self.note_trail(step);
                return Ok(false);
            }
            Some(other) => return self.reject(MismatchKind::Attribute(other), step),
        }

        if !self.schedule_values(level, &node1.inputs, &node2.inputs, step, work)? {
            return Ok(false);
        }
        trace!(scope = level, left = n1, right = n2, op = %node1.op_type, "committed node pair");
        self.scopes.frame_mut(level).mapping.commit(n1, n2);
        Ok(true)
    }

    fn check_totality(&mut self, level: usize) -> Result<bool> {
        let (left, right) = self.bodies(level);
        let mapping = &self.scopes.frame(level).mapping;
        let (mapped, targets) = (mapping.len(), mapping.distinct_targets());
        if mapped != left.nodes.len() {
            return self.reject(
                MismatchKind::UnreachedNodes {
                    mapped,
                    total: left.nodes.len(),
                },
                None,
            );
        }
        if targets != right.nodes.len() {
            return self.reject(
                MismatchKind::NotInjective {
                    targets,
                    total: right.nodes.len(),
                },
                None,
            );
        }
        Ok(true)
    }

    fn bodies(&self, level: usize) -> (BodyRef<'ir>, BodyRef<'ir>) {
        let frame = self.scopes.frame(level);
        (frame.left, frame.right)
    }

    fn enter(&mut self) -> Result<()> {
        if self.depth >= self.config.max_depth {
            return Err(Error::DepthLimitExceeded {
                limit: self.config.max_depth,
            });
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn record(&mut self, frame: MatchFrame, parent: Option<usize>) -> Option<usize> {
        if !self.config.trace {
            return None;
        }
        self.trail.push(Step { frame, parent });
        Some(self.trail.len() - 1)
    }

    fn reject(&mut self, kind: MismatchKind, via: Option<usize>) -> Result<bool> {
        debug!(reason = %kind, "mismatch");
        if self.config.trace && self.mismatch.is_none() {
            self.mismatch = Some(Mismatch::new(kind));
            self.note_trail(via);
        }
        Ok(false)
    }

    fn note(&mut self, frame: MatchFrame) {
        if let Some(mismatch) = self.mismatch.as_mut() {
            mismatch.path.push(frame);
        }
    }

    /// Append the chain of node pairs ending at `step`, innermost first
    fn note_trail(&mut self, mut step: Option<usize>) {
        let Some(mismatch) = self.mismatch.as_mut() else {
            return;
        };
        while let Some(index) = step {
            let entry = &self.trail[index];
            mismatch.path.push(entry.frame.clone());
            step = entry.parent;
        }
    }
}

/// Opset imports as a mapping; a repeated domain keeps its last version
fn opset_imports(function: &Function) -> FxHashMap<&str, i64> {
    function
        .opset_imports
        .iter()
        .map(|entry| (entry.domain.as_str(), entry.version))
        .collect()
}

fn graph_header_mismatch(g1: &Graph, g2: &Graph) -> Option<MismatchKind> {
    if g1.inputs.len() != g2.inputs.len() {
        return Some(MismatchKind::InputCount {
            left: g1.inputs.len(),
            right: g2.inputs.len(),
        });
    }
    // TODO: compare initializer tensors once tensor equality is supported
    if !g1.initializers.is_empty()
        || !g2.initializers.is_empty()
        || !g1.sparse_initializers.is_empty()
        || !g2.sparse_initializers.is_empty()
    {
        return Some(MismatchKind::Initializers);
    }
    None
}

#[cfg(test)]
#[path = "matcher_tests.rs"]
mod tests;
