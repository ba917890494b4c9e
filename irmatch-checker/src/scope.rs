//! Chain of nested comparison scopes
//!
//! Frame 0 is the top-level comparison. A graph-valued attribute pushes a
//! frame for the two nested bodies and pops it once they have been compared.
//! The parent of a frame is the frame owning the node that carries the
//! attribute, which need not be the frame below it on the stack. Names that
//! neither nested body defines are looked up in the parent, where that
//! frame's own table decides the correspondence.

use crate::definition::{DefinitionIndex, DefinitionSite};
use crate::mapping::NodeMapping;
use irmatch_core::BodyRef;

/// Both operands of one scope together with their committed pairs
#[derive(Debug)]
pub struct ScopeFrame<'ir> {
    /// Enclosing level; `None` for the root
    pub parent: Option<usize>,
    pub left: BodyRef<'ir>,
    pub right: BodyRef<'ir>,
    left_defs: DefinitionIndex<'ir>,
    right_defs: DefinitionIndex<'ir>,
    pub mapping: NodeMapping,
}

impl<'ir> ScopeFrame<'ir> {
    fn new(parent: Option<usize>, left: BodyRef<'ir>, right: BodyRef<'ir>) -> Self {
        Self {
            parent,
            left,
            right,
            left_defs: DefinitionIndex::build(left),
            right_defs: DefinitionIndex::build(right),
            mapping: NodeMapping::new(),
        }
    }
}

/// Outcome of looking up a pair of names at some scope level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Both names are defined at this level
    Local(DefinitionSite, DefinitionSite),
    /// Neither is defined here; ask the given enclosing level
    Enclosing(usize),
    /// Only one of the two names is defined here
    Asymmetric,
    /// Neither is defined anywhere up to the outermost scope
    Unbound,
}

#[derive(Debug)]
pub struct ScopeChain<'ir> {
    frames: Vec<ScopeFrame<'ir>>,
}

impl<'ir> ScopeChain<'ir> {
    pub fn new(left: BodyRef<'ir>, right: BodyRef<'ir>) -> Self {
        Self {
            frames: vec![ScopeFrame::new(None, left, right)],
        }
    }

    /// Push a nested scope enclosed by `parent` and return its level
    pub fn push(&mut self, parent: usize, left: BodyRef<'ir>, right: BodyRef<'ir>) -> usize {
        debug_assert!(parent < self.frames.len());
        self.frames.push(ScopeFrame::new(Some(parent), left, right));
        self.frames.len() - 1
    }

    /// Pop the innermost nested scope. The root frame is never popped.
    pub fn pop(&mut self) -> Option<ScopeFrame<'ir>> {
        if self.frames.len() > 1 {
            self.frames.pop()
        } else {
            None
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn frame(&self, level: usize) -> &ScopeFrame<'ir> {
        &self.frames[level]
    }

    pub fn frame_mut(&mut self, level: usize) -> &mut ScopeFrame<'ir> {
        &mut self.frames[level]
    }

    pub fn resolve(&self, level: usize, left: &str, right: &str) -> Resolution {
        let frame = &self.frames[level];
        match (frame.left_defs.site(left), frame.right_defs.site(right)) {
            (Some(l), Some(r)) => Resolution::Local(l, r),
            (None, None) => match frame.parent {
                Some(parent) => Resolution::Enclosing(parent),
                None => Resolution::Unbound,
            },
            _ => Resolution::Asymmetric,
        }
    }

    /// Consume the chain, keeping the root frame's committed pairs
    pub fn into_root_mapping(mut self) -> NodeMapping {
        self.frames.truncate(1);
        self.frames
            .pop()
            .map(|frame| frame.mapping)
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[path = "scope_tests.rs"]
mod tests;
