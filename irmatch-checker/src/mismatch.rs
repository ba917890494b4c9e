//! Diagnostic trace of a failed comparison

use irmatch_core::AttributeKind;
use std::fmt;
use thiserror::Error;

/// Why two attribute sets differ
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttributeMismatch {
    #[error("attribute count differs: {left} vs {right}")]
    Count { left: usize, right: usize },

    #[error("attribute '{0}' missing from the first operand")]
    Missing(String),

    #[error("attribute '{name}' kind differs: {left} vs {right}")]
    Kind {
        name: String,
        left: AttributeKind,
        right: AttributeKind,
    },

    #[error("attribute '{0}' value differs")]
    Value(String),

    #[error("attribute '{name}' has unsupported kind {kind}")]
    Unsupported { name: String, kind: AttributeKind },

    #[error("attribute '{name}' holds {left} graphs vs {right}")]
    GraphCount {
        name: String,
        left: usize,
        right: usize,
    },

    #[error("attribute '{name}' graph #{index} differs")]
    Subgraph { name: String, index: usize },
}

/// The first rule that failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MismatchKind {
    #[error("input count differs: {left} vs {right}")]
    InputCount { left: usize, right: usize },

    #[error("formal attribute parameters differ")]
    AttributeParameters,

    #[error("opset imports differ")]
    OpsetImports,

    #[error("node count differs: {left} vs {right}")]
    NodeCount { left: usize, right: usize },

    #[error("initializers are not supported")]
    Initializers,

    #[error("value list length differs: {left} vs {right}")]
    ValueCount { left: usize, right: usize },

    #[error("values '{left}' and '{right}' are not defined in any scope")]
    Unbound { left: String, right: String },

    #[error("values '{left}' and '{right}' are defined in different scopes")]
    ScopeAsymmetry { left: String, right: String },

    #[error("values '{left}' and '{right}' come from different slots: {left_slot} vs {right_slot}")]
    Slot {
        left: String,
        right: String,
        left_slot: usize,
        right_slot: usize,
    },

    #[error("value '{left}' and '{right}': only one is a scope input")]
    InputVersusNode { left: String, right: String },

    #[error("node #{left} is already paired with #{committed}, not #{right}")]
    MappingConflict {
        left: usize,
        committed: usize,
        right: usize,
    },

    #[error("op type differs: {left} vs {right}")]
    OpType { left: String, right: String },

    #[error("domain differs: '{left}' vs '{right}'")]
    Domain { left: String, right: String },

    #[error(transparent)]
    Attribute(#[from] AttributeMismatch),

    #[error("only {mapped} of {total} nodes are reachable from the outputs")]
    UnreachedNodes { mapped: usize, total: usize },

    #[error("{targets} distinct targets for {total} nodes")]
    NotInjective { targets: usize, total: usize },
}

/// One step of the descent that led to a mismatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchFrame {
    Node {
        scope: usize,
        left: usize,
        right: usize,
        op_type: String,
    },
    Subgraph {
        attribute: String,
        index: usize,
    },
}

impl fmt::Display for MatchFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchFrame::Node {
                scope,
                left,
                right,
                op_type,
            } => write!(f, "{op_type} node #{left} vs #{right} (scope {scope})"),
            MatchFrame::Subgraph { attribute, index } => {
                write!(f, "graph attribute '{attribute}' #{index}")
            }
        }
    }
}

/// First failing rule plus the path to it, innermost frame first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub kind: MismatchKind,
    pub path: Vec<MatchFrame>,
}

impl Mismatch {
    pub fn new(kind: MismatchKind) -> Self {
        Self {
            kind,
            path: Vec::new(),
        }
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        for frame in &self.path {
            write!(f, "\n  while matching {frame}")?;
        }
        Ok(())
    }
}
