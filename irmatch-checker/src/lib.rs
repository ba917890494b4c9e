//! Structural equivalence checking for graph IR
//!
//! Two functions (or graphs) are equivalent when they compute the same
//! thing up to renaming of intermediate values and reordering of nodes.
//! The check descends from the declared outputs and greedily commits node
//! correspondences without backtracking, so genuinely ambiguous symmetric
//! sub-graphs may be reported as different.
//!
//! ```
//! use irmatch_checker::same_function;
//! use irmatch_core::{Function, Node};
//!
//! let f = Function::new("", "f")
//!     .inputs(["A", "B"])
//!     .node(Node::new("Add").inputs(["A", "B"]).outputs(["C"]))
//!     .output("C");
//! let g = Function::new("", "g")
//!     .inputs(["X", "Y"])
//!     .node(Node::new("Add").inputs(["X", "Y"]).outputs(["Z"]))
//!     .output("Z");
//! assert!(same_function(&f, &g));
//! ```

pub mod attribute;
pub mod config;
pub mod definition;
pub mod mapping;
mod matcher;
pub mod mismatch;
pub mod scope;

pub use config::MatchConfig;
pub use definition::{DefinitionIndex, DefinitionSite};
pub use irmatch_core::{Error, Result};
pub use mapping::NodeMapping;
pub use mismatch::{AttributeMismatch, MatchFrame, Mismatch, MismatchKind};

use irmatch_core::{validate_function, validate_graph, Function, Graph};
use matcher::Matcher;
use tracing::{debug, warn};

/// Result of a comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The operands are equivalent; the root-scope node correspondence
    Equivalent(NodeMapping),
    /// The operands differ; the reason when tracing is enabled
    NotEquivalent(Option<Mismatch>),
}

impl Verdict {
    /// Whether the operands were judged equivalent
    pub fn is_equivalent(&self) -> bool {
        matches!(self, Verdict::Equivalent(_))
    }

    /// The recorded mismatch, if any
    pub fn mismatch(&self) -> Option<&Mismatch> {
        match self {
            Verdict::NotEquivalent(mismatch) => mismatch.as_ref(),
            Verdict::Equivalent(_) => None,
        }
    }

    /// The node correspondence of an equivalent verdict
    pub fn mapping(&self) -> Option<&NodeMapping> {
        match self {
            Verdict::Equivalent(mapping) => Some(mapping),
            Verdict::NotEquivalent(_) => None,
        }
    }
}

/// Equivalence checker
#[derive(Debug, Clone, Default)]
pub struct Checker {
    config: MatchConfig,
}

impl Checker {
    /// Create a checker with the given configuration
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Compare two top-level functions.
    ///
    /// Every node of both functions must take part in the correspondence;
    /// a node not reachable from the outputs makes the functions differ.
    pub fn check_function(&self, f1: &Function, f2: &Function) -> Result<Verdict> {
        if self.config.validate_inputs {
            validate_function(f1)?;
            validate_function(f2)?;
        }
        let mut matcher = Matcher::new(&self.config, f1.body(), f2.body());
        let equivalent = matcher.same_function(f1, f2)?;
        debug!(left = %f1.name, right = %f2.name, equivalent, "compared functions");
        Ok(matcher.finish(equivalent))
    }

    /// Compare two graphs. Unreachable nodes are tolerated unless
    /// `subgraph_totality` is configured.
    pub fn check_graph(&self, g1: &Graph, g2: &Graph) -> Result<Verdict> {
        if self.config.validate_inputs {
            validate_graph(g1)?;
            validate_graph(g2)?;
        }
        let mut matcher = Matcher::new(&self.config, g1.body(), g2.body());
        let equivalent = matcher.same_root_graph(g1, g2)?;
        debug!(left = %g1.name, right = %g2.name, equivalent, "compared graphs");
        Ok(matcher.finish(equivalent))
    }
}

/// Compare two functions with the default configuration.
///
/// Errors (such as exceeding the depth limit) are logged and reported as
/// not equivalent.
pub fn same_function(f1: &Function, f2: &Function) -> bool {
    match Checker::default().check_function(f1, f2) {
        Ok(verdict) => verdict.is_equivalent(),
        Err(err) => {
            warn!(error = %err, "function comparison aborted");
            false
        }
    }
}

/// Alias of [`same_function`]
pub fn isomorphic(f1: &Function, f2: &Function) -> bool {
    same_function(f1, f2)
}

/// Compare two graphs with the default configuration.
pub fn same_graph(g1: &Graph, g2: &Graph) -> bool {
    match Checker::default().check_graph(g1, g2) {
        Ok(verdict) => verdict.is_equivalent(),
        Err(err) => {
            warn!(error = %err, "graph comparison aborted");
            false
        }
    }
}
