//! Checker configuration

use serde::{Deserialize, Serialize};

/// Default bound on nested sub-graph levels
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Match configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Maximum sub-graph nesting before giving up with an error
    pub max_depth: usize,
    /// Record the first failing rule and the node pairs leading to it
    pub trace: bool,
    /// Validate both operands before matching
    pub validate_inputs: bool,
    /// Require nested graphs to be matched completely, as functions are
    pub subgraph_totality: bool,
}

impl MatchConfig {
    /// Configuration for test harnesses: validated inputs and a mismatch trace
    pub fn diagnostic() -> Self {
        Self {
            trace: true,
            validate_inputs: true,
            ..Self::default()
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn with_subgraph_totality(mut self, subgraph_totality: bool) -> Self {
        self.subgraph_totality = subgraph_totality;
        self
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            trace: false,
            validate_inputs: false,
            subgraph_totality: false,
        }
    }
}
