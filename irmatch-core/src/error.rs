//! Error types for irmatch

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Duplicate definition of value '{name}' in scope '{scope}'")]
    DuplicateDefinition { name: String, scope: String },

    #[error("Undefined value '{name}' referenced by node {node} in scope '{scope}'")]
    UndefinedValue {
        name: String,
        node: String,
        scope: String,
    },

    #[error("Duplicate attribute '{attribute}' on node {node}")]
    DuplicateAttribute { attribute: String, node: String },

    #[error("Attribute '{attribute}' of node {node} references unknown parameter '{target}'")]
    UnknownAttributeParameter {
        attribute: String,
        target: String,
        node: String,
    },

    #[error("Duplicate opset import for domain '{0}'")]
    DuplicateOpsetDomain(String),

    #[error("Recursion depth limit of {limit} exceeded")]
    DepthLimitExceeded { limit: usize },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
