//! Core types for irmatch
//!
//! This crate provides the IR consumed by the equivalence checker:
//! - nodes with typed attributes, graphs and functions
//! - builders and JSON (de)serialization
//! - well-formedness validation
//! - error types

pub mod error;
pub mod ir;
pub mod validate;

pub use error::{Error, Result};
pub use ir::{
    Attribute, AttributeKind, AttributeValue, BodyRef, Function, Graph, Node, OpsetId,
    SparseTensorData, TensorData, TypeDescriptor,
};
pub use validate::{validate_function, validate_graph};
