//! Import errors for EZM documents and coordinate files.

use corelib::HierarchyError;
use thiserror::Error;

/// Malformed record. Fatal to the whole import.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("invalid number '{token}' in {context}")]
    InvalidNumber { context: String, token: String },

    #[error("{context} expects {expected} values, found {found}")]
    ComponentCount {
        context: String,
        expected: usize,
        found: usize,
    },

    #[error("{context} declares count {count}, which overflows")]
    CountTooLarge { context: String, count: usize },

    #[error("line {line}: expected 1, 2 or 3 coordinates, found {count}")]
    TokenCount { line: usize, count: usize },

    #[error("<{element}> is missing required attribute '{attribute}'")]
    MissingAttribute { element: String, attribute: String },

    #[error("vertex semantic '{0}' has no known width")]
    UnknownSemantic(String),

    #[error("mesh '{mesh}' references unknown skeleton '{skeleton}'")]
    UnresolvedSkeleton { mesh: String, skeleton: String },

    #[error("mesh '{mesh}' indexes vertex {index}, only {vertex_count} vertices declared")]
    VertexIndexOutOfRange {
        mesh: String,
        index: u32,
        vertex_count: usize,
    },

    #[error("mesh '{mesh}' binds bone index {index}, skeleton has {bone_count} bones")]
    BoneIndexOutOfRange {
        mesh: String,
        index: u16,
        bone_count: usize,
    },
}

/// Anything that can abort an EZM load.
#[derive(Debug, Error)]
pub enum EzmError {
    #[error("malformed EZM markup: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),
}
