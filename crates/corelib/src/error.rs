//! Errors raised while resolving bone declarations into a tree.

use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum HierarchyError {
    #[error("skeleton has no root bone (every bone declares a parent)")]
    NoRoot,

    #[error("skeleton has more than one root: '{first}' and '{second}'")]
    MultipleRoots { first: String, second: String },

    #[error("bone '{bone}' references unknown parent '{parent}'")]
    MissingParent { bone: String, parent: String },

    #[error("bone name '{0}' is declared more than once")]
    DuplicateBone(String),

    #[error("bone '{bone}' is its own ancestor")]
    Cycle { bone: String },
}

pub type HierarchyResult<T> = Result<T, HierarchyError>;
