//! Asset loading/parsers.
//! EZM scene files (materials, skeletons, skinned meshes) and plain
//! coordinate listings.

pub mod error;
pub mod ezm;
pub mod mesh;
pub mod points;

pub use error::{EzmError, FormatError};
