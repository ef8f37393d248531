//! EZM ("easy mesh") scene files: materials, skeletons and skinned meshes in
//! XML markup.
//!
//! Records are recognised by tag name. Unknown tags are skipped and their
//! children searched, so wrapper elements such as `<Materials>` or
//! `<Skeletons>` need no special handling.

use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use anyhow::{Context, Result};
use roxmltree::Node;

use crate::error::FormatError;

mod bone;
mod document;
mod material;
mod mesh;
mod model;

pub use bone::{EzmSkeleton, parse_bone};
pub use document::EzmDocument;
pub use material::EzmMaterial;
pub use mesh::{EzmMesh, EzmSubMesh};
pub use model::EzmModel;

/// Load and fully resolve an EZM file.
pub fn load_ezm_from_path(path: impl AsRef<Path>) -> Result<EzmModel> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open EZM file: {}", path.as_ref().display()))?;
    let model = load_ezm_from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to load EZM file: {}", path.as_ref().display()))?;
    log::info!(
        "Loaded EZM '{}': {} materials, {} skeletons, {} meshes",
        path.as_ref().display(),
        model.document().materials().len(),
        model.document().skeletons().len(),
        model.document().meshes().len()
    );
    Ok(model)
}

/// Load an EZM document from any [`Read`] implementation.
pub fn load_ezm_from_reader<R: Read>(mut reader: R) -> Result<EzmModel> {
    let mut contents = String::new();
    reader
        .read_to_string(&mut contents)
        .context("Failed to read EZM contents")?;
    load_ezm_from_str(&contents)
}

/// Convenience helper to parse an EZM string literal.
pub fn load_ezm_from_str(contents: &str) -> Result<EzmModel> {
    let document = EzmDocument::parse_str(contents)?;
    Ok(EzmModel::from_document(document)?)
}

#[inline]
pub(crate) fn is_tag(node: Node<'_, '_>, tag: &str) -> bool {
    node.is_element() && node.tag_name().name() == tag
}

/// Split a list of numbers separated by whitespace and/or commas.
pub(crate) fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
}

pub(crate) fn parse_number<T: std::str::FromStr>(
    token: &str,
    context: &str,
) -> Result<T, FormatError> {
    token.parse::<T>().map_err(|_| FormatError::InvalidNumber {
        context: context.to_owned(),
        token: token.to_owned(),
    })
}

/// Parse exactly `N` floats.
pub(crate) fn parse_fixed<const N: usize>(
    text: &str,
    context: &str,
) -> Result<[f32; N], FormatError> {
    let mut out = [0.0f32; N];
    let mut found = 0;
    for token in tokens(text) {
        if found < N {
            out[found] = parse_number(token, context)?;
        }
        found += 1;
    }
    if found != N {
        return Err(FormatError::ComponentCount {
            context: context.to_owned(),
            expected: N,
            found,
        });
    }
    Ok(out)
}
