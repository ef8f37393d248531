use std::ops::Range;

use roxmltree::Node;

use super::{is_tag, parse_number, tokens};
use crate::error::FormatError;
use crate::mesh::{MAX_INFLUENCES, MeshData, SkinnedVertex};

/// Triangle range of a mesh drawn with one material.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EzmSubMesh {
    material: String,
    index_range: Range<usize>,
}

impl EzmSubMesh {
    pub fn material(&self) -> &str {
        &self.material
    }

    /// Range into the owning mesh's `indices`.
    pub fn index_range(&self) -> Range<usize> {
        self.index_range.clone()
    }

    pub fn triangle_count(&self) -> usize {
        self.index_range.len() / 3
    }
}

/// Skinned mesh bound to a named skeleton.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EzmMesh {
    name: String,
    skeleton: String,
    data: MeshData,
    submeshes: Vec<EzmSubMesh>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Semantic {
    Position,
    Normal,
    TexCoord,
    BlendIndices,
    BlendWeights,
    Other,
}

impl Semantic {
    fn from_name(name: &str) -> (Self, Option<usize>) {
        match name {
            "position" => (Self::Position, Some(3)),
            "normal" => (Self::Normal, Some(3)),
            "texcoord" => (Self::TexCoord, Some(2)),
            // Second UV set has no slot in the vertex; skip it.
            "texcoord1" => (Self::Other, Some(2)),
            "blendindices" => (Self::BlendIndices, Some(MAX_INFLUENCES)),
            "blendweights" => (Self::BlendWeights, Some(MAX_INFLUENCES)),
            _ => (Self::Other, None),
        }
    }
}

struct Channel {
    semantic: Semantic,
    width: usize,
}

impl EzmMesh {
    pub const TAG: &'static str = "Mesh";

    pub fn parse(node: Node<'_, '_>) -> Result<Option<Self>, FormatError> {
        if !is_tag(node, Self::TAG) {
            return Ok(None);
        }
        let name = node.attribute("name").unwrap_or_default().to_owned();
        let mut data = MeshData::default();
        let mut submeshes = Vec::new();

        for child in node.children().filter(|n| n.is_element()) {
            match child.tag_name().name() {
                "MeshVertices" => parse_vertices(child, &name, &mut data.vertices)?,
                "MeshSubMesh" => {
                    let start = data.indices.len();
                    parse_indices(child, &name, &mut data.indices)?;
                    submeshes.push(EzmSubMesh {
                        material: child.attribute("material").unwrap_or_default().to_owned(),
                        index_range: start..data.indices.len(),
                    });
                }
                other => log::trace!("Skipping <{other}> inside mesh '{name}'"),
            }
        }

        let vertex_count = data.vertices.len();
        if let Some(&index) = data.indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(FormatError::VertexIndexOutOfRange {
                mesh: name,
                index,
                vertex_count,
            });
        }

        log::debug!(
            "Parsed mesh '{}': {} vertices, {} triangles, {} submeshes",
            name,
            vertex_count,
            data.indices.len() / 3,
            submeshes.len()
        );
        Ok(Some(Self {
            name,
            skeleton: node.attribute("skeleton").unwrap_or_default().to_owned(),
            data,
            submeshes,
        }))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the skeleton whose bones `bone_ids` index. Empty if unbound.
    pub fn skeleton(&self) -> &str {
        &self.skeleton
    }

    pub fn data(&self) -> &MeshData {
        &self.data
    }

    pub fn submeshes(&self) -> &[EzmSubMesh] {
        &self.submeshes
    }
}

fn required<'a>(node: Node<'a, '_>, attribute: &str) -> Result<&'a str, FormatError> {
    node.attribute(attribute)
        .ok_or_else(|| FormatError::MissingAttribute {
            element: node.tag_name().name().to_owned(),
            attribute: attribute.to_owned(),
        })
}

fn parse_channels(node: Node<'_, '_>) -> Result<Vec<Channel>, FormatError> {
    let semantics: Vec<&str> = required(node, "semantic")?.split_whitespace().collect();
    let ctypes: Option<Vec<&str>> = node
        .attribute("ctype")
        .map(|c| c.split_whitespace().collect());

    if let Some(ctypes) = &ctypes {
        if ctypes.len() != semantics.len() {
            return Err(FormatError::ComponentCount {
                context: "MeshVertices ctype".to_owned(),
                expected: semantics.len(),
                found: ctypes.len(),
            });
        }
    }

    semantics
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let (semantic, default_width) = Semantic::from_name(name);
            let width = ctypes
                .as_ref()
                .map(|c| c[i].len())
                .or(default_width)
                .ok_or_else(|| FormatError::UnknownSemantic((*name).to_owned()))?;
            Ok(Channel { semantic, width })
        })
        .collect()
}

fn parse_vertices(
    node: Node<'_, '_>,
    mesh: &str,
    out: &mut Vec<SkinnedVertex>,
) -> Result<(), FormatError> {
    let context = format!("Mesh '{mesh}' vertices");
    let count: usize = parse_number(required(node, "count")?, &context)?;
    let channels = parse_channels(node)?;
    let stride: usize = channels.iter().map(|c| c.width).sum();

    let expected = count
        .checked_mul(stride)
        .ok_or_else(|| FormatError::CountTooLarge {
            context: context.clone(),
            count,
        })?;
    let values: Vec<&str> = tokens(node.text().unwrap_or_default()).collect();
    if values.len() != expected {
        return Err(FormatError::ComponentCount {
            context,
            expected,
            found: values.len(),
        });
    }
    if stride == 0 {
        return Ok(());
    }

    out.reserve(values.len() / stride);
    for chunk in values.chunks_exact(stride) {
        let mut vertex = SkinnedVertex::new([0.0; 3], [0.0, 0.0, 1.0], [0.0; 2]);
        let mut offset = 0;
        for channel in &channels {
            let fields = &chunk[offset..offset + channel.width];
            offset += channel.width;
            match channel.semantic {
                Semantic::Position => fill(&mut vertex.position, fields, &context)?,
                Semantic::Normal => fill(&mut vertex.normal, fields, &context)?,
                Semantic::TexCoord => fill(&mut vertex.uv, fields, &context)?,
                Semantic::BlendWeights => fill(&mut vertex.weights, fields, &context)?,
                Semantic::BlendIndices => fill(&mut vertex.bone_ids, fields, &context)?,
                Semantic::Other => {}
            }
        }
        out.push(vertex);
    }
    Ok(())
}

/// Parse as many leading fields as `dst` holds; extra fields are ignored.
fn fill<T: std::str::FromStr>(
    dst: &mut [T],
    fields: &[&str],
    context: &str,
) -> Result<(), FormatError> {
    for (slot, token) in dst.iter_mut().zip(fields) {
        *slot = parse_number(token, context)?;
    }
    Ok(())
}

fn parse_indices(node: Node<'_, '_>, mesh: &str, out: &mut Vec<u32>) -> Result<(), FormatError> {
    let context = format!("Mesh '{mesh}' submesh");
    let start = out.len();
    for token in tokens(node.text().unwrap_or_default()) {
        out.push(parse_number(token, &context)?);
    }
    let found = out.len() - start;
    let expected = match node.attribute("count") {
        Some(count) => {
            let count: usize = parse_number(count, &context)?;
            count
                .checked_mul(3)
                .ok_or_else(|| FormatError::CountTooLarge {
                    context: context.clone(),
                    count,
                })?
        }
        None => found.next_multiple_of(3),
    };
    if found != expected {
        return Err(FormatError::ComponentCount {
            context,
            expected,
            found,
        });
    }
    Ok(())
}
