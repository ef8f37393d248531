use corelib::transform::Transform;
use corelib::{BoneDefinition, HierarchyResult, Mat4, Quat, Skeleton, Vec3};
use roxmltree::Node;

use super::{is_tag, parse_fixed};
use crate::error::FormatError;

/// Parse a `<Bone>` element.
///
/// The rest pose comes from `matrix` (16 floats, column-major) when present,
/// otherwise from `position`, `orientation` (quaternion `x y z w`) and
/// `scale`. Parent names are kept as written; they are resolved when the
/// skeleton is built.
pub fn parse_bone(node: Node<'_, '_>) -> Result<Option<BoneDefinition>, FormatError> {
    if !is_tag(node, "Bone") {
        return Ok(None);
    }
    let name = node.attribute("name").unwrap_or_default();
    let context = |attribute: &str| format!("Bone '{name}' {attribute}");

    let offset = match node.attribute("matrix") {
        Some(text) => Mat4::from_cols_array(&parse_fixed::<16>(text, &context("matrix"))?),
        None => {
            let mut t = Transform::identity();
            if let Some(text) = node.attribute("position") {
                t.translation = Vec3::from_array(parse_fixed::<3>(text, &context("position"))?);
            }
            if let Some(text) = node.attribute("orientation") {
                let [x, y, z, w] = parse_fixed::<4>(text, &context("orientation"))?;
                t.rotation = Quat::from_xyzw(x, y, z, w);
            }
            if let Some(text) = node.attribute("scale") {
                t.scale = Vec3::from_array(parse_fixed::<3>(text, &context("scale"))?);
            }
            t.matrix()
        }
    };

    Ok(Some(BoneDefinition::new(
        name,
        offset,
        node.attribute("parent").map(str::to_owned),
    )))
}

/// Bones of one `<Skeleton>` element, in declaration order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EzmSkeleton {
    name: String,
    bones: Vec<BoneDefinition>,
}

impl EzmSkeleton {
    pub const TAG: &'static str = "Skeleton";

    pub fn parse(node: Node<'_, '_>) -> Result<Option<Self>, FormatError> {
        if !is_tag(node, Self::TAG) {
            return Ok(None);
        }
        let mut bones = Vec::new();
        for child in node.children() {
            match parse_bone(child)? {
                Some(bone) => bones.push(bone),
                None if child.is_element() => {
                    log::trace!("Skipping <{}> inside skeleton", child.tag_name().name());
                }
                None => {}
            }
        }
        Ok(Some(Self {
            name: node.attribute("name").unwrap_or_default().to_owned(),
            bones,
        }))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bones(&self) -> &[BoneDefinition] {
        &self.bones
    }

    /// Resolve parent names into a bone tree.
    pub fn build(&self) -> HierarchyResult<Skeleton> {
        Skeleton::build(&self.bones)
    }
}
