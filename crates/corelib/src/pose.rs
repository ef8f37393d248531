//! Pose compositor: parent-to-child matrix composition over a [`Skeleton`].

use crate::Mat4;
use crate::skeleton::{BoneId, BoneNode, Skeleton};
use crate::uniform::UniformSink;

/// Walk the tree pre-order from the root, writing
/// `world = accumulated * local(node)` for every bone into `out[id]`.
pub(crate) fn compose_pre_order(
    skeleton: &Skeleton,
    local: impl Fn(&BoneNode) -> Mat4,
    out: &mut Vec<Mat4>,
) {
    out.clear();
    out.resize(skeleton.len(), Mat4::IDENTITY);

    let mut stack: Vec<(BoneId, Mat4)> = vec![(skeleton.root(), Mat4::IDENTITY)];
    while let Some((id, accumulated)) = stack.pop() {
        let node = skeleton.node(id);
        let world = accumulated * local(node);
        out[id.index()] = world;
        // Reversed so the first declared child is visited first.
        stack.extend(node.children().iter().rev().map(|&child| (child, world)));
    }
}

/// World transforms for every bone of one skeleton, indexed by [`BoneId`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Pose {
    world: Vec<Mat4>,
}

impl Pose {
    /// Compose the skeleton's current local transforms.
    pub fn compute(skeleton: &Skeleton) -> Self {
        let mut pose = Self::default();
        pose.recompute(skeleton);
        pose
    }

    /// Same as [`Pose::compute`] but reuses this pose's storage.
    pub fn recompute(&mut self, skeleton: &Skeleton) {
        compose_pre_order(skeleton, BoneNode::local_transform, &mut self.world);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.world.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.world.is_empty()
    }

    #[inline]
    pub fn world(&self, id: BoneId) -> Mat4 {
        self.world[id.index()]
    }

    pub fn world_of(&self, skeleton: &Skeleton, name: &str) -> Option<Mat4> {
        skeleton.find(name).map(|id| self.world(id))
    }

    pub fn world_transforms(&self) -> &[Mat4] {
        &self.world
    }

    /// Skinning matrices: `world * inverse_bind` per bone.
    pub fn bone_palette(&self, skeleton: &Skeleton) -> Vec<Mat4> {
        let mut palette = Vec::with_capacity(self.world.len());
        self.write_palette(skeleton, &mut palette);
        palette
    }

    pub fn write_palette(&self, skeleton: &Skeleton, out: &mut Vec<Mat4>) {
        out.clear();
        out.extend(
            self.world
                .iter()
                .zip(skeleton.inverse_bind_matrices())
                .map(|(world, inverse_bind)| *world * *inverse_bind),
        );
    }

    /// Push the bone palette to `sink` under the uniform `name`.
    pub fn upload(&self, skeleton: &Skeleton, sink: &mut impl UniformSink, name: &str) {
        let palette = self.bone_palette(skeleton);
        sink.set_matrix_array(name, &palette);
    }
}
