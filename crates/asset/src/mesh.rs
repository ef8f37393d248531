//! CPU-side skinned mesh representation used by loaders.

/// Bone influences per vertex.
pub const MAX_INFLUENCES: usize = 4;

/// Vertex with position/normal/uv and up to four bone influences.
/// Values are in mesh (bind pose) space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SkinnedVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    /// Indices into the bound skeleton's bones, declaration order.
    pub bone_ids: [u16; MAX_INFLUENCES],
    pub weights: [f32; MAX_INFLUENCES],
}

impl SkinnedVertex {
    /// Unskinned vertex: fully bound to bone 0.
    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
            bone_ids: [0; MAX_INFLUENCES],
            weights: [1.0, 0.0, 0.0, 0.0],
        }
    }

    /// Bone ids carrying a non-zero weight.
    pub fn influences(&self) -> impl Iterator<Item = (u16, f32)> + '_ {
        self.bone_ids
            .iter()
            .copied()
            .zip(self.weights.iter().copied())
            .filter(|&(_, w)| w != 0.0)
    }
}

/// Indexed triangle mesh with tightly-packed vertices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<SkinnedVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new(vertices: Vec<SkinnedVertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Returns `true` if both vertex and index buffers are non-empty.
    pub fn is_valid(&self) -> bool {
        !self.vertices.is_empty() && !self.indices.is_empty()
    }

    /// Highest bone id in any slot, weighted or not. Every slot is uploaded,
    /// so every slot must index a real bone.
    pub fn max_bone_id(&self) -> Option<u16> {
        self.vertices
            .iter()
            .flat_map(|v| v.bone_ids.iter().copied())
            .max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mesh_data_validity() {
        let data = MeshData::new(vec![SkinnedVertex::default()], vec![0]);
        assert!(data.is_valid());
        assert!(!MeshData::default().is_valid());
    }

    #[test]
    fn zero_weights_are_not_influences_but_still_bound() {
        let mut v = SkinnedVertex::new([0.0; 3], [0.0, 0.0, 1.0], [0.0; 2]);
        v.bone_ids = [3, 7, 9, 0];
        v.weights = [0.5, 0.5, 0.0, 0.0];
        let data = MeshData::new(vec![v], vec![0]);
        assert_eq!(v.influences().count(), 2);
        assert_eq!(data.max_bone_id(), Some(9));
    }
}
