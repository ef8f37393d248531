//! GPU vertex formats and their shader attribute locations.

use asset::mesh::SkinnedVertex;
use bytemuck::{Pod, Zeroable};
use wgpu::{VertexBufferLayout, VertexStepMode};

/// Skinned vertex as uploaded: bone ids widened to `u32` for `Uint32x4`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct GpuSkinnedVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub bone_ids: [u32; 4],
    pub weights: [f32; 4],
}

impl GpuSkinnedVertex {
    pub const LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
        array_stride: std::mem::size_of::<GpuSkinnedVertex>() as u64,
        step_mode: VertexStepMode::Vertex,
        attributes: &wgpu::vertex_attr_array![
            0 => Float32x3,
            1 => Float32x3,
            2 => Float32x2,
            3 => Uint32x4,
            4 => Float32x4
        ],
    };
}

/// Shader input name to location for [`GpuSkinnedVertex::LAYOUT`].
pub const SKINNED_ATTRIBUTES: [(&str, u32); 5] = [
    ("inPosition", 0),
    ("inNormal", 1),
    ("inTexCoord", 2),
    ("inBoneIDs", 3),
    ("inWeights", 4),
];

impl From<SkinnedVertex> for GpuSkinnedVertex {
    fn from(v: SkinnedVertex) -> Self {
        Self {
            position: v.position,
            normal: v.normal,
            uv: v.uv,
            bone_ids: v.bone_ids.map(u32::from),
            weights: v.weights,
        }
    }
}

/// Vertex: position + color. Used for bone lines.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub pos: [f32; 3],
    pub color: [f32; 3],
}

impl LineVertex {
    pub const LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
        array_stride: std::mem::size_of::<LineVertex>() as u64,
        step_mode: VertexStepMode::Vertex,
        attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3],
    };
}

/// Shader input name to location for [`LineVertex::LAYOUT`].
pub const LINE_ATTRIBUTES: [(&str, u32); 2] = [("inPosition", 0), ("inColor", 1)];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layouts_are_tightly_packed() {
        assert_eq!(GpuSkinnedVertex::LAYOUT.array_stride, 64);
        assert_eq!(GpuSkinnedVertex::LAYOUT.attributes.len(), SKINNED_ATTRIBUTES.len());
        assert_eq!(LineVertex::LAYOUT.array_stride, 24);
        assert_eq!(LineVertex::LAYOUT.attributes[1].offset, 12);
    }

    #[test]
    fn bone_ids_widen_on_conversion() {
        let mut v = SkinnedVertex::new([1.0, 2.0, 3.0], [0.0, 1.0, 0.0], [0.5, 0.5]);
        v.bone_ids = [1, 2, 3, u16::MAX];
        let gpu = GpuSkinnedVertex::from(v);
        assert_eq!(gpu.bone_ids, [1, 2, 3, 65535]);
        assert_eq!(gpu.position, [1.0, 2.0, 3.0]);
        assert_eq!(bytemuck::bytes_of(&gpu).len(), 64);
    }
}
