//! Vertex/index buffers for one drawable.

use std::ops::Range;

use asset::mesh::MeshData;
use wgpu::{Buffer, BufferUsages, Device, IndexFormat, RenderPass, util::DeviceExt};

use crate::vertex::{GpuSkinnedVertex, LineVertex};

pub struct MeshBuffers {
    vertex_buf: Buffer,
    index_buf: Option<Buffer>,
    vertex_count: u32,
    index_count: u32,
}

impl MeshBuffers {
    /// Upload an indexed skinned mesh.
    pub fn from_mesh(device: &Device, label: &str, mesh: &MeshData) -> Self {
        let vertices = gpu_vertices(mesh);
        let vertex_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} VB")),
            contents: bytemuck::cast_slice(&vertices),
            usage: BufferUsages::VERTEX,
        });
        let index_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} IB")),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: BufferUsages::INDEX,
        });
        log::debug!(
            "Uploaded mesh '{}': {} vertices, {} indices",
            label,
            vertices.len(),
            mesh.indices.len()
        );
        Self {
            vertex_buf,
            index_buf: Some(index_buf),
            vertex_count: vertices.len() as u32,
            index_count: mesh.indices.len() as u32,
        }
    }

    /// Upload a non-indexed line list.
    pub fn from_lines(device: &Device, label: &str, lines: &[LineVertex]) -> Self {
        let vertex_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} VB")),
            contents: bytemuck::cast_slice(lines),
            usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
        });
        Self {
            vertex_buf,
            index_buf: None,
            vertex_count: lines.len() as u32,
            index_count: 0,
        }
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    /// Draw everything. The pipeline and bind groups must already be set.
    pub fn draw(&self, rpass: &mut RenderPass<'_>) {
        match &self.index_buf {
            Some(_) => self.draw_indexed_range(rpass, 0..self.index_count),
            None => {
                rpass.set_vertex_buffer(0, self.vertex_buf.slice(..));
                rpass.draw(0..self.vertex_count, 0..1);
            }
        }
    }

    /// Draw one submesh, given its range into the mesh's indices.
    pub fn draw_submesh(&self, rpass: &mut RenderPass<'_>, index_range: Range<usize>) {
        match submesh_indices(index_range.clone(), self.index_count) {
            Some(indices) => self.draw_indexed_range(rpass, indices),
            None => log::warn!(
                "Submesh range {:?} outside {} indices",
                index_range,
                self.index_count
            ),
        }
    }

    fn draw_indexed_range(&self, rpass: &mut RenderPass<'_>, indices: Range<u32>) {
        let Some(index_buf) = &self.index_buf else {
            log::warn!("Indexed draw requested on a non-indexed buffer");
            return;
        };
        rpass.set_vertex_buffer(0, self.vertex_buf.slice(..));
        rpass.set_index_buffer(index_buf.slice(..), IndexFormat::Uint32);
        rpass.draw_indexed(indices, 0, 0..1);
    }
}

fn gpu_vertices(mesh: &MeshData) -> Vec<GpuSkinnedVertex> {
    mesh.vertices.iter().copied().map(GpuSkinnedVertex::from).collect()
}

/// Index range for `draw_indexed`, or `None` if it leaves the buffer.
fn submesh_indices(range: Range<usize>, index_count: u32) -> Option<Range<u32>> {
    let start = u32::try_from(range.start).ok()?;
    let end = u32::try_from(range.end).ok()?;
    (start <= end && end <= index_count).then_some(start..end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use asset::mesh::SkinnedVertex;

    #[test]
    fn submesh_range_within_buffer() {
        assert_eq!(submesh_indices(3..9, 9), Some(3..9));
        assert_eq!(submesh_indices(0..0, 0), Some(0..0));
    }

    #[test]
    fn submesh_range_past_buffer_is_rejected() {
        assert_eq!(submesh_indices(6..12, 9), None);
        assert_eq!(submesh_indices(0..usize::MAX, u32::MAX), None);
    }

    #[test]
    fn mesh_vertices_keep_order_and_skinning() {
        let mut v = SkinnedVertex::new([1.0, 2.0, 3.0], [0.0, 1.0, 0.0], [0.5, 0.5]);
        v.bone_ids = [2, 1, 0, 0];
        let mesh = MeshData::new(vec![SkinnedVertex::default(), v], vec![0, 1, 1]);
        let gpu = gpu_vertices(&mesh);
        assert_eq!(gpu.len(), 2);
        assert_eq!(gpu[1], GpuSkinnedVertex::from(v));
    }
}
