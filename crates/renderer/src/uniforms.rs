//! Uniform buffers fed by the pose compositor.

use std::collections::HashMap;
use std::num::NonZeroU64;

use glam::Mat4;
use wgpu::{
    BindGroupLayoutEntry, BindingType, Buffer, BufferBindingType, BufferUsages, Device, Queue,
    ShaderStages, util::DeviceExt,
};

use corelib::UniformSink;

/// Bones a palette buffer holds by default.
pub const MAX_BONES: usize = 64;

/// Bytes per matrix in a uniform array.
pub const MATRIX_SIZE: u64 = std::mem::size_of::<[f32; 16]>() as u64;

/// Column-major matrices ready for `bytemuck::cast_slice`, capped to what
/// fits in `capacity_bytes`.
pub fn matrix_columns(values: &[Mat4], capacity_bytes: u64) -> Vec<[f32; 16]> {
    let fits = (capacity_bytes / MATRIX_SIZE) as usize;
    if values.len() > fits {
        log::warn!(
            "Matrix array of {} truncated to {} to fit its uniform buffer",
            values.len(),
            fits
        );
    }
    values.iter().take(fits).map(Mat4::to_cols_array).collect()
}

/// Uniform buffer holding one skinning matrix per bone.
pub struct BonePaletteBuffer {
    buffer: Buffer,
    capacity: usize,
}

impl BonePaletteBuffer {
    /// Buffer for `capacity` bones, initialised to identity.
    pub fn new(device: &Device, capacity: usize) -> Self {
        let identity = vec![Mat4::IDENTITY.to_cols_array(); capacity.max(1)];
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Bone Palette UBO"),
            contents: bytemuck::cast_slice(&identity),
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
        });
        Self {
            buffer,
            capacity: capacity.max(1),
        }
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn write(&self, queue: &Queue, palette: &[Mat4]) {
        let columns = matrix_columns(palette, self.buffer.size());
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&columns));
    }

    /// Bind group layout entry for a vertex-stage palette at `binding`.
    pub fn layout_entry(&self, binding: u32) -> BindGroupLayoutEntry {
        BindGroupLayoutEntry {
            binding,
            visibility: ShaderStages::VERTEX,
            ty: BindingType::Buffer {
                ty: BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: NonZeroU64::new(self.buffer.size()),
            },
            count: None,
        }
    }
}

/// Routes named matrix uniforms to GPU buffers.
pub struct UniformTable<'a> {
    queue: &'a Queue,
    slots: HashMap<String, &'a Buffer>,
}

impl<'a> UniformTable<'a> {
    pub fn new(queue: &'a Queue) -> Self {
        Self {
            queue,
            slots: HashMap::new(),
        }
    }

    pub fn bind(&mut self, name: impl Into<String>, buffer: &'a Buffer) -> &mut Self {
        self.slots.insert(name.into(), buffer);
        self
    }

    pub fn bind_palette(
        &mut self,
        name: impl Into<String>,
        palette: &'a BonePaletteBuffer,
    ) -> &mut Self {
        self.bind(name, palette.buffer())
    }

    fn write(&self, name: &str, values: &[Mat4]) {
        match self.slots.get(name) {
            Some(buffer) => {
                let columns = matrix_columns(values, buffer.size());
                self.queue
                    .write_buffer(buffer, 0, bytemuck::cast_slice(&columns));
            }
            None => log::warn!("No uniform buffer bound for '{name}'"),
        }
    }
}

impl UniformSink for UniformTable<'_> {
    fn set_matrix(&mut self, name: &str, value: &Mat4) {
        self.write(name, std::slice::from_ref(value));
    }

    fn set_matrix_array(&mut self, name: &str, values: &[Mat4]) {
        self.write(name, values);
    }
}
