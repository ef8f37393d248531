//! Renderer-side seam for skinned meshes: GPU vertex formats, drawable
//! buffers, uniform writes and bone debug lines.
//! wgpu = 23.x

pub mod buffers;
pub mod lines;
pub mod uniforms;
pub mod vertex;

pub use buffers::MeshBuffers;
pub use lines::skeleton_lines;
pub use uniforms::{BonePaletteBuffer, MAX_BONES, UniformTable};
pub use vertex::{GpuSkinnedVertex, LINE_ATTRIBUTES, LineVertex, SKINNED_ATTRIBUTES};
