//! GPU execution of the intersection kernel using wgpu compute shaders.
//!
//! The WGSL kernel mirrors the CPU path one to one: one invocation per ray,
//! the same intersectors, the same bounded writer. The variant's constants
//! and hit layout are baked into the shader source at pipeline creation.

mod pipeline;
pub mod shaders;

pub use pipeline::{GpuParams, IntersectPipeline};

#[cfg(not(target_arch = "wasm32"))]
pub use pipeline::execute_blocking;
