//! Error types for the host-side API.
//!
//! The per-ray kernel path never fails; these errors come from building
//! shapes and scenes, validating settings and driving the GPU.

use thiserror::Error;

/// Errors that can occur around a kernel run.
#[derive(Error, Debug)]
pub enum KernelError {
    /// The id is reserved as the empty-slot marker.
    #[error("shape id {0} is reserved for empty hit slots")]
    ReservedShapeId(u32),

    /// Two shapes in one scene share an id.
    #[error("duplicate shape id {0}")]
    DuplicateShapeId(u32),

    /// A shape's transform has no inverse.
    #[error("transform of shape {0} is not invertible")]
    SingularTransform(u32),

    /// Invalid dispatch settings.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// Output buffer cannot hold `ray_count * MAX_HITS` records.
    #[error("output buffer too small: need {needed} slots, got {actual}")]
    OutputTooSmall {
        /// Slots required.
        needed: usize,
        /// Slots provided.
        actual: usize,
    },

    /// A device dispatch cannot cover the batch.
    #[error("batch of {rays} rays exceeds the dispatch limit of {limit} rays")]
    BatchTooLarge {
        /// Rays in the batch.
        rays: usize,
        /// Most rays one dispatch can cover.
        limit: usize,
    },

    /// GPU backend failure.
    #[cfg(feature = "gpu")]
    #[error("gpu: {0}")]
    Gpu(#[from] raybatch_gpu::GpuError),
}

/// Result type for kernel operations.
pub type Result<T> = std::result::Result<T, KernelError>;
