//! GPU device management for raybatch.
//!
//! This crate owns the process-wide wgpu device and queue that compute
//! pipelines in the other raybatch crates are built against.

#![warn(missing_docs)]

mod context;

pub use context::{check_storage_binding, storage_limits, GpuContext, GpuError};
