//! Process-wide wgpu device for intersection dispatches.
//!
//! Kernel batches bind three storage buffers (rays, shapes, hit slots) whose
//! size grows with the batch, so the device is requested with the adapter's
//! full storage-binding and buffer-size limits instead of the conservative
//! defaults, and every binding is checked against them before upload.

use std::sync::OnceLock;
use thiserror::Error;
use wgpu::{Device, Limits, Queue};

static GPU_CONTEXT: OnceLock<GpuContext> = OnceLock::new();

/// Errors raised while setting up or feeding the device.
#[derive(Debug, Error)]
pub enum GpuError {
    /// No adapter could be found.
    #[error("no compatible GPU adapter")]
    NoAdapter,

    /// The adapter refused the device request.
    #[error("GPU device request failed: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),

    /// Reading results back failed.
    #[error("hit buffer readback failed")]
    BufferMapping,

    /// [`GpuContext::require`] called before [`GpuContext::init`].
    #[error("GPU context not initialized")]
    NotInitialized,

    /// A storage binding would exceed the device limit.
    #[error("{label} buffer needs {size} bytes, device allows {limit}")]
    BindingTooLarge {
        /// Which input or output buffer.
        label: &'static str,
        /// Requested size in bytes.
        size: u64,
        /// Largest storage binding the device accepts.
        limit: u64,
    },
}

/// Device, queue and the limits they were created with.
pub struct GpuContext {
    /// Device used to build pipelines and buffers.
    pub device: Device,
    /// Queue kernels are submitted on.
    pub queue: Queue,
    /// Limits granted to `device`.
    pub limits: Limits,
    /// Adapter name, for logs.
    pub adapter_name: String,
}

/// Limits to request from an adapter: defaults, raised to whatever the
/// adapter allows for storage bindings and buffer sizes.
pub fn storage_limits(adapter: &Limits) -> Limits {
    Limits {
        max_storage_buffer_binding_size: adapter.max_storage_buffer_binding_size,
        max_buffer_size: adapter.max_buffer_size,
        ..Limits::default()
    }
}

/// Check one storage binding of `size` bytes against `limits`.
pub fn check_storage_binding(
    limits: &Limits,
    label: &'static str,
    size: u64,
) -> Result<(), GpuError> {
    let limit = u64::from(limits.max_storage_buffer_binding_size).min(limits.max_buffer_size);
    if size > limit {
        return Err(GpuError::BindingTooLarge { label, size, limit });
    }
    Ok(())
}

impl GpuContext {
    /// Create the shared context, or return it if it already exists.
    ///
    /// Concurrent callers may each open a device; the first one stored wins
    /// and the others are dropped.
    pub async fn init() -> Result<&'static Self, GpuError> {
        if let Some(ctx) = GPU_CONTEXT.get() {
            return Ok(ctx);
        }

        let ctx = Self::open().await?;
        // Losing a race is fine, the stored context is equivalent.
        let _ = GPU_CONTEXT.set(ctx);
        GPU_CONTEXT.get().ok_or(GpuError::NotInitialized)
    }

    async fn open() -> Result<Self, GpuError> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        let info = adapter.get_info();
        let limits = storage_limits(&adapter.limits());
        log::info!(
            "raybatch using {} ({:?}), max storage binding {} bytes",
            info.name,
            info.backend,
            limits.max_storage_buffer_binding_size,
        );

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("raybatch"),
                    required_limits: limits.clone(),
                    ..Default::default()
                },
                None,
            )
            .await?;

        Ok(Self {
            device,
            queue,
            limits,
            adapter_name: info.name,
        })
    }

    /// The shared context, if [`GpuContext::init`] has completed.
    pub fn get() -> Option<&'static Self> {
        GPU_CONTEXT.get()
    }

    /// The shared context, or [`GpuError::NotInitialized`].
    pub fn require() -> Result<&'static Self, GpuError> {
        GPU_CONTEXT.get().ok_or(GpuError::NotInitialized)
    }

    /// Blocking [`GpuContext::init`] (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn init_blocking() -> Result<&'static Self, GpuError> {
        pollster::block_on(Self::init())
    }

    /// Check a storage binding of `size` bytes against this device.
    pub fn check_storage_binding(&self, label: &'static str, size: u64) -> Result<(), GpuError> {
        check_storage_binding(&self.limits, label, size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_limits() -> Limits {
        Limits {
            max_storage_buffer_binding_size: 1024,
            max_buffer_size: 4096,
            ..Limits::default()
        }
    }

    #[test]
    fn test_storage_limits_follow_adapter() {
        let adapter = Limits {
            max_storage_buffer_binding_size: 1 << 30,
            max_buffer_size: 1 << 32,
            ..Limits::default()
        };
        let limits = storage_limits(&adapter);
        assert_eq!(limits.max_storage_buffer_binding_size, 1 << 30);
        assert_eq!(limits.max_buffer_size, 1 << 32);
        assert_eq!(
            limits.max_compute_workgroup_size_x,
            Limits::default().max_compute_workgroup_size_x
        );
    }

    #[test]
    fn test_binding_at_limit_fits() {
        assert!(check_storage_binding(&small_limits(), "hits", 1024).is_ok());
    }

    #[test]
    fn test_binding_over_limit_rejected() {
        let err = check_storage_binding(&small_limits(), "shapes", 1025).unwrap_err();
        assert!(matches!(
            err,
            GpuError::BindingTooLarge {
                label: "shapes",
                size: 1025,
                limit: 1024,
            }
        ));
        assert_eq!(err.to_string(), "shapes buffer needs 1025 bytes, device allows 1024");
    }

    #[test]
    fn test_binding_capped_by_buffer_size() {
        let limits = Limits {
            max_storage_buffer_binding_size: 8192,
            max_buffer_size: 2048,
            ..Limits::default()
        };
        assert!(check_storage_binding(&limits, "rays", 4096).is_err());
    }

    #[test]
    fn test_require_matches_get() {
        // Another test in this binary may have initialized the context.
        assert_eq!(GpuContext::require().is_ok(), GpuContext::get().is_some());
    }

    #[test]
    #[ignore = "requires GPU"]
    fn test_concurrent_init_shares_one_context() {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                std::thread::spawn(|| {
                    GpuContext::init_blocking().map(|ctx| ctx as *const GpuContext as usize)
                })
            })
            .collect();
        let ptrs: Vec<usize> = handles
            .into_iter()
            .map(|h| h.join().unwrap().unwrap())
            .collect();
        assert!(ptrs.windows(2).all(|w| w[0] == w[1]));
    }
}
