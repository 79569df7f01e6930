//! Dispatch settings.

use serde::{Deserialize, Serialize};

use crate::error::{KernelError, Result};

/// Largest workgroup the default wgpu limits allow.
pub const MAX_WORKGROUP_SIZE: u32 = 256;

/// How a batch is scheduled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchSettings {
    /// Invocations per workgroup. The grid is rounded up to a multiple of
    /// this, so up to `workgroup_size - 1` padding invocations run.
    pub workgroup_size: u32,
    /// Run CPU batches on the rayon pool instead of the calling thread.
    pub parallel: bool,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            workgroup_size: 64,
            parallel: true,
        }
    }
}

impl DispatchSettings {
    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if self.workgroup_size == 0 || self.workgroup_size > MAX_WORKGROUP_SIZE {
            return Err(KernelError::InvalidSettings(format!(
                "workgroup_size must be between 1 and {MAX_WORKGROUP_SIZE}"
            )));
        }
        Ok(())
    }

    /// Workgroups needed to cover `ray_count` rays.
    pub fn workgroups(&self, ray_count: usize) -> usize {
        ray_count.div_ceil(self.workgroup_size.max(1) as usize)
    }

    /// Total invocations scheduled for `ray_count` rays, padding included.
    pub fn invocations(&self, ray_count: usize) -> usize {
        self.workgroups(ray_count).saturating_mul(self.workgroup_size.max(1) as usize)
    }

    /// One-dimensional device dispatch size for `ray_count` rays, checked
    /// against the device's per-dimension workgroup limit.
    pub fn dispatch_workgroups(&self, ray_count: usize, max_per_dimension: u32) -> Result<u32> {
        u32::try_from(self.workgroups(ray_count))
            .ok()
            .filter(|&n| n <= max_per_dimension)
            .ok_or(KernelError::BatchTooLarge {
                rays: ray_count,
                limit: max_per_dimension as usize * self.workgroup_size.max(1) as usize,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(DispatchSettings::default().validate().is_ok());
    }

    #[test]
    fn test_reject_bad_workgroup_size() {
        let zero = DispatchSettings {
            workgroup_size: 0,
            ..Default::default()
        };
        assert!(matches!(zero.validate(), Err(KernelError::InvalidSettings(_))));

        let huge = DispatchSettings {
            workgroup_size: 1024,
            ..Default::default()
        };
        assert!(huge.validate().is_err());
    }

    #[test]
    fn test_grid_rounding() {
        let settings = DispatchSettings::default();
        assert_eq!(settings.workgroups(0), 0);
        assert_eq!(settings.workgroups(1), 1);
        assert_eq!(settings.workgroups(64), 1);
        assert_eq!(settings.workgroups(65), 2);
        assert_eq!(settings.invocations(65), 128);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_grid_covers_batches_past_u32() {
        let settings = DispatchSettings {
            workgroup_size: 1,
            parallel: false,
        };
        let rays = u32::MAX as usize + 2;
        assert_eq!(settings.workgroups(rays), rays);
        assert_eq!(settings.invocations(rays), rays);
        assert!(matches!(
            settings.dispatch_workgroups(rays, u32::MAX),
            Err(KernelError::BatchTooLarge { .. })
        ));
    }

    #[test]
    fn test_dispatch_respects_device_limit() {
        let settings = DispatchSettings::default();
        assert_eq!(settings.dispatch_workgroups(65_535 * 64, 65_535).unwrap(), 65_535);
        let err = settings.dispatch_workgroups(65_535 * 64 + 1, 65_535).unwrap_err();
        assert!(matches!(
            err,
            KernelError::BatchTooLarge {
                rays: 4_194_241,
                limit: 4_194_240,
            }
        ));
    }

    #[test]
    fn test_settings_from_json() {
        let settings: DispatchSettings = serde_json::from_str(r#"{"workgroup_size": 32}"#).unwrap();
        assert_eq!(settings.workgroup_size, 32);
        assert!(settings.parallel);
    }
}
