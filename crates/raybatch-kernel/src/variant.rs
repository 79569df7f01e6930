//! Compile-time kernel configurations.
//!
//! One dispatch/transform/write pipeline serves every variant; a variant
//! only fixes which shape kinds are tested, how many hits a ray keeps and
//! which hit record layout is written.

use crate::hit::{HitRecord, Intersection, SphereHit};
use crate::shape::ShapeKind;

/// A kernel configuration.
pub trait KernelVariant: Send + Sync + 'static {
    /// Human-readable name, used in logs and GPU labels.
    const NAME: &'static str;

    /// Hit records kept per ray.
    const MAX_HITS: usize;

    /// Record layout written to the output buffer.
    type Hit: HitRecord;

    /// Whether shapes of `kind` are tested. Others are skipped.
    fn supports(kind: ShapeKind) -> bool;
}

/// Spheres, planes and triangles; 8 hits per ray with barycentrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct General;

impl KernelVariant for General {
    const NAME: &'static str = "general";
    const MAX_HITS: usize = 8;
    type Hit = Intersection;

    fn supports(_kind: ShapeKind) -> bool {
        true
    }
}

/// Spheres only; 2 hits per ray, no barycentrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpheresOnly;

impl KernelVariant for SpheresOnly {
    const NAME: &'static str = "spheres-only";
    const MAX_HITS: usize = 2;
    type Hit = SphereHit;

    fn supports(kind: ShapeKind) -> bool {
        kind == ShapeKind::Sphere
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_general_supports_everything() {
        assert!(ShapeKind::ALL.iter().all(|&k| General::supports(k)));
        assert_eq!(General::MAX_HITS, 8);
        assert!(<General as KernelVariant>::Hit::STORES_BARYCENTRIC);
    }

    #[test]
    fn test_spheres_only() {
        assert!(SpheresOnly::supports(ShapeKind::Sphere));
        assert!(!SpheresOnly::supports(ShapeKind::Plane));
        assert!(!SpheresOnly::supports(ShapeKind::Triangle));
        assert_eq!(SpheresOnly::MAX_HITS, 2);
        assert!(!<SpheresOnly as KernelVariant>::Hit::STORES_BARYCENTRIC);
    }
}
