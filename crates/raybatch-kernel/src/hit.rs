//! Hit records written by the kernel.
//!
//! Two record layouts exist: [`Intersection`] carries barycentric
//! coordinates, [`SphereHit`] does not. Which one a kernel writes is chosen
//! by its [`KernelVariant`](crate::KernelVariant).

use bytemuck::{Pod, Zeroable};
use std::fmt::Debug;

use crate::intersect::SurfaceHit;

/// Shape id marking an unused hit slot.
///
/// The kernel never writes it; hosts pre-fill output buffers with it so the
/// valid prefix of each ray's slots can be recovered.
pub const NO_SHAPE: u32 = u32::MAX;

/// Barycentric value stored for sphere and plane hits.
pub const NO_BARYCENTRIC: f32 = -1.0;

/// A fixed-layout hit record.
pub trait HitRecord: Pod + Send + Sync + Debug + PartialEq {
    /// An unused slot (`shape_id == NO_SHAPE`).
    const EMPTY: Self;

    /// Whether the record has room for barycentric coordinates.
    const STORES_BARYCENTRIC: bool;

    /// Build a record for an accepted candidate.
    fn from_surface(shape_id: u32, hit: &SurfaceHit) -> Self;

    /// Id of the shape that was hit.
    fn shape_id(&self) -> u32;

    /// Distance along the ray, in units of the ray direction.
    fn t(&self) -> f32;

    /// Barycentric `(u, v)` when stored and meaningful.
    fn barycentric(&self) -> Option<[f32; 2]> {
        None
    }

    /// True for a slot the kernel has not written.
    fn is_empty(&self) -> bool {
        self.shape_id() == NO_SHAPE
    }
}

/// Hit record with barycentric coordinates (16 bytes).
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Intersection {
    /// Id of the shape that was hit.
    pub shape_id: u32,
    /// Distance along the ray.
    pub t: f32,
    /// Barycentric `u`, [`NO_BARYCENTRIC`] for non-triangles.
    pub u: f32,
    /// Barycentric `v`, [`NO_BARYCENTRIC`] for non-triangles.
    pub v: f32,
}

impl HitRecord for Intersection {
    const EMPTY: Self = Self {
        shape_id: NO_SHAPE,
        t: 0.0,
        u: NO_BARYCENTRIC,
        v: NO_BARYCENTRIC,
    };

    const STORES_BARYCENTRIC: bool = true;

    fn from_surface(shape_id: u32, hit: &SurfaceHit) -> Self {
        let [u, v] = hit.barycentric.unwrap_or([NO_BARYCENTRIC, NO_BARYCENTRIC]);
        Self { shape_id, t: hit.t, u, v }
    }

    fn shape_id(&self) -> u32 {
        self.shape_id
    }

    fn t(&self) -> f32 {
        self.t
    }

    fn barycentric(&self) -> Option<[f32; 2]> {
        // Barycentrics are never negative for a written triangle hit.
        (self.u >= 0.0 && self.v >= 0.0).then_some([self.u, self.v])
    }
}

/// Hit record without barycentric coordinates (8 bytes).
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct SphereHit {
    /// Id of the shape that was hit.
    pub shape_id: u32,
    /// Distance along the ray.
    pub t: f32,
}

impl HitRecord for SphereHit {
    const EMPTY: Self = Self {
        shape_id: NO_SHAPE,
        t: 0.0,
    };

    const STORES_BARYCENTRIC: bool = false;

    fn from_surface(shape_id: u32, hit: &SurfaceHit) -> Self {
        Self { shape_id, t: hit.t }
    }

    fn shape_id(&self) -> u32 {
        self.shape_id
    }

    fn t(&self) -> f32 {
        self.t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_sizes() {
        assert_eq!(std::mem::size_of::<Intersection>(), 16);
        assert_eq!(std::mem::size_of::<SphereHit>(), 8);
    }

    #[test]
    fn test_sentinel_for_untextured_hits() {
        let hit = Intersection::from_surface(3, &SurfaceHit::at(2.0));
        assert_eq!(hit.u, NO_BARYCENTRIC);
        assert_eq!(hit.v, NO_BARYCENTRIC);
        assert_eq!(hit.barycentric(), None);
        assert!(!hit.is_empty());
    }

    #[test]
    fn test_barycentric_kept() {
        let hit = Intersection::from_surface(3, &SurfaceHit::with_barycentric(1.0, 0.25, 0.5));
        assert_eq!(hit.barycentric(), Some([0.25, 0.5]));
    }

    #[test]
    fn test_sphere_hit_drops_barycentric() {
        let hit = SphereHit::from_surface(5, &SurfaceHit::with_barycentric(1.5, 0.25, 0.5));
        assert_eq!(hit, SphereHit { shape_id: 5, t: 1.5 });
        assert!(SphereHit::EMPTY.is_empty());
    }
}
