//! Ray-plane intersection (closed-form).

use raybatch_math::EPSILON;

use super::SurfaceHit;
use crate::local::LocalRay;

/// Intersect a ray with the plane `y = 0`.
///
/// Returns `None` when the ray is parallel to the plane, including a ray
/// lying in it. Otherwise the hit is reported whatever the sign of `t`.
pub fn intersect_plane(ray: &LocalRay) -> Option<SurfaceHit> {
    if ray.direction.y.abs() < EPSILON {
        return None;
    }

    let t = -ray.origin.y / ray.direction.y;
    Some(SurfaceHit::at(t))
}
