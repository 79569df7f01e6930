//! Ray-triangle intersection (Möller–Trumbore).

use raybatch_math::EPSILON;

use super::SurfaceHit;
use crate::local::LocalRay;
use crate::shape::TrianglePayload;

/// Intersect a ray with a triangle using its precomputed edges.
///
/// Returns `None` when the ray is parallel to the triangle's plane or the
/// crossing point falls outside the triangle. The hit carries barycentric
/// `(u, v)` relative to `e1` and `e2`. Hits behind the origin are reported.
pub fn intersect_triangle(ray: &LocalRay, tri: &TrianglePayload) -> Option<SurfaceHit> {
    let dir_cross_e2 = ray.direction.cross(&tri.e2);
    let det = tri.e1.dot(&dir_cross_e2);
    if det.abs() < EPSILON {
        return None;
    }

    let f = 1.0 / det;
    let p1_to_origin = ray.origin - tri.p1;
    let u = f * p1_to_origin.dot(&dir_cross_e2);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let origin_cross_e1 = p1_to_origin.cross(&tri.e1);
    let v = f * ray.direction.dot(&origin_cross_e1);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * tri.e2.dot(&origin_cross_e1);
    Some(SurfaceHit::with_barycentric(t, u, v))
}
