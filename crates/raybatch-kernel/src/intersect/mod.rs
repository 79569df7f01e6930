//! Ray-shape intersection algorithms.
//!
//! Each intersector works on a [`LocalRay`](crate::local::LocalRay) in the shape's canonical object
//! space and reports candidates in intra-shape order. Acceptance policy is
//! per kind: the sphere drops roots at `t <= 0`, the plane and triangle
//! report hits behind the origin too.

mod plane;
mod sphere;
mod triangle;

pub use plane::intersect_plane;
pub use sphere::intersect_sphere;
pub use triangle::intersect_triangle;

use crate::hit::HitRecord;
use crate::local::to_object_space;
use crate::shape::{Shape, ShapeKind};
use crate::writer::HitWriter;
use crate::Ray;

/// An accepted candidate, before it becomes a hit record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    /// Parameter along the ray.
    pub t: f32,
    /// Barycentric `(u, v)` for triangle hits.
    pub barycentric: Option<[f32; 2]>,
}

impl SurfaceHit {
    /// A hit with no barycentric meaning.
    pub fn at(t: f32) -> Self {
        Self {
            t,
            barycentric: None,
        }
    }

    /// A triangle hit.
    pub fn with_barycentric(t: f32, u: f32, v: f32) -> Self {
        Self {
            t,
            barycentric: Some([u, v]),
        }
    }
}

/// Test one world-space ray against one shape of a known kind, appending
/// accepted candidates to `writer`.
///
/// This is the transformer, intersector and writer stages for a single
/// (ray, shape) pair.
pub fn intersect_shape<H: HitRecord>(
    ray: &Ray,
    shape: &Shape,
    kind: ShapeKind,
    writer: &mut HitWriter<'_, H>,
) {
    let local = to_object_space(ray, &shape.inverse);
    match kind {
        ShapeKind::Sphere => {
            for hit in intersect_sphere(&local).into_iter().flatten() {
                writer.push(H::from_surface(shape.id, &hit));
            }
        }
        ShapeKind::Plane => {
            if let Some(hit) = intersect_plane(&local) {
                writer.push(H::from_surface(shape.id, &hit));
            }
        }
        ShapeKind::Triangle => {
            if let Some(hit) = intersect_triangle(&local, &shape.triangle_payload()) {
                writer.push(H::from_surface(shape.id, &hit));
            }
        }
    }
}

