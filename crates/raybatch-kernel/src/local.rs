//! World to object space transform of a ray.

use raybatch_math::{Point3, Transform, Vec3, Vec4};

use crate::Ray;

/// A ray expressed in a shape's object space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalRay {
    /// Object-space origin.
    pub origin: Point3,
    /// Object-space direction (not renormalized).
    pub direction: Vec3,
}

/// Transform `ray` by a shape's column-major inverse transform.
///
/// Both components go through the same 4x4 multiply; the homogeneous `w`
/// (1 for the origin, 0 for the direction) decides whether translation
/// applies. No inversion or singularity check happens here.
#[inline]
pub fn to_object_space(ray: &Ray, inverse: &[f32; 16]) -> LocalRay {
    let inverse = Transform::from_cols_array(inverse);
    let o = inverse.apply_homogeneous(&Vec4::from(ray.origin));
    let d = inverse.apply_homogeneous(&Vec4::from(ray.direction));
    LocalRay {
        origin: Point3::new(o.x, o.y, o.z),
        direction: Vec3::new(d.x, d.y, d.z),
    }
}
