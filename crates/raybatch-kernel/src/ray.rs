//! Ray representation.

use bytemuck::{Pod, Zeroable};
use raybatch_math::{point4, vector4, Point3, Vec3};

/// A ray with homogeneous origin (`w = 1`) and direction (`w = 0`).
///
/// The direction is not normalized; hit distances are measured in units of
/// the direction's length.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Ray {
    /// Origin point, `w = 1`.
    pub origin: [f32; 4],
    /// Direction vector, `w = 0`.
    pub direction: [f32; 4],
}

impl Ray {
    /// Create a ray from an origin point and a direction vector.
    pub fn new(origin: Point3, direction: Vec3) -> Self {
        Self {
            origin: point4(&origin),
            direction: vector4(&direction),
        }
    }

    /// Create a ray from raw coordinates.
    pub fn from_coords(ox: f32, oy: f32, oz: f32, dx: f32, dy: f32, dz: f32) -> Self {
        Self::new(Point3::new(ox, oy, oz), Vec3::new(dx, dy, dz))
    }

    /// Origin as a point.
    pub fn origin_point(&self) -> Point3 {
        Point3::new(self.origin[0], self.origin[1], self.origin[2])
    }

    /// Direction as a vector.
    pub fn direction_vec(&self) -> Vec3 {
        Vec3::new(self.direction[0], self.direction[1], self.direction[2])
    }

    /// Evaluate the ray at parameter `t`: `origin + t * direction`.
    #[inline]
    pub fn at(&self, t: f32) -> Point3 {
        self.origin_point() + t * self.direction_vec()
    }
}
