//! Shape records consumed by the kernel.
//!
//! A [`Shape`] is a flat, GPU-compatible tagged union: a raw `kind`
//! discriminant, the world-to-object inverse transform and a fixed payload
//! whose meaning depends on the kind. The kernel decodes `kind` into
//! [`ShapeKind`] and matches on it; unknown discriminants are skipped.

use bytemuck::{Pod, Zeroable};
use raybatch_math::{Point3, Transform, Vec3};

use crate::error::{KernelError, Result};

/// Number of `vec4` slots in a shape payload.
pub const PAYLOAD_SLOTS: usize = 10;

/// Payload slot layout for triangles.
mod slot {
    pub const P1: usize = 0;
    pub const P2: usize = 1;
    pub const P3: usize = 2;
    pub const N1: usize = 3;
    pub const N2: usize = 4;
    pub const N3: usize = 5;
    pub const E1: usize = 6;
    pub const E2: usize = 7;
    pub const NORMAL: usize = 8;
}

/// Analytic shape kinds understood by the kernel.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// Unit sphere centered at the object-space origin.
    Sphere = 1,
    /// Triangle given by explicit object-space vertices.
    Triangle = 2,
    /// The object-space plane `y = 0`.
    Plane = 3,
}

impl ShapeKind {
    /// All kinds, in discriminant order.
    pub const ALL: [ShapeKind; 3] = [ShapeKind::Sphere, ShapeKind::Triangle, ShapeKind::Plane];

    /// Decode a raw discriminant. Returns `None` for unknown values.
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            1 => Some(ShapeKind::Sphere),
            2 => Some(ShapeKind::Triangle),
            3 => Some(ShapeKind::Plane),
            _ => None,
        }
    }

    /// Raw discriminant as stored in [`Shape::kind`].
    pub fn raw(self) -> u32 {
        self as u32
    }
}

/// GPU-compatible shape record (240 bytes).
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Shape {
    /// Identifier copied into hit records.
    pub id: u32,
    /// Raw kind discriminant, see [`ShapeKind`].
    pub kind: u32,
    /// Padding for alignment.
    pub _pad: [u32; 2],
    /// World-to-object transform, column-major.
    pub inverse: [f32; 16],
    /// Kind-specific parameters.
    pub payload: [[f32; 4]; PAYLOAD_SLOTS],
}

const _: () = assert!(std::mem::size_of::<Shape>() % 16 == 0);

impl Shape {
    fn with_kind(id: u32, kind: ShapeKind) -> Self {
        Self {
            id,
            kind: kind.raw(),
            _pad: [0; 2],
            inverse: Transform::identity().to_cols_array(),
            payload: [[0.0; 4]; PAYLOAD_SLOTS],
        }
    }

    /// A unit sphere at the origin with identity transform.
    pub fn sphere(id: u32) -> Self {
        Self::with_kind(id, ShapeKind::Sphere)
    }

    /// The plane `y = 0` with identity transform.
    pub fn plane(id: u32) -> Self {
        Self::with_kind(id, ShapeKind::Plane)
    }

    /// A flat triangle. All three vertex normals are the face normal.
    pub fn triangle(id: u32, p1: Point3, p2: Point3, p3: Point3) -> Self {
        let normal = face_normal(&p1, &p2, &p3);
        Self::smooth_triangle(id, p1, p2, p3, normal, normal, normal)
    }

    /// A triangle with per-vertex normals.
    ///
    /// The edge vectors `e1 = p2 - p1`, `e2 = p3 - p1` and the face normal are
    /// precomputed here so the kernel never recomputes them per ray.
    pub fn smooth_triangle(
        id: u32,
        p1: Point3,
        p2: Point3,
        p3: Point3,
        n1: Vec3,
        n2: Vec3,
        n3: Vec3,
    ) -> Self {
        let mut shape = Self::with_kind(id, ShapeKind::Triangle);
        let e1 = p2 - p1;
        let e2 = p3 - p1;
        let normal = face_normal(&p1, &p2, &p3);

        shape.payload[slot::P1] = [p1.x, p1.y, p1.z, 1.0];
        shape.payload[slot::P2] = [p2.x, p2.y, p2.z, 1.0];
        shape.payload[slot::P3] = [p3.x, p3.y, p3.z, 1.0];
        shape.payload[slot::N1] = [n1.x, n1.y, n1.z, 0.0];
        shape.payload[slot::N2] = [n2.x, n2.y, n2.z, 0.0];
        shape.payload[slot::N3] = [n3.x, n3.y, n3.z, 0.0];
        shape.payload[slot::E1] = [e1.x, e1.y, e1.z, 0.0];
        shape.payload[slot::E2] = [e2.x, e2.y, e2.z, 0.0];
        shape.payload[slot::NORMAL] = [normal.x, normal.y, normal.z, 0.0];
        shape
    }

    /// Place the shape in the world with `transform` (object to world).
    ///
    /// Stores the inverse; fails if the transform is singular.
    pub fn with_transform(mut self, transform: &Transform) -> Result<Self> {
        let inverse = transform
            .inverse()
            .ok_or(KernelError::SingularTransform(self.id))?;
        self.inverse = inverse.to_cols_array();
        Ok(self)
    }

    /// Decoded kind, or `None` for an unknown discriminant.
    #[inline]
    pub fn kind(&self) -> Option<ShapeKind> {
        ShapeKind::from_raw(self.kind)
    }

    /// The stored world-to-object transform.
    pub fn inverse_transform(&self) -> Transform {
        Transform::from_cols_array(&self.inverse)
    }

    /// Typed view of the payload as triangle data.
    ///
    /// Only meaningful when `kind() == Some(ShapeKind::Triangle)`.
    pub fn triangle_payload(&self) -> TrianglePayload {
        let p = |i: usize| Point3::new(self.payload[i][0], self.payload[i][1], self.payload[i][2]);
        let v = |i: usize| Vec3::new(self.payload[i][0], self.payload[i][1], self.payload[i][2]);
        TrianglePayload {
            p1: p(slot::P1),
            p2: p(slot::P2),
            p3: p(slot::P3),
            n1: v(slot::N1),
            n2: v(slot::N2),
            n3: v(slot::N3),
            e1: v(slot::E1),
            e2: v(slot::E2),
            normal: v(slot::NORMAL),
        }
    }
}

/// Triangle parameters unpacked from a shape payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrianglePayload {
    /// First vertex.
    pub p1: Point3,
    /// Second vertex.
    pub p2: Point3,
    /// Third vertex.
    pub p3: Point3,
    /// Normal at `p1` (shading only).
    pub n1: Vec3,
    /// Normal at `p2` (shading only).
    pub n2: Vec3,
    /// Normal at `p3` (shading only).
    pub n3: Vec3,
    /// Edge `p2 - p1`.
    pub e1: Vec3,
    /// Edge `p3 - p1`.
    pub e2: Vec3,
    /// Face normal.
    pub normal: Vec3,
}

fn face_normal(p1: &Point3, p2: &Point3, p3: &Point3) -> Vec3 {
    let e1 = p2 - p1;
    let e2 = p3 - p1;
    let n = e2.cross(&e1);
    let len = n.norm();
    if len > 0.0 {
        n / len
    } else {
        // Degenerate triangle
        n
    }
}
