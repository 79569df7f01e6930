#![warn(missing_docs)]

//! Math types for the raybatch intersection kernel.
//!
//! Thin single-precision wrappers around nalgebra. Everything here is `f32`
//! because the same values are uploaded verbatim to GPU storage buffers.

use nalgebra::{Matrix4, Vector3, Vector4};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f32>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f32>;

/// A homogeneous 4-component vector (`w = 1` for points, `w = 0` for vectors).
pub type Vec4 = Vector4<f32>;

/// A 4x4 matrix.
pub type Mat4 = Matrix4<f32>;

/// Tolerance guarding every near-zero division in the intersectors.
pub const EPSILON: f32 = 1e-4;

/// A 4x4 affine transformation matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// The underlying 4x4 matrix.
    pub matrix: Mat4,
}

impl Transform {
    /// Identity transform.
    pub fn identity() -> Self {
        Self {
            matrix: Mat4::identity(),
        }
    }

    /// Translation by `(dx, dy, dz)`.
    pub fn translation(dx: f32, dy: f32, dz: f32) -> Self {
        let mut m = Mat4::identity();
        m[(0, 3)] = dx;
        m[(1, 3)] = dy;
        m[(2, 3)] = dz;
        Self { matrix: m }
    }

    /// Non-uniform scale by `(sx, sy, sz)`.
    pub fn scale(sx: f32, sy: f32, sz: f32) -> Self {
        let mut m = Mat4::identity();
        m[(0, 0)] = sx;
        m[(1, 1)] = sy;
        m[(2, 2)] = sz;
        Self { matrix: m }
    }

    /// Rotation about the X axis by `angle` radians.
    pub fn rotation_x(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Mat4::identity();
        m[(1, 1)] = c;
        m[(1, 2)] = -s;
        m[(2, 1)] = s;
        m[(2, 2)] = c;
        Self { matrix: m }
    }

    /// Rotation about the Y axis by `angle` radians.
    pub fn rotation_y(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Mat4::identity();
        m[(0, 0)] = c;
        m[(0, 2)] = s;
        m[(2, 0)] = -s;
        m[(2, 2)] = c;
        Self { matrix: m }
    }

    /// Rotation about the Z axis by `angle` radians.
    pub fn rotation_z(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Mat4::identity();
        m[(0, 0)] = c;
        m[(0, 1)] = -s;
        m[(1, 0)] = s;
        m[(1, 1)] = c;
        Self { matrix: m }
    }

    /// Compose: `self` then `other` (self * other).
    ///
    /// The resulting transform applies `other` first, then `self`.
    pub fn then(&self, other: &Transform) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// Transform a point.
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        let v = self.matrix * Vec4::new(p.x, p.y, p.z, 1.0);
        Point3::new(v.x, v.y, v.z)
    }

    /// Transform a direction vector (ignores translation).
    pub fn apply_vec(&self, v: &Vec3) -> Vec3 {
        let r = self.matrix * Vec4::new(v.x, v.y, v.z, 0.0);
        Vec3::new(r.x, r.y, r.z)
    }

    /// Multiply a homogeneous vector; `w` selects point (1) or direction (0)
    /// behavior.
    #[inline]
    pub fn apply_homogeneous(&self, v: &Vec4) -> Vec4 {
        self.matrix * v
    }

    /// Inverse of this transform, if it exists.
    pub fn inverse(&self) -> Option<Self> {
        self.matrix.try_inverse().map(|matrix| Self { matrix })
    }

    /// The matrix as 16 floats in column-major order, the layout WGSL's
    /// `mat4x4<f32>` expects.
    pub fn to_cols_array(&self) -> [f32; 16] {
        let mut out = [0.0f32; 16];
        out.copy_from_slice(self.matrix.as_slice());
        out
    }

    /// Rebuild a transform from 16 column-major floats.
    pub fn from_cols_array(cols: &[f32; 16]) -> Self {
        Self {
            matrix: Mat4::from_column_slice(cols),
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Homogeneous form of a point (`w = 1`).
#[inline]
pub fn point4(p: &Point3) -> [f32; 4] {
    [p.x, p.y, p.z, 1.0]
}

/// Homogeneous form of a vector (`w = 0`).
#[inline]
pub fn vector4(v: &Vec3) -> [f32; 4] {
    [v.x, v.y, v.z, 0.0]
}
