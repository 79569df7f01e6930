//! WGSL shader sources for the intersection kernel.

use std::fmt::Write;

use crate::hit::HitRecord;
use crate::shape::ShapeKind;
use crate::variant::KernelVariant;

/// Variant-independent kernel body.
pub const INTERSECT_SHADER: &str = include_str!("intersect.wgsl");

/// Constants and hit layout for variant `V`, prepended to
/// [`INTERSECT_SHADER`].
pub fn variant_prelude<V: KernelVariant>(workgroup_size: u32) -> String {
    let mut src = String::new();
    let _ = writeln!(src, "const MAX_HITS: u32 = {}u;", V::MAX_HITS);
    let _ = writeln!(src, "const WORKGROUP_SIZE: u32 = {workgroup_size}u;");
    for (name, kind) in [
        ("SPHERE", ShapeKind::Sphere),
        ("TRIANGLE", ShapeKind::Triangle),
        ("PLANE", ShapeKind::Plane),
    ] {
        let _ = writeln!(src, "const SUPPORTS_{name}: bool = {};", V::supports(kind));
    }

    if V::Hit::STORES_BARYCENTRIC {
        src.push_str(
            "struct Hit { shape_id: u32, t: f32, u: f32, v: f32, }\n\
             fn make_hit(id: u32, t: f32, u: f32, v: f32) -> Hit { return Hit(id, t, u, v); }\n",
        );
    } else {
        src.push_str(
            "struct Hit { shape_id: u32, t: f32, }\n\
             fn make_hit(id: u32, t: f32, u: f32, v: f32) -> Hit { return Hit(id, t); }\n",
        );
    }
    src
}

/// Full shader source for variant `V`.
pub fn intersect_source<V: KernelVariant>(workgroup_size: u32) -> String {
    let mut src = variant_prelude::<V>(workgroup_size);
    src.push_str(INTERSECT_SHADER);
    src
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::{General, SpheresOnly};

    #[test]
    fn test_general_prelude() {
        let src = variant_prelude::<General>(64);
        assert!(src.contains("const MAX_HITS: u32 = 8u;"));
        assert!(src.contains("const WORKGROUP_SIZE: u32 = 64u;"));
        assert!(src.contains("const SUPPORTS_PLANE: bool = true;"));
        assert!(src.contains("struct Hit { shape_id: u32, t: f32, u: f32, v: f32, }"));
    }

    #[test]
    fn test_spheres_only_prelude() {
        let src = variant_prelude::<SpheresOnly>(32);
        assert!(src.contains("const MAX_HITS: u32 = 2u;"));
        assert!(src.contains("const SUPPORTS_SPHERE: bool = true;"));
        assert!(src.contains("const SUPPORTS_TRIANGLE: bool = false;"));
        assert!(src.contains("struct Hit { shape_id: u32, t: f32, }"));
    }

    #[test]
    fn test_body_has_entry_point() {
        let src = intersect_source::<General>(64);
        assert!(src.contains("fn main("));
        assert!(src.contains("@workgroup_size(WORKGROUP_SIZE)"));
    }
}
