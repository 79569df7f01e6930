//! Ray-sphere intersection (quadratic equation).

use super::SurfaceHit;
use crate::local::LocalRay;

/// Intersect a ray with the unit sphere at the origin.
///
/// Returns the near and far roots in that order, each `Some` only if it lies
/// strictly in front of the ray origin (`t > 0`). A tangent ray yields the
/// same root twice.
pub fn intersect_sphere(ray: &LocalRay) -> [Option<SurfaceHit>; 2] {
    let oc = ray.origin.coords;
    let d = &ray.direction;

    // |oc + t*d|^2 = 1
    let a = d.dot(d);
    let b = 2.0 * d.dot(&oc);
    let c = oc.dot(&oc) - 1.0;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return [None, None];
    }

    let sqrt_disc = discriminant.sqrt();
    let t1 = (-b - sqrt_disc) / (2.0 * a);
    let t2 = (-b + sqrt_disc) / (2.0 * a);

    [t1, t2].map(|t| (t > 0.0).then(|| SurfaceHit::at(t)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use raybatch_math::{Point3, Vec3};

    fn local(origin: [f32; 3], direction: [f32; 3]) -> LocalRay {
        LocalRay {
            origin: Point3::from(origin),
            direction: Vec3::from(direction),
        }
    }

    #[test]
    fn test_ray_sphere_through_center() {
        let ray = local([0.0, 0.0, -5.0], [0.0, 0.0, 1.0]);
        let [near, far] = intersect_sphere(&ray);
        let (near, far) = (near.unwrap(), far.unwrap());
        assert!(near.t > 0.0 && near.t < far.t);
        assert_abs_diff_eq!(near.t, 4.0, epsilon = 1e-5);
        assert_abs_diff_eq!(far.t, 6.0, epsilon = 1e-5);

        for t in [near.t, far.t] {
            let p = ray.origin + t * ray.direction;
            assert_abs_diff_eq!(p.coords.norm(), 1.0, epsilon = 1e-5);
        }
        assert_eq!(near.barycentric, None);
    }

    #[test]
    fn test_ray_sphere_oblique_points_on_surface() {
        let ray = local([-3.0, 0.5, -4.0], [3.0, -0.5, 4.0]);
        let hits: Vec<_> = intersect_sphere(&ray).into_iter().flatten().collect();
        assert_eq!(hits.len(), 2);
        for hit in hits {
            let p = ray.origin + hit.t * ray.direction;
            assert_abs_diff_eq!(p.coords.norm(), 1.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_ray_sphere_tangent() {
        let ray = local([0.0, 1.0, -5.0], [0.0, 0.0, 1.0]);
        let [near, far] = intersect_sphere(&ray);
        assert_abs_diff_eq!(near.unwrap().t, 5.0, epsilon = 1e-5);
        assert_abs_diff_eq!(far.unwrap().t, 5.0, epsilon = 1e-5);
    }

    #[test]
    fn test_ray_sphere_miss() {
        let ray = local([0.0, 2.0, -5.0], [0.0, 0.0, 1.0]);
        assert_eq!(intersect_sphere(&ray), [None, None]);
    }

    #[test]
    fn test_ray_sphere_from_inside() {
        // Entry root is behind the origin
        let ray = local([0.0, 0.0, 0.0], [0.0, 0.0, 1.0]);
        let [near, far] = intersect_sphere(&ray);
        assert!(near.is_none());
        assert_abs_diff_eq!(far.unwrap().t, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_ray_sphere_behind() {
        let ray = local([0.0, 0.0, 5.0], [0.0, 0.0, 1.0]);
        assert_eq!(intersect_sphere(&ray), [None, None]);
    }
}
