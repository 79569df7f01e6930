#![warn(missing_docs)]

//! Batched ray/shape intersection for analytic shapes.
//!
//! Given a batch of rays and a flat list of shapes (unit spheres, `y = 0`
//! planes and triangles, each with a world-to-object inverse transform), the
//! kernel computes every intersection of every ray with every shape and
//! writes the hit records into a fixed-capacity slice per ray.
//!
//! # Architecture
//!
//! - [`Ray`], [`Shape`] - `#[repr(C)]` inputs shared verbatim with the GPU
//! - [`local`] - world to object space transform of a ray
//! - [`intersect`] - sphere, plane and triangle intersectors
//! - [`HitWriter`] - bounded per-ray append of hit records
//! - [`Kernel`] - per-ray invocation plus CPU batch execution (rayon)
//! - [`KernelVariant`] - compile-time kernel configuration ([`General`],
//!   [`SpheresOnly`])
//! - [`Scene`], [`HitBuffer`] - host-side helpers around the kernel
//!
//! # Example
//!
//! ```ignore
//! use raybatch_kernel::{General, Kernel, Ray, Scene, Shape, DispatchSettings};
//! use raybatch_math::{Point3, Transform, Vec3};
//!
//! let mut scene = Scene::new();
//! scene.add(Shape::sphere(1).with_transform(&Transform::scale(2.0, 2.0, 2.0))?)?;
//!
//! let rays = [Ray::new(Point3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0))];
//! let hits = Kernel::<General>::new(&rays, scene.shapes()).execute(&DispatchSettings::default())?;
//!
//! assert_eq!(hits.hit_count(0), 2);
//! ```

pub mod buffer;
pub mod dispatch;
pub mod error;
pub mod hit;
pub mod intersect;
pub mod local;
mod ray;
pub mod scene;
pub mod settings;
pub mod shape;
pub mod variant;
pub mod writer;

#[cfg(feature = "gpu")]
pub mod gpu;

pub use buffer::HitBuffer;
pub use dispatch::Kernel;
pub use error::{KernelError, Result};
pub use hit::{HitRecord, Intersection, SphereHit, NO_BARYCENTRIC, NO_SHAPE};
pub use ray::Ray;
pub use scene::Scene;
pub use settings::DispatchSettings;
pub use shape::{Shape, ShapeKind, TrianglePayload};
pub use variant::{General, KernelVariant, SpheresOnly};
pub use writer::HitWriter;
