//! Ordered shape list with id lookup.

use std::collections::HashMap;

use crate::error::{KernelError, Result};
use crate::hit::{HitRecord, NO_SHAPE};
use crate::shape::Shape;

/// The flat shape list handed to a kernel, plus an index from shape id back
/// to the shape so hit records can be resolved.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    shapes: Vec<Shape>,
    index: HashMap<u32, usize>,
}

impl Scene {
    /// An empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a shape. Shapes are tested in insertion order.
    ///
    /// Unknown kinds are accepted but will never produce hits.
    pub fn add(&mut self, shape: Shape) -> Result<u32> {
        if shape.id == NO_SHAPE {
            return Err(KernelError::ReservedShapeId(shape.id));
        }
        if self.index.contains_key(&shape.id) {
            return Err(KernelError::DuplicateShapeId(shape.id));
        }
        if shape.kind().is_none() {
            log::warn!(
                "shape {} has unknown kind {}; it will never be tested",
                shape.id,
                shape.kind
            );
        }
        self.index.insert(shape.id, self.shapes.len());
        self.shapes.push(shape);
        Ok(shape.id)
    }

    /// Shapes in test order.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Number of shapes.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// True if the scene has no shapes.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Position of the shape with `id` in [`Scene::shapes`].
    pub fn index_of(&self, id: u32) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// The shape with `id`.
    pub fn get(&self, id: u32) -> Option<&Shape> {
        self.index_of(id).map(|i| &self.shapes[i])
    }

    /// The shape a hit record refers to.
    pub fn resolve<H: HitRecord>(&self, hit: &H) -> Option<&Shape> {
        self.get(hit.shape_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hit::SphereHit;

    #[test]
    fn test_add_and_resolve() {
        let mut scene = Scene::new();
        scene.add(Shape::sphere(10)).unwrap();
        scene.add(Shape::plane(3)).unwrap();
        assert_eq!(scene.len(), 2);
        assert_eq!(scene.index_of(3), Some(1));

        let hit = SphereHit { shape_id: 10, t: 1.0 };
        assert_eq!(scene.resolve(&hit), Some(&scene.shapes()[0]));
        assert!(scene.get(11).is_none());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut scene = Scene::new();
        scene.add(Shape::sphere(1)).unwrap();
        assert!(matches!(
            scene.add(Shape::plane(1)),
            Err(KernelError::DuplicateShapeId(1))
        ));
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_reserved_id_rejected() {
        let mut scene = Scene::new();
        assert!(matches!(
            scene.add(Shape::sphere(NO_SHAPE)),
            Err(KernelError::ReservedShapeId(_))
        ));
        assert!(scene.is_empty());
    }
}
