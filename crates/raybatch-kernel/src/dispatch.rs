//! Invocation dispatch: one logical task per ray.
//!
//! [`Kernel::invoke`] is the single entry point of the kernel, parameterized
//! only by the task index. The batch runners below schedule it over the whole
//! ray list, either on the rayon pool or sequentially.

use std::marker::PhantomData;

use rayon::prelude::*;

use crate::buffer::HitBuffer;
use crate::error::{KernelError, Result};
use crate::hit::HitRecord;
use crate::intersect::intersect_shape;
use crate::settings::DispatchSettings;
use crate::shape::Shape;
use crate::variant::KernelVariant;
use crate::writer::HitWriter;
use crate::Ray;

/// Intersection kernel bound to a ray batch and a shape list.
#[derive(Debug)]
pub struct Kernel<'a, V: KernelVariant> {
    rays: &'a [Ray],
    shapes: &'a [Shape],
    _variant: PhantomData<V>,
}

impl<'a, V: KernelVariant> Clone for Kernel<'a, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, V: KernelVariant> Copy for Kernel<'a, V> {}

impl<'a, V: KernelVariant> Kernel<'a, V> {
    /// Bind the kernel to its read-only inputs.
    pub fn new(rays: &'a [Ray], shapes: &'a [Shape]) -> Self {
        Self {
            rays,
            shapes,
            _variant: PhantomData,
        }
    }

    /// Number of rays, i.e. valid task indices.
    pub fn ray_count(&self) -> usize {
        self.rays.len()
    }

    /// Number of shapes tested per ray.
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// Output slots required: `ray_count * MAX_HITS`.
    pub fn output_len(&self) -> usize {
        self.rays.len() * V::MAX_HITS
    }

    /// Run task `index`: test ray `index` against every shape and write its
    /// hits into `output[index * MAX_HITS..(index + 1) * MAX_HITS]`.
    ///
    /// Indices past the last ray are grid padding and do nothing, as does an
    /// output buffer too short to hold the ray's region.
    pub fn invoke(&self, index: usize, output: &mut [V::Hit]) {
        let Some(ray) = self.rays.get(index) else {
            return;
        };
        let base = index * V::MAX_HITS;
        let Some(slots) = output.get_mut(base..base + V::MAX_HITS) else {
            return;
        };
        self.trace_into(ray, slots);
    }

    /// Test `ray` against every shape, in order, into its own slots.
    /// Returns the number of records written.
    fn trace_into(&self, ray: &Ray, slots: &mut [V::Hit]) -> usize {
        let mut writer = HitWriter::new(slots);
        for shape in self.shapes {
            if writer.is_full() {
                break;
            }
            let Some(kind) = shape.kind() else {
                continue;
            };
            if V::supports(kind) {
                intersect_shape(ray, shape, kind, &mut writer);
            }
        }
        writer.count()
    }

    /// All hits of one ray, in shape order. Empty for an unknown index.
    pub fn trace(&self, index: usize) -> Vec<V::Hit> {
        let Some(ray) = self.rays.get(index) else {
            return Vec::new();
        };
        let mut slots = vec![V::Hit::EMPTY; V::MAX_HITS];
        let count = self.trace_into(ray, &mut slots);
        slots.truncate(count);
        slots
    }

    fn check_output(&self, output: &[V::Hit]) -> Result<()> {
        let needed = self.output_len();
        if output.len() < needed {
            return Err(KernelError::OutputTooSmall {
                needed,
                actual: output.len(),
            });
        }
        Ok(())
    }

    /// Run every ray on the rayon pool.
    ///
    /// The output is split into disjoint `MAX_HITS` chunks, one per task, so
    /// tasks never share a slot.
    pub fn run(&self, output: &mut [V::Hit]) -> Result<()> {
        self.check_output(output)?;
        let needed = self.output_len();
        output[..needed]
            .par_chunks_mut(V::MAX_HITS)
            .zip(self.rays.par_iter())
            .for_each(|(slots, ray)| {
                self.trace_into(ray, slots);
            });
        Ok(())
    }

    /// Run every ray on the calling thread.
    pub fn run_serial(&self, output: &mut [V::Hit]) -> Result<()> {
        self.check_output(output)?;
        for index in 0..self.rays.len() {
            self.invoke(index, output);
        }
        Ok(())
    }

    /// Run `invocations` task indices in order, as a rounded-up dispatch grid
    /// would. Indices at or past `ray_count` are no-ops.
    pub fn run_grid(&self, invocations: usize, output: &mut [V::Hit]) -> Result<()> {
        self.check_output(output)?;
        for index in 0..invocations {
            self.invoke(index, output);
        }
        Ok(())
    }

    /// Allocate a sentinel-filled [`HitBuffer`] and run the batch into it.
    pub fn execute(&self, settings: &DispatchSettings) -> Result<HitBuffer<V>> {
        settings.validate()?;
        log::debug!(
            "{} kernel: {} rays x {} shapes, {} invocations",
            V::NAME,
            self.rays.len(),
            self.shapes.len(),
            settings.invocations(self.rays.len()),
        );

        let mut buffer = HitBuffer::new(self.rays.len());
        if settings.parallel {
            self.run(buffer.as_mut_slice())?;
        } else {
            self.run_grid(settings.invocations(self.rays.len()), buffer.as_mut_slice())?;
        }
        Ok(buffer)
    }
}
