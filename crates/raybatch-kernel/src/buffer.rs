//! Host-owned output buffer.
//!
//! The kernel never reports per-ray hit counts. [`HitBuffer`] fills every
//! slot with [`HitRecord::EMPTY`] before a run, so the valid hits of a ray
//! are the prefix of its slots up to the first empty one.

use std::cmp::Ordering;

use crate::hit::HitRecord;
use crate::variant::KernelVariant;

/// `ray_count * MAX_HITS` hit slots for one kernel variant.
#[derive(Debug, Clone, PartialEq)]
pub struct HitBuffer<V: KernelVariant> {
    slots: Vec<V::Hit>,
    ray_count: usize,
}

impl<V: KernelVariant> HitBuffer<V> {
    /// A buffer for `ray_count` rays with every slot empty.
    pub fn new(ray_count: usize) -> Self {
        Self {
            slots: vec![V::Hit::EMPTY; ray_count * V::MAX_HITS],
            ray_count,
        }
    }

    /// Wrap slots read back from a device.
    ///
    /// Trailing slots that do not make up a whole ray are discarded.
    pub fn from_slots(mut slots: Vec<V::Hit>) -> Self {
        let ray_count = slots.len() / V::MAX_HITS;
        slots.truncate(ray_count * V::MAX_HITS);
        Self { slots, ray_count }
    }

    /// Number of rays the buffer covers.
    pub fn ray_count(&self) -> usize {
        self.ray_count
    }

    /// Mark every slot empty again.
    pub fn reset(&mut self) {
        self.slots.fill(V::Hit::EMPTY);
    }

    /// All slots, empty ones included.
    pub fn as_slice(&self) -> &[V::Hit] {
        &self.slots
    }

    /// Mutable slots, for handing to a kernel run.
    pub fn as_mut_slice(&mut self) -> &mut [V::Hit] {
        &mut self.slots
    }

    /// Raw bytes, as uploaded to or read back from a device.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.slots)
    }

    /// The slots belonging to `ray`, empty ones included.
    pub fn slots(&self, ray: usize) -> &[V::Hit] {
        let start = (ray * V::MAX_HITS).min(self.slots.len());
        let end = (start + V::MAX_HITS).min(self.slots.len());
        &self.slots[start..end]
    }

    /// Hits of `ray` in the order the kernel wrote them.
    pub fn hits(&self, ray: usize) -> &[V::Hit] {
        let slots = self.slots(ray);
        let count = slots.iter().take_while(|h| !h.is_empty()).count();
        &slots[..count]
    }

    /// Number of hits recorded for `ray`.
    pub fn hit_count(&self, ray: usize) -> usize {
        self.hits(ray).len()
    }

    /// The visible hit of `ray`: smallest `t` that is not behind the origin.
    pub fn nearest(&self, ray: usize) -> Option<V::Hit> {
        self.hits(ray)
            .iter()
            .filter(|h| h.t() >= 0.0)
            .min_by(|a, b| a.t().partial_cmp(&b.t()).unwrap_or(Ordering::Equal))
            .copied()
    }

    /// Up to `n` non-negative hits of `ray`, nearest first.
    pub fn nearest_n(&self, ray: usize, n: usize) -> Vec<V::Hit> {
        let mut hits: Vec<V::Hit> = self
            .hits(ray)
            .iter()
            .filter(|h| h.t() >= 0.0)
            .copied()
            .collect();
        hits.sort_by(|a, b| a.t().partial_cmp(&b.t()).unwrap_or(Ordering::Equal));
        hits.truncate(n);
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hit::Intersection;
    use crate::variant::General;

    fn hit(id: u32, t: f32) -> Intersection {
        Intersection {
            shape_id: id,
            t,
            u: -1.0,
            v: -1.0,
        }
    }

    fn buffer_with(hits: &[Intersection]) -> HitBuffer<General> {
        let mut buffer = HitBuffer::<General>::new(2);
        buffer.as_mut_slice()[..hits.len()].copy_from_slice(hits);
        buffer
    }

    #[test]
    fn test_new_buffer_is_empty() {
        let buffer = HitBuffer::<General>::new(3);
        assert_eq!(buffer.as_slice().len(), 24);
        assert_eq!(buffer.as_bytes().len(), 24 * 16);
        assert!((0..3).all(|r| buffer.hit_count(r) == 0));
    }

    #[test]
    fn test_hits_stop_at_sentinel() {
        let buffer = buffer_with(&[hit(1, 5.0), hit(2, 3.0)]);
        assert_eq!(buffer.hits(0), &[hit(1, 5.0), hit(2, 3.0)]);
        assert_eq!(buffer.hit_count(1), 0);
        assert_eq!(buffer.hit_count(7), 0);
    }

    #[test]
    fn test_nearest_ignores_negative_t() {
        let buffer = buffer_with(&[hit(1, 5.0), hit(2, -1.0), hit(3, 2.0)]);
        assert_eq!(buffer.nearest(0), Some(hit(3, 2.0)));
        assert_eq!(buffer.nearest(1), None);
    }

    #[test]
    fn test_nearest_n_sorted() {
        let buffer = buffer_with(&[hit(1, 5.0), hit(2, -1.0), hit(3, 2.0), hit(4, 4.0)]);
        let near = buffer.nearest_n(0, 2);
        assert_eq!(near, vec![hit(3, 2.0), hit(4, 4.0)]);
    }

    #[test]
    fn test_reset() {
        let mut buffer = buffer_with(&[hit(1, 5.0)]);
        buffer.reset();
        assert_eq!(buffer.hit_count(0), 0);
    }

    #[test]
    fn test_from_slots_drops_partial_ray() {
        let slots = vec![Intersection::EMPTY; 2 * General::MAX_HITS + 3];
        let buffer = HitBuffer::<General>::from_slots(slots);
        assert_eq!(buffer.ray_count(), 2);
        assert_eq!(buffer.as_slice().len(), 16);
    }
}
