//! Bounded per-ray output.

use crate::hit::HitRecord;

/// Append-only writer over one ray's slice of the output buffer.
///
/// A bump pointer over a pre-sized slice: the slice length is the capacity
/// (`MAX_HITS`), `count` is the next free slot. Once full, further pushes
/// are dropped; nothing past `count` is ever touched.
#[derive(Debug)]
pub struct HitWriter<'a, H> {
    slots: &'a mut [H],
    count: usize,
}

impl<'a, H: HitRecord> HitWriter<'a, H> {
    /// Start writing at the beginning of `slots`.
    pub fn new(slots: &'a mut [H]) -> Self {
        Self { slots, count: 0 }
    }

    /// Append `hit` if there is room. Returns whether it was stored.
    #[inline]
    pub fn push(&mut self, hit: H) -> bool {
        match self.slots.get_mut(self.count) {
            Some(slot) => {
                *slot = hit;
                self.count += 1;
                true
            }
            None => false,
        }
    }

    /// Number of records written so far.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Maximum number of records.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// True once every slot is taken.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.count >= self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hit::{SphereHit, NO_SHAPE};

    fn hit(id: u32) -> SphereHit {
        SphereHit { shape_id: id, t: id as f32 }
    }

    #[test]
    fn test_push_until_full() {
        let mut slots = [SphereHit::EMPTY; 2];
        let mut writer = HitWriter::new(&mut slots);
        assert_eq!(writer.capacity(), 2);
        assert!(writer.push(hit(1)));
        assert!(writer.push(hit(2)));
        assert!(writer.is_full());
        assert!(!writer.push(hit(3)));
        assert_eq!(writer.count(), 2);
        assert_eq!(slots, [hit(1), hit(2)]);
    }

    #[test]
    fn test_untouched_tail() {
        let mut slots = [SphereHit { shape_id: 77, t: 9.0 }; 3];
        {
            let mut writer = HitWriter::new(&mut slots);
            writer.push(hit(1));
        }
        assert_eq!(slots[0], hit(1));
        assert_eq!(slots[1].shape_id, 77);
        assert_eq!(slots[2].shape_id, 77);
        assert_ne!(slots[2].shape_id, NO_SHAPE);
    }

    #[test]
    fn test_zero_capacity_drops_everything() {
        let mut slots: [SphereHit; 0] = [];
        let mut writer = HitWriter::new(&mut slots);
        assert!(writer.is_full());
        assert!(!writer.push(hit(1)));
    }
}
