// particle_store.rs - SoA storage for every live particle
//
// Particles are parallel slots across four columns, identified only by index.

use std::ops::Range;

use glam::DVec3;
use tracing::{debug, warn};

use super::column::Column;
use super::error::StoreError;
use crate::spawn::SampledGroup;

/// Owner of all per-particle buffers.
///
/// Uses Structure-of-Arrays layout so the kernel can read positions and
/// masses as plain slices while writing velocities and staging positions.
///
/// Reading happens from `positions`, the kernel writes `next_positions`, and
/// [`commit_next_positions`](Self::commit_next_positions) copies the staged
/// result back at the start of the following tick.
pub struct ParticleStore {
    positions: Column<DVec3>,
    next_positions: Column<DVec3>,
    velocities: Column<DVec3>,
    masses: Column<f64>,
}

/// Borrowed views handed to the kernel for one pass.
///
/// Shared access to what every particle reads, exclusive access to what
/// each particle writes.
pub struct KernelViews<'a> {
    pub positions: &'a [DVec3],
    pub masses: &'a [f64],
    pub velocities: &'a mut [DVec3],
    pub next_positions: &'a mut [DVec3],
}

impl ParticleStore {
    pub fn new() -> Self {
        Self {
            positions: Column::new(),
            next_positions: Column::new(),
            velocities: Column::new(),
            masses: Column::new(),
        }
    }

    /// Number of live particles, always derived from the buffers themselves.
    #[inline]
    pub fn len(&self) -> usize {
        self.debug_assert_lockstep();
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether any buffer currently holds an allocation.
    pub fn is_allocated(&self) -> bool {
        self.positions.capacity() > 0
    }

    /// Allocated rows per buffer.
    pub fn capacity(&self) -> usize {
        self.positions.capacity()
    }

    /// Append a freshly sampled batch after every existing particle.
    ///
    /// Existing indices are untouched; the batch lands at
    /// `[old_len, old_len + k)`, which is returned. Staging positions start
    /// equal to the sampled positions so the first copy-back is a no-op.
    pub fn append(&mut self, batch: &SampledGroup) -> Result<Range<usize>, StoreError> {
        let k = batch.positions.len();
        if batch.velocities.len() != k || batch.masses.len() != k {
            return Err(StoreError::LengthMismatch {
                positions: k,
                velocities: batch.velocities.len(),
                masses: batch.masses.len(),
            });
        }

        if !self.is_allocated() {
            debug!(rows = k, "first particle buffer allocation");
        }
        if let Some((old, new)) = self.reserve(k) {
            debug!(old_capacity = old, new_capacity = new, "particle buffers grown");
        }

        let range = self.positions.extend_from_slice(&batch.positions);
        self.next_positions.extend_from_slice(&batch.positions);
        self.velocities.extend_from_slice(&batch.velocities);
        self.masses.extend_from_slice(&batch.masses);

        self.debug_assert_lockstep();
        Ok(range)
    }

    /// Remove `[start, start + count)` from every buffer, preserving the
    /// relative order of all survivors.
    ///
    /// An out-of-bounds range leaves the store exactly as it was and is
    /// reported as [`StoreError::RangeOutOfBounds`].
    pub fn remove_range(&mut self, start: usize, count: usize) -> Result<Range<usize>, StoreError> {
        let len = self.len();
        let end = match start.checked_add(count) {
            Some(end) if end <= len => end,
            _ => {
                warn!(start, count, len, "ignoring out-of-bounds particle range removal");
                return Err(StoreError::RangeOutOfBounds { start, count, len });
            }
        };

        let range = start..end;
        self.positions.remove_range(range.clone());
        self.next_positions.remove_range(range.clone());
        self.velocities.remove_range(range.clone());
        self.masses.remove_range(range.clone());

        if let Some((old, new)) = self.shrink_if_sparse() {
            debug!(old_capacity = old, new_capacity = new, "particle buffers shrunk");
        }

        self.debug_assert_lockstep();
        Ok(range)
    }

    /// Copy the previous tick's staged positions into the live buffer.
    pub fn commit_next_positions(&mut self) {
        self.positions
            .as_mut_slice()
            .copy_from_slice(self.next_positions.as_slice());
    }

    /// Split the store into the read and write views a kernel pass needs.
    pub fn kernel_views(&mut self) -> KernelViews<'_> {
        KernelViews {
            positions: self.positions.as_slice(),
            masses: self.masses.as_slice(),
            velocities: self.velocities.as_mut_slice(),
            next_positions: self.next_positions.as_mut_slice(),
        }
    }

    #[inline]
    pub fn positions(&self) -> &[DVec3] {
        self.positions.as_slice()
    }

    #[inline]
    pub fn next_positions(&self) -> &[DVec3] {
        self.next_positions.as_slice()
    }

    #[inline]
    pub fn velocities(&self) -> &[DVec3] {
        self.velocities.as_slice()
    }

    #[inline]
    pub fn masses(&self) -> &[f64] {
        self.masses.as_slice()
    }

    /// Free every buffer. The store is empty and unallocated afterwards.
    pub fn release(&mut self) {
        self.positions.release();
        self.next_positions.release();
        self.velocities.release();
        self.masses.release();
    }

    fn reserve(&mut self, additional: usize) -> Option<(usize, usize)> {
        let grown = self.positions.reserve_rows(additional);
        self.next_positions.reserve_rows(additional);
        self.velocities.reserve_rows(additional);
        self.masses.reserve_rows(additional);
        grown
    }

    fn shrink_if_sparse(&mut self) -> Option<(usize, usize)> {
        let shrunk = self.positions.shrink_if_sparse();
        self.next_positions.shrink_if_sparse();
        self.velocities.shrink_if_sparse();
        self.masses.shrink_if_sparse();
        shrunk
    }

    #[inline]
    fn debug_assert_lockstep(&self) {
        debug_assert!(
            self.next_positions.len() == self.positions.len()
                && self.velocities.len() == self.positions.len()
                && self.masses.len() == self.positions.len(),
            "particle buffers diverged in length"
        );
    }
}

impl Default for ParticleStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(offset: f64, k: usize) -> SampledGroup {
        SampledGroup {
            positions: (0..k).map(|i| DVec3::splat(offset + i as f64)).collect(),
            velocities: (0..k).map(|i| DVec3::new(0.0, offset + i as f64, 0.0)).collect(),
            masses: (0..k).map(|i| offset + i as f64 + 0.5).collect(),
        }
    }

    #[test]
    fn first_append_allocates_exactly() {
        let mut store = ParticleStore::new();
        assert!(!store.is_allocated());

        let range = store.append(&batch(0.0, 5)).unwrap();
        assert_eq!(range, 0..5);
        assert_eq!(store.len(), 5);
        assert_eq!(store.capacity(), 5);
        assert_eq!(store.next_positions(), store.positions());
    }

    #[test]
    fn append_places_batch_after_existing() {
        let mut store = ParticleStore::new();
        store.append(&batch(0.0, 3)).unwrap();
        let before = store.positions().to_vec();

        let range = store.append(&batch(100.0, 2)).unwrap();
        assert_eq!(range, 3..5);
        assert_eq!(&store.positions()[..3], before.as_slice());
        assert_eq!(store.masses()[3], 100.5);
        assert_eq!(store.velocities()[4], DVec3::new(0.0, 101.0, 0.0));
    }

    #[test]
    fn append_rejects_mismatched_batch() {
        let mut store = ParticleStore::new();
        let mut bad = batch(0.0, 3);
        bad.masses.pop();

        let err = store.append(&bad).unwrap_err();
        assert_eq!(
            err,
            StoreError::LengthMismatch {
                positions: 3,
                velocities: 3,
                masses: 2
            }
        );
        assert!(store.is_empty());
    }

    #[test]
    fn remove_range_shifts_tail_down() {
        let mut store = ParticleStore::new();
        store.append(&batch(0.0, 6)).unwrap();

        store.remove_range(1, 2).unwrap();
        let xs: Vec<f64> = store.positions().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 3.0, 4.0, 5.0]);
        assert_eq!(store.masses(), &[0.5, 3.5, 4.5, 5.5]);
    }

    #[test]
    fn out_of_bounds_removal_is_a_reported_no_op() {
        let mut store = ParticleStore::new();
        store.append(&batch(0.0, 4)).unwrap();
        let before = store.positions().to_vec();

        assert_eq!(
            store.remove_range(3, 2),
            Err(StoreError::RangeOutOfBounds {
                start: 3,
                count: 2,
                len: 4
            })
        );
        assert!(store.remove_range(usize::MAX, 1).is_err());
        assert_eq!(store.positions(), before.as_slice());
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn commit_copies_staging_into_live_positions() {
        let mut store = ParticleStore::new();
        store.append(&batch(0.0, 2)).unwrap();

        {
            let mut views = store.kernel_views();
            views.next_positions[1] = DVec3::new(9.0, 9.0, 9.0);
        }
        assert_eq!(store.positions()[1], DVec3::splat(1.0));

        store.commit_next_positions();
        assert_eq!(store.positions()[1], DVec3::new(9.0, 9.0, 9.0));
    }

    #[test]
    fn release_empties_every_buffer() {
        let mut store = ParticleStore::new();
        store.append(&batch(0.0, 8)).unwrap();
        store.release();
        assert!(store.is_empty());
        assert!(!store.is_allocated());
        assert!(store.masses().is_empty());
    }
}
