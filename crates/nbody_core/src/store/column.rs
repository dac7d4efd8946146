use std::ops::Range;

/// Contiguous, order-preserving column for one per-particle quantity.
///
/// Growth doubles capacity so repeated group additions amortize their
/// reallocation; the very first allocation is sized exactly to the first
/// batch. Removal closes the gap by shifting the tail down, so survivors keep
/// their relative order.
pub struct Column<T> {
    data: Vec<T>,
}

impl<T: Copy> Column<T> {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Make room for `additional` more rows.
    ///
    /// Returns the `(old, new)` capacity pair when a reallocation happened.
    pub fn reserve_rows(&mut self, additional: usize) -> Option<(usize, usize)> {
        let required = self.data.len() + additional;
        let old = self.data.capacity();
        if required <= old {
            return None;
        }

        let target = if old == 0 {
            required
        } else {
            (old * 2).max(required)
        };
        self.data.reserve_exact(target - self.data.len());
        Some((old, self.data.capacity()))
    }

    /// Append `rows` after the current contents, returning their index range.
    pub fn extend_from_slice(&mut self, rows: &[T]) -> Range<usize> {
        let start = self.data.len();
        self.reserve_rows(rows.len());
        self.data.extend_from_slice(rows);
        start..self.data.len()
    }

    /// Remove `range`, shifting every later row down by `range.len()`.
    ///
    /// The caller is responsible for bounds; an out-of-bounds range panics.
    pub fn remove_range(&mut self, range: Range<usize>) {
        self.data.drain(range);
    }

    /// Give memory back once the column has become mostly empty.
    pub fn shrink_if_sparse(&mut self) -> Option<(usize, usize)> {
        let old = self.data.capacity();
        if self.data.len() >= old / 4 {
            return None;
        }
        self.data.shrink_to((old / 2).max(self.data.len()));
        Some((old, self.data.capacity()))
    }

    /// Drop the backing allocation entirely.
    pub fn release(&mut self) {
        self.data = Vec::new();
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }
}

impl<T: Copy> Default for Column<T> {
    fn default() -> Self {
        Self::new()
    }
}
