use thiserror::Error;

/// Errors reported by [`ParticleStore`](super::ParticleStore) operations.
///
/// Every variant leaves the store unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("range starting at {start} with {count} particles exceeds store length {len}")]
    RangeOutOfBounds {
        start: usize,
        count: usize,
        len: usize,
    },

    #[error(
        "batch arrays disagree in length: {positions} positions, {velocities} velocities, {masses} masses"
    )]
    LengthMismatch {
        positions: usize,
        velocities: usize,
        masses: usize,
    },
}
