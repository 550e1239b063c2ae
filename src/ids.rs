//! Id Sequence
//!
//! TigerStyle: Ids only move forward. The sequence keeps the high-water mark
//! (largest id ever handed out) and must be advanced under the same lock as
//! the collection it numbers.

/// First id handed out by an empty sequence
pub const ID_FIRST: u64 = 1;

/// Monotonic id generator for one collection
#[derive(Debug, Default, Clone)]
pub struct IdSequence {
    /// Largest id assigned so far (0 = none)
    high_water: u64,
}

impl IdSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve and return the next id
    pub fn next_id(&mut self) -> u64 {
        // Precondition
        assert!(self.high_water < u64::MAX, "id space exhausted");

        let next = self.high_water + 1;

        self.high_water = next;
        next
    }
}

/// Map a caller-supplied id onto the stored id space (`None` if it can't exist)
pub fn stored_id(raw: i64) -> Option<u64> {
    u64::try_from(raw).ok().filter(|id| *id >= ID_FIRST)
}
