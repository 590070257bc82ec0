/// Solver configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolverConfig {
    /// Number of actor slots allocated when the store is constructed.
    /// Fixed for the lifetime of the store.
    pub capacity: usize,
}

impl SolverConfig {
    // ===== compile-time constants used as type parameters =====
    /// Upper bound on store capacity. Slots live inline in the store.
    pub const MAX_ACTORS: usize = 1024;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_CAPACITY: usize = 64;

    pub fn new() -> Self {
        Self {
            capacity: Self::DEFAULT_CAPACITY,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { capacity }
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self::new()
    }
}
