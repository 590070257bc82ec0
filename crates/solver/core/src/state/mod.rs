//! Authoritative actor storage.
//!
//! [`ActorStore`] owns the contiguous slot buffer. Hosts read it freely but
//! can only change it by enqueueing commands on the [`Solver`](crate::Solver);
//! the slot writer is crate-private and reached only from command transitions.
pub mod delta;
pub mod types;

use arrayvec::ArrayVec;

use crate::config::SolverConfig;
use crate::error::{ErrorSeverity, SolverError};

pub use delta::{ActorChanges, ActorFields, StoreDelta};
pub use types::{ActorData, ActorFlags, ActorId, Tick, Vec3};

type Slots = ArrayVec<ActorData, { SolverConfig::MAX_ACTORS }>;

/// Errors raised while constructing an [`ActorStore`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StoreError {
    #[error("store capacity must be at least 1")]
    ZeroCapacity,

    #[error("store capacity {requested} exceeds the maximum of {max}")]
    CapacityExceeded { requested: usize, max: usize },
}

impl SolverError for StoreError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::ZeroCapacity => "STORE_ZERO_CAPACITY",
            Self::CapacityExceeded { .. } => "STORE_CAPACITY_EXCEEDED",
        }
    }
}

/// Fixed-capacity contiguous buffer of actor records.
///
/// # Invariants
///
/// - The number of slots is set at construction and never changes.
/// - Slots are overwritten in place; none is ever removed.
/// - Only command transitions write to a slot.
///
/// With the `serde` feature the store encodes as a plain sequence of records
/// and decodes through [`ActorStore::from_records`], so the capacity bounds
/// hold for deserialized stores too.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<ActorData>", into = "Vec<ActorData>")
)]
pub struct ActorStore {
    slots: Slots,
}

impl ActorStore {
    /// Allocates `capacity` default slots.
    pub fn new(capacity: usize) -> Result<Self, StoreError> {
        check_capacity(capacity)?;

        let mut slots = Slots::new();
        slots.extend(core::iter::repeat_n(ActorData::default(), capacity));
        Ok(Self { slots })
    }

    pub fn with_config(config: &SolverConfig) -> Result<Self, StoreError> {
        Self::new(config.capacity)
    }

    /// Seeds a store from caller-supplied records, one slot per record.
    ///
    /// Reads at most `MAX_ACTORS + 1` records, so unbounded iterators are
    /// safe. On overflow `requested` is `MAX_ACTORS + 1`, meaning "more than
    /// the maximum".
    pub fn from_records<I>(records: I) -> Result<Self, StoreError>
    where
        I: IntoIterator<Item = ActorData>,
    {
        let mut slots = Slots::new();
        for record in records.into_iter().take(SolverConfig::MAX_ACTORS + 1) {
            if slots.try_push(record).is_err() {
                return Err(StoreError::CapacityExceeded {
                    requested: SolverConfig::MAX_ACTORS + 1,
                    max: SolverConfig::MAX_ACTORS,
                });
            }
        }
        check_capacity(slots.len())?;

        Ok(Self { slots })
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn contains(&self, id: ActorId) -> bool {
        id.index() < self.slots.len()
    }

    pub fn get(&self, id: ActorId) -> Option<&ActorData> {
        self.slots.get(id.index())
    }

    /// Iterates over every slot with its id, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (ActorId, &ActorData)> {
        self.slots
            .iter()
            .enumerate()
            .map(|(index, data)| (ActorId(index as u32), data))
    }

    pub fn as_slice(&self) -> &[ActorData] {
        &self.slots
    }

    /// Write access for command transitions.
    pub(crate) fn slot_mut(&mut self, id: ActorId) -> Option<&mut ActorData> {
        self.slots.get_mut(id.index())
    }

    /// SHA-256 over the capacity and the bincode encoding of every slot.
    ///
    /// Equal stores always produce equal roots.
    #[cfg(feature = "serde")]
    pub fn state_root(&self) -> [u8; 32] {
        use sha2::{Digest, Sha256};

        let mut hasher = Sha256::new();
        hasher.update((self.slots.len() as u64).to_le_bytes());

        // Order matters: slot order is part of the state.
        for slot in &self.slots {
            if let Ok(bytes) = bincode::serialize(slot) {
                hasher.update(&bytes);
            }
        }

        hasher.finalize().into()
    }
}

impl TryFrom<Vec<ActorData>> for ActorStore {
    type Error = StoreError;

    fn try_from(records: Vec<ActorData>) -> Result<Self, Self::Error> {
        Self::from_records(records)
    }
}

impl From<ActorStore> for Vec<ActorData> {
    fn from(store: ActorStore) -> Self {
        store.slots.into_iter().collect()
    }
}

fn check_capacity(capacity: usize) -> Result<(), StoreError> {
    if capacity == 0 {
        return Err(StoreError::ZeroCapacity);
    }
    if capacity > SolverConfig::MAX_ACTORS {
        return Err(StoreError::CapacityExceeded {
            requested: capacity,
            max: SolverConfig::MAX_ACTORS,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_allocates_default_slots() {
        let store = ActorStore::new(4).unwrap();

        assert_eq!(store.capacity(), 4);
        assert!(store.iter().all(|(_, data)| *data == ActorData::default()));
        assert!(store.contains(ActorId(3)));
        assert!(!store.contains(ActorId(4)));
        assert!(store.get(ActorId(4)).is_none());
    }

    #[test]
    fn rejects_out_of_range_capacity() {
        assert_eq!(ActorStore::new(0), Err(StoreError::ZeroCapacity));
        assert_eq!(
            ActorStore::new(SolverConfig::MAX_ACTORS + 1),
            Err(StoreError::CapacityExceeded {
                requested: SolverConfig::MAX_ACTORS + 1,
                max: SolverConfig::MAX_ACTORS,
            })
        );
        assert!(ActorStore::new(SolverConfig::MAX_ACTORS).is_ok());
    }

    #[test]
    fn from_records_keeps_order() {
        let records = [
            ActorData::at(Vec3::new(1.0, 0.0, 0.0)),
            ActorData::at(Vec3::new(2.0, 0.0, 0.0)),
        ];
        let store = ActorStore::from_records(records).unwrap();

        assert_eq!(store.capacity(), 2);
        assert_eq!(store.get(ActorId(1)).unwrap().position.x, 2.0);
        assert_eq!(store.as_slice(), &records);
    }

    #[test]
    fn from_records_rejects_overflow_and_empty() {
        let too_many = core::iter::repeat_n(ActorData::default(), SolverConfig::MAX_ACTORS + 3);

        assert_eq!(
            ActorStore::from_records(too_many),
            Err(StoreError::CapacityExceeded {
                requested: SolverConfig::MAX_ACTORS + 1,
                max: SolverConfig::MAX_ACTORS,
            })
        );
        assert_eq!(
            ActorStore::from_records(Vec::new()),
            Err(StoreError::ZeroCapacity)
        );
    }

    #[test]
    fn from_records_stops_reading_unbounded_input() {
        let endless = core::iter::repeat(ActorData::default());

        assert!(matches!(
            ActorStore::from_records(endless),
            Err(StoreError::CapacityExceeded { .. })
        ));
        assert!(ActorStore::from_records(core::iter::repeat_n(
            ActorData::default(),
            SolverConfig::MAX_ACTORS
        ))
        .is_ok());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize_enforces_capacity_bounds() {
        // bincode encodes an empty sequence as a zero u64 length prefix.
        let empty = bincode::deserialize::<ActorStore>(&0u64.to_le_bytes());
        assert!(empty.is_err());

        let store = ActorStore::from_records([
            ActorData::at(Vec3::new(1.0, 2.0, 3.0)),
            ActorData::default().with_flags(ActorFlags::VISIBLE),
        ])
        .unwrap();
        let bytes = bincode::serialize(&store).unwrap();
        let decoded: ActorStore = bincode::deserialize(&bytes).unwrap();
        assert_eq!(decoded, store);
        assert_eq!(decoded.state_root(), store.state_root());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn state_root_tracks_slot_contents() {
        let a = ActorStore::new(3).unwrap();
        let b = ActorStore::new(3).unwrap();
        assert_eq!(a.state_root(), b.state_root());

        let mut c = b.clone();
        c.slot_mut(ActorId(2)).unwrap().flags = ActorFlags::ACTIVE;
        assert_ne!(a.state_root(), c.state_root());

        // Capacity is part of the root even when every slot is default.
        let d = ActorStore::new(4).unwrap();
        assert_ne!(hex::encode(a.state_root()), hex::encode(d.state_root()));
    }
}
