//! Change tracking between two store snapshots.
//!
//! A [`StoreDelta`] records which fields of which slots changed during a
//! tick. It holds metadata only; values are read back from the store.

use bitflags::bitflags;

use super::{ActorData, ActorId, ActorStore, Tick};

bitflags! {
    /// Tracks which fields of an [`ActorData`] changed during a transition.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ActorFields: u8 {
        const POSITION = 1 << 0;
        const VELOCITY = 1 << 1;
        const FLAGS    = 1 << 2;
    }
}

impl ActorFields {
    /// Field-by-field comparison of two records.
    pub fn between(before: &ActorData, after: &ActorData) -> Self {
        let mut fields = Self::empty();
        fields.set(Self::POSITION, before.position != after.position);
        fields.set(Self::VELOCITY, before.velocity != after.velocity);
        fields.set(Self::FLAGS, before.flags != after.flags);
        fields
    }
}

/// Fields changed on a single slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorChanges {
    pub id: ActorId,
    pub fields: ActorFields,
}

/// Minimal description of a tick's impact on the store.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StoreDelta {
    /// Tick that produced the changes.
    pub tick: Tick,

    /// Changed slots in ascending id order. Unchanged slots are omitted.
    pub actors: Vec<ActorChanges>,
}

impl StoreDelta {
    /// Creates a delta by comparing two snapshots of the same store.
    ///
    /// Both stores have the same capacity (it never changes), so slots are
    /// compared pairwise in O(n).
    pub fn from_stores(tick: Tick, before: &ActorStore, after: &ActorStore) -> Self {
        debug_assert_eq!(before.capacity(), after.capacity());

        let actors = before
            .iter()
            .zip(after.as_slice())
            .filter_map(|((id, old), new)| {
                let fields = ActorFields::between(old, new);
                (!fields.is_empty()).then_some(ActorChanges { id, fields })
            })
            .collect();

        Self { tick, actors }
    }

    /// Returns true if no slot changed.
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Fields changed on `id`, if any.
    pub fn changed(&self, id: ActorId) -> Option<ActorFields> {
        self.actors
            .binary_search_by_key(&id, |changes| changes.id)
            .ok()
            .map(|index| self.actors[index].fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ActorFlags, Vec3};

    #[test]
    fn fields_between_records() {
        let before = ActorData::default();
        let after = ActorData::at(Vec3::new(1.0, 0.0, 0.0)).with_flags(ActorFlags::VISIBLE);

        let fields = ActorFields::between(&before, &after);
        assert_eq!(fields, ActorFields::POSITION | ActorFields::FLAGS);
        assert!(ActorFields::between(&after, &after).is_empty());
    }

    #[test]
    fn delta_lists_only_changed_slots() {
        let before = ActorStore::new(3).unwrap();
        let mut after = before.clone();
        after.slot_mut(ActorId(1)).unwrap().velocity = Vec3::new(0.0, 1.0, 0.0);

        let delta = StoreDelta::from_stores(Tick(7), &before, &after);

        assert_eq!(delta.tick, Tick(7));
        assert_eq!(delta.actors.len(), 1);
        assert_eq!(delta.changed(ActorId(1)), Some(ActorFields::VELOCITY));
        assert_eq!(delta.changed(ActorId(0)), None);
        assert!(StoreDelta::from_stores(Tick(8), &after, &after).is_empty());
    }
}
