//! Command sources for a `multigate` session.
//!
//! Producer tasks steer the actors they own by sending commands through
//! cloned [`RuntimeHandle`]s; the [`DriftProvider`] integrates every active
//! actor once per step.
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::debug;

use runtime::{CommandProvider, RuntimeHandle, StoreSnapshot};
use solver_core::{ActorData, ActorFlags, ActorId, Command, Vec3};

const HEADINGS: [Vec3; 4] = [
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(0.0, 0.0, 1.0),
    Vec3::new(-1.0, 0.0, 0.0),
    Vec3::new(0.0, 0.0, -1.0),
];

/// Spawns `producers` tasks that each own every `producers`-th actor.
///
/// Each task spawns its actors, then sends one steering command per owned
/// actor per round for `rounds` rounds. Tasks resolve to the number of
/// commands they sent.
pub fn spawn_producers(
    handle: &RuntimeHandle,
    producers: usize,
    capacity: usize,
    rounds: usize,
    pace: Duration,
) -> Vec<JoinHandle<Result<usize>>> {
    let producers = producers.max(1);

    (0..producers)
        .map(|producer| {
            let handle = handle.clone();
            let owned = owned_actors(producer, producers, capacity);
            tokio::spawn(async move { produce(handle, producer, owned, rounds, pace).await })
        })
        .collect()
}

fn owned_actors(producer: usize, producers: usize, capacity: usize) -> Vec<ActorId> {
    (producer..capacity)
        .step_by(producers)
        .map(|index| ActorId(index as u32))
        .collect()
}

async fn produce(
    handle: RuntimeHandle,
    producer: usize,
    owned: Vec<ActorId>,
    rounds: usize,
    pace: Duration,
) -> Result<usize> {
    if owned.is_empty() {
        return Ok(0);
    }

    let spawn: Vec<Command> = owned
        .iter()
        .map(|&actor| Command::write(actor, spawn_record(actor)))
        .collect();
    let mut sent = spawn.len();
    handle.add_commands(spawn).await?;

    for round in 1..rounds {
        tokio::time::sleep(pace).await;

        let batch: Vec<Command> = owned
            .iter()
            .map(|&actor| steer(actor, round))
            .collect();
        sent += batch.len();
        handle.add_commands(batch).await?;
    }

    debug!(producer, sent, "Producer finished");
    Ok(sent)
}

fn spawn_record(actor: ActorId) -> ActorData {
    let lane = actor.index() as f32;
    ActorData::at(Vec3::new(lane, 0.0, 0.0))
        .with_velocity(HEADINGS[actor.index() % HEADINGS.len()])
        .with_flags(ActorFlags::ACTIVE | ActorFlags::VISIBLE)
}

/// Turns every 8 rounds; every 32nd round parks the actor for one round.
fn steer(actor: ActorId, round: usize) -> Command {
    match round % 32 {
        0 => Command::set_flags(actor, ActorFlags::SLEEPING),
        1 => Command::clear_flags(actor, ActorFlags::SLEEPING),
        _ => {
            let heading = (actor.index() + round / 8) % HEADINGS.len();
            Command::set_velocity(actor, HEADINGS[heading])
        }
    }
}

/// Integrates every active, awake actor by a fixed time step.
pub struct DriftProvider {
    dt: f32,
}

impl DriftProvider {
    pub fn new(step: Duration) -> Self {
        Self {
            dt: step.as_secs_f32(),
        }
    }
}

#[async_trait]
impl CommandProvider for DriftProvider {
    async fn provide_commands(&self, snapshot: &StoreSnapshot) -> runtime::Result<Vec<Command>> {
        Ok(snapshot
            .store
            .iter()
            .filter(|(_, data)| {
                data.flags.contains(ActorFlags::ACTIVE) && !data.flags.contains(ActorFlags::SLEEPING)
            })
            .map(|(actor, _)| Command::integrate(actor, self.dt))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solver_core::{ActorStore, Tick};

    #[test]
    fn producers_partition_the_store() {
        let mut all: Vec<ActorId> = (0..3)
            .flat_map(|producer| owned_actors(producer, 3, 8))
            .collect();
        all.sort();

        assert_eq!(all, (0..8).map(ActorId).collect::<Vec<_>>());
        assert_eq!(owned_actors(1, 3, 8), vec![ActorId(1), ActorId(4), ActorId(7)]);
        assert!(owned_actors(5, 6, 4).is_empty());
    }

    #[test]
    fn steering_parks_and_wakes() {
        assert_eq!(
            steer(ActorId(2), 32),
            Command::set_flags(ActorId(2), ActorFlags::SLEEPING)
        );
        assert_eq!(
            steer(ActorId(2), 33),
            Command::clear_flags(ActorId(2), ActorFlags::SLEEPING)
        );
        assert_eq!(
            steer(ActorId(0), 8),
            Command::set_velocity(ActorId(0), HEADINGS[1])
        );
    }

    #[tokio::test]
    async fn drift_skips_inactive_and_sleeping_actors() {
        let store = ActorStore::from_records([
            ActorData::default().with_flags(ActorFlags::ACTIVE),
            ActorData::default(),
            ActorData::default().with_flags(ActorFlags::ACTIVE | ActorFlags::SLEEPING),
        ])
        .unwrap();
        let snapshot = StoreSnapshot {
            tick: Tick::ZERO,
            store,
        };

        let commands = DriftProvider::new(Duration::from_millis(500))
            .provide_commands(&snapshot)
            .await
            .unwrap();

        assert_eq!(commands, vec![Command::integrate(ActorId(0), 0.5)]);
    }
}
