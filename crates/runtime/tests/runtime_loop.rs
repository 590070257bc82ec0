//! Provider-driven stepping and runtime lifecycle.

use std::time::Duration;

use runtime::{Runtime, RuntimeConfig, RuntimeError, ScriptedProvider};
use solver_core::{ActorData, ActorFlags, ActorId, ActorStore, Command, SolverConfig, Tick, Vec3};

fn fast_config(capacity: usize) -> RuntimeConfig {
    RuntimeConfig {
        solver: SolverConfig::with_capacity(capacity),
        tick_interval: Duration::from_millis(1),
        ..RuntimeConfig::default()
    }
}

/// Scripted batches are applied one per step, then steps go idle.
#[tokio::test]
async fn scripted_provider_drives_run_for() {
    let provider = ScriptedProvider::new([
        vec![Command::set_velocity(ActorId(0), Vec3::new(1.0, 0.0, 0.0))],
        vec![
            Command::integrate(ActorId(0), 1.0),
            Command::set_flags(ActorId(0), ActorFlags::ACTIVE),
        ],
    ]);

    let mut runtime = Runtime::builder()
        .config(fast_config(2))
        .provider(provider)
        .build()
        .await
        .expect("runtime should start");

    let summaries = runtime.run_for(3).await.expect("run");

    assert_eq!(summaries.len(), 3);
    assert_eq!(summaries[0].applied, 1);
    assert_eq!(summaries[1].applied, 2);
    assert_eq!(summaries[2].applied, 0);
    assert_eq!(summaries[2].tick, Tick(3));

    let snapshot = runtime.handle().query_store().await.expect("query");
    let actor = snapshot.store.get(ActorId(0)).unwrap();
    assert_eq!(actor.position, Vec3::new(1.0, 0.0, 0.0));
    assert!(actor.flags.contains(ActorFlags::ACTIVE));

    runtime.shutdown().await.expect("shutdown");
}

/// Handle commands sent before a step land in the same tick as provider output.
#[tokio::test]
async fn step_applies_handle_commands_before_provider_output() {
    let mut runtime = Runtime::builder()
        .config(fast_config(1))
        .provider(ScriptedProvider::new([vec![Command::set_position(
            ActorId(0),
            Vec3::new(5.0, 0.0, 0.0),
        )]]))
        .build()
        .await
        .expect("runtime should start");

    runtime
        .handle()
        .add_command(Command::set_position(ActorId(0), Vec3::new(1.0, 0.0, 0.0)))
        .await
        .expect("enqueue");

    let summary = runtime.step().await.expect("step");
    let snapshot = runtime.handle().query_store().await.expect("query");

    assert_eq!(summary.applied, 2);
    assert_eq!(snapshot.store.get(ActorId(0)).unwrap().position.x, 5.0);

    runtime.shutdown().await.expect("shutdown");
}

/// Providers registered after build are polled like builder-supplied ones.
#[tokio::test]
async fn add_provider_joins_the_step() {
    let mut runtime = Runtime::builder()
        .config(fast_config(2))
        .provider(ScriptedProvider::new([vec![Command::set_flags(
            ActorId(0),
            ActorFlags::ACTIVE,
        )]]))
        .build()
        .await
        .expect("runtime should start");

    runtime.add_provider(ScriptedProvider::new([vec![Command::set_flags(
        ActorId(1),
        ActorFlags::VISIBLE,
    )]]));

    let summary = runtime.step().await.expect("step");
    let snapshot = runtime.handle().query_store().await.expect("query");

    assert_eq!(summary.applied, 2);
    assert_eq!(snapshot.store.get(ActorId(0)).unwrap().flags, ActorFlags::ACTIVE);
    assert_eq!(snapshot.store.get(ActorId(1)).unwrap().flags, ActorFlags::VISIBLE);

    runtime.shutdown().await.expect("shutdown");
}

/// An empty tick advances the counter but leaves the state root alone.
#[tokio::test]
async fn empty_tick_keeps_state_root() {
    let store = ActorStore::from_records([
        ActorData::at(Vec3::new(1.0, 2.0, 3.0)),
        ActorData::default().with_flags(ActorFlags::VISIBLE),
    ])
    .expect("store");
    let expected_root = hex::encode(store.state_root());

    let runtime = Runtime::builder()
        .config(fast_config(8))
        .initial_store(store)
        .build()
        .await
        .expect("runtime should start");
    let handle = runtime.handle();

    let first = handle.tick().await.expect("tick");
    let second = handle.tick().await.expect("tick");

    assert_eq!(first.state_root, expected_root);
    assert_eq!(second.state_root, expected_root);
    assert_eq!(second.tick, Tick(2));
    assert_eq!(second.changed_actors, 0);

    let snapshot = handle.query_store().await.expect("query");
    assert_eq!(snapshot.store.capacity(), 2);

    runtime.shutdown().await.expect("shutdown");
}

/// Shutdown does not wait for outstanding handle clones to drop.
#[tokio::test]
async fn shutdown_completes_with_live_handles() {
    let runtime = Runtime::builder()
        .config(fast_config(1))
        .build()
        .await
        .expect("runtime should start");
    let lingering = runtime.handle();

    tokio::time::timeout(Duration::from_secs(5), runtime.shutdown())
        .await
        .expect("shutdown should not hang")
        .expect("shutdown");

    let result = lingering.add_command(Command::reset(ActorId(0))).await;
    assert!(matches!(result, Err(RuntimeError::CommandChannelClosed)));
    assert!(matches!(
        lingering.tick().await,
        Err(RuntimeError::CommandChannelClosed)
    ));
    assert!(matches!(
        lingering.try_add_command(Command::reset(ActorId(0))),
        Err(RuntimeError::CommandChannelClosed)
    ));
}

#[tokio::test]
async fn invalid_capacity_fails_build() {
    let result = Runtime::builder().config(fast_config(0)).build().await;

    assert!(matches!(result, Err(RuntimeError::Store(_))));
}
