use std::sync::Arc;
use std::time::Duration;

use guild_core::{Difficulty, GameConfig, GameState, ItemId, Position};
use guild_runtime::{
    DomainEvent, EventBus, EventKind, FileStore, GameStateManager, GameStateManagerOptions,
    HandlerError, InMemoryStore, KeyValueStore, PersistenceError, SAVE_ID_PREFIX, SaveIndex,
    Subscription,
};
use parking_lot::Mutex;
use tempfile::TempDir;

fn sample_state() -> GameState {
    GameState::new("session-42", 90)
        .with_level(4)
        .with_score(3_870)
        .with_inventory(vec![
            ItemId::from("guild-charter"),
            ItemId::from("iron-key"),
            ItemId::from("iron-key"),
        ])
        .with_position(Position::new(12.125, -0.3))
}

fn sample_config() -> GameConfig {
    GameConfig {
        max_level: 25,
        initial_health: 90,
        score_multiplier: 1.1,
        auto_save: true,
        difficulty: Difficulty::Hard,
    }
}

async fn open_with(
    store: Arc<InMemoryStore>,
    options: GameStateManagerOptions,
) -> GameStateManager {
    GameStateManager::open(store, options)
        .await
        .expect("manager should open")
}

fn record_events(manager: &GameStateManager) -> Arc<Mutex<Vec<DomainEvent>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    manager.on_event(move |event| sink.lock().push(event.clone()));
    seen
}

fn types(events: &[DomainEvent]) -> Vec<String> {
    events.iter().map(|e| e.event_type().to_owned()).collect()
}

#[tokio::test]
async fn test_round_trip_under_both_encodings() {
    for compress in [false, true] {
        let store = Arc::new(InMemoryStore::new());
        let manager = open_with(
            store.clone(),
            GameStateManagerOptions::new().with_compression(compress),
        )
        .await;
        let (state, config) = (sample_state(), sample_config());
        manager.set_state(state.clone(), config.clone());

        let id = manager.save_game(Some("Harbor district")).await.unwrap();
        let loaded = manager.load_game(&id).await.unwrap();

        assert!(id.starts_with(SAVE_ID_PREFIX));
        assert_eq!(loaded.state, state, "compress={compress}");
        assert_eq!(loaded.config, config, "compress={compress}");

        let blob = store.load(&id).await.unwrap().unwrap();
        assert_eq!(blob.starts_with("gz:"), compress);
    }
}

#[tokio::test]
async fn test_load_does_not_replace_current_state() {
    let manager = open_with(Arc::new(InMemoryStore::new()), Default::default()).await;
    manager.set_state(sample_state(), sample_config());
    let id = manager.save_game(None).await.unwrap();

    manager.set_state(GameState::new("other", 10), GameConfig::new());
    let loaded = manager.load_game(&id).await.unwrap();

    assert_eq!(loaded.state.id, "session-42");
    assert_eq!(manager.current().unwrap().state.id, "other");
}

#[tokio::test]
async fn test_save_list_is_newest_first() {
    let manager = open_with(Arc::new(InMemoryStore::new()), Default::default()).await;
    manager.set_state(sample_state(), sample_config());

    let mut ids = Vec::new();
    for title in ["first", "second", "third"] {
        ids.push(manager.save_game(Some(title)).await.unwrap());
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let saves = manager.save_list().await.unwrap();
    let listed: Vec<_> = saves.iter().map(|s| s.id.clone()).collect();
    ids.reverse();
    assert_eq!(listed, ids);
    assert_eq!(saves[0].title.as_deref(), Some("third"));
    assert!(saves[0].timestamp > saves[1].timestamp);
    assert!(saves[1].timestamp > saves[2].timestamp);
}

#[tokio::test]
async fn test_eviction_keeps_limit_and_removes_oldest_blob() {
    let store = Arc::new(InMemoryStore::new());
    let manager = open_with(store.clone(), GameStateManagerOptions::new().with_max_saves(2)).await;
    let events = record_events(&manager);
    manager.set_state(sample_state(), sample_config());

    let oldest = manager.save_game(Some("one")).await.unwrap();
    tokio::time::sleep(Duration::from_millis(2)).await;
    let middle = manager.save_game(Some("two")).await.unwrap();
    tokio::time::sleep(Duration::from_millis(2)).await;
    let newest = manager.save_game(Some("three")).await.unwrap();

    let saves = manager.save_list().await.unwrap();
    let listed: Vec<_> = saves.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(listed, vec![newest.as_str(), middle.as_str()]);
    assert!(matches!(
        manager.load_game(&oldest).await,
        Err(PersistenceError::SaveNotFound { id }) if id == oldest
    ));
    assert!(!store.contains_key(&oldest));

    let events = events.lock();
    let evicted: Vec<_> = events
        .iter()
        .filter(|e| e.is(EventKind::SaveDeleted))
        .collect();
    assert_eq!(evicted.len(), 1);
    assert_eq!(evicted[0].data().unwrap()["id"], oldest.as_str());
    assert_eq!(evicted[0].data().unwrap()["reason"], "evicted");
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let store = Arc::new(InMemoryStore::new());
    let manager = open_with(store.clone(), Default::default()).await;
    manager.set_state(sample_state(), sample_config());
    let keep = manager.save_game(Some("keep")).await.unwrap();
    let doomed = manager.save_game(Some("doomed")).await.unwrap();

    manager.delete_save(&doomed).await.unwrap();
    manager.delete_save(&doomed).await.unwrap();
    manager.delete_save("guild-manager-game-never-existed").await.unwrap();

    let saves = manager.save_list().await.unwrap();
    assert_eq!(saves.len(), 1);
    assert_eq!(saves[0].id, keep);
    assert!(matches!(
        manager.load_game(&doomed).await,
        Err(PersistenceError::SaveNotFound { .. })
    ));
    assert!(!store.contains_key(&doomed));
}

#[tokio::test]
async fn test_load_unknown_id() {
    let manager = open_with(Arc::new(InMemoryStore::new()), Default::default()).await;

    let err = manager.load_game("guild-manager-game-missing").await.unwrap_err();
    assert!(matches!(err, PersistenceError::SaveNotFound { id } if id == "guild-manager-game-missing"));
}

#[tokio::test]
async fn test_autosave_tick() {
    let manager = open_with(Arc::new(InMemoryStore::new()), Default::default()).await;
    let events = record_events(&manager);

    // Enabled but nothing to save yet.
    manager.enable_auto_save();
    assert_eq!(manager.auto_save_tick().await.unwrap(), None);

    manager.set_state(sample_state(), sample_config());
    manager.disable_auto_save();
    assert_eq!(manager.auto_save_tick().await.unwrap(), None);
    assert!(manager.save_list().await.unwrap().is_empty());

    manager.enable_auto_save();
    for expected in 1..=3 {
        let id = manager.auto_save_tick().await.unwrap().expect("tick should save");
        let saves = manager.save_list().await.unwrap();
        assert_eq!(saves.len(), expected);
        assert_eq!(saves[0].id, id);
        assert_eq!(saves[0].title, None);
    }

    let seen = types(&events.lock());
    assert_eq!(seen.iter().filter(|t| *t == "game.autosave.completed").count(), 3);
    assert_eq!(seen.iter().filter(|t| *t == "game.autosave.enabled").count(), 2);
    assert_eq!(seen.iter().filter(|t| *t == "game.autosave.disabled").count(), 1);
}

#[tokio::test]
async fn test_set_state_notifies_each_listener_once() {
    let manager = open_with(Arc::new(InMemoryStore::new()), Default::default()).await;
    let first = record_events(&manager);
    let second = record_events(&manager);

    manager.set_state(sample_state(), sample_config());

    // Listeners ran before set_state returned.
    for seen in [&first, &second] {
        let events = seen.lock();
        assert_eq!(types(&events), vec!["game.state.manager.updated"]);
        assert_eq!(events[0].data().unwrap()["stateId"], "session-42");
    }

    manager.set_state(sample_state(), sample_config());
    assert_eq!(first.lock().len(), 2);
    assert_eq!(second.lock().len(), 2);
}

#[tokio::test]
async fn test_local_listeners_see_every_manager_event() {
    let manager = open_with(Arc::new(InMemoryStore::new()), Default::default()).await;
    let events = record_events(&manager);

    manager.set_state(sample_state(), sample_config());
    let id = manager.save_game(None).await.unwrap();
    manager.load_game(&id).await.unwrap();
    manager.delete_save(&id).await.unwrap();
    manager.enable_auto_save();
    manager.disable_auto_save();

    assert_eq!(
        types(&events.lock()),
        vec![
            "game.state.manager.updated",
            "game.save.created",
            "game.save.loaded",
            "game.save.deleted",
            "game.autosave.enabled",
            "game.autosave.disabled",
        ]
    );
}

#[tokio::test]
async fn test_removed_listener_is_silent() {
    let manager = open_with(Arc::new(InMemoryStore::new()), Default::default()).await;
    let calls = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&calls);
    let id = manager.on_event(move |_| *counter.lock() += 1);

    assert!(manager.remove_listener(id));
    manager.set_state(sample_state(), sample_config());

    assert_eq!(*calls.lock(), 0);
}

fn bus_recorder(bus: &EventBus) -> (Arc<Mutex<Vec<String>>>, Subscription) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let subscription = bus.subscribe(move |event: Arc<DomainEvent>| {
        sink.lock().push(event.event_type().to_owned());
        async { Ok::<(), HandlerError>(()) }
    });
    (seen, subscription)
}

#[tokio::test]
async fn test_bus_receives_manager_events_in_emission_order() {
    let bus = EventBus::new();
    let (seen, _subscription) = bus_recorder(&bus);
    let manager = open_with(Arc::new(InMemoryStore::new()), Default::default())
        .await
        .with_event_bus(bus);

    manager.set_state(sample_state(), sample_config());
    manager.enable_auto_save();
    let id = manager.save_game(None).await.unwrap();
    manager.disable_auto_save();
    manager.load_game(&id).await.unwrap();
    manager.delete_save(&id).await.unwrap();

    // Awaited operations return once their event, and everything queued
    // before it, has been delivered.
    assert_eq!(
        *seen.lock(),
        vec![
            "game.state.manager.updated",
            "game.autosave.enabled",
            "game.save.created",
            "game.autosave.disabled",
            "game.save.loaded",
            "game.save.deleted",
        ]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_sync_calls_from_plain_thread_reach_bus() {
    let bus = EventBus::new();
    let (seen, _subscription) = bus_recorder(&bus);
    let manager = Arc::new(
        open_with(Arc::new(InMemoryStore::new()), Default::default())
            .await
            .with_event_bus(bus),
    );

    let ui = {
        let manager = Arc::clone(&manager);
        std::thread::spawn(move || {
            assert!(tokio::runtime::Handle::try_current().is_err());
            manager.set_state(sample_state(), sample_config());
            manager.enable_auto_save();
        })
    };
    tokio::task::spawn_blocking(move || ui.join().unwrap())
        .await
        .unwrap();

    let id = manager.auto_save_tick().await.unwrap().expect("tick should save");

    assert!(id.starts_with(SAVE_ID_PREFIX));
    assert_eq!(
        *seen.lock(),
        vec![
            "game.state.manager.updated",
            "game.autosave.enabled",
            "game.save.created",
            "game.autosave.completed",
        ]
    );
}

#[tokio::test]
async fn test_non_finite_state_is_rejected_before_writing() {
    let store = Arc::new(InMemoryStore::new());
    let manager = open_with(store.clone(), Default::default()).await;
    let state = sample_state().with_position(Position::new(f64::NAN, f64::INFINITY));
    manager.set_state(state, sample_config());

    assert!(matches!(
        manager.save_game(None).await,
        Err(PersistenceError::Serialization(_))
    ));
    assert!(manager.save_list().await.unwrap().is_empty());
    assert!(store.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_saves_do_not_lose_index_entries() {
    let manager = Arc::new(
        open_with(
            Arc::new(InMemoryStore::new()),
            GameStateManagerOptions::new().with_max_saves(100),
        )
        .await,
    );
    manager.set_state(sample_state(), sample_config());

    let tasks: Vec<_> = (0..16)
        .map(|n| {
            let manager = Arc::clone(&manager);
            tokio::spawn(async move { manager.save_game(Some(&format!("save {n}"))).await })
        })
        .collect();

    let mut ids = Vec::new();
    for task in tasks {
        ids.push(task.await.unwrap().unwrap());
    }

    let saves = manager.save_list().await.unwrap();
    assert_eq!(saves.len(), 16);
    for id in &ids {
        assert!(saves.iter().any(|s| &s.id == id), "{id} missing from index");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_saves_respect_retention() {
    let manager = Arc::new(
        open_with(
            Arc::new(InMemoryStore::new()),
            GameStateManagerOptions::new().with_max_saves(3),
        )
        .await,
    );
    manager.set_state(sample_state(), sample_config());

    let tasks: Vec<_> = (0..12)
        .map(|_| {
            let manager = Arc::clone(&manager);
            tokio::spawn(async move { manager.save_game(None).await })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let saves = manager.save_list().await.unwrap();
    assert_eq!(saves.len(), 3);
    for save in &saves {
        manager.load_game(&save.id).await.unwrap();
    }
}

#[tokio::test]
async fn test_file_store_index_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let options = GameStateManagerOptions::new().with_compression(true);

    let id = {
        let store = Arc::new(FileStore::new(temp_dir.path()).unwrap());
        let manager = GameStateManager::open(store, options.clone()).await.unwrap();
        manager.set_state(sample_state(), sample_config());
        manager.save_game(Some("Before the vault")).await.unwrap()
    };

    let store = Arc::new(FileStore::new(temp_dir.path()).unwrap());
    let manager = GameStateManager::open(store, options).await.unwrap();

    assert!(manager.current().is_none());
    let saves = manager.save_list().await.unwrap();
    assert_eq!(saves.len(), 1);
    assert_eq!(saves[0].id, id);
    assert_eq!(saves[0].title.as_deref(), Some("Before the vault"));

    let loaded = manager.load_game(&id).await.unwrap();
    assert_eq!(loaded.state, sample_state_with(&loaded.state));
    assert!(temp_dir.path().join(format!("{}.sav", SaveIndex::KEY)).exists());
}

#[tokio::test]
async fn test_store_outage_surfaces_and_recovers() {
    let store = Arc::new(InMemoryStore::new());
    let manager = open_with(store.clone(), Default::default()).await;
    manager.set_state(sample_state(), sample_config());

    store.set_available(false);
    assert!(matches!(
        manager.save_game(None).await,
        Err(PersistenceError::StoreUnavailable(_))
    ));
    assert!(matches!(
        manager.delete_save("guild-manager-game-x").await,
        Err(PersistenceError::StoreUnavailable(_))
    ));

    store.set_available(true);
    assert!(manager.save_list().await.unwrap().is_empty());
    manager.save_game(None).await.unwrap();
    assert_eq!(manager.save_list().await.unwrap().len(), 1);
}

/// `sample_state()` with the timestamp of `loaded`, since each call reads the clock.
fn sample_state_with(loaded: &GameState) -> GameState {
    GameState {
        timestamp: loaded.timestamp,
        ..sample_state()
    }
}
