//! Authoritative snapshot owner and save/load orchestrator.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use guild_core::{GameConfig, GameState, Snapshot};
use parking_lot::RwLock;
use serde_json::json;
use tokio::runtime::Handle;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::codec;
use super::forwarder::BusForwarder;
use super::index::{SaveIndex, SaveMetadata};
use super::listeners::{ListenerId, LocalListeners};
use super::options::GameStateManagerOptions;
use super::{PersistenceError, Result};
use crate::events::{DomainEvent, EventBus, EventKind};
use crate::repository::KeyValueStore;

/// Prefix of every save id; the rest is a timestamp plus a random token.
pub const SAVE_ID_PREFIX: &str = "guild-manager-game-";

const EVENT_SOURCE: &str = "guild-manager.state-manager";

/// Owns the current snapshot and persists it through a [`KeyValueStore`].
///
/// # Notification
///
/// Every event the manager emits (`game.state.manager.updated`, save, load,
/// delete and autosave events) goes to two independent channels:
/// - listeners registered with [`GameStateManager::on_event`], called
///   synchronously in registration order;
/// - the shared [`EventBus`], when one was attached with
///   [`GameStateManager::with_event_bus`]. Bus delivery goes through a single
///   ordered queue, so subscribers see events in emission order. Async
///   operations return after their event has been handled; `set_state` and
///   the autosave toggles only enqueue, and may be called from threads outside
///   the runtime.
///
/// # Concurrency
///
/// Save, delete and eviction read-modify-write the save index under an async
/// mutex, so concurrent saves never lose index entries. The index itself is
/// re-read from the store inside that critical section rather than cached, so
/// other writers sharing the store are observed. The current snapshot is an
/// `Arc` swapped wholesale by [`GameStateManager::set_state`]; a save in
/// flight keeps serializing the snapshot it started with.
pub struct GameStateManager {
    store: Arc<dyn KeyValueStore>,
    options: GameStateManagerOptions,
    current: RwLock<Option<Arc<Snapshot>>>,
    index_lock: Mutex<()>,
    listeners: LocalListeners,
    runtime: Option<Handle>,
    forwarder: Option<BusForwarder>,
    auto_save: AtomicBool,
}

impl GameStateManager {
    /// Opens a manager over `store`, validating the existing save index.
    pub async fn open(
        store: Arc<dyn KeyValueStore>,
        options: GameStateManagerOptions,
    ) -> Result<Self> {
        let index = SaveIndex::load(store.as_ref()).await?;
        info!(
            "GameStateManager opened: saves={}, compression={}, max_saves={}",
            index.len(),
            options.enable_compression,
            options.effective_max_saves()
        );

        Ok(Self {
            store,
            options,
            current: RwLock::new(None),
            index_lock: Mutex::new(()),
            listeners: LocalListeners::new(),
            runtime: Handle::try_current().ok(),
            forwarder: None,
            auto_save: AtomicBool::new(false),
        })
    }

    /// Additionally publishes every manager event on `bus`.
    ///
    /// The forwarding task runs on the tokio runtime the manager was opened
    /// on.
    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        match self.runtime.clone().or_else(|| Handle::try_current().ok()) {
            Some(runtime) => self.forwarder = Some(BusForwarder::spawn(bus, &runtime)),
            None => warn!("No tokio runtime available; manager events will not reach the bus"),
        }
        self
    }

    pub fn options(&self) -> &GameStateManagerOptions {
        &self.options
    }

    /// The current snapshot, if one has been set.
    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.current.read().clone()
    }

    /// Replaces the current snapshot and notifies listeners.
    ///
    /// Local listeners run before this returns; bus delivery is queued. No
    /// store access happens here.
    pub fn set_state(&self, state: GameState, config: GameConfig) {
        let state_id = state.id.clone();
        *self.current.write() = Some(Arc::new(Snapshot::new(state, config)));
        debug!("Current state replaced: {}", state_id);

        let event = event(EventKind::StateManagerUpdated).with_data(json!({ "stateId": state_id }));
        self.emit_queued(event);
    }

    /// Persists the current snapshot as a new save and returns its id.
    pub async fn save_game(&self, name: Option<&str>) -> Result<String> {
        let snapshot = self.current().ok_or(PersistenceError::NoActiveState)?;
        self.save_snapshot(&snapshot, name.map(str::to_owned)).await
    }

    /// Reads and decodes a save. The current snapshot is left untouched; call
    /// [`GameStateManager::set_state`] to make the loaded save active.
    pub async fn load_game(&self, id: &str) -> Result<Snapshot> {
        if is_reserved(id) {
            return Err(PersistenceError::SaveNotFound { id: id.to_owned() });
        }
        let payload = self
            .store
            .load(id)
            .await?
            .ok_or_else(|| PersistenceError::SaveNotFound { id: id.to_owned() })?;
        let snapshot = codec::decode(&payload)?;
        info!(
            "Loaded save {} (compressed={})",
            id,
            codec::is_compressed(&payload)
        );

        self.emit(event(EventKind::SaveLoaded).with_data(json!({ "id": id })))
            .await;
        Ok(snapshot)
    }

    /// Removes a save's blob and index entry. Deleting an unknown id succeeds.
    pub async fn delete_save(&self, id: &str) -> Result<()> {
        if is_reserved(id) {
            warn!("Refusing to delete reserved key {}", id);
            return Ok(());
        }

        let existed = {
            let _guard = self.index_lock.lock().await;
            let mut index = SaveIndex::load(self.store.as_ref()).await?;
            let existed = index.remove(id).is_some();
            if existed {
                // Unlist first; a blob left behind is only an orphan.
                index.persist(self.store.as_ref()).await?;
                if let Err(e) = self.store.delete(id).await {
                    warn!("Failed to delete blob of save {}: {}", id, e);
                }
            } else {
                self.store.delete(id).await?;
            }
            existed
        };
        info!("Deleted save {} (indexed={})", id, existed);

        self.emit(
            event(EventKind::SaveDeleted).with_data(json!({ "id": id, "reason": "deleted" })),
        )
        .await;
        Ok(())
    }

    /// Index entries, most recent first.
    pub async fn save_list(&self) -> Result<Vec<SaveMetadata>> {
        let _guard = self.index_lock.lock().await;
        let index = SaveIndex::load(self.store.as_ref()).await?;
        Ok(index.newest_first())
    }

    pub fn enable_auto_save(&self) {
        self.auto_save.store(true, Ordering::SeqCst);
        info!("Autosave enabled");
        self.emit_queued(event(EventKind::AutoSaveEnabled));
    }

    pub fn disable_auto_save(&self) {
        self.auto_save.store(false, Ordering::SeqCst);
        info!("Autosave disabled");
        self.emit_queued(event(EventKind::AutoSaveDisabled));
    }

    pub fn is_auto_save_enabled(&self) -> bool {
        self.auto_save.load(Ordering::SeqCst)
    }

    /// One autosave step, meant to be driven by an external timer.
    ///
    /// Returns the new save id, or `None` when autosave is disabled or there
    /// is no current snapshot. Neither case is an error.
    pub async fn auto_save_tick(&self) -> Result<Option<String>> {
        if !self.is_auto_save_enabled() {
            debug!("Autosave tick skipped: disabled");
            return Ok(None);
        }
        let Some(snapshot) = self.current() else {
            debug!("Autosave tick skipped: no current state");
            return Ok(None);
        };

        let id = self.save_snapshot(&snapshot, None).await?;
        self.emit(event(EventKind::AutoSaveCompleted).with_data(json!({ "id": id })))
            .await;
        Ok(Some(id))
    }

    /// Registers a synchronous listener for every event this manager emits.
    pub fn on_event<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&DomainEvent) + Send + Sync + 'static,
    {
        self.listeners.add(listener)
    }

    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    async fn save_snapshot(&self, snapshot: &Snapshot, title: Option<String>) -> Result<String> {
        let id = new_save_id();
        let payload = codec::encode(snapshot, self.options.enable_compression)?;

        let evicted = {
            let _guard = self.index_lock.lock().await;
            let mut index = SaveIndex::load(self.store.as_ref()).await?;

            self.store.save(&id, &payload).await?;
            index.push(SaveMetadata {
                id: id.clone(),
                title: title.clone(),
                timestamp: Utc::now(),
            });
            let evicted = index.evict_over(self.options.effective_max_saves());
            index.persist(self.store.as_ref()).await?;

            // The index no longer references these, so a failed delete only
            // leaves an orphaned blob behind.
            for entry in &evicted {
                if let Err(e) = self.store.delete(&entry.id).await {
                    warn!("Failed to delete evicted save {}: {}", entry.id, e);
                }
            }
            evicted
        };

        info!(
            "Created save {} ({} bytes, evicted {})",
            id,
            payload.len(),
            evicted.len()
        );

        for entry in evicted {
            self.emit(
                event(EventKind::SaveDeleted)
                    .with_data(json!({ "id": entry.id, "reason": "evicted" })),
            )
            .await;
        }
        self.emit(event(EventKind::SaveCreated).with_data(json!({ "id": id, "title": title })))
            .await;

        Ok(id)
    }

    async fn emit(&self, event: DomainEvent) {
        self.listeners.notify(&event);
        if let Some(forwarder) = &self.forwarder {
            forwarder.deliver(event).await;
        }
    }

    fn emit_queued(&self, event: DomainEvent) {
        self.listeners.notify(&event);
        if let Some(forwarder) = &self.forwarder {
            forwarder.send(event);
        }
    }
}

fn event(kind: EventKind) -> DomainEvent {
    DomainEvent::new(kind, EVENT_SOURCE)
}

fn is_reserved(id: &str) -> bool {
    id == SaveIndex::KEY
}

fn new_save_id() -> String {
    format!(
        "{SAVE_ID_PREFIX}{}-{}",
        Utc::now().timestamp_millis(),
        Uuid::new_v4().simple()
    )
}
