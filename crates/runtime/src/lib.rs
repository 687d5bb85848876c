//! Persistence and lifecycle runtime for the guild manager game.
//!
//! This crate wires the engine-agnostic domain from `guild-core` to
//! notification and storage. Consumers embed a [`GameStateManager`] to save,
//! load and autosave snapshots, subscribe to the [`EventBus`] for gameplay and
//! persistence events, and drive sessions through [`GameEngineCore`].
//!
//! Modules are organized by responsibility:
//! - [`events`] provides the domain event envelope and the fan-out bus
//! - [`repository`] defines the key-value store port and its adapters
//! - [`persistence`] hosts the state manager, save index and payload codec
//! - [`engine`] orchestrates gameplay services and publishes their events
//! - [`workers`] holds the optional autosave scheduler
//! - [`config`] loads runtime settings from the environment
pub mod config;
pub mod engine;
pub mod events;
pub mod persistence;
pub mod repository;
pub mod workers;

pub use config::RuntimeConfig;
pub use engine::{EngineError, GameEngineCore};
pub use events::{
    DomainEvent, ErrorReporter, EventBus, EventError, EventKind, HandlerError, Subscription,
    TracingErrorReporter,
};
pub use persistence::{
    GameStateManager, GameStateManagerOptions, ListenerId, PersistenceError, SAVE_ID_PREFIX,
    SaveIndex, SaveMetadata,
};
pub use repository::{FileStore, InMemoryStore, KeyValueStore, StoreError};
pub use workers::{AutoSaveHandle, AutoSaveWorker};
