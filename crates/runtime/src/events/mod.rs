//! In-process publish/subscribe for domain events.
//!
//! [`DomainEvent`] is the immutable envelope that flows through the
//! [`EventBus`] and into persisted audit data. [`EventKind`] names the stable
//! wire vocabulary produced by the engine and the state manager.

mod bus;
mod event;

pub use bus::{
    ErrorReporter, EventBus, HandlerError, HandlerFuture, Subscription, TracingErrorReporter,
};
pub use event::{DomainEvent, EventError, EventKind};
