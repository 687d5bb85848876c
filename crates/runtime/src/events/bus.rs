//! Fan-out event bus implementation.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use futures::FutureExt;
use futures::future::{BoxFuture, join_all};
use parking_lot::RwLock;
use thiserror::Error;

use super::event::DomainEvent;

/// Error type returned by event handlers.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Completion signal returned by event handlers.
pub type HandlerFuture = BoxFuture<'static, Result<(), HandlerError>>;

type Handler = Arc<dyn Fn(Arc<DomainEvent>) -> HandlerFuture + Send + Sync>;

/// Receives handler failures so they are never silently swallowed.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, event: &DomainEvent, error: &HandlerError);
}

/// Default reporter: logs the failure at error level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingErrorReporter;

impl ErrorReporter for TracingErrorReporter {
    fn report(&self, event: &DomainEvent, error: &HandlerError) {
        tracing::error!(
            event_type = event.event_type(),
            event_id = event.id(),
            "event handler failed: {}",
            error
        );
    }
}

#[derive(Debug, Error)]
#[error("event handler panicked: {0}")]
struct HandlerPanic(String);

impl HandlerPanic {
    fn from_payload(payload: Box<dyn Any + Send>) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_owned())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_owned());
        Self(message)
    }
}

/// Ordered handler list shared between the bus and its subscriptions.
#[derive(Default)]
struct Registry {
    next_id: AtomicU64,
    handlers: RwLock<Vec<(u64, Handler)>>,
}

impl Registry {
    fn insert(&self, handler: Handler) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.handlers.write().push((id, handler));
        id
    }

    fn remove(&self, id: u64) -> bool {
        let mut handlers = self.handlers.write();
        let before = handlers.len();
        handlers.retain(|(handler_id, _)| *handler_id != id);
        handlers.len() != before
    }

    fn snapshot(&self) -> Vec<Handler> {
        self.handlers
            .read()
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect()
    }
}

/// Process-wide publish/subscribe bus.
///
/// Every publish takes a snapshot of the handler list before invoking anything,
/// so subscribing or disposing during an in-flight publish never blocks or
/// races it. Handlers run concurrently and [`EventBus::publish`] waits for all
/// of them. A failing or panicking handler is isolated: the remaining handlers
/// still run, and the failure goes to the configured [`ErrorReporter`] instead
/// of the publisher.
///
/// Cloning is cheap; clones share the same subscriber list.
#[derive(Clone)]
pub struct EventBus {
    registry: Arc<Registry>,
    reporter: Arc<dyn ErrorReporter>,
}

impl EventBus {
    /// Creates a bus that reports handler failures through `tracing`.
    pub fn new() -> Self {
        Self::with_reporter(Arc::new(TracingErrorReporter))
    }

    pub fn with_reporter(reporter: Arc<dyn ErrorReporter>) -> Self {
        Self {
            registry: Arc::new(Registry::default()),
            reporter,
        }
    }

    /// Registers `handler` for every subsequent publish.
    ///
    /// The handler stays registered until the returned [`Subscription`] is
    /// disposed or dropped.
    pub fn subscribe<F, Fut>(&self, handler: F) -> Subscription
    where
        F: Fn(Arc<DomainEvent>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    {
        let handler: Handler =
            Arc::new(move |event: Arc<DomainEvent>| -> HandlerFuture { handler(event).boxed() });
        let id = self.registry.insert(handler);
        tracing::trace!(subscription = id, "event handler subscribed");
        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Delivers `event` to every current subscriber and waits for all of them.
    pub async fn publish(&self, event: DomainEvent) {
        let event = Arc::new(event);
        let handlers = self.registry.snapshot();
        if handlers.is_empty() {
            tracing::trace!(event_type = event.event_type(), "no subscribers");
            return;
        }

        let deliveries: Vec<HandlerFuture> = handlers
            .into_iter()
            .map(|handler| deliver(handler, Arc::clone(&event)))
            .collect();

        let outcomes = join_all(deliveries).await;
        tracing::trace!(
            event_type = event.event_type(),
            handlers = outcomes.len(),
            "event delivered"
        );
        for error in outcomes.iter().filter_map(|outcome| outcome.as_ref().err()) {
            self.reporter.report(&event, error);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry.handlers.read().len()
    }
}

/// Runs one handler, turning a panic into a reported failure.
fn deliver(handler: Handler, event: Arc<DomainEvent>) -> HandlerFuture {
    AssertUnwindSafe(async move { handler(event).await })
        .catch_unwind()
        .map(|outcome| match outcome {
            Ok(result) => result,
            Err(payload) => Err(Box::new(HandlerPanic::from_payload(payload)) as HandlerError),
        })
        .boxed()
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to a registered handler.
///
/// Disposing (or dropping) it unregisters the handler. Disposal is
/// idempotent. A publish that had already snapshotted the handler list may
/// still deliver once more.
#[must_use = "dropping a Subscription unsubscribes its handler"]
pub struct Subscription {
    id: u64,
    registry: Weak<Registry>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn dispose(&self) {
        if let Some(registry) = self.registry.upgrade()
            && registry.remove(self.id)
        {
            tracing::trace!(subscription = self.id, "event handler disposed");
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.dispose();
    }
}
