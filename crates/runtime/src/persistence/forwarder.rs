//! Ordered hand-off of manager events to a shared [`EventBus`].
//!
//! Every event goes through one unbounded queue drained by a single task, so
//! bus subscribers see manager events in emission order no matter whether the
//! emitting call was sync or async, or which thread it ran on.

use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::events::{DomainEvent, EventBus};

struct Dispatch {
    event: DomainEvent,
    delivered: Option<oneshot::Sender<()>>,
}

pub(crate) struct BusForwarder {
    queue: mpsc::UnboundedSender<Dispatch>,
}

impl BusForwarder {
    /// Spawns the forwarding task on `runtime`. It exits once the forwarder
    /// is dropped and the queue is drained.
    pub(crate) fn spawn(bus: EventBus, runtime: &Handle) -> Self {
        let (queue, mut rx) = mpsc::unbounded_channel::<Dispatch>();
        runtime.spawn(async move {
            while let Some(Dispatch { event, delivered }) = rx.recv().await {
                bus.publish(event).await;
                if let Some(delivered) = delivered {
                    let _ = delivered.send(());
                }
            }
            debug!("Bus forwarder stopped");
        });
        Self { queue }
    }

    /// Queues `event` without waiting. Safe to call from any thread.
    pub(crate) fn send(&self, event: DomainEvent) {
        self.enqueue(event, None);
    }

    /// Queues `event` and waits until every subscriber has handled it, along
    /// with everything queued before it.
    pub(crate) async fn deliver(&self, event: DomainEvent) {
        let (tx, rx) = oneshot::channel();
        if self.enqueue(event, Some(tx)) {
            let _ = rx.await;
        }
    }

    fn enqueue(&self, event: DomainEvent, delivered: Option<oneshot::Sender<()>>) -> bool {
        match self.queue.send(Dispatch { event, delivered }) {
            Ok(()) => true,
            Err(mpsc::error::SendError(dispatch)) => {
                warn!(
                    "Bus forwarder is gone; dropped {}",
                    dispatch.event.event_type()
                );
                false
            }
        }
    }
}
