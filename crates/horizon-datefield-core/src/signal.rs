//! Caller-facing notifications.
//!
//! A [`Signal<Args>`] is a list of listeners invoked in connection order on
//! every [`emit`](Signal::emit). The date input exposes `value_changed` and
//! `editing_finished` this way. Delivery is synchronous on the emitting
//! thread.
//!
//! # Example
//!
//! ```
//! use horizon_datefield_core::Signal;
//!
//! let committed = Signal::<String>::new();
//! let id = committed.connect(|text| println!("committed {text}"));
//!
//! committed.emit("2020-01-15".to_string());
//! assert!(committed.disconnect(id));
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::logging::targets;

new_key_type! {
    /// Handle returned by [`Signal::connect`].
    pub struct ConnectionId;
}

type Listener<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// A list of listeners for one kind of event.
///
/// Listeners are snapshotted before delivery, so a listener may connect or
/// disconnect on the same signal while it runs.
pub struct Signal<Args> {
    listeners: Mutex<SlotMap<ConnectionId, Listener<Args>>>,
}

impl<Args: 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: 'static> Signal<Args> {
    pub fn new() -> Self {
        Self {
            listeners: Mutex::new(SlotMap::with_key()),
        }
    }

    /// Add a listener.
    pub fn connect<F>(&self, listener: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let id = self.listeners.lock().insert(Arc::new(listener));
        tracing::trace!(target: targets::SIGNAL, ?id, "listener connected");
        id
    }

    /// Remove a listener. Returns `false` if it was already gone.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.listeners.lock().remove(id).is_some()
    }

    pub fn disconnect_all(&self) {
        self.listeners.lock().clear();
    }

    pub fn connection_count(&self) -> usize {
        self.listeners.lock().len()
    }

    /// Deliver `args` to every listener.
    pub fn emit(&self, args: Args) {
        let snapshot: Vec<Listener<Args>> = self.listeners.lock().values().cloned().collect();
        if snapshot.is_empty() {
            return;
        }
        tracing::trace!(target: targets::SIGNAL, listeners = snapshot.len(), "emit");
        for listener in &snapshot {
            listener(&args);
        }
    }
}

impl<Args> std::fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("listeners", &self.listeners.lock().len())
            .finish()
    }
}

static_assertions::assert_impl_all!(Signal<String>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_listeners_run_in_connection_order() {
        let committed = Signal::<String>::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        for name in ["first", "second"] {
            let log = log.clone();
            committed.connect(move |text: &String| log.lock().push(format!("{name}:{text}")));
        }
        committed.emit("2020-02-15".to_string());

        assert_eq!(*log.lock(), vec!["first:2020-02-15", "second:2020-02-15"]);
    }

    #[test]
    fn test_disconnected_listener_is_skipped() {
        let finished = Signal::<()>::new();
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        let id = finished.connect(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        finished.emit(());
        assert!(finished.disconnect(id));
        assert!(!finished.disconnect(id));
        finished.emit(());

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_disconnect_all() {
        let finished = Signal::<()>::new();
        finished.connect(|_| {});
        finished.connect(|_| {});
        assert_eq!(finished.connection_count(), 2);
        finished.disconnect_all();
        assert_eq!(finished.connection_count(), 0);
    }

    #[test]
    fn test_listener_may_disconnect_itself() {
        let finished = Arc::new(Signal::<()>::new());
        let id = Arc::new(Mutex::new(None));
        let (signal, slot) = (finished.clone(), id.clone());
        *id.lock() = Some(finished.connect(move |_| {
            if let Some(own) = slot.lock().take() {
                signal.disconnect(own);
            }
        }));

        finished.emit(());
        assert_eq!(finished.connection_count(), 0);
    }
}
