use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tracing::{debug, warn};

use dicelog_types::{EventLevel, EventRecord, Keywords, LevelThreshold};

use crate::listener::{Listener, SourceObserver};
use crate::source::EventSource;

/// Opaque handle returned by [`EventChannel::register_listener`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegistrationHandle(u64);

impl fmt::Display for RegistrationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "reg:{}", self.0)
    }
}

/// A listener bound to one source name with a level threshold.
#[derive(Clone)]
struct Registration {
    handle: RegistrationHandle,
    source_name: String,
    threshold: LevelThreshold,
    listener: Arc<dyn Listener>,
}

impl Registration {
    fn accepts(&self, source_name: &str, level: EventLevel) -> bool {
        self.source_name == source_name
            && self.threshold.admits(level)
            && self.listener.matches(source_name, level)
    }

    fn is_same(&self, source_name: &str, listener: &Arc<dyn Listener>) -> bool {
        self.source_name == source_name && same_listener(&self.listener, listener)
    }
}

/// Pointer identity of two listeners, ignoring vtable metadata.
fn same_listener(a: &Arc<dyn Listener>, b: &Arc<dyn Listener>) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}

/// Fan-out router holding the listener set.
///
/// The set is copy-on-write: publishers clone the current `Arc` under a short
/// read lock and dispatch without holding any lock, so a publish always sees
/// a complete set from before or after any register/unregister, and
/// listeners may re-enter the channel from `on_event`.
struct ListenerRouter {
    registrations: RwLock<Arc<Vec<Registration>>>,
    next_handle: AtomicU64,
}

impl ListenerRouter {
    fn new() -> Self {
        Self {
            registrations: RwLock::new(Arc::new(Vec::new())),
            next_handle: AtomicU64::new(1),
        }
    }

    fn snapshot(&self) -> Arc<Vec<Registration>> {
        let guard = self
            .registrations
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    fn register(
        &self,
        source_name: &str,
        listener: Arc<dyn Listener>,
        threshold: LevelThreshold,
    ) -> RegistrationHandle {
        let mut guard = self
            .registrations
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(existing) = guard.iter().find(|r| r.is_same(source_name, &listener)) {
            debug!(
                handle = %existing.handle,
                source = source_name,
                listener = listener.name(),
                "listener already registered"
            );
            return existing.handle;
        }

        let handle = RegistrationHandle(self.next_handle.fetch_add(1, Ordering::Relaxed));
        debug!(
            handle = %handle,
            source = source_name,
            listener = listener.name(),
            threshold = %threshold,
            "listener registered"
        );
        Arc::make_mut(&mut *guard).push(Registration {
            handle,
            source_name: source_name.to_string(),
            threshold,
            listener,
        });
        handle
    }

    fn unregister(&self, handle: RegistrationHandle) -> bool {
        let mut guard = self
            .registrations
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        let Some(pos) = guard.iter().position(|r| r.handle == handle) else {
            return false;
        };
        Arc::make_mut(&mut *guard).remove(pos);
        debug!(handle = %handle, "listener unregistered");
        true
    }
}

/// Registry of created source names and the observers watching for them.
///
/// Both live under one lock so a source created concurrently with a
/// `watch_sources` call is announced to that observer exactly once.
#[derive(Default)]
struct SourceRegistry {
    names: Vec<String>,
    observers: Vec<Arc<dyn SourceObserver>>,
}

struct ChannelInner {
    router: ListenerRouter,
    sources: Mutex<SourceRegistry>,
    failures: AtomicU64,
}

/// Synchronous publish/subscribe channel for structured events.
///
/// Cloning is cheap and yields another handle to the same channel; pass it
/// to producers and consumers instead of relying on global state.
///
/// Every operation is infallible from the caller's point of view. Listener
/// errors and panics are caught at the dispatch boundary, reported through
/// `tracing`, and counted in [`failure_count`](Self::failure_count).
#[derive(Clone)]
pub struct EventChannel {
    inner: Arc<ChannelInner>,
}

impl EventChannel {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ChannelInner {
                router: ListenerRouter::new(),
                sources: Mutex::new(SourceRegistry::default()),
                failures: AtomicU64::new(0),
            }),
        }
    }

    /// Publish one event.
    ///
    /// Builds an [`EventRecord`] stamped with the current time and calling
    /// thread, then invokes each matching listener in registration order on
    /// the calling thread. When nothing matches, no record is built.
    pub fn publish(
        &self,
        source_name: &str,
        level: EventLevel,
        message: impl Into<String>,
        keywords: Keywords,
        exception_detail: Option<String>,
    ) {
        let registrations = self.inner.router.snapshot();
        let mut targets = registrations
            .iter()
            .filter(|r| r.accepts(source_name, level))
            .peekable();
        if targets.peek().is_none() {
            return;
        }

        let record = EventRecord::capture(source_name, level, message, keywords, exception_detail);
        for registration in targets {
            self.dispatch(registration, &record);
        }
    }

    /// Deliver an already-built record to the matching listeners.
    ///
    /// Returns the number of listeners that were invoked.
    pub fn publish_record(&self, record: &EventRecord) -> usize {
        let registrations = self.inner.router.snapshot();
        let mut delivered = 0;
        for registration in registrations
            .iter()
            .filter(|r| r.accepts(record.source_name(), record.level()))
        {
            self.dispatch(registration, record);
            delivered += 1;
        }
        delivered
    }

    fn dispatch(&self, registration: &Registration, record: &EventRecord) {
        let listener = &registration.listener;
        match panic::catch_unwind(AssertUnwindSafe(|| listener.on_event(record))) {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                self.inner.failures.fetch_add(1, Ordering::Relaxed);
                warn!(
                    handle = %registration.handle,
                    listener = listener.name(),
                    source = record.source_name(),
                    error = %err,
                    "listener failed to handle event"
                );
            }
            Err(payload) => {
                self.inner.failures.fetch_add(1, Ordering::Relaxed);
                warn!(
                    handle = %registration.handle,
                    listener = listener.name(),
                    source = record.source_name(),
                    panic = panic_message(payload.as_ref()),
                    "listener panicked while handling event"
                );
            }
        }
    }

    /// Register `listener` for records from `source_name` that pass `threshold`.
    ///
    /// The listener receives every publish that starts after this returns.
    /// Registering the same listener for the same source again returns the
    /// existing handle and does not cause duplicate delivery.
    pub fn register_listener(
        &self,
        source_name: &str,
        listener: Arc<dyn Listener>,
        threshold: LevelThreshold,
    ) -> RegistrationHandle {
        self.inner.router.register(source_name, listener, threshold)
    }

    /// Remove a registration. Unknown or already-removed handles are ignored.
    pub fn unregister_listener(&self, handle: RegistrationHandle) {
        self.inner.router.unregister(handle);
    }

    /// Create (or re-open) a named source and return a producer handle for it.
    ///
    /// The first creation of a name is announced to every [`SourceObserver`].
    pub fn create_source(&self, name: &str) -> EventSource {
        let observers = {
            let mut sources = self
                .inner
                .sources
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if sources.names.iter().any(|n| n == name) {
                None
            } else {
                sources.names.push(name.to_string());
                Some(sources.observers.clone())
            }
        };

        if let Some(observers) = observers {
            debug!(source = name, observers = observers.len(), "event source created");
            for observer in observers {
                self.notify_observer(observer, name);
            }
        }

        EventSource::new(name, self.clone())
    }

    /// Watch for source creation. Existing sources are replayed first.
    pub fn watch_sources(&self, observer: Arc<dyn SourceObserver>) {
        let existing = {
            let mut sources = self
                .inner
                .sources
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            sources.observers.push(Arc::clone(&observer));
            sources.names.clone()
        };

        for name in existing {
            self.notify_observer(Arc::clone(&observer), &name);
        }
    }

    fn notify_observer(&self, observer: Arc<dyn SourceObserver>, name: &str) {
        let outcome =
            panic::catch_unwind(AssertUnwindSafe(|| observer.on_source_created(self, name)));
        if let Err(payload) = outcome {
            self.inner.failures.fetch_add(1, Ordering::Relaxed);
            warn!(
                source = name,
                panic = panic_message(payload.as_ref()),
                "source observer panicked"
            );
        }
    }

    /// Names of all sources created so far, in creation order.
    pub fn sources(&self) -> Vec<String> {
        self.inner
            .sources
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .names
            .clone()
    }

    /// Returns `true` if some registration would accept `level` from `source_name`.
    pub fn is_enabled(&self, source_name: &str, level: EventLevel) -> bool {
        self.inner
            .router
            .snapshot()
            .iter()
            .any(|r| r.accepts(source_name, level))
    }

    /// Total number of active registrations.
    pub fn listener_count(&self) -> usize {
        self.inner.router.snapshot().len()
    }

    /// Number of active registrations for one source.
    pub fn listener_count_for(&self, source_name: &str) -> usize {
        self.inner
            .router
            .snapshot()
            .iter()
            .filter(|r| r.source_name == source_name)
            .count()
    }

    /// Number of listener errors and panics absorbed so far.
    pub fn failure_count(&self) -> u64 {
        self.inner.failures.load(Ordering::Relaxed)
    }
}

impl Default for EventChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventChannel")
            .field("listeners", &self.listener_count())
            .field("sources", &self.sources())
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "non-string panic payload"
    }
}
