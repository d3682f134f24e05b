use std::sync::Arc;

use dicelog_types::{EventLevel, EventRecord};

use crate::channel::EventChannel;
use crate::error::Result;

/// A consumer of published records.
///
/// The channel has already applied the registration's source name and level
/// threshold before calling [`matches`](Listener::matches); implementations
/// use it for any extra filtering of their own.
///
/// The trait is object-safe and `Send + Sync` so listeners can be shared as
/// `Arc<dyn Listener>` across publishing threads.
pub trait Listener: Send + Sync {
    /// Human-readable name used when reporting failures.
    fn name(&self) -> &str {
        "listener"
    }

    /// Returns `true` if this listener wants records of `level` from `source_name`.
    fn matches(&self, source_name: &str, level: EventLevel) -> bool {
        let _ = (source_name, level);
        true
    }

    /// Handle one record.
    fn on_event(&self, record: &EventRecord) -> Result<()>;
}

/// Notified whenever a new event source is created on a channel.
///
/// On [`EventChannel::watch_sources`] the observer is first told about every
/// source that already exists.
pub trait SourceObserver: Send + Sync {
    fn on_source_created(self: Arc<Self>, channel: &EventChannel, source_name: &str);
}

/// Adapter turning a closure into a [`Listener`].
pub struct FnListener<F> {
    name: String,
    callback: F,
}

impl<F> Listener for FnListener<F>
where
    F: Fn(&EventRecord) + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn on_event(&self, record: &EventRecord) -> Result<()> {
        (self.callback)(record);
        Ok(())
    }
}

/// Wrap a callback of shape `(&EventRecord) -> ()` as a shareable listener.
pub fn from_fn<F>(name: impl Into<String>, callback: F) -> Arc<dyn Listener>
where
    F: Fn(&EventRecord) + Send + Sync + 'static,
{
    Arc::new(FnListener {
        name: name.into(),
        callback,
    })
}
