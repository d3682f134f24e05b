use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

static NEXT_TAG: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static CURRENT: u64 = NEXT_TAG.fetch_add(1, Ordering::Relaxed);
}

/// Numeric identifier of the thread that emitted an event.
///
/// Tags are assigned lazily, the first time a thread asks for one, and are
/// unique for the lifetime of the process. They are stable per thread so
/// records from the same producer can be correlated. A tag is not the OS
/// thread id and will not match the ids a debugger shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreadTag(u64);

impl ThreadTag {
    /// Tag of the calling thread.
    pub fn current() -> Self {
        Self(CURRENT.with(|tag| *tag))
    }

    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ThreadTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
