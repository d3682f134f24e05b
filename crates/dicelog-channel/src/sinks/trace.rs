use tracing::{debug, error, info, warn};

use dicelog_types::{EventLevel, EventRecord};

use crate::error::Result;
use crate::listener::Listener;

/// Echoes channel records into the process's `tracing` subscriber.
///
/// Severity maps as Verbose → DEBUG, Informational → INFO, Warning → WARN,
/// Error and Critical → ERROR. Events use the `dicelog::echo` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl TracingSink {
    pub fn new() -> Self {
        Self
    }
}

macro_rules! echo {
    ($mac:ident, $record:expr) => {
        $mac!(
            target: "dicelog::echo",
            source = $record.source_name(),
            thread = %$record.thread_id(),
            detail = $record.exception_line(),
            "{}",
            $record.message_or_placeholder()
        )
    };
}

impl Listener for TracingSink {
    fn name(&self) -> &str {
        "tracing-sink"
    }

    fn on_event(&self, record: &EventRecord) -> Result<()> {
        match record.level() {
            EventLevel::Verbose => echo!(debug, record),
            EventLevel::Informational => echo!(info, record),
            EventLevel::Warning => echo!(warn, record),
            EventLevel::Error | EventLevel::Critical => echo!(error, record),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::EventChannel;
    use dicelog_types::{Keywords, LevelThreshold};
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture<F: FnOnce()>(f: F) -> String {
        let buffer = SharedBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = buffer.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn echoes_message_at_mapped_level() {
        let out = capture(|| {
            let channel = EventChannel::new();
            channel.register_listener("dice", Arc::new(TracingSink::new()), LevelThreshold::LogAlways);
            channel.publish("dice", EventLevel::Warning, "odd roll", Keywords::NONE, None);
        });
        assert!(out.contains("WARN"));
        assert!(out.contains("odd roll"));
        assert!(out.contains("source=\"dice\""));
    }

    #[test]
    fn echoes_exception_detail() {
        let out = capture(|| {
            let sink = TracingSink::new();
            let record = EventRecord::capture(
                "dice",
                EventLevel::Critical,
                "fault",
                Keywords::EXCEPTION,
                Some("divide by zero".into()),
            );
            sink.on_event(&record).unwrap();
        });
        assert!(out.contains("ERROR"));
        assert!(out.contains("divide by zero"));
    }

    #[test]
    fn verbose_maps_to_debug() {
        let out = capture(|| {
            let record = EventRecord::capture("dice", EventLevel::Verbose, "tiny", Keywords::NONE, None);
            TracingSink.on_event(&record).unwrap();
        });
        assert!(out.contains("DEBUG"));
        assert!(out.contains("tiny"));
    }
}
