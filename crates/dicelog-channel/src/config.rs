use std::io::Write;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use dicelog_types::{EventLevel, LevelThreshold};

use crate::channel::{EventChannel, RegistrationHandle};
use crate::sinks::{DebugSink, TracingSink};

/// Source name used by the dice library.
pub const DEFAULT_SOURCE_NAME: &str = "DiceThrowLibrary";

/// Which built-in sinks to attach to a channel, and for which source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Source the sinks listen to.
    pub source_name: String,
    /// Attach a [`DebugSink`] that enables itself when the source is created.
    pub debug_sink: bool,
    /// Echo records into `tracing` through a [`TracingSink`].
    pub echo_to_tracing: bool,
    /// Minimum level echoed into `tracing`.
    pub echo_threshold: LevelThreshold,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            source_name: DEFAULT_SOURCE_NAME.to_string(),
            debug_sink: true,
            echo_to_tracing: false,
            echo_threshold: LevelThreshold::AtLeast(EventLevel::Informational),
        }
    }
}

/// Sinks installed by [`ChannelConfig::attach`].
#[derive(Default)]
pub struct AttachedSinks {
    pub debug: Option<Arc<DebugSink>>,
    pub echo: Option<RegistrationHandle>,
}

impl ChannelConfig {
    /// Attach the configured sinks, with the debug sink writing to stderr.
    pub fn attach(&self, channel: &EventChannel) -> AttachedSinks {
        self.attach_with_writer(channel, std::io::stderr())
    }

    /// Attach the configured sinks, with the debug sink writing to `debug_output`.
    pub fn attach_with_writer(
        &self,
        channel: &EventChannel,
        debug_output: impl Write + Send + 'static,
    ) -> AttachedSinks {
        let debug = self.debug_sink.then(|| {
            let sink = Arc::new(DebugSink::with_writer(self.source_name.clone(), debug_output));
            sink.attach(channel);
            sink
        });

        let echo = self.echo_to_tracing.then(|| {
            channel.register_listener(
                &self.source_name,
                Arc::new(TracingSink::new()),
                self.echo_threshold,
            )
        });

        debug!(
            source = %self.source_name,
            debug_sink = self.debug_sink,
            echo = self.echo_to_tracing,
            "channel sinks attached"
        );
        AttachedSinks { debug, echo }
    }
}
