use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use dicelog_channel::ChannelConfig;

use crate::cli::Cli;

/// Configuration for one `dicelog` run.
///
/// ```toml
/// seed = 7
///
/// [channel]
/// source_name = "DiceThrowLibrary"
/// debug_sink = true
/// echo_to_tracing = false
/// echo_threshold = "Informational"
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub seed: Option<u64>,
    pub channel: ChannelConfig,
}

impl DemoConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Load from `cli.config` if given, then apply command-line overrides.
    pub fn resolve(cli: &Cli) -> anyhow::Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if cli.seed.is_some() {
            config.seed = cli.seed;
        }
        if cli.echo {
            config.channel.echo_to_tracing = true;
        }
        if cli.quiet {
            config.channel.debug_sink = false;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use dicelog_channel::{EventLevel, LevelThreshold};
    use std::io::Write;

    #[test]
    fn load_full_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
seed = 7

[channel]
source_name = "Custom"
debug_sink = false
echo_to_tracing = true
echo_threshold = "Error"
"#
        )
        .unwrap();

        let config = DemoConfig::load(file.path()).unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.channel.source_name, "Custom");
        assert!(!config.channel.debug_sink);
        assert!(config.channel.echo_to_tracing);
        assert_eq!(config.channel.echo_threshold, LevelThreshold::AtLeast(EventLevel::Error));
    }

    #[test]
    fn empty_file_is_default() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert_eq!(DemoConfig::load(file.path()).unwrap(), DemoConfig::default());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DemoConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(err.to_string().contains("reading config"));
    }

    #[test]
    fn bad_threshold_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[channel]\necho_threshold = \"Sometimes\"").unwrap();
        assert!(DemoConfig::load(file.path()).is_err());
    }

    #[test]
    fn cli_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "seed = 1\n[channel]\ndebug_sink = true").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = Cli::try_parse_from([
            "dicelog", "roll", "--config", &path, "--seed", "5", "--echo", "--quiet",
        ])
        .unwrap();
        let config = DemoConfig::resolve(&cli).unwrap();

        assert_eq!(config.seed, Some(5));
        assert!(config.channel.echo_to_tracing);
        assert!(!config.channel.debug_sink);
    }

    #[test]
    fn config_renders_as_toml() {
        let text = toml::to_string_pretty(&DemoConfig::default()).unwrap();
        assert!(text.contains("source_name = \"DiceThrowLibrary\""));
        assert!(text.contains("echo_threshold = \"Informational\""));
    }
}
