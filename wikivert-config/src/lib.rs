//! Shared configuration loader for the wikivert toolchain.
//!
//! `defaults/wikivert.default.toml` is embedded into every binary so that
//! docs and runtime behavior stay in sync. Applications layer user-specific
//! files on top of those defaults via [`Loader`] before deserializing into
//! [`WikivertConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;
use wikivert::SerializeOptions;

const DEFAULT_TOML: &str = include_str!("../defaults/wikivert.default.toml");

/// Top-level configuration consumed by wikivert applications.
#[derive(Debug, Clone, Deserialize)]
pub struct WikivertConfig {
    pub serialize: SerializeConfig,
    pub output: OutputConfig,
}

/// Mirrors the knobs exposed by the serializer.
#[derive(Debug, Clone, Deserialize)]
pub struct SerializeConfig {
    pub selser: bool,
    pub scrub_wikitext: bool,
}

impl From<&SerializeConfig> for SerializeOptions {
    fn from(config: &SerializeConfig) -> Self {
        SerializeOptions {
            selser: config.selser,
            scrub_wikitext: config.scrub_wikitext,
        }
    }
}

impl From<SerializeConfig> for SerializeOptions {
    fn from(config: SerializeConfig) -> Self {
        (&config).into()
    }
}

/// Output plumbing for the CLI.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub trailing_newline: TrailingNewline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum TrailingNewline {
    #[serde(rename = "auto")]
    Auto,
    #[serde(rename = "always")]
    Always,
    #[serde(rename = "never")]
    Never,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI flags).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<WikivertConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<WikivertConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert!(!config.serialize.selser);
        assert!(!config.serialize.scrub_wikitext);
        assert_eq!(config.output.trailing_newline, TrailingNewline::Auto);
    }

    #[test]
    fn overrides_layer_on_top() {
        let config = Loader::new()
            .set_override("serialize.scrub_wikitext", true)
            .unwrap()
            .build()
            .unwrap();
        assert!(config.serialize.scrub_wikitext);
        // Untouched keys keep their defaults.
        assert!(!config.serialize.selser);
    }

    #[test]
    fn converts_into_serialize_options() {
        let config = load_defaults().unwrap();
        let options: SerializeOptions = (&config.serialize).into();
        assert_eq!(options, SerializeOptions::default());
    }
}
