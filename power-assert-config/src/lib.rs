//! Configuration loader for the power-assert instrumenter.
//!
//! `defaults/power-assert.default.toml` is embedded into the binary so the documented
//! defaults and the runtime defaults are the same file. Callers layer project files and
//! command line overrides on top via [`Loader`], then turn the result into the core's
//! [`InstrumentOptions`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use power_assert::instrument::generating::GeneratorOptions;
use power_assert::instrument::pipeline::InstrumentOptions;
use power_assert::instrument::source::ColumnUnit;
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/power-assert.default.toml");

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PowerAssertConfig {
    pub dump: DumpConfig,
    pub assertions: AssertionsConfig,
    pub capture: CaptureConfig,
    pub generate: GenerateConfig,
}

/// How the compiler's dump is read.
#[derive(Debug, Clone, Deserialize)]
pub struct DumpConfig {
    pub noise_markers: Vec<String>,
    pub column_unit: ColumnUnit,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssertionsConfig {
    pub modules: Vec<String>,
}

/// When the generated code switches to the multi-statement form.
#[derive(Debug, Clone, Deserialize)]
pub struct CaptureConfig {
    pub max_inline_captures: usize,
    pub higher_order_functions: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateConfig {
    pub recorder: String,
    pub variable_prefix: String,
}

impl From<&PowerAssertConfig> for InstrumentOptions {
    fn from(config: &PowerAssertConfig) -> Self {
        InstrumentOptions {
            noise_markers: config.dump.noise_markers.clone(),
            column_unit: config.dump.column_unit,
            assertion_modules: config.assertions.modules.clone(),
            generator: GeneratorOptions {
                recorder: config.generate.recorder.clone(),
                variable_prefix: config.generate.variable_prefix.clone(),
                max_inline_captures: config.capture.max_inline_captures,
                higher_order_functions: config.capture.higher_order_functions.clone(),
            },
        }
    }
}

impl PowerAssertConfig {
    pub fn instrument_options(&self) -> InstrumentOptions {
        InstrumentOptions::from(self)
    }
}

/// Layers user files and overrides over the built-in defaults.
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

    /// Layer an optional configuration file, ignored when absent.
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override, e.g. `dump.column_unit`.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<PowerAssertConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// The built-in defaults alone.
pub fn load_defaults() -> Result<PowerAssertConfig, ConfigError> {
    Loader::new().build()
}
