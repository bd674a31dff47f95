//! flagstate configuration (`flagstate.toml`).
//!
//! Typed configuration for the CLI: default output format and diff
//! rendering options. Missing fields use defaults. Missing file → all
//! defaults (no error).

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::format::OutputFormat;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level flagstate configuration, parsed from `flagstate.toml`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlagstateConfig {
    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Diff rendering settings.
    #[serde(default)]
    pub diff: DiffConfig,
}

impl FlagstateConfig {
    /// Load configuration from `path`. A missing file yields all defaults;
    /// a present but malformed file is an error.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config at {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing config at {}", path.display()))
    }
}

// ---------------------------------------------------------------------------
// OutputConfig
// ---------------------------------------------------------------------------

/// Output settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Default output format when `--format` is not given.
    #[serde(default)]
    pub format: OutputFormat,
}

// ---------------------------------------------------------------------------
// DiffConfig
// ---------------------------------------------------------------------------

/// Diff rendering settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiffConfig {
    /// Include rows with zero changes in `diff` output.
    #[serde(default)]
    pub show_unchanged: bool,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
