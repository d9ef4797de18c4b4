//! Container configuration.
//!
//! Defaults describe a conventional Rust source tree (`src/**.rs`, `::` paths)
//! and the `init` hook name. Values can be overridden from environment
//! variables, or from JSON with the `config` feature.

use std::env;
use std::path::PathBuf;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::{DiError, DiResult};

/// Environment variable prefix used by [`ContainerConfig::from_env`].
pub const ENV_PREFIX: &str = "FERROUS_IOC";

/// How source file paths map onto module names.
///
/// `src/app/engine.rs` becomes `app::engine`: everything up to and including the
/// `source_root` component is stripped, the extension is removed, a trailing
/// `mod` segment is dropped and the rest is joined with `namespace_separator`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct SourceLayout {
    /// Path component(s) marking the start of the module tree
    pub source_root: PathBuf,
    /// File extension of source files, without the dot
    pub extension: String,
    /// Separator placed between module path segments
    pub namespace_separator: String,
}

impl Default for SourceLayout {
    fn default() -> Self {
        Self {
            source_root: PathBuf::from("src"),
            extension: "rs".to_string(),
            namespace_separator: "::".to_string(),
        }
    }
}

/// Configuration for a [`Container`](crate::Container).
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::ContainerConfig;
///
/// let config = ContainerConfig::default().with_init_hook("post_construct");
/// assert_eq!(config.init_hook, "post_construct");
/// assert_eq!(config.layout.extension, "rs");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ContainerConfig {
    /// Discovery path conventions
    pub layout: SourceLayout,
    /// Name of the post-construction method invoked on every wired instance
    pub init_hook: String,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            layout: SourceLayout::default(),
            init_hook: "init".to_string(),
        }
    }
}

impl ContainerConfig {
    /// Replaces the init hook name.
    pub fn with_init_hook(mut self, name: impl Into<String>) -> Self {
        self.init_hook = name.into();
        self
    }

    /// Replaces the source layout.
    pub fn with_layout(mut self, layout: SourceLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Defaults overridden by `FERROUS_IOC_SOURCE_ROOT`, `FERROUS_IOC_EXTENSION`,
    /// `FERROUS_IOC_NAMESPACE_SEPARATOR` and `FERROUS_IOC_INIT_HOOK`.
    pub fn from_env() -> DiResult<Self> {
        let mut config = Self::default();
        if let Some(root) = read_env("SOURCE_ROOT")? {
            config.layout.source_root = PathBuf::from(root);
        }
        if let Some(extension) = read_env("EXTENSION")? {
            config.layout.extension = extension.trim_start_matches('.').to_string();
        }
        if let Some(separator) = read_env("NAMESPACE_SEPARATOR")? {
            config.layout.namespace_separator = separator;
        }
        if let Some(hook) = read_env("INIT_HOOK")? {
            config.init_hook = hook;
        }
        config.validate()?;
        Ok(config)
    }

    /// Parses a JSON document; missing keys keep their defaults.
    #[cfg(feature = "config")]
    pub fn from_json_str(json: &str) -> DiResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| DiError::Consistency(format!("invalid container config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects empty values that would make discovery or init meaningless.
    pub fn validate(&self) -> DiResult<()> {
        if self.init_hook.is_empty() {
            return Err(DiError::Consistency("init hook name cannot be empty".to_string()));
        }
        if self.layout.extension.is_empty() {
            return Err(DiError::Consistency("source extension cannot be empty".to_string()));
        }
        if self.layout.source_root.as_os_str().is_empty() {
            return Err(DiError::Consistency("source root cannot be empty".to_string()));
        }
        Ok(())
    }
}

fn read_env(name: &str) -> DiResult<Option<String>> {
    let key = format!("{}_{}", ENV_PREFIX, name);
    match env::var(&key) {
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(DiError::Consistency(format!(
            "environment variable {} is not valid unicode",
            key
        ))),
    }
}
