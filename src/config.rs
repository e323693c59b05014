//! Configuration for render-cache.
//!
//! This module provides runtime configuration for render traces and crash reports.
//! Use [`ConfigBuilder`] at application startup to customize it.

use std::sync::OnceLock;

/// Global configuration, initialized via [`ConfigBuilder::init`].
static CONFIG: OnceLock<Config> = OnceLock::new();

/// Default divider line framing crash reports.
pub const DEFAULT_DIVIDER: &str = "----------------------------------------";

/// Runtime configuration for render-cache.
#[derive(Debug, Clone)]
pub struct Config {
    /// Name shown in crash report headers.
    /// Example: "my-site"
    pub name: String,
    /// Line framing crash reports and re-render notices.
    pub divider: String,
    /// Whether reports are colored (requires the `colored-diagnostics` feature).
    pub colored: bool,
    /// Whether every trace line is also written to stderr as it arrives.
    pub echo: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            divider: DEFAULT_DIVIDER.to_string(),
            colored: true,
            echo: false,
        }
    }
}

/// Configuration builder for fluent API.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    name: Option<String>,
    divider: Option<String>,
    colored: Option<bool>,
    echo: Option<bool>,
}

impl ConfigBuilder {
    /// Create a new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the name shown in crash report headers.
    ///
    /// Default: the crate name.
    ///
    /// # Example
    ///
    /// ```
    /// use render_cache::config::ConfigBuilder;
    ///
    /// ConfigBuilder::new()
    ///     .name("my-site")
    ///     .init();
    /// ```
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the divider line framing crash reports.
    pub fn divider(mut self, divider: impl Into<String>) -> Self {
        self.divider = Some(divider.into());
        self
    }

    /// Enable or disable colored reports.
    pub fn colored(mut self, colored: bool) -> Self {
        self.colored = Some(colored);
        self
    }

    /// Enable or disable echoing trace lines to stderr.
    pub fn echo(mut self, echo: bool) -> Self {
        self.echo = Some(echo);
        self
    }

    /// Build the configuration without installing it globally.
    pub fn build(self) -> Config {
        let default = Config::default();
        Config {
            name: self.name.unwrap_or(default.name),
            divider: self.divider.unwrap_or(default.divider),
            colored: self.colored.unwrap_or(default.colored),
            echo: self.echo.unwrap_or(default.echo),
        }
    }

    /// Build and initialize the global configuration.
    ///
    /// This can only be called once. Subsequent calls are ignored.
    /// Returns `true` if configuration was set, `false` if already initialized.
    pub fn init(self) -> bool {
        CONFIG.set(self.build()).is_ok()
    }
}

/// Initialize render-cache with default configuration.
///
/// This is equivalent to `ConfigBuilder::new().init()`.
pub fn init_default() -> bool {
    ConfigBuilder::new().init()
}

/// Get the current configuration, or default if not initialized.
pub fn get() -> &'static Config {
    CONFIG.get_or_init(Config::default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.name, "render-cache");
        assert_eq!(config.divider, DEFAULT_DIVIDER);
        assert!(config.colored);
        assert!(!config.echo);
    }

    #[test]
    fn test_builder() {
        let builder = ConfigBuilder::new().name("site").echo(true);
        assert_eq!(builder.name, Some("site".to_string()));

        let config = builder.colored(false).build();
        assert_eq!(config.name, "site");
        assert!(config.echo);
        assert!(!config.colored);
        assert_eq!(config.divider, DEFAULT_DIVIDER);
    }
}
