//! Initialization settings and configuration management.
//!
//! [`Settings`] is the Rust-side shape of `cef_settings_t`. It can be built in
//! code, loaded from TOML/JSON files, overridden from the environment and from
//! CLI arguments, and finally converted to the native record with
//! [`Settings::to_native`].

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::types::{Color, ContextSafetyImplementation, LogSeverity};

/// Environment variable prefix for settings overrides.
pub const ENV_PREFIX: &str = "CEF_EMBED_";

/// Errors that can occur during configuration loading or validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML configuration.
    #[error("Failed to parse TOML configuration: {0}")]
    TomlParseError(#[from] toml::de::Error),

    /// Failed to serialize TOML configuration.
    #[error("Failed to serialize TOML configuration: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),

    /// Failed to parse JSON configuration.
    #[error("Failed to parse JSON configuration: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    /// Unsupported file format.
    #[error("Unsupported configuration file format: {0}")]
    UnsupportedFormat(String),
}

/// Initialization settings for the native library.
///
/// Every field has a usable default, so only the fields that matter to the
/// embedder need to be set. Empty text fields and paths mean "let the native
/// layer decide".
///
/// # Example
///
/// ```rust
/// use cef_embed::config::Settings;
/// use cef_embed::types::{Color, LogSeverity};
///
/// let settings = Settings::default()
///     .with_log_severity(LogSeverity::Disable)
///     .with_remote_debugging_port(9222)
///     .with_background_color(Color::new(10, 20, 30));
///
/// let native = settings.to_native();
/// assert_eq!(native.raw().log_severity, 99);
/// assert_eq!(native.raw().background_color, 0xFF0A141E);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Run the browser and renderer in a single process. Intended for debugging.
    pub single_process: bool,

    /// Disable the sandbox for sub-processes.
    pub no_sandbox: bool,

    /// Executable launched for sub-processes. Empty uses the main executable.
    pub browser_subprocess_path: PathBuf,

    /// Run the browser message loop on a separate thread (Windows only).
    pub multi_threaded_message_loop: bool,

    /// Enable windowless (off-screen) rendering.
    pub windowless_rendering_enabled: bool,

    /// Ignore command-line arguments when configuring the browser.
    pub command_line_args_disabled: bool,

    /// On-disk cache location. Empty uses an in-memory cache.
    pub cache_path: PathBuf,

    /// Location for user data such as spell checking dictionaries.
    pub user_data_path: PathBuf,

    /// Persist session cookies (requires `cache_path`).
    pub persist_session_cookies: bool,

    /// Full User-Agent override.
    pub user_agent: String,

    /// Product portion of the default User-Agent.
    pub product_version: String,

    /// Locale string passed to the browser, e.g. `en-US`.
    pub locale: String,

    /// Debug log file path.
    pub log_file: PathBuf,

    /// Log severity.
    pub log_severity: LogSeverity,

    /// Custom flags for the V8 engine.
    pub javascript_flags: String,

    /// Directory containing the resource pack files.
    pub resources_dir_path: PathBuf,

    /// Directory containing the locale pack files.
    pub locales_dir_path: PathBuf,

    /// Disable loading of pack files for resources and locales.
    pub pack_loading_disabled: bool,

    /// Remote debugging port; 0 disables remote debugging.
    pub remote_debugging_port: u16,

    /// Number of stack trace frames captured for uncaught exceptions.
    pub uncaught_exception_stack_size: i32,

    /// V8 context safety implementation.
    pub context_safety_implementation: ContextSafetyImplementation,

    /// Ignore errors related to invalid SSL certificates.
    pub ignore_certificate_errors: bool,

    /// Background color used before a document is loaded.
    pub background_color: Color,

    /// Comma-delimited ordered list of language codes for the Accept-Language header.
    pub accept_language_list: String,
}

impl Settings {
    /// Creates a new Settings with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads settings from a configuration file.
    ///
    /// Supports both TOML and JSON formats, detected by file extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;

        let settings = match file_extension(path).as_str() {
            "toml" => toml::from_str(&content)?,
            "json" => serde_json::from_str(&content)?,
            ext => return Err(ConfigError::UnsupportedFormat(ext.to_string())),
        };
        debug!(path = %path.display(), "loaded settings file");
        Ok(settings)
    }

    /// Saves settings to a configuration file.
    ///
    /// The format is determined by the file extension.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();

        let content = match file_extension(path).as_str() {
            "toml" => toml::to_string_pretty(self)?,
            "json" => serde_json::to_string_pretty(self)?,
            ext => return Err(ConfigError::UnsupportedFormat(ext.to_string())),
        };

        fs::write(path, content)?;
        Ok(())
    }

    /// Loads settings from environment variables.
    ///
    /// Variables are prefixed with `CEF_EMBED_`, e.g. `CEF_EMBED_CACHE_PATH`,
    /// `CEF_EMBED_LOG_SEVERITY` or `CEF_EMBED_REMOTE_DEBUGGING_PORT`.
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        settings.apply_env_overrides(|key| env::var(key).ok());
        settings
    }

    /// Merges current settings with environment variable overrides.
    pub fn merge_with_env(mut self) -> Self {
        self.apply_env_overrides(|key| env::var(key).ok());
        self
    }

    /// Applies overrides read through `lookup`. Values that fail to parse are
    /// ignored.
    fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));
        let flag = |val: String| val.to_lowercase() == "true" || val == "1";

        if let Some(val) = var("SINGLE_PROCESS") {
            self.single_process = flag(val);
        }

        if let Some(val) = var("NO_SANDBOX") {
            self.no_sandbox = flag(val);
        }

        if let Some(val) = var("CACHE_PATH") {
            self.cache_path = PathBuf::from(val);
        }

        if let Some(val) = var("USER_DATA_PATH") {
            self.user_data_path = PathBuf::from(val);
        }

        if let Some(val) = var("USER_AGENT") {
            self.user_agent = val;
        }

        if let Some(val) = var("LOCALE") {
            self.locale = val;
        }

        if let Some(val) = var("LOG_FILE") {
            self.log_file = PathBuf::from(val);
        }

        if let Some(val) = var("LOG_SEVERITY") {
            if let Ok(severity) = val.parse() {
                self.log_severity = severity;
            }
        }

        if let Some(val) = var("REMOTE_DEBUGGING_PORT") {
            if let Ok(port) = val.parse() {
                self.remote_debugging_port = port;
            }
        }

        if let Some(val) = var("BACKGROUND_COLOR") {
            if let Ok(color) = val.parse() {
                self.background_color = color;
            }
        }

        if let Some(val) = var("ACCEPT_LANGUAGE_LIST") {
            self.accept_language_list = val;
        }
    }

    /// Merges settings with CLI arguments.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cef_embed::config::{CliArgs, Settings};
    ///
    /// let args = CliArgs {
    ///     remote_debugging_port: Some(9222),
    ///     no_sandbox: Some(true),
    ///     ..Default::default()
    /// };
    ///
    /// let settings = Settings::default().merge_with_args(&args);
    /// assert_eq!(settings.remote_debugging_port, 9222);
    /// ```
    pub fn merge_with_args(mut self, args: &CliArgs) -> Self {
        if let Some(single_process) = args.single_process {
            self.single_process = single_process;
        }
        if let Some(no_sandbox) = args.no_sandbox {
            self.no_sandbox = no_sandbox;
        }
        if let Some(windowless) = args.windowless_rendering_enabled {
            self.windowless_rendering_enabled = windowless;
        }
        if let Some(ref cache_path) = args.cache_path {
            self.cache_path = cache_path.clone();
        }
        if let Some(ref user_agent) = args.user_agent {
            self.user_agent = user_agent.clone();
        }
        if let Some(ref locale) = args.locale {
            self.locale = locale.clone();
        }
        if let Some(ref log_file) = args.log_file {
            self.log_file = log_file.clone();
        }
        if let Some(severity) = args.log_severity {
            self.log_severity = severity;
        }
        if let Some(port) = args.remote_debugging_port {
            self.remote_debugging_port = port;
        }
        if let Some(color) = args.background_color {
            self.background_color = color;
        }
        self
    }

    /// Validates all settings.
    ///
    /// Validation is independent of [`Settings::to_native`], which accepts any
    /// value.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cef_embed::config::Settings;
    ///
    /// assert!(Settings::default().validate().is_ok());
    /// assert!(Settings::default().with_remote_debugging_port(80).validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.remote_debugging_port != 0 && self.remote_debugging_port < 1024 {
            return Err(ConfigError::ValidationError(format!(
                "Remote debugging port must be 0 or between 1024 and 65535, got {}",
                self.remote_debugging_port
            )));
        }

        if self.uncaught_exception_stack_size < 0 {
            return Err(ConfigError::ValidationError(
                "Uncaught exception stack size cannot be negative".to_string(),
            ));
        }

        if !self.browser_subprocess_path.as_os_str().is_empty()
            && !self.browser_subprocess_path.exists()
        {
            return Err(ConfigError::ValidationError(format!(
                "Browser subprocess executable does not exist: {}",
                self.browser_subprocess_path.display()
            )));
        }

        if self.persist_session_cookies && self.cache_path.as_os_str().is_empty() {
            debug!("persist_session_cookies has no effect without cache_path");
        }

        Ok(())
    }

    // Builder-style methods for convenient configuration

    /// Runs everything in a single process.
    pub fn with_single_process(mut self, single_process: bool) -> Self {
        self.single_process = single_process;
        self
    }

    /// Disables the sub-process sandbox.
    pub fn with_no_sandbox(mut self, no_sandbox: bool) -> Self {
        self.no_sandbox = no_sandbox;
        self
    }

    /// Sets the sub-process executable.
    pub fn with_browser_subprocess_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.browser_subprocess_path = path.into();
        self
    }

    /// Enables windowless rendering.
    pub fn with_windowless_rendering(mut self, enabled: bool) -> Self {
        self.windowless_rendering_enabled = enabled;
        self
    }

    /// Sets the cache directory.
    pub fn with_cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_path = path.into();
        self
    }

    /// Sets the user agent string.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Sets the locale.
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    /// Sets the debug log file.
    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = path.into();
        self
    }

    /// Sets the log severity.
    pub fn with_log_severity(mut self, severity: LogSeverity) -> Self {
        self.log_severity = severity;
        self
    }

    /// Sets the remote debugging port.
    pub fn with_remote_debugging_port(mut self, port: u16) -> Self {
        self.remote_debugging_port = port;
        self
    }

    /// Sets the uncaught exception stack size.
    pub fn with_uncaught_exception_stack_size(mut self, size: i32) -> Self {
        self.uncaught_exception_stack_size = size;
        self
    }

    /// Sets the V8 context safety implementation.
    pub fn with_context_safety(mut self, implementation: ContextSafetyImplementation) -> Self {
        self.context_safety_implementation = implementation;
        self
    }

    /// Sets the background color.
    pub fn with_background_color(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Sets the Accept-Language list.
    pub fn with_accept_language_list(mut self, languages: impl Into<String>) -> Self {
        self.accept_language_list = languages.into();
        self
    }
}

fn file_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// CLI argument structure for parsing command line options.
///
/// All fields are optional to allow partial overrides.
#[derive(Debug, Default, Clone)]
pub struct CliArgs {
    pub single_process: Option<bool>,
    pub no_sandbox: Option<bool>,
    pub windowless_rendering_enabled: Option<bool>,
    pub cache_path: Option<PathBuf>,
    pub user_agent: Option<String>,
    pub locale: Option<String>,
    pub log_file: Option<PathBuf>,
    pub log_severity: Option<LogSeverity>,
    pub remote_debugging_port: Option<u16>,
    pub background_color: Option<Color>,
    /// Configuration file path.
    pub config_file: Option<PathBuf>,
}

impl CliArgs {
    /// Creates an empty CliArgs instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the final settings by applying the full configuration chain:
    ///
    /// 1. Default values
    /// 2. Configuration file (if specified)
    /// 3. Environment variables
    /// 4. CLI arguments (self)
    pub fn load_settings(&self) -> Result<Settings, ConfigError> {
        let settings = match self.config_file {
            Some(ref config_file) => Settings::from_file(config_file)?,
            None => Settings::default(),
        };

        let settings = settings.merge_with_env().merge_with_args(self);
        settings.validate()?;

        Ok(settings)
    }
}
