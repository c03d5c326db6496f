//! Configuration module for cef-embed.
//!
//! This module provides the initialization settings for the native library:
//! - Loading settings from files (TOML/JSON)
//! - Environment variable overrides
//! - CLI argument merging
//! - Validation and defaults
//! - Conversion into the native `cef_settings_t` record
//!
//! # Example
//!
//! ```rust,no_run
//! use cef_embed::config::Settings;
//!
//! // Load from a specific file, then apply environment overrides
//! let settings = Settings::from_file("cef.toml").unwrap().merge_with_env();
//!
//! // Build the native record, hand it to the native layer, release it
//! let native = settings.to_native();
//! let _ptr = native.as_ptr();
//! native.release();
//! ```

mod native;
mod settings;

pub use native::{clear_settings, NativeSettings, SettingsSnapshot};
pub use settings::{CliArgs, ConfigError, Settings, ENV_PREFIX};
