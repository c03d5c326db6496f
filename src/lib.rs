//! # cef-embed
//!
//! Rust bindings over the Chromium Embedded Framework C API.
//!
//! The crate covers three seams between an embedding application and CEF:
//!
//! - **Settings marshalling**: a typed [`Settings`] record is converted into
//!   the native `cef_settings_t` and released again through an RAII
//!   [`NativeSettings`] guard.
//! - **Proxies**: non-owning views over native reference-counted objects
//!   ([`V8Exception`], [`V8StackFrame`], [`Browser`], [`GeolocationCallback`])
//!   whose accessors make one native call and convert the result.
//! - **Handlers**: traits with default behavior ([`GeolocationHandler`]) that
//!   an adapter turns into native callback structures.
//!
//! ## Quick Start
//!
//! ```rust
//! use cef_embed::prelude::*;
//!
//! let settings = Settings::default()
//!     .with_log_severity(LogSeverity::Disable)
//!     .with_remote_debugging_port(9222)
//!     .with_background_color(Color::from_argb(0xFF0A_141E));
//! settings.validate()?;
//!
//! let native = settings.to_native();
//! assert_eq!(native.raw().remote_debugging_port, 9222);
//! native.release();
//! # Ok::<(), cef_embed::ConfigError>(())
//! ```
//!
//! ## Module Overview
//!
//! - [`sys`]: `#[repr(C)]` layouts of the C API and the native string runtime
//! - [`types`]: colors, enumerations and string conversion helpers
//! - [`config`]: settings loading, validation and native conversion
//! - [`proxy`]: proxies over native objects
//! - [`handler`]: handler traits and their native adapters
//! - [`app`]: process bootstrap
//!
//! ## Configuration
//!
//! Configuration follows a precedence chain:
//! 1. Default values
//! 2. Configuration file (TOML/JSON)
//! 3. Environment variables (`CEF_EMBED_*`)
//! 4. CLI arguments
//!
//! See [`config::Settings`] for all available options.
//!
//! ## Features
//!
//! - `libcef`: link against the CEF shared library (located through
//!   `CEF_PATH`) instead of the built-in string runtime, and enable the
//!   process bootstrap entry points.

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Full version string with name
pub const FULL_VERSION: &str = concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Module Exports
// ============================================================================

/// Raw C API layouts and the native string runtime.
pub mod sys;

/// Value types shared by settings and proxies.
pub mod types;

/// Configuration management for loading settings from files, env, and CLI.
pub mod config;

/// Proxies over native reference-counted objects.
pub mod proxy;

/// Handler traits for native-originated events.
pub mod handler;

/// Process bootstrap.
pub mod app;

// ============================================================================
// Re-exports for Convenience
// ============================================================================

// Config types
pub use config::{CliArgs, ConfigError, NativeSettings, Settings, SettingsSnapshot};

// Value types
pub use types::{Color, ContextSafetyImplementation, LogSeverity};

// Proxy types
pub use proxy::{
    Browser, GeolocationCallback, JsException, StackFrameInfo, V8Exception, V8StackFrame,
};

// Handler types
pub use handler::{
    DeferringGeolocationHandler, GeolocationHandler, PendingPermissions, PermissionAction,
};

// Bootstrap types
pub use app::{AppError, MainArgs};

// ============================================================================
// Prelude Module
// ============================================================================

/// Prelude module for convenient imports.
///
/// ```rust
/// use cef_embed::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{CliArgs, NativeSettings, Settings};
    pub use crate::handler::{GeolocationHandler, PermissionAction};
    pub use crate::proxy::{Browser, GeolocationCallback, V8Exception, V8StackFrame};
    pub use crate::types::{Color, ContextSafetyImplementation, LogSeverity};
    pub use crate::{FULL_VERSION, NAME, VERSION};
}
