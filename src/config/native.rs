//! Conversion of [`Settings`] into the native `cef_settings_t` record.
//!
//! Building a record allocates one native buffer per text field. The buffers
//! belong to the [`NativeSettings`] that holds the record and are freed when it
//! is released or dropped, so every build is paired with exactly one release.

use serde::{Deserialize, Serialize};
use std::mem::size_of;
use std::path::Path;
use tracing::{debug, trace};
#[cfg(not(windows))]
use tracing::warn;

use super::Settings;
use crate::sys::{cef_settings_t, cef_string_t};
#[cfg(windows)]
use crate::types::string::set_cef_string_utf16;
use crate::types::string::{cef_string_to_string, clear_cef_string, set_cef_string};
use crate::types::to_flag;

/// A populated `cef_settings_t` together with the string buffers it owns.
///
/// The record stays valid until [`NativeSettings::release`] is called or the
/// value is dropped. Hand [`NativeSettings::as_ptr`] to the native layer while
/// it is alive; the native layer copies what it needs.
#[derive(Debug)]
pub struct NativeSettings {
    raw: cef_settings_t,
}

impl NativeSettings {
    /// Borrow the populated record.
    pub fn raw(&self) -> &cef_settings_t {
        &self.raw
    }

    /// Pointer suitable for `cef_initialize`.
    pub fn as_ptr(&self) -> *const cef_settings_t {
        &self.raw
    }

    /// Decodes the record into plain Rust values.
    pub fn snapshot(&self) -> SettingsSnapshot {
        SettingsSnapshot::from_raw(&self.raw)
    }

    /// Frees every string buffer the record owns.
    ///
    /// Consumes `self`, so a record cannot be released twice.
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for NativeSettings {
    fn drop(&mut self) {
        // Every buffer was allocated by `Settings::to_native` and is released
        // only here.
        unsafe { clear_settings(&mut self.raw) };
        trace!("released native settings record");
    }
}

impl Settings {
    /// Converts the settings into the native record.
    ///
    /// Every field is written explicitly and `size` is always stamped with
    /// the size of `cef_settings_t`. The conversion is total and deterministic.
    pub fn to_native(&self) -> NativeSettings {
        let mut raw = cef_settings_t {
            size: size_of::<cef_settings_t>(),
            single_process: to_flag(self.single_process),
            no_sandbox: to_flag(self.no_sandbox),
            multi_threaded_message_loop: to_flag(self.multi_threaded_message_loop),
            windowless_rendering_enabled: to_flag(self.windowless_rendering_enabled),
            command_line_args_disabled: to_flag(self.command_line_args_disabled),
            persist_session_cookies: to_flag(self.persist_session_cookies),
            log_severity: self.log_severity.to_raw(),
            pack_loading_disabled: to_flag(self.pack_loading_disabled),
            remote_debugging_port: i32::from(self.remote_debugging_port),
            uncaught_exception_stack_size: self.uncaught_exception_stack_size,
            context_safety_implementation: self.context_safety_implementation.to_raw(),
            ignore_certificate_errors: to_flag(self.ignore_certificate_errors),
            background_color: self.background_color.to_native(),
            ..cef_settings_t::default()
        };

        set_path(&self.browser_subprocess_path, &mut raw.browser_subprocess_path);
        set_path(&self.cache_path, &mut raw.cache_path);
        set_path(&self.user_data_path, &mut raw.user_data_path);
        set_cef_string(&self.user_agent, &mut raw.user_agent);
        set_cef_string(&self.product_version, &mut raw.product_version);
        set_cef_string(&self.locale, &mut raw.locale);
        set_path(&self.log_file, &mut raw.log_file);
        set_cef_string(&self.javascript_flags, &mut raw.javascript_flags);
        set_path(&self.resources_dir_path, &mut raw.resources_dir_path);
        set_path(&self.locales_dir_path, &mut raw.locales_dir_path);
        set_cef_string(&self.accept_language_list, &mut raw.accept_language_list);

        debug!(
            size = raw.size,
            log_severity = raw.log_severity,
            remote_debugging_port = raw.remote_debugging_port,
            "built native settings record"
        );

        NativeSettings { raw }
    }
}

/// Paths are native UTF-16 on Windows and are passed through unchanged.
#[cfg(windows)]
fn set_path(path: &Path, out: &mut cef_string_t) {
    use std::os::windows::ffi::OsStrExt;

    let units: Vec<u16> = path.as_os_str().encode_wide().collect();
    set_cef_string_utf16(&units, out);
}

/// Native strings are UTF-16, so bytes that are not valid UTF-8 cannot be
/// carried over and are replaced with U+FFFD.
#[cfg(not(windows))]
fn set_path(path: &Path, out: &mut cef_string_t) {
    match path.to_str() {
        Some(value) => set_cef_string(value, out),
        None => {
            warn!(
                path = %path.display(),
                "path is not valid unicode; invalid bytes replaced"
            );
            set_cef_string(&path.to_string_lossy(), out);
        }
    }
}

/// Frees every string buffer owned by `raw` and resets those fields.
///
/// Non-string fields are left untouched.
///
/// # Safety
///
/// Must be called exactly once for a record populated by
/// [`Settings::to_native`] (or whose strings were otherwise set through the
/// native string runtime). Calling it on a record whose buffers were already
/// freed by other means, or on a record the native layer still reads from, is
/// undefined behavior. [`NativeSettings`] upholds this automatically.
pub unsafe fn clear_settings(raw: &mut cef_settings_t) {
    for s in [
        &mut raw.browser_subprocess_path,
        &mut raw.cache_path,
        &mut raw.user_data_path,
        &mut raw.user_agent,
        &mut raw.product_version,
        &mut raw.locale,
        &mut raw.log_file,
        &mut raw.javascript_flags,
        &mut raw.resources_dir_path,
        &mut raw.locales_dir_path,
        &mut raw.accept_language_list,
    ] {
        clear_cef_string(s);
    }
}

/// Field-by-field decoded view of a native settings record.
///
/// Integer fields keep their raw native encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsSnapshot {
    pub size: usize,
    pub single_process: i32,
    pub no_sandbox: i32,
    pub browser_subprocess_path: String,
    pub multi_threaded_message_loop: i32,
    pub windowless_rendering_enabled: i32,
    pub command_line_args_disabled: i32,
    pub cache_path: String,
    pub user_data_path: String,
    pub persist_session_cookies: i32,
    pub user_agent: String,
    pub product_version: String,
    pub locale: String,
    pub log_file: String,
    pub log_severity: u32,
    pub javascript_flags: String,
    pub resources_dir_path: String,
    pub locales_dir_path: String,
    pub pack_loading_disabled: i32,
    pub remote_debugging_port: i32,
    pub uncaught_exception_stack_size: i32,
    pub context_safety_implementation: i32,
    pub ignore_certificate_errors: i32,
    pub background_color: u32,
    pub accept_language_list: String,
}

impl SettingsSnapshot {
    /// Decodes a native record.
    pub fn from_raw(raw: &cef_settings_t) -> Self {
        Self {
            size: raw.size,
            single_process: raw.single_process,
            no_sandbox: raw.no_sandbox,
            browser_subprocess_path: cef_string_to_string(&raw.browser_subprocess_path),
            multi_threaded_message_loop: raw.multi_threaded_message_loop,
            windowless_rendering_enabled: raw.windowless_rendering_enabled,
            command_line_args_disabled: raw.command_line_args_disabled,
            cache_path: cef_string_to_string(&raw.cache_path),
            user_data_path: cef_string_to_string(&raw.user_data_path),
            persist_session_cookies: raw.persist_session_cookies,
            user_agent: cef_string_to_string(&raw.user_agent),
            product_version: cef_string_to_string(&raw.product_version),
            locale: cef_string_to_string(&raw.locale),
            log_file: cef_string_to_string(&raw.log_file),
            log_severity: raw.log_severity,
            javascript_flags: cef_string_to_string(&raw.javascript_flags),
            resources_dir_path: cef_string_to_string(&raw.resources_dir_path),
            locales_dir_path: cef_string_to_string(&raw.locales_dir_path),
            pack_loading_disabled: raw.pack_loading_disabled,
            remote_debugging_port: raw.remote_debugging_port,
            uncaught_exception_stack_size: raw.uncaught_exception_stack_size,
            context_safety_implementation: raw.context_safety_implementation,
            ignore_certificate_errors: raw.ignore_certificate_errors,
            background_color: raw.background_color,
            accept_language_list: cef_string_to_string(&raw.accept_language_list),
        }
    }
}
