//! Raw C API layouts of the Chromium Embedded Framework.
//!
//! These are `#[repr(C)]` mirrors of the CEF 3.x capi headers this crate binds
//! against. Field order and types must match the native headers exactly; the
//! safe wrappers in [`crate::config`], [`crate::proxy`] and [`crate::handler`]
//! are the only intended consumers.
//!
//! Function pointers are modelled the way bindgen emits them: as
//! `Option<unsafe extern "C" fn(..)>`, so a zeroed table is representable.

#![allow(non_camel_case_types)]

#[cfg(not(windows))]
use std::os::raw::c_char;
use std::os::raw::{c_int, c_uint, c_void};

pub mod string;

pub use string::{
    cef_string_userfree_utf16_alloc, cef_string_userfree_utf16_free, cef_string_utf16_clear,
    cef_string_utf16_set,
};

/// UTF-16 code unit.
pub type char16 = u16;

/// Packed `0xAARRGGBB` color.
pub type cef_color_t = u32;

/// Native log severity enumeration (`cef_log_severity_t`).
pub type cef_log_severity_t = c_uint;

pub const LOGSEVERITY_DEFAULT: cef_log_severity_t = 0;
pub const LOGSEVERITY_VERBOSE: cef_log_severity_t = 1;
pub const LOGSEVERITY_INFO: cef_log_severity_t = 2;
pub const LOGSEVERITY_WARNING: cef_log_severity_t = 3;
pub const LOGSEVERITY_ERROR: cef_log_severity_t = 4;
pub const LOGSEVERITY_DISABLE: cef_log_severity_t = 99;

/// Native process identifier (`cef_process_id_t`).
pub type cef_process_id_t = c_uint;

pub const PID_BROWSER: cef_process_id_t = 0;
pub const PID_RENDERER: cef_process_id_t = 1;

// ============================================================================
// Strings
// ============================================================================

/// CEF string structure. `dtor`, when set, frees `str`.
#[repr(C)]
#[derive(Debug)]
pub struct cef_string_utf16_t {
    pub str_: *mut char16,
    pub length: usize,
    pub dtor: Option<unsafe extern "C" fn(str_: *mut char16)>,
}

impl Default for cef_string_utf16_t {
    fn default() -> Self {
        Self {
            str_: std::ptr::null_mut(),
            length: 0,
            dtor: None,
        }
    }
}

/// CEF is built with UTF-16 strings on every platform.
pub type cef_string_t = cef_string_utf16_t;

/// A heap-allocated string handed out by the native layer. The receiver frees
/// it with [`cef_string_userfree_utf16_free`].
pub type cef_string_userfree_utf16_t = *mut cef_string_utf16_t;
pub type cef_string_userfree_t = cef_string_userfree_utf16_t;

/// Opaque native string list.
pub type cef_string_list_t = *mut c_void;

// ============================================================================
// Base reference-counted structure
// ============================================================================

/// Header shared by every reference-counted CEF structure.
#[repr(C)]
#[derive(Debug)]
pub struct cef_base_t {
    /// Size of the enclosing structure.
    pub size: usize,
    /// Increment the reference count.
    pub add_ref: Option<unsafe extern "C" fn(self_: *mut cef_base_t) -> c_int>,
    /// Decrement the reference count. Deletes the object when no references remain.
    pub release: Option<unsafe extern "C" fn(self_: *mut cef_base_t) -> c_int>,
    /// Returns true if the current reference count is 1.
    pub has_one_ref: Option<unsafe extern "C" fn(self_: *mut cef_base_t) -> c_int>,
}

// ============================================================================
// Settings
// ============================================================================

/// Initialization settings passed to `cef_initialize`.
#[repr(C)]
#[derive(Debug)]
pub struct cef_settings_t {
    pub size: usize,
    pub single_process: c_int,
    pub no_sandbox: c_int,
    pub browser_subprocess_path: cef_string_t,
    pub multi_threaded_message_loop: c_int,
    pub windowless_rendering_enabled: c_int,
    pub command_line_args_disabled: c_int,
    pub cache_path: cef_string_t,
    pub user_data_path: cef_string_t,
    pub persist_session_cookies: c_int,
    pub user_agent: cef_string_t,
    pub product_version: cef_string_t,
    pub locale: cef_string_t,
    pub log_file: cef_string_t,
    pub log_severity: cef_log_severity_t,
    pub javascript_flags: cef_string_t,
    pub resources_dir_path: cef_string_t,
    pub locales_dir_path: cef_string_t,
    pub pack_loading_disabled: c_int,
    pub remote_debugging_port: c_int,
    pub uncaught_exception_stack_size: c_int,
    pub context_safety_implementation: c_int,
    pub ignore_certificate_errors: c_int,
    pub background_color: cef_color_t,
    pub accept_language_list: cef_string_t,
}

impl Default for cef_settings_t {
    fn default() -> Self {
        Self {
            size: 0,
            single_process: 0,
            no_sandbox: 0,
            browser_subprocess_path: cef_string_t::default(),
            multi_threaded_message_loop: 0,
            windowless_rendering_enabled: 0,
            command_line_args_disabled: 0,
            cache_path: cef_string_t::default(),
            user_data_path: cef_string_t::default(),
            persist_session_cookies: 0,
            user_agent: cef_string_t::default(),
            product_version: cef_string_t::default(),
            locale: cef_string_t::default(),
            log_file: cef_string_t::default(),
            log_severity: LOGSEVERITY_DEFAULT,
            javascript_flags: cef_string_t::default(),
            resources_dir_path: cef_string_t::default(),
            locales_dir_path: cef_string_t::default(),
            pack_loading_disabled: 0,
            remote_debugging_port: 0,
            uncaught_exception_stack_size: 0,
            context_safety_implementation: 0,
            ignore_certificate_errors: 0,
            background_color: 0,
            accept_language_list: cef_string_t::default(),
        }
    }
}

// ============================================================================
// V8
// ============================================================================

/// A V8 exception. Methods may be called on any render process thread.
#[repr(C)]
pub struct cef_v8exception_t {
    pub base: cef_base_t,
    pub get_message:
        Option<unsafe extern "C" fn(self_: *mut cef_v8exception_t) -> cef_string_userfree_t>,
    pub get_source_line:
        Option<unsafe extern "C" fn(self_: *mut cef_v8exception_t) -> cef_string_userfree_t>,
    pub get_script_resource_name:
        Option<unsafe extern "C" fn(self_: *mut cef_v8exception_t) -> cef_string_userfree_t>,
    pub get_line_number: Option<unsafe extern "C" fn(self_: *mut cef_v8exception_t) -> c_int>,
    pub get_start_position: Option<unsafe extern "C" fn(self_: *mut cef_v8exception_t) -> c_int>,
    pub get_end_position: Option<unsafe extern "C" fn(self_: *mut cef_v8exception_t) -> c_int>,
    pub get_start_column: Option<unsafe extern "C" fn(self_: *mut cef_v8exception_t) -> c_int>,
    pub get_end_column: Option<unsafe extern "C" fn(self_: *mut cef_v8exception_t) -> c_int>,
}

/// A single V8 stack frame. Only usable on the thread that created it.
#[repr(C)]
pub struct cef_v8stack_frame_t {
    pub base: cef_base_t,
    pub is_valid: Option<unsafe extern "C" fn(self_: *mut cef_v8stack_frame_t) -> c_int>,
    pub get_script_name:
        Option<unsafe extern "C" fn(self_: *mut cef_v8stack_frame_t) -> cef_string_userfree_t>,
    pub get_script_name_or_source_url:
        Option<unsafe extern "C" fn(self_: *mut cef_v8stack_frame_t) -> cef_string_userfree_t>,
    pub get_function_name:
        Option<unsafe extern "C" fn(self_: *mut cef_v8stack_frame_t) -> cef_string_userfree_t>,
    pub get_line_number: Option<unsafe extern "C" fn(self_: *mut cef_v8stack_frame_t) -> c_int>,
    pub get_column: Option<unsafe extern "C" fn(self_: *mut cef_v8stack_frame_t) -> c_int>,
    pub is_eval: Option<unsafe extern "C" fn(self_: *mut cef_v8stack_frame_t) -> c_int>,
    pub is_constructor: Option<unsafe extern "C" fn(self_: *mut cef_v8stack_frame_t) -> c_int>,
}

// ============================================================================
// Browser
// ============================================================================

/// A browser window. Entries returning types this crate does not wrap are
/// typed as opaque pointers.
#[repr(C)]
pub struct cef_browser_t {
    pub base: cef_base_t,
    pub get_host: Option<unsafe extern "C" fn(self_: *mut cef_browser_t) -> *mut c_void>,
    pub can_go_back: Option<unsafe extern "C" fn(self_: *mut cef_browser_t) -> c_int>,
    pub go_back: Option<unsafe extern "C" fn(self_: *mut cef_browser_t)>,
    pub can_go_forward: Option<unsafe extern "C" fn(self_: *mut cef_browser_t) -> c_int>,
    pub go_forward: Option<unsafe extern "C" fn(self_: *mut cef_browser_t)>,
    pub is_loading: Option<unsafe extern "C" fn(self_: *mut cef_browser_t) -> c_int>,
    pub reload: Option<unsafe extern "C" fn(self_: *mut cef_browser_t)>,
    pub reload_ignore_cache: Option<unsafe extern "C" fn(self_: *mut cef_browser_t)>,
    pub stop_load: Option<unsafe extern "C" fn(self_: *mut cef_browser_t)>,
    pub get_identifier: Option<unsafe extern "C" fn(self_: *mut cef_browser_t) -> c_int>,
    pub is_same:
        Option<unsafe extern "C" fn(self_: *mut cef_browser_t, that: *mut cef_browser_t) -> c_int>,
    pub is_popup: Option<unsafe extern "C" fn(self_: *mut cef_browser_t) -> c_int>,
    pub has_document: Option<unsafe extern "C" fn(self_: *mut cef_browser_t) -> c_int>,
    pub get_main_frame: Option<unsafe extern "C" fn(self_: *mut cef_browser_t) -> *mut c_void>,
    pub get_focused_frame: Option<unsafe extern "C" fn(self_: *mut cef_browser_t) -> *mut c_void>,
    pub get_frame_byident:
        Option<unsafe extern "C" fn(self_: *mut cef_browser_t, identifier: i64) -> *mut c_void>,
    pub get_frame: Option<
        unsafe extern "C" fn(self_: *mut cef_browser_t, name: *const cef_string_t) -> *mut c_void,
    >,
    pub get_frame_count: Option<unsafe extern "C" fn(self_: *mut cef_browser_t) -> usize>,
    pub get_frame_identifiers: Option<
        unsafe extern "C" fn(
            self_: *mut cef_browser_t,
            identifiers_count: *mut usize,
            identifiers: *mut i64,
        ),
    >,
    pub get_frame_names:
        Option<unsafe extern "C" fn(self_: *mut cef_browser_t, names: cef_string_list_t)>,
    pub send_process_message: Option<
        unsafe extern "C" fn(
            self_: *mut cef_browser_t,
            target_process: cef_process_id_t,
            message: *mut c_void,
        ) -> c_int,
    >,
}

// ============================================================================
// Geolocation
// ============================================================================

/// Callback used for asynchronous continuation of geolocation permission requests.
#[repr(C)]
pub struct cef_geolocation_callback_t {
    pub base: cef_base_t,
    pub cont: Option<unsafe extern "C" fn(self_: *mut cef_geolocation_callback_t, allow: c_int)>,
}

/// Client-implemented handler for geolocation permission requests. Called on
/// the browser process UI thread.
#[repr(C)]
pub struct cef_geolocation_handler_t {
    pub base: cef_base_t,
    pub on_request_geolocation_permission: Option<
        unsafe extern "C" fn(
            self_: *mut cef_geolocation_handler_t,
            browser: *mut cef_browser_t,
            requesting_url: *const cef_string_t,
            request_id: c_int,
            callback: *mut cef_geolocation_callback_t,
        ) -> c_int,
    >,
    pub on_cancel_geolocation_permission: Option<
        unsafe extern "C" fn(
            self_: *mut cef_geolocation_handler_t,
            browser: *mut cef_browser_t,
            request_id: c_int,
        ),
    >,
}

// ============================================================================
// Process bootstrap
// ============================================================================

/// Command-line arguments handed to `cef_execute_process` / `cef_initialize`.
#[cfg(not(windows))]
#[repr(C)]
#[derive(Debug)]
pub struct cef_main_args_t {
    pub argc: c_int,
    pub argv: *mut *mut c_char,
}

/// Command-line arguments handed to `cef_execute_process` / `cef_initialize`.
#[cfg(windows)]
#[repr(C)]
#[derive(Debug)]
pub struct cef_main_args_t {
    pub instance: *mut c_void,
}

/// Opaque application handler.
pub type cef_app_t = c_void;

#[cfg(feature = "libcef")]
extern "C" {
    pub fn cef_execute_process(
        args: *const cef_main_args_t,
        application: *mut cef_app_t,
        windows_sandbox_info: *mut c_void,
    ) -> c_int;

    pub fn cef_initialize(
        args: *const cef_main_args_t,
        settings: *const cef_settings_t,
        application: *mut cef_app_t,
        windows_sandbox_info: *mut c_void,
    ) -> c_int;

    pub fn cef_run_message_loop();

    pub fn cef_quit_message_loop();

    pub fn cef_shutdown();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;

    #[test]
    fn test_string_is_three_words() {
        assert_eq!(size_of::<cef_string_t>(), 3 * size_of::<usize>());
    }

    #[test]
    fn test_default_settings_record_is_zeroed() {
        let raw = cef_settings_t::default();
        assert_eq!(raw.size, 0);
        assert_eq!(raw.log_severity, LOGSEVERITY_DEFAULT);
        assert!(raw.cache_path.str_.is_null());
        assert!(raw.accept_language_list.dtor.is_none());
    }
}
