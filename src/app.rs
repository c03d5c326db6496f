//! Process bootstrap.
//!
//! CEF runs the browser and its sub-processes from the same executable. Every
//! process calls [`execute_process`] first; sub-processes exit with the code
//! it returns, the browser process continues with [`initialize`],
//! [`run_message_loop`] and [`shutdown`].
//!
//! The entry points that reach into the CEF library are only compiled with
//! the `libcef` feature.

use std::ffi::{CString, NulError};
use std::fmt;
#[cfg(not(windows))]
use std::os::raw::c_char;
#[cfg(any(not(windows), feature = "libcef"))]
use std::ptr;

use thiserror::Error;
#[cfg(feature = "libcef")]
use tracing::{debug, info};

#[cfg(feature = "libcef")]
use crate::config::{ConfigError, Settings};
use crate::sys::cef_main_args_t;

/// Errors raised while bootstrapping the CEF process.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Process argument contains an interior NUL byte: {0}")]
    InvalidArgument(#[from] NulError),

    #[error("Failed to resolve the module handle: {0}")]
    ModuleHandle(String),

    #[cfg(feature = "libcef")]
    #[error("Invalid settings: {0}")]
    Config(#[from] ConfigError),

    #[error("cef_initialize reported failure")]
    InitializeFailed,
}

/// Process arguments in the form `cef_execute_process` and `cef_initialize`
/// expect.
///
/// On Windows CEF reads the command line itself and only needs the module
/// instance; elsewhere `argv` points into storage owned by this value.
pub struct MainArgs {
    args: Vec<CString>,
    // Backing storage for `raw.argv`.
    #[cfg(not(windows))]
    _argv: Vec<*mut c_char>,
    raw: cef_main_args_t,
}

impl MainArgs {
    /// Arguments of the current process.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_args(std::env::args())
    }

    pub fn from_args<I, S>(args: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = S>,
        S: Into<Vec<u8>>,
    {
        let args = args
            .into_iter()
            .map(CString::new)
            .collect::<Result<Vec<_>, _>>()?;
        Self::build(args)
    }

    #[cfg(not(windows))]
    fn build(args: Vec<CString>) -> Result<Self, AppError> {
        let mut argv: Vec<*mut c_char> = args
            .iter()
            .map(|arg| arg.as_ptr() as *mut c_char)
            .collect();
        argv.push(ptr::null_mut());
        let raw = cef_main_args_t {
            argc: args.len() as i32,
            argv: argv.as_mut_ptr(),
        };
        Ok(Self {
            args,
            _argv: argv,
            raw,
        })
    }

    #[cfg(windows)]
    fn build(args: Vec<CString>) -> Result<Self, AppError> {
        use windows::Win32::System::LibraryLoader::GetModuleHandleW;

        let instance =
            unsafe { GetModuleHandleW(None) }.map_err(|e| AppError::ModuleHandle(e.to_string()))?;
        let raw = cef_main_args_t {
            instance: instance.0 as *mut _,
        };
        Ok(Self { args, raw })
    }

    /// Number of arguments, including the program name.
    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Arguments as strings, lossily decoded.
    pub fn args(&self) -> impl Iterator<Item = String> + '_ {
        self.args
            .iter()
            .map(|arg| arg.to_string_lossy().into_owned())
    }

    pub fn raw(&self) -> &cef_main_args_t {
        &self.raw
    }

    pub fn as_ptr(&self) -> *const cef_main_args_t {
        &self.raw
    }
}

impl fmt::Debug for MainArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MainArgs").field("args", &self.args).finish()
    }
}

/// Runs a sub-process if the command line asks for one.
///
/// Returns the sub-process exit code, or `None` in the browser process.
#[cfg(feature = "libcef")]
pub fn execute_process(args: &MainArgs) -> Option<i32> {
    let code = unsafe {
        crate::sys::cef_execute_process(args.as_ptr(), ptr::null_mut(), ptr::null_mut())
    };
    if code >= 0 {
        debug!(code, "sub-process finished");
        Some(code)
    } else {
        None
    }
}

/// Validates `settings`, converts them and initializes CEF in the browser
/// process. The native settings record is released before returning.
#[cfg(feature = "libcef")]
pub fn initialize(args: &MainArgs, settings: &Settings) -> Result<(), AppError> {
    settings.validate()?;
    let native = settings.to_native();
    let ok = unsafe {
        crate::sys::cef_initialize(
            args.as_ptr(),
            native.as_ptr(),
            ptr::null_mut(),
            ptr::null_mut(),
        )
    };
    native.release();

    if ok == 0 {
        return Err(AppError::InitializeFailed);
    }
    info!("CEF initialized");
    Ok(())
}

/// Runs the CEF message loop until [`quit_message_loop`] is called.
#[cfg(feature = "libcef")]
pub fn run_message_loop() {
    debug!("entering CEF message loop");
    unsafe { crate::sys::cef_run_message_loop() }
}

#[cfg(feature = "libcef")]
pub fn quit_message_loop() {
    unsafe { crate::sys::cef_quit_message_loop() }
}

/// Shuts CEF down. Call on the thread that called [`initialize`].
#[cfg(feature = "libcef")]
pub fn shutdown() {
    info!("shutting down CEF");
    unsafe { crate::sys::cef_shutdown() }
}
