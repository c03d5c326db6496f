//! V8 exception proxy.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Proxy;
use crate::sys::cef_v8exception_t;

/// A V8 exception. The methods of this type may be called on any render
/// process thread.
#[derive(Debug, Clone, Copy)]
pub struct V8Exception {
    proxy: Proxy<cef_v8exception_t>,
}

impl V8Exception {
    /// Wraps a native exception. Returns `None` for null or malformed pointers.
    ///
    /// # Safety
    ///
    /// See [`Proxy::from_raw`].
    pub unsafe fn from_raw(ptr: *mut cef_v8exception_t) -> Option<Self> {
        Proxy::from_raw(ptr).map(|proxy| Self { proxy })
    }

    pub fn as_ptr(&self) -> *mut cef_v8exception_t {
        self.proxy.as_ptr()
    }

    /// Returns the exception message.
    pub fn message(&self) -> String {
        self.proxy.call_string(self.proxy.table().get_message)
    }

    /// Returns the line of source code that the exception occurred within.
    pub fn source_line(&self) -> String {
        self.proxy.call_string(self.proxy.table().get_source_line)
    }

    /// Returns the resource name for the script from where the function
    /// causing the error originates.
    pub fn script_resource_name(&self) -> String {
        self.proxy.call_string(self.proxy.table().get_script_resource_name)
    }

    /// Returns the 1-based number of the line where the error occurred or 0 if
    /// the line number is unknown.
    pub fn line_number(&self) -> i32 {
        self.proxy.call_int(self.proxy.table().get_line_number)
    }

    /// Returns the index within the script of the first character where the
    /// error occurred.
    pub fn start_position(&self) -> i32 {
        self.proxy.call_int(self.proxy.table().get_start_position)
    }

    /// Returns the index within the script of the last character where the
    /// error occurred.
    pub fn end_position(&self) -> i32 {
        self.proxy.call_int(self.proxy.table().get_end_position)
    }

    /// Returns the index within the line of the first character where the
    /// error occurred.
    pub fn start_column(&self) -> i32 {
        self.proxy.call_int(self.proxy.table().get_start_column)
    }

    /// Returns the index within the line of the last character where the
    /// error occurred.
    pub fn end_column(&self) -> i32 {
        self.proxy.call_int(self.proxy.table().get_end_column)
    }

    /// Copies every field into an owned [`JsException`].
    pub fn to_error(&self) -> JsException {
        JsException {
            message: self.message(),
            source_line: self.source_line(),
            script_resource_name: self.script_resource_name(),
            line_number: self.line_number(),
            start_position: self.start_position(),
            end_position: self.end_position(),
            start_column: self.start_column(),
            end_column: self.end_column(),
        }
    }
}

/// Owned copy of a V8 exception, usable after the native object is gone.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Error)]
#[error("{message} ({script_resource_name}:{line_number}:{start_column})")]
pub struct JsException {
    pub message: String,
    pub source_line: String,
    pub script_resource_name: String,
    pub line_number: i32,
    pub start_position: i32,
    pub end_position: i32,
    pub start_column: i32,
    pub end_column: i32,
}

impl From<V8Exception> for JsException {
    fn from(exception: V8Exception) -> Self {
        exception.to_error()
    }
}
