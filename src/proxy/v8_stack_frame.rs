//! V8 stack frame proxy.

use serde::{Deserialize, Serialize};

use super::Proxy;
use crate::sys::cef_v8stack_frame_t;

/// A single V8 stack frame.
///
/// Stack frames may only be used on the thread that produced them. Call
/// [`V8StackFrame::is_valid`] before any other accessor; the accessors do not
/// check it themselves.
#[derive(Debug, Clone, Copy)]
pub struct V8StackFrame {
    proxy: Proxy<cef_v8stack_frame_t>,
}

impl V8StackFrame {
    /// Wraps a native stack frame. Returns `None` for null or malformed pointers.
    ///
    /// # Safety
    ///
    /// See [`Proxy::from_raw`].
    pub unsafe fn from_raw(ptr: *mut cef_v8stack_frame_t) -> Option<Self> {
        Proxy::from_raw(ptr).map(|proxy| Self { proxy })
    }

    pub fn as_ptr(&self) -> *mut cef_v8stack_frame_t {
        self.proxy.as_ptr()
    }

    /// Returns true if the underlying handle is valid and it can be accessed
    /// on the current thread. Do not call any other methods if this returns
    /// false.
    pub fn is_valid(&self) -> bool {
        self.proxy.call_bool(self.proxy.table().is_valid)
    }

    /// Returns the name of the resource script that contains the function.
    pub fn script_name(&self) -> String {
        self.proxy.call_string(self.proxy.table().get_script_name)
    }

    /// Returns the name of the resource script that contains the function or
    /// the sourceURL value if the script name is undefined and its source ends
    /// with a `//@ sourceURL=...` string.
    pub fn script_name_or_source_url(&self) -> String {
        self.proxy
            .call_string(self.proxy.table().get_script_name_or_source_url)
    }

    /// Returns the name of the function.
    pub fn function_name(&self) -> String {
        self.proxy.call_string(self.proxy.table().get_function_name)
    }

    /// Returns the 1-based line number for the function call or 0 if unknown.
    pub fn line_number(&self) -> i32 {
        self.proxy.call_int(self.proxy.table().get_line_number)
    }

    /// Returns the 1-based column offset on the line for the function call or
    /// 0 if unknown.
    pub fn column(&self) -> i32 {
        self.proxy.call_int(self.proxy.table().get_column)
    }

    /// Returns true if the function was compiled using eval().
    pub fn is_eval(&self) -> bool {
        self.proxy.call_bool(self.proxy.table().is_eval)
    }

    /// Returns true if the function was called as a constructor via "new".
    pub fn is_constructor(&self) -> bool {
        self.proxy.call_bool(self.proxy.table().is_constructor)
    }

    /// Copies every field, or `None` if the frame is no longer valid.
    pub fn info(&self) -> Option<StackFrameInfo> {
        if !self.is_valid() {
            return None;
        }
        Some(StackFrameInfo {
            script_name: self.script_name(),
            script_name_or_source_url: self.script_name_or_source_url(),
            function_name: self.function_name(),
            line_number: self.line_number(),
            column: self.column(),
            is_eval: self.is_eval(),
            is_constructor: self.is_constructor(),
        })
    }
}

/// Owned copy of a stack frame.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StackFrameInfo {
    pub script_name: String,
    pub script_name_or_source_url: String,
    pub function_name: String,
    pub line_number: i32,
    pub column: i32,
    pub is_eval: bool,
    pub is_constructor: bool,
}

impl std::fmt::Display for StackFrameInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let function = if self.function_name.is_empty() {
            "<anonymous>"
        } else {
            &self.function_name
        };
        let prefix = if self.is_constructor { "new " } else { "" };
        write!(
            f,
            "at {}{} ({}:{}:{})",
            prefix, function, self.script_name_or_source_url, self.line_number, self.column
        )
    }
}
