//! Browser proxy.

use super::{add_ref_raw, Proxy};
use crate::sys::cef_browser_t;
use crate::types::from_flag;

/// A browser window. In the browser process the methods may be called on any
/// thread unless noted; in the render process only on the main thread.
#[derive(Debug, Clone, Copy)]
pub struct Browser {
    proxy: Proxy<cef_browser_t>,
}

impl Browser {
    /// Wraps a native browser. Returns `None` for null or malformed pointers.
    ///
    /// # Safety
    ///
    /// See [`Proxy::from_raw`].
    pub unsafe fn from_raw(ptr: *mut cef_browser_t) -> Option<Self> {
        Proxy::from_raw(ptr).map(|proxy| Self { proxy })
    }

    pub fn as_ptr(&self) -> *mut cef_browser_t {
        self.proxy.as_ptr()
    }

    /// Globally unique identifier for this browser.
    pub fn identifier(&self) -> i32 {
        self.proxy.call_int(self.proxy.table().get_identifier)
    }

    pub fn can_go_back(&self) -> bool {
        self.proxy.call_bool(self.proxy.table().can_go_back)
    }

    pub fn go_back(&self) {
        self.proxy.call_void(self.proxy.table().go_back)
    }

    pub fn can_go_forward(&self) -> bool {
        self.proxy.call_bool(self.proxy.table().can_go_forward)
    }

    pub fn go_forward(&self) {
        self.proxy.call_void(self.proxy.table().go_forward)
    }

    /// Returns true if the browser is currently loading.
    pub fn is_loading(&self) -> bool {
        self.proxy.call_bool(self.proxy.table().is_loading)
    }

    pub fn reload(&self) {
        self.proxy.call_void(self.proxy.table().reload)
    }

    /// Reload the current page ignoring any cached data.
    pub fn reload_ignore_cache(&self) {
        self.proxy.call_void(self.proxy.table().reload_ignore_cache)
    }

    pub fn stop_load(&self) {
        self.proxy.call_void(self.proxy.table().stop_load)
    }

    /// Returns true if the window is a popup window.
    pub fn is_popup(&self) -> bool {
        self.proxy.call_bool(self.proxy.table().is_popup)
    }

    /// Returns true if a document has been loaded in the browser.
    pub fn has_document(&self) -> bool {
        self.proxy.call_bool(self.proxy.table().has_document)
    }

    /// Returns the number of frames that currently exist.
    pub fn frame_count(&self) -> usize {
        match self.proxy.table().get_frame_count {
            Some(f) => unsafe { f(self.as_ptr()) },
            None => 0,
        }
    }

    /// Returns true if this object is pointing to the same handle as `other`.
    pub fn is_same(&self, other: &Browser) -> bool {
        match self.proxy.table().is_same {
            // The callee releases `other`; hand it a reference of its own.
            Some(f) => from_flag(unsafe {
                add_ref_raw(other.as_ptr());
                f(self.as_ptr(), other.as_ptr())
            }),
            None => false,
        }
    }
}
