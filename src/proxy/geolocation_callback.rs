//! Geolocation permission callback proxy.

use tracing::debug;

use super::{Proxy, Retained};
use crate::sys::cef_geolocation_callback_t;
use crate::types::to_flag;

/// Callback used to answer a geolocation permission request, either inside
/// the handler or later.
#[derive(Debug, Clone, Copy)]
pub struct GeolocationCallback {
    proxy: Proxy<cef_geolocation_callback_t>,
}

impl GeolocationCallback {
    /// Wraps a native callback. Returns `None` for null or malformed pointers.
    ///
    /// # Safety
    ///
    /// See [`Proxy::from_raw`].
    pub unsafe fn from_raw(ptr: *mut cef_geolocation_callback_t) -> Option<Self> {
        Proxy::from_raw(ptr).map(|proxy| Self { proxy })
    }

    pub fn as_ptr(&self) -> *mut cef_geolocation_callback_t {
        self.proxy.as_ptr()
    }

    /// Call to allow or deny geolocation access.
    pub fn cont(&self, allow: bool) {
        debug!(allow, "continuing geolocation permission request");
        if let Some(cont) = self.proxy.table().cont {
            unsafe { cont(self.as_ptr(), to_flag(allow)) }
        }
    }

    /// Keeps the native callback alive past the handler call so the request
    /// can be answered later.
    pub fn retain(&self) -> RetainedGeolocationCallback {
        RetainedGeolocationCallback {
            inner: self.proxy.retain(),
        }
    }
}

/// An owning reference to a geolocation callback.
#[derive(Debug)]
pub struct RetainedGeolocationCallback {
    inner: Retained<cef_geolocation_callback_t>,
}

// Callback objects use atomic reference counting and may be continued from
// any browser process thread.
unsafe impl Send for RetainedGeolocationCallback {}

impl RetainedGeolocationCallback {
    /// Non-owning view of the retained callback.
    pub fn callback(&self) -> GeolocationCallback {
        GeolocationCallback {
            proxy: self.inner.proxy(),
        }
    }

    /// Answers the request and drops the reference.
    pub fn cont(self, allow: bool) {
        self.callback().cont(allow);
    }
}
