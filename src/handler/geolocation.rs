//! Geolocation permission handler.
//!
//! [`GeolocationHandler`] is the Rust face of `cef_geolocation_handler_t`.
//! [`into_native`] wraps an implementation in a reference-counted native
//! object whose function table dispatches into the trait.

use std::mem::size_of;
use std::os::raw::c_int;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::{debug, error, trace, warn};
use url::Url;

use super::PendingPermissions;
use crate::proxy::{release_raw, Browser, GeolocationCallback};
use crate::sys::{
    cef_base_t, cef_browser_t, cef_geolocation_callback_t, cef_geolocation_handler_t,
    cef_string_t,
};
use crate::types::string::cef_string_to_string;

/// Unique ID of a geolocation permission request.
pub type GeolocationRequestId = i32;

/// Answer returned from [`GeolocationHandler::on_request_geolocation_permission`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionAction {
    /// The handler takes responsibility for calling the callback, now or later.
    Allow,
    /// Cancel the request immediately.
    Deny,
}

impl PermissionAction {
    fn to_native(self) -> c_int {
        match self {
            PermissionAction::Allow => 1,
            PermissionAction::Deny => 0,
        }
    }
}

/// Implement this to handle events related to geolocation permission
/// requests. The methods are called on the browser process UI thread and must
/// not block it.
pub trait GeolocationHandler: Send + Sync {
    /// Called when a page requests permission to access geolocation
    /// information. `requesting_url` is the URL requesting permission and
    /// `request_id` is the unique ID for the request.
    ///
    /// Return [`PermissionAction::Allow`] and call
    /// [`GeolocationCallback::cont`] either in this method or at a later time
    /// (after [`GeolocationCallback::retain`]) to continue or cancel the
    /// request. Return [`PermissionAction::Deny`] to cancel the request
    /// immediately. Defaults to `Allow`.
    fn on_request_geolocation_permission(
        &self,
        _browser: &Browser,
        _requesting_url: &Url,
        _request_id: GeolocationRequestId,
        _callback: GeolocationCallback,
    ) -> PermissionAction {
        PermissionAction::Allow
    }

    /// Called when a geolocation access request is canceled. `request_id` is
    /// the ID passed to the matching request. Does nothing by default.
    fn on_cancel_geolocation_permission(
        &self,
        _browser: &Browser,
        _request_id: GeolocationRequestId,
    ) {
    }
}

/// Handler that parks every request in a [`PendingPermissions`] registry and
/// drops it again when the request is canceled.
///
/// The embedder answers requests through the shared registry.
#[derive(Debug, Clone, Default)]
pub struct DeferringGeolocationHandler {
    pending: Arc<PendingPermissions>,
}

impl DeferringGeolocationHandler {
    pub fn new(pending: Arc<PendingPermissions>) -> Self {
        Self { pending }
    }

    pub fn pending(&self) -> &Arc<PendingPermissions> {
        &self.pending
    }
}

impl GeolocationHandler for DeferringGeolocationHandler {
    fn on_request_geolocation_permission(
        &self,
        _browser: &Browser,
        requesting_url: &Url,
        request_id: GeolocationRequestId,
        callback: GeolocationCallback,
    ) -> PermissionAction {
        self.pending
            .defer(request_id, requesting_url.origin().ascii_serialization(), callback);
        PermissionAction::Allow
    }

    fn on_cancel_geolocation_permission(
        &self,
        _browser: &Browser,
        request_id: GeolocationRequestId,
    ) {
        self.pending.cancel(request_id);
    }
}

// ============================================================================
// Native adapter
// ============================================================================

#[repr(C)]
struct HandlerObject<H: GeolocationHandler> {
    native: cef_geolocation_handler_t,
    refs: AtomicUsize,
    handler: H,
}

/// Wraps `handler` in a native `cef_geolocation_handler_t` holding one
/// reference.
///
/// Ownership of that reference passes to the caller, who normally returns the
/// pointer from the client's `get_geolocation_handler`. The handler is
/// dropped when the last native reference is released.
pub fn into_native<H: GeolocationHandler + 'static>(handler: H) -> *mut cef_geolocation_handler_t {
    let object = Box::new(HandlerObject {
        native: cef_geolocation_handler_t {
            base: cef_base_t {
                size: size_of::<cef_geolocation_handler_t>(),
                add_ref: Some(add_ref::<H>),
                release: Some(release::<H>),
                has_one_ref: Some(has_one_ref::<H>),
            },
            on_request_geolocation_permission: Some(on_request_geolocation_permission::<H>),
            on_cancel_geolocation_permission: Some(on_cancel_geolocation_permission::<H>),
        },
        refs: AtomicUsize::new(1),
        handler,
    });
    debug!("created native geolocation handler");
    Box::into_raw(object).cast()
}

unsafe extern "C" fn add_ref<H: GeolocationHandler>(base: *mut cef_base_t) -> c_int {
    let object = &*(base as *const HandlerObject<H>);
    let refs = object.refs.fetch_add(1, Ordering::AcqRel) + 1;
    trace!(refs, "geolocation handler add_ref");
    refs as c_int
}

unsafe extern "C" fn release<H: GeolocationHandler>(base: *mut cef_base_t) -> c_int {
    let object = base as *mut HandlerObject<H>;
    let refs = (*object).refs.fetch_sub(1, Ordering::AcqRel) - 1;
    trace!(refs, "geolocation handler release");
    if refs == 0 {
        drop(Box::from_raw(object));
        debug!("destroyed native geolocation handler");
    }
    refs as c_int
}

unsafe extern "C" fn has_one_ref<H: GeolocationHandler>(base: *mut cef_base_t) -> c_int {
    let object = &*(base as *const HandlerObject<H>);
    c_int::from(object.refs.load(Ordering::Acquire) == 1)
}

unsafe extern "C" fn on_request_geolocation_permission<H: GeolocationHandler>(
    self_: *mut cef_geolocation_handler_t,
    browser: *mut cef_browser_t,
    requesting_url: *const cef_string_t,
    request_id: c_int,
    callback: *mut cef_geolocation_callback_t,
) -> c_int {
    let object = &*(self_ as *const HandlerObject<H>);

    let result = catch_unwind(AssertUnwindSafe(|| unsafe {
        dispatch_request(&object.handler, browser, requesting_url, request_id, callback)
    }))
    .unwrap_or_else(|_| {
        error!(request_id, "geolocation handler panicked; canceling request");
        PermissionAction::Deny
    });

    // Struct arguments arrive with a reference held for the callee.
    release_raw(browser);
    release_raw(callback);

    result.to_native()
}

unsafe fn dispatch_request<H: GeolocationHandler>(
    handler: &H,
    browser: *mut cef_browser_t,
    requesting_url: *const cef_string_t,
    request_id: c_int,
    callback: *mut cef_geolocation_callback_t,
) -> PermissionAction {
    let Some(browser) = Browser::from_raw(browser) else {
        warn!(request_id, "geolocation request without a browser; canceling");
        return PermissionAction::Deny;
    };
    let Some(callback) = GeolocationCallback::from_raw(callback) else {
        warn!(request_id, "geolocation request without a callback; canceling");
        return PermissionAction::Deny;
    };

    let url_text = if requesting_url.is_null() {
        String::new()
    } else {
        cef_string_to_string(&*requesting_url)
    };
    let url = match Url::parse(&url_text) {
        Ok(url) => url,
        Err(e) => {
            warn!(request_id, url = %url_text, error = %e, "unparsable requesting URL; canceling");
            return PermissionAction::Deny;
        }
    };

    debug!(request_id, url = %url, browser = browser.identifier(), "geolocation permission requested");
    handler.on_request_geolocation_permission(&browser, &url, request_id, callback)
}

unsafe extern "C" fn on_cancel_geolocation_permission<H: GeolocationHandler>(
    self_: *mut cef_geolocation_handler_t,
    browser: *mut cef_browser_t,
    request_id: c_int,
) {
    let object = &*(self_ as *const HandlerObject<H>);

    if let Some(proxy) = Browser::from_raw(browser) {
        debug!(request_id, "geolocation permission request canceled");
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            object.handler.on_cancel_geolocation_permission(&proxy, request_id)
        }));
        if outcome.is_err() {
            error!(request_id, "geolocation handler panicked during cancel");
        }
    } else {
        warn!(request_id, "geolocation cancel without a browser; ignoring");
    }

    release_raw(browser);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Silent;

    impl GeolocationHandler for Silent {}

    #[test]
    fn test_permission_action_encoding() {
        assert_eq!(PermissionAction::Allow.to_native(), 1);
        assert_eq!(PermissionAction::Deny.to_native(), 0);
    }

    #[test]
    fn test_native_object_lifecycle() {
        let native = into_native(Silent);
        unsafe {
            let base = native as *mut cef_base_t;
            assert_eq!((*base).size, size_of::<cef_geolocation_handler_t>());
            assert_eq!((*base).has_one_ref.unwrap()(base), 1);
            assert_eq!((*base).add_ref.unwrap()(base), 2);
            assert_eq!((*base).has_one_ref.unwrap()(base), 0);
            assert_eq!((*base).release.unwrap()(base), 1);
            assert_eq!((*base).release.unwrap()(base), 0);
        }
    }
}
