//! Proxies over native reference-counted objects.
//!
//! A [`Proxy`] is a non-owning view of a native object and its function
//! table. The native layer controls the object's lifetime and thread
//! affinity; a proxy never adds or drops references on its own. Each typed
//! proxy ([`V8Exception`], [`V8StackFrame`], [`Browser`],
//! [`GeolocationCallback`]) exposes accessors that make exactly one native
//! call and convert the result.
//!
//! When an object must outlive the native call that handed it out (for
//! example a permission callback answered later), take an owning reference
//! with [`Proxy::retain`].

use std::fmt;
use std::mem::size_of;
use std::ops::Deref;
use std::os::raw::c_int;
use std::ptr::NonNull;

use tracing::{trace, warn};

use crate::sys::{
    cef_base_t, cef_browser_t, cef_geolocation_callback_t, cef_string_userfree_t,
    cef_v8exception_t, cef_v8stack_frame_t,
};
use crate::types::from_flag;
use crate::types::string::take_userfree_string;

mod browser;
mod geolocation_callback;
mod v8_exception;
mod v8_stack_frame;

pub use browser::Browser;
pub use geolocation_callback::{GeolocationCallback, RetainedGeolocationCallback};
pub use v8_exception::{JsException, V8Exception};
pub use v8_stack_frame::{StackFrameInfo, V8StackFrame};

/// A native structure that starts with a [`cef_base_t`] header.
///
/// # Safety
///
/// Implementors must be `#[repr(C)]` with `cef_base_t` as their first field.
pub unsafe trait CefObject {
    /// Native type name used in diagnostics.
    const NAME: &'static str;
}

unsafe impl CefObject for cef_v8exception_t {
    const NAME: &'static str = "cef_v8exception_t";
}

unsafe impl CefObject for cef_v8stack_frame_t {
    const NAME: &'static str = "cef_v8stack_frame_t";
}

unsafe impl CefObject for cef_browser_t {
    const NAME: &'static str = "cef_browser_t";
}

unsafe impl CefObject for cef_geolocation_callback_t {
    const NAME: &'static str = "cef_geolocation_callback_t";
}

fn base_of<T: CefObject>(ptr: *mut T) -> *mut cef_base_t {
    ptr.cast()
}

/// Non-owning view of a native object.
pub struct Proxy<T: CefObject> {
    ptr: NonNull<T>,
}

impl<T: CefObject> Proxy<T> {
    /// Wraps a native pointer.
    ///
    /// Returns `None` if `ptr` is null or the object's declared size is
    /// smaller than the layout this crate expects.
    ///
    /// # Safety
    ///
    /// A non-null `ptr` must point to a live object of type `T` that stays
    /// alive, and is only used from threads the native layer allows, for as
    /// long as the proxy is used.
    pub unsafe fn from_raw(ptr: *mut T) -> Option<Self> {
        let ptr = NonNull::new(ptr)?;
        let size = (*base_of(ptr.as_ptr())).size;
        if size < size_of::<T>() {
            warn!(
                object = T::NAME,
                size,
                expected = size_of::<T>(),
                "native object is smaller than its layout"
            );
            return None;
        }
        Some(Self { ptr })
    }

    /// The wrapped pointer.
    pub fn as_ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Takes an owning reference that keeps the object alive until dropped.
    pub fn retain(&self) -> Retained<T> {
        Retained::new(*self)
    }

    pub(crate) fn table(&self) -> &T {
        // Valid per the `from_raw` contract.
        unsafe { self.ptr.as_ref() }
    }

    /// Calls a string accessor, copies the result and frees the native string.
    pub(crate) fn call_string(
        &self,
        f: Option<unsafe extern "C" fn(*mut T) -> cef_string_userfree_t>,
    ) -> String {
        match f {
            Some(f) => unsafe { take_userfree_string(f(self.as_ptr())) },
            None => String::new(),
        }
    }

    pub(crate) fn call_int(&self, f: Option<unsafe extern "C" fn(*mut T) -> c_int>) -> i32 {
        match f {
            Some(f) => unsafe { f(self.as_ptr()) },
            None => 0,
        }
    }

    pub(crate) fn call_bool(&self, f: Option<unsafe extern "C" fn(*mut T) -> c_int>) -> bool {
        from_flag(self.call_int(f))
    }

    pub(crate) fn call_void(&self, f: Option<unsafe extern "C" fn(*mut T)>) {
        if let Some(f) = f {
            unsafe { f(self.as_ptr()) }
        }
    }
}

impl<T: CefObject> Clone for Proxy<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: CefObject> Copy for Proxy<T> {}

impl<T: CefObject> fmt::Debug for Proxy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Proxy")
            .field("type", &T::NAME)
            .field("ptr", &self.ptr)
            .finish()
    }
}

/// An owning reference to a native object: `add_ref` on creation, `release`
/// on drop.
pub struct Retained<T: CefObject> {
    proxy: Proxy<T>,
}

impl<T: CefObject> Retained<T> {
    fn new(proxy: Proxy<T>) -> Self {
        unsafe { add_ref_raw(proxy.as_ptr()) };
        trace!(object = T::NAME, "retained native object");
        Self { proxy }
    }

    /// The non-owning view of the retained object.
    pub fn proxy(&self) -> Proxy<T> {
        self.proxy
    }
}

impl<T: CefObject> Deref for Retained<T> {
    type Target = Proxy<T>;

    fn deref(&self) -> &Proxy<T> {
        &self.proxy
    }
}

impl<T: CefObject> Drop for Retained<T> {
    fn drop(&mut self) {
        unsafe { release_raw(self.proxy.as_ptr()) };
        trace!(object = T::NAME, "released native object");
    }
}

impl<T: CefObject> fmt::Debug for Retained<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Retained").field(&self.proxy).finish()
    }
}

/// Adds one native reference. Null is ignored.
///
/// Native methods that take another object as an argument release that
/// argument before returning, so the caller adds a reference first.
///
/// # Safety
///
/// `ptr` must be null or a live object.
pub(crate) unsafe fn add_ref_raw<T: CefObject>(ptr: *mut T) {
    if ptr.is_null() {
        return;
    }
    let base = base_of(ptr);
    if let Some(add_ref) = (*base).add_ref {
        add_ref(base);
    }
}

/// Drops one native reference. Null is ignored.
///
/// # Safety
///
/// `ptr` must be null or a live object on which the caller holds a reference.
pub(crate) unsafe fn release_raw<T: CefObject>(ptr: *mut T) {
    if ptr.is_null() {
        return;
    }
    let base = base_of(ptr);
    if let Some(release) = (*base).release {
        release(base);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI32, Ordering};

    #[repr(C)]
    struct CountedCallback {
        native: cef_geolocation_callback_t,
        refs: AtomicI32,
    }

    unsafe extern "C" fn add_ref(base: *mut cef_base_t) -> c_int {
        (*(base as *mut CountedCallback)).refs.fetch_add(1, Ordering::SeqCst) + 1
    }

    unsafe extern "C" fn release(base: *mut cef_base_t) -> c_int {
        (*(base as *mut CountedCallback)).refs.fetch_sub(1, Ordering::SeqCst) - 1
    }

    fn counted(size: usize) -> CountedCallback {
        CountedCallback {
            native: cef_geolocation_callback_t {
                base: cef_base_t {
                    size,
                    add_ref: Some(add_ref),
                    release: Some(release),
                    has_one_ref: None,
                },
                cont: None,
            },
            refs: AtomicI32::new(1),
        }
    }

    #[test]
    fn test_null_pointer_yields_none() {
        let proxy = unsafe { Proxy::<cef_v8exception_t>::from_raw(std::ptr::null_mut()) };
        assert!(proxy.is_none());
    }

    #[test]
    fn test_undersized_object_yields_none() {
        let mut object = counted(size_of::<cef_base_t>());
        let ptr = &mut object as *mut CountedCallback;
        let proxy = unsafe { Proxy::from_raw(ptr as *mut cef_geolocation_callback_t) };
        assert!(proxy.is_none());
    }

    #[test]
    fn test_retain_balances_references() {
        let mut object = counted(size_of::<cef_geolocation_callback_t>());
        let ptr = &mut object as *mut CountedCallback;
        let proxy = unsafe { Proxy::from_raw(ptr as *mut cef_geolocation_callback_t) }.unwrap();

        let retained = proxy.retain();
        assert_eq!(unsafe { (*ptr).refs.load(Ordering::SeqCst) }, 2);
        drop(retained);
        assert_eq!(unsafe { (*ptr).refs.load(Ordering::SeqCst) }, 1);
    }

    #[test]
    fn test_missing_entries_yield_neutral_values() {
        let mut object = counted(size_of::<cef_geolocation_callback_t>());
        let ptr = &mut object as *mut CountedCallback;
        let proxy = unsafe { Proxy::from_raw(ptr as *mut cef_geolocation_callback_t) }.unwrap();
        assert_eq!(proxy.call_int(None), 0);
        assert!(!proxy.call_bool(None));
        assert_eq!(proxy.call_string(None), "");
    }
}
