//! Conversions between Rust strings and native UTF-16 string structures.

use std::slice;

use tracing::trace;

use crate::sys::{
    cef_string_t, cef_string_userfree_t, cef_string_userfree_utf16_alloc,
    cef_string_userfree_utf16_free, cef_string_utf16_clear, cef_string_utf16_set,
};

/// Writes `value` into `out` as a freshly allocated native copy.
///
/// Any buffer `out` already owns is released first. An empty `value` leaves
/// `out` empty without allocating. The caller owns the resulting buffer and
/// must eventually release it with [`clear_cef_string`].
pub fn set_cef_string(value: &str, out: &mut cef_string_t) {
    let units: Vec<u16> = value.encode_utf16().collect();
    set_cef_string_utf16(&units, out);
}

/// Writes raw UTF-16 code units into `out`, unpaired surrogates included.
///
/// Same ownership rules as [`set_cef_string`].
pub fn set_cef_string_utf16(units: &[u16], out: &mut cef_string_t) {
    // The runtime copies `units` before returning.
    unsafe {
        cef_string_utf16_set(units.as_ptr(), units.len(), out, 1);
    }
}

/// Releases the buffer owned by `s` and resets it to empty.
pub fn clear_cef_string(s: &mut cef_string_t) {
    unsafe { cef_string_utf16_clear(s) }
}

/// Copies a native string into a Rust `String`.
///
/// Unpaired surrogates are replaced with U+FFFD.
pub fn cef_string_to_string(s: &cef_string_t) -> String {
    if s.str_.is_null() || s.length == 0 {
        return String::new();
    }
    let units = unsafe { slice::from_raw_parts(s.str_, s.length) };
    String::from_utf16_lossy(units)
}

/// Copies a userfree string returned by a native accessor and frees it.
///
/// A null pointer yields an empty string.
///
/// # Safety
///
/// `ptr` must be null or a live userfree string that the caller owns. It is
/// invalid after this call.
pub unsafe fn take_userfree_string(ptr: cef_string_userfree_t) -> String {
    if ptr.is_null() {
        return String::new();
    }
    let value = cef_string_to_string(&*ptr);
    cef_string_userfree_utf16_free(ptr);
    trace!(len = value.len(), "released userfree string");
    value
}

/// Allocates a userfree string holding a copy of `value`.
///
/// Used when Rust code plays the native side of an accessor; ownership passes
/// to whoever receives the pointer.
pub fn new_userfree_string(value: &str) -> cef_string_userfree_t {
    unsafe {
        let ptr = cef_string_userfree_utf16_alloc();
        if !ptr.is_null() {
            set_cef_string(value, &mut *ptr);
        }
        ptr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_native_buffer() {
        let mut s = cef_string_t::default();
        set_cef_string("Grüße, 世界 🚀", &mut s);
        assert_eq!(s.length, "Grüße, 世界 🚀".encode_utf16().count());
        assert_eq!(cef_string_to_string(&s), "Grüße, 世界 🚀");
        clear_cef_string(&mut s);
        assert!(s.str_.is_null());
    }

    #[test]
    fn test_empty_string_does_not_allocate() {
        let mut s = cef_string_t::default();
        set_cef_string("", &mut s);
        assert!(s.str_.is_null());
        assert_eq!(cef_string_to_string(&s), "");
    }

    #[test]
    fn test_lone_surrogate_is_replaced() {
        let units = [0x0041u16, 0xD800, 0x0042];
        let s = cef_string_t {
            str_: units.as_ptr() as *mut u16,
            length: units.len(),
            dtor: None,
        };
        assert_eq!(cef_string_to_string(&s), "A\u{FFFD}B");
    }

    #[test]
    fn test_take_userfree_string() {
        let ptr = new_userfree_string("message");
        assert_eq!(unsafe { take_userfree_string(ptr) }, "message");
        assert_eq!(unsafe { take_userfree_string(std::ptr::null_mut()) }, "");
    }
}
