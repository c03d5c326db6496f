//! Native string runtime.
//!
//! With the `libcef` feature these symbols come from the CEF library. Without
//! it, an in-process implementation with the same semantics is compiled in so
//! the marshalling layer can be used (and tested) without a CEF distribution:
//!
//! - copies are NUL-terminated and released through the string's `dtor`,
//! - clearing calls `dtor` if present and resets the structure,
//! - userfree strings are heap-allocated structures freed by
//!   [`cef_string_userfree_utf16_free`].

use std::os::raw::c_int;

#[cfg(not(feature = "libcef"))]
use std::alloc::{alloc, dealloc, Layout};
#[cfg(not(feature = "libcef"))]
use std::mem::{align_of, size_of};
#[cfg(not(feature = "libcef"))]
use std::ptr;

use super::{char16, cef_string_userfree_utf16_t, cef_string_utf16_t};

#[cfg(feature = "libcef")]
extern "C" {
    pub fn cef_string_utf16_set(
        src: *const char16,
        src_len: usize,
        output: *mut cef_string_utf16_t,
        copy: c_int,
    ) -> c_int;

    pub fn cef_string_utf16_clear(str_: *mut cef_string_utf16_t);

    pub fn cef_string_userfree_utf16_alloc() -> cef_string_userfree_utf16_t;

    pub fn cef_string_userfree_utf16_free(str_: cef_string_userfree_utf16_t);
}

// Buffers carry their element count in a header so the `dtor`, which only
// receives the data pointer, can rebuild the allocation layout.
#[cfg(not(feature = "libcef"))]
const HEADER: usize = size_of::<usize>();

#[cfg(not(feature = "libcef"))]
fn buffer_layout(units: usize) -> Option<Layout> {
    let bytes = units.checked_mul(size_of::<char16>())?.checked_add(HEADER)?;
    Layout::from_size_align(bytes, align_of::<usize>()).ok()
}

#[cfg(not(feature = "libcef"))]
unsafe fn alloc_buffer(units: usize) -> *mut char16 {
    let Some(layout) = buffer_layout(units) else {
        return ptr::null_mut();
    };
    let base = alloc(layout);
    if base.is_null() {
        return ptr::null_mut();
    }
    (base as *mut usize).write(units);
    base.add(HEADER) as *mut char16
}

#[cfg(not(feature = "libcef"))]
unsafe extern "C" fn free_buffer(str_: *mut char16) {
    if str_.is_null() {
        return;
    }
    let base = (str_ as *mut u8).sub(HEADER);
    let units = (base as *const usize).read();
    if let Some(layout) = buffer_layout(units) {
        dealloc(base, layout);
    }
}

/// Sets `output` to `src`. With `copy != 0` the content is duplicated into a
/// fresh buffer owned by `output`; otherwise `output` borrows `src`.
///
/// # Safety
///
/// `src` must point to `src_len` readable code units (or be null) and `output`
/// must point to a valid, initialized string structure.
#[cfg(not(feature = "libcef"))]
pub unsafe extern "C" fn cef_string_utf16_set(
    src: *const char16,
    src_len: usize,
    output: *mut cef_string_utf16_t,
    copy: c_int,
) -> c_int {
    if output.is_null() {
        return 0;
    }
    cef_string_utf16_clear(output);

    if copy != 0 {
        if !src.is_null() && src_len > 0 {
            let buffer = alloc_buffer(src_len + 1);
            if buffer.is_null() {
                return 0;
            }
            ptr::copy_nonoverlapping(src, buffer, src_len);
            buffer.add(src_len).write(0);
            (*output).str_ = buffer;
            (*output).length = src_len;
            (*output).dtor = Some(free_buffer);
        }
    } else {
        (*output).str_ = src as *mut char16;
        (*output).length = src_len;
        (*output).dtor = None;
    }
    1
}

/// Releases the buffer owned by `str_` (if any) and resets it to empty.
///
/// # Safety
///
/// `str_` must be null or point to a valid string structure whose `dtor`, if
/// set, matches the allocation of its buffer.
#[cfg(not(feature = "libcef"))]
pub unsafe extern "C" fn cef_string_utf16_clear(str_: *mut cef_string_utf16_t) {
    if str_.is_null() {
        return;
    }
    if let Some(dtor) = (*str_).dtor {
        if !(*str_).str_.is_null() {
            dtor((*str_).str_);
        }
    }
    (*str_).str_ = ptr::null_mut();
    (*str_).length = 0;
    (*str_).dtor = None;
}

/// Allocates an empty userfree string.
///
/// # Safety
///
/// The result must be freed exactly once with [`cef_string_userfree_utf16_free`].
#[cfg(not(feature = "libcef"))]
pub unsafe extern "C" fn cef_string_userfree_utf16_alloc() -> cef_string_userfree_utf16_t {
    Box::into_raw(Box::new(cef_string_utf16_t::default()))
}

/// Clears and frees a userfree string. Null is ignored.
///
/// # Safety
///
/// `str_` must be null or come from [`cef_string_userfree_utf16_alloc`] and
/// not have been freed already.
#[cfg(not(feature = "libcef"))]
pub unsafe extern "C" fn cef_string_userfree_utf16_free(str_: cef_string_userfree_utf16_t) {
    if str_.is_null() {
        return;
    }
    cef_string_utf16_clear(str_);
    drop(Box::from_raw(str_));
}

#[cfg(all(test, not(feature = "libcef")))]
mod tests {
    use super::*;

    fn units(s: &str) -> Vec<u16> {
        s.encode_utf16().collect()
    }

    #[test]
    fn test_set_copy_is_nul_terminated() {
        let src = units("hello");
        let mut out = cef_string_utf16_t::default();
        unsafe {
            assert_eq!(cef_string_utf16_set(src.as_ptr(), src.len(), &mut out, 1), 1);
            assert_eq!(out.length, 5);
            assert!(out.dtor.is_some());
            assert_ne!(out.str_ as *const u16, src.as_ptr());
            assert_eq!(*out.str_.add(5), 0);
            cef_string_utf16_clear(&mut out);
        }
        assert!(out.str_.is_null());
        assert_eq!(out.length, 0);
        assert!(out.dtor.is_none());
    }

    #[test]
    fn test_set_without_copy_borrows() {
        let src = units("borrowed");
        let mut out = cef_string_utf16_t::default();
        unsafe {
            cef_string_utf16_set(src.as_ptr(), src.len(), &mut out, 0);
        }
        assert_eq!(out.str_ as *const u16, src.as_ptr());
        assert!(out.dtor.is_none());
    }

    #[test]
    fn test_set_empty_leaves_null_buffer() {
        let mut out = cef_string_utf16_t::default();
        unsafe {
            assert_eq!(cef_string_utf16_set(ptr::null(), 0, &mut out, 1), 1);
        }
        assert!(out.str_.is_null());
        assert_eq!(out.length, 0);
    }

    #[test]
    fn test_set_replaces_previous_content() {
        let first = units("first");
        let second = units("2nd");
        let mut out = cef_string_utf16_t::default();
        unsafe {
            cef_string_utf16_set(first.as_ptr(), first.len(), &mut out, 1);
            cef_string_utf16_set(second.as_ptr(), second.len(), &mut out, 1);
            assert_eq!(out.length, 3);
            assert_eq!(std::slice::from_raw_parts(out.str_, 3), second.as_slice());
            cef_string_utf16_clear(&mut out);
        }
    }

    #[test]
    fn test_userfree_alloc_and_free() {
        let src = units("userfree");
        unsafe {
            let s = cef_string_userfree_utf16_alloc();
            assert!(!s.is_null());
            cef_string_utf16_set(src.as_ptr(), src.len(), s, 1);
            cef_string_userfree_utf16_free(s);
            cef_string_userfree_utf16_free(ptr::null_mut());
        }
    }
}
