//! Marshalling primitives shared by the settings, proxy and handler layers.
//!
//! - [`string`]: UTF-16 native strings to and from Rust `String`s
//! - [`Color`]: packed `0xAARRGGBB` colors
//! - [`LogSeverity`], [`ContextSafetyImplementation`]: enums with exact native encodings
//! - [`to_flag`] / [`from_flag`]: boolean to native `int` flags

use std::os::raw::c_int;

mod color;
mod enums;
pub mod string;

pub use color::{Color, ParseColorError};
pub use enums::{ContextSafetyImplementation, LogSeverity, ParseEnumError};

/// Native boolean flag: 1 for true, 0 for false.
pub const fn to_flag(value: bool) -> c_int {
    if value {
        1
    } else {
        0
    }
}

/// Any non-zero native flag is true.
pub const fn from_flag(value: c_int) -> bool {
    value != 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags() {
        assert_eq!(to_flag(true), 1);
        assert_eq!(to_flag(false), 0);
        assert!(from_flag(1));
        assert!(from_flag(-3));
        assert!(!from_flag(0));
    }
}
