//! Packed ARGB colors.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::sys::cef_color_t;

/// An RGBA color that packs to `0xAARRGGBB`.
///
/// # Example
///
/// ```rust
/// use cef_embed::types::Color;
///
/// let color = Color::new(10, 20, 30);
/// assert_eq!(color.argb(), 0xFF0A141E);
/// assert_eq!(Color::from_argb(0xFF0A141E), color);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Fully transparent black (`0x00000000`).
    pub const TRANSPARENT: Color = Color::from_argb(0);

    /// Creates an opaque color.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self::with_alpha(r, g, b, u8::MAX)
    }

    /// Creates a color with an explicit alpha channel.
    pub const fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Unpacks `0xAARRGGBB`.
    pub const fn from_argb(argb: u32) -> Self {
        Self {
            r: ((argb >> 16) & 0xff) as u8,
            g: ((argb >> 8) & 0xff) as u8,
            b: (argb & 0xff) as u8,
            a: ((argb >> 24) & 0xff) as u8,
        }
    }

    /// Packs to `0xAARRGGBB`.
    pub const fn argb(&self) -> u32 {
        (self.a as u32) << 24 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }

    pub(crate) fn to_native(self) -> cef_color_t {
        self.argb()
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::TRANSPARENT
    }
}

impl From<u32> for Color {
    fn from(argb: u32) -> Self {
        Self::from_argb(argb)
    }
}

impl From<Color> for u32 {
    fn from(color: Color) -> Self {
        color.argb()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08X}", self.argb())
    }
}

/// Error returned when a color string is not `#AARRGGBB` or `#RRGGBB`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid color '{0}': expected #AARRGGBB or #RRGGBB")]
pub struct ParseColorError(pub String);

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        let err = || ParseColorError(s.to_string());

        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }
        match hex.len() {
            8 => u32::from_str_radix(hex, 16).map(Color::from_argb).map_err(|_| err()),
            6 => u32::from_str_radix(hex, 16)
                .map(|rgb| Color::from_argb(0xFF00_0000 | rgb))
                .map_err(|_| err()),
            _ => Err(err()),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}
