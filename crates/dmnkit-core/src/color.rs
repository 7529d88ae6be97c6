//! Colors of DMN diagram styles.
//!
//! DMNDI writes `fillColor`, `strokeColor` and `fontColor` as three integer
//! components in `0..=255`, so [`Color`] is a plain sRGB triple. CSS strings
//! (`#fff8e1`, `rgb(12 200 87)`, `gold`) are accepted through [`FromStr`] for
//! configuration and tests; alpha is dropped.

use std::{fmt, str::FromStr};

use color::{DynamicColor, Srgb};
use thiserror::Error;

/// Error returned when a CSS color string cannot be parsed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid color `{value}`: {reason}")]
pub struct ColorError {
    value: String,
    reason: String,
}

/// An opaque sRGB color as stored in a `dmndi:DMNStyle`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Color {
    red: u8,
    green: u8,
    blue: u8,
}

impl Color {
    pub const BLACK: Self = Self::from_rgb8(0, 0, 0);
    pub const WHITE: Self = Self::from_rgb8(255, 255, 255);

    /// Creates a color from its red, green and blue components.
    ///
    /// # Examples
    ///
    /// ```
    /// use dmnkit_core::color::Color;
    ///
    /// let fill = Color::from_rgb8(255, 255, 255);
    /// assert_eq!(fill, Color::WHITE);
    /// ```
    pub const fn from_rgb8(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    pub fn to_rgb8(self) -> (u8, u8, u8) {
        (self.red, self.green, self.blue)
    }

    pub fn red(self) -> u8 {
        self.red
    }

    pub fn green(self) -> u8 {
        self.green
    }

    pub fn blue(self) -> u8 {
        self.blue
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = DynamicColor::from_str(s).map_err(|err| ColorError {
            value: s.to_string(),
            reason: err.to_string(),
        })?;
        let rgba = parsed.to_alpha_color::<Srgb>().to_rgba8();
        Ok(Self::from_rgb8(rgba.r, rgba.g, rgba.b))
    }
}

/// Formats as a CSS hex color, `#rrggbb`.
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_css_color() {
        let color: Color = "#ff8000".parse().unwrap();
        assert_eq!(color.to_rgb8(), (255, 128, 0));

        let named: Color = "white".parse().unwrap();
        assert_eq!(named, Color::WHITE);
    }

    #[test]
    fn test_parse_error_message() {
        let err = "not-a-color".parse::<Color>().unwrap_err();
        assert!(err.to_string().starts_with("invalid color `not-a-color`"));
    }

    #[test]
    fn test_default_is_black() {
        assert_eq!(Color::default(), Color::BLACK);
    }

    #[test]
    fn test_display_is_hex() {
        assert_eq!(Color::from_rgb8(12, 200, 87).to_string(), "#0cc857");
    }

    #[test]
    fn test_display_parses_back() {
        let color = Color::from_rgb8(1, 2, 3);
        assert_eq!(color.to_string().parse::<Color>(), Ok(color));
    }
}
