use std::fmt;

/// An 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    ///
    /// ```
    /// use region_redact::style::Color;
    ///
    /// let color = Color::from_css_hex("#4a9eff").unwrap();
    /// assert_eq!(color, Color::rgba(0x4a, 0x9e, 0xff, 0xff));
    /// assert!(Color::from_css_hex("4a9eff").is_none());
    /// ```
    pub fn from_css_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize, len: usize| -> Option<u8> {
            let part = digits.get(i * len..(i + 1) * len)?;
            let value = u8::from_str_radix(part, 16).ok()?;
            // #abc expands to #aabbcc
            Some(if len == 1 { value * 17 } else { value })
        };
        match digits.len() {
            3 => Some(Color::rgba(channel(0, 1)?, channel(1, 1)?, channel(2, 1)?, 255)),
            6 => Some(Color::rgba(channel(0, 2)?, channel(1, 2)?, channel(2, 2)?, 255)),
            8 => Some(Color::rgba(
                channel(0, 2)?,
                channel(1, 2)?,
                channel(2, 2)?,
                channel(3, 2)?,
            )),
            _ => None,
        }
    }

    pub fn with_alpha(self, alpha: f64) -> Self {
        let a = (alpha.max(0.0).min(1.0) * 255.0).round() as u8;
        Color { a, ..self }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

/// The part of a polygon's style that selection is allowed to touch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlineStyle {
    pub color: Color,
    pub width: f64,
}

/// `#1a3a6b` at 60% opacity.
pub const DEFAULT_FILL: Color = Color::rgba(0x1a, 0x3a, 0x6b, 153);

/// `#4a9eff` at 90% opacity, 1.5px.
pub const DEFAULT_OUTLINE: OutlineStyle = OutlineStyle {
    color: Color::rgba(0x4a, 0x9e, 0xff, 230),
    width: 1.5,
};

/// Opaque cyan, 3.5px.
pub const HIGHLIGHT_OUTLINE: OutlineStyle = OutlineStyle {
    color: Color::rgba(0x00, 0xff, 0xff, 255),
    width: 3.5,
};
