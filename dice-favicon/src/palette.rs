//! Fixed colors of the two dice.

use std::fmt;

/// An opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// The color as a fully opaque RGBA quadruple.
    pub const fn rgba(&self) -> [u8; 4] {
        [self.r, self.g, self.b, 0xff]
    }
}

/// Lowercase `#rrggbb`, as used in SVG attributes.
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// How one die is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DieStyle {
    /// Used as the gradient id in the vector form
    pub id: &'static str,

    /// Flat body color for raster output
    pub fill: Color,

    /// Diagonal body gradient for vector output (top-left to bottom-right)
    pub gradient: (Color, Color),

    pub outline: Color,
    pub pip: Color,
}

/// The light die, drawn first.
pub const BACK_DIE: DieStyle = DieStyle {
    id: "dice1",
    fill: Color::rgb(0xf0, 0xf0, 0xf0),
    gradient: (Color::rgb(0xf5, 0xf5, 0xf5), Color::rgb(0xe0, 0xe0, 0xe0)),
    outline: Color::rgb(0xaa, 0xaa, 0xaa),
    pip: Color::rgb(0x22, 0x22, 0x22),
};

/// The dark die, drawn last so it covers the back die where they overlap.
pub const FRONT_DIE: DieStyle = DieStyle {
    id: "dice2",
    fill: Color::rgb(0xc6, 0x28, 0x28),
    gradient: (Color::rgb(0xc6, 0x28, 0x28), Color::rgb(0x8e, 0x00, 0x00)),
    outline: Color::rgb(0x8e, 0x00, 0x00),
    pip: Color::rgb(0xff, 0xff, 0xff),
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_display() {
        assert_eq!(BACK_DIE.fill.to_string(), "#f0f0f0");
        assert_eq!(FRONT_DIE.outline.to_string(), "#8e0000");
        assert_eq!(Color::rgb(0, 10, 255).to_string(), "#000aff");
    }

    #[test]
    fn test_palettes_are_distinct() {
        for color in [BACK_DIE.fill, BACK_DIE.outline, BACK_DIE.pip] {
            assert_ne!(color, FRONT_DIE.fill);
            assert_ne!(color, FRONT_DIE.outline);
            assert_ne!(color, FRONT_DIE.pip);
        }
    }
}
