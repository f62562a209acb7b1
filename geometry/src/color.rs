use std::ops::{Add, Div, Mul};

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Color {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub alpha: f32,
}

impl Color {
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);

    pub const fn rgb(red: f32, green: f32, blue: f32) -> Self {
        Self::new(red, green, blue, 1.0)
    }

    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            alpha,
            red,
            green,
            blue,
        }
    }

    pub fn rgb_u32(rgb: u32) -> Self {
        let r = (rgb & 0xff0000) >> 16;
        let g = (rgb & 0xff00) >> 8;
        let b = rgb & 0xff;
        let r = r as f32 / 255.0;
        let g = g as f32 / 255.0;
        let b = b as f32 / 255.0;
        Color::rgb(r, g, b)
    }

    /// Parses a CSS-style hex color: `#rgb`, `#rgba`, `#rrggbb`, or `#rrggbbaa`.
    pub fn from_css(s: &str) -> Option<Self> {
        let digits = s.strip_prefix('#')?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }

        // Short forms replicate each nibble (#fff == #ffffff).
        let wide = |d: &str| u8::from_str_radix(d, 16).ok().map(|v| v * 0x11);
        let pair = |d: &str| u8::from_str_radix(d, 16).ok();

        let (r, g, b, a) = match digits.len() {
            3 => (wide(&digits[0..1])?, wide(&digits[1..2])?, wide(&digits[2..3])?, 255),
            4 => (
                wide(&digits[0..1])?,
                wide(&digits[1..2])?,
                wide(&digits[2..3])?,
                wide(&digits[3..4])?,
            ),
            6 => (pair(&digits[0..2])?, pair(&digits[2..4])?, pair(&digits[4..6])?, 255),
            8 => (
                pair(&digits[0..2])?,
                pair(&digits[2..4])?,
                pair(&digits[4..6])?,
                pair(&digits[6..8])?,
            ),
            _ => return None,
        };

        Some(Self::from_rgba8([r, g, b, a]))
    }

    pub fn from_rgba8([r, g, b, a]: [u8; 4]) -> Self {
        Self::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    /// The 4-byte RGBA form used by per-instance color buffers.
    pub fn to_rgba8(self) -> [u8; 4] {
        let b = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [b(self.red), b(self.green), b(self.blue), b(self.alpha)]
    }

    pub fn mix(self, other: Self) -> Self {
        (self + other) / 2.0
    }

    pub fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl Add for Color {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.red + rhs.red,
            self.green + rhs.green,
            self.blue + rhs.blue,
            self.alpha + rhs.alpha,
        )
    }
}

impl Div<f32> for Color {
    type Output = Self;
    fn div(self, rhs: f32) -> Self {
        Self::new(
            self.red / rhs,
            self.green / rhs,
            self.blue / rhs,
            self.alpha / rhs,
        )
    }
}

impl Mul<f32> for Color {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(
            self.red * rhs,
            self.green * rhs,
            self.blue * rhs,
            self.alpha * rhs,
        )
    }
}

impl From<(f32, f32, f32)> for Color {
    fn from((red, green, blue): (f32, f32, f32)) -> Self {
        Self::rgb(red, green, blue)
    }
}

impl From<[u8; 4]> for Color {
    fn from(rgba: [u8; 4]) -> Self {
        Self::from_rgba8(rgba)
    }
}
