use std::ops::{Add, Div, Mul};

/// A linear RGB color carrying radiance on a 0–255 scale per channel.
///
/// Channels are unbounded above while shading accumulates light;
/// clamping to the displayable range happens only when a pixel is
/// written to the image sink.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    /// No light at all.
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    /// The identity coefficient: scaling by it changes nothing.
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    /// Instantiate a new Color.
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// A gray color with the same value in every channel.
    pub fn splat(value: f64) -> Self {
        Self::new(value, value, value)
    }

    /// Whether every channel is below `threshold`. This is the
    /// energy-cutoff test: a contribution whose coefficient product
    /// sits entirely under the threshold is pruned as imperceptible.
    pub fn below(self, threshold: f64) -> bool {
        self.r < threshold && self.g < threshold && self.b < threshold
    }

    /// Clamp into the 8-bit displayable range. Only the image sink
    /// calls this; shading keeps the full dynamic range.
    pub fn to_rgb(self) -> image::Rgb<u8> {
        image::Rgb([
            self.r.clamp(0.0, 255.0) as u8,
            self.g.clamp(0.0, 255.0) as u8,
            self.b.clamp(0.0, 255.0) as u8,
        ])
    }
}

impl Add for Color {
    type Output = Color;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            r: self.r + rhs.r,
            g: self.g + rhs.g,
            b: self.b + rhs.b,
        }
    }
}

/// Per-channel scaling by a coefficient triple.
impl Mul for Color {
    type Output = Color;

    fn mul(self, rhs: Self) -> Self::Output {
        Self {
            r: self.r * rhs.r,
            g: self.g * rhs.g,
            b: self.b * rhs.b,
        }
    }
}

impl Mul<f64> for Color {
    type Output = Color;

    fn mul(self, rhs: f64) -> Self::Output {
        Self {
            r: self.r * rhs,
            g: self.g * rhs,
            b: self.b * rhs,
        }
    }
}

impl Div<f64> for Color {
    type Output = Color;

    fn div(self, rhs: f64) -> Self::Output {
        Self {
            r: self.r / rhs,
            g: self.g / rhs,
            b: self.b / rhs,
        }
    }
}

/// Reflectance coefficients of a surface, one triple per effect so
/// every channel attenuates independently.
#[derive(Clone, Debug, Default)]
pub struct Material {
    /// Diffuse reflection coefficients.
    pub kd: Color,

    /// Specular reflection coefficients.
    pub ks: Color,

    /// Transparency coefficients. Black is fully opaque, the identity
    /// fully transparent.
    pub kt: Color,

    /// Mirror reflection coefficients.
    pub kr: Color,

    /// Specular shininess exponent.
    pub shininess: i32,
}

#[test]
fn color_arithmetic() {
    let a = Color::new(1.0, 2.0, 3.0);
    let b = Color::new(0.5, 0.5, 2.0);

    assert_eq!(a + b, Color::new(1.5, 2.5, 5.0));
    assert_eq!(a * b, Color::new(0.5, 1.0, 6.0));
    assert_eq!(a * 2.0, Color::new(2.0, 4.0, 6.0));
    assert_eq!(a / 2.0, Color::new(0.5, 1.0, 1.5));

    assert_eq!(a * Color::WHITE, a);
    assert_eq!(a * Color::BLACK, Color::BLACK);
}

#[test]
fn cutoff_requires_every_channel() {
    assert!(Color::new(0.0005, 0.0001, 0.0).below(0.001));
    assert!(!Color::new(0.0005, 0.1, 0.0).below(0.001));
    assert!(Color::BLACK.below(0.001));
}

#[test]
fn rgb_conversion_clamps_at_the_sink() {
    assert_eq!(Color::new(-5.0, 128.0, 400.0).to_rgb(), image::Rgb([0, 128, 255]));
    assert_eq!(Color::splat(255.0).to_rgb(), image::Rgb([255, 255, 255]));
}

#[test]
fn material_defaults_to_zero_coefficients() {
    let material = Material::default();
    assert_eq!(material.kd, Color::BLACK);
    assert_eq!(material.ks, Color::BLACK);
    assert_eq!(material.kt, Color::BLACK);
    assert_eq!(material.kr, Color::BLACK);
    assert_eq!(material.shininess, 0);
}
