mod directional;
mod point;
mod spot;

pub use directional::*;
pub use point::*;
pub use spot::*;

use crate::{material::Color, math::{Point3, Vector3}};

/// A light source contributing direct illumination. Implementations
/// answer per-point queries so the tracer can shade and shadow-test
/// without knowing the light's kind.
pub trait LightSource: Send + Sync {
    /// The light's intensity as received at `point`.
    fn intensity_at(&self, point: Point3) -> Color;

    /// Unit direction of the light at `point`, pointing from the light
    /// toward the point.
    fn direction_to(&self, point: Point3) -> Vector3;

    /// Distance from the light to `point`; shadow rays are bounded by
    /// it so occluders behind the light do not count.
    fn distance_to(&self, point: Point3) -> f64;
}

/// Uniform background illumination, added once per traced ray rather
/// than per bounce. The effective intensity `Ia * Ka` is fixed at
/// construction.
#[derive(Clone, Debug)]
pub struct AmbientLight {
    intensity: Color,
}

impl AmbientLight {
    /// No ambient light at all.
    pub const NONE: AmbientLight = AmbientLight {
        intensity: Color::BLACK,
    };

    /// Instantiate ambient light from a raw intensity and an
    /// attenuation coefficient triple.
    pub fn new(ia: Color, ka: Color) -> Self {
        Self { intensity: ia * ka }
    }

    /// The precomputed effective intensity.
    pub fn intensity(&self) -> Color {
        self.intensity
    }
}

#[test]
fn ambient_intensity_is_precomputed() {
    let ambient = AmbientLight::new(Color::new(100.0, 200.0, 50.0), Color::new(0.5, 0.1, 1.0));
    assert_eq!(ambient.intensity(), Color::new(50.0, 20.0, 50.0));
    assert_eq!(AmbientLight::NONE.intensity(), Color::BLACK);
}
