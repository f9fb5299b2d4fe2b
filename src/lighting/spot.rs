use crate::{
    material::Color,
    math::{Point3, Vector3},
};

use super::{LightSource, PointLight};

/// A spotlight: a point light concentrated along a beam direction.
/// Intensity falls off with the cosine of the angle to the beam,
/// raised to the `narrow_beam` exponent.
#[derive(Clone, Debug)]
pub struct SpotLight {
    light: PointLight,
    direction: Vector3,
    narrow_beam: f64,
}

impl SpotLight {
    /// Instantiate a new SpotLight beaming along `direction`.
    pub fn new(intensity: Color, position: Point3, direction: Vector3) -> Self {
        Self {
            light: PointLight::new(intensity, position),
            direction: direction.normalize(),
            narrow_beam: 1.0,
        }
    }

    /// Replace the positional attenuation factors.
    pub fn with_attenuation(mut self, kc: f64, kl: f64, kq: f64) -> Self {
        self.light = self.light.with_attenuation(kc, kl, kq);
        self
    }

    /// Sharpen the beam; higher exponents concentrate the light.
    pub fn with_narrow_beam(mut self, narrow_beam: f64) -> Self {
        self.narrow_beam = narrow_beam;
        self
    }
}

impl LightSource for SpotLight {
    fn intensity_at(&self, point: Point3) -> Color {
        let base = self.light.intensity_at(point);
        let projection = self
            .direction
            .dot(self.light.direction_to(point))
            .max(0.0)
            .powf(self.narrow_beam);
        base * projection
    }

    fn direction_to(&self, point: Point3) -> Vector3 {
        self.light.direction_to(point)
    }

    fn distance_to(&self, point: Point3) -> f64 {
        self.light.distance_to(point)
    }
}

#[test]
fn beam_projection() {
    let light = SpotLight::new(
        Color::splat(100.0),
        Point3::new(0.0, 0.0, 0.0),
        Vector3::new(0.0, 0.0, -1.0),
    );

    // straight down the beam: full intensity
    assert_eq!(light.intensity_at(Point3::new(0.0, 0.0, -2.0)), Color::splat(100.0));

    // behind the beam: nothing
    assert_eq!(light.intensity_at(Point3::new(0.0, 0.0, 3.0)), Color::BLACK);

    // perpendicular: nothing
    assert_eq!(light.intensity_at(Point3::new(2.0, 0.0, 0.0)), Color::BLACK);
}

#[test]
fn narrow_beam_sharpens_falloff() {
    let position = Point3::new(0.0, 0.0, 0.0);
    let direction = Vector3::new(0.0, 0.0, -1.0);
    let off_axis = Point3::new(1.0, 0.0, -1.0);

    let wide = SpotLight::new(Color::splat(100.0), position, direction);
    let narrow = SpotLight::new(Color::splat(100.0), position, direction).with_narrow_beam(8.0);

    assert!(narrow.intensity_at(off_axis).r < wide.intensity_at(off_axis).r);
    // on the axis both agree
    let on_axis = Point3::new(0.0, 0.0, -4.0);
    assert_eq!(narrow.intensity_at(on_axis), wide.intensity_at(on_axis));
}
