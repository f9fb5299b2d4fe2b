use crate::{
    material::Color,
    math::{Point3, Vector3},
};

use super::LightSource;

/// A point light emitting in all directions, attenuated with distance
/// by the factor `kc + kl * d + kq * d²`.
#[derive(Clone, Debug)]
pub struct PointLight {
    intensity: Color,
    position: Point3,
    kc: f64,
    kl: f64,
    kq: f64,
}

impl PointLight {
    /// Instantiate a new PointLight with constant attenuation only.
    pub fn new(intensity: Color, position: Point3) -> Self {
        Self {
            intensity,
            position,
            kc: 1.0,
            kl: 0.0,
            kq: 0.0,
        }
    }

    /// Replace the constant, linear, and quadratic attenuation
    /// factors.
    pub fn with_attenuation(mut self, kc: f64, kl: f64, kq: f64) -> Self {
        self.kc = kc;
        self.kl = kl;
        self.kq = kq;
        self
    }
}

impl LightSource for PointLight {
    fn intensity_at(&self, point: Point3) -> Color {
        let distance = self.position.distance(point);
        let factor = self.kc + self.kl * distance + self.kq * distance * distance;
        self.intensity / factor
    }

    fn direction_to(&self, point: Point3) -> Vector3 {
        (point - self.position).normalize()
    }

    fn distance_to(&self, point: Point3) -> f64 {
        self.position.distance(point)
    }
}

#[test]
fn attenuation_with_distance() {
    let light = PointLight::new(Color::splat(1000.0), Point3::new(0.0, 0.0, 0.0))
        .with_attenuation(1.0, 0.5, 0.25);

    // factor at d = 2: 1 + 1 + 1 = 3
    let at = light.intensity_at(Point3::new(0.0, 0.0, 2.0));
    assert!((at.r - 1000.0 / 3.0).abs() < 1e-9);

    // default attenuation leaves the intensity unchanged
    let bare = PointLight::new(Color::splat(1000.0), Point3::default());
    assert_eq!(bare.intensity_at(Point3::new(0.0, 3.0, 4.0)), Color::splat(1000.0));
}

#[test]
fn geometry_queries() {
    let light = PointLight::new(Color::WHITE, Point3::new(0.0, 0.0, 5.0));
    let point = Point3::new(0.0, 0.0, 1.0);

    assert_eq!(light.direction_to(point), Vector3::new(0.0, 0.0, -1.0));
    assert_eq!(light.distance_to(point), 4.0);
}
