use crate::{
    material::Color,
    math::{Point3, Vector3},
};

use super::LightSource;

/// A directional light: parallel rays from infinitely far away, like
/// sunlight. Intensity does not fall off with distance.
#[derive(Clone, Debug)]
pub struct DirectionalLight {
    intensity: Color,
    direction: Vector3,
}

impl DirectionalLight {
    /// Instantiate a new DirectionalLight shining along `direction`.
    pub fn new(intensity: Color, direction: Vector3) -> Self {
        Self {
            intensity,
            direction: direction.normalize(),
        }
    }
}

impl LightSource for DirectionalLight {
    fn intensity_at(&self, _point: Point3) -> Color {
        self.intensity
    }

    fn direction_to(&self, _point: Point3) -> Vector3 {
        self.direction
    }

    fn distance_to(&self, _point: Point3) -> f64 {
        f64::INFINITY
    }
}

#[test]
fn uniform_everywhere() {
    let light = DirectionalLight::new(Color::splat(500.0), Vector3::new(0.0, -2.0, 0.0));

    let a = Point3::new(0.0, 0.0, 0.0);
    let b = Point3::new(100.0, -3.0, 42.0);
    assert_eq!(light.intensity_at(a), light.intensity_at(b));
    assert_eq!(light.direction_to(a), Vector3::new(0.0, -1.0, 0.0));
    assert_eq!(light.direction_to(a), light.direction_to(b));
    assert_eq!(light.distance_to(b), f64::INFINITY);
}
