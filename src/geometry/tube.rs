use crate::{
    material::{Color, Material},
    math::{align_zero, is_zero, Point3, Ray, Vector3},
};

use super::{GeoPoint, Geometry, Intersectable};

/// An infinite cylinder: an axis ray and a radius, no caps.
#[derive(Clone, Debug)]
pub struct Tube {
    axis: Ray,
    radius: f64,
    emission: Color,
    material: Material,
}

impl Tube {
    /// Instantiate a new Tube around the given axis.
    pub fn new(axis: Ray, radius: f64) -> Self {
        Self {
            axis,
            radius,
            emission: Color::BLACK,
            material: Material::default(),
        }
    }

    pub fn with_emission(mut self, emission: Color) -> Self {
        self.emission = emission;
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn axis(&self) -> &Ray {
        &self.axis
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Roots of the lateral-surface quadratic within
    /// `(0, max_distance]`. Shared with the capped cylinder, which
    /// additionally clips them by axial extent.
    pub(super) fn lateral_roots(&self, ray: &Ray, max_distance: f64) -> Vec<f64> {
        let va = self.axis.direction;
        let dp = ray.origin - self.axis.origin;

        // project the ray direction and origin offset off the axis
        let d = ray.direction - va * ray.direction.dot(va);
        let e = dp - va * dp.dot(va);

        let a = d.length_squared();
        if is_zero(a) {
            // ray parallel to the axis never crosses the lateral surface
            return Vec::new();
        }

        let b = 2.0 * d.dot(e);
        let c = e.length_squared() - self.radius * self.radius;
        let discriminant = align_zero(b * b - 4.0 * a * c);
        if discriminant <= 0.0 {
            // miss, or tangent line which counts as a miss
            return Vec::new();
        }

        let root = discriminant.sqrt();
        [(-b - root) / (2.0 * a), (-b + root) / (2.0 * a)]
            .into_iter()
            .map(align_zero)
            .filter(|&t| t > 0.0 && align_zero(t - max_distance) <= 0.0)
            .collect()
    }
}

impl Intersectable for Tube {
    fn find_intersections(&self, ray: &Ray, max_distance: f64) -> Vec<GeoPoint<'_>> {
        self.lateral_roots(ray, max_distance)
            .into_iter()
            .map(|t| GeoPoint::new(self, ray.point_at(t)))
            .collect()
    }
}

impl Geometry for Tube {
    /// The outward lateral normal.
    ///
    /// Panics when the point lies on the axis itself (its orthogonal
    /// offset is effectively zero): no single normal exists there and
    /// the query is a programming error by policy.
    fn normal_at(&self, point: Point3) -> Vector3 {
        let t = self.axis.direction.dot(point - self.axis.origin);
        let offset = point - self.axis.point_at(t);
        assert!(
            !is_zero(offset.length_squared()),
            "tube normal is undefined on the axis"
        );
        offset.normalize()
    }

    fn emission(&self) -> Color {
        self.emission
    }

    fn material(&self) -> &Material {
        &self.material
    }
}

#[cfg(test)]
fn z_tube() -> Tube {
    Tube::new(
        Ray::new(Point3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 1.0)),
        1.0,
    )
}

#[test]
fn lateral_normal() {
    let tube = z_tube();
    let normal = tube.normal_at(Point3::new(1.0, 0.0, 5.0));
    assert!((normal.length() - 1.0).abs() < 1e-5);
    assert_eq!(normal, Vector3::new(1.0, 0.0, 0.0));
}

#[test]
#[should_panic(expected = "undefined on the axis")]
fn axis_normal_panics() {
    z_tube().normal_at(Point3::new(0.0, 0.0, 0.0));
}

#[test]
fn crossing_ray_yields_two_points() {
    let tube = z_tube();
    let ray = Ray::new(Point3::new(-3.0, 0.0, 2.0), Vector3::new(1.0, 0.0, 0.0));

    let hits = tube.find_intersections(&ray, f64::INFINITY);
    assert_eq!(hits.len(), 2);
    let mut points: Vec<_> = hits.iter().map(|gp| gp.point).collect();
    points.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap());
    assert_eq!(points[0], Point3::new(-1.0, 0.0, 2.0));
    assert_eq!(points[1], Point3::new(1.0, 0.0, 2.0));
}

#[test]
fn parallel_and_tangent_rays_miss() {
    let tube = z_tube();

    // parallel to the axis, inside the surface
    let parallel = Ray::new(Point3::new(0.5, 0.0, 0.0), Vector3::new(0.0, 0.0, 1.0));
    assert!(tube.find_intersections(&parallel, f64::INFINITY).is_empty());

    // tangent line
    let tangent = Ray::new(Point3::new(-3.0, 1.0, 0.0), Vector3::new(1.0, 0.0, 0.0));
    assert!(tube.find_intersections(&tangent, f64::INFINITY).is_empty());
}

#[test]
fn distance_bound_clips_roots() {
    let tube = z_tube();
    let ray = Ray::new(Point3::new(-3.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0));

    // roots at t = 2 and t = 4
    assert!(tube.find_intersections(&ray, 1.0).is_empty());
    assert_eq!(tube.find_intersections(&ray, 3.0).len(), 1);
    assert_eq!(tube.find_intersections(&ray, 5.0).len(), 2);
}
