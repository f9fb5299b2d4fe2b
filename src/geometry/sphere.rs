use crate::{
    material::{Color, Material},
    math::{align_zero, Point3, Ray, Vector3},
};

use super::{GeoPoint, Geometry, Intersectable};

/// A sphere, defined by its center and radius.
#[derive(Clone, Debug)]
pub struct Sphere {
    center: Point3,
    radius: f64,
    emission: Color,
    material: Material,
}

impl Sphere {
    /// Instantiate a new Sphere.
    pub fn new(center: Point3, radius: f64) -> Self {
        Self {
            center,
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

    pub fn center(&self) -> Point3 {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl Intersectable for Sphere {
    fn find_intersections(&self, ray: &Ray, max_distance: f64) -> Vec<GeoPoint<'_>> {
        // project the center onto the ray; a ray starting at the
        // center skips the projection and exits straight through
        let (tm, d_squared) = if self.center == ray.origin {
            (0.0, 0.0)
        } else {
            let u = self.center - ray.origin;
            let tm = ray.direction.dot(u);
            (tm, u.dot(u) - tm * tm)
        };

        // tangent lines count as misses
        if align_zero(d_squared.sqrt() - self.radius) >= 0.0 {
            return Vec::new();
        }

        let th = (self.radius * self.radius - d_squared).sqrt();
        let mut hits = Vec::new();
        for t in [align_zero(tm - th), align_zero(tm + th)] {
            if t > 0.0 && align_zero(t - max_distance) <= 0.0 {
                hits.push(GeoPoint::new(self, ray.point_at(t)));
            }
        }
        hits
    }
}

impl Geometry for Sphere {
    fn normal_at(&self, point: Point3) -> Vector3 {
        (point - self.center).normalize()
    }

    fn emission(&self) -> Color {
        self.emission
    }

    fn material(&self) -> &Material {
        &self.material
    }
}

#[test]
fn unit_normal() {
    let sphere = Sphere::new(Point3::default(), 1.0);
    let normal = sphere.normal_at(Point3::new(0.0, 1.0, 0.0));
    assert!((normal.length() - 1.0).abs() < 1e-5);
    assert_eq!(normal, Vector3::new(0.0, 1.0, 0.0));
}

#[test]
fn crossing_ray_yields_two_points() {
    let sphere = Sphere::new(Point3::new(1.0, 0.0, 0.0), 1.0);
    let ray = Ray::new(Point3::new(-1.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0));

    let hits = sphere.find_intersections(&ray, f64::INFINITY);
    assert_eq!(hits.len(), 2);
    let mut points: Vec<_> = hits.iter().map(|gp| gp.point).collect();
    points.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap());
    assert_eq!(points[0], Point3::new(0.0, 0.0, 0.0));
    assert_eq!(points[1], Point3::new(2.0, 0.0, 0.0));
}

#[test]
fn ray_from_inside_yields_exit_point() {
    let sphere = Sphere::new(Point3::new(1.0, 0.0, 0.0), 1.0);
    let ray = Ray::new(Point3::new(1.0, 0.5, 0.0), Vector3::new(0.0, 1.0, 0.0));

    let hits = sphere.find_intersections(&ray, f64::INFINITY);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].point, Point3::new(1.0, 1.0, 0.0));

    // a ray starting at the center exits at radius distance
    let from_center = Ray::new(Point3::new(1.0, 0.0, 0.0), Vector3::new(0.0, 1.0, 0.0));
    let hits = sphere.find_intersections(&from_center, f64::INFINITY);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].point, Point3::new(1.0, 1.0, 0.0));
}

#[test]
fn misses() {
    let sphere = Sphere::new(Point3::new(1.0, 0.0, 0.0), 1.0);

    // line misses entirely
    let miss = Ray::new(Point3::new(-1.0, 2.0, 0.0), Vector3::new(1.0, 0.0, 0.0));
    assert!(sphere.find_intersections(&miss, f64::INFINITY).is_empty());

    // tangent line is a miss by convention
    let tangent = Ray::new(Point3::new(-1.0, 1.0, 0.0), Vector3::new(1.0, 0.0, 0.0));
    assert!(sphere.find_intersections(&tangent, f64::INFINITY).is_empty());

    // sphere entirely behind the ray
    let behind = Ray::new(Point3::new(3.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0));
    assert!(sphere.find_intersections(&behind, f64::INFINITY).is_empty());
}

#[test]
fn distance_bound_clips_roots() {
    let sphere = Sphere::new(Point3::new(1.0, 0.0, 0.0), 1.0);
    let ray = Ray::new(Point3::new(-1.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0));

    // roots at t = 1 and t = 3
    assert!(sphere.find_intersections(&ray, 0.5).is_empty());
    assert_eq!(sphere.find_intersections(&ray, 1.0).len(), 1);
    assert_eq!(sphere.find_intersections(&ray, 2.0).len(), 1);
    assert_eq!(sphere.find_intersections(&ray, 3.0).len(), 2);
}
