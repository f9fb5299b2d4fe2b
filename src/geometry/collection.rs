use crate::math::Ray;

use super::{GeoPoint, Geometry, Intersectable};

/// The composite shape: a flat collection of geometries queried by
/// linear scan. Child order never affects which intersections exist,
/// only the order they are reported in.
#[derive(Default)]
pub struct Geometries {
    children: Vec<Box<dyn Geometry>>,
}

impl Geometries {
    /// Instantiate a new, empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a shape to the collection.
    pub fn add(&mut self, geometry: impl Geometry + 'static) {
        self.children.push(Box::new(geometry));
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl Intersectable for Geometries {
    fn find_intersections(&self, ray: &Ray, max_distance: f64) -> Vec<GeoPoint<'_>> {
        let mut all = Vec::new();
        for child in &self.children {
            all.extend(child.find_intersections(ray, max_distance));
        }
        all
    }
}

#[test]
fn union_keeps_every_child_hit() {
    use super::{Plane, Sphere, Triangle};
    use crate::math::{Point3, Vector3};

    let ray = Ray::new(Point3::new(0.0, 0.0, 10.0), Vector3::new(0.0, 0.0, -1.0));

    let sphere = Sphere::new(Point3::default(), 1.0);
    let triangle = Triangle::new(
        Point3::new(-1.0, -1.0, 3.0),
        Point3::new(1.0, -1.0, 3.0),
        Point3::new(0.0, 1.0, 3.0),
    )
    .unwrap();
    let plane = Plane::new(Point3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));

    let expected: usize = [
        sphere.find_intersections(&ray, f64::INFINITY).len(),
        triangle.find_intersections(&ray, f64::INFINITY).len(),
        plane.find_intersections(&ray, f64::INFINITY).len(),
    ]
    .iter()
    .sum();
    assert_eq!(expected, 4);

    let mut geometries = Geometries::new();
    geometries.add(sphere);
    geometries.add(triangle);
    geometries.add(plane);
    assert_eq!(geometries.len(), 3);

    // no hit lost, none duplicated
    assert_eq!(geometries.find_intersections(&ray, f64::INFINITY).len(), expected);

    // a miss everywhere stays a miss
    let miss = Ray::new(Point3::new(0.0, 0.0, 10.0), Vector3::new(0.0, 0.0, 1.0));
    assert!(geometries.find_intersections(&miss, f64::INFINITY).is_empty());
}

#[test]
fn empty_collection_reports_no_hits() {
    use crate::math::{Point3, Vector3};

    let geometries = Geometries::new();
    let ray = Ray::new(Point3::default(), Vector3::new(0.0, 0.0, 1.0));
    assert!(geometries.is_empty());
    assert!(geometries.find_intersections(&ray, f64::INFINITY).is_empty());
}
