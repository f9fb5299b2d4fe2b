use crate::{
    material::{Color, Material},
    math::{Point3, Ray, Vector3},
};

use super::{GeoPoint, Geometry, GeometryError, Intersectable, Polygon};

/// A triangle: the three-vertex polygon.
#[derive(Clone, Debug)]
pub struct Triangle {
    polygon: Polygon,
}

impl Triangle {
    /// Instantiate a new Triangle. Fails when the vertices are
    /// coincident or collinear.
    pub fn new(p1: Point3, p2: Point3, p3: Point3) -> Result<Self, GeometryError> {
        Ok(Self {
            polygon: Polygon::new(vec![p1, p2, p3])?,
        })
    }

    pub fn with_emission(mut self, emission: Color) -> Self {
        self.polygon = self.polygon.with_emission(emission);
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.polygon = self.polygon.with_material(material);
        self
    }

    pub fn vertices(&self) -> &[Point3] {
        self.polygon.vertices()
    }
}

impl Intersectable for Triangle {
    fn find_intersections(&self, ray: &Ray, max_distance: f64) -> Vec<GeoPoint<'_>> {
        match self.polygon.intersection_point(ray, max_distance) {
            Some(point) => vec![GeoPoint::new(self, point)],
            None => Vec::new(),
        }
    }
}

impl Geometry for Triangle {
    fn normal_at(&self, point: Point3) -> Vector3 {
        self.polygon.normal_at(point)
    }

    fn emission(&self) -> Color {
        self.polygon.emission()
    }

    fn material(&self) -> &Material {
        self.polygon.material()
    }
}

#[test]
fn degenerate_triangle_is_rejected() {
    assert_eq!(
        Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(2.0, 2.0, 2.0),
        )
        .unwrap_err(),
        GeometryError::DegeneratePlane,
    );
}

#[test]
fn unit_normal() {
    let triangle = Triangle::new(
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(2.0, 0.0, 0.0),
        Point3::new(0.0, 2.0, 0.0),
    )
    .unwrap();

    let normal = triangle.normal_at(Point3::new(0.5, 0.5, 0.0));
    assert!((normal.length() - 1.0).abs() < 1e-5);
    assert!(normal == Vector3::new(0.0, 0.0, 1.0) || normal == Vector3::new(0.0, 0.0, -1.0));
}

#[test]
fn containment() {
    let triangle = Triangle::new(
        Point3::new(-1.0, -1.0, 3.0),
        Point3::new(1.0, -1.0, 3.0),
        Point3::new(0.0, 1.0, 3.0),
    )
    .unwrap();

    // through the interior
    let inside = Ray::new(Point3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 1.0));
    let hits = triangle.find_intersections(&inside, f64::INFINITY);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].point, Point3::new(0.0, 0.0, 3.0));

    // hits the plane outside the outline
    let outside = Ray::new(Point3::new(2.0, 2.0, 0.0), Vector3::new(0.0, 0.0, 1.0));
    assert!(triangle
        .find_intersections(&outside, f64::INFINITY)
        .is_empty());

    // no plane hit at all
    let away = Ray::new(Point3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, -1.0));
    assert!(triangle.find_intersections(&away, f64::INFINITY).is_empty());
}
