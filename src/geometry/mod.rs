mod collection;
mod cylinder;
mod plane;
mod polygon;
mod sphere;
mod triangle;
mod tube;

pub use collection::*;
pub use cylinder::*;
pub use plane::*;
pub use polygon::*;
pub use sphere::*;
pub use triangle::*;
pub use tube::*;

use thiserror::Error;

use crate::material::{Color, Material};
use crate::math::{Point3, Ray, Vector3};

/// A shape failed to construct because its defining data is degenerate.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("plane requires three distinct, non-collinear points")]
    DegeneratePlane,

    #[error("polygon requires at least 3 vertices, got {0}")]
    TooFewVertices(usize),

    #[error("polygon vertices must lie in a single plane")]
    NonCoplanar,

    #[error("polygon must be convex with a consistent winding")]
    NonConvex,
}

/// An intersection point tagged with the geometry it belongs to, so
/// shading can fetch the surface's normal, emission, and material
/// without re-deriving which shape was hit.
#[derive(Clone, Copy)]
pub struct GeoPoint<'a> {
    pub geometry: &'a dyn Geometry,
    pub point: Point3,
}

impl<'a> GeoPoint<'a> {
    pub fn new(geometry: &'a dyn Geometry, point: Point3) -> Self {
        Self { geometry, point }
    }
}

/// A shape or collection of shapes a ray can be intersected against.
pub trait Intersectable: Send + Sync {
    /// Every intersection with the ray at a distance within
    /// `(0, max_distance]` from its origin. An empty vec means no hit.
    /// Primary rays pass `f64::INFINITY`; shadow rays bound the query
    /// by the distance to the light.
    fn find_intersections(&self, ray: &Ray, max_distance: f64) -> Vec<GeoPoint<'_>>;
}

/// A concrete surface: intersectable, and able to answer surface
/// queries at a point known to lie on it.
pub trait Geometry: Intersectable {
    /// The unit normal at an on-surface point.
    fn normal_at(&self, point: Point3) -> Vector3;

    /// Light this surface emits by itself.
    fn emission(&self) -> Color;

    /// The surface's reflectance coefficients.
    fn material(&self) -> &Material;
}

impl Ray {
    /// The intersection closest to the ray origin, by Euclidean
    /// distance. Ties keep the first point encountered, so the result
    /// is stable but depends on the order of the input list.
    pub fn find_closest_geo_point<'a>(&self, points: Vec<GeoPoint<'a>>) -> Option<GeoPoint<'a>> {
        let mut closest: Option<GeoPoint<'a>> = None;
        let mut closest_distance = f64::INFINITY;
        for candidate in points {
            let distance = candidate.point.distance_squared(self.origin);
            if distance < closest_distance {
                closest_distance = distance;
                closest = Some(candidate);
            }
        }
        closest
    }
}

#[test]
fn closest_point_selection() {
    use crate::math::Vector3;

    let ray = Ray::new(Point3::new(1.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0));
    let sphere = Sphere::new(Point3::default(), 1.0);
    let near = Point3::new(0.5, 0.0, 0.0);
    let mid = Point3::new(1.0, 1.0, 0.0);
    let far = Point3::new(1.0, 3.0, 1.0);

    // empty list selects nothing
    assert!(ray.find_closest_geo_point(Vec::new()).is_none());

    // the nearest point wins regardless of its position in the list
    for points in [[near, mid, far], [far, mid, near], [far, near, mid]] {
        let candidates = points
            .iter()
            .map(|&point| GeoPoint::new(&sphere, point))
            .collect();
        let closest = ray.find_closest_geo_point(candidates).unwrap();
        assert_eq!(closest.point, near);
    }
}
