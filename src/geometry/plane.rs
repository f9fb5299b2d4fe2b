use crate::{
    material::{Color, Material},
    math::{align_zero, Point3, Ray, Vector3},
};

use super::{GeoPoint, Geometry, GeometryError, Intersectable};

/// An infinite plane, defined by a reference point and a unit normal.
#[derive(Clone, Debug)]
pub struct Plane {
    q0: Point3,
    normal: Vector3,
    emission: Color,
    material: Material,
}

impl Plane {
    /// Instantiate a new Plane. The normal is normalized unless it
    /// already has unit length.
    pub fn new(q0: Point3, normal: Vector3) -> Self {
        Self {
            q0,
            normal: normal.normalize(),
            emission: Color::BLACK,
            material: Material::default(),
        }
    }

    /// Build the plane through three points, oriented by the
    /// right-hand rule over the first two edges. Coincident or
    /// collinear points define no plane.
    pub fn from_points(p1: Point3, p2: Point3, p3: Point3) -> Result<Self, GeometryError> {
        let normal = (p1 - p2)
            .cross(p1 - p3)
            .try_normalize()
            .ok_or(GeometryError::DegeneratePlane)?;
        Ok(Self {
            q0: p1,
            normal,
            emission: Color::BLACK,
            material: Material::default(),
        })
    }

    pub fn with_emission(mut self, emission: Color) -> Self {
        self.emission = emission;
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    /// The plane's reference point.
    pub fn q0(&self) -> Point3 {
        self.q0
    }

    /// The plane's unit normal, independent of position.
    pub fn normal(&self) -> Vector3 {
        self.normal
    }
}

impl Intersectable for Plane {
    fn find_intersections(&self, ray: &Ray, max_distance: f64) -> Vec<GeoPoint<'_>> {
        // a ray starting at the reference point is degenerate
        if self.q0 == ray.origin {
            return Vec::new();
        }

        let nv = align_zero(self.normal.dot(ray.direction));
        if nv == 0.0 {
            // ray parallel to the plane
            return Vec::new();
        }

        let numerator = align_zero(self.normal.dot(self.q0 - ray.origin));
        if numerator == 0.0 {
            // ray origin lies in the plane
            return Vec::new();
        }

        let t = align_zero(numerator / nv);
        if t <= 0.0 || align_zero(t - max_distance) > 0.0 {
            return Vec::new();
        }

        vec![GeoPoint::new(self, ray.point_at(t))]
    }
}

impl Geometry for Plane {
    fn normal_at(&self, _point: Point3) -> Vector3 {
        self.normal
    }

    fn emission(&self) -> Color {
        self.emission
    }

    fn material(&self) -> &Material {
        &self.material
    }
}

#[test]
fn normal_from_three_points() {
    let plane = Plane::from_points(
        Point3::new(0.0, 0.0, 1.0),
        Point3::new(1.0, 0.0, 1.0),
        Point3::new(0.0, 1.0, 1.0),
    )
    .unwrap();

    let normal = plane.normal_at(Point3::new(0.3, 0.4, 1.0));
    assert!((normal.length() - 1.0).abs() < 1e-5);
    // orientation follows the right-hand rule over the given order
    assert_eq!(normal, Vector3::new(0.0, 0.0, 1.0));
}

#[test]
fn degenerate_points_are_rejected() {
    let p = Point3::new(1.0, 2.0, 3.0);

    // coincident
    assert_eq!(
        Plane::from_points(p, p, Point3::new(0.0, 0.0, 0.0)).unwrap_err(),
        GeometryError::DegeneratePlane,
    );

    // collinear
    assert_eq!(
        Plane::from_points(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(2.0, 2.0, 2.0),
        )
        .unwrap_err(),
        GeometryError::DegeneratePlane,
    );
}

#[test]
fn intersections() {
    let plane = Plane::new(Point3::new(0.0, 0.0, 2.0), Vector3::new(0.0, 0.0, 1.0));

    // head-on hit
    let ray = Ray::new(Point3::new(1.0, 1.0, 0.0), Vector3::new(0.0, 0.0, 1.0));
    let hits = plane.find_intersections(&ray, f64::INFINITY);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].point, Point3::new(1.0, 1.0, 2.0));

    // plane behind the ray
    let behind = Ray::new(Point3::new(0.0, 0.0, 3.0), Vector3::new(0.0, 0.0, 1.0));
    assert!(plane.find_intersections(&behind, f64::INFINITY).is_empty());

    // ray parallel to the plane
    let parallel = Ray::new(Point3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0));
    assert!(plane.find_intersections(&parallel, f64::INFINITY).is_empty());

    // ray starting at the reference point
    let degenerate = Ray::new(Point3::new(0.0, 0.0, 2.0), Vector3::new(0.0, 1.0, 1.0));
    assert!(plane.find_intersections(&degenerate, f64::INFINITY).is_empty());

    // hit beyond the distance bound
    assert!(plane.find_intersections(&ray, 1.5).is_empty());
    assert_eq!(plane.find_intersections(&ray, 2.0).len(), 1);
}
