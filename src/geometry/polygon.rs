use crate::{
    material::{Color, Material},
    math::{align_zero, is_zero, Point3, Ray, Vector3},
};

use super::{GeoPoint, Geometry, GeometryError, Intersectable, Plane};

/// A convex, coplanar polygon with ordered vertices.
///
/// Intersection goes through the containing plane first, then tests
/// containment by the sign pattern of the edge normals relative to the
/// ray origin.
#[derive(Clone, Debug)]
pub struct Polygon {
    vertices: Vec<Point3>,
    plane: Plane,
    emission: Color,
    material: Material,
}

impl Polygon {
    /// Instantiate a new Polygon from ordered vertices. Fails when
    /// fewer than 3 vertices are given, when the vertices do not share
    /// a plane, or when the outline is not convex with a consistent
    /// winding.
    pub fn new(vertices: Vec<Point3>) -> Result<Self, GeometryError> {
        if vertices.len() < 3 {
            return Err(GeometryError::TooFewVertices(vertices.len()));
        }

        let plane = Plane::from_points(vertices[0], vertices[1], vertices[2])?;
        let normal = plane.normal();

        for &vertex in &vertices[3..] {
            if !is_zero(normal.dot(vertex - vertices[0])) {
                return Err(GeometryError::NonCoplanar);
            }
        }

        // walk the outline: consecutive edge cross products must agree
        // in orientation with the plane normal
        let count = vertices.len();
        let mut positive = None;
        for i in 0..count {
            let edge = vertices[(i + 1) % count] - vertices[i];
            let next_edge = vertices[(i + 2) % count] - vertices[(i + 1) % count];
            let turn = align_zero(edge.cross(next_edge).dot(normal));
            if turn == 0.0 {
                return Err(GeometryError::NonConvex);
            }
            match positive {
                None => positive = Some(turn > 0.0),
                Some(sign) if sign != (turn > 0.0) => return Err(GeometryError::NonConvex),
                Some(_) => {}
            }
        }

        Ok(Self {
            vertices,
            plane,
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

    pub fn vertices(&self) -> &[Point3] {
        &self.vertices
    }

    /// The plane hit restricted to the polygon's outline, untagged so
    /// wrappers can claim the point as their own.
    pub(super) fn intersection_point(&self, ray: &Ray, max_distance: f64) -> Option<Point3> {
        let planar = self.plane.find_intersections(ray, max_distance);
        let hit = planar.first()?;

        // edge-normal sign test: the hit is inside iff the direction
        // sees every edge plane from the same side; a zero dot means
        // the ray grazes an edge plane, which is a miss
        let count = self.vertices.len();
        let mut positive = None;
        for i in 0..count {
            let v1 = self.vertices[i] - ray.origin;
            let v2 = self.vertices[(i + 1) % count] - ray.origin;
            let edge_normal = v1.cross(v2).try_normalize()?;
            let vn = align_zero(ray.direction.dot(edge_normal));
            if vn == 0.0 {
                return None;
            }
            match positive {
                None => positive = Some(vn > 0.0),
                Some(sign) if sign != (vn > 0.0) => return None,
                Some(_) => {}
            }
        }

        Some(hit.point)
    }
}

impl Intersectable for Polygon {
    fn find_intersections(&self, ray: &Ray, max_distance: f64) -> Vec<GeoPoint<'_>> {
        match self.intersection_point(ray, max_distance) {
            Some(point) => vec![GeoPoint::new(self, point)],
            None => Vec::new(),
        }
    }
}

impl Geometry for Polygon {
    fn normal_at(&self, _point: Point3) -> Vector3 {
        self.plane.normal()
    }

    fn emission(&self) -> Color {
        self.emission
    }

    fn material(&self) -> &Material {
        &self.material
    }
}

#[cfg(test)]
fn unit_square() -> Polygon {
    Polygon::new(vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(1.0, 1.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
    ])
    .unwrap()
}

#[test]
fn construction_validation() {
    assert_eq!(
        Polygon::new(vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)]).unwrap_err(),
        GeometryError::TooFewVertices(2),
    );

    // fourth vertex off the plane of the first three
    assert_eq!(
        Polygon::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 1.0),
        ])
        .unwrap_err(),
        GeometryError::NonCoplanar,
    );

    // reflex vertex
    assert_eq!(
        Polygon::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(0.5, 0.5, 0.0),
            Point3::new(0.0, 2.0, 0.0),
        ])
        .unwrap_err(),
        GeometryError::NonConvex,
    );

    assert_eq!(unit_square().vertices().len(), 4);
}

#[test]
fn containment() {
    let square = unit_square();

    // through the interior
    let inside = Ray::new(Point3::new(0.5, 0.5, 2.0), Vector3::new(0.0, 0.0, -1.0));
    let hits = square.find_intersections(&inside, f64::INFINITY);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].point, Point3::new(0.5, 0.5, 0.0));

    // in the plane but outside the outline
    let outside = Ray::new(Point3::new(3.0, 0.5, 2.0), Vector3::new(0.0, 0.0, -1.0));
    assert!(square.find_intersections(&outside, f64::INFINITY).is_empty());

    // distance bound cuts the hit off
    assert!(square.find_intersections(&inside, 1.0).is_empty());
}

#[test]
fn edge_graze_is_a_miss() {
    let square = unit_square();
    let along_edge = Ray::new(Point3::new(0.5, 0.0, 2.0), Vector3::new(0.0, 0.0, -1.0));
    assert!(square
        .find_intersections(&along_edge, f64::INFINITY)
        .is_empty());
}
