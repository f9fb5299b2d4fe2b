use super::{is_zero, Point3, Vector3};

/// Distance the offset constructor nudges a ray origin along the
/// surface normal, keeping secondary rays from re-hitting the surface
/// they were spawned from.
pub const DELTA: f64 = 0.1;

/// A ray: an origin point and a unit direction.
#[derive(Clone, Debug, PartialEq)]
pub struct Ray {
    pub origin: Point3,
    pub direction: Vector3,
}

impl Ray {
    /// Instantiate a new Ray. The direction is normalized unless it
    /// already has unit length.
    pub fn new(origin: Point3, direction: Vector3) -> Self {
        let direction = if is_zero(direction.length() - 1.0) {
            direction
        } else {
            direction.normalize()
        };
        Self { origin, direction }
    }

    /// Instantiate a Ray whose origin is nudged [`DELTA`] along
    /// `normal`, on the side of the surface the direction points to.
    /// A direction lying in the surface plane leaves the origin where
    /// it is.
    pub fn with_offset(head: Point3, direction: Vector3, normal: Vector3) -> Self {
        let direction = direction.normalize();
        let nv = normal.dot(direction);
        let origin = if is_zero(nv) {
            head
        } else {
            head + normal * if nv > 0.0 { DELTA } else { -DELTA }
        };
        Self { origin, direction }
    }

    /// The point at parameter `t` along the ray.
    pub fn point_at(&self, t: f64) -> Point3 {
        if is_zero(t) {
            self.origin
        } else {
            self.origin + self.direction * t
        }
    }

    /// Build one ray per source point, every ray aimed at a shared
    /// target. Used to focus an aperture's sample points onto a focal
    /// point.
    pub fn beam(points: &[Point3], target: Point3) -> Vec<Ray> {
        points
            .iter()
            .map(|&point| Ray::new(point, target - point))
            .collect()
    }
}

#[test]
fn point_along_ray() {
    let ray = Ray::new(Point3::new(1.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 2.0));
    assert_eq!(ray.direction, Vector3::new(0.0, 0.0, 1.0));
    assert_eq!(ray.point_at(0.0), ray.origin);
    assert_eq!(ray.point_at(3.0), Point3::new(1.0, 0.0, 3.0));
}

#[test]
fn offset_follows_direction_side() {
    let head = Point3::new(0.0, 0.0, 0.0);
    let normal = Vector3::new(0.0, 0.0, 1.0);

    let outgoing = Ray::with_offset(head, Vector3::new(1.0, 0.0, 1.0), normal);
    assert_eq!(outgoing.origin, Point3::new(0.0, 0.0, DELTA));

    let ingoing = Ray::with_offset(head, Vector3::new(1.0, 0.0, -1.0), normal);
    assert_eq!(ingoing.origin, Point3::new(0.0, 0.0, -DELTA));

    // a direction in the surface plane gets no nudge
    let grazing = Ray::with_offset(head, Vector3::new(1.0, 0.0, 0.0), normal);
    assert_eq!(grazing.origin, head);
}

#[test]
fn beam_aims_at_target() {
    let points = [Point3::new(0.0, 1.0, 0.0), Point3::new(0.0, -1.0, 0.0)];
    let target = Point3::new(0.0, 0.0, 4.0);

    let rays = Ray::beam(&points, target);
    assert_eq!(rays.len(), 2);
    for (ray, point) in rays.iter().zip(points) {
        assert_eq!(ray.origin, point);
        assert_eq!(ray.direction, (target - point).normalize());
    }
}
