use crate::{
    material::{Color, Material},
    math::{align_zero, is_zero, Point3, Ray, Vector3},
};

use super::{GeoPoint, Geometry, Intersectable, Tube};

/// A finite cylinder: a tube clipped to a height, closed by two flat
/// caps.
#[derive(Clone, Debug)]
pub struct Cylinder {
    tube: Tube,
    height: f64,
}

impl Cylinder {
    /// Instantiate a new Cylinder extending `height` along the axis
    /// from the axis origin.
    pub fn new(axis: Ray, radius: f64, height: f64) -> Self {
        Self {
            tube: Tube::new(axis, radius),
            height,
        }
    }

    pub fn with_emission(mut self, emission: Color) -> Self {
        self.tube = self.tube.with_emission(emission);
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.tube = self.tube.with_material(material);
        self
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Axial coordinate of a point: its projection onto the axis,
    /// measured from the axis origin.
    fn axial(&self, point: Point3) -> f64 {
        self.tube.axis().direction.dot(point - self.tube.axis().origin)
    }

    /// Intersection with one cap disc, solved as a plane hit filtered
    /// to strictly inside the rim.
    fn cap_intersection(&self, ray: &Ray, max_distance: f64, center: Point3) -> Option<Point3> {
        let va = self.tube.axis().direction;
        let nv = align_zero(va.dot(ray.direction));
        if nv == 0.0 {
            return None;
        }

        let t = align_zero(va.dot(center - ray.origin) / nv);
        if t <= 0.0 || align_zero(t - max_distance) > 0.0 {
            return None;
        }

        let point = ray.point_at(t);
        let rim = self.tube.radius() * self.tube.radius();
        if align_zero(point.distance_squared(center) - rim) < 0.0 {
            Some(point)
        } else {
            None
        }
    }
}

impl Intersectable for Cylinder {
    fn find_intersections(&self, ray: &Ray, max_distance: f64) -> Vec<GeoPoint<'_>> {
        let axis = self.tube.axis();
        let mut hits = Vec::new();

        // lateral hits clipped to the axial extent, rims excluded
        for t in self.tube.lateral_roots(ray, max_distance) {
            let point = ray.point_at(t);
            let m = align_zero(self.axial(point));
            if m > 0.0 && align_zero(m - self.height) < 0.0 {
                hits.push(GeoPoint::new(self, point));
            }
        }

        let bottom = axis.origin;
        let top = axis.origin + axis.direction * self.height;
        for center in [bottom, top] {
            if let Some(point) = self.cap_intersection(ray, max_distance, center) {
                hits.push(GeoPoint::new(self, point));
            }
        }

        hits
    }
}

impl Geometry for Cylinder {
    /// Cap points normal along the axis, every other surface point
    /// normals like the lateral tube surface. A point is on a cap when
    /// its offset from that cap's center is orthogonal to the axis.
    fn normal_at(&self, point: Point3) -> Vector3 {
        let va = self.tube.axis().direction;
        let m = self.axial(point);
        if is_zero(m) {
            -va
        } else if is_zero(m - self.height) {
            va
        } else {
            self.tube.normal_at(point)
        }
    }

    fn emission(&self) -> Color {
        self.tube.emission()
    }

    fn material(&self) -> &Material {
        self.tube.material()
    }
}

#[cfg(test)]
fn z_cylinder() -> Cylinder {
    Cylinder::new(
        Ray::new(Point3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 1.0)),
        1.0,
        2.0,
    )
}

#[test]
fn normal_classification_is_exhaustive() {
    let cylinder = z_cylinder();

    // lateral surface
    assert_eq!(
        cylinder.normal_at(Point3::new(1.0, 0.0, 1.0)),
        Vector3::new(1.0, 0.0, 0.0)
    );

    // bottom cap, including its center where the tube would have no answer
    assert_eq!(
        cylinder.normal_at(Point3::new(0.5, 0.0, 0.0)),
        Vector3::new(0.0, 0.0, -1.0)
    );
    assert_eq!(
        cylinder.normal_at(Point3::new(0.0, 0.0, 0.0)),
        Vector3::new(0.0, 0.0, -1.0)
    );

    // top cap
    assert_eq!(
        cylinder.normal_at(Point3::new(0.0, 0.5, 2.0)),
        Vector3::new(0.0, 0.0, 1.0)
    );
}

#[test]
fn lateral_hits_are_clipped_to_height() {
    let cylinder = z_cylinder();

    let through = Ray::new(Point3::new(-3.0, 0.0, 1.0), Vector3::new(1.0, 0.0, 0.0));
    assert_eq!(cylinder.find_intersections(&through, f64::INFINITY).len(), 2);

    // same ray above the top cap
    let above = Ray::new(Point3::new(-3.0, 0.0, 3.0), Vector3::new(1.0, 0.0, 0.0));
    assert!(cylinder.find_intersections(&above, f64::INFINITY).is_empty());
}

#[test]
fn axis_aligned_ray_hits_both_caps() {
    let cylinder = z_cylinder();
    let ray = Ray::new(Point3::new(0.2, 0.0, -1.0), Vector3::new(0.0, 0.0, 1.0));

    let hits = cylinder.find_intersections(&ray, f64::INFINITY);
    assert_eq!(hits.len(), 2);
    let mut zs: Vec<_> = hits.iter().map(|gp| gp.point.z).collect();
    zs.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(zs, vec![0.0, 2.0]);
}

#[test]
fn oblique_ray_mixes_cap_and_lateral_hits() {
    let cylinder = z_cylinder();

    // enters through the bottom cap, exits through the side
    let ray = Ray::new(Point3::new(0.0, 0.0, -0.5), Vector3::new(1.0, 0.0, 1.0));
    let hits = cylinder.find_intersections(&ray, f64::INFINITY);
    assert_eq!(hits.len(), 2);

    let mut points: Vec<_> = hits.iter().map(|gp| gp.point).collect();
    points.sort_by(|a, b| a.z.partial_cmp(&b.z).unwrap());
    assert!(points[0].distance(Point3::new(0.5, 0.0, 0.0)) < 1e-9);
    assert!(points[1].distance(Point3::new(1.0, 0.0, 0.5)) < 1e-9);
}
