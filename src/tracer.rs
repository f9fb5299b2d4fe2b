use crate::{
    geometry::{GeoPoint, Intersectable},
    lighting::LightSource,
    material::Color,
    math::{align_zero, Ray, Vector3},
    scene::Scene,
};

/// Maximum shading recursion depth. Each reflection or refraction
/// bounce descends one level; the recursion is terminal at level 1.
const MAX_RECURSION_LEVEL: u32 = 10;

/// Minimum accumulated contribution weight. Branches whose coefficient
/// product falls entirely below this are pruned as imperceptible. This
/// is a performance/quality trade, not a correctness requirement.
const MIN_CONTRIBUTION: f64 = 0.001;

/// Shades rays against a scene: closest-hit selection, Phong local
/// lighting with transparency-attenuated shadows, and recursive
/// reflection/refraction bounces.
pub struct RayTracer<'a> {
    scene: &'a Scene,
}

impl<'a> RayTracer<'a> {
    /// Instantiate a tracer over a scene.
    pub fn new(scene: &'a Scene) -> Self {
        Self { scene }
    }

    /// The color seen along a ray: the shaded closest intersection,
    /// or the scene background when the ray escapes.
    pub fn trace_ray(&self, ray: &Ray) -> Color {
        match self.closest_intersection(ray) {
            Some(hit) => self.calc_color(hit, ray),
            None => self.scene.background,
        }
    }

    /// The arithmetic mean over a beam of rays. The beam must be
    /// non-empty.
    pub fn trace_beam(&self, rays: &[Ray]) -> Color {
        let mut total = Color::BLACK;
        for ray in rays {
            total = total + self.trace_ray(ray);
        }
        total / rays.len() as f64
    }

    fn closest_intersection(&self, ray: &Ray) -> Option<GeoPoint<'_>> {
        let hits = self.scene.geometries.find_intersections(ray, f64::INFINITY);
        ray.find_closest_geo_point(hits)
    }

    /// Full shading at a hit point. Ambient light enters once here,
    /// never inside the recursion.
    fn calc_color(&self, hit: GeoPoint<'_>, ray: &Ray) -> Color {
        self.calc_color_rec(hit, ray, MAX_RECURSION_LEVEL, Color::WHITE)
            + self.scene.ambient.intensity()
    }

    fn calc_color_rec(&self, hit: GeoPoint<'_>, ray: &Ray, level: u32, k: Color) -> Color {
        let color = self.local_effects(hit, ray, k);
        if level == 1 {
            color
        } else {
            color + self.global_effects(hit, ray, level, k)
        }
    }

    /// Emission plus the diffuse and specular contribution of every
    /// visible light source.
    fn local_effects(&self, hit: GeoPoint<'_>, ray: &Ray, k: Color) -> Color {
        let mut color = hit.geometry.emission();
        let v = ray.direction;
        let normal = hit.geometry.normal_at(hit.point);
        let nv = align_zero(normal.dot(v));
        if nv == 0.0 {
            // grazing view direction sees no lit surface
            return color;
        }

        let material = hit.geometry.material();
        for light in &self.scene.lights {
            let l = light.direction_to(hit.point);
            let nl = align_zero(normal.dot(l));
            // light and viewer must be on the same side of the surface
            if nl * nv > 0.0 {
                let ktr = self.transparency(hit, light.as_ref(), l, normal);
                if !(ktr * k).below(MIN_CONTRIBUTION) {
                    let intensity = light.intensity_at(hit.point) * ktr;
                    color = color
                        + diffusive(material.kd, nl, intensity)
                        + specular(material.ks, normal, l, nl, v, material.shininess, intensity);
                }
            }
        }
        color
    }

    /// Mirror and transmission bounces, each pruned by its accumulated
    /// coefficient product.
    fn global_effects(&self, hit: GeoPoint<'_>, ray: &Ray, level: u32, k: Color) -> Color {
        let mut color = Color::BLACK;
        let v = ray.direction;
        let normal = hit.geometry.normal_at(hit.point);
        let material = hit.geometry.material();

        let kkr = k * material.kr;
        if !kkr.below(MIN_CONTRIBUTION) {
            let reflected = Ray::with_offset(hit.point, v - normal * (2.0 * v.dot(normal)), normal);
            color = color + self.global_effect(&reflected, level, material.kr, kkr);
        }

        let kkt = k * material.kt;
        if !kkt.below(MIN_CONTRIBUTION) {
            // transmission continues straight through the surface
            let refracted = Ray::with_offset(hit.point, v, normal);
            color = color + self.global_effect(&refracted, level, material.kt, kkt);
        }

        color
    }

    fn global_effect(&self, ray: &Ray, level: u32, kx: Color, kkx: Color) -> Color {
        match self.closest_intersection(ray) {
            Some(hit) => self.calc_color_rec(hit, ray, level - 1, kkx) * kx,
            None => self.scene.background * kx,
        }
    }

    /// Accumulated transparency between a point and a light: the
    /// product of every occluder's `kt`, zero once an opaque occluder
    /// (or enough dim ones) blocks the path.
    fn transparency(
        &self,
        hit: GeoPoint<'_>,
        light: &dyn LightSource,
        l: Vector3,
        normal: Vector3,
    ) -> Color {
        let light_ray = Ray::with_offset(hit.point, -l, normal);
        let distance = light.distance_to(hit.point);

        let mut ktr = Color::WHITE;
        for occluder in self.scene.geometries.find_intersections(&light_ray, distance) {
            ktr = ktr * occluder.geometry.material().kt;
            if ktr.below(MIN_CONTRIBUTION) {
                return Color::BLACK;
            }
        }
        ktr
    }
}

fn diffusive(kd: Color, nl: f64, intensity: Color) -> Color {
    intensity * (kd * nl.abs())
}

fn specular(
    ks: Color,
    normal: Vector3,
    l: Vector3,
    nl: f64,
    v: Vector3,
    shininess: i32,
    intensity: Color,
) -> Color {
    let reflection = l - normal * (2.0 * nl);
    let vr = -align_zero(v.dot(reflection));
    if vr <= 0.0 {
        return Color::BLACK;
    }
    intensity * (ks * vr.powi(shininess))
}

/// A unit sphere at the origin lit head-on by a point light at
/// (0, 0, 5), with half-strength diffuse and specular response.
#[cfg(test)]
fn lit_sphere_scene() -> Scene {
    use crate::geometry::Sphere;
    use crate::lighting::PointLight;
    use crate::material::Material;
    use crate::math::Point3;

    Scene::builder("lit sphere")
        .geometry(Sphere::new(Point3::default(), 1.0).with_material(Material {
            kd: Color::splat(0.5),
            ks: Color::splat(0.5),
            shininess: 10,
            ..Material::default()
        }))
        .light(PointLight::new(Color::splat(100.0), Point3::new(0.0, 0.0, 5.0)))
        .build()
}

/// A triangle sitting at z = 3, between the lit sphere's surface and
/// its light.
#[cfg(test)]
fn occluder() -> crate::geometry::Triangle {
    use crate::geometry::Triangle;
    use crate::math::Point3;

    Triangle::new(
        Point3::new(-1.0, -1.0, 3.0),
        Point3::new(1.0, -1.0, 3.0),
        Point3::new(0.0, 1.0, 3.0),
    )
    .unwrap()
}

#[test]
fn miss_returns_exactly_the_background() {
    use crate::math::Point3;

    let scene = Scene::builder("empty")
        .background(Color::new(25.0, 50.0, 75.0))
        .build();
    let tracer = RayTracer::new(&scene);

    let ray = Ray::new(Point3::default(), Vector3::new(0.0, 0.0, -1.0));
    assert_eq!(tracer.trace_ray(&ray), Color::new(25.0, 50.0, 75.0));
}

#[test]
fn head_on_lit_sphere() {
    use crate::math::Point3;

    let scene = lit_sphere_scene();
    let tracer = RayTracer::new(&scene);

    // hits the surface at (0, 0, 1), normal (0, 0, 1), fully lit:
    // diffuse 0.5 * 100 plus specular 0.5 * 100
    let ray = Ray::new(Point3::new(0.0, 0.0, 5.0), Vector3::new(0.0, 0.0, -1.0));
    assert_eq!(tracer.trace_ray(&ray), Color::splat(100.0));
}

#[test]
fn opaque_occluder_kills_the_light() {
    use crate::geometry::Sphere;
    use crate::lighting::PointLight;
    use crate::material::Material;
    use crate::math::Point3;

    let scene = Scene::builder("shadowed")
        .geometry(Sphere::new(Point3::default(), 1.0).with_material(Material {
            kd: Color::splat(0.5),
            ks: Color::splat(0.5),
            shininess: 10,
            ..Material::default()
        }))
        .geometry(occluder())
        .light(PointLight::new(Color::splat(100.0), Point3::new(0.0, 0.0, 5.0)))
        .build();
    let tracer = RayTracer::new(&scene);

    // primary ray starts below the occluder so only the shadow ray
    // can hit it
    let ray = Ray::new(Point3::new(0.0, 0.0, 2.0), Vector3::new(0.0, 0.0, -1.0));
    assert_eq!(tracer.trace_ray(&ray), Color::BLACK);
}

#[test]
fn transparent_occluder_leaves_the_light_untouched() {
    use crate::geometry::Sphere;
    use crate::lighting::PointLight;
    use crate::material::Material;
    use crate::math::Point3;

    let lit = lit_sphere_scene();
    let ray = Ray::new(Point3::new(0.0, 0.0, 2.0), Vector3::new(0.0, 0.0, -1.0));
    let expected = RayTracer::new(&lit).trace_ray(&ray);

    let scene = Scene::builder("veiled")
        .geometry(Sphere::new(Point3::default(), 1.0).with_material(Material {
            kd: Color::splat(0.5),
            ks: Color::splat(0.5),
            shininess: 10,
            ..Material::default()
        }))
        .geometry(occluder().with_material(Material {
            kt: Color::WHITE,
            ..Material::default()
        }))
        .light(PointLight::new(Color::splat(100.0), Point3::new(0.0, 0.0, 5.0)))
        .build();
    let tracer = RayTracer::new(&scene);

    assert_eq!(tracer.trace_ray(&ray), expected);
}

#[test]
fn facing_mirrors_terminate() {
    use crate::geometry::Plane;
    use crate::material::Material;
    use crate::math::Point3;

    // two fully reflective planes facing each other; the depth bound
    // must end the bouncing
    let scene = Scene::builder("mirror box")
        .background(Color::splat(10.0))
        .geometry(
            Plane::new(Point3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 1.0)).with_material(
                Material {
                    kr: Color::WHITE,
                    ..Material::default()
                },
            ),
        )
        .geometry(
            Plane::new(Point3::new(0.0, 0.0, 10.0), Vector3::new(0.0, 0.0, -1.0)).with_material(
                Material {
                    kr: Color::WHITE,
                    ..Material::default()
                },
            ),
        )
        .build();
    let tracer = RayTracer::new(&scene);

    let ray = Ray::new(Point3::new(0.0, 0.0, 5.0), Vector3::new(0.1, 0.0, 1.0));
    // completing at all is the property under test
    let _ = tracer.trace_ray(&ray);
}

#[test]
fn beam_average() {
    use crate::math::Point3;

    let scene = Scene::builder("empty").background(Color::splat(40.0)).build();
    let tracer = RayTracer::new(&scene);

    let rays = vec![
        Ray::new(Point3::default(), Vector3::new(0.0, 0.0, 1.0)),
        Ray::new(Point3::default(), Vector3::new(0.0, 1.0, 0.0)),
        Ray::new(Point3::default(), Vector3::new(1.0, 0.0, 0.0)),
    ];
    assert_eq!(tracer.trace_beam(&rays), Color::splat(40.0));
}

#[test]
fn emission_shows_without_lights() {
    use crate::geometry::Sphere;
    use crate::math::Point3;

    let scene = Scene::builder("glowing")
        .geometry(Sphere::new(Point3::default(), 1.0).with_emission(Color::new(12.0, 34.0, 56.0)))
        .build();
    let tracer = RayTracer::new(&scene);

    let ray = Ray::new(Point3::new(0.0, 0.0, 5.0), Vector3::new(0.0, 0.0, -1.0));
    assert_eq!(tracer.trace_ray(&ray), Color::new(12.0, 34.0, 56.0));
}
