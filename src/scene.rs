use crate::{
    geometry::{Geometries, Geometry},
    lighting::{AmbientLight, LightSource},
    material::Color,
};

/// Everything the tracer needs to shade a ray: background color,
/// ambient light, the shape collection, and the light list. A scene is
/// assembled once through [`SceneBuilder`] and never mutated while a
/// render reads it.
pub struct Scene {
    pub name: String,
    pub background: Color,
    pub ambient: AmbientLight,
    pub geometries: Geometries,
    pub lights: Vec<Box<dyn LightSource>>,
}

impl Scene {
    /// Start building a scene.
    pub fn builder(name: impl Into<String>) -> SceneBuilder {
        SceneBuilder {
            name: name.into(),
            background: Color::BLACK,
            ambient: AmbientLight::NONE,
            geometries: Geometries::new(),
            lights: Vec::new(),
        }
    }
}

/// Accumulates scene contents, then produces the immutable [`Scene`].
pub struct SceneBuilder {
    name: String,
    background: Color,
    ambient: AmbientLight,
    geometries: Geometries,
    lights: Vec<Box<dyn LightSource>>,
}

impl SceneBuilder {
    pub fn background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    pub fn ambient(mut self, ambient: AmbientLight) -> Self {
        self.ambient = ambient;
        self
    }

    pub fn geometry(mut self, geometry: impl Geometry + 'static) -> Self {
        self.geometries.add(geometry);
        self
    }

    pub fn light(mut self, light: impl LightSource + 'static) -> Self {
        self.lights.push(Box::new(light));
        self
    }

    pub fn build(self) -> Scene {
        Scene {
            name: self.name,
            background: self.background,
            ambient: self.ambient,
            geometries: self.geometries,
            lights: self.lights,
        }
    }
}

#[test]
fn builder_collects_scene_contents() {
    use crate::geometry::Sphere;
    use crate::lighting::PointLight;
    use crate::math::Point3;

    let scene = Scene::builder("demo")
        .background(Color::new(10.0, 20.0, 30.0))
        .ambient(AmbientLight::new(Color::splat(100.0), Color::splat(0.1)))
        .geometry(Sphere::new(Point3::default(), 1.0))
        .geometry(Sphere::new(Point3::new(3.0, 0.0, 0.0), 0.5))
        .light(PointLight::new(Color::WHITE, Point3::new(0.0, 5.0, 0.0)))
        .build();

    assert_eq!(scene.name, "demo");
    assert_eq!(scene.background, Color::new(10.0, 20.0, 30.0));
    assert_eq!(scene.ambient.intensity(), Color::splat(10.0));
    assert_eq!(scene.geometries.len(), 2);
    assert_eq!(scene.lights.len(), 1);
}
