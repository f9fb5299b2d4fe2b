use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use log::info;
use rand::Rng;
use rayon::prelude::*;
use thiserror::Error;

use crate::{
    material::Color,
    math::{is_zero, Point3, Ray, Vector3},
    output::ImageWriter,
    tracer::RayTracer,
};

/// Maximum subdivision depth of the adaptive sampler.
const ADAPTIVE_MAX_LEVEL: u32 = 3;

/// The camera is misconfigured; surfaced by [`CameraBuilder::build`]
/// before any pixel is traced, or when saving the finished image.
#[derive(Debug, Error)]
pub enum CameraError {
    #[error("camera forward and up vectors must be orthogonal")]
    SkewedAxes,

    #[error("view plane distance and dimensions must be positive")]
    BadViewPlane,

    #[error("no image writer bound to the camera")]
    MissingImageWriter,

    #[error("no ray tracer bound to the camera")]
    MissingRayTracer,

    #[error("failed to start the worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    #[error("failed to save the rendered image: {0}")]
    Save(#[from] image::ImageError),
}

/// How a pixel's color is sampled. Strategies are mutually exclusive
/// per render.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Sampling {
    /// One ray through the pixel center.
    Plain,

    /// A beam of rays from jittered aperture points, all focused on
    /// the pixel ray's focal point; their mean approximates a finite
    /// lens.
    DepthOfField {
        aperture_radius: f64,
        focal_length: f64,
        density: u32,
    },

    /// Recursive pixel subdivision, sampling densely only where
    /// neighboring samples disagree.
    Adaptive,
}

/// Maps pixels to primary rays and drives the render loop, writing
/// every traced color to the bound image writer.
pub struct Camera<'s> {
    position: Point3,
    vto: Vector3,
    vup: Vector3,
    vright: Vector3,
    distance: f64,
    width: f64,
    height: f64,
    sampling: Sampling,
    workers: usize,
    tracer: RayTracer<'s>,
    image: ImageWriter,
}

impl<'s> Camera<'s> {
    /// Start building a camera.
    pub fn builder() -> CameraBuilder<'s> {
        CameraBuilder::default()
    }

    /// The ray from the camera position through the center of pixel
    /// `(j, i)` on an `nx` x `ny` view-plane grid.
    pub fn construct_ray(&self, nx: u32, ny: u32, j: u32, i: u32) -> Ray {
        let center = self.position + self.vto * self.distance;

        let rx = self.width / nx as f64;
        let ry = self.height / ny as f64;
        let xj = (j as f64 - (nx as f64 - 1.0) / 2.0) * rx;
        let yi = -(i as f64 - (ny as f64 - 1.0) / 2.0) * ry;

        let mut pixel = center;
        if !is_zero(xj) {
            pixel = pixel + self.vright * xj;
        }
        if !is_zero(yi) {
            pixel = pixel + self.vup * yi;
        }

        Ray::new(self.position, pixel - self.position)
    }

    /// Trace every pixel with the active sampling strategy and write
    /// the colors to the image writer. `workers == 0` renders on the
    /// calling thread; otherwise a dedicated pool of that many
    /// workers splits the pixel grid.
    pub fn render_image(&mut self) -> Result<(), CameraError> {
        let nx = self.image.width();
        let ny = self.image.height();
        info!(
            "rendering {}x{} pixels ({} workers, {:?})",
            nx, ny, self.workers, self.sampling
        );

        let aperture = match self.sampling {
            Sampling::DepthOfField {
                aperture_radius,
                density,
                ..
            } => self.aperture_points(density, aperture_radius),
            _ => Vec::new(),
        };

        let colors: Vec<Color> = {
            let progress = Progress::new((nx * ny) as usize);
            let trace = |j: u32, i: u32| {
                let color = match self.sampling {
                    Sampling::Plain => self.tracer.trace_ray(&self.construct_ray(nx, ny, j, i)),
                    Sampling::DepthOfField { focal_length, .. } => {
                        let focal = self.construct_ray(nx, ny, j, i).point_at(focal_length);
                        self.tracer.trace_beam(&Ray::beam(&aperture, focal))
                    }
                    Sampling::Adaptive => self.adaptive_pixel(nx, ny, j, i),
                };
                progress.tick();
                color
            };

            if self.workers == 0 {
                (0..nx * ny).map(|p| trace(p % nx, p / nx)).collect()
            } else {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(self.workers)
                    .build()?;
                pool.install(|| (0..nx * ny).into_par_iter().map(|p| trace(p % nx, p / nx)).collect())
            }
        };

        for (p, color) in colors.into_iter().enumerate() {
            self.image.write_pixel(p as u32 % nx, p as u32 / nx, color);
        }
        Ok(())
    }

    /// Overlay grid lines every `interval` pixels, for inspecting
    /// pixel placement.
    pub fn print_grid(&mut self, interval: u32, color: Color) {
        for i in 0..self.image.height() {
            for j in 0..self.image.width() {
                if i % interval == 0 || j % interval == 0 {
                    self.image.write_pixel(j, i, color);
                }
            }
        }
    }

    /// Encode and save the rendered image.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), CameraError> {
        Ok(self.image.save(path)?)
    }

    /// Move the camera without changing its orientation.
    pub fn translate(&mut self, offset: Vector3) {
        self.position = self.position + offset;
    }

    /// Rotate the camera's orientation around an axis by an angle in
    /// degrees. The right vector is re-derived from the rotated pair.
    pub fn rotate(&mut self, axis: Vector3, degrees: f64) {
        if is_zero(degrees) {
            return;
        }
        let axis = axis.normalize();
        self.vto = self.vto.rotated(axis, degrees).normalize();
        self.vup = self.vup.rotated(axis, degrees).normalize();
        self.vright = self.vto.cross(self.vup);
    }

    /// The bound image writer, with whatever has been rendered so far.
    pub fn image(&self) -> &ImageWriter {
        &self.image
    }

    /// Jittered aperture sample points: a `density` x `density` grid
    /// over the aperture square in the right/up plane, each cell
    /// jittered within itself, filtered to the aperture disk. A grid
    /// jittered entirely out of the disk falls back to the pinhole
    /// origin so the beam is never empty.
    fn aperture_points(&self, density: u32, radius: f64) -> Vec<Point3> {
        let mut rng = rand::thread_rng();
        let step = 2.0 * radius / density as f64;

        let mut points = Vec::new();
        for row in 0..density {
            for col in 0..density {
                let x = -radius + (col as f64 + 0.5) * step + rng.gen_range(-0.5..=0.5) * step;
                let y = -radius + (row as f64 + 0.5) * step + rng.gen_range(-0.5..=0.5) * step;
                if x * x + y * y <= radius * radius {
                    points.push(self.position + self.vright * x + self.vup * y);
                }
            }
        }

        if points.is_empty() {
            points.push(self.position);
        }
        points
    }

    /// One adaptively sampled pixel: trace the center, then refine
    /// wherever sub-samples disagree with it.
    fn adaptive_pixel(&self, nx: u32, ny: u32, j: u32, i: u32) -> Color {
        let center = self.tracer.trace_ray(&self.construct_ray(nx, ny, j, i));
        self.adaptive_rec(nx, ny, j, i, ADAPTIVE_MAX_LEVEL, center)
    }

    /// Sample the pixel's four sub-centers at doubled resolution.
    /// A sub-color equal to the center is accepted as-is; a differing
    /// one recurses a level deeper. Every level averages its center
    /// with the four sub-colors.
    fn adaptive_rec(&self, nx: u32, ny: u32, j: u32, i: u32, level: u32, center: Color) -> Color {
        if level == 0 {
            return center;
        }

        let mut color = center;
        for sub in 0..4 {
            let (jj, ii) = (2 * j + sub / 2, 2 * i + sub % 2);
            let mut sub_color = self.tracer.trace_ray(&self.construct_ray(2 * nx, 2 * ny, jj, ii));
            if sub_color != center {
                sub_color = self.adaptive_rec(2 * nx, 2 * ny, jj, ii, level - 1, sub_color);
            }
            color = color + sub_color;
        }
        color / 5.0
    }
}

/// Builds a finished, immutable camera. Every configuration error
/// (skewed axes, a degenerate view plane, a missing image writer or
/// tracer) surfaces here, never mid-render.
pub struct CameraBuilder<'s> {
    position: Point3,
    vto: Vector3,
    vup: Vector3,
    distance: f64,
    width: f64,
    height: f64,
    sampling: Sampling,
    workers: usize,
    tracer: Option<RayTracer<'s>>,
    image: Option<ImageWriter>,
}

impl<'s> Default for CameraBuilder<'s> {
    fn default() -> Self {
        Self {
            position: Point3::default(),
            vto: Vector3::new(0.0, 0.0, -1.0),
            vup: Vector3::new(0.0, 1.0, 0.0),
            distance: 1.0,
            width: 1.0,
            height: 1.0,
            sampling: Sampling::Plain,
            workers: 0,
            tracer: None,
            image: None,
        }
    }
}

impl<'s> CameraBuilder<'s> {
    pub fn position(mut self, position: Point3) -> Self {
        self.position = position;
        self
    }

    /// Set the forward and up directions. They must be orthogonal;
    /// the right direction is always derived, never set.
    pub fn direction(mut self, vto: Vector3, vup: Vector3) -> Self {
        self.vto = vto;
        self.vup = vup;
        self
    }

    /// Set the view-plane distance and physical dimensions.
    pub fn view_plane(mut self, distance: f64, width: f64, height: f64) -> Self {
        self.distance = distance;
        self.width = width;
        self.height = height;
        self
    }

    pub fn sampling(mut self, sampling: Sampling) -> Self {
        self.sampling = sampling;
        self
    }

    /// Worker thread count; 0 renders sequentially.
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn tracer(mut self, tracer: RayTracer<'s>) -> Self {
        self.tracer = Some(tracer);
        self
    }

    pub fn image_writer(mut self, image: ImageWriter) -> Self {
        self.image = Some(image);
        self
    }

    pub fn build(self) -> Result<Camera<'s>, CameraError> {
        if !is_zero(self.vto.dot(self.vup)) {
            return Err(CameraError::SkewedAxes);
        }
        if self.distance <= 0.0 || self.width <= 0.0 || self.height <= 0.0 {
            return Err(CameraError::BadViewPlane);
        }

        let vto = self.vto.normalize();
        let vup = self.vup.normalize();
        Ok(Camera {
            position: self.position,
            vto,
            vup,
            vright: vto.cross(vup),
            distance: self.distance,
            width: self.width,
            height: self.height,
            sampling: self.sampling,
            workers: self.workers,
            tracer: self.tracer.ok_or(CameraError::MissingRayTracer)?,
            image: self.image.ok_or(CameraError::MissingImageWriter)?,
        })
    }
}

/// Count of completed pixels, shared by all workers. The only mutable
/// state a render touches concurrently; updates are atomic and carry
/// no ordering between pixels.
struct Progress {
    total: usize,
    done: AtomicUsize,
    stride: usize,
}

impl Progress {
    fn new(total: usize) -> Self {
        Self {
            total,
            done: AtomicUsize::new(0),
            stride: (total / 20).max(1),
        }
    }

    /// Record one finished pixel, reporting at coarse intervals.
    fn tick(&self) {
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        if done % self.stride == 0 || done == self.total {
            info!("rendered {}/{} pixels ({}%)", done, self.total, done * 100 / self.total);
        }
    }
}

#[cfg(test)]
fn test_camera<'s>(tracer: RayTracer<'s>, nx: u32, ny: u32) -> Camera<'s> {
    Camera::builder()
        .view_plane(10.0, 3.0, 3.0)
        .tracer(tracer)
        .image_writer(ImageWriter::new(nx, ny))
        .build()
        .unwrap()
}

#[cfg(test)]
fn empty_scene(background: Color) -> crate::scene::Scene {
    crate::scene::Scene::builder("empty").background(background).build()
}

#[test]
fn center_pixel_ray_goes_straight_forward() {
    let scene = empty_scene(Color::BLACK);
    let camera = test_camera(RayTracer::new(&scene), 3, 3);

    let ray = camera.construct_ray(3, 3, 1, 1);
    assert_eq!(ray.origin, Point3::default());
    assert_eq!(ray.direction, Vector3::new(0.0, 0.0, -1.0));
}

#[test]
fn corner_pixel_ray_is_offset_on_the_view_plane() {
    let scene = empty_scene(Color::BLACK);
    let camera = test_camera(RayTracer::new(&scene), 3, 3);

    // top-left pixel of a 3x3 grid on a 3x3 plane at distance 10:
    // one pixel left of center, one pixel up
    let ray = camera.construct_ray(3, 3, 0, 0);
    assert_eq!(ray, Ray::new(Point3::default(), Vector3::new(-1.0, 1.0, -10.0)));
}

#[test]
fn view_plane_rays_cover_a_facing_sphere() {
    use crate::geometry::{Intersectable, Sphere};

    let scene = empty_scene(Color::BLACK);
    let camera = Camera::builder()
        .position(Point3::new(0.0, 0.0, 0.5))
        .view_plane(1.0, 3.0, 3.0)
        .tracer(RayTracer::new(&scene))
        .image_writer(ImageWriter::new(3, 3))
        .build()
        .unwrap();

    // a sphere filling the view: every one of the 9 rays enters and
    // exits it
    let sphere = Sphere::new(Point3::new(0.0, 0.0, -2.5), 2.5);
    let mut count = 0;
    for i in 0..3 {
        for j in 0..3 {
            let ray = camera.construct_ray(3, 3, j, i);
            count += sphere.find_intersections(&ray, f64::INFINITY).len();
        }
    }
    assert_eq!(count, 18);
}

#[test]
fn builder_validation() {
    let scene = empty_scene(Color::BLACK);

    // forward and up not orthogonal
    let skewed = Camera::builder()
        .direction(Vector3::new(0.0, 0.0, -1.0), Vector3::new(0.0, 1.0, -1.0))
        .tracer(RayTracer::new(&scene))
        .image_writer(ImageWriter::new(2, 2))
        .build();
    assert!(matches!(skewed, Err(CameraError::SkewedAxes)));

    // missing bindings are caught before rendering
    let no_writer = Camera::builder().tracer(RayTracer::new(&scene)).build();
    assert!(matches!(no_writer, Err(CameraError::MissingImageWriter)));

    let no_tracer = Camera::builder().image_writer(ImageWriter::new(2, 2)).build();
    assert!(matches!(no_tracer, Err(CameraError::MissingRayTracer)));

    let flat = Camera::builder()
        .view_plane(0.0, 3.0, 3.0)
        .tracer(RayTracer::new(&scene))
        .image_writer(ImageWriter::new(2, 2))
        .build();
    assert!(matches!(flat, Err(CameraError::BadViewPlane)));
}

#[test]
fn rotation_rederives_the_right_vector() {
    let scene = empty_scene(Color::BLACK);
    let mut camera = test_camera(RayTracer::new(&scene), 2, 2);

    camera.rotate(Vector3::new(0.0, 1.0, 0.0), 90.0);
    assert!(camera.vto.distance(Vector3::new(-1.0, 0.0, 0.0)) < 1e-10);
    assert!(camera.vright.distance(Vector3::new(0.0, 0.0, -1.0)) < 1e-10);
    // the frame stays orthonormal
    assert!(is_zero(camera.vto.dot(camera.vup)));
    assert!(is_zero(camera.vto.dot(camera.vright)));
}

#[test]
fn render_fills_the_image_with_the_background() {
    let background = Color::new(12.0, 200.0, 260.0);
    let scene = empty_scene(background);
    let mut camera = test_camera(RayTracer::new(&scene), 4, 3);

    camera.render_image().unwrap();
    // clamped at the sink: 260 tops out at 255
    assert_eq!(camera.image().pixel(0, 0), image::Rgb([12, 200, 255]));
    assert_eq!(camera.image().pixel(3, 2), image::Rgb([12, 200, 255]));
}

#[test]
fn parallel_render_matches_sequential() {
    use crate::geometry::Sphere;
    use crate::lighting::PointLight;
    use crate::material::Material;

    let scene = crate::scene::Scene::builder("ball")
        .background(Color::splat(20.0))
        .geometry(
            Sphere::new(Point3::new(0.0, 0.0, -5.0), 2.0).with_material(Material {
                kd: Color::splat(0.6),
                ks: Color::splat(0.2),
                shininess: 30,
                ..Material::default()
            }),
        )
        .light(PointLight::new(Color::splat(400.0), Point3::new(5.0, 5.0, 0.0)))
        .build();

    let mut sequential = Camera::builder()
        .view_plane(2.0, 4.0, 4.0)
        .tracer(RayTracer::new(&scene))
        .image_writer(ImageWriter::new(8, 8))
        .build()
        .unwrap();
    sequential.render_image().unwrap();

    let mut parallel = Camera::builder()
        .view_plane(2.0, 4.0, 4.0)
        .workers(4)
        .tracer(RayTracer::new(&scene))
        .image_writer(ImageWriter::new(8, 8))
        .build()
        .unwrap();
    parallel.render_image().unwrap();

    for y in 0..8 {
        for x in 0..8 {
            assert_eq!(sequential.image().pixel(x, y), parallel.image().pixel(x, y));
        }
    }
}

#[test]
fn adaptive_sampling_short_circuits_in_uniform_regions() {
    let background = Color::splat(77.0);
    let scene = empty_scene(background);
    let mut camera = Camera::builder()
        .view_plane(1.0, 2.0, 2.0)
        .sampling(Sampling::Adaptive)
        .tracer(RayTracer::new(&scene))
        .image_writer(ImageWriter::new(2, 2))
        .build()
        .unwrap();

    // a uniform scene agrees everywhere, so the average equals the
    // plain sample
    camera.render_image().unwrap();
    assert_eq!(camera.image().pixel(0, 0), image::Rgb([77, 77, 77]));
}

#[test]
fn aperture_points_stay_inside_the_disk() {
    let scene = empty_scene(Color::BLACK);
    let camera = test_camera(RayTracer::new(&scene), 2, 2);

    let radius = 1.5;
    let points = camera.aperture_points(8, radius);
    assert!(!points.is_empty());
    for point in points {
        assert!(point.distance(Point3::default()) <= radius + 1e-9);
    }
}

#[test]
fn depth_of_field_on_a_uniform_background_is_exact() {
    let background = Color::splat(90.0);
    let scene = empty_scene(background);
    let mut camera = Camera::builder()
        .view_plane(1.0, 2.0, 2.0)
        .sampling(Sampling::DepthOfField {
            aperture_radius: 0.5,
            focal_length: 10.0,
            density: 3,
        })
        .tracer(RayTracer::new(&scene))
        .image_writer(ImageWriter::new(2, 2))
        .build()
        .unwrap();

    // every beam ray misses, so averaging changes nothing
    camera.render_image().unwrap();
    assert_eq!(camera.image().pixel(1, 1), image::Rgb([90, 90, 90]));
}
