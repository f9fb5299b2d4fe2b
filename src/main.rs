use std::error::Error;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use log::{info, LevelFilter};

use whitted::{
    camera::{Camera, Sampling},
    geometry::{Cylinder, Plane, Sphere, Triangle},
    lighting::{AmbientLight, DirectionalLight, PointLight, SpotLight},
    material::{Color, Material},
    math::{Point3, Ray, Vector3},
    output::ImageWriter,
    scene::Scene,
    tracer::RayTracer,
};

/// Log levels selectable from the command line.
#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Parser)]
#[command(name = "whitted")]
#[command(about = "A Whitted-style offline ray tracer")]
struct Args {
    /// Image width in pixels
    #[arg(long, default_value = "800")]
    width: u32,

    /// Image height in pixels
    #[arg(long, default_value = "600")]
    height: u32,

    /// Output file path
    #[arg(short, long, default_value = "render.png")]
    output: String,

    /// Worker thread count; 0 renders on the calling thread
    #[arg(short, long, default_value = "0")]
    workers: usize,

    /// Sample each pixel through a finite aperture (depth of field)
    #[arg(long, conflicts_with = "adaptive")]
    dof: bool,

    /// Aperture radius for depth of field
    #[arg(long, default_value = "0.6")]
    aperture: f64,

    /// Focal length for depth of field
    #[arg(long, default_value = "210.0")]
    focal_length: f64,

    /// Aperture sample grid density for depth of field
    #[arg(long, default_value = "6")]
    density: u32,

    /// Refine pixels adaptively where neighboring samples disagree
    #[arg(long)]
    adaptive: bool,

    /// Set the logging level
    #[arg(long, default_value = "info")]
    log_level: LogLevel,
}

/// A showcase scene: a mirror sphere and a glass sphere over a matte
/// floor, flanked by a cylinder and a glowing pyramid of triangles.
fn demo_scene() -> Result<Scene, Box<dyn Error>> {
    let floor_material = Material {
        kd: Color::splat(0.6),
        ks: Color::splat(0.2),
        shininess: 40,
        ..Material::default()
    };

    let mirror = Material {
        kd: Color::splat(0.1),
        ks: Color::splat(0.3),
        kr: Color::splat(0.8),
        shininess: 200,
        ..Material::default()
    };

    let glass = Material {
        kd: Color::splat(0.1),
        ks: Color::splat(0.4),
        kt: Color::new(0.8, 0.9, 0.9),
        shininess: 120,
        ..Material::default()
    };

    let matte_red = Material {
        kd: Color::new(0.7, 0.2, 0.2),
        ks: Color::splat(0.3),
        shininess: 60,
        ..Material::default()
    };

    let apex = Point3::new(70.0, -20.0, -120.0);
    let base = [
        Point3::new(40.0, -50.0, -90.0),
        Point3::new(100.0, -50.0, -90.0),
        Point3::new(70.0, -50.0, -150.0),
    ];

    let mut builder = Scene::builder("showcase")
        .background(Color::new(8.0, 10.0, 18.0))
        .ambient(AmbientLight::new(Color::splat(255.0), Color::splat(0.08)))
        .geometry(
            Plane::new(Point3::new(0.0, -50.0, 0.0), Vector3::new(0.0, 1.0, 0.0))
                .with_material(floor_material),
        )
        .geometry(
            Sphere::new(Point3::new(-45.0, -10.0, -180.0), 40.0)
                .with_emission(Color::new(10.0, 20.0, 25.0))
                .with_material(mirror),
        )
        .geometry(
            Sphere::new(Point3::new(35.0, -20.0, -140.0), 30.0)
                .with_emission(Color::new(12.0, 8.0, 8.0))
                .with_material(glass),
        )
        .geometry(
            Cylinder::new(
                Ray::new(Point3::new(-90.0, -50.0, -110.0), Vector3::new(0.0, 1.0, 0.0)),
                14.0,
                55.0,
            )
            .with_emission(Color::new(6.0, 12.0, 6.0))
            .with_material(Material {
                kd: Color::new(0.2, 0.6, 0.3),
                ks: Color::splat(0.25),
                shininess: 80,
                ..Material::default()
            }),
        );

    for i in 0..3 {
        builder = builder.geometry(
            Triangle::new(base[i], base[(i + 1) % 3], apex)?
                .with_material(matte_red.clone()),
        );
    }

    Ok(builder
        .light(
            SpotLight::new(
                Color::new(650.0, 600.0, 550.0),
                Point3::new(60.0, 90.0, -40.0),
                Vector3::new(-0.3, -1.0, -0.8),
            )
            .with_attenuation(1.0, 0.0006, 0.0000125)
            .with_narrow_beam(4.0),
        )
        .light(
            PointLight::new(Color::new(280.0, 300.0, 380.0), Point3::new(-120.0, 60.0, -60.0))
                .with_attenuation(1.0, 0.0008, 0.00002),
        )
        .light(DirectionalLight::new(
            Color::splat(60.0),
            Vector3::new(0.4, -1.0, -0.6),
        ))
        .build())
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    env_logger::Builder::from_default_env()
        .filter_level(args.log_level.into())
        .init();

    let scene = demo_scene()?;
    info!("scene '{}' assembled", scene.name);

    let sampling = if args.dof {
        Sampling::DepthOfField {
            aperture_radius: args.aperture,
            focal_length: args.focal_length,
            density: args.density,
        }
    } else if args.adaptive {
        Sampling::Adaptive
    } else {
        Sampling::Plain
    };

    let mut camera = Camera::builder()
        .position(Point3::new(0.0, 15.0, 60.0))
        .direction(Vector3::new(0.0, -0.1, -1.0), Vector3::new(0.0, 1.0, -0.1))
        .view_plane(100.0, 160.0, 120.0)
        .sampling(sampling)
        .workers(args.workers)
        .tracer(RayTracer::new(&scene))
        .image_writer(ImageWriter::new(args.width, args.height))
        .build()?;

    let start = Instant::now();
    camera.render_image()?;
    camera.save(&args.output)?;
    info!(
        "wrote {} in {:.2}s",
        args.output,
        start.elapsed().as_secs_f64()
    );
    Ok(())
}
