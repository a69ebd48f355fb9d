//! planetgen CLI - deterministic cube-sphere planet generator.
//!
//! Builds face meshes from the layer pipeline or a modifier stack, samples
//! layer values at a direction, and inspects the synthetic plate field.

use clap::{Parser, Subcommand, ValueEnum};
use glam::Vec3;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use planetgen::geometry::CubeFaceId;
use planetgen::layers::LayerId;
use planetgen::lod::Camera;
use planetgen::tectonics::{sphere_point, BoundaryKind};
use planetgen::{HeightModel, Planet, PlanetConfig};

/// Deterministic cube-sphere planet generator.
#[derive(Parser)]
#[command(name = "planetgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML config file; defaults are used when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the configured seed.
    #[arg(short, long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build all six face meshes and report their statistics.
    Generate {
        /// Grid cells per face edge at LOD level 0.
        #[arg(short, long)]
        resolution: Option<u32>,

        /// Height model driving the surface.
        #[arg(short, long)]
        model: Option<ModelArg>,

        /// Place a camera on the +Z axis at this distance and let LOD pick
        /// each face's level instead of building every face at level 0.
        #[arg(long)]
        camera_distance: Option<f32>,
    },

    /// Print every layer value at a direction.
    Sample {
        #[arg(allow_hyphen_values = true)]
        x: f32,
        #[arg(allow_hyphen_values = true)]
        y: f32,
        #[arg(allow_hyphen_values = true)]
        z: f32,
    },

    /// List plates and boundary coverage.
    Plates {
        /// Sample count used to estimate boundary coverage.
        #[arg(long, default_value = "20000")]
        samples: usize,
    },

    /// Display the effective configuration and mesh sizes per LOD level.
    Info,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModelArg {
    /// Full layer pipeline.
    Layers,
    /// Warped, terraced modifier stack.
    Terraced,
    /// Batch fractal face buffers.
    Batch,
    /// Perfect sphere.
    Flat,
}

impl From<ModelArg> for HeightModel {
    fn from(arg: ModelArg) -> Self {
        match arg {
            ModelArg::Layers => HeightModel::Layers,
            ModelArg::Terraced => HeightModel::TerracedStack,
            ModelArg::Batch => HeightModel::Batch,
            ModelArg::Flat => HeightModel::Flat,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match PlanetConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        None => PlanetConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }

    match cli.command {
        Commands::Generate {
            resolution,
            model,
            camera_distance,
        } => {
            if let Some(resolution) = resolution {
                config.base_resolution = resolution;
            }
            if let Some(model) = model {
                config.height_model = model.into();
            }
            if let Err(e) = config.validate() {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
            run_generate(&config, camera_distance);
        }
        Commands::Sample { x, y, z } => run_sample(&config, Vec3::new(x, y, z)),
        Commands::Plates { samples } => run_plates(&config, samples),
        Commands::Info => run_info(&config),
    }
}

fn run_generate(config: &PlanetConfig, camera_distance: Option<f32>) {
    println!("planetgen");
    println!("=========");
    println!("Seed: {}", config.seed);
    println!("Height model: {:?}", config.height_model);
    println!("Base resolution: {}", config.base_resolution);
    println!();

    let start = Instant::now();
    let mut planet = Planet::from_config(config);

    let result = match camera_distance {
        Some(distance) => {
            let camera = Camera::perspective(
                Vec3::new(0.0, 0.0, distance),
                Vec3::ZERO,
                60f32.to_radians(),
                16.0 / 9.0,
                0.01,
                distance * 4.0 + 10.0,
            );
            planet.update(&camera);
            planet.wait_all()
        }
        None => planet.rebuild_all(),
    };
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    let elapsed = start.elapsed();

    println!(
        "{:<5} {:>5} {:>6} {:>10} {:>10} {:>10} {:>10} {:>8}",
        "face", "level", "res", "vertices", "triangles", "min r", "max r", "visible"
    );
    for chunk in planet.chunks() {
        let Some(mesh) = chunk.mesh() else {
            println!("{:<5} (no mesh)", chunk.face());
            continue;
        };
        let (lo, hi) = mesh.radius_range();
        println!(
            "{:<5} {:>5} {:>6} {:>10} {:>10} {:>10.4} {:>10.4} {:>8}",
            chunk.face(),
            chunk.level(),
            mesh.resolution,
            mesh.vertex_count(),
            mesh.triangle_count(),
            lo,
            hi,
            if camera_distance.is_some() { chunk.is_visible().to_string() } else { "-".into() },
        );
    }
    println!();
    println!("Built in {:.2?}", elapsed);
}

fn run_sample(config: &PlanetConfig, point: Vec3) {
    let Some(direction) = point.try_normalize() else {
        eprintln!("Error: sample direction must be non-zero");
        std::process::exit(1);
    };
    let pipeline = config.pipeline();
    let sample = pipeline.compute(direction);

    println!(
        "Layers at ({:.4}, {:.4}, {:.4}), seed {}",
        direction.x, direction.y, direction.z, config.seed
    );
    for id in LayerId::ALL {
        match sample.get(id) {
            Some(value) => println!("  {:<13} {}", id.name(), value),
            None => println!("  {:<13} (disabled)", id.name()),
        }
    }
    println!();
    println!("Height:               {:.4}", sample.height());
    println!(
        "Tectonics influence:  {:.4}",
        pipeline.layer_influence(LayerId::Tectonics, direction)
    );
    println!(
        "Rocky influence:      {:.4}",
        pipeline.layer_influence(LayerId::Rocky, direction)
    );
    match pipeline.plate_field().plate_at(direction) {
        Some(plate) => println!("Plate:                {} ({})", plate.id, plate.kind.name()),
        None => println!("Plate:                none"),
    }
    match pipeline.plate_modifier().boundary_info(direction) {
        Some(info) => println!(
            "Boundary:             {} between {} and {} (gap {:.4})",
            info.kind.name(),
            info.first,
            info.second,
            info.distance
        ),
        None => println!("Boundary:             none"),
    }
}

fn run_plates(config: &PlanetConfig, samples: usize) {
    let pipeline = config.pipeline();
    let field = pipeline.plate_field();

    println!("Plate field (seed {})", field.seed());
    println!("  Plates:      {}", field.len());
    println!("  Continental: {}", field.continental_count());
    println!();
    println!("{:>4} {:<12} {:>28} {:>28}", "id", "kind", "center", "drift");
    for plate in field.plates() {
        println!(
            "{:>4} {:<12} {:>28} {:>28}",
            plate.id,
            plate.kind.name(),
            format!("({:.3}, {:.3}, {:.3})", plate.center.x, plate.center.y, plate.center.z),
            format!("({:.3}, {:.3}, {:.3})", plate.drift.x, plate.drift.y, plate.drift.z),
        );
    }

    // Stratified sphere samples; deterministic for a given count.
    let samples = samples.max(1);
    let mut counts = [0usize; 3];
    for i in 0..samples {
        let a = (i as f32 + 0.5) / samples as f32;
        let b = (i as f32 * 0.618_034).fract();
        if let Some(info) = pipeline.plate_modifier().boundary_info(sphere_point(a, b)) {
            let slot = match info.kind {
                BoundaryKind::Divergent => 0,
                BoundaryKind::Convergent => 1,
                BoundaryKind::Transform => 2,
            };
            counts[slot] += 1;
        }
    }

    println!();
    println!("Boundary coverage ({} samples, effect radius {}):", samples, pipeline.plate_modifier().radius());
    for (kind, count) in [BoundaryKind::Divergent, BoundaryKind::Convergent, BoundaryKind::Transform]
        .iter()
        .zip(counts)
    {
        println!(
            "  {:<11} {:>6.2}%",
            kind.name(),
            count as f64 / samples as f64 * 100.0
        );
    }
}

fn run_info(config: &PlanetConfig) {
    println!("planetgen - Planet Configuration Info");
    println!("=====================================");
    println!();
    match config.to_toml_string() {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("Error: {}", e),
    }

    println!("Mesh size per face by LOD level:");
    let lod = config.lod();
    for level in 0..=lod.max_level() {
        let resolution = planetgen::LodController::resolution_for(config.base_resolution, level);
        let vertices = (resolution as u64 + 1).pow(2);
        let triangles = resolution as u64 * resolution as u64 * 2;
        // positions + normals as f32 triples, indices as u32
        let bytes = vertices * 24 + triangles * 12;
        let enter = match level {
            0 => "far".to_string(),
            l => format!("<= {}", lod.thresholds()[l as usize - 1]),
        };
        println!(
            "  level {} ({:>7}): res {:>5}, {:>10} vertices, {:>10} triangles, {:>8.2} MB",
            level,
            enter,
            resolution,
            vertices,
            triangles,
            bytes as f64 / 1024.0 / 1024.0
        );
    }
    println!();
    println!("Faces: {}", CubeFaceId::all().map(|f| f.short_name()).join(", "));
}
