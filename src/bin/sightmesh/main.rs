//! sightmesh CLI - leveled visibility regions of a polygon.
//!
//! Usage: sightmesh <COMMAND> [OPTIONS] <INPUT>
//!
//! Run `sightmesh --help` for available commands. Logging goes through
//! `RUST_LOG`, e.g. `RUST_LOG=sightmesh=debug`.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, Subcommand};
use nalgebra::Point2;

use sightmesh::algo::{
    compute_visibility_with_progress, merge_faces, seed_partitions, Progress, VisibilityOptions,
};
use sightmesh::geom::points_coincide;
use sightmesh::io::{self, PolygonInput, RegionReport};
use sightmesh::mesh::{build_from_polygon, HalfEdgeMesh};

#[derive(Parser)]
#[command(name = "sightmesh")]
#[command(author, version, about = "Leveled visibility regions of simple polygons", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display subdivision statistics, and face levels when a guard is given
    Info {
        /// Input polygon file
        input: PathBuf,

        /// Guard vertex
        #[arg(long, num_args = 2, value_names = ["X", "Y"], allow_negative_numbers = true)]
        guard: Option<Vec<f64>>,
    },

    /// Compute the regions visible up to a level and write them out
    Regions {
        /// Input polygon file
        input: PathBuf,

        /// Guard vertex (must be a polygon vertex)
        #[arg(long, num_args = 2, value_names = ["X", "Y"], allow_negative_numbers = true, required = true)]
        guard: Vec<f64>,

        /// Visibility level (even)
        #[arg(short = 'k', long, default_value = "0")]
        level: u32,

        /// Output region file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip occlusion chords the subdivision rejects instead of failing
        #[arg(long)]
        skip_invalid: bool,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info { input, guard } => {
            cmd_info(&input, guard.as_deref())?;
        }

        Commands::Regions {
            input,
            guard,
            level,
            output,
            skip_invalid,
        } => {
            cmd_regions(&input, &guard, level, output.as_deref(), skip_invalid)?;
        }
    }

    Ok(())
}

/// Create a progress reporter that displays a progress bar on the terminal.
fn create_progress() -> Progress {
    let max_percent = Arc::new(AtomicUsize::new(0));

    Progress::new(move |current, total, message| {
        if total == 0 {
            return;
        }

        let raw_percent = if current >= total {
            100
        } else {
            ((current * 100) + (total / 2)) / total
        };

        // Monotonic: sub-step estimates may move backwards.
        let previous = max_percent.fetch_max(raw_percent, Ordering::Relaxed);
        let percent = previous.max(raw_percent);
        if percent == previous && percent != 100 {
            return;
        }

        let bar_width = 30;
        let filled = (percent * bar_width) / 100;
        let bar = "=".repeat(filled);
        let space = " ".repeat(bar_width - filled);

        eprint!("\r[{}{}] {:3}% {}", bar, space, percent, message);
        let _ = std::io::stderr().flush();

        if current >= total {
            eprintln!();
        }
    })
}

fn load(input: &Path) -> Result<(PolygonInput, HalfEdgeMesh), Box<dyn std::error::Error>> {
    let polygon = io::read_polygon(input)?;
    let mut mesh = build_from_polygon(&polygon.vertices)?;
    let seeded = seed_partitions(&mut mesh, &polygon.partitions)?;
    log::info!(
        "loaded {}: {} vertices, {} partition chords",
        input.display(),
        polygon.vertices.len(),
        seeded
    );
    Ok((polygon, mesh))
}

/// The guard as given, checked against the polygon's corners.
fn polygon_guard(
    polygon: &PolygonInput,
    coords: &[f64],
) -> Result<Point2<f64>, Box<dyn std::error::Error>> {
    let [x, y] = coords else {
        return Err("guard needs exactly two coordinates".into());
    };
    let guard = Point2::new(*x, *y);
    if !polygon.vertices.iter().any(|v| points_coincide(v, &guard)) {
        let corners: Vec<String> = polygon
            .vertices
            .iter()
            .map(|v| format!("({}, {})", v.x, v.y))
            .collect();
        return Err(format!(
            "guard ({}, {}) is not a polygon vertex; choose one of {}",
            x,
            y,
            corners.join(" ")
        )
        .into());
    }
    Ok(guard)
}

fn cmd_info(input: &Path, guard: Option<&[f64]>) -> Result<(), Box<dyn std::error::Error>> {
    let (polygon, mut mesh) = load(input)?;

    println!("File: {}", input.display());
    println!("Polygon vertices: {}", polygon.vertices.len());
    println!("Partition segments: {}", polygon.partitions.len());
    println!("Vertices: {}", mesh.num_vertices());
    println!("Edges: {}", mesh.num_edges());
    println!("Faces: {}", mesh.num_faces());
    println!("Euler characteristic: {}", mesh.euler_characteristic());

    if let Some((min, max)) = mesh.bounding_box() {
        println!(
            "Bounding box: ({:.3}, {:.3}) to ({:.3}, {:.3})",
            min.x, min.y, max.x, max.y
        );
    }

    if let Some(coords) = guard {
        let guard = polygon_guard(&polygon, coords)?;
        let chords = compute_visibility_with_progress(
            &mut mesh,
            guard,
            &VisibilityOptions::default(),
            &create_progress(),
        )?;

        println!("\nOcclusion chords: {}", chords);
        println!("Faces: {}", mesh.num_faces());
        for f in mesh.face_ids() {
            let face = mesh.face(f);
            let level = face
                .level
                .map_or_else(|| "-".to_string(), |l| l.to_string());
            println!(
                "  {:?}: level {} centroid ({:.3}, {:.3})",
                f, level, face.centroid.x, face.centroid.y
            );
        }
    }

    Ok(())
}

fn cmd_regions(
    input: &Path,
    guard: &[f64],
    level: u32,
    output: Option<&Path>,
    skip_invalid: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if level % 2 != 0 {
        return Err(format!("visibility level must be even, got {}", level).into());
    }

    let (polygon, mut mesh) = load(input)?;
    let guard = polygon_guard(&polygon, guard)?;

    let options = VisibilityOptions::default().with_skip_invalid_chords(skip_invalid);
    let progress = create_progress();

    let start = Instant::now();
    let chords = compute_visibility_with_progress(&mut mesh, guard, &options, &progress)?;
    let regions = merge_faces(&mut mesh, guard, level)?;
    let elapsed = start.elapsed();

    if regions.is_empty() {
        eprintln!("No regions have visibility level {} or less", level);
    }
    eprintln!(
        "{} occlusion chords, {} regions in {:.2?}",
        chords,
        regions.len(),
        elapsed
    );

    let report = RegionReport {
        guard,
        level,
        polygon: polygon.vertices,
        regions,
    };
    match output {
        Some(path) => io::save_regions(&report, path)?,
        None => io::write_regions(std::io::stdout().lock(), &report)?,
    }

    Ok(())
}
