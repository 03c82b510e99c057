//! Panel-method solver command line
//!
//! Reads a JSON mesh (or generates a flat rectangular wing), solves the
//! potential flow with optional wake rollup and writes the solution as JSON.
//!
//! Usage:
//!   cargo run --release --bin flow-panel -- --mesh wing.json --config case.json
//!   cargo run --release --bin flow-panel -- --alpha 5 --wake-rows 10 --output plate.json

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use flow_panel::core::io::{SolutionReport, load_mesh};
use flow_panel::core::mesh::flat_plate_mesh;
use flow_panel::{PanelSolver, SolverConfig};

#[derive(Parser, Debug)]
#[command(name = "flow-panel")]
#[command(about = "3D source/doublet panel solver with free-wake rollup", long_about = None)]
struct Args {
    /// JSON mesh file (vertices, faces, trailing_edges); a flat plate is used when omitted
    #[arg(short, long)]
    mesh: Option<PathBuf>,

    /// JSON solver configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output JSON file path
    #[arg(short, long, default_value = "solution.json")]
    output: PathBuf,

    /// Override the angle of attack (degrees)
    #[arg(long)]
    alpha: Option<f64>,

    /// Override the number of wake rows
    #[arg(long)]
    wake_rows: Option<usize>,

    /// Chordwise and spanwise panel counts of the generated plate
    #[arg(long, num_args = 2, value_names = ["CHORD", "SPAN"], default_values_t = [8, 16])]
    plate_panels: Vec<usize>,

    /// Number of parallel threads (default: all cores)
    #[arg(short = 't', long)]
    threads: Option<usize>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    configure_threads(args.threads)?;

    let mut config = match &args.config {
        Some(path) => SolverConfig::from_file(path)
            .with_context(|| format!("failed to load configuration {}", path.display()))?,
        None => SolverConfig::default(),
    };
    if let Some(alpha) = args.alpha {
        config.freestream.alpha = alpha;
    }
    if let Some(rows) = args.wake_rows {
        config.wake.rows = rows;
    }
    config.verbose |= args.verbose;

    let mesh = match &args.mesh {
        Some(path) => load_mesh(path)
            .with_context(|| format!("failed to load mesh {}", path.display()))?,
        None => {
            let (nc, ns) = (args.plate_panels[0], args.plate_panels[1]);
            log::info!("No mesh given, using a 1 x 4 flat plate with {nc} x {ns} panels");
            flat_plate_mesh(1.0, 4.0, nc, ns)?
        }
    };

    println!(
        "flow-panel {} ({}): {} panels, {} trailing edges",
        flow_panel::VERSION,
        flow_panel::GIT_HASH,
        mesh.num_panels(),
        mesh.num_trailing_edges()
    );

    let solution = PanelSolver::new(config).solve(&mesh)?;

    let last = solution.solves.last().map_or(0, |s| s.iterations);
    println!(
        "Solved in {} linear solves (last: {} GMRES iterations), max |v.n| = {:.2e}",
        solution.solves.len(),
        last,
        solution.max_transpiration()
    );

    SolutionReport::from_solution(&solution)
        .save(&args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    println!("Solution written to {}", args.output.display());

    Ok(())
}

#[cfg(feature = "native")]
fn configure_threads(threads: Option<usize>) -> Result<()> {
    if let Some(threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure the thread pool")?;
    }
    Ok(())
}

#[cfg(not(feature = "native"))]
fn configure_threads(threads: Option<usize>) -> Result<()> {
    if threads.is_some() {
        log::warn!("Built without the native feature; --threads is ignored");
    }
    Ok(())
}
