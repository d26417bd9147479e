use std::path::PathBuf;

use anyhow::{Result, ensure};
use clap::Parser;
use log::{error, info, warn};

use camsim::config::SimConfig;
use camsim::io::{svg_input::read_outline, svg_output::make_svg};
use camsim::Simulator;

#[derive(Parser)]
pub struct Args {
    /// Path to the simulation config.
    pub config: PathBuf,
}

fn main() {
    if let Err(_) = std::env::var("RUST_LOG") {
        unsafe { std::env::set_var("RUST_LOG", "info") };
    }

    env_logger::init();
    let args = Args::parse();
    if let Err(err) = run(args) {
        error!("{err}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config: SimConfig = serde_norway::from_reader(std::fs::File::open(&args.config)?)?;

    if !config.outdir.exists() {
        std::fs::create_dir_all(&config.outdir)?;
    }
    ensure!(config.outdir.is_dir(), "{:?} should be a directory", config.outdir);

    let name = config.name;
    let simulator = Simulator::new();

    for (i, job) in config.jobs.into_iter().enumerate() {
        let mut content = String::new();
        let parser = svg::open(&job.input, &mut content)?;
        let outline = read_outline(parser)?;

        info!("Job {i:02} - read the outline");

        let result = simulator.simulate(&outline, &job.tool())?;

        info!("Job {i:02} - simulated the cut");

        let d = &result.diagnostics;
        if d.dropped_segments > 0 || d.dropped_contours > 0 {
            warn!(
                "Job {i:02} - dropped {} segment(s) and {} contour(s) as degenerate",
                d.dropped_segments, d.dropped_contours
            );
        }
        if d.vanished_contours > 0 {
            warn!("Job {i:02} - {} contour(s) vanished, the bit may be too large", d.vanished_contours);
        }
        if !d.unreachable.is_empty() {
            warn!("Job {i:02} - {} region(s) are unreachable for this bit", d.unreachable.len());
        }

        let document = make_svg(&outline, &result);
        let output_path = config.outdir.join(format!("{name}-{i:02}.svg"));
        svg::save(output_path, &document)?;

        info!("Job {i:02} - produced the preview SVG");
    }

    Ok(())
}
