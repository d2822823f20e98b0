//! Helio command-line front end.
//!
//! Renders one of the built-in scenes and writes the image as ASCII PPM (P3)
//! to stdout. Diagnostics and progress go to stderr.

use anyhow::Result;
use clap::Parser;
use helio_render::{render, write_ppm};
use std::io::{self, BufWriter};

mod scenes;

/// A CPU Monte Carlo path tracer.
#[derive(Parser)]
#[command(name = "helio", version, about)]
struct Args {
    /// Built-in scene to render (1-8)
    #[arg(default_value_t = 1)]
    scene: u32,

    /// Override the scene's samples per pixel
    #[arg(long)]
    samples: Option<u32>,

    /// Override the scene's image width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Base seed for the per-scanline random generators
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let Some((world, mut camera)) = scenes::build(args.scene) else {
        log::error!("Unknown scene selector {}; expected 1-8", args.scene);
        std::process::exit(1);
    };

    if let Some(samples) = args.samples {
        camera.samples_per_pixel = samples;
    }
    if let Some(width) = args.width {
        camera.image_width = width;
    }

    log::info!(
        "Rendering scene {} ({} samples per pixel)",
        args.scene,
        camera.samples_per_pixel
    );

    let image = render(&mut camera, world.as_ref(), args.seed);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    write_ppm(&mut out, &image)?;

    Ok(())
}
