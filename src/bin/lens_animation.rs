//! Offline animation of the lensing renderer
//! Renders a phase sweep, colorizes every frame and writes a looping GIF

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, DynamicImage, Frame};
use ndarray::Array2;

use lensing::palette::{outline_horizon, Palette};
use lensing::{LensConfig, PhaseSchedule};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Rotating lens animation (GIF + optional PNG frames)")]
struct Cli {
    #[arg(long, default_value_t = 2.0)]
    mass: f64,
    #[arg(long, default_value_t = 0.8)]
    spin: f64,
    /// Samples per axis of the square grid
    #[arg(long, default_value_t = 200)]
    grid_size: usize,
    /// Half-width of the simulated domain
    #[arg(long, default_value_t = 8.0)]
    extent: f64,
    #[arg(long, default_value_t = 400)]
    frames: usize,
    /// Rotation phase advance per frame (radians)
    #[arg(long, default_value_t = 0.05)]
    phase_step: f64,
    #[arg(long, default_value_t = 10)]
    fps: u32,
    #[arg(long, default_value = "clear_rotating_black_hole.gif")]
    output: PathBuf,
    /// Also write every frame as a PNG into this directory
    #[arg(long)]
    frame_dir: Option<PathBuf>,
    /// Skip the horizon outline
    #[arg(long, default_value_t = false)]
    no_outline: bool,
}

impl Cli {
    fn validate(&self) -> Result<()> {
        if self.fps == 0 {
            bail!("fps must be at least 1");
        }
        Ok(())
    }

    fn lens_config(&self) -> LensConfig {
        LensConfig {
            mass: self.mass,
            spin: self.spin,
            resolution: self.grid_size,
            extent: self.extent,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    cli.validate()?;

    let renderer = cli
        .lens_config()
        .build()
        .context("invalid lens configuration")?;
    let schedule = PhaseSchedule::new(cli.frames, cli.phase_step)
        .context("invalid animation schedule")?;
    let palette = Palette::default();
    let rs = renderer.field().params().rs();

    log::info!(
        "mass {:.2}, spin {:.2}, rs {:.2}, grid {}x{}, {} frames at {} fps",
        cli.mass,
        cli.spin,
        rs,
        cli.grid_size,
        cli.grid_size,
        schedule.frames(),
        cli.fps
    );

    if let Some(dir) = &cli.frame_dir {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating frame directory {}", dir.display()))?;
    }

    let file = File::create(&cli.output)
        .with_context(|| format!("creating {}", cli.output.display()))?;
    let mut encoder = GifEncoder::new(BufWriter::new(file));
    encoder
        .set_repeat(Repeat::Infinite)
        .context("configuring GIF loop")?;
    let delay = Delay::from_numer_denom_ms(1000, cli.fps);

    let start = Instant::now();
    let mut scratch = Array2::zeros((cli.grid_size, cli.grid_size));
    let progress_every = (schedule.frames() / 10).max(1);

    for (index, phase) in schedule.iter() {
        renderer.render_into(phase, &mut scratch);

        let mut image = palette.colorize(&scratch);
        if !cli.no_outline {
            outline_horizon(&mut image, renderer.grid(), rs);
        }

        if let Some(dir) = &cli.frame_dir {
            let path = dir.join(format!("frame_{index:04}.png"));
            image
                .save(&path)
                .with_context(|| format!("writing {}", path.display()))?;
        }

        let rgba = DynamicImage::ImageRgb8(image).into_rgba8();
        encoder
            .encode_frame(Frame::from_parts(rgba, 0, 0, delay))
            .with_context(|| format!("encoding frame {index}"))?;

        if index % progress_every == 0 {
            log::info!("frame {}/{} (phase {:.2})", index + 1, schedule.frames(), phase);
        }
    }

    log::info!(
        "rendered {} frames in {:.1}s -> {}",
        schedule.frames(),
        start.elapsed().as_secs_f32(),
        cli.output.display()
    );

    Ok(())
}
