use std::process::ExitCode;

use clap::{Args as ClapArgs, Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use terrain_canvas::mask::MaskShape;
use terrain_canvas::noise::NoiseBackend;
use terrain_canvas::{export, render, render_values, viewer, RenderConfig};

#[derive(Parser, Debug)]
#[command(name = "terrain_canvas")]
#[command(about = "Render procedural terrain images from seeded fractal noise")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a frame to an image file (PNG unless the extension says otherwise)
    Render {
        #[command(flatten)]
        opts: RenderOpts,
        /// Output image path
        #[arg(short, long, default_value = "terrain.png")]
        output: String,
    },
    /// Export the raw value grid as delimited text
    Values {
        #[command(flatten)]
        opts: RenderOpts,
        /// Output text path
        #[arg(short, long, default_value = "terrain.csv")]
        output: String,
        /// Column delimiter
        #[arg(long, default_value = ",")]
        delimiter: char,
        /// Digits after the decimal point
        #[arg(long, default_value = "4")]
        decimals: usize,
    },
    /// Open an animated window
    View {
        #[command(flatten)]
        opts: RenderOpts,
        /// Animation speed in noise units per second (0 = still)
        #[arg(long, default_value = "0.0")]
        speed: f64,
    },
    /// Print the resolved configuration as JSON, or save it for `--config`
    Config {
        #[command(flatten)]
        opts: RenderOpts,
        /// Write the JSON to this file instead of stdout
        #[arg(long)]
        save: Option<String>,
    },
}

#[derive(ClapArgs, Debug)]
struct RenderOpts {
    /// Load settings from a JSON file; flags below override it
    #[arg(short, long)]
    config: Option<String>,

    /// Width of the canvas in pixels
    #[arg(short = 'W', long)]
    width: Option<usize>,

    /// Height of the canvas in pixels
    #[arg(short = 'H', long)]
    height: Option<usize>,

    /// Pixels per noise unit
    #[arg(long)]
    scale: Option<f64>,

    /// Noise seed
    #[arg(short, long)]
    seed: Option<f64>,

    /// Time offset along the noise y axis
    #[arg(short, long)]
    time: Option<f64>,

    /// Use a single octave
    #[arg(long)]
    single_octave: bool,

    #[arg(long)]
    grayscale: bool,

    /// Hard palette bands instead of blending
    #[arg(long)]
    no_smoothing: bool,

    #[arg(long)]
    no_shading: bool,

    /// Mask shape
    #[arg(long, value_parser = parse_shape)]
    mask: Option<MaskShape>,

    #[arg(long)]
    no_mask: bool,

    /// Mask contrast (>= 1.0)
    #[arg(long)]
    contrast: Option<f64>,

    /// Noise backend: lattice or perlin
    #[arg(long, value_parser = parse_backend)]
    backend: Option<NoiseBackend>,

    /// Randomize seed, scale, mask and palette from this RNG seed
    #[arg(long)]
    randomize: Option<u64>,
}

fn parse_shape(s: &str) -> Result<MaskShape, String> {
    MaskShape::all()
        .iter()
        .copied()
        .find(|shape| shape.label() == s.to_ascii_lowercase())
        .ok_or_else(|| format!("unknown mask shape '{}', expected circle, square or hexagon", s))
}

fn parse_backend(s: &str) -> Result<NoiseBackend, String> {
    match s.to_ascii_lowercase().as_str() {
        "lattice" => Ok(NoiseBackend::Lattice),
        "perlin" => Ok(NoiseBackend::Perlin),
        _ => Err(format!("unknown backend '{}', expected lattice or perlin", s)),
    }
}

impl RenderOpts {
    fn resolve(&self) -> Result<RenderConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => RenderConfig::load_json(path)?,
            None => RenderConfig::default(),
        };

        if let Some(seed) = self.randomize {
            config.randomize(&mut ChaCha8Rng::seed_from_u64(seed));
        }

        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(scale) = self.scale {
            config.scale = scale;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(time) = self.time {
            config.time_offset = time;
        }
        if let Some(shape) = self.mask {
            config.mask.shape = shape;
        }
        if let Some(contrast) = self.contrast {
            config.mask.contrast = contrast;
        }
        if let Some(backend) = self.backend {
            config.backend = backend;
        }
        config.fractal &= !self.single_octave;
        config.grayscale |= self.grayscale;
        config.smoothing &= !self.no_smoothing;
        config.shading &= !self.no_shading;
        config.mask.enabled &= !self.no_mask;

        config.validate()?;
        Ok(config)
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Render { opts, output } => {
            let config = opts.resolve()?;
            println!("Rendering {}x{} with seed {}...", config.width, config.height, config.seed);
            let buffer = render(&config)?;
            export::export_image(&buffer, &output)?;
            println!("Saved image to: {}", output);
        }
        Command::Values { opts, output, delimiter, decimals } => {
            let config = opts.resolve()?;
            println!("Sampling {}x{} values with seed {}...", config.width, config.height, config.seed);
            let grid = render_values(&config)?;
            if let Some((lo, hi)) = grid.min_max() {
                println!("Value range: {:.4} to {:.4}", lo, hi);
            }
            export::export_values(&grid, &output, delimiter, decimals)?;
            println!("Saved values to: {}", output);
        }
        Command::View { opts, speed } => {
            let config = opts.resolve()?;
            viewer::run_viewer(config, speed)?;
        }
        Command::Config { opts, save } => {
            let config = opts.resolve()?;
            match save {
                Some(path) => {
                    config.save_json(&path)?;
                    println!("Saved config to: {}", path);
                }
                None => println!("{}", serde_json::to_string_pretty(&config)?),
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
