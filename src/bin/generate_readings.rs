use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use windgauge::simulation::{SyntheticWindConfig, generate_readings};

#[derive(Parser, Debug)]
#[command(name = "generate_readings")]
#[command(about = "Generate synthetic wind meter replay files")]
struct Args {
    /// TOML synthetic wind configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Length of the recording in seconds
    #[arg(short, long, default_value_t = 60.0)]
    duration: f32,

    /// Base seed for reproducibility
    #[arg(short, long)]
    seed: Option<u64>,

    /// Mean wind speed in m/s (CLI override)
    #[arg(long)]
    speed: Option<f32>,

    /// Mean wind direction in degrees (CLI override)
    #[arg(long)]
    direction: Option<f32>,

    /// Readings per second (CLI override)
    #[arg(long)]
    rate: Option<f32>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config: SyntheticWindConfig = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => SyntheticWindConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Some(speed) = args.speed {
        config.mean_speed = speed;
    }
    if let Some(direction) = args.direction {
        config.mean_direction = direction;
    }
    if let Some(rate) = args.rate {
        config.sample_rate_hz = rate;
    }
    config.duration_secs = Some(args.duration);

    let count = (args.duration * config.sample_rate_hz).ceil() as usize + 1;
    let readings = generate_readings(config.clone(), count)?;

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            fs::File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(std::io::stdout().lock())),
    };

    writeln!(
        out,
        "# synthetic wind: mean {:.1} m/s from {:.0}°, seed {:?}",
        config.mean_speed, config.mean_direction, config.seed
    )?;
    writeln!(out, "heading,wind_direction,speed,time_secs")?;
    for timed in &readings {
        writeln!(
            out,
            "{:.2},{:.2},{:.3},{:.3}",
            timed.reading.heading, timed.reading.wind_direction, timed.reading.speed, timed.time_secs
        )?;
    }
    out.flush()?;

    if let Some(path) = &args.output {
        eprintln!("Wrote {} readings to {}", readings.len(), path.display());
    }

    Ok(())
}
