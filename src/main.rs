use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;

use windgauge::clock::FrameClock;
use windgauge::config::{FrameRate, GaugeConfig};
use windgauge::output::{OutputFormat, create_formatter};
use windgauge::sensor::{ReadingSlot, ReplaySource, SensorFeed, WindSource};
use windgauge::session::{MeasurementState, MeasurementSummary};
use windgauge::units::{DirectionUnit, SpeedUnit};
use windgauge::MeasurementProcessor;

#[cfg(feature = "simulation")]
use windgauge::simulation::{SyntheticWind, SyntheticWindConfig};

#[derive(Parser, Debug)]
#[command(name = "windgauge")]
#[command(about = "Live wind measurement from a replay file or a synthetic sensor", long_about = None)]
struct Args {
    /// Replay file with `heading,wind_direction,speed[,time_secs]` lines
    #[arg(short = 'i', long)]
    input: Option<PathBuf>,

    /// Use the synthetic wind sensor instead of a file
    #[cfg(feature = "simulation")]
    #[arg(long, conflicts_with = "input")]
    simulate: bool,

    /// RNG seed for the synthetic sensor
    #[cfg(feature = "simulation")]
    #[arg(long)]
    seed: Option<u64>,

    /// Output format: text, json, csv
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// TOML configuration file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Frame rate (e.g., "60", "30hz", "16.7ms")
    #[arg(long)]
    rate: Option<FrameRate>,

    /// Seconds between replay lines without a timestamp column
    #[arg(long, default_value = "0.05")]
    interval: f32,

    /// Hold the dial at north instead of following the heading
    #[arg(long)]
    lock_north: bool,

    /// Measure for a fixed cancellable period instead of until stopped
    #[arg(long)]
    no_stop: bool,

    /// Unit for printed wind speeds
    #[arg(short = 'u', long, value_enum)]
    speed_unit: Option<SpeedUnit>,

    /// Stop the measurement after this many seconds
    #[arg(short = 'd', long)]
    duration: Option<f32>,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let mut config = match &args.config {
        Some(path) => GaugeConfig::load(path)?,
        None => GaugeConfig::default(),
    };
    if let Some(rate) = args.rate {
        config.clock.frame_rate = rate;
    }
    if let Some(unit) = args.speed_unit {
        config.gauge.speed_unit = unit;
    }
    if args.lock_north {
        config.session.lock_north = true;
    }
    if args.no_stop {
        config.session.stoppable = false;
    }
    config.validate()?;

    let source = open_source(&args)?;

    eprintln!("=== windgauge ===");
    eprintln!("Frame rate: {}", config.clock.frame_rate);
    eprintln!("Smoothing weight: {}", config.session.smoothing_weight);
    eprintln!(
        "Countdown: {} s, then {}",
        config.session.countdown_secs,
        if config.session.stoppable {
            "measure until stopped".to_string()
        } else {
            format!("{} s measurement", config.session.cancellable_secs)
        }
    );
    eprintln!();

    let slot = ReadingSlot::new();
    let feed = SensorFeed::spawn(source, slot.clone(), true);

    let summary = run_measurement_loop(&args, &config, &slot, &feed);
    feed.stop();

    print_summary(&summary, args.format, config.gauge.speed_unit)?;
    Ok(())
}

fn open_source(args: &Args) -> anyhow::Result<Box<dyn WindSource>> {
    if let Some(source) = synthetic_source(args)? {
        return Ok(source);
    }

    match &args.input {
        Some(path) => {
            let source = ReplaySource::open(path, args.interval)?;
            log::info!("Replaying {} readings from {}", source.len(), path.display());
            Ok(Box::new(source))
        }
        None => anyhow::bail!("no sensor input given (use --input FILE or --simulate)"),
    }
}

#[cfg(feature = "simulation")]
fn synthetic_source(args: &Args) -> anyhow::Result<Option<Box<dyn WindSource>>> {
    if !args.simulate {
        return Ok(None);
    }
    let config = SyntheticWindConfig {
        seed: args.seed,
        ..SyntheticWindConfig::default()
    };
    log::info!("Using synthetic wind sensor");
    Ok(Some(Box::new(SyntheticWind::new(config)?)))
}

#[cfg(not(feature = "simulation"))]
fn synthetic_source(_args: &Args) -> anyhow::Result<Option<Box<dyn WindSource>>> {
    Ok(None)
}

fn run_measurement_loop(
    args: &Args,
    config: &GaugeConfig,
    slot: &ReadingSlot,
    feed: &SensorFeed,
) -> MeasurementSummary {
    let mut processor = MeasurementProcessor::new(config);
    let mut clock = FrameClock::new(config.clock.frame_rate);
    let formatter = create_formatter(args.format, args.verbose > 0, config.gauge.speed_unit);

    if let Some(header) = formatter.header() {
        println!("{}", header);
    }

    let output_interval = Duration::from_secs_f32(1.0 / config.clock.output_rate_hz);
    let mut last_output = Instant::now();
    let mut waiting_since = Instant::now();

    loop {
        let delta = clock.wait();

        if slot.sequence() == 0 {
            // Only print warning occasionally to avoid spam
            if waiting_since.elapsed() >= Duration::from_secs(2) {
                log::warn!("Waiting for sensor readings...");
                waiting_since = Instant::now();
            }
            if feed.is_exhausted() {
                log::error!("Sensor produced no readings");
                break;
            }
            continue;
        }

        let snapshot = match processor.tick_from_slot(slot, delta) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                log::warn!("Skipping frame: {}", e);
                continue;
            }
        };

        // Throttle output
        if last_output.elapsed() >= output_interval {
            println!("{}", formatter.format(&snapshot));
            last_output = Instant::now();
        }

        if processor.is_finished() {
            break;
        }
        if let MeasurementState::Cancellable { seconds_left } = snapshot.state {
            if seconds_left <= 0.0 {
                log::info!("Measurement period complete");
                break;
            }
        }
        if args.duration.is_some_and(|limit| snapshot.time_secs >= limit) {
            log::info!("Duration limit reached after {:.1} s", snapshot.time_secs);
            break;
        }
        if feed.is_exhausted() {
            log::info!("Sensor input ended");
            break;
        }
    }

    processor.finish()
}

fn print_summary(
    summary: &MeasurementSummary,
    format: OutputFormat,
    speed_unit: SpeedUnit,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(summary)?),
        OutputFormat::Text | OutputFormat::Csv => {
            eprintln!();
            eprintln!("=== Summary ===");
            eprintln!("Started:   {}", summary.started_at.to_rfc3339());
            eprintln!("Measured:  {:.1} s over {} frames", summary.duration_secs, summary.frames);
            eprintln!(
                "Speed:     mean {} {unit}, max {} {unit}, min {} {unit} (σ {:.2} m/s)",
                speed_unit.format(summary.mean_speed),
                speed_unit.format(summary.max_speed),
                speed_unit.format(summary.min_speed),
                summary.speed_std_dev,
                unit = speed_unit
            );
            match summary.wind_direction {
                Some(direction) => eprintln!(
                    "Direction: {} ({:.0}°)",
                    DirectionUnit::Cardinal.format(direction),
                    direction
                ),
                None => eprintln!("Direction: n/a"),
            }
            if !summary.valid {
                eprintln!("Measurement too short to be valid");
            }
        }
    }
    Ok(())
}
