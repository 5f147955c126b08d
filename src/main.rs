use anyhow::{Context, Result};
use clap::Parser;
use pcbdrill::{init_logging, is_input_error, Config, ConversionJob, LONG_VERSION};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "pcbdrill")]
#[command(author, version, about = "Convert Excellon drill files to G-code")]
#[command(long_version = LONG_VERSION)]
#[command(
    long_about = "Convert an Excellon drill file, and optionally a Gerber board outline, into a G-code program for a CNC router. Holes larger than the bit are spiral milled; slots and outlines are routed with bit compensation."
)]
struct Cli {
    /// Excellon drill file
    #[arg(required_unless_present = "write_config")]
    input: Option<PathBuf>,

    /// Output G-code file (default: <input>.nc)
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Gerber board outline to route after drilling
    #[arg(long)]
    outline: Option<PathBuf>,

    /// Bit diameter in mm
    #[arg(long, short = 'b')]
    bit_size: Option<f64>,

    /// Drill depth in mm
    #[arg(long, short = 'd')]
    depth: Option<f64>,

    /// XY feed rate in mm/min
    #[arg(long, short = 'f')]
    feed_rate: Option<f64>,

    /// Z plunge rate in mm/min
    #[arg(long, short = 'p')]
    plunge_rate: Option<f64>,

    /// Spindle speed in RPM
    #[arg(long, short = 's')]
    spindle_speed: Option<f64>,

    /// Z height for travel moves in mm
    #[arg(long)]
    safe_height: Option<f64>,

    /// Z height just above the stock in mm
    #[arg(long)]
    clearance_height: Option<f64>,

    /// Mill large holes with helical arcs instead of line segments
    #[arg(long)]
    use_arcs: bool,

    /// Outline cut depth in mm (default: drill depth)
    #[arg(long)]
    outline_depth: Option<f64>,

    /// Config file (.toml or .json); defaults to the platform config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Save the effective settings to this file
    #[arg(long)]
    write_config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

impl Cli {
    fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => Config::load_default().context("Failed to load default config")?,
        };

        let milling = &mut config.milling;
        let overrides = [
            (self.bit_size, &mut milling.bit_diameter_mm),
            (self.depth, &mut milling.depth_mm),
            (self.feed_rate, &mut milling.feed_rate),
            (self.plunge_rate, &mut milling.plunge_rate),
            (self.spindle_speed, &mut milling.spindle_speed),
            (self.safe_height, &mut milling.safe_height_mm),
            (self.clearance_height, &mut milling.clearance_height_mm),
        ];
        for (flag, field) in overrides {
            if let Some(value) = flag {
                *field = value;
            }
        }
        if self.use_arcs {
            milling.use_arcs = true;
        }
        if self.outline_depth.is_some() {
            config.outline.depth_mm = self.outline_depth;
        }

        config.validate().context("Invalid settings")?;
        Ok(config)
    }
}

/// Exit status when the drill or outline data is malformed.
const EXIT_BAD_INPUT: u8 = 2;

fn run(cli: Cli) -> Result<()> {
    let config = cli.load_config()?;
    debug!("Effective settings: {:?}", config);

    if let Some(path) = &cli.write_config {
        config
            .save_to_file(path)
            .with_context(|| format!("Failed to write config {}", path.display()))?;
        println!("Settings written to {}", path.display());
    }

    let Some(input) = cli.input else {
        return Ok(());
    };

    let mut job = ConversionJob::new(input, config);
    if let Some(output) = cli.output {
        job.output = output;
    }
    job.outline = cli.outline;

    let summary = job.run()?;
    println!("{}", summary);

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = init_logging(cli.verbose) {
        eprintln!("Error: {:?}", err);
        return ExitCode::FAILURE;
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:?}", err);
            if is_input_error(&err) {
                ExitCode::from(EXIT_BAD_INPUT)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}
