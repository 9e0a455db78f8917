use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};

use overpass::{
    ephemeris, report, tle, Observer, PassScanner, PassWindow, PositionProvider,
    PredictionRequest, ScanOptions, TopocentricElevation,
};

#[derive(Parser)]
#[command(name = "overpass")]
#[command(about = "Satellite visibility window prediction")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict passes for a TLE file or an ephemeris file
    Predict {
        /// TLE file (2- or 3-line entries, one or more satellites)
        #[arg(long, conflicts_with = "ephemeris")]
        tle: Option<PathBuf>,
        /// Ephemeris file (RFC 3339 instant + ECEF km position per line)
        #[arg(long)]
        ephemeris: Option<PathBuf>,
        /// Ground station latitude, degrees
        #[arg(long)]
        lat: f64,
        /// Ground station longitude, degrees
        #[arg(long)]
        lon: f64,
        /// Ground station altitude, meters
        #[arg(long, default_value_t = 0.0)]
        alt: f64,
        /// Elevation mask, degrees
        #[arg(long, default_value_t = 5.0)]
        mask: f64,
        /// Prediction range, days
        #[arg(long, default_value_t = 2.0)]
        days: f64,
        /// Sampling step, e.g. "10s" or "1m"
        #[arg(long, default_value = "10s")]
        step: String,
        /// Scan start (RFC 3339); defaults to now
        #[arg(long)]
        start: Option<DateTime<Utc>>,
        #[arg(long, value_enum, default_value_t = Format::Table)]
        format: Format,
        /// Emit a pass still open at scan end, truncated to the end instant
        #[arg(long)]
        truncate_open: bool,
        /// Bisect crossings to one-second accuracy
        #[arg(long)]
        refine: bool,
    },
    /// Parse a TLE file and list the satellites it contains
    Validate { tle: PathBuf },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Table,
    Csv,
    Json,
}

struct PredictArgs {
    tle: Option<PathBuf>,
    ephemeris: Option<PathBuf>,
    observer: Observer,
    mask: f64,
    days: f64,
    step: String,
    start: Option<DateTime<Utc>>,
    format: Format,
    truncate_open: bool,
    refine: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Predict {
            tle,
            ephemeris,
            lat,
            lon,
            alt,
            mask,
            days,
            step,
            start,
            format,
            truncate_open,
            refine,
        } => {
            let observer = match Observer::new(lat, lon, alt) {
                Ok(o) => o,
                Err(e) => {
                    eprintln!("{e}");
                    return ExitCode::FAILURE;
                }
            };
            predict(PredictArgs {
                tle,
                ephemeris,
                observer,
                mask,
                days,
                step,
                start,
                format,
                truncate_open,
                refine,
            })
        }
        Commands::Validate { tle } => validate(&tle),
    }
}

fn load_sources(
    tle: Option<&Path>,
    ephemeris: Option<&Path>,
) -> Result<Vec<(String, Box<dyn PositionProvider>)>, String> {
    match (tle, ephemeris) {
        (Some(path), None) => {
            let satellites = tle::load_tle_file(path).map_err(|e| e.to_string())?;
            Ok(satellites
                .into_iter()
                .map(|sat| {
                    let name = sat.name.clone();
                    (name, Box::new(sat) as Box<dyn PositionProvider>)
                })
                .collect())
        }
        (None, Some(path)) => {
            let eph = ephemeris::load_ephemeris_file(path).map_err(|e| e.to_string())?;
            let name = eph.object_id().to_string();
            Ok(vec![(name, Box::new(eph) as Box<dyn PositionProvider>)])
        }
        _ => Err("exactly one of --tle and --ephemeris is required".to_string()),
    }
}

fn predict(args: PredictArgs) -> ExitCode {
    let step_seconds = match humantime::parse_duration(&args.step) {
        Ok(d) => d.as_secs_f64(),
        Err(e) => {
            eprintln!("Invalid step '{}': {e}", args.step);
            return ExitCode::FAILURE;
        }
    };

    let sources = match load_sources(args.tle.as_deref(), args.ephemeris.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let request = PredictionRequest {
        observer: args.observer,
        elevation_mask_deg: args.mask,
        start: args.start.unwrap_or_else(Utc::now),
        duration_days: args.days,
        step_seconds,
    };

    let scanner = PassScanner::with_options(ScanOptions {
        truncate_open_pass: args.truncate_open,
        refine_crossings: args.refine,
        ..ScanOptions::default()
    });

    let mut results: Vec<(String, Vec<PassWindow>)> = Vec::new();
    for (name, provider) in &sources {
        let elevation = TopocentricElevation::new(&args.observer, provider.as_ref());
        match scanner.scan(&request, &elevation) {
            Ok(passes) if passes.is_empty() => {}
            Ok(passes) => results.push((name.clone(), passes)),
            Err(e) => {
                eprintln!("{name}: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    if results.is_empty() {
        println!("No passes found within the prediction period.");
        return ExitCode::SUCCESS;
    }

    match args.format {
        Format::Table => {
            for (name, passes) in &results {
                println!(
                    "{name} ({} passes in the next {} days):",
                    passes.len(),
                    args.days
                );
                print!("{}", report::to_table(passes));
            }
        }
        Format::Csv => print!("{}", report::to_csv_grouped(&results)),
        Format::Json => match report::to_json_grouped(&results) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("{e}");
                return ExitCode::FAILURE;
            }
        },
    }

    ExitCode::SUCCESS
}

fn validate(tle_path: &Path) -> ExitCode {
    match tle::load_tle_file(tle_path) {
        Ok(satellites) => {
            println!("{} satellite(s):", satellites.len());
            for sat in &satellites {
                println!("  {} (NORAD {})", sat.name, sat.norad_id);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
