use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process;
use std::str::FromStr;

use clap::Clap;

use sheet_wrap::config::{self, WrapConfig};
use sheet_wrap::input::{Key, KeyState};
use sheet_wrap::logger;
use sheet_wrap::raycast::FaceSide;
use sheet_wrap::sheet::WrapSheet;
use sheet_wrap::solid::{IntersectionMode, TargetSolid};
use sheet_wrap::viewer::{FrameSink, KeyOutcome, Viewer};

/// Scene variant to start from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Preset {
    Sphere,
    Cylinder,
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sphere" => Ok(Preset::Sphere),
            "cylinder" => Ok(Preset::Cylinder),
            _ => Err(format!("Unknown preset {}, use sphere or cylinder", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct IntersectionArg(IntersectionMode);

impl FromStr for IntersectionArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "analytic" => Ok(IntersectionArg(IntersectionMode::Analytic)),
            "tessellated" => Ok(IntersectionArg(IntersectionMode::Tessellated)),
            _ => Err(format!(
                "Unknown intersection mode {}, use analytic or tessellated",
                s
            )),
        }
    }
}

/// Wraps a subdivided sheet onto a sphere or a cylinder.
///
/// Keys are read from standard input, one per line: up, down, left, right
/// and enter. Type q to quit.
#[derive(Debug, Clap)]
struct Options {
    /// Scene variant: sphere or cylinder.
    #[clap(long, default_value = "sphere")]
    preset: Preset,
    /// RON file with a complete scene config. Overrides the preset.
    #[clap(long, parse(from_os_str))]
    config: Option<PathBuf>,
    /// How rays are intersected with the solid: analytic or tessellated.
    #[clap(long)]
    intersection: Option<IntersectionArg>,
    /// Count hits on back faces too.
    #[clap(long)]
    double_sided: bool,
    /// Print the resulting config as RON and exit.
    #[clap(long)]
    print_config: bool,
}

/// Reports every presented frame to the log.
struct LogFrameSink {
    frame: u64,
}

impl FrameSink for LogFrameSink {
    fn present(&mut self, solid: &TargetSolid, sheet: &WrapSheet) {
        self.frame += 1;

        let (min_depth, max_depth) = sheet
            .vertices()
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(min, max), v| {
                (min.min(v.z), max.max(v.z))
            });
        let pose = sheet.pose();

        log::info!(
            "Frame {}: {} at {}, sheet rotation {:?}, translation {:?}, depth {:.3}..{:.3}",
            self.frame,
            solid.shape().name(),
            solid.position(),
            pose.rotation().as_slice(),
            pose.translation().as_slice(),
            min_depth,
            max_depth,
        );
    }
}

fn load_config(options: &Options) -> Result<WrapConfig, config::ConfigError> {
    let mut wrap_config = match &options.config {
        Some(path) => config::open(path)?,
        None => match options.preset {
            Preset::Sphere => WrapConfig::sphere(),
            Preset::Cylinder => WrapConfig::cylinder(),
        },
    };

    if let Some(IntersectionArg(mode)) = options.intersection {
        wrap_config.solid.intersection_mode = mode;
    }
    if options.double_sided {
        wrap_config.solid.side = FaceSide::Double;
    }

    Ok(wrap_config)
}

fn main() {
    let options = Options::parse();

    if let Err(err) = logger::init() {
        eprintln!("Failed to initialize logger: {}", err);
    }

    let wrap_config = match load_config(&options) {
        Ok(wrap_config) => wrap_config,
        Err(err) => {
            log::error!("{}", err);
            process::exit(1);
        }
    };

    if options.print_config {
        match config::to_ron_string(&wrap_config) {
            Ok(contents) => println!("{}", contents),
            Err(err) => {
                log::error!("{}", err);
                process::exit(1);
            }
        }
        return;
    }

    log::info!(
        "Starting {} scene with {} intersection",
        wrap_config.solid.shape.name(),
        match wrap_config.solid.intersection_mode {
            IntersectionMode::Analytic => "analytic",
            IntersectionMode::Tessellated => "tessellated",
        },
    );

    let mut viewer = Viewer::from_config(&wrap_config, LogFrameSink { frame: 0 });
    if let Err(err) = viewer.start() {
        log::error!("{}", err);
        process::exit(1);
    }

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                log::error!("Failed to read input: {}", err);
                break;
            }
        };
        let trimmed = line.trim();

        if trimmed.is_empty() {
            continue;
        }
        if trimmed == "q" || trimmed == "quit" {
            break;
        }

        let key = match trimmed.parse::<Key>() {
            Ok(key) => key,
            Err(err) => {
                log::warn!("{}", err);
                continue;
            }
        };

        match viewer.handle_key(key, KeyState::Pressed) {
            Ok(KeyOutcome::Wrapped(report)) => log::debug!(
                "Wrap finished: {} vertices hit, {} missed",
                report.hit_vertices,
                report.missed_vertices,
            ),
            Ok(_) => {}
            Err(err) => log::warn!("Key {} had no effect: {}", key, err),
        }
    }
}
