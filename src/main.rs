use clap::{Parser, Subcommand};
use glam::DVec2;
use touch_projector::collector::{CancelToken, CollectorConfig};
use touch_projector::events::LogSink;
use touch_projector::homography::{ProjectiveTransform, solve_projective};
use touch_projector::io::{object_from_json, object_to_json, write_calibration_report};
use touch_projector::mapper::{CoordinateMapper, DEFAULT_Y_OFFSET};
use touch_projector::session::{self, Command, SessionConfig};
use touch_projector::source::ReplaySource;
use touch_projector::types::{AnchorLayout, CalibrationError, CalibrationSet};

#[derive(Parser)]
#[command(version, about)]
struct TprsCli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the four-corner calibration against a recorded point stream
    Calibrate {
        /// path to a JSON point stream: a list of [x, y] or null per frame
        points: String,
        #[arg(long, default_value_t = 640)]
        frame_width: u32,
        #[arg(long, default_value_t = 480)]
        frame_height: u32,
        /// path to an anchor layout JSON; defaults to the 1024x768 layout
        #[arg(long)]
        layout: Option<String>,
        /// per-anchor wait bound in milliseconds; unbounded when omitted
        #[arg(long)]
        timeout_ms: Option<u64>,
        #[arg(short, long, default_value = "transform.json")]
        output: String,
        /// also write a human-readable calibration report here
        #[arg(long)]
        report: Option<String>,
    },
    /// Solve a projective transform from a saved correspondence set
    Solve {
        /// path to a correspondence set JSON
        path: String,
        #[arg(short, long, default_value = "transform.json")]
        output: String,
        #[arg(long)]
        report: Option<String>,
    },
    /// Map a single camera point through a saved transform
    Map {
        /// path to a transform JSON
        transform: String,
        x: f64,
        y: f64,
        #[arg(long, default_value_t = DEFAULT_Y_OFFSET)]
        y_offset: f64,
    },
    /// Replay a recorded point stream through the mapper and motion gate
    Replay {
        /// path to a transform JSON
        transform: String,
        /// path to a JSON point stream: a list of [x, y] or null per frame
        points: String,
        #[arg(long, default_value_t = 640)]
        frame_width: u32,
        #[arg(long, default_value_t = 480)]
        frame_height: u32,
        #[arg(long, default_value_t = DEFAULT_Y_OFFSET)]
        y_offset: f64,
        #[arg(long, default_value_t = touch_projector::gate::DEFAULT_MAX_JUMP)]
        max_jump: f64,
    },
}

fn load_layout(path: &Option<String>) -> Result<AnchorLayout, i32> {
    match path {
        Some(p) => object_from_json(p).map_err(|e| {
            log::error!("failed to load layout {}: {}", p, e);
            1
        }),
        None => Ok(AnchorLayout::default()),
    }
}

fn load_points(path: &str) -> Result<Vec<Option<DVec2>>, i32> {
    object_from_json(path).map_err(|e| {
        log::error!("failed to load point stream {}: {}", path, e);
        1
    })
}

fn run(cli: TprsCli) -> Result<(), i32> {
    match cli.command {
        Commands::Calibrate {
            points,
            frame_width,
            frame_height,
            layout,
            timeout_ms,
            output,
            report,
        } => {
            let layout = load_layout(&layout)?;
            let stream = load_points(&points)?;
            let mut source = ReplaySource::new(stream, (frame_width, frame_height));
            let config = CollectorConfig {
                timeout: timeout_ms.map(std::time::Duration::from_millis),
            };
            let cancel = CancelToken::new();
            let (set, transform) =
                session::calibrate(&mut source, &layout, &config, &cancel, |anchor| {
                    println!("{:?} captured", anchor);
                })
                .map_err(|e| {
                    log::error!("calibration failed: {}", e);
                    match e {
                        CalibrationError::Source(_) => 2,
                        _ => 1,
                    }
                })?;
            object_to_json(&output, &transform).map_err(|e| {
                log::error!("failed to write {}: {}", output, e);
                1
            })?;
            if let Some(report_path) = report {
                write_calibration_report(&report_path, &set, &transform).map_err(|e| {
                    log::error!("failed to write {}: {}", report_path, e);
                    1
                })?;
            }
            println!("transform written to {}", output);
            Ok(())
        }
        Commands::Solve {
            path,
            output,
            report,
        } => {
            let set: CalibrationSet = object_from_json(&path).map_err(|e| {
                log::error!("failed to load correspondences {}: {}", path, e);
                1
            })?;
            let transform = solve_projective(&set.pairs).map_err(|e| {
                log::error!("solve failed: {}", e);
                1
            })?;
            object_to_json(&output, &transform).map_err(|e| {
                log::error!("failed to write {}: {}", output, e);
                1
            })?;
            if let Some(report_path) = report {
                write_calibration_report(&report_path, &set, &transform).map_err(|e| {
                    log::error!("failed to write {}: {}", report_path, e);
                    1
                })?;
            }
            println!("transform written to {}", output);
            Ok(())
        }
        Commands::Map {
            transform,
            x,
            y,
            y_offset,
        } => {
            let transform: ProjectiveTransform = object_from_json(&transform).map_err(|e| {
                log::error!("failed to load transform: {}", e);
                1
            })?;
            let mapper = CoordinateMapper::with_y_offset(transform, y_offset);
            match mapper.map(DVec2::new(x, y)) {
                Some(p) => {
                    println!("({:.3}, {:.3})", p.x, p.y);
                    Ok(())
                }
                None => {
                    log::error!("no mapping: the denominator vanishes at ({}, {})", x, y);
                    Err(1)
                }
            }
        }
        Commands::Replay {
            transform,
            points,
            frame_width,
            frame_height,
            y_offset,
            max_jump,
        } => {
            let transform: ProjectiveTransform = object_from_json(&transform).map_err(|e| {
                log::error!("failed to load transform: {}", e);
                1
            })?;
            let stream = load_points(&points)?;
            let mut source = ReplaySource::new(stream, (frame_width, frame_height));
            let mut sink = LogSink::default();
            let config = SessionConfig { y_offset, max_jump };
            // no interactive commands during an offline replay
            let (_tx, rx) = std::sync::mpsc::channel::<Command>();
            let report = session::run_tracking(&mut source, &transform, &config, &mut sink, &rx)
                .map_err(|e| {
                    log::error!("replay failed: {}", e);
                    e.exit_code()
                })?;
            println!(
                "{} frames, {} events emitted, {} rejected, {} trajectory segments",
                report.frames, report.emitted, report.rejected, report.trajectory_len
            );
            Ok(())
        }
    }
}

fn main() {
    env_logger::init();
    let cli = TprsCli::parse();
    if let Err(code) = run(cli) {
        std::process::exit(code);
    }
}
