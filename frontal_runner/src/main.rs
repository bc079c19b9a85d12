// The runner is the outer loop around the vision pipeline: it captures a frame,
// runs one pipeline iteration and waits for the next tick, forever or for a
// fixed number of frames.

mod frames;

use anyhow::{Context, Result};
use clap::Parser;
use frames::{ImageSequence, Orientation};
use frontal_vision::{ColorSegmenter, FramePipeline, PipelineConfig, WriteTransport};
use serialport::{DataBits, Parity, StopBits};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "frontal_runner", about = "Streams ball and goal positions to the robot controller")]
struct Args {
    /// An image file or a directory of images used as camera frames.
    input: PathBuf,

    /// Serial device to write lines to; `-` writes to stdout.
    #[arg(default_value = "-")]
    output: String,

    /// Serial line speed. Frames are always 8 data bits, no parity, 1 stop bit.
    #[arg(long, default_value_t = 115_200)]
    baud: u32,

    /// TOML file overriding the default thresholds.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Loop period in milliseconds.
    #[arg(long, default_value_t = 50)]
    period_ms: u64,

    /// Stop after this many frames.
    #[arg(long)]
    frames: Option<u64>,

    /// Flip frames left/right before processing.
    #[arg(long)]
    mirror: bool,

    /// Swap frame axes before processing.
    #[arg(long)]
    transpose: bool,
}

const SERIAL_TIMEOUT: Duration = Duration::from_millis(100);

fn open_output(output: &str, baud: u32) -> Result<Box<dyn Write + Send>> {
    if output == "-" {
        return Ok(Box::new(std::io::stdout()));
    }
    let port = serialport::new(output, baud)
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .timeout(SERIAL_TIMEOUT)
        .open()
        .with_context(|| format!("opening serial output {output} at {baud} baud"))?;
    Ok(Box::new(port))
}

/// Whether another frame may be processed under an optional `--frames` limit.
fn within_budget(limit: Option<u64>, processed: u64) -> bool {
    limit.is_none_or(|limit| processed < limit)
}

/// The frame size when it differs from the configured resolution.
fn resolution_mismatch(config: &PipelineConfig, segmenter: &ColorSegmenter) -> Option<(u32, u32)> {
    let actual = (segmenter.width(), segmenter.height());
    (actual != (config.image_width, config.image_height)).then_some(actual)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    // --- 1. Configuration ---
    let config = match &args.config {
        Some(path) => PipelineConfig::from_file(path).with_context(|| format!("loading {}", path.display()))?,
        None => PipelineConfig::default(),
    };

    // --- 2. Collaborators ---
    let orientation = Orientation {
        mirror: args.mirror,
        transpose: args.transpose,
    };
    let mut frames = ImageSequence::open(&args.input, orientation)?;
    let transport = WriteTransport::new(open_output(&args.output, args.baud)?);
    let mut pipeline = FramePipeline::new(config, transport)?;

    info!(
        frames = frames.len(),
        output = %args.output,
        baud = args.baud,
        period_ms = args.period_ms,
        "vision loop starting"
    );

    // --- 3. Main Processing Loop ---
    let mut ticker = tokio::time::interval(Duration::from_millis(args.period_ms.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut processed = 0u64;
    let mut size_warned = false;
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    while within_budget(args.frames, processed) {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = &mut shutdown => {
                info!("interrupted");
                break;
            }
        }

        let outcome = frames.capture().and_then(|image| {
            let segmenter = ColorSegmenter::new(&image);
            if !size_warned {
                if let Some((width, height)) = resolution_mismatch(pipeline.config(), &segmenter) {
                    size_warned = true;
                    warn!(
                        width,
                        height,
                        expected_width = pipeline.config().image_width,
                        expected_height = pipeline.config().image_height,
                        "frame size differs from configured resolution; angles use the configured center"
                    );
                }
            }
            Ok(pipeline.run_once(&segmenter)?)
        });
        if let Err(err) = outcome {
            warn!(error = %err, "frame dropped");
        }

        processed += 1;
    }

    info!(processed, "vision loop stopped");
    Ok(())
}
