use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use motionwatch_core::background::domain::subtraction_method::SubtractionMethod;
use motionwatch_core::detection::domain::rect_filter::size_filter;
use motionwatch_core::detection::domain::rect_type::RectType;
use motionwatch_core::detection::infrastructure::annotator::AnnotationStyle;
use motionwatch_core::detection::motion_detector::{MotionDetector, MotionDetectorConfig};
use motionwatch_core::pipeline::detect_motion_use_case::{DetectMotionUseCase, OutputOptions};
use motionwatch_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use motionwatch_core::pipeline::reference_frame::median_reference;
use motionwatch_core::shared::constants::{
    DEFAULT_BUFFER_SIZE, DEFAULT_MIN_AREA, DEFAULT_RECT_SIGMA, DEFAULT_THRESHOLD,
};
use motionwatch_core::shared::frame::Frame;
use motionwatch_core::video::domain::frame_reader::FrameReader;
use motionwatch_core::video::infrastructure::image_file_writer::ImageFileWriter;
use motionwatch_core::video::infrastructure::image_sequence_reader::ImageSequenceReader;

/// Motion detection over a directory of image frames.
///
/// Writes an annotated copy of every frame analysed once the frame buffer
/// has filled.
#[derive(Parser)]
#[command(name = "motionwatch")]
struct Cli {
    /// Directory of frames (read in file-name order) or a single image.
    input: PathBuf,

    /// Directory for annotated frames.
    output: PathBuf,

    /// Background model: static, frame-difference, median, approximate-median.
    #[arg(long, default_value = "approximate-median")]
    method: SubtractionMethod,

    /// Per-pixel noise threshold on the grayscale difference.
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: f32,

    /// Use a graded (soft) mask instead of a binary one.
    #[arg(long)]
    soft_threshold: bool,

    /// Minimum contour area in pixels for a detection.
    #[arg(long, default_value_t = DEFAULT_MIN_AREA)]
    min_area: f64,

    /// Number of recent frames the background model sees.
    #[arg(long, default_value_t = DEFAULT_BUFFER_SIZE)]
    buffer_size: usize,

    /// Rectangle type: bounding or standardized.
    #[arg(long, default_value = "bounding")]
    rect_type: RectType,

    /// Standard deviations either side of the centroid for standardized rects.
    #[arg(long, default_value_t = DEFAULT_RECT_SIGMA)]
    rect_sigma: f64,

    /// Fill convex hulls into the mask to close holes in detections.
    #[arg(long)]
    convex_hulls: bool,

    /// Also write the foreground pixels of each analysed frame.
    #[arg(long)]
    foreground: bool,

    /// Frames whose median becomes the static background (static method only).
    #[arg(long, default_value = "5")]
    background_frames: usize,

    /// Resize every frame on read, e.g. 320x240.
    #[arg(long, value_parser = parse_size)]
    resize: Option<(u32, u32)>,

    /// Drop detections smaller than this, e.g. 10x10.
    #[arg(long, value_parser = parse_size)]
    min_rect_size: Option<(u32, u32)>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let reference_frame = if cli.method == SubtractionMethod::Static {
        Some(build_reference(&cli.input, cli.resize, cli.background_frames)?)
    } else {
        None
    };

    let config = MotionDetectorConfig {
        method: cli.method,
        threshold: cli.threshold,
        soft_threshold: cli.soft_threshold,
        min_area: cli.min_area,
        buffer_size: cli.buffer_size,
        rect_type: cli.rect_type,
        rect_sigma: cli.rect_sigma,
        reference_frame,
    };
    let mut detector = MotionDetector::new(config)?;
    if let Some((w, h)) = cli.min_rect_size {
        detector = detector.with_rect_filter(size_filter(w as f64, h as f64));
    }

    let options = OutputOptions {
        style: AnnotationStyle::default(),
        convex_hulls: cli.convex_hulls,
        write_foreground: cli.foreground,
    };
    let mut use_case = DetectMotionUseCase::new(
        Box::new(open_reader(cli.resize)),
        Box::new(ImageFileWriter::new()),
        detector,
        Box::new(StdoutPipelineLogger::default()),
        options,
    );
    let summary = use_case.execute(&cli.input, &cli.output)?;
    log::info!(
        "{} of {} frames analysed, {} detections written to {}",
        summary.active_frames,
        summary.frames,
        summary.detections,
        cli.output.display()
    );
    Ok(())
}

fn open_reader(resize: Option<(u32, u32)>) -> ImageSequenceReader {
    match resize {
        Some((w, h)) => ImageSequenceReader::new().with_resize(w, h),
        None => ImageSequenceReader::new(),
    }
}

fn build_reference(
    input: &Path,
    resize: Option<(u32, u32)>,
    count: usize,
) -> Result<Frame, Box<dyn std::error::Error>> {
    let mut reader = open_reader(resize);
    reader.open(input)?;
    let reference = median_reference(reader.frames(), count);
    reader.close();
    reference
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.input.exists() {
        return Err(format!("Input not found: {}", cli.input.display()).into());
    }
    if cli.output.is_file() {
        return Err(format!(
            "Output must be a directory, got file {}",
            cli.output.display()
        )
        .into());
    }
    if cli.method == SubtractionMethod::Static && cli.background_frames == 0 {
        return Err("--background-frames must be at least 1 for the static method".into());
    }
    Ok(())
}

fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let w: u32 = w.trim().parse().map_err(|_| format!("bad width in '{s}'"))?;
    let h: u32 = h.trim().parse().map_err(|_| format!("bad height in '{s}'"))?;
    if w == 0 || h == 0 {
        return Err(format!("size must be non-zero, got '{s}'"));
    }
    Ok((w, h))
}
