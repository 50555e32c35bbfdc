use std::path::Path;
use std::time::Instant;

use crate::detection::infrastructure::annotator::AnnotationStyle;
use crate::detection::motion_detector::MotionDetector;
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::video::domain::frame_reader::FrameReader;
use crate::video::domain::image_writer::ImageWriter;

/// What gets written for each frame with an active detector.
#[derive(Clone, Debug, Default)]
pub struct OutputOptions {
    pub style: AnnotationStyle,
    /// Fill convex hulls into the mask before extracting rectangles.
    pub convex_hulls: bool,
    /// Also write the key frame's foreground pixels on black.
    pub write_foreground: bool,
}

/// Counts for one run over a frame sequence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MotionSummary {
    pub frames: usize,
    /// Frames processed after the buffer filled.
    pub active_frames: usize,
    /// Detection rectangles over all active frames.
    pub detections: usize,
}

/// Frame sequence motion pipeline: read → detect → annotate → write.
///
/// Annotated key frames are written as `annotated_NNNNNN.png` in the output
/// directory, numbered by the key frame's index in the sequence.
pub struct DetectMotionUseCase {
    reader: Box<dyn FrameReader>,
    writer: Box<dyn ImageWriter>,
    detector: MotionDetector,
    logger: Box<dyn PipelineLogger>,
    options: OutputOptions,
}

impl DetectMotionUseCase {
    pub fn new(
        reader: Box<dyn FrameReader>,
        writer: Box<dyn ImageWriter>,
        detector: MotionDetector,
        logger: Box<dyn PipelineLogger>,
        options: OutputOptions,
    ) -> Self {
        Self {
            reader,
            writer,
            detector,
            logger,
            options,
        }
    }

    pub fn detector(&self) -> &MotionDetector {
        &self.detector
    }

    pub fn execute(
        &mut self,
        input_path: &Path,
        output_dir: &Path,
    ) -> Result<MotionSummary, Box<dyn std::error::Error>> {
        let metadata = self.reader.open(input_path)?;
        let total = metadata.total_frames;
        self.logger.info(&format!(
            "Detecting motion in {total} frames ({}x{})",
            metadata.width, metadata.height
        ));

        let mut summary = MotionSummary::default();
        for frame in self.reader.frames() {
            let frame = frame?;
            summary.frames += 1;
            self.logger.progress(summary.frames, total);

            let t0 = Instant::now();
            let state = self.detector.detect(frame, self.options.convex_hulls)?;
            self.logger
                .timing("detect", t0.elapsed().as_secs_f64() * 1000.0);
            if !state.is_active() {
                continue;
            }
            summary.active_frames += 1;

            let t1 = Instant::now();
            let rects = self.detector.get_rects().len();
            summary.detections += rects;
            self.logger.metric("detections", rects as f64);
            let annotated = self.detector.annotate_frame(None, &self.options.style)?;
            self.logger
                .timing("annotate", t1.elapsed().as_secs_f64() * 1000.0);

            let t2 = Instant::now();
            let index = annotated.index();
            self.writer.write(
                &output_dir.join(format!("annotated_{index:06}.png")),
                &annotated,
                None,
            )?;
            if self.options.write_foreground {
                if let Some(foreground) = self.detector.foreground_pixels(None) {
                    self.writer.write(
                        &output_dir.join(format!("foreground_{index:06}.png")),
                        &foreground,
                        None,
                    )?;
                }
            }
            self.logger
                .timing("write", t2.elapsed().as_secs_f64() * 1000.0);
        }
        self.reader.close();

        self.logger.info(&format!(
            "{} frames, {} active, {} detections",
            summary.frames, summary.active_frames, summary.detections
        ));
        self.logger.summary();
        Ok(summary)
    }
}
