use std::fmt;
use std::sync::Arc;

use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::drawing::draw_polygon_mut;

use crate::background::domain::background_model::BackgroundModel;
use crate::background::domain::subtraction_method::SubtractionMethod;
use crate::background::domain::threshold::Threshold;
use crate::background::infrastructure::model_factory::create_model;
use crate::buffer::frame_ring_buffer::FrameRingBuffer;
use crate::shared::constants::{
    DEFAULT_BUFFER_SIZE, DEFAULT_MIN_AREA, DEFAULT_RECT_SIGMA, DEFAULT_THRESHOLD, RECT_THICKNESS,
    RGB_BLACK,
};
use crate::shared::error::MotionError;
use crate::shared::frame::Frame;
use crate::shared::geometry::Polygon;
use crate::shared::rect::Rect;

use super::domain::detection_state::DetectionState;
use super::domain::rect_filter::RectFilter;
use super::domain::rect_type::RectType;
use super::infrastructure::annotator::{draw_polygon_outline, draw_rect, AnnotationStyle};
use super::infrastructure::contour_tracer::{convex_hull, external_contours};
use super::infrastructure::morphology::smooth_mask;

/// Settings for a [`MotionDetector`].
#[derive(Clone, Debug)]
pub struct MotionDetectorConfig {
    pub method: SubtractionMethod,
    pub threshold: f32,
    pub soft_threshold: bool,
    /// Contours enclosing this area or less are never reported.
    pub min_area: f64,
    pub buffer_size: usize,
    pub rect_type: RectType,
    /// Half-width of standardized rectangles, in standard deviations.
    pub rect_sigma: f64,
    /// Background image for [`SubtractionMethod::Static`].
    pub reference_frame: Option<Frame>,
}

impl Default for MotionDetectorConfig {
    fn default() -> Self {
        Self {
            method: SubtractionMethod::ApproximateMedian,
            threshold: DEFAULT_THRESHOLD,
            soft_threshold: false,
            min_area: DEFAULT_MIN_AREA,
            buffer_size: DEFAULT_BUFFER_SIZE,
            rect_type: RectType::Bounding,
            rect_sigma: DEFAULT_RECT_SIGMA,
            reference_frame: None,
        }
    }
}

impl MotionDetectorConfig {
    pub fn threshold_policy(&self) -> Result<Threshold, MotionError> {
        if self.soft_threshold {
            Threshold::soft(self.threshold)
        } else {
            Threshold::hard(self.threshold)
        }
    }

    /// Rejects settings that would only fail once the buffer fills.
    pub fn validate(&self) -> Result<(), MotionError> {
        if self.buffer_size == 0 {
            return Err(MotionError::InvalidCapacity);
        }
        self.threshold_policy()?;
        if self.min_area.is_nan() || self.min_area < 0.0 {
            return Err(MotionError::InvalidMinArea(self.min_area));
        }
        if self.rect_sigma.is_nan() || self.rect_sigma <= 0.0 {
            return Err(MotionError::InvalidRectSigma(self.rect_sigma));
        }
        if self.method == SubtractionMethod::Static && self.reference_frame.is_none() {
            return Err(MotionError::MissingReferenceFrame);
        }
        Ok(())
    }
}

/// Everything computed by the latest active `detect` call.
struct DetectionResults {
    key_frame: Arc<Frame>,
    mask: GrayImage,
    contours: Vec<Polygon>,
    hulls: Vec<Polygon>,
}

/// Runs background subtraction over a frame stream and extracts moving regions.
///
/// The detector stays inert until its buffer has filled. The background model
/// is created on the first call with a full buffer and then kept across calls.
/// Each active `detect` replaces the stored mask, contours and hulls.
pub struct MotionDetector {
    config: MotionDetectorConfig,
    threshold: Threshold,
    buffer: FrameRingBuffer,
    model: Option<Box<dyn BackgroundModel>>,
    rect_filter: Option<RectFilter>,
    results: Option<DetectionResults>,
}

impl MotionDetector {
    pub fn new(config: MotionDetectorConfig) -> Result<Self, MotionError> {
        config.validate()?;
        let buffer = FrameRingBuffer::new(config.buffer_size)?;
        Self::build(config, buffer)
    }

    /// Uses a caller-provided buffer, which may already hold frames.
    ///
    /// The buffer's capacity takes precedence over `config.buffer_size`.
    pub fn with_buffer(
        mut config: MotionDetectorConfig,
        buffer: FrameRingBuffer,
    ) -> Result<Self, MotionError> {
        config.buffer_size = buffer.capacity();
        config.validate()?;
        Self::build(config, buffer)
    }

    fn build(config: MotionDetectorConfig, buffer: FrameRingBuffer) -> Result<Self, MotionError> {
        let threshold = config.threshold_policy()?;
        log::info!(
            "Motion detector: method={}, threshold={} ({:?}), buffer={}, min_area={}",
            config.method,
            threshold.value(),
            threshold.mode(),
            buffer.capacity(),
            config.min_area
        );
        Ok(Self {
            config,
            threshold,
            buffer,
            model: None,
            rect_filter: None,
            results: None,
        })
    }

    pub fn with_rect_filter(mut self, filter: RectFilter) -> Self {
        self.rect_filter = Some(filter);
        self
    }

    pub fn config(&self) -> &MotionDetectorConfig {
        &self.config
    }

    pub fn buffer(&self) -> &FrameRingBuffer {
        &self.buffer
    }

    pub fn is_active(&self) -> bool {
        self.buffer.is_full()
    }

    /// Pushes `frame` and, once the buffer is full, recomputes detections.
    ///
    /// While filling, nothing beyond the push happens and previous results
    /// (if any) are left untouched. When `compute_convex_hulls` is set the
    /// hulls are filled into the stored mask, closing interior holes.
    pub fn detect(
        &mut self,
        frame: impl Into<Arc<Frame>>,
        compute_convex_hulls: bool,
    ) -> Result<DetectionState, MotionError> {
        self.buffer.add(frame);
        if !self.buffer.is_full() {
            log::trace!(
                "Buffer filling: {}/{}",
                self.buffer.len(),
                self.buffer.capacity()
            );
            return Ok(DetectionState::Filling {
                buffered: self.buffer.len(),
                capacity: self.buffer.capacity(),
            });
        }

        let mut model = match self.model.take() {
            Some(model) => model,
            None => create_model(
                self.config.method,
                self.config.reference_frame.as_ref(),
                self.threshold,
                &self.buffer,
            )?,
        };
        let raw_mask = model.foreground_mask(&self.buffer);
        self.model = Some(model);
        let raw_mask = raw_mask?;

        let key_frame = if self.config.method.uses_middle_key_frame() {
            self.buffer.middle()
        } else {
            self.buffer.last()
        };
        let key_frame = Arc::clone(key_frame.ok_or(MotionError::BufferEmpty)?);

        let mut mask = smooth_mask(&raw_mask);
        let contours = external_contours(&mask);
        let hulls: Vec<Polygon> = contours.iter().map(convex_hull).collect();

        if compute_convex_hulls {
            for hull in &hulls {
                fill_hull(&mut mask, hull);
            }
        }

        let count = contours.len();
        log::debug!(
            "Frame {}: {} contours, key frame {}",
            self.buffer.last().map_or(0, |f| f.index()),
            count,
            key_frame.index()
        );
        self.results = Some(DetectionResults {
            key_frame,
            mask,
            contours,
            hulls,
        });
        Ok(DetectionState::Active { contours: count })
    }

    /// Drops buffered frames, the background model and all results.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.model = None;
        self.results = None;
        log::debug!("Motion detector reset");
    }

    /// Smoothed foreground mask from the latest active `detect`.
    pub fn foreground_mask(&self) -> Option<&GrayImage> {
        self.results.as_ref().map(|r| &r.mask)
    }

    /// The buffered frame detections should be drawn on: the middle frame
    /// for frame differencing, the newest frame otherwise.
    pub fn key_frame(&self) -> Option<&Frame> {
        self.results.as_ref().map(|r| r.key_frame.as_ref())
    }

    /// Every external contour, before area filtering.
    pub fn contours(&self) -> &[Polygon] {
        match &self.results {
            Some(results) => &results.contours,
            None => &[],
        }
    }

    /// Key-frame pixels where the mask is set, `bg_color` (black by default)
    /// everywhere else. Always RGB.
    pub fn foreground_pixels(&self, bg_color: Option<[u8; 3]>) -> Option<Frame> {
        let results = self.results.as_ref()?;
        let source = results.key_frame.to_rgb();
        let mask = &results.mask;
        let background = Rgb(bg_color.unwrap_or(RGB_BLACK));
        let composite = RgbImage::from_fn(source.width(), source.height(), |x, y| {
            let on = x < mask.width() && y < mask.height() && mask.get_pixel(x, y)[0] > 0;
            if on {
                *source.get_pixel(x, y)
            } else {
                background
            }
        });
        Some(Frame::from_rgb(composite, results.key_frame.index()))
    }

    /// [`foreground_pixels`](Self::foreground_pixels) cropped to each rectangle
    /// from [`get_rects`](Self::get_rects).
    pub fn foreground_tiles(&self, bg_color: Option<[u8; 3]>) -> Vec<Frame> {
        let Some(foreground) = self.foreground_pixels(bg_color) else {
            return Vec::new();
        };
        self.get_rects()
            .iter()
            .filter_map(|rect| foreground.crop(rect))
            .collect()
    }

    /// Detection rectangles in the configured [`RectType`].
    pub fn get_rects(&self) -> Vec<Rect> {
        match self.config.rect_type {
            RectType::Bounding => self.bounding_rects(),
            RectType::Standardized => self.standardized_rects(),
        }
    }

    pub fn bounding_rects(&self) -> Vec<Rect> {
        let rects = self
            .large_contours()
            .map(Polygon::bounding_rect)
            .collect();
        self.apply_filter(rects)
    }

    /// Boxes centered on each contour's centroid, spanning `rect_sigma`
    /// standard deviations either side along each axis.
    pub fn standardized_rects(&self) -> Vec<Rect> {
        let n_sigma = self.config.rect_sigma;
        let rects = self
            .large_contours()
            .filter_map(|contour| {
                let m = contour.moments();
                let (cx, cy) = m.centroid()?;
                let sx = (m.mu20() / m.m00).max(0.0).sqrt();
                let sy = (m.mu02() / m.m00).max(0.0).sqrt();
                Some(Rect::centered(cx, cy, 2.0 * n_sigma * sx, 2.0 * n_sigma * sy))
            })
            .collect();
        self.apply_filter(rects)
    }

    /// Contours as polygons. Degenerate ones (under 3 vertices) are always
    /// dropped; `return_all` skips the minimum-area filter.
    pub fn polygons(&self, return_all: bool) -> Vec<Polygon> {
        self.contours()
            .iter()
            .filter(|c| return_all || c.area() > self.config.min_area)
            .filter(|c| c.len() >= 3)
            .cloned()
            .collect()
    }

    /// Convex hulls of the current contours that have more than 3 vertices.
    pub fn convex_hulls(&self) -> Vec<Polygon> {
        self.results.as_ref().map_or_else(Vec::new, |r| {
            r.hulls.iter().filter(|h| h.len() > 3).cloned().collect()
        })
    }

    /// Draws contours, rectangles and hulls (in that order) on an RGB copy
    /// of `target`, or of the key frame when no target is given.
    pub fn annotate_frame(
        &self,
        target: Option<&Frame>,
        style: &AnnotationStyle,
    ) -> Result<Frame, MotionError> {
        let base = match (target, self.results.as_ref()) {
            (Some(frame), _) => frame,
            (None, Some(results)) => results.key_frame.as_ref(),
            (None, None) => return Err(MotionError::NotReady),
        };
        let mut canvas = base.to_rgb();

        if let Some(color) = style.contour {
            for polygon in self.polygons(false) {
                draw_polygon_outline(&mut canvas, &polygon, color);
            }
        }
        if let Some(color) = style.rect {
            for rect in self.get_rects() {
                draw_rect(&mut canvas, &rect, color, RECT_THICKNESS);
            }
        }
        if let Some(color) = style.convex_hull {
            for hull in self.convex_hulls() {
                draw_polygon_outline(&mut canvas, &hull, color);
            }
        }

        Ok(Frame::from_rgb(canvas, base.index()))
    }

    fn large_contours(&self) -> impl Iterator<Item = &Polygon> {
        let min_area = self.config.min_area;
        self.contours().iter().filter(move |c| c.area() > min_area)
    }

    fn apply_filter(&self, rects: Vec<Rect>) -> Vec<Rect> {
        match &self.rect_filter {
            Some(filter) => filter(rects),
            None => rects,
        }
    }
}

impl fmt::Debug for MotionDetector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MotionDetector")
            .field("config", &self.config)
            .field("buffer", &self.buffer)
            .field("model_ready", &self.model.is_some())
            .field("contours", &self.contours().len())
            .finish()
    }
}

fn fill_hull(mask: &mut GrayImage, hull: &Polygon) {
    let mut points = hull.points().to_vec();
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    if points.len() < 3 {
        return;
    }
    draw_polygon_mut(mask, &points, Luma([255]));
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    use crate::detection::domain::rect_filter::size_filter;
    use crate::shared::constants::RGB_RED;

    const SIZE: u32 = 64;
    const BACKGROUND: u8 = 50;
    const OBJECT: u8 = 200;

    fn blank(index: usize) -> Frame {
        Frame::from_gray(GrayImage::from_pixel(SIZE, SIZE, Luma([BACKGROUND])), index)
    }

    fn with_block(index: usize, x0: u32, y0: u32, side: u32) -> Frame {
        Frame::from_gray(
            GrayImage::from_fn(SIZE, SIZE, |x, y| {
                let inside = x >= x0 && x < x0 + side && y >= y0 && y < y0 + side;
                Luma([if inside { OBJECT } else { BACKGROUND }])
            }),
            index,
        )
    }

    /// 30x30 square at (10, 10) with a 14x14 hole in its middle.
    fn with_ring(index: usize) -> Frame {
        Frame::from_gray(
            GrayImage::from_fn(SIZE, SIZE, |x, y| {
                let outer = (10..40).contains(&x) && (10..40).contains(&y);
                let hole = (18..32).contains(&x) && (18..32).contains(&y);
                Luma([if outer && !hole { OBJECT } else { BACKGROUND }])
            }),
            index,
        )
    }

    fn fd_config(min_area: f64) -> MotionDetectorConfig {
        MotionDetectorConfig {
            method: SubtractionMethod::FrameDifference,
            threshold: 30.0,
            min_area,
            buffer_size: 3,
            ..MotionDetectorConfig::default()
        }
    }

    /// Frame differencing over blank / block / blank, leaving the detector active.
    fn detector_after_block(config: MotionDetectorConfig) -> MotionDetector {
        let mut detector = MotionDetector::new(config).unwrap();
        detector.detect(blank(0), false).unwrap();
        detector.detect(with_block(1, 20, 20, 20), false).unwrap();
        let state = detector.detect(blank(2), false).unwrap();
        assert_eq!(state, DetectionState::Active { contours: 1 });
        detector
    }

    // ── Configuration ──

    #[test]
    fn test_default_config() {
        let config = MotionDetectorConfig::default();
        assert_eq!(config.method, SubtractionMethod::ApproximateMedian);
        assert_relative_eq!(config.threshold, 80.0);
        assert_relative_eq!(config.min_area, 400.0);
        assert_eq!(config.buffer_size, 5);
        assert_eq!(config.rect_type, RectType::Bounding);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_buffer_rejected() {
        let config = MotionDetectorConfig {
            buffer_size: 0,
            ..MotionDetectorConfig::default()
        };
        assert_eq!(
            MotionDetector::new(config).unwrap_err(),
            MotionError::InvalidCapacity
        );
    }

    #[test]
    fn test_static_without_reference_rejected_up_front() {
        let config = MotionDetectorConfig {
            method: SubtractionMethod::Static,
            ..MotionDetectorConfig::default()
        };
        assert_eq!(
            MotionDetector::new(config).unwrap_err(),
            MotionError::MissingReferenceFrame
        );
    }

    #[test]
    fn test_invalid_threshold_rejected_up_front() {
        let config = MotionDetectorConfig {
            threshold: 0.0,
            soft_threshold: true,
            ..MotionDetectorConfig::default()
        };
        assert!(matches!(
            MotionDetector::new(config),
            Err(MotionError::InvalidThreshold { .. })
        ));
    }

    #[rstest]
    #[case(f64::NAN)]
    #[case(-1.0)]
    fn test_invalid_min_area_rejected(#[case] min_area: f64) {
        let err = MotionDetector::new(fd_config(min_area)).unwrap_err();
        assert!(matches!(err, MotionError::InvalidMinArea(_)));
    }

    #[rstest]
    #[case(0.0)]
    #[case(-2.0)]
    #[case(f64::NAN)]
    fn test_invalid_rect_sigma_rejected(#[case] rect_sigma: f64) {
        let config = MotionDetectorConfig {
            rect_sigma,
            ..fd_config(10.0)
        };
        let err = MotionDetector::new(config).unwrap_err();
        assert!(matches!(err, MotionError::InvalidRectSigma(_)));
    }

    #[test]
    fn test_with_buffer_validates_config() {
        let buffer = FrameRingBuffer::new(2).unwrap();
        let err = MotionDetector::with_buffer(fd_config(-5.0), buffer).unwrap_err();
        assert_eq!(err, MotionError::InvalidMinArea(-5.0));
    }

    #[test]
    fn test_with_buffer_uses_buffer_capacity() {
        let buffer = FrameRingBuffer::new(2).unwrap();
        let detector = MotionDetector::with_buffer(fd_config(10.0), buffer).unwrap();
        assert_eq!(detector.config().buffer_size, 2);
        assert_eq!(detector.buffer().capacity(), 2);
    }

    // ── Filling ──

    #[test]
    fn test_filling_has_no_results() {
        let mut detector = MotionDetector::new(fd_config(10.0)).unwrap();
        let state = detector.detect(blank(0), false).unwrap();
        assert_eq!(
            state,
            DetectionState::Filling {
                buffered: 1,
                capacity: 3
            }
        );
        assert_eq!(state.raw(), -1);
        assert!(!detector.is_active());
        assert!(detector.foreground_mask().is_none());
        assert!(detector.key_frame().is_none());
        assert!(detector.foreground_pixels(None).is_none());
        assert!(detector.foreground_tiles(None).is_empty());
        assert!(detector.get_rects().is_empty());
        assert!(detector.polygons(true).is_empty());
        assert_eq!(
            detector
                .annotate_frame(None, &AnnotationStyle::default())
                .unwrap_err(),
            MotionError::NotReady
        );
    }

    #[test]
    fn test_prefilled_buffer_is_active_immediately() {
        let mut buffer = FrameRingBuffer::new(3).unwrap();
        buffer.add(blank(0));
        buffer.add(with_block(1, 20, 20, 20));
        let mut detector = MotionDetector::with_buffer(fd_config(10.0), buffer).unwrap();
        assert!(detector.detect(blank(2), false).unwrap().is_active());
    }

    // ── Detection ──

    #[test]
    fn test_block_brightening_in_place_gives_one_tight_rect() {
        // 20x20 block at a fixed spot, 100 brighter on every frame
        let mut detector = MotionDetector::new(fd_config(10.0)).unwrap();
        let mut states = Vec::new();
        for (i, level) in [10u8, 110, 210].into_iter().enumerate() {
            let frame = Frame::from_gray(
                GrayImage::from_fn(SIZE, SIZE, |x, y| {
                    let inside = (20..40).contains(&x) && (20..40).contains(&y);
                    Luma([if inside { level } else { BACKGROUND }])
                }),
                i,
            );
            states.push(detector.detect(frame, false).unwrap().raw());
        }
        assert_eq!(&states[..2], &[-1, -1]);
        assert!(states[2] >= 1);

        let rects = detector.bounding_rects();
        assert_eq!(rects.len(), 1);
        let rect = rects[0];
        assert!(rect.x <= 20.0 && rect.y <= 20.0);
        assert!(rect.x + rect.width >= 40.0 && rect.y + rect.height >= 40.0);
        assert!(rect.x >= 16.0 && rect.y >= 16.0);
        assert!(rect.width <= 28.0 && rect.height <= 28.0);
    }

    #[test]
    fn test_soft_threshold_mask_keeps_grey_levels() {
        // left half steps up by 30: soft value 255 * (1 - e^-0.75) truncates to 134
        let left_half = |index: usize| {
            Frame::from_gray(
                GrayImage::from_fn(SIZE, SIZE, |x, _| {
                    Luma([if x < SIZE / 2 { BACKGROUND + 30 } else { BACKGROUND }])
                }),
                index,
            )
        };
        let run = |soft_threshold: bool| {
            let config = MotionDetectorConfig {
                threshold: 40.0,
                soft_threshold,
                ..fd_config(10.0)
            };
            let mut detector = MotionDetector::new(config).unwrap();
            detector.detect(blank(0), false).unwrap();
            detector.detect(left_half(1), false).unwrap();
            let state = detector.detect(blank(2), false).unwrap();
            (state, detector.foreground_mask().unwrap().clone())
        };

        let (state, soft) = run(true);
        assert_eq!(state, DetectionState::Active { contours: 1 });
        assert_eq!(soft.get_pixel(10, 32)[0], 134);
        assert_eq!(soft.get_pixel(50, 32)[0], 0);
        let levels: std::collections::BTreeSet<u8> = soft.pixels().map(|p| p[0]).collect();
        assert!(levels.len() > 2, "soft mask levels {levels:?}");
        assert!(!levels.contains(&255));

        // 30 is under the hard threshold of 40
        let (state, hard) = run(false);
        assert_eq!(state, DetectionState::Active { contours: 0 });
        assert!(hard.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn test_frame_difference_uses_middle_key_frame() {
        let detector = detector_after_block(fd_config(10.0));
        assert!(detector.is_active());
        assert_eq!(detector.key_frame().unwrap().index(), 1);
    }

    #[test]
    fn test_bounding_rect_encloses_moving_block() {
        let detector = detector_after_block(fd_config(10.0));
        let rects = detector.get_rects();
        assert_eq!(rects.len(), 1);
        // smoothing grows the 20px block by 2px on each side
        assert_eq!(rects[0], Rect::new(18.0, 18.0, 24.0, 24.0));
        assert!(rects[0].contains(&Rect::new(20.0, 20.0, 20.0, 20.0)));
    }

    #[test]
    fn test_min_area_filters_rects_but_not_count() {
        // contour through boundary centers is 23x23
        let detector = detector_after_block(fd_config(529.0));
        assert_eq!(detector.contours().len(), 1);
        assert!(detector.get_rects().is_empty());
        assert!(detector.polygons(false).is_empty());
        assert_eq!(detector.polygons(true).len(), 1);

        let detector = detector_after_block(fd_config(528.0));
        assert_eq!(detector.get_rects().len(), 1);
        assert_eq!(detector.polygons(false).len(), 1);
    }

    #[test]
    fn test_standardized_rect_from_moments() {
        let config = MotionDetectorConfig {
            rect_type: RectType::Standardized,
            rect_sigma: 2.0,
            ..fd_config(10.0)
        };
        let detector = detector_after_block(config);
        let rects = detector.get_rects();
        assert_eq!(rects.len(), 1);
        let (cx, cy) = rects[0].center();
        assert_relative_eq!(cx, 29.5, epsilon = 1e-9);
        assert_relative_eq!(cy, 29.5, epsilon = 1e-9);
        // a uniform square of side s has std s / sqrt(12)
        let expected = 2.0 * 2.0 * 23.0 / 12f64.sqrt();
        assert_relative_eq!(rects[0].width, expected, epsilon = 1e-9);
        assert_relative_eq!(rects[0].height, expected, epsilon = 1e-9);
    }

    #[test]
    fn test_rect_filter_applies_to_whole_list() {
        let detector = detector_after_block(fd_config(10.0)).with_rect_filter(size_filter(30.0, 30.0));
        assert!(detector.get_rects().is_empty());
        assert!(detector.bounding_rects().is_empty());
        // polygons are not rectangle detections
        assert_eq!(detector.polygons(false).len(), 1);
    }

    #[test]
    fn test_convex_hulls_exported() {
        let detector = detector_after_block(fd_config(10.0));
        let hulls = detector.convex_hulls();
        assert_eq!(hulls.len(), 1);
        assert_eq!(hulls[0].bounding_rect(), Rect::new(18.0, 18.0, 24.0, 24.0));
    }

    #[test]
    fn test_hull_filling_closes_holes() {
        let run = |fill: bool| {
            let mut detector = MotionDetector::new(fd_config(10.0)).unwrap();
            detector.detect(blank(0), fill).unwrap();
            detector.detect(with_ring(1), fill).unwrap();
            detector.detect(blank(2), fill).unwrap();
            detector.foreground_mask().unwrap().get_pixel(25, 25)[0]
        };
        assert_eq!(run(false), 0);
        assert_eq!(run(true), 255);
    }

    #[test]
    fn test_static_model_detects_against_reference() {
        let config = MotionDetectorConfig {
            method: SubtractionMethod::Static,
            threshold: 30.0,
            min_area: 10.0,
            buffer_size: 1,
            reference_frame: Some(blank(0)),
            ..MotionDetectorConfig::default()
        };
        let mut detector = MotionDetector::new(config).unwrap();
        let state = detector.detect(with_block(7, 10, 10, 16), false).unwrap();
        assert_eq!(state.raw(), 1);
        assert_eq!(detector.key_frame().unwrap().index(), 7);
    }

    #[test]
    fn test_still_scene_has_no_contours() {
        let config = MotionDetectorConfig {
            buffer_size: 3,
            ..MotionDetectorConfig::default()
        };
        let mut detector = MotionDetector::new(config).unwrap();
        let mut last = None;
        for i in 0..6 {
            last = Some(detector.detect(blank(i), false).unwrap());
        }
        assert_eq!(last, Some(DetectionState::Active { contours: 0 }));
        assert!(detector.get_rects().is_empty());
    }

    // ── Rendering ──

    #[test]
    fn test_foreground_pixels_composite() {
        let detector = detector_after_block(fd_config(10.0));
        let blue = [0, 0, 255];
        let composite = detector.foreground_pixels(Some(blue)).unwrap().to_rgb();
        assert_eq!(composite.get_pixel(30, 30), &Rgb([OBJECT; 3]));
        assert_eq!(composite.get_pixel(2, 2), &Rgb(blue));

        let black = detector.foreground_pixels(None).unwrap().to_rgb();
        assert_eq!(black.get_pixel(2, 2), &Rgb(RGB_BLACK));
    }

    #[test]
    fn test_foreground_tiles_follow_rects() {
        let detector = detector_after_block(fd_config(10.0));
        let tiles = detector.foreground_tiles(None);
        assert_eq!(tiles.len(), 1);
        assert_eq!(tiles[0].size(), (24, 24));
        assert_eq!(tiles[0].channels(), 3);
    }

    #[test]
    fn test_annotate_key_frame() {
        let detector = detector_after_block(fd_config(10.0));
        let style = AnnotationStyle {
            rect: Some(RGB_RED),
            ..AnnotationStyle::none()
        };
        let annotated = detector.annotate_frame(None, &style).unwrap();
        assert_eq!(annotated.index(), 1);
        let rgb = annotated.to_rgb();
        assert_eq!(rgb.get_pixel(18, 18), &Rgb(RGB_RED));
        assert_eq!(rgb.get_pixel(19, 19), &Rgb(RGB_RED));
        assert_eq!(rgb.get_pixel(30, 30), &Rgb([OBJECT; 3]));
        // the buffered frame itself is untouched
        assert_eq!(detector.key_frame().unwrap().to_rgb().get_pixel(18, 18), &Rgb([BACKGROUND; 3]));
    }

    #[test]
    fn test_annotate_external_target() {
        let detector = detector_after_block(fd_config(10.0));
        let target = Frame::filled(SIZE, SIZE, [0, 0, 0], 99);
        let annotated = detector
            .annotate_frame(Some(&target), &AnnotationStyle::default())
            .unwrap();
        assert_eq!(annotated.index(), 99);
        assert_ne!(annotated, target);
        let untouched = detector
            .annotate_frame(Some(&target), &AnnotationStyle::none())
            .unwrap();
        assert_eq!(untouched, target);
    }

    // ── Reset ──

    #[test]
    fn test_reset_returns_to_filling() {
        let mut detector = detector_after_block(fd_config(10.0));
        detector.reset();
        assert!(detector.buffer().is_empty());
        assert!(detector.foreground_mask().is_none());
        assert!(detector.contours().is_empty());
        let state = detector.detect(blank(3), false).unwrap();
        assert_eq!(
            state,
            DetectionState::Filling {
                buffered: 1,
                capacity: 3
            }
        );
    }
}
