use std::collections::BTreeMap;
use std::time::Instant;

/// Observer for pipeline events.
///
/// Lets the use case report progress and per-stage cost without knowing
/// whether anyone is listening or where the output goes.
pub trait PipelineLogger: Send {
    fn progress(&mut self, current: usize, total: usize);

    /// Records how long one stage took for one frame.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Records one sample of a per-frame quantity (e.g. detections).
    fn metric(&mut self, name: &str, value: f64);

    fn info(&mut self, message: &str);

    /// End-of-run report. Default: no-op.
    fn summary(&self) {}
}

/// Discards everything. Used by tests and library callers.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn progress(&mut self, _current: usize, _total: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// Running aggregate of one timing stage or metric.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StageStats {
    pub count: usize,
    pub total: f64,
    pub min: f64,
    pub max: f64,
}

impl StageStats {
    fn record(&mut self, value: f64) {
        if self.count == 0 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
        self.count += 1;
        self.total += value;
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total / self.count as f64
        }
    }
}

impl Default for StageStats {
    fn default() -> Self {
        Self {
            count: 0,
            total: 0.0,
            min: 0.0,
            max: 0.0,
        }
    }
}

/// CLI logger: throttled progress through `log`, plus a timing/metric
/// summary at the end of the run.
pub struct StdoutPipelineLogger {
    throttle_frames: usize,
    timings: BTreeMap<String, StageStats>,
    metrics: BTreeMap<String, StageStats>,
    start_time: Instant,
    frames_seen: usize,
}

impl StdoutPipelineLogger {
    pub fn new(throttle_frames: usize) -> Self {
        Self {
            throttle_frames: throttle_frames.max(1),
            timings: BTreeMap::new(),
            metrics: BTreeMap::new(),
            start_time: Instant::now(),
            frames_seen: 0,
        }
    }

    pub fn timing_stats(&self, stage: &str) -> Option<&StageStats> {
        self.timings.get(stage)
    }

    pub fn metric_stats(&self, name: &str) -> Option<&StageStats> {
        self.metrics.get(name)
    }

    /// Formatted report, or `None` if nothing was recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() && self.metrics.is_empty() {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let frames = self.frames_seen;
        let mut lines = vec![format!(
            "Motion summary ({frames} frames, {:.1}s):",
            elapsed_ms / 1000.0
        )];

        for (stage, stats) in &self.timings {
            lines.push(format!(
                "  {stage:10}: avg {:6.2}ms  min {:6.2}ms  max {:6.2}ms  total {:7.0}ms",
                stats.mean(),
                stats.min,
                stats.max,
                stats.total
            ));
        }
        for (name, stats) in &self.metrics {
            lines.push(format!(
                "  {name}: avg {:.1}, max {:.0}, total {:.0}",
                stats.mean(),
                stats.max,
                stats.total
            ));
        }
        if frames > 0 && elapsed_ms > 0.0 {
            lines.push(format!(
                "  Throughput: {:.1} fps",
                frames as f64 / (elapsed_ms / 1000.0)
            ));
        }
        Some(lines.join("\n"))
    }
}

impl Default for StdoutPipelineLogger {
    fn default() -> Self {
        Self::new(25)
    }
}

impl PipelineLogger for StdoutPipelineLogger {
    fn progress(&mut self, current: usize, total: usize) {
        self.frames_seen = current;
        if current % self.throttle_frames == 0 || current == total {
            if total > 0 {
                let pct = current as f64 / total as f64 * 100.0;
                log::info!("Frame {current}/{total} ({pct:.1}%)");
            } else {
                log::info!("Frame {current}");
            }
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .record(duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        self.metrics.entry(name.to_string()).or_default().record(value);
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n{text}");
        }
    }
}
