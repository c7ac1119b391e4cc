//! Sampling performance monitor
//!
//! Observes frame rate and per-update cost over sliding windows and proposes
//! cadence adjustments. Advisory only: the monitor never touches the
//! scheduler; the application applies (or ignores) the proposed interval.

use std::collections::VecDeque;

use serde::Serialize;
use tracing::info;

/// Interval adjustment bounds and factors.
const INTERVAL_MIN_MS: f64 = 50.0;
const INTERVAL_MAX_MS: f64 = 500.0;
const SLOW_DOWN_FACTOR: f64 = 1.2;
const SPEED_UP_FACTOR: f64 = 0.8;

/// Heap usage snapshot in megabytes, when the host exposes one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MemorySnapshot {
    pub used_mb: f64,
    pub total_mb: f64,
    pub limit_mb: f64,
}

/// One periodic sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub fps: f64,
    pub memory: Option<MemorySnapshot>,
    pub timestamp_ms: f64,
}

/// Average/min/max/current over one metric series.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct StatSummary {
    pub average: f64,
    pub min: f64,
    pub max: f64,
    pub current: f64,
}

impl StatSummary {
    fn over(values: impl Iterator<Item = f64>) -> Self {
        let mut count = 0usize;
        let (mut sum, mut min, mut max) = (0.0, f64::MAX, f64::MIN);
        let mut current = 0.0;
        for v in values {
            count += 1;
            sum += v;
            min = min.min(v);
            max = max.max(v);
            current = v;
        }
        if count == 0 {
            return Self::default();
        }
        Self {
            average: sum / count as f64,
            min,
            max,
            current,
        }
    }
}

/// Structured snapshot of everything the monitor knows. Plain data, safe to
/// serialize or log.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PerformanceReport {
    pub fps: StatSummary,
    pub update_cost: StatSummary,
    pub memory: Option<MemorySnapshot>,
    pub elapsed_seconds: f64,
    pub sample_count: usize,
}

pub struct PerformanceMonitor {
    sample_interval_ms: f64,
    max_samples: usize,
    samples: VecDeque<Sample>,
    update_costs: VecDeque<f64>,
    sampling: bool,
    frame_count: u32,
    last_sample_ms: f64,
    start_ms: f64,
}

impl PerformanceMonitor {
    pub fn new(sample_interval_ms: f64, max_samples: usize) -> Self {
        Self {
            sample_interval_ms,
            max_samples,
            samples: VecDeque::with_capacity(max_samples),
            update_costs: VecDeque::with_capacity(max_samples),
            sampling: false,
            frame_count: 0,
            last_sample_ms: 0.0,
            start_ms: 0.0,
        }
    }

    pub fn is_sampling(&self) -> bool {
        self.sampling
    }

    /// Begin sampling. Previous windows are discarded.
    pub fn start_sampling(&mut self, now_ms: f64) {
        if self.sampling {
            return;
        }
        self.sampling = true;
        self.start_ms = now_ms;
        self.last_sample_ms = now_ms;
        self.frame_count = 0;
        self.samples.clear();
        self.update_costs.clear();
        info!("performance sampling started");
    }

    pub fn stop_sampling(&mut self) {
        if self.sampling {
            self.sampling = false;
            info!("performance sampling stopped");
        }
    }

    /// Count one repaint. Called once per frame by the owner.
    pub fn frame_tick(&mut self) {
        if self.sampling {
            self.frame_count += 1;
        }
    }

    /// Record the measured cost of one update cycle.
    pub fn record_update_cost(&mut self, cost_ms: f64) {
        if !self.sampling {
            return;
        }
        if self.update_costs.len() >= self.max_samples {
            self.update_costs.pop_front();
        }
        self.update_costs.push_back(cost_ms);
    }

    /// Take a sample if the wall-clock period has elapsed. Computes fps from
    /// the frames accumulated since the previous sample, then resets the
    /// frame counter. Returns whether a sample was taken.
    pub fn maybe_sample(&mut self, now_ms: f64, memory: Option<MemorySnapshot>) -> bool {
        if !self.sampling {
            return false;
        }
        let elapsed = now_ms - self.last_sample_ms;
        if elapsed < self.sample_interval_ms {
            return false;
        }

        let fps = if elapsed > 0.0 {
            self.frame_count as f64 / (elapsed / 1000.0)
        } else {
            0.0
        };
        if self.samples.len() >= self.max_samples {
            self.samples.pop_front();
        }
        self.samples.push_back(Sample {
            fps,
            memory,
            timestamp_ms: now_ms,
        });

        self.frame_count = 0;
        self.last_sample_ms = now_ms;
        true
    }

    /// Samples in window order, oldest first.
    pub fn samples(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    /// Most recent observed fps, or zero before the first sample.
    pub fn current_fps(&self) -> f64 {
        self.samples.back().map_or(0.0, |s| s.fps)
    }

    pub fn report(&self, now_ms: f64) -> PerformanceReport {
        let fps = StatSummary::over(self.samples.iter().map(|s| s.fps));
        let update_cost = StatSummary::over(self.update_costs.iter().copied());
        PerformanceReport {
            fps,
            update_cost,
            memory: self.samples.back().and_then(|s| s.memory),
            elapsed_seconds: (now_ms - self.start_ms) / 1000.0,
            sample_count: self.samples.len(),
        }
    }

    /// Propose a new target interval for the given observed-vs-target frame
    /// rate. Slows down by ×1.2 (capped at 500ms) when fps drops below 80%
    /// of target, speeds up by ×0.8 (floored at 50ms) above 120% of target.
    /// Returns the input unchanged otherwise.
    pub fn propose_interval_adjustment(&self, current_interval_ms: f64, target_fps: f64) -> f64 {
        let fps = self.current_fps();
        if fps < target_fps * 0.8 {
            (current_interval_ms * SLOW_DOWN_FACTOR).min(INTERVAL_MAX_MS)
        } else if fps > target_fps * 1.2 && current_interval_ms > INTERVAL_MIN_MS {
            (current_interval_ms * SPEED_UP_FACTOR).max(INTERVAL_MIN_MS)
        } else {
            current_interval_ms
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Drive `frames` frame ticks then sample at `now`.
    fn sample_with_frames(m: &mut PerformanceMonitor, frames: u32, now: f64) -> bool {
        for _ in 0..frames {
            m.frame_tick();
        }
        m.maybe_sample(now, None)
    }

    #[test]
    fn fps_computed_from_frames_since_last_sample() {
        let mut m = PerformanceMonitor::new(1000.0, 10);
        m.start_sampling(0.0);

        assert!(sample_with_frames(&mut m, 60, 1000.0));
        assert_eq!(m.current_fps(), 60.0);

        // Counter was reset; 30 frames over the next second.
        assert!(sample_with_frames(&mut m, 30, 2000.0));
        assert_eq!(m.current_fps(), 30.0);
    }

    #[test]
    fn sampling_respects_wall_clock_period() {
        let mut m = PerformanceMonitor::new(1000.0, 10);
        m.start_sampling(0.0);
        assert!(!sample_with_frames(&mut m, 10, 500.0));
        assert!(sample_with_frames(&mut m, 10, 1000.0));
        // 20 frames over the full second
        assert_eq!(m.current_fps(), 20.0);
    }

    #[test]
    fn not_sampling_records_nothing() {
        let mut m = PerformanceMonitor::new(1000.0, 10);
        m.frame_tick();
        m.record_update_cost(5.0);
        assert!(!m.maybe_sample(5000.0, None));
        assert_eq!(m.report(5000.0).sample_count, 0);
    }

    #[test]
    fn window_evicts_oldest_by_content() {
        let mut m = PerformanceMonitor::new(1000.0, 3);
        m.start_sampling(0.0);
        for i in 1..=5u32 {
            // i*10 frames in the i-th second → fps 10, 20, 30, 40, 50
            assert!(sample_with_frames(&mut m, i * 10, i as f64 * 1000.0));
        }

        let fps: Vec<f64> = m.samples().map(|s| s.fps).collect();
        assert_eq!(fps, [30.0, 40.0, 50.0]);
        assert_eq!(m.report(5000.0).sample_count, 3);
    }

    #[test]
    fn update_cost_window_is_bounded_too() {
        let mut m = PerformanceMonitor::new(1000.0, 3);
        m.start_sampling(0.0);
        for i in 0..6 {
            m.record_update_cost(i as f64);
        }
        let report = m.report(0.0);
        assert_eq!(report.update_cost.min, 3.0);
        assert_eq!(report.update_cost.max, 5.0);
        assert_eq!(report.update_cost.current, 5.0);
        assert_eq!(report.update_cost.average, 4.0);
    }

    #[test]
    fn report_summarizes_fps_and_memory() {
        let mut m = PerformanceMonitor::new(1000.0, 10);
        m.start_sampling(0.0);
        sample_with_frames(&mut m, 60, 1000.0);
        sample_with_frames(&mut m, 20, 2000.0);
        let mem = MemorySnapshot {
            used_mb: 12.0,
            total_mb: 32.0,
            limit_mb: 2048.0,
        };
        for _ in 0..40 {
            m.frame_tick();
        }
        m.maybe_sample(3000.0, Some(mem));

        let report = m.report(3000.0);
        assert_eq!(report.fps.average, 40.0);
        assert_eq!(report.fps.min, 20.0);
        assert_eq!(report.fps.max, 60.0);
        assert_eq!(report.fps.current, 40.0);
        assert_eq!(report.memory, Some(mem));
        assert_eq!(report.elapsed_seconds, 3.0);
        assert_eq!(report.sample_count, 3);
    }

    #[test]
    fn report_is_serializable() {
        let mut m = PerformanceMonitor::new(1000.0, 10);
        m.start_sampling(0.0);
        sample_with_frames(&mut m, 30, 1000.0);
        let json = serde_json::to_value(m.report(1000.0)).unwrap();
        assert_eq!(json["fps"]["current"], 30.0);
        assert_eq!(json["sample_count"], 1);
        assert!(json["memory"].is_null());
    }

    fn monitor_at_fps(fps: u32) -> PerformanceMonitor {
        let mut m = PerformanceMonitor::new(1000.0, 10);
        m.start_sampling(0.0);
        sample_with_frames(&mut m, fps, 1000.0);
        m
    }

    #[test]
    fn low_fps_slows_cadence() {
        let m = monitor_at_fps(20); // below 0.8 × 30
        assert_eq!(m.propose_interval_adjustment(100.0, 30.0), 120.0);
        // Capped at 500ms
        assert_eq!(m.propose_interval_adjustment(450.0, 30.0), 500.0);
    }

    #[test]
    fn high_fps_speeds_cadence() {
        let m = monitor_at_fps(60); // above 1.2 × 30
        assert_eq!(m.propose_interval_adjustment(100.0, 30.0), 80.0);
        // Floored at 50ms
        assert_eq!(m.propose_interval_adjustment(60.0, 30.0), 50.0);
        // Already at the floor: no change
        assert_eq!(m.propose_interval_adjustment(50.0, 30.0), 50.0);
    }

    #[test]
    fn fps_within_band_leaves_cadence_alone() {
        let m = monitor_at_fps(30);
        assert_eq!(m.propose_interval_adjustment(100.0, 30.0), 100.0);
    }

    #[test]
    fn restart_clears_windows() {
        let mut m = PerformanceMonitor::new(1000.0, 10);
        m.start_sampling(0.0);
        sample_with_frames(&mut m, 60, 1000.0);
        m.record_update_cost(3.0);
        m.stop_sampling();

        m.start_sampling(2000.0);
        let report = m.report(2000.0);
        assert_eq!(report.sample_count, 0);
        assert_eq!(report.update_cost, StatSummary::default());
        assert_eq!(report.elapsed_seconds, 0.0);
    }
}
