//! Adaptive update scheduler
//!
//! Drives a registered callback at a target cadence on top of a host-provided
//! repaint opportunity: the owner calls [`AdaptiveScheduler::tick`] once per
//! repaint and the scheduler decides whether the callback fires. Cadence
//! self-corrects against repaint jitter because every opportunity is
//! evaluated, fired or not.

use thiserror::Error;
use tracing::debug;

/// Failure raised by a per-tick callback.
///
/// The scheduler never catches these; they propagate from [`tick`] to the
/// owning application, which applies its own consecutive-failure policy.
///
/// [`tick`]: AdaptiveScheduler::tick
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("update callback failed: {0}")]
pub struct TickError(pub String);

/// Per-tick update callback. Receives the current time in milliseconds.
pub type TickCallback = Box<dyn FnMut(f64) -> Result<(), TickError>>;

/// Scheduler lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Running,
    Paused,
}

/// Outcome of one tick evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// The callback was invoked.
    Fired,
    /// The target interval had not yet elapsed.
    Skipped,
    /// Not running (Idle or Paused).
    Inactive,
}

pub struct AdaptiveScheduler {
    phase: Phase,
    target_interval_ms: f64,
    last_fire_ms: f64,
    callback: Option<TickCallback>,
    pause_on_hidden: bool,
}

impl AdaptiveScheduler {
    pub fn new(target_interval_ms: f64, pause_on_hidden: bool) -> Self {
        Self {
            phase: Phase::Idle,
            target_interval_ms,
            last_fire_ms: 0.0,
            callback: None,
            pause_on_hidden,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn target_interval_ms(&self) -> f64 {
        self.target_interval_ms
    }

    /// Apply an externally decided cadence (e.g. a monitor proposal).
    pub fn set_target_interval(&mut self, interval_ms: f64) {
        if interval_ms.is_finite() && interval_ms >= 0.0 {
            self.target_interval_ms = interval_ms;
        }
    }

    /// Register the callback and begin running. A scheduler already running
    /// is implicitly stopped first; this is not an error.
    pub fn start(&mut self, callback: TickCallback, now_ms: f64) {
        if self.phase != Phase::Idle {
            self.stop();
        }
        self.phase = Phase::Running;
        self.last_fire_ms = now_ms;
        self.callback = Some(callback);
        debug!(interval_ms = self.target_interval_ms, "scheduler started");
    }

    /// Running → Paused. The callback is not invoked again until resumed.
    pub fn pause(&mut self) {
        if self.phase == Phase::Running {
            self.phase = Phase::Paused;
            debug!("scheduler paused");
        }
    }

    /// Paused → Running. The last-fire reference resets to now so the next
    /// interval check cannot fire spuriously early.
    pub fn resume(&mut self, now_ms: f64) {
        if self.phase == Phase::Paused {
            self.phase = Phase::Running;
            self.last_fire_ms = now_ms;
            debug!("scheduler resumed");
        }
    }

    /// Any state → Idle; clears the callback. No invocation is observable
    /// after this returns.
    pub fn stop(&mut self) {
        self.phase = Phase::Idle;
        self.callback = None;
    }

    /// Release everything the scheduler holds. Idempotent.
    pub fn cleanup(&mut self) {
        self.stop();
        self.pause_on_hidden = false;
    }

    /// Visibility coupling: hidden pauses a running scheduler, visible
    /// resumes a paused one. No-op unless enabled at construction.
    pub fn set_visible(&mut self, visible: bool, now_ms: f64) {
        if !self.pause_on_hidden {
            return;
        }
        if visible {
            self.resume(now_ms);
        } else {
            self.pause();
        }
    }

    /// Evaluate one repaint opportunity.
    ///
    /// Fires the callback when the elapsed time since the last fire reaches
    /// the target interval. The last-fire instant is recorded before the
    /// callback runs, so a failing callback does not re-fire immediately;
    /// its error propagates uncaught to the owner.
    pub fn tick(&mut self, now_ms: f64) -> Result<Tick, TickError> {
        if self.phase != Phase::Running {
            return Ok(Tick::Inactive);
        }
        if now_ms - self.last_fire_ms < self.target_interval_ms {
            return Ok(Tick::Skipped);
        }

        self.last_fire_ms = now_ms;
        if let Some(callback) = self.callback.as_mut() {
            callback(now_ms)?;
        }
        Ok(Tick::Fired)
    }
}
