//! Distance timer app - runs on both native and WASM
//!
//! The composition root: owns and wires the difference engine, the adaptive
//! scheduler, the performance monitor and the error log. The egui frame loop
//! is the host repaint primitive - every frame re-arms the next repaint and
//! hands the scheduler one tick opportunity.

mod display;
mod overlay;

use std::cell::RefCell;
use std::rc::Rc;

use eframe::egui;
use tracing::info;

use crate::caps::{self, Capabilities};
use crate::config::TimerConfig;
use crate::core::{
    format_time_display, AdaptiveScheduler, AppError, DifferenceEngine, DifferenceRecord,
    ErrorKind, ErrorLog, PerformanceMonitor, Tick, TickCallback, TickError, DEFAULT_START,
};
use crate::theme::{colors, minimal_visuals};
use crate::time::{now_ms, now_wall_instant};

/// Consecutive tick failures tolerated before the scheduler is stopped.
const MAX_CONSECUTIVE_FAILURES: u32 = 5;
/// How often a monitor cadence proposal is applied.
const ADJUST_PERIOD_MS: f64 = 5000.0;

/// Display state crossed by the scheduler callback. Single logical thread;
/// `Rc<RefCell>` only bridges the callback and the frame loop.
pub struct SharedState {
    pub record: DifferenceRecord,
    pub display_text: String,
    /// Per-field instant of the last value change, for the highlight flash.
    pub changed_at_ms: [f64; 7],
    pub errors: ErrorLog,
    pub monitor: PerformanceMonitor,
    pub last_cost_ms: f64,
}

impl SharedState {
    fn new(monitor: PerformanceMonitor) -> Self {
        let record = DifferenceRecord::default();
        Self {
            record,
            display_text: format_time_display(&record),
            changed_at_ms: [f64::NEG_INFINITY; 7],
            errors: ErrorLog::default(),
            monitor,
            last_cost_ms: 0.0,
        }
    }

    /// Sync the display to a freshly computed record, marking changed fields.
    fn apply_record(&mut self, record: DifferenceRecord, now_ms: f64) {
        let old = self.record.fields();
        let new = record.fields();
        for (i, (o, n)) in old.iter().zip(new.iter()).enumerate() {
            if o != n {
                self.changed_at_ms[i] = now_ms;
            }
        }
        if record != self.record {
            self.display_text = format_time_display(&record);
            self.record = record;
        }
    }
}

pub struct TimerApp {
    shared: Rc<RefCell<SharedState>>,
    #[allow(dead_code)]
    engine: Rc<DifferenceEngine>,
    scheduler: AdaptiveScheduler,
    config: TimerConfig,
    caps: Capabilities,
    /// Label like "UTC+8", shown under the readout.
    timezone_label: String,
    start_label: String,
    consecutive_failures: u32,
    terminal_error: Option<String>,
    show_overlay: bool,
    last_adjust_ms: f64,
}

impl TimerApp {
    /// Build and start the timer. Fails fast on an invalid start-date
    /// override; nothing is constructed lazily.
    pub fn new(cc: &eframe::CreationContext<'_>, config: TimerConfig) -> Result<Self, AppError> {
        cc.egui_ctx.set_visuals(minimal_visuals());

        let start = match &config.start {
            Some(s) => s.parse().map_err(AppError::InvalidStartDate)?,
            None => DEFAULT_START,
        };
        let engine = Rc::new(DifferenceEngine::new(start));

        let now = now_ms();
        let mut monitor = PerformanceMonitor::new(config.sample_interval_ms, config.max_samples);
        if config.show_overlay {
            monitor.start_sampling(now);
        }
        let shared = Rc::new(RefCell::new(SharedState::new(monitor)));

        let mut callback = Self::update_callback(engine.clone(), shared.clone());
        // Initial update so the page never shows the zero record first.
        if let Err(e) = callback(now) {
            shared
                .borrow_mut()
                .errors
                .report(ErrorKind::UpdateFailure, e.to_string(), now);
        }

        let mut scheduler =
            AdaptiveScheduler::new(config.update_interval_ms, config.pause_when_hidden);
        scheduler.start(callback, now);

        let caps = Capabilities::probe();
        info!(
            start = %engine.start(),
            interval_ms = config.update_interval_ms,
            "distance timer started"
        );

        Ok(Self {
            shared,
            start_label: engine.start().to_string(),
            engine,
            scheduler,
            show_overlay: config.show_overlay,
            config,
            caps,
            timezone_label: timezone_label(),
            consecutive_failures: 0,
            terminal_error: None,
            last_adjust_ms: now,
        })
    }

    /// The per-tick callback, composed at construction: compute + display
    /// sync wrapped in an explicit cost-measuring decorator.
    fn update_callback(
        engine: Rc<DifferenceEngine>,
        shared: Rc<RefCell<SharedState>>,
    ) -> TickCallback {
        Box::new(move |tick_ms| {
            let started = now_ms();
            let mut shared = shared
                .try_borrow_mut()
                .map_err(|_| TickError("display state unavailable".into()))?;

            let record = engine.compute_checked(now_wall_instant(), &mut shared.errors, tick_ms);
            shared.apply_record(record, tick_ms);

            let cost = now_ms() - started;
            shared.last_cost_ms = cost;
            shared.monitor.record_update_cost(cost);
            Ok(())
        })
    }

    /// Page visibility, with window focus as the fallback signal.
    fn is_visible(&self, ctx: &egui::Context) -> bool {
        #[cfg(target_arch = "wasm32")]
        if self.caps.page_visibility {
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                return !document.hidden();
            }
        }
        ctx.input(|i| i.focused)
    }

    fn run_scheduler(&mut self, now: f64) {
        if self.terminal_error.is_some() {
            return;
        }
        match self.scheduler.tick(now) {
            Ok(Tick::Fired) => self.consecutive_failures = 0,
            Ok(_) => {}
            Err(e) => {
                self.consecutive_failures += 1;
                self.shared
                    .borrow_mut()
                    .errors
                    .report(ErrorKind::UpdateFailure, e.to_string(), now);
                if self.consecutive_failures > MAX_CONSECUTIVE_FAILURES {
                    self.scheduler.stop();
                    self.terminal_error = Some("计时器发生错误，已停止更新".to_string());
                }
            }
        }
    }

    fn sample_and_adjust(&mut self, now: f64) {
        let mut shared = self.shared.borrow_mut();
        shared.monitor.maybe_sample(now, caps::memory_snapshot());

        if !shared.monitor.is_sampling() || now - self.last_adjust_ms < ADJUST_PERIOD_MS {
            return;
        }
        self.last_adjust_ms = now;

        let current = self.scheduler.target_interval_ms();
        let proposed = shared
            .monitor
            .propose_interval_adjustment(current, self.config.target_fps);
        if proposed != current {
            info!(from = current, to = proposed, "update cadence adjusted");
            self.scheduler.set_target_interval(proposed);
        }
    }

    fn render_header(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new(&self.timezone_label)
                    .color(colors::TEXT_MUTED)
                    .monospace()
                    .size(11.0),
            );

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    egui::RichText::new("DISTANCE TIMER")
                        .color(colors::TEXT_PRIMARY)
                        .size(12.0),
                );
                ui.add_space(10.0);

                let perf_text = if self.show_overlay { "Perf ▲" } else { "Perf ▼" };
                if ui
                    .button(egui::RichText::new(perf_text).size(11.0))
                    .clicked()
                {
                    self.show_overlay = !self.show_overlay;
                    let mut shared = self.shared.borrow_mut();
                    if self.show_overlay {
                        shared.monitor.start_sampling(now_ms());
                    }
                }
            });
        });
    }
}

impl eframe::App for TimerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Re-arm the next repaint opportunity unconditionally so cadence
        // self-corrects instead of drifting.
        ctx.request_repaint();

        let now = now_ms();
        self.shared.borrow_mut().monitor.frame_tick();

        let visible = self.is_visible(ctx);
        self.scheduler.set_visible(visible, now);

        self.run_scheduler(now);
        self.sample_and_adjust(now);

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(colors::BG_PRIMARY).inner_margin(12.0))
            .show(ctx, |ui| {
                self.render_header(ui);

                if let Some(message) = &self.terminal_error {
                    ui.add_space(8.0);
                    ui.label(
                        egui::RichText::new(message)
                            .color(colors::ERROR)
                            .size(14.0),
                    );
                }

                let shared = self.shared.borrow();
                display::render(ui, &shared, &self.start_label, now);
            });

        if self.show_overlay {
            overlay::render(self, ctx, now);
        }
    }
}

impl Drop for TimerApp {
    fn drop(&mut self) {
        self.scheduler.cleanup();
        info!("distance timer stopped");
    }
}

#[cfg(target_arch = "wasm32")]
fn timezone_label() -> String {
    // getTimezoneOffset is minutes west of UTC, hence the sign flip.
    let offset_hours = -js_sys::Date::new_0().get_timezone_offset() / 60.0;
    if offset_hours == offset_hours.trunc() {
        format!("UTC{:+}", offset_hours as i32)
    } else {
        format!("UTC{:+.1}", offset_hours)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn timezone_label() -> String {
    "UTC".to_string()
}

impl TimerApp {
    /// Shared state accessor for the overlay module.
    pub(crate) fn shared(&self) -> &Rc<RefCell<SharedState>> {
        &self.shared
    }

    pub(crate) fn scheduler(&self) -> &AdaptiveScheduler {
        &self.scheduler
    }

    pub(crate) fn capabilities(&self) -> &Capabilities {
        &self.caps
    }
}
