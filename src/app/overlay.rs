//! Performance overlay - sampling stats, fps history and recent errors

use eframe::egui;
use egui_plot::{Line, Plot, PlotPoints};
use tracing::info;

use crate::theme::{colors, fps_color};
use crate::time::now_ms;

use super::TimerApp;

pub(crate) fn render(app: &TimerApp, ctx: &egui::Context, now: f64) {
    let shared = app.shared().clone();
    let mut shared = shared.borrow_mut();
    let report = shared.monitor.report(now);
    let sampling = shared.monitor.is_sampling();

    egui::Area::new(egui::Id::new("performance_overlay"))
        .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-8.0, 36.0))
        .show(ctx, |ui| {
            egui::Frame::new()
                .fill(egui::Color32::from_rgba_unmultiplied(20, 20, 20, 200))
                .corner_radius(4.0)
                .inner_margin(8.0)
                .show(ui, |ui| {
                    ui.set_min_width(300.0);

                    let title = egui::RichText::new(if sampling {
                        "● Performance"
                    } else {
                        "○ Performance (paused)"
                    })
                    .color(if sampling {
                        colors::TEXT_PRIMARY
                    } else {
                        colors::TEXT_MUTED
                    });

                    egui::CollapsingHeader::new(title)
                        .default_open(true)
                        .show(ui, |ui| {
                            ui.label(
                                egui::RichText::new(format!("{:.1} fps", report.fps.current))
                                    .color(fps_color(report.fps.current))
                                    .monospace(),
                            );
                            ui.label(
                                egui::RichText::new(format!(
                                    "update {:.2} ms (avg {:.2}, max {:.2})",
                                    report.update_cost.current,
                                    report.update_cost.average,
                                    report.update_cost.max,
                                ))
                                .color(colors::TEXT_SECONDARY)
                                .monospace(),
                            );

                            let memory_text = match report.memory {
                                Some(m) => {
                                    format!("{:.1} MB / {:.1} MB heap", m.used_mb, m.total_mb)
                                }
                                None => "memory N/A".to_string(),
                            };
                            ui.label(
                                egui::RichText::new(memory_text)
                                    .color(colors::TEXT_MUTED)
                                    .monospace(),
                            );

                            ui.label(
                                egui::RichText::new(format!(
                                    "{} samples / {:.0}s / interval {:.0} ms",
                                    report.sample_count,
                                    report.elapsed_seconds,
                                    app.scheduler().target_interval_ms(),
                                ))
                                .color(colors::TEXT_MUTED)
                                .monospace(),
                            );

                            if !app.capabilities().performance_now {
                                ui.label(
                                    egui::RichText::new("high-resolution timer unavailable")
                                        .color(colors::FPS_AVERAGE)
                                        .size(11.0),
                                );
                            }

                            render_fps_history(ui, &shared);

                            ui.horizontal(|ui| {
                                let toggle_text = if sampling { "Pause" } else { "Resume" };
                                if ui.button(toggle_text).clicked() {
                                    if sampling {
                                        shared.monitor.stop_sampling();
                                    } else {
                                        shared.monitor.start_sampling(now_ms());
                                    }
                                }
                                if ui.button("Log report").clicked() {
                                    match serde_json::to_string(&report) {
                                        Ok(json) => info!(report = %json, "performance report"),
                                        Err(e) => info!(error = %e, "report not serializable"),
                                    }
                                }
                            });

                            render_recent_errors(ui, &shared, now);
                        });
                });
        });
}

fn render_fps_history(ui: &mut egui::Ui, shared: &super::SharedState) {
    let points: PlotPoints = shared
        .monitor
        .samples()
        .enumerate()
        .map(|(x, s)| [x as f64, s.fps])
        .collect();

    Plot::new("fps_history")
        .height(60.0)
        .show_axes([false, true])
        .show_grid(false)
        .allow_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .show_background(false)
        .include_y(0.0)
        .include_y(60.0)
        .label_formatter(|_name, value| format!("fps={:.0}", value.y))
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(points).color(colors::TEXT_SECONDARY).width(1.0));
        });
}

fn render_recent_errors(ui: &mut egui::Ui, shared: &super::SharedState, now: f64) {
    if shared.errors.is_empty() {
        return;
    }
    ui.add_space(4.0);
    ui.label(
        egui::RichText::new(format!("Errors ({} total)", shared.errors.total()))
            .color(colors::ERROR)
            .size(12.0),
    );
    for entry in shared.errors.entries().rev().take(5) {
        let age = (now - entry.timestamp_ms) / 1000.0;
        ui.label(
            egui::RichText::new(format!(
                "{:>6.1}s  [{}]  {}",
                -age,
                entry.kind.label(),
                entry.message
            ))
            .color(colors::ERROR)
            .monospace()
            .size(11.0),
        );
    }
}
