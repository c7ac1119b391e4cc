//! The seven-unit elapsed time readout

use eframe::egui;

use crate::core::UNIT_LABELS;
use crate::theme::colors;

use super::SharedState;

/// How long a changed field stays highlighted.
const HIGHLIGHT_MS: f64 = 300.0;

pub(crate) fn render(ui: &mut egui::Ui, shared: &SharedState, start_label: &str, now_ms: f64) {
    let values = shared.record.fields();

    ui.add_space(ui.available_height() * 0.25);

    ui.vertical_centered(|ui| {
        ui.horizontal_wrapped(|ui| {
            ui.spacing_mut().item_spacing.x = 6.0;
            for (i, (value, label)) in values.iter().zip(UNIT_LABELS).enumerate() {
                // Flash a field whose value just changed.
                let color = if now_ms - shared.changed_at_ms[i] < HIGHLIGHT_MS {
                    colors::HIGHLIGHT
                } else {
                    colors::TEXT_PRIMARY
                };
                ui.label(
                    egui::RichText::new(value.to_string())
                        .color(color)
                        .monospace()
                        .size(44.0),
                );
                ui.label(
                    egui::RichText::new(label)
                        .color(colors::TEXT_SECONDARY)
                        .size(16.0),
                );
            }
        });

        ui.add_space(12.0);
        ui.label(
            egui::RichText::new(&shared.display_text)
                .color(colors::TEXT_MUTED)
                .monospace()
                .size(13.0),
        );
        ui.label(
            egui::RichText::new(format!("since {start_label}"))
                .color(colors::TEXT_MUTED)
                .size(11.0),
        );
    });
}
