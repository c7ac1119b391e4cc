//! Minimal black & white theme for the timer page

use egui::Color32;

pub mod colors {
    use super::Color32;

    // === Backgrounds ===
    pub const BG_PRIMARY: Color32 = Color32::from_rgb(0, 0, 0);
    pub const BG_ELEVATED: Color32 = Color32::from_rgb(12, 12, 12);
    pub const BG_HOVER: Color32 = Color32::from_rgb(24, 24, 24);

    // === Text ===
    pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(255, 255, 255);
    pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(160, 160, 160);
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(80, 80, 80);

    // === Lines & Borders ===
    pub const BORDER: Color32 = Color32::from_rgb(40, 40, 40);

    // === Status ===
    /// Flash color for a time field whose value just changed.
    pub const HIGHLIGHT: Color32 = Color32::from_rgb(255, 220, 120);
    pub const ERROR: Color32 = Color32::from_rgb(200, 100, 100);
    pub const FPS_GOOD: Color32 = Color32::from_rgb(100, 200, 100);
    pub const FPS_AVERAGE: Color32 = Color32::from_rgb(200, 200, 100);
    pub const FPS_POOR: Color32 = Color32::from_rgb(200, 100, 100);
}

/// Color coding for an fps readout: poor below 30, average below 50.
pub fn fps_color(fps: f64) -> Color32 {
    if fps < 30.0 {
        colors::FPS_POOR
    } else if fps < 50.0 {
        colors::FPS_AVERAGE
    } else {
        colors::FPS_GOOD
    }
}

/// Create minimal black & white egui Visuals
pub fn minimal_visuals() -> egui::Visuals {
    use colors::*;

    let mut visuals = egui::Visuals::dark();

    visuals.panel_fill = BG_PRIMARY;
    visuals.window_fill = BG_PRIMARY;
    visuals.extreme_bg_color = BG_PRIMARY;
    visuals.faint_bg_color = BG_ELEVATED;

    visuals.override_text_color = Some(TEXT_PRIMARY);

    visuals.widgets.noninteractive.bg_fill = BG_PRIMARY;
    visuals.widgets.noninteractive.fg_stroke = egui::Stroke::new(1.0, TEXT_MUTED);
    visuals.widgets.noninteractive.bg_stroke = egui::Stroke::new(1.0, BORDER);

    visuals.widgets.inactive.bg_fill = BG_PRIMARY;
    visuals.widgets.inactive.fg_stroke = egui::Stroke::new(1.0, TEXT_SECONDARY);
    visuals.widgets.inactive.bg_stroke = egui::Stroke::new(1.0, BORDER);
    visuals.widgets.inactive.weak_bg_fill = BG_PRIMARY;

    visuals.widgets.hovered.bg_fill = BG_ELEVATED;
    visuals.widgets.hovered.fg_stroke = egui::Stroke::new(1.0, TEXT_PRIMARY);
    visuals.widgets.hovered.bg_stroke = egui::Stroke::new(1.0, TEXT_MUTED);
    visuals.widgets.hovered.weak_bg_fill = BG_ELEVATED;

    visuals.widgets.active.bg_fill = BG_HOVER;
    visuals.widgets.active.fg_stroke = egui::Stroke::new(1.0, TEXT_PRIMARY);
    visuals.widgets.active.bg_stroke = egui::Stroke::new(1.0, TEXT_SECONDARY);
    visuals.widgets.active.weak_bg_fill = BG_HOVER;

    visuals.selection.bg_fill = Color32::from_rgb(60, 60, 60);
    visuals.selection.stroke = egui::Stroke::new(1.0, TEXT_PRIMARY);

    visuals.hyperlink_color = TEXT_PRIMARY;

    // Flat design - no shadows
    visuals.window_shadow = egui::Shadow::NONE;
    visuals.popup_shadow = egui::Shadow::NONE;

    visuals
}
