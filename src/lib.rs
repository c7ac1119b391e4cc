//! Distance timer - elapsed calendar time since a fixed historical instant
//!
//! Renders a continuously refreshed seven-unit readout (years through
//! milliseconds) of the time elapsed since a fixed start instant:
//! - calendar-aware difference engine with correct borrowing across
//!   variable-length months and leap years
//! - adaptive scheduler that pauses while the page is hidden and trades
//!   cadence against observed frame cost
//! - optional sampling monitor with an on-page performance overlay

pub mod caps;
pub mod config;
pub mod core;
pub mod time;

#[cfg(any(feature = "wasm", feature = "native"))]
pub mod app;
#[cfg(any(feature = "wasm", feature = "native"))]
pub mod theme;

#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() -> Result<(), wasm_bindgen::JsValue> {
    use wasm_bindgen::{JsCast, JsValue};

    use crate::app::TimerApp;
    use crate::config::TimerConfig;
    use crate::core::AppError;

    console_error_panic_hook::set_once();

    // Initialize tracing for browser console
    tracing_wasm::set_as_global_default();

    let window = web_sys::window()
        .ok_or_else(|| JsValue::from_str(&AppError::MissingCollaborator("window").to_string()))?;
    let config = TimerConfig::from_query(&window.location().search().unwrap_or_default());

    // The display target is required up front - construction fails outright
    // rather than deferring the error to the first frame.
    let canvas = window
        .document()
        .ok_or_else(|| JsValue::from_str(&AppError::MissingCollaborator("document").to_string()))?
        .get_element_by_id("canvas")
        .ok_or_else(|| JsValue::from_str(&AppError::MissingCollaborator("canvas").to_string()))?
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .map_err(|_| JsValue::from_str("element #canvas is not a canvas"))?;

    let web_options = eframe::WebOptions::default();
    wasm_bindgen_futures::spawn_local(async move {
        eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(move |cc| {
                    TimerApp::new(cc, config)
                        .map(|app| Box::new(app) as Box<dyn eframe::App>)
                        .map_err(Into::into)
                }),
            )
            .await
            .expect("Failed to start eframe");
    });

    Ok(())
}
