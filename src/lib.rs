//! AgroLink - warehouse map app shell
//!
//! Configuration, logging and the data loading lifecycle around the
//! `warehouse-board` widget. Builds as a native viewer and as a WASM module.

pub mod app;
pub mod config;
pub mod loader;
pub mod logging;

pub use app::AgroLinkApp;
pub use config::{AppConfig, ConfigError};
pub use loader::{LoadUpdate, MapLoader};

/// Canvas element id the browser build mounts into
pub const CANVAS_ID: &str = "agrolink_canvas";

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    use wasm_bindgen::JsCast;

    logging::init();

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        tracing::error!("no document, cannot mount the map");
        return;
    };
    let Some(canvas) = document
        .get_element_by_id(CANVAS_ID)
        .and_then(|el| el.dyn_into::<web_sys::HtmlCanvasElement>().ok())
    else {
        tracing::error!("canvas #{} not found", CANVAS_ID);
        return;
    };

    // Same origin as the page unless built for a fixed backend
    let mut config = AppConfig::default();
    if let Some(origin) = web_sys::window().and_then(|w| w.location().origin().ok()) {
        config.api_url = option_env!("AGROLINK_API_URL")
            .map(str::to_string)
            .unwrap_or(origin);
    }

    wasm_bindgen_futures::spawn_local(async move {
        let result = eframe::WebRunner::new()
            .start(
                canvas,
                eframe::WebOptions::default(),
                Box::new(move |cc| Ok(Box::new(AgroLinkApp::new(cc, config)?))),
            )
            .await;
        if let Err(e) = result {
            tracing::error!("failed to start eframe: {:?}", e);
        }
    });
}
