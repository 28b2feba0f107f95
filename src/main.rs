//! AgroLink native warehouse map viewer
//!
//! Reads configuration from the environment (and `.env`), then opens the map
//! in a native window.

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use agrolink::{AgroLinkApp, AppConfig};
    use anyhow::Context;

    dotenvy::dotenv().ok();
    agrolink::logging::init();

    let config = AppConfig::from_env().context("invalid configuration")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("AgroLink warehouse map")
            .with_inner_size([1280.0, 800.0]),
        ..Default::default()
    };

    eframe::run_native(
        "AgroLink warehouse map",
        options,
        Box::new(move |cc| Ok(Box::new(AgroLinkApp::new(cc, config)?))),
    )
    .map_err(|e| anyhow::anyhow!("viewer exited with error: {}", e))
}

// The browser build starts from `agrolink::start`
#[cfg(target_arch = "wasm32")]
fn main() {}
