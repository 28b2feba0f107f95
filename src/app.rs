//! AgroLink warehouse map app
//!
//! Hosts the board widget and wires it to the loader. Native and browser
//! builds share this shell; the browser build also listens for page events.

use egui::{Color32, RichText};
use warehouse_board::BoardWidget;

use crate::config::AppConfig;
use crate::loader::MapLoader;

pub struct AgroLinkApp {
    board: BoardWidget,
    loader: MapLoader,
    #[cfg(target_arch = "wasm32")]
    _bridge: warehouse_board::JsBridge,
}

impl AgroLinkApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> anyhow::Result<Self> {
        tracing::info!(
            api = %config.api_url,
            center = %config.center_id,
            poll_secs = config.poll_interval.as_secs(),
            "starting warehouse map"
        );

        let board = BoardWidget::new(config.viewport);
        let mut loader = MapLoader::new(&config)?;
        loader.reload(cc.egui_ctx.input(|i| i.time));

        #[cfg(target_arch = "wasm32")]
        let _bridge = warehouse_board::JsBridge::new(board.bus().clone(), cc.egui_ctx.clone());

        Ok(Self {
            board,
            loader,
            #[cfg(target_arch = "wasm32")]
            _bridge,
        })
    }

    fn render_header(&mut self, ui: &mut egui::Ui, now: f64) {
        ui.horizontal(|ui| {
            ui.heading("Warehouse map");
            ui.label(
                RichText::new(format!("center {}", self.loader.center_id()))
                    .color(Color32::from_rgb(107, 114, 128)),
            );
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .add_enabled(!self.loader.busy(), egui::Button::new("Refresh"))
                    .clicked()
                {
                    self.loader.reload(now);
                }
                if self.loader.busy() {
                    ui.spinner();
                }
            });
        });
    }

    fn render_error(&mut self, ui: &mut egui::Ui, now: f64) {
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() / 3.0);
            ui.label(
                RichText::new("Failed to load map or shelves")
                    .size(16.0)
                    .color(Color32::from_rgb(239, 68, 68)),
            );
            if let Some(error) = self.loader.error() {
                ui.label(RichText::new(error).small().color(Color32::GRAY));
            }
            ui.add_space(8.0);
            if ui.button("Retry").clicked() {
                self.loader.reload(now);
            }
        });
    }
}

impl eframe::App for AgroLinkApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = ctx.input(|i| i.time);

        let update = self.loader.poll(now);
        if let Some(world) = update.world {
            self.board.set_world(world);
        }
        if let Some(shelves) = update.shelves {
            self.board.set_shelves(shelves);
        }

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            self.render_header(ui, now);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.loader.is_error() {
                self.render_error(ui, now);
            } else {
                self.board.ui(ui);
            }
        });

        // Repaint while loading, otherwise wake up for the next poll
        if self.loader.busy() {
            ctx.request_repaint();
        } else if let Some(wait) = self.loader.next_poll_in(now) {
            ctx.request_repaint_after(wait);
        }
    }
}
