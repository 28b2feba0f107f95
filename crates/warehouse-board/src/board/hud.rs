//! HUD controls
//!
//! Filter toggles, zoom buttons and the "go to shelf" box. The HUD never
//! touches the viewport: zoom and navigation go out as bus events on the
//! window target, filters come back to the board through [`HudResponse`].

use agrolink_types::{BoardEvent, ControlKind, ShelfType};
use egui::{Color32, RichText, TextEdit, Ui};

use super::filter::ShelfFilter;
use crate::bus::{EventBus, Target};

/// HUD state kept across frames.
#[derive(Debug, Clone, Default)]
pub struct HudState {
    pub filter: ShelfFilter,
    pub goto_query: String,
    status: Option<String>,
}

impl HudState {
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Dispatch `app:gotoShelf` for the current query. Blank queries are
    /// rejected locally.
    pub fn submit_goto(&mut self, bus: &EventBus) -> bool {
        let shelf_id = self.goto_query.trim().to_string();
        if shelf_id.is_empty() {
            self.set_status("Enter a shelf id, e.g. 1A1");
            return false;
        }
        self.clear_status();
        bus.dispatch(Target::Window, BoardEvent::GotoShelf { shelf_id });
        true
    }
}

/// What changed in the HUD this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HudResponse {
    pub filter_changed: bool,
}

/// Render the HUD bar.
pub fn show(ui: &mut Ui, state: &mut HudState, bus: &EventBus) -> HudResponse {
    let before = state.filter.clone();

    ui.horizontal_wrapped(|ui| {
        ui.label("Type:");
        egui::ComboBox::from_id_salt("hud_shelf_type")
            .selected_text(
                state
                    .filter
                    .shelf_type
                    .map_or("All", |t| t.display_name()),
            )
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut state.filter.shelf_type, None, "All");
                for shelf_type in ShelfType::all() {
                    ui.selectable_value(
                        &mut state.filter.shelf_type,
                        Some(*shelf_type),
                        shelf_type.display_name(),
                    );
                }
            });

        ui.checkbox(&mut state.filter.avoid_only, "Avoid-flagged only");
        ui.checkbox(&mut state.filter.crowded_only, "Crowded only");

        ui.separator();

        for (label, kind) in [
            ("+", ControlKind::ZoomIn),
            ("-", ControlKind::ZoomOut),
            ("Reset", ControlKind::Reset),
        ] {
            if ui.button(label).clicked() {
                bus.dispatch(Target::Window, BoardEvent::Control(kind));
            }
        }

        ui.separator();

        let response = ui.add(
            TextEdit::singleline(&mut state.goto_query)
                .hint_text("Go to shelf (1A1)")
                .desired_width(120.0),
        );
        let submitted =
            response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if ui.button("Go").clicked() || submitted {
            state.submit_goto(bus);
        }

        if let Some(status) = state.status() {
            ui.label(RichText::new(status).color(Color32::from_rgb(251, 191, 36)));
        }
    });

    HudResponse {
        filter_changed: state.filter != before,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn submit_goto_dispatches_trimmed_id_on_window() {
        let bus = EventBus::new();
        let window = bus.subscribe(&[Target::Window]);
        let viewport = bus.subscribe(&[Target::Viewport]);

        let mut state = HudState {
            goto_query: "  2B3 ".into(),
            ..Default::default()
        };
        assert!(state.submit_goto(&bus));
        assert_eq!(
            window.drain(),
            vec![BoardEvent::GotoShelf {
                shelf_id: "2B3".into()
            }]
        );
        assert!(viewport.drain().is_empty());
        assert_eq!(state.status(), None);
    }

    #[test]
    fn blank_goto_sets_status() {
        let bus = EventBus::new();
        let window = bus.subscribe(&[Target::Window]);

        let mut state = HudState::default();
        assert!(!state.submit_goto(&bus));
        assert!(window.drain().is_empty());
        assert!(state.status().is_some());
    }

    #[test]
    fn submit_goto_clears_stale_status_and_keeps_query() {
        let bus = EventBus::new();
        let window = bus.subscribe(&[Target::Window]);

        let mut state = HudState::default();
        state.set_status("Shelf 9Z9 not found");
        state.goto_query = "1A1".into();

        assert!(state.submit_goto(&bus));
        assert_eq!(state.status(), None);
        assert_eq!(state.goto_query, "1A1");
        assert_eq!(window.drain().len(), 1);
    }
}
