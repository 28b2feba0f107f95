//! Shelf detail dialog
//!
//! A floating window with the full record of the clicked shelf. Which shelf is
//! open lives in [`DetailStore`]; the record itself is looked up every frame so
//! polled updates show up while the dialog is open.

use agrolink_types::ShelfDto;
use chrono::{DateTime, Utc};
use egui::{Align2, Color32, RichText, Ui};

use super::cell::{slot_tint, BusyLevel};
use super::colors::{busy_color, occupancy_color, slot_tint_color};

/// Which shelf the dialog shows, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailStore {
    current: Option<String>,
}

impl DetailStore {
    pub fn open(&mut self, shelf_id: impl Into<String>) {
        let shelf_id = shelf_id.into();
        tracing::debug!(%shelf_id, "opening shelf detail");
        self.current = Some(shelf_id);
    }

    pub fn close(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }
}

/// Render the dialog for the open shelf. `lookup` resolves a shelf id to the
/// latest record.
pub fn render_detail<'a>(
    ctx: &egui::Context,
    store: &mut DetailStore,
    lookup: impl Fn(&str) -> Option<&'a ShelfDto>,
) {
    let Some(shelf_id) = store.current.clone() else {
        return;
    };

    let mut open = true;
    let mut close_clicked = false;

    egui::Window::new(format!("Shelf {}", shelf_id))
        .id(egui::Id::new("shelf_detail"))
        .open(&mut open)
        .default_width(280.0)
        .anchor(Align2::RIGHT_TOP, [-20.0, 60.0])
        .collapsible(true)
        .resizable(true)
        .show(ctx, |ui| {
            match lookup(&shelf_id) {
                Some(shelf) => render_detail_content(ui, shelf),
                None => {
                    ui.label(
                        RichText::new("This shelf is no longer on the map")
                            .color(Color32::GRAY)
                            .italics(),
                    );
                }
            }
            ui.add_space(8.0);
            if ui.button("Close").clicked() {
                close_clicked = true;
            }
        });

    if !open || close_clicked {
        store.close();
    }
}

fn render_detail_content(ui: &mut Ui, shelf: &ShelfDto) {
    let muted = Color32::from_rgb(107, 114, 128);

    ui.horizontal(|ui| {
        ui.heading(&shelf.shelf_id);
        ui.label(RichText::new(shelf.shelf_type.display_name()).color(muted));
    });
    if let (Some(zone), aisle) = (&shelf.zone, &shelf.aisle) {
        let location = match aisle {
            Some(aisle) => format!("Zone {} | Aisle {}", zone, aisle),
            None => format!("Zone {}", zone),
        };
        ui.label(RichText::new(location).color(muted));
    }

    ui.add_space(4.0);
    ui.separator();

    egui::Grid::new("shelf_detail_grid")
        .num_columns(2)
        .spacing([12.0, 4.0])
        .show(ui, |ui| {
            let slots = shelf.slot_usage();
            ui.label("Slots:");
            ui.colored_label(
                occupancy_color(slots),
                format!("{} / {}", shelf.occupied_slots, shelf.max_slots),
            );
            ui.end_row();

            let weight = shelf.weight_usage();
            ui.label("Weight:");
            ui.colored_label(
                occupancy_color(weight),
                format!("{:.1} / {:.1} kg", shelf.current_weight_kg, shelf.max_weight_kg),
            );
            ui.end_row();

            let busy = BusyLevel::from_score(shelf.busy_score);
            ui.label("Busy score:");
            ui.colored_label(busy_color(busy), format!("{:.0} ({:?})", shelf.busy_score, busy));
            ui.end_row();

            if shelf.is_temporarily_avoid {
                ui.label("Status:");
                ui.colored_label(Color32::from_rgb(211, 47, 47), "Temporarily avoid");
                ui.end_row();
            }

            ui.label("Last task:");
            ui.label(format_time(shelf.last_task_ping_at));
            ui.end_row();

            ui.label("Updated:");
            ui.label(format_time(Some(shelf.updated_at)));
            ui.end_row();
        });

    if shelf.slots.is_empty() {
        return;
    }

    ui.add_space(4.0);
    ui.collapsing(
        RichText::new(format!("Slots ({})", shelf.slots.len())).strong(),
        |ui| {
            egui::ScrollArea::vertical()
                .max_height(160.0)
                .show(ui, |ui| {
                    for slot in &shelf.slots {
                        ui.horizontal(|ui| {
                            ui.colored_label(slot_tint_color(slot_tint(slot)), "■");
                            ui.label(&slot.slot_id);
                            if slot.occupied {
                                ui.label(
                                    RichText::new(format!(
                                        "{:.1} of {:.1} left",
                                        slot.remaining, slot.capacity
                                    ))
                                    .small(),
                                );
                            } else {
                                ui.label(RichText::new("free").small().color(muted));
                            }
                        });
                    }
                });
        },
    );
}

fn format_time(at: Option<DateTime<Utc>>) -> String {
    at.map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "never".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn store_open_close() {
        let mut store = DetailStore::default();
        assert!(!store.is_open());

        store.open("1A1");
        assert_eq!(store.current(), Some("1A1"));

        store.open("2B3");
        assert_eq!(store.current(), Some("2B3"));

        store.close();
        assert_eq!(store.current(), None);
    }

    #[test]
    fn formats_timestamps() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        assert_eq!(format_time(Some(at)), "2024-05-01 09:30 UTC");
        assert_eq!(format_time(None), "never");
    }
}
