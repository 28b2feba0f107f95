//! Warehouse Board Module
//!
//! Pan/zoom map of a logistics center: zones in meters, shelves as grid cells.
//!
//! # Architecture
//!
//! ```text
//! WorldSpec + Vec<ShelfDto> (from server)
//!        │
//!        ├──► ShelfFilter (HUD toggles)
//!        │
//!        ▼
//! ShelfIndex (zone → "row-col" → shelf)
//!        │
//!        ▼
//! compute_layout (meters → content pixels, clamped cells)
//!        │
//!        ├──► paint_cell (draws to egui::Painter)
//!        └──► SpatialIndex (hover / click hit tests)
//!
//! HUD ──► EventBus ──► BoardWidget::process_events ──► Viewport
//!  (board:control, board:focus, app:gotoShelf)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let mut board = BoardWidget::new(ViewportConfig::default());
//! board.set_world(world);
//! board.set_shelves(shelves);
//! board.ui(ui);
//! ```

pub mod cell;
pub mod colors;
pub mod detail;
pub mod filter;
pub mod hud;
pub mod layout;
pub mod spatial;
pub mod viewport;

pub use cell::{paint_cell, BusyLevel, CellLook, CellVisual, SlotTint};
pub use detail::DetailStore;
pub use filter::ShelfFilter;
pub use hud::{HudResponse, HudState};
pub use layout::{compute_layout, BoardLayout, CellAddress, ShelfIndex, ZoneLayout};
pub use spatial::SpatialIndex;
pub use viewport::{ViewTransform, Viewport, ViewportConfig};

use agrolink_types::{BoardEvent, ControlKind, FocusRequest, ShelfDto, WorldSpec};
use egui::{Align2, FontId, Key, Pos2, Rect, Sense, Stroke, Vec2};

use crate::bus::{EventBus, Subscription, Target};

/// Padding around the zones for the initial fit
const FIT_PADDING: f32 = 40.0;

/// Go-to-shelf never zooms out below this
const GOTO_MIN_SCALE: f32 = 1.2;

/// Pixels per wheel "line" for line-based wheel deltas
const WHEEL_LINE_PX: f32 = 40.0;

// =============================================================================
// BOARD WIDGET
// =============================================================================

/// The warehouse map widget: HUD bar, pan/zoom canvas and shelf detail dialog.
pub struct BoardWidget {
    viewport: Viewport,
    bus: EventBus,
    /// Drains both the viewport and the window channel
    subscription: Subscription,

    world: WorldSpec,
    shelves: Vec<ShelfDto>,

    hud: HudState,
    detail: DetailStore,

    /// All shelves; go-to and detail lookups ignore filters
    all_shelves: ShelfIndex,
    /// Shelves passing the HUD filter; what the cells show
    visible_shelves: ShelfIndex,
    layout: BoardLayout,
    spatial: SpatialIndex,

    hovered: Option<CellAddress>,
    needs_layout: bool,
    needs_initial_fit: bool,
}

impl Default for BoardWidget {
    fn default() -> Self {
        Self::new(ViewportConfig::default())
    }
}

impl BoardWidget {
    pub fn new(config: ViewportConfig) -> Self {
        Self::with_bus(config, EventBus::new())
    }

    /// Attach to an existing bus (shared with a page or the JS bridge).
    pub fn with_bus(config: ViewportConfig, bus: EventBus) -> Self {
        let subscription = bus.subscribe(&[Target::Viewport, Target::Window]);
        Self {
            viewport: Viewport::new(config),
            bus,
            subscription,
            world: WorldSpec::empty(),
            shelves: Vec::new(),
            hud: HudState::default(),
            detail: DetailStore::default(),
            all_shelves: ShelfIndex::default(),
            visible_shelves: ShelfIndex::default(),
            layout: BoardLayout::default(),
            spatial: SpatialIndex::default(),
            hovered: None,
            needs_layout: true,
            needs_initial_fit: true,
        }
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn layout(&mut self) -> &BoardLayout {
        self.ensure_layout();
        &self.layout
    }

    pub fn hud(&self) -> &HudState {
        &self.hud
    }

    pub fn hud_mut(&mut self) -> &mut HudState {
        &mut self.hud
    }

    pub fn detail(&self) -> &DetailStore {
        &self.detail
    }

    pub fn world(&self) -> &WorldSpec {
        &self.world
    }

    /// Replace the world. Triggers a relayout and a fresh fit.
    pub fn set_world(&mut self, world: WorldSpec) {
        self.world = world;
        self.needs_layout = true;
        self.needs_initial_fit = true;
    }

    /// Replace the shelf records. Keeps the current view.
    pub fn set_shelves(&mut self, shelves: Vec<ShelfDto>) {
        self.shelves = shelves;
        self.needs_layout = true;
    }

    /// Viewport size in screen pixels. Set every frame by [`Self::ui`].
    pub fn set_viewport_size(&mut self, size: Vec2) {
        self.viewport.set_size(size);
    }

    /// Rebuild indexes and layout if inputs changed.
    fn ensure_layout(&mut self) {
        if !self.needs_layout {
            return;
        }
        self.needs_layout = false;

        let filter = &self.hud.filter;
        let (all, unplaced) = ShelfIndex::build(&self.world, &self.shelves);
        if !unplaced.is_empty() {
            tracing::warn!(count = unplaced.len(), ?unplaced, "shelves not placed on the map");
        }
        self.visible_shelves = if filter.is_active() {
            ShelfIndex::build(&self.world, &filter.apply(&self.shelves)).0
        } else {
            all.clone()
        };
        self.all_shelves = all;

        self.layout = compute_layout(&self.world, &self.visible_shelves, filter.is_active());
        self.spatial = SpatialIndex::from_layout(&self.layout);
        self.hovered = None;

        tracing::debug!(
            zones = self.layout.zones.len(),
            cells = self.layout.cell_count(),
            shelves = self.all_shelves.len(),
            visible = self.visible_shelves.len(),
            "board layout rebuilt"
        );
    }

    // =========================================================================
    // EVENTS
    // =========================================================================

    /// Apply every pending bus event in dispatch order. Returns `true` if
    /// anything was handled.
    pub fn process_events(&mut self) -> bool {
        self.ensure_layout();

        let events = self.subscription.drain();
        let handled = !events.is_empty();
        for event in events {
            if !self.viewport.handle(&event) {
                if let BoardEvent::GotoShelf { shelf_id } = event {
                    self.goto_shelf(&shelf_id);
                }
            }
        }
        handled
    }

    /// Resolve a shelf id to its cell center and focus it in place, so later
    /// commands of the same batch still override it.
    fn goto_shelf(&mut self, shelf_id: &str) {
        let center = self
            .all_shelves
            .locate(shelf_id)
            .and_then(|address| self.layout.cell_rect(address))
            .map(|rect| rect.center());

        match center {
            Some(center) => {
                self.hud.clear_status();
                let scale = self.viewport.scale().max(GOTO_MIN_SCALE);
                tracing::debug!(shelf_id, ?center, "go to shelf");
                self.viewport
                    .focus(FocusRequest::new(center.x, center.y).with_scale(scale));
            }
            None => {
                tracing::debug!(shelf_id, "go to unknown shelf");
                self.hud.set_status(format!("Shelf {} not found", shelf_id));
            }
        }
    }

    /// Fit all zones into the viewport. No-op without zones.
    pub fn fit_to_content(&mut self) {
        self.ensure_layout();
        let bounds = self
            .layout
            .zones
            .iter()
            .map(|z| z.rect.union(z.grid_rect()))
            .reduce(|a, b| a.union(b));
        if let Some(request) = bounds.and_then(|b| self.viewport.fit_request(b, FIT_PADDING)) {
            self.viewport.focus(request);
        }
    }

    // =========================================================================
    // UI
    // =========================================================================

    /// Main UI function
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        let hud_response = hud::show(ui, &mut self.hud, &self.bus);
        if hud_response.filter_changed {
            tracing::debug!(filter = ?self.hud.filter, "filter changed");
            self.needs_layout = true;
        }
        ui.separator();

        let available = ui.available_size();
        let (response, painter) = ui.allocate_painter(available, Sense::click_and_drag());
        let screen_rect = response.rect;
        self.set_viewport_size(screen_rect.size());

        self.ensure_layout();
        if self.needs_initial_fit && !self.layout.zones.is_empty() {
            self.fit_to_content();
            self.needs_initial_fit = false;
        }

        let mut needs_repaint = self.handle_input(ui, &response);
        needs_repaint |= self.process_events();

        self.render(&painter, screen_rect);

        let shelves = &self.all_shelves;
        detail::render_detail(ui.ctx(), &mut self.detail, |id| shelves.shelf(id));

        if needs_repaint {
            ui.ctx().request_repaint();
        }
    }

    /// Wheel, drag, keyboard, hover and click. Returns `true` if the view moved.
    fn handle_input(&mut self, ui: &egui::Ui, response: &egui::Response) -> bool {
        let origin = response.rect.min;
        let mut moved = false;

        // Wheel zoom, only with a modifier held
        if let Some(hover) = response.hover_pos() {
            let cursor = (hover - origin).to_pos2();
            let page = response.rect.height();
            let wheel: Vec<(f32, egui::Modifiers)> = ui.input(|i| {
                i.events
                    .iter()
                    .filter_map(|event| match event {
                        egui::Event::MouseWheel {
                            unit,
                            delta,
                            modifiers,
                        } => {
                            let per_unit = match unit {
                                egui::MouseWheelUnit::Point => 1.0,
                                egui::MouseWheelUnit::Line => WHEEL_LINE_PX,
                                egui::MouseWheelUnit::Page => page,
                            };
                            Some((wheel_delta(*delta, *modifiers) * per_unit, *modifiers))
                        }
                        _ => None,
                    })
                    .collect()
            });
            for (delta_y, modifiers) in wheel {
                moved |= self.viewport.wheel(delta_y, cursor, modifiers);
            }
        }

        // Drag pan
        if response.drag_started() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.viewport.pointer_down((pos - origin).to_pos2());
            }
        }
        if response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.viewport.pointer_move((pos - origin).to_pos2());
                moved = true;
            }
        }
        if response.drag_stopped()
            || (self.viewport.is_dragging() && !response.contains_pointer())
        {
            self.viewport.pointer_up();
        }

        // Keyboard, only while the board has focus
        if response.clicked() {
            response.request_focus();
        }
        if response.has_focus() {
            let command = ui.input(|i| {
                if i.key_pressed(Key::Plus) || i.key_pressed(Key::Equals) {
                    Some(ControlKind::ZoomIn)
                } else if i.key_pressed(Key::Minus) {
                    Some(ControlKind::ZoomOut)
                } else if i.key_pressed(Key::Num0) {
                    Some(ControlKind::Reset)
                } else {
                    None
                }
            });
            if let Some(kind) = command {
                self.bus.dispatch(Target::Viewport, BoardEvent::Control(kind));
            }
        }

        // Hover + click
        let transform = self.viewport.transform();
        let hit = response.hover_pos().and_then(|pos| {
            let content = transform.to_content((pos - origin).to_pos2());
            self.spatial.hit_test([content.x, content.y])
        });
        self.hovered = hit.map(|cell| cell.address.clone());
        if let Some(cell) = hit {
            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
            if response.clicked() {
                self.detail.open(cell.shelf_id.clone());
            }
        } else if self.viewport.is_dragging() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing);
        }

        moved
    }

    // =========================================================================
    // RENDERING
    // =========================================================================

    fn render(&self, painter: &egui::Painter, screen_rect: Rect) {
        painter.rect_filled(screen_rect, 0.0, colors::CANVAS_BG);

        let transform = self.viewport.transform();
        let scale = transform.scale;
        let origin = screen_rect.min.to_vec2();
        let to_screen = |p: Pos2| transform.to_screen(p) + origin;
        let rect_to_screen = |r: Rect| transform.rect_to_screen(r).translate(origin);

        if self.layout.zones.is_empty() {
            painter.text(
                screen_rect.center(),
                Align2::CENTER_CENTER,
                "No zones configured",
                FontId::proportional(14.0),
                colors::AXIS_LABEL,
            );
            return;
        }

        // Culling happens in content space
        let visible = self.viewport.visible_content();

        for zone in &self.layout.zones {
            if !zone.rect.union(zone.grid_rect()).intersects(visible) {
                continue;
            }

            painter.rect_filled(rect_to_screen(zone.rect), 6.0 * scale, colors::ZONE_FILL);
            painter.rect_stroke(
                rect_to_screen(zone.rect),
                6.0 * scale,
                Stroke::new(1.5 * scale, colors::ZONE_BORDER),
            );
            painter.text(
                to_screen(zone.title_pos),
                Align2::LEFT_TOP,
                format!("Zone {}", zone.zone_id),
                FontId::proportional(zone.title_size * scale),
                colors::ZONE_TITLE,
            );

            let label_font = FontId::proportional(11.0 * scale);
            for label in zone.row_labels.iter().chain(&zone.col_labels) {
                painter.text(
                    to_screen(label.pos),
                    Align2::CENTER_CENTER,
                    &label.text,
                    label_font.clone(),
                    colors::AXIS_LABEL,
                );
            }

            for cell in &zone.cells {
                if !cell.is_visible() || !cell.rect.intersects(visible) {
                    continue;
                }
                let visual = CellVisual::derive(cell, &self.visible_shelves);
                let hovered = self.hovered.as_ref() == Some(&cell.address);
                paint_cell(painter, rect_to_screen(cell.rect), &visual, scale, hovered);
            }
        }

        // Stats in bottom-left
        painter.text(
            screen_rect.left_bottom() + Vec2::new(10.0, -10.0),
            Align2::LEFT_BOTTOM,
            format!(
                "{} shelves | {:.0}%",
                self.visible_shelves.len(),
                scale * 100.0
            ),
            FontId::proportional(11.0),
            colors::AXIS_LABEL,
        );
    }
}

/// Wheel delta along the DOM `deltaY` axis (positive scrolls down).
///
/// Some platforms (macOS) turn shift+wheel into horizontal scrolling, so with
/// shift held both axes count.
fn wheel_delta(delta: Vec2, modifiers: egui::Modifiers) -> f32 {
    let raw = if modifiers.shift {
        delta.x + delta.y
    } else {
        delta.y
    };
    -raw
}

#[cfg(test)]
mod tests {
    use super::*;
    use agrolink_types::ShelfType;
    use chrono::Utc;

    fn shelf(id: &str) -> ShelfDto {
        ShelfDto {
            shelf_id: id.into(),
            shelf_type: ShelfType::Warehouse,
            max_slots: 4,
            occupied_slots: 2,
            max_weight_kg: 100.0,
            current_weight_kg: 10.0,
            busy_score: 20.0,
            is_temporarily_avoid: false,
            slots: vec![],
            zone: None,
            aisle: None,
            last_task_ping_at: None,
            updated_at: Utc::now(),
        }
    }

    fn board() -> BoardWidget {
        let mut board = BoardWidget::default();
        board.set_viewport_size(Vec2::new(800.0, 600.0));
        board.set_world(WorldSpec::fallback());
        board.set_shelves(vec![shelf("1A1"), shelf("2B3")]);
        board
    }

    #[test]
    fn goto_shelf_focuses_cell_center() {
        let mut board = board();
        board.bus().dispatch(
            Target::Window,
            BoardEvent::GotoShelf {
                shelf_id: "2B3".into(),
            },
        );
        assert!(board.process_events());

        let center = board
            .layout()
            .cell_rect(&CellAddress::new("B", 2, 3))
            .unwrap()
            .center();
        let on_screen = board.viewport().transform().to_screen(center);
        assert!((on_screen.x - 400.0).abs() < 1e-2);
        assert!((on_screen.y - 300.0).abs() < 1e-2);
        assert!(board.viewport().scale() >= GOTO_MIN_SCALE - 1e-4);
        assert_eq!(board.hud().status(), None);
    }

    #[test]
    fn goto_unknown_shelf_sets_status() {
        let mut board = board();
        let before = board.viewport().transform();
        board.bus().dispatch(
            Target::Window,
            BoardEvent::GotoShelf {
                shelf_id: "9Z9".into(),
            },
        );
        board.process_events();

        assert_eq!(board.viewport().transform(), before);
        assert!(board.hud().status().unwrap_or_default().contains("9Z9"));
    }

    #[test]
    fn last_command_wins() {
        let mut board = board();
        let bus = board.bus().clone();
        bus.dispatch(Target::Viewport, BoardEvent::Control(ControlKind::ZoomIn));
        bus.dispatch(
            Target::Window,
            BoardEvent::Focus(FocusRequest::new(10.0, 20.0).with_scale(2.0)),
        );
        bus.dispatch(Target::Viewport, BoardEvent::Control(ControlKind::Reset));
        board.process_events();

        assert_eq!(board.viewport().transform(), ViewTransform::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn reset_after_goto_wins() {
        let mut board = board();
        let bus = board.bus().clone();
        bus.dispatch(
            Target::Window,
            BoardEvent::GotoShelf {
                shelf_id: "2B3".into(),
            },
        );
        bus.dispatch(Target::Window, BoardEvent::Control(ControlKind::Reset));
        board.process_events();

        assert_eq!(board.viewport().transform(), ViewTransform::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn focus_after_goto_wins() {
        let mut board = board();
        let bus = board.bus().clone();
        bus.dispatch(
            Target::Window,
            BoardEvent::GotoShelf {
                shelf_id: "1A1".into(),
            },
        );
        bus.dispatch(
            Target::Viewport,
            BoardEvent::Focus(FocusRequest::new(400.0, 300.0).with_scale(1.0)),
        );
        board.process_events();

        assert_eq!(board.viewport().transform(), ViewTransform::new(1.0, 0.0, 0.0));
        // Nothing left over for the next frame
        assert!(!board.process_events());
    }

    #[test]
    fn shift_wheel_counts_horizontal_delta() {
        let shift = egui::Modifiers::SHIFT;
        assert_eq!(wheel_delta(Vec2::new(-3.0, 0.0), shift), 3.0);
        assert_eq!(wheel_delta(Vec2::new(0.0, -3.0), shift), 3.0);
        assert_eq!(wheel_delta(Vec2::new(-3.0, 0.0), egui::Modifiers::CTRL), 0.0);
        assert_eq!(wheel_delta(Vec2::new(0.0, 2.0), egui::Modifiers::CTRL), -2.0);
    }

    #[test]
    fn shift_wheel_with_horizontal_delta_zooms() {
        let mut board = board();
        let before = board.viewport().scale();
        let delta = wheel_delta(Vec2::new(1.0, 0.0), egui::Modifiers::SHIFT) * WHEEL_LINE_PX;
        assert!(board
            .viewport
            .wheel(delta, Pos2::new(400.0, 300.0), egui::Modifiers::SHIFT));
        assert!(board.viewport().scale() > before);
    }

    #[test]
    fn filter_hides_nulls_without_moving_cells() {
        let mut board = board();
        let before: Vec<Rect> = board.layout().cells().map(|c| c.rect).collect();

        board.hud_mut().filter.shelf_type = Some(ShelfType::Picker);
        board.needs_layout = true;
        let after: Vec<_> = board.layout().cells().map(|c| (c.rect, c.is_visible())).collect();

        assert_eq!(before.len(), after.len());
        for (rect, (new_rect, visible)) in before.iter().zip(&after) {
            assert_eq!(rect, new_rect);
            assert!(!visible);
        }
    }

    #[test]
    fn fit_to_content_shows_every_zone() {
        let mut board = board();
        board.fit_to_content();
        let visible = board.viewport().visible_content();
        for zone in &board.layout().zones.clone() {
            assert!(visible.contains_rect(zone.rect), "zone {} clipped", zone.zone_id);
        }
    }
}
