//! Cell renderer
//!
//! One grid cell per `(zone, row, col)` address. [`CellVisual::derive`] turns
//! a laid-out cell and its shelf record into plain visual state, [`paint_cell`]
//! draws it.
//!
//! ```text
//! ┌───────────────┐
//! │ 1A1        ● ! │   label, busy dot, avoid marker
//! │      (◔)       │   occupancy ring occupied/max
//! │ ▇ ▇ ▇ +2       │   up to 3 slot tints, overflow count
//! └───────────────┘
//! ```

use agrolink_types::{ShelfDto, ShelfType, SlotDto, CROWDED_BUSY_SCORE};
use egui::{Align2, FontId, Painter, Pos2, Rect, Shape, Stroke, Vec2};

use super::colors;
use super::layout::{CellFill, CellLayout, ShelfIndex};

/// Slot sub-rectangles drawn per cell
pub const MAX_VISIBLE_SLOTS: usize = 3;

/// Busy-score threshold for the "busy" dot
pub const BUSY_THRESHOLD: f64 = 40.0;

const CRITICAL_RATIO: f64 = 0.10;
const WARNING_RATIO: f64 = 0.30;

// =============================================================================
// DERIVED STATE
// =============================================================================

/// Tint of one slot sub-rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotTint {
    Free,
    Healthy,
    Warning,
    Critical,
}

/// Tint for a slot by its remaining capacity.
pub fn slot_tint(slot: &SlotDto) -> SlotTint {
    if !slot.occupied {
        return SlotTint::Free;
    }
    if !(slot.capacity.is_finite() && slot.capacity > 0.0) {
        return SlotTint::Critical;
    }
    let ratio = slot.remaining / slot.capacity;
    if ratio <= CRITICAL_RATIO {
        SlotTint::Critical
    } else if ratio <= WARNING_RATIO {
        SlotTint::Warning
    } else {
        SlotTint::Healthy
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusyLevel {
    Calm,
    Busy,
    Crowded,
}

impl BusyLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= CROWDED_BUSY_SCORE {
            BusyLevel::Crowded
        } else if score >= BUSY_THRESHOLD {
            BusyLevel::Busy
        } else {
            BusyLevel::Calm
        }
    }
}

/// Visual state of a populated cell.
#[derive(Debug, Clone, PartialEq)]
pub struct ShelfVisual {
    pub shelf_type: ShelfType,
    /// `occupied / max`, 0 when `max == 0`
    pub occupancy: f32,
    pub busy: BusyLevel,
    pub avoid: bool,
    pub slots: Vec<SlotTint>,
    /// Slots beyond [`MAX_VISIBLE_SLOTS`]
    pub overflow: usize,
}

/// Look of a cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellLook {
    Shelf(ShelfVisual),
    Empty,
    /// Invisible, same size as a real cell
    Spacer,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CellVisual {
    pub label: String,
    pub look: CellLook,
}

impl CellVisual {
    /// Visual state of a laid-out cell. The layout's [`CellFill`] decides
    /// between shelf, empty and spacer; `shelves` only supplies the record.
    pub fn derive(cell: &CellLayout, shelves: &ShelfIndex) -> Self {
        let look = match &cell.fill {
            CellFill::Shelf(_) => match shelves.at(&cell.address) {
                Some(shelf) => CellLook::Shelf(ShelfVisual::from_shelf(shelf)),
                None => CellLook::Empty,
            },
            CellFill::Empty => CellLook::Empty,
            CellFill::Spacer => CellLook::Spacer,
        };
        Self {
            label: cell.address.label(),
            look,
        }
    }
}

impl ShelfVisual {
    pub fn from_shelf(shelf: &ShelfDto) -> Self {
        let slots = shelf
            .slots
            .iter()
            .take(MAX_VISIBLE_SLOTS)
            .map(slot_tint)
            .collect();
        Self {
            shelf_type: shelf.shelf_type,
            occupancy: shelf.slot_usage(),
            busy: BusyLevel::from_score(shelf.busy_score),
            avoid: shelf.is_temporarily_avoid,
            slots,
            overflow: shelf.slots.len().saturating_sub(MAX_VISIBLE_SLOTS),
        }
    }
}

// =============================================================================
// PAINTING
// =============================================================================

const CORNER_RADIUS: f32 = 4.0;
const LABEL_SIZE: f32 = 10.0;
/// Below this scale only the cell box is drawn
const DETAIL_MIN_SCALE: f32 = 0.45;

/// Draw a cell into a screen-space rect. `scale` is the viewport scale.
pub fn paint_cell(painter: &Painter, rect: Rect, visual: &CellVisual, scale: f32, hovered: bool) {
    let radius = CORNER_RADIUS * scale;

    let shelf = match &visual.look {
        CellLook::Spacer => return,
        CellLook::Empty => {
            painter.rect_filled(rect, radius, colors::CELL_EMPTY_FILL);
            painter.rect_stroke(
                rect,
                radius,
                Stroke::new(1.0 * scale, colors::CELL_EMPTY_BORDER),
            );
            return;
        }
        CellLook::Shelf(shelf) => shelf,
    };

    painter.rect_filled(rect, radius, colors::CELL_FILL);
    let border = if hovered {
        Stroke::new(2.5 * scale, colors::CELL_HOVER)
    } else {
        Stroke::new(1.5 * scale, colors::shelf_type_border(shelf.shelf_type))
    };
    painter.rect_stroke(rect, radius, border);

    if scale < DETAIL_MIN_SCALE {
        return;
    }

    let pad = 3.0 * scale;
    painter.text(
        rect.left_top() + Vec2::splat(pad),
        Align2::LEFT_TOP,
        &visual.label,
        FontId::proportional(LABEL_SIZE * scale),
        colors::CELL_LABEL,
    );

    // Busy dot and avoid marker, top-right
    let dot_radius = 3.0 * scale;
    let dot = Pos2::new(rect.right() - pad - dot_radius, rect.top() + pad + dot_radius);
    painter.circle_filled(dot, dot_radius, colors::busy_color(shelf.busy));
    if shelf.avoid {
        painter.text(
            dot - Vec2::new(dot_radius * 2.0 + pad, 0.0),
            Align2::RIGHT_CENTER,
            "!",
            FontId::monospace(LABEL_SIZE * scale),
            colors::AVOID_MARKER,
        );
    }

    let ring_radius = rect.height().min(rect.width()) * 0.2;
    paint_occupancy_ring(painter, rect.center(), ring_radius, shelf.occupancy, scale);
    paint_slots(painter, rect, shelf, scale);
}

fn paint_occupancy_ring(painter: &Painter, center: Pos2, radius: f32, ratio: f32, scale: f32) {
    let width = 2.0 * scale;
    painter.circle_stroke(center, radius, Stroke::new(width, colors::RING_TRACK));

    let ratio = ratio.clamp(0.0, 1.0);
    if ratio <= 0.0 {
        return;
    }
    let segments = ((32.0 * ratio).ceil() as usize).max(2);
    let start = -std::f32::consts::FRAC_PI_2;
    let sweep = std::f32::consts::TAU * ratio;
    let points = (0..=segments)
        .map(|i| {
            let angle = start + sweep * i as f32 / segments as f32;
            center + Vec2::angled(angle) * radius
        })
        .collect();
    painter.add(Shape::line(
        points,
        Stroke::new(width, colors::occupancy_color(ratio)),
    ));
}

fn paint_slots(painter: &Painter, rect: Rect, shelf: &ShelfVisual, scale: f32) {
    if shelf.slots.is_empty() {
        return;
    }
    let pad = 3.0 * scale;
    let gap = 2.0 * scale;
    // leave one slot width for the overflow count
    let columns = MAX_VISIBLE_SLOTS as f32 + 1.0;
    let width = (rect.width() - pad * 2.0 - gap * MAX_VISIBLE_SLOTS as f32) / columns;
    let size = Vec2::new(width.max(1.0), 4.0 * scale);
    let mut x = rect.left() + pad;
    let y = rect.bottom() - pad - size.y;

    for tint in &shelf.slots {
        let slot = Rect::from_min_size(Pos2::new(x, y), size);
        painter.rect_filled(slot, 1.0 * scale, colors::slot_tint_color(*tint));
        x += size.x + gap;
    }

    if shelf.overflow > 0 {
        painter.text(
            Pos2::new(x, y + size.y / 2.0),
            Align2::LEFT_CENTER,
            format!("+{}", shelf.overflow),
            FontId::proportional(LABEL_SIZE * 0.8 * scale),
            colors::CELL_LABEL,
        );
    }
}
