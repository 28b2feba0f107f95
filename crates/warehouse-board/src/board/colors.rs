//! Color palettes for the warehouse board
//!
//! Provides consistent colors for slot tints, busy levels, shelf types and
//! the canvas chrome.

use agrolink_types::ShelfType;
use egui::Color32;

use super::cell::{BusyLevel, SlotTint};

// =============================================================================
// SLOT TINTS
// =============================================================================

/// Fill color for a slot sub-rectangle
pub fn slot_tint_color(tint: SlotTint) -> Color32 {
    match tint {
        SlotTint::Free => Color32::from_rgb(76, 175, 80),     // Green
        SlotTint::Healthy => Color32::from_rgb(33, 150, 243), // Blue
        SlotTint::Warning => Color32::from_rgb(255, 193, 7),  // Amber
        SlotTint::Critical => Color32::from_rgb(244, 67, 54), // Red
    }
}

// =============================================================================
// BUSY LEVEL
// =============================================================================

/// Busy-score dot color
pub fn busy_color(level: BusyLevel) -> Color32 {
    match level {
        BusyLevel::Calm => Color32::from_rgb(139, 195, 74),   // Light green
        BusyLevel::Busy => Color32::from_rgb(255, 152, 0),    // Orange
        BusyLevel::Crowded => Color32::from_rgb(229, 57, 53), // Red
    }
}

// =============================================================================
// SHELF TYPE
// =============================================================================

/// Cell border color by shelf type
pub fn shelf_type_border(shelf_type: ShelfType) -> Color32 {
    match shelf_type {
        ShelfType::Warehouse => Color32::from_rgb(69, 90, 100), // Blue-gray dark
        ShelfType::Picker => Color32::from_rgb(0, 137, 123),    // Teal dark
        ShelfType::Delivery => Color32::from_rgb(142, 36, 170), // Purple
    }
}

// =============================================================================
// OCCUPANCY RING
// =============================================================================

/// Ring color by usage ratio (0.0 - 1.0)
pub fn occupancy_color(ratio: f32) -> Color32 {
    if ratio >= 0.9 {
        Color32::from_rgb(244, 67, 54)
    } else if ratio >= 0.6 {
        Color32::from_rgb(255, 193, 7)
    } else {
        Color32::from_rgb(76, 175, 80)
    }
}

pub const RING_TRACK: Color32 = Color32::from_rgb(224, 224, 224);
pub const AVOID_MARKER: Color32 = Color32::from_rgb(211, 47, 47);

// =============================================================================
// CANVAS CHROME
// =============================================================================

pub const CANVAS_BG: Color32 = Color32::from_rgb(245, 247, 250);
pub const ZONE_FILL: Color32 = Color32::from_rgb(255, 255, 255);
pub const ZONE_BORDER: Color32 = Color32::from_rgb(176, 190, 197);
pub const ZONE_TITLE: Color32 = Color32::from_rgb(38, 50, 56);
pub const AXIS_LABEL: Color32 = Color32::from_rgb(120, 144, 156);

pub const CELL_FILL: Color32 = Color32::from_rgb(250, 250, 250);
pub const CELL_EMPTY_FILL: Color32 = Color32::from_rgb(238, 238, 238);
pub const CELL_EMPTY_BORDER: Color32 = Color32::from_rgb(189, 189, 189);
pub const CELL_LABEL: Color32 = Color32::from_rgb(55, 71, 79);
pub const CELL_HOVER: Color32 = Color32::from_rgb(25, 118, 210);
