//! Shared API Types for the AgroLink warehouse board
//!
//! This crate owns every type that crosses the board's boundaries:
//!
//! ```text
//! ┌──────────────────┐  JSON   ┌──────────────────┐  events  ┌──────────────┐
//! │  Logistics API   │ ──────► │  warehouse-board │ ◄──────► │  HUD / page  │
//! └──────────────────┘         └──────────────────┘          └──────────────┘
//! ```
//!
//! ## Rules
//!
//! 1. Backend payloads decode into closed, explicit types (no `Value` passthrough)
//! 2. Every decoded payload is validated before it reaches the layout engine
//! 3. Decode and validation failures surface as [`TypesError`], never as defaults

mod error;
pub mod events;
pub mod shelf;
mod validate;
pub mod world;

pub use error::TypesError;
pub use events::{
    BoardEvent, ControlKind, FocusRequest, EVENT_CONTROL, EVENT_FOCUS, EVENT_GOTO_SHELF,
};
pub use shelf::{ShelfDto, ShelfType, SlotDto};
pub use validate::Validate;
pub use world::{ColLabels, WorldSpec, WorldZone, ZoneGrid};

/// Upper bound of a shelf busy score.
pub const MAX_BUSY_SCORE: f64 = 100.0;

/// Busy score at or above which a shelf counts as crowded.
pub const CROWDED_BUSY_SCORE: f64 = 70.0;

/// Upper bound on zone grid rows and on zone grid cols
pub const MAX_GRID_AXIS: u32 = 1000;

// =============================================================================
// DECODING
// =============================================================================

/// Decode and validate a world layout from a JSON document.
pub fn decode_world(json: &str) -> Result<WorldSpec, TypesError> {
    let world: WorldSpec = serde_json::from_str(json).map_err(|e| TypesError::Decode {
        what: "world",
        message: e.to_string(),
    })?;
    world.validate()?;
    Ok(world)
}

/// Decode and validate a shelf list from a JSON document.
pub fn decode_shelves(json: &str) -> Result<Vec<ShelfDto>, TypesError> {
    let shelves: Vec<ShelfDto> = serde_json::from_str(json).map_err(|e| TypesError::Decode {
        what: "shelves",
        message: e.to_string(),
    })?;
    for shelf in &shelves {
        shelf.validate()?;
    }
    Ok(shelves)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_world_rejects_zero_sized_zone() {
        let json = r#"{
            "pixelsPerMeter": 20,
            "zones": [{ "id": "A", "x": 0, "y": 0, "width": 0, "height": 10,
                        "grid": { "rows": 5, "cols": 5 } }]
        }"#;

        let err = decode_world(json).unwrap_err();
        assert!(matches!(err, TypesError::InvalidZone { .. }));
    }

    #[test]
    fn decode_world_reports_malformed_json() {
        let err = decode_world("{ \"zones\": 3 }").unwrap_err();
        assert!(matches!(err, TypesError::Decode { what: "world", .. }));
    }

    #[test]
    fn decode_shelves_rejects_unknown_type() {
        let json = r#"[{
            "shelfId": "1A1", "type": "freezer", "maxSlots": 4, "occupiedSlots": 1,
            "maxWeightKg": 100, "currentWeightKg": 20, "busyScore": 10,
            "isTemporarilyAvoid": false, "updatedAt": "2026-10-01T08:00:00Z"
        }]"#;

        let err = decode_shelves(json).unwrap_err();
        assert!(err.to_string().contains("shelves"));
    }

    #[test]
    fn decode_shelves_accepts_minimal_record() {
        let json = r#"[{
            "shelfId": "1A1", "type": "picker", "maxSlots": 4, "occupiedSlots": 1,
            "maxWeightKg": 100, "currentWeightKg": 20, "busyScore": 10,
            "isTemporarilyAvoid": false, "updatedAt": "2026-10-01T08:00:00Z"
        }]"#;

        let shelves = decode_shelves(json).expect("decode");
        assert_eq!(shelves.len(), 1);
        assert_eq!(shelves[0].shelf_type, ShelfType::Picker);
        assert!(shelves[0].slots.is_empty());
    }
}
