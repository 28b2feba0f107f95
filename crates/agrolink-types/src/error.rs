use thiserror::Error;

/// Errors raised while ingesting backend payloads.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TypesError {
    /// Payload did not match the expected shape.
    #[error("Failed to decode {what}: {message}")]
    Decode { what: &'static str, message: String },

    /// World scale must be a positive, finite number.
    #[error("Invalid pixelsPerMeter: {0}")]
    InvalidScale(f64),

    /// Zone geometry or grid violates `width, height, rows, cols > 0` or
    /// exceeds [`crate::MAX_GRID_AXIS`] rows or cols.
    #[error("Invalid zone {zone_id}: {reason}")]
    InvalidZone { zone_id: String, reason: String },

    /// Two zones share an id.
    #[error("Duplicate zone id {0}")]
    DuplicateZone(String),

    /// Shelf busy score outside 0..=100.
    #[error("Shelf {shelf_id} has busy score {score} outside 0..=100")]
    BusyScoreOutOfRange { shelf_id: String, score: f64 },

    /// Shelf id is empty.
    #[error("Shelf with empty shelfId")]
    EmptyShelfId,
}
