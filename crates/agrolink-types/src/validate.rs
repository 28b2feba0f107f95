//! Ingest validation.
//!
//! Payloads MUST be validated before they reach the layout engine. The layout
//! engine still clamps everything it computes, but it assumes positive zone
//! sizes and grid dimensions.

use std::collections::HashSet;

use crate::{ShelfDto, TypesError, WorldSpec, WorldZone, MAX_BUSY_SCORE, MAX_GRID_AXIS};

/// Trait for validatable types.
pub trait Validate {
    /// Validate the object, returning an error if invalid.
    fn validate(&self) -> Result<(), TypesError>;
}

impl Validate for WorldSpec {
    fn validate(&self) -> Result<(), TypesError> {
        if !self.pixels_per_meter.is_finite() || self.pixels_per_meter <= 0.0 {
            return Err(TypesError::InvalidScale(self.pixels_per_meter));
        }

        let mut seen = HashSet::new();
        for zone in &self.zones {
            zone.validate()?;
            if !seen.insert(zone.id.as_str()) {
                return Err(TypesError::DuplicateZone(zone.id.clone()));
            }
        }

        Ok(())
    }
}

impl Validate for WorldZone {
    fn validate(&self) -> Result<(), TypesError> {
        let invalid = |reason: &str| TypesError::InvalidZone {
            zone_id: self.id.clone(),
            reason: reason.to_string(),
        };

        if self.id.trim().is_empty() {
            return Err(invalid("empty id"));
        }
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(invalid("non-finite origin"));
        }
        if !(self.width.is_finite() && self.width > 0.0)
            || !(self.height.is_finite() && self.height > 0.0)
        {
            return Err(invalid("width and height must be > 0"));
        }
        if self.grid.rows == 0 || self.grid.cols == 0 {
            return Err(invalid("rows and cols must be > 0"));
        }
        if self.grid.rows > MAX_GRID_AXIS || self.grid.cols > MAX_GRID_AXIS {
            return Err(invalid(&format!(
                "rows and cols must be <= {}",
                MAX_GRID_AXIS
            )));
        }

        Ok(())
    }
}

impl Validate for ShelfDto {
    fn validate(&self) -> Result<(), TypesError> {
        if self.shelf_id.trim().is_empty() {
            return Err(TypesError::EmptyShelfId);
        }
        if !(0.0..=MAX_BUSY_SCORE).contains(&self.busy_score) {
            return Err(TypesError::BusyScoreOutOfRange {
                shelf_id: self.shelf_id.clone(),
                score: self.busy_score,
            });
        }
        Ok(())
    }
}
