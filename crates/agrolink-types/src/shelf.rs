//! Shelf records returned by the shelves endpoint

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::CROWDED_BUSY_SCORE;

/// Kind of shelf. Closed set; unknown kinds fail decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShelfType {
    Warehouse,
    Picker,
    Delivery,
}

impl ShelfType {
    /// Query string value for the shelves endpoint
    pub fn as_str(&self) -> &'static str {
        match self {
            ShelfType::Warehouse => "warehouse",
            ShelfType::Picker => "picker",
            ShelfType::Delivery => "delivery",
        }
    }

    /// Display name for the HUD
    pub fn display_name(&self) -> &'static str {
        match self {
            ShelfType::Warehouse => "Warehouse",
            ShelfType::Picker => "Picker",
            ShelfType::Delivery => "Delivery",
        }
    }

    pub fn all() -> &'static [ShelfType] {
        &[ShelfType::Warehouse, ShelfType::Picker, ShelfType::Delivery]
    }
}

impl std::str::FromStr for ShelfType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "warehouse" => Ok(ShelfType::Warehouse),
            "picker" => Ok(ShelfType::Picker),
            "delivery" => Ok(ShelfType::Delivery),
            other => Err(format!("unknown shelf type '{}'", other)),
        }
    }
}

/// One storage slot on a shelf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotDto {
    pub slot_id: String,
    #[serde(default)]
    pub occupied: bool,
    /// Slot capacity (kg)
    #[serde(default)]
    pub capacity: f64,
    /// Remaining capacity (kg)
    #[serde(default)]
    pub remaining: f64,
}

/// One physical shelf.
///
/// `occupied_slots <= max_slots` and `current_weight_kg <= max_weight_kg` are
/// shown as-is; the board never corrects them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShelfDto {
    pub shelf_id: String,
    #[serde(rename = "type")]
    pub shelf_type: ShelfType,
    pub max_slots: u32,
    pub occupied_slots: u32,
    pub max_weight_kg: f64,
    pub current_weight_kg: f64,
    pub busy_score: f64,
    pub is_temporarily_avoid: bool,
    #[serde(default)]
    pub slots: Vec<SlotDto>,
    #[serde(default)]
    pub zone: Option<String>,
    #[serde(default)]
    pub aisle: Option<String>,
    #[serde(default)]
    pub last_task_ping_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl ShelfDto {
    pub fn is_crowded(&self) -> bool {
        self.busy_score >= CROWDED_BUSY_SCORE
    }

    /// Occupied fraction of slots, 0.0 when the shelf has no slots.
    pub fn slot_usage(&self) -> f32 {
        if self.max_slots == 0 {
            return 0.0;
        }
        self.occupied_slots as f32 / self.max_slots as f32
    }

    /// Loaded fraction of the weight limit, 0.0 when no limit is set.
    pub fn weight_usage(&self) -> f32 {
        if self.max_weight_kg <= 0.0 {
            return 0.0;
        }
        (self.current_weight_kg / self.max_weight_kg) as f32
    }
}
