//! World layout types
//!
//! A `WorldSpec` describes the physical floor plan of one logistics center in
//! meters. The board projects it into pixels with a single `pixelsPerMeter`
//! factor.

use serde::{Deserialize, Serialize};

/// Root configuration for the warehouse map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldSpec {
    pub pixels_per_meter: f64,
    #[serde(default)]
    pub zones: Vec<WorldZone>,
}

/// One rectangular area of the warehouse, in meters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldZone {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub grid: ZoneGrid,
}

/// Shelf grid drawn inside a zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneGrid {
    pub rows: u32,
    pub cols: u32,
    #[serde(default = "default_true")]
    pub show_row_index: bool,
    #[serde(default = "default_true")]
    pub show_col_index: bool,
    #[serde(default)]
    pub col_labels: ColLabels,
    /// Zone title font size in pixels
    #[serde(default)]
    pub title_size: Option<f32>,
}

fn default_true() -> bool {
    true
}

/// How column headers are labelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColLabels {
    #[default]
    Letters,
    Numbers,
}

impl ColLabels {
    /// Header text for a 1-based column.
    ///
    /// Letters run `A..Z`, then `AA, AB, ..` like spreadsheet columns.
    pub fn label(&self, col: u32) -> String {
        match self {
            ColLabels::Numbers => col.to_string(),
            ColLabels::Letters => {
                let mut n = col;
                let mut out = Vec::new();
                while n > 0 {
                    let rem = (n - 1) % 26;
                    out.push(b'A' + rem as u8);
                    n = (n - 1) / 26;
                }
                out.reverse();
                String::from_utf8(out).unwrap_or_default()
            }
        }
    }
}

impl WorldZone {
    /// Right edge in meters.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge in meters.
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

impl WorldSpec {
    /// World with no zones, rendered as a margin-only canvas.
    pub fn empty() -> Self {
        Self {
            pixels_per_meter: 20.0,
            zones: Vec::new(),
        }
    }

    /// Static layout used when a logistics center has no stored world.
    pub fn fallback() -> Self {
        let zone = |id: &str, x: f64, y: f64, width: f64, height: f64, rows: u32, cols: u32| {
            WorldZone {
                id: id.to_string(),
                x,
                y,
                width,
                height,
                grid: ZoneGrid {
                    rows,
                    cols,
                    show_row_index: true,
                    show_col_index: true,
                    col_labels: ColLabels::Letters,
                    title_size: None,
                },
            }
        };

        Self {
            pixels_per_meter: 20.0,
            zones: vec![
                zone("A", 0.0, 0.0, 24.0, 16.0, 4, 6),
                zone("B", 28.0, 0.0, 24.0, 16.0, 4, 6),
                zone("C", 0.0, 20.0, 52.0, 10.0, 2, 12),
            ],
        }
    }

    /// Find a zone by id.
    pub fn zone(&self, id: &str) -> Option<&WorldZone> {
        self.zones.iter().find(|z| z.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Validate;

    #[test]
    fn letters_wrap_like_spreadsheet_columns() {
        assert_eq!(ColLabels::Letters.label(1), "A");
        assert_eq!(ColLabels::Letters.label(26), "Z");
        assert_eq!(ColLabels::Letters.label(27), "AA");
        assert_eq!(ColLabels::Letters.label(53), "BA");
        assert_eq!(ColLabels::Numbers.label(12), "12");
    }

    #[test]
    fn grid_flags_default_on() {
        let grid: ZoneGrid = serde_json::from_str(r#"{ "rows": 2, "cols": 3 }"#).unwrap();
        assert!(grid.show_row_index);
        assert!(grid.show_col_index);
        assert_eq!(grid.col_labels, ColLabels::Letters);
        assert_eq!(grid.title_size, None);
    }

    #[test]
    fn fallback_world_is_valid() {
        let world = WorldSpec::fallback();
        assert!(world.validate().is_ok());
        assert!(world.zone("B").is_some());
        assert!(world.zone("Z").is_none());
    }
}
