//! Shelf filters driven by the HUD.

use agrolink_types::{ShelfDto, ShelfType};

/// Predicate over shelf records. Default matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShelfFilter {
    /// `None` means all types
    pub shelf_type: Option<ShelfType>,
    pub avoid_only: bool,
    pub crowded_only: bool,
}

impl ShelfFilter {
    pub fn matches(&self, shelf: &ShelfDto) -> bool {
        self.shelf_type.map_or(true, |t| shelf.shelf_type == t)
            && (!self.avoid_only || shelf.is_temporarily_avoid)
            && (!self.crowded_only || shelf.is_crowded())
    }

    /// Any active filter hides empty cells on the board.
    pub fn is_active(&self) -> bool {
        self.shelf_type.is_some() || self.avoid_only || self.crowded_only
    }

    pub fn apply(&self, shelves: &[ShelfDto]) -> Vec<ShelfDto> {
        shelves.iter().filter(|s| self.matches(s)).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn shelf(id: &str, shelf_type: ShelfType, busy_score: f64, avoid: bool) -> ShelfDto {
        ShelfDto {
            shelf_id: id.into(),
            shelf_type,
            max_slots: 1,
            occupied_slots: 0,
            max_weight_kg: 1.0,
            current_weight_kg: 0.0,
            busy_score,
            is_temporarily_avoid: avoid,
            slots: vec![],
            zone: None,
            aisle: None,
            last_task_ping_at: None,
            updated_at: Utc::now(),
        }
    }

    fn ids(shelves: &[ShelfDto]) -> Vec<&str> {
        shelves.iter().map(|s| s.shelf_id.as_str()).collect()
    }

    #[test]
    fn default_filter_keeps_all() {
        let shelves = vec![
            shelf("1A1", ShelfType::Warehouse, 10.0, false),
            shelf("1A2", ShelfType::Delivery, 90.0, true),
        ];
        let filter = ShelfFilter::default();
        assert!(!filter.is_active());
        assert_eq!(filter.apply(&shelves).len(), 2);
    }

    #[test]
    fn filters_combine() {
        let shelves = vec![
            shelf("1A1", ShelfType::Warehouse, 10.0, false),
            shelf("1A2", ShelfType::Warehouse, 70.0, true),
            shelf("1A3", ShelfType::Picker, 95.0, true),
            shelf("1A4", ShelfType::Warehouse, 69.9, true),
        ];

        let crowded = ShelfFilter {
            crowded_only: true,
            ..Default::default()
        };
        assert_eq!(ids(&crowded.apply(&shelves)), vec!["1A2", "1A3"]);

        let warehouse_avoid = ShelfFilter {
            shelf_type: Some(ShelfType::Warehouse),
            avoid_only: true,
            crowded_only: false,
        };
        assert!(warehouse_avoid.is_active());
        assert_eq!(ids(&warehouse_avoid.apply(&shelves)), vec!["1A2", "1A4"]);
    }
}
