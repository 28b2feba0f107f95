//! Spatial index for cell hit testing
//!
//! Uses R-tree (via `rstar`) over content-space cell rectangles. Queries take
//! content-space points, so the index survives pan and zoom untouched and is
//! rebuilt only when the layout changes.

use rstar::{Envelope, PointDistance, RTree, RTreeObject, AABB};

use super::layout::{BoardLayout, CellAddress};

/// Index entry for one populated cell
#[derive(Debug, Clone)]
pub struct SpatialCell {
    pub address: CellAddress,
    pub shelf_id: String,
    bounds: AABB<[f32; 2]>,
}

impl SpatialCell {
    pub fn new(
        address: CellAddress,
        shelf_id: impl Into<String>,
        min: [f32; 2],
        max: [f32; 2],
    ) -> Self {
        Self {
            address,
            shelf_id: shelf_id.into(),
            bounds: AABB::from_corners(min, max),
        }
    }
}

impl RTreeObject for SpatialCell {
    type Envelope = AABB<[f32; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.bounds
    }
}

impl PointDistance for SpatialCell {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        self.bounds.distance_2(point)
    }

    fn contains_point(&self, point: &[f32; 2]) -> bool {
        self.bounds.contains_point(point)
    }
}

/// Hit index over the populated cells of a layout.
#[derive(Clone, Default)]
pub struct SpatialIndex {
    tree: RTree<SpatialCell>,
}

impl std::fmt::Debug for SpatialIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpatialIndex")
            .field("count", &self.tree.size())
            .finish_non_exhaustive()
    }
}

impl SpatialIndex {
    /// Index every cell that carries a shelf. Spacers and empty cells are not
    /// interactive and are left out.
    pub fn from_layout(layout: &BoardLayout) -> Self {
        let cells: Vec<_> = layout
            .cells()
            .filter_map(|cell| {
                let shelf_id = cell.shelf_id()?;
                Some(SpatialCell::new(
                    cell.address.clone(),
                    shelf_id,
                    [cell.rect.min.x, cell.rect.min.y],
                    [cell.rect.max.x, cell.rect.max.y],
                ))
            })
            .collect();
        Self {
            tree: RTree::bulk_load(cells),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Cell under a content-space point
    pub fn hit_test(&self, point: [f32; 2]) -> Option<&SpatialCell> {
        self.tree.locate_at_point(&point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::layout::{compute_layout, ShelfIndex};
    use agrolink_types::{ColLabels, ShelfDto, ShelfType, WorldSpec, WorldZone, ZoneGrid};
    use chrono::Utc;

    fn shelf(id: &str) -> ShelfDto {
        ShelfDto {
            shelf_id: id.into(),
            shelf_type: ShelfType::Picker,
            max_slots: 2,
            occupied_slots: 0,
            max_weight_kg: 10.0,
            current_weight_kg: 0.0,
            busy_score: 0.0,
            is_temporarily_avoid: false,
            slots: vec![],
            zone: None,
            aisle: None,
            last_task_ping_at: None,
            updated_at: Utc::now(),
        }
    }

    fn layout() -> BoardLayout {
        let world = WorldSpec {
            pixels_per_meter: 20.0,
            zones: vec![WorldZone {
                id: "A".into(),
                x: 0.0,
                y: 0.0,
                width: 20.0,
                height: 20.0,
                grid: ZoneGrid {
                    rows: 3,
                    cols: 3,
                    show_row_index: true,
                    show_col_index: true,
                    col_labels: ColLabels::Letters,
                    title_size: None,
                },
            }],
        };
        let (index, _) = ShelfIndex::build(&world, &[shelf("1A1"), shelf("3A3")]);
        compute_layout(&world, &index, false)
    }

    #[test]
    fn indexes_only_populated_cells() {
        let layout = layout();
        let index = SpatialIndex::from_layout(&layout);
        assert_eq!(index.len(), 2);
        assert_eq!(layout.cell_count(), 9);
    }

    #[test]
    fn hit_test_finds_cell_under_point() {
        let layout = layout();
        let index = SpatialIndex::from_layout(&layout);

        let rect = layout.cell_rect(&CellAddress::new("A", 3, 3)).unwrap();
        let hit = index.hit_test([rect.center().x, rect.center().y]).unwrap();
        assert_eq!(hit.shelf_id, "3A3");

        let empty = layout.cell_rect(&CellAddress::new("A", 2, 2)).unwrap();
        assert!(index.hit_test([empty.center().x, empty.center().y]).is_none());
    }
}
