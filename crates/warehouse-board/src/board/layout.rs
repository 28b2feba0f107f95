//! Zone layout engine
//!
//! Projects a `WorldSpec` (meters) into content-space pixel boxes: one box per
//! zone and one clamped cell per grid position. Pure; the renderer and the
//! hit index consume its output.
//!
//! ```text
//! ┌ zone box ─────────────────────────────┐
//! │ pad                                   │
//! │     Title                             │  ← title band (titleSize + gap)
//! │          A     B     C                │  ← column gutter
//! │     1  ┌───┐ ┌───┐ ┌───┐              │
//! │        └───┘ └───┘ └───┘              │  ← grid centered in inner area
//! │     2  ┌───┐ ┌───┐ ┌───┐              │
//! │        └───┘ └───┘ └───┘              │
//! └───────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::OnceLock;

use agrolink_types::{ShelfDto, WorldSpec, WorldZone, MAX_GRID_AXIS};
use egui::{Pos2, Rect, Vec2};
use regex::Regex;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Extra space right/below the furthest zone so nothing clips at the edge.
pub const CANVAS_MARGIN: f32 = 240.0;

/// Padding inside a zone box.
pub const ZONE_PADDING: f32 = 10.0;

/// Width reserved for row numbers when `showRowIndex` is on.
pub const ROW_GUTTER: f32 = 22.0;

/// Height reserved for column headers when `showColIndex` is on.
pub const COL_GUTTER: f32 = 18.0;

/// Zone title size when the grid does not set one.
pub const DEFAULT_TITLE_SIZE: f32 = 14.0;

/// Space between the title and the grid area.
pub const TITLE_GAP: f32 = 6.0;

/// Gap between neighbouring cells.
pub const CELL_GAP: f32 = 6.0;

pub const CELL_MIN_WIDTH: f32 = 34.0;
pub const CELL_MAX_WIDTH: f32 = 72.0;
pub const CELL_MIN_HEIGHT: f32 = 30.0;
pub const CELL_MAX_HEIGHT: f32 = 68.0;

/// Project meters into pixels.
pub fn px(meters: f64, pixels_per_meter: f64) -> f32 {
    (meters * pixels_per_meter).round() as f32
}

/// Zone-scoped lookup key for a grid position.
pub fn lookup_key(row: u32, col: u32) -> String {
    format!("{}-{}", row, col)
}

// =============================================================================
// CELL ADDRESS
// =============================================================================

/// 1-based grid position inside a zone.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CellAddress {
    pub zone_id: String,
    pub row: u32,
    pub col: u32,
}

impl CellAddress {
    pub fn new(zone_id: impl Into<String>, row: u32, col: u32) -> Self {
        Self {
            zone_id: zone_id.into(),
            row,
            col,
        }
    }

    /// Display key, e.g. `1A1`.
    pub fn label(&self) -> String {
        format!("{}{}{}", self.row, self.zone_id, self.col)
    }

    /// Key into the zone-scoped shelf map, e.g. `1-1`.
    pub fn lookup_key(&self) -> String {
        lookup_key(self.row, self.col)
    }
}

// =============================================================================
// SHELF INDEX
// =============================================================================

/// Shelves grouped by zone, keyed by `"{row}-{col}"`.
///
/// Shelves are placed by parsing their id as `<row><zoneId><col>`.
#[derive(Debug, Clone, Default)]
pub struct ShelfIndex {
    by_zone: HashMap<String, HashMap<String, ShelfDto>>,
    by_id: HashMap<String, CellAddress>,
}

/// Why a shelf could not be placed on the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unplaced {
    /// Id is not `<row><zoneId><col>`.
    BadId(String),
    /// Id names a zone the world does not have.
    UnknownZone(String),
    /// Row or column outside the zone grid.
    OutOfGrid(String),
}

impl ShelfIndex {
    /// Place every shelf onto the world's grids.
    ///
    /// Returns the index plus the shelves that could not be placed.
    pub fn build(world: &WorldSpec, shelves: &[ShelfDto]) -> (Self, Vec<Unplaced>) {
        let mut index = Self::default();
        let mut unplaced = Vec::new();

        for shelf in shelves {
            let Some(address) = parse_shelf_id(&shelf.shelf_id, world) else {
                unplaced.push(Unplaced::BadId(shelf.shelf_id.clone()));
                continue;
            };
            let Some(zone) = world.zone(&address.zone_id) else {
                unplaced.push(Unplaced::UnknownZone(shelf.shelf_id.clone()));
                continue;
            };
            if address.row == 0
                || address.col == 0
                || address.row > zone.grid.rows
                || address.col > zone.grid.cols
            {
                unplaced.push(Unplaced::OutOfGrid(shelf.shelf_id.clone()));
                continue;
            }

            let previous = index
                .by_zone
                .entry(address.zone_id.clone())
                .or_default()
                .insert(address.lookup_key(), shelf.clone());
            if let Some(previous) = previous {
                tracing::warn!(
                    "shelf {} replaces {} at {}",
                    shelf.shelf_id,
                    previous.shelf_id,
                    address.label()
                );
                index.by_id.remove(&previous.shelf_id);
            }
            index.by_id.insert(shelf.shelf_id.clone(), address);
        }

        if !unplaced.is_empty() {
            tracing::warn!("{} shelves could not be placed on the map", unplaced.len());
        }

        (index, unplaced)
    }

    /// Shelf at a grid position, if any.
    pub fn get(&self, zone_id: &str, key: &str) -> Option<&ShelfDto> {
        self.by_zone.get(zone_id).and_then(|zone| zone.get(key))
    }

    pub fn at(&self, address: &CellAddress) -> Option<&ShelfDto> {
        self.get(&address.zone_id, &address.lookup_key())
    }

    /// Grid position of a shelf id (case-insensitive).
    pub fn locate(&self, shelf_id: &str) -> Option<&CellAddress> {
        let wanted = shelf_id.trim();
        self.by_id.get(wanted).or_else(|| {
            self.by_id
                .iter()
                .find(|(id, _)| id.eq_ignore_ascii_case(wanted))
                .map(|(_, address)| address)
        })
    }

    pub fn shelf(&self, shelf_id: &str) -> Option<&ShelfDto> {
        self.locate(shelf_id).and_then(|address| self.at(address))
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Parse `<row><zoneId><col>` against the world's zone ids.
///
/// Zone ids may themselves end in digits, so known ids are matched first;
/// the generic pattern is the fallback.
fn parse_shelf_id(shelf_id: &str, world: &WorldSpec) -> Option<CellAddress> {
    let id = shelf_id.trim();
    let row_end = id.find(|c: char| !c.is_ascii_digit())?;
    let (row_str, rest) = id.split_at(row_end);
    let row: u32 = row_str.parse().ok()?;

    let mut zones: Vec<&WorldZone> = world.zones.iter().collect();
    zones.sort_by_key(|z| std::cmp::Reverse(z.id.len()));
    for zone in zones {
        if let Some(col_str) = strip_prefix_ignore_case(rest, &zone.id) {
            if let Ok(col) = col_str.parse::<u32>() {
                return Some(CellAddress::new(zone.id.clone(), row, col));
            }
        }
    }

    static SHELF_ID: OnceLock<Regex> = OnceLock::new();
    let pattern = SHELF_ID.get_or_init(|| {
        Regex::new(r"^(\d+)(.+?)(\d+)$").expect("shelf id pattern is valid")
    });
    let caps = pattern.captures(id)?;
    Some(CellAddress::new(
        caps[2].to_string(),
        caps[1].parse().ok()?,
        caps[3].parse().ok()?,
    ))
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    if s.len() >= prefix.len()
        && s.is_char_boundary(prefix.len())
        && s[..prefix.len()].eq_ignore_ascii_case(prefix)
    {
        Some(&s[prefix.len()..])
    } else {
        None
    }
}

// =============================================================================
// LAYOUT OUTPUT
// =============================================================================

/// What a grid slot shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellFill {
    /// Bound to a shelf.
    Shelf(String),
    /// No shelf; rendered with the empty-state look.
    Empty,
    /// No shelf while filters are active; invisible, same size.
    Spacer,
}

/// One positioned grid cell.
#[derive(Debug, Clone)]
pub struct CellLayout {
    pub address: CellAddress,
    /// Content-space rectangle
    pub rect: Rect,
    pub fill: CellFill,
}

impl CellLayout {
    pub fn shelf_id(&self) -> Option<&str> {
        match &self.fill {
            CellFill::Shelf(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.fill != CellFill::Spacer
    }
}

/// Axis label anchored at a content-space point.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisLabel {
    pub pos: Pos2,
    pub text: String,
}

/// One positioned zone.
#[derive(Debug, Clone)]
pub struct ZoneLayout {
    pub zone_id: String,
    /// Zone box before padding
    pub rect: Rect,
    /// Drawing area after padding and gutters
    pub inner: Rect,
    pub title_pos: Pos2,
    pub title_size: f32,
    pub rows: u32,
    pub cols: u32,
    /// Clamped cell size
    pub cell_size: Vec2,
    /// Top-left of the (centered) grid
    pub grid_origin: Pos2,
    pub row_labels: Vec<AxisLabel>,
    pub col_labels: Vec<AxisLabel>,
    pub cells: Vec<CellLayout>,
}

impl ZoneLayout {
    /// Content-space rectangle of a 1-based cell.
    pub fn cell_rect(&self, row: u32, col: u32) -> Option<Rect> {
        if row == 0 || col == 0 || row > self.rows || col > self.cols {
            return None;
        }
        let min = self.grid_origin
            + Vec2::new(
                (col - 1) as f32 * (self.cell_size.x + CELL_GAP),
                (row - 1) as f32 * (self.cell_size.y + CELL_GAP),
            );
        Some(Rect::from_min_size(min, self.cell_size))
    }

    /// Bounds of the grid itself (may extend past `rect` when clamped up).
    pub fn grid_rect(&self) -> Rect {
        let extent = grid_extent(self.cell_size, self.rows, self.cols);
        Rect::from_min_size(self.grid_origin, extent)
    }
}

/// Full board layout in content space.
#[derive(Debug, Clone)]
pub struct BoardLayout {
    /// Canvas size including margin
    pub canvas: Vec2,
    pub zones: Vec<ZoneLayout>,
}

impl Default for BoardLayout {
    fn default() -> Self {
        Self {
            canvas: Vec2::splat(CANVAS_MARGIN),
            zones: Vec::new(),
        }
    }
}

impl BoardLayout {
    pub fn zone(&self, zone_id: &str) -> Option<&ZoneLayout> {
        self.zones.iter().find(|z| z.zone_id == zone_id)
    }

    /// Content-space rectangle of an addressed cell.
    pub fn cell_rect(&self, address: &CellAddress) -> Option<Rect> {
        self.zone(&address.zone_id)
            .and_then(|z| z.cell_rect(address.row, address.col))
    }

    pub fn cells(&self) -> impl Iterator<Item = &CellLayout> {
        self.zones.iter().flat_map(|z| z.cells.iter())
    }

    pub fn cell_count(&self) -> usize {
        self.zones.iter().map(|z| z.cells.len()).sum()
    }
}

// =============================================================================
// LAYOUT ENGINE
// =============================================================================

/// Canvas size for a world: furthest zone edge, projected, plus margin.
pub fn canvas_size(world: &WorldSpec) -> Vec2 {
    let ppm = world.pixels_per_meter;
    let max_x = world
        .zones
        .iter()
        .map(|z| px(z.right(), ppm))
        .fold(0.0_f32, f32::max)
        .max(0.0);
    let max_y = world
        .zones
        .iter()
        .map(|z| px(z.bottom(), ppm))
        .fold(0.0_f32, f32::max)
        .max(0.0);
    Vec2::new(max_x + CANVAS_MARGIN, max_y + CANVAS_MARGIN)
}

/// Candidate cell length for `n` cells in `available` pixels, clamped.
pub fn clamp_cell_length(available: f32, n: u32, min: f32, max: f32) -> f32 {
    let n = n.max(1) as f32;
    let candidate = (available.max(0.0) - CELL_GAP * (n - 1.0)) / n;
    if candidate.is_finite() {
        candidate.clamp(min, max)
    } else {
        min
    }
}

fn grid_extent(cell: Vec2, rows: u32, cols: u32) -> Vec2 {
    let rows = rows.max(1) as f32;
    let cols = cols.max(1) as f32;
    Vec2::new(
        cols * cell.x + CELL_GAP * (cols - 1.0),
        rows * cell.y + CELL_GAP * (rows - 1.0),
    )
}

/// Lay out a single zone.
pub fn layout_zone(
    zone: &WorldZone,
    pixels_per_meter: f64,
    shelves: &ShelfIndex,
    hide_nulls: bool,
) -> ZoneLayout {
    let grid = &zone.grid;
    let rows = grid.rows.min(MAX_GRID_AXIS);
    let cols = grid.cols.min(MAX_GRID_AXIS);
    if rows != grid.rows || cols != grid.cols {
        tracing::warn!(
            zone_id = %zone.id,
            rows = grid.rows,
            cols = grid.cols,
            "zone grid truncated to {} per axis",
            MAX_GRID_AXIS
        );
    }
    let rect = Rect::from_min_size(
        Pos2::new(px(zone.x, pixels_per_meter), px(zone.y, pixels_per_meter)),
        Vec2::new(
            px(zone.width, pixels_per_meter).max(0.0),
            px(zone.height, pixels_per_meter).max(0.0),
        ),
    );

    let title_size = grid.title_size.unwrap_or(DEFAULT_TITLE_SIZE).clamp(8.0, 48.0);
    let left_gutter = if grid.show_row_index { ROW_GUTTER } else { 0.0 };
    let top_gutter = if grid.show_col_index { COL_GUTTER } else { 0.0 };

    let inner_min = rect.min
        + Vec2::new(
            ZONE_PADDING + left_gutter,
            ZONE_PADDING + title_size + TITLE_GAP + top_gutter,
        );
    let inner_size = Vec2::new(
        (rect.max.x - ZONE_PADDING - inner_min.x).max(0.0),
        (rect.max.y - ZONE_PADDING - inner_min.y).max(0.0),
    );
    let inner = Rect::from_min_size(inner_min, inner_size);

    let cell_size = Vec2::new(
        clamp_cell_length(inner_size.x, cols, CELL_MIN_WIDTH, CELL_MAX_WIDTH),
        clamp_cell_length(inner_size.y, rows, CELL_MIN_HEIGHT, CELL_MAX_HEIGHT),
    );
    let extent = grid_extent(cell_size, rows, cols);
    let grid_origin = inner_min
        + Vec2::new(
            ((inner_size.x - extent.x) / 2.0).max(0.0),
            ((inner_size.y - extent.y) / 2.0).max(0.0),
        );

    let mut layout = ZoneLayout {
        zone_id: zone.id.clone(),
        rect,
        inner,
        title_pos: rect.min + Vec2::splat(ZONE_PADDING),
        title_size,
        rows,
        cols,
        cell_size,
        grid_origin,
        row_labels: Vec::new(),
        col_labels: Vec::new(),
        cells: Vec::with_capacity(rows as usize * cols as usize),
    };

    if grid.show_row_index {
        for row in 1..=rows {
            let y =
                grid_origin.y + (row - 1) as f32 * (cell_size.y + CELL_GAP) + cell_size.y / 2.0;
            layout.row_labels.push(AxisLabel {
                pos: Pos2::new(grid_origin.x - ROW_GUTTER / 2.0, y),
                text: row.to_string(),
            });
        }
    }
    if grid.show_col_index {
        for col in 1..=cols {
            let x =
                grid_origin.x + (col - 1) as f32 * (cell_size.x + CELL_GAP) + cell_size.x / 2.0;
            layout.col_labels.push(AxisLabel {
                pos: Pos2::new(x, grid_origin.y - COL_GUTTER / 2.0),
                text: grid.col_labels.label(col),
            });
        }
    }

    for row in 1..=rows {
        for col in 1..=cols {
            let address = CellAddress::new(zone.id.clone(), row, col);
            let fill = match shelves.at(&address) {
                Some(shelf) => CellFill::Shelf(shelf.shelf_id.clone()),
                None if hide_nulls => CellFill::Spacer,
                None => CellFill::Empty,
            };
            if let Some(rect) = layout.cell_rect(row, col) {
                layout.cells.push(CellLayout { address, rect, fill });
            }
        }
    }

    layout
}

/// Lay out the whole world.
pub fn compute_layout(world: &WorldSpec, shelves: &ShelfIndex, hide_nulls: bool) -> BoardLayout {
    let zones: Vec<ZoneLayout> = world
        .zones
        .iter()
        .map(|zone| layout_zone(zone, world.pixels_per_meter, shelves, hide_nulls))
        .collect();

    tracing::debug!(
        "layout: {} zones, {} cells, hide_nulls={}",
        zones.len(),
        zones.iter().map(|z| z.cells.len()).sum::<usize>(),
        hide_nulls
    );

    BoardLayout {
        canvas: canvas_size(world),
        zones,
    }
}
