//! Layout inspection CLI
//!
//! Runs the zone layout engine over a world JSON (and optionally a shelves
//! JSON) and prints what the board would draw.
//!
//! ```text
//! board-layout world.json --shelves shelves.json --type picker
//! ```

use std::path::PathBuf;

use agrolink_types::{decode_shelves, decode_world, ShelfDto, ShelfType, WorldSpec};
use anyhow::{Context, Result};
use clap::Parser;
use warehouse_board::board::layout::CellFill;
use warehouse_board::{compute_layout, ShelfFilter, ShelfIndex};

#[derive(Parser, Debug)]
#[command(name = "board-layout")]
#[command(about = "Print the pixel layout of a warehouse world")]
struct Args {
    /// World JSON (WorldSpec); "-" or omitted uses the built-in fallback world
    world: Option<PathBuf>,

    /// Shelves JSON (array of ShelfDTO)
    #[arg(long, short = 's')]
    shelves: Option<PathBuf>,

    /// Only count shelves of this type (warehouse, picker, delivery)
    #[arg(long = "type", short = 't')]
    shelf_type: Option<ShelfType>,

    /// Only avoid-flagged shelves
    #[arg(long)]
    avoid_only: bool,

    /// Only crowded shelves (busy score >= 70)
    #[arg(long)]
    crowded_only: bool,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    agrolink::logging::init();

    let args = Args::parse();

    let world = load_world(args.world.as_ref())?;
    let shelves = match &args.shelves {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            decode_shelves(&text).with_context(|| format!("decoding {}", path.display()))?
        }
        None => Vec::new(),
    };

    let filter = ShelfFilter {
        shelf_type: args.shelf_type,
        avoid_only: args.avoid_only,
        crowded_only: args.crowded_only,
    };
    print_layout(&world, &filter.apply(&shelves), filter.is_active());
    Ok(())
}

fn load_world(path: Option<&PathBuf>) -> Result<WorldSpec> {
    match path {
        Some(path) if path.as_os_str() != "-" => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            decode_world(&text).with_context(|| format!("decoding {}", path.display()))
        }
        _ => Ok(WorldSpec::fallback()),
    }
}

fn print_layout(world: &WorldSpec, shelves: &[ShelfDto], hide_nulls: bool) {
    let (index, unplaced) = ShelfIndex::build(world, shelves);
    let layout = compute_layout(world, &index, hide_nulls);

    println!(
        "canvas {:.0} x {:.0} px ({} px/m)",
        layout.canvas.x, layout.canvas.y, world.pixels_per_meter
    );

    for zone in &layout.zones {
        let populated = zone
            .cells
            .iter()
            .filter(|c| matches!(c.fill, CellFill::Shelf(_)))
            .count();
        println!(
            "zone {:<4} box ({:.0},{:.0}) {:.0}x{:.0}  grid {}x{}  cell {:.0}x{:.0}  shelves {}/{}",
            zone.zone_id,
            zone.rect.min.x,
            zone.rect.min.y,
            zone.rect.width(),
            zone.rect.height(),
            zone.rows,
            zone.cols,
            zone.cell_size.x,
            zone.cell_size.y,
            populated,
            zone.cells.len(),
        );
    }

    if !unplaced.is_empty() {
        println!("unplaced shelves: {}", unplaced.len());
        for shelf in &unplaced {
            println!("  {:?}", shelf);
        }
    }
}
