//! Wall generation at game start
//!
//! Four border walls enclose the arena; a configured number of interior
//! walls is scattered at random. Walls exist only as index entries.

use rand::Rng;
use tracing::info;

use crate::config::GameConfig;
use crate::game::spatial::{EntryData, IndexEntry, SpatialIndex};
use crate::game::state::IdAllocator;
use crate::util::rect::Rect;

/// Generate border and interior walls and insert them into the index
///
/// Not guarded against re-invocation: calling this twice duplicates every
/// wall.
pub fn generate(
    index: &mut dyn SpatialIndex,
    ids: &mut IdAllocator,
    config: &GameConfig,
    rng: &mut impl Rng,
) {
    let t = config.wall_thickness;
    let (w, h) = (config.world_width, config.world_height);

    // Border walls: left and right run the full height, top and bottom
    // fill the remaining span between them
    let borders = [
        Rect::new(0.0, 0.0, t, h),
        Rect::new(t, 0.0, w - 2.0 * t, t),
        Rect::new(w - t, 0.0, t, h),
        Rect::new(t, h - t, w - 2.0 * t, t),
    ];
    for rect in borders {
        index.insert(IndexEntry {
            id: ids.next_id(),
            rect,
            data: EntryData::Wall,
        });
    }

    for i in 0..config.wall_count {
        let x = rng.gen_range(0.0..w).floor();
        let y = rng.gen_range(0.0..h).floor();

        // Alternate between tall-narrow and wide-short walls so the arena
        // reads as corridors rather than scattered squares
        let (wall_w, wall_h) = if i % 2 == 0 {
            (
                rng.gen_range(0.0..config.wall_max_dimension / 3.0)
                    .floor()
                    .max(config.wall_min_dimension),
                rng.gen_range(0.0..config.wall_max_dimension)
                    .floor()
                    .max(config.wall_min_dimension),
            )
        } else {
            (
                rng.gen_range(0.0..config.wall_max_dimension)
                    .floor()
                    .max(config.wall_min_dimension),
                rng.gen_range(0.0..config.wall_max_dimension / 3.0)
                    .floor()
                    .max(config.wall_min_dimension),
            )
        };

        // Clamp to the arena so walls never extend past the far edges
        let rect = Rect::new(x, y, wall_w.min(w - x), wall_h.min(h - y));
        index.insert(IndexEntry {
            id: ids.next_id(),
            rect,
            data: EntryData::Wall,
        });
    }

    info!(
        "Generated {} walls in {}x{} arena",
        config.wall_count + 4,
        w,
        h
    );
}
