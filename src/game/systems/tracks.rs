//! Tread mark placement and expiry
//!
//! A moving tank leaves paired track segments behind its treads. Placement
//! is rate-limited per trail path; a world-wide sweep ages every track once
//! per tick and drops the ones past their lifetime.

use std::f32::consts::PI;

use crate::config::GameConfig;
use crate::game::constants::track::{DIAGONAL_ANCHOR_RATIO, STRAIGHT_ANCHOR_RATIO};
use crate::game::spatial::{EntryData, IndexEntry, ObjectKind, SpatialIndex};
use crate::game::state::{IdAllocator, Tank};
use crate::util::rect::Rect;
use crate::util::vec2::Vec2;

/// The eight headings a rounded hull angle can quantize to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Compass {
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
    North,
    NorthEast,
}

/// Map a normalized, five-decimal-rounded hull angle to its compass heading
///
/// Key movement always lands on one of these eight angles; anything else
/// (a tank that has not moved yet, or future analog input) matches nothing
/// and lays no tracks.
fn compass_heading(hull_angle: f32) -> Option<Compass> {
    const HEADINGS: [(f32, Compass); 8] = [
        (0.0, Compass::East),
        (PI / 4.0, Compass::SouthEast),
        (PI / 2.0, Compass::South),
        (3.0 * PI / 4.0, Compass::SouthWest),
        (PI, Compass::West),
        (5.0 * PI / 4.0, Compass::NorthWest),
        (3.0 * PI / 2.0, Compass::North),
        (7.0 * PI / 4.0, Compass::NorthEast),
    ];
    HEADINGS
        .iter()
        .find(|(angle, _)| (hull_angle - angle).abs() < 1e-4)
        .map(|&(_, heading)| heading)
}

/// Lay a pair of track segments behind a tank that just moved
///
/// The anchor offsets place each segment in line with a tread: one ratio of
/// half the tank width for axis-aligned headings, a larger one for diagonal
/// headings, so the marks stay under the wheels at any tank size.
pub fn lay(
    tank: &mut Tank,
    position: Vec2,
    index: &mut dyn SpatialIndex,
    ids: &mut IdAllocator,
    config: &GameConfig,
    now_ms: u64,
) {
    if let Some(last) = tank.path.last_laid_ms {
        if now_ms.saturating_sub(last) < config.track_delay_ms {
            return;
        }
    }
    let heading = match compass_heading(tank.hull_angle) {
        Some(heading) => heading,
        None => return,
    };
    tank.path.last_laid_ms = Some(now_ms);

    let s = STRAIGHT_ANCHOR_RATIO * config.tank_width / 2.0;
    let d = DIAGONAL_ANCHOR_RATIO * config.tank_width / 2.0;
    let (x, y) = (position.x, position.y);
    let (one, two) = match heading {
        Compass::East => (Vec2::new(x + s, y - s), Vec2::new(x + s, y + s)),
        Compass::SouthEast => (Vec2::new(x, y + d), Vec2::new(x + d, y)),
        Compass::South => (Vec2::new(x - s, y + s), Vec2::new(x + s, y + s)),
        Compass::SouthWest => (Vec2::new(x - d, y), Vec2::new(x, y + d)),
        Compass::West => (Vec2::new(x - s, y - s), Vec2::new(x - s, y + s)),
        Compass::NorthWest => (Vec2::new(x - d, y), Vec2::new(x, y - d)),
        Compass::North => (Vec2::new(x - s, y - s), Vec2::new(x + s, y - s)),
        Compass::NorthEast => (Vec2::new(x, y - d), Vec2::new(x + d, y)),
    };

    for anchor in [one, two] {
        index.insert(IndexEntry {
            id: ids.next_id(),
            rect: Rect::new(anchor.x, anchor.y, config.track_width, config.track_height),
            data: EntryData::Track {
                path: tank.path.id,
                angle: tank.hull_angle,
                age_ticks: 0,
            },
        });
    }
}

/// Age every track in the world by one sweep, expiring the old ones
///
/// Runs once per tick, independent of tank movement. Surviving tracks are
/// reinserted with the bumped counter; the index has no in-place update.
pub fn sweep(index: &mut dyn SpatialIndex, config: &GameConfig) {
    for mut entry in index.query_by_kinds(&[ObjectKind::Track], None).tracks {
        let expired = match &mut entry.data {
            EntryData::Track { age_ticks, .. } => {
                *age_ticks += 1;
                *age_ticks >= config.track_max_age
            }
            _ => continue,
        };
        if expired {
            index.remove(entry.id);
        } else {
            index.insert(entry);
        }
    }
}
