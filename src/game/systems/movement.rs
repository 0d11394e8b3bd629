//! Tank movement: input to candidate position, collision gate, commit
//!
//! Facing, animation frame and trail placement are updated before the
//! collision gate and are deliberately not rolled back when the move is
//! rejected, so a blocked tank still turns toward where it tried to go.

use std::f32::consts::TAU;

use crate::config::GameConfig;
use crate::game::spatial::{ObjectKind, SpatialIndex};
use crate::game::state::{ClientSession, IdAllocator};
use crate::game::systems::tracks;
use crate::util::rect::Rect;
use crate::util::vec2::Vec2;

/// Normalize an angle into [0, 2*PI), rounded to five decimals
///
/// The rounding makes hull angles coming out of `atan2` match the eight
/// compass headings exactly, which the trail system relies on.
pub fn normalize_angle(angle: f32) -> f32 {
    let wrapped = (angle + TAU) % TAU;
    (wrapped * 100_000.0).round() / 100_000.0
}

/// Advance one tank by one tick of movement input
pub fn update(
    session: &mut ClientSession,
    index: &mut dyn SpatialIndex,
    ids: &mut IdAllocator,
    config: &GameConfig,
    now_ms: u64,
) {
    if let Some(aim) = session.input.aim_angle {
        session.tank.gun_angle = aim;
    }

    let input = session.input;
    let mut dx = 0.0;
    let mut dy = 0.0;
    if input.right {
        dx += config.tank_speed;
    }
    if input.left {
        dx -= config.tank_speed;
    }
    if input.down {
        dy += config.tank_speed;
    }
    if input.up {
        dy -= config.tank_speed;
    }

    // Diagonal movement covers the same distance per tick as axis-aligned
    if dx != 0.0 && dy != 0.0 {
        let diagonal = (config.tank_speed * config.tank_speed / 2.0).sqrt();
        dx = dx.signum() * diagonal;
        dy = dy.signum() * diagonal;
    }

    if input.boost {
        dx *= config.tank_boost_factor;
        dy *= config.tank_boost_factor;
    }

    // Bullets fired this tick inherit the carrier velocity
    session.tank.velocity = Vec2::new(dx, dy);

    let old = session.tank.position;
    let candidate = old + Vec2::new(dx, dy);
    if candidate == old {
        return;
    }

    session.tank.hull_angle = normalize_angle((candidate.y - old.y).atan2(candidate.x - old.x));
    session.tank.hull_frame = session.tank.hull_frame.wrapping_add(1);
    tracks::lay(&mut session.tank, candidate, index, ids, config, now_ms);

    // The move commits only into space holding no wall and no tank other
    // than this one (its own entry still sits at the old position)
    let probe = Rect::from_center(candidate, config.tank_width, config.tank_height);
    let hits = index.query_by_kinds(&[ObjectKind::Wall, ObjectKind::Tank], Some(probe));
    if hits.walls.is_empty() && hits.tanks.len() == 1 {
        session.tank.position = candidate;
        session.position = candidate;
        index.remove(session.tank.id);
        index.insert(session.tank.entry(config));
    }
}
