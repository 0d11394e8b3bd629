//! Spawn point search
//!
//! Rejection sampling over random arena coordinates. A candidate is accepted
//! when the probe area around it holds no walls, tanks or bullets.

use rand::Rng;
use tracing::warn;

use crate::config::GameConfig;
use crate::game::spatial::{ObjectKind, SpatialIndex};
use crate::util::rect::Rect;
use crate::util::vec2::Vec2;

/// Find a clear spawn point, or None when the arena is too crowded
///
/// Bounded by `config.spawn_max_attempts` so a saturated arena fails the
/// join instead of stalling the tick loop.
pub fn find_spawn_point(
    index: &dyn SpatialIndex,
    config: &GameConfig,
    rng: &mut impl Rng,
) -> Option<Vec2> {
    for _ in 0..config.spawn_max_attempts {
        let candidate = Vec2::new(
            rng.gen_range(0.0..config.world_width).floor(),
            rng.gen_range(0.0..config.world_height).floor(),
        );
        let probe = Rect::from_center(candidate, config.spawn_probe_width, config.spawn_probe_height);
        let hits = index.query_by_kinds(
            &[ObjectKind::Bullet, ObjectKind::Wall, ObjectKind::Tank],
            Some(probe),
        );
        if hits.is_empty() {
            return Some(candidate);
        }
    }

    warn!(
        "No clear spawn area found after {} attempts",
        config.spawn_max_attempts
    );
    None
}
