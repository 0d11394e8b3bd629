//! Bullet-tank hit resolution
//!
//! Every hostile bullet overlapping a tank this tick scores one kill for
//! its owner and eliminates the victim. The victim is notified and torn
//! down once even when several bullets connect on the same tick.

use tracing::debug;

use crate::config::GameConfig;
use crate::game::spatial::{EntryData, SpatialIndex};
use crate::game::state::ClientSession;

/// Resolve hits on the tank at `victim` against all current sessions
pub fn update(
    sessions: &mut [ClientSession],
    victim: usize,
    index: &mut dyn SpatialIndex,
    config: &GameConfig,
) {
    let footprint = sessions[victim].tank.bounds(config);
    let victim_id = sessions[victim].id;

    for entry in index.query_area(footprint) {
        let owner = match entry.data {
            EntryData::Bullet { owner } => owner,
            _ => continue,
        };
        // No self-damage
        if owner == victim_id {
            continue;
        }
        // A bullet whose owner already left scores for nobody
        let Some(owner_idx) = sessions.iter().position(|s| s.id == owner) else {
            continue;
        };

        sessions[owner_idx].tank.kills += 1;
        sessions[owner_idx].tank.bullets.retain(|b| b.id != entry.id);
        index.remove(entry.id);

        debug!(
            "{} destroyed {}",
            sessions[owner_idx].tank.name, sessions[victim].tank.name
        );
        sessions[victim].kill();
    }
}
