//! Ammunition regeneration

use crate::config::GameConfig;
use crate::game::state::Tank;

/// Regain at most one unit of ammunition per qualifying interval
///
/// A tank far below capacity does not catch up faster; the grant timestamp
/// resets on every unit earned.
pub fn update(tank: &mut Tank, config: &GameConfig, now_ms: u64) {
    if tank.ammo >= config.ammo_capacity {
        return;
    }
    let due = match tank.last_ammo_ms {
        None => true,
        Some(last) => now_ms.saturating_sub(last) > config.ammo_regen_ms,
    };
    if due {
        tank.ammo += 1;
        tank.last_ammo_ms = Some(now_ms);
    }
}
