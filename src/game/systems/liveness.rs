//! Heartbeat-based session eviction

use tracing::debug;

use crate::config::GameConfig;
use crate::game::state::ClientSession;

/// Evict the session when its heartbeat has lapsed
///
/// Returns true when the session was killed; the caller skips the rest of
/// its tick and reaps it afterwards.
pub fn evict_if_stale(session: &mut ClientSession, config: &GameConfig, now_ms: u64) -> bool {
    if session.last_heartbeat < now_ms.saturating_sub(config.heartbeat_timeout_ms) {
        debug!("Evicting {}: heartbeat lapsed", session.tank.name);
        session.kill();
        true
    } else {
        false
    }
}
