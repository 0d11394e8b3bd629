/// Arena dimensions and tick timing
pub mod world {
    /// Arena width in world units
    pub const WIDTH: f32 = 2000.0;
    /// Arena height in world units
    pub const HEIGHT: f32 = 2000.0;
    /// Server tick rate in Hz
    pub const TICK_RATE: u32 = 30;
    /// Tick duration in milliseconds
    pub const TICK_DURATION_MS: u64 = 1000 / TICK_RATE as u64;
}

/// Wall generation constants
pub mod wall {
    /// Thickness of the four border walls
    pub const THICKNESS: f32 = 20.0;
    /// Number of interior walls generated at game start
    pub const COUNT: usize = 20;
    /// Smallest side an interior wall can have
    pub const MIN_DIMENSION: f32 = 30.0;
    /// Largest side an interior wall can have
    /// The narrow side of each wall is drawn from a third of this range
    pub const MAX_DIMENSION: f32 = 300.0;
}

/// Tank movement and firing constants
pub mod tank {
    /// Movement speed in units per tick while a direction key is held
    pub const NORMAL_SPEED: f32 = 5.0;
    /// Speed multiplier while boosting
    pub const BOOST_FACTOR: f32 = 2.0;
    /// Tank sprite width (collision footprint)
    pub const WIDTH: f32 = 85.0;
    /// Tank sprite height (collision footprint)
    pub const HEIGHT: f32 = 85.0;
    /// Distance from tank center to the gun muzzle
    /// Bullets spawn here so they clear the hull
    pub const BARREL_LENGTH: f32 = 45.0;
    /// Minimum time between shots in milliseconds
    pub const FIRE_INTERVAL_MS: u64 = 400;
    /// Maximum ammunition a tank can hold
    pub const AMMO_CAPACITY: u32 = 10;
    /// Time to regain one unit of ammunition in milliseconds
    pub const AMMO_REGEN_MS: u64 = 1000;
}

/// Bullet constants
pub mod bullet {
    /// Bullet speed in units per tick (tank velocity is added on top)
    pub const SPEED: f32 = 10.0;
    /// Bullet collision width
    pub const WIDTH: f32 = 6.0;
    /// Bullet collision height
    pub const HEIGHT: f32 = 6.0;
    /// Bullet lifetime in milliseconds
    pub const TTL_MS: u64 = 5000;
}

/// Track (tread mark) constants
pub mod track {
    /// Minimum time between track placements per tank in milliseconds
    pub const DELAY_MS: u64 = 150;
    /// Sweeps a track survives before expiring
    pub const MAX_AGE_TICKS: u32 = 75;
    /// Track segment width
    pub const WIDTH: f32 = 16.0;
    /// Track segment height
    pub const HEIGHT: f32 = 16.0;
    /// Offset from tank center to each tread, as a fraction of half the
    /// tank width, when moving along an axis
    pub const STRAIGHT_ANCHOR_RATIO: f32 = 0.52941;
    /// Same fraction for diagonal movement
    pub const DIAGONAL_ANCHOR_RATIO: f32 = 0.75294;
}

/// Spawn search constants
pub mod spawn {
    /// Width of the clear area required around a spawn point
    pub const PROBE_WIDTH: f32 = 200.0;
    /// Height of the clear area required around a spawn point
    pub const PROBE_HEIGHT: f32 = 200.0;
    /// Maximum random probes before giving up on a spawn
    pub const MAX_ATTEMPTS: u32 = 64;
}

/// Session liveness constants
pub mod heartbeat {
    /// A session whose last heartbeat is older than this is evicted
    pub const TIMEOUT_MS: u64 = 10_000;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_duration() {
        assert_eq!(world::TICK_RATE, 30);
        assert_eq!(world::TICK_DURATION_MS, 33);
    }

    #[test]
    fn test_wall_dimension_ordering() {
        assert!(wall::MIN_DIMENSION < wall::MAX_DIMENSION);
        assert!(wall::MIN_DIMENSION < wall::MAX_DIMENSION / 3.0);
    }

    #[test]
    fn test_barrel_clears_hull() {
        // Bullets spawn at the muzzle, outside the tank footprint
        assert!(tank::BARREL_LENGTH > tank::WIDTH / 2.0);
    }

    #[test]
    fn test_spawn_probe_fits_tank() {
        assert!(spawn::PROBE_WIDTH > tank::WIDTH);
        assert!(spawn::PROBE_HEIGHT > tank::HEIGHT);
    }

    #[test]
    fn test_track_anchor_ratios() {
        assert!(track::STRAIGHT_ANCHOR_RATIO < track::DIAGONAL_ANCHOR_RATIO);
        assert!(track::DIAGONAL_ANCHOR_RATIO < 1.0);
    }
}
