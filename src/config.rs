use crate::game::constants::{bullet, heartbeat, spawn, tank, track, wall, world};

/// Simulation configuration
///
/// Defaults come from `game::constants`; a subset can be overridden through
/// environment variables. The simulation treats these as fixed once loaded.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Arena width in world units
    pub world_width: f32,
    /// Arena height in world units
    pub world_height: f32,
    /// Border wall thickness
    pub wall_thickness: f32,
    /// Number of interior walls generated at game start
    pub wall_count: usize,
    /// Smallest side an interior wall can have
    pub wall_min_dimension: f32,
    /// Largest side an interior wall can have
    pub wall_max_dimension: f32,
    /// Tank speed in units per tick
    pub tank_speed: f32,
    /// Speed multiplier while boosting
    pub tank_boost_factor: f32,
    /// Tank collision width
    pub tank_width: f32,
    /// Tank collision height
    pub tank_height: f32,
    /// Distance from tank center to the gun muzzle
    pub tank_barrel_length: f32,
    /// Minimum time between shots in milliseconds
    pub fire_interval_ms: u64,
    /// Maximum ammunition a tank can hold
    pub ammo_capacity: u32,
    /// Time to regain one unit of ammunition in milliseconds
    pub ammo_regen_ms: u64,
    /// Bullet speed in units per tick
    pub bullet_speed: f32,
    /// Bullet collision width
    pub bullet_width: f32,
    /// Bullet collision height
    pub bullet_height: f32,
    /// Bullet lifetime in milliseconds
    pub bullet_ttl_ms: u64,
    /// Sessions with a heartbeat older than this are evicted
    pub heartbeat_timeout_ms: u64,
    /// Width of the clear area required around a spawn point
    pub spawn_probe_width: f32,
    /// Height of the clear area required around a spawn point
    pub spawn_probe_height: f32,
    /// Maximum random probes before a spawn search gives up
    pub spawn_max_attempts: u32,
    /// Minimum time between track placements per tank in milliseconds
    pub track_delay_ms: u64,
    /// Sweeps a track survives before expiring
    pub track_max_age: u32,
    /// Track segment width
    pub track_width: f32,
    /// Track segment height
    pub track_height: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            world_width: world::WIDTH,
            world_height: world::HEIGHT,
            wall_thickness: wall::THICKNESS,
            wall_count: wall::COUNT,
            wall_min_dimension: wall::MIN_DIMENSION,
            wall_max_dimension: wall::MAX_DIMENSION,
            tank_speed: tank::NORMAL_SPEED,
            tank_boost_factor: tank::BOOST_FACTOR,
            tank_width: tank::WIDTH,
            tank_height: tank::HEIGHT,
            tank_barrel_length: tank::BARREL_LENGTH,
            fire_interval_ms: tank::FIRE_INTERVAL_MS,
            ammo_capacity: tank::AMMO_CAPACITY,
            ammo_regen_ms: tank::AMMO_REGEN_MS,
            bullet_speed: bullet::SPEED,
            bullet_width: bullet::WIDTH,
            bullet_height: bullet::HEIGHT,
            bullet_ttl_ms: bullet::TTL_MS,
            heartbeat_timeout_ms: heartbeat::TIMEOUT_MS,
            spawn_probe_width: spawn::PROBE_WIDTH,
            spawn_probe_height: spawn::PROBE_HEIGHT,
            spawn_max_attempts: spawn::MAX_ATTEMPTS,
            track_delay_ms: track::DELAY_MS,
            track_max_age: track::MAX_AGE_TICKS,
            track_width: track::WIDTH,
            track_height: track::HEIGHT,
        }
    }
}

impl GameConfig {
    /// Load config from environment or use defaults
    pub fn load_or_default() -> Self {
        let mut config = Self::default();

        if let Ok(width) = std::env::var("WORLD_WIDTH") {
            if let Ok(parsed) = width.parse::<f32>() {
                if parsed > 0.0 {
                    config.world_width = parsed;
                } else {
                    tracing::warn!("WORLD_WIDTH must be > 0, using default");
                }
            } else {
                tracing::warn!("Invalid WORLD_WIDTH '{}', using default", width);
            }
        }

        if let Ok(height) = std::env::var("WORLD_HEIGHT") {
            if let Ok(parsed) = height.parse::<f32>() {
                if parsed > 0.0 {
                    config.world_height = parsed;
                } else {
                    tracing::warn!("WORLD_HEIGHT must be > 0, using default");
                }
            } else {
                tracing::warn!("Invalid WORLD_HEIGHT '{}', using default", height);
            }
        }

        if let Ok(count) = std::env::var("WALL_COUNT") {
            if let Ok(parsed) = count.parse::<usize>() {
                if parsed <= 1000 {
                    config.wall_count = parsed;
                } else {
                    tracing::warn!("WALL_COUNT must be <= 1000, using default");
                }
            } else {
                tracing::warn!("Invalid WALL_COUNT '{}', using default", count);
            }
        }

        if let Ok(timeout) = std::env::var("HEARTBEAT_TIMEOUT_MS") {
            if let Ok(parsed) = timeout.parse::<u64>() {
                if parsed > 0 {
                    config.heartbeat_timeout_ms = parsed;
                } else {
                    tracing::warn!("HEARTBEAT_TIMEOUT_MS must be > 0, using default");
                }
            } else {
                tracing::warn!("Invalid HEARTBEAT_TIMEOUT_MS '{}', using default", timeout);
            }
        }

        if let Ok(attempts) = std::env::var("SPAWN_MAX_ATTEMPTS") {
            if let Ok(parsed) = attempts.parse::<u32>() {
                if parsed > 0 {
                    config.spawn_max_attempts = parsed;
                } else {
                    tracing::warn!("SPAWN_MAX_ATTEMPTS must be > 0, using default");
                }
            } else {
                tracing::warn!("Invalid SPAWN_MAX_ATTEMPTS '{}', using default", attempts);
            }
        }

        config
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), String> {
        if self.world_width <= 0.0 || self.world_height <= 0.0 {
            return Err("world dimensions must be positive".to_string());
        }
        if self.world_width < 2.0 * self.wall_thickness
            || self.world_height < 2.0 * self.wall_thickness
        {
            return Err("arena is smaller than its border walls".to_string());
        }
        if self.tank_width <= 0.0 || self.tank_height <= 0.0 {
            return Err("tank dimensions must be positive".to_string());
        }
        if self.ammo_capacity == 0 {
            return Err("ammo_capacity must be at least 1".to_string());
        }
        if self.wall_min_dimension > self.wall_max_dimension {
            return Err("wall_min_dimension cannot exceed wall_max_dimension".to_string());
        }
        if self.spawn_max_attempts == 0 {
            return Err("spawn_max_attempts must be at least 1".to_string());
        }
        Ok(())
    }
}
