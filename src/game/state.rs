//! Entity model: tanks, bullets, trail paths and per-connection sessions

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::GameConfig;
use crate::game::spatial::{EntryData, IndexEntry};
use crate::net::{Connection, SessionEvent};
use crate::util::rect::Rect;
use crate::util::vec2::Vec2;

/// Unique player identifier
pub type PlayerId = Uuid;

/// Identifier for objects living in the spatial index
pub type EntityId = u64;

/// Monotonic allocator for [`EntityId`]s
#[derive(Debug, Default)]
pub struct IdAllocator {
    next: EntityId,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> EntityId {
        self.next += 1;
        self.next
    }
}

/// Input state as last reported by the client
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PlayerInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub boost: bool,
    pub firing: bool,
    /// Gun aim in radians, measured counter-clockwise from east
    pub aim_angle: Option<f32>,
}

/// Trail path grouping the track segments one tank leaves behind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrailPath {
    pub id: EntityId,
    /// Timestamp of the most recent track placement
    pub last_laid_ms: Option<u64>,
}

impl TrailPath {
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            last_laid_ms: None,
        }
    }
}

/// A bullet in flight, owned by the tank that fired it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: EntityId,
    pub owner: PlayerId,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Position one tick ago, used to infer which wall edge was hit
    pub prev_position: Vec2,
    /// Set while the bullet overlaps a wall so it bounces only once
    pub in_wall: bool,
    pub created_ms: u64,
}

impl Bullet {
    pub fn new(
        id: EntityId,
        owner: PlayerId,
        position: Vec2,
        velocity: Vec2,
        created_ms: u64,
    ) -> Self {
        Self {
            id,
            owner,
            position,
            velocity,
            prev_position: position,
            in_wall: false,
            created_ms,
        }
    }

    /// Collision footprint, anchored at the bullet position
    pub fn bounds(&self, config: &GameConfig) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            config.bullet_width,
            config.bullet_height,
        )
    }

    pub fn entry(&self, config: &GameConfig) -> IndexEntry {
        IndexEntry {
            id: self.id,
            rect: self.bounds(config),
            data: EntryData::Bullet { owner: self.owner },
        }
    }
}

/// Tank state advanced by the simulation every tick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tank {
    /// Identity of this tank's entry in the spatial index
    pub id: EntityId,
    pub owner: PlayerId,
    pub name: String,
    pub position: Vec2,
    /// Facing of the hull in radians, normalized to [0, 2*PI) and rounded
    /// to five decimals so it matches the compass headings exactly
    pub hull_angle: f32,
    /// Gun aim in radians, set directly from client input
    pub gun_angle: f32,
    /// Movement applied this tick; bullets inherit it on fire
    pub velocity: Vec2,
    /// Hull animation frame counter, advanced while moving
    pub hull_frame: u32,
    pub ammo: u32,
    pub last_ammo_ms: Option<u64>,
    pub last_fire_ms: Option<u64>,
    pub kills: u32,
    pub bullets: Vec<Bullet>,
    pub path: TrailPath,
}

impl Tank {
    pub fn new(
        id: EntityId,
        owner: PlayerId,
        name: String,
        position: Vec2,
        path_id: EntityId,
        ammo_capacity: u32,
    ) -> Self {
        Self {
            id,
            owner,
            name,
            position,
            hull_angle: 0.0,
            gun_angle: 0.0,
            velocity: Vec2::ZERO,
            hull_frame: 0,
            ammo: ammo_capacity,
            last_ammo_ms: None,
            last_fire_ms: None,
            kills: 0,
            bullets: Vec::new(),
            path: TrailPath::new(path_id),
        }
    }

    /// Collision footprint, centered on the tank position
    pub fn bounds(&self, config: &GameConfig) -> Rect {
        Rect::from_center(self.position, config.tank_width, config.tank_height)
    }

    pub fn entry(&self, config: &GameConfig) -> IndexEntry {
        IndexEntry {
            id: self.id,
            rect: self.bounds(config),
            data: EntryData::Tank { player: self.owner },
        }
    }
}

/// Per-connection record the engine advances each tick
pub struct ClientSession {
    pub id: PlayerId,
    pub input: PlayerInput,
    pub tank: Tank,
    /// Mirror of the tank position for the transport layer to read
    pub position: Vec2,
    pub last_heartbeat: u64,
    pub conn: Box<dyn Connection>,
    /// Set once the session has been notified of its death
    pub dead: bool,
}

impl ClientSession {
    pub fn new(id: PlayerId, tank: Tank, conn: Box<dyn Connection>, now_ms: u64) -> Self {
        let position = tank.position;
        Self {
            id,
            input: PlayerInput::default(),
            tank,
            position,
            last_heartbeat: now_ms,
            conn,
            dead: false,
        }
    }

    /// Notify the client of its death and tear the connection down
    ///
    /// Safe to call more than once; only the first call reaches the client.
    pub fn kill(&mut self) {
        if self.dead {
            return;
        }
        self.conn.notify(SessionEvent::Death);
        self.conn.terminate();
        self.dead = true;
    }
}

impl std::fmt::Debug for ClientSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSession")
            .field("id", &self.id)
            .field("name", &self.tank.name)
            .field("position", &self.position)
            .field("dead", &self.dead)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::testing::RecordingConnection;

    fn create_test_tank() -> Tank {
        Tank::new(
            1,
            Uuid::new_v4(),
            "Test".to_string(),
            Vec2::new(500.0, 500.0),
            2,
            10,
        )
    }

    #[test]
    fn test_id_allocator_is_monotonic() {
        let mut ids = IdAllocator::new();
        let a = ids.next_id();
        let b = ids.next_id();
        let c = ids.next_id();
        assert!(a < b && b < c);
    }

    #[test]
    fn test_tank_starts_with_full_ammo() {
        let tank = create_test_tank();
        assert_eq!(tank.ammo, 10);
        assert!(tank.last_ammo_ms.is_none());
        assert!(tank.last_fire_ms.is_none());
        assert!(tank.bullets.is_empty());
    }

    #[test]
    fn test_tank_bounds_centered() {
        let config = GameConfig::default();
        let tank = create_test_tank();
        let bounds = tank.bounds(&config);
        assert_eq!(bounds.center(), tank.position);
        assert_eq!(bounds.w, config.tank_width);
    }

    #[test]
    fn test_bullet_bounds_anchored_at_position() {
        let config = GameConfig::default();
        let bullet = Bullet::new(3, Uuid::new_v4(), Vec2::new(100.0, 200.0), Vec2::ZERO, 0);
        let bounds = bullet.bounds(&config);
        assert_eq!(bounds.x, 100.0);
        assert_eq!(bounds.y, 200.0);
        assert_eq!(bounds.w, config.bullet_width);
    }

    #[test]
    fn test_new_bullet_remembers_spawn_as_previous() {
        let bullet = Bullet::new(
            3,
            Uuid::new_v4(),
            Vec2::new(100.0, 200.0),
            Vec2::new(10.0, 0.0),
            0,
        );
        assert_eq!(bullet.prev_position, bullet.position);
        assert!(!bullet.in_wall);
    }

    #[test]
    fn test_session_kill_notifies_once() {
        let conn = RecordingConnection::new();
        let tank = create_test_tank();
        let mut session = ClientSession::new(tank.owner, tank, Box::new(conn.clone()), 0);

        session.kill();
        session.kill();

        assert!(session.dead);
        assert_eq!(conn.death_count(), 1);
        assert!(conn.is_terminated());
    }

    #[test]
    fn test_session_mirrors_tank_position() {
        let tank = create_test_tank();
        let position = tank.position;
        let session = ClientSession::new(tank.owner, tank, Box::new(RecordingConnection::new()), 0);
        assert_eq!(session.position, position);
    }
}
