//! Tick orchestration and session registry
//!
//! `GameEngine` owns the spatial index, the session list, the RNG and the
//! id allocator; the transport layer calls `join` / `apply_input` /
//! `heartbeat` and drives `run_tick` once per tick. All simulation work is
//! synchronous; host-side concurrency must stay in the transport.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::GameConfig;
use crate::game::spatial::{GridIndex, SpatialIndex};
use crate::game::spawn;
use crate::game::state::{ClientSession, IdAllocator, PlayerId, PlayerInput, Tank};
use crate::game::systems::{ammo, ballistics, combat, liveness, movement, tracks};
use crate::game::world;
use crate::net::Connection;
use crate::util::vec2::Vec2;

/// Why a player could not be admitted
#[derive(Debug, Error)]
pub enum JoinError {
    /// The spawn search exhausted its attempt budget
    #[error("no clear spawn area available")]
    NoSpawnAvailable,
}

/// Per-session scoreboard row for the embedding layer
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub id: PlayerId,
    pub name: String,
    pub position: Vec2,
    pub hull_angle: f32,
    pub gun_angle: f32,
    pub ammo: u32,
    pub kills: u32,
}

/// The authoritative simulation
pub struct GameEngine {
    config: GameConfig,
    index: GridIndex,
    /// Sessions in join order; tick iteration order is stable
    sessions: Vec<ClientSession>,
    ids: IdAllocator,
    rng: StdRng,
    tick: u64,
}

impl GameEngine {
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Seeded constructor for deterministic tests and benches
    pub fn with_rng(config: GameConfig, rng: StdRng) -> Self {
        Self {
            config,
            index: GridIndex::default(),
            sessions: Vec::new(),
            ids: IdAllocator::new(),
            rng,
            tick: 0,
        }
    }

    /// Generate the arena walls; call exactly once at game start
    pub fn generate_world(&mut self) {
        world::generate(&mut self.index, &mut self.ids, &self.config, &mut self.rng);
    }

    /// Admit a player at a freshly searched spawn point
    pub fn join(
        &mut self,
        name: impl Into<String>,
        conn: Box<dyn Connection>,
        now_ms: u64,
    ) -> Result<PlayerId, JoinError> {
        let position = spawn::find_spawn_point(&self.index, &self.config, &mut self.rng)
            .ok_or(JoinError::NoSpawnAvailable)?;
        let id = Uuid::new_v4();
        let tank = Tank::new(
            self.ids.next_id(),
            id,
            name.into(),
            position,
            self.ids.next_id(),
            self.config.ammo_capacity,
        );
        self.index.insert(tank.entry(&self.config));
        info!("{} joined at ({}, {})", tank.name, position.x, position.y);
        self.sessions.push(ClientSession::new(id, tank, conn, now_ms));
        Ok(id)
    }

    /// Drop a session and every index entry it owns
    pub fn disconnect(&mut self, player: PlayerId) {
        if let Some(pos) = self.sessions.iter().position(|s| s.id == player) {
            let session = self.sessions.remove(pos);
            self.remove_session_entries(&session);
            debug!("{} disconnected", session.tank.name);
        }
    }

    /// Replace a player's input state; no-op for unknown ids
    pub fn apply_input(&mut self, player: PlayerId, input: PlayerInput) {
        if let Some(session) = self.sessions.iter_mut().find(|s| s.id == player) {
            session.input = input;
        }
    }

    /// Record a liveness signal; no-op for unknown ids
    pub fn heartbeat(&mut self, player: PlayerId, now_ms: u64) {
        if let Some(session) = self.sessions.iter_mut().find(|s| s.id == player) {
            session.last_heartbeat = now_ms;
        }
    }

    /// Advance the whole simulation by one tick
    ///
    /// Per session, in join order: liveness, movement, ammo regeneration,
    /// bullet update, fire, hit resolution. An eliminated session skips its
    /// remaining sub-systems but never interrupts the others. The trail
    /// sweep and the removal of eliminated sessions run once at the end.
    pub fn run_tick(&mut self, now_ms: u64) {
        self.tick += 1;

        for i in 0..self.sessions.len() {
            if self.sessions[i].dead {
                continue;
            }
            if liveness::evict_if_stale(&mut self.sessions[i], &self.config, now_ms) {
                continue;
            }
            movement::update(
                &mut self.sessions[i],
                &mut self.index,
                &mut self.ids,
                &self.config,
                now_ms,
            );
            ammo::update(&mut self.sessions[i].tank, &self.config, now_ms);
            ballistics::update_bullets(
                &mut self.sessions[i].tank,
                &mut self.index,
                &self.config,
                now_ms,
            );
            ballistics::fire(
                &mut self.sessions[i],
                &mut self.index,
                &mut self.ids,
                &self.config,
                now_ms,
            );
            combat::update(&mut self.sessions, i, &mut self.index, &self.config);
        }

        tracks::sweep(&mut self.index, &self.config);
        self.reap_dead();
    }

    /// Remove sessions eliminated during this tick
    ///
    /// Their tanks and bullets leave the index immediately; their tracks
    /// stay and fade out on their own.
    fn reap_dead(&mut self) {
        let mut i = 0;
        while i < self.sessions.len() {
            if self.sessions[i].dead {
                let session = self.sessions.remove(i);
                self.remove_session_entries(&session);
            } else {
                i += 1;
            }
        }
    }

    fn remove_session_entries(&mut self, session: &ClientSession) {
        self.index.remove(session.tank.id);
        for bullet in &session.tank.bullets {
            self.index.remove(bullet.id);
        }
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn sessions(&self) -> &[ClientSession] {
        &self.sessions
    }

    /// Index access for render and broadcast queries
    pub fn index(&self) -> &GridIndex {
        &self.index
    }

    pub fn snapshot(&self) -> Vec<SessionSnapshot> {
        self.sessions
            .iter()
            .map(|session| SessionSnapshot {
                id: session.id,
                name: session.tank.name.clone(),
                position: session.position,
                hull_angle: session.tank.hull_angle,
                gun_angle: session.tank.gun_angle,
                ammo: session.tank.ammo,
                kills: session.tank.kills,
            })
            .collect()
    }
}
