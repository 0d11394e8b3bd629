//! Treadlock Server Library
//!
//! Authoritative per-tick simulation core for a top-down multiplayer tank
//! game: movement with collision gating, wall-bouncing ballistics, tread
//! trails, ammo regeneration, hit resolution and heartbeat eviction, all
//! advanced against a shared spatial index.
//!
//! Transport is out of scope; the embedding layer implements
//! [`net::Connection`] and drives [`game::engine::GameEngine`] once per tick.

pub mod config;
pub mod util;
pub mod game;
pub mod net;
