//! Bullet flight, wall bounces, lifetime expiry and firing

use smallvec::SmallVec;

use crate::config::GameConfig;
use crate::game::spatial::{ObjectKind, SpatialIndex};
use crate::game::state::{Bullet, ClientSession, EntityId, IdAllocator, Tank};
use crate::util::rect::Rect;
use crate::util::vec2::Vec2;

/// Axis whose velocity component a wall bounce reverses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Infer the bounce axis from where the bullet was one tick ago
///
/// Edge checks run in fixed order (left, right, top, bottom) and the first
/// match wins. This is a heuristic, not a swept resolver: a previous
/// position already inside the wall's span on both axes matches nothing,
/// and the bullet passes through with its velocity intact.
pub fn bounce_axis(prev: Vec2, wall: Rect, config: &GameConfig) -> Option<Axis> {
    if prev.x + config.bullet_width < wall.x {
        Some(Axis::X)
    } else if prev.x > wall.right() {
        Some(Axis::X)
    } else if prev.y + config.bullet_height < wall.y {
        Some(Axis::Y)
    } else if prev.y > wall.bottom() {
        Some(Axis::Y)
    } else {
        None
    }
}

/// Advance every bullet a tank owns by one tick
///
/// Bounce resolution happens against the pre-move footprint; the in-wall
/// flag keeps a bullet from reversing again on every tick it spends
/// overlapping the same wall.
pub fn update_bullets(
    tank: &mut Tank,
    index: &mut dyn SpatialIndex,
    config: &GameConfig,
    now_ms: u64,
) {
    let mut expired: SmallVec<[EntityId; 4]> = SmallVec::new();

    for bullet in &mut tank.bullets {
        let walls = index
            .query_by_kinds(&[ObjectKind::Wall], Some(bullet.bounds(config)))
            .walls;
        match walls.first() {
            Some(wall) if !bullet.in_wall => {
                bullet.in_wall = true;
                match bounce_axis(bullet.prev_position, wall.rect, config) {
                    Some(Axis::X) => bullet.velocity.x = -bullet.velocity.x,
                    Some(Axis::Y) => bullet.velocity.y = -bullet.velocity.y,
                    None => {}
                }
            }
            Some(_) => {}
            None => bullet.in_wall = false,
        }

        bullet.prev_position = bullet.position;
        bullet.position += bullet.velocity;
        index.insert(bullet.entry(config));

        if now_ms.saturating_sub(bullet.created_ms) > config.bullet_ttl_ms {
            expired.push(bullet.id);
        }
    }

    if !expired.is_empty() {
        for &id in &expired {
            index.remove(id);
        }
        tank.bullets.retain(|bullet| !expired.contains(&bullet.id));
    }
}

/// Spawn a bullet at the gun muzzle when the fire input is held
///
/// Gated on ammunition and the per-tank fire interval. The aim vector
/// inverts sin because screen-space y grows downward; muzzle velocity adds
/// the tank's own movement this tick.
pub fn fire(
    session: &mut ClientSession,
    index: &mut dyn SpatialIndex,
    ids: &mut IdAllocator,
    config: &GameConfig,
    now_ms: u64,
) {
    if !session.input.firing {
        return;
    }
    let tank = &mut session.tank;
    if tank.ammo == 0 {
        return;
    }
    if let Some(last) = tank.last_fire_ms {
        if now_ms.saturating_sub(last) <= config.fire_interval_ms {
            return;
        }
    }

    tank.last_fire_ms = Some(now_ms);
    tank.ammo -= 1;

    let direction = Vec2::new(tank.gun_angle.cos(), -tank.gun_angle.sin());
    let position = tank.position + direction * config.tank_barrel_length;
    let velocity = direction * config.bullet_speed + tank.velocity;

    let bullet = Bullet::new(ids.next_id(), tank.owner, position, velocity, now_ms);
    index.insert(bullet.entry(config));
    tank.bullets.push(bullet);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::spatial::{EntryData, GridIndex, IndexEntry};
    use crate::game::state::PlayerInput;
    use crate::net::NullConnection;
    use std::f32::consts::{FRAC_PI_2, PI};
    use uuid::Uuid;

    const EPSILON: f32 = 1e-4;

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

    fn tank_with_bullet(position: Vec2, velocity: Vec2) -> Tank {
        let mut tank = create_test_tank();
        tank.bullets
            .push(Bullet::new(10, tank.owner, position, velocity, 0));
        tank
    }

    fn wall_at(id: EntityId, rect: Rect) -> IndexEntry {
        IndexEntry {
            id,
            rect,
            data: EntryData::Wall,
        }
    }

    #[test]
    fn test_bounce_axis_edge_order() {
        let config = GameConfig::default();
        let wall = Rect::new(100.0, 100.0, 50.0, 50.0);

        // Approaching from the left: previous right edge short of the wall
        assert_eq!(
            bounce_axis(Vec2::new(80.0, 120.0), wall, &config),
            Some(Axis::X)
        );
        // From the right
        assert_eq!(
            bounce_axis(Vec2::new(160.0, 120.0), wall, &config),
            Some(Axis::X)
        );
        // From above
        assert_eq!(
            bounce_axis(Vec2::new(120.0, 80.0), wall, &config),
            Some(Axis::Y)
        );
        // From below
        assert_eq!(
            bounce_axis(Vec2::new(120.0, 160.0), wall, &config),
            Some(Axis::Y)
        );
        // Previous position already inside the wall span on both axes
        assert_eq!(bounce_axis(Vec2::new(120.0, 120.0), wall, &config), None);
    }

    #[test]
    fn test_corner_approach_prefers_x() {
        let config = GameConfig::default();
        let wall = Rect::new(100.0, 100.0, 50.0, 50.0);
        // Short of the wall on both axes; the left-edge check runs first
        assert_eq!(
            bounce_axis(Vec2::new(80.0, 80.0), wall, &config),
            Some(Axis::X)
        );
    }

    #[test]
    fn test_wall_hit_reverses_one_component() {
        let config = GameConfig::default();
        let mut index = GridIndex::default();
        index.insert(wall_at(1, Rect::new(600.0, 400.0, 40.0, 200.0)));

        // Overlapping the wall this tick, was left of it last tick
        let mut tank = tank_with_bullet(Vec2::new(601.0, 450.0), Vec2::new(10.0, 2.0));
        tank.bullets[0].prev_position = Vec2::new(591.0, 448.0);
        index.insert(tank.bullets[0].entry(&config));

        update_bullets(&mut tank, &mut index, &config, 10);

        assert_eq!(tank.bullets[0].velocity, Vec2::new(-10.0, 2.0));
        assert!(tank.bullets[0].in_wall);
    }

    #[test]
    fn test_no_double_bounce_while_embedded() {
        let config = GameConfig::default();
        let mut index = GridIndex::default();
        index.insert(wall_at(1, Rect::new(600.0, 400.0, 40.0, 200.0)));

        let mut tank = tank_with_bullet(Vec2::new(601.0, 450.0), Vec2::new(1.0, 0.0));
        tank.bullets[0].prev_position = Vec2::new(591.0, 450.0);
        index.insert(tank.bullets[0].entry(&config));

        update_bullets(&mut tank, &mut index, &config, 10);
        let after_first = tank.bullets[0].velocity;
        // Still overlapping next tick; the flag suppresses a second reversal
        update_bullets(&mut tank, &mut index, &config, 20);

        assert_eq!(tank.bullets[0].velocity, after_first);
    }

    #[test]
    fn test_flag_clears_after_leaving_wall() {
        let config = GameConfig::default();
        let mut index = GridIndex::default();
        index.insert(wall_at(1, Rect::new(600.0, 400.0, 10.0, 200.0)));

        let mut tank = tank_with_bullet(Vec2::new(400.0, 450.0), Vec2::new(5.0, 0.0));
        tank.bullets[0].in_wall = true;
        index.insert(tank.bullets[0].entry(&config));

        update_bullets(&mut tank, &mut index, &config, 10);

        assert!(!tank.bullets[0].in_wall);
    }

    #[test]
    fn test_position_advances_and_index_follows() {
        let config = GameConfig::default();
        let mut index = GridIndex::default();
        let mut tank = tank_with_bullet(Vec2::new(400.0, 450.0), Vec2::new(5.0, -3.0));
        index.insert(tank.bullets[0].entry(&config));

        update_bullets(&mut tank, &mut index, &config, 10);

        assert_eq!(tank.bullets[0].position, Vec2::new(405.0, 447.0));
        assert_eq!(tank.bullets[0].prev_position, Vec2::new(400.0, 450.0));
        let hits = index.query_by_kinds(&[ObjectKind::Bullet], None).bullets;
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].rect, tank.bullets[0].bounds(&config));
    }

    #[test]
    fn test_expired_bullet_removed_from_owner_and_index() {
        let config = GameConfig::default();
        let mut index = GridIndex::default();
        let mut tank = tank_with_bullet(Vec2::new(400.0, 450.0), Vec2::new(5.0, 0.0));
        index.insert(tank.bullets[0].entry(&config));

        // One millisecond short of expiry
        update_bullets(&mut tank, &mut index, &config, config.bullet_ttl_ms);
        assert_eq!(tank.bullets.len(), 1);

        update_bullets(&mut tank, &mut index, &config, config.bullet_ttl_ms + 1);
        assert!(tank.bullets.is_empty());
        assert!(index.query_by_kinds(&[ObjectKind::Bullet], None).bullets.is_empty());
    }

    fn firing_session() -> ClientSession {
        let tank = create_test_tank();
        let mut session = ClientSession::new(tank.owner, tank, Box::new(NullConnection), 0);
        session.input = PlayerInput {
            firing: true,
            ..Default::default()
        };
        session
    }

    #[test]
    fn test_fire_spawns_bullet_at_muzzle() {
        let config = GameConfig::default();
        let mut index = GridIndex::default();
        let mut ids = IdAllocator::new();
        let mut session = firing_session();
        session.tank.gun_angle = 0.0;

        fire(&mut session, &mut index, &mut ids, &config, 100);

        assert_eq!(session.tank.ammo, config.ammo_capacity - 1);
        assert_eq!(session.tank.last_fire_ms, Some(100));
        let bullet = &session.tank.bullets[0];
        assert!((bullet.position.x - (500.0 + config.tank_barrel_length)).abs() < EPSILON);
        assert!((bullet.position.y - 500.0).abs() < EPSILON);
        assert!((bullet.velocity.x - config.bullet_speed).abs() < EPSILON);
        assert_eq!(index.query_by_kinds(&[ObjectKind::Bullet], None).bullets.len(), 1);
    }

    #[test]
    fn test_fire_inverts_y_for_screen_space() {
        let config = GameConfig::default();
        let mut index = GridIndex::default();
        let mut ids = IdAllocator::new();
        let mut session = firing_session();
        // Aiming "up" in math terms must move the bullet toward smaller y
        session.tank.gun_angle = FRAC_PI_2;

        fire(&mut session, &mut index, &mut ids, &config, 100);

        let bullet = &session.tank.bullets[0];
        assert!(bullet.velocity.y < 0.0);
        assert!(bullet.velocity.x.abs() < EPSILON);
        assert!(bullet.position.y < 500.0);
    }

    #[test]
    fn test_fire_inherits_tank_velocity() {
        let config = GameConfig::default();
        let mut index = GridIndex::default();
        let mut ids = IdAllocator::new();
        let mut session = firing_session();
        session.tank.gun_angle = PI;
        session.tank.velocity = Vec2::new(0.0, 5.0);

        fire(&mut session, &mut index, &mut ids, &config, 100);

        let bullet = &session.tank.bullets[0];
        assert!((bullet.velocity.x - -config.bullet_speed).abs() < EPSILON);
        assert!((bullet.velocity.y - 5.0).abs() < EPSILON);
    }

    #[test]
    fn test_fire_interval_gates_shots() {
        let config = GameConfig::default();
        let mut index = GridIndex::default();
        let mut ids = IdAllocator::new();
        let mut session = firing_session();

        fire(&mut session, &mut index, &mut ids, &config, 100);
        fire(
            &mut session,
            &mut index,
            &mut ids,
            &config,
            100 + config.fire_interval_ms,
        );
        assert_eq!(session.tank.bullets.len(), 1);

        fire(
            &mut session,
            &mut index,
            &mut ids,
            &config,
            101 + config.fire_interval_ms,
        );
        assert_eq!(session.tank.bullets.len(), 2);
    }

    #[test]
    fn test_fire_requires_ammo() {
        let config = GameConfig::default();
        let mut index = GridIndex::default();
        let mut ids = IdAllocator::new();
        let mut session = firing_session();
        session.tank.ammo = 0;

        fire(&mut session, &mut index, &mut ids, &config, 100);

        assert!(session.tank.bullets.is_empty());
        assert!(session.tank.last_fire_ms.is_none());
    }

    #[test]
    fn test_no_fire_without_input() {
        let config = GameConfig::default();
        let mut index = GridIndex::default();
        let mut ids = IdAllocator::new();
        let tank = create_test_tank();
        let mut session = ClientSession::new(tank.owner, tank, Box::new(NullConnection), 0);

        fire(&mut session, &mut index, &mut ids, &config, 100);

        assert!(session.tank.bullets.is_empty());
        assert_eq!(session.tank.ammo, config.ammo_capacity);
    }
}
