//! Game-logic systems: player movement integration and guard chase AI.
//!
//! Both are synchronous, single-threaded and complete within the calling
//! tick - pathfinding and sight checks never span frames.

use glam::{Vec2, vec2};
use hecs::World;
use std::f32::consts::{PI, TAU};

use super::components::{Chaser, Class, Facing, MoveIntent, PlayerBody, Position};
use crate::world::{EntityClass, GridMap, cell_of, find_path, line_of_sight, resolve_movement};

/* ----------------------------------------------------------------- */
/*  Tuning constants (tile units, seconds)                            */
/* ----------------------------------------------------------------- */
const ACCELERATION: f32 = 25.0;
const FRICTION: f32 = 8.0;
const MAX_SPEED: f32 = 16.0;
const TURN_RATE: f32 = 3.0; // rad / s

const GUARD_WALK_SPEED: f32 = 1.0;
const GUARD_TURN_RATE: f32 = 4.0; // rad / s
const NODE_REACH: f32 = 0.1;

/// Abort threshold on accepted path length: keeps the per-tick cost of a
/// chase bounded even on large maps. Longer routes are treated as "no
/// path" and retried next tick.
pub const CHASE_PATH_MAX: usize = 48;

/* ================================================================= */
/*  Player movement                                                  */
/* ================================================================= */

/// Integrate one tick of player movement from a pure input intent:
/// acceleration toward the intended direction, friction, speed clamp, then
/// per-axis collision clamping so the body slides along walls.
pub fn integrate_player(grid: &GridMap, body: &mut PlayerBody, intent: MoveIntent, dt: f32) {
    body.yaw = (body.yaw + intent.turn * TURN_RATE * dt).rem_euclid(TAU);

    let (sin, cos) = body.yaw.sin_cos();
    // local (forward, strafe) -> world space
    let accel = vec2(
        (intent.forward * cos - intent.strafe * sin) * ACCELERATION,
        (intent.forward * sin + intent.strafe * cos) * ACCELERATION,
    );

    body.velocity += accel * dt;
    body.velocity -= body.velocity * FRICTION * dt;

    let speed = body.velocity.length();
    if speed > MAX_SPEED {
        body.velocity *= MAX_SPEED / speed;
    }

    let target = body.pos + body.velocity * dt;
    body.pos = resolve_movement(grid, body.pos, target, EntityClass::Player);
}

/* ================================================================= */
/*  Guard chase AI                                                   */
/* ================================================================= */

/// One tick of chase behaviour for every `Chaser` entity.
///
/// With line of sight to the player a guard requests a fresh path to the
/// player's cell; without one it finishes its current route and idles.
/// "No path" and over-budget paths are normal outcomes - the guard simply
/// keeps whatever route it had.
pub fn chase_system(world: &mut World, grid: &GridMap, player_pos: Vec2, dt: f32) {
    let goal = cell_of(player_pos);
    for (_, (pos, facing, class, chaser)) in
        world.query_mut::<(&mut Position, &mut Facing, &Class, &mut Chaser)>()
    {
        // a route is stale once it is finished or no longer ends at the
        // player's cell; only then is a new search worth its tick cost
        let stale = !chaser.following()
            || chaser.path.last().map(|&p| cell_of(p)) != Some(goal);

        if stale && line_of_sight(grid, pos.0, player_pos) {
            match find_path(grid, cell_of(pos.0), goal) {
                Some(path) if path.len() <= CHASE_PATH_MAX => {
                    // skip the leading waypoint: it is the guard's own cell
                    chaser.next = usize::from(path.len() > 1);
                    chaser.path = path;
                }
                _ => {} // unreachable or too far: keep the old route
            }
        }

        if chaser.following() {
            follow_path(grid, pos, facing, class.0, chaser, dt);
        }
    }
}

/// Turn toward the current waypoint, walk once aligned, advance the node
/// index when close enough.
fn follow_path(
    grid: &GridMap,
    pos: &mut Position,
    facing: &mut Facing,
    class: EntityClass,
    chaser: &mut Chaser,
    dt: f32,
) {
    let target = chaser.path[chaser.next];
    let delta = target - pos.0;
    let target_angle = delta.y.atan2(delta.x);

    let mut diff = target_angle - facing.0;
    while diff > PI {
        diff -= TAU;
    }
    while diff < -PI {
        diff += TAU;
    }

    if diff.abs() > 0.1 {
        // rotate toward the node without overshooting
        let turn = diff.signum() * GUARD_TURN_RATE * dt;
        facing.0 = (facing.0 + if turn.abs() > diff.abs() { diff } else { turn }).rem_euclid(TAU);
        return;
    }

    let (sin, cos) = facing.0.sin_cos();
    let step = vec2(cos, sin) * GUARD_WALK_SPEED * dt;
    pos.0 = resolve_movement(grid, pos.0, pos.0 + step, class);

    if delta.length() < NODE_REACH {
        chaser.next += 1;
        if !chaser.following() {
            chaser.stop();
        }
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::tile;
    use glam::IVec2;

    /* ---- player integration ---------------------------------------- */

    #[test]
    fn forward_intent_moves_along_heading() {
        let grid = GridMap::open(16, 16).with_border(tile::SOLID);
        let mut body = PlayerBody::new(vec2(4.5, 4.5), 0.0);
        let intent = MoveIntent {
            forward: 1.0,
            ..Default::default()
        };
        for _ in 0..30 {
            integrate_player(&grid, &mut body, intent, 1.0 / 60.0);
        }
        assert!(body.pos.x > 4.6, "should have moved +X, at {}", body.pos);
        assert!((body.pos.y - 4.5).abs() < 1e-4);
    }

    #[test]
    fn friction_bleeds_velocity_off() {
        let grid = GridMap::open(16, 16);
        let mut body = PlayerBody::new(vec2(8.0, 8.0), 0.0);
        body.velocity = vec2(4.0, 0.0);
        for _ in 0..240 {
            integrate_player(&grid, &mut body, MoveIntent::default(), 1.0 / 60.0);
        }
        assert!(body.velocity.length() < 0.05);
    }

    #[test]
    fn wall_stops_forward_but_allows_slide() {
        let grid = GridMap::open(8, 8).with_border(tile::SOLID);
        let mut body = PlayerBody::new(vec2(6.5, 4.5), 0.0); // facing the east wall
        let intent = MoveIntent {
            forward: 1.0,
            strafe: 1.0,
            ..Default::default()
        };
        for _ in 0..120 {
            integrate_player(&grid, &mut body, intent, 1.0 / 60.0);
        }
        assert!(body.pos.x < 7.0, "clamped against the wall");
        assert!(body.pos.y > 4.6, "free axis keeps sliding");
    }

    #[test]
    fn turn_intent_wraps_yaw() {
        let grid = GridMap::open(8, 8);
        let mut body = PlayerBody::new(vec2(4.5, 4.5), 0.1);
        let intent = MoveIntent {
            turn: -1.0,
            ..Default::default()
        };
        integrate_player(&grid, &mut body, intent, 0.1);
        assert!(body.yaw > 0.0 && body.yaw < TAU);
        assert!((body.yaw - (0.1 - TURN_RATE * 0.1).rem_euclid(TAU)).abs() < 1e-5);
    }

    /* ---- guard chase ------------------------------------------------ */

    fn spawn_guard(world: &mut World, pos: Vec2) -> hecs::Entity {
        world.spawn((
            Position(pos),
            Facing(0.0),
            Class(EntityClass::Enemy),
            Chaser::default(),
        ))
    }

    fn run_ticks(world: &mut World, grid: &GridMap, player: Vec2, n: usize) {
        for _ in 0..n {
            chase_system(world, grid, player, 1.0 / 30.0);
        }
    }

    #[test]
    fn guard_with_sight_closes_distance() {
        let grid = GridMap::open(16, 16).with_border(tile::SOLID);
        let mut world = World::new();
        let guard = spawn_guard(&mut world, vec2(3.5, 3.5));
        let player = vec2(10.5, 3.5);

        let before = (player - vec2(3.5, 3.5)).length();
        run_ticks(&mut world, &grid, player, 300);
        let pos = world.get::<&Position>(guard).unwrap().0;
        assert!(
            (player - pos).length() < before - 1.0,
            "guard should close in, at {pos}"
        );
    }

    #[test]
    fn guard_without_sight_stays_put() {
        let mut grid = GridMap::open(16, 16).with_border(tile::SOLID);
        for y in 1..15 {
            grid.set(IVec2::new(8, y), tile::SOLID); // full dividing wall
        }
        let mut world = World::new();
        let guard = spawn_guard(&mut world, vec2(3.5, 3.5));

        run_ticks(&mut world, &grid, vec2(12.5, 3.5), 120);
        let pos = world.get::<&Position>(guard).unwrap().0;
        assert_eq!(pos, vec2(3.5, 3.5));
    }

    #[test]
    fn over_budget_route_is_rejected() {
        // straight corridor longer than the chase budget
        let grid = GridMap::open(64, 3).with_border(tile::SOLID);
        let mut world = World::new();
        let guard = spawn_guard(&mut world, vec2(1.5, 1.5));

        run_ticks(&mut world, &grid, vec2(62.5, 1.5), 60);
        let pos = world.get::<&Position>(guard).unwrap().0;
        assert_eq!(pos, vec2(1.5, 1.5), "a 61-cell route exceeds the budget");
    }
}
