//! Movement clamping and line-of-sight, built on the shared DDA walk.
//!
//! Movement is resolved per axis: the X and Y components of a tentative
//! move are accepted independently, which is what lets movers slide along a
//! wall instead of stopping dead. Which tile codes count as floor depends
//! on the entity class - the player strolls over decorative floor tiles,
//! enemies refuse them.

use bitflags::bitflags;
use glam::{Vec2, vec2};

use super::dda::DdaWalk;
use super::grid::{GridMap, blocks_ray, cell_of, tile};

bitflags! {
    /// Set of wall-layer tile codes an entity class may stand on.
    /// Bit `n` represents code `n`.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct TileSet: u8 {
        const OPEN = 1 << tile::OPEN;
        const DECOR_FLOOR = 1 << tile::DECOR_FLOOR;
    }
}

impl TileSet {
    #[inline]
    pub fn allows(self, code: u8) -> bool {
        code < 8 && self.bits() & (1 << code) != 0
    }
}

/// Entity classes with distinct walkable-code sets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityClass {
    Player,
    Enemy,
    Projectile,
}

impl EntityClass {
    #[inline]
    pub fn walkable(self) -> TileSet {
        match self {
            EntityClass::Player | EntityClass::Projectile => {
                TileSet::OPEN | TileSet::DECOR_FLOOR
            }
            EntityClass::Enemy => TileSet::OPEN,
        }
    }
}

/// Clamp a tentative move against the wall layer, axis by axis.
///
/// The X component is accepted iff the tile at `(target.x, current.y)` is
/// walkable for `class`; the Y component independently at
/// `(current.x, target.y)`.
pub fn resolve_movement(
    grid: &GridMap,
    current: Vec2,
    target: Vec2,
    class: EntityClass,
) -> Vec2 {
    let walk = class.walkable();
    let mut valid = current;
    if walk.allows(grid.get(cell_of(vec2(target.x, current.y)))) {
        valid.x = target.x;
    }
    if walk.allows(grid.get(cell_of(vec2(current.x, target.y)))) {
        valid.y = target.y;
    }
    valid
}

/// True iff the straight walk from `a` reaches `b`'s cell before entering a
/// ray-blocking cell. Shares its blocking rule with the wall caster, so
/// what the renderer paints as a wall is exactly what breaks sight.
pub fn line_of_sight(grid: &GridMap, a: Vec2, b: Vec2) -> bool {
    let target = cell_of(b);
    if cell_of(a) == target {
        return true;
    }
    let delta = b - a;
    let dist = delta.length();
    if dist < 1e-3 {
        return true;
    }

    let mut walk = DdaWalk::new(a, delta / dist);
    // reach test precedes the block test: a solid cell just past the target
    // must not report "blocked"
    for _ in 0..2 * (grid.width() + grid.height()) {
        let step = walk.advance();
        if step.cell == target {
            return true;
        }
        if blocks_ray(grid.get(step.cell)) {
            return false;
        }
    }
    false
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;

    fn walled_map() -> GridMap {
        let mut map = GridMap::open(10, 10).with_border(tile::SOLID);
        map.set(IVec2::new(5, 5), tile::SOLID);
        map
    }

    #[test]
    fn los_to_self_is_always_true() {
        let map = walled_map();
        let p = vec2(2.2, 2.8);
        assert!(line_of_sight(&map, p, p));
        assert!(line_of_sight(&map, p, vec2(2.9, 2.1))); // same cell
    }

    #[test]
    fn wall_breaks_sight() {
        let map = walled_map();
        assert!(line_of_sight(&map, vec2(2.5, 5.5), vec2(4.5, 5.5)));
        assert!(!line_of_sight(&map, vec2(2.5, 5.5), vec2(8.5, 5.5)));
    }

    #[test]
    fn solid_cell_just_beyond_target_does_not_block() {
        let mut map = GridMap::open(10, 10).with_border(tile::SOLID);
        map.set(IVec2::new(6, 5), tile::SOLID);
        // target cell (5,5) sits directly in front of the solid (6,5)
        assert!(line_of_sight(&map, vec2(2.5, 5.5), vec2(5.5, 5.5)));
    }

    #[test]
    fn decor_floor_is_transparent_to_sight() {
        let mut map = GridMap::open(10, 10).with_border(tile::SOLID);
        map.set(IVec2::new(4, 5), tile::DECOR_FLOOR);
        assert!(line_of_sight(&map, vec2(2.5, 5.5), vec2(7.5, 5.5)));
    }

    #[test]
    fn movement_slides_along_walls() {
        let map = walled_map();
        // moving diagonally into the solid (5,5): X blocked, Y accepted
        let current = vec2(4.5, 4.5);
        let target = vec2(5.5, 4.2);
        let valid = resolve_movement(&map, current, target, EntityClass::Player);
        assert_eq!(valid, vec2(4.5, 4.2));
    }

    #[test]
    fn walkable_sets_differ_per_class() {
        let mut map = GridMap::open(10, 10);
        map.set(IVec2::new(5, 4), tile::DECOR_FLOOR);
        let current = vec2(4.5, 4.5);
        let target = vec2(5.5, 4.5);
        let player = resolve_movement(&map, current, target, EntityClass::Player);
        let enemy = resolve_movement(&map, current, target, EntityClass::Enemy);
        assert_eq!(player.x, 5.5);
        assert_eq!(enemy.x, 4.5);
    }

    #[test]
    fn full_block_keeps_current_position() {
        let map = GridMap::open(4, 4).with_border(tile::SOLID);
        let current = vec2(1.5, 1.5);
        let target = vec2(0.5, 0.5);
        let valid = resolve_movement(&map, current, target, EntityClass::Enemy);
        assert_eq!(valid, current);
    }
}
