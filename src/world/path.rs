//! A* pathfinder over the grid's path layer.
//!
//! Walkability here is the *path-layer* rule (`code == 0`), not the movement
//! rule - a cell can be open to a sliding mover (wall code 3) while closed
//! to pathing (avoidance zones, spawn markers).
//!
//! "No path" is an ordinary outcome, returned as `None`; callers retry or
//! pick another target. Callers are also the ones who cap accepted path
//! length (see `sim::systems`), since a search always runs to completion
//! inside one tick.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use glam::{IVec2, Vec2};
use smallvec::SmallVec;

use super::grid::{GridMap, cell_center, tile};

/// Step cost between orthogonal neighbours.
const ORTHO_COST: i32 = 10;
/// Step cost between diagonal neighbours: integer approximation of
/// sqrt(2)*10, kept over a float distance so searches are deterministic.
const DIAG_COST: i32 = 14;

const DIRECTIONS: [IVec2; 8] = [
    IVec2::new(0, 1),
    IVec2::new(1, 0),
    IVec2::new(0, -1),
    IVec2::new(-1, 0),
    IVec2::new(1, 1),
    IVec2::new(1, -1),
    IVec2::new(-1, -1),
    IVec2::new(-1, 1),
];

/// Diagonal-distance metric, the same 10/14 weighting as the step costs so
/// the heuristic stays admissible.
#[inline]
fn diagonal_distance(a: IVec2, b: IVec2) -> i32 {
    let dx = (a.x - b.x).abs();
    let dy = (a.y - b.y).abs();
    if dx > dy {
        DIAG_COST * dy + ORTHO_COST * (dx - dy)
    } else {
        DIAG_COST * dx + ORTHO_COST * (dy - dx)
    }
}

#[inline]
fn walkable(grid: &GridMap, cell: IVec2) -> bool {
    grid.in_bounds(cell) && grid.get_path(cell) == tile::OPEN
}

/// Heap key: min F-cost first, ties by min H-cost, then by cell so repeated
/// identical searches pop in an identical order.
type OpenEntry = Reverse<(i32, i32, i32, i32)>;

/// A* from `from` to `to` over 8-directional neighbours.
///
/// Returns waypoints at cell centers (`cell + (0.5, 0.5)`), start first,
/// goal last; `from == to` yields the single center. `None` when the open
/// set empties without reaching the goal.
pub fn find(grid: &GridMap, from: IVec2, to: IVec2) -> Option<Vec<Vec2>> {
    let mut open: BinaryHeap<OpenEntry> = BinaryHeap::new();
    let mut g_cost: HashMap<IVec2, i32> = HashMap::new();
    let mut parent: HashMap<IVec2, IVec2> = HashMap::new();
    let mut closed: HashSet<IVec2> = HashSet::new();

    g_cost.insert(from, 0);
    let h0 = diagonal_distance(from, to);
    open.push(Reverse((h0, h0, from.x, from.y)));

    while let Some(Reverse((_, _, cx, cy))) = open.pop() {
        let current = IVec2::new(cx, cy);
        if !closed.insert(current) {
            continue; // stale heap entry
        }
        if current == to {
            return Some(retrace(&parent, from, to));
        }

        let current_g = g_cost[&current];

        let neighbours: SmallVec<[IVec2; 8]> = DIRECTIONS
            .iter()
            .map(|&d| current + d)
            .filter(|&n| walkable(grid, n) && !closed.contains(&n))
            .collect();

        for next in neighbours {
            let step = if next.x != current.x && next.y != current.y {
                DIAG_COST
            } else {
                ORTHO_COST
            };
            let tentative = current_g + step;
            if g_cost.get(&next).is_none_or(|&g| tentative < g) {
                g_cost.insert(next, tentative);
                parent.insert(next, current);
                let h = diagonal_distance(next, to);
                open.push(Reverse((tentative + h, h, next.x, next.y)));
            }
        }
    }

    None
}

fn retrace(parent: &HashMap<IVec2, IVec2>, from: IVec2, to: IVec2) -> Vec<Vec2> {
    let mut path = Vec::new();
    let mut current = to;
    while current != from {
        path.push(cell_center(current));
        current = parent[&current];
    }
    path.push(cell_center(from));
    path.reverse();
    path
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trivial_search_returns_single_center() {
        let map = GridMap::open(8, 8);
        let path = find(&map, IVec2::new(1, 1), IVec2::new(1, 1)).unwrap();
        assert_eq!(path, vec![Vec2::new(1.5, 1.5)]);
    }

    #[test]
    fn open_grid_path_is_minimal() {
        let map = GridMap::open(10, 10);
        let from = IVec2::new(1, 1);
        let to = IVec2::new(5, 4);
        let path = find(&map, from, to).unwrap();

        assert_eq!(path.first().copied(), Some(Vec2::new(1.5, 1.5)));
        assert_eq!(path.last().copied(), Some(Vec2::new(5.5, 4.5)));

        // dx=4, dy=3: optimum is 3 diagonals + 1 orthogonal
        let cost: i32 = path
            .windows(2)
            .map(|w| {
                let d = (w[1] - w[0]).abs();
                if d.x > 0.0 && d.y > 0.0 { DIAG_COST } else { ORTHO_COST }
            })
            .sum();
        assert_eq!(cost, 3 * DIAG_COST + ORTHO_COST);
        assert_eq!(cost, diagonal_distance(from, to));
    }

    #[test]
    fn enclosed_goal_yields_no_path() {
        let mut map = GridMap::open(10, 10);
        // wall off the goal on the path layer with a full ring
        for x in 5..=7 {
            for y in 5..=7 {
                if x != 6 || y != 6 {
                    map.set_path(IVec2::new(x, y), tile::AVOID);
                }
            }
        }
        assert!(find(&map, IVec2::new(1, 1), IVec2::new(6, 6)).is_none());
    }

    #[test]
    fn avoidance_zone_routes_around() {
        let mut map = GridMap::open(8, 8);
        // vertical fence with one gap at y = 6
        for y in 0..6 {
            map.set_path(IVec2::new(4, y), tile::AVOID);
        }
        let path = find(&map, IVec2::new(2, 1), IVec2::new(6, 1)).unwrap();
        assert!(path.iter().all(|p| {
            let cell = IVec2::new(p.x.floor() as i32, p.y.floor() as i32);
            map.get_path(cell) == tile::OPEN
        }));
        // forced through the gap
        assert!(path.iter().any(|p| p.y >= 6.0));
    }

    #[test]
    fn repeated_searches_are_identical() {
        let mut map = GridMap::open(12, 12);
        for y in 2..9 {
            map.set_path(IVec2::new(6, y), tile::AVOID);
        }
        let a = find(&map, IVec2::new(2, 5), IVec2::new(10, 5)).unwrap();
        let b = find(&map, IVec2::new(2, 5), IVec2::new(10, 5)).unwrap();
        assert_eq!(a, b);
    }
}
