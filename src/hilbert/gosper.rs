//! Gosper (flowsnake) curve linearization of hexagonal lattices.
//!
//! A level-`n` Gosper island is tiled by `7^n` hexagons of size `7^(-n/2)` centred on
//! the origin. Each hexagon sits inside one of the seven children of its parent at
//! the next coarser level. The distance of a cell along the curve is read off as base-7
//! digits, one per level, by following the cell's chain of parent centres and
//! classifying each step by its angle relative to the current curve segment (Cui et
//! al., CYBConf 2017).
//!
//! Cells use axial coordinates `(q, r)` of pointy-top hexagons.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::{ComplexityError, Result};

/// Deepest level `gosper_order` builds (`7^9` cells).
pub const MAX_GOSPER_LEVEL: i32 = 9;

const SQRT_3: f64 = 1.732_050_807_568_877_2;
const ORIENTATION: [f64; 7] = [
    -2.0 * PI / 3.0,
    0.0,
    0.0,
    -2.0 * PI / 3.0,
    0.0,
    2.0 * PI / 3.0,
    0.0,
];
const FORWARD_PATTERN: [bool; 7] = [false, true, true, true, false, false, true];

/// Every level of the island lies within this radius.
const ISLAND_RADIUS: f64 = 1.25;

type Point = (f64, f64);

/// A hexagon in axial coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HexCell {
    pub q: i64,
    pub r: i64,
}

impl HexCell {
    pub fn new(q: i64, r: i64) -> Self {
        Self { q, r }
    }

    /// Number of hexagon steps between two cells.
    pub fn distance(self, other: HexCell) -> i64 {
        let dq = self.q - other.q;
        let dr = self.r - other.r;
        (dq.abs() + dr.abs() + (dq + dr).abs()) / 2
    }
}

//==================================================================================
// 1. Hexagon Geometry
//==================================================================================

fn shrink() -> f64 {
    7f64.sqrt().recip()
}

/// Rotation between consecutive levels.
fn alpha() -> f64 {
    ((3.0f64 / 7.0).sqrt() / 2.0).asin()
}

/// Hexagon size at `level`.
pub fn cell_size(level: u32) -> f64 {
    shrink().powi(level as i32)
}

fn rotate(theta: f64, (x, y): Point) -> Point {
    let (sin, cos) = theta.sin_cos();
    (cos * x - sin * y, sin * x + cos * y)
}

/// Centre of `cell` for hexagons of the given size.
pub fn axial_to_xy(cell: HexCell, size: f64) -> Point {
    let (q, r) = (cell.q as f64, cell.r as f64);
    (size * (q + r / 2.0) * SQRT_3, size * r * 1.5)
}

/// The hexagon of the given size containing `point`, by cube-coordinate rounding.
pub fn xy_to_axial((x, y): Point, size: f64) -> HexCell {
    let cube_x = (x * SQRT_3 / 3.0 - y / 3.0) / size;
    let cube_z = y * 2.0 / 3.0 / size;
    let cube_y = -cube_x - cube_z;

    let (mut rx, ry, mut rz) = (cube_x.round(), cube_y.round(), cube_z.round());
    let dx = (cube_x - rx).abs();
    let dy = (cube_y - ry).abs();
    let dz = (cube_z - rz).abs();

    if dx > dy && dx > dz {
        rx = -ry - rz;
    } else if dy <= dz {
        rz = -rx - ry;
    }
    HexCell::new(rx as i64, rz as i64)
}

//==================================================================================
// 2. Curve Digits
//==================================================================================

/// Centres of the hexagons containing `point`, from level 0 down to `level`.
fn centre_chain(point: Point, level: u32) -> Vec<Point> {
    let mut size = cell_size(level);
    let mut rotated = axial_to_xy(xy_to_axial(point, size), size);
    let mut chain = Vec::with_capacity(level as usize + 1);
    chain.push(rotate(level as f64 * alpha(), rotated));

    for i in (0..level).rev() {
        size /= shrink();
        rotated = axial_to_xy(xy_to_axial(rotate(alpha(), rotated), size), size);
        chain.push(rotate(i as f64 * alpha(), rotated));
    }
    chain.reverse();
    chain
}

/// Which of the seven children a step `dy` selects, relative to segment `d`.
fn child_slot(d: Point, dy: Point) -> usize {
    if dy.0.hypot(dy.1) < 0.01 * d.0.hypot(d.1) {
        return 4;
    }
    let dot = dy.0 * d.0 + dy.1 * d.1;
    let det = dy.0 * d.1 - dy.1 * d.0;
    match (3.0 * det.atan2(dot) / PI).round() as i64 {
        0 => 0,
        -1 => 5,
        -2 => 6,
        1 => 1,
        2 => 2,
        _ => 3,
    }
}

/// Base-7 digits of the curve distance, most significant first, or `None` when the
/// point lies outside the island.
fn curve_digits(chain: &[Point]) -> Option<Vec<u64>> {
    let (x0, y0) = chain[0];
    if x0.abs() + y0.abs() > 0.1 {
        return None;
    }

    let mut digits = Vec::with_capacity(chain.len());
    digits.push(0);
    let mut segment: Point = (-SQRT_3, 0.0);
    let mut slot = 1usize;
    let mut forward = true;

    for pair in chain.windows(2) {
        let turned = rotate(alpha(), rotate(ORIENTATION[slot], segment));
        segment = (shrink() * turned.0, shrink() * turned.1);
        let step = (pair[1].0 - pair[0].0, pair[1].1 - pair[0].1);

        slot = child_slot(segment, step);
        let digit = if forward {
            forward = FORWARD_PATTERN[slot];
            slot
        } else {
            forward = !FORWARD_PATTERN[slot];
            6 - slot
        };
        digits.push(digit as u64);
    }
    Some(digits)
}

fn checked_level(level: i32) -> Result<u32> {
    u32::try_from(level).map_err(|_| {
        ComplexityError::InvalidInput(format!(
            "Gosper recursion level must not be negative, got {}",
            level
        ))
    })
}

//==================================================================================
// 3. Public API
//==================================================================================

/// Distance of `point` along the level-`level` Gosper curve, `None` outside the island.
pub fn coord_to_distance(point: Point, level: i32) -> Result<Option<u64>> {
    let level = checked_level(level)?;
    let chain = centre_chain(point, level);
    Ok(curve_digits(&chain).map(|digits| digits.iter().fold(0u64, |acc, &d| acc * 7 + d)))
}

/// The `7^level` cells of the level-`level` island in curve order.
pub fn gosper_order(level: i32) -> Result<Vec<HexCell>> {
    let level_u = checked_level(level)?;
    if level > MAX_GOSPER_LEVEL {
        return Err(ComplexityError::InvalidInput(format!(
            "Gosper level {} exceeds the maximum {}",
            level, MAX_GOSPER_LEVEL
        )));
    }

    let size = cell_size(level_u);
    let cells = 7usize.pow(level_u);
    let reach = (ISLAND_RADIUS / (size * SQRT_3)).ceil() as i64 + 2;
    let mut order: Vec<Option<HexCell>> = vec![None; cells];

    for q in -reach..=reach {
        for r in -reach..=reach {
            let cell = HexCell::new(q, r);
            let centre = axial_to_xy(cell, size);
            if centre.0.hypot(centre.1) > ISLAND_RADIUS {
                continue;
            }
            let Some(distance) = curve_digits(&centre_chain(centre, level_u))
                .map(|digits| digits.iter().fold(0u64, |acc, &d| acc * 7 + d))
            else {
                continue;
            };
            match order.get_mut(distance as usize) {
                Some(slot) if slot.is_none() => *slot = Some(cell),
                _ => {
                    return Err(ComplexityError::InternalError(format!(
                        "Gosper distance {} of {:?} is out of range or repeated",
                        distance, cell
                    )))
                }
            }
        }
    }

    order
        .into_iter()
        .enumerate()
        .map(|(k, cell)| {
            cell.ok_or_else(|| {
                ComplexityError::InternalError(format!("no cell at Gosper distance {}", k))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashbrown::HashSet;

    #[test]
    fn test_origin_is_distance_zero_at_level_zero() {
        assert_eq!(coord_to_distance((0.0, 0.0), 0).unwrap(), Some(0));
        assert_eq!(gosper_order(0).unwrap(), vec![HexCell::new(0, 0)]);
    }

    #[test]
    fn test_negative_level_is_invalid_input() {
        assert!(matches!(
            coord_to_distance((0.0, 0.0), -1),
            Err(ComplexityError::InvalidInput(_))
        ));
        assert!(matches!(gosper_order(-2), Err(ComplexityError::InvalidInput(_))));
        assert!(gosper_order(MAX_GOSPER_LEVEL + 1).is_err());
    }

    #[test]
    fn test_points_outside_island_have_no_distance() {
        assert_eq!(coord_to_distance((5.0, 5.0), 2).unwrap(), None);
        assert_eq!(coord_to_distance((-3.0, 0.5), 1).unwrap(), None);
    }

    #[test]
    fn test_level_one_starts_at_west_cell() {
        let order = gosper_order(1).unwrap();
        assert_eq!(
            &order[..4],
            &[
                HexCell::new(-1, 0),
                HexCell::new(-1, 1),
                HexCell::new(0, 1),
                HexCell::new(1, 0)
            ]
        );
    }

    #[test]
    fn test_order_is_bijection_consistent_with_distance() {
        for level in 1..=3 {
            let order = gosper_order(level).unwrap();
            assert_eq!(order.len(), 7usize.pow(level as u32));
            let unique: HashSet<HexCell> = order.iter().copied().collect();
            assert_eq!(unique.len(), order.len());

            let size = cell_size(level as u32);
            for (k, &cell) in order.iter().enumerate() {
                let distance = coord_to_distance(axial_to_xy(cell, size), level).unwrap();
                assert_eq!(distance, Some(k as u64), "cell {:?}", cell);
            }
        }
    }

    #[test]
    fn test_consecutive_cells_are_neighbours() {
        let order = gosper_order(4).unwrap();
        for pair in order.windows(2) {
            assert_eq!(pair[0].distance(pair[1]), 1, "{:?} -> {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_axial_round_trip() {
        for &(q, r) in &[(0, 0), (3, -2), (-5, 7), (11, 11)] {
            let cell = HexCell::new(q, r);
            assert_eq!(xy_to_axial(axial_to_xy(cell, 0.3), 0.3), cell);
        }
    }
}
