//! Integer rotation and translation utilities.
//!
//! A rotation is described by three step counts `(rx, ry, rz)`, each a number of
//! quarter turns around the X, Y and Z axis. The steps are applied in a fixed
//! order (all X steps, then all Y steps, then all Z steps) and do not commute.
//! The 64 combinations in `[0, 4)^3` reach all 24 orientations of a cube, most of
//! them several times.

use crate::pieces::Coord;

/// Quarter turns per full revolution.
pub const STEPS_PER_TURN: i32 = 4;

/// Quarter turn around the X axis.
const X_STEP: fn(Coord) -> Coord = |(x, y, z)| (x, -z, y);
/// Quarter turn around the Y axis.
const Y_STEP: fn(Coord) -> Coord = |(x, y, z)| (z, y, -x);
/// Quarter turn around the Z axis.
const Z_STEP: fn(Coord) -> Coord = |(x, y, z)| (-y, x, z);

/// The six axis-aligned unit offsets of a cell's face neighbours.
pub const FACE_NEIGHBORS: [Coord; 6] = [
    (1, 0, 0),
    (-1, 0, 0),
    (0, 1, 0),
    (0, -1, 0),
    (0, 0, 1),
    (0, 0, -1),
];

/// Rotates a point about the origin by `rx`, `ry`, `rz` quarter turns.
///
/// Negative step counts are reduced modulo 4 first, so `-1` is three quarter
/// turns in the positive direction.
pub fn rotate(point: Coord, rx: i32, ry: i32, rz: i32) -> Coord {
    let mut rotated = point;
    for (step, count) in [(X_STEP, rx), (Y_STEP, ry), (Z_STEP, rz)] {
        for _ in 0..count.rem_euclid(STEPS_PER_TURN) {
            rotated = step(rotated);
        }
    }
    rotated
}

/// Iterates all 64 raw step triples in `[0, 4)^3`, X-major.
pub fn rotation_steps() -> impl Iterator<Item = (i32, i32, i32)> {
    (0..STEPS_PER_TURN).flat_map(|rx| {
        (0..STEPS_PER_TURN)
            .flat_map(move |ry| (0..STEPS_PER_TURN).map(move |rz| (rx, ry, rz)))
    })
}

/// Translates coordinates so the minimum x, y, z values are all zero.
///
/// Each axis is shifted independently; the shape is not rotated.
pub fn normalize_to_origin<const N: usize>(mut coords: [Coord; N]) -> [Coord; N] {
    let Some(min_x) = coords.iter().map(|(x, _, _)| *x).min() else {
        return coords;
    };
    let min_y = coords.iter().map(|(_, y, _)| *y).min().unwrap_or(0);
    let min_z = coords.iter().map(|(_, _, z)| *z).min().unwrap_or(0);

    for (x, y, z) in &mut coords {
        *x -= min_x;
        *y -= min_y;
        *z -= min_z;
    }

    coords
}

/// Component-wise sum of two coordinates, or `None` if any component overflows.
#[inline(always)]
pub fn translate(a: Coord, b: Coord) -> Option<Coord> {
    Some((
        a.0.checked_add(b.0)?,
        a.1.checked_add(b.1)?,
        a.2.checked_add(b.2)?,
    ))
}

/// Returns true if every component lies in `[0, size)`.
#[inline(always)]
pub fn in_bounds((x, y, z): Coord, size: usize) -> bool {
    let size = size as i64;
    (0..size).contains(&(x as i64))
        && (0..size).contains(&(y as i64))
        && (0..size).contains(&(z as i64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_steps_match_axis_formulas() {
        assert_eq!(rotate((1, 2, 3), 1, 0, 0), (1, -3, 2));
        assert_eq!(rotate((1, 2, 3), 0, 1, 0), (3, 2, -1));
        assert_eq!(rotate((1, 2, 3), 0, 0, 1), (-2, 1, 3));
    }

    #[test]
    fn test_four_steps_are_identity() {
        let point = (2, -1, 5);
        assert_eq!(rotate(point, 4, 0, 0), point);
        assert_eq!(rotate(point, 0, 4, 0), point);
        assert_eq!(rotate(point, 0, 0, 4), point);
        assert_eq!(rotate(point, 8, -4, 12), point);
    }

    #[test]
    fn test_negative_steps_wrap_modulo_four() {
        let point = (1, 2, 3);
        assert_eq!(rotate(point, -1, 0, 0), rotate(point, 3, 0, 0));
        assert_eq!(rotate(point, 0, -2, 0), rotate(point, 0, 2, 0));
        assert_eq!(rotate(point, 0, 0, -3), rotate(point, 0, 0, 1));
    }

    #[test]
    fn test_steps_apply_x_then_y_then_z() {
        // X then Y: (1,2,3) -> (1,-3,2) -> (2,-3,-1)
        assert_eq!(rotate((1, 2, 3), 1, 1, 0), (2, -3, -1));
        // Y then Z: (1,2,3) -> (3,2,-1) -> (-2,3,-1)
        assert_eq!(rotate((1, 2, 3), 0, 1, 1), (-2, 3, -1));
    }

    #[test]
    fn test_rotation_steps_cover_all_64_triples() {
        let steps: Vec<_> = rotation_steps().collect();
        assert_eq!(steps.len(), 64);
        assert_eq!(steps[0], (0, 0, 0));
        assert_eq!(steps[1], (0, 0, 1));
        assert_eq!(steps[63], (3, 3, 3));
    }

    #[test]
    fn test_normalize_shifts_each_axis_independently() {
        let normalized = normalize_to_origin([(2, -1, 4), (3, 0, 7)]);
        assert_eq!(normalized, [(0, 0, 0), (1, 1, 3)]);
    }

    #[test]
    fn test_in_bounds() {
        assert!(in_bounds((0, 0, 0), 6));
        assert!(in_bounds((5, 5, 5), 6));
        assert!(!in_bounds((6, 0, 0), 6));
        assert!(!in_bounds((0, -1, 0), 6));
        assert!(!in_bounds((0, 0, 0), 0));
    }

    #[test]
    fn test_translate_reports_overflow() {
        assert_eq!(translate((1, 2, 3), (-1, 0, 4)), Some((0, 2, 7)));
        assert_eq!(translate((i32::MAX, 0, 0), (1, 0, 0)), None);
        assert_eq!(translate((0, i32::MIN, 0), (0, -1, 0)), None);
        assert_eq!(translate((0, 0, i32::MAX), (0, 0, 0)), Some((0, 0, i32::MAX)));
    }
}
