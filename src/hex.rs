//! Cube hex coordinates and the pointy-top pixel layout.
//!
//! A tile is identified by an integer triple (q, r, s) with q + r + s = 0.
//! Adjacency is the only geometry the topology passes need; the layout is
//! used by rasterization and rendering to move between pixels and tiles.

use std::cmp::Ordering;
use std::fmt;

use crate::error::{MapError, MapResult};

/// The six unit steps on the cube lattice, counter-clockwise from east.
pub const DIRECTIONS: [Hex; 6] = [
    Hex { q: 1, r: 0, s: -1 },
    Hex { q: 0, r: 1, s: -1 },
    Hex { q: -1, r: 1, s: 0 },
    Hex { q: -1, r: 0, s: 1 },
    Hex { q: 0, r: -1, s: 1 },
    Hex { q: 1, r: -1, s: 0 },
];

/// Largest component magnitude a validated tile may have. Neighbor steps
/// and distances between any two validated tiles stay within `i32`.
pub const MAX_COORD: i32 = 1 << 28;

/// A cell on the cube hex lattice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Hex {
    pub q: i32,
    pub r: i32,
    pub s: i32,
}

impl Hex {
    pub const ORIGIN: Hex = Hex { q: 0, r: 0, s: 0 };

    /// Build a cube coordinate, rejecting triples off the q + r + s = 0
    /// plane or with a component beyond `MAX_COORD`.
    pub fn new(q: i32, r: i32, s: i32) -> MapResult<Self> {
        let hex = Self { q, r, s };
        hex.validate()?;
        Ok(hex)
    }

    /// Check the plane constraint and the coordinate bound.
    pub fn validate(&self) -> MapResult<()> {
        let Self { q, r, s } = *self;
        if q as i64 + r as i64 + s as i64 != 0 {
            return Err(MapError::InvalidCoordinate { q, r, s });
        }
        if [q, r, s].iter().any(|c| c.unsigned_abs() > MAX_COORD as u32) {
            return Err(MapError::CoordinateOutOfRange { q, r, s, limit: MAX_COORD });
        }
        Ok(())
    }

    /// Build from axial coordinates; s is derived.
    pub fn axial(q: i32, r: i32) -> Self {
        Self { q, r, s: -q - r }
    }

    /// Step `count` tiles along one of the six directions.
    pub fn offset(self, direction: usize, count: i32) -> Self {
        let d = DIRECTIONS[direction % 6];
        Self {
            q: self.q + d.q * count,
            r: self.r + d.r * count,
            s: self.s + d.s * count,
        }
    }

    /// All six lattice neighbors, whether or not they are occupied.
    pub fn neighbors(self) -> [Hex; 6] {
        DIRECTIONS.map(|d| Hex {
            q: self.q + d.q,
            r: self.r + d.r,
            s: self.s + d.s,
        })
    }

    /// Lattice distance in steps.
    pub fn distance(self, other: Hex) -> i32 {
        ((self.q - other.q).abs() + (self.r - other.r).abs() + (self.s - other.s).abs()) / 2
    }

    /// Every tile within `radius` steps of `self`, in row-major order.
    pub fn within(self, radius: i32) -> Vec<Hex> {
        let mut result = Vec::new();
        for dr in -radius..=radius {
            let q_min = (-radius).max(-dr - radius);
            let q_max = radius.min(-dr + radius);
            for dq in q_min..=q_max {
                result.push(Hex::axial(self.q + dq, self.r + dr));
            }
        }
        result
    }
}

impl fmt::Display for Hex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.q, self.r, self.s)
    }
}

/// Row-major order: by r, then q. s only separates off-plane values.
impl Ord for Hex {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.r, self.q, self.s).cmp(&(other.r, other.q, other.s))
    }
}

impl PartialOrd for Hex {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Pointy-top layout mapping tiles to cartesian space with y growing upward.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HexLayout {
    /// Centre-to-corner distance in pixels
    pub radius: f64,
}

impl HexLayout {
    pub fn new(radius: f64) -> Self {
        Self { radius }
    }

    /// Centre of a tile in cartesian space.
    pub fn to_pixel(&self, hex: Hex) -> (f64, f64) {
        let sqrt3 = 3f64.sqrt();
        let x = self.radius * (sqrt3 * hex.q as f64 + sqrt3 / 2.0 * hex.r as f64);
        let y = self.radius * (1.5 * hex.r as f64);
        (x, y)
    }

    /// The tile containing a cartesian point.
    pub fn from_pixel(&self, x: f64, y: f64) -> Hex {
        let sqrt3 = 3f64.sqrt();
        let q = (sqrt3 / 3.0 * x - y / 3.0) / self.radius;
        let r = (2.0 / 3.0 * y) / self.radius;
        cube_round(q, r, -q - r)
    }

    /// Width and height of a single tile's bounding box.
    pub fn tile_size(&self) -> (f64, f64) {
        (3f64.sqrt() * self.radius, 2.0 * self.radius)
    }
}

/// Round fractional cube coordinates to the nearest tile, fixing the
/// component with the largest rounding error so the sum stays zero.
fn cube_round(q: f64, r: f64, s: f64) -> Hex {
    let mut rq = q.round();
    let mut rr = r.round();
    let rs = s.round();

    let dq = (rq - q).abs();
    let dr = (rr - r).abs();
    let ds = (rs - s).abs();

    if dq > dr && dq > ds {
        rq = -rr - rs;
    } else if dr > ds {
        rr = -rq - rs;
    }

    Hex::axial(rq as i32, rr as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_off_plane() {
        assert!(Hex::new(1, -1, 0).is_ok());
        let err = Hex::new(1, 1, 1).unwrap_err();
        assert!(matches!(err, MapError::InvalidCoordinate { q: 1, r: 1, s: 1 }));
    }

    #[test]
    fn test_new_rejects_extreme_coordinates() {
        // Sums to zero, but a neighbor step would overflow
        let err = Hex::new(i32::MAX, -i32::MAX, 0).unwrap_err();
        assert!(matches!(err, MapError::CoordinateOutOfRange { .. }));
        // The sum itself would overflow in i32
        assert!(Hex::new(i32::MAX, 1, i32::MIN).is_err());

        let edge = Hex::new(MAX_COORD, -MAX_COORD, 0).unwrap();
        let far = Hex::new(-MAX_COORD, 0, MAX_COORD).unwrap();
        assert_eq!(edge.neighbors().len(), 6);
        assert_eq!(edge.distance(far), 2 * MAX_COORD);
        assert!(Hex::new(MAX_COORD + 1, -MAX_COORD - 1, 0).is_err());
    }

    #[test]
    fn test_order_agrees_with_equality() {
        let off_plane = Hex { q: 0, r: 0, s: 1 };
        assert_ne!(off_plane, Hex::ORIGIN);
        assert_ne!(off_plane.cmp(&Hex::ORIGIN), Ordering::Equal);
    }

    #[test]
    fn test_directions_stay_on_plane() {
        for d in DIRECTIONS {
            assert_eq!(d.q + d.r + d.s, 0);
            assert_eq!(Hex::ORIGIN.distance(d), 1);
        }
    }

    #[test]
    fn test_neighbors_are_distinct_and_adjacent() {
        let center = Hex::axial(3, -2);
        let neighbors = center.neighbors();
        for (i, a) in neighbors.iter().enumerate() {
            assert_eq!(center.distance(*a), 1);
            for b in &neighbors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_within_counts() {
        assert_eq!(Hex::ORIGIN.within(0).len(), 1);
        assert_eq!(Hex::ORIGIN.within(1).len(), 7);
        assert_eq!(Hex::ORIGIN.within(2).len(), 19);
        let mut sorted = Hex::ORIGIN.within(2);
        sorted.sort();
        assert_eq!(sorted, Hex::ORIGIN.within(2));
    }

    #[test]
    fn test_layout_round_trip_centres() {
        let layout = HexLayout::new(7.0);
        for hex in Hex::axial(5, 5).within(3) {
            let (x, y) = layout.to_pixel(hex);
            assert_eq!(layout.from_pixel(x, y), hex);
            // Points well inside the tile resolve to it as well
            assert_eq!(layout.from_pixel(x + 2.0, y - 2.0), hex);
        }
    }

    #[test]
    fn test_row_major_order() {
        let mut hexes = vec![Hex::axial(1, 1), Hex::axial(0, 1), Hex::axial(5, 0)];
        hexes.sort();
        assert_eq!(hexes, vec![Hex::axial(5, 0), Hex::axial(0, 1), Hex::axial(1, 1)]);
    }
}
