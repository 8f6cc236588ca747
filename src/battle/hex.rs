//! Hex coordinate system (cube coordinates, pointy-top layout)
//!
//! Every coordinate produced here keeps `q + r + s == 0`. Callers are
//! expected to pass well-formed coordinates in; nothing in this module fails.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Screen-space point, in the same units as the layout's cell size
pub type PixelCoord = DVec2;

const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// Cube hex coordinate
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct CubeCoord {
    pub q: i32,
    pub r: i32,
    pub s: i32,
}

impl CubeCoord {
    pub const ORIGIN: CubeCoord = CubeCoord { q: 0, r: 0, s: 0 };

    pub fn new(q: i32, r: i32, s: i32) -> Self {
        debug_assert_eq!(q + r + s, 0, "cube coordinate must satisfy q + r + s = 0");
        Self { q, r, s }
    }

    /// Build from the two independent axes, deriving `s`
    pub fn from_qr(q: i32, r: i32) -> Self {
        Self { q, r, s: -q - r }
    }

    pub fn is_valid(&self) -> bool {
        self.q + self.r + self.s == 0
    }

    pub fn scale(&self, k: i32) -> Self {
        Self {
            q: self.q * k,
            r: self.r * k,
            s: self.s * k,
        }
    }

    /// Unit offset for a direction
    pub fn direction(direction: HexDirection) -> Self {
        direction.offset()
    }

    pub fn neighbor(&self, direction: HexDirection) -> Self {
        *self + direction.offset()
    }

    /// All 6 neighbors, in `HexDirection::all()` order
    pub fn neighbors(&self) -> [CubeCoord; 6] {
        HexDirection::all().map(|dir| self.neighbor(dir))
    }

    /// Hex distance: max(|dq|, |dr|, |ds|)
    pub fn distance(&self, other: &Self) -> u32 {
        (*self - *other).length()
    }

    /// Distance from the origin
    pub fn length(&self) -> u32 {
        self.q
            .unsigned_abs()
            .max(self.r.unsigned_abs())
            .max(self.s.unsigned_abs())
    }

    /// All hexes within `range` of this one (inclusive), q-major order
    pub fn hexes_in_range(&self, range: u32) -> Vec<CubeCoord> {
        let range = range as i32;
        let mut results = Vec::new();
        for q in -range..=range {
            for r in (-range).max(-q - range)..=range.min(-q + range) {
                results.push(*self + CubeCoord::from_qr(q, r));
            }
        }
        results
    }

    pub fn to_axial(&self) -> AxialCoord {
        AxialCoord {
            q: self.q,
            r: self.r,
        }
    }

    /// Odd-row offset coordinate (odd rows shoved right)
    pub fn to_offset(&self) -> OffsetCoord {
        OffsetCoord {
            col: self.q + (self.r - (self.r & 1)) / 2,
            row: self.r,
        }
    }

    pub fn from_offset(hex: OffsetCoord) -> Self {
        let q = hex.col - (hex.row - (hex.row & 1)) / 2;
        Self::from_qr(q, hex.row)
    }
}

impl fmt::Display for CubeCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.q, self.r, self.s)
    }
}

impl Add for CubeCoord {
    type Output = CubeCoord;

    fn add(self, rhs: CubeCoord) -> Self::Output {
        CubeCoord {
            q: self.q + rhs.q,
            r: self.r + rhs.r,
            s: self.s + rhs.s,
        }
    }
}

impl Sub for CubeCoord {
    type Output = CubeCoord;

    fn sub(self, rhs: CubeCoord) -> Self::Output {
        CubeCoord {
            q: self.q - rhs.q,
            r: self.r - rhs.r,
            s: self.s - rhs.s,
        }
    }
}

impl Mul<i32> for CubeCoord {
    type Output = CubeCoord;

    fn mul(self, k: i32) -> Self::Output {
        self.scale(k)
    }
}

impl Neg for CubeCoord {
    type Output = CubeCoord;

    fn neg(self) -> Self::Output {
        self.scale(-1)
    }
}

/// Axial coordinate (cube with `s` dropped)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct AxialCoord {
    pub q: i32,
    pub r: i32,
}

impl From<AxialCoord> for CubeCoord {
    fn from(axial: AxialCoord) -> Self {
        CubeCoord::from_qr(axial.q, axial.r)
    }
}

impl From<CubeCoord> for AxialCoord {
    fn from(cube: CubeCoord) -> Self {
        cube.to_axial()
    }
}

/// Offset (column, row) coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct OffsetCoord {
    pub col: i32,
    pub row: i32,
}

/// Unrounded cube coordinate, as produced by pixel conversion
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FractionalCube {
    pub q: f64,
    pub r: f64,
    pub s: f64,
}

impl FractionalCube {
    pub fn new(q: f64, r: f64, s: f64) -> Self {
        Self { q, r, s }
    }

    /// Round to the nearest hex. The component with the largest rounding
    /// error is recomputed from the other two.
    pub fn round(&self) -> CubeCoord {
        let mut q = self.q.round();
        let mut r = self.r.round();
        let mut s = self.s.round();

        let q_diff = (q - self.q).abs();
        let r_diff = (r - self.r).abs();
        let s_diff = (s - self.s).abs();

        if q_diff > r_diff && q_diff > s_diff {
            q = -r - s;
        } else if r_diff > s_diff {
            r = -q - s;
        } else {
            s = -q - r;
        }

        CubeCoord {
            q: q as i32,
            r: r as i32,
            s: s as i32,
        }
    }
}

impl From<CubeCoord> for FractionalCube {
    fn from(hex: CubeCoord) -> Self {
        Self::new(hex.q as f64, hex.r as f64, hex.s as f64)
    }
}

/// Direction enum for the six hex neighbors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum HexDirection {
    #[default]
    East,
    NorthEast,
    NorthWest,
    West,
    SouthWest,
    SouthEast,
}

impl HexDirection {
    /// Get the cube offset for this direction
    pub fn offset(&self) -> CubeCoord {
        match self {
            HexDirection::East => CubeCoord { q: 1, r: 0, s: -1 },
            HexDirection::NorthEast => CubeCoord { q: 1, r: -1, s: 0 },
            HexDirection::NorthWest => CubeCoord { q: 0, r: -1, s: 1 },
            HexDirection::West => CubeCoord { q: -1, r: 0, s: 1 },
            HexDirection::SouthWest => CubeCoord { q: -1, r: 1, s: 0 },
            HexDirection::SouthEast => CubeCoord { q: 0, r: 1, s: -1 },
        }
    }

    /// Direction by table index (0 = East, counter-clockwise)
    pub fn from_index(index: usize) -> Option<Self> {
        Self::all().get(index).copied()
    }

    /// Get opposite direction
    pub fn opposite(&self) -> Self {
        match self {
            HexDirection::East => HexDirection::West,
            HexDirection::NorthEast => HexDirection::SouthWest,
            HexDirection::NorthWest => HexDirection::SouthEast,
            HexDirection::West => HexDirection::East,
            HexDirection::SouthWest => HexDirection::NorthEast,
            HexDirection::SouthEast => HexDirection::NorthWest,
        }
    }

    /// All directions
    pub fn all() -> [HexDirection; 6] {
        [
            HexDirection::East,
            HexDirection::NorthEast,
            HexDirection::NorthWest,
            HexDirection::West,
            HexDirection::SouthWest,
            HexDirection::SouthEast,
        ]
    }
}

/// Forward and inverse matrices for a hex orientation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    pub f0: f64,
    pub f1: f64,
    pub f2: f64,
    pub f3: f64,
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub b3: f64,
    pub start_angle: f64,
}

pub const POINTY_TOP: Orientation = Orientation {
    f0: SQRT_3,
    f1: SQRT_3 / 2.0,
    f2: 0.0,
    f3: 3.0 / 2.0,
    b0: SQRT_3 / 3.0,
    b1: -1.0 / 3.0,
    b2: 0.0,
    b3: 2.0 / 3.0,
    start_angle: 0.5,
};

/// Pixel projection for a board, centered on the origin hex
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HexLayout {
    pub size: f64,
    pub orientation: Orientation,
}

impl HexLayout {
    pub fn new(size: f64) -> Self {
        Self {
            size,
            orientation: POINTY_TOP,
        }
    }

    /// Center of a hex in pixel space
    pub fn hex_to_pixel(&self, hex: CubeCoord) -> PixelCoord {
        let m = &self.orientation;
        let (q, r) = (hex.q as f64, hex.r as f64);
        DVec2::new(
            self.size * (m.f0 * q + m.f1 * r),
            self.size * (m.f2 * q + m.f3 * r),
        )
    }

    /// Unrounded hex under a pixel
    pub fn pixel_to_fractional(&self, point: PixelCoord) -> FractionalCube {
        let m = &self.orientation;
        let q = (m.b0 * point.x + m.b1 * point.y) / self.size;
        let r = (m.b2 * point.x + m.b3 * point.y) / self.size;
        FractionalCube::new(q, r, -q - r)
    }

    /// Hex containing a pixel
    pub fn pixel_to_hex(&self, point: PixelCoord) -> CubeCoord {
        self.pixel_to_fractional(point).round()
    }

    pub fn hex_width(&self) -> f64 {
        self.size * 2.0
    }

    pub fn hex_height(&self) -> f64 {
        SQRT_3 * self.size
    }
}
