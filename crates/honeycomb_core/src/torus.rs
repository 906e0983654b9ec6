//! Periodic coordinate arithmetic.
//!
//! Lattice points of the honeycomb construction are written as complex
//! numbers `re + im*i`. Every point this crate produces is integral, so a
//! coordinate is stored as a pair of `i64` and all wrapping is exact.

use core::fmt;
use core::ops::Add;

/// A lattice point `re + im*i`.
///
/// Ordering is lexicographic by `(re, im)`, which is the order used both for
/// canonical edges and for qubit enumeration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coord {
    /// Real (horizontal) component.
    pub re: i64,
    /// Imaginary (vertical) component.
    pub im: i64,
}

impl Coord {
    /// Creates a coordinate from its two components.
    pub const fn new(re: i64, im: i64) -> Self {
        Self { re, im }
    }

    /// Returns the coordinate as floating point `[re, im]`, as used in circuit
    /// annotations.
    pub fn to_f64(self) -> [f64; 2] {
        [self.re as f64, self.im as f64]
    }
}

impl Add for Coord {
    type Output = Coord;

    fn add(self, rhs: Coord) -> Coord {
        Coord::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.re, self.im)
    }
}

/// Reduces `c` into the fundamental domain `[0, width) x [0, height)`.
///
/// Uses floor-style modulo so negative inputs land on non-negative results.
pub fn wrap(c: Coord, width: i64, height: i64) -> Coord {
    Coord::new(c.re.rem_euclid(width), c.im.rem_euclid(height))
}

/// A torus of fixed width and height.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Torus {
    pub width: i64,
    pub height: i64,
}

impl Torus {
    pub const fn new(width: i64, height: i64) -> Self {
        Self { width, height }
    }

    /// Wraps a coordinate onto this torus.
    #[inline]
    pub fn wrap(&self, c: Coord) -> Coord {
        wrap(c, self.width, self.height)
    }
}
