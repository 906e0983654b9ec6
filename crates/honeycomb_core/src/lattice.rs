//! Honeycomb lattice construction and edge coloring.
//!
//! Cells are hexagons whose centres sit on a brick-wall grid: column `col`
//! is at `re = 2*col`, and odd columns are shifted down by one unit. A hexagon
//! centred at `c` has its six vertices at `c + (±1, -1)`, `c + (±1, 0)` and
//! `c + (±1, +1)`. Each vertex carries one physical qubit.
//!
//! The six edges around a hexagon alternate between two colors, neither of
//! which is the hexagon's own color. The "first" triple gets the color one
//! step after the cell's color and the "second" triple the color two steps
//! after it, so the two cells bordering an edge always agree.

use crate::torus::{Coord, Torus};
use crate::{HoneycombError, Result};
use honeycomb_common::consts::{
    CELL_COLS_PER_DISTANCE, CELL_ROWS_PER_DISTANCE, HEIGHT_PER_DISTANCE, WIDTH_PER_DISTANCE,
};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fmt;
use tracing::debug;

/// Color of a cell or an edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Color {
    Red,
    Green,
    Blue,
}

impl Color {
    /// All colors in category order.
    pub const ALL: [Color; 3] = [Color::Red, Color::Green, Color::Blue];

    /// Maps a color category (taken modulo 3) to its color.
    pub const fn from_category(category: usize) -> Color {
        Self::ALL[category % 3]
    }

    /// Position of this color in category order.
    pub const fn category(self) -> usize {
        match self {
            Color::Red => 0,
            Color::Green => 1,
            Color::Blue => 2,
        }
    }

    /// Colors of the (first, second) edge categories around a cell of this
    /// color.
    pub const fn edge_colors(self) -> (Color, Color) {
        match self {
            Color::Red => (Color::Green, Color::Blue),
            Color::Green => (Color::Blue, Color::Red),
            Color::Blue => (Color::Red, Color::Green),
        }
    }
}

/// One of the two alternating edge triples around a hexagon.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeCategory {
    First,
    Second,
}

/// A pair of vertex offsets, relative to a cell centre, spanning one edge.
pub type OffsetPair = (Coord, Coord);

/// Edges whose neighbouring cell across the edge is one color step behind.
pub const FIRST_EDGES: [OffsetPair; 3] = [
    (Coord::new(1, -1), Coord::new(1, 0)),
    (Coord::new(1, 1), Coord::new(-1, 1)),
    (Coord::new(-1, 0), Coord::new(-1, -1)),
];

/// Edges whose neighbouring cell across the edge is one color step ahead.
pub const SECOND_EDGES: [OffsetPair; 3] = [
    (Coord::new(-1, -1), Coord::new(1, -1)),
    (Coord::new(1, 0), Coord::new(1, 1)),
    (Coord::new(-1, 1), Coord::new(-1, 0)),
];

impl EdgeCategory {
    pub const BOTH: [EdgeCategory; 2] = [EdgeCategory::First, EdgeCategory::Second];

    /// Vertex offset pairs of this category.
    pub const fn offsets(self) -> &'static [OffsetPair; 3] {
        match self {
            EdgeCategory::First => &FIRST_EDGES,
            EdgeCategory::Second => &SECOND_EDGES,
        }
    }

    /// Color this category takes around a cell of color `cell`.
    pub const fn color_around(self, cell: Color) -> Color {
        let (first, second) = cell.edge_colors();
        match self {
            EdgeCategory::First => first,
            EdgeCategory::Second => second,
        }
    }
}

/// An unordered pair of lattice coordinates, stored with `left < right`.
///
/// The canonical order is what lets the two cells sharing an edge reach the
/// same map entry and agree on a single color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Edge {
    left: Coord,
    right: Coord,
}

impl Edge {
    /// Creates the canonical edge between `a` and `b`, in either order.
    pub fn new(a: Coord, b: Coord) -> Self {
        if a <= b {
            Self { left: a, right: b }
        } else {
            Self { left: b, right: a }
        }
    }

    pub fn left(&self) -> Coord {
        self.left
    }

    pub fn right(&self) -> Coord {
        self.right
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.left, self.right)
    }
}

/// A colored honeycomb lattice on a torus.
///
/// Fully determined by the distance. Cells and edges are kept in ordered maps
/// so every iteration over them is deterministic.
#[derive(Clone, Debug)]
pub struct Lattice {
    distance: usize,
    torus: Torus,
    cells: BTreeMap<Coord, Color>,
    edges: BTreeMap<Edge, Color>,
}

impl Lattice {
    /// Builds the lattice for code distance `distance`.
    ///
    /// Places `3d x 2d` cells on a `4d x 6d` torus and colors every edge from
    /// its two adjacent cells.
    ///
    /// # Errors
    ///
    /// `InvalidDistance` if `distance` is zero, and `ColoringConflict` if two
    /// cells disagree on an edge's color.
    pub fn build(distance: usize) -> Result<Self> {
        if distance == 0 {
            return Err(HoneycombError::InvalidDistance(distance));
        }

        let d = distance as i64;
        let torus = Torus::new(WIDTH_PER_DISTANCE * d, HEIGHT_PER_DISTANCE * d);
        let cells = place_cells(distance, &torus);
        let edges = color_edges(&torus, &cells, &FIRST_EDGES, &SECOND_EDGES)?;

        debug!(
            distance,
            cells = cells.len(),
            edges = edges.len(),
            "built honeycomb lattice"
        );

        Ok(Self {
            distance,
            torus,
            cells,
            edges,
        })
    }

    pub fn distance(&self) -> usize {
        self.distance
    }

    pub fn torus(&self) -> Torus {
        self.torus
    }

    /// All cell centres with their colors.
    pub fn cells(&self) -> &BTreeMap<Coord, Color> {
        &self.cells
    }

    /// All edges with their colors.
    pub fn edges(&self) -> &BTreeMap<Edge, Color> {
        &self.edges
    }

    pub fn cell_color(&self, center: Coord) -> Option<Color> {
        self.cells.get(&center).copied()
    }

    pub fn edge_color(&self, edge: &Edge) -> Option<Color> {
        self.edges.get(edge).copied()
    }

    /// Centres of the cells of one color, in coordinate order.
    pub fn cells_of(&self, color: Color) -> impl Iterator<Item = Coord> + '_ {
        self.cells
            .iter()
            .filter(move |(_, c)| **c == color)
            .map(|(center, _)| *center)
    }

    /// Edges of one color, in canonical order.
    pub fn edges_of(&self, color: Color) -> impl Iterator<Item = Edge> + '_ {
        self.edges
            .iter()
            .filter(move |(_, c)| **c == color)
            .map(|(edge, _)| *edge)
    }

    /// The three wrapped edges of one category around the cell at `center`.
    pub fn cell_edges(&self, center: Coord, category: EdgeCategory) -> [Edge; 3] {
        category
            .offsets()
            .map(|(a, b)| Edge::new(self.torus.wrap(center + a), self.torus.wrap(center + b)))
    }
}

fn place_cells(distance: usize, torus: &Torus) -> BTreeMap<Coord, Color> {
    let mut cells = BTreeMap::new();
    for row in 0..CELL_ROWS_PER_DISTANCE * distance {
        for col in 0..CELL_COLS_PER_DISTANCE * distance {
            let parity = (col % 2) as i64;
            let center = Coord::new(2 * col as i64, 2 * row as i64 - parity);
            let category = (-(row as i64) - parity).rem_euclid(3) as usize;
            // Wrapped collisions fold the grid onto itself; the last write wins.
            cells.insert(torus.wrap(center), Color::from_category(category));
        }
    }
    cells
}

fn color_edges(
    torus: &Torus,
    cells: &BTreeMap<Coord, Color>,
    first: &[OffsetPair; 3],
    second: &[OffsetPair; 3],
) -> Result<BTreeMap<Edge, Color>> {
    let mut edges = BTreeMap::new();
    for (&center, &cell_color) in cells {
        let (first_color, second_color) = cell_color.edge_colors();
        for (offsets, derived) in [(first, first_color), (second, second_color)] {
            for &(a, b) in offsets {
                let edge = Edge::new(torus.wrap(center + a), torus.wrap(center + b));
                match edges.entry(edge) {
                    Entry::Vacant(slot) => {
                        slot.insert(derived);
                    }
                    Entry::Occupied(slot) if *slot.get() != derived => {
                        return Err(HoneycombError::ColoringConflict {
                            edge,
                            existing: *slot.get(),
                            derived,
                        });
                    }
                    Entry::Occupied(_) => {}
                }
            }
        }
    }
    Ok(edges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, BTreeSet};

    #[test]
    fn zero_distance_is_rejected() {
        assert!(matches!(
            Lattice::build(0),
            Err(HoneycombError::InvalidDistance(0))
        ));
    }

    #[test]
    fn distance_one_counts() {
        let lattice = Lattice::build(1).unwrap();
        assert_eq!(lattice.torus(), Torus::new(4, 6));
        assert_eq!(lattice.cells().len(), 6);
        assert_eq!(lattice.edges().len(), 18);
        for color in Color::ALL {
            assert_eq!(lattice.cells_of(color).count(), 2);
            assert_eq!(lattice.edges_of(color).count(), 6);
        }
    }

    #[test]
    fn cell_colors_follow_row_and_column() {
        let lattice = Lattice::build(1).unwrap();
        assert_eq!(lattice.cell_color(Coord::new(0, 0)), Some(Color::Red));
        assert_eq!(lattice.cell_color(Coord::new(0, 2)), Some(Color::Blue));
        assert_eq!(lattice.cell_color(Coord::new(0, 4)), Some(Color::Green));
        // Odd column, row 0 wraps from im = -1.
        assert_eq!(lattice.cell_color(Coord::new(2, 5)), Some(Color::Blue));
    }

    #[test]
    fn edge_is_canonical_in_either_order() {
        let a = Coord::new(3, 1);
        let b = Coord::new(1, 4);
        assert_eq!(Edge::new(a, b), Edge::new(b, a));
        let e = Edge::new(a, b);
        assert_eq!(e.left(), b);
        assert_eq!(e.right(), a);
        assert_eq!(Edge::new(e.left(), e.right()), e);
    }

    #[test]
    fn cell_edge_categories_carry_permuted_colors() {
        let lattice = Lattice::build(2).unwrap();
        for (&center, &color) in lattice.cells() {
            for category in EdgeCategory::BOTH {
                for edge in lattice.cell_edges(center, category) {
                    assert_eq!(
                        lattice.edge_color(&edge),
                        Some(category.color_around(color)),
                        "cell {center} edge {edge}"
                    );
                }
            }
        }
    }

    #[test]
    fn every_qubit_sees_three_distinct_colors() {
        let lattice = Lattice::build(2).unwrap();
        let mut incident: BTreeMap<Coord, Vec<Color>> = BTreeMap::new();
        for (edge, &color) in lattice.edges() {
            incident.entry(edge.left()).or_default().push(color);
            incident.entry(edge.right()).or_default().push(color);
        }
        assert_eq!(incident.len(), 48);
        for (coord, colors) in incident {
            let distinct: BTreeSet<_> = colors.iter().collect();
            assert_eq!(colors.len(), 3, "qubit {coord}");
            assert_eq!(distinct.len(), 3, "qubit {coord}");
        }
    }

    #[test]
    fn swapped_offset_tables_conflict() {
        let torus = Torus::new(4, 6);
        let cells = place_cells(1, &torus);
        let result = color_edges(&torus, &cells, &SECOND_EDGES, &FIRST_EDGES);
        assert!(matches!(
            result,
            Err(HoneycombError::ColoringConflict { .. })
        ));
    }

    #[test]
    fn rebuild_is_identical() {
        let a = Lattice::build(3).unwrap();
        let b = Lattice::build(3).unwrap();
        assert_eq!(a.cells(), b.cells());
        assert_eq!(a.edges(), b.edges());
    }
}
