//! Stable integer indices for the physical qubits of a lattice.
//!
//! Every edge endpoint carries a qubit. Indices are assigned by sorting the
//! distinct endpoints by `(re, im)` and enumerating from zero, so the mapping
//! depends only on the edge set and never on discovery order.

use crate::lattice::{Edge, Lattice};
use crate::torus::Coord;
use crate::{HoneycombError, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// An unordered pair of qubit indices, stored with `low < high`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QubitPair {
    low: usize,
    high: usize,
}

impl QubitPair {
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            low: a.min(b),
            high: a.max(b),
        }
    }

    pub fn low(&self) -> usize {
        self.low
    }

    pub fn high(&self) -> usize {
        self.high
    }
}

impl fmt::Display for QubitPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.low, self.high)
    }
}

/// Bidirectional mapping between qubit coordinates and indices.
#[derive(Clone, Debug, Default)]
pub struct QubitIndex {
    coords: Vec<Coord>,
    index: BTreeMap<Coord, usize>,
}

impl QubitIndex {
    /// Indexes every endpoint of the given edges.
    pub fn from_edges<'a, I>(edges: I) -> Self
    where
        I: IntoIterator<Item = &'a Edge>,
    {
        let endpoints: BTreeSet<Coord> = edges
            .into_iter()
            .flat_map(|edge| [edge.left(), edge.right()])
            .collect();
        let coords: Vec<Coord> = endpoints.into_iter().collect();
        let index = coords.iter().enumerate().map(|(i, c)| (*c, i)).collect();
        Self { coords, index }
    }

    /// Indexes the qubits of a lattice.
    pub fn for_lattice(lattice: &Lattice) -> Self {
        Self::from_edges(lattice.edges().keys())
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn index_of(&self, coord: Coord) -> Option<usize> {
        self.index.get(&coord).copied()
    }

    pub fn coord_of(&self, qubit: usize) -> Option<Coord> {
        self.coords.get(qubit).copied()
    }

    /// Coordinates in index order.
    pub fn coords(&self) -> &[Coord] {
        &self.coords
    }

    /// The qubit pair an edge acts on.
    ///
    /// # Errors
    ///
    /// `UnindexedQubit` if either endpoint is not in the index.
    pub fn pair(&self, edge: &Edge) -> Result<QubitPair> {
        let lookup = |c: Coord| self.index_of(c).ok_or(HoneycombError::UnindexedQubit(c));
        Ok(QubitPair::new(lookup(edge.left())?, lookup(edge.right())?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_one_has_twelve_qubits() {
        let lattice = Lattice::build(1).unwrap();
        let qubits = QubitIndex::for_lattice(&lattice);
        assert_eq!(qubits.len(), 12);
        assert_eq!(qubits.coord_of(0), Some(Coord::new(1, 0)));
        assert_eq!(qubits.coord_of(11), Some(Coord::new(3, 5)));
        assert_eq!(qubits.coord_of(12), None);
        for (i, &c) in qubits.coords().iter().enumerate() {
            assert_eq!(qubits.index_of(c), Some(i));
        }
    }

    #[test]
    fn index_ignores_edge_order() {
        let lattice = Lattice::build(2).unwrap();
        let forward = QubitIndex::from_edges(lattice.edges().keys());
        let reversed = QubitIndex::from_edges(lattice.edges().keys().rev());
        assert_eq!(forward.coords(), reversed.coords());
    }

    #[test]
    fn pair_is_unordered() {
        assert_eq!(QubitPair::new(7, 2), QubitPair::new(2, 7));
        assert_eq!(QubitPair::new(7, 2).low(), 2);
    }

    #[test]
    fn unknown_endpoint_is_reported() {
        let qubits = QubitIndex::from_edges(&[Edge::new(Coord::new(1, 0), Coord::new(1, 1))]);
        let stray = Edge::new(Coord::new(1, 0), Coord::new(9, 9));
        assert!(matches!(
            qubits.pair(&stray),
            Err(HoneycombError::UnindexedQubit(c)) if c == Coord::new(9, 9)
        ));
    }
}
