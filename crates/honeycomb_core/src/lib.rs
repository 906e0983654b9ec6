//! Core honeycomb code construction and decoding-graph algorithms.
//!
//! This crate builds the periodic honeycomb lattice and its three-coloring,
//! schedules the six parity-measurement rounds of a cycle, derives detectors
//! from the measurement history, emits the resulting circuit, and turns a
//! detector error model produced by a simulation runtime into a weighted
//! decoding graph for a matching decoder.

/// Circuit instruction stream for the simulation runtime.
///
/// Holds the typed instruction list produced by the generator and renders it
/// in the Stim text format. Also provides repeat-aware measurement and
/// detector counts and a validation pass over detector record references.
pub mod circuit;

/// Detector error model representation and traversal.
///
/// Represents the nested, block-repeated error model emitted by the
/// simulation runtime, and walks it depth-first while threading the running
/// detector offset through each step.
pub mod dem;

/// Detector construction for each round of a cycle.
///
/// Selects the cells whose parity check closes in a round and resolves the
/// record lookbacks of their edge measurements, windowed across the cycle
/// boundary where the partner measurement belongs to the previous cycle.
pub mod detectors;

/// Full memory-experiment circuit generation.
///
/// Ties the lattice, qubit index, scheduler and detector generator together
/// into one validated circuit for a given distance, cycle count and noise
/// strength.
pub mod generator;

/// Weighted decoding graph built from an error model.
///
/// Nodes are detectors plus a boundary node and an auxiliary node that keeps
/// the graph connected. Edges carry the negative log probability of their
/// error mechanism and the observables it flips.
pub mod graph;

/// Honeycomb lattice construction and edge coloring.
///
/// Places hexagon centres on the torus, assigns each a color, and derives a
/// conflict-checked color for every edge from its adjacent cells.
pub mod lattice;

/// Stable integer indices for the physical qubits of a lattice.
pub mod qubits;

/// Round-by-round measurement scheduling.
///
/// Lists the parity checks of each of the six rounds and records the global
/// measurement-time index of every check in an explicit accumulator.
pub mod schedule;

/// Periodic coordinate arithmetic.
pub mod torus;

use circuit::Pauli;
use lattice::{Color, Edge};
use qubits::QubitPair;
use thiserror::Error;
use torus::Coord;

/// Error types returned by honeycomb construction and graph operations.
///
/// Every variant is fatal for the call that raised it. Coloring conflicts,
/// missing measurements and out-of-range record references signal a bug in
/// the construction tables rather than bad user input; the remaining
/// variants reject invalid parameters or unsupported error models.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HoneycombError {
    /// The code distance must be at least one.
    #[error("distance must be positive, got {0}")]
    InvalidDistance(usize),

    /// A circuit needs at least one measurement cycle.
    #[error("cycle count must be positive, got {0}")]
    InvalidCycles(usize),

    /// A noise strength outside the unit interval.
    #[error("noise strength must lie in [0, 1], got {0}")]
    InvalidNoise(f64),

    /// Two adjacent cells derived different colors for the same edge.
    ///
    /// Never raised for a correctly parameterized lattice. Indicates that
    /// the hexagon offset tables or the cell color permutation are wrong.
    #[error("edge {edge} colored {existing:?} by one cell and {derived:?} by another")]
    ColoringConflict {
        /// The edge whose two derivations disagree.
        edge: Edge,
        /// Color assigned by the first cell to reach the edge.
        existing: Color,
        /// Color derived by the cell that detected the conflict.
        derived: Color,
    },

    /// A lattice coordinate has no qubit index.
    #[error("coordinate {0} carries no qubit")]
    UnindexedQubit(Coord),

    /// A detector references a check with no recorded measurement.
    ///
    /// The scheduler records every edge of every round, so this means the
    /// lattice and the schedule disagree about which edges exist.
    #[error("no {pauli:?} measurement recorded for qubit pair {pair}")]
    MissingMeasurement {
        /// The qubit pair of the check.
        pair: QubitPair,
        /// The Pauli type of the check.
        pauli: Pauli,
    },

    /// A detector lookback is non-negative or reaches before the record start.
    #[error("record lookback {lookback} invalid with {available} measurements recorded")]
    RecordOutOfRange {
        /// The offending lookback.
        lookback: i64,
        /// Number of measurements recorded at the point of the detector.
        available: u64,
    },

    /// The error model contains an instruction the graph builder cannot handle.
    #[error("unsupported error model instruction '{0}'")]
    UnsupportedInstruction(String),

    /// A node index exceeds the bounds of the decoding graph.
    ///
    /// Indicates that an error mechanism references a detector beyond the
    /// detector count the graph was sized for.
    #[error("node {node} out of bounds for graph with {num_nodes} nodes")]
    NodeOutOfBounds {
        /// The offending node index.
        node: u64,
        /// Number of nodes in the graph.
        num_nodes: usize,
    },

    /// A detector id or shift pushed the running detector index past the
    /// largest representable id.
    #[error("detector index overflow adding {delta} to offset {offset}")]
    DetectorIndexOverflow {
        /// Running offset at the point of the overflow.
        offset: u64,
        /// Relative detector id or shift being added.
        delta: u64,
    },

    /// The error model references more detectors than a graph may hold.
    #[error("error model needs {count} detectors, limit is {limit}")]
    TooManyDetectors {
        /// Detector count the model requires.
        count: u64,
        /// Largest detector count accepted.
        limit: u64,
    },
}

/// Result type for honeycomb operations.
pub type Result<T> = core::result::Result<T, HoneycombError>;
