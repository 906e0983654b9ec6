//! Common definitions and constants shared across the honeycomb code toolkit.
//!
//! This module provides the lattice geometry constants, the measurement
//! schedule length, the decoding-graph sentinel weight, and the mnemonic table
//! for the circuit instruction stream. Everything here is plain data used by
//! the core engine, the I/O layer, and the command-line host.

#![no_std]

// Geometry and scheduling constants for the honeycomb lattice.
//
// The lattice for distance d is a torus of width 4d and height 6d. Cell
// centres sit on a 3d x 2d grid, and one measurement cycle is six rounds
// (three colors times two Pauli types).
pub mod consts {
    /// Torus width contributed by each unit of code distance.
    ///
    /// A distance-d lattice wraps horizontally with period `4 * d`. Two
    /// columns of hexagons fit in every four units of width.
    pub const WIDTH_PER_DISTANCE: i64 = 4;

    /// Torus height contributed by each unit of code distance.
    ///
    /// A distance-d lattice wraps vertically with period `6 * d`. Three rows
    /// of hexagons fit in every six units of height, which keeps the
    /// three-coloring consistent across the wrap.
    pub const HEIGHT_PER_DISTANCE: i64 = 6;

    /// Rows of hexagon centres per unit of distance.
    pub const CELL_ROWS_PER_DISTANCE: usize = 3;

    /// Columns of hexagon centres per unit of distance.
    pub const CELL_COLS_PER_DISTANCE: usize = 2;

    /// Number of parity-measurement rounds in one full cycle.
    ///
    /// Every edge color is measured once in the X basis and once in the Z
    /// basis per cycle, giving six rounds.
    pub const ROUNDS_PER_CYCLE: usize = 6;

    /// Round index from which a closing cell's first-category partner has
    /// already been measured within the current cycle.
    ///
    /// Detectors emitted in earlier rounds pair with the previous cycle's
    /// instance of those checks.
    pub const SAME_CYCLE_PARTNER_ROUND: usize = 4;

    /// Weight of the edges joining every node to the auxiliary node.
    ///
    /// Large enough that no minimum-weight matching among real nodes ever
    /// prefers a path through the auxiliary node, while still keeping the
    /// graph a single connected component.
    pub const DISCONNECTED_WEIGHT: f64 = 9_999_999_999.0;

    /// Largest detector count a decoding graph is built for.
    ///
    /// Far above any circuit this toolkit generates; a model beyond it is
    /// treated as malformed instead of being allocated.
    pub const MAX_GRAPH_DETECTORS: u64 = 1 << 28;
}

/// Instruction mnemonics for the circuit instruction stream.
///
/// Defines the operation vocabulary emitted by the circuit generator and its
/// textual form in the Stim circuit format. The set is small:
/// only what a honeycomb memory experiment needs.
pub mod isa {
    /// Opcode enumeration for circuit instructions.
    ///
    /// Each opcode maps to one line of the textual circuit format. Gate
    /// opcodes take qubit targets; annotation opcodes (detectors, coordinate
    /// shifts, qubit coordinates) carry metadata for the simulation runtime.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum Opcode {
        /// Declare the 2D position of a qubit.
        QubitCoords,

        /// Hadamard basis change, used to turn a Z-type parity measurement
        /// into an X-type one.
        H,

        /// Controlled-NOT. Used in pairs around a single-qubit readout to
        /// realize a two-qubit parity measurement without an ancilla.
        Cx,

        /// Single-qubit Z-basis measurement, optionally with a flip
        /// probability.
        M,

        /// Native Pauli-product measurement.
        ///
        /// Measures products such as `X3*X7` directly, producing one record
        /// per product.
        Mpp,

        /// Single-qubit depolarizing channel.
        Depolarize1,

        /// Layer separator between rounds.
        Tick,

        /// Declare a detector over earlier measurement records.
        Detector,

        /// Shift the coordinates of all subsequent detectors.
        ShiftCoords,

        /// Repeat a block of instructions a fixed number of times.
        Repeat,
    }

    impl Opcode {
        /// Returns the mnemonic used in the textual circuit format.
        pub const fn mnemonic(self) -> &'static str {
            match self {
                Opcode::QubitCoords => "QUBIT_COORDS",
                Opcode::H => "H",
                Opcode::Cx => "CX",
                Opcode::M => "M",
                Opcode::Mpp => "MPP",
                Opcode::Depolarize1 => "DEPOLARIZE1",
                Opcode::Tick => "TICK",
                Opcode::Detector => "DETECTOR",
                Opcode::ShiftCoords => "SHIFT_COORDS",
                Opcode::Repeat => "REPEAT",
            }
        }

        /// Returns true if this opcode appends entries to the measurement
        /// record.
        pub const fn is_measurement(self) -> bool {
            matches!(self, Opcode::M | Opcode::Mpp)
        }
    }
}
