//! Detector construction for each round of a cycle.
//!
//! In round `r` the cells of color `(r + 1) mod 3` close their parity check:
//! the round measures their second-category edges, and the product of those
//! records with the records of their first-category edges (same Pauli type)
//! is deterministic. The first-category partner is measured later in the
//! cycle for rounds 0..3, so those detectors reach back into the previous
//! cycle by one full cycle of records.

use crate::circuit::Instruction;
use crate::lattice::{Color, EdgeCategory, Lattice};
use crate::qubits::QubitIndex;
use crate::schedule::{CYCLE, CheckKey, ScheduledCycle};
use crate::torus::Coord;
use crate::{HoneycombError, Result};
use honeycomb_common::consts::SAME_CYCLE_PARTNER_ROUND;

/// A detector for one cell in one round.
#[derive(Clone, Debug, PartialEq)]
pub struct Detector {
    /// Centre of the cell the detector checks.
    pub cell: Coord,
    /// Temporal layer relative to the current coordinate shift.
    pub layer: u32,
    /// Record lookbacks, first-category edges followed by second-category.
    pub lookbacks: Vec<i64>,
}

impl Detector {
    pub fn to_instruction(&self) -> Instruction {
        let [re, im] = self.cell.to_f64();
        Instruction::Detector {
            coords: [re, im, f64::from(self.layer)],
            lookbacks: self.lookbacks.clone(),
        }
    }
}

/// Color of the cells whose check closes in round `round_index`.
pub const fn closing_color(round_index: usize) -> Color {
    Color::from_category(round_index + 1)
}

/// Builds detectors from a lattice and a scheduled cycle.
pub struct DetectorGenerator<'a> {
    lattice: &'a Lattice,
    qubits: &'a QubitIndex,
}

impl<'a> DetectorGenerator<'a> {
    pub fn new(lattice: &'a Lattice, qubits: &'a QubitIndex) -> Self {
        Self { lattice, qubits }
    }

    /// Detectors closing in round `round_index` of `cycle`.
    ///
    /// Lookbacks are relative to the record position right after the round.
    ///
    /// # Errors
    ///
    /// `MissingMeasurement` if a cell edge has no recorded measurement under
    /// the round's Pauli type, and `UnindexedQubit` if an edge endpoint has
    /// no qubit.
    pub fn round_detectors(
        &self,
        round_index: usize,
        cycle: &ScheduledCycle,
    ) -> Result<Vec<Detector>> {
        let pauli = CYCLE[round_index].pauli;
        let now = cycle.round_end(round_index) as i64;
        let cycle_len = cycle.measurements() as i64;

        self.lattice
            .cells_of(closing_color(round_index))
            .map(|cell| -> Result<Detector> {
                let mut lookbacks = Vec::with_capacity(6);
                for category in EdgeCategory::BOTH {
                    let previous_cycle = category == EdgeCategory::First
                        && round_index < SAME_CYCLE_PARTNER_ROUND;
                    for edge in self.lattice.cell_edges(cell, category) {
                        let pair = self.qubits.pair(&edge)?;
                        let time = cycle
                            .times()
                            .latest(&CheckKey { pair, pauli })
                            .ok_or(HoneycombError::MissingMeasurement { pair, pauli })?;
                        let mut lookback = time as i64 - now;
                        if previous_cycle {
                            lookback -= cycle_len;
                        }
                        lookbacks.push(lookback);
                    }
                }
                Ok(Detector {
                    cell,
                    layer: 0,
                    lookbacks,
                })
            })
            .collect()
    }
}
