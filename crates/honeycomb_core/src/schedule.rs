//! Round-by-round measurement scheduling.
//!
//! A cycle is six rounds. Each round measures every edge of one color as a
//! two-qubit parity check of one Pauli type, and every check receives the
//! next global measurement-time index. The index table is an explicit
//! accumulator: scheduling a cycle consumes it and hands it back inside the
//! `ScheduledCycle`, so no counter is shared between independent builds.

use crate::Result;
use crate::circuit::{Circuit, Instruction, Pauli, PauliProduct};
use crate::lattice::{Color, Lattice};
use crate::qubits::{QubitIndex, QubitPair};
use honeycomb_common::consts::ROUNDS_PER_CYCLE;
use std::collections::BTreeMap;
use tracing::debug;

/// The color and Pauli type measured in one round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Round {
    pub color: Color,
    pub pauli: Pauli,
}

/// The fixed round sequence of one cycle.
pub const CYCLE: [Round; ROUNDS_PER_CYCLE] = [
    Round { color: Color::Red, pauli: Pauli::X },
    Round { color: Color::Green, pauli: Pauli::Z },
    Round { color: Color::Blue, pauli: Pauli::X },
    Round { color: Color::Red, pauli: Pauli::Z },
    Round { color: Color::Green, pauli: Pauli::X },
    Round { color: Color::Blue, pauli: Pauli::Z },
];

/// Key of the measurement-time table.
///
/// Each edge is measured twice per cycle, once per Pauli type, so the Pauli
/// is part of the key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CheckKey {
    pub pair: QubitPair,
    pub pauli: Pauli,
}

/// Append-only table of the latest measurement time of every check.
#[derive(Clone, Debug, Default)]
pub struct MeasurementTimes {
    next: u64,
    latest: BTreeMap<CheckKey, u64>,
}

impl MeasurementTimes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns the next measurement time to `key` and returns it.
    pub fn record(&mut self, key: CheckKey) -> u64 {
        let time = self.next;
        self.next += 1;
        self.latest.insert(key, time);
        time
    }

    /// Latest measurement time of `key`, if it was ever measured.
    pub fn latest(&self, key: &CheckKey) -> Option<u64> {
        self.latest.get(key).copied()
    }

    /// Number of measurements recorded so far.
    pub fn recorded(&self) -> u64 {
        self.next
    }

    /// Number of distinct checks seen.
    pub fn num_checks(&self) -> usize {
        self.latest.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CheckKey, &u64)> {
        self.latest.iter()
    }
}

/// How a two-qubit parity check is written into the circuit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MeasurementStyle {
    /// A single `MPP` instruction per round.
    #[default]
    Native,
    /// Basis change, `CX`, single-qubit readout, `CX`, inverse basis change.
    Decomposed,
}

/// Measurement times of one scheduled cycle.
#[derive(Clone, Debug)]
pub struct ScheduledCycle {
    start: u64,
    round_ends: [u64; ROUNDS_PER_CYCLE],
    times: MeasurementTimes,
}

impl ScheduledCycle {
    /// Record position of the cycle's first measurement.
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Record position immediately after round `round_index`.
    pub fn round_end(&self, round_index: usize) -> u64 {
        self.round_ends[round_index]
    }

    /// Measurements in the whole cycle.
    pub fn measurements(&self) -> u64 {
        self.round_ends[ROUNDS_PER_CYCLE - 1] - self.start
    }

    pub fn times(&self) -> &MeasurementTimes {
        &self.times
    }

    /// Returns the accumulator for the next cycle.
    pub fn into_times(self) -> MeasurementTimes {
        self.times
    }
}

/// Parity checks of every round, resolved to qubit pairs.
#[derive(Clone, Debug)]
pub struct CycleScheduler {
    by_color: [Vec<QubitPair>; 3],
}

impl CycleScheduler {
    /// Collects the checks of each color from the lattice.
    ///
    /// # Errors
    ///
    /// `UnindexedQubit` if an edge endpoint is missing from `qubits`.
    pub fn new(lattice: &Lattice, qubits: &QubitIndex) -> Result<Self> {
        let mut by_color: [Vec<QubitPair>; 3] = Default::default();
        for (edge, color) in lattice.edges() {
            by_color[color.category()].push(qubits.pair(edge)?);
        }
        Ok(Self { by_color })
    }

    /// Checks measured in round `round_index`, in emission order.
    pub fn checks(&self, round_index: usize) -> &[QubitPair] {
        &self.by_color[CYCLE[round_index].color.category()]
    }

    pub fn measurements_in_round(&self, round_index: usize) -> usize {
        self.checks(round_index).len()
    }

    pub fn measurements_per_cycle(&self) -> usize {
        (0..ROUNDS_PER_CYCLE)
            .map(|r| self.measurements_in_round(r))
            .sum()
    }

    /// Records one cycle's checks in `times`, round by round.
    pub fn schedule_cycle(&self, mut times: MeasurementTimes) -> ScheduledCycle {
        let start = times.recorded();
        let mut round_ends = [start; ROUNDS_PER_CYCLE];
        for (r, round) in CYCLE.iter().enumerate() {
            for &pair in self.checks(r) {
                times.record(CheckKey {
                    pair,
                    pauli: round.pauli,
                });
            }
            round_ends[r] = times.recorded();
        }
        debug!(start, end = times.recorded(), "scheduled cycle");
        ScheduledCycle {
            start,
            round_ends,
            times,
        }
    }

    /// Appends the parity measurements of round `round_index` to `circuit`.
    ///
    /// Records appear in the same order as `checks(round_index)`, whichever
    /// style is used.
    pub fn emit_round(
        &self,
        round_index: usize,
        style: MeasurementStyle,
        flip_probability: f64,
        circuit: &mut Circuit,
    ) {
        let pauli = CYCLE[round_index].pauli;
        let checks = self.checks(round_index);
        match style {
            MeasurementStyle::Native => circuit.push(Instruction::Mpp {
                flip_probability,
                products: checks
                    .iter()
                    .map(|&qubits| PauliProduct { pauli, qubits })
                    .collect(),
            }),
            MeasurementStyle::Decomposed => {
                let pairs: Vec<(usize, usize)> =
                    checks.iter().map(|p| (p.low(), p.high())).collect();
                let basis: Vec<usize> = pairs.iter().flat_map(|&(a, b)| [a, b]).collect();
                if pauli == Pauli::X {
                    circuit.push(Instruction::H {
                        qubits: basis.clone(),
                    });
                }
                circuit.push(Instruction::Cx {
                    pairs: pairs.clone(),
                });
                circuit.push(Instruction::M {
                    flip_probability,
                    qubits: pairs.iter().map(|&(_, t)| t).collect(),
                });
                circuit.push(Instruction::Cx { pairs });
                if pauli == Pauli::X {
                    circuit.push(Instruction::H { qubits: basis });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduler(distance: usize) -> CycleScheduler {
        let lattice = Lattice::build(distance).unwrap();
        let qubits = QubitIndex::for_lattice(&lattice);
        CycleScheduler::new(&lattice, &qubits).unwrap()
    }

    #[test]
    fn round_sizes_match_edge_colors() {
        let lattice = Lattice::build(2).unwrap();
        let qubits = QubitIndex::for_lattice(&lattice);
        let scheduler = CycleScheduler::new(&lattice, &qubits).unwrap();
        for (r, round) in CYCLE.iter().enumerate() {
            assert_eq!(
                scheduler.measurements_in_round(r),
                lattice.edges_of(round.color).count()
            );
        }
        let total: usize = (0..6).map(|r| scheduler.measurements_in_round(r)).sum();
        assert_eq!(scheduler.measurements_per_cycle(), total);
        assert_eq!(total, 6 * 6 * 4);
    }

    #[test]
    fn times_are_strictly_increasing_across_cycles() {
        let scheduler = scheduler(1);
        let first = scheduler.schedule_cycle(MeasurementTimes::new());
        assert_eq!(first.start(), 0);
        assert_eq!(first.measurements(), 36);
        for r in 0..6 {
            assert_eq!(first.round_end(r), 6 * (r as u64 + 1));
        }

        let second = scheduler.schedule_cycle(first.into_times());
        assert_eq!(second.start(), 36);
        assert_eq!(second.round_end(5), 72);

        let times = second.times();
        // Every edge, once per Pauli type.
        assert_eq!(times.num_checks(), 36);
        let mut seen: Vec<u64> = times.iter().map(|(_, t)| *t).collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 36);
        assert!(seen.iter().all(|&t| (36..72).contains(&t)));
    }

    #[test]
    fn native_round_measures_round_pauli() {
        let scheduler = scheduler(1);
        let mut circuit = Circuit::new();
        scheduler.emit_round(1, MeasurementStyle::Native, 0.0, &mut circuit);
        assert_eq!(circuit.len(), 1);
        match &circuit.instructions()[0] {
            Instruction::Mpp { products, .. } => {
                assert_eq!(products.len(), 6);
                assert!(products.iter().all(|p| p.pauli == Pauli::Z));
                let pairs: Vec<QubitPair> = products.iter().map(|p| p.qubits).collect();
                assert_eq!(pairs, scheduler.checks(1));
            }
            other => panic!("expected MPP, got {other:?}"),
        }
    }

    #[test]
    fn decomposed_round_matches_native_record_count() {
        let scheduler = scheduler(2);
        for r in 0..6 {
            let mut native = Circuit::new();
            let mut decomposed = Circuit::new();
            scheduler.emit_round(r, MeasurementStyle::Native, 0.0, &mut native);
            scheduler.emit_round(r, MeasurementStyle::Decomposed, 0.0, &mut decomposed);
            assert_eq!(native.num_measurements(), decomposed.num_measurements());
            let expected_len = if CYCLE[r].pauli == Pauli::X { 5 } else { 3 };
            assert_eq!(decomposed.len(), expected_len);
        }
    }

    #[test]
    fn checks_of_one_round_are_disjoint() {
        let scheduler = scheduler(3);
        for r in 0..6 {
            let mut touched: Vec<usize> = scheduler
                .checks(r)
                .iter()
                .flat_map(|p| [p.low(), p.high()])
                .collect();
            let n = touched.len();
            touched.sort_unstable();
            touched.dedup();
            assert_eq!(touched.len(), n);
        }
    }
}
