//! Memory-experiment circuit generation.
//!
//! Produces the full circuit for a honeycomb memory: qubit coordinates, one
//! initial cycle without detectors (it establishes the records the first
//! detectors compare against), then the remaining cycles as a repeat block
//! whose body carries the detectors. Each call owns its accumulators, so
//! independent generations can run concurrently.

use crate::circuit::{Circuit, Instruction};
use crate::detectors::DetectorGenerator;
use crate::lattice::Lattice;
use crate::qubits::QubitIndex;
use crate::schedule::{CycleScheduler, MeasurementStyle, MeasurementTimes};
use crate::{HoneycombError, Result};
use honeycomb_common::consts::ROUNDS_PER_CYCLE;
use tracing::info;

/// Parameters of a generated circuit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CircuitParams {
    /// Code distance; the lattice is a `4d x 6d` torus.
    pub distance: usize,
    /// Total measurement cycles, including the initial one.
    pub cycles: usize,
    /// Depolarizing strength before each round, also used as the flip
    /// probability of every parity measurement. Zero disables noise.
    pub noise: f64,
    pub style: MeasurementStyle,
}

impl Default for CircuitParams {
    fn default() -> Self {
        Self {
            distance: 2,
            cycles: 4,
            noise: 0.0,
            style: MeasurementStyle::Native,
        }
    }
}

impl CircuitParams {
    /// Checks every parameter before any construction work.
    pub fn validate(&self) -> Result<()> {
        if self.distance == 0 {
            return Err(HoneycombError::InvalidDistance(self.distance));
        }
        if self.cycles == 0 {
            return Err(HoneycombError::InvalidCycles(self.cycles));
        }
        if !(0.0..=1.0).contains(&self.noise) {
            return Err(HoneycombError::InvalidNoise(self.noise));
        }
        Ok(())
    }
}

/// A generated circuit together with the structures it was built from.
#[derive(Clone, Debug)]
pub struct GeneratedCircuit {
    pub circuit: Circuit,
    pub lattice: Lattice,
    pub qubits: QubitIndex,
    /// Parity checks in each round of a cycle.
    pub measurements_per_round: [usize; ROUNDS_PER_CYCLE],
    pub measurements_per_cycle: usize,
    /// Detectors declared by each detector-carrying cycle.
    pub detectors_per_cycle: usize,
}

/// Generates the memory-experiment circuit described by `params`.
///
/// # Errors
///
/// Parameter validation errors, lattice construction errors, and any
/// invariant violation raised while building detectors or checking their
/// record references.
pub fn generate(params: &CircuitParams) -> Result<GeneratedCircuit> {
    params.validate()?;

    let lattice = Lattice::build(params.distance)?;
    let qubits = QubitIndex::for_lattice(&lattice);
    let scheduler = CycleScheduler::new(&lattice, &qubits)?;
    let builder = CycleBuilder {
        scheduler: &scheduler,
        detectors: DetectorGenerator::new(&lattice, &qubits),
        params,
        num_qubits: qubits.len(),
    };

    let mut circuit = Circuit::new();
    for (qubit, &coord) in qubits.coords().iter().enumerate() {
        circuit.push(Instruction::QubitCoords { qubit, coord });
    }

    let (initial, times, _) = builder.build_cycle(MeasurementTimes::new(), false)?;
    circuit.append(initial);

    let mut detectors_per_cycle = 0;
    if params.cycles > 1 {
        let (body, _, emitted) = builder.build_cycle(times, true)?;
        detectors_per_cycle = emitted;
        circuit.push(Instruction::Repeat {
            count: (params.cycles - 1) as u64,
            body,
        });
    }

    circuit.check_record_references()?;

    let measurements_per_round = core::array::from_fn(|r| scheduler.measurements_in_round(r));
    info!(
        distance = params.distance,
        cycles = params.cycles,
        qubits = qubits.len(),
        measurements = circuit.num_measurements(),
        detectors = circuit.num_detectors(),
        "generated honeycomb circuit"
    );

    Ok(GeneratedCircuit {
        measurements_per_cycle: scheduler.measurements_per_cycle(),
        measurements_per_round,
        detectors_per_cycle,
        circuit,
        lattice,
        qubits,
    })
}

struct CycleBuilder<'a> {
    scheduler: &'a CycleScheduler,
    detectors: DetectorGenerator<'a>,
    params: &'a CircuitParams,
    num_qubits: usize,
}

impl CycleBuilder<'_> {
    /// Emits one cycle, returning its instructions, the advanced accumulator
    /// and the number of detectors declared.
    fn build_cycle(
        &self,
        times: MeasurementTimes,
        with_detectors: bool,
    ) -> Result<(Circuit, MeasurementTimes, usize)> {
        let cycle = self.scheduler.schedule_cycle(times);
        let noise = self.params.noise;
        let mut out = Circuit::new();
        let mut emitted = 0;

        for r in 0..ROUNDS_PER_CYCLE {
            if noise > 0.0 {
                out.push(Instruction::Depolarize1 {
                    probability: noise,
                    qubits: (0..self.num_qubits).collect(),
                });
            }
            self.scheduler.emit_round(r, self.params.style, noise, &mut out);
            if with_detectors {
                for detector in self.detectors.round_detectors(r, &cycle)? {
                    out.push(detector.to_instruction());
                    emitted += 1;
                }
                out.push(Instruction::ShiftCoords([0.0, 0.0, 1.0]));
            }
            out.push(Instruction::Tick);
        }

        Ok((out, cycle.into_times(), emitted))
    }
}
