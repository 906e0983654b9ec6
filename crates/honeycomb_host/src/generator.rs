//! Circuit generation command.
//!
//! Builds the honeycomb memory-experiment circuit for a single distance and
//! writes it in the Stim circuit format, ready for the simulation runtime to
//! sample or to derive its detector error model.

use anyhow::Result;
use honeycomb_core::generator::{CircuitParams, GeneratedCircuit, generate};
use honeycomb_core::schedule::MeasurementStyle;
use honeycomb_io::writer::write_circuit_file;
use std::path::Path;

/// Builds the parameter set shared by the `gen` and `sweep` commands.
pub fn params(distance: usize, cycles: usize, p: f64, decomposed: bool) -> CircuitParams {
    CircuitParams {
        distance,
        cycles,
        noise: p,
        style: if decomposed {
            MeasurementStyle::Decomposed
        } else {
            MeasurementStyle::Native
        },
    }
}

/// Generates a circuit and stores it at `out`.
///
/// # Arguments
///
/// * `out` - Output path for the circuit (.stim file)
/// * `distance` - Code distance (the torus is 4d x 6d)
/// * `cycles` - Number of measurement cycles, including the initial one
/// * `p` - Depolarizing strength and measurement flip probability
/// * `decomposed` - If true, emit CX/H/M sequences instead of MPP
///
/// # Returns
///
/// The generated circuit, or an error if generation or file I/O fails.
pub fn generate_circuit(
    out: &Path,
    distance: usize,
    cycles: usize,
    p: f64,
    decomposed: bool,
) -> Result<GeneratedCircuit> {
    println!(
        "Generating honeycomb memory circuit (d={}, cycles={}, p={})...",
        distance, cycles, p
    );
    let generated = generate(&params(distance, cycles, p, decomposed))?;
    write_circuit_file(out, &generated.circuit)?;

    let circuit = &generated.circuit;
    println!("Qubits:       {}", generated.qubits.len());
    println!("Measurements: {}", circuit.num_measurements());
    println!("Detectors:    {}", circuit.num_detectors());
    println!("Written to {}", out.display());
    Ok(generated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn writes_requested_circuit() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("d1.stim");
        let generated = generate_circuit(&out, 1, 2, 0.0, true).unwrap();
        let text = fs::read_to_string(&out).unwrap();
        assert_eq!(text, generated.circuit.to_string());
        assert!(text.contains("CX"));
        assert!(!text.contains("MPP"));
    }

    #[test]
    fn propagates_invalid_parameters() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("bad.stim");
        assert!(generate_circuit(&out, 0, 2, 0.0, false).is_err());
        assert!(!out.exists());
    }
}
