//! Multi-distance circuit generation.
//!
//! Runs one independent generation per distance on the rayon pool and
//! writes each circuit next to the others in a single output directory.

use crate::generator::params;
use anyhow::{Context, Result};
use honeycomb_core::generator::generate;
use honeycomb_io::writer::write_circuit_file;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

/// One row of the sweep summary.
#[derive(Debug)]
pub struct SweepRow {
    pub distance: usize,
    pub qubits: usize,
    pub measurements: u64,
    pub detectors: u64,
    pub path: PathBuf,
}

/// Generates one circuit per distance in parallel and prints a summary.
///
/// Every generation owns its lattice and accumulators, so the distances are
/// independent work items.
pub fn run_sweep(
    out_dir: &Path,
    distances: &[usize],
    cycles: usize,
    p: f64,
    decomposed: bool,
) -> Result<Vec<SweepRow>> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    println!(
        "Sweeping distances {:?} (cycles={}, p={}) (Parallel - Rayon)...",
        distances, cycles, p
    );
    let start = Instant::now();

    let mut rows = distances
        .par_iter()
        .map(|&distance| -> Result<SweepRow> {
            let generated = generate(&params(distance, cycles, p, decomposed))
                .with_context(|| format!("Failed to generate distance {distance}"))?;
            let path = out_dir.join(format!("honeycomb_d{distance}.stim"));
            write_circuit_file(&path, &generated.circuit)?;
            info!(distance, path = %path.display(), "sweep circuit written");
            Ok(SweepRow {
                distance,
                qubits: generated.qubits.len(),
                measurements: generated.circuit.num_measurements(),
                detectors: generated.circuit.num_detectors(),
                path,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    rows.sort_by_key(|row| row.distance);

    println!("Results ({:.3} s)", start.elapsed().as_secs_f64());
    println!(
        "{:>4} {:>8} {:>14} {:>12}  file",
        "d", "qubits", "measurements", "detectors"
    );
    for row in &rows {
        println!(
            "{:>4} {:>8} {:>14} {:>12}  {}",
            row.distance,
            row.qubits,
            row.measurements,
            row.detectors,
            row.path.display()
        );
    }
    Ok(rows)
}
