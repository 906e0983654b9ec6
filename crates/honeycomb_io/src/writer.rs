//! Output of generated circuits and error models.

use anyhow::{Context, Result};
use honeycomb_core::circuit::Circuit;
use honeycomb_core::dem::{DemInstruction, DemTarget, ErrorModel};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Writes `circuit` to `path` in the Stim circuit format.
///
/// # Arguments
///
/// * `path` - Output path (.stim file), created or truncated
/// * `circuit` - Circuit to store
///
/// # Returns
///
/// Ok(()) on success, or an error if file I/O fails.
pub fn write_circuit_file<P: AsRef<Path>>(path: P, circuit: &Circuit) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("Failed to create circuit file {}", path.display()))?;
    let mut out = BufWriter::new(file);
    write!(out, "{circuit}")?;
    out.flush()?;
    debug!(
        path = %path.display(),
        instructions = circuit.len(),
        "wrote circuit"
    );
    Ok(())
}

/// Writes `model` to `path` in DEM text form, nesting repeat blocks.
pub fn write_dem_file<P: AsRef<Path>>(path: P, model: &ErrorModel) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("Failed to create .dem file {}", path.display()))?;
    let mut out = BufWriter::new(file);
    write_error_model(&mut out, model, 0)?;
    out.flush()?;
    Ok(())
}

fn write_error_model<W: Write>(out: &mut W, model: &ErrorModel, depth: usize) -> Result<()> {
    let indent = "    ".repeat(depth);
    for inst in model.instructions() {
        match inst {
            DemInstruction::Error {
                probability,
                targets,
            } => {
                writeln!(out, "{indent}error({probability}){}", targets_text(targets))?;
            }
            DemInstruction::ShiftDetectors { coords, shift } => {
                writeln!(out, "{indent}shift_detectors{} {shift}", args_text(coords))?;
            }
            DemInstruction::Detector { coords, targets } => {
                writeln!(
                    out,
                    "{indent}detector{}{}",
                    args_text(coords),
                    targets_text(targets)
                )?;
            }
            DemInstruction::LogicalObservable { targets } => {
                writeln!(out, "{indent}logical_observable{}", targets_text(targets))?;
            }
            DemInstruction::Repeat { count, body } => {
                writeln!(out, "{indent}repeat {count} {{")?;
                write_error_model(out, body, depth + 1)?;
                writeln!(out, "{indent}}}")?;
            }
            DemInstruction::Unsupported { name } => {
                anyhow::bail!("cannot write unsupported instruction '{name}'");
            }
        }
    }
    Ok(())
}

fn args_text(args: &[f64]) -> String {
    if args.is_empty() {
        return String::new();
    }
    let joined: Vec<String> = args.iter().map(f64::to_string).collect();
    format!("({})", joined.join(", "))
}

fn targets_text(targets: &[DemTarget]) -> String {
    targets
        .iter()
        .map(|target| match target {
            DemTarget::Detector(id) => format!(" D{id}"),
            DemTarget::Observable(id) => format!(" L{id}"),
            DemTarget::Separator => " ^".to_string(),
        })
        .collect()
}
