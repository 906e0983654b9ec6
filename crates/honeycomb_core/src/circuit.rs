//! Circuit instruction stream.
//!
//! A `Circuit` is the ordered instruction list handed to the simulation
//! runtime. Its `Display` implementation renders the Stim text format, which
//! is the only wire encoding the toolkit commits to.

use crate::qubits::QubitPair;
use crate::torus::Coord;
use crate::{HoneycombError, Result};
use honeycomb_common::isa::Opcode;
use std::fmt;

/// Pauli type of a two-qubit parity check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Pauli {
    X,
    Z,
}

impl Pauli {
    pub const fn symbol(self) -> char {
        match self {
            Pauli::X => 'X',
            Pauli::Z => 'Z',
        }
    }
}

/// A two-qubit Pauli product such as `X3*X7`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PauliProduct {
    pub pauli: Pauli,
    pub qubits: QubitPair,
}

impl fmt::Display for PauliProduct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.pauli.symbol();
        write!(f, "{p}{}*{p}{}", self.qubits.low(), self.qubits.high())
    }
}

/// One circuit instruction.
#[derive(Clone, Debug, PartialEq)]
pub enum Instruction {
    QubitCoords {
        qubit: usize,
        coord: Coord,
    },
    H {
        qubits: Vec<usize>,
    },
    /// Controlled-NOT on `(control, target)` pairs.
    Cx {
        pairs: Vec<(usize, usize)>,
    },
    /// Z-basis measurements. A zero flip probability is omitted from the text.
    M {
        flip_probability: f64,
        qubits: Vec<usize>,
    },
    /// Native Pauli-product measurements, one record per product.
    Mpp {
        flip_probability: f64,
        products: Vec<PauliProduct>,
    },
    Depolarize1 {
        probability: f64,
        qubits: Vec<usize>,
    },
    Tick,
    /// A detector over earlier records. Lookbacks are negative: `-k` is the
    /// k-th most recent measurement at the point of declaration.
    Detector {
        coords: [f64; 3],
        lookbacks: Vec<i64>,
    },
    ShiftCoords([f64; 3]),
    Repeat {
        count: u64,
        body: Circuit,
    },
}

impl Instruction {
    pub fn opcode(&self) -> Opcode {
        match self {
            Instruction::QubitCoords { .. } => Opcode::QubitCoords,
            Instruction::H { .. } => Opcode::H,
            Instruction::Cx { .. } => Opcode::Cx,
            Instruction::M { .. } => Opcode::M,
            Instruction::Mpp { .. } => Opcode::Mpp,
            Instruction::Depolarize1 { .. } => Opcode::Depolarize1,
            Instruction::Tick => Opcode::Tick,
            Instruction::Detector { .. } => Opcode::Detector,
            Instruction::ShiftCoords(_) => Opcode::ShiftCoords,
            Instruction::Repeat { .. } => Opcode::Repeat,
        }
    }

    /// Number of records this instruction appends, counting repetitions.
    pub fn num_measurements(&self) -> u64 {
        match self {
            Instruction::M { qubits, .. } => qubits.len() as u64,
            Instruction::Mpp { products, .. } => products.len() as u64,
            Instruction::Repeat { count, body } => count * body.num_measurements(),
            _ => 0,
        }
    }
}

/// An ordered list of circuit instructions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Circuit {
    instructions: Vec<Instruction>,
}

impl Circuit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    /// Moves every instruction of `other` to the end of this circuit.
    pub fn append(&mut self, mut other: Circuit) {
        self.instructions.append(&mut other.instructions);
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Total records produced by the circuit, with repeat blocks expanded.
    pub fn num_measurements(&self) -> u64 {
        self.instructions.iter().map(Instruction::num_measurements).sum()
    }

    /// Total detectors declared by the circuit, with repeat blocks expanded.
    pub fn num_detectors(&self) -> u64 {
        self.instructions
            .iter()
            .map(|inst| match inst {
                Instruction::Detector { .. } => 1,
                Instruction::Repeat { count, body } => count * body.num_detectors(),
                _ => 0,
            })
            .sum()
    }

    /// One more than the largest qubit index any instruction touches.
    pub fn num_qubits(&self) -> usize {
        self.instructions
            .iter()
            .map(|inst| match inst {
                Instruction::QubitCoords { qubit, .. } => qubit + 1,
                Instruction::H { qubits }
                | Instruction::M { qubits, .. }
                | Instruction::Depolarize1 { qubits, .. } => {
                    qubits.iter().max().map_or(0, |q| q + 1)
                }
                Instruction::Cx { pairs } => pairs
                    .iter()
                    .map(|&(c, t)| c.max(t) + 1)
                    .max()
                    .unwrap_or(0),
                Instruction::Mpp { products, .. } => products
                    .iter()
                    .map(|p| p.qubits.high() + 1)
                    .max()
                    .unwrap_or(0),
                Instruction::Repeat { body, .. } => body.num_qubits(),
                _ => 0,
            })
            .max()
            .unwrap_or(0)
    }

    /// Verifies that every detector lookback points at an existing record.
    ///
    /// # Errors
    ///
    /// `RecordOutOfRange` for a non-negative lookback or one that reaches
    /// before the start of the measurement record.
    pub fn check_record_references(&self) -> Result<()> {
        self.check_from(0).map(|_| ())
    }

    fn check_from(&self, mut recorded: u64) -> Result<u64> {
        for inst in &self.instructions {
            match inst {
                Instruction::Detector { lookbacks, .. } => {
                    for &lookback in lookbacks {
                        if lookback >= 0 || lookback.unsigned_abs() > recorded {
                            return Err(HoneycombError::RecordOutOfRange {
                                lookback,
                                available: recorded,
                            });
                        }
                    }
                }
                Instruction::Repeat { count, body } if *count > 0 => {
                    // The first iteration sees the fewest earlier records.
                    body.check_from(recorded)?;
                    recorded += count * body.num_measurements();
                }
                other => recorded += other.num_measurements(),
            }
        }
        Ok(recorded)
    }

    fn write_block(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "    ".repeat(depth);
        for inst in &self.instructions {
            let name = inst.opcode().mnemonic();
            write!(f, "{indent}")?;
            match inst {
                Instruction::QubitCoords { qubit, coord } => {
                    write!(f, "{name}")?;
                    write_args(f, &coord.to_f64())?;
                    write!(f, " {qubit}")?;
                }
                Instruction::H { qubits } => {
                    write!(f, "{name}")?;
                    write_targets(f, qubits)?;
                }
                Instruction::Cx { pairs } => {
                    write!(f, "{name}")?;
                    for (c, t) in pairs {
                        write!(f, " {c} {t}")?;
                    }
                }
                Instruction::M {
                    flip_probability,
                    qubits,
                } => {
                    write!(f, "{name}")?;
                    if *flip_probability > 0.0 {
                        write_args(f, &[*flip_probability])?;
                    }
                    write_targets(f, qubits)?;
                }
                Instruction::Mpp {
                    flip_probability,
                    products,
                } => {
                    write!(f, "{name}")?;
                    if *flip_probability > 0.0 {
                        write_args(f, &[*flip_probability])?;
                    }
                    for product in products {
                        write!(f, " {product}")?;
                    }
                }
                Instruction::Depolarize1 {
                    probability,
                    qubits,
                } => {
                    write!(f, "{name}")?;
                    write_args(f, &[*probability])?;
                    write_targets(f, qubits)?;
                }
                Instruction::Tick => write!(f, "{name}")?,
                Instruction::Detector { coords, lookbacks } => {
                    write!(f, "{name}")?;
                    write_args(f, coords)?;
                    for lookback in lookbacks {
                        write!(f, " rec[{lookback}]")?;
                    }
                }
                Instruction::ShiftCoords(shift) => {
                    write!(f, "{name}")?;
                    write_args(f, shift)?;
                }
                Instruction::Repeat { count, body } => {
                    writeln!(f, "{name} {count} {{")?;
                    body.write_block(f, depth + 1)?;
                    write!(f, "{indent}}}")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn write_args(f: &mut fmt::Formatter<'_>, args: &[f64]) -> fmt::Result {
    write!(f, "(")?;
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{arg}")?;
    }
    write!(f, ")")
}

fn write_targets(f: &mut fmt::Formatter<'_>, qubits: &[usize]) -> fmt::Result {
    for q in qubits {
        write!(f, " {q}")?;
    }
    Ok(())
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_block(f, 0)
    }
}
