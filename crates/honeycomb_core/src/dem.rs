//! Detector error model representation and traversal.
//!
//! An error model is the simulation runtime's description of every
//! independent error mechanism of a circuit: which detectors it flips, which
//! logical observables it flips, and with what probability. Repeated circuit
//! cycles show up as `repeat` blocks whose body advances detector indices
//! with `shift_detectors`.
//!
//! Traversal is depth-first. The running detector offset is threaded through
//! the recursion as an explicit value: each step takes the offset and
//! returns the advanced one.

use crate::{HoneycombError, Result};

/// A target of an error model instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DemTarget {
    /// Relative detector id (`D<k>`), before the running offset is applied.
    Detector(u64),
    /// Logical observable id (`L<k>`).
    Observable(u64),
    /// Separator between components of a decomposed error (`^`).
    Separator,
}

/// One instruction of an error model.
#[derive(Clone, Debug, PartialEq)]
pub enum DemInstruction {
    Error {
        probability: f64,
        targets: Vec<DemTarget>,
    },
    ShiftDetectors {
        coords: Vec<f64>,
        shift: u64,
    },
    Detector {
        coords: Vec<f64>,
        targets: Vec<DemTarget>,
    },
    LogicalObservable {
        targets: Vec<DemTarget>,
    },
    Repeat {
        count: u64,
        body: ErrorModel,
    },
    /// An instruction kind this toolkit does not interpret, kept by name so
    /// consumers can reject it.
    Unsupported {
        name: String,
    },
}

/// An error mechanism with absolute detector indices.
#[derive(Clone, Debug, PartialEq)]
pub struct ErrorMechanism {
    pub probability: f64,
    pub detectors: Vec<u64>,
    pub observables: Vec<u64>,
}

/// An event reported by the traversal, with absolute detector ids.
#[derive(Debug)]
enum Visit {
    Error(ErrorMechanism),
    Detector(Vec<u64>),
}

/// Adds `delta` to `offset`, keeping the result below `u64::MAX` so that a
/// detector count (`id + 1`) is always representable.
fn advance(offset: u64, delta: u64) -> Result<u64> {
    offset
        .checked_add(delta)
        .filter(|&index| index < u64::MAX)
        .ok_or(HoneycombError::DetectorIndexOverflow { offset, delta })
}

/// A possibly nested detector error model.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ErrorModel {
    instructions: Vec<DemInstruction>,
}

impl ErrorModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, instruction: DemInstruction) {
        self.instructions.push(instruction);
    }

    pub fn instructions(&self) -> &[DemInstruction] {
        &self.instructions
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Calls `f` for every error mechanism, with repeat blocks expanded and
    /// detector shifts applied.
    ///
    /// `detector` and `logical_observable` declarations are skipped.
    ///
    /// # Errors
    ///
    /// `UnsupportedInstruction` on the first instruction kind the traversal
    /// does not know, and `DetectorIndexOverflow` if a shift or a shifted
    /// detector id leaves the 64-bit range.
    pub fn for_each_error<F>(&self, mut f: F) -> Result<()>
    where
        F: FnMut(ErrorMechanism),
    {
        self.walk(0, &mut |visit: Visit| {
            if let Visit::Error(mechanism) = visit {
                f(mechanism);
            }
        })
        .map(|_| ())
    }

    /// All error mechanisms, in traversal order.
    pub fn errors(&self) -> Result<Vec<ErrorMechanism>> {
        let mut out = Vec::new();
        self.for_each_error(|m| out.push(m))?;
        Ok(out)
    }

    /// One more than the largest absolute detector id referenced by any
    /// `error` or `detector` instruction; zero if there is none.
    ///
    /// # Errors
    ///
    /// `DetectorIndexOverflow` if a shifted id does not fit in 64 bits, and
    /// `UnsupportedInstruction` as for [`ErrorModel::for_each_error`].
    pub fn num_detectors(&self) -> Result<u64> {
        let mut count = 0;
        self.walk(0, &mut |visit: Visit| {
            let highest = match visit {
                Visit::Error(m) => m.detectors.into_iter().max(),
                Visit::Detector(ids) => ids.into_iter().max(),
            };
            if let Some(id) = highest {
                count = count.max(id + 1);
            }
        })?;
        Ok(count)
    }

    /// Total detector shift applied by one pass over this model.
    pub fn total_shift(&self) -> Result<u64> {
        self.walk(0, &mut |_: Visit| {})
    }

    fn walk(&self, mut offset: u64, visit: &mut dyn FnMut(Visit)) -> Result<u64> {
        for inst in &self.instructions {
            match inst {
                DemInstruction::Error {
                    probability,
                    targets,
                } => {
                    let mut detectors = Vec::new();
                    let mut observables = Vec::new();
                    for target in targets {
                        match *target {
                            DemTarget::Detector(id) => detectors.push(advance(offset, id)?),
                            DemTarget::Observable(id) => observables.push(id),
                            DemTarget::Separator => {}
                        }
                    }
                    visit(Visit::Error(ErrorMechanism {
                        probability: *probability,
                        detectors,
                        observables,
                    }));
                }
                DemInstruction::ShiftDetectors { shift, .. } => {
                    offset = advance(offset, *shift)?;
                }
                DemInstruction::Detector { targets, .. } => {
                    let mut ids = Vec::with_capacity(targets.len());
                    for target in targets {
                        if let DemTarget::Detector(id) = *target {
                            ids.push(advance(offset, id)?);
                        }
                    }
                    visit(Visit::Detector(ids));
                }
                DemInstruction::LogicalObservable { .. } => {}
                DemInstruction::Repeat { count, body } => {
                    for _ in 0..*count {
                        offset = body.walk(offset, visit)?;
                    }
                }
                DemInstruction::Unsupported { name } => {
                    return Err(HoneycombError::UnsupportedInstruction(name.clone()));
                }
            }
        }
        Ok(offset)
    }
}
