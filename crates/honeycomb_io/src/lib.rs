//! I/O utilities for honeycomb circuits and detector error models.
//!
//! Provides the text parser for detector error models (.dem files) emitted by
//! the simulation runtime, and the writer that stores generated circuits in
//! the Stim circuit format (.stim files). These utilities handle file access
//! and format conversion to and from the core data structures.

/// Parser for detector error model descriptions in DEM format.
///
/// Parses .dem text, including nested `repeat` blocks, into an `ErrorModel`
/// that the core crate can traverse and turn into a decoding graph.
pub mod parser;

/// Writer for generated circuits.
///
/// Stores a `Circuit` in its textual form so the simulation runtime can load
/// it and derive the error model.
pub mod writer;
