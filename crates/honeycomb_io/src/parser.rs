//! Parser for detector error model description files.
//!
//! Provides functions for parsing Stim .dem (Detector Error Model) files,
//! which describe every error mechanism of a circuit together with the
//! detectors and logical observables it flips. The parser keeps `repeat`
//! blocks nested; expansion and detector shifting happen in the core
//! traversal.
//!
//! # Supported syntax
//!
//! ```text
//! error(p) D<id> D<id> ... [^ D<id> ...] [L<id> ...]
//! detector(x, y, t) D<id>
//! logical_observable L<id>
//! shift_detectors(dx, dy, dt) <shift>
//! repeat <count> {
//!     ...
//! }
//! ```
//!
//! Any other instruction name is kept as `DemInstruction::Unsupported` so the
//! consumer decides whether it can be ignored.

use anyhow::{Context, Result};
use honeycomb_core::dem::{DemInstruction, DemTarget, ErrorModel};
use nom::IResult;
use nom::branch::alt;
use nom::bytes::complete::take_while1;
use nom::character::complete::{char, digit1, space0, space1};
use nom::combinator::{all_consuming, map, map_res, opt, value};
use nom::multi::{many0, separated_list0};
use nom::number::complete::double;
use nom::sequence::{delimited, preceded};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Errors raised while parsing DEM text. Line numbers are 1-based.
#[derive(Debug, Error)]
pub enum DemParseError {
    #[error("line {line}: malformed instruction '{text}'")]
    Syntax { line: usize, text: String },

    #[error("line {line}: probability {value} outside [0, 1]")]
    InvalidProbability { line: usize, value: f64 },

    #[error("line {line}: '{instruction}' expects {expected}")]
    InvalidArguments {
        line: usize,
        instruction: String,
        expected: &'static str,
    },

    #[error("line {line}: '}}' without an open repeat block")]
    UnbalancedBlock { line: usize },

    #[error("{open} repeat block(s) still open at end of input")]
    UnclosedBlock { open: usize },
}

/// A raw target token, before it is checked against its instruction.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Token {
    Detector(u64),
    Observable(u64),
    Separator,
    Integer(u64),
}

#[derive(Debug)]
struct Line<'a> {
    name: &'a str,
    args: Vec<f64>,
    targets: Vec<Token>,
    opens_block: bool,
}

fn name(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_')(input)
}

fn integer(input: &str) -> IResult<&str, u64> {
    map_res(digit1, |digits: &str| digits.parse::<u64>())(input)
}

fn arguments(input: &str) -> IResult<&str, Vec<f64>> {
    delimited(
        char('('),
        separated_list0(char(','), delimited(space0, double, space0)),
        char(')'),
    )(input)
}

fn target(input: &str) -> IResult<&str, Token> {
    alt((
        map(preceded(char('D'), integer), Token::Detector),
        map(preceded(char('L'), integer), Token::Observable),
        value(Token::Separator, char('^')),
        map(integer, Token::Integer),
    ))(input)
}

fn instruction(input: &str) -> IResult<&str, Line<'_>> {
    let (input, name) = name(input)?;
    let (input, args) = opt(arguments)(input)?;
    let (input, targets) = many0(preceded(space1, target))(input)?;
    let (input, brace) = opt(preceded(space0, char('{')))(input)?;
    let (input, _) = space0(input)?;
    Ok((
        input,
        Line {
            name,
            args: args.unwrap_or_default(),
            targets,
            opens_block: brace.is_some(),
        },
    ))
}

/// Parses DEM text into a nested `ErrorModel`.
///
/// Blank lines and `#` comments are skipped. Instruction names are matched
/// case-insensitively.
///
/// # Errors
///
/// A `DemParseError` naming the first offending line.
pub fn parse_dem(text: &str) -> std::result::Result<ErrorModel, DemParseError> {
    // Each open repeat block saves its count and the enclosing model.
    let mut stack: Vec<(u64, ErrorModel)> = Vec::new();
    let mut current = ErrorModel::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let content = raw.find('#').map_or(raw, |hash| &raw[..hash]).trim();
        if content.is_empty() {
            continue;
        }

        if content == "}" {
            let (count, parent) = stack
                .pop()
                .ok_or(DemParseError::UnbalancedBlock { line })?;
            let body = std::mem::replace(&mut current, parent);
            current.push(DemInstruction::Repeat { count, body });
            continue;
        }

        let (_, parsed) =
            all_consuming(instruction)(content).map_err(|_| DemParseError::Syntax {
                line,
                text: content.to_string(),
            })?;
        let name = parsed.name.to_ascii_lowercase();

        if parsed.opens_block || name == "repeat" {
            let count = repeat_count(&name, &parsed, line)?;
            stack.push((count, std::mem::take(&mut current)));
            continue;
        }

        current.push(convert(&name, &parsed, line)?);
    }

    if !stack.is_empty() {
        return Err(DemParseError::UnclosedBlock { open: stack.len() });
    }
    Ok(current)
}

fn repeat_count(
    name: &str,
    parsed: &Line<'_>,
    line: usize,
) -> std::result::Result<u64, DemParseError> {
    let invalid = || DemParseError::InvalidArguments {
        line,
        instruction: name.to_string(),
        expected: "a repetition count followed by '{'",
    };
    if name != "repeat" || !parsed.opens_block || !parsed.args.is_empty() {
        return Err(invalid());
    }
    match parsed.targets.as_slice() {
        [Token::Integer(count)] => Ok(*count),
        _ => Err(invalid()),
    }
}

fn convert(
    name: &str,
    parsed: &Line<'_>,
    line: usize,
) -> std::result::Result<DemInstruction, DemParseError> {
    let invalid = |expected: &'static str| DemParseError::InvalidArguments {
        line,
        instruction: name.to_string(),
        expected,
    };

    let instruction = match name {
        "error" => {
            let probability = match parsed.args.as_slice() {
                [p] => *p,
                _ => return Err(invalid("one probability argument")),
            };
            if !(0.0..=1.0).contains(&probability) {
                return Err(DemParseError::InvalidProbability {
                    line,
                    value: probability,
                });
            }
            let targets = dem_targets(&parsed.targets)
                .ok_or_else(|| invalid("detector, observable or separator targets"))?;
            DemInstruction::Error {
                probability,
                targets,
            }
        }
        "shift_detectors" => match parsed.targets.as_slice() {
            [Token::Integer(shift)] => DemInstruction::ShiftDetectors {
                coords: parsed.args.clone(),
                shift: *shift,
            },
            _ => return Err(invalid("a single detector shift")),
        },
        "detector" => DemInstruction::Detector {
            coords: parsed.args.clone(),
            targets: dem_targets(&parsed.targets)
                .ok_or_else(|| invalid("detector targets"))?,
        },
        "logical_observable" => DemInstruction::LogicalObservable {
            targets: dem_targets(&parsed.targets)
                .ok_or_else(|| invalid("observable targets"))?,
        },
        _ => DemInstruction::Unsupported {
            name: name.to_string(),
        },
    };
    Ok(instruction)
}

/// Converts raw tokens to model targets; bare integers are not targets.
fn dem_targets(tokens: &[Token]) -> Option<Vec<DemTarget>> {
    tokens
        .iter()
        .map(|token| match *token {
            Token::Detector(id) => Some(DemTarget::Detector(id)),
            Token::Observable(id) => Some(DemTarget::Observable(id)),
            Token::Separator => Some(DemTarget::Separator),
            Token::Integer(_) => None,
        })
        .collect()
}

/// Loads a Stim .dem file into an `ErrorModel`.
///
/// # Arguments
///
/// * `path` - Path to the .dem file
///
/// # Returns
///
/// The parsed error model, or an error if the file cannot be read or parsed.
pub fn load_dem_file<P: AsRef<Path>>(path: P) -> Result<ErrorModel> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to open .dem file {}", path.display()))?;
    let model = parse_dem(&text)
        .with_context(|| format!("Failed to parse .dem file {}", path.display()))?;
    debug!(
        path = %path.display(),
        instructions = model.instructions().len(),
        "loaded error model"
    );
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flat_model() {
        let text = "\
# produced by a simulator
error(0.1) D0 D1
error(0.02) D1 L0
detector(1, 2, 0) D0
logical_observable L0
";
        let model = parse_dem(text).unwrap();
        assert_eq!(model.instructions().len(), 4);
        assert_eq!(
            model.instructions()[1],
            DemInstruction::Error {
                probability: 0.02,
                targets: vec![DemTarget::Detector(1), DemTarget::Observable(0)],
            }
        );
        assert_eq!(
            model.instructions()[2],
            DemInstruction::Detector {
                coords: vec![1.0, 2.0, 0.0],
                targets: vec![DemTarget::Detector(0)],
            }
        );
    }

    #[test]
    fn parses_nested_repeat_blocks() {
        let text = "\
error(0.5) D0
repeat 3 {
    error(0.1) D0 D1
    repeat 2 {
        shift_detectors(0, 0, 1) 1
    }
    shift_detectors 2
}
error(1e-3) D2 ^ D3
";
        let model = parse_dem(text).unwrap();
        assert_eq!(model.instructions().len(), 3);
        match &model.instructions()[1] {
            DemInstruction::Repeat { count, body } => {
                assert_eq!(*count, 3);
                assert_eq!(body.instructions().len(), 3);
                assert!(matches!(
                    body.instructions()[1],
                    DemInstruction::Repeat { count: 2, .. }
                ));
                assert_eq!(
                    body.instructions()[2],
                    DemInstruction::ShiftDetectors {
                        coords: vec![],
                        shift: 2
                    }
                );
            }
            other => panic!("expected repeat, got {other:?}"),
        }
        assert_eq!(model.total_shift().unwrap(), 12);
        match &model.instructions()[2] {
            DemInstruction::Error { probability, targets } => {
                assert!((probability - 0.001).abs() < 1e-15);
                assert_eq!(targets[1], DemTarget::Separator);
            }
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn unknown_instructions_are_kept_by_name() {
        let model = parse_dem("detector_separator 1\n").unwrap();
        assert_eq!(
            model.instructions()[0],
            DemInstruction::Unsupported {
                name: "detector_separator".into()
            }
        );
    }

    #[test]
    fn rejects_probability_out_of_range() {
        assert!(matches!(
            parse_dem("error(1.5) D0\n"),
            Err(DemParseError::InvalidProbability { line: 1, .. })
        ));
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!(matches!(
            parse_dem("error(0.1) D0\nerror(0.1 D1\n"),
            Err(DemParseError::Syntax { line: 2, .. })
        ));
        assert!(matches!(
            parse_dem("error(0.1) 7\n"),
            Err(DemParseError::InvalidArguments { line: 1, .. })
        ));
        assert!(matches!(
            parse_dem("shift_detectors D1\n"),
            Err(DemParseError::InvalidArguments { .. })
        ));
    }

    #[test]
    fn rejects_unbalanced_braces() {
        assert!(matches!(
            parse_dem("error(0.1) D0\n}\n"),
            Err(DemParseError::UnbalancedBlock { line: 2 })
        ));
        assert!(matches!(
            parse_dem("repeat 2 {\nerror(0.1) D0\n"),
            Err(DemParseError::UnclosedBlock { open: 1 })
        ));
        assert!(matches!(
            parse_dem("repeat 2\n"),
            Err(DemParseError::InvalidArguments { .. })
        ));
    }
}
