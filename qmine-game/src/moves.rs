//! Moves and the textual move grammar
//!
//! ```text
//! r,c | M r,c        probe
//! P r,c              toggle pin
//! G r,c              single-qubit gate  (X Y Z H S SDG SX SXDG SY SYDG)
//! G r1,c1 r2,c2      two-qubit gate     (CX CY CZ SWAP)
//! ```
//!
//! Coordinates are 1-based and keywords are case-insensitive. Parsed moves
//! hold 0-based [`Cell`]s.

use crate::board::Cell;
use crate::error::{GameError, Result};
use qmine_core::CliffordGate;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

/// A player action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    /// Measure a cell
    Probe(Cell),
    /// Toggle the pin annotation on a cell
    Pin(Cell),
    /// Single-qubit gate on one cell
    Gate1 { gate: CliffordGate, cell: Cell },
    /// Two-qubit gate; the first cell is the control where that matters
    Gate2 {
        gate: CliffordGate,
        first: Cell,
        second: Cell,
    },
}

impl Move {
    /// Gate move on `cells`, picking the variant from the gate's arity
    pub fn gate(gate: CliffordGate, cells: &[Cell]) -> Result<Self> {
        match (gate.num_qubits(), cells) {
            (1, [cell]) => Ok(Move::Gate1 { gate, cell: *cell }),
            (2, [first, second]) => Ok(Move::Gate2 {
                gate,
                first: *first,
                second: *second,
            }),
            (expected, _) => Err(GameError::illegal(format!(
                "{} acts on {} cell(s), got {}",
                gate,
                expected,
                cells.len()
            ))),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let one = |c: Cell| format!("{},{}", c.row + 1, c.col + 1);
        match *self {
            Move::Probe(cell) => write!(f, "M {}", one(cell)),
            Move::Pin(cell) => write!(f, "P {}", one(cell)),
            Move::Gate1 { gate, cell } => write!(f, "{} {}", gate, one(cell)),
            Move::Gate2 {
                gate,
                first,
                second,
            } => write!(f, "{} {} {}", gate, one(first), one(second)),
        }
    }
}

impl FromStr for Move {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        parse_move(s)
    }
}

/// Parse one command of the move grammar
///
/// # Example
/// ```
/// use qmine_game::{parse_move, Cell, Move};
/// use qmine_core::CliffordGate;
///
/// assert_eq!(parse_move("3,2").unwrap(), Move::Probe(Cell::new(2, 1)));
/// assert_eq!(
///     parse_move("cx 1,1 1,2").unwrap(),
///     Move::Gate2 { gate: CliffordGate::CX, first: Cell::new(0, 0), second: Cell::new(0, 1) }
/// );
/// ```
pub fn parse_move(input: &str) -> Result<Move> {
    let normalized = tighten_commas(input);
    let tokens: Vec<&str> = normalized.split_whitespace().collect();

    match tokens.as_slice() {
        [] => Err(GameError::invalid_command(input, "empty command")),
        [coord] if coord.contains(',') => Ok(Move::Probe(parse_coord(input, coord)?)),
        [keyword, rest @ ..] => match keyword.to_ascii_uppercase().as_str() {
            "M" => Ok(Move::Probe(single_coord(input, rest)?)),
            "P" => Ok(Move::Pin(single_coord(input, rest)?)),
            _ => {
                let gate = CliffordGate::from_name(keyword).map_err(|_| {
                    GameError::invalid_command(input, format!("unknown command '{}'", keyword))
                })?;
                let cells = rest
                    .iter()
                    .map(|c| parse_coord(input, c))
                    .collect::<Result<SmallVec<[Cell; 2]>>>()?;
                if cells.len() != gate.num_qubits() {
                    return Err(GameError::invalid_command(
                        input,
                        format!("{} takes {} coordinate(s)", gate, gate.num_qubits()),
                    ));
                }
                Move::gate(gate, &cells)
            }
        },
    }
}

fn single_coord(input: &str, rest: &[&str]) -> Result<Cell> {
    match rest {
        [coord] => parse_coord(input, coord),
        _ => Err(GameError::invalid_command(input, "expected one coordinate")),
    }
}

/// `"r,c"` in 1-based form to a 0-based cell
fn parse_coord(input: &str, token: &str) -> Result<Cell> {
    let (row, col) = token
        .split_once(',')
        .ok_or_else(|| GameError::invalid_command(input, format!("'{}' is not row,col", token)))?;
    Ok(Cell::new(one_based(input, row)?, one_based(input, col)?))
}

fn one_based(input: &str, raw: &str) -> Result<usize> {
    match raw.parse::<usize>() {
        Ok(0) => Err(GameError::invalid_command(input, "coordinates start at 1")),
        Ok(n) => Ok(n - 1),
        Err(_) => Err(GameError::invalid_command(
            input,
            format!("'{}' is not a positive integer", raw),
        )),
    }
}

/// Drop whitespace around commas so `"2, 3"` reads as one coordinate
fn tighten_commas(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.trim().chars().peekable();
    while let Some(c) = chars.next() {
        if c == ',' {
            while out.ends_with(char::is_whitespace) {
                out.pop();
            }
            out.push(',');
            while chars.peek().is_some_and(|n| n.is_whitespace()) {
                chars.next();
            }
        } else {
            out.push(c);
        }
    }
    out
}
