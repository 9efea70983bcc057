//! Board geometry, exploration bookkeeping and flood fill
//!
//! The board never touches the quantum register. It maps cells to qubits,
//! records which cells are explored, pinned or detonated, and drives flood
//! fill through a caller-supplied reveal callback.

use crate::error::GameError;
use qmine_core::QubitId;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::VecDeque;
use std::fmt;

const NEIGHBOUR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// 0-based board coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Self {
        Self::new(row, col)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Fixed-size bitset over cell indices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CellSetRepr")]
pub struct CellSet {
    len: usize,
    words: Vec<u64>,
}

#[derive(Deserialize)]
struct CellSetRepr {
    len: usize,
    words: Vec<u64>,
}

impl TryFrom<CellSetRepr> for CellSet {
    type Error = GameError;

    fn try_from(repr: CellSetRepr) -> Result<Self, GameError> {
        if repr.words.len() != repr.len.div_ceil(64) {
            return Err(GameError::Persistence(format!(
                "cell set over {} cells stored in {} words",
                repr.len,
                repr.words.len()
            )));
        }
        let mut set = Self {
            len: repr.len,
            words: repr.words,
        };
        // bits past `len` would inflate `count`
        if let Some(last) = set.words.last_mut() {
            let tail = set.len % 64;
            if tail != 0 {
                *last &= (1u64 << tail) - 1;
            }
        }
        Ok(set)
    }
}

impl CellSet {
    /// Empty set over `len` cells
    pub fn new(len: usize) -> Self {
        Self {
            len,
            words: vec![0; len.div_ceil(64)],
        }
    }

    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        index < self.len && self.words[index / 64] >> (index % 64) & 1 == 1
    }

    /// Add `index`; returns whether it was newly inserted
    #[inline]
    pub fn insert(&mut self, index: usize) -> bool {
        let was = self.contains(index);
        self.words[index / 64] |= 1 << (index % 64);
        !was
    }

    #[inline]
    pub fn remove(&mut self, index: usize) {
        self.words[index / 64] &= !(1 << (index % 64));
    }

    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn clear(&mut self) {
        self.words.fill(0);
    }

    /// Members in ascending order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).filter(|&i| self.contains(i))
    }
}

/// What a flood-fill reveal callback decided for one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloodStep {
    /// Cell is safe; do not expand from it
    Reveal,
    /// Cell is safe and its clue is zero; expand to its neighbours
    Expand,
    /// Cell held a mine; stop the fill
    Detonate,
}

/// Cells touched by one flood fill
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FloodOutcome {
    /// Newly explored cells, in reveal order
    pub revealed: Vec<usize>,
    /// Cell whose probe found a mine, if the fill was cut short
    pub detonated: Option<usize>,
}

/// Minesweeper grid of `rows * cols` cells backed by one qubit each
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BoardRepr")]
pub struct Board {
    rows: usize,
    cols: usize,
    explored: CellSet,
    pinned: CellSet,
    detonated: CellSet,
}

#[derive(Deserialize)]
struct BoardRepr {
    rows: usize,
    cols: usize,
    explored: CellSet,
    pinned: CellSet,
    detonated: CellSet,
}

impl TryFrom<BoardRepr> for Board {
    type Error = GameError;

    fn try_from(repr: BoardRepr) -> Result<Self, GameError> {
        let len = repr.rows.checked_mul(repr.cols);
        for (name, set) in [
            ("explored", &repr.explored),
            ("pinned", &repr.pinned),
            ("detonated", &repr.detonated),
        ] {
            if len != Some(set.len) {
                return Err(GameError::Persistence(format!(
                    "{} set covers {} cells on a {}x{} board",
                    name, set.len, repr.rows, repr.cols
                )));
            }
        }
        Ok(Self {
            rows: repr.rows,
            cols: repr.cols,
            explored: repr.explored,
            pinned: repr.pinned,
            detonated: repr.detonated,
        })
    }
}

impl Board {
    /// Create an unexplored board
    pub fn new(rows: usize, cols: usize) -> Self {
        let len = rows * cols;
        Self {
            rows,
            cols,
            explored: CellSet::new(len),
            pinned: CellSet::new(len),
            detonated: CellSet::new(len),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of cells (and qubits)
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Row-major index of `cell`, or `None` off the board
    pub fn index(&self, cell: Cell) -> Option<usize> {
        (cell.row < self.rows && cell.col < self.cols).then(|| cell.row * self.cols + cell.col)
    }

    /// Cell at a row-major index
    pub fn cell(&self, index: usize) -> Cell {
        Cell::new(index / self.cols, index % self.cols)
    }

    /// Qubit backing the cell at `index`
    pub fn qubit(&self, index: usize) -> QubitId {
        QubitId::new(index)
    }

    /// Indices of the up-to-eight neighbours, ascending
    pub fn neighbours(&self, index: usize) -> SmallVec<[usize; 8]> {
        let Cell { row, col } = self.cell(index);
        let mut out = SmallVec::new();
        for (dr, dc) in NEIGHBOUR_OFFSETS {
            let (Some(r), Some(c)) = (row.checked_add_signed(dr), col.checked_add_signed(dc)) else {
                continue;
            };
            if r < self.rows && c < self.cols {
                out.push(r * self.cols + c);
            }
        }
        out
    }

    /// Qubits of the neighbours of `index`
    pub fn neighbour_qubits(&self, index: usize) -> SmallVec<[QubitId; 8]> {
        self.neighbours(index).into_iter().map(QubitId::new).collect()
    }

    /// Whether two distinct cells touch, diagonals included
    pub fn adjacent(&self, a: usize, b: usize) -> bool {
        let (ca, cb) = (self.cell(a), self.cell(b));
        a != b && ca.row.abs_diff(cb.row) <= 1 && ca.col.abs_diff(cb.col) <= 1
    }

    pub fn is_explored(&self, index: usize) -> bool {
        self.explored.contains(index)
    }

    pub fn is_pinned(&self, index: usize) -> bool {
        self.pinned.contains(index)
    }

    pub fn is_detonated(&self, index: usize) -> bool {
        self.detonated.contains(index)
    }

    /// Explored or detonated: the cell has been measured and is out of play
    pub fn is_revealed(&self, index: usize) -> bool {
        self.is_explored(index) || self.is_detonated(index)
    }

    pub fn explored(&self) -> &CellSet {
        &self.explored
    }

    pub fn pinned(&self) -> &CellSet {
        &self.pinned
    }

    pub fn explored_count(&self) -> usize {
        self.explored.count()
    }

    pub fn mark_explored(&mut self, index: usize) -> bool {
        self.pinned.remove(index);
        self.explored.insert(index)
    }

    pub fn mark_detonated(&mut self, index: usize) {
        self.pinned.remove(index);
        self.detonated.insert(index);
    }

    /// Flip the pin on `index`; returns the new pin state
    pub fn toggle_pin(&mut self, index: usize) -> bool {
        if self.pinned.contains(index) {
            self.pinned.remove(index);
            false
        } else {
            self.pinned.insert(index);
            true
        }
    }

    /// Forget all exploration, pins and detonations
    pub fn clear(&mut self) {
        self.explored.clear();
        self.pinned.clear();
        self.detonated.clear();
    }

    /// Flood fill outward from an explored zero-clue cell
    ///
    /// Uses an explicit worklist. Every unexplored, unpinned neighbour is
    /// handed to `reveal` at most once; `Reveal` and `Expand` mark it
    /// explored, `Expand` also queues it, `Detonate` marks it detonated and
    /// ends the fill.
    pub fn flood_fill<E, F>(&mut self, seed: usize, mut reveal: F) -> Result<FloodOutcome, E>
    where
        F: FnMut(&Board, usize) -> Result<FloodStep, E>,
    {
        let mut outcome = FloodOutcome::default();
        let mut visited = CellSet::new(self.len());
        let mut queue = VecDeque::from([seed]);
        visited.insert(seed);

        while let Some(current) = queue.pop_front() {
            for next in self.neighbours(current) {
                if !visited.insert(next) || self.is_revealed(next) || self.is_pinned(next) {
                    continue;
                }
                match reveal(self, next)? {
                    FloodStep::Reveal => {
                        self.mark_explored(next);
                        outcome.revealed.push(next);
                    }
                    FloodStep::Expand => {
                        self.mark_explored(next);
                        outcome.revealed.push(next);
                        queue.push_back(next);
                    }
                    FloodStep::Detonate => {
                        self.mark_detonated(next);
                        outcome.detonated = Some(next);
                        return Ok(outcome);
                    }
                }
            }
        }
        Ok(outcome)
    }
}
