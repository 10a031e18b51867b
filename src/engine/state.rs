use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::ops;

/// Side length of the square board.
pub const SIZE: usize = 4;

/// Face value whose first appearance wins the game.
pub const WIN_TILE: u32 = 2048;

/// Largest exponent accepted when building a board from face values.
///
/// 2^17 is the biggest tile a 4x4 game can ever produce.
pub const MAX_EXPONENT: u8 = 17;

pub type Line = [Tile; SIZE];
pub type Grid = [Line; SIZE];

/// A direction to move/merge tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    pub fn as_str(self) -> &'static str {
        match self {
            Move::Up => "up",
            Move::Down => "down",
            Move::Left => "left",
            Move::Right => "right",
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown direction '{0}' (expected up/down/left/right, w/a/s/d or h/j/k/l)")]
pub struct ParseMoveError(pub String);

impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "w" | "k" => Ok(Move::Up),
            "down" | "s" | "j" => Ok(Move::Down),
            "left" | "a" | "h" => Ok(Move::Left),
            "right" | "d" | "l" => Ok(Move::Right),
            _ => Err(ParseMoveError(s.to_string())),
        }
    }
}

/// A single cell, stored as the base-2 exponent of its face value.
///
/// `0` is an empty cell, `1` is a 2, `2` is a 4, and so on, so a cell can
/// never hold a value that is not a power of two.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Tile(pub(crate) u8);

impl Tile {
    pub const EMPTY: Tile = Tile(0);

    /// Build a tile from its exponent. `None` above [`MAX_EXPONENT`].
    #[inline]
    pub const fn from_exponent(exponent: u8) -> Option<Tile> {
        if exponent <= MAX_EXPONENT {
            Some(Tile(exponent))
        } else {
            None
        }
    }

    /// Build a tile from a face value: `0` or a power of two in `2..=2^17`.
    pub fn from_value(value: u32) -> Option<Tile> {
        if value == 0 {
            return Some(Tile::EMPTY);
        }
        if value < 2 || !value.is_power_of_two() {
            return None;
        }
        Tile::from_exponent(value.trailing_zeros() as u8)
    }

    #[inline]
    pub fn exponent(self) -> u8 {
        self.0
    }

    /// Face value of the tile (0 if empty), e.g. 2, 4, 8, ...
    #[inline]
    pub fn value(self) -> u32 {
        if self.0 == 0 {
            0
        } else {
            1 << self.0
        }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The tile produced by merging two copies of `self`.
    #[inline]
    pub(crate) fn merged(self) -> Tile {
        Tile(self.0 + 1)
    }
}

impl fmt::Debug for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tile({})", self.value())
    }
}

/// A (row, column) cell coordinate, 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    #[inline]
    pub const fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("expected 4 rows, got {0}")]
    WrongRowCount(usize),
    #[error("row {row} has {len} cells, expected 4")]
    WrongRowLength { row: usize, len: usize },
    #[error("cell ({row}, {col}) holds {value}, which is not 0 or a power of two between 2 and 131072")]
    InvalidTile { row: usize, col: usize, value: u32 },
}

/// 4x4 2048 board of exponent tiles, row-major.
///
/// Boards are plain values: every operation returns a new `Board` and
/// leaves the receiver untouched.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board(pub(crate) Grid);

impl Board {
    /// A constant empty board (all zeros).
    pub const EMPTY: Board = Board([[Tile::EMPTY; SIZE]; SIZE]);

    #[inline]
    pub fn from_grid(grid: Grid) -> Self {
        Board(grid)
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.0
    }

    #[inline]
    pub fn into_grid(self) -> Grid {
        self.0
    }

    /// Build a board from row-major face values.
    ///
    /// ```
    /// use game_2048::engine::{Board, BoardError};
    /// let b = Board::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]).unwrap();
    /// assert_eq!(b.score(), 4);
    /// assert!(matches!(
    ///     Board::from_rows([[3, 0, 0, 0], [0; 4], [0; 4], [0; 4]]),
    ///     Err(BoardError::InvalidTile { row: 0, col: 0, value: 3 })
    /// ));
    /// ```
    pub fn from_rows(rows: [[u32; SIZE]; SIZE]) -> Result<Self, BoardError> {
        let mut grid = [[Tile::EMPTY; SIZE]; SIZE];
        for (row, values) in rows.iter().enumerate() {
            for (col, &value) in values.iter().enumerate() {
                grid[row][col] =
                    Tile::from_value(value).ok_or(BoardError::InvalidTile { row, col, value })?;
            }
        }
        Ok(Board(grid))
    }

    /// Row-major face values, the board's rendering/wire shape.
    pub fn rows(&self) -> [[u32; SIZE]; SIZE] {
        self.0.map(|line| line.map(Tile::value))
    }

    /// Return a copy of this board with `tile` written at `pos`.
    #[inline]
    pub fn with_tile(self, pos: Position, tile: Tile) -> Self {
        let mut grid = self.0;
        grid[pos.row][pos.col] = tile;
        Board(grid)
    }

    #[inline]
    pub fn tile(&self, pos: Position) -> Tile {
        self.0[pos.row][pos.col]
    }

    /// Face value at a row-major index in `0..16`.
    #[inline]
    pub fn tile_value(&self, idx: usize) -> u32 {
        self.0[idx / SIZE][idx % SIZE].value()
    }

    /// Return the board resulting from sliding/merging tiles in `dir` (no random insert).
    ///
    /// ```
    /// use game_2048::engine::{Board, Move};
    /// let b = Board::from_rows([[2, 2, 2, 0], [0; 4], [0; 4], [0; 4]]).unwrap();
    /// assert_eq!(b.shift(Move::Left).rows()[0], [4, 2, 0, 0]);
    /// ```
    #[inline]
    pub fn shift(self, dir: Move) -> Self {
        ops::shift(self, dir)
    }

    /// True if shifting in `dir` changes the board.
    #[inline]
    pub fn can_move(self, dir: Move) -> bool {
        self.shift(dir) != self
    }

    pub fn legal_moves(self) -> Vec<Move> {
        Move::ALL.into_iter().filter(|&m| self.can_move(m)).collect()
    }

    /// Insert a random 2 (90%) or 4 (10%) tile into a random empty slot, using the provided RNG.
    /// A full board is returned unchanged.
    ///
    /// ```
    /// use game_2048::engine::Board;
    /// use rand::{SeedableRng, rngs::StdRng};
    /// let mut rng = StdRng::seed_from_u64(123);
    /// let b = Board::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
    /// assert_eq!(b.count_empty(), 14);
    /// ```
    #[inline]
    pub fn with_random_tile<R: Rng + ?Sized>(self, rng: &mut R) -> Self {
        match ops::random_spawn(self, rng) {
            Some((pos, tile)) => self.with_tile(pos, tile),
            None => self,
        }
    }

    /// Sum of all tile values currently on the board.
    #[inline]
    pub fn score(self) -> u64 {
        ops::get_score(self)
    }

    /// True when no cell is empty and no two neighbours share a value.
    #[inline]
    pub fn is_game_over(self) -> bool {
        ops::is_game_over(self)
    }

    #[inline]
    pub fn has_adjacent_merge(self) -> bool {
        ops::has_adjacent_merge(self)
    }

    #[inline]
    pub fn is_full(self) -> bool {
        self.count_empty() == 0
    }

    /// Return the highest tile value (e.g., 2048) present on the board.
    #[inline]
    pub fn highest_tile(self) -> u32 {
        ops::get_highest_tile_val(self)
    }

    #[inline]
    pub fn contains_value(self, value: u32) -> bool {
        self.tiles().any(|t| t.value() == value)
    }

    /// Count the number of empty cells on the board.
    #[inline]
    pub fn count_empty(self) -> usize {
        ops::count_empty(self)
    }

    /// Empty cells in row-major order.
    #[inline]
    pub fn empty_positions(self) -> Vec<Position> {
        ops::empty_positions(self)
    }

    /// Iterate over tiles in row-major order.
    #[inline]
    pub fn tiles(self) -> TilesIter {
        TilesIter { board: self, idx: 0 }
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({:?})", self.rows())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        for (r, line) in self.0.iter().enumerate() {
            if r > 0 {
                writeln!(f, "{}", "-".repeat(8 * SIZE))?;
            }
            let cells: Vec<String> = line.iter().map(|&t| ops::format_val(t)).collect();
            writeln!(f, "{}", cells.join("|"))?;
        }
        Ok(())
    }
}

impl TryFrom<Vec<Vec<u32>>> for Board {
    type Error = BoardError;

    fn try_from(rows: Vec<Vec<u32>>) -> Result<Self, Self::Error> {
        if rows.len() != SIZE {
            return Err(BoardError::WrongRowCount(rows.len()));
        }
        let mut values = [[0u32; SIZE]; SIZE];
        for (row, cells) in rows.iter().enumerate() {
            values[row] = cells
                .as_slice()
                .try_into()
                .map_err(|_| BoardError::WrongRowLength { row, len: cells.len() })?;
        }
        Board::from_rows(values)
    }
}

impl Serialize for Board {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.rows().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let rows = Vec::<Vec<u32>>::deserialize(deserializer)?;
        Board::try_from(rows).map_err(serde::de::Error::custom)
    }
}

/// Iterator over board tiles in row-major order.
pub struct TilesIter {
    board: Board,
    idx: usize,
}

impl Iterator for TilesIter {
    type Item = Tile;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.idx >= SIZE * SIZE {
            return None;
        }
        let tile = self.board.0[self.idx / SIZE][self.idx % SIZE];
        self.idx += 1;
        Some(tile)
    }
}

impl IntoIterator for Board {
    type Item = Tile;
    type IntoIter = TilesIter;
    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.tiles()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_from_value() {
        assert_eq!(Tile::from_value(0), Some(Tile::EMPTY));
        assert_eq!(Tile::from_value(2).map(Tile::exponent), Some(1));
        assert_eq!(Tile::from_value(2048).map(Tile::exponent), Some(11));
        assert_eq!(Tile::from_value(1), None);
        assert_eq!(Tile::from_value(6), None);
        assert_eq!(Tile::from_exponent(11).map(Tile::value), Some(2048));
    }

    #[test]
    fn tile_value_cap_is_inclusive() {
        assert_eq!(Tile::from_value(1 << 17).map(Tile::exponent), Some(MAX_EXPONENT));
        assert_eq!(Tile::from_value(1 << 18), None);
        assert!(Board::from_rows([[65536, 131072, 0, 0], [0; 4], [0; 4], [0; 4]]).is_ok());
        assert_eq!(
            Board::from_rows([[262144, 0, 0, 0], [0; 4], [0; 4], [0; 4]]),
            Err(BoardError::InvalidTile { row: 0, col: 0, value: 262144 })
        );
    }

    #[test]
    fn from_rows_rejects_bad_values() {
        let err = Board::from_rows([[0; 4], [0, 0, 12, 0], [0; 4], [0; 4]]).unwrap_err();
        assert_eq!(err, BoardError::InvalidTile { row: 1, col: 2, value: 12 });
    }

    #[test]
    fn try_from_vec_checks_dimensions() {
        let three_rows = vec![vec![0; 4]; 3];
        assert_eq!(Board::try_from(three_rows), Err(BoardError::WrongRowCount(3)));

        let mut ragged = vec![vec![0; 4]; 4];
        ragged[2].push(0);
        assert_eq!(
            Board::try_from(ragged),
            Err(BoardError::WrongRowLength { row: 2, len: 5 })
        );

        let ok = vec![vec![2, 0, 0, 0], vec![0; 4], vec![0; 4], vec![0, 0, 0, 4]];
        let b = Board::try_from(ok).unwrap();
        assert_eq!(b.tile_value(0), 2);
        assert_eq!(b.tile_value(15), 4);
    }

    #[test]
    fn serializes_row_major_values() {
        let b = Board::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0, 0, 0, 2048]]).unwrap();
        let json = serde_json::to_string(&b).unwrap();
        assert_eq!(json, "[[2,2,0,0],[0,0,0,0],[0,0,0,0],[0,0,0,2048]]");
        let back: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(back, b);
    }

    #[test]
    fn deserialize_rejects_invalid_boards() {
        assert!(serde_json::from_str::<Board>("[[3,0,0,0],[0,0,0,0],[0,0,0,0],[0,0,0,0]]").is_err());
        assert!(serde_json::from_str::<Board>("[[0,0,0,0],[0,0,0,0]]").is_err());
    }

    #[test]
    fn parse_move() {
        assert_eq!("up".parse::<Move>(), Ok(Move::Up));
        assert_eq!("W".parse::<Move>(), Ok(Move::Up));
        assert_eq!("j".parse::<Move>(), Ok(Move::Down));
        assert_eq!(" Left ".parse::<Move>(), Ok(Move::Left));
        assert_eq!("d".parse::<Move>(), Ok(Move::Right));
        assert_eq!("x".parse::<Move>(), Err(ParseMoveError("x".to_string())));
        assert_eq!(serde_json::to_string(&Move::Down).unwrap(), "\"down\"");
    }

    #[test]
    fn tiles_iterate_row_major() {
        let b = Board::from_rows([[2, 4, 0, 0], [0; 4], [0; 4], [0, 0, 0, 8]]).unwrap();
        let values: Vec<u32> = b.tiles().map(Tile::value).collect();
        assert_eq!(values.len(), 16);
        assert_eq!(&values[..3], &[2, 4, 0]);
        assert_eq!(values[15], 8);
        assert!(b.contains_value(8));
        assert!(!b.contains_value(16));
    }

    #[test]
    fn display_renders_grid() {
        let b = Board::from_rows([[2, 0, 0, 0], [0; 4], [0; 4], [0, 0, 0, 2048]]).unwrap();
        let s = b.to_string();
        assert_eq!(s.lines().filter(|l| l.starts_with('-')).count(), 3);
        assert!(s.contains("   2   "));
        assert!(s.contains("  2048 "));
    }
}
