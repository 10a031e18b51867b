use rand::Rng;

use super::state::{Board, Grid, Line, Move, Position, Tile, SIZE};

/// Slide/merge tiles in the given direction. No randomness.
///
/// Every direction is reduced to sliding rows left: the grid is reoriented
/// with `transpose`/`reverse_rows`, merged row by row, then oriented back.
pub fn shift(board: Board, direction: Move) -> Board {
    let grid = board.0;
    let moved = match direction {
        Move::Left => merge_rows(grid),
        Move::Right => reverse_rows(merge_rows(reverse_rows(grid))),
        Move::Up => transpose(merge_rows(transpose(grid))),
        Move::Down => transpose(reverse_rows(merge_rows(reverse_rows(transpose(grid))))),
    };
    Board(moved)
}

/// Compact a line toward index 0, merging each equal adjacent pair once.
///
/// A tile produced by a merge is never merged again in the same pass, so
/// `[2, 2, 2, 0]` becomes `[4, 2, 0, 0]`.
///
/// ```
/// use game_2048::engine::{slide_and_merge_line, Tile};
/// let t = |v| Tile::from_value(v).unwrap();
/// let out = slide_and_merge_line([t(2), t(2), t(2), t(0)]);
/// assert_eq!(out, [t(4), t(2), t(0), t(0)]);
/// ```
pub fn slide_and_merge_line(line: Line) -> Line {
    let mut out = [Tile::EMPTY; SIZE];
    let mut len = 0;
    let mut tiles = line.into_iter().filter(|t| !t.is_empty()).peekable();
    while let Some(tile) = tiles.next() {
        if tiles.peek() == Some(&tile) {
            tiles.next();
            out[len] = tile.merged();
        } else {
            out[len] = tile;
        }
        len += 1;
    }
    out
}

/// Swap rows and columns.
pub fn transpose(grid: Grid) -> Grid {
    let mut out = [[Tile::EMPTY; SIZE]; SIZE];
    for (r, line) in grid.iter().enumerate() {
        for (c, &tile) in line.iter().enumerate() {
            out[c][r] = tile;
        }
    }
    out
}

/// Mirror every row left-to-right.
pub fn reverse_rows(mut grid: Grid) -> Grid {
    for line in grid.iter_mut() {
        line.reverse();
    }
    grid
}

fn merge_rows(grid: Grid) -> Grid {
    grid.map(slide_and_merge_line)
}

/// True if any two horizontally or vertically adjacent cells hold the same tile.
pub fn has_adjacent_merge(board: Board) -> bool {
    let g = &board.0;
    (0..SIZE).any(|r| {
        (0..SIZE).any(|c| {
            let tile = g[r][c];
            !tile.is_empty()
                && ((c + 1 < SIZE && g[r][c + 1] == tile) || (r + 1 < SIZE && g[r + 1][c] == tile))
        })
    })
}

/// True if the board is full and no neighbouring pair can merge.
pub fn is_game_over(board: Board) -> bool {
    count_empty(board) == 0 && !has_adjacent_merge(board)
}

/// Count the number of zero tiles.
pub fn count_empty(board: Board) -> usize {
    board.tiles().filter(|t| t.is_empty()).count()
}

pub fn empty_positions(board: Board) -> Vec<Position> {
    board
        .tiles()
        .enumerate()
        .filter(|(_, t)| t.is_empty())
        .map(|(idx, _)| Position::new(idx / SIZE, idx % SIZE))
        .collect()
}

/// Pick a uniformly random empty cell and a new tile for it.
///
/// The cell is drawn first, then the value. `None` when the board is full.
pub fn random_spawn<R: Rng + ?Sized>(board: Board, rng: &mut R) -> Option<(Position, Tile)> {
    let empty = empty_positions(board);
    if empty.is_empty() {
        return None;
    }
    let pos = empty[rng.gen_range(0..empty.len())];
    Some((pos, generate_random_tile(rng)))
}

pub(crate) fn generate_random_tile<R: Rng + ?Sized>(rng: &mut R) -> Tile {
    if rng.gen_range(0..10) < 9 {
        Tile(1)
    } else {
        Tile(2)
    }
}

/// Sum of all tile values on the board.
pub fn get_score(board: Board) -> u64 {
    board.tiles().map(|t| u64::from(t.value())).sum()
}

pub fn get_highest_tile_val(board: Board) -> u32 {
    board.tiles().map(Tile::value).max().unwrap_or(0)
}

pub(crate) fn format_val(tile: Tile) -> String {
    if tile.is_empty() {
        return String::from("       ");
    }
    let mut x = tile.value().to_string();
    while x.len() < 7 {
        match x.len() {
            6 => x = format!(" {}", x),
            _ => x = format!(" {} ", x),
        }
    }
    x
}
