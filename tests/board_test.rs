//! Tests for board move application and outcome evaluation.

use quiztactoe::{Board, Cell, MoveError, Outcome, Symbol};

#[test]
fn new_board_is_in_progress() {
    let board = Board::new();
    assert_eq!(board.outcome(), Outcome::InProgress);
    assert!(!board.is_full());
}

#[test]
fn apply_marks_the_target_cell() {
    let mut board = Board::new();
    board.apply(1, 1, Symbol::Circle).unwrap();
    assert_eq!(board.cell(1, 1), Some(Cell::Marked(Symbol::Circle)));
    assert_eq!(board.cell(0, 0), Some(Cell::Empty));
}

#[test]
fn apply_rejects_taken_cell() {
    let mut board = Board::new();
    board.apply(0, 0, Symbol::Circle).unwrap();
    let result = board.apply(0, 0, Symbol::Cross);
    assert_eq!(result, Err(MoveError::CellTaken));
    // The original mark is untouched
    assert_eq!(board.cell(0, 0), Some(Cell::Marked(Symbol::Circle)));
}

#[test]
fn apply_rejects_out_of_bounds() {
    let mut board = Board::new();
    assert_eq!(board.apply(3, 0, Symbol::Circle), Err(MoveError::OutOfBounds));
    assert_eq!(board.apply(0, 3, Symbol::Circle), Err(MoveError::OutOfBounds));
    assert_eq!(board.outcome(), Outcome::InProgress);
}

#[test]
fn every_line_wins() {
    let lines: [[(usize, usize); 3]; 8] = [
        [(0, 0), (0, 1), (0, 2)],
        [(1, 0), (1, 1), (1, 2)],
        [(2, 0), (2, 1), (2, 2)],
        [(0, 0), (1, 0), (2, 0)],
        [(0, 1), (1, 1), (2, 1)],
        [(0, 2), (1, 2), (2, 2)],
        [(0, 0), (1, 1), (2, 2)],
        [(0, 2), (1, 1), (2, 0)],
    ];
    for line in lines {
        let mut board = Board::new();
        for (row, col) in line {
            board.apply(row, col, Symbol::Cross).unwrap();
        }
        assert_eq!(board.outcome(), Outcome::Won(Symbol::Cross), "line {line:?}");
    }
}

#[test]
fn completing_the_top_row_wins() {
    let mut board = Board::new();
    board.apply(0, 0, Symbol::Circle).unwrap();
    board.apply(0, 1, Symbol::Circle).unwrap();
    assert_eq!(board.outcome(), Outcome::InProgress);
    board.apply(0, 2, Symbol::Circle).unwrap();
    assert_eq!(board.outcome(), Outcome::Won(Symbol::Circle));
}

#[test]
fn full_board_without_a_line_is_a_draw() {
    // C X C
    // C X X
    // X C C
    let mut board = Board::new();
    board.apply(0, 0, Symbol::Circle).unwrap();
    board.apply(0, 1, Symbol::Cross).unwrap();
    board.apply(0, 2, Symbol::Circle).unwrap();
    board.apply(1, 0, Symbol::Circle).unwrap();
    board.apply(1, 1, Symbol::Cross).unwrap();
    board.apply(1, 2, Symbol::Cross).unwrap();
    board.apply(2, 0, Symbol::Cross).unwrap();
    board.apply(2, 1, Symbol::Circle).unwrap();
    board.apply(2, 2, Symbol::Circle).unwrap();
    assert!(board.is_full());
    assert_eq!(board.outcome(), Outcome::Draw);
}

#[test]
fn mixed_line_does_not_win() {
    let mut board = Board::new();
    board.apply(0, 0, Symbol::Circle).unwrap();
    board.apply(0, 1, Symbol::Cross).unwrap();
    board.apply(0, 2, Symbol::Circle).unwrap();
    assert_eq!(board.outcome(), Outcome::InProgress);
}

#[test]
fn grid_snapshot_matches_cells() {
    let mut board = Board::new();
    board.apply(2, 1, Symbol::Cross).unwrap();
    let grid = board.grid();
    assert_eq!(grid[2][1], Cell::Marked(Symbol::Cross));
    assert_eq!(grid[0][0], Cell::Empty);
}

#[test]
fn symbol_opponent_flips() {
    assert_eq!(Symbol::Circle.opponent(), Symbol::Cross);
    assert_eq!(Symbol::Cross.opponent(), Symbol::Circle);
}
