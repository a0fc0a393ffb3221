//! Plain-text rendering of boards and fleets for the terminal client.

use std::fmt::Write;

use crate::{Board, CellStatus, Fleet, Label, BOARD_SIZE};

fn symbol(status: CellStatus, reveal: bool) -> char {
    match status {
        CellStatus::Hit => 'X',
        CellStatus::Miss => 'o',
        CellStatus::Ship if reveal => 'S',
        CellStatus::Ship | CellStatus::Empty => '.',
    }
}

fn board_lines(board: &Board, reveal: bool) -> Vec<String> {
    let n = BOARD_SIZE as usize;
    let mut lines = Vec::with_capacity(n + 1);
    let mut header = String::from("   ");
    for c in 0..n {
        let _ = write!(header, " {}", (b'A' + c as u8) as char);
    }
    lines.push(header);
    for (r, row) in board.cells().chunks(n).enumerate() {
        let mut line = format!("{:>2} ", r + 1);
        for cell in row {
            let _ = write!(line, " {}", symbol(cell.status, reveal));
        }
        lines.push(line);
    }
    lines
}

/// One board as a grid with column letters and row numbers. With `reveal`
/// unset, intact ship segments look like open water.
pub fn render_board(board: &Board, reveal: bool) -> String {
    let mut out = board_lines(board, reveal).join("\n");
    out.push('\n');
    out
}

/// The player's own board next to their view of the opponent's.
pub fn render_boards(own: &Board, opponent: &Board) -> String {
    let left = board_lines(own, true);
    let right = board_lines(opponent, false);
    let width = left.iter().map(|l| l.len()).max().unwrap_or(0);
    let mut out = format!("{:<width$}    {}\n", "Your fleet", "Opponent", width = width);
    for (l, r) in left.iter().zip(right.iter()) {
        let _ = writeln!(out, "{:<width$}    {}", l, r, width = width);
    }
    out.push_str("Legend: S=Ship  X=Hit  o=Miss  .=Water\n");
    out
}

/// One line per ship with its placement and damage.
pub fn render_fleet(fleet: &Fleet) -> String {
    let mut out = String::new();
    for ship in fleet.iter() {
        let status = if ship.sunk {
            "SUNK".to_string()
        } else if !ship.placed {
            "not placed".to_string()
        } else {
            let at = ship.coordinates.first().copied().unwrap_or(0);
            format!(
                "{} {:?}, {} hit(s)",
                Label(at),
                ship.orientation,
                ship.hit_count
            )
        };
        let _ = writeln!(out, "  {}: {}", ship, status);
    }
    out
}
