//! Interactive terminal client.
//!
//! Ships are arranged locally (the same rules the server checks) and then
//! submitted with `start`. During play a bare cell such as `B7` fires.

use std::io::{BufRead, Write};

use crate::client::{remote_kind, GameClient};
use crate::grid::parse_label;
use crate::transport::Transport;
use crate::ui::{render_boards, render_fleet};
use crate::{layout, Board, Fleet, Label, Orientation, Phase, Side};

const HELP: &str = "\
Setup:
  random                     random layout
  place <ship> <cell> [h|v]  place or move a ship, e.g. place carrier A1 v
  rotate <ship>              toggle a ship's orientation
  remove <ship>              take a ship off the board
  start                      submit the layout and begin
Play:
  <cell>                     fire, e.g. B7
Any time:
  show | reset | help | quit";

/// Wins and losses over the lifetime of the process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub wins: u32,
    pub losses: u32,
}

pub struct PlayerCli<T: Transport, W: Write> {
    client: GameClient<T>,
    out: W,
    board: Board,
    fleet: Fleet,
    opponent: Board,
    phase: Phase,
    tally: Tally,
}

impl<T: Transport, W: Write> PlayerCli<T, W> {
    pub fn new(client: GameClient<T>, out: W) -> Self {
        Self {
            client,
            out,
            board: Board::fresh(),
            fleet: Fleet::empty(),
            opponent: Board::fresh(),
            phase: Phase::Setup,
            tally: Tally::default(),
        }
    }

    pub fn tally(&self) -> Tally {
        self.tally
    }

    /// Read commands from `input` until `quit` or end of input.
    pub async fn run<I: BufRead>(&mut self, input: I) -> anyhow::Result<Tally> {
        self.board = self.client.get_board().await?;
        self.fleet = self.client.get_fleet().await?;
        writeln!(self.out, "{}", HELP)?;
        self.show()?;

        for line in input.lines() {
            let line = line?;
            let words: Vec<&str> = line.split_whitespace().collect();
            if words.is_empty() {
                continue;
            }
            if matches!(words[0], "quit" | "exit") {
                break;
            }
            if let Err(e) = self.command(&words).await {
                if remote_kind(&e).is_none() {
                    return Err(e);
                }
                writeln!(self.out, "Rejected: {}", e)?;
            }
            self.out.flush()?;
        }
        writeln!(
            self.out,
            "Wins: {}  Losses: {}",
            self.tally.wins, self.tally.losses
        )?;
        Ok(self.tally)
    }

    fn show(&mut self) -> anyhow::Result<()> {
        write!(self.out, "{}", render_boards(&self.board, &self.opponent))?;
        write!(self.out, "{}", render_fleet(&self.fleet))?;
        Ok(())
    }

    fn ship_name(&self, arg: &str) -> Option<String> {
        self.fleet
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(arg))
            .map(|s| s.name.clone())
    }

    /// Print a local rule violation; these never reach the server.
    fn local_error(&mut self, msg: impl std::fmt::Display) -> anyhow::Result<()> {
        writeln!(self.out, "{}", msg)?;
        Ok(())
    }

    async fn command(&mut self, words: &[&str]) -> anyhow::Result<()> {
        match (words[0], self.phase) {
            ("help", _) => writeln!(self.out, "{}", HELP)?,
            ("show", _) => self.show()?,
            ("reset", _) => {
                let fresh = self.client.reset().await?;
                self.board = fresh.board;
                self.fleet = fresh.fleet;
                self.opponent = Board::fresh();
                self.phase = Phase::Setup;
                self.show()?;
            }
            ("random", Phase::Setup) => {
                let layout = self.client.randomize().await?;
                self.board = layout.board;
                self.fleet = layout.fleet;
                self.show()?;
            }
            ("place", Phase::Setup) if words.len() >= 3 => {
                let orientation = match words.get(3).map(|w| w.to_ascii_lowercase()) {
                    None => None,
                    Some(w) if w.starts_with('h') => Some(Orientation::Horizontal),
                    Some(w) if w.starts_with('v') => Some(Orientation::Vertical),
                    Some(_) => return self.local_error("Orientation must be h or v"),
                };
                let Some(name) = self.ship_name(words[1]) else {
                    return self.local_error(format!("No ship called '{}'", words[1]));
                };
                let Some(start) = parse_label(words[2]) else {
                    return self.local_error(format!("Bad cell '{}'", words[2]));
                };
                let orientation = match orientation {
                    Some(o) => o,
                    None => self
                        .fleet
                        .iter()
                        .find(|s| s.name == name)
                        .map(|s| s.orientation)
                        .unwrap_or_default(),
                };
                match layout::place_ship(&mut self.board, &mut self.fleet, &name, start, orientation) {
                    Ok(()) => self.show()?,
                    Err(e) => self.local_error(e)?,
                }
            }
            ("rotate", Phase::Setup) | ("remove", Phase::Setup) if words.len() >= 2 => {
                let Some(name) = self.ship_name(words[1]) else {
                    return self.local_error(format!("No ship called '{}'", words[1]));
                };
                let result = if words[0] == "rotate" {
                    layout::rotate(&mut self.board, &mut self.fleet, &name).map(|_| ())
                } else {
                    layout::remove_ship(&mut self.board, &mut self.fleet, &name)
                };
                match result {
                    Ok(()) => self.show()?,
                    Err(e) => self.local_error(e)?,
                }
            }
            ("place" | "rotate" | "remove", Phase::Setup) => {
                self.local_error("Missing arguments; type help for usage")?
            }
            ("start", Phase::Setup) => {
                self.client.set_board(self.board.clone()).await?;
                self.client.set_fleet(self.fleet.clone()).await?;
                let state = self.client.start().await?;
                self.phase = state.phase;
                self.opponent = Board::fresh();
                writeln!(self.out, "Battle stations! Fire with a cell like B7.")?;
            }
            (cell, Phase::Playing) => match parse_label(cell) {
                Some(id) => self.fire(id).await?,
                None => self.local_error(format!("Unknown command or cell '{}'", cell))?,
            },
            (other, phase) => {
                self.local_error(format!("'{}' is not available during {:?}", other, phase))?
            }
        }
        Ok(())
    }

    async fn fire(&mut self, id: usize) -> anyhow::Result<()> {
        let res = self.client.shoot(id).await?;
        let shot = res.player_shot;
        self.opponent = replace_cell(&self.opponent, shot);
        writeln!(self.out, "You fire at {}: {:?}", Label(shot.id), shot.status)?;
        if let Some(ship) = &res.player_sunk_ship {
            writeln!(self.out, "You sank the enemy {}!", ship)?;
        }
        if let Some(bot) = res.bot_shot {
            self.board = replace_cell(&self.board, bot);
            writeln!(self.out, "Bot fires at {}: {:?}", Label(bot.id), bot.status)?;
            if let Some(i) = self.fleet.ship_at(bot.id) {
                if let Some(ship) = self.fleet.get_mut(i) {
                    ship.register_hit();
                }
            }
        }
        if let Some(ship) = &res.bot_sunk_ship {
            writeln!(self.out, "The bot sank your {}!", ship)?;
        }
        self.show()?;

        self.phase = res.match_state.phase;
        match res.match_state.winner {
            Some(Side::Player) => {
                self.tally.wins += 1;
                writeln!(self.out, "You win! Type reset to play again.")?;
            }
            Some(Side::Bot) => {
                self.tally.losses += 1;
                writeln!(self.out, "You lose. Type reset to play again.")?;
            }
            None => {}
        }
        Ok(())
    }
}

fn replace_cell(board: &Board, cell: crate::Cell) -> Board {
    let mut cells = board.cells().to_vec();
    if let Some(slot) = cells.get_mut(cell.id) {
        *slot = cell;
    }
    Board::from_cells(cells)
}
