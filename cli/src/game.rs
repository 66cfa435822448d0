use anyhow::{Context, bail};
use bombbroom_core::{Dimension, GameEngine, GameState, Location, TileStatus};
use std::fmt::Write as _;
use std::io::{BufRead, Write};
use std::str::FromStr;

use crate::events::Announcer;

pub(crate) const HELP: &str = "\
Commands:
  r X Y   reveal the tile at column X, row Y
  f X Y   toggle a flag
  c X Y   reveal the neighbours of a tile whose mines are all flagged
  h       show this help
  q       quit";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    Reveal(Location),
    Flag(Location),
    Chord(Location),
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            bail!("Empty command");
        };

        let mut location = || -> anyhow::Result<Location> {
            let mut coord = |axis: &str| -> anyhow::Result<Dimension> {
                let word = words
                    .next()
                    .with_context(|| format!("Missing {axis} coordinate"))?;
                word.parse()
                    .with_context(|| format!("Invalid {axis} coordinate {word:?}"))
            };
            let x = coord("x")?;
            let y = coord("y")?;
            Ok(Location::new(x, y))
        };

        let command = match verb {
            "r" | "reveal" => Command::Reveal(location()?),
            "f" | "flag" => Command::Flag(location()?),
            "c" | "chord" => Command::Chord(location()?),
            "h" | "help" | "?" => Command::Help,
            "q" | "quit" => Command::Quit,
            other => bail!("Unknown command {other:?}, type h for help"),
        };
        Ok(command)
    }
}

/// Draws the board from the engine's query interface.
pub(crate) fn render(game: &GameEngine) -> String {
    let (width, height) = game.size();
    let mut out = String::new();

    let _ = writeln!(
        out,
        "mines left: {}  state: {:?}",
        game.mines_left(),
        game.state()
    );
    out.push_str("    ");
    for x in 0..width {
        let _ = write!(out, "{:>3}", x);
    }
    out.push('\n');

    for y in 0..height {
        let _ = write!(out, "{:>3} ", y);
        for x in 0..width {
            let location = Location::new(x, y);
            let _ = write!(out, "{:>3}", tile_symbol(game, location));
        }
        out.push('\n');
    }
    out
}

fn tile_symbol(game: &GameEngine, location: Location) -> char {
    let tile = game.tile_at(location);
    match tile.status() {
        TileStatus::Unknown if game.state() == GameState::Lost && tile.is_mine() => '*',
        TileStatus::Unknown => '.',
        TileStatus::Flagged => 'F',
        TileStatus::Exploded => 'X',
        TileStatus::Revealed => match game.bombs_near(location) {
            0 => ' ',
            count => char::from_digit(count.into(), 10).unwrap_or('?'),
        },
    }
}

/// Reads commands until the input ends, the player quits, or the game is over.
pub(crate) fn run<R: BufRead, W: Write>(
    game: &mut GameEngine,
    announcer: &Announcer,
    input: R,
    mut output: W,
) -> anyhow::Result<()> {
    writeln!(output, "{}", render(game))?;
    writeln!(output, "{HELP}")?;

    for line in input.lines() {
        let line = line.context("Could not read command")?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(err) => {
                writeln!(output, "{err:#}")?;
                continue;
            }
        };
        log::debug!("Command: {:?}", command);

        let changed = match command {
            Command::Help => {
                writeln!(output, "{HELP}")?;
                continue;
            }
            Command::Quit => break,
            Command::Reveal(location) | Command::Flag(location) | Command::Chord(location)
                if !game.contains(location) =>
            {
                writeln!(
                    output,
                    "{} is outside the {}x{} board",
                    location,
                    game.width(),
                    game.height()
                )?;
                continue;
            }
            Command::Reveal(location) => game.reveal(location).has_update(),
            Command::Flag(location) => game.toggle_flag(location).has_update(),
            Command::Chord(location) => game.reveal_safe_neighbours(location).has_update(),
        };

        if !changed {
            writeln!(output, "Nothing changed")?;
            continue;
        }
        writeln!(output, "{}", render(game))?;
        if let Some(message) = announcer.take_message() {
            writeln!(output, "{message}")?;
        }
        if game.is_finished() {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bombbroom_core::Minefield;
    use std::rc::Rc;

    fn game(mines: &[Location]) -> GameEngine {
        GameEngine::from_minefield(Minefield::from_mine_locations(3, 3, mines).unwrap())
    }

    fn play(game: &mut GameEngine, script: &str) -> String {
        let announcer = Rc::new(Announcer::default());
        game.add_observer(&announcer);
        let mut output = Vec::new();
        run(game, &announcer, script.as_bytes(), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn parses_commands() {
        assert_eq!(
            "r 1 2".parse::<Command>().unwrap(),
            Command::Reveal(Location::new(1, 2))
        );
        assert_eq!(
            " flag 0 4 ".parse::<Command>().unwrap(),
            Command::Flag(Location::new(0, 4))
        );
        assert_eq!(
            "c 3 3".parse::<Command>().unwrap(),
            Command::Chord(Location::new(3, 3))
        );
        assert_eq!("q".parse::<Command>().unwrap(), Command::Quit);
        assert_eq!("?".parse::<Command>().unwrap(), Command::Help);
    }

    #[test]
    fn rejects_malformed_commands() {
        assert!("".parse::<Command>().is_err());
        assert!("r 1".parse::<Command>().is_err());
        assert!("r one 2".parse::<Command>().is_err());
        assert!("dig 1 2".parse::<Command>().is_err());
    }

    #[test]
    fn renders_revealed_numbers_and_flags() {
        let mut game = game(&[Location::new(2, 2)]);
        game.reveal(Location::new(1, 1));
        game.toggle_flag(Location::new(2, 2));

        let board = render(&game);
        let rows: Vec<&str> = board.lines().collect();

        assert_eq!(rows[0], "mines left: 0  state: Running");
        assert_eq!(rows[2], "  0   .  .  .");
        assert_eq!(rows[3], "  1   .  1  .");
        assert_eq!(rows[4], "  2   .  .  F");
    }

    #[test]
    fn session_plays_until_won() {
        let mut game = game(&[Location::new(2, 2)]);

        let output = play(&mut game, "r 0 0\nr 5 5\n");

        assert_eq!(game.state(), GameState::Won);
        assert!(output.contains("Board cleared!"), "{output}");
        assert!(!output.contains("outside"), "{output}");
    }

    #[test]
    fn session_rejects_out_of_board_moves() {
        let mut game = game(&[Location::new(2, 2)]);

        let output = play(&mut game, "r 5 5\nq\n");

        assert!(output.contains("(5, 5) is outside the 3x3 board"), "{output}");
        assert_eq!(game.state(), GameState::Initialized);
    }

    #[test]
    fn session_skips_redraw_when_nothing_changed() {
        let mut game = game(&[Location::new(0, 0), Location::new(2, 2)]);

        let output = play(&mut game, "r 1 0
r 1 0
c 1 0
q
");

        assert_eq!(output.matches("Nothing changed").count(), 2, "{output}");
        assert_eq!(output.matches("mines left:").count(), 2, "{output}");
        assert_eq!(game.revealed_count(), 1);
    }

    #[test]
    fn lost_board_shows_remaining_mines() {
        let mut game = game(&[Location::new(0, 0), Location::new(2, 2)]);

        let output = play(&mut game, "r 2 2\n");

        assert_eq!(game.state(), GameState::Lost);
        assert!(output.contains("Boom."), "{output}");
        let board = render(&game);
        assert_eq!(board.lines().nth(2), Some("  0   *  .  ."));
        assert_eq!(board.lines().nth(4), Some("  2   .  .  X"));
    }
}
