use bombbroom_core::{GameEngine, GameObserver, GameState, Location, Tile, TileStatus};
use serde::Serialize;
use std::cell::RefCell;
use std::io::Write;

/// Engine notification in a form that can be written out as JSON.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub(crate) enum GameEvent {
    TileChanged {
        location: Location,
        status: TileStatus,
        #[serde(skip_serializing_if = "Option::is_none")]
        bombs_near: Option<u8>,
    },
    GameWon,
    GameLost,
}

/// Writes one JSON object per engine notification.
pub(crate) struct EventLog<W: Write> {
    out: RefCell<W>,
}

impl<W: Write> EventLog<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: RefCell::new(out),
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    fn write(&self, event: &GameEvent) {
        let mut out = self.out.borrow_mut();
        let written = serde_json::to_writer(&mut *out, event)
            .map_err(std::io::Error::from)
            .and_then(|()| writeln!(out));
        if let Err(err) = written {
            log::warn!("Could not write event {:?}: {}", event, err);
        }
    }
}

impl<W: Write> GameObserver for EventLog<W> {
    fn tile_status_changed(&self, game: &GameEngine, tile: Tile, location: Location) {
        let bombs_near = (tile.status() == TileStatus::Revealed).then(|| game.bombs_near(location));
        self.write(&GameEvent::TileChanged {
            location,
            status: tile.status(),
            bombs_near,
        });
    }

    fn game_won(&self, _game: &GameEngine) {
        self.write(&GameEvent::GameWon);
    }

    fn game_lost(&self, _game: &GameEngine) {
        self.write(&GameEvent::GameLost);
    }
}

/// Keeps the end-of-game message until the session prints it.
#[derive(Default)]
pub(crate) struct Announcer {
    message: RefCell<Option<String>>,
}

impl Announcer {
    pub fn take_message(&self) -> Option<String> {
        self.message.take()
    }

    fn announce(&self, game: &GameEngine) {
        let message = match game.state() {
            GameState::Won => format!(
                "Board cleared! {} tiles revealed, {} mines avoided.",
                game.revealed_count(),
                game.mine_count()
            ),
            GameState::Lost => format!(
                "Boom. {} of {} empty tiles were revealed.",
                game.revealed_count(),
                game.config().safe_tiles()
            ),
            GameState::Initialized | GameState::Running => return,
        };
        self.message.replace(Some(message));
    }
}

impl GameObserver for Announcer {
    fn game_won(&self, game: &GameEngine) {
        self.announce(game);
    }

    fn game_lost(&self, game: &GameEngine) {
        self.announce(game);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bombbroom_core::Minefield;
    use std::rc::Rc;

    fn game() -> GameEngine {
        let minefield = Minefield::from_mine_locations(3, 1, &[Location::new(2, 0)]).unwrap();
        GameEngine::from_minefield(minefield)
    }

    #[test]
    fn event_log_writes_json_lines() {
        let mut game = game();
        let log = Rc::new(EventLog::new(Vec::new()));
        game.add_observer(&log);

        game.reveal(Location::new(0, 0));
        drop(game);

        let log = Rc::try_unwrap(log).ok().unwrap();
        let text = String::from_utf8(log.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                r#"{"event":"tile-changed","location":{"x":0,"y":0},"status":"Revealed","bombs_near":0}"#,
                r#"{"event":"tile-changed","location":{"x":1,"y":0},"status":"Revealed","bombs_near":1}"#,
                r#"{"event":"game-won"}"#,
            ]
        );
    }

    #[test]
    fn flag_events_omit_bomb_count() {
        let event = GameEvent::TileChanged {
            location: Location::new(1, 2),
            status: TileStatus::Flagged,
            bombs_near: None,
        };

        assert_eq!(
            serde_json::to_string(&event).unwrap(),
            r#"{"event":"tile-changed","location":{"x":1,"y":2},"status":"Flagged"}"#
        );
    }

    #[test]
    fn announcer_reports_loss() {
        let mut game = game();
        let announcer = Rc::new(Announcer::default());
        game.add_observer(&announcer);

        game.toggle_flag(Location::new(0, 0));
        assert_eq!(announcer.take_message(), None);

        game.reveal(Location::new(2, 0));
        let message = announcer.take_message().unwrap();
        assert!(message.starts_with("Boom."), "{message}");
    }
}
