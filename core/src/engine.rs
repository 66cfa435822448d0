use ndarray::Array2;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::rc::{Rc, Weak};

use crate::observer::ObserverRegistry;
use crate::*;

/// Valid transitions:
/// - Initialized -> Running, on the first move
/// - Running -> Won
/// - Running -> Lost
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    /// No move made yet, the minefield may not exist
    Initialized,
    /// Game started
    Running,
    /// Every empty tile was revealed
    Won,
    /// A mine was revealed
    Lost,
}

impl GameState {
    pub const fn is_initial(self) -> bool {
        matches!(self, Self::Initialized)
    }

    /// The game has ended and no moves are accepted anymore
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::Initialized
    }
}

/// Whether mines have been placed yet.
///
/// Before generation the minefield is an all-empty placeholder, so queries see empty unknown tiles.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Layout {
    Pending,
    Generated,
}

/// Game state machine over a rectangular board.
///
/// Locations passed to queries and moves must lie on the board, anything else panics. Use [`GameEngine::contains`]
/// to check input from the outside first.
#[derive(Debug)]
pub struct GameEngine {
    config: GameConfig,
    seed: u64,
    safe_radius: Dimension,
    layout: Layout,
    minefield: Minefield,
    statuses: Array2<TileStatus>,
    revealed_count: CellCount,
    flag_count: CellCount,
    state: GameState,
    observers: ObserverRegistry,
}

impl GameEngine {
    /// New game with mines placed randomly on the first move.
    pub fn new(width: Dimension, height: Dimension, mines: CellCount) -> Result<Self> {
        let config = GameConfig::new(width, height, mines)?;
        Ok(Self::with_seed(config, rand::random()))
    }

    /// New game whose mine placement is fully determined by `seed` and the first move.
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        let placeholder = Minefield::from_contents(Array2::from_elem(
            (usize::from(config.height()), usize::from(config.width())),
            TileContent::Empty,
        ));
        Self::build(config, seed, Layout::Pending, placeholder)
    }

    /// New game over a fixed layout, no generation happens on the first move.
    pub fn from_minefield(minefield: Minefield) -> Self {
        Self::build(minefield.game_config(), 0, Layout::Generated, minefield)
    }

    fn build(config: GameConfig, seed: u64, layout: Layout, minefield: Minefield) -> Self {
        Self {
            config,
            seed,
            safe_radius: DEFAULT_SAFE_RADIUS,
            layout,
            minefield,
            statuses: Array2::default((usize::from(config.height()), usize::from(config.width()))),
            revealed_count: 0,
            flag_count: 0,
            state: Default::default(),
            observers: Default::default(),
        }
    }

    /// How far around the first revealed tile mines are kept away, 0 only protects the tile itself.
    pub fn with_safe_radius(mut self, radius: Dimension) -> Self {
        self.safe_radius = radius;
        self
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn width(&self) -> Dimension {
        self.config.width()
    }

    pub fn height(&self) -> Dimension {
        self.config.height()
    }

    pub fn size(&self) -> (Dimension, Dimension) {
        self.config.size()
    }

    pub fn mine_count(&self) -> CellCount {
        self.config.mines()
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn is_generated(&self) -> bool {
        self.layout == Layout::Generated
    }

    pub fn contains(&self, location: Location) -> bool {
        self.config.contains(location)
    }

    pub fn tile_at(&self, location: Location) -> Tile {
        self.check_bounds(location);
        Tile::new(
            self.minefield[location],
            self.statuses[location.to_nd_index()],
        )
    }

    /// Mines among the up to 8 neighbors, 0 before generation.
    pub fn bombs_near(&self, location: Location) -> u8 {
        self.check_bounds(location);
        self.minefield.adjacent_mine_count(location)
    }

    pub fn flag_count(&self) -> CellCount {
        self.flag_count
    }

    /// Empty tiles revealed so far.
    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    /// How many mines have not been flagged yet, negative when over-flagged
    pub fn mines_left(&self) -> i64 {
        i64::from(self.config.mines()) - i64::from(self.flag_count)
    }

    /// Whether [`GameEngine::reveal_safe_neighbours`] would open tiles at this location.
    pub fn can_chord_at(&self, location: Location) -> bool {
        self.check_bounds(location);
        !self.is_finished()
            && self.is_generated()
            && self.chord_gate_open(location)
            && self
                .minefield
                .neighbors(location)
                .any(|pos| self.status(pos) == TileStatus::Unknown)
    }

    pub fn add_observer<O: GameObserver + 'static>(&mut self, observer: &Rc<O>) -> bool {
        let observer = Rc::downgrade(observer) as Weak<dyn GameObserver>;
        self.observers.add(observer)
    }

    pub fn remove_observer<O: GameObserver + 'static>(&mut self, observer: &Rc<O>) -> bool {
        let observer = Rc::downgrade(observer) as Weak<dyn GameObserver>;
        self.observers.remove(&observer)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Flips a tile between unknown and flagged, revealed tiles are left alone.
    pub fn toggle_flag(&mut self, location: Location) -> MarkOutcome {
        self.check_bounds(location);
        if self.is_finished() {
            return MarkOutcome::NoChange;
        }
        self.begin(None);

        let next = match self.status(location) {
            TileStatus::Unknown => {
                self.flag_count += 1;
                TileStatus::Flagged
            }
            TileStatus::Flagged => {
                self.flag_count -= 1;
                TileStatus::Unknown
            }
            TileStatus::Revealed | TileStatus::Exploded => return MarkOutcome::NoChange,
        };
        self.statuses[location.to_nd_index()] = next;
        log::debug!("Flag toggled at {}: {:?}", location, next);
        self.notify_tile_changed(location);
        MarkOutcome::Changed
    }

    /// Reveals a tile, opening the surrounding region when it has no adjacent mines.
    ///
    /// The first reveal of a game places the mines away from `location`.
    pub fn reveal(&mut self, location: Location) -> RevealOutcome {
        self.check_bounds(location);
        if self.is_finished() {
            return RevealOutcome::NoChange;
        }
        self.begin(Some(location));

        log::debug!("Reveal at {}", location);
        self.flood_reveal(location)
    }

    /// Chords: reveals every unknown neighbor once the number of flagged neighbors matches the number of mines
    /// around `location`.
    ///
    /// Only the flag count is checked, misplaced flags let the chord hit a mine.
    pub fn reveal_safe_neighbours(&mut self, location: Location) -> RevealOutcome {
        self.check_bounds(location);
        if self.is_finished() {
            return RevealOutcome::NoChange;
        }
        self.begin(Some(location));

        if !self.chord_gate_open(location) {
            log::debug!("Chord at {} refused, flags do not match mines", location);
            return RevealOutcome::NoChange;
        }

        let targets: SmallVec<[Location; 8]> = self
            .minefield
            .neighbors(location)
            .filter(|&pos| self.status(pos) == TileStatus::Unknown)
            .collect();
        log::debug!("Chord at {} opens {} tiles", location, targets.len());

        targets
            .into_iter()
            .fold(RevealOutcome::NoChange, |outcome, target| {
                outcome | self.flood_reveal(target)
            })
    }

    /// Depth-first reveal with an explicit stack, visiting neighbors in row-major order.
    ///
    /// A tile already revealed is skipped, so every tile is opened at most once per game.
    fn flood_reveal(&mut self, start: Location) -> RevealOutcome {
        let mut outcome = RevealOutcome::NoChange;
        let mut to_visit = vec![start];

        while let Some(location) = to_visit.pop() {
            if self.is_finished() {
                break;
            }
            if self.status(location) == TileStatus::Revealed {
                continue;
            }
            if self.status(location) == TileStatus::Flagged {
                self.flag_count -= 1;
            }

            if self.minefield.contains_mine(location) {
                self.statuses[location.to_nd_index()] = TileStatus::Exploded;
                log::debug!("Mine hit at {}", location);
                self.notify_tile_changed(location);
                self.finish(GameState::Lost);
                return RevealOutcome::HitMine;
            }

            self.statuses[location.to_nd_index()] = TileStatus::Revealed;
            self.revealed_count += 1;
            log::trace!("Opened tile at {}", location);
            self.notify_tile_changed(location);

            if self.meets_win_condition() {
                self.finish(GameState::Won);
                return RevealOutcome::Won;
            }
            outcome = RevealOutcome::Revealed;

            if self.minefield.adjacent_mine_count(location) == 0 {
                let neighbors: SmallVec<[Location; 8]> = self
                    .minefield
                    .neighbors(location)
                    .filter(|&pos| self.status(pos) != TileStatus::Revealed)
                    .collect();
                // reversed so the first neighbor is popped first
                to_visit.extend(neighbors.into_iter().rev());
            }
        }

        outcome
    }

    /// Every move goes through here: places mines if needed, then starts the game.
    fn begin(&mut self, excluded: Option<Location>) {
        if self.layout == Layout::Pending {
            self.minefield = ShuffleGenerator::new(self.seed, excluded, self.safe_radius)
                .generate(self.config);
            self.layout = Layout::Generated;
        }

        if self.state.is_initial() {
            log::debug!("Game started");
            self.state = GameState::Running;
        }
    }

    fn finish(&mut self, state: GameState) {
        debug_assert!(state.is_finished());
        log::debug!(
            "Game ended: {:?}, revealed {} of {}",
            state,
            self.revealed_count,
            self.minefield.safe_tiles()
        );
        self.state = state;

        for observer in self.observers.live() {
            match state {
                GameState::Won => observer.game_won(self),
                _ => observer.game_lost(self),
            }
        }
    }

    fn meets_win_condition(&self) -> bool {
        self.revealed_count + self.minefield.mine_count() == self.minefield.total_tiles()
    }

    fn chord_gate_open(&self, location: Location) -> bool {
        let (flagged, mines) = self
            .minefield
            .neighbors(location)
            .fold((0u8, 0u8), |(flagged, mines), pos| {
                (
                    flagged + u8::from(self.status(pos) == TileStatus::Flagged),
                    mines + u8::from(self.minefield.contains_mine(pos)),
                )
            });
        flagged == mines
    }

    fn notify_tile_changed(&self, location: Location) {
        let tile = self.tile_at(location);
        for observer in self.observers.live() {
            observer.tile_status_changed(self, tile, location);
        }
    }

    fn status(&self, location: Location) -> TileStatus {
        self.statuses[location.to_nd_index()]
    }

    fn check_bounds(&self, location: Location) {
        assert!(
            self.contains(location),
            "location {} is outside the {}x{} board",
            location,
            self.width(),
            self.height()
        );
    }
}
