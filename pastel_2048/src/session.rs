//! A single player's game: board, score, best score, undo history and the
//! terminal flags a front-end renders.

use log::{debug, info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    history::{History, Snapshot},
    input::Command,
    store::BestScoreStore,
    Direction, Grid, SIZE,
};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The board changed and a tile was spawned.
    Moved {
        score_gained: u32,
        /// First time a winning tile appeared this game.
        won_now: bool,
    },
    /// Nothing could slide that way; no tile spawned, no history recorded.
    Blocked,
    /// The game is already lost.
    GameOver,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UndoOutcome {
    Restored,
    NothingToUndo,
}

/// Everything a front-end needs to draw the game after a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub grid: [[u32; SIZE]; SIZE],
    pub score: u32,
    pub best_score: u32,
    pub game_over: bool,
    pub won: bool,
    pub show_win: bool,
    pub can_undo: bool,
}

pub struct GameSession<R, S> {
    grid: Grid,
    score: u32,
    best_score: u32,
    history: History,
    game_over: bool,
    won: bool,
    keep_playing: bool,
    rng: R,
    store: S,
}

impl<R: Rng, S: BestScoreStore> GameSession<R, S> {
    /// Start a fresh game, reading the best score from `store`.
    pub fn new(mut rng: R, store: S) -> Self {
        let grid = Grid::new_game(&mut rng);
        Self::with_grid(grid, rng, store)
    }

    /// Start from a given board with a score of zero.
    pub fn with_grid(grid: Grid, rng: R, store: S) -> Self {
        let best_score = store.load().unwrap_or_else(|e| {
            warn!("could not load best score: {e}");
            0
        });

        let mut s = Self {
            grid,
            score: 0,
            best_score,
            history: History::new(),
            game_over: false,
            won: false,
            keep_playing: false,
            rng,
            store,
        };
        s.refresh_flags();
        s
    }

    /// Throw away the current game. The best score is kept.
    pub fn new_game(&mut self) {
        info!("new game (best score {})", self.best_score);
        self.grid = Grid::new_game(&mut self.rng);
        self.score = 0;
        self.history.clear();
        self.game_over = false;
        self.won = false;
        self.keep_playing = false;
    }

    pub fn play(&mut self, direction: Direction) -> MoveOutcome {
        if self.game_over {
            return MoveOutcome::GameOver;
        }

        let result = self.grid.shift(direction);
        if !result.changed {
            debug!("{direction:?} is blocked");
            return MoveOutcome::Blocked;
        }

        self.history.push(Snapshot {
            grid: self.grid,
            score: self.score,
        });
        self.grid = result.grid.with_random_tile(&mut self.rng);
        self.score = self.score.saturating_add(result.score_gained);
        self.record_best();

        let won_before = self.won;
        self.refresh_flags();
        let won_now = self.won && !won_before;
        if won_now {
            info!("reached {} with score {}", crate::WIN_VALUE, self.score);
        }
        if self.game_over {
            info!("game over with score {}", self.score);
        }

        MoveOutcome::Moved {
            score_gained: result.score_gained,
            won_now,
        }
    }

    /// Step back one accepted move. Revives a lost game but leaves the win
    /// latch alone.
    pub fn undo(&mut self) -> UndoOutcome {
        match self.history.pop() {
            Some(snapshot) => {
                self.grid = snapshot.grid;
                self.score = snapshot.score;
                self.game_over = false;
                UndoOutcome::Restored
            }
            None => UndoOutcome::NothingToUndo,
        }
    }

    /// Dismiss the win celebration for the rest of this game.
    pub fn keep_playing(&mut self) {
        self.keep_playing = true;
    }

    /// Apply a mapped input command. Returns true if anything a front-end
    /// draws may have changed.
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::Move(d) => matches!(self.play(d), MoveOutcome::Moved { .. }),
            Command::Undo => self.undo() == UndoOutcome::Restored,
            Command::NewGame => {
                self.new_game();
                true
            }
            Command::KeepPlaying => {
                let was_showing = self.show_win();
                self.keep_playing();
                was_showing
            }
        }
    }

    fn record_best(&mut self) {
        if self.score <= self.best_score {
            return;
        }
        self.best_score = self.score;
        if let Err(e) = self.store.save(self.best_score) {
            warn!("could not save best score {}: {e}", self.best_score);
        }
    }

    fn refresh_flags(&mut self) {
        self.won |= self.grid.has_won();
        self.game_over = self.grid.is_game_over();
    }
}

impl<R, S> GameSession<R, S> {
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn has_won(&self) -> bool {
        self.won
    }

    /// Whether a front-end should be showing the win celebration.
    pub fn show_win(&self) -> bool {
        self.won && !self.keep_playing && !self.game_over
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn frame(&self) -> Frame {
        Frame {
            grid: self.grid.values(),
            score: self.score,
            best_score: self.best_score,
            game_over: self.game_over,
            won: self.won,
            show_win: self.show_win(),
            can_undo: self.can_undo(),
        }
    }
}

#[cfg(test)]
mod test {
    use rand::{rngs::StdRng, SeedableRng};

    use super::{GameSession, MoveOutcome, UndoOutcome};
    use crate::{
        history::HISTORY_LIMIT,
        spawn::ConstRng,
        store::{BestScoreStore, MemoryStore, StoreError},
        Direction, Grid,
    };

    fn session(values: [[u32; 4]; 4]) -> GameSession<StdRng, MemoryStore> {
        GameSession::with_grid(
            Grid::from_values(values).unwrap(),
            StdRng::seed_from_u64(3),
            MemoryStore::default(),
        )
    }

    struct BrokenStore;

    impl BestScoreStore for BrokenStore {
        fn load(&self) -> Result<u32, StoreError> {
            Err(StoreError::Unavailable("no disk".into()))
        }

        fn save(&mut self, _best: u32) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("no disk".into()))
        }
    }

    #[test]
    fn new_session_starts_with_two_tiles() {
        let s = GameSession::new(StdRng::seed_from_u64(1), MemoryStore::new(500));
        assert_eq!(s.grid().empty_count(), 14);
        assert_eq!(s.score(), 0);
        assert_eq!(s.best_score(), 500);
        assert!(!s.can_undo());
        assert!(!s.is_game_over());
    }

    #[test]
    fn accepted_move_spawns_and_records() {
        let mut s = session([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let outcome = s.play(Direction::Left);
        assert_eq!(
            outcome,
            MoveOutcome::Moved {
                score_gained: 4,
                won_now: false
            }
        );
        assert_eq!(s.score(), 4);
        assert_eq!(s.grid().values()[0][0], 4);
        // the merged 4 plus one spawned tile
        assert_eq!(s.grid().empty_count(), 14);
        assert_eq!(s.history_len(), 1);
    }

    #[test]
    fn blocked_move_is_a_no_op() {
        let mut s = session([[2, 4, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let before = *s.grid();
        assert_eq!(s.play(Direction::Left), MoveOutcome::Blocked);
        assert_eq!(s.play(Direction::Up), MoveOutcome::Blocked);
        assert_eq!(*s.grid(), before);
        assert_eq!(s.history_len(), 0);
        assert_eq!(s.score(), 0);
    }

    #[test]
    fn undo_restores_grid_and_score() {
        let mut s = session([[2, 2, 0, 0], [4, 4, 0, 0], [0; 4], [0; 4]]);
        let start = *s.grid();
        s.play(Direction::Left);
        assert_eq!(s.score(), 12);

        assert_eq!(s.undo(), UndoOutcome::Restored);
        assert_eq!(*s.grid(), start);
        assert_eq!(s.score(), 0);
        assert_eq!(s.undo(), UndoOutcome::NothingToUndo);
        assert_eq!(*s.grid(), start);
    }

    #[test]
    fn history_is_bounded() {
        let mut s = GameSession::new(StdRng::seed_from_u64(11), MemoryStore::default());
        let mut accepted = 0;
        'outer: while accepted < 25 {
            for d in Direction::ALL {
                if let MoveOutcome::Moved { .. } = s.play(d) {
                    accepted += 1;
                    continue 'outer;
                }
            }
            s.new_game();
            accepted = 0;
        }
        assert_eq!(s.history_len(), HISTORY_LIMIT);

        for _ in 0..HISTORY_LIMIT {
            assert_eq!(s.undo(), UndoOutcome::Restored);
        }
        assert_eq!(s.undo(), UndoOutcome::NothingToUndo);
        assert!(!s.can_undo());
    }

    #[test]
    fn undo_revives_a_lost_game() {
        // a zero word always spawns a 2, here into the gap at (3, 0)
        let mut s = GameSession::with_grid(
            Grid::from_values([[4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 8], [16, 4, 4, 2]]).unwrap(),
            ConstRng(0),
            MemoryStore::default(),
        );
        assert!(!s.is_game_over());

        assert_eq!(
            s.play(Direction::Right),
            MoveOutcome::Moved {
                score_gained: 8,
                won_now: false
            }
        );
        // | 4  | 2  | 4 | 2 |
        // | 2  | 4  | 2 | 4 |
        // | 4  | 2  | 4 | 8 |
        // | 2  | 16 | 8 | 2 |
        assert_eq!(s.grid().values()[3], [2, 16, 8, 2]);
        assert!(s.is_game_over());
        assert!(s.frame().game_over);

        for d in Direction::ALL {
            assert_eq!(s.play(d), MoveOutcome::GameOver);
        }
        assert_eq!(s.history_len(), 1);

        assert_eq!(s.undo(), UndoOutcome::Restored);
        assert!(!s.is_game_over());
        assert_eq!(s.score(), 0);
        assert_eq!(s.grid().values()[3], [16, 4, 4, 2]);
        assert!(matches!(s.play(Direction::Left), MoveOutcome::Moved { .. }));
    }

    #[test]
    fn lost_game_stays_lost_until_undo() {
        let lost = Grid::from_values([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]).unwrap();
        let mut s = GameSession::with_grid(lost, StdRng::seed_from_u64(0), MemoryStore::default());
        assert!(s.is_game_over());
        for d in Direction::ALL {
            assert_eq!(s.play(d), MoveOutcome::GameOver);
        }
        assert_eq!(s.undo(), UndoOutcome::NothingToUndo);
        assert!(s.is_game_over());
    }

    #[test]
    fn win_is_latched_once() {
        let mut s = session([[1024, 1024, 0, 0], [0; 4], [0; 4], [0; 4]]);
        assert_eq!(
            s.play(Direction::Left),
            MoveOutcome::Moved {
                score_gained: 2048,
                won_now: true
            }
        );
        assert!(s.has_won());
        assert!(s.show_win());

        s.keep_playing();
        assert!(!s.show_win());
        assert!(s.has_won());

        let next = [Direction::Right, Direction::Down, Direction::Left, Direction::Up]
            .into_iter()
            .map(|d| s.play(d))
            .find(|o| matches!(o, MoveOutcome::Moved { .. }))
            .unwrap();
        assert!(matches!(next, MoveOutcome::Moved { won_now: false, .. }));
        assert!(!s.show_win());

        // undo does not clear the latch
        s.undo();
        s.undo();
        assert!(s.has_won());

        s.new_game();
        assert!(!s.has_won());
    }

    #[test]
    fn best_score_tracks_and_persists() {
        let mut s = GameSession::with_grid(
            Grid::from_values([[2, 2, 0, 0], [8, 8, 0, 0], [0; 4], [0; 4]]).unwrap(),
            StdRng::seed_from_u64(4),
            MemoryStore::new(10),
        );
        assert_eq!(s.best_score(), 10);
        s.play(Direction::Left);
        assert_eq!(s.score(), 20);
        assert_eq!(s.best_score(), 20);
        assert_eq!(s.store().saves(), 1);

        // undo lowers the score but not the best
        s.undo();
        assert_eq!(s.score(), 0);
        assert_eq!(s.best_score(), 20);

        s.new_game();
        assert_eq!(s.best_score(), 20);
        assert_eq!(s.store().saves(), 1);
    }

    #[test]
    fn store_failures_are_not_fatal() {
        let mut s = GameSession::with_grid(
            Grid::from_values([[4, 4, 0, 0], [0; 4], [0; 4], [0; 4]]).unwrap(),
            StdRng::seed_from_u64(4),
            BrokenStore,
        );
        assert_eq!(s.best_score(), 0);
        s.play(Direction::Left);
        assert_eq!(s.best_score(), 8);
    }

    #[test]
    fn commands() {
        use crate::input::Command;

        let mut s = session([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        assert!(!s.apply(Command::Move(Direction::Up)));
        assert!(s.apply(Command::Move(Direction::Left)));
        assert!(s.apply(Command::Undo));
        assert!(!s.apply(Command::Undo));
        assert!(!s.apply(Command::KeepPlaying));
        assert!(s.apply(Command::NewGame));
        assert_eq!(s.grid().empty_count(), 14);
    }

    #[test]
    fn frame_reflects_state() {
        let mut s = session([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        s.play(Direction::Left);
        let f = s.frame();
        assert_eq!(f.grid, s.grid().values());
        assert_eq!(f.score, 4);
        assert_eq!(f.best_score, 4);
        assert!(f.can_undo);
        assert!(!f.game_over);
        assert!(!f.won);
    }
}
