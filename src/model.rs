//! Core data models for the reaction grid.
//! Board, session counters and the reducer that owns every mutation of them.

use serde::{Deserialize, Serialize};
use std::rc::Rc;
use yew::Reducible;

use crate::config::{GameConfig, MAX_LEVEL, MIN_LEVEL};
use crate::util::format_clock;

// ---------------- Difficulty -----------------

/// Lifetime of a freshly spawned block; 5000ms at level 1 down to 1000ms at level 5.
pub fn block_lifetime_ms(level: u8) -> u32 {
    (6 - level as i32).max(1) as u32 * 1000
}

/// Spawns per five-second window, capped at 10.
pub fn spawn_rate_per_five_sec(level: u8) -> u32 {
    (level as u32 * 2).min(10)
}

pub fn spawn_interval_ms(level: u8) -> u32 {
    (5000 / spawn_rate_per_five_sec(level).max(1)).max(500)
}

// ---------------- Board -----------------

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Row-major index.
    pub id: usize,
    pub row: u32,
    pub col: u32,
    pub active: bool,
    /// Remaining lifetime; meaningful only while `active`, otherwise 0.
    pub time_left_ms: u32,
    /// Mid removal transition: exempt from decay and further clicks.
    pub animating: bool,
}

impl Cell {
    fn new(id: usize, cols: u32) -> Self {
        Self {
            id,
            row: id as u32 / cols,
            col: id as u32 % cols,
            active: false,
            time_left_ms: 0,
            animating: false,
        }
    }

    pub fn is_clickable(&self) -> bool {
        self.active && !self.animating
    }

    fn deactivate(&mut self) {
        self.active = false;
        self.animating = false;
        self.time_left_ms = 0;
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub rows: u32,
    pub cols: u32,
    /// Row-major cells; length = rows * cols.
    pub cells: Vec<Cell>,
}

impl Board {
    pub fn new(rows: u32, cols: u32) -> Self {
        let cells = (0..(rows * cols) as usize).map(|id| Cell::new(id, cols)).collect();
        Self { rows, cols, cells }
    }

    pub fn cell(&self, id: usize) -> Option<&Cell> {
        self.cells.get(id)
    }

    pub fn inactive_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.active).count()
    }

    #[cfg(test)]
    pub fn active_count(&self) -> usize {
        self.cells.len() - self.inactive_count()
    }

    fn nth_inactive_mut(&mut self, nth: usize) -> Option<&mut Cell> {
        self.cells.iter_mut().filter(|c| !c.active).nth(nth)
    }
}

// ---------------- Session -----------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Idle,
    Running,
    Stopped,
    /// Clock reached zero.
    Ended,
}

/// Final figures surfaced when a round ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub score: u32,
    pub total_spawned: u32,
    pub hit_rate: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub config: GameConfig,
    pub board: Board,
    /// Difficulty 1..=5.
    pub level: u8,
    pub score: u32,
    pub total_spawned: u32,
    pub time_left_secs: u32,
    pub phase: Phase,
    /// Bumped on every start; deferred completions from older rounds are ignored.
    pub round: u64,
    /// Last value computed by the layout sizer.
    pub cell_px: u32,
}

impl GameState {
    pub fn new(config: GameConfig, level: u8) -> Self {
        Self {
            config,
            board: Board::new(config.rows, config.cols),
            level: level.clamp(MIN_LEVEL, MAX_LEVEL),
            score: 0,
            total_spawned: 0,
            time_left_secs: config.round_secs,
            phase: Phase::Idle,
            round: 0,
            cell_px: config.max_cell_px,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Running round and a cell that is active and not already leaving.
    pub fn accepts_click(&self, cell: usize) -> bool {
        self.is_running() && self.board.cell(cell).is_some_and(Cell::is_clickable)
    }

    pub fn hit_rate(&self) -> u32 {
        if self.total_spawned == 0 {
            return 0;
        }
        (self.score as f64 / self.total_spawned as f64 * 100.0).round() as u32
    }

    pub fn formatted_time(&self) -> String {
        format_clock(self.time_left_secs)
    }

    pub fn summary(&self) -> RoundSummary {
        RoundSummary {
            score: self.score,
            total_spawned: self.total_spawned,
            hit_rate: self.hit_rate(),
        }
    }

    fn clear_round(&mut self) {
        self.board = Board::new(self.config.rows, self.config.cols);
        self.score = 0;
        self.total_spawned = 0;
        self.time_left_secs = self.config.round_secs;
    }
}

// ---------------- Reducer & Actions -----------------
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameAction {
    Start,
    Stop,
    Reset,
    SetLevel(u8),
    /// Activate the `nth` currently inactive cell (the caller draws `nth` uniformly).
    Spawn { nth: usize },
    Decay,
    Click { cell: usize },
    /// Removal animation finished for `cell`, clicked during `round`.
    Settle { cell: usize, round: u64 },
    ClockTick,
    Relayout { cell_px: u32 },
}

impl Reducible for GameState {
    type Action = GameAction;

    /// Returns `self` untouched (same `Rc`) when the action is a no-op.
    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        use GameAction::*;
        let mut new = (*self).clone();
        match action {
            Start => {
                new.clear_round();
                new.phase = Phase::Running;
                new.round = new.round.wrapping_add(1);
            }
            Stop => {
                if !self.is_running() { return self; }
                new.phase = Phase::Stopped;
            }
            Reset => {
                new.clear_round();
                new.phase = Phase::Idle;
            }
            SetLevel(level) => {
                let level = level.clamp(MIN_LEVEL, MAX_LEVEL);
                if level == self.level { return self; }
                new.level = level;
            }
            Spawn { nth } => {
                if !self.is_running() { return self; }
                let lifetime = block_lifetime_ms(new.level);
                let Some(cell) = new.board.nth_inactive_mut(nth) else { return self; };
                cell.active = true;
                cell.time_left_ms = lifetime;
                new.total_spawned = new.total_spawned.saturating_add(1);
            }
            Decay => {
                if !self.is_running() || !self.board.cells.iter().any(Cell::is_clickable) { return self; }
                let step = new.config.decay_tick_ms;
                for cell in new.board.cells.iter_mut().filter(|c| c.is_clickable()) {
                    cell.time_left_ms = cell.time_left_ms.saturating_sub(step);
                    if cell.time_left_ms == 0 {
                        cell.deactivate();
                    }
                }
            }
            Click { cell } => {
                if !self.accepts_click(cell) { return self; }
                new.board.cells[cell].animating = true;
                new.score = new.score.saturating_add(1);
            }
            Settle { cell, round } => {
                let animating = self.board.cell(cell).is_some_and(|c| c.animating);
                if round != self.round || !animating { return self; }
                new.board.cells[cell].deactivate();
            }
            ClockTick => {
                if !self.is_running() { return self; }
                new.time_left_secs = new.time_left_secs.saturating_sub(1);
                if new.time_left_secs == 0 {
                    new.phase = Phase::Ended;
                }
            }
            Relayout { cell_px } => {
                if cell_px == self.cell_px { return self; }
                new.cell_px = cell_px;
            }
        }
        Rc::new(new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(level: u8) -> Rc<GameState> {
        Rc::new(GameState::new(GameConfig::default(), level)).reduce(GameAction::Start)
    }

    /// Activates exactly `cell` on a fresh board.
    fn spawn_at(state: Rc<GameState>, cell: usize) -> Rc<GameState> {
        let nth = state.board.cells[..cell].iter().filter(|c| !c.active).count();
        state.reduce(GameAction::Spawn { nth })
    }

    fn assert_no_stale_lifetimes(state: &GameState) {
        for c in &state.board.cells {
            assert!(c.active || c.time_left_ms == 0, "inactive cell {} kept time_left {}", c.id, c.time_left_ms);
        }
    }

    #[test]
    fn lifetime_decreases_and_interval_is_bounded() {
        for level in MIN_LEVEL..MAX_LEVEL {
            assert!(block_lifetime_ms(level) > block_lifetime_ms(level + 1));
        }
        for level in MIN_LEVEL..=MAX_LEVEL {
            assert!(spawn_interval_ms(level) >= 500);
        }
        assert_eq!(block_lifetime_ms(1), 5000);
        assert_eq!(spawn_interval_ms(1), 2500);
        assert_eq!(spawn_interval_ms(3), 833);
    }

    #[test]
    fn top_level_difficulty() {
        assert_eq!(block_lifetime_ms(5), 1000);
        assert_eq!(spawn_rate_per_five_sec(5), 10);
        assert_eq!(spawn_interval_ms(5), 500);
    }

    #[test]
    fn board_is_row_major() {
        let board = Board::new(6, 12);
        assert_eq!(board.cells.len(), 72);
        let c = &board.cells[13];
        assert_eq!((c.row, c.col), (1, 1));
        assert_eq!(board.inactive_count(), 72);
    }

    #[test]
    fn spawn_sets_lifetime_and_counts() {
        let s = spawn_at(running(1), 5);
        let c = &s.board.cells[5];
        assert!(c.active);
        assert_eq!(c.time_left_ms, 5000);
        assert_eq!(s.total_spawned, 1);
        assert_eq!(s.board.active_count(), 1);
    }

    #[test]
    fn spawn_on_full_board_is_noop() {
        let mut s = running(1);
        for _ in 0..72 {
            s = s.reduce(GameAction::Spawn { nth: 0 });
        }
        assert_eq!(s.board.inactive_count(), 0);
        let before = s.clone();
        let after = s.reduce(GameAction::Spawn { nth: 0 });
        assert!(Rc::ptr_eq(&before, &after));
        assert_eq!(after.total_spawned, 72);
    }

    #[test]
    fn unclicked_block_expires_silently() {
        let mut s = spawn_at(running(1), 5);
        for _ in 0..49 {
            s = s.reduce(GameAction::Decay);
        }
        assert!(s.board.cells[5].active);
        assert_eq!(s.board.cells[5].time_left_ms, 100);
        s = s.reduce(GameAction::Decay);
        let c = &s.board.cells[5];
        assert!(!c.active);
        assert_eq!(c.time_left_ms, 0);
        assert_eq!(s.total_spawned, 1);
        assert_eq!(s.score, 0);
        assert_no_stale_lifetimes(&s);
    }

    #[test]
    fn click_scores_now_and_settles_later() {
        let s = spawn_at(running(1), 5);
        let round = s.round;
        let s = s.reduce(GameAction::Click { cell: 5 });
        assert_eq!(s.score, 1);
        assert!(s.board.cells[5].active);
        assert!(s.board.cells[5].animating);

        // animating cells neither decay nor take a second click
        let s = s.reduce(GameAction::Decay).reduce(GameAction::Click { cell: 5 });
        assert_eq!(s.score, 1);
        assert_eq!(s.board.cells[5].time_left_ms, 5000);

        let s = s.reduce(GameAction::Settle { cell: 5, round });
        let c = &s.board.cells[5];
        assert!(!c.active && !c.animating);
        assert_eq!(c.time_left_ms, 0);
    }

    #[test]
    fn clicks_ignored_unless_running_and_active() {
        let s = running(1).reduce(GameAction::Click { cell: 3 });
        assert_eq!(s.score, 0);
        let s = spawn_at(s, 3).reduce(GameAction::Stop).reduce(GameAction::Click { cell: 3 });
        assert_eq!(s.score, 0);
        let s = s.reduce(GameAction::Click { cell: 999 });
        assert_eq!(s.score, 0);
    }

    #[test]
    fn settle_from_older_round_is_ignored() {
        let s = spawn_at(running(1), 2).reduce(GameAction::Click { cell: 2 });
        let old_round = s.round;
        let s = spawn_at(s.reduce(GameAction::Start), 2).reduce(GameAction::Click { cell: 2 });
        let s = s.reduce(GameAction::Settle { cell: 2, round: old_round });
        assert!(s.board.cells[2].animating);
    }

    #[test]
    fn hit_rate_rounds_percentage() {
        let mut s = GameState::new(GameConfig::default(), 1);
        assert_eq!(s.hit_rate(), 0);
        s.total_spawned = 20;
        s.score = 15;
        assert_eq!(s.hit_rate(), 75);
        s.total_spawned = 3;
        s.score = 2;
        assert_eq!(s.hit_rate(), 67);
    }

    #[test]
    fn clock_ends_round_at_zero() {
        let mut s = running(2);
        for _ in 0..59 {
            s = s.reduce(GameAction::ClockTick);
        }
        assert_eq!(s.formatted_time(), "0:01");
        assert!(s.is_running());
        s = s.reduce(GameAction::ClockTick);
        assert_eq!(s.phase, Phase::Ended);
        assert_eq!(s.time_left_secs, 0);
        let frozen = s.clone();
        assert!(Rc::ptr_eq(&frozen, &s.reduce(GameAction::ClockTick)));
    }

    #[test]
    fn reset_is_idempotent() {
        let s = spawn_at(running(3), 7).reduce(GameAction::Click { cell: 7 });
        let once = s.reduce(GameAction::Reset);
        let twice = once.clone().reduce(GameAction::Reset);
        assert_eq!(*once, *twice);
        assert_eq!(once.phase, Phase::Idle);
        assert_eq!(once.score, 0);
        assert_eq!(once.total_spawned, 0);
        assert_eq!(once.board.active_count(), 0);
    }

    #[test]
    fn stop_freezes_board() {
        let s = spawn_at(running(1), 0).reduce(GameAction::Stop);
        assert_eq!(s.phase, Phase::Stopped);
        let s = s.reduce(GameAction::Decay).reduce(GameAction::Spawn { nth: 0 });
        assert_eq!(s.board.cells[0].time_left_ms, 5000);
        assert_eq!(s.total_spawned, 1);
    }

    #[test]
    fn set_level_clamps() {
        let s = Rc::new(GameState::new(GameConfig::default(), 1));
        assert_eq!(s.clone().reduce(GameAction::SetLevel(0)).level, 1);
        assert_eq!(s.reduce(GameAction::SetLevel(42)).level, 5);
    }
}
