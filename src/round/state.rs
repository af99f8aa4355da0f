//! Round state
//!
//! Everything that changes while a round is played: the pool of elements
//! still to find, the current target, counters, timer and cell marks.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{ELEMENT_COUNT, MIN_ARCADE_TIME};
use crate::settings::{ArcadeTiming, Difficulty, DifficultyConfig, Gamemode};

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Nothing started yet
    Idle,
    /// Timer running, clicks accepted
    Running,
    /// Timer stopped, state kept
    Paused,
    /// Countdown ran out
    Ended,
}

/// How the round clock behaves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerMode {
    /// Counts elapsed seconds only
    Stopwatch,
    /// Arcade countdown with bonus/penalty
    Countdown(ArcadeTiming),
}

impl TimerMode {
    /// Countdown only in arcade mode, and never while learning
    pub fn for_selection(gamemode: Gamemode, difficulty: Difficulty, config: &DifficultyConfig) -> Self {
        if gamemode == Gamemode::Arcade && difficulty != Difficulty::Learn {
            TimerMode::Countdown(config.arcade)
        } else {
            TimerMode::Stopwatch
        }
    }

    /// Seconds on the clock at round start
    pub fn initial_remaining(&self) -> Option<i64> {
        match self {
            TimerMode::Stopwatch => None,
            TimerMode::Countdown(t) => Some(t.total_time.max(MIN_ARCADE_TIME) as i64),
        }
    }
}

/// Which marks outlive their 1.5 s flash
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MarkRules {
    pub error_protection: bool,
    pub answer_persist: bool,
}

impl From<&DifficultyConfig> for MarkRules {
    fn from(config: &DifficultyConfig) -> Self {
        Self {
            error_protection: config.error_protection,
            answer_persist: config.answer_persist,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkKind {
    Correct,
    Wrong,
}

/// Highlight on a clicked cell. Marked cells ignore clicks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mark {
    pub kind: MarkKind,
    /// Sticky marks last until restart; others are released by the UI
    pub sticky: bool,
    /// Unique per placed mark, across restarts
    pub serial: u32,
}

/// Outcome of a round input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundEvent {
    /// Target found; `index` left the pool
    Correct { index: usize },
    /// Clicked `index` was not the target
    Wrong { index: usize },
    /// Pool emptied; a fresh round has started
    Won,
    /// Countdown dropped below zero; round ended
    TimedOut,
}

/// Complete round state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    pub phase: RoundPhase,
    /// Indices not yet found this round
    pub(super) pool: Vec<usize>,
    pub(super) target: Option<usize>,
    /// Clicks on unmarked cells
    pub attempts: u32,
    /// Wrong guesses since the last correct one
    pub wrong_streak: u32,
    /// Seconds played
    pub elapsed: u32,
    /// Countdown seconds left (arcade only)
    pub(super) remaining: Option<i64>,
    pub(super) timer: TimerMode,
    pub(super) rules: MarkRules,
    pub(super) marks: BTreeMap<usize, Mark>,
    /// Serial handed to the next mark; never reset
    pub(super) next_mark: u32,
}

impl Round {
    /// An idle round with a full pool
    pub fn new(timer: TimerMode, rules: MarkRules) -> Self {
        Self {
            phase: RoundPhase::Idle,
            pool: full_pool(),
            target: None,
            attempts: 0,
            wrong_streak: 0,
            elapsed: 0,
            remaining: timer.initial_remaining(),
            timer,
            rules,
            marks: BTreeMap::new(),
            next_mark: 0,
        }
    }

    /// Change timing/mark rules; takes effect at the next restart
    pub fn configure(&mut self, timer: TimerMode, rules: MarkRules) {
        self.timer = timer;
        self.rules = rules;
    }

    /// Reset everything and start running with a fresh target
    pub fn restart<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.reset();
        self.phase = RoundPhase::Running;
        self.draw_target(rng);
    }

    /// Reset pool, counters, clock and marks without changing phase
    pub(super) fn reset(&mut self) {
        self.pool = full_pool();
        self.target = None;
        self.attempts = 0;
        self.wrong_streak = 0;
        self.elapsed = 0;
        self.remaining = self.timer.initial_remaining();
        self.marks.clear();
    }

    /// Pick a uniformly random target from the pool
    pub(super) fn draw_target<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.target = if self.pool.is_empty() {
            None
        } else {
            Some(self.pool[rng.random_range(0..self.pool.len())])
        };
    }

    pub(super) fn place_mark(&mut self, index: usize, kind: MarkKind, sticky: bool) {
        let serial = self.next_mark;
        self.next_mark = self.next_mark.wrapping_add(1);
        self.marks.insert(index, Mark { kind, sticky, serial });
    }

    pub fn pool(&self) -> &[usize] {
        &self.pool
    }

    pub fn target(&self) -> Option<usize> {
        self.target
    }

    pub fn remaining(&self) -> Option<i64> {
        self.remaining
    }

    pub fn timer(&self) -> TimerMode {
        self.timer
    }

    pub fn mark(&self, index: usize) -> Option<Mark> {
        self.marks.get(&index).copied()
    }

    pub fn marks(&self) -> impl Iterator<Item = (usize, Mark)> + '_ {
        self.marks.iter().map(|(i, m)| (*i, *m))
    }

    /// Elements found this round
    pub fn score(&self) -> u32 {
        (ELEMENT_COUNT - self.pool.len()) as u32
    }

    pub fn errors(&self) -> u32 {
        self.attempts.saturating_sub(self.score())
    }

    /// Whether the one-second interval should be installed
    pub fn timer_active(&self) -> bool {
        self.phase == RoundPhase::Running
    }

    /// HUD clock: countdown in arcade, elapsed otherwise
    pub fn time_display(&self, gamemode: Gamemode) -> String {
        match (gamemode, self.remaining) {
            (Gamemode::Arcade, Some(r)) => r.to_string(),
            (Gamemode::Arcade, None) => "∞".to_string(),
            (Gamemode::Classic, _) => self.elapsed.to_string(),
        }
    }
}

fn full_pool() -> Vec<usize> {
    (0..ELEMENT_COUNT).collect()
}
