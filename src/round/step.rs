//! Round transitions
//!
//! Single entry point that advances a round in response to one input.

use rand::Rng;

use super::state::{MarkKind, Round, RoundEvent, RoundPhase, TimerMode};
use crate::consts::ELEMENT_COUNT;

/// A single input to the round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundInput {
    /// Begin play from Idle/Ended
    Start,
    /// Throw away progress and begin again
    Restart,
    /// Running <-> Paused
    TogglePause,
    /// Player clicked the cell with this atomic number
    Click { protons: u32 },
    /// One second passed
    Tick,
    /// A transient mark finished flashing; ignored if the cell has been
    /// re-marked since
    ReleaseMark { index: usize, serial: u32 },
}

/// Advance the round by one input
pub fn step<R: Rng + ?Sized>(round: &mut Round, input: RoundInput, rng: &mut R) -> Option<RoundEvent> {
    match input {
        RoundInput::Start => {
            if matches!(round.phase, RoundPhase::Idle | RoundPhase::Ended) {
                round.restart(rng);
            }
            None
        }
        RoundInput::Restart => {
            round.restart(rng);
            None
        }
        RoundInput::TogglePause => {
            round.phase = match round.phase {
                RoundPhase::Running => RoundPhase::Paused,
                RoundPhase::Paused => RoundPhase::Running,
                other => other,
            };
            None
        }
        RoundInput::Click { protons } => click(round, protons, rng),
        RoundInput::Tick => tick(round),
        RoundInput::ReleaseMark { index, serial } => {
            if round.marks.get(&index).is_some_and(|m| !m.sticky && m.serial == serial) {
                round.marks.remove(&index);
            }
            None
        }
    }
}

fn click<R: Rng + ?Sized>(round: &mut Round, protons: u32, rng: &mut R) -> Option<RoundEvent> {
    if round.phase != RoundPhase::Running {
        return None;
    }
    let index = (protons as usize).checked_sub(1)?;
    if index >= ELEMENT_COUNT || round.marks.contains_key(&index) {
        return None;
    }

    round.attempts += 1;

    if Some(index) == round.target {
        round.pool.retain(|&i| i != index);
        round.marks.retain(|_, m| m.kind != MarkKind::Wrong);
        round.place_mark(index, MarkKind::Correct, round.rules.answer_persist);
        round.wrong_streak = 0;
        if let (TimerMode::Countdown(t), Some(r)) = (round.timer, round.remaining.as_mut()) {
            *r += t.bonus_time as i64;
        }

        if round.pool.is_empty() {
            log::info!("All elements found in {} attempts", round.attempts);
            round.restart(rng);
            return Some(RoundEvent::Won);
        }
        round.draw_target(rng);
        Some(RoundEvent::Correct { index })
    } else {
        round.place_mark(index, MarkKind::Wrong, round.rules.error_protection);
        round.wrong_streak += 1;
        if let (TimerMode::Countdown(t), Some(r)) = (round.timer, round.remaining.as_mut()) {
            *r -= t.penalty_time as i64;
        }

        if out_of_time(round) {
            time_out(round);
            return Some(RoundEvent::TimedOut);
        }
        Some(RoundEvent::Wrong { index })
    }
}

fn tick(round: &mut Round) -> Option<RoundEvent> {
    if round.phase != RoundPhase::Running {
        return None;
    }
    round.elapsed += 1;
    if let Some(r) = round.remaining.as_mut() {
        *r -= 1;
    }
    if out_of_time(round) {
        time_out(round);
        return Some(RoundEvent::TimedOut);
    }
    None
}

fn out_of_time(round: &Round) -> bool {
    round.remaining.is_some_and(|r| r < 0)
}

fn time_out(round: &mut Round) {
    log::info!("Time out after {} seconds, score {}", round.elapsed, round.score());
    round.reset();
    round.phase = RoundPhase::Ended;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::round::state::MarkRules;
    use crate::settings::ArcadeTiming;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const ARCADE: ArcadeTiming = ArcadeTiming {
        penalty_time: 4,
        bonus_time: 7,
        total_time: 30,
    };

    fn running(timer: TimerMode, rules: MarkRules) -> (Round, Pcg32) {
        let mut rng = Pcg32::seed_from_u64(12345);
        let mut round = Round::new(timer, rules);
        step(&mut round, RoundInput::Start, &mut rng);
        (round, rng)
    }

    fn target_protons(round: &Round) -> u32 {
        round.target().unwrap() as u32 + 1
    }

    fn wrong_protons(round: &Round) -> u32 {
        let target = round.target().unwrap();
        (0..ELEMENT_COUNT)
            .find(|&i| i != target && round.mark(i).is_none())
            .unwrap() as u32
            + 1
    }

    #[test]
    fn test_start_from_idle() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut round = Round::new(TimerMode::Stopwatch, MarkRules::default());
        assert_eq!(round.phase, RoundPhase::Idle);
        assert!(round.target().is_none());

        step(&mut round, RoundInput::Start, &mut rng);
        assert_eq!(round.phase, RoundPhase::Running);
        assert_eq!(round.pool().len(), ELEMENT_COUNT);
        assert!(round.target().is_some());
    }

    #[test]
    fn test_clicks_ignored_unless_running() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut round = Round::new(TimerMode::Stopwatch, MarkRules::default());
        assert_eq!(step(&mut round, RoundInput::Click { protons: 1 }, &mut rng), None);
        assert_eq!(round.attempts, 0);

        step(&mut round, RoundInput::Start, &mut rng);
        step(&mut round, RoundInput::TogglePause, &mut rng);
        let protons = target_protons(&round);
        assert_eq!(step(&mut round, RoundInput::Click { protons }, &mut rng), None);
        assert_eq!(round.pool().len(), ELEMENT_COUNT);
    }

    #[test]
    fn test_correct_click() {
        let (mut round, mut rng) = running(TimerMode::Stopwatch, MarkRules::default());
        let index = round.target().unwrap();

        let event = step(&mut round, RoundInput::Click { protons: index as u32 + 1 }, &mut rng);
        assert_eq!(event, Some(RoundEvent::Correct { index }));
        assert_eq!(round.pool().len(), ELEMENT_COUNT - 1);
        assert!(!round.pool().contains(&index));
        assert_ne!(round.target(), Some(index));
        assert_eq!(round.attempts, 1);
        assert_eq!(round.score(), 1);
        assert_eq!(round.mark(index).unwrap().kind, MarkKind::Correct);
    }

    #[test]
    fn test_wrong_click_keeps_pool() {
        let (mut round, mut rng) = running(TimerMode::Stopwatch, MarkRules::default());
        let target = round.target();
        let protons = wrong_protons(&round);

        let event = step(&mut round, RoundInput::Click { protons }, &mut rng);
        assert_eq!(event, Some(RoundEvent::Wrong { index: protons as usize - 1 }));
        assert_eq!(round.pool().len(), ELEMENT_COUNT);
        assert_eq!(round.target(), target);
        assert_eq!(round.attempts, 1);
        assert_eq!(round.wrong_streak, 1);
        assert_eq!(round.errors(), 1);
    }

    #[test]
    fn test_marked_cell_ignored() {
        let rules = MarkRules {
            error_protection: true,
            answer_persist: true,
        };
        let (mut round, mut rng) = running(TimerMode::Stopwatch, rules);
        let protons = wrong_protons(&round);
        step(&mut round, RoundInput::Click { protons }, &mut rng);

        assert_eq!(step(&mut round, RoundInput::Click { protons }, &mut rng), None);
        assert_eq!(round.attempts, 1);

        // Sticky marks survive release requests
        let index = protons as usize - 1;
        let serial = round.mark(index).unwrap().serial;
        step(&mut round, RoundInput::ReleaseMark { index, serial }, &mut rng);
        assert!(round.mark(index).is_some());
    }

    #[test]
    fn test_transient_marks_release() {
        let (mut round, mut rng) = running(TimerMode::Stopwatch, MarkRules::default());
        let protons = wrong_protons(&round);
        step(&mut round, RoundInput::Click { protons }, &mut rng);
        let index = protons as usize - 1;
        assert!(!round.mark(index).unwrap().sticky);

        let serial = round.mark(index).unwrap().serial;
        step(&mut round, RoundInput::ReleaseMark { index, serial }, &mut rng);
        assert!(round.mark(index).is_none());
        assert!(step(&mut round, RoundInput::Click { protons }, &mut rng).is_some());
    }

    #[test]
    fn test_stale_release_keeps_newer_mark() {
        let (mut round, mut rng) = running(TimerMode::Stopwatch, MarkRules::default());
        let protons = wrong_protons(&round);
        let index = protons as usize - 1;
        step(&mut round, RoundInput::Click { protons }, &mut rng);
        let first = round.mark(index).unwrap().serial;

        // Same cell marked again after a restart, before the first flash ends
        step(&mut round, RoundInput::Restart, &mut rng);
        let protons = if round.target() == Some(index) {
            wrong_protons(&round)
        } else {
            protons
        };
        let index = protons as usize - 1;
        step(&mut round, RoundInput::Click { protons }, &mut rng);
        let second = round.mark(index).unwrap().serial;
        assert_ne!(first, second);

        step(&mut round, RoundInput::ReleaseMark { index, serial: first }, &mut rng);
        assert!(round.mark(index).is_some());
        step(&mut round, RoundInput::ReleaseMark { index, serial: second }, &mut rng);
        assert!(round.mark(index).is_none());
    }

    #[test]
    fn test_correct_clears_wrong_marks() {
        let rules = MarkRules {
            error_protection: true,
            answer_persist: true,
        };
        let (mut round, mut rng) = running(TimerMode::Stopwatch, rules);
        let wrong = wrong_protons(&round);
        step(&mut round, RoundInput::Click { protons: wrong }, &mut rng);
        assert_eq!(round.wrong_streak, 1);

        let protons = target_protons(&round);
        step(&mut round, RoundInput::Click { protons }, &mut rng);
        assert!(round.mark(wrong as usize - 1).is_none());
        assert_eq!(round.wrong_streak, 0);
    }

    #[test]
    fn test_arcade_bonus_and_penalty() {
        let (mut round, mut rng) = running(TimerMode::Countdown(ARCADE), MarkRules::default());
        assert_eq!(round.remaining(), Some(30));

        let protons = target_protons(&round);
        step(&mut round, RoundInput::Click { protons }, &mut rng);
        assert_eq!(round.remaining(), Some(37));

        let protons = wrong_protons(&round);
        step(&mut round, RoundInput::Click { protons }, &mut rng);
        assert_eq!(round.remaining(), Some(33));
    }

    #[test]
    fn test_countdown_clamped_to_minimum() {
        let short = ArcadeTiming {
            total_time: 5,
            ..ARCADE
        };
        let (round, _) = running(TimerMode::Countdown(short), MarkRules::default());
        assert_eq!(round.remaining(), Some(25));
    }

    #[test]
    fn test_tick_timeout() {
        let (mut round, mut rng) = running(TimerMode::Countdown(ARCADE), MarkRules::default());
        for _ in 0..30 {
            assert_eq!(step(&mut round, RoundInput::Tick, &mut rng), None);
        }
        assert_eq!(round.remaining(), Some(0));
        assert_eq!(round.elapsed, 30);

        assert_eq!(step(&mut round, RoundInput::Tick, &mut rng), Some(RoundEvent::TimedOut));
        assert_eq!(round.phase, RoundPhase::Ended);
        assert!(!round.timer_active());
        assert_eq!(round.pool().len(), ELEMENT_COUNT);

        // Timer stays off
        assert_eq!(step(&mut round, RoundInput::Tick, &mut rng), None);
        assert_eq!(round.elapsed, 0);

        step(&mut round, RoundInput::Start, &mut rng);
        assert_eq!(round.phase, RoundPhase::Running);
        assert_eq!(round.remaining(), Some(30));
    }

    #[test]
    fn test_penalty_can_time_out() {
        let harsh = ArcadeTiming {
            penalty_time: 40,
            ..ARCADE
        };
        let (mut round, mut rng) = running(TimerMode::Countdown(harsh), MarkRules::default());
        let protons = wrong_protons(&round);
        assert_eq!(
            step(&mut round, RoundInput::Click { protons }, &mut rng),
            Some(RoundEvent::TimedOut)
        );
        assert_eq!(round.phase, RoundPhase::Ended);
    }

    #[test]
    fn test_pause_stops_clock() {
        let (mut round, mut rng) = running(TimerMode::Countdown(ARCADE), MarkRules::default());
        step(&mut round, RoundInput::Tick, &mut rng);
        step(&mut round, RoundInput::TogglePause, &mut rng);
        assert_eq!(round.phase, RoundPhase::Paused);
        assert!(!round.timer_active());

        step(&mut round, RoundInput::Tick, &mut rng);
        assert_eq!(round.elapsed, 1);
        assert_eq!(round.remaining(), Some(29));

        step(&mut round, RoundInput::TogglePause, &mut rng);
        assert_eq!(round.phase, RoundPhase::Running);
    }

    #[test]
    fn test_stopwatch_never_times_out() {
        let (mut round, mut rng) = running(TimerMode::Stopwatch, MarkRules::default());
        for _ in 0..1000 {
            assert_eq!(step(&mut round, RoundInput::Tick, &mut rng), None);
        }
        assert_eq!(round.elapsed, 1000);
        assert_eq!(round.remaining(), None);
    }

    #[test]
    fn test_clearing_pool_wins_and_restarts() {
        let (mut round, mut rng) = running(TimerMode::Stopwatch, MarkRules::default());
        for found in 1..ELEMENT_COUNT {
            let protons = target_protons(&round);
            step(&mut round, RoundInput::Click { protons }, &mut rng);
            assert_eq!(round.pool().len(), ELEMENT_COUNT - found);
        }

        let protons = target_protons(&round);
        assert_eq!(step(&mut round, RoundInput::Click { protons }, &mut rng), Some(RoundEvent::Won));
        assert_eq!(round.phase, RoundPhase::Running);
        assert_eq!(round.pool().len(), ELEMENT_COUNT);
        assert_eq!(round.attempts, 0);
        assert_eq!(round.marks().count(), 0);
    }

    #[test]
    fn test_out_of_range_click_ignored() {
        let (mut round, mut rng) = running(TimerMode::Stopwatch, MarkRules::default());
        assert_eq!(step(&mut round, RoundInput::Click { protons: 0 }, &mut rng), None);
        assert_eq!(step(&mut round, RoundInput::Click { protons: 119 }, &mut rng), None);
        assert_eq!(round.attempts, 0);
    }
}
