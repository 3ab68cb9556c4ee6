//! A single traffic light's clock and state transitions.
//!
//! `Phase` and `PhaseTimer` intentionally know nothing about lanes, sensors
//! or the mutual-exclusion rule between lights in an intersection — that
//! belongs to [`crate::coordinator::Coordinator`], which owns one timer per
//! lane and is the only place cross-lane invariants are enforced.

use crate::coordinator::LaneId;
use crate::error::SimError;
use std::fmt;

/// The indication a traffic light currently displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Green,
    Amber,
    Red,
}

impl Phase {
    /// The phase that follows this one in the Green → Amber → Red → Green cycle.
    pub fn succ(self) -> Phase {
        match self {
            Phase::Green => Phase::Amber,
            Phase::Amber => Phase::Red,
            Phase::Red => Phase::Green,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Green => "green",
            Phase::Amber => "amber",
            Phase::Red => "red",
        };
        write!(f, "{}", s)
    }
}

/// Nominal duration, in ticks, of each phase. Distinct from a timer's
/// `remaining` counter, which the adaptive strategy may temporarily inflate
/// past these values (see [`PhaseTimer::set_remaining`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseDurations {
    pub green: i32,
    pub amber: i32,
    pub red: i32,
}

impl PhaseDurations {
    pub fn new(green: i32, amber: i32, red: i32) -> Self {
        PhaseDurations { green, amber, red }
    }

    pub fn get(&self, phase: Phase) -> i32 {
        match phase {
            Phase::Green => self.green,
            Phase::Amber => self.amber,
            Phase::Red => self.red,
        }
    }
}

impl Default for PhaseDurations {
    /// Green=11, Amber=4, Red=15, per the documented defaults.
    fn default() -> Self {
        PhaseDurations::new(11, 4, 15)
    }
}

/// One traffic light's clock: the phase it currently displays and how many
/// ticks remain before it advances.
///
/// Invariant: `1 <= remaining <= max(durations.get(current), <largest write
/// via set_remaining>)`. The adaptive strategy is allowed to push `remaining`
/// above the nominal duration for the active phase; the next natural
/// rotation resets it back to `durations.get(new_phase)`.
#[derive(Debug, Clone)]
pub struct PhaseTimer {
    lane_id: LaneId,
    durations: PhaseDurations,
    current: Phase,
    remaining: i32,
}

impl PhaseTimer {
    /// Creates a timer attached to `lane_id`, starting in `initial` with its
    /// nominal duration.
    pub fn new(lane_id: LaneId, durations: PhaseDurations, initial: Phase) -> Self {
        let remaining = durations.get(initial);
        PhaseTimer { lane_id, durations, current: initial, remaining }
    }

    pub fn lane_id(&self) -> LaneId {
        self.lane_id
    }

    pub fn current(&self) -> Phase {
        self.current
    }

    pub fn remaining(&self) -> i32 {
        self.remaining
    }

    pub fn durations(&self) -> PhaseDurations {
        self.durations
    }

    /// Forces the timer to `phase` with its nominal remaining time,
    /// bypassing the regular decrement-and-rotate cycle. Used only by
    /// [`crate::coordinator::Coordinator::register`] to break a green/green
    /// tie at construction time.
    pub fn force_to(&mut self, phase: Phase) {
        self.current = phase;
        self.remaining = self.durations.get(phase);
    }

    /// Decrements `remaining` by one tick; rotates to the next phase and
    /// resets `remaining` to that phase's nominal duration when it hits zero.
    ///
    /// Fails if the phase being rotated into has a non-positive configured
    /// duration — a misconfigured `PhaseDurations` would otherwise leave the
    /// timer stuck at `remaining <= 0` forever.
    pub fn tick(&mut self) -> Result<(), SimError> {
        self.remaining -= 1;
        if self.remaining <= 0 {
            self.current = self.current.succ();
            self.remaining = self.durations.get(self.current);
            if self.remaining <= 0 {
                return Err(SimError::NonPositiveRemaining { lane_id: self.lane_id });
            }
        }
        Ok(())
    }

    /// Inflates `remaining` for the currently active phase. Rejects writes
    /// for any other phase, and non-positive values, as invariant violations.
    pub fn set_remaining(&mut self, phase: Phase, value: i32) -> Result<(), SimError> {
        if phase != self.current || value <= 0 {
            return Err(SimError::InvalidRemainingWrite { lane_id: self.lane_id, phase, value });
        }
        self.remaining = value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timer() -> PhaseTimer {
        PhaseTimer::new(LaneId(1), PhaseDurations::new(2, 3, 10), Phase::Green)
    }

    #[test]
    fn cycles_through_phases_on_schedule() {
        let mut t = timer();
        assert_eq!((t.current(), t.remaining()), (Phase::Green, 2));

        t.tick().unwrap();
        assert_eq!((t.current(), t.remaining()), (Phase::Green, 1));

        t.tick().unwrap(); // green exhausted -> amber
        assert_eq!((t.current(), t.remaining()), (Phase::Amber, 3));

        t.tick().unwrap();
        t.tick().unwrap();
        t.tick().unwrap(); // amber exhausted -> red
        assert_eq!((t.current(), t.remaining()), (Phase::Red, 10));

        for _ in 0..9 {
            t.tick().unwrap();
        }
        assert_eq!((t.current(), t.remaining()), (Phase::Red, 1));
        t.tick().unwrap(); // red exhausted -> green again
        assert_eq!((t.current(), t.remaining()), (Phase::Green, 2));
    }

    #[test]
    fn tick_rejects_rotating_into_a_non_positive_duration() {
        let mut t = PhaseTimer::new(LaneId(1), PhaseDurations::new(1, 0, 10), Phase::Green);
        let err = t.tick().unwrap_err();
        assert_eq!(err, SimError::NonPositiveRemaining { lane_id: LaneId(1) });
    }

    #[test]
    fn set_remaining_rejects_inactive_phase_and_nonpositive_values() {
        let mut t = timer();
        assert!(t.set_remaining(Phase::Red, 5).is_err());
        assert!(t.set_remaining(Phase::Green, 0).is_err());
        assert!(t.set_remaining(Phase::Green, -1).is_err());
    }

    #[test]
    fn set_remaining_can_inflate_past_nominal_duration() {
        let mut t = timer();
        t.set_remaining(Phase::Green, 20).unwrap();
        assert_eq!(t.remaining(), 20);
        // Decrements from the inflated value, then reverts to nominal on rotation.
        for _ in 0..20 {
            t.tick().unwrap();
        }
        assert_eq!((t.current(), t.remaining()), (Phase::Amber, 3));
    }

    #[test]
    fn force_to_sets_nominal_remaining() {
        let mut t = timer();
        t.force_to(Phase::Red);
        assert_eq!((t.current(), t.remaining()), (Phase::Red, 10));
    }
}
