//! Registers one [`PhaseTimer`] per lane, enforces the single-green
//! invariant across them, and routes sensor detections into either a
//! fixed-time or fuzzy-adaptive strategy.
//!
//! ```text
//! Lane::tick() --(lane_id, position)--> Coordinator::on_detect()
//!                                               |
//!                                     metrics / handoff bookkeeping
//!                                               |
//!                          Coordinator::tick() -- advances every PhaseTimer
//! ```
//!
//! The fixed and fuzzy strategies share the same `tick`/`on_detect`/`register`
//! surface; rather than a trait object hierarchy this uses a small closed
//! enum for the two variants, since neither needs its own type identity
//! beyond the strategy-specific state it carries.

use crate::error::SimError;
use crate::fuzzy;
use crate::phase::{Phase, PhaseTimer};
use indexmap::IndexMap;
use std::fmt;

/// Identifies a lane registered with a [`Coordinator`]. Distinct from
/// [`crate::lane::VehicleID`]; a lane id is assigned once at construction
/// and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LaneId(pub u32);

impl fmt::Display for LaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Selects which control strategy a [`Coordinator`] runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    Fixed,
    Fuzzy,
}

#[derive(Debug, Clone, Copy, Default)]
struct PhaseMetrics {
    inbound: i64,
    outbound: i64,
}

/// Per-phase arrival/departure counters and handoff bookkeeping consulted
/// only by the fuzzy strategy. Absent entirely from the fixed strategy.
#[derive(Debug)]
struct FuzzyState {
    metrics: IndexMap<Phase, PhaseMetrics>,
    buffer: i64,
    extended_to_max: bool,
    map_state: IndexMap<Phase, LaneId>,
}

impl FuzzyState {
    fn new() -> Self {
        let mut metrics = IndexMap::new();
        for phase in [Phase::Green, Phase::Amber, Phase::Red] {
            metrics.insert(phase, PhaseMetrics::default());
        }
        FuzzyState { metrics, buffer: 0, extended_to_max: false, map_state: IndexMap::new() }
    }

    fn metrics(&self, phase: Phase) -> PhaseMetrics {
        self.metrics[&phase]
    }

    fn metrics_mut(&mut self, phase: Phase) -> &mut PhaseMetrics {
        self.metrics.get_mut(&phase).expect("all three phases are seeded in FuzzyState::new")
    }

    fn arrival(&self) -> i64 {
        let g = self.metrics(Phase::Green);
        g.inbound - g.outbound
    }

    fn queue(&self) -> i64 {
        self.metrics(Phase::Red).inbound
    }
}

enum Strategy {
    Fixed,
    Fuzzy(FuzzyState),
}

/// Owns every registered lane's [`PhaseTimer`] and the active control
/// strategy. The lane automaton itself is owned by the driver, not by the
/// coordinator — sensor events cross that boundary through [`Coordinator::on_detect`].
pub struct Coordinator {
    lights: IndexMap<LaneId, PhaseTimer>,
    strategy: Strategy,
    extension_cap: i32,
}

impl Coordinator {
    pub fn new(kind: StrategyKind, extension_cap: i32) -> Self {
        let strategy = match kind {
            StrategyKind::Fixed => Strategy::Fixed,
            StrategyKind::Fuzzy => Strategy::Fuzzy(FuzzyState::new()),
        };
        Coordinator { lights: IndexMap::new(), strategy, extension_cap }
    }

    /// Registers `timer` under its own lane id. If another registered timer
    /// is already Green and `timer` is also Green, `timer` is forced to Red
    /// to preserve the single-green invariant.
    pub fn register(&mut self, mut timer: PhaseTimer) {
        let lane_id = timer.lane_id();
        let clashes = timer.current() == Phase::Green
            && self.lights.values().any(|t| t.current() == Phase::Green);
        if clashes {
            timer.force_to(Phase::Red);
        }
        self.lights.insert(lane_id, timer);
        self.refresh_map_state();
    }

    pub fn phase_of(&self, lane_id: LaneId) -> Option<Phase> {
        self.lights.get(&lane_id).map(|t| t.current())
    }

    pub fn remaining_of(&self, lane_id: LaneId) -> Option<i32> {
        self.lights.get(&lane_id).map(|t| t.remaining())
    }

    fn lane_with_phase(&self, phase: Phase) -> Option<LaneId> {
        self.lights.iter().find(|(_, t)| t.current() == phase).map(|(id, _)| *id)
    }

    fn refresh_map_state(&mut self) {
        if let Strategy::Fuzzy(state) = &mut self.strategy {
            state.map_state.clear();
            for (id, timer) in self.lights.iter() {
                state.map_state.insert(timer.current(), *id);
            }
        }
    }

    /// Advances every registered timer by one tick, then for the fuzzy
    /// strategy: maybe extends the active green, detects a phase handoff,
    /// and refreshes the phase-to-lane map. No-op beyond the timer advance
    /// for the fixed strategy.
    pub fn tick(&mut self) -> Result<(), SimError> {
        let prev_green = self.lane_with_phase(Phase::Green);
        let prev_red = self.lane_with_phase(Phase::Red);

        for timer in self.lights.values_mut() {
            timer.tick()?;
        }

        if matches!(self.strategy, Strategy::Fixed) {
            return Ok(());
        }

        // Resolve the green lane from the map refreshed at the end of the
        // *previous* tick, not a fresh phase lookup, and pair it with
        // `map_state[Red]` inside `extend` — the same snapshot for both
        // ends. That snapshot is one tick behind the timers just advanced
        // above, so it can still name a lane that rotated away this very
        // tick: on a red -> green rotation it reports no green lane at all
        // (nobody was green in the prior snapshot either), but on a green
        // -> amber rotation it still names the lane that was green a
        // moment ago. Confirming the named lane's *current* phase is still
        // actually Green catches that second case; without it `extend`
        // would try to write a Green remaining onto a timer that just
        // became Amber and `set_remaining` would reject it.
        let stale_green = match &self.strategy {
            Strategy::Fuzzy(state) => state.map_state.get(&Phase::Green).copied(),
            Strategy::Fixed => None,
        };
        let still_green = stale_green
            .map(|id| self.lights.get(&id).map(|t| t.current()) == Some(Phase::Green))
            .unwrap_or(false);
        if still_green {
            let green = stale_green.expect("still_green is true only when stale_green is Some");
            let extended_to_max = match &self.strategy {
                Strategy::Fuzzy(state) => state.extended_to_max,
                Strategy::Fixed => true,
            };
            if !extended_to_max {
                self.extend(green)?;
            }
        }

        let green_left = prev_green
            .map(|id| self.lights.get(&id).map(|t| t.current()) != Some(Phase::Green))
            .unwrap_or(false);
        let red_left = prev_red
            .map(|id| self.lights.get(&id).map(|t| t.current()) != Some(Phase::Red))
            .unwrap_or(false);

        if green_left {
            self.handoff_green_to_amber();
        } else if red_left {
            self.handoff_red_to_green();
        }

        self.refresh_map_state();
        Ok(())
    }

    /// Reports a sensor detection. A stop-line (`position == 0`) detection
    /// while the reporting lane is not Green is a precondition violation.
    /// No-op for the fixed strategy.
    pub fn on_detect(&mut self, lane_id: LaneId, position: i32) -> Result<(), SimError> {
        let phase = match self.phase_of(lane_id) {
            Some(p) => p,
            None => return Ok(()),
        };

        let state = match &mut self.strategy {
            Strategy::Fuzzy(state) => state,
            Strategy::Fixed => return Ok(()),
        };

        if position == 0 {
            if phase != Phase::Green {
                return Err(SimError::NotGreenOnCrossing { lane_id, phase });
            }
            state.metrics_mut(Phase::Green).outbound += 1;
        } else {
            state.metrics_mut(phase).inbound += 1;
        }
        Ok(())
    }

    fn handoff_green_to_amber(&mut self) {
        if let Strategy::Fuzzy(state) = &mut self.strategy {
            state.buffer = state.arrival();
        }
    }

    fn handoff_red_to_green(&mut self) {
        if let Strategy::Fuzzy(state) = &mut self.strategy {
            let queue = state.queue();
            let amber_inbound = state.metrics(Phase::Amber).inbound;

            state.metrics_mut(Phase::Green).inbound = queue;
            state.metrics_mut(Phase::Green).outbound = 0;
            state.metrics_mut(Phase::Red).inbound = state.buffer + amber_inbound;
            state.metrics_mut(Phase::Amber).inbound = 0;
            state.buffer = 0;
            state.extended_to_max = false;
        }
    }

    /// Consults the fuzzy engine and writes an extension into both the
    /// active green timer and its paired red timer, capped at
    /// `extension_cap`. Marks `extended_to_max` once the green timer hits
    /// the cap, preventing further extension within the same green phase.
    fn extend(&mut self, green: LaneId) -> Result<(), SimError> {
        let (arrival, queue) = match &self.strategy {
            Strategy::Fuzzy(state) => (state.arrival() as f64, state.queue() as f64),
            Strategy::Fixed => return Ok(()),
        };

        let red = match &self.strategy {
            Strategy::Fuzzy(state) => state.map_state.get(&Phase::Red).copied(),
            Strategy::Fixed => None,
        }
        .ok_or(SimError::NoGreenLane)?;

        let e = fuzzy::extension(queue, arrival).round() as i32;

        let green_remaining = self.lights.get(&green).map(|t| t.remaining()).ok_or(SimError::NoGreenLane)?;
        let red_remaining = self.lights.get(&red).map(|t| t.remaining()).ok_or(SimError::NoGreenLane)?;

        let new_green = (green_remaining + e).min(self.extension_cap);
        let new_red = (red_remaining + e).min(self.extension_cap);

        self.lights
            .get_mut(&green)
            .expect("lane id resolved from this coordinator's own registry")
            .set_remaining(Phase::Green, new_green)?;
        self.lights
            .get_mut(&red)
            .expect("lane id resolved from this coordinator's own registry")
            .set_remaining(Phase::Red, new_red)?;

        if let Strategy::Fuzzy(state) = &mut self.strategy {
            if new_green >= self.extension_cap {
                state.extended_to_max = true;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::PhaseDurations;

    fn durations() -> PhaseDurations {
        PhaseDurations::new(11, 4, 15)
    }

    #[test]
    fn second_green_registration_is_forced_to_red() {
        let mut c = Coordinator::new(StrategyKind::Fixed, 20);
        c.register(PhaseTimer::new(LaneId(1), durations(), Phase::Green));
        c.register(PhaseTimer::new(LaneId(2), durations(), Phase::Green));
        assert_eq!(c.phase_of(LaneId(1)), Some(Phase::Green));
        assert_eq!(c.phase_of(LaneId(2)), Some(Phase::Red));
    }

    #[test]
    fn fixed_strategy_tick_only_advances_timers() {
        let mut c = Coordinator::new(StrategyKind::Fixed, 20);
        c.register(PhaseTimer::new(LaneId(1), durations(), Phase::Green));
        c.register(PhaseTimer::new(LaneId(2), durations(), Phase::Red));
        for _ in 0..11 {
            c.tick().unwrap();
        }
        assert_eq!(c.phase_of(LaneId(1)), Some(Phase::Amber));
    }

    #[test]
    fn fixed_strategy_on_detect_is_a_noop() {
        let mut c = Coordinator::new(StrategyKind::Fixed, 20);
        c.register(PhaseTimer::new(LaneId(1), durations(), Phase::Red));
        // Would be a precondition violation under the fuzzy strategy; fixed ignores it.
        assert!(c.on_detect(LaneId(1), 0).is_ok());
    }

    #[test]
    fn fuzzy_on_detect_rejects_crossing_while_not_green() {
        let mut c = Coordinator::new(StrategyKind::Fuzzy, 20);
        c.register(PhaseTimer::new(LaneId(1), durations(), Phase::Red));
        let err = c.on_detect(LaneId(1), 0).unwrap_err();
        assert_eq!(err, SimError::NotGreenOnCrossing { lane_id: LaneId(1), phase: Phase::Red });
    }

    #[test]
    fn fuzzy_extends_green_and_paired_red_on_positive_arrival() {
        let mut c = Coordinator::new(StrategyKind::Fuzzy, 20);
        c.register(PhaseTimer::new(LaneId(1), durations(), Phase::Green));
        c.register(PhaseTimer::new(LaneId(2), durations(), Phase::Red));

        // Build up arrival on green and queue on red before the tick that extends.
        c.on_detect(LaneId(1), 7).unwrap(); // green inbound
        c.on_detect(LaneId(2), 7).unwrap(); // red inbound (queue)

        let green_before = c.remaining_of(LaneId(1)).unwrap();
        let red_before = c.remaining_of(LaneId(2)).unwrap();
        c.tick().unwrap();
        let green_after = c.remaining_of(LaneId(1)).unwrap();
        let red_after = c.remaining_of(LaneId(2)).unwrap();

        // One tick of natural decrement plus a non-negative fuzzy extension.
        assert!(green_after >= green_before - 1);
        assert!(red_after >= red_before - 1);
    }

    #[test]
    fn single_green_invariant_holds_across_many_ticks() {
        let mut c = Coordinator::new(StrategyKind::Fixed, 20);
        c.register(PhaseTimer::new(LaneId(1), durations(), Phase::Green));
        c.register(PhaseTimer::new(LaneId(2), durations(), Phase::Red));
        for _ in 0..200 {
            c.tick().unwrap();
            let greens =
                [LaneId(1), LaneId(2)].iter().filter(|&&id| c.phase_of(id) == Some(Phase::Green)).count();
            assert!(greens <= 1);
        }
    }

    #[test]
    fn green_to_amber_handoff_buffers_arrival() {
        let mut c = Coordinator::new(StrategyKind::Fuzzy, 20);
        c.register(PhaseTimer::new(LaneId(1), PhaseDurations::new(1, 4, 15), Phase::Green));
        c.register(PhaseTimer::new(LaneId(2), durations(), Phase::Red));
        c.on_detect(LaneId(1), 7).unwrap(); // arrival = 1
        c.tick().unwrap(); // green's remaining was 1: rotates straight to amber
        assert_eq!(c.phase_of(LaneId(1)), Some(Phase::Amber));
    }
}
