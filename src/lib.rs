//! Cellular-automaton simulation of a single signalized intersection,
//! comparing a fixed-time traffic-light cycle against an adaptive
//! fuzzy-logic controller that extends green phases based on measured
//! arrivals and queue length.
//!
//! ```text
//! config::SimConfig
//!        |
//!        v
//! coordinator::Coordinator ---owns---> phase::PhaseTimer (one per lane)
//!        ^                                    ^
//!        | on_detect(lane_id, position)       | tick()
//!        |                                    |
//! lane::Lane ----------------------------------
//!        ^
//!        | extension(queue, arrival)
//!        |
//! fuzzy::extension
//! ```
//!
//! The binary target in `src/bin/intersection_sim.rs` wires these pieces
//! together into a runnable CLI; this crate is the simulation core only.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod fuzzy;
pub mod lane;
pub mod phase;
pub mod verbose;

pub use config::SimConfig;
pub use coordinator::{Coordinator, LaneId, StrategyKind};
pub use error::SimError;
pub use lane::Lane;
pub use phase::{Phase, PhaseDurations, PhaseTimer};
