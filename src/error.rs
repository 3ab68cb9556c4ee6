use crate::coordinator::LaneId;
use crate::phase::Phase;
use std::fmt;

/// Fatal errors raised by the signal coordinator and the lane automaton.
///
/// None of these are recoverable mid-tick: each one indicates that a caller
/// violated a precondition or that an invariant the rest of the crate relies
/// on no longer holds. See the error handling notes in the simulation's
/// design document for the disposition of each variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// A vehicle was reported crossing the stop line (position 0) while the
    /// lane's light was not green.
    NotGreenOnCrossing { lane_id: LaneId, phase: Phase },
    /// Two vehicles were computed to occupy the same cell.
    CellCollision { lane_id: LaneId, position: i32 },
    /// A phase timer's remaining counter reached a non-positive value.
    NonPositiveRemaining { lane_id: LaneId },
    /// The adaptive strategy tried to extend the green phase but no
    /// registered lane currently holds green.
    NoGreenLane,
    /// `set_remaining` was called for a phase other than the timer's
    /// current phase, or with a non-positive value.
    InvalidRemainingWrite { lane_id: LaneId, phase: Phase, value: i32 },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::NotGreenOnCrossing { lane_id, phase } => {
                write!(
                    f,
                    "lane '{}' reported a stop-line crossing while its light was {}",
                    lane_id, phase
                )
            }
            SimError::CellCollision { lane_id, position } => {
                write!(f, "two vehicles collided in lane '{}' at position {}", lane_id, position)
            }
            SimError::NonPositiveRemaining { lane_id } => {
                write!(f, "phase timer for lane '{}' has non-positive remaining time", lane_id)
            }
            SimError::NoGreenLane => write!(f, "no registered lane currently holds green"),
            SimError::InvalidRemainingWrite { lane_id, phase, value } => {
                write!(
                    f,
                    "cannot set remaining={} for phase {} on lane '{}' (not the active phase, or non-positive)",
                    value, phase, lane_id
                )
            }
        }
    }
}

impl std::error::Error for SimError {}
