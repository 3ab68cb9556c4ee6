//! Cellular model of a one-way approach to the intersection: a bounded
//! strip of cells, the vehicles occupying it, and the two sensors (stop
//! line and upstream) that report detections to a coordinator.

use crate::coordinator::LaneId;
use crate::error::SimError;
use crate::phase::Phase;
use indexmap::IndexMap;

pub type VehicleID = u64;

/// A single vehicle traveling down a lane toward the stop line at position 0.
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub id: VehicleID,
    /// Cell index, counting down toward the stop line.
    pub position: i32,
    /// Cells traversed so far.
    pub ride: u32,
    /// Ticks spent unable to advance.
    pub wait: u32,
}

impl Vehicle {
    fn new(id: VehicleID, position: i32) -> Self {
        Vehicle { id, position, ride: 0, wait: 0 }
    }
}

/// A bounded one-way lane: `size` cells numbered `0..size`, with a stop
/// line at 0 and an upstream sensor at `distance`.
///
/// Vehicles are stored in an [`IndexMap`] keyed by id, following the
/// insertion-order-preserving storage pattern this codebase already uses
/// for its vehicle registries. New vehicles only ever join at the rear, and
/// the front vehicle is the only one ever removed, so insertion order and
/// ascending-position order coincide for the lifetime of every vehicle —
/// the map can be iterated front-to-back without a separate sort.
pub struct Lane {
    id: LaneId,
    name: String,
    size: i32,
    distance: i32,
    cells: Vec<Option<VehicleID>>,
    vehicles: IndexMap<VehicleID, Vehicle>,
    next_vehicle_id: VehicleID,
    pub car_in: u64,
    pub car_out: u64,
    pub total_wait: u64,
}

impl Lane {
    pub fn new(id: LaneId, name: impl Into<String>, size: i32, distance: i32) -> Self {
        Lane {
            id,
            name: name.into(),
            size,
            distance,
            cells: vec![None; size as usize],
            vehicles: IndexMap::new(),
            next_vehicle_id: 1,
            car_in: 0,
            car_out: 0,
            total_wait: 0,
        }
    }

    pub fn id(&self) -> LaneId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vehicle_count(&self) -> usize {
        self.vehicles.len()
    }

    pub fn vehicles(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles.values()
    }

    fn place(&mut self, id: VehicleID, position: i32) {
        self.cells[position as usize] = Some(id);
        self.vehicles.insert(id, Vehicle::new(id, position));
    }

    /// Inserts a newly-arrived vehicle behind the rear-most vehicle (or at
    /// `distance + 1` if the lane is empty or the rear has advanced past the
    /// sensor strip). Returns `false` without mutating the lane if it is at
    /// capacity — arrivals dropped this way model a missed spawn, not an
    /// error (see the capacity-reached disposition in the design notes).
    pub fn append(&mut self) -> bool {
        let id = self.next_vehicle_id;
        let target = match self.vehicles.values().last() {
            None => self.distance + 1,
            Some(rear) if rear.position == self.size - 1 => return false,
            Some(rear) if rear.position >= self.distance + 1 => rear.position + 1,
            Some(_) => self.distance + 1,
        };
        self.next_vehicle_id += 1;
        self.place(id, target);
        true
    }

    fn advance(&mut self, id: VehicleID, events: &mut Vec<i32>) -> Result<(), SimError> {
        self.cells[self.vehicles[&id].position as usize] = None;
        let vehicle = self.vehicles.get_mut(&id).expect("vehicle id from own storage");
        vehicle.ride += 1;
        vehicle.position -= 1;
        let new_position = vehicle.position;

        if new_position == 0 {
            let wait = vehicle.wait;
            self.vehicles.shift_remove(&id);
            self.car_out += 1;
            self.total_wait += wait as u64;
            events.push(0);
            return Ok(());
        }

        // Every caller of `advance` is expected to have already checked the
        // target cell is clear (the red/amber branch does so explicitly; the
        // green branch relies on vehicles never starting closer than one
        // cell apart). This check guards that invariant rather than trusting it.
        if self.cells[new_position as usize].is_some() {
            return Err(SimError::CellCollision { lane_id: self.id, position: new_position });
        }

        self.cells[new_position as usize] = Some(id);
        if new_position == self.distance {
            self.car_in += 1;
            events.push(self.distance);
        }
        Ok(())
    }

    /// Advances the lane by one tick under the given phase. Returns the
    /// detection events fired this tick, in front-to-rear vehicle order, as
    /// `(lane_id, position)` pairs ready to hand to a coordinator's
    /// `on_detect`.
    pub fn tick(&mut self, phase: Phase) -> Result<Vec<(LaneId, i32)>, SimError> {
        let mut positions = Vec::new();

        match phase {
            Phase::Green => {
                let ids: Vec<VehicleID> = self.vehicles.keys().copied().collect();
                for id in ids {
                    self.advance(id, &mut positions)?;
                }
            }
            Phase::Amber | Phase::Red => {
                let ids: Vec<VehicleID> = self.vehicles.keys().copied().collect();
                for id in ids {
                    let position = self.vehicles[&id].position;
                    if position == 1 {
                        self.vehicles.get_mut(&id).unwrap().wait += 1;
                        continue;
                    }
                    let ahead_clear = self.cells[(position - 1) as usize].is_none();
                    if ahead_clear {
                        self.advance(id, &mut positions)?;
                    } else {
                        self.vehicles.get_mut(&id).unwrap().wait += 1;
                    }
                }
            }
        }

        Ok(positions.into_iter().map(|position| (self.id, position)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lane() -> Lane {
        Lane::new(LaneId(1), "test", 15, 7)
    }

    #[test]
    fn append_places_first_vehicle_past_the_sensor() {
        let mut l = lane();
        assert!(l.append());
        assert_eq!(l.vehicles().next().unwrap().position, 8);
    }

    #[test]
    fn append_packs_behind_the_rear_vehicle() {
        let mut l = lane();
        l.append();
        l.append();
        let positions: Vec<i32> = l.vehicles().map(|v| v.position).collect();
        assert_eq!(positions, vec![8, 9]);
    }

    #[test]
    fn append_drops_silently_at_capacity() {
        let mut l = Lane::new(LaneId(1), "test", 3, 1);
        assert!(l.append()); // placed at distance+1 = 2 = size-1
        assert!(!l.append()); // rear is already at size-1, dropped
        assert_eq!(l.vehicle_count(), 1);
    }

    #[test]
    fn green_tick_advances_and_removes_at_stop_line() {
        let mut l = lane(); // S=15, D=7
        l.append(); // position 8
        let events = l.tick(Phase::Green).unwrap(); // 8 -> 7, crosses the upstream sensor
        assert_eq!(events, vec![(LaneId(1), 7)]);
        for _ in 0..6 {
            let events = l.tick(Phase::Green).unwrap();
            assert!(events.is_empty());
        }
        let events = l.tick(Phase::Green).unwrap(); // 1 -> 0, exits
        assert_eq!(events, vec![(LaneId(1), 0)]);
        assert_eq!(l.vehicle_count(), 0);
        assert_eq!(l.car_out, 1);
        assert_eq!(l.total_wait, 0);
    }

    #[test]
    fn upstream_sensor_fires_at_distance() {
        let mut l = Lane::new(LaneId(1), "test", 15, 7);
        l.append(); // position 8
        let events = l.tick(Phase::Green).unwrap(); // position 7 == distance
        assert_eq!(events, vec![(LaneId(1), 7)]);
    }

    #[test]
    fn red_tick_stalls_front_vehicle_at_position_one() {
        let mut l = Lane::new(LaneId(1), "test", 3, 1);
        l.append(); // position 2
        l.tick(Phase::Red).unwrap(); // -> position 1 (distance+1 cell clear ahead)
        let events = l.tick(Phase::Red).unwrap(); // front vehicle at position 1: must stop
        assert!(events.is_empty());
        assert_eq!(l.vehicles().next().unwrap().wait, 1);
    }

    #[test]
    fn red_tick_never_lets_a_vehicle_leapfrog_the_one_ahead() {
        let mut l = Lane::new(LaneId(1), "test", 5, 1);
        l.append(); // position 2
        l.append(); // position 3
        l.tick(Phase::Red).unwrap(); // both advance one cell since the cell ahead of each clears in order
        let positions: Vec<i32> = l.vehicles().map(|v| v.position).collect();
        assert_eq!(positions, vec![1, 2]);
        // no two vehicles ever share a cell
        let mut sorted = positions.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), positions.len());
    }

    #[test]
    fn empty_lane_tick_is_a_noop() {
        let mut l = lane();
        assert!(l.tick(Phase::Green).unwrap().is_empty());
        assert_eq!(l.vehicle_count(), 0);
    }

    /// `append`/`tick` never let two vehicles reach the same position, so
    /// this corrupts the lane's private state directly to exercise the
    /// defensive check in `advance` for the invariant it guards.
    #[test]
    fn advance_rejects_two_vehicles_landing_on_the_same_cell() {
        let mut l = Lane::new(LaneId(1), "test", 5, 1);
        l.vehicles.insert(1, Vehicle::new(1, 2));
        l.vehicles.insert(2, Vehicle::new(2, 2));
        l.cells[2] = Some(1);

        let mut events = Vec::new();
        l.advance(1, &mut events).unwrap();
        let err = l.advance(2, &mut events).unwrap_err();
        assert_eq!(err, SimError::CellCollision { lane_id: LaneId(1), position: 1 });
    }
}
