//! Domain types: traffic signals, driving actions, sensor readings, and the
//! discrete learning state.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Traffic light color at the agent's intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrafficLight {
    Red,
    Green,
}

impl fmt::Display for TrafficLight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrafficLight::Red => write!(f, "red"),
            TrafficLight::Green => write!(f, "green"),
        }
    }
}

/// One of the four driving actions.
///
/// `Idle` doubles as the "no waypoint" direction reported by the route
/// planner once the destination is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Idle,
    Forward,
    Left,
    Right,
}

/// Fixed iteration order for the action set.
///
/// Greedy selection and exploration both walk this order, so tie-breaks are
/// deterministic given the table state.
pub const ACTIONS: [Action; 4] = [Action::Idle, Action::Forward, Action::Left, Action::Right];

impl Action {
    /// Index of this action within [`ACTIONS`].
    pub fn index(self) -> usize {
        match self {
            Action::Idle => 0,
            Action::Forward => 1,
            Action::Left => 2,
            Action::Right => 3,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Idle => write!(f, "idle"),
            Action::Forward => write!(f, "forward"),
            Action::Left => write!(f, "left"),
            Action::Right => write!(f, "right"),
        }
    }
}

/// Raw environment observation for one step.
///
/// `oncoming`, `left`, and `right` report whether a vehicle occupies the
/// corresponding relative lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorReading {
    pub light: TrafficLight,
    pub oncoming: bool,
    pub left: bool,
    pub right: bool,
}

/// The discrete learning state: a deliberately lossy abstraction of the full
/// observation.
///
/// Two observations that collapse to the same tuple are the same state for
/// learning purposes. Cross-traffic details beyond the opposing-conflict flag
/// are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DriveState {
    pub light: TrafficLight,
    pub opposing: bool,
    pub waypoint: Action,
}

impl DriveState {
    /// Abstract a raw reading into the discrete state key. Pure.
    ///
    /// The opposing flag is set only when the route wants the agent straight
    /// through and the oncoming lane is occupied. Turning waypoints never
    /// report a conflict; this mirrors only the forward-vs-oncoming check and
    /// is a documented limitation, not a general conflict detector.
    pub fn observe(reading: SensorReading, waypoint: Action) -> Self {
        let opposing = waypoint == Action::Forward && reading.oncoming;
        DriveState {
            light: reading.light,
            opposing,
            waypoint,
        }
    }
}

impl fmt::Display for DriveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.light, self.opposing, self.waypoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(light: TrafficLight, oncoming: bool, left: bool, right: bool) -> SensorReading {
        SensorReading {
            light,
            oncoming,
            left,
            right,
        }
    }

    #[test]
    fn forward_waypoint_flags_oncoming_conflict() {
        let state = DriveState::observe(
            reading(TrafficLight::Green, true, false, false),
            Action::Forward,
        );
        assert!(state.opposing);

        let clear = DriveState::observe(
            reading(TrafficLight::Green, false, true, true),
            Action::Forward,
        );
        assert!(!clear.opposing);
    }

    #[test]
    fn cross_turn_waypoints_never_report_conflict() {
        // Known limitation: only the forward/oncoming pairing is checked.
        for waypoint in [Action::Left, Action::Right, Action::Idle] {
            let state =
                DriveState::observe(reading(TrafficLight::Red, true, true, true), waypoint);
            assert!(!state.opposing, "no conflict expected for {waypoint}");
        }
    }

    #[test]
    fn equal_tuples_are_the_same_state() {
        let a = DriveState::observe(
            reading(TrafficLight::Red, false, true, false),
            Action::Left,
        );
        let b = DriveState::observe(
            reading(TrafficLight::Red, false, false, true),
            Action::Left,
        );
        assert_eq!(a, b);
    }

    #[test]
    fn action_index_matches_iteration_order() {
        for (i, action) in ACTIONS.iter().enumerate() {
            assert_eq!(action.index(), i);
        }
    }
}
