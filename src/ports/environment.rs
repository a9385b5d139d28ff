//! Environment port - the collaborator contract of the traffic simulation
//!
//! The grid world, its traffic dynamics, and the route planner are external
//! collaborators. The learning core only consumes this interface: sensed
//! inputs in, actions out, rewards and deadlines back.

use crate::{
    Result,
    types::{Action, SensorReading},
};

/// Contract between the learning core and the traffic simulation.
///
/// The per-step protocol is fixed: query `next_waypoint` once, `sense`, decide,
/// `act` exactly once, then `sense` again to observe the consequence. `sense`
/// must be idempotent relative to the same unresolved action - two calls with
/// no intervening `act` return the same reading.
///
/// Trip termination (destination reached or deadline expired) is owned by the
/// environment, not the agent; the driver polls `trip_over` between steps.
pub trait Environment {
    /// Reset the world for a fresh trip: new start, destination, and deadline.
    ///
    /// # Errors
    ///
    /// Returns an error if the simulation cannot set up a trip; the trial
    /// aborts, there is no retry.
    fn begin_trip(&mut self) -> Result<()>;

    /// Route hint for the current step, from the external planner.
    ///
    /// Reports [`Action::Idle`] once the destination is reached.
    fn next_waypoint(&self) -> Action;

    /// Observe the intersection: light color and relative traffic occupancy.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::SensorContract`] if the reading cannot be
    /// produced; this is a collaborator-contract violation and is fatal to
    /// the trial.
    fn sense(&self) -> Result<SensorReading>;

    /// Execute exactly one action and return its immediate scalar reward.
    ///
    /// Must be called at most once per step. Action execution is never
    /// retried; each step commits one action and one reward.
    ///
    /// # Errors
    ///
    /// Returns an error if the simulation faults while executing; fatal to
    /// the trial.
    fn act(&mut self, action: Action) -> Result<f64>;

    /// Remaining steps before the trip is considered failed. Informational.
    fn deadline(&self) -> i32;

    /// Whether the current trip has ended (destination or deadline).
    fn trip_over(&self) -> bool;
}
