//! Reference grid-world environment.
//!
//! A deliberately small stand-in for the real traffic simulation: enough
//! dynamics to honor the environment contract so the sweep can run end to
//! end. A trip is a route of random legs; the light and cross-traffic re-roll
//! after every executed action, and the deadline counts down once per action.

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    Result,
    ports::Environment,
    types::{Action, SensorReading, TrafficLight},
};

const REWARD_ILLEGAL: f64 = -1.0;
const REWARD_IDLE: f64 = 0.0;
const REWARD_OFF_ROUTE: f64 = -0.5;
const REWARD_ON_ROUTE: f64 = 2.0;
const REWARD_ARRIVAL_BONUS: f64 = 10.0;

/// Steps allowed per route leg.
const DEADLINE_PER_LEG: i32 = 5;

/// Probability that a given relative lane is occupied.
const TRAFFIC_DENSITY: f64 = 0.3;

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Minimal traffic world implementing the environment contract.
///
/// Deterministic under a seed: the same seed and action sequence reproduce
/// the same readings and rewards.
#[derive(Debug)]
pub struct GridWorld {
    rng: StdRng,
    reading: SensorReading,
    waypoint: Action,
    legs_remaining: usize,
    deadline: i32,
    arrived: bool,
}

impl GridWorld {
    /// Create a world; seed it for reproducible trips.
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            rng: build_rng(seed),
            reading: SensorReading {
                light: TrafficLight::Red,
                oncoming: false,
                left: false,
                right: false,
            },
            waypoint: Action::Idle,
            legs_remaining: 0,
            deadline: 0,
            arrived: true,
        }
    }

    fn roll_intersection(&mut self) {
        self.reading = SensorReading {
            light: if self.rng.random_bool(0.5) {
                TrafficLight::Red
            } else {
                TrafficLight::Green
            },
            oncoming: self.rng.random_bool(TRAFFIC_DENSITY),
            left: self.rng.random_bool(TRAFFIC_DENSITY),
            right: self.rng.random_bool(TRAFFIC_DENSITY),
        };
    }

    fn roll_waypoint(&mut self) {
        self.waypoint = match self.rng.random_range(0..3) {
            0 => Action::Forward,
            1 => Action::Left,
            _ => Action::Right,
        };
    }

    /// Right turns are allowed on red; everything else needs green, and left
    /// turns additionally need a clear oncoming lane.
    fn is_legal(&self, action: Action) -> bool {
        match (self.reading.light, action) {
            (_, Action::Idle) => true,
            (TrafficLight::Red, Action::Right) => true,
            (TrafficLight::Red, _) => false,
            (TrafficLight::Green, Action::Left) => !self.reading.oncoming,
            (TrafficLight::Green, _) => true,
        }
    }
}

impl Environment for GridWorld {
    fn begin_trip(&mut self) -> Result<()> {
        self.legs_remaining = self.rng.random_range(5..25);
        self.deadline = self.legs_remaining as i32 * DEADLINE_PER_LEG;
        self.arrived = false;
        self.roll_intersection();
        self.roll_waypoint();
        Ok(())
    }

    fn next_waypoint(&self) -> Action {
        if self.arrived { Action::Idle } else { self.waypoint }
    }

    fn sense(&self) -> Result<SensorReading> {
        Ok(self.reading)
    }

    fn act(&mut self, action: Action) -> Result<f64> {
        let reward = if action == Action::Idle {
            REWARD_IDLE
        } else if !self.is_legal(action) {
            REWARD_ILLEGAL
        } else if action == self.waypoint {
            self.legs_remaining -= 1;
            if self.legs_remaining == 0 {
                self.arrived = true;
                REWARD_ON_ROUTE + REWARD_ARRIVAL_BONUS
            } else {
                self.roll_waypoint();
                REWARD_ON_ROUTE
            }
        } else {
            REWARD_OFF_ROUTE
        };

        self.deadline -= 1;
        self.roll_intersection();

        Ok(reward)
    }

    fn deadline(&self) -> i32 {
        self.deadline
    }

    fn trip_over(&self) -> bool {
        self.arrived || self.deadline <= 0
    }
}
