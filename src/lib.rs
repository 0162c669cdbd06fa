//! Needs Decay Simulation Engine Library
//!
//! Public API for the needs engine: periodically decaying per-entity
//! need values, threshold bands, and their gameplay effects.

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;

pub mod components;
pub mod config;
pub mod effects;
pub mod error;
pub mod output;
pub mod systems;

pub use components::*;
pub use config::Config;
pub use effects::{AlertOp, AlertSink, IncentiveModifier, IncentiveSink, MovementSpeedSink, SpeedModifiers};
pub use error::NeedsError;
pub use output::{snapshot, NeedsSnapshot};
pub use systems::update::{attach_needs, detach_needs, rejuvenate_needs, update_needs, EffectSinks};
pub use systems::{
    apply_mutation, examine_lines, modify_need, set_need, set_need_to_band, ExamineContext,
};

/// Seeded random number generator resource
#[derive(Resource)]
pub struct SimRng(pub SmallRng);

/// Simulation clock resource. Time is seconds since simulation start;
/// the driver advances it before each schedule run.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct SimClock {
    now: f64,
    tick: u64,
}

impl SimClock {
    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Jump to an absolute time. Does not count a tick.
    pub fn set(&mut self, now: f64) {
        self.now = now;
    }

    pub fn advance(&mut self, delta_seconds: f64) {
        self.now += delta_seconds;
        self.tick += 1;
    }
}
