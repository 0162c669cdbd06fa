//! ECS Components
//!
//! Definitions, instances, and the per-actor ensemble for the needs engine.

pub mod debuff;
pub mod definition;
pub mod ensemble;
pub mod instance;
pub mod need;

use bevy_ecs::prelude::*;

pub use debuff::{DebuffState, DebuffTimer};
pub use definition::{BandProfile, BandTable, NeedCatalog, NeedDefinition, SlowdownSpec};
pub use ensemble::{Mutation, Needs};
pub use instance::{BandChange, NeedInstance};
pub use need::{Band, ExamineVisibility, NeedKind};

/// Marker for actors currently asleep; sleepers are protected from decaying
/// into the Critical band.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Sleeping;
