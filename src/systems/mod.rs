//! ECS Systems
//!
//! The tick driver, the query/mutation API, and examine-text generation.

pub mod api;
pub mod examine;
pub mod update;

pub use api::{
    apply_mutation, modify_hunger, modify_need, modify_thirst, set_hunger, set_hunger_to_band,
    set_need, set_need_to_band, set_thirst, set_thirst_to_band,
};
pub use examine::{examine_lines, humanize_seconds, ExamineContext};
pub use update::{
    attach_needs, detach_needs, refresh_ensemble, refresh_if_changed, rejuvenate_needs,
    update_needs, EffectSinks,
};
