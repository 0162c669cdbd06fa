//! Query and Mutation API
//!
//! The operations gameplay code calls: read a level, change a level, snap
//! to a band boundary. Mutations run the same band-change cascade the tick
//! driver uses, synchronously, before returning. Missing resources are a
//! normal `false`/`None`, never an error.
//!
//! The per-resource wrappers exist because call sites overwhelmingly talk
//! about one concrete need; they are thin sugar over the generic ops.

use bevy_ecs::prelude::*;

use crate::components::{Band, Mutation, NeedKind, Needs};
use crate::systems::update::{refresh_if_changed, EffectSinks};

/// Modify a need by a (possibly negative) delta. Returns false when the
/// actor does not track the resource.
pub fn modify_need(
    entity: Entity,
    needs: &mut Needs,
    kind: NeedKind,
    amount: f32,
    sinks: &mut EffectSinks<'_>,
) -> bool {
    apply_mutation(entity, needs, kind, Mutation::Add(amount), sinks)
}

/// Set a need to an absolute value (clamped).
pub fn set_need(
    entity: Entity,
    needs: &mut Needs,
    kind: NeedKind,
    amount: f32,
    sinks: &mut EffectSinks<'_>,
) -> bool {
    apply_mutation(entity, needs, kind, Mutation::Set(amount), sinks)
}

/// Snap a need to a band's lower boundary.
pub fn set_need_to_band(
    entity: Entity,
    needs: &mut Needs,
    kind: NeedKind,
    band: Band,
    sinks: &mut EffectSinks<'_>,
) -> bool {
    apply_mutation(entity, needs, kind, Mutation::SetToBand(band), sinks)
}

/// Apply any mutation mode and run the refresh cascade inline if a band
/// moved, before returning to the caller.
pub fn apply_mutation(
    entity: Entity,
    needs: &mut Needs,
    kind: NeedKind,
    mutation: Mutation,
    sinks: &mut EffectSinks<'_>,
) -> bool {
    if !needs.mutate(kind, mutation) {
        return false;
    }
    refresh_if_changed(entity, needs, sinks);
    true
}

/// Per-resource convenience wrappers.
impl Needs {
    pub fn hunger(&self) -> Option<f32> {
        self.value(NeedKind::Hunger)
    }

    pub fn uses_hunger(&self) -> bool {
        self.has(NeedKind::Hunger)
    }

    pub fn hunger_band(&self) -> Option<Band> {
        self.band(NeedKind::Hunger)
    }

    pub fn hunger_threshold(&self, band: Band) -> Option<f32> {
        self.threshold_value(NeedKind::Hunger, band)
    }

    pub fn hunger_is_below(&self, band: Band) -> bool {
        self.is_below(NeedKind::Hunger, band)
    }

    pub fn hunger_icon(&self) -> Option<&str> {
        self.get(NeedKind::Hunger).and_then(|n| n.current_icon())
    }

    pub fn thirst(&self) -> Option<f32> {
        self.value(NeedKind::Thirst)
    }

    pub fn uses_thirst(&self) -> bool {
        self.has(NeedKind::Thirst)
    }

    pub fn thirst_band(&self) -> Option<Band> {
        self.band(NeedKind::Thirst)
    }

    pub fn thirst_threshold(&self, band: Band) -> Option<f32> {
        self.threshold_value(NeedKind::Thirst, band)
    }

    pub fn thirst_is_below(&self, band: Band) -> bool {
        self.is_below(NeedKind::Thirst, band)
    }

    pub fn thirst_icon(&self) -> Option<&str> {
        self.get(NeedKind::Thirst).and_then(|n| n.current_icon())
    }
}

/// Mutation wrappers for the two stock resources.
pub fn modify_hunger(
    entity: Entity,
    needs: &mut Needs,
    amount: f32,
    sinks: &mut EffectSinks<'_>,
) -> bool {
    modify_need(entity, needs, NeedKind::Hunger, amount, sinks)
}

pub fn set_hunger(
    entity: Entity,
    needs: &mut Needs,
    amount: f32,
    sinks: &mut EffectSinks<'_>,
) -> bool {
    set_need(entity, needs, NeedKind::Hunger, amount, sinks)
}

pub fn set_hunger_to_band(
    entity: Entity,
    needs: &mut Needs,
    band: Band,
    sinks: &mut EffectSinks<'_>,
) -> bool {
    set_need_to_band(entity, needs, NeedKind::Hunger, band, sinks)
}

pub fn modify_thirst(
    entity: Entity,
    needs: &mut Needs,
    amount: f32,
    sinks: &mut EffectSinks<'_>,
) -> bool {
    modify_need(entity, needs, NeedKind::Thirst, amount, sinks)
}

pub fn set_thirst(
    entity: Entity,
    needs: &mut Needs,
    amount: f32,
    sinks: &mut EffectSinks<'_>,
) -> bool {
    set_need(entity, needs, NeedKind::Thirst, amount, sinks)
}

pub fn set_thirst_to_band(
    entity: Entity,
    needs: &mut Needs,
    band: Band,
    sinks: &mut EffectSinks<'_>,
) -> bool {
    set_need_to_band(entity, needs, NeedKind::Thirst, band, sinks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::definition::test_fixtures::catalog_with_hunger;
    use crate::effects::{AlertSink, IncentiveSink, MovementSpeedSink};

    struct Fixture {
        entity: Entity,
        needs: Needs,
        speed: MovementSpeedSink,
        alerts: AlertSink,
        incentives: IncentiveSink,
    }

    impl Fixture {
        fn new() -> Self {
            let catalog = catalog_with_hunger();
            let mut needs = Needs::default();
            needs.load(&catalog, 0.0).unwrap();
            Self {
                entity: Entity::from_raw(7),
                needs,
                speed: MovementSpeedSink::new(),
                alerts: AlertSink::new(),
                incentives: IncentiveSink::new(),
            }
        }

        fn sinks(&mut self) -> EffectSinks<'_> {
            EffectSinks {
                speed: &mut self.speed,
                alerts: &mut self.alerts,
                incentives: &mut self.incentives,
            }
        }
    }

    #[test]
    fn test_mutation_cascades_inline() {
        let mut fx = Fixture::new();
        let entity = fx.entity;
        let mut needs = fx.needs.clone();
        // Starve straight into Critical; the cascade runs before the call
        // returns.
        assert!(modify_hunger(entity, &mut needs, -550.0, &mut fx.sinks()));
        assert_eq!(needs.hunger_band(), Some(Band::Critical));
        assert_eq!(fx.alerts.active_alert(entity, "hunger"), Some("Starving"));
        assert!((fx.speed.get(entity).walk - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_untracked_mutation_is_noop() {
        let mut fx = Fixture::new();
        let entity = fx.entity;
        let mut needs = fx.needs.clone();
        assert!(!modify_thirst(entity, &mut needs, -100.0, &mut fx.sinks()));
        assert!(fx.alerts.log.is_empty());
    }

    #[test]
    fn test_set_to_band_round_trip() {
        let mut fx = Fixture::new();
        let entity = fx.entity;
        let mut needs = fx.needs.clone();
        for band in Band::ALL {
            assert!(set_hunger_to_band(entity, &mut needs, band, &mut fx.sinks()));
            assert_eq!(needs.hunger_band(), Some(band));
        }
    }

    #[test]
    fn test_query_wrappers() {
        let fx = Fixture::new();
        assert!(fx.needs.uses_hunger());
        assert!(!fx.needs.uses_thirst());
        assert_eq!(fx.needs.hunger(), Some(600.0));
        assert_eq!(fx.needs.thirst(), None);
        assert_eq!(fx.needs.hunger_band(), Some(Band::ExtraSatisfied));
        assert_eq!(fx.needs.hunger_threshold(Band::Satisfied), Some(400.0));
        assert!(!fx.needs.hunger_is_below(Band::Satisfied));
        assert_eq!(fx.needs.hunger_icon(), Some("hunger-full"));
    }
}
