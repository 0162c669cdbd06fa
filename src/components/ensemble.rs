//! Needs Ensemble
//!
//! The set of need instances attached to one simulated actor, plus the
//! scheduling metadata the tick driver reads. This is the one ECS component
//! this crate owns; everything else hangs off resources.

use std::collections::HashMap;

use bevy_ecs::prelude::*;
use tracing::warn;

use crate::components::definition::NeedCatalog;
use crate::components::instance::NeedInstance;
use crate::components::need::{Band, ExamineVisibility, NeedKind};

/// How a mutation call changes a need's value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mutation {
    /// Add a (possibly negative) delta.
    Add(f32),
    /// Set an absolute value.
    Set(f32),
    /// Snap to a band's lower boundary.
    SetToBand(Band),
}

/// Per-actor container of need instances.
#[derive(Component, Debug, Clone)]
pub struct Needs {
    needs: HashMap<NeedKind, NeedInstance>,
    /// False until the first load completes; the tick driver and queries
    /// stay away until then.
    ready: bool,
    /// Catalog ids this actor tracks, set per actor template.
    need_ids: Vec<String>,
    visibility: HashMap<NeedKind, ExamineVisibility>,
    /// Shortest per-instance cadence; all instances decay at this
    /// granularity.
    min_update_interval: f32,
    /// Next time the tick driver touches this ensemble.
    pub next_update: f64,
}

impl Default for Needs {
    fn default() -> Self {
        Self::new(
            vec!["hunger".into(), "thirst".into()],
            HashMap::from([
                (NeedKind::Hunger, ExamineVisibility::OwnerOnly),
                (NeedKind::Thirst, ExamineVisibility::OwnerOnly),
            ]),
        )
    }
}

impl Needs {
    pub fn new(need_ids: Vec<String>, visibility: HashMap<NeedKind, ExamineVisibility>) -> Self {
        Self {
            needs: HashMap::new(),
            ready: false,
            need_ids,
            visibility,
            min_update_interval: 0.0,
            next_update: 0.0,
        }
    }

    /// (Re)populate every instance from the configured id list, discarding
    /// prior instances. Ids that fail to resolve against the catalog are
    /// skipped with a warning; a fatal instance-construction error aborts
    /// this actor's setup.
    pub fn load(&mut self, catalog: &NeedCatalog, now: f64) -> Result<(), crate::NeedsError> {
        self.needs.clear();
        self.ready = false;
        for id in &self.need_ids {
            let Some(def) = catalog.need(id) else {
                warn!(need = %id, "need id not found in catalog, skipping");
                continue;
            };
            let instance = NeedInstance::new(def, catalog, now)?;
            self.needs.insert(instance.kind(), instance);
        }
        self.recompute_schedule(now);
        self.ready = true;
        Ok(())
    }

    /// Cache the shortest cadence and reset the global deadline.
    fn recompute_schedule(&mut self, now: f64) {
        let mut shortest = f32::MAX;
        for need in self.needs.values() {
            if need.update_interval() < shortest {
                shortest = need.update_interval();
            }
        }
        self.min_update_interval = if shortest == f32::MAX { 0.0 } else { shortest };
        self.next_update = now + self.min_update_interval as f64;
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn is_empty(&self) -> bool {
        self.needs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.needs.len()
    }

    pub fn min_update_interval(&self) -> f32 {
        self.min_update_interval
    }

    /// Whether the tick driver should touch this ensemble now.
    pub fn due(&self, now: f64) -> bool {
        self.ready && !self.needs.is_empty() && now >= self.next_update
    }

    pub fn get(&self, kind: NeedKind) -> Option<&NeedInstance> {
        self.needs.get(&kind)
    }

    pub fn get_mut(&mut self, kind: NeedKind) -> Option<&mut NeedInstance> {
        self.needs.get_mut(&kind)
    }

    /// Does this actor track the resource at all? Absence is expected, not
    /// an error.
    pub fn has(&self, kind: NeedKind) -> bool {
        self.needs.contains_key(&kind)
    }

    pub fn value(&self, kind: NeedKind) -> Option<f32> {
        self.needs.get(&kind).map(|n| n.value())
    }

    pub fn band(&self, kind: NeedKind) -> Option<Band> {
        self.needs.get(&kind).map(|n| n.band())
    }

    pub fn threshold_value(&self, kind: NeedKind, band: Band) -> Option<f32> {
        self.needs.get(&kind).map(|n| n.threshold_value(band))
    }

    /// False when the resource is untracked, matching the query contract.
    pub fn is_below(&self, kind: NeedKind, band: Band) -> bool {
        self.needs
            .get(&kind)
            .map(|n| n.is_below(band))
            .unwrap_or(false)
    }

    /// Apply a mutation to one need. Returns false, a normal no-op, when
    /// the actor does not track the resource. The caller owns the
    /// band-change refresh cascade.
    pub fn mutate(&mut self, kind: NeedKind, mutation: Mutation) -> bool {
        let Some(need) = self.needs.get_mut(&kind) else {
            return false;
        };
        match mutation {
            Mutation::Add(amount) => need.modify(amount),
            Mutation::Set(amount) => need.set_value(amount),
            Mutation::SetToBand(band) => need.set_to_band(band),
        }
        true
    }

    /// Recompute every instance's band; true if any changed.
    pub fn recompute_bands(&mut self) -> bool {
        let mut changed = false;
        for need in self.needs.values_mut() {
            changed |= need.recompute_band().changed();
        }
        changed
    }

    pub fn visibility(&self, kind: NeedKind) -> ExamineVisibility {
        self.visibility
            .get(&kind)
            .copied()
            .unwrap_or(ExamineVisibility::Hidden)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NeedInstance> {
        self.needs.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut NeedInstance> {
        self.needs.values_mut()
    }

    /// Drain queued debuff messages from every need.
    pub fn drain_debuff_messages(&mut self) -> Vec<String> {
        let mut messages = Vec::new();
        for need in self.needs.values_mut() {
            messages.extend(need.debuff_mut().drain_messages());
        }
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::definition::test_fixtures::catalog_with_hunger;

    #[test]
    fn test_load_skips_unresolvable_ids() {
        // Catalog only knows "hunger"; "thirst" is skipped with a warning.
        let catalog = catalog_with_hunger();
        let mut needs = Needs::default();
        assert!(!needs.is_ready());

        needs.load(&catalog, 0.0).unwrap();
        assert!(needs.is_ready());
        assert_eq!(needs.len(), 1);
        assert!(needs.has(NeedKind::Hunger));
        assert!(!needs.has(NeedKind::Thirst));
    }

    #[test]
    fn test_untracked_resource_is_absence_not_error() {
        let catalog = catalog_with_hunger();
        let mut needs = Needs::default();
        needs.load(&catalog, 0.0).unwrap();

        assert_eq!(needs.value(NeedKind::Thirst), None);
        assert_eq!(needs.band(NeedKind::Thirst), None);
        assert!(!needs.is_below(NeedKind::Thirst, Band::Low));
        assert!(!needs.mutate(NeedKind::Thirst, Mutation::Add(10.0)));
    }

    #[test]
    fn test_reload_discards_prior_state() {
        let catalog = catalog_with_hunger();
        let mut needs = Needs::default();
        needs.load(&catalog, 0.0).unwrap();
        needs.mutate(NeedKind::Hunger, Mutation::Set(50.0));

        needs.load(&catalog, 100.0).unwrap();
        assert_eq!(needs.value(NeedKind::Hunger), Some(600.0));
        assert_eq!(needs.next_update, 101.0);
    }

    #[test]
    fn test_schedule_uses_shortest_cadence() {
        let mut catalog = catalog_with_hunger();
        let mut slow = crate::components::definition::test_fixtures::hunger_definition();
        slow.id = "slow-hunger".into();
        slow.seconds_per_update = 5.0;
        catalog.insert_need(slow);

        let mut needs = Needs::new(
            vec!["hunger".into(), "slow-hunger".into()],
            HashMap::new(),
        );
        needs.load(&catalog, 0.0).unwrap();
        // Same kind twice collapses to one instance per kind.
        assert_eq!(needs.len(), 1);

        let mut needs = Needs::new(vec!["slow-hunger".into()], HashMap::new());
        needs.load(&catalog, 0.0).unwrap();
        assert_eq!(needs.min_update_interval(), 5.0);
        assert_eq!(needs.next_update, 5.0);
    }

    #[test]
    fn test_mutation_modes() {
        let catalog = catalog_with_hunger();
        let mut needs = Needs::default();
        needs.load(&catalog, 0.0).unwrap();

        assert!(needs.mutate(NeedKind::Hunger, Mutation::Add(-200.0)));
        assert_eq!(needs.value(NeedKind::Hunger), Some(400.0));
        assert!(needs.mutate(NeedKind::Hunger, Mutation::Set(123.0)));
        assert_eq!(needs.value(NeedKind::Hunger), Some(123.0));
        assert!(needs.mutate(NeedKind::Hunger, Mutation::SetToBand(Band::Satisfied)));
        assert_eq!(needs.value(NeedKind::Hunger), Some(400.0));
        assert!(needs.recompute_bands());
    }
}
