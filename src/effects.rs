//! Side-Effect Sinks
//!
//! The engine never owns movement speed, alerts, or incentive payouts; it
//! computes contributions and hands them to these explicitly injected
//! resources. Each sink keeps the latest value per actor plus an operation
//! log so collaborators (and tests) can observe delivery order.

use std::collections::{HashMap, HashSet};

use bevy_ecs::prelude::*;

/// Movement-speed accumulator. Contributions compose multiplicatively;
/// that composition is this struct's contract, not the contributors'.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedModifiers {
    pub walk: f32,
    pub sprint: f32,
}

impl Default for SpeedModifiers {
    fn default() -> Self {
        Self { walk: 1.0, sprint: 1.0 }
    }
}

impl SpeedModifiers {
    pub fn modify(&mut self, walk: f32, sprint: f32) {
        self.walk *= walk;
        self.sprint *= sprint;
    }
}

/// Incentive accumulator: a multiplier/flat pair applied to an external
/// reward system. Multipliers compose multiplicatively, flats add.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IncentiveModifier {
    pub multiplier: f32,
    pub flat: f32,
}

impl Default for IncentiveModifier {
    fn default() -> Self {
        Self { multiplier: 1.0, flat: 0.0 }
    }
}

impl IncentiveModifier {
    pub fn modify(&mut self, multiplier: f32, flat: f32) {
        self.multiplier *= multiplier;
        self.flat += flat;
    }
}

/// Latest movement-speed modifiers per actor.
#[derive(Resource, Debug, Default)]
pub struct MovementSpeedSink {
    current: HashMap<Entity, SpeedModifiers>,
}

impl MovementSpeedSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, entity: Entity, modifiers: SpeedModifiers) {
        self.current.insert(entity, modifiers);
    }

    /// Unmodified speed for actors nothing has touched.
    pub fn get(&self, entity: Entity) -> SpeedModifiers {
        self.current.get(&entity).copied().unwrap_or_default()
    }

    pub fn remove(&mut self, entity: Entity) {
        self.current.remove(&entity);
    }
}

/// Latest incentive modifiers per actor.
#[derive(Resource, Debug, Default)]
pub struct IncentiveSink {
    current: HashMap<Entity, IncentiveModifier>,
}

impl IncentiveSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, entity: Entity, modifier: IncentiveModifier) {
        self.current.insert(entity, modifier);
    }

    pub fn get(&self, entity: Entity) -> IncentiveModifier {
        self.current.get(&entity).copied().unwrap_or_default()
    }

    pub fn remove(&mut self, entity: Entity) {
        self.current.remove(&entity);
    }
}

/// One observable alert operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertOp {
    Shown {
        entity: Entity,
        category: String,
        alert: String,
    },
    Cleared {
        entity: Entity,
        category: String,
    },
}

/// Active alerts per (actor, category). Showing an alert replaces whatever
/// its category held; an alert that does not resolve clears the category
/// instead.
#[derive(Resource, Debug, Default)]
pub struct AlertSink {
    active: HashMap<(Entity, String), String>,
    /// Registered alert ids. Empty set registered means "resolve nothing";
    /// `None` means no registry, every alert resolves.
    known: Option<HashSet<String>>,
    pub log: Vec<AlertOp>,
}

impl AlertSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict resolution to a known id set, like a prototype registry.
    pub fn with_known(ids: impl IntoIterator<Item = String>) -> Self {
        Self {
            active: HashMap::new(),
            known: Some(ids.into_iter().collect()),
            log: Vec::new(),
        }
    }

    fn resolves(&self, alert: &str) -> bool {
        match &self.known {
            Some(known) => known.contains(alert),
            None => true,
        }
    }

    /// Show `alert` in `category`, or clear the category if the alert does
    /// not resolve.
    pub fn show(&mut self, entity: Entity, category: &str, alert: &str) {
        if !self.resolves(alert) {
            self.clear_category(entity, category);
            return;
        }
        let key = (entity, category.to_string());
        let replaced = self.active.insert(key, alert.to_string());
        if replaced.as_deref() != Some(alert) {
            self.log.push(AlertOp::Shown {
                entity,
                category: category.to_string(),
                alert: alert.to_string(),
            });
        }
    }

    pub fn clear_category(&mut self, entity: Entity, category: &str) {
        let key = (entity, category.to_string());
        if self.active.remove(&key).is_some() {
            self.log.push(AlertOp::Cleared {
                entity,
                category: category.to_string(),
            });
        }
    }

    pub fn active_alert(&self, entity: Entity, category: &str) -> Option<&str> {
        self.active
            .get(&(entity, category.to_string()))
            .map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_composition_is_multiplicative() {
        let mut speed = SpeedModifiers::default();
        speed.modify(0.9, 0.9);
        speed.modify(0.8, 0.8);
        assert!((speed.walk - 0.72).abs() < 1e-6);
        assert!((speed.sprint - 0.72).abs() < 1e-6);
    }

    #[test]
    fn test_incentive_composition() {
        let mut incentive = IncentiveModifier::default();
        incentive.modify(1.1, 0.0);
        incentive.modify(0.9, 5.0);
        assert!((incentive.multiplier - 0.99).abs() < 1e-6);
        assert!((incentive.flat - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_alert_replaces_within_category() {
        let mut sink = AlertSink::new();
        let entity = Entity::from_raw(1);
        sink.show(entity, "hunger", "Hungry");
        sink.show(entity, "hunger", "Starving");
        assert_eq!(sink.active_alert(entity, "hunger"), Some("Starving"));
        assert_eq!(sink.log.len(), 2);
        // Re-showing the same alert is not logged again.
        sink.show(entity, "hunger", "Starving");
        assert_eq!(sink.log.len(), 2);
    }

    #[test]
    fn test_unresolvable_alert_clears_category() {
        let mut sink = AlertSink::with_known(["Hungry".to_string()]);
        let entity = Entity::from_raw(2);
        sink.show(entity, "hunger", "Hungry");
        assert_eq!(sink.active_alert(entity, "hunger"), Some("Hungry"));
        sink.show(entity, "hunger", "NoSuchAlert");
        assert_eq!(sink.active_alert(entity, "hunger"), None);
        assert!(matches!(sink.log.last(), Some(AlertOp::Cleared { .. })));
    }
}
