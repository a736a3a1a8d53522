//! # System — Per-Frame Logic Routed by Signature
//!
//! A system declares the components it needs as a [`Signature`] when it is
//! registered. The [`SystemRegistry`] keeps, for every system, the set of live
//! entities whose signature is a superset of that requirement, and refreshes
//! those sets every time an entity gains or loses a component.
//!
//! ## Dispatch
//!
//! [`World::update`](super::world::World::update) runs every system once, in
//! registration order, handing it a snapshot of its matched entities. While a
//! system runs it is taken out of the registry, so it gets `&mut World` with no
//! aliasing. It may touch any entity, including ones outside its matched set.
//! Membership changes it causes apply to the live sets immediately but not to
//! the snapshot it is iterating, so a system that destroys entities should
//! check [`World::is_alive`](super::world::World::is_alive) before using one.

use std::collections::BTreeSet;

use super::entity::Entity;
use super::signature::Signature;
use super::world::World;

/// Logic that runs once per frame over the entities matching its signature.
///
/// Any `FnMut(&mut World, &[Entity], f32)` is a `System`, so closures and plain
/// functions work directly.
pub trait System: 'static {
    fn update(&mut self, world: &mut World, entities: &[Entity], dt: f32);
}

impl<F: FnMut(&mut World, &[Entity], f32) + 'static> System for F {
    fn update(&mut self, world: &mut World, entities: &[Entity], dt: f32) {
        (self)(world, entities, dt);
    }
}

struct SystemEntry {
    name: String,
    signature: Signature,
    entities: BTreeSet<Entity>,
    /// `None` only while the system is running.
    system: Option<Box<dyn System>>,
}

/// Per-system timing recorded during the last dispatch.
#[cfg(feature = "diagnostics")]
#[derive(Debug, Clone)]
pub struct SystemTiming {
    pub name: String,
    pub duration_us: f64,
}

/// Registered systems in dispatch order, with their matched entity sets.
pub struct SystemRegistry {
    entries: Vec<SystemEntry>,
    #[cfg(feature = "diagnostics")]
    pub(crate) timings: Vec<SystemTiming>,
}

impl SystemRegistry {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            #[cfg(feature = "diagnostics")]
            timings: Vec::new(),
        }
    }

    /// Append a system. Returns its dispatch index.
    pub(crate) fn register(
        &mut self,
        name: &str,
        signature: Signature,
        system: Box<dyn System>,
        existing: impl Iterator<Item = (Entity, Signature)>,
    ) -> usize {
        let entities = existing
            .filter(|(_, sig)| sig.matches(signature))
            .map(|(e, _)| e)
            .collect();
        self.entries.push(SystemEntry {
            name: name.to_string(),
            signature,
            entities,
            system: Some(system),
        });
        self.entries.len() - 1
    }

    /// Re-evaluate membership of `entity` in every system.
    pub(crate) fn entity_signature_changed(&mut self, entity: Entity, signature: Signature) {
        for entry in &mut self.entries {
            if signature.matches(entry.signature) {
                entry.entities.insert(entity);
            } else {
                entry.entities.remove(&entity);
            }
        }
    }

    pub(crate) fn entity_destroyed(&mut self, entity: Entity) {
        for entry in &mut self.entries {
            entry.entities.remove(&entity);
        }
    }

    pub(crate) fn clear_entities(&mut self) {
        for entry in &mut self.entries {
            entry.entities.clear();
        }
    }

    /// Take system `index` out for running, with a snapshot of its entities.
    pub(crate) fn take(&mut self, index: usize) -> Option<(Box<dyn System>, Vec<Entity>)> {
        let entry = self.entries.get_mut(index)?;
        let system = entry.system.take()?;
        Some((system, entry.entities.iter().copied().collect()))
    }

    pub(crate) fn restore(&mut self, index: usize, system: Box<dyn System>) {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.system = Some(system);
        }
    }

    /// Entities currently matched by the system with this name.
    pub fn entities_of(&self, name: &str) -> Option<&BTreeSet<Entity>> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| &e.entities)
    }

    pub fn signature_of(&self, name: &str) -> Option<Signature> {
        self.entries.iter().find(|e| e.name == name).map(|e| e.signature)
    }

    pub(crate) fn name_at(&self, index: usize) -> &str {
        &self.entries[index].name
    }

    /// `(name, matched entity count)` in dispatch order.
    pub fn summary(&self) -> Vec<(String, usize)> {
        self.entries
            .iter()
            .map(|e| (e.name.clone(), e.entities.len()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Timings from the most recent [`World::update`](super::world::World::update).
    #[cfg(feature = "diagnostics")]
    pub fn timings(&self) -> &[SystemTiming] {
        &self.timings
    }
}

impl Default for SystemRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &mut World, _: &[Entity], _: f32) {}

    #[test]
    fn membership_tracks_signature() {
        let mut reg = SystemRegistry::new();
        let required = Signature::EMPTY.with(0).with(2);
        reg.register("movement", required, Box::new(noop), std::iter::empty());

        let e = Entity(5);
        reg.entity_signature_changed(e, Signature::EMPTY.with(0));
        assert!(reg.entities_of("movement").unwrap().is_empty());

        reg.entity_signature_changed(e, Signature::EMPTY.with(0).with(2).with(3));
        assert!(reg.entities_of("movement").unwrap().contains(&e));

        reg.entity_signature_changed(e, Signature::EMPTY.with(2));
        assert!(!reg.entities_of("movement").unwrap().contains(&e));
    }

    #[test]
    fn late_registration_sees_existing_entities() {
        let mut reg = SystemRegistry::new();
        let existing = vec![
            (Entity(0), Signature::EMPTY.with(1)),
            (Entity(1), Signature::EMPTY),
        ];
        reg.register("render", Signature::EMPTY.with(1), Box::new(noop), existing.into_iter());
        let matched: Vec<_> = reg.entities_of("render").unwrap().iter().copied().collect();
        assert_eq!(matched, vec![Entity(0)]);
    }

    #[test]
    fn take_and_restore() {
        let mut reg = SystemRegistry::new();
        reg.register("a", Signature::EMPTY, Box::new(noop), std::iter::empty());
        let (sys, _) = reg.take(0).unwrap();
        assert!(reg.take(0).is_none());
        reg.restore(0, sys);
        assert!(reg.take(0).is_some());
    }
}
