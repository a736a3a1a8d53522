//! # World — The Central Container
//!
//! The [`World`] owns all entities, components, systems, and resources. It's
//! the single source of truth for the game state, and the only place that is
//! allowed to change an entity's signature.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │ World                                               │
//! │                                                     │
//! │  entities: EntityRegistry                           │
//! │    id allocation + one Signature per live entity    │
//! │                                                     │
//! │  components: ComponentRegistry                      │
//! │    TypeId → bit, one ComponentArray<T> per bit      │
//! │                                                     │
//! │  systems: SystemRegistry                            │
//! │    ordered systems + their matched entity sets      │
//! │                                                     │
//! │  resources: HashMap<TypeId, Box<dyn Any>>           │
//! │    singleton data not tied to an entity             │
//! │                                                     │
//! │  names / tags: entity metadata                      │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## Signature Sync
//!
//! `add_component` and `remove_component` update the component array, the
//! entity's signature bit, and every system's membership in one call. Nothing
//! else writes signatures, so "bit set" and "present in the array" can't drift.

use std::any::{Any, TypeId};
use std::collections::{BTreeSet, HashMap};

use super::component::{Component, ComponentArray, ComponentRegistry, short_type_name};
use super::entity::{Entity, EntityRegistry};
use super::signature::{ComponentId, Signature};
use super::system::{System, SystemRegistry};
use crate::error::{EngineError, EngineResult};

/// The central container for all game state.
pub struct World {
    entities: EntityRegistry,
    components: ComponentRegistry,
    systems: SystemRegistry,
    /// Global resources (singletons), keyed by TypeId.
    resources: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    /// Entity → display name (the scene `type`). Names need not be unique.
    names: HashMap<Entity, String>,
    /// Tag → entities carrying it.
    tags: HashMap<String, BTreeSet<Entity>>,
    /// Entity → its tags, in insertion order.
    entity_tags: HashMap<Entity, Vec<String>>,
    #[cfg(feature = "diagnostics")]
    created_this_frame: u32,
    #[cfg(feature = "diagnostics")]
    destroyed_this_frame: u32,
}

impl World {
    pub fn new() -> Self {
        Self::with_entity_capacity(super::entity::DEFAULT_MAX_ENTITIES)
    }

    /// A world that holds at most `max_entities` live entities.
    pub fn with_entity_capacity(max_entities: usize) -> Self {
        Self {
            entities: EntityRegistry::with_capacity(max_entities),
            components: ComponentRegistry::new(),
            systems: SystemRegistry::new(),
            resources: HashMap::new(),
            names: HashMap::new(),
            tags: HashMap::new(),
            entity_tags: HashMap::new(),
            #[cfg(feature = "diagnostics")]
            created_this_frame: 0,
            #[cfg(feature = "diagnostics")]
            destroyed_this_frame: 0,
        }
    }

    // ── Resources ────────────────────────────────────────────────────

    /// Insert a resource (singleton value). Replaces any existing resource of
    /// the same type.
    pub fn insert_resource<T: 'static + Send + Sync>(&mut self, value: T) {
        self.resources.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Get a shared reference to a resource.
    ///
    /// # Panics
    ///
    /// Panics if the resource hasn't been inserted.
    pub fn resource<T: 'static + Send + Sync>(&self) -> &T {
        self.get_resource::<T>().unwrap_or_else(|| {
            panic!(
                "Resource `{}` not found. Did you forget to insert it?",
                std::any::type_name::<T>()
            )
        })
    }

    /// Get a mutable reference to a resource.
    ///
    /// # Panics
    ///
    /// Panics if the resource hasn't been inserted.
    pub fn resource_mut<T: 'static + Send + Sync>(&mut self) -> &mut T {
        self.get_resource_mut::<T>().unwrap_or_else(|| {
            panic!(
                "Resource `{}` not found. Did you forget to insert it?",
                std::any::type_name::<T>()
            )
        })
    }

    pub fn get_resource<T: 'static + Send + Sync>(&self) -> Option<&T> {
        self.resources
            .get(&TypeId::of::<T>())
            .and_then(|r| r.downcast_ref::<T>())
    }

    pub fn get_resource_mut<T: 'static + Send + Sync>(&mut self) -> Option<&mut T> {
        self.resources
            .get_mut(&TypeId::of::<T>())
            .and_then(|r| r.downcast_mut::<T>())
    }

    pub fn has_resource<T: 'static + Send + Sync>(&self) -> bool {
        self.resources.contains_key(&TypeId::of::<T>())
    }

    /// Remove a resource, taking ownership. Returns `None` if not present.
    ///
    /// Use this for the extract/reinsert pattern when a resource has to be
    /// borrowed alongside the world.
    pub fn resource_remove<T: 'static + Send + Sync>(&mut self) -> Option<T> {
        self.resources
            .remove(&TypeId::of::<T>())
            .and_then(|r| r.downcast::<T>().ok())
            .map(|b| *b)
    }

    // ── Component Types ──────────────────────────────────────────────

    /// Register a component type, assigning it a signature bit. Idempotent.
    pub fn register_component<T: Component>(&mut self) -> EngineResult<ComponentId> {
        self.components.register::<T>()
    }

    pub fn component_id<T: Component>(&self) -> EngineResult<ComponentId> {
        self.components.id_of::<T>()
    }

    pub fn is_component_registered<T: Component>(&self) -> bool {
        self.components.is_registered::<T>()
    }

    /// Signature required by a tuple of component types, e.g.
    /// `world.signature_for::<(Transform, ParticleEmitter)>()`.
    pub fn signature_for<S: ComponentSet>(&self) -> EngineResult<Signature> {
        S::signature(self)
    }

    /// Short name of the component type occupying `id`.
    pub fn component_name(&self, id: ComponentId) -> &'static str {
        self.components.name_of(id)
    }

    /// `(type name, stored count)` for every registered component type.
    pub fn component_counts(&self) -> Vec<(&'static str, usize)> {
        self.components.lengths()
    }

    // ── Entity Management ────────────────────────────────────────────

    /// Create an entity with an empty signature.
    pub fn create_entity(&mut self) -> EngineResult<Entity> {
        let entity = self.entities.create()?;
        #[cfg(feature = "diagnostics")]
        {
            self.created_this_frame += 1;
        }
        Ok(entity)
    }

    /// Destroy an entity: purge its components, name, and tags, drop it from
    /// every system, and free its id.
    pub fn destroy_entity(&mut self, entity: Entity) -> EngineResult<()> {
        if !self.entities.is_alive(entity) {
            return Err(EngineError::UnknownEntity(entity));
        }

        self.components.entity_destroyed(entity);
        self.systems.entity_destroyed(entity);
        self.names.remove(&entity);
        if let Some(tags) = self.entity_tags.remove(&entity) {
            for tag in tags {
                if let Some(set) = self.tags.get_mut(&tag) {
                    set.remove(&entity);
                    if set.is_empty() {
                        self.tags.remove(&tag);
                    }
                }
            }
        }

        self.entities.destroy(entity)?;
        #[cfg(feature = "diagnostics")]
        {
            self.destroyed_this_frame += 1;
        }
        Ok(())
    }

    /// Destroy every live entity.
    pub fn clear_entities(&mut self) {
        let all: Vec<Entity> = self.entities.iter().collect();
        for entity in all {
            // Every id came from the live iterator, so this cannot miss.
            let _ = self.destroy_entity(entity);
        }
        self.systems.clear_entities();
        self.names.clear();
        self.tags.clear();
        self.entity_tags.clear();
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.alive_count()
    }

    /// Live entities in ascending id order.
    pub fn living_entities(&self) -> Vec<Entity> {
        self.entities.iter().collect()
    }

    pub fn signature_of(&self, entity: Entity) -> Option<Signature> {
        self.entities.signature(entity)
    }

    pub fn entity_registry(&self) -> &EntityRegistry {
        &self.entities
    }

    /// Return and reset `(created, destroyed)` counts since the last call.
    #[cfg(feature = "diagnostics")]
    pub(crate) fn take_frame_counters(&mut self) -> (u32, u32) {
        let counts = (self.created_this_frame, self.destroyed_this_frame);
        self.created_this_frame = 0;
        self.destroyed_this_frame = 0;
        counts
    }

    // ── Components ───────────────────────────────────────────────────

    /// Attach `value` to `entity`, overwriting any existing `T`.
    pub fn add_component<T: Component>(&mut self, entity: Entity, value: T) -> EngineResult<()> {
        let id = self.components.id_of::<T>()?;
        let mut signature = self
            .entities
            .signature(entity)
            .ok_or(EngineError::UnknownEntity(entity))?;

        if self.components.array_mut::<T>()?.insert(entity, value).is_some() {
            log::debug!(
                "Entity {entity} already had {}; overwritten",
                short_type_name(std::any::type_name::<T>())
            );
            return Ok(());
        }

        signature.set(id);
        self.entities.set_signature(entity, signature)?;
        self.systems.entity_signature_changed(entity, signature);
        Ok(())
    }

    /// Like [`add_component`](Self::add_component) but refuses to overwrite.
    pub fn add_unique_component<T: Component>(&mut self, entity: Entity, value: T) -> EngineResult<()> {
        if self.has_component::<T>(entity) {
            return Err(EngineError::DuplicateComponent {
                entity,
                component: short_type_name(std::any::type_name::<T>()),
            });
        }
        self.add_component(entity, value)
    }

    /// Detach and return the entity's `T`.
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> EngineResult<T> {
        let id = self.components.id_of::<T>()?;
        let mut signature = self
            .entities
            .signature(entity)
            .ok_or(EngineError::UnknownEntity(entity))?;

        let value = self
            .components
            .array_mut::<T>()?
            .remove(entity)
            .ok_or_else(|| missing::<T>(entity))?;

        signature.clear(id);
        self.entities.set_signature(entity, signature)?;
        self.systems.entity_signature_changed(entity, signature);
        Ok(value)
    }

    /// The entity's `T`, or `MissingComponent`.
    pub fn get_component<T: Component>(&self, entity: Entity) -> EngineResult<&T> {
        self.components
            .array::<T>()?
            .get(entity)
            .ok_or_else(|| missing::<T>(entity))
    }

    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> EngineResult<&mut T> {
        self.components
            .array_mut::<T>()?
            .get_mut(entity)
            .ok_or_else(|| missing::<T>(entity))
    }

    /// The entity's `T`, or `None` if it has none (or `T` isn't registered).
    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.get_component(entity).ok()
    }

    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.get_component_mut(entity).ok()
    }

    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        match (self.components.id_of::<T>(), self.entities.signature(entity)) {
            (Ok(id), Some(sig)) => sig.contains(id),
            _ => false,
        }
    }

    /// Direct access to the packed storage for `T`.
    pub fn components<T: Component>(&self) -> EngineResult<&ComponentArray<T>> {
        self.components.array::<T>()
    }

    pub fn components_mut<T: Component>(&mut self) -> EngineResult<&mut ComponentArray<T>> {
        self.components.array_mut::<T>()
    }

    // ── Names ────────────────────────────────────────────────────────

    pub fn set_entity_name(&mut self, entity: Entity, name: &str) -> EngineResult<()> {
        if !self.entities.is_alive(entity) {
            return Err(EngineError::UnknownEntity(entity));
        }
        self.names.insert(entity, name.to_string());
        Ok(())
    }

    pub fn entity_name(&self, entity: Entity) -> Option<&str> {
        self.names.get(&entity).map(String::as_str)
    }

    /// Lowest-id live entity with this name.
    pub fn find_by_name(&self, name: &str) -> Option<Entity> {
        self.names
            .iter()
            .filter(|(_, n)| n.as_str() == name)
            .map(|(&e, _)| e)
            .min()
    }

    // ── Tags ─────────────────────────────────────────────────────────

    /// Add a tag to an entity. An entity can have many tags and many entities
    /// can share one. Adding a tag the entity already has does nothing.
    pub fn add_tag(&mut self, entity: Entity, tag: &str) -> EngineResult<()> {
        if !self.entities.is_alive(entity) {
            return Err(EngineError::UnknownEntity(entity));
        }
        let list = self.entity_tags.entry(entity).or_default();
        if list.iter().any(|t| t == tag) {
            return Ok(());
        }
        list.push(tag.to_string());
        self.tags.entry(tag.to_string()).or_default().insert(entity);
        Ok(())
    }

    /// Tags on an entity, in the order they were added.
    pub fn tags_of(&self, entity: Entity) -> &[String] {
        self.entity_tags
            .get(&entity)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All entities with a given tag, ascending by id.
    pub fn tagged(&self, tag: &str) -> Vec<Entity> {
        self.tags
            .get(tag)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn has_tag(&self, entity: Entity, tag: &str) -> bool {
        self.tags.get(tag).is_some_and(|set| set.contains(&entity))
    }

    // ── Systems ──────────────────────────────────────────────────────

    /// Register a system that runs over entities matching `signature`.
    /// Entities that already match are picked up immediately.
    pub fn add_system<S: System>(&mut self, name: &str, signature: Signature, system: S) -> usize {
        let existing = self
            .entities
            .iter()
            .filter_map(|e| self.entities.signature(e).map(|sig| (e, sig)));
        let index = self.systems.register(name, signature, Box::new(system), existing);
        log::debug!("Registered system '{name}' with {signature:?}");
        index
    }

    pub fn systems(&self) -> &SystemRegistry {
        &self.systems
    }

    /// Run every system once, in registration order.
    pub fn update(&mut self, dt: f32) {
        #[cfg(feature = "diagnostics")]
        self.systems.timings.clear();

        for index in 0..self.systems.len() {
            let Some((mut system, entities)) = self.systems.take(index) else {
                continue;
            };

            #[cfg(feature = "diagnostics")]
            let start = std::time::Instant::now();

            system.update(self, &entities, dt);

            #[cfg(feature = "diagnostics")]
            {
                let name = self.systems.name_at(index).to_string();
                self.systems.timings.push(super::system::SystemTiming {
                    name,
                    duration_us: start.elapsed().as_secs_f64() * 1_000_000.0,
                });
            }

            self.systems.restore(index, system);
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

fn missing<T: Component>(entity: Entity) -> EngineError {
    EngineError::MissingComponent {
        entity,
        component: short_type_name(std::any::type_name::<T>()),
    }
}

// ── Component Sets ───────────────────────────────────────────────────

/// A tuple of component types, used to build a system's required signature.
pub trait ComponentSet {
    fn signature(world: &World) -> EngineResult<Signature>;
}

macro_rules! impl_component_set {
    ($($T:ident),+) => {
        impl<$($T: Component),+> ComponentSet for ($($T,)+) {
            fn signature(world: &World) -> EngineResult<Signature> {
                let mut signature = Signature::EMPTY;
                $(signature.set(world.component_id::<$T>()?);)+
                Ok(signature)
            }
        }
    };
}

impl_component_set!(A);
impl_component_set!(A, B);
impl_component_set!(A, B, C);
impl_component_set!(A, B, C, D);
impl_component_set!(A, B, C, D, E);
impl_component_set!(A, B, C, D, E, F);

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Debug, PartialEq)]
    struct Position {
        x: f32,
        y: f32,
    }
    #[derive(Debug, PartialEq)]
    struct Velocity {
        dx: f32,
        dy: f32,
    }
    struct Health(u32);

    fn world() -> World {
        let mut world = World::new();
        world.register_component::<Position>().unwrap();
        world.register_component::<Velocity>().unwrap();
        world.register_component::<Health>().unwrap();
        world
    }

    #[test]
    fn create_and_destroy() {
        let mut world = world();
        let e1 = world.create_entity().unwrap();
        let e2 = world.create_entity().unwrap();
        assert_eq!(world.entity_count(), 2);

        world.destroy_entity(e1).unwrap();
        assert_eq!(world.entity_count(), 1);
        assert!(!world.is_alive(e1));
        assert!(world.is_alive(e2));
        assert!(matches!(
            world.destroy_entity(e1),
            Err(EngineError::UnknownEntity(_))
        ));
    }

    #[test]
    fn signature_follows_components() {
        let mut world = world();
        let e = world.create_entity().unwrap();
        let pos = world.component_id::<Position>().unwrap();

        world.add_component(e, Position { x: 1.0, y: 2.0 }).unwrap();
        assert!(world.signature_of(e).unwrap().contains(pos));
        assert!(world.has_component::<Position>(e));

        let removed = world.remove_component::<Position>(e).unwrap();
        assert_eq!(removed, Position { x: 1.0, y: 2.0 });
        assert!(!world.signature_of(e).unwrap().contains(pos));
        assert!(matches!(
            world.get_component::<Position>(e),
            Err(EngineError::MissingComponent { component: "Position", .. })
        ));
    }

    #[test]
    fn re_adding_overwrites() {
        let mut world = world();
        let e = world.create_entity().unwrap();
        world.add_component(e, Health(10)).unwrap();
        world.add_component(e, Health(25)).unwrap();
        assert_eq!(world.get_component::<Health>(e).unwrap().0, 25);
        assert_eq!(world.components::<Health>().unwrap().len(), 1);
    }

    #[test]
    fn unique_add_rejects_duplicates() {
        let mut world = world();
        let e = world.create_entity().unwrap();
        world.add_unique_component(e, Health(1)).unwrap();
        assert!(matches!(
            world.add_unique_component(e, Health(2)),
            Err(EngineError::DuplicateComponent { .. })
        ));
        assert_eq!(world.get_component::<Health>(e).unwrap().0, 1);
    }

    #[test]
    fn unregistered_component_is_an_error() {
        let mut world = World::new();
        let e = world.create_entity().unwrap();
        assert!(matches!(
            world.add_component(e, 5u8),
            Err(EngineError::UnregisteredComponent("u8"))
        ));
        assert!(!world.has_component::<u8>(e));
    }

    #[test]
    fn destroyed_entity_reads_empty() {
        let mut world = world();
        let e = world.create_entity().unwrap();
        world.add_component(e, Position { x: 0.0, y: 0.0 }).unwrap();
        world.add_component(e, Health(3)).unwrap();
        world.destroy_entity(e).unwrap();

        // Same id comes back, with nothing attached.
        let again = world.create_entity().unwrap();
        assert_eq!(again, e);
        assert!(world.signature_of(again).unwrap().is_empty());
        assert!(world.get_component::<Position>(again).is_err());
        assert!(world.get_component::<Velocity>(again).is_err());
        assert!(world.get_component::<Health>(again).is_err());
    }

    #[test]
    fn resources() {
        let mut world = World::new();
        world.insert_resource(42u32);
        world.insert_resource(String::from("hello"));

        assert_eq!(*world.resource::<u32>(), 42);
        assert_eq!(world.resource::<String>(), "hello");

        *world.resource_mut::<u32>() = 99;
        assert_eq!(*world.resource::<u32>(), 99);
    }

    #[test]
    fn resource_remove_and_reinsert() {
        let mut world = World::new();
        world.insert_resource(String::from("hello"));

        let taken = world.resource_remove::<String>();
        assert_eq!(taken, Some(String::from("hello")));
        assert!(!world.has_resource::<String>());

        world.insert_resource(taken.unwrap());
        assert_eq!(world.resource::<String>(), "hello");
        assert_eq!(world.resource_remove::<u64>(), None);
    }

    #[test]
    #[should_panic(expected = "not found")]
    fn missing_resource_panics() {
        let world = World::new();
        world.resource::<u32>();
    }

    // ── Named entity tests ───────────────────────────────────────────

    #[test]
    fn names_are_lookups() {
        let mut world = world();
        let a = world.create_entity().unwrap();
        let b = world.create_entity().unwrap();
        world.set_entity_name(a, "Enemy1").unwrap();
        world.set_entity_name(b, "Enemy1").unwrap();

        assert_eq!(world.entity_name(a), Some("Enemy1"));
        assert_eq!(world.find_by_name("Enemy1"), Some(a));
        world.destroy_entity(a).unwrap();
        assert_eq!(world.find_by_name("Enemy1"), Some(b));
        assert_eq!(world.entity_name(a), None);
    }

    // ── Tag tests ────────────────────────────────────────────────────

    #[test]
    fn tags_many_to_many() {
        let mut world = world();
        let a = world.create_entity().unwrap();
        let b = world.create_entity().unwrap();
        world.add_tag(a, "enemy").unwrap();
        world.add_tag(a, "boss").unwrap();
        world.add_tag(a, "enemy").unwrap();
        world.add_tag(b, "enemy").unwrap();

        assert_eq!(world.tags_of(a), ["enemy", "boss"]);
        assert_eq!(world.tagged("enemy"), vec![a, b]);
        assert!(world.has_tag(a, "boss"));
        assert!(!world.has_tag(b, "boss"));
    }

    #[test]
    fn destroy_cleans_up_tags() {
        let mut world = world();
        let a = world.create_entity().unwrap();
        world.add_tag(a, "player").unwrap();
        world.destroy_entity(a).unwrap();
        assert!(world.tagged("player").is_empty());
        assert!(world.tags_of(a).is_empty());
        assert!(world.add_tag(a, "player").is_err());
    }

    #[test]
    fn clear_entities_resets_everything() {
        let mut world = world();
        for i in 0..5 {
            let e = world.create_entity().unwrap();
            world.add_component(e, Health(i)).unwrap();
            world.add_tag(e, "wave").unwrap();
        }
        world.clear_entities();
        assert_eq!(world.entity_count(), 0);
        assert!(world.components::<Health>().unwrap().is_empty());
        assert!(world.tagged("wave").is_empty());
        assert_eq!(world.create_entity().unwrap().id(), 0);
    }

    // ── System dispatch tests ────────────────────────────────────────

    #[test]
    fn dispatch_routes_by_signature() {
        let mut world = world();
        let sig = world.signature_for::<(Position, Velocity)>().unwrap();
        world.add_system("movement", sig, |world: &mut World, entities: &[Entity], dt: f32| {
            for &e in entities {
                let v = world.get_component::<Velocity>(e).map(|v| (v.dx, v.dy));
                if let (Ok((dx, dy)), Some(p)) = (v, world.get_mut::<Position>(e)) {
                    p.x += dx * dt;
                    p.y += dy * dt;
                }
            }
        });

        let moving = world.create_entity().unwrap();
        world.add_component(moving, Position { x: 0.0, y: 0.0 }).unwrap();
        world.add_component(moving, Velocity { dx: 2.0, dy: -1.0 }).unwrap();
        let still = world.create_entity().unwrap();
        world.add_component(still, Position { x: 5.0, y: 5.0 }).unwrap();

        world.update(0.5);

        assert_eq!(world.get::<Position>(moving), Some(&Position { x: 1.0, y: -0.5 }));
        assert_eq!(world.get::<Position>(still), Some(&Position { x: 5.0, y: 5.0 }));
    }

    #[test]
    fn membership_updates_on_remove_and_destroy() {
        let mut world = world();
        let sig = world.signature_for::<(Health,)>().unwrap();
        world.add_system("health", sig, |_: &mut World, _: &[Entity], _: f32| {});

        let a = world.create_entity().unwrap();
        let b = world.create_entity().unwrap();
        world.add_component(a, Health(1)).unwrap();
        world.add_component(b, Health(1)).unwrap();
        assert_eq!(world.systems().entities_of("health").unwrap().len(), 2);

        world.remove_component::<Health>(a).unwrap();
        world.destroy_entity(b).unwrap();
        assert!(world.systems().entities_of("health").unwrap().is_empty());
    }

    #[test]
    fn systems_run_in_registration_order() {
        let mut world = World::new();
        let order = Rc::new(Cell::new(0u32));
        for expected in 0..3u32 {
            let order = order.clone();
            world.add_system(
                &format!("s{expected}"),
                Signature::EMPTY,
                move |_: &mut World, _: &[Entity], _: f32| {
                    assert_eq!(order.get(), expected);
                    order.set(expected + 1);
                },
            );
        }
        world.update(0.016);
        assert_eq!(order.get(), 3);
    }

    #[test]
    fn system_may_mutate_entities_outside_its_set() {
        let mut world = world();
        let target = world.create_entity().unwrap();
        world.add_component(target, Health(10)).unwrap();
        let attacker = world.create_entity().unwrap();
        world.add_component(attacker, Position { x: 0.0, y: 0.0 }).unwrap();

        let sig = world.signature_for::<(Position,)>().unwrap();
        world.add_system("damage", sig, move |world: &mut World, _: &[Entity], _: f32| {
            if let Some(h) = world.get_mut::<Health>(target) {
                h.0 -= 4;
            }
        });
        world.update(0.016);
        assert_eq!(world.get::<Health>(target).unwrap().0, 6);
    }
}
