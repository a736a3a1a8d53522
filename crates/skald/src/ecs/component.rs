//! # Component — Dense Per-Type Storage
//!
//! Every registered component type gets one [`ComponentArray`]: a packed
//! `Vec<T>` plus a two-way map between entities and slots in that vec.
//!
//! ```text
//! dense:    [T(e7), T(e2), T(e9)]     ← packed, no holes
//! entities: [e7,    e2,    e9   ]     ← slot → entity
//! slots:    {e7: 0, e2: 1, e9: 2}     ← entity → slot
//! ```
//!
//! Removal swaps the last element into the hole, so the vec stays packed and
//! only the moved entity's slot changes. Order of the dense array is not
//! meaningful and nothing in the engine depends on it.
//!
//! The [`ComponentRegistry`] owns one array per type behind a type-erased
//! [`ComponentStore`] trait object and hands out the bit index each type
//! occupies in a [`Signature`](super::signature::Signature).

use std::any::{Any, TypeId};
use std::collections::HashMap;

use super::entity::Entity;
use super::signature::{ComponentId, MAX_COMPONENTS};
use crate::error::{EngineError, EngineResult};

/// Marker for types that can be stored as components.
pub trait Component: 'static + Send + Sync {}

impl<T: 'static + Send + Sync> Component for T {}

/// Packed storage for one component type.
pub struct ComponentArray<T> {
    dense: Vec<T>,
    entities: Vec<Entity>,
    slots: HashMap<Entity, usize>,
}

impl<T: Component> ComponentArray<T> {
    pub fn new() -> Self {
        Self {
            dense: Vec::new(),
            entities: Vec::new(),
            slots: HashMap::new(),
        }
    }

    /// Store `value` for `entity`. Returns the previous value if the entity
    /// already had one (it is overwritten in place).
    pub fn insert(&mut self, entity: Entity, value: T) -> Option<T> {
        if let Some(&slot) = self.slots.get(&entity) {
            return Some(std::mem::replace(&mut self.dense[slot], value));
        }
        self.slots.insert(entity, self.dense.len());
        self.entities.push(entity);
        self.dense.push(value);
        None
    }

    /// Remove and return the entity's value, compacting by swap-remove.
    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        let slot = self.slots.remove(&entity)?;
        let value = self.dense.swap_remove(slot);
        self.entities.swap_remove(slot);
        // Whatever was last now lives in `slot`.
        if let Some(&moved) = self.entities.get(slot) {
            self.slots.insert(moved, slot);
        }
        Some(value)
    }

    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.slots.get(&entity).map(|&slot| &self.dense[slot])
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.slots.get(&entity).map(|&slot| &mut self.dense[slot])
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.slots.contains_key(&entity)
    }

    pub fn len(&self) -> usize {
        self.dense.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Iterate `(entity, component)` pairs in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.entities.iter().copied().zip(self.dense.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.entities.iter().copied().zip(self.dense.iter_mut())
    }
}

impl<T: Component> Default for ComponentArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Type-erased view of a [`ComponentArray`], so the registry can purge an
/// entity from every store without knowing the concrete types.
pub(crate) trait ComponentStore: Send + Sync {
    fn remove_entity(&mut self, entity: Entity) -> bool;
    fn len(&self) -> usize;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> ComponentStore for ComponentArray<T> {
    fn remove_entity(&mut self, entity: Entity) -> bool {
        self.remove(entity).is_some()
    }

    fn len(&self) -> usize {
        self.dense.len()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Assigns signature bits to component types and owns their storage.
pub(crate) struct ComponentRegistry {
    ids: HashMap<TypeId, ComponentId>,
    /// Indexed by `ComponentId`.
    stores: Vec<Box<dyn ComponentStore>>,
    names: Vec<&'static str>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self {
            ids: HashMap::new(),
            stores: Vec::new(),
            names: Vec::new(),
        }
    }

    /// Register `T` and return its bit. Registering twice returns the same bit.
    pub fn register<T: Component>(&mut self) -> EngineResult<ComponentId> {
        let type_id = TypeId::of::<T>();
        if let Some(&id) = self.ids.get(&type_id) {
            return Ok(id);
        }
        if self.stores.len() >= MAX_COMPONENTS {
            return Err(EngineError::TooManyComponentTypes {
                max: MAX_COMPONENTS,
            });
        }

        let id = self.stores.len() as ComponentId;
        self.ids.insert(type_id, id);
        self.stores.push(Box::new(ComponentArray::<T>::new()));
        self.names.push(short_type_name(std::any::type_name::<T>()));
        log::debug!("Registered component {} as bit {id}", self.names[id as usize]);
        Ok(id)
    }

    pub fn id_of<T: Component>(&self) -> EngineResult<ComponentId> {
        self.ids
            .get(&TypeId::of::<T>())
            .copied()
            .ok_or_else(|| EngineError::UnregisteredComponent(short_type_name(std::any::type_name::<T>())))
    }

    pub fn is_registered<T: Component>(&self) -> bool {
        self.ids.contains_key(&TypeId::of::<T>())
    }

    pub fn array<T: Component>(&self) -> EngineResult<&ComponentArray<T>> {
        let id = self.id_of::<T>()?;
        Ok(self.stores[id as usize]
            .as_any()
            .downcast_ref::<ComponentArray<T>>()
            .unwrap_or_else(|| panic!("component store {id} holds the wrong type")))
    }

    pub fn array_mut<T: Component>(&mut self) -> EngineResult<&mut ComponentArray<T>> {
        let id = self.id_of::<T>()?;
        Ok(self.stores[id as usize]
            .as_any_mut()
            .downcast_mut::<ComponentArray<T>>()
            .unwrap_or_else(|| panic!("component store {id} holds the wrong type")))
    }

    /// Drop every component the entity owns.
    pub fn entity_destroyed(&mut self, entity: Entity) {
        for store in &mut self.stores {
            store.remove_entity(entity);
        }
    }

    pub fn name_of(&self, id: ComponentId) -> &'static str {
        self.names.get(id as usize).copied().unwrap_or("<unregistered>")
    }

    /// Number of stored instances per registered type, by bit.
    pub fn lengths(&self) -> Vec<(&'static str, usize)> {
        self.names
            .iter()
            .copied()
            .zip(self.stores.iter().map(|s| s.len()))
            .collect()
    }
}

/// `skald::components::Transform` → `Transform`.
pub(crate) fn short_type_name(full: &'static str) -> &'static str {
    full.rsplit("::").next().unwrap_or(full)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, PartialEq)]
    struct Health(u32);

    #[test]
    fn insert_get_overwrite() {
        let mut arr = ComponentArray::new();
        let e = Entity(3);
        assert_eq!(arr.insert(e, Health(10)), None);
        assert_eq!(arr.insert(e, Health(20)), Some(Health(10)));
        assert_eq!(arr.get(e), Some(&Health(20)));
        assert_eq!(arr.len(), 1);
    }

    #[test]
    fn swap_remove_keeps_other_entities_addressable() {
        let mut arr = ComponentArray::new();
        for id in 0..4 {
            arr.insert(Entity(id), Health(id * 10));
        }
        assert_eq!(arr.remove(Entity(1)), Some(Health(10)));
        assert_eq!(arr.remove(Entity(1)), None);

        assert_eq!(arr.len(), 3);
        for id in [0, 2, 3] {
            assert_eq!(arr.get(Entity(id)), Some(&Health(id * 10)));
        }
        assert!(!arr.contains(Entity(1)));
    }

    #[test]
    fn removing_last_slot() {
        let mut arr = ComponentArray::new();
        arr.insert(Entity(0), Health(1));
        arr.insert(Entity(1), Health(2));
        arr.remove(Entity(1));
        assert_eq!(arr.get(Entity(0)), Some(&Health(1)));
        arr.remove(Entity(0));
        assert!(arr.is_empty());
    }

    #[test]
    fn drop_called_on_remove() {
        struct Tracked(Arc<AtomicUsize>);
        impl Drop for Tracked {
            fn drop(&mut self) {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }

        let drops = Arc::new(AtomicUsize::new(0));
        let mut reg = ComponentRegistry::new();
        reg.register::<Tracked>().unwrap();
        reg.array_mut::<Tracked>()
            .unwrap()
            .insert(Entity(0), Tracked(drops.clone()));

        reg.entity_destroyed(Entity(0));
        assert_eq!(drops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn registry_assigns_stable_bits() {
        let mut reg = ComponentRegistry::new();
        assert_eq!(reg.register::<Health>().unwrap(), 0);
        assert_eq!(reg.register::<String>().unwrap(), 1);
        assert_eq!(reg.register::<Health>().unwrap(), 0);
        assert_eq!(reg.name_of(0), "Health");
        assert!(matches!(
            reg.id_of::<u8>(),
            Err(EngineError::UnregisteredComponent(_))
        ));
    }
}
