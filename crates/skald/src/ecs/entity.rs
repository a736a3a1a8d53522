//! # Entity — Integer Identities and Their Signatures
//!
//! An [`Entity`] is a plain integer. It carries no data of its own; the
//! [`World`](super::world::World) maps it to components. Each live entity also
//! owns a [`Signature`] recording which component types it currently has.
//!
//! ## Id Reuse
//!
//! Ids are handed out lowest-first. A destroyed id goes back into a min-heap
//! and is the first candidate for the next `create`:
//!
//! ```text
//! create → 0, create → 1, create → 2
//! destroy(1), destroy(0)
//! create → 0   ← lowest free id
//! create → 1
//! create → 3   ← no free ids left, next sequential
//! ```
//!
//! There is no generation counter. A stale `Entity` held across a destroy
//! will alias whatever entity later receives the same id, so callers that
//! keep ids around (e.g. a bullet's target) must check liveness themselves.
//! The registry guarantees the weaker property the engine relies on: an id is
//! only reissued after the world has purged every component it owned.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt;

use super::signature::Signature;
use crate::error::{EngineError, EngineResult};

/// Default cap on simultaneously live entities.
pub const DEFAULT_MAX_ENTITIES: usize = 5000;

/// An opaque entity id.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Entity(pub(crate) u32);

impl Entity {
    /// Returns the raw id.
    pub fn id(self) -> u32 {
        self.0
    }

    /// Rebuild an entity from a raw id, e.g. one read back from a scene file.
    ///
    /// The result is only meaningful if that id is alive in the world you
    /// use it with.
    pub fn from_raw(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Allocates ids and tracks the signature of every live entity.
///
/// ## Memory Layout
///
/// ```text
/// signatures: [Some(0b101), None, Some(0b1)]  ← one slot per id ever issued
/// free:       {1}                              ← min-heap of reusable ids
/// next:       3                                ← next never-issued id
/// ```
pub struct EntityRegistry {
    /// `Some` while the id is alive.
    signatures: Vec<Option<Signature>>,
    free: BinaryHeap<Reverse<u32>>,
    next: u32,
    alive: usize,
    max: usize,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_ENTITIES)
    }

    /// A registry that refuses to hold more than `max` live entities.
    pub fn with_capacity(max: usize) -> Self {
        Self {
            signatures: Vec::new(),
            free: BinaryHeap::new(),
            next: 0,
            alive: 0,
            max,
        }
    }

    /// Issue the lowest free id with an empty signature.
    pub fn create(&mut self) -> EngineResult<Entity> {
        if self.alive >= self.max {
            return Err(EngineError::CapacityExceeded { max: self.max });
        }

        let id = match self.free.pop() {
            Some(Reverse(id)) => id,
            None => {
                let id = self.next;
                self.next += 1;
                self.signatures.push(None);
                id
            }
        };

        self.signatures[id as usize] = Some(Signature::EMPTY);
        self.alive += 1;
        Ok(Entity(id))
    }

    /// Release an id for reuse. The caller is responsible for having purged
    /// the entity's components first.
    pub fn destroy(&mut self, entity: Entity) -> EngineResult<()> {
        let slot = self
            .signatures
            .get_mut(entity.0 as usize)
            .filter(|s| s.is_some())
            .ok_or(EngineError::UnknownEntity(entity))?;

        *slot = None;
        self.free.push(Reverse(entity.0));
        self.alive -= 1;
        Ok(())
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        matches!(self.signatures.get(entity.0 as usize), Some(Some(_)))
    }

    /// The entity's signature, or `None` if it isn't alive.
    pub fn signature(&self, entity: Entity) -> Option<Signature> {
        self.signatures.get(entity.0 as usize).copied().flatten()
    }

    pub(crate) fn set_signature(&mut self, entity: Entity, signature: Signature) -> EngineResult<()> {
        match self.signatures.get_mut(entity.0 as usize) {
            Some(Some(slot)) => {
                *slot = signature;
                Ok(())
            }
            _ => Err(EngineError::UnknownEntity(entity)),
        }
    }

    /// Live entities in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.signatures
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_some())
            .map(|(i, _)| Entity(i as u32))
    }

    pub fn alive_count(&self) -> usize {
        self.alive
    }

    /// Number of destroyed ids waiting to be reissued.
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Total ids ever issued (alive or free).
    pub fn total_slots(&self) -> u32 {
        self.next
    }

    pub fn capacity(&self) -> usize {
        self.max
    }
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}
