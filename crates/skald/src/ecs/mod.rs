//! # Signature-Based ECS
//!
//! Entities are integers, components live in one packed array per type, and
//! each live entity carries a bitset [`Signature`] of the types it owns.
//! Systems declare a required signature and are handed exactly the entities
//! whose signature is a superset of it.
//!
//! ## Module Overview
//!
//! - [`entity`] — Id allocation with lowest-free reuse, per-entity signatures
//! - [`signature`] — Fixed-width component bitsets
//! - [`component`] — Dense per-type storage with swap-remove compaction
//! - [`system`] — System trait and signature-routed dispatcher
//! - [`world`] — Central container (entities + components + systems + resources)

pub mod component;
pub mod entity;
pub mod signature;
pub mod system;
pub mod world;

pub use component::{Component, ComponentArray};
pub use entity::{Entity, EntityRegistry};
pub use signature::{ComponentId, Signature};
pub use system::{System, SystemRegistry};
pub use world::{ComponentSet, World};
