//! # Skald — Headless 2D Game Engine Core
//!
//! A signature-based ECS, JSON scene loading and saving, a pooled particle
//! system, and a trie-backed word lexicon for word games. Nothing here draws
//! or plays sound: the engine owns game state and the data that describes
//! it, and a host renders from that.
//!
//! Start with `use skald::prelude::*` and build an [`Engine`](engine::Engine),
//! or use the pieces directly.

pub mod asset;
pub mod callbacks;
pub mod components;
pub mod config;
pub mod diag;
pub mod ecs;
pub mod engine;
pub mod error;
pub mod lexicon;
pub mod math;
pub mod particles;
pub mod prelude;
pub mod scene;
pub mod state;
pub mod time;
