//! Logging setup and per-frame diagnostics snapshots.
//!
//! [`init_logger`] installs an `env_logger` backend that also keeps the most
//! recent records in memory. With the `diagnostics` feature (on by default),
//! [`Snapshot::capture`] gathers entity, system, component, and particle
//! counters from a [`World`] into a serializable struct, along with any log
//! lines captured since the previous snapshot.

use std::collections::VecDeque;
use std::sync::{Mutex, OnceLock};
use std::time::Instant;

#[cfg(feature = "diagnostics")]
use serde::Serialize;

#[cfg(feature = "diagnostics")]
use crate::ecs::World;
#[cfg(feature = "diagnostics")]
use crate::particles::ParticleSystem;
#[cfg(feature = "diagnostics")]
use crate::time::Time;

/// Captured records kept before the oldest is dropped.
pub const LOG_CAPACITY: usize = 500;

// ── Log Capture ──────────────────────────────────────────────────────────

/// A captured log record.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "diagnostics", derive(Serialize))]
pub struct LogEntry {
    pub level: String,
    pub target: String,
    pub message: String,
    /// Seconds since [`init_logger`] ran.
    pub timestamp_secs: f32,
}

struct LogRing {
    entries: VecDeque<LogEntry>,
    start: Instant,
}

impl LogRing {
    fn push(&mut self, record: &log::Record<'_>) {
        if self.entries.len() >= LOG_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(LogEntry {
            level: record.level().to_string(),
            target: record.target().to_string(),
            message: record.args().to_string(),
            timestamp_secs: self.start.elapsed().as_secs_f32(),
        });
    }
}

static LOG_RING: Mutex<Option<LogRing>> = Mutex::new(None);

/// Forwards to `env_logger` and copies every enabled record into the ring.
struct CaptureLogger {
    inner: env_logger::Logger,
}

impl log::Log for CaptureLogger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        self.inner.enabled(metadata)
    }

    fn log(&self, record: &log::Record<'_>) {
        if !self.inner.enabled(record.metadata()) {
            return;
        }
        self.inner.log(record);
        if let Ok(mut guard) = LOG_RING.lock() {
            if let Some(ring) = guard.as_mut() {
                ring.push(record);
            }
        }
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

static LOGGER: OnceLock<CaptureLogger> = OnceLock::new();

/// Install the engine logger. `RUST_LOG` overrides the default of `info` for
/// this crate and `warn` for everything else.
///
/// Safe to call more than once. If another logger was installed first it is
/// left in place and nothing is captured.
pub fn init_logger() {
    if LOGGER.get().is_some() {
        return;
    }
    let inner = env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .filter_module("skald", log::LevelFilter::Info)
        .parse_default_env()
        .build();
    let max_level = inner.filter();
    let logger = LOGGER.get_or_init(|| CaptureLogger { inner });

    if log::set_logger(logger).is_err() {
        return;
    }
    log::set_max_level(max_level);
    if let Ok(mut ring) = LOG_RING.lock() {
        *ring = Some(LogRing {
            entries: VecDeque::new(),
            start: Instant::now(),
        });
    }
}

/// Remove and return up to `max` of the oldest captured records.
pub fn drain_logs(max: usize) -> Vec<LogEntry> {
    let Ok(mut guard) = LOG_RING.lock() else {
        return Vec::new();
    };
    let Some(ring) = guard.as_mut() else {
        return Vec::new();
    };
    let n = ring.entries.len().min(max);
    ring.entries.drain(..n).collect()
}

// ── Snapshot ─────────────────────────────────────────────────────────────

/// Log records attached to a single snapshot.
#[cfg(feature = "diagnostics")]
const LOGS_PER_SNAPSHOT: usize = 50;

/// A point-in-time view of engine counters.
#[cfg(feature = "diagnostics")]
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub frame_count: u64,
    pub fps: f32,
    pub delta_ms: f32,
    pub entity_count: usize,
    pub entity_pool: EntityPoolSnapshot,
    pub systems: Vec<SystemSnapshot>,
    pub components: Vec<ComponentCount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub particles: Option<ParticleSnapshot>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub logs: Vec<LogEntry>,
}

#[cfg(feature = "diagnostics")]
#[derive(Debug, Clone, Serialize)]
pub struct EntityPoolSnapshot {
    pub total_slots: u32,
    pub free_count: usize,
    pub alive_count: usize,
    pub capacity: usize,
    pub created_this_tick: u32,
    pub destroyed_this_tick: u32,
    pub fragmentation_pct: f32,
}

#[cfg(feature = "diagnostics")]
#[derive(Debug, Clone, Serialize)]
pub struct SystemSnapshot {
    pub name: String,
    pub matched: usize,
    /// Wall time of the last dispatch, if the system has run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_us: Option<f64>,
}

#[cfg(feature = "diagnostics")]
#[derive(Debug, Clone, Serialize)]
pub struct ComponentCount {
    pub name: &'static str,
    pub count: usize,
}

#[cfg(feature = "diagnostics")]
#[derive(Debug, Clone, Serialize)]
pub struct ParticleSnapshot {
    pub active: usize,
    pub capacity: usize,
    pub spawned: usize,
    pub dropped: usize,
}

#[cfg(feature = "diagnostics")]
impl Snapshot {
    /// Gather counters from `world`. Resets the world's created/destroyed
    /// counters, so call it once per frame.
    pub fn capture(world: &mut World) -> Self {
        let (created, destroyed) = world.take_frame_counters();

        let (frame_count, fps, delta_ms) = world
            .get_resource::<Time>()
            .map(|t| (t.frame_count(), t.fps(), t.delta_secs() * 1000.0))
            .unwrap_or((0, 0.0, 0.0));

        let registry = world.entity_registry();
        let total_slots = registry.total_slots();
        let free_count = registry.free_count();
        let entity_pool = EntityPoolSnapshot {
            total_slots,
            free_count,
            alive_count: registry.alive_count(),
            capacity: registry.capacity(),
            created_this_tick: created,
            destroyed_this_tick: destroyed,
            fragmentation_pct: if total_slots > 0 {
                free_count as f32 / total_slots as f32 * 100.0
            } else {
                0.0
            },
        };

        let timings = world.systems().timings();
        let systems = world
            .systems()
            .summary()
            .into_iter()
            .map(|(name, matched)| {
                let duration_us = timings
                    .iter()
                    .find(|t| t.name == name)
                    .map(|t| t.duration_us);
                SystemSnapshot {
                    name,
                    matched,
                    duration_us,
                }
            })
            .collect();

        let components = world
            .component_counts()
            .into_iter()
            .map(|(name, count)| ComponentCount { name, count })
            .collect();

        let particles = world.get_resource::<ParticleSystem>().map(|p| {
            let stats = p.stats();
            ParticleSnapshot {
                active: stats.active,
                capacity: stats.capacity,
                spawned: stats.spawned,
                dropped: stats.dropped,
            }
        });

        Self {
            frame_count,
            fps,
            delta_ms,
            entity_count: world.entity_count(),
            entity_pool,
            systems,
            components,
            particles,
            logs: drain_logs(LOGS_PER_SNAPSHOT),
        }
    }

    pub fn to_json(&self) -> String {
        // A struct of plain numbers and strings always serializes.
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_logger_is_idempotent() {
        init_logger();
        init_logger();
        log::warn!("diag test line");
        // The ring only exists if this logger won the race to install.
        let _ = drain_logs(LOG_CAPACITY);
    }

    #[test]
    fn ring_drops_oldest() {
        let mut ring = LogRing {
            entries: VecDeque::new(),
            start: Instant::now(),
        };
        for i in 0..LOG_CAPACITY + 5 {
            ring.push(
                &log::Record::builder()
                    .args(format_args!("line {i}"))
                    .level(log::Level::Info)
                    .target("skald")
                    .build(),
            );
        }
        assert_eq!(ring.entries.len(), LOG_CAPACITY);
        assert_eq!(ring.entries.front().unwrap().message, "line 5");
    }

    #[cfg(feature = "diagnostics")]
    mod snapshot {
        use super::super::*;
        use crate::components::{self, Transform};
        use crate::ecs::Entity;

        #[test]
        fn counts_entities_systems_and_particles() {
            let mut world = World::new();
            components::register_all(&mut world).unwrap();
            world.insert_resource(Time::new());
            ParticleSystem::with_capacity(16).install(&mut world).unwrap();

            let sig = world.signature_for::<(Transform,)>().unwrap();
            world.add_system("Noop", sig, |_: &mut World, _: &[Entity], _: f32| {});

            let a = world.create_entity().unwrap();
            world.add_component(a, Transform::from_xy(1.0, 2.0)).unwrap();
            let b = world.create_entity().unwrap();
            world.destroy_entity(b).unwrap();
            world.update(0.016);

            let snap = Snapshot::capture(&mut world);
            assert_eq!(snap.entity_count, 1);
            assert_eq!(snap.entity_pool.created_this_tick, 2);
            assert_eq!(snap.entity_pool.destroyed_this_tick, 1);
            assert_eq!(snap.entity_pool.free_count, 1);

            let noop = snap.systems.iter().find(|s| s.name == "Noop").unwrap();
            assert_eq!(noop.matched, 1);
            assert!(noop.duration_us.is_some());

            let particles = snap.particles.as_ref().unwrap();
            assert_eq!(particles.capacity, 16);
            assert_eq!(particles.active, 0);

            let transforms = snap
                .components
                .iter()
                .find(|c| c.name == "Transform")
                .unwrap();
            assert_eq!(transforms.count, 1);

            // Counters reset after a capture.
            let again = Snapshot::capture(&mut world);
            assert_eq!(again.entity_pool.created_this_tick, 0);

            let json: serde_json::Value = serde_json::from_str(&snap.to_json()).unwrap();
            assert_eq!(json["entity_count"], 1);
            assert_eq!(json["particles"]["capacity"], 16);
        }
    }
}
