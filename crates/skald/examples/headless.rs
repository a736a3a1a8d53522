//! Headless run — loads a scene, steps it for a few seconds, prints what
//! happened.
//!
//! A boss loses health every frame through a registered behavior; when it
//! dies its emitter bursts. Diagnostics snapshots go to stdout once a second,
//! and the final world is saved next to the scene.
//!
//! Run with: `cargo run -p skald --example headless`

use skald::prelude::*;

const SCENE: &str = r#"{
  "entities": [
    {
      "type": "Boss",
      "components": {
        "TransformComponent": { "x": 400, "y": 120, "tag": "enemy,boss" },
        "EnemyComponent": { "type": "Boss", "health": 30, "UpdateFunctionName": "Wither" },
        "ParticleComponent": { "emissionRate": 40, "life": 1.5, "textureName": "ember", "shape": "EXPLOSION" }
      }
    },
    {
      "type": "HealthBar",
      "components": {
        "UIBarComponent": { "fillPercentage": 1.0, "fillColor": [0.8, 0.1, 0.1] }
      }
    }
  ]
}"#;

fn wither(world: &mut World, boss: Entity, dt: f32) {
    let Some(enemy) = world.get_mut::<Enemy>(boss) else {
        return;
    };
    enemy.health = (enemy.health - 12.0 * dt).max(0.0);
    let fill = enemy.health / enemy.max_health;

    if let Some(bar) = world.find_by_name("HealthBar") {
        if let Some(ui) = world.get_mut::<UiBar>(bar) {
            ui.fill_percentage = fill;
        }
    }
}

fn main() -> EngineResult<()> {
    init_logger();

    let dir = std::env::temp_dir().join("skald_headless");
    std::fs::create_dir_all(&dir).map_err(|e| EngineError::io(&dir, e))?;
    let scene = dir.join("Arena.json");
    std::fs::write(&scene, SCENE).map_err(|e| EngineError::io(&scene, e))?;

    let mut engine = Engine::from_config(EngineConfig {
        rng_seed: Some(1),
        scene_dir: dir.clone(),
        ..Default::default()
    })?;
    engine.callbacks.register_behavior("Wither", wither);
    engine.load_scene(&scene)?;

    let dt = 1.0 / 60.0;
    for frame in 1..=240 {
        engine.tick(dt);
        if frame % 60 == 0 {
            let snapshot = engine.snapshot();
            println!("{}", snapshot.to_json());
        }
    }

    let boss = engine.world.tagged("boss");
    if let Some(&boss) = boss.first() {
        if let Some(enemy) = engine.world.get::<Enemy>(boss) {
            println!("Boss health after 4s: {:.1}", enemy.health);
        }
    }
    println!("Live particles: {}", engine.particles().active_count());

    let out = dir.join("Arena.saved.json");
    engine.save_scene(&out)?;
    println!("Saved to {}", out.display());
    Ok(())
}
