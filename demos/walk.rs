//! Walks an isometric soldier in a circle while the camera orbits,
//! logging which sprite variant and texture coordinates would be drawn.
//!
//! RUST_LOG=info cargo run --example walk

use std::{env, f32::consts::TAU};

use sprite_anim::prelude::*;

const LIBRARY: &str = r#"{
    "spriteSheets": [
        { "name": "soldier", "texture": "soldier", "layout": [4, 4], "pixelsPerUnit": 32 }
    ],
    "animationSets": [
        {
            "name": "soldier",
            "defaultAnimation": "Idle_TowardRight",
            "fps": 8,
            "spriteSheet": "soldier",
            "isometric": true,
            "animations": [
                { "name": "Idle_TowardRight", "spriteIndices": [0, 1] },
                { "name": "Idle_AwayLeft", "spriteIndices": [2, 3] },
                { "name": "Walk_TowardRight", "spriteIndices": [4, 5, 6, 7] },
                { "name": "Walk_AwayLeft", "spriteIndices": [8, 9, 10, 11] },
                { "name": "Wave_TowardRight", "spriteIndices": [12, 13], "playbackMode": 0 },
                { "name": "Wave_AwayLeft", "spriteIndices": [14, 15], "playbackMode": 0 }
            ]
        }
    ]
}"#;

const TICK: f32 = 1.0 / 60.0;

struct Soldier {
    anim: IsometricSpriteAnimationSet,
    heading: f32,
}

impl Soldier {
    fn forward(&self) -> Vec3 {
        Vec3::new(self.heading.sin(), 0.0, self.heading.cos())
    }

    fn update(&mut self, camera: &Camera) -> Result<()> {
        self.heading = (self.heading + TAU * 0.25 * TICK).rem_euclid(TAU);
        self.anim.update(TICK, self.forward(), camera)?;
        Ok(())
    }

    fn draw(&self) {
        let sprite = self.anim.current_sprite();
        log::info!(
            "{:<18} {:?} scale {} uvs {:?}",
            self.anim.set().current_name(),
            self.anim.quadrant(),
            self.anim.scale(),
            sprite.tex_coords(),
        );
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let mut textures = TextureStore::new(env::temp_dir());
    // stands in for a decoded image
    let soldier_texture = textures.insert("soldier", UVec2::new(128, 128), None);
    let mut library = SpriteLibrary::new(textures);
    library.from_json(LIBRARY)?;

    let mut camera = Camera::isometric(Vec3::ZERO, 20.0);
    let mut soldier = Soldier {
        anim: library.new_isometric_set("soldier")?,
        heading: 0.0,
    };
    soldier.anim.play("Walk")?;

    for frame in 0..600 {
        camera.orbit(TAU / 1200.0);
        soldier.update(&camera)?;
        if frame % 150 == 149 {
            soldier.anim.play("Wave")?;
        } else if frame % 150 == 60 {
            soldier.anim.play("Walk")?;
        }
        if frame % 10 == 0 {
            soldier.draw();
        }
    }

    drop(soldier);
    drop(soldier_texture);
    let released = library.unload();
    log::info!("Released {released} textures");
    Ok(())
}
