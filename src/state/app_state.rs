use std::{path::Path, time::Duration};

use anyhow::{Context, Result};
use log::info;

use crate::{
    arcade::World,
    assets::{AssetCache, AssetManifest},
    config::GameConfig,
    event_dispatch::Dispatcher,
    input::InputState,
};

use super::{constants::MAX_TIMESTEP_MILLIS, scene::Scene};

// --------------------------------------------------------------------------------------------------------------------

/// Wires a Scene to its World: runs the asset & setup stages, then drives fixed updates.
pub struct AppState<S: Scene> {
    pub world: World,
    pub scene: S,
    pub input: InputState,
    dispatcher: Dispatcher,
    frame: u64,
}

impl<S: Scene> AppState<S> {
    /// Resolves the scene's assets against `asset_root`, or from their nominal sizes when
    /// no asset directory is given, then creates the scene.
    pub fn new(config: &GameConfig, mut scene: S, asset_root: Option<&Path>) -> Result<Self> {
        let mut manifest = AssetManifest::default();
        scene.preload(&mut manifest);

        let assets = match asset_root {
            Some(root) => AssetCache::load(&manifest, root)
                .with_context(|| format!("Unable to load assets from {}", root.display()))?,
            None => {
                info!("No asset directory given, using nominal asset sizes");
                AssetCache::nominal(&manifest).context("Unable to build nominal asset cache")?
            }
        };

        let mut world = World::new(config);
        scene
            .create(&mut world, &assets)
            .context("Unable to create scene")?;

        Ok(Self {
            world,
            scene,
            input: InputState::default(),
            dispatcher: Dispatcher::default(),
            frame: 0,
        })
    }

    pub fn update(&mut self, dt: Duration) -> Result<()> {
        // Set a max timestep - this is crude, but prevents tunneling through platforms
        // when a driver hands us a huge dt.
        let dt = dt.min(Duration::from_millis(MAX_TIMESTEP_MILLIS));

        self.world.step(dt, &mut self.dispatcher);
        for message in self.dispatcher.drain() {
            self.scene.handle_message(&mut self.world, &message)?;
        }

        let keys = self.input.cursor_keys();
        self.scene.update(&mut self.world, &keys, dt);
        self.input.update();
        self.frame += 1;
        Ok(())
    }

    /// Number of updates run so far
    pub fn frame(&self) -> u64 {
        self.frame
    }
}
