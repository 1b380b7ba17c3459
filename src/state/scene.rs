use std::time::Duration;

use anyhow::Result;

use crate::{
    arcade::World,
    assets::{AssetCache, AssetManifest},
    event_dispatch::Message,
    input::CursorKeys,
};

/// Lifecycle hooks a scene implements for the runner.
pub trait Scene {
    /// Declare the named resources the scene needs
    fn preload(&mut self, manifest: &mut AssetManifest);

    /// Build the scene's sprites, groups and registrations once assets are resolved
    fn create(&mut self, world: &mut World, assets: &AssetCache) -> Result<()>;

    /// Called once per frame after the physics step and message dispatch
    fn update(&mut self, world: &mut World, keys: &CursorKeys, dt: Duration);

    /// Receives messages raised by the world's physics step, e.g. overlaps
    fn handle_message(&mut self, world: &mut World, message: &Message) -> Result<()>;
}
