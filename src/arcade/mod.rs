pub mod anims;
pub mod body;
pub mod collision;
pub mod sprite;
pub mod world;

pub use collision::Target;
pub use world::{TextStyle, World, WorldError};
