pub mod arcade;
pub mod assets;
pub mod autopilot;
pub mod config;
pub mod entities;
pub mod event_dispatch;
pub mod input;
pub mod state;
pub mod util;
