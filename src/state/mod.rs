pub mod app_state;
pub mod constants;
pub mod events;
pub mod game_state;
pub mod scene;
