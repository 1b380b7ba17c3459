pub mod character;
pub mod layout;

pub use character::{CharacterSet, Cycle, Facing, ParseCharacterSetError};
