use std::collections::HashMap;

/// The four directional keys the game polls each frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonState {
    Pressed,
    Down,
    Released,
    Up,
}

impl Default for ButtonState {
    fn default() -> Self {
        ButtonState::Up
    }
}

impl ButtonState {
    fn transition(&self, key_down: bool) -> ButtonState {
        if key_down {
            match self {
                ButtonState::Pressed => ButtonState::Down,
                ButtonState::Down => ButtonState::Down,
                ButtonState::Released => ButtonState::Pressed,
                ButtonState::Up => ButtonState::Pressed,
            }
        } else {
            match self {
                ButtonState::Pressed => ButtonState::Released,
                ButtonState::Down => ButtonState::Released,
                ButtonState::Released => ButtonState::Up,
                ButtonState::Up => ButtonState::Up,
            }
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, ButtonState::Pressed | ButtonState::Down)
    }
}

// ---------------------------------------------------------------------------------------------------------------------

/// Read-only snapshot of the cursor keys for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CursorKeys {
    pub left: ButtonState,
    pub right: ButtonState,
    pub up: ButtonState,
    pub down: ButtonState,
}

impl CursorKeys {
    pub fn is_down(&self, key: Key) -> bool {
        match key {
            Key::Left => self.left.is_active(),
            Key::Right => self.right.is_active(),
            Key::Up => self.up.is_active(),
            Key::Down => self.down.is_active(),
        }
    }
}

// ---------------------------------------------------------------------------------------------------------------------

#[derive(Debug)]
pub struct InputState {
    buttons: HashMap<Key, ButtonState>,
}

impl Default for InputState {
    fn default() -> Self {
        Self::for_keys(&[Key::Left, Key::Right, Key::Up, Key::Down])
    }
}

impl InputState {
    pub fn for_keys(keys: &[Key]) -> Self {
        let mut buttons = HashMap::new();
        for key in keys {
            buttons.insert(*key, ButtonState::default());
        }

        Self { buttons }
    }

    pub fn get_button_state(&self, key: Key) -> Option<&ButtonState> {
        self.buttons.get(&key)
    }

    /// Records a key transition, returning true iff the key is one this InputState tracks.
    pub fn process_keyboard(&mut self, key: Key, pressed: bool) -> bool {
        if let Some(button_state) = self.buttons.get(&key) {
            let new_state = button_state.transition(pressed);
            self.buttons.insert(key, new_state);
            true
        } else {
            false
        }
    }

    /// Advances Pressed/Released edges; call once per frame after the frame has consumed input.
    pub fn update(&mut self) {
        let previous_button_state = std::mem::take(&mut self.buttons);
        for (key, button_state) in previous_button_state {
            self.buttons
                .insert(key, button_state.transition(button_state.is_active()));
        }
    }

    /// Convenience for drivers which hold a key set each frame rather than sending edges.
    pub fn hold(&mut self, key: Key, held: bool) {
        let active = self
            .buttons
            .get(&key)
            .map(|s| s.is_active())
            .unwrap_or(false);
        if active != held {
            self.process_keyboard(key, held);
        }
    }

    pub fn cursor_keys(&self) -> CursorKeys {
        let state = |key| self.buttons.get(&key).copied().unwrap_or_default();
        CursorKeys {
            left: state(Key::Left),
            right: state(Key::Right),
            up: state(Key::Up),
            down: state(Key::Down),
        }
    }
}
