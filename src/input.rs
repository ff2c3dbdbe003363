use std::collections::HashSet;

use winit::event::{ElementState, KeyboardInput, VirtualKeyCode, WindowEvent};

use crate::camera::MovementKey;

/// Keyboard and cursor state collected from window events.
///
/// The cursor delta accumulates between frames and is drained by
/// [`InputState::take_mouse_delta`].
#[derive(Debug, Default)]
pub struct InputState {
    keys_down: HashSet<VirtualKeyCode>,
    last_cursor: Option<(f32, f32)>,
    mouse_delta: (f32, f32),
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a window event. Returns true if the event was consumed.
    pub fn process_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput {
                input:
                    KeyboardInput {
                        virtual_keycode: Some(key),
                        state,
                        ..
                    },
                ..
            } => {
                match state {
                    ElementState::Pressed => self.key_pressed(*key),
                    ElementState::Released => self.key_released(*key),
                }
                true
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_moved(position.x as f32, position.y as f32);
                true
            }
            WindowEvent::Focused(false) => {
                // No release events arrive while unfocused.
                self.keys_down.clear();
                self.last_cursor = None;
                true
            }
            _ => false,
        }
    }

    pub fn key_pressed(&mut self, key: VirtualKeyCode) {
        self.keys_down.insert(key);
    }

    pub fn key_released(&mut self, key: VirtualKeyCode) {
        self.keys_down.remove(&key);
    }

    pub fn key_down(&self, key: VirtualKeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Records a cursor position in window pixels.
    ///
    /// The first position only seeds the tracker. Screen y grows downwards,
    /// so the y delta is inverted: moving the cursor up yields a positive dy.
    pub fn cursor_moved(&mut self, x: f32, y: f32) {
        if let Some((last_x, last_y)) = self.last_cursor {
            self.mouse_delta.0 += x - last_x;
            self.mouse_delta.1 += last_y - y;
        }
        self.last_cursor = Some((x, y));
    }

    /// Returns the accumulated cursor delta and resets it to zero.
    pub fn take_mouse_delta(&mut self) -> (f32, f32) {
        std::mem::take(&mut self.mouse_delta)
    }

    /// Movement keys currently held, W/A/S/D or the arrow keys.
    pub fn held_movement(&self) -> Vec<MovementKey> {
        let mut held = Vec::with_capacity(4);
        for key in &self.keys_down {
            if let Some(movement) = movement_key(*key) {
                if !held.contains(&movement) {
                    held.push(movement);
                }
            }
        }
        held
    }
}

pub fn movement_key(key: VirtualKeyCode) -> Option<MovementKey> {
    match key {
        VirtualKeyCode::W | VirtualKeyCode::Up => Some(MovementKey::Forward),
        VirtualKeyCode::S | VirtualKeyCode::Down => Some(MovementKey::Backward),
        VirtualKeyCode::A | VirtualKeyCode::Left => Some(MovementKey::Left),
        VirtualKeyCode::D | VirtualKeyCode::Right => Some(MovementKey::Right),
        _ => None,
    }
}
