//! Engine-owned events delivered to the active scene.
//!
//! The platform layer translates windowing events into `SceneEvent` so scenes
//! never depend on winit directly. Only the keys and buttons scenes actually
//! react to are represented; everything else is dropped at translation time.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Escape,
    Space,
    Enter,
    Tab,
    Backspace,
    W,
    A,
    S,
    D,
    R,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseBtn {
    Left,
    Right,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneEvent {
    /// The user asked to close the application. Consumed by the manager.
    Quit,
    KeyDown(Key),
    KeyUp(Key),
    MouseMoved { x: f64, y: f64 },
    MouseDown(MouseBtn),
    MouseUp(MouseBtn),
    Resized { width: u32, height: u32 },
}

impl SceneEvent {
    pub fn is_quit(&self) -> bool {
        matches!(self, SceneEvent::Quit)
    }

    /// The key carried by a press event, if any.
    pub fn pressed_key(&self) -> Option<Key> {
        match self {
            SceneEvent::KeyDown(key) => Some(*key),
            _ => None,
        }
    }
}
