//! Translation from winit window events to `SceneEvent`.

use sc_core::{Key, MouseBtn, SceneEvent};
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Returns `None` for events scenes do not consume (focus, redraw, IME, ...).
/// Key repeats are dropped so `KeyDown` fires once per physical press.
pub fn translate_window_event(event: &WindowEvent) -> Option<SceneEvent> {
    match event {
        WindowEvent::CloseRequested => Some(SceneEvent::Quit),
        WindowEvent::KeyboardInput { event, .. } => {
            if event.repeat {
                return None;
            }
            let PhysicalKey::Code(key_code) = event.physical_key else {
                return None;
            };
            let key = map_key(key_code)?;
            Some(match event.state {
                ElementState::Pressed => SceneEvent::KeyDown(key),
                ElementState::Released => SceneEvent::KeyUp(key),
            })
        }
        WindowEvent::CursorMoved { position, .. } => Some(SceneEvent::MouseMoved {
            x: position.x,
            y: position.y,
        }),
        WindowEvent::MouseInput { state, button, .. } => {
            let btn = map_mouse_button(*button)?;
            Some(match state {
                ElementState::Pressed => SceneEvent::MouseDown(btn),
                ElementState::Released => SceneEvent::MouseUp(btn),
            })
        }
        WindowEvent::Resized(size) if size.width > 0 && size.height > 0 => {
            Some(SceneEvent::Resized {
                width: size.width,
                height: size.height,
            })
        }
        _ => None,
    }
}

pub fn map_key(key_code: KeyCode) -> Option<Key> {
    match key_code {
        KeyCode::ArrowLeft => Some(Key::Left),
        KeyCode::ArrowRight => Some(Key::Right),
        KeyCode::ArrowUp => Some(Key::Up),
        KeyCode::ArrowDown => Some(Key::Down),
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::Space => Some(Key::Space),
        KeyCode::Enter | KeyCode::NumpadEnter => Some(Key::Enter),
        KeyCode::Tab => Some(Key::Tab),
        KeyCode::Backspace => Some(Key::Backspace),
        KeyCode::KeyW => Some(Key::W),
        KeyCode::KeyA => Some(Key::A),
        KeyCode::KeyS => Some(Key::S),
        KeyCode::KeyD => Some(Key::D),
        KeyCode::KeyR => Some(Key::R),
        _ => None,
    }
}

pub fn map_mouse_button(button: MouseButton) -> Option<MouseBtn> {
    match button {
        MouseButton::Left => Some(MouseBtn::Left),
        MouseButton::Right => Some(MouseBtn::Right),
        MouseButton::Middle => Some(MouseBtn::Middle),
        _ => None,
    }
}
