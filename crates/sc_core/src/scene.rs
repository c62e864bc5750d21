//! The `Scene` capability and the handle scenes use to talk to their manager.
//!
//! A scene never stores a reference to the `SceneManager`. Instead, every hook
//! that may want to affect the manager receives a short-lived `SceneContext`.
//! Requests recorded on it (switch scene, quit) are applied by the manager once
//! the hook has returned, so a scene is never re-entered while one of its own
//! hooks is still on the stack.

use std::any::Any;
use std::collections::HashMap;

use crate::canvas::Canvas;
use crate::event::SceneEvent;

/// Hand-off payload returned by `Scene::leave` and passed to the next
/// scene's `Scene::enter`.
pub type SceneData = Box<dyn Any>;

pub type SceneRegistry = HashMap<String, Box<dyn Scene>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl ScreenSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

pub trait Scene {
    /// Return scene-local state to its initial values.
    fn reset(&mut self);

    /// Called when the scene becomes current. `data` is whatever the previous
    /// scene's `leave` returned; `None` on the initial activation.
    fn enter(&mut self, data: Option<SceneData>, ctx: &mut SceneContext);

    /// Called when the scene stops being current.
    fn leave(&mut self) -> Option<SceneData>;

    fn handle_event(&mut self, event: &SceneEvent, ctx: &mut SceneContext);

    /// `dt` is the wall-clock seconds elapsed since the previous frame.
    fn update(&mut self, dt: f64, ctx: &mut SceneContext);

    fn draw(&mut self, canvas: &mut Canvas);
}

/// Non-owning view of the manager, valid for the duration of one hook call.
pub struct SceneContext {
    screen: ScreenSize,
    current: String,
    pending_goto: Option<String>,
    quit_requested: bool,
}

impl SceneContext {
    pub fn new(screen: ScreenSize, current: &str) -> Self {
        Self {
            screen,
            current: current.to_string(),
            pending_goto: None,
            quit_requested: false,
        }
    }

    pub fn screen(&self) -> ScreenSize {
        self.screen
    }

    /// Name the active scene is registered under.
    pub fn current_scene(&self) -> &str {
        &self.current
    }

    /// Switch to `name` once the current hook returns. The last request wins.
    pub fn goto(&mut self, name: impl Into<String>) {
        self.pending_goto = Some(name.into());
    }

    pub fn quit(&mut self) {
        self.quit_requested = true;
    }

    pub fn pending_goto(&self) -> Option<&str> {
        self.pending_goto.as_deref()
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub(crate) fn take_goto(&mut self) -> Option<String> {
        self.pending_goto.take()
    }
}
