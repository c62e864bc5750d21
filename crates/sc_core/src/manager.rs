//! Scene registry and per-frame dispatch.
//!
//! `SceneManager` owns every registered scene and the name of the active one.
//! Per frame the host loop feeds it events (`handle_event`) and then calls
//! `frame`, which measures `dt`, runs `update` and finally `draw` on the
//! active scene. Transitions go through `goto`, which calls `leave` on the
//! outgoing scene and passes its hand-off data to `enter` on the incoming one.
//!
//! Invariant: after `new` succeeds `current` always names a registered scene.
//! Unknown targets are rejected before any hook runs, and the active scene can
//! neither be removed nor replaced.
//!
//! A scene may request another transition from `enter`. Such chains are
//! followed iteratively and cut off after `MAX_CHAINED_TRANSITIONS` hops.

use std::time::Instant;

use crate::canvas::Canvas;
use crate::error::SceneError;
use crate::event::SceneEvent;
use crate::scene::{Scene, SceneContext, SceneRegistry, ScreenSize};
use crate::time::FrameClock;

/// Name of the scene activated by `SceneManager::new`.
pub const START_SCENE: &str = "start";

/// Transitions one `goto` may set off through scenes redirecting from
/// `enter` before the manager gives up.
pub const MAX_CHAINED_TRANSITIONS: usize = 32;

pub struct SceneManager {
    scenes: SceneRegistry,
    current: String,
    screen: ScreenSize,
    clock: FrameClock,
    quit: bool,
}

impl SceneManager {
    pub fn new(screen: ScreenSize, scenes: SceneRegistry) -> Result<Self, SceneError> {
        if !scenes.contains_key(START_SCENE) {
            return Err(SceneError::MissingStartScene);
        }

        let mut manager = Self {
            scenes,
            current: START_SCENE.to_string(),
            screen,
            clock: FrameClock::new(),
            quit: false,
        };
        log::info!(
            "Scene manager bound to {} scene(s) at {}x{}; entering '{}'",
            manager.scenes.len(),
            screen.width,
            screen.height,
            START_SCENE
        );
        manager.dispatch(|scene, ctx| scene.enter(None, ctx))?;
        Ok(manager)
    }

    /// Leave the current scene and enter `name`, forwarding the hand-off data.
    pub fn goto(&mut self, name: &str) -> Result<(), SceneError> {
        let next = self.transition(name)?;
        self.follow(next)
    }

    /// Register a scene, returning the instance it replaced, if any.
    pub fn add_scene(
        &mut self,
        name: impl Into<String>,
        scene: Box<dyn Scene>,
    ) -> Result<Option<Box<dyn Scene>>, SceneError> {
        let name = name.into();
        if name == self.current {
            return Err(SceneError::ActiveScene(name));
        }
        log::debug!("Registering scene '{}'", name);
        Ok(self.scenes.insert(name, scene))
    }

    pub fn add_scenes<I, S>(&mut self, scenes: I) -> Result<(), SceneError>
    where
        I: IntoIterator<Item = (S, Box<dyn Scene>)>,
        S: Into<String>,
    {
        for (name, scene) in scenes {
            self.add_scene(name, scene)?;
        }
        Ok(())
    }

    /// Unregister a scene. Absent names are not an error.
    pub fn remove_scene(&mut self, name: &str) -> Result<Option<Box<dyn Scene>>, SceneError> {
        if name == self.current {
            return Err(SceneError::ActiveScene(name.to_string()));
        }
        let removed = self.scenes.remove(name);
        if removed.is_some() {
            log::debug!("Removed scene '{}'", name);
        }
        Ok(removed)
    }

    /// Forward one input event to the active scene. Quit events are consumed
    /// here and only raise the quit flag.
    pub fn handle_event(&mut self, event: &SceneEvent) -> Result<(), SceneError> {
        if event.is_quit() {
            log::info!("Quit requested");
            self.quit = true;
            return Ok(());
        }
        if let SceneEvent::Resized { width, height } = event {
            self.screen = ScreenSize::new(*width, *height);
        }
        self.dispatch(|scene, ctx| scene.handle_event(event, ctx))
    }

    /// Run `update` then `draw` on the active scene.
    pub fn frame(&mut self, canvas: &mut Canvas) -> Result<(), SceneError> {
        let dt = self.clock.tick();
        self.step(dt, canvas)
    }

    /// `frame` with `dt` measured up to `now` instead of the wall clock.
    pub fn frame_at(&mut self, now: Instant, canvas: &mut Canvas) -> Result<(), SceneError> {
        let dt = self.clock.tick_at(now);
        self.step(dt, canvas)
    }

    fn step(&mut self, dt: f64, canvas: &mut Canvas) -> Result<(), SceneError> {
        self.dispatch(|scene, ctx| scene.update(dt, ctx))?;
        self.active_mut()?.draw(canvas);
        Ok(())
    }

    pub fn reset_current(&mut self) -> Result<(), SceneError> {
        log::debug!("Resetting scene '{}'", self.current);
        self.active_mut()?.reset();
        Ok(())
    }

    pub fn current_name(&self) -> &str {
        &self.current
    }

    pub fn contains(&self, name: &str) -> bool {
        self.scenes.contains_key(name)
    }

    pub fn scene_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.scenes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    pub fn screen(&self) -> ScreenSize {
        self.screen
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    fn active_mut(&mut self) -> Result<&mut Box<dyn Scene>, SceneError> {
        self.scenes
            .get_mut(&self.current)
            .ok_or_else(|| SceneError::UnknownScene(self.current.clone()))
    }

    /// Run one hook on the active scene, then apply whatever it asked for.
    fn dispatch<F>(&mut self, hook: F) -> Result<(), SceneError>
    where
        F: FnOnce(&mut dyn Scene, &mut SceneContext),
    {
        let next = self.run_hook(hook)?;
        self.follow(next)
    }

    /// Run `hook` and record a quit request. Returns the transition the
    /// scene asked for, if any.
    fn run_hook<F>(&mut self, hook: F) -> Result<Option<String>, SceneError>
    where
        F: FnOnce(&mut dyn Scene, &mut SceneContext),
    {
        let mut ctx = SceneContext::new(self.screen, &self.current);
        let scene = self.active_mut()?;
        hook(&mut **scene, &mut ctx);

        if ctx.quit_requested() {
            log::info!("Scene '{}' requested quit", ctx.current_scene());
            self.quit = true;
        }
        Ok(ctx.take_goto())
    }

    /// One leave/enter pair. Returns the transition the entered scene
    /// requested from `enter`.
    fn transition(&mut self, name: &str) -> Result<Option<String>, SceneError> {
        if !self.scenes.contains_key(name) {
            log::error!("Refusing transition to unknown scene '{}'", name);
            return Err(SceneError::UnknownScene(name.to_string()));
        }

        let data = self.active_mut()?.leave();
        log::info!("Scene transition: '{}' -> '{}'", self.current, name);
        self.current = name.to_string();
        self.run_hook(|scene, ctx| scene.enter(data, ctx))
    }

    fn follow(&mut self, mut next: Option<String>) -> Result<(), SceneError> {
        let mut hops = 0;
        while let Some(name) = next {
            if hops == MAX_CHAINED_TRANSITIONS {
                log::error!(
                    "Gave up after {} chained transitions, stuck at '{}'",
                    hops,
                    self.current
                );
                return Err(SceneError::TransitionLoop {
                    scene: self.current.clone(),
                    limit: MAX_CHAINED_TRANSITIONS,
                });
            }
            hops += 1;
            next = self.transition(&name)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Key;
    use crate::scene::SceneData;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    type CallLog = Rc<RefCell<Vec<String>>>;

    /// Records every hook invocation as `"<name>.<hook>"` in a shared log.
    struct Recorder {
        name: &'static str,
        log: CallLog,
        goto_on_space: Option<&'static str>,
        goto_on_enter: Option<&'static str>,
        /// Unlike `goto_on_enter`, redirects on every entry.
        redirect_on_enter: Option<&'static str>,
        quit_on_escape: bool,
    }

    impl Recorder {
        fn new(name: &'static str, log: &CallLog) -> Self {
            Self {
                name,
                log: Rc::clone(log),
                goto_on_space: None,
                goto_on_enter: None,
                redirect_on_enter: None,
                quit_on_escape: false,
            }
        }

        fn record(&self, entry: String) {
            self.log.borrow_mut().push(entry);
        }
    }

    impl Scene for Recorder {
        fn reset(&mut self) {
            self.record(format!("{}.reset", self.name));
        }

        fn enter(&mut self, data: Option<SceneData>, ctx: &mut SceneContext) {
            let payload = data
                .and_then(|d| d.downcast::<String>().ok())
                .map(|s| *s)
                .unwrap_or_else(|| "none".to_string());
            self.record(format!("{}.enter({})", self.name, payload));
            if let Some(next) = self.goto_on_enter.take().or(self.redirect_on_enter) {
                ctx.goto(next);
            }
        }

        fn leave(&mut self) -> Option<SceneData> {
            self.record(format!("{}.leave", self.name));
            Some(Box::new(format!("from-{}", self.name)))
        }

        fn handle_event(&mut self, event: &SceneEvent, ctx: &mut SceneContext) {
            self.record(format!("{}.event({:?})", self.name, event));
            match event.pressed_key() {
                Some(Key::Space) => {
                    if let Some(next) = self.goto_on_space {
                        ctx.goto(next);
                    }
                }
                Some(Key::Escape) if self.quit_on_escape => ctx.quit(),
                _ => {}
            }
        }

        fn update(&mut self, dt: f64, _ctx: &mut SceneContext) {
            assert!(dt >= 0.0);
            self.record(format!("{}.update", self.name));
        }

        fn draw(&mut self, _canvas: &mut Canvas) {
            self.record(format!("{}.draw", self.name));
        }
    }

    fn registry(scenes: Vec<(&str, Recorder)>) -> SceneRegistry {
        scenes
            .into_iter()
            .map(|(name, scene)| (name.to_string(), Box::new(scene) as Box<dyn Scene>))
            .collect()
    }

    fn screen() -> ScreenSize {
        ScreenSize::new(320, 240)
    }

    fn entries(log: &CallLog) -> Vec<String> {
        log.borrow().clone()
    }

    #[test]
    fn new_enters_start_scene_exactly_once() {
        let log = CallLog::default();
        let scenes = registry(vec![
            ("start", Recorder::new("start", &log)),
            ("menu", Recorder::new("menu", &log)),
        ]);

        let manager = SceneManager::new(screen(), scenes).expect("start scene present");
        assert_eq!(manager.current_name(), "start");
        assert_eq!(entries(&log), vec!["start.enter(none)"]);
    }

    #[test]
    fn new_without_start_scene_fails() {
        let log = CallLog::default();
        let scenes = registry(vec![("menu", Recorder::new("menu", &log))]);

        let err = SceneManager::new(screen(), scenes).err().expect("must fail");
        assert!(matches!(err, SceneError::MissingStartScene));
        assert!(entries(&log).is_empty());
    }

    #[test]
    fn goto_leaves_then_enters_with_payload() {
        let log = CallLog::default();
        let scenes = registry(vec![
            ("start", Recorder::new("start", &log)),
            ("menu", Recorder::new("menu", &log)),
            ("other", Recorder::new("other", &log)),
        ]);
        let mut manager = SceneManager::new(screen(), scenes).unwrap();
        log.borrow_mut().clear();

        manager.goto("menu").expect("menu is registered");
        assert_eq!(manager.current_name(), "menu");
        assert_eq!(entries(&log), vec!["start.leave", "menu.enter(from-start)"]);
    }

    #[test]
    fn goto_unknown_scene_fails_without_running_hooks() {
        let log = CallLog::default();
        let scenes = registry(vec![("start", Recorder::new("start", &log))]);
        let mut manager = SceneManager::new(screen(), scenes).unwrap();
        log.borrow_mut().clear();

        let err = manager.goto("missing").expect_err("unknown scene");
        assert!(matches!(err, SceneError::UnknownScene(ref n) if n == "missing"));
        assert_eq!(manager.current_name(), "start");
        assert!(entries(&log).is_empty());
    }

    #[test]
    fn goto_current_scene_reenters_it() {
        let log = CallLog::default();
        let scenes = registry(vec![("start", Recorder::new("start", &log))]);
        let mut manager = SceneManager::new(screen(), scenes).unwrap();
        log.borrow_mut().clear();

        manager.goto("start").unwrap();
        assert_eq!(entries(&log), vec!["start.leave", "start.enter(from-start)"]);
    }

    #[test]
    fn events_reach_only_the_active_scene() {
        let log = CallLog::default();
        let scenes = registry(vec![
            ("start", Recorder::new("start", &log)),
            ("menu", Recorder::new("menu", &log)),
        ]);
        let mut manager = SceneManager::new(screen(), scenes).unwrap();
        log.borrow_mut().clear();

        manager.handle_event(&SceneEvent::KeyDown(Key::A)).unwrap();
        assert_eq!(entries(&log), vec!["start.event(KeyDown(A))"]);
    }

    #[test]
    fn quit_event_is_consumed_by_manager() {
        let log = CallLog::default();
        let scenes = registry(vec![("start", Recorder::new("start", &log))]);
        let mut manager = SceneManager::new(screen(), scenes).unwrap();
        log.borrow_mut().clear();

        assert!(!manager.should_quit());
        manager.handle_event(&SceneEvent::Quit).unwrap();
        assert!(manager.should_quit());
        assert!(entries(&log).is_empty());
    }

    #[test]
    fn scene_can_request_quit() {
        let log = CallLog::default();
        let mut start = Recorder::new("start", &log);
        start.quit_on_escape = true;
        let mut manager = SceneManager::new(screen(), registry(vec![("start", start)])).unwrap();

        manager.handle_event(&SceneEvent::KeyDown(Key::Escape)).unwrap();
        assert!(manager.should_quit());
    }

    #[test]
    fn scene_requested_transition_runs_after_hook() {
        let log = CallLog::default();
        let mut start = Recorder::new("start", &log);
        start.goto_on_space = Some("menu");
        let scenes = registry(vec![("start", start), ("menu", Recorder::new("menu", &log))]);
        let mut manager = SceneManager::new(screen(), scenes).unwrap();
        log.borrow_mut().clear();

        manager.handle_event(&SceneEvent::KeyDown(Key::Space)).unwrap();
        assert_eq!(manager.current_name(), "menu");
        assert_eq!(
            entries(&log),
            vec![
                "start.event(KeyDown(Space))",
                "start.leave",
                "menu.enter(from-start)"
            ]
        );
    }

    #[test]
    fn scene_requested_unknown_transition_surfaces_error() {
        let log = CallLog::default();
        let mut start = Recorder::new("start", &log);
        start.goto_on_space = Some("nowhere");
        let mut manager = SceneManager::new(screen(), registry(vec![("start", start)])).unwrap();

        let err = manager
            .handle_event(&SceneEvent::KeyDown(Key::Space))
            .expect_err("unknown target");
        assert!(matches!(err, SceneError::UnknownScene(_)));
        assert_eq!(manager.current_name(), "start");
    }

    #[test]
    fn transitions_requested_from_enter_chain() {
        let log = CallLog::default();
        let mut start = Recorder::new("start", &log);
        start.goto_on_enter = Some("menu");
        let scenes = registry(vec![("start", start), ("menu", Recorder::new("menu", &log))]);

        let manager = SceneManager::new(screen(), scenes).unwrap();
        assert_eq!(manager.current_name(), "menu");
        assert_eq!(
            entries(&log),
            vec!["start.enter(none)", "start.leave", "menu.enter(from-start)"]
        );
    }

    #[test]
    fn multi_step_enter_chain_settles() {
        let log = CallLog::default();
        let mut start = Recorder::new("start", &log);
        start.goto_on_enter = Some("a");
        let mut a = Recorder::new("a", &log);
        a.goto_on_enter = Some("b");
        let scenes = registry(vec![("start", start), ("a", a), ("b", Recorder::new("b", &log))]);

        let manager = SceneManager::new(screen(), scenes).unwrap();
        assert_eq!(manager.current_name(), "b");
        assert_eq!(
            entries(&log),
            vec![
                "start.enter(none)",
                "start.leave",
                "a.enter(from-start)",
                "a.leave",
                "b.enter(from-a)"
            ]
        );
    }

    #[test]
    fn endless_enter_redirects_are_cut_off() {
        let log = CallLog::default();
        let mut start = Recorder::new("start", &log);
        start.redirect_on_enter = Some("a");
        let mut a = Recorder::new("a", &log);
        a.redirect_on_enter = Some("start");
        let scenes = registry(vec![("start", start), ("a", a)]);

        let err = SceneManager::new(screen(), scenes).err().expect("loop detected");
        assert!(matches!(
            err,
            SceneError::TransitionLoop { limit, .. } if limit == MAX_CHAINED_TRANSITIONS
        ));
        let enters = entries(&log).iter().filter(|e| e.contains(".enter(")).count();
        assert_eq!(enters, MAX_CHAINED_TRANSITIONS + 1);
    }

    #[test]
    fn explicit_goto_into_redirect_loop_fails() {
        let log = CallLog::default();
        let mut a = Recorder::new("a", &log);
        a.redirect_on_enter = Some("b");
        let mut b = Recorder::new("b", &log);
        b.redirect_on_enter = Some("a");
        let scenes = registry(vec![("start", Recorder::new("start", &log)), ("a", a), ("b", b)]);
        let mut manager = SceneManager::new(screen(), scenes).unwrap();

        let err = manager.goto("a").expect_err("loop detected");
        assert!(matches!(err, SceneError::TransitionLoop { .. }));
        assert!(manager.contains(manager.current_name()));
    }

    #[test]
    fn frame_updates_before_drawing() {
        let log = CallLog::default();
        let scenes = registry(vec![("start", Recorder::new("start", &log))]);
        let mut manager = SceneManager::new(screen(), scenes).unwrap();
        let mut canvas = Canvas::new(8, 8);
        log.borrow_mut().clear();

        let t0 = Instant::now();
        manager.frame_at(t0, &mut canvas).unwrap();
        assert_eq!(manager.clock().dt, 0.0);
        manager
            .frame_at(t0 + Duration::from_millis(16), &mut canvas)
            .unwrap();
        assert!((manager.clock().dt - 0.016).abs() < 1e-9);
        assert_eq!(
            entries(&log),
            vec!["start.update", "start.draw", "start.update", "start.draw"]
        );
    }

    #[test]
    fn frame_ticks_the_wall_clock() {
        let log = CallLog::default();
        let scenes = registry(vec![("start", Recorder::new("start", &log))]);
        let mut manager = SceneManager::new(screen(), scenes).unwrap();
        let mut canvas = Canvas::new(8, 8);

        manager.frame(&mut canvas).unwrap();
        assert_eq!(manager.clock().dt, 0.0);
        manager.frame(&mut canvas).unwrap();
        assert!(manager.clock().dt >= 0.0);
        assert_eq!(manager.clock().frame_count, 2);
    }

    #[test]
    fn add_scene_replaces_inactive_entry() {
        let log = CallLog::default();
        let scenes = registry(vec![
            ("start", Recorder::new("start", &log)),
            ("menu", Recorder::new("menu", &log)),
        ]);
        let mut manager = SceneManager::new(screen(), scenes).unwrap();

        let replaced = manager
            .add_scene("menu", Box::new(Recorder::new("menu2", &log)))
            .unwrap();
        assert!(replaced.is_some());
        let added = manager
            .add_scene("credits", Box::new(Recorder::new("credits", &log)))
            .unwrap();
        assert!(added.is_none());
        assert_eq!(manager.scene_names(), vec!["credits", "menu", "start"]);

        log.borrow_mut().clear();
        manager.goto("menu").unwrap();
        assert_eq!(entries(&log), vec!["start.leave", "menu2.enter(from-start)"]);
    }

    #[test]
    fn add_scenes_registers_all() {
        let log = CallLog::default();
        let scenes = registry(vec![("start", Recorder::new("start", &log))]);
        let mut manager = SceneManager::new(screen(), scenes).unwrap();

        manager
            .add_scenes(vec![
                ("a", Box::new(Recorder::new("a", &log)) as Box<dyn Scene>),
                ("b", Box::new(Recorder::new("b", &log)) as Box<dyn Scene>),
            ])
            .unwrap();
        assert_eq!(manager.len(), 3);
        assert!(manager.contains("a"));
        assert!(manager.contains("b"));
    }

    #[test]
    fn active_scene_cannot_be_replaced_or_removed() {
        let log = CallLog::default();
        let scenes = registry(vec![("start", Recorder::new("start", &log))]);
        let mut manager = SceneManager::new(screen(), scenes).unwrap();

        let err = manager
            .add_scene("start", Box::new(Recorder::new("x", &log)))
            .err()
            .expect("active scene replace refused");
        assert!(matches!(err, SceneError::ActiveScene(_)));

        let err = manager.remove_scene("start").err().expect("remove refused");
        assert!(matches!(err, SceneError::ActiveScene(_)));
        assert!(manager.contains("start"));
    }

    #[test]
    fn remove_scene_drops_inactive_entry() {
        let log = CallLog::default();
        let scenes = registry(vec![
            ("start", Recorder::new("start", &log)),
            ("menu", Recorder::new("menu", &log)),
        ]);
        let mut manager = SceneManager::new(screen(), scenes).unwrap();

        assert!(manager.remove_scene("menu").unwrap().is_some());
        assert!(manager.remove_scene("menu").unwrap().is_none());
        assert!(!manager.contains("menu"));
        assert!(manager.goto("menu").is_err());
    }

    #[test]
    fn reset_current_calls_reset_on_active_scene() {
        let log = CallLog::default();
        let scenes = registry(vec![
            ("start", Recorder::new("start", &log)),
            ("menu", Recorder::new("menu", &log)),
        ]);
        let mut manager = SceneManager::new(screen(), scenes).unwrap();
        manager.goto("menu").unwrap();
        log.borrow_mut().clear();

        manager.reset_current().unwrap();
        assert_eq!(entries(&log), vec!["menu.reset"]);
    }

    #[test]
    fn resize_event_updates_screen() {
        let log = CallLog::default();
        let scenes = registry(vec![("start", Recorder::new("start", &log))]);
        let mut manager = SceneManager::new(screen(), scenes).unwrap();

        manager
            .handle_event(&SceneEvent::Resized {
                width: 800,
                height: 600,
            })
            .unwrap();
        assert_eq!(manager.screen(), ScreenSize::new(800, 600));
    }
}
