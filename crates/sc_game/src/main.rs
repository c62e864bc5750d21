//! Stagecraft -- window, frame loop and application entry point.
//!
//! winit drives the loop through `ApplicationHandler`. Each iteration:
//!
//!   1. pending window events are translated to `SceneEvent` and handed to the
//!      `SceneManager`, which forwards them to the active scene
//!   2. on `RedrawRequested` the manager measures `dt`, runs `update` then
//!      `draw` into the CPU canvas
//!   3. the canvas is uploaded and presented through wgpu
//!
//! A quit event (window close, or a scene calling `ctx.quit()`) exits the
//! loop. When a frame-rate cap is configured the loop sleeps until the next
//! frame deadline instead of polling.

mod constants;
mod scenes;

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use constants::{CONFIG_PATH, FPS, GALLERY_SCENE, SCREEN_HEIGHT, SCREEN_WIDTH, SHEET_PATH, TITLE};
use sc_core::{
    Canvas, FrameLimiter, Scene, SceneEvent, SceneManager, SceneRegistry, ScreenSize, START_SCENE,
};
use sc_platform::{load_platform_config, translate_window_event, PlatformConfig};
use sc_render::{CanvasPresenter, GpuContext, PresentOutcome};
use scenes::{GalleryScene, TitleScene};

const FPS_LOG_INTERVAL: u64 = 600;

/// Window-bound resources, created once the event loop is resumed.
struct FrameState {
    window: Arc<Window>,
    gpu: GpuContext,
    presenter: CanvasPresenter,
    canvas: Canvas,
}

struct App {
    config: PlatformConfig,
    limiter: FrameLimiter,
    manager: SceneManager,
    frame: Option<FrameState>,
    next_frame_at: Option<Instant>,
}

impl App {
    fn new(config: PlatformConfig, manager: SceneManager) -> Self {
        let limiter = FrameLimiter::new(config.fps_cap);
        if let Some(interval) = limiter.frame_interval() {
            log::info!("Frame rate capped at {:.1}ms per frame", interval.as_secs_f64() * 1000.0);
        }
        Self {
            config,
            limiter,
            manager,
            frame: None,
            next_frame_at: None,
        }
    }

    fn dispatch(&mut self, event_loop: &ActiveEventLoop, event: SceneEvent) {
        if let SceneEvent::Resized { width, height } = event {
            let Some(frame) = self.frame.as_mut() else {
                return;
            };
            if !self.config.resizable {
                // Fixed-size canvas; the presenter letterboxes it in the window.
                return;
            }
            let logical = winit::dpi::PhysicalSize::new(width, height)
                .to_logical::<u32>(frame.window.scale_factor());
            frame.canvas.resize(logical.width, logical.height);
            let event = SceneEvent::Resized {
                width: logical.width,
                height: logical.height,
            };
            if let Err(err) = self.manager.handle_event(&event) {
                log::error!("Scene error: {}", err);
                event_loop.exit();
            }
            return;
        }

        if let Err(err) = self.manager.handle_event(&event) {
            log::error!("Scene error: {}", err);
            event_loop.exit();
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(frame) = self.frame.as_mut() else {
            return;
        };
        if frame.gpu.is_minimized() {
            return;
        }

        self.next_frame_at = self.limiter.next_deadline(Instant::now());

        if let Err(err) = self.manager.frame(&mut frame.canvas) {
            log::error!("Scene error: {}", err);
            event_loop.exit();
            return;
        }
        match frame.presenter.present(&frame.gpu, &frame.canvas) {
            Ok(PresentOutcome::Presented) => {}
            Ok(PresentOutcome::Skipped(reason)) => log::debug!("Frame skipped: {:?}", reason),
            Err(err) => {
                log::error!("{}", err);
                event_loop.exit();
                return;
            }
        }

        let clock = self.manager.clock();
        if clock.frame_count % FPS_LOG_INTERVAL == 0 {
            log::debug!(
                "'{}': {:.1} fps ({:.2}ms)",
                self.manager.current_name(),
                clock.smoothed_fps,
                clock.smoothed_frame_time_ms
            );
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.frame.is_some() {
            return;
        }
        let window = sc_platform::create_window(event_loop, &self.config);
        log::info!(
            "Window created: {}x{}",
            self.config.width,
            self.config.height
        );
        // A frame cap paces the loop itself; otherwise the display does.
        let gpu = match GpuContext::new(window.clone(), self.config.fps_cap.is_none()) {
            Ok(gpu) => gpu,
            Err(err) => {
                log::error!("{}", err);
                event_loop.exit();
                return;
            }
        };
        let canvas = Canvas::new(self.config.width, self.config.height);
        let presenter = CanvasPresenter::new(&gpu.device, gpu.surface_format, canvas.size());
        self.frame = Some(FrameState {
            window,
            gpu,
            presenter,
            canvas,
        });
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(frame) = &self.frame else {
            return;
        };
        if frame.gpu.is_minimized() {
            // Nothing to draw; the next resize wakes the loop.
            event_loop.set_control_flow(ControlFlow::Wait);
            return;
        }
        match self.next_frame_at {
            Some(deadline) if Instant::now() < deadline => {
                event_loop.set_control_flow(ControlFlow::WaitUntil(deadline));
            }
            _ => {
                event_loop.set_control_flow(ControlFlow::Poll);
                frame.window.request_redraw();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let WindowEvent::Resized(size) = &event {
            // Zero sizes reach the surface (minimized) but never the scenes.
            if let Some(frame) = self.frame.as_mut() {
                frame.gpu.resize(size.width, size.height);
            }
        }

        if let WindowEvent::RedrawRequested = event {
            self.redraw(event_loop);
        } else if let Some(scene_event) = translate_window_event(&event) {
            self.dispatch(event_loop, scene_event);
        }

        if self.manager.should_quit() {
            log::info!("Quit requested, exiting.");
            event_loop.exit();
        }
    }
}

fn build_scenes() -> SceneRegistry {
    let gallery = if Path::new(SHEET_PATH).exists() {
        GalleryScene::from_file(SHEET_PATH)
    } else {
        log::info!("No sprite sheet at '{}', using a generated one", SHEET_PATH);
        GalleryScene::new(None)
    };

    let mut scenes = SceneRegistry::new();
    scenes.insert(START_SCENE.to_string(), Box::new(TitleScene::new()) as Box<dyn Scene>);
    scenes.insert(GALLERY_SCENE.to_string(), Box::new(gallery) as Box<dyn Scene>);
    scenes
}

/// Run the frame loop until a quit event arrives.
fn run_app(config: PlatformConfig, scenes: SceneRegistry) -> Result<(), Box<dyn std::error::Error>> {
    let manager = SceneManager::new(ScreenSize::new(config.width, config.height), scenes)?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config, manager);
    event_loop.run_app(&mut app)?;
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Stagecraft starting...");

    let defaults = PlatformConfig {
        title: TITLE.to_string(),
        width: SCREEN_WIDTH,
        height: SCREEN_HEIGHT,
        fps_cap: FPS,
        ..PlatformConfig::default()
    };
    let config = match load_platform_config(Path::new(CONFIG_PATH), defaults) {
        Ok(config) => config,
        Err(err) => {
            log::error!("{}", err);
            std::process::exit(1);
        }
    };

    if let Err(err) = run_app(config, build_scenes()) {
        log::error!("{}", err);
        std::process::exit(1);
    }
}
