use sc_core::{Canvas, Key, Scene, SceneContext, SceneData, SceneEvent};

use crate::constants::GALLERY_SCENE;
use crate::scenes::GalleryRequest;

const FRAME_SIZES: [u32; 3] = [8, 16, 32];
const BLINK_PERIOD: f64 = 0.8;

/// Entry scene. Left/Right pick the frame size the gallery slices with,
/// Space/Enter opens the gallery, Escape quits.
pub struct TitleScene {
    selected: usize,
    elapsed: f64,
    last_visit_frames: Option<usize>,
}

impl TitleScene {
    pub fn new() -> Self {
        Self {
            selected: 1,
            elapsed: 0.0,
            last_visit_frames: None,
        }
    }

    pub fn selected_frame_size(&self) -> u32 {
        FRAME_SIZES[self.selected]
    }
}

impl Default for TitleScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for TitleScene {
    fn reset(&mut self) {
        self.selected = 1;
        self.elapsed = 0.0;
        self.last_visit_frames = None;
    }

    fn enter(&mut self, data: Option<SceneData>, _ctx: &mut SceneContext) {
        self.elapsed = 0.0;
        if let Some(frames) = data.and_then(|d| d.downcast::<usize>().ok()) {
            log::info!("Back on title after viewing {} frame(s)", frames);
            self.last_visit_frames = Some(*frames);
        }
    }

    fn leave(&mut self) -> Option<SceneData> {
        Some(Box::new(GalleryRequest {
            frame_size: self.selected_frame_size(),
        }))
    }

    fn handle_event(&mut self, event: &SceneEvent, ctx: &mut SceneContext) {
        match event.pressed_key() {
            Some(Key::Left) | Some(Key::A) => {
                self.selected = self.selected.saturating_sub(1);
            }
            Some(Key::Right) | Some(Key::D) => {
                self.selected = (self.selected + 1).min(FRAME_SIZES.len() - 1);
            }
            Some(Key::Space) | Some(Key::Enter) => ctx.goto(GALLERY_SCENE),
            Some(Key::Escape) => ctx.quit(),
            _ => {}
        }
    }

    fn update(&mut self, dt: f64, _ctx: &mut SceneContext) {
        self.elapsed += dt;
    }

    fn draw(&mut self, canvas: &mut Canvas) {
        let (width, height) = canvas.size();
        canvas.clear([24, 28, 40, 255]);

        // One swatch per frame size, selected one highlighted.
        let swatch = 48u32;
        let gap = 24u32;
        let count = FRAME_SIZES.len() as u32;
        let total = count * swatch + (count - 1) * gap;
        let left = width.saturating_sub(total) / 2;
        let top = (height / 2).saturating_sub(swatch / 2);
        for (i, size) in FRAME_SIZES.iter().enumerate() {
            let x = (left + i as u32 * (swatch + gap)) as i32;
            if i == self.selected {
                canvas.fill_rect(x - 4, top as i32 - 4, swatch + 8, swatch + 8, [240, 200, 80, 255]);
            }
            canvas.fill_rect(x, top as i32, swatch, swatch, [70, 90, 140, 255]);
            let inner = (*size).min(swatch);
            let offset = ((swatch - inner) / 2) as i32;
            canvas.fill_rect(x + offset, top as i32 + offset, inner, inner, [200, 220, 255, 255]);
        }

        if (self.elapsed / BLINK_PERIOD).fract() < 0.5 {
            canvas.fill_rect(
                (width / 2) as i32 - 80,
                (top + swatch + 40) as i32,
                160,
                8,
                [240, 240, 240, 255],
            );
        }

        if let Some(frames) = self.last_visit_frames {
            // Small tally of the frames seen on the previous gallery visit.
            for i in 0..frames.min(32) as i32 {
                canvas.fill_rect(16 + i * 6, 16, 4, 4, [120, 200, 120, 255]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sc_core::{SceneManager, SceneRegistry, ScreenSize, START_SCENE};

    fn manager_with_title() -> SceneManager {
        let mut scenes = SceneRegistry::new();
        scenes.insert(START_SCENE.to_string(), Box::new(TitleScene::new()) as Box<dyn Scene>);
        scenes.insert(
            GALLERY_SCENE.to_string(),
            Box::new(crate::scenes::GalleryScene::new(None)) as Box<dyn Scene>,
        );
        SceneManager::new(ScreenSize::new(320, 240), scenes).unwrap()
    }

    #[test]
    fn selection_is_clamped() {
        let mut title = TitleScene::new();
        let mut ctx = SceneContext::new(ScreenSize::new(320, 240), START_SCENE);
        for _ in 0..5 {
            title.handle_event(&SceneEvent::KeyDown(Key::Right), &mut ctx);
        }
        assert_eq!(title.selected_frame_size(), 32);
        for _ in 0..5 {
            title.handle_event(&SceneEvent::KeyDown(Key::Left), &mut ctx);
        }
        assert_eq!(title.selected_frame_size(), 8);
        assert!(ctx.pending_goto().is_none());
    }

    #[test]
    fn space_opens_gallery() {
        let mut manager = manager_with_title();
        manager.handle_event(&SceneEvent::KeyDown(Key::Space)).unwrap();
        assert_eq!(manager.current_name(), GALLERY_SCENE);
    }

    #[test]
    fn escape_requests_quit() {
        let mut manager = manager_with_title();
        manager.handle_event(&SceneEvent::KeyDown(Key::Escape)).unwrap();
        assert!(manager.should_quit());
        assert_eq!(manager.current_name(), START_SCENE);
    }

    #[test]
    fn leave_hands_over_selected_frame_size() {
        let mut title = TitleScene::new();
        title.selected = 0;
        let data = title.leave().expect("title always hands off");
        let request = data.downcast::<GalleryRequest>().expect("gallery request");
        assert_eq!(request.frame_size, 8);
    }

    #[test]
    fn draw_fills_canvas() {
        let mut title = TitleScene::new();
        let mut canvas = Canvas::new(320, 240);
        title.draw(&mut canvas);
        assert_eq!(canvas.pixel(0, 0), Some([24, 28, 40, 255]));
    }
}
