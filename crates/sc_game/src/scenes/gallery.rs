use std::path::PathBuf;

use image::{Rgba, RgbaImage};
use sc_core::{
    Canvas, Key, Scene, SceneContext, SceneData, SceneEvent, SheetLayout, SpriteSheet,
    SpriteSheetError, START_SCENE,
};

use crate::scenes::GalleryRequest;

const DEFAULT_FRAME_SIZE: u32 = 16;
const MAX_FRAMES: usize = 64;
const FRAME_DURATION: f64 = 0.12;
const THUMB_SCALE: u32 = 2;
const PREVIEW_SIZE: u32 = 192;

enum SheetSource {
    File(PathBuf),
    Image(RgbaImage),
}

/// Slices a sheet with the frame size chosen on the title scene, shows every
/// frame as a thumbnail and plays them back in order as an animation.
pub struct GalleryScene {
    source: SheetSource,
    sheet: Option<SpriteSheet>,
    current: usize,
    frame_timer: f64,
    frames_shown: usize,
    paused: bool,
}

impl GalleryScene {
    /// Uses `image` as the sheet, or a generated one when `None`.
    pub fn new(image: Option<RgbaImage>) -> Self {
        let image = image.unwrap_or_else(|| generate_sheet(32, 4, 4));
        Self::with_source(SheetSource::Image(image))
    }

    /// Reads the sheet from disk each time the scene is entered.
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self::with_source(SheetSource::File(path.into()))
    }

    fn with_source(source: SheetSource) -> Self {
        Self {
            source,
            sheet: None,
            current: 0,
            frame_timer: 0.0,
            frames_shown: 0,
            paused: false,
        }
    }

    fn slice(&self, frame_size: u32) -> Result<SpriteSheet, SpriteSheetError> {
        let layout = SheetLayout::new(frame_size, frame_size).with_limit(MAX_FRAMES);
        match &self.source {
            SheetSource::File(path) => SpriteSheet::from_path(path, layout),
            SheetSource::Image(image) => SpriteSheet::from_image(image, layout),
        }
    }

    fn frame_count(&self) -> usize {
        self.sheet.as_ref().map_or(0, SpriteSheet::len)
    }

    fn step(&mut self, forward: bool) {
        let count = self.frame_count();
        if count == 0 {
            return;
        }
        self.current = if forward {
            (self.current + 1) % count
        } else {
            (self.current + count - 1) % count
        };
        self.frames_shown += 1;
    }
}

impl Scene for GalleryScene {
    fn reset(&mut self) {
        self.current = 0;
        self.frame_timer = 0.0;
        self.frames_shown = 0;
        self.paused = false;
    }

    fn enter(&mut self, data: Option<SceneData>, _ctx: &mut SceneContext) {
        let frame_size = data
            .and_then(|d| d.downcast::<GalleryRequest>().ok())
            .map_or(DEFAULT_FRAME_SIZE, |request| request.frame_size);

        self.reset();
        self.sheet = match self.slice(frame_size) {
            Ok(sheet) => {
                log::info!(
                    "Gallery showing {} frame(s) of {}x{}",
                    sheet.len(),
                    frame_size,
                    frame_size
                );
                Some(sheet)
            }
            Err(err) => {
                log::error!("Gallery could not slice sprite sheet: {}", err);
                None
            }
        };
    }

    fn leave(&mut self) -> Option<SceneData> {
        Some(Box::new(self.frames_shown))
    }

    fn handle_event(&mut self, event: &SceneEvent, ctx: &mut SceneContext) {
        match event.pressed_key() {
            Some(Key::Escape) | Some(Key::Backspace) => ctx.goto(START_SCENE),
            Some(Key::Space) => self.paused = !self.paused,
            Some(Key::Right) => self.step(true),
            Some(Key::Left) => self.step(false),
            Some(Key::R) => self.reset(),
            _ => {}
        }
    }

    fn update(&mut self, dt: f64, _ctx: &mut SceneContext) {
        if self.paused || self.frame_count() == 0 {
            return;
        }
        self.frame_timer += dt;
        while self.frame_timer >= FRAME_DURATION {
            self.frame_timer -= FRAME_DURATION;
            self.step(true);
        }
    }

    fn draw(&mut self, canvas: &mut Canvas) {
        canvas.clear([16, 16, 20, 255]);
        let Some(sheet) = &self.sheet else {
            canvas.fill_rect(0, 0, canvas.width(), 8, [200, 40, 40, 255]);
            return;
        };
        let (frame_w, frame_h) = sheet.frame_size();

        let margin = 8i32;
        let thumb_w = (frame_w * THUMB_SCALE) as i32;
        let thumb_h = (frame_h * THUMB_SCALE) as i32;
        let preview_left = canvas.width() as i32 - PREVIEW_SIZE as i32 - margin;
        let (mut x, mut y) = (margin, margin);
        for (i, frame) in sheet.frames().iter().enumerate() {
            if x + thumb_w > preview_left - margin {
                x = margin;
                y += thumb_h + margin;
            }
            if i == self.current {
                canvas.fill_rect(x - 2, y - 2, thumb_w as u32 + 4, thumb_h as u32 + 4, [240, 200, 80, 255]);
            }
            canvas.blit_scaled(frame, x, y, THUMB_SCALE);
            x += thumb_w + margin;
        }

        if let Some(frame) = sheet.frame(self.current) {
            let scale = (PREVIEW_SIZE / frame_w.max(frame_h)).max(1);
            canvas.fill_rect(preview_left, margin, PREVIEW_SIZE, PREVIEW_SIZE, [40, 40, 52, 255]);
            canvas.blit_scaled(frame, preview_left, margin, scale);
        }
    }
}

/// Build a `columns`x`rows` sheet of `cell`-sized frames. Each frame has its
/// own tint and a marker that walks around the cell border, so playing the
/// frames in order reads as motion.
pub fn generate_sheet(cell: u32, columns: u32, rows: u32) -> RgbaImage {
    let total = (columns * rows).max(1);
    let marker = (cell / 4).max(1);
    RgbaImage::from_fn(cell * columns, cell * rows, |x, y| {
        let (column, row) = (x / cell, y / cell);
        let index = row * columns + column;
        let (local_x, local_y) = (x % cell, y % cell);

        if local_x == 0 || local_y == 0 || local_x == cell - 1 || local_y == cell - 1 {
            return Rgba([10, 10, 10, 255]);
        }

        let travel = cell.saturating_sub(marker + 2).max(1);
        let progress = index * travel * 4 / total;
        let (marker_x, marker_y) = match progress / travel {
            0 => (1 + progress % travel, 1),
            1 => (1 + travel, 1 + progress % travel),
            2 => (1 + travel - progress % travel, 1 + travel),
            _ => (1, 1 + travel - progress % travel),
        };
        if (marker_x..marker_x + marker).contains(&local_x)
            && (marker_y..marker_y + marker).contains(&local_y)
        {
            return Rgba([250, 250, 250, 255]);
        }

        let hue = (index * 255 / total) as u8;
        Rgba([hue, 255 - hue, 160, 255])
    })
}
