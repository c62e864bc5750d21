//! CPU-side display surface handed to `Scene::draw`.
//!
//! Scenes paint into an RGBA8 buffer; the render crate uploads the finished
//! buffer to the GPU once per frame. Coordinates are pixels with the origin at
//! the top-left corner. Every drawing call clips against the canvas bounds.

use image::{imageops, Rgba, RgbaImage};

pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width.max(1), height.max(1)),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Reallocate to a new size. Contents are discarded.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.size() == (width, height) || width == 0 || height == 0 {
            return;
        }
        self.image = RgbaImage::new(width, height);
    }

    pub fn clear(&mut self, color: [u8; 4]) {
        for pixel in self.image.pixels_mut() {
            *pixel = Rgba(color);
        }
    }

    /// Fill an axis-aligned rectangle, replacing whatever was underneath.
    pub fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: [u8; 4]) {
        let (cw, ch) = self.size();
        let x0 = i64::from(x).clamp(0, i64::from(cw)) as u32;
        let y0 = i64::from(y).clamp(0, i64::from(ch)) as u32;
        let x1 = (i64::from(x) + i64::from(width)).clamp(0, i64::from(cw)) as u32;
        let y1 = (i64::from(y) + i64::from(height)).clamp(0, i64::from(ch)) as u32;
        for py in y0..y1 {
            for px in x0..x1 {
                self.image.put_pixel(px, py, Rgba(color));
            }
        }
    }

    /// Alpha-blend `sprite` with its top-left corner at `(x, y)`.
    pub fn blit(&mut self, sprite: &RgbaImage, x: i32, y: i32) {
        imageops::overlay(&mut self.image, sprite, i64::from(x), i64::from(y));
    }

    /// Blit with an integer nearest-neighbour upscale, for pixel-art frames.
    pub fn blit_scaled(&mut self, sprite: &RgbaImage, x: i32, y: i32, scale: u32) {
        if scale <= 1 {
            self.blit(sprite, x, y);
            return;
        }
        let scaled = imageops::resize(
            sprite,
            sprite.width() * scale,
            sprite.height() * scale,
            imageops::FilterType::Nearest,
        );
        self.blit(&scaled, x, y);
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x < self.width() && y < self.height() {
            Some(self.image.get_pixel(x, y).0)
        } else {
            None
        }
    }

    /// Raw RGBA8 rows, tightly packed, for GPU upload.
    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }
}
