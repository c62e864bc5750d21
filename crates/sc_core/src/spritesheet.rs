//! Slicing a sprite sheet into equally sized frames.
//!
//! The sheet is scanned row-major: top to bottom in steps of the frame
//! height, left to right in steps of the frame width, beginning at the
//! layout's start offset. Only frames lying entirely inside the image are
//! produced, so a `W`x`H` sheet cut into `w`x`h` frames from `(sx, sy)` yields
//! `floor((W - sx) / w) * floor((H - sy) / h)` frames, truncated to the
//! optional limit. Frames are copied out eagerly and never change afterwards.

use std::path::Path;

use glam::UVec2;
use image::{imageops, ImageError, RgbaImage};

use crate::error::SpriteSheetError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetLayout {
    pub frame_size: UVec2,
    pub start: UVec2,
    /// Maximum number of frames to cut. `None` takes every full frame.
    pub limit: Option<usize>,
}

impl SheetLayout {
    pub fn new(frame_width: u32, frame_height: u32) -> Self {
        Self {
            frame_size: UVec2::new(frame_width, frame_height),
            start: UVec2::ZERO,
            limit: None,
        }
    }

    pub fn with_offset(frame_size: (u32, u32), start: (u32, u32)) -> Self {
        Self::new(frame_size.0, frame_size.1).with_start(start.0, start.1)
    }

    pub fn from_parts(frame_width: u32, frame_height: u32, start_x: u32, start_y: u32) -> Self {
        Self::new(frame_width, frame_height).with_start(start_x, start_y)
    }

    pub fn with_start(mut self, start_x: u32, start_y: u32) -> Self {
        self.start = UVec2::new(start_x, start_y);
        self
    }

    /// A limit of zero means "no limit".
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = (limit > 0).then_some(limit);
        self
    }

    /// Columns and rows of full frames that fit inside a `width`x`height`
    /// image from the start offset.
    pub fn grid(&self, width: u32, height: u32) -> Result<(u32, u32), SpriteSheetError> {
        if self.frame_size.x == 0 || self.frame_size.y == 0 {
            return Err(SpriteSheetError::InvalidArguments(format!(
                "frame size must be non-zero, got {}x{}",
                self.frame_size.x, self.frame_size.y
            )));
        }
        // A start offset past the edge leaves nothing to scan.
        let columns = width.saturating_sub(self.start.x) / self.frame_size.x;
        let rows = height.saturating_sub(self.start.y) / self.frame_size.y;
        Ok((columns, rows))
    }
}

#[derive(Debug, Clone)]
pub struct SpriteSheet {
    layout: SheetLayout,
    columns: u32,
    rows: u32,
    frames: Vec<RgbaImage>,
}

impl SpriteSheet {
    pub fn from_image(image: &RgbaImage, layout: SheetLayout) -> Result<Self, SpriteSheetError> {
        let (columns, rows) = layout.grid(image.width(), image.height())?;
        let natural = columns as usize * rows as usize;
        let count = layout.limit.map_or(natural, |limit| limit.min(natural));

        let mut frames = Vec::with_capacity(count);
        'scan: for row in 0..rows {
            for column in 0..columns {
                if frames.len() == count {
                    break 'scan;
                }
                let x = layout.start.x + column * layout.frame_size.x;
                let y = layout.start.y + row * layout.frame_size.y;
                frames.push(
                    imageops::crop_imm(image, x, y, layout.frame_size.x, layout.frame_size.y)
                        .to_image(),
                );
            }
        }

        log::debug!(
            "Sliced {}x{} sheet into {} frame(s) of {}x{} ({}x{} grid)",
            image.width(),
            image.height(),
            frames.len(),
            layout.frame_size.x,
            layout.frame_size.y,
            columns,
            rows
        );

        Ok(Self {
            layout,
            columns,
            rows,
            frames,
        })
    }

    pub fn from_path(path: impl AsRef<Path>, layout: SheetLayout) -> Result<Self, SpriteSheetError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SpriteSheetError::FileNotFound(path.to_path_buf()));
        }
        let image = image::open(path).map_err(|err| match err {
            ImageError::IoError(io) if io.kind() == std::io::ErrorKind::NotFound => {
                SpriteSheetError::FileNotFound(path.to_path_buf())
            }
            other => SpriteSheetError::Decode {
                path: path.to_path_buf(),
                source: other,
            },
        })?;
        log::info!("Loaded sprite sheet '{}'", path.display());
        Self::from_image(&image.to_rgba8(), layout)
    }

    pub fn frames(&self) -> &[RgbaImage] {
        &self.frames
    }

    pub fn frame(&self, index: usize) -> Option<&RgbaImage> {
        self.frames.get(index)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frame_size(&self) -> (u32, u32) {
        (self.layout.frame_size.x, self.layout.frame_size.y)
    }

    pub fn layout(&self) -> &SheetLayout {
        &self.layout
    }

    /// Full-frame columns in the scanned region, before any limit applies.
    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn into_frames(self) -> Vec<RgbaImage> {
        self.frames
    }
}
