mod gallery;
mod title;

pub use gallery::GalleryScene;
pub use title::TitleScene;

/// Hand-off from the title scene telling the gallery how to slice the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GalleryRequest {
    pub frame_size: u32,
}
