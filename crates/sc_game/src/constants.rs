pub const TITLE: &str = "Stagecraft";
pub const SCREEN_WIDTH: u32 = 640;
pub const SCREEN_HEIGHT: u32 = 480;
/// Frame-rate cap. `None` runs uncapped; `platform.json` may set one.
pub const FPS: Option<u32> = None;

pub const CONFIG_PATH: &str = "assets/config/platform.json";
pub const SHEET_PATH: &str = "assets/sprites/sheet.png";

pub const GALLERY_SCENE: &str = "gallery";
