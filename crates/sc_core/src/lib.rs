pub mod canvas;
pub mod error;
pub mod event;
pub mod manager;
pub mod scene;
pub mod spritesheet;
pub mod time;

pub use canvas::Canvas;
pub use error::{SceneError, SpriteSheetError};
pub use event::{Key, MouseBtn, SceneEvent};
pub use manager::{SceneManager, MAX_CHAINED_TRANSITIONS, START_SCENE};
pub use scene::{Scene, SceneContext, SceneData, SceneRegistry, ScreenSize};
pub use spritesheet::{SheetLayout, SpriteSheet};
pub use time::{FrameClock, FrameLimiter};
