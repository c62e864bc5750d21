pub mod config;
pub mod events;
pub mod window;

pub use config::{load_platform_config, ConfigError, PlatformConfig};
pub use events::{map_key, map_mouse_button, translate_window_event};
pub use window::create_window;
