use std::path::PathBuf;

/// Failures raised by `SceneManager` registry and transition operations.
#[derive(thiserror::Error, Debug)]
pub enum SceneError {
    /// The registry handed to `SceneManager::new` has no `"start"` entry.
    #[error("scene registry has no scene named 'start'")]
    MissingStartScene,

    /// A transition targeted a name that is not registered.
    #[error("unknown scene '{0}'")]
    UnknownScene(String),

    /// The operation would drop or replace the scene that is currently active.
    #[error("scene '{0}' is active and cannot be removed or replaced")]
    ActiveScene(String),

    /// Scenes kept redirecting from `enter` past the chaining limit.
    #[error("scene transitions did not settle after {limit} hops (last entered '{scene}')")]
    TransitionLoop { scene: String, limit: usize },
}

/// Failures raised while building a `SpriteSheet`.
#[derive(thiserror::Error, Debug)]
pub enum SpriteSheetError {
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("failed to decode image '{}': {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
