pub mod gpu_context;
pub mod presenter;
pub mod vertex;

pub use gpu_context::{FrameSkip, GpuContext, GpuError, SurfaceFrame};
pub use presenter::{fit_viewport, CanvasPresenter, PresentOutcome, Viewport};
pub use vertex::ScreenVertex;
