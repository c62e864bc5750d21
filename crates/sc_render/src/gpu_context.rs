//! The window surface the canvas is presented to.
//!
//! `GpuContext` owns the wgpu device and a surface sized to the window's
//! physical size. A zero-sized window (minimized) leaves the surface
//! unconfigured until the next non-zero resize. `acquire` reports why a frame
//! could not be obtained so the caller can tell a skipped frame from a fatal
//! device failure.

use std::sync::Arc;
use winit::window::Window;

#[derive(thiserror::Error, Debug)]
pub enum GpuError {
    #[error("failed to create window surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no GPU adapter can present to this window")]
    NoAdapter,

    #[error("failed to create GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("window surface supports no texture formats on this adapter")]
    NoSurfaceFormat,

    #[error("GPU ran out of memory while acquiring a frame")]
    OutOfMemory,
}

/// Why `acquire` produced no frame. None of these are fatal; the next redraw
/// tries again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameSkip {
    /// The window has zero area.
    Minimized,
    /// The surface was lost or outdated and has been reconfigured.
    Reconfigured,
    /// The compositor did not hand out a texture in time.
    Unavailable,
}

pub enum SurfaceFrame {
    Ready {
        texture: wgpu::SurfaceTexture,
        view: wgpu::TextureView,
    },
    Skipped(FrameSkip),
}

pub struct GpuContext {
    surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pub surface_format: wgpu::TextureFormat,
    size: (u32, u32),
}

impl GpuContext {
    /// With `vsync` off the surface prefers a non-blocking present mode so an
    /// external frame cap sets the pace instead of the display.
    pub fn new(window: Arc<Window>, vsync: bool) -> Result<Self, GpuError> {
        let size = window.inner_size();
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::LowPower,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or(GpuError::NoAdapter)?;

        log::info!("GPU adapter: {:?}", adapter.get_info().name);

        // One texture and one quad; the WebGL2 baseline is plenty.
        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Stagecraft Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                    .using_resolution(adapter.limits()),
                ..Default::default()
            },
            None,
        ))?;

        let caps = surface.get_capabilities(&adapter);
        let surface_format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first())
            .copied()
            .ok_or(GpuError::NoSurfaceFormat)?;
        let present_mode = choose_present_mode(vsync, &caps.present_modes);
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        if size.width > 0 && size.height > 0 {
            surface.configure(&device, &config);
        }
        log::info!(
            "Surface {}x{} {:?}, {:?}",
            size.width,
            size.height,
            surface_format,
            present_mode
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            surface_format,
            size: (size.width, size.height),
        })
    }

    /// Physical size of the surface, zero while minimized.
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn is_minimized(&self) -> bool {
        self.size.0 == 0 || self.size.1 == 0
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
        if self.is_minimized() {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    pub fn acquire(&self) -> Result<SurfaceFrame, GpuError> {
        if self.is_minimized() {
            return Ok(SurfaceFrame::Skipped(FrameSkip::Minimized));
        }
        let texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(SurfaceFrame::Skipped(FrameSkip::Reconfigured));
            }
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(GpuError::OutOfMemory),
            Err(err) => {
                log::warn!("Surface error: {:?}", err);
                return Ok(SurfaceFrame::Skipped(FrameSkip::Unavailable));
            }
        };
        let view = texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        Ok(SurfaceFrame::Ready { texture, view })
    }
}

fn choose_present_mode(vsync: bool, supported: &[wgpu::PresentMode]) -> wgpu::PresentMode {
    if vsync {
        return wgpu::PresentMode::Fifo;
    }
    [wgpu::PresentMode::Mailbox, wgpu::PresentMode::Immediate]
        .into_iter()
        .find(|mode| supported.contains(mode))
        .unwrap_or(wgpu::PresentMode::Fifo)
}
