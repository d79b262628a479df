use gridscene_render::{FrameRenderer, RenderError};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use winit::window::Window;

/// Depth attachment format shared by the renderer and every pipeline drawing
/// into its render pass.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.01,
    g: 0.01,
    b: 0.01,
    a: 1.0,
};

/// Recording state of one acquired swapchain image.
pub struct WgpuFrame {
    surface_texture: wgpu::SurfaceTexture,
    view: wgpu::TextureView,
    encoder: wgpu::CommandEncoder,
    pass: Option<wgpu::RenderPass<'static>>,
}

impl WgpuFrame {
    /// The open render pass, if `begin_render_pass` has been called.
    pub fn pass(&mut self) -> Option<&mut wgpu::RenderPass<'static>> {
        self.pass.as_mut()
    }
}

/// Swapchain owner: surface, device, queue and depth buffer.
///
/// The surface is reconfigured lazily at the start of a frame whenever the
/// window size no longer matches the configuration.
pub struct WgpuRenderer {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,
    device_lost: Arc<AtomicBool>,
}

impl WgpuRenderer {
    pub fn new(window: Arc<Window>) -> Result<Self, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .map_err(|e| RenderError::DeviceFatal(format!("create surface: {e}")))?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| RenderError::DeviceFatal("no compatible GPU adapter".into()))?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("gridscene_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .map_err(|e| RenderError::DeviceFatal(format!("request device: {e}")))?;

        let device_lost = Arc::new(AtomicBool::new(false));
        let lost_flag = device_lost.clone();
        device.set_device_lost_callback(move |reason, message| {
            if matches!(reason, wgpu::DeviceLostReason::Destroyed) {
                tracing::debug!("device destroyed: {message}");
                return;
            }
            tracing::error!("device lost ({reason:?}): {message}");
            lost_flag.store(true, Ordering::SeqCst);
        });

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| RenderError::DeviceFatal("surface reports no formats".into()))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        let depth_view = create_depth_view(&device, config.width, config.height);

        tracing::info!(
            "GPU initialized with {} backend on {} ({:?})",
            adapter.get_info().backend.to_str(),
            adapter.get_info().name,
            surface_format
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            depth_view,
            device_lost,
        })
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Color format of the swapchain images.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.depth_view = create_depth_view(&self.device, self.config.width, self.config.height);
        tracing::debug!(
            "surface reconfigured to {}x{}",
            self.config.width,
            self.config.height
        );
    }
}

impl FrameRenderer for WgpuRenderer {
    type Frame = WgpuFrame;

    fn aspect_ratio(&self) -> f32 {
        self.config.width as f32 / self.config.height as f32
    }

    fn begin_frame(&mut self) -> Result<Option<WgpuFrame>, RenderError> {
        if self.device_lost.load(Ordering::SeqCst) {
            return Err(RenderError::DeviceFatal("device lost".into()));
        }

        let size = self.window.inner_size();
        if size.width == 0 || size.height == 0 {
            return Ok(None);
        }
        if size.width != self.config.width || size.height != self.config.height {
            self.resize(size.width, size.height);
        }

        let surface_texture = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::debug!("surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(None);
            }
            Err(wgpu::SurfaceError::Timeout) => {
                tracing::debug!("surface acquire timed out");
                return Ok(None);
            }
            Err(e) => return Err(RenderError::DeviceFatal(format!("acquire frame: {e}"))),
        };

        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame_encoder"),
            });

        Ok(Some(WgpuFrame {
            surface_texture,
            view,
            encoder,
            pass: None,
        }))
    }

    fn begin_render_pass(&mut self, frame: &mut WgpuFrame) {
        let pass = frame
            .encoder
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("swapchain_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            })
            .forget_lifetime();
        frame.pass = Some(pass);
    }

    fn end_render_pass(&mut self, frame: &mut WgpuFrame) {
        frame.pass = None;
    }

    fn end_frame(&mut self, frame: WgpuFrame) -> Result<(), RenderError> {
        let WgpuFrame {
            surface_texture,
            encoder,
            pass,
            ..
        } = frame;
        if pass.is_some() {
            return Err(RenderError::InvalidState(
                "end_frame called with an open render pass".into(),
            ));
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    fn wait_idle(&self) -> Result<(), RenderError> {
        if self.device.poll(wgpu::Maintain::Wait).is_queue_empty() {
            tracing::debug!("device idle");
        }
        if self.device_lost.load(Ordering::SeqCst) {
            return Err(RenderError::DeviceFatal("device lost".into()));
        }
        Ok(())
    }
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&Default::default())
}
