use anyhow::{Context, Result};
use orient_config::AppConfig;
use orient_input::console::Console;
use orient_input::controller::{
    ControllerSettings, InteractionController, OrientationSnapshot, Outcome,
};
use orient_input::keyboard::KeyBindings;
use orient_input::ControlAction;
use orient_renderer::view::FrameView;
use orient_renderer::{FrameRenderer, RenderRequest, RenderSurface};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};
use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

const WINDOW_TITLE: &str = "Euler ↔ Quaternion Visualizer";

/// How often the event loop wakes to pick up console commands.
const CONSOLE_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Application state.
struct App {
    config: AppConfig,
    console: Console,
    keys: KeyBindings,
    window: Option<Arc<Window>>,
    /// Created once the window and GPU are up.
    controller: Option<InteractionController<GpuSurface>>,
    /// Controller snapshots, reflected in the window title.
    updates: Option<watch::Receiver<OrientationSnapshot>>,
}

/// Window surface the frame is drawn into.
struct GpuSurface {
    window: Arc<Window>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    view: FrameView,
    frame_count: u64,
}

impl GpuSurface {
    async fn new(window: Arc<Window>) -> Result<Self> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
        let surface = instance
            .create_surface(window.clone())
            .context("Failed to create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("No suitable GPU adapter found")?;

        info!(name = adapter.get_info().name, "Using GPU");

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("orient_device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await
            .context("Failed to create device")?;

        let size = window.inner_size();
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first())
            .copied()
            .context("Surface reports no texture formats")?;

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let mut view = FrameView::new(&device, format);
        view.set_viewport(surface_config.width, surface_config.height);

        Ok(Self {
            window,
            device,
            queue,
            surface,
            surface_config,
            view,
            frame_count: 0,
        })
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.surface_config.width = size.width;
        self.surface_config.height = size.height;
        self.surface.configure(&self.device, &self.surface_config);
        self.view.set_viewport(size.width, size.height);
        self.window.request_redraw();
    }

    fn redraw(&mut self) {
        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.surface_config);
                self.window.request_redraw();
                return;
            }
            Err(e) => {
                warn!(?e, "Failed to get surface texture");
                return;
            }
        };

        let target = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame_render"),
            });
        self.view.draw(&self.queue, &mut encoder, &target);
        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        self.frame_count += 1;
        debug!(frames = self.frame_count, "Frame drawn");
    }
}

impl RenderSurface for GpuSurface {
    fn present(&mut self, request: &RenderRequest) {
        self.view.upload(&self.device, request);
        self.window.request_redraw();
    }
}

impl App {
    fn new(config: AppConfig, console: Console) -> Self {
        let keys = KeyBindings::new(config.display.nudge_step);
        Self {
            config,
            console,
            keys,
            window: None,
            controller: None,
            updates: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let size = PhysicalSize::new(
            self.config.view.window_width,
            self.config.view.window_height,
        );
        let mut attrs = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(size);
        if let Some(monitor) = event_loop.primary_monitor() {
            attrs = attrs.with_position(centered(monitor.position(), monitor.size(), size));
        }

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("Failed to create window")?,
        );
        self.window = Some(window.clone());

        let gpu = pollster::block_on(GpuSurface::new(window.clone()))?;
        let controller = InteractionController::new(
            ControllerSettings::from_config(&self.config),
            FrameRenderer::new(&self.config.view),
            gpu,
        );
        let updates = controller.subscribe();
        window.set_title(&window_title(&updates.borrow()));
        self.updates = Some(updates);
        self.controller = Some(controller);

        info!(
            order = %self.config.display.rotation_order,
            unit = %self.config.display.angle_unit,
            policy = ?self.config.conversion.order_policy,
            "Application initialized"
        );
        Ok(())
    }

    fn dispatch(&mut self, event_loop: &ActiveEventLoop, action: ControlAction) {
        let Some(controller) = &mut self.controller else {
            return;
        };
        match controller.handle(action) {
            Ok(Outcome::Continue) => {}
            Ok(Outcome::Exit) => {
                info!("Exit requested");
                event_loop.exit();
            }
            Err(e) => warn!(%e, "Input rejected"),
        }
        self.sync_title();
    }

    /// Show the latest published state in the window title.
    fn sync_title(&mut self) {
        let (Some(window), Some(updates)) = (&self.window, &mut self.updates) else {
            return;
        };
        if let Some(title) = pending_title(updates) {
            window.set_title(&title);
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.controller.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            error!(?e, "Failed to initialize");
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::Resized(size) => {
                if let Some(controller) = &mut self.controller {
                    controller.surface_mut().resize(size);
                }
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                self.keys.on_modifiers_changed(modifiers.state());
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    if let Some(action) = self.keys.on_key(code, event.state) {
                        self.dispatch(event_loop, action);
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                if let Some(controller) = &mut self.controller {
                    controller.surface_mut().redraw();
                }
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.controller.is_some() {
            while let Some(action) = self.console.try_next() {
                self.dispatch(event_loop, action);
            }
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(
            Instant::now() + CONSOLE_POLL_INTERVAL,
        ));
    }
}

fn window_title(snapshot: &OrientationSnapshot) -> String {
    format!("{WINDOW_TITLE} | {}", snapshot.summary())
}

/// Title for a snapshot published since the last call, if any.
fn pending_title(updates: &mut watch::Receiver<OrientationSnapshot>) -> Option<String> {
    match updates.has_changed() {
        Ok(true) => Some(window_title(&updates.borrow_and_update())),
        Ok(false) => None,
        Err(_) => {
            debug!("Controller update channel closed");
            None
        }
    }
}

/// Top-left position that centers `window` on a monitor.
fn centered(
    monitor_position: PhysicalPosition<i32>,
    monitor_size: PhysicalSize<u32>,
    window: PhysicalSize<u32>,
) -> PhysicalPosition<i32> {
    let offset = |monitor: u32, window: u32| (i64::from(monitor) - i64::from(window)) / 2;
    PhysicalPosition::new(
        (i64::from(monitor_position.x) + offset(monitor_size.width, window.width)) as i32,
        (i64::from(monitor_position.y) + offset(monitor_size.height, window.height)) as i32,
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "orient_viz=info,orient_input=info,orient_renderer=info,orient_config=info".into()
            }),
        )
        .init();

    info!("Euler/quaternion visualizer starting");

    let config = orient_config::load_config().unwrap_or_else(|e| {
        warn!(?e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    info!(
        unit = %config.display.angle_unit,
        order = %config.display.rotation_order,
        decimals = config.display.decimals,
        "Config loaded"
    );

    let console = Console::spawn();

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config, console);
    event_loop.run_app(&mut app)?;

    Ok(())
}
