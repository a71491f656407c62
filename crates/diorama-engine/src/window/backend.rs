use std::time::Duration;

use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Fullscreen, Window, WindowAttributes, WindowId};

use crate::config::{Settings, SettingsPatch};
use crate::coords::Viewport;
use crate::core::{Backend, Polled};
use crate::device::{Gpu, GpuInit, SurfaceErrorAction};
use crate::input::platform::winit::translate_window_event;
use crate::input::{InputEvent, InputState};
use crate::paint::Color;
use crate::render::{clear_pass, Canvas, RenderCtx, RenderTarget};

use super::WindowOption;

/// Pumps allowed for the platform to hand out a window during `open`.
const OPEN_PUMP_ATTEMPTS: u32 = 200;
const OPEN_PUMP_TIMEOUT: Duration = Duration::from_millis(5);

#[self_referencing]
struct WindowEntry {
    id: WindowId,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

/// [`Backend`] that shows scenes in a native window rendered through wgpu.
///
/// `Scene::draw` receives a [`Canvas`] already cleared to black.
pub struct WindowBackend {
    event_loop: EventLoop<()>,
    shell: Shell,
}

impl WindowBackend {
    pub fn new() -> Result<Self> {
        Self::with_gpu_init(GpuInit::default())
    }

    pub fn with_gpu_init(gpu_init: GpuInit) -> Result<Self> {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        Ok(Self {
            event_loop,
            shell: Shell {
                gpu_init,
                pending: None,
                create_error: None,
                entry: None,
                input: InputState::default(),
                queue: Vec::new(),
            },
        })
    }

    pub fn is_open(&self) -> bool {
        self.shell.entry.is_some()
    }

    /// Held keys/buttons and pointer position of the open window.
    pub fn input(&self) -> &InputState {
        &self.shell.input
    }

    /// Sets the cursor shape, if a window is open.
    pub fn set_cursor(&self, cursor: winit::window::CursorIcon) {
        if let Some(entry) = &self.shell.entry {
            entry.with_window(|w| w.set_cursor(cursor));
        }
    }

    fn pump(&mut self, timeout: Duration) -> PumpStatus {
        self.event_loop.pump_app_events(Some(timeout), &mut self.shell)
    }

    fn entry_mut(&mut self) -> Result<&mut WindowEntry> {
        self.shell.entry.as_mut().context("window is not open")
    }
}

impl Backend for WindowBackend {
    type Event = InputEvent;
    type Target<'a> = Canvas<'a>;

    fn open(&mut self, settings: &Settings) -> Result<()> {
        anyhow::ensure!(self.shell.entry.is_none(), "window is already open");

        let mut gpu_init = self.shell.gpu_init.clone();
        if let Some(value) = settings.get_option(WindowOption::Vsync.key()) {
            gpu_init.vsync = WindowOption::Vsync.parse(value)?;
        }

        self.shell.pending = Some((window_attributes(settings)?, gpu_init));
        self.shell.create_error = None;

        for _ in 0..OPEN_PUMP_ATTEMPTS {
            if let PumpStatus::Exit(code) = self.pump(OPEN_PUMP_TIMEOUT) {
                self.shell.pending = None;
                anyhow::bail!("event loop exited with code {code} while opening the window");
            }
            if let Some(err) = self.shell.create_error.take() {
                return Err(err);
            }
            if self.shell.entry.is_some() {
                log::info!("window opened: {:?} {}x{}", settings.title, settings.size.0, settings.size.1);
                return Ok(());
            }
        }

        self.shell.pending = None;
        anyhow::bail!("platform did not create the window in time")
    }

    fn reconfigure(&mut self, _settings: &Settings, changed: &SettingsPatch) -> Result<()> {
        let entry = self.entry_mut()?;

        entry.with_mut(|fields| -> Result<()> {
            let window = fields.window;

            if let Some(title) = &changed.title {
                window.set_title(title);
            }

            if let Some((w, h)) = changed.size {
                // `Some` means the platform applied the size synchronously.
                if let Some(size) = window.request_inner_size(LogicalSize::new(w as f64, h as f64)) {
                    fields.gpu.resize(size);
                }
            }

            if let Some(fullscreen) = changed.fullscreen {
                window.set_fullscreen(fullscreen.then_some(Fullscreen::Borderless(None)));
            }

            for (key, value) in &changed.options {
                let Some(option) = WindowOption::from_key(key) else {
                    log::debug!("ignoring unknown window option {key:?}");
                    continue;
                };
                let on = option.parse(value)?;
                match option {
                    WindowOption::Resizable => window.set_resizable(on),
                    WindowOption::Decorations => window.set_decorations(on),
                    WindowOption::Maximized => window.set_maximized(on),
                    WindowOption::Vsync => fields.gpu.set_vsync(on),
                }
            }

            Ok(())
        })
    }

    fn poll_events(&mut self, out: &mut Vec<Polled<InputEvent>>) -> Result<()> {
        if let PumpStatus::Exit(code) = self.pump(Duration::ZERO) {
            log::debug!("event loop exited with code {code}");
            self.shell.queue.push(Polled::Quit);
        }
        out.append(&mut self.shell.queue);
        Ok(())
    }

    fn render(&mut self, draw: &mut dyn FnMut(&mut Canvas<'_>) -> Result<()>) -> Result<()> {
        let entry = self.entry_mut()?;

        entry.with_mut(|fields| -> Result<()> {
            let window = fields.window;
            let gpu = fields.gpu;

            if !gpu.has_area() {
                return Ok(());
            }

            let mut frame = match gpu.begin_frame() {
                Ok(frame) => frame,
                Err(err) => match gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => anyhow::bail!("surface ran out of memory"),
                    action => {
                        log::debug!("skipping frame: {action:?}");
                        return Ok(());
                    }
                },
            };

            clear_pass(&mut frame.encoder, &frame.view, Color::BLACK, "diorama frame clear");

            let scale = window.scale_factor();
            let size = gpu.size();
            {
                let ctx = RenderCtx::new(
                    gpu.device(),
                    gpu.queue(),
                    gpu.surface_format(),
                    Viewport::from_physical(size.width, size.height, scale),
                    scale as f32,
                );
                let target = RenderTarget::new(&mut frame.encoder, &frame.view);
                draw(&mut Canvas::new(ctx, target))?;
            }

            window.pre_present_notify();
            gpu.submit(frame);
            Ok(())
        })
    }

    fn close(&mut self) {
        if self.shell.entry.take().is_none() {
            return;
        }
        self.shell.input.reset();

        // Let the platform process the destruction.
        if let PumpStatus::Exit(code) = self.pump(Duration::ZERO) {
            log::debug!("event loop exited with code {code} while closing the window");
        }
        self.shell.queue.clear();
        log::info!("window closed");
    }
}

fn window_attributes(settings: &Settings) -> Result<WindowAttributes> {
    let (w, h) = settings.size;
    let mut attrs = Window::default_attributes()
        .with_title(settings.title.clone())
        .with_inner_size(LogicalSize::new(w as f64, h as f64))
        .with_fullscreen(settings.fullscreen.then_some(Fullscreen::Borderless(None)));

    for option in [WindowOption::Resizable, WindowOption::Decorations, WindowOption::Maximized] {
        let on = match settings.get_option(option.key()) {
            Some(value) => option.parse(value)?,
            None => option.default_value(),
        };
        attrs = match option {
            WindowOption::Resizable => attrs.with_resizable(on),
            WindowOption::Decorations => attrs.with_decorations(on),
            WindowOption::Maximized => attrs.with_maximized(on),
            WindowOption::Vsync => attrs,
        };
    }

    Ok(attrs)
}

/// winit callback target. Creates the window when asked and queues events.
struct Shell {
    gpu_init: GpuInit,

    pending: Option<(WindowAttributes, GpuInit)>,
    create_error: Option<anyhow::Error>,

    entry: Option<WindowEntry>,
    input: InputState,
    queue: Vec<Polled<InputEvent>>,
}

impl Shell {
    fn create_pending(&mut self, event_loop: &ActiveEventLoop) {
        let Some((attrs, gpu_init)) = self.pending.take() else {
            return;
        };

        match create_entry(event_loop, attrs, gpu_init) {
            Ok(entry) => self.entry = Some(entry),
            Err(err) => self.create_error = Some(err),
        }
    }

    fn push_resized(&mut self, scale: f64, size: PhysicalSize<u32>) {
        let logical = Viewport::from_physical(size.width, size.height, scale);
        self.queue.push(Polled::Input(InputEvent::Resized {
            width: logical.width,
            height: logical.height,
        }));
    }
}

fn create_entry(event_loop: &ActiveEventLoop, attrs: WindowAttributes, gpu_init: GpuInit) -> Result<WindowEntry> {
    let window = event_loop
        .create_window(attrs)
        .context("failed to create window")?;

    WindowEntryTryBuilder {
        id: window.id(),
        window,
        gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
    }
    .try_build()
    .context("GPU initialization failed for window")
}

impl ApplicationHandler for Shell {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        self.create_pending(event_loop);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        // `resumed` fires once per process; later opens land here.
        self.create_pending(event_loop);
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(entry) = self.entry.as_mut() else {
            return;
        };
        if *entry.borrow_id() != window_id {
            return;
        }

        let scale = entry.with_window(|w| w.scale_factor());

        match event {
            WindowEvent::CloseRequested => self.queue.push(Polled::Quit),

            WindowEvent::Resized(size) => {
                entry.with_gpu_mut(|gpu| gpu.resize(size));
                self.push_resized(scale, size);
            }

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                let size = entry.with_window(|w| w.inner_size());
                entry.with_gpu_mut(|gpu| gpu.resize(size));
                self.push_resized(scale_factor, size);
            }

            // Frames are driven by the application loop.
            WindowEvent::RedrawRequested => {}

            other => {
                if let Some(ev) = translate_window_event(scale, &self.input, &other) {
                    self.input.apply(&ev);
                    self.queue.push(Polled::Input(ev));
                }
            }
        }
    }
}
