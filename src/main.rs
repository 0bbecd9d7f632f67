use std::process::ExitCode;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::WindowId,
};

use texcubes::{
    args::Args,
    config::Config,
    controller::{input::native, FrameLoop, InputEvent, InputState, KeyBindings},
    logging,
    model::Camera,
    view::{GlContext, GlowContext, Scene, ShaderProgram, ShaderSources},
};

/// Everything that only exists while the window and its GL context do.
struct AppState {
    ctx: GlContext,
    scene: Scene<GlowContext>,
    frames: FrameLoop,
}

impl AppState {
    fn set_pointer_lock(&mut self, locked: bool) {
        let locked = if locked {
            self.ctx.capture_cursor()
        } else {
            self.ctx.release_cursor();
            false
        };
        self.frames.handle(&InputEvent::PointerLockChanged { locked });
    }
}

struct App {
    config: Config,
    shader_sources: ShaderSources,
    bindings: KeyBindings,
    state: Option<AppState>,
    failed: bool,
}

impl App {
    fn new(config: Config, shader_sources: ShaderSources) -> Self {
        Self {
            config,
            shader_sources,
            bindings: KeyBindings::default(),
            state: None,
            failed: false,
        }
    }

    fn init_state(&self, event_loop: &ActiveEventLoop) -> anyhow::Result<AppState> {
        let ctx = GlContext::create(event_loop, &self.config.window)
            .context("failed to create the window and OpenGL context")?;
        let shader = ShaderProgram::create(&ctx.gl, &self.shader_sources)
            .context("failed to create the cube shader program")?;
        let scene = Scene::initialize(
            &ctx.gl,
            shader,
            &self.config.scene.instance_positions(),
            &self.config.scene.textures,
        )
        .context("failed to initialize the scene")?;

        let camera = Camera::from_settings(&self.config.camera);
        let frames = FrameLoop::new(camera, InputState::new(self.bindings.clone()), Instant::now());
        Ok(AppState { ctx, scene, frames })
    }

    /// Startup failures inside the event loop are reported here and only
    /// turned into the exit code afterwards.
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        error!("{err:#}");
        self.failed = true;
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        match self.init_state(event_loop) {
            Ok(mut state) => {
                state.set_pointer_lock(true);
                state.ctx.window.request_redraw();
                self.state = Some(state);
            }
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(state) = self.state.as_mut() else {
            return;
        };

        if let Some(input) = native::window_event_to_input(&event) {
            if let InputEvent::KeyDown(code) = input {
                if state.frames.input.bindings().is_quit(code) {
                    info!("Escape pressed, exiting");
                    event_loop.exit();
                    return;
                }
            }
            state.frames.handle(&input);
        }

        match event {
            WindowEvent::CloseRequested => {
                info!("Window closed");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => state.ctx.resize(size.width, size.height),
            WindowEvent::Focused(focused) => state.set_pointer_lock(focused),
            WindowEvent::MouseInput { state: ElementState::Pressed, button: MouseButton::Left, .. }
                if !state.frames.input.pointer_locked =>
            {
                state.set_pointer_lock(true);
            }
            WindowEvent::RedrawRequested => {
                let time = state.frames.tick(Instant::now());
                let (width, height) = state.ctx.size();
                state.scene.clear(&state.ctx.gl, self.config.scene.clear_color);
                state
                    .scene
                    .render_frame(&state.ctx.gl, &state.frames.camera, width, height, time.elapsed);
                state.ctx.swap_buffers();
            }
            _ => {}
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        if let (Some(state), Some(input)) = (self.state.as_mut(), native::device_event_to_input(&event)) {
            state.frames.handle(&input);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.ctx.window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = self.state.take() {
            state.scene.shutdown(&state.ctx.gl);
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    logging::init(args.log_dir.as_deref());

    let mut config = Config::load(&args.config).context("failed to load configuration")?;
    args.apply(&mut config);
    let shader_sources = ShaderSources::with_overrides(
        config.shaders.vertex.as_deref(),
        config.shaders.fragment.as_deref(),
    )
    .context("failed to read shader sources")?;

    let event_loop = EventLoop::new().context("failed to create the event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config, shader_sources);
    event_loop.run_app(&mut app).context("event loop terminated abnormally")?;

    Ok(if app.failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}
