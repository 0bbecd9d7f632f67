use std::num::NonZeroU32;

use glutin::config::{ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContext, PossiblyCurrentContext, Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SwapInterval, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow};
use raw_window_handle::HasWindowHandle;
use tracing::{debug, info, warn};
use winit::dpi::LogicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::{CursorGrabMode, Window};

use crate::config::WindowSettings;
use crate::error::{Error, Result};
use crate::view::gl::GlowContext;

/// A window with a current OpenGL 3.3 core context on the event-loop thread.
///
/// Field order is drop order: GL function table, then the surface, the
/// context and finally the window the surface was created on.
pub struct GlContext {
    pub gl: GlowContext,
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    pub window: Window,
}

impl GlContext {
    pub fn create(event_loop: &ActiveEventLoop, settings: &WindowSettings) -> Result<Self> {
        let attributes = Window::default_attributes()
            .with_title(settings.title.clone())
            .with_inner_size(LogicalSize::new(settings.width, settings.height))
            .with_maximized(settings.maximized);

        let template = ConfigTemplateBuilder::new().with_depth_size(24);
        let (window, gl_config) = DisplayBuilder::new()
            .with_window_attributes(Some(attributes))
            .build(event_loop, template, |configs| {
                // glutin only calls the picker with at least one matching config
                configs
                    .reduce(|best, c| if c.num_samples() > best.num_samples() { c } else { best })
                    .expect("no OpenGL config matched the template")
            })
            .map_err(|e| Error::WindowCreation(e.to_string()))?;
        let window = window.ok_or_else(|| Error::WindowCreation("display builder returned no window".into()))?;

        let raw_handle = window.window_handle().ok().map(|handle| handle.as_raw());
        let display = gl_config.display();
        let context_attributes = ContextAttributesBuilder::new()
            .with_profile(GlProfile::Core)
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .build(raw_handle);

        let init_err = |e: glutin::error::Error| Error::GraphicsContextInit(e.to_string());
        // SAFETY: `raw_handle` belongs to `window`, which outlives the context.
        let not_current = unsafe { display.create_context(&gl_config, &context_attributes) }.map_err(init_err)?;

        let surface_attributes = window
            .build_surface_attributes(Default::default())
            .map_err(|e| Error::GraphicsContextInit(e.to_string()))?;
        // SAFETY: same window as above.
        let surface = unsafe { display.create_window_surface(&gl_config, &surface_attributes) }.map_err(init_err)?;
        let context = not_current.make_current(&surface).map_err(init_err)?;

        let interval = if settings.vsync {
            SwapInterval::Wait(NonZeroU32::MIN)
        } else {
            SwapInterval::DontWait
        };
        if let Err(e) = surface.set_swap_interval(&context, interval) {
            warn!("could not set swap interval: {e}");
        }

        // SAFETY: the context was made current on this thread just above.
        let gl = unsafe { GlowContext::from_loader_function_cstr(|name| display.get_proc_address(name)) };
        info!(version = %gl.version(), samples = gl_config.num_samples(), "OpenGL context ready");

        Ok(Self { gl, surface, context, window })
    }

    pub fn size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }

    /// Zero-sized requests (minimized windows) are ignored.
    pub fn resize(&self, width: u32, height: u32) {
        if let (Some(w), Some(h)) = (NonZeroU32::new(width), NonZeroU32::new(height)) {
            self.surface.resize(&self.context, w, h);
        }
    }

    /// Hides the cursor and pins it for free-look, falling back to confining
    /// it where locking is unsupported. Returns whether either grab holds.
    pub fn capture_cursor(&self) -> bool {
        let grabbed = self
            .window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Confined));
        match grabbed {
            Ok(()) => {
                self.window.set_cursor_visible(false);
                debug!("cursor captured");
                true
            }
            Err(e) => {
                warn!("could not grab the cursor: {e}");
                false
            }
        }
    }

    pub fn release_cursor(&self) {
        if let Err(e) = self.window.set_cursor_grab(CursorGrabMode::None) {
            warn!("could not release the cursor: {e}");
        }
        self.window.set_cursor_visible(true);
    }

    pub fn swap_buffers(&self) {
        if let Err(e) = self.surface.swap_buffers(&self.context) {
            warn!("swap_buffers failed: {e}");
        }
    }
}
