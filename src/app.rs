//! 应用程序对象
//!
//! 持有窗口和渲染器，把窗口事件转发给渲染器。渲染器先于窗口释放。

use tracing::{debug, info};
use winit::dpi::PhysicalSize;
use winit::event_loop::EventLoop;
use winit::window::{Window, WindowBuilder};

use crate::core::error::{HelloError, Result};
use crate::core::Config;
use crate::gfx::TextRenderer;
use crate::renderer::dpi;

pub struct HelloApp {
    renderer: TextRenderer,
    window: Window,
}

impl HelloApp {
    /// 创建窗口与渲染器
    ///
    /// 窗口尺寸按主显示器的缩放系数从逻辑像素换算为物理像素。
    pub fn new(event_loop: &EventLoop<()>, config: &Config) -> Result<Self> {
        let scale_factor = event_loop
            .primary_monitor()
            .map(|m| m.scale_factor())
            .unwrap_or(1.0);
        let width = dpi::to_physical(config.window.width, scale_factor);
        let height = dpi::to_physical(config.window.height, scale_factor);

        let window = WindowBuilder::new()
            .with_title(config.window.title.as_str())
            .with_inner_size(PhysicalSize::new(width, height))
            .with_resizable(config.window.resizable)
            .build(event_loop)
            .map_err(|e| HelloError::Initialization(format!("failed to create window: {e}")))?;

        info!(width, height, scale_factor, "Window created");

        let renderer = create_renderer(&window, config)?;
        Ok(Self { renderer, window })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn render(&mut self) -> Result<()> {
        self.renderer.render()
    }

    pub fn resize(&mut self, size: PhysicalSize<u32>) -> Result<()> {
        debug!(width = size.width, height = size.height, "Window resized");
        self.renderer.resize(size.width, size.height)?;
        self.window.request_redraw();
        Ok(())
    }

    pub fn set_scale_factor(&mut self, scale_factor: f64) -> Result<()> {
        self.renderer.set_dpi(dpi::dpi_for_scale(scale_factor))?;
        self.window.request_redraw();
        Ok(())
    }
}

#[cfg(target_os = "windows")]
fn create_renderer(window: &Window, config: &Config) -> Result<TextRenderer> {
    use raw_window_handle::{HasWindowHandle, RawWindowHandle};
    use windows::Win32::Foundation::HWND;

    let handle = window
        .window_handle()
        .map_err(|e| HelloError::Initialization(format!("window handle unavailable: {e}")))?;
    let hwnd = match handle.as_raw() {
        RawWindowHandle::Win32(h) => HWND(h.hwnd.get() as *mut std::ffi::c_void),
        other => {
            return Err(HelloError::Initialization(format!(
                "unexpected window handle: {other:?}"
            )))
        }
    };

    let size = window.inner_size();
    let dpi = dpi::dpi_for_scale(window.scale_factor());
    TextRenderer::new(hwnd, config, size.width, size.height, dpi)
}

#[cfg(not(target_os = "windows"))]
fn create_renderer(_window: &Window, _config: &Config) -> Result<TextRenderer> {
    Err(HelloError::Initialization(
        "Direct2D interop requires Windows".to_string(),
    ))
}
