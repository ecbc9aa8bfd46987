//! 文本渲染器
//!
//! 把 D3D12、11On12、Direct2D 与 DirectWrite 串成一个固定流程：
//!
//! 1. 构造时创建设备无关资源（工厂、设备、队列、文本格式）；
//! 2. 第一次渲染时创建设备相关资源（交换链、每帧目标、画刷）；
//! 3. 每帧：获取包装缓冲区 → 清屏 → 绘制文本 → 释放 → 提交 → Present。
//!
//! `EndDraw` 报告 `D2DERR_RECREATE_TARGET` 时丢弃设备相关资源，
//! 下一次渲染重新创建。

use tracing::{debug, info, trace, warn};
use windows::{
    Win32::Foundation::{D2DERR_RECREATE_TARGET, HWND},
    Win32::Graphics::Direct2D::Common::{D2D1_COLOR_F, D2D_RECT_F},
    Win32::Graphics::Direct2D::*,
    Win32::Graphics::DirectWrite::DWRITE_MEASURING_MODE_NATURAL,
};

use super::d2d::D2DContext;
use super::d3d12::Dx12Device;
use super::dwrite::TextFormat;
use super::interop::InteropDevice;
use super::swapchain::SwapChain;
use super::ApiResultExt;
use crate::core::error::{HelloError, Result};
use crate::core::Config;
use crate::renderer::frame::{BackBufferTracker, FrameRing, FRAME_COUNT};
use crate::renderer::state::{Lifecycle, RendererState};
use crate::renderer::surface::{ResizeAction, SurfaceSize};
use crate::renderer::text::{LayoutRect, TextRun, TextStyle};

/// 设备无关资源，程序存活期间只创建一次
///
/// 字段按释放顺序排列：先释放 Direct2D/DirectWrite 对象，最后释放 D3D12 设备。
pub struct DeviceIndependentResources {
    pub text_format: TextFormat,
    pub d2d: D2DContext,
    pub interop: InteropDevice,
    pub dx12: Dx12Device,
}

impl DeviceIndependentResources {
    pub fn new(config: &Config) -> Result<Self> {
        let dx12 = Dx12Device::new(&config.graphics)?;
        let interop = InteropDevice::new(&dx12)?;
        let d2d = D2DContext::new(&interop)?;
        let text_format = TextFormat::new(&TextStyle::from_config(&config.text))?;

        Ok(Self {
            text_format,
            d2d,
            interop,
            dx12,
        })
    }
}

/// 设备相关资源，首次渲染时创建，设备丢失后重建
pub struct DeviceResources {
    pub swap_chain: SwapChain,
    pub brush: ID2D1SolidColorBrush,
}

/// 渲染一行文本的渲染器
pub struct TextRenderer {
    // 设备相关资源必须先于设备无关资源释放
    device: Option<DeviceResources>,
    independent: DeviceIndependentResources,
    hwnd: HWND,
    lifecycle: Lifecycle,
    frames: FrameRing,
    buffers: BackBufferTracker,
    text: TextRun,
    vsync: bool,
    surface: SurfaceSize,
    dpi: f32,
}

impl TextRenderer {
    /// 创建设备无关资源
    ///
    /// `width`/`height` 是窗口客户区的物理像素尺寸，交换链在第一次渲染时按此创建。
    pub fn new(hwnd: HWND, config: &Config, width: u32, height: u32, dpi: f32) -> Result<Self> {
        let independent = DeviceIndependentResources::new(config)?;

        let mut lifecycle = Lifecycle::new();
        lifecycle.mark_device_independent_ready()?;
        info!("Device-independent resources created");

        Ok(Self {
            device: None,
            independent,
            hwnd,
            lifecycle,
            frames: FrameRing::double_buffering(),
            buffers: BackBufferTracker::new(FRAME_COUNT),
            text: TextRun::from_config(&config.text),
            vsync: config.graphics.vsync,
            surface: SurfaceSize::new(width, height),
            dpi,
        })
    }

    pub fn frame_number(&self) -> u64 {
        self.frames.frame_number()
    }

    /// 按需创建设备相关资源
    pub fn ensure_device_resources(&mut self) -> Result<()> {
        if !self.lifecycle.needs_device_resources() {
            return Ok(());
        }

        let res = &self.independent;
        let swap_chain = SwapChain::new(
            &res.dx12,
            &res.interop,
            &res.d2d,
            self.hwnd,
            self.surface.width(),
            self.surface.height(),
            self.dpi,
        )?;
        let brush = res.d2d.create_solid_brush(self.text.foreground)?;

        self.frames.sync_to(swap_chain.current_back_buffer_index());
        self.buffers.reset();
        self.device = Some(DeviceResources { swap_chain, brush });
        self.lifecycle.mark_device_ready()?;

        info!(
            generation = self.lifecycle.device_generation(),
            width = self.surface.width(),
            height = self.surface.height(),
            "Device resources created"
        );
        Ok(())
    }

    /// 丢弃设备相关资源，下一次渲染时重建
    pub fn discard_device_resources(&mut self) {
        if self.device.is_none() {
            return;
        }

        let res = &self.independent;
        res.d2d.clear_target();
        self.device = None;
        res.interop.clear_state_and_flush();
        if let Err(e) = res.dx12.wait_for_idle() {
            warn!(error = %e, "Failed to wait for GPU while discarding device resources");
        }

        self.buffers.reset();
        self.lifecycle.discard();
        debug!("Device resources discarded");
    }

    /// 渲染一帧
    ///
    /// 窗口最小化（尺寸为 0）时不做任何事。
    pub fn render(&mut self) -> Result<()> {
        if !self.surface.should_render() {
            trace!("Skipping render for zero-sized window");
            return Ok(());
        }

        self.ensure_device_resources()?;
        self.lifecycle.ensure(RendererState::DeviceReady)?;

        let end_draw = {
            let device = self
                .device
                .as_ref()
                .ok_or_else(|| HelloError::Runtime("device resources missing".to_string()))?;
            let res = &self.independent;

            let current = device.swap_chain.current_back_buffer_index();
            if current != self.frames.index() {
                debug!(expected = self.frames.index(), current, "Resynchronizing frame index");
                self.frames.sync_to(current);
            }
            let index = self.frames.index();
            let frame = device.swap_chain.frame(index).ok_or_else(|| {
                HelloError::Runtime(format!("no frame target for back buffer {index}"))
            })?;

            self.buffers.acquire(index)?;
            res.interop.acquire(&frame.wrapped);

            let ctx = &res.d2d.context;
            let end_draw = self.buffers.ensure_acquired(index).map(|()| unsafe {
                ctx.SetTarget(&frame.bitmap);
                ctx.BeginDraw();
                ctx.Clear(Some(&D2D1_COLOR_F::from(self.text.background)));

                let size = frame.bitmap.GetSize();
                let rect = D2D_RECT_F::from(LayoutRect::full_target(size.width, size.height));
                ctx.DrawText(
                    &self.text.utf16,
                    &res.text_format.format,
                    &rect,
                    &device.brush,
                    D2D1_DRAW_TEXT_OPTIONS_NONE,
                    DWRITE_MEASURING_MODE_NATURAL,
                );
                ctx.EndDraw(None, None)
            });

            // 释放时缓冲区转换到 PRESENT 状态
            res.interop.release(&frame.wrapped);
            self.buffers.release(index)?;
            res.interop.flush();

            end_draw?
        };

        match end_draw {
            Err(e) if e.code() == D2DERR_RECREATE_TARGET => {
                warn!("Direct2D target lost, recreating device resources on next render");
                self.discard_device_resources();
                return Ok(());
            }
            other => other.api("ID2D1RenderTarget::EndDraw")?,
        }

        self.buffers.ensure_all_released()?;
        if let Some(device) = &self.device {
            device.swap_chain.present(self.vsync)?;
        }

        trace!(frame = self.frames.frame_number(), index = self.frames.index(), "Presented");
        self.frames.advance();
        Ok(())
    }

    /// 窗口客户区尺寸改变
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        match self.surface.resize(width, height, self.device.is_some()) {
            ResizeAction::Skip => {
                if self.surface.is_empty() {
                    debug!("Window minimized, keeping swap chain");
                }
                return Ok(());
            }
            ResizeAction::Defer => {
                debug!(width, height, "Swap chain not created yet, size recorded");
                return Ok(());
            }
            ResizeAction::Resize => {}
        }

        let Some(device) = self.device.as_mut() else {
            return Ok(());
        };

        let res = &self.independent;
        let resized = device
            .swap_chain
            .resize(&res.dx12, &res.interop, &res.d2d, width, height, self.dpi);

        match resized {
            Ok(()) => {
                self.buffers.reset();
                self.frames.sync_to(device.swap_chain.current_back_buffer_index());
                debug!(width, height, "Renderer resized");
                Ok(())
            }
            Err(e) => {
                self.discard_device_resources();
                Err(e)
            }
        }
    }

    /// 窗口 DPI 改变
    pub fn set_dpi(&mut self, dpi: f32) -> Result<()> {
        if dpi == self.dpi {
            return Ok(());
        }
        self.dpi = dpi;

        if let Some(device) = self.device.as_mut() {
            device.swap_chain.recreate_bitmaps(&self.independent.d2d, dpi)?;
        }
        info!(dpi, "DPI changed");
        Ok(())
    }
}

impl Drop for TextRenderer {
    fn drop(&mut self) {
        self.discard_device_resources();
        debug!(frames = self.frames.frame_number(), "Text renderer dropped");
    }
}
