//! Direct2D 资源
//!
//! 工厂、设备与设备上下文属于设备无关资源，随程序存活；
//! 目标位图和画刷依赖交换链缓冲区，属于设备相关资源。

use std::mem::ManuallyDrop;
use tracing::debug;
use windows::{
    Win32::Graphics::Direct2D::Common::*,
    Win32::Graphics::Direct2D::*,
    Win32::Graphics::Dxgi::Common::DXGI_FORMAT_UNKNOWN,
    Win32::Graphics::Dxgi::IDXGISurface,
};

use super::interop::InteropDevice;
use super::ApiResultExt;
use crate::core::error::Result;
use crate::core::Color;
use crate::renderer::text::LayoutRect;

impl From<Color> for D2D1_COLOR_F {
    fn from(c: Color) -> Self {
        D2D1_COLOR_F {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

impl From<LayoutRect> for D2D_RECT_F {
    fn from(r: LayoutRect) -> Self {
        D2D_RECT_F {
            left: r.left,
            top: r.top,
            right: r.right,
            bottom: r.bottom,
        }
    }
}

/// Direct2D 工厂、设备与设备上下文
pub struct D2DContext {
    pub factory: ID2D1Factory1,
    pub device: ID2D1Device,
    pub context: ID2D1DeviceContext,
}

impl D2DContext {
    /// 基于 11On12 设备的 DXGI 接口创建单线程 Direct2D 设备
    pub fn new(interop: &InteropDevice) -> Result<Self> {
        let dxgi_device = interop.dxgi_device()?;

        unsafe {
            let factory: ID2D1Factory1 = D2D1CreateFactory(D2D1_FACTORY_TYPE_SINGLE_THREADED, None)
                .api("D2D1CreateFactory")?;
            let device = factory
                .CreateDevice(&dxgi_device)
                .api("ID2D1Factory1::CreateDevice")?;
            let context = device
                .CreateDeviceContext(D2D1_DEVICE_CONTEXT_OPTIONS_NONE)
                .api("ID2D1Device::CreateDeviceContext")?;

            debug!("Direct2D device context created");

            Ok(Self {
                factory,
                device,
                context,
            })
        }
    }

    /// 为包装后的缓冲区创建目标位图
    ///
    /// 位图只能作为渲染目标（`CANNOT_DRAW`），像素格式沿用表面格式，
    /// DPI 使用窗口当前 DPI。
    pub fn create_target_bitmap(&self, surface: &IDXGISurface, dpi: f32) -> Result<ID2D1Bitmap1> {
        let props = D2D1_BITMAP_PROPERTIES1 {
            pixelFormat: D2D1_PIXEL_FORMAT {
                format: DXGI_FORMAT_UNKNOWN,
                alphaMode: D2D1_ALPHA_MODE_PREMULTIPLIED,
            },
            dpiX: dpi,
            dpiY: dpi,
            bitmapOptions: D2D1_BITMAP_OPTIONS_TARGET | D2D1_BITMAP_OPTIONS_CANNOT_DRAW,
            colorContext: ManuallyDrop::new(None),
        };

        unsafe {
            self.context
                .CreateBitmapFromDxgiSurface(surface, Some(&props))
                .api("ID2D1DeviceContext::CreateBitmapFromDxgiSurface")
        }
    }

    pub fn create_solid_brush(&self, color: Color) -> Result<ID2D1SolidColorBrush> {
        unsafe {
            self.context
                .CreateSolidColorBrush(&D2D1_COLOR_F::from(color), None)
                .api("ID2D1RenderTarget::CreateSolidColorBrush")
        }
    }

    /// 解除上下文对目标位图的引用，重建交换链之前必须调用
    pub fn clear_target(&self) {
        unsafe {
            self.context.SetTarget(None::<&ID2D1Image>);
        }
    }
}
