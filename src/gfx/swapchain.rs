//! 交换链与每帧渲染目标
//!
//! 每块后台缓冲区对应一组资源：D3D12 缓冲区本身、它的 RTV、
//! 11On12 包装资源以及 Direct2D 目标位图。重建交换链前必须先
//! 释放这些引用，否则 `ResizeBuffers` 会失败。

use tracing::{debug, info};
use windows::{
    core::Interface,
    Win32::Foundation::HWND,
    Win32::Graphics::Direct2D::ID2D1Bitmap1,
    Win32::Graphics::Direct3D11::ID3D11Resource,
    Win32::Graphics::Direct3D12::*,
    Win32::Graphics::Dxgi::Common::*,
    Win32::Graphics::Dxgi::*,
};

use super::d2d::D2DContext;
use super::d3d12::Dx12Device;
use super::interop::InteropDevice;
use super::ApiResultExt;
use crate::core::error::Result;
use crate::renderer::frame::FRAME_COUNT;

const BACK_BUFFER_FORMAT: DXGI_FORMAT = DXGI_FORMAT_R8G8B8A8_UNORM;

/// 一块后台缓冲区及其派生资源
pub struct FrameTarget {
    pub back_buffer: ID3D12Resource,
    pub wrapped: ID3D11Resource,
    pub bitmap: ID2D1Bitmap1,
}

/// 交换链
pub struct SwapChain {
    swap_chain: IDXGISwapChain3,
    rtv_heap: ID3D12DescriptorHeap,
    rtv_descriptor_size: usize,
    frames: Vec<FrameTarget>,
}

impl SwapChain {
    /// 创建交换链、RTV 堆以及每块缓冲区的包装资源与位图
    pub fn new(
        dx12: &Dx12Device,
        interop: &InteropDevice,
        d2d: &D2DContext,
        hwnd: HWND,
        width: u32,
        height: u32,
        dpi: f32,
    ) -> Result<Self> {
        unsafe {
            let desc = DXGI_SWAP_CHAIN_DESC1 {
                Width: width,
                Height: height,
                Format: BACK_BUFFER_FORMAT,
                SampleDesc: DXGI_SAMPLE_DESC {
                    Count: 1,
                    ..Default::default()
                },
                BufferUsage: DXGI_USAGE_RENDER_TARGET_OUTPUT,
                BufferCount: FRAME_COUNT as u32,
                SwapEffect: DXGI_SWAP_EFFECT_FLIP_DISCARD,
                ..Default::default()
            };

            // 交换链需要命令队列，以便 Present 时刷新
            let swap_chain: IDXGISwapChain1 = dx12
                .factory
                .CreateSwapChainForHwnd(&dx12.command_queue, hwnd, &desc, None, None)
                .api("IDXGIFactory2::CreateSwapChainForHwnd")?;
            let swap_chain: IDXGISwapChain3 = swap_chain
                .cast()
                .api("IDXGISwapChain1::QueryInterface(IDXGISwapChain3)")?;

            let rtv_heap_desc = D3D12_DESCRIPTOR_HEAP_DESC {
                NumDescriptors: FRAME_COUNT as u32,
                Type: D3D12_DESCRIPTOR_HEAP_TYPE_RTV,
                Flags: D3D12_DESCRIPTOR_HEAP_FLAG_NONE,
                NodeMask: 0,
            };
            let rtv_heap: ID3D12DescriptorHeap = dx12
                .device
                .CreateDescriptorHeap(&rtv_heap_desc)
                .api("ID3D12Device::CreateDescriptorHeap")?;
            let rtv_descriptor_size = dx12
                .device
                .GetDescriptorHandleIncrementSize(D3D12_DESCRIPTOR_HEAP_TYPE_RTV)
                as usize;

            info!(width, height, buffers = FRAME_COUNT, "Swap chain created");

            let mut this = Self {
                swap_chain,
                rtv_heap,
                rtv_descriptor_size,
                frames: Vec::with_capacity(FRAME_COUNT),
            };
            this.create_frames(dx12, interop, d2d, dpi)?;
            Ok(this)
        }
    }

    pub fn frame(&self, index: usize) -> Option<&FrameTarget> {
        self.frames.get(index)
    }

    /// 交换链报告的当前后台缓冲区
    pub fn current_back_buffer_index(&self) -> usize {
        unsafe { self.swap_chain.GetCurrentBackBufferIndex() as usize }
    }

    pub fn present(&self, vsync: bool) -> Result<()> {
        let sync_interval = u32::from(vsync);
        unsafe {
            self.swap_chain
                .Present(sync_interval, DXGI_PRESENT(0))
                .ok()
                .api("IDXGISwapChain::Present")
        }
    }

    /// 调整缓冲区大小并重建每帧资源
    pub fn resize(
        &mut self,
        dx12: &Dx12Device,
        interop: &InteropDevice,
        d2d: &D2DContext,
        width: u32,
        height: u32,
        dpi: f32,
    ) -> Result<()> {
        self.release_frames(dx12, interop, d2d)?;

        unsafe {
            self.swap_chain
                .ResizeBuffers(
                    FRAME_COUNT as u32,
                    width,
                    height,
                    BACK_BUFFER_FORMAT,
                    DXGI_SWAP_CHAIN_FLAG(0),
                )
                .api("IDXGISwapChain::ResizeBuffers")?;
        }
        self.create_frames(dx12, interop, d2d, dpi)?;
        debug!(width, height, "Swap chain resized");
        Ok(())
    }

    /// 只重建目标位图（DPI 改变时）
    pub fn recreate_bitmaps(&mut self, d2d: &D2DContext, dpi: f32) -> Result<()> {
        d2d.clear_target();
        for frame in &mut self.frames {
            let surface: IDXGISurface = frame
                .wrapped
                .cast()
                .api("ID3D11Resource::QueryInterface(IDXGISurface)")?;
            frame.bitmap = d2d.create_target_bitmap(&surface, dpi)?;
        }
        debug!(dpi, "Target bitmaps recreated");
        Ok(())
    }

    /// 释放全部对缓冲区的引用并等待 GPU 空闲
    fn release_frames(&mut self, dx12: &Dx12Device, interop: &InteropDevice, d2d: &D2DContext) -> Result<()> {
        d2d.clear_target();
        self.frames.clear();
        interop.clear_state_and_flush();
        dx12.wait_for_idle()
    }

    fn create_frames(
        &mut self,
        dx12: &Dx12Device,
        interop: &InteropDevice,
        d2d: &D2DContext,
        dpi: f32,
    ) -> Result<()> {
        unsafe {
            let rtv_start = self.rtv_heap.GetCPUDescriptorHandleForHeapStart();
            for i in 0..FRAME_COUNT {
                let back_buffer: ID3D12Resource = self
                    .swap_chain
                    .GetBuffer(i as u32)
                    .api("IDXGISwapChain::GetBuffer")?;

                let handle = D3D12_CPU_DESCRIPTOR_HANDLE {
                    ptr: rtv_start.ptr + i * self.rtv_descriptor_size,
                };
                dx12.device.CreateRenderTargetView(&back_buffer, None, handle);

                // D3D12 内容（此处没有）先于 D2D 绘制，所以进入状态是 RENDER_TARGET
                let wrapped = interop.wrap_back_buffer(&back_buffer)?;
                let surface: IDXGISurface = wrapped
                    .cast()
                    .api("ID3D11Resource::QueryInterface(IDXGISurface)")?;
                let bitmap = d2d.create_target_bitmap(&surface, dpi)?;

                self.frames.push(FrameTarget {
                    back_buffer,
                    wrapped,
                    bitmap,
                });
            }
        }
        debug!(frames = self.frames.len(), dpi, "Frame targets created");
        Ok(())
    }
}
