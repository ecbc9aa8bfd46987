//! D3D11On12 桥接
//!
//! Direct2D 只能画在 DXGI 表面上，而 D3D12 的交换链缓冲区无法直接
//! 交给 Direct2D。11On12 设备在 D3D12 设备之上模拟一个 D3D11 设备，
//! 把 D3D12 资源"包装"成 D3D11 资源：
//!
//! - 创建包装时指定进入状态 RENDER_TARGET 与退出状态 PRESENT；
//! - `acquire` 之后 D3D11/D2D 才能使用该资源；
//! - `release` 把资源转换到退出状态，`flush` 把 D3D11 命令提交到共享队列。

use tracing::debug;
use windows::{
    core::{IUnknown, Interface},
    Win32::Graphics::Direct3D11::*,
    Win32::Graphics::Direct3D11on12::*,
    Win32::Graphics::Direct3D12::*,
    Win32::Graphics::Dxgi::IDXGIDevice,
};

use super::d3d12::Dx12Device;
use super::ApiResultExt;
use crate::core::error::{GraphicsError, Result};

/// 11On12 设备及其立即上下文
pub struct InteropDevice {
    pub on12_device: ID3D11On12Device,
    pub d3d11_device: ID3D11Device,
    pub immediate_context: ID3D11DeviceContext,
}

impl InteropDevice {
    /// 在 D3D12 设备与命令队列之上创建 11On12 设备
    ///
    /// 需要 BGRA 支持，Direct2D 互操作依赖它。
    pub fn new(dx12: &Dx12Device) -> Result<Self> {
        let queues = [Some(dx12.command_queue.cast::<IUnknown>().api("ID3D12CommandQueue::QueryInterface")?)];
        let mut d3d11_device: Option<ID3D11Device> = None;
        let mut immediate_context: Option<ID3D11DeviceContext> = None;

        unsafe {
            D3D11On12CreateDevice(
                &dx12.device,
                D3D11_CREATE_DEVICE_BGRA_SUPPORT.0 as u32,
                None,
                Some(&queues),
                0,
                Some(&mut d3d11_device),
                Some(&mut immediate_context),
                None,
            )
            .api("D3D11On12CreateDevice")?;
        }

        let d3d11_device = d3d11_device.ok_or_else(|| {
            GraphicsError::DeviceCreation("D3D11On12CreateDevice returned no device".to_string())
        })?;
        let immediate_context = immediate_context.ok_or_else(|| {
            GraphicsError::DeviceCreation("D3D11On12CreateDevice returned no context".to_string())
        })?;
        let on12_device: ID3D11On12Device = d3d11_device
            .cast()
            .api("ID3D11Device::QueryInterface(ID3D11On12Device)")?;

        debug!("D3D11On12 device created");

        Ok(Self {
            on12_device,
            d3d11_device,
            immediate_context,
        })
    }

    /// Direct2D 设备需要的 DXGI 设备接口
    pub fn dxgi_device(&self) -> Result<IDXGIDevice> {
        self.on12_device
            .cast()
            .api("ID3D11On12Device::QueryInterface(IDXGIDevice)")
    }

    /// 把交换链缓冲区包装成可供 Direct2D 绘制的 D3D11 资源
    pub fn wrap_back_buffer(&self, back_buffer: &ID3D12Resource) -> Result<ID3D11Resource> {
        let flags = D3D11_RESOURCE_FLAGS {
            BindFlags: D3D11_BIND_RENDER_TARGET.0 as u32,
            ..Default::default()
        };

        let mut wrapped: Option<ID3D11Resource> = None;
        unsafe {
            self.on12_device
                .CreateWrappedResource(
                    back_buffer,
                    &flags,
                    D3D12_RESOURCE_STATE_RENDER_TARGET,
                    D3D12_RESOURCE_STATE_PRESENT,
                    &mut wrapped,
                )
                .api("ID3D11On12Device::CreateWrappedResource")?;
        }

        wrapped.ok_or_else(|| {
            GraphicsError::DeviceCreation("CreateWrappedResource returned no resource".to_string()).into()
        })
    }

    pub fn acquire(&self, wrapped: &ID3D11Resource) {
        unsafe {
            self.on12_device
                .AcquireWrappedResources(&[Some(wrapped.clone())]);
        }
    }

    /// 释放后资源转换到创建时指定的退出状态（PRESENT）
    pub fn release(&self, wrapped: &ID3D11Resource) {
        unsafe {
            self.on12_device
                .ReleaseWrappedResources(&[Some(wrapped.clone())]);
        }
    }

    /// 把 D3D11 命令提交到共享的 D3D12 命令队列
    pub fn flush(&self) {
        unsafe {
            self.immediate_context.Flush();
        }
    }

    /// 丢弃包装资源后调用，确保 11On12 的延迟销毁真正发生
    pub fn clear_state_and_flush(&self) {
        unsafe {
            self.immediate_context.ClearState();
            self.immediate_context.Flush();
        }
    }
}
